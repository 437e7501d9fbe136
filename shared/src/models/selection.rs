//! What the customer is asking for: a table or a food order

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Party size bounds of the booking form
pub const MIN_PARTY_SIZE: u8 = 1;
pub const MAX_PARTY_SIZE: u8 = 20;
pub const DEFAULT_PARTY_SIZE: u8 = 2;

/// Table reference as shown on the floor plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    /// "table-N"
    pub id: String,
    pub number: u32,
    /// 区域: Rooftop / Main / Braai Corner
    pub area: String,
    /// Seats
    pub capacity: u8,
}

impl TableRef {
    pub fn new(number: u32, area: impl Into<String>, capacity: u8) -> Self {
        Self {
            id: format!("table-{number}"),
            number,
            area: area.into(),
            capacity,
        }
    }

    /// "Table 4 (Main)"
    pub fn label(&self) -> String {
        format!("Table {} ({})", self.number, self.area)
    }
}

/// Table booking selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSelection {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub table: TableRef,
    pub party_size: u8,
}

/// 订单类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// 到店自取
    Collection,
    /// 外送
    Delivery,
    /// 堂食
    DineIn,
}

impl OrderType {
    pub fn label(&self) -> &'static str {
        match self {
            OrderType::Collection => "collection",
            OrderType::Delivery => "delivery",
            OrderType::DineIn => "dine-in",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
}

impl OrderItem {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// Food order selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSelection {
    pub order_type: OrderType,
    pub items: Vec<OrderItem>,
}

impl OrderSelection {
    /// "2x Boerewors Roll, 1x Chips"
    pub fn summary(&self) -> String {
        self.items
            .iter()
            .map(|item| format!("{}x {}", item.quantity, item.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Selected resources of a draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
    Booking(BookingSelection),
    Order(OrderSelection),
}
