//! Booking catalogue: dates, time slots and tables on offer
//!
//! Availability is mocked; a real deployment would load it from the
//! reservation book.

use chrono::{Duration, NaiveDate, NaiveTime};
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::models::{BookingSelection, TableRef};

use crate::utils::{AppError, AppResult, ErrorCode};

/// First and last bookable slot, every 30 minutes
pub const FIRST_SLOT: (u32, u32) = (11, 0);
pub const LAST_SLOT: (u32, u32) = (22, 0);
pub const SLOT_MINUTES: i64 = 30;

/// Days ahead (including today) that can be booked
pub const BOOKING_WINDOW_DAYS: i64 = 30;

/// Floor plan: area name and table capacities, numbered in this order
pub const AREAS: [(&str, [u8; 3]); 3] = [
    ("Rooftop", [2, 4, 6]),
    ("Main", [2, 4, 8]),
    ("Braai Corner", [4, 6, 8]),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSlot {
    pub date: NaiveDate,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub time: NaiveTime,
    pub available: bool,
    /// Tables still free at this time
    pub capacity: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSlot {
    pub table: TableRef,
    pub available: bool,
}

/// Everything the booking wizard can offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingCatalog {
    pub dates: Vec<DateSlot>,
    pub slots: Vec<TimeSlot>,
    pub tables: Vec<TableSlot>,
}

/// 11:00, 11:30, ... 22:00
pub fn slot_times() -> Vec<NaiveTime> {
    let (h, m) = FIRST_SLOT;
    let (last_h, last_m) = LAST_SLOT;
    let (Some(first), Some(last)) = (
        NaiveTime::from_hms_opt(h, m, 0),
        NaiveTime::from_hms_opt(last_h, last_m, 0),
    ) else {
        return Vec::new();
    };

    let mut times = Vec::new();
    let mut t = first;
    while t <= last {
        times.push(t);
        t += Duration::minutes(SLOT_MINUTES);
    }
    times
}

/// Tables numbered sequentially across areas (`table-1` .. `table-9`)
pub fn floor_plan() -> Vec<TableRef> {
    AREAS
        .iter()
        .flat_map(|(area, caps)| caps.iter().map(move |cap| (*area, *cap)))
        .enumerate()
        .map(|(i, (area, cap))| TableRef::new(i as u32 + 1, area, cap))
        .collect()
}

impl BookingCatalog {
    /// Everything open, for the next [`BOOKING_WINDOW_DAYS`] days from `today`
    pub fn all_available(today: NaiveDate) -> Self {
        Self {
            dates: window(today).map(|date| DateSlot { date, available: true }).collect(),
            slots: slot_times()
                .into_iter()
                .map(|time| TimeSlot {
                    time,
                    available: true,
                    capacity: 4,
                })
                .collect(),
            tables: floor_plan()
                .into_iter()
                .map(|table| TableSlot {
                    table,
                    available: true,
                })
                .collect(),
        }
    }

    /// Mock availability: ~90% of dates, ~80% of slots, ~70% of tables
    pub fn generate<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> Self {
        let mut catalog = Self::all_available(today);
        for d in &mut catalog.dates {
            d.available = rng.gen_bool(0.9);
        }
        for s in &mut catalog.slots {
            s.available = rng.gen_bool(0.8);
            s.capacity = rng.gen_range(2..=4);
        }
        for t in &mut catalog.tables {
            t.available = rng.gen_bool(0.7);
        }
        catalog
    }

    pub fn set_date_available(&mut self, date: NaiveDate, available: bool) {
        if let Some(d) = self.dates.iter_mut().find(|d| d.date == date) {
            d.available = available;
        }
    }

    pub fn set_slot_available(&mut self, time: NaiveTime, available: bool) {
        if let Some(s) = self.slots.iter_mut().find(|s| s.time == time) {
            s.available = available;
        }
    }

    pub fn set_table_available(&mut self, table_id: &str, available: bool) {
        if let Some(t) = self.tables.iter_mut().find(|t| t.table.id == table_id) {
            t.available = available;
        }
    }

    pub fn check_date(&self, date: NaiveDate) -> AppResult<()> {
        match self.dates.iter().find(|d| d.date == date) {
            None => Err(AppError::field_invalid(ErrorCode::DateOutOfRange, "date")),
            Some(d) if !d.available => Err(AppError::field_invalid(ErrorCode::SlotUnavailable, "date")),
            Some(_) => Ok(()),
        }
    }

    pub fn check_time(&self, time: NaiveTime) -> AppResult<()> {
        match self.slots.iter().find(|s| s.time == time) {
            Some(s) if s.available => Ok(()),
            _ => Err(AppError::field_invalid(ErrorCode::SlotUnavailable, "time")),
        }
    }

    /// Available table by id
    pub fn table(&self, table_id: &str) -> AppResult<&TableRef> {
        match self.tables.iter().find(|t| t.table.id == table_id) {
            Some(t) if t.available => Ok(&t.table),
            _ => Err(AppError::field_invalid(ErrorCode::TableUnavailable, "table")),
        }
    }

    /// Full check of a booking against this catalogue
    pub fn validate(&self, booking: &BookingSelection) -> AppResult<()> {
        self.check_date(booking.date)?;
        self.check_time(booking.time)?;
        let table = self.table(&booking.table.id)?;
        if table != &booking.table {
            return Err(AppError::field_invalid(ErrorCode::TableUnavailable, "table"));
        }
        Ok(())
    }
}

fn window(today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (0..BOOKING_WINDOW_DAYS).filter_map(move |i| today.checked_add_signed(Duration::days(i)))
}
