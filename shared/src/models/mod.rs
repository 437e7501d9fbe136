//! Domain models for table bookings and food orders

pub mod code;
pub mod contact;
pub mod draft;
pub mod selection;

pub use code::ConfirmationCode;
pub use contact::{Contact, normalize_phone};
pub use draft::{Draft, DraftKind, DraftStatus};
pub use selection::{
    BookingSelection, DEFAULT_PARTY_SIZE, MAX_PARTY_SIZE, MIN_PARTY_SIZE, OrderItem,
    OrderSelection, OrderType, Selection, TableRef,
};
