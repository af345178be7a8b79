pub mod bookings;
pub mod engine;
pub mod grid;
pub mod hours;
pub mod timeparse;
pub mod token;

pub use crate::domain::ports::{AvailabilityService, BookingSource, HoursSource, TokenProvider};
pub use crate::utils::error::Result;
