use crate::domain::model::{AvailabilityResult, BookingInterval, DaySchedule};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Supplies a bearer credential for outbound calls. Implementations cache;
/// callers just ask.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<String>;
}

/// Remote source of a location's open/close schedule.
#[async_trait]
pub trait HoursSource: Send + Sync {
    /// Fetch the schedule entry for one date. `None` means the source
    /// answered but carried no entry for that date.
    async fn day_schedule(&self, date: NaiveDate) -> Result<Option<DaySchedule>>;
}

/// Remote source of booking intervals for the resource under display.
#[async_trait]
pub trait BookingSource: Send + Sync {
    async fn bookings_for(&self, date: NaiveDate) -> Result<Vec<BookingInterval>>;
}

/// What the HTTP layer sees of the engine.
#[async_trait]
pub trait AvailabilityService: Send + Sync {
    async fn today_availability(&self) -> Result<AvailabilityResult>;
}
