use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Key format shared by the slot grid and the occupancy set. The date part
/// keeps a rollover day's early-morning slots distinct from the same
/// wall-clock times on the starting day.
pub const SLOT_KEY_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn slot_key(instant: &DateTime<Tz>) -> String {
    instant.format(SLOT_KEY_FORMAT).to_string()
}

/// Bearer credential held in the process-wide single-slot cache. Replaced
/// wholesale on refresh, never field-by-field.
#[derive(Debug, Clone)]
pub struct Credential {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Open/close boundary pair for one calendar date, kept in the hours
/// source's own textual format until the grid builder parses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoursWindow {
    pub open_time: String,
    pub close_time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoursOrigin {
    Upstream,
    Fallback,
}

/// Hours resolution outcome. `origin` records whether the window came from
/// the hours source or from the configured static fallback.
#[derive(Debug, Clone)]
pub struct ResolvedHours {
    pub window: HoursWindow,
    pub origin: HoursOrigin,
}

/// One open sub-interval as reported by the hours source.
#[derive(Debug, Clone, Deserialize)]
pub struct HoursRange {
    pub from: String,
    pub to: String,
}

/// The hours source's entry for a single date.
#[derive(Debug, Clone, Deserialize)]
pub struct DaySchedule {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub hours: Vec<HoursRange>,
}

/// A fixed-width display slot. Identity is the start instant truncated to
/// date+minute, see [`slot_key`].
#[derive(Debug, Clone)]
pub struct Slot {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub label: String,
}

impl Slot {
    pub fn key(&self) -> String {
        slot_key(&self.start)
    }
}

/// Ordered, contiguous sequence of slots covering one business day.
/// `rolls_over` is set when the close boundary landed on the next calendar
/// date; the booking aggregator uses it to decide whether to fetch a second
/// day.
#[derive(Debug, Clone)]
pub struct SlotGrid {
    pub slots: Vec<Slot>,
    pub rolls_over: bool,
}

/// A booking record as returned by the booking source. Both the
/// `fromDate`/`toDate` and the shorter `from`/`to` field spellings are
/// accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingInterval {
    #[serde(rename = "fromDate", alias = "from")]
    pub start: String,
    #[serde(rename = "toDate", alias = "to")]
    pub end: String,
    #[serde(default)]
    pub status: String,
}

/// Statuses whose bookings occupy slots. This table is the policy; the
/// enum below is only its closed normalized form.
const ACTIVE_STATUSES: &[BookingStatus] = &[
    BookingStatus::Confirmed,
    BookingStatus::CheckedIn,
    BookingStatus::Active,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Confirmed,
    CheckedIn,
    Active,
    Pending,
    Canceled,
    Rejected,
    PendingCancel,
    Unknown,
}

impl BookingStatus {
    /// Normalize a raw upstream status: case, surrounding whitespace, and
    /// separator characters (`-`, `_`, inner spaces) are all insignificant.
    pub fn from_raw(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "confirmed" => BookingStatus::Confirmed,
            "checkedin" => BookingStatus::CheckedIn,
            "active" => BookingStatus::Active,
            "pending" => BookingStatus::Pending,
            "canceled" | "cancelled" => BookingStatus::Canceled,
            "rejected" => BookingStatus::Rejected,
            "pendingcancel" | "cancelpending" => BookingStatus::PendingCancel,
            _ => BookingStatus::Unknown,
        }
    }

    pub fn is_active(self) -> bool {
        ACTIVE_STATUSES.contains(&self)
    }
}

/// Set of occupied slot keys for the day under display.
#[derive(Debug, Clone, Default)]
pub struct OccupancySet {
    keys: HashSet<String>,
}

impl OccupancySet {
    pub fn insert(&mut self, key: String) {
        self.keys.insert(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// One row of the display payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotView {
    pub label: String,
    pub booked: bool,
}

/// The sole externally visible artifact, rebuilt from scratch per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResult {
    pub date_display: String,
    pub grid: Vec<SlotView>,
}
