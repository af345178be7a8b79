use crate::core::timeparse;
use crate::domain::model::{HoursWindow, Slot, SlotGrid};
use crate::utils::error::{BoardError, Result};
use chrono::{Duration, NaiveDate, Timelike};
use chrono_tz::Tz;

/// Fixed display slot width.
pub const SLOT_MINUTES: u32 = 30;

/// Build the day's slot grid from a textual open/close window.
///
/// Unlike the hours resolver this is strict: by the time it runs, the window
/// is either upstream data that classified as open or the configured
/// fallback, and config validation guarantees the fallback parses. A close
/// boundary at or before the open boundary means the window crosses
/// midnight; the close string is then re-anchored to the next calendar date.
pub fn build_grid(date: NaiveDate, window: &HoursWindow, tz: Tz) -> Result<SlotGrid> {
    let open = timeparse::parse_time_on(date, &window.open_time, tz).ok_or_else(|| {
        BoardError::TimeParseError {
            value: window.open_time.clone(),
        }
    })?;
    let mut close = timeparse::parse_time_on(date, &window.close_time, tz).ok_or_else(|| {
        BoardError::TimeParseError {
            value: window.close_time.clone(),
        }
    })?;

    let mut rolls_over = false;
    if close <= open {
        let next_day = date.succ_opt().ok_or_else(|| BoardError::ProcessingError {
            message: format!("no calendar day after {}", date),
        })?;
        close = timeparse::parse_time_on(next_day, &window.close_time, tz).ok_or_else(|| {
            BoardError::TimeParseError {
                value: window.close_time.clone(),
            }
        })?;
        rolls_over = true;
    }

    // Round the start down to the slot boundary at or before the open time.
    let aligned = open
        .with_minute(open.minute() - open.minute() % SLOT_MINUTES)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .ok_or_else(|| BoardError::ProcessingError {
            message: format!("could not align slot start at {}", open),
        })?;

    let step = Duration::minutes(SLOT_MINUTES as i64);
    let mut slots = Vec::new();
    let mut cursor = aligned;
    loop {
        let end = cursor + step;
        if end > close {
            break;
        }
        slots.push(Slot {
            start: cursor,
            end,
            label: cursor.format("%-I:%M %p").to_string(),
        });
        cursor = end;
    }

    Ok(SlotGrid { slots, rolls_over })
}
