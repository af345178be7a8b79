use crate::core::timeparse;
use crate::domain::model::{DaySchedule, HoursOrigin, HoursWindow, ResolvedHours};
use crate::domain::ports::HoursSource;
use crate::utils::error::{BoardError, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;

/// Full-day sentinel window: open == close == midnight, which the grid
/// builder reads as spanning to the next midnight.
const MIDNIGHT: &str = "00:00";

/// Resolve today's open/close window, substituting the configured fallback
/// on any failure. This boundary never propagates an error; the `origin`
/// field records whether degradation happened.
pub async fn resolve<H: HoursSource>(
    source: &H,
    date: NaiveDate,
    tz: Tz,
    fallback: &HoursWindow,
) -> ResolvedHours {
    match resolve_upstream(source, date, tz).await {
        Ok(window) => ResolvedHours {
            window,
            origin: HoursOrigin::Upstream,
        },
        Err(e) => {
            tracing::warn!("Using fallback hours for {}: {}", date, e);
            ResolvedHours {
                window: fallback.clone(),
                origin: HoursOrigin::Fallback,
            }
        }
    }
}

async fn resolve_upstream<H: HoursSource>(
    source: &H,
    date: NaiveDate,
    tz: Tz,
) -> Result<HoursWindow> {
    let schedule = source
        .day_schedule(date)
        .await?
        .ok_or_else(|| BoardError::ProcessingError {
            message: format!("hours source has no entry for {}", date),
        })?;

    classify(&schedule, date, tz)
}

/// Classify a day's schedule entry into an open/close window.
///
/// An "open" day without sub-intervals is always-open. Otherwise the window
/// collapses to the extremal boundaries: earliest `from`, latest `to`.
/// Disjoint open periods merge into one span.
fn classify(schedule: &DaySchedule, date: NaiveDate, tz: Tz) -> Result<HoursWindow> {
    if !schedule.status.trim().eq_ignore_ascii_case("open") {
        return Err(BoardError::ProcessingError {
            message: format!("day status {:?} is not open", schedule.status),
        });
    }

    if schedule.hours.is_empty() {
        return Ok(HoursWindow {
            open_time: MIDNIGHT.to_string(),
            close_time: MIDNIGHT.to_string(),
        });
    }

    let mut earliest_open: Option<(chrono::DateTime<Tz>, &str)> = None;
    let mut latest_close: Option<(chrono::DateTime<Tz>, &str)> = None;

    for range in &schedule.hours {
        let from = timeparse::parse_time_on(date, &range.from, tz).ok_or_else(|| {
            BoardError::TimeParseError {
                value: range.from.clone(),
            }
        })?;
        let to = timeparse::parse_time_on(date, &range.to, tz).ok_or_else(|| {
            BoardError::TimeParseError {
                value: range.to.clone(),
            }
        })?;

        if earliest_open.map_or(true, |(best, _)| from < best) {
            earliest_open = Some((from, &range.from));
        }
        if latest_close.map_or(true, |(best, _)| to > best) {
            latest_close = Some((to, &range.to));
        }
    }

    // hours is non-empty, so both extremes are set.
    let open_time = earliest_open
        .map(|(_, raw)| raw.to_string())
        .ok_or_else(|| BoardError::ProcessingError {
            message: "no open boundary found".to_string(),
        })?;
    let close_time = latest_close
        .map(|(_, raw)| raw.to_string())
        .ok_or_else(|| BoardError::ProcessingError {
            message: "no close boundary found".to_string(),
        })?;

    Ok(HoursWindow {
        open_time,
        close_time,
    })
}
