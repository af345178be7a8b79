use crate::core::grid::SLOT_MINUTES;
use crate::domain::model::{slot_key, BookingStatus, OccupancySet};
use crate::domain::ports::BookingSource;
use crate::utils::error::{BoardError, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use chrono_tz::Tz;

/// Datetime shapes seen in booking payloads, tried after RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn parse_instant(raw: &str, tz: Tz) -> Option<DateTime<Tz>> {
    let trimmed = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(instant.with_timezone(&tz));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            if let Some(resolved) = tz.from_local_datetime(&naive).earliest() {
                return Some(resolved);
            }
        }
    }
    None
}

/// Collect the occupied slot keys for `date`, and for `date + 1` when the
/// business day rolls past midnight. The two fetches have no data
/// dependency, so they run concurrently.
///
/// Bookings whose status is not in the active set never contribute. A
/// booking with an unparseable boundary is skipped with a warning; a failed
/// fetch propagates to the caller.
pub async fn occupied_keys<B: BookingSource>(
    source: &B,
    date: NaiveDate,
    rolls_over: bool,
    tz: Tz,
) -> Result<OccupancySet> {
    let records = if rolls_over {
        let next_day = date.succ_opt().ok_or_else(|| BoardError::ProcessingError {
            message: format!("no calendar day after {}", date),
        })?;
        let (mut today, tomorrow) =
            tokio::try_join!(source.bookings_for(date), source.bookings_for(next_day))?;
        today.extend(tomorrow);
        today
    } else {
        source.bookings_for(date).await?
    };

    let step = Duration::minutes(SLOT_MINUTES as i64);
    let mut occupancy = OccupancySet::default();

    for record in records {
        if !BookingStatus::from_raw(&record.status).is_active() {
            continue;
        }

        let (start, end) = match (parse_instant(&record.start, tz), parse_instant(&record.end, tz))
        {
            (Some(start), Some(end)) => (start, end),
            _ => {
                tracing::warn!(
                    "Skipping booking with unparseable interval: {:?} - {:?}",
                    record.start,
                    record.end
                );
                continue;
            }
        };

        // Align to the slot boundary at or before the booking start so a
        // partial overlap still occupies the slot it lands in.
        let aligned = start
            .with_minute(start.minute() - start.minute() % SLOT_MINUTES)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_nanosecond(0));
        let Some(mut cursor) = aligned else {
            tracing::warn!("Skipping booking starting at unalignable instant {}", start);
            continue;
        };

        while cursor < end {
            occupancy.insert(slot_key(&cursor));
            cursor += step;
        }
    }

    Ok(occupancy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::BookingInterval;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const TZ: Tz = chrono_tz::America::New_York;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn booking(start: &str, end: &str, status: &str) -> BookingInterval {
        BookingInterval {
            start: start.to_string(),
            end: end.to_string(),
            status: status.to_string(),
        }
    }

    struct StubBookingSource {
        by_date: HashMap<NaiveDate, Vec<BookingInterval>>,
        calls: Mutex<Vec<NaiveDate>>,
        fail: bool,
    }

    impl StubBookingSource {
        fn new(by_date: HashMap<NaiveDate, Vec<BookingInterval>>) -> Self {
            Self {
                by_date,
                calls: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn single_day(bookings: Vec<BookingInterval>) -> Self {
            Self::new(HashMap::from([(date(), bookings)]))
        }

        fn failing() -> Self {
            Self {
                by_date: HashMap::new(),
                calls: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn requested_dates(&self) -> Vec<NaiveDate> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BookingSource for StubBookingSource {
        async fn bookings_for(&self, date: NaiveDate) -> Result<Vec<BookingInterval>> {
            if self.fail {
                return Err(BoardError::ProcessingError {
                    message: "bookings unavailable".to_string(),
                });
            }
            self.calls.lock().unwrap().push(date);
            Ok(self.by_date.get(&date).cloned().unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn test_confirmed_two_slot_booking_occupies_two_keys() {
        let source = StubBookingSource::single_day(vec![booking(
            "2026-03-02T10:00:00",
            "2026-03-02T11:00:00",
            "confirmed",
        )]);
        let occupancy = occupied_keys(&source, date(), false, TZ).await.unwrap();
        assert_eq!(occupancy.len(), 2);
        assert!(occupancy.contains("2026-03-02 10:00"));
        assert!(occupancy.contains("2026-03-02 10:30"));
    }

    #[tokio::test]
    async fn test_canceled_booking_contributes_nothing() {
        let source = StubBookingSource::single_day(vec![booking(
            "2026-03-02T10:00:00",
            "2026-03-02T11:00:00",
            "canceled",
        )]);
        let occupancy = occupied_keys(&source, date(), false, TZ).await.unwrap();
        assert!(occupancy.is_empty());
    }

    #[tokio::test]
    async fn test_unaligned_booking_occupies_overlapped_slots() {
        let source = StubBookingSource::single_day(vec![booking(
            "2026-03-02 10:15",
            "2026-03-02 10:45",
            "checked-in",
        )]);
        let occupancy = occupied_keys(&source, date(), false, TZ).await.unwrap();
        assert_eq!(occupancy.len(), 2);
        assert!(occupancy.contains("2026-03-02 10:00"));
        assert!(occupancy.contains("2026-03-02 10:30"));
    }

    #[tokio::test]
    async fn test_unparseable_booking_is_skipped_not_fatal() {
        let source = StubBookingSource::single_day(vec![
            booking("garbage", "2026-03-02T11:00:00", "confirmed"),
            booking("2026-03-02T14:00:00", "2026-03-02T14:30:00", "confirmed"),
        ]);
        let occupancy = occupied_keys(&source, date(), false, TZ).await.unwrap();
        assert_eq!(occupancy.len(), 1);
        assert!(occupancy.contains("2026-03-02 14:00"));
    }

    #[tokio::test]
    async fn test_rollover_fetches_both_days() {
        let next = date().succ_opt().unwrap();
        let source = StubBookingSource::new(HashMap::from([
            (
                date(),
                vec![booking("2026-03-02T23:00:00", "2026-03-02T23:30:00", "confirmed")],
            ),
            (
                next,
                vec![booking("2026-03-03T00:00:00", "2026-03-03T00:30:00", "confirmed")],
            ),
        ]));

        let occupancy = occupied_keys(&source, date(), true, TZ).await.unwrap();

        let mut requested = source.requested_dates();
        requested.sort();
        assert_eq!(requested, vec![date(), next]);
        assert!(occupancy.contains("2026-03-02 23:00"));
        assert!(occupancy.contains("2026-03-03 00:00"));
    }

    #[tokio::test]
    async fn test_non_rollover_fetches_one_day() {
        let source = StubBookingSource::single_day(vec![]);
        occupied_keys(&source, date(), false, TZ).await.unwrap();
        assert_eq!(source.requested_dates(), vec![date()]);
    }

    #[tokio::test]
    async fn test_cross_midnight_booking_marks_only_in_range_keys() {
        let source = StubBookingSource::single_day(vec![booking(
            "2026-03-02T23:30:00",
            "2026-03-03T00:30:00",
            "confirmed",
        )]);
        let occupancy = occupied_keys(&source, date(), false, TZ).await.unwrap();
        assert_eq!(occupancy.len(), 2);
        assert!(occupancy.contains("2026-03-02 23:30"));
        assert!(occupancy.contains("2026-03-03 00:00"));
        // Scoped by date: the same wall-clock times on other days stay free.
        assert!(!occupancy.contains("2026-03-02 00:00"));
    }

    #[tokio::test]
    async fn test_rfc3339_with_offset_is_accepted() {
        // 15:00 UTC is 10:00 in America/New_York on this date.
        let source = StubBookingSource::single_day(vec![booking(
            "2026-03-02T15:00:00Z",
            "2026-03-02T15:30:00Z",
            "active",
        )]);
        let occupancy = occupied_keys(&source, date(), false, TZ).await.unwrap();
        assert!(occupancy.contains("2026-03-02 10:00"));
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let source = StubBookingSource::failing();
        assert!(occupied_keys(&source, date(), false, TZ).await.is_err());
    }
}
