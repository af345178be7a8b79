use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

/// Candidate time formats in priority order. Richest shapes come first
/// because some inputs are ambiguous across formats ("9:00" must not be
/// captured by a bare-hour rule before the 24-hour rule has a chance):
///
/// 1. `%I:%M %p`: 12-hour with minutes, space before meridiem ("9:00 AM")
/// 2. `%I:%M%p`:  12-hour with minutes, no space ("09:00AM")
/// 3. `%H:%M`:    24-hour, leading zero optional ("14:30", "9:30")
/// 4. `%I %p`:    bare hour with meridiem ("9 AM")
/// 5. `%I%p`:     bare hour, no space ("9AM")
///
/// The order is part of the contract; changing it changes which instant an
/// ambiguous string resolves to.
const TIME_FORMATS: &[&str] = &["%I:%M %p", "%I:%M%p", "%H:%M", "%I %p", "%I%p"];

/// Parse a human time string anchored to `date` in `tz`. Returns `None` when
/// no candidate format matches; callers apply their own failure policy. A
/// local time made ambiguous by a DST fall-back resolves to the earliest
/// mapping.
pub fn parse_time_on(date: NaiveDate, raw: &str, tz: Tz) -> Option<DateTime<Tz>> {
    let trimmed = raw.trim();
    for format in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(trimmed, format) {
            if let Some(resolved) = tz.from_local_datetime(&date.and_time(time)).earliest() {
                return Some(resolved);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    const TZ: Tz = chrono_tz::America::New_York;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn test_twelve_hour_with_space() {
        let parsed = parse_time_on(date(), "9:30 AM", TZ).unwrap();
        assert_eq!((parsed.hour(), parsed.minute()), (9, 30));
    }

    #[test]
    fn test_twelve_hour_without_space() {
        let parsed = parse_time_on(date(), "09:30PM", TZ).unwrap();
        assert_eq!((parsed.hour(), parsed.minute()), (21, 30));
    }

    #[test]
    fn test_twenty_four_hour() {
        let parsed = parse_time_on(date(), "14:30", TZ).unwrap();
        assert_eq!((parsed.hour(), parsed.minute()), (14, 30));

        let no_leading_zero = parse_time_on(date(), "9:30", TZ).unwrap();
        assert_eq!((no_leading_zero.hour(), no_leading_zero.minute()), (9, 30));
    }

    #[test]
    fn test_bare_hour_meridiem() {
        let spaced = parse_time_on(date(), "9 AM", TZ).unwrap();
        assert_eq!((spaced.hour(), spaced.minute()), (9, 0));

        let tight = parse_time_on(date(), "9pm", TZ).unwrap();
        assert_eq!((tight.hour(), tight.minute()), (21, 0));
    }

    #[test]
    fn test_midnight() {
        let parsed = parse_time_on(date(), "00:00", TZ).unwrap();
        assert_eq!((parsed.hour(), parsed.minute()), (0, 0));
    }

    #[test]
    fn test_meridiem_beats_twenty_four_hour_for_twelve_hour_input() {
        // "12:30 AM" must resolve through the 12-hour rule (00:30), not be
        // rejected outright by the 24-hour rule seeing trailing characters.
        let parsed = parse_time_on(date(), "12:30 AM", TZ).unwrap();
        assert_eq!((parsed.hour(), parsed.minute()), (0, 30));
    }

    #[test]
    fn test_surrounding_whitespace_tolerated() {
        let parsed = parse_time_on(date(), "  8:00 PM ", TZ).unwrap();
        assert_eq!((parsed.hour(), parsed.minute()), (20, 0));
    }

    #[test]
    fn test_unparseable_returns_none() {
        assert!(parse_time_on(date(), "", TZ).is_none());
        assert!(parse_time_on(date(), "noonish", TZ).is_none());
        assert!(parse_time_on(date(), "25:00", TZ).is_none());
        assert!(parse_time_on(date(), "13:00 PM", TZ).is_none());
    }

    #[test]
    fn test_timezone_anchoring() {
        let parsed = parse_time_on(date(), "9:00 AM", TZ).unwrap();
        // 09:00 EST is 14:00 UTC.
        assert_eq!(parsed.with_timezone(&chrono::Utc).hour(), 14);
    }

    #[test]
    fn test_dst_gap_time_unparseable() {
        // 2026-03-08 02:30 does not exist in America/New_York.
        let gap_day = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();
        assert!(parse_time_on(gap_day, "02:30", TZ).is_none());
    }
}
