//! Duration display helpers.
//!
//! Two sources of truth meet on screen: the local stopwatch (a plain seconds
//! counter) and the record-keeping service, which reports completed totals as
//! variable-precision strings of the shape `[D.]HH:MM:SS[.fraction]`. Both
//! are rendered as zero-padded `hh:mm:ss`, with any day component folded
//! into the hour field.

use once_cell::sync::Lazy;
use regex::Regex;

const ZERO: &str = "00:00:00";

// A day prefix only counts when the digits are followed by a full HH:MM:SS
// clock; "123.456" has no day component.
static DAY_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)\.(\d{2}:\d{2}:\d{2})")
        .unwrap_or_else(|e| panic!("invalid day prefix regex: {e}"))
});

/// Format a stopwatch reading as `hh:mm:ss`.
///
/// Each field is zero-padded to two digits; the hour field widens naturally
/// past 99 hours instead of wrapping.
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Normalize a service-side duration string into `hh:mm:ss`.
///
/// An absent value renders as `"00:00:00"` (the session simply has no
/// duration yet). A leading `D.` day component is folded into the hour
/// field; a trailing `.fraction` is discarded, not rounded. Fields that
/// fail to parse default to 0, so malformed input degrades to zeros rather
/// than an error.
pub fn format_span(span: Option<&str>) -> String {
    let Some(raw) = span else {
        return ZERO.to_string();
    };

    let (days, time_part) = match DAY_PREFIX.captures(raw) {
        Some(caps) => {
            let day_digits = &caps[1];
            let days = day_digits.parse::<u64>().unwrap_or(0);
            // Everything after the first day separator, trailing fraction
            // still attached.
            (days, &raw[day_digits.len() + 1..])
        }
        None => (0, raw),
    };

    let clock = time_part.split('.').next().unwrap_or(time_part);

    let mut fields = clock.split(':').map(|field| field.parse::<u64>().unwrap_or(0));
    let hours = fields.next().unwrap_or(0);
    let minutes = fields.next().unwrap_or(0);
    let seconds = fields.next().unwrap_or(0);

    let total_hours = days * 24 + hours;
    format!("{total_hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_round_trips_to_its_fields() {
        for seconds in [0u64, 1, 59, 60, 61, 3599, 3600, 7754, 86399, 86400] {
            let formatted = format_elapsed(seconds);
            let fields: Vec<u64> = formatted
                .split(':')
                .map(|field| {
                    assert!(field.len() >= 2, "field `{field}` not zero-padded");
                    field.parse().unwrap()
                })
                .collect();
            assert_eq!(fields.len(), 3);
            assert_eq!(fields[0] * 3600 + fields[1] * 60 + fields[2], seconds);
        }
    }

    #[test]
    fn elapsed_widens_past_ninety_nine_hours() {
        assert_eq!(format_elapsed(100 * 3600), "100:00:00");
    }

    #[test]
    fn absent_span_is_zero() {
        assert_eq!(format_span(None), "00:00:00");
    }

    #[test]
    fn plain_span_passes_through() {
        assert_eq!(format_span(Some("02:05:09")), "02:05:09");
    }

    #[test]
    fn day_component_folds_into_hours() {
        assert_eq!(format_span(Some("1.02:05:09")), "26:05:09");
        assert_eq!(format_span(Some("5.23:59:59")), "143:59:59");
    }

    #[test]
    fn fractional_seconds_are_discarded_not_rounded() {
        assert_eq!(format_span(Some("02:05:09.500")), "02:05:09");
        assert_eq!(format_span(Some("02:05:09.9999999")), "02:05:09");
        assert_eq!(format_span(Some("1.02:05:09.1234567")), "26:05:09");
    }

    #[test]
    fn unparseable_fields_default_to_zero() {
        assert_eq!(format_span(Some("")), "00:00:00");
        assert_eq!(format_span(Some("garbage")), "00:00:00");
        assert_eq!(format_span(Some("xx:05:09")), "00:05:09");
        assert_eq!(format_span(Some("02:05")), "02:05:00");
    }

    #[test]
    fn digits_without_a_clock_are_not_a_day_prefix() {
        // No HH:MM:SS after the dot, so nothing qualifies as a day count.
        assert_eq!(format_span(Some("123.456")), "123:00:00");
    }
}
