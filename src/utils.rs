use once_cell::sync::Lazy;
use regex::Regex;

// Leading integer of a form field, e.g. "12", " 7abc", "+3"
static LEADING_INT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\+?(\d+)").unwrap());

/// Hours/minutes/seconds split of an elapsed-seconds value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayTime {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl DisplayTime {
    pub fn from_seconds(total: u32) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    /// The hours segment is hidden while it reads zero.
    pub fn show_hours(&self) -> bool {
        self.hours > 0
    }

    /// The minutes segment is hidden only when hours are hidden too.
    pub fn show_minutes(&self) -> bool {
        self.hours > 0 || self.minutes > 0
    }
}

/// Zero-pad a clock segment to two digits.
pub fn pad2(value: u32) -> String {
    format!("{:02}", value)
}

/// Format seconds as `HH:MM:SS`, always showing every segment.
pub fn format_hms(total: u32) -> String {
    let t = DisplayTime::from_seconds(total);
    format!("{}:{}:{}", pad2(t.hours), pad2(t.minutes), pad2(t.seconds))
}

/// Combine the three input fields into a number of seconds.
pub fn hms_to_seconds(hours: u32, minutes: u32, seconds: u32) -> u32 {
    hours
        .saturating_mul(3600)
        .saturating_add(minutes.saturating_mul(60))
        .saturating_add(seconds)
}

/// Read a numeric form field leniently.
///
/// Takes the leading run of digits; anything unparsable, empty or negative
/// reads as zero, so a half-typed field never blocks the user. Digits too
/// large for a `u32` saturate.
pub fn parse_field(input: &str) -> u32 {
    LEADING_INT_REGEX
        .captures(input)
        .map(|c| c[1].parse::<u32>().unwrap_or(u32::MAX))
        .unwrap_or(0)
}

/// Parse a field and clamp it to `max`.
pub fn parse_clamped_field(input: &str, max: u32) -> u32 {
    parse_field(input).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_seconds_into_segments() {
        let t = DisplayTime::from_seconds(3_725);
        assert_eq!((t.hours, t.minutes, t.seconds), (1, 2, 5));
        assert!(t.show_hours() && t.show_minutes());
    }

    #[test]
    fn hides_leading_zero_segments() {
        let t = DisplayTime::from_seconds(42);
        assert!(!t.show_hours());
        assert!(!t.show_minutes());

        let t = DisplayTime::from_seconds(60);
        assert!(!t.show_hours());
        assert!(t.show_minutes());

        // Whole hours keep the minutes segment visible.
        let t = DisplayTime::from_seconds(7_200);
        assert!(t.show_minutes());
    }

    #[test]
    fn formats_with_padding() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(3_661), "01:01:01");
        assert_eq!(format_hms(100 * 3600), "100:00:00");
    }

    #[test]
    fn combines_fields() {
        assert_eq!(hms_to_seconds(1, 30, 15), 5_415);
        assert_eq!(hms_to_seconds(0, 0, 0), 0);
        assert_eq!(hms_to_seconds(u32::MAX, 1, 1), u32::MAX);
    }

    #[test]
    fn parses_fields_like_a_browser_form() {
        assert_eq!(parse_field("12"), 12);
        assert_eq!(parse_field("  7"), 7);
        assert_eq!(parse_field("5min"), 5);
        assert_eq!(parse_field("+3"), 3);
        assert_eq!(parse_field(""), 0);
        assert_eq!(parse_field("abc"), 0);
        assert_eq!(parse_field("-5"), 0);
        assert_eq!(parse_field("99999999999999"), u32::MAX);
        assert_eq!(parse_clamped_field("75", 59), 59);
        assert_eq!(parse_clamped_field("99999999999999", 99), 99);
    }
}
