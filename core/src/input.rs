use crate::model::work_entry::TimeOfDay;

const MAX_TIME_DIGITS: usize = 4;
const MAX_HOUR: u32 = 23;
const MAX_MINUTE: u32 = 59;

/// Formats free-form keyboard input into a (possibly partial) `HH:MM` value.
///
/// Non-digits are dropped and at most four digits are kept. A colon goes after
/// the second digit once a third one is typed. Two hour digits above 23 become
/// "23"; four digits with minutes above 59 get "59". Never fails: the result is
/// one of "", "1", "12", "12:3" or "12:34".
pub fn format_time_input(raw: &str) -> String {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(MAX_TIME_DIGITS)
        .collect();

    if digits.len() < 2 {
        return digits;
    }

    let (hours, minutes) = digits.split_at(2);
    let hours = clamp_field(hours, MAX_HOUR);

    match minutes.len() {
        0 => hours,
        1 => format!("{}:{}", hours, minutes),
        _ => format!("{}:{}", hours, clamp_field(minutes, MAX_MINUTE)),
    }
}

/// Formats the input and keeps it only if it is a complete `HH:MM` value.
pub fn sanitize_time(raw: &str) -> Option<TimeOfDay> {
    TimeOfDay::parse(&format_time_input(raw))
}

pub fn is_complete_time(formatted: &str) -> bool {
    TimeOfDay::parse(formatted).is_some()
}

fn clamp_field(field: &str, max: u32) -> String {
    match field.parse::<u32>() {
        Ok(value) if value > max => max.to_string(),
        _ => field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_partial_inputs() {
        assert_eq!(format_time_input(""), "");
        assert_eq!(format_time_input("1"), "1");
        assert_eq!(format_time_input("12"), "12");
        assert_eq!(format_time_input("123"), "12:3");
        assert_eq!(format_time_input("1234"), "12:34");
    }

    #[test]
    fn test_format_clamps_hour_then_minute() {
        assert_eq!(format_time_input("0965"), "09:59");
        assert_eq!(format_time_input("2565"), "23:59");
        assert_eq!(format_time_input("25"), "23");
        assert_eq!(format_time_input("257"), "23:7");
        assert_eq!(format_time_input("2359"), "23:59");
        assert_eq!(format_time_input("0000"), "00:00");
    }

    #[test]
    fn test_format_discards_noise() {
        assert_eq!(format_time_input("09:30"), "09:30");
        assert_eq!(format_time_input("a1b2c3d4e5"), "12:34");
        assert_eq!(format_time_input("123456"), "12:34");
        assert_eq!(format_time_input("--:--"), "");
    }

    #[test]
    fn test_format_is_stable_on_its_own_output() {
        for raw in ["7", "09", "093", "0930", "9999", "x1y"] {
            let once = format_time_input(raw);
            assert_eq!(format_time_input(&once), once);
        }
    }

    #[test]
    fn test_sanitize_time_requires_complete_value() {
        assert_eq!(sanitize_time("0930").map(|t| t.minutes_since_midnight()), Some(570));
        assert_eq!(sanitize_time("2565").map(|t| t.to_string()), Some("23:59".to_string()));
        assert!(sanitize_time("093").is_none());
        assert!(sanitize_time("").is_none());
        assert!(is_complete_time("17:30"));
        assert!(!is_complete_time("17:3"));
    }
}
