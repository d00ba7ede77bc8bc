use chrono::{NaiveDateTime, Utc};

use crate::constants::TIME_POINT_SEC_FORMAT;

/// Parses a `time_point_sec` string (`YYYY-MM-DDTHH:MM:SS`, UTC) into seconds since the epoch.
///
/// Returns `None` for malformed input or times outside the `u32` range.
pub fn parse_time_point_sec(value: &str) -> Option<u32> {
    let time = NaiveDateTime::parse_from_str(value, TIME_POINT_SEC_FORMAT).ok()?;
    u32::try_from(time.and_utc().timestamp()).ok()
}

/// Calculates a future timestamp by adding delay seconds to the current time
///
/// # Arguments
/// * `delay_seconds` - Number of seconds to add to the current timestamp
///
/// # Returns
/// Seconds since the epoch, or `None` when the result does not fit a `time_point_sec`
pub fn calculate_scheduled_timestamp(delay_seconds: i64) -> Option<u32> {
    u32::try_from(Utc::now().timestamp().checked_add(delay_seconds)?).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_point_sec() {
        assert_eq!(parse_time_point_sec("1970-01-01T00:00:00"), Some(0));
        assert_eq!(
            parse_time_point_sec("2025-01-01T00:00:00"),
            Some(1_735_689_600)
        );
        assert_eq!(parse_time_point_sec("2025-01-01"), None);
        assert_eq!(parse_time_point_sec("2025-01-01T00:00:00Z"), None);
        assert_eq!(parse_time_point_sec("1969-12-31T23:59:59"), None);
        assert_eq!(parse_time_point_sec("2200-01-01T00:00:00"), None);
    }

    #[test]
    fn test_calculate_scheduled_timestamp() {
        let before = Utc::now().timestamp();
        let delay_seconds = 30;
        let scheduled = i64::from(calculate_scheduled_timestamp(delay_seconds).unwrap());
        let after = Utc::now().timestamp();

        assert!(scheduled >= before + delay_seconds);
        assert!(scheduled <= after + delay_seconds + 1);
        assert!(calculate_scheduled_timestamp(i64::MAX).is_none());
    }
}
