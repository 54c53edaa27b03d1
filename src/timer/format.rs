//! Countdown display formatting

/// Render a number of seconds as zero-padded `HH:MM:SS`.
///
/// The hour field is padded to two digits but never truncated, so
/// 100 hours renders as `100:00:00`.
pub fn format_hms(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_zero() {
        assert_eq!(format_hms(0), "00:00:00");
    }

    #[test]
    fn test_format_seconds_only() {
        assert_eq!(format_hms(59), "00:00:59");
    }

    #[test]
    fn test_format_mixed_fields() {
        assert_eq!(format_hms(3661), "01:01:01");
        assert_eq!(format_hms(10_800), "03:00:00");
        assert_eq!(format_hms(3599), "00:59:59");
    }

    #[test]
    fn test_format_hour_field_grows() {
        assert_eq!(format_hms(360_000), "100:00:00");
        assert_eq!(format_hms(360_000 + 3599), "100:59:59");
    }
}
