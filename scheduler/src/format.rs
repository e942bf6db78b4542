//! Human-readable remaining-time strings for countdown notifications.
//
//  Pure, driven entirely by FormatConfig bands.

use crate::config::FormatConfig;

/// Render a remaining-time value for a notification body.
///
/// Three bands, picked by the configured thresholds:
///   - at or above `long_threshold_secs`: whole minutes, nearest
///   - above `short_threshold_secs`: seconds rounded to the nearest five
///   - otherwise: exact seconds
pub fn format_remaining(secs: u64, fmt: &FormatConfig) -> String {
    if secs >= fmt.long_threshold_secs {
        let minutes = (secs + 30) / 60;
        if minutes == 1 {
            "1 minute".to_string()
        } else {
            format!("{minutes} minutes")
        }
    } else if secs > fmt.short_threshold_secs {
        let rounded = ((secs + 2) / 5) * 5;
        format!("{rounded} seconds")
    } else if secs == 1 {
        "1 second".to_string()
    } else {
        format!("{secs} seconds")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt() -> FormatConfig {
        FormatConfig {
            notification_duration_secs: 5,
            dynamic_countdown: true,
            long_threshold_secs: 120,
            short_threshold_secs: 15,
        }
    }

    #[test]
    fn long_band_renders_minutes() {
        assert_eq!(format_remaining(1_800, &fmt()), "30 minutes");
        assert_eq!(format_remaining(150, &fmt()), "3 minutes"); // nearest
        assert_eq!(format_remaining(120, &fmt()), "2 minutes");
    }

    #[test]
    fn mid_band_rounds_to_fives() {
        assert_eq!(format_remaining(119, &fmt()), "120 seconds");
        assert_eq!(format_remaining(43, &fmt()), "45 seconds");
        assert_eq!(format_remaining(42, &fmt()), "40 seconds");
        assert_eq!(format_remaining(16, &fmt()), "15 seconds");
    }

    #[test]
    fn short_band_is_exact() {
        assert_eq!(format_remaining(15, &fmt()), "15 seconds");
        assert_eq!(format_remaining(9, &fmt()), "9 seconds");
        assert_eq!(format_remaining(1, &fmt()), "1 second");
        assert_eq!(format_remaining(0, &fmt()), "0 seconds");
    }
}
