//! Humanized durations for confirmation prompts.

use std::time::Duration;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

fn unit(value: u64, singular: &str) -> String {
    if value == 1 {
        format!("1 {singular}")
    } else {
        format!("{value} {singular}s")
    }
}

/// Render a duration the way a prompt reads it: "1 minute 30 seconds".
///
/// Sub-second durations render as "0 seconds"; fractional seconds are
/// truncated.
pub fn humanize(duration: Duration) -> String {
    let mut seconds = duration.as_secs();
    let mut parts = Vec::new();

    for (per, name) in [(DAY, "day"), (HOUR, "hour"), (MINUTE, "minute")] {
        if seconds >= per {
            parts.push(unit(seconds / per, name));
            seconds %= per;
        }
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(unit(seconds, "second"));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_only() {
        assert_eq!(humanize(Duration::from_secs(10)), "10 seconds");
        assert_eq!(humanize(Duration::from_secs(1)), "1 second");
    }

    #[test]
    fn zero_renders_as_zero_seconds() {
        assert_eq!(humanize(Duration::ZERO), "0 seconds");
        assert_eq!(humanize(Duration::from_millis(900)), "0 seconds");
    }

    #[test]
    fn minutes_and_seconds_combine() {
        assert_eq!(humanize(Duration::from_secs(90)), "1 minute 30 seconds");
    }

    #[test]
    fn whole_units_drop_empty_tails() {
        assert_eq!(humanize(Duration::from_secs(120)), "2 minutes");
        assert_eq!(humanize(Duration::from_secs(3600)), "1 hour");
    }

    #[test]
    fn days_hours_minutes_seconds() {
        let duration = Duration::from_secs(DAY + 2 * HOUR + 3 * MINUTE + 4);
        assert_eq!(humanize(duration), "1 day 2 hours 3 minutes 4 seconds");
    }
}
