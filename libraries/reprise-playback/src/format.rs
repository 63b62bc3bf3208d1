//! Display formatting for positions, totals and timestamps

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Clock-style position: `m:ss`, or `h:mm:ss` from one hour up
///
/// Non-finite or negative input renders as `0:00`.
pub fn format_clock(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }

    let total = secs.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Listening total: `"{h}h {m}m"`, or `"{m}m"` under an hour
pub fn format_hours(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Age of a timestamp relative to `now_ms`
pub fn format_relative(then_ms: i64, now_ms: i64) -> String {
    let age = now_ms - then_ms;

    if age < MINUTE_MS {
        "just now".to_string()
    } else if age < HOUR_MS {
        format!("{} min ago", age / MINUTE_MS)
    } else if age < DAY_MS {
        format!("{} h ago", age / HOUR_MS)
    } else if age < 2 * DAY_MS {
        "1 day ago".to_string()
    } else {
        format!("{} days ago", age / DAY_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_formats() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(45.9), "0:45");
        assert_eq!(format_clock(200.0), "3:20");
        assert_eq!(format_clock(3_725.0), "1:02:05");
        assert_eq!(format_clock(f64::NAN), "0:00");
        assert_eq!(format_clock(-3.0), "0:00");
    }

    #[test]
    fn hours_formats() {
        assert_eq!(format_hours(0.0), "0m");
        assert_eq!(format_hours(59.0), "0m");
        assert_eq!(format_hours(45.0 * 60.0), "45m");
        assert_eq!(format_hours(2.0 * 3600.0 + 5.0 * 60.0), "2h 5m");
    }

    #[test]
    fn relative_formats() {
        let now = 10 * DAY_MS;
        assert_eq!(format_relative(now, now), "just now");
        assert_eq!(format_relative(now + 5_000, now), "just now");
        assert_eq!(format_relative(now - 5 * MINUTE_MS, now), "5 min ago");
        assert_eq!(format_relative(now - 3 * HOUR_MS, now), "3 h ago");
        assert_eq!(format_relative(now - DAY_MS - HOUR_MS, now), "1 day ago");
        assert_eq!(format_relative(now - 4 * DAY_MS, now), "4 days ago");
    }
}
