//! Human-readable time formatting

use std::time::Duration;

/// Render remaining seconds as `MM : SS`. Minutes are not capped at 59.
pub fn format_display(remaining: u64) -> String {
    format!("{:02} : {:02}", remaining / 60, remaining % 60)
}

/// Render an uptime as e.g. `1h 2m 3s`, dropping leading zero units
pub fn format_uptime(duration: Duration) -> String {
    let hours = duration.as_secs() / 3600;
    let minutes = (duration.as_secs() % 3600) / 60;
    let seconds = duration.as_secs() % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
