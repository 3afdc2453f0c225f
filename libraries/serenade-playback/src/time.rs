//! Position formatting for the transport display

/// Format seconds as `m:ss`
///
/// Missing, NaN, infinite or negative input renders `"0:00"`. Fractional
/// seconds are truncated.
pub fn format_time(seconds: Option<f64>) -> String {
    let seconds = match seconds {
        Some(s) if s.is_finite() && s > 0.0 => s.floor() as u64,
        _ => 0,
    };

    format!("{}:{:02}", seconds / 60, seconds % 60)
}
