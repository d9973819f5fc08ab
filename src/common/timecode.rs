use std::time::Duration;

/// Parse a non-negative time quantity.
///
/// Accepts plain seconds (`5`, `2.5`) or a clock value (`MM:SS`, `HH:MM:SS`,
/// each optionally with a fractional seconds part).
pub fn parse_time(value: &str) -> Option<Duration> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let parts: Vec<&str> = value.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    let (seconds_part, units) = parts.split_last()?;
    let seconds = parse_non_negative(seconds_part)?;

    let mut total = 0.0;
    for unit in units {
        if unit.is_empty() || !unit.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        total = total * 60.0 + unit.parse::<f64>().ok()?;
    }
    if !units.is_empty() && seconds >= 60.0 {
        return None;
    }

    Duration::try_from_secs_f64(total * 60.0 + seconds).ok()
}

fn parse_non_negative(s: &str) -> Option<f64> {
    // Rejects signs, exponents and inf/nan that f64::from_str would otherwise take.
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Render a duration the way ffmpeg expects for `-ss` / `-t`.
pub fn to_seconds_arg(d: Duration) -> String {
    format!("{:.3}", d.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_seconds() {
        assert_eq!(parse_time("5"), Some(Duration::from_secs(5)));
        assert_eq!(parse_time(" 2.5 "), Some(Duration::from_millis(2500)));
        assert_eq!(parse_time("0"), Some(Duration::ZERO));
    }

    #[test]
    fn parses_clock_values() {
        assert_eq!(parse_time("01:05"), Some(Duration::from_secs(65)));
        assert_eq!(parse_time("01:00:03.5"), Some(Duration::from_millis(3_603_500)));
        assert_eq!(parse_time("00:00:20.00"), Some(Duration::from_secs(20)));
    }

    #[test]
    fn rejects_malformed_values() {
        for bad in ["", "-1", "abc", "1e3", "inf", "NaN", "1:2:3:4", "1:75", ":5", "5s", "1..2"] {
            assert_eq!(parse_time(bad), None, "{bad:?} should be rejected");
        }
    }

    #[test]
    fn seconds_arg_has_millisecond_precision() {
        assert_eq!(to_seconds_arg(Duration::from_millis(5250)), "5.250");
    }
}
