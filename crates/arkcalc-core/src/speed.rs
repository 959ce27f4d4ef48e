//! Attack cadence parsing

use regex::Regex;
use std::sync::LazyLock;

/// Cadence assumed when a label carries no readable value
pub const DEFAULT_CADENCE: f64 = 1.0;

static SPEED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)s").expect("valid regex"));

/// Extract seconds-per-hit from an attack speed label such as `1.25s(やや遅い)`
///
/// Falls back to [`DEFAULT_CADENCE`] when the label has no `<number>s` part
/// or the value is not a positive number of seconds.
pub fn parse_attack_speed(label: &str) -> f64 {
    SPEED_RE
        .captures(label)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .unwrap_or(DEFAULT_CADENCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attack_speed() {
        assert_eq!(parse_attack_speed("1.25s(やや遅い)"), 1.25);
        assert_eq!(parse_attack_speed("0.78s(とても速い)"), 0.78);
        assert_eq!(parse_attack_speed("2s"), 2.0);
    }

    #[test]
    fn test_parse_attack_speed_default() {
        assert_eq!(parse_attack_speed("普通"), DEFAULT_CADENCE);
        assert_eq!(parse_attack_speed(""), DEFAULT_CADENCE);
        assert_eq!(parse_attack_speed("0s(不明)"), DEFAULT_CADENCE);
        assert_eq!(parse_attack_speed("0.0s"), DEFAULT_CADENCE);
    }
}
