//! Damage multiplier extraction from skill effect text
//!
//! Effect descriptions are free text. Only three phrasings are understood;
//! anything else is left for the user to supply by hand.

use regex::Regex;
use std::sync::LazyLock;

/// "攻撃力が200%まで上昇" / "攻撃力が200%に上昇": attack becomes X%
static RISES_TO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"攻撃力が(\d+(?:\.\d+)?)%(?:まで|に)上昇").expect("valid regex")
});

/// "攻撃力+30%" or "攻撃力、防御力、最大HP+30%": attack increases by X%
static BONUS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"攻撃力[^+\n]*?\+(\d+(?:\.\d+)?)%").expect("valid regex"));

/// "攻撃力×3.3", full-width or ASCII `x`
static TIMES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"攻撃力[×✕xX](\d+(?:\.\d+)?)").expect("valid regex"));

/// Extract the attack multiplier from a rank's effect text
///
/// Returns the absolute ratio (1.0 = unchanged, 2.0 = 200%), or `None` when
/// the text is absent or matches no rule. Rules are tried in order and the
/// first match wins.
pub fn extract_multiplier(effect: Option<&str>) -> Option<f64> {
    let effect = effect?;
    if effect.is_empty() {
        return None;
    }

    if let Some(x) = capture_number(&RISES_TO_RE, effect) {
        return Some(x / 100.0);
    }

    if let Some(x) = capture_number(&BONUS_RE, effect) {
        return Some(1.0 + x / 100.0);
    }

    capture_number(&TIMES_RE, effect)
}

fn capture_number(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}
