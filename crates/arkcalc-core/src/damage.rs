//! Damage model for a single hit and for a timed skill
//!
//! Physical damage is reduced by defense but never below 5% of the raw hit.
//! Arts damage is reduced by resistance, capped at 95% mitigation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Share of raw damage that always gets through mitigation
pub const MIN_DAMAGE_RATIO: f64 = 0.05;

/// Highest fraction of arts damage resistance can remove
pub const MAX_RESISTANCE_RATIO: f64 = 0.95;

/// Operator class whose attacks deal arts damage
const ARTS_CLASS: &str = "術師";

/// Effect text marker for skills that switch to arts damage
const ARTS_EFFECT_MARKER: &str = "術ダメージ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageKind {
    Physical,
    /// Magical damage, mitigated by resistance
    Arts,
}

impl DamageKind {
    /// Guess the damage kind from the operator class and rank effect
    pub fn infer(class: &str, effect: Option<&str>) -> Self {
        if class == ARTS_CLASS || effect.is_some_and(|e| e.contains(ARTS_EFFECT_MARKER)) {
            DamageKind::Arts
        } else {
            DamageKind::Physical
        }
    }

    pub fn is_arts(self) -> bool {
        self == DamageKind::Arts
    }
}

impl fmt::Display for DamageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DamageKind::Physical => "物理ダメージ",
            DamageKind::Arts => "術ダメージ",
        })
    }
}

/// Damage of one hit before and after mitigation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitDamage {
    pub raw: f64,
    pub actual: f64,
}

/// Damage accumulated over a skill's duration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SustainedDamage {
    pub hits: u64,
    pub total: f64,
}

/// Compute one hit's damage
///
/// `enemy_def` applies to physical hits and `enemy_res` (percent) to arts hits.
pub fn hit_damage(
    attack: f64,
    multiplier: f64,
    enemy_def: f64,
    enemy_res: f64,
    kind: DamageKind,
) -> HitDamage {
    let raw = attack * multiplier;
    let actual = match kind {
        DamageKind::Physical => (raw - enemy_def).max(raw * MIN_DAMAGE_RATIO),
        DamageKind::Arts => {
            let reduction = (enemy_res / 100.0).min(MAX_RESISTANCE_RATIO);
            raw * (1.0 - reduction)
        }
    };
    HitDamage { raw, actual }
}

/// Total damage over `duration` seconds at `cadence` seconds per hit
///
/// Returns `None` for skills without a finite positive duration, and when
/// the cadence is not a finite positive number of seconds.
pub fn total_damage(
    actual_per_hit: f64,
    duration: Option<f64>,
    cadence: f64,
    targets: u32,
) -> Option<SustainedDamage> {
    let duration = duration.filter(|d| d.is_finite() && *d > 0.0)?;
    if !(cadence.is_finite() && cadence > 0.0) {
        return None;
    }
    let hits = (duration / cadence).floor() as u64;
    Some(SustainedDamage {
        hits,
        total: actual_per_hit * hits as f64 * f64::from(targets),
    })
}

/// Damage per second while the skill is active
pub fn skill_dps(actual_per_hit: f64, cadence: f64, targets: u32) -> f64 {
    actual_per_hit / cadence * f64::from(targets)
}

/// Damage per second of plain attacks, before mitigation
pub fn normal_attack_dps(attack: f64, cadence: f64) -> f64 {
    attack / cadence
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_damage() {
        let hit = hit_damage(1000.0, 1.0, 300.0, 0.0, DamageKind::Physical);
        assert_eq!(hit, HitDamage { raw: 1000.0, actual: 700.0 });
    }

    #[test]
    fn test_physical_damage_floor() {
        let hit = hit_damage(100.0, 1.0, 99.0, 0.0, DamageKind::Physical);
        assert_eq!(hit.raw, 100.0);
        assert!((hit.actual - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_arts_damage() {
        let hit = hit_damage(1000.0, 1.0, 0.0, 50.0, DamageKind::Arts);
        assert_eq!(hit, HitDamage { raw: 1000.0, actual: 500.0 });
    }

    #[test]
    fn test_arts_resistance_cap() {
        let hit = hit_damage(1000.0, 1.0, 0.0, 200.0, DamageKind::Arts);
        assert_eq!(hit.raw, 1000.0);
        assert!((hit.actual - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_arts_ignores_defense() {
        let hit = hit_damage(500.0, 2.0, 9999.0, 0.0, DamageKind::Arts);
        assert_eq!(hit.actual, 1000.0);
    }

    #[test]
    fn test_total_damage() {
        let total = total_damage(500.0, Some(10.0), 1.25, 2).unwrap();
        assert_eq!(total.hits, 8);
        assert_eq!(total.total, 8000.0);
    }

    #[test]
    fn test_total_damage_not_applicable() {
        assert_eq!(total_damage(500.0, None, 1.25, 1), None);
        assert_eq!(total_damage(500.0, Some(0.0), 1.25, 1), None);
        assert_eq!(total_damage(500.0, Some(-3.0), 1.25, 1), None);
    }

    #[test]
    fn test_total_damage_rejects_degenerate_inputs() {
        assert_eq!(total_damage(500.0, Some(10.0), 0.0, 1), None);
        assert_eq!(total_damage(500.0, Some(10.0), f64::NAN, 1), None);
        assert_eq!(total_damage(500.0, Some(f64::INFINITY), 1.25, 1), None);
        assert_eq!(total_damage(500.0, Some(f64::NAN), 1.25, 1), None);
    }

    #[test]
    fn test_dps() {
        assert_eq!(skill_dps(500.0, 1.25, 2), 800.0);
        assert_eq!(normal_attack_dps(1000.0, 0.5), 2000.0);
    }

    #[test]
    fn test_infer_kind() {
        assert_eq!(DamageKind::infer("術師", None), DamageKind::Arts);
        assert_eq!(
            DamageKind::infer("前衛", Some("攻撃が術ダメージになる")),
            DamageKind::Arts
        );
        assert_eq!(DamageKind::infer("前衛", Some("攻撃力+30%")), DamageKind::Physical);
    }
}
