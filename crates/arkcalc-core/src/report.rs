//! Calculation report and its text rendering

use crate::character::CharacterStats;
use crate::damage::{
    hit_damage, normal_attack_dps, skill_dps, total_damage, DamageKind, HitDamage,
    SustainedDamage,
};
use crate::rank::Rank;
use crate::resolver::RankRecord;
use serde::{Deserialize, Serialize};

const RULE_WIDTH: usize = 60;

/// Resistance shown in reports is capped like the damage model caps it
const MAX_RESISTANCE_PERCENT: i64 = 95;

/// Enemy and targeting inputs for one calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub kind: DamageKind,
    pub enemy_def: i64,
    pub enemy_res: i64,
    pub targets: u32,
}

/// Everything shown for one calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalcReport {
    pub character: String,
    pub attack: i64,
    pub attack_speed: f64,
    pub skill_number: u32,
    pub skill_name: String,
    pub rank: Rank,
    pub scenario: Scenario,
    pub multiplier: f64,
    /// Duration used for the sustained total, after any manual override
    pub duration: Option<f64>,
    pub init_sp: Option<f64>,
    pub cost_sp: Option<f64>,
    pub hit: HitDamage,
    pub sustained: Option<SustainedDamage>,
}

impl CalcReport {
    /// Run the damage model for a resolved rank
    ///
    /// `multiplier` and `duration` are the values to use after any manual
    /// override of what the sheet provided.
    #[allow(clippy::too_many_arguments)]
    pub fn calculate(
        character: &CharacterStats,
        skill_number: u32,
        skill_name: &str,
        rank: Rank,
        record: &RankRecord,
        scenario: Scenario,
        multiplier: f64,
        duration: Option<f64>,
    ) -> Self {
        let hit = hit_damage(
            character.attack as f64,
            multiplier,
            scenario.enemy_def as f64,
            scenario.enemy_res as f64,
            scenario.kind,
        );
        let sustained = total_damage(hit.actual, duration, character.attack_speed, scenario.targets);

        Self {
            character: character.name.clone(),
            attack: character.attack,
            attack_speed: character.attack_speed,
            skill_number,
            skill_name: skill_name.to_string(),
            rank,
            scenario,
            multiplier,
            duration,
            init_sp: record.init_sp,
            cost_sp: record.cost_sp,
            hit,
            sustained,
        }
    }

    /// Transcript lines, as printed and logged
    pub fn lines(&self) -> Vec<String> {
        let s = &self.scenario;
        let targets = s.targets;
        let mut lines = vec![
            String::new(),
            "=".repeat(RULE_WIDTH),
            "  ===  火力計算結果  ===".to_string(),
            "=".repeat(RULE_WIDTH),
            format!("  キャラクター : {}", self.character),
            format!(
                "  スキル       : スキル{} {} [{}]",
                self.skill_number,
                self.skill_name,
                self.rank.display_name()
            ),
            format!("  攻撃力       : {}", self.attack),
            format!("  攻撃速度     : {}s / hit", self.attack_speed),
            format!("  ダメージ種別 : {}", s.kind),
        ];
        if s.kind.is_arts() {
            lines.push(format!("  敵の術耐性   : {}%", s.enemy_res));
        } else {
            lines.push(format!("  敵の防御力   : {}", s.enemy_def));
        }
        lines.push(format!(
            "  攻撃倍率     : {:.0}%  ({:.2}x)",
            self.multiplier * 100.0,
            self.multiplier
        ));
        lines.push("-".repeat(RULE_WIDTH));

        lines.push(String::new());
        lines.push("  【スキル発動時のダメージ (軽減前)】".to_string());
        lines.push(format!("    1発あたり : {}", group_thousands(self.hit.raw)));
        if targets > 1 {
            lines.push(format!(
                "    {}体同時   : {}",
                targets,
                group_thousands(self.hit.raw * f64::from(targets))
            ));
        }

        lines.push(String::new());
        lines.push("  【実ダメージ (軽減後)】".to_string());
        if s.kind.is_arts() {
            let capped = s.enemy_res.min(MAX_RESISTANCE_PERCENT);
            lines.push(format!(
                "    術耐性軽減後 ({}%軽減): {}",
                capped,
                group_thousands(self.hit.actual)
            ));
        } else {
            lines.push(format!(
                "    防御力軽減後 ({}防御): {}",
                s.enemy_def,
                group_thousands(self.hit.actual)
            ));
        }
        if targets > 1 {
            lines.push(format!(
                "    {}体合計        : {}",
                targets,
                group_thousands(self.hit.actual * f64::from(targets))
            ));
        }

        lines.push(String::new());
        lines.push("  【スキル継続中の総ダメージ】".to_string());
        match (self.sustained, self.duration) {
            (Some(sustained), Some(duration)) => {
                lines.push(format!("    持続時間   : {}s", duration));
                lines.push(format!("    ヒット数   : {} 回 × {} 体", sustained.hits, targets));
                lines.push(format!("    総ダメージ : {}", group_thousands(sustained.total)));
                let dps = skill_dps(self.hit.actual, self.attack_speed, targets);
                lines.push(format!("    スキル中DPS: {} / s", group_thousands_1(dps)));
            }
            _ => {
                lines.push("    持続時間なし（瞬時発動・パッシブ型）".to_string());
                let dps = normal_attack_dps(self.attack as f64, self.attack_speed);
                lines.push(format!("    ※ 通常攻撃DPS = {} / s", group_thousands_1(dps)));
            }
        }

        lines.push(String::new());
        lines.push("  【SP情報 (参考)】".to_string());
        lines.push(format!(
            "    初期SP: {}  /  必要SP: {}",
            fmt_sp(self.init_sp),
            fmt_sp(self.cost_sp)
        ));

        lines.push(String::new());
        lines.push("=".repeat(RULE_WIDTH));
        lines
    }
}

/// SP or duration value for display; `-` when unknown
pub fn fmt_sp(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

/// One line of a skill's rank table
pub fn rank_line(rank: Rank, record: &RankRecord) -> String {
    let duration = match record.duration.seconds() {
        Some(s) => format!("  持続:{}s", s),
        None => "  持続:なし".to_string(),
    };
    let multiplier = record
        .multiplier
        .map(|m| format!("  倍率:{:.0}%", m * 100.0))
        .unwrap_or_default();
    let review = if record.needs_review { "  (要確認)" } else { "" };

    format!(
        "  {:6}  SP初期:{:>4}  SP必要:{:>4}{}{}{}",
        rank.display_name(),
        fmt_sp(record.init_sp),
        fmt_sp(record.cost_sp),
        duration,
        multiplier,
        review
    )
}

/// Round to an integer and group thousands with commas
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}{}", sign, group_digits(&format!("{:.0}", rounded.abs())))
}

/// Like [`group_thousands`] but keeps one decimal place
pub fn group_thousands_1(value: f64) -> String {
    let formatted = format!("{:.1}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "0"));
    let sign = if value < 0.0 && formatted != "0.0" { "-" } else { "" };
    format!("{}{}.{}", sign, group_digits(int_part), frac_part)
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
