//! Rank-by-rank reconstruction of skill parameters from a skill sheet
//!
//! Each sheet row holds a rank label followed by up to four cells: the SP and
//! duration values that changed at this rank (unlabeled, left-packed) and the
//! rank's effect text. [`resolve_sheet`] threads the running values across
//! rows and stamps a full [`RankRecord`] for every rank.

use crate::classifier::{classify_row, Field, Priors};
use crate::multiplier::extract_multiplier;
use crate::rank::Rank;
use crate::table::{CellValue, Row, Table};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of cells after the rank label that belong to a rank
pub const RANK_CELLS: usize = 4;

/// Skill duration as known at some rank
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum SkillDuration {
    /// Not reported so far
    #[default]
    Unknown,
    /// Explicitly marked as not applicable (instant or passive skill)
    Instant,
    /// Lasts this many seconds
    Seconds(f64),
}

impl SkillDuration {
    /// Seconds, if this is a positive timed duration
    pub fn seconds(self) -> Option<f64> {
        match self {
            SkillDuration::Seconds(s) if s > 0.0 => Some(s),
            _ => None,
        }
    }

    fn as_prior(self) -> Option<f64> {
        match self {
            SkillDuration::Seconds(s) => Some(s),
            _ => None,
        }
    }
}

/// One observation cell of a rank row
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observation {
    Number(f64),
    /// The `-` marker
    NoValue,
}

/// A rank row split into its observations and effect text
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowCells {
    pub observations: Vec<Observation>,
    pub effect: Option<String>,
}

impl RowCells {
    /// Split the cells following a rank label
    ///
    /// Only the first [`RANK_CELLS`] cells are considered and empty ones are
    /// skipped. Numbers and markers become observations; the last text cell
    /// is the effect.
    pub fn from_cells<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let mut split = RowCells::default();
        for cell in cells.into_iter().take(RANK_CELLS).filter(|c| !c.is_empty()) {
            match cell {
                CellValue::NoValue => split.observations.push(Observation::NoValue),
                CellValue::String(s) => split.effect = Some(s.clone()),
                other => {
                    if let Some(n) = other.as_number() {
                        split.observations.push(Observation::Number(n));
                    }
                }
            }
        }
        split
    }
}

/// Running values threaded across the rows of one sheet
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolverState {
    pub init_sp: Option<f64>,
    pub cost_sp: Option<f64>,
    pub duration: SkillDuration,
}

impl ResolverState {
    pub fn new() -> Self {
        Self::default()
    }

    fn priors(&self) -> Priors {
        Priors::new(self.init_sp, self.cost_sp, self.duration.as_prior())
    }

    fn set(&mut self, field: Field, value: f64) {
        match field {
            Field::Init => self.init_sp = Some(value),
            Field::Cost => self.cost_sp = Some(value),
            Field::Duration => self.duration = SkillDuration::Seconds(value),
        }
    }

    fn set_positional(&mut self, values: &[f64]) {
        for (field, &value) in Field::ALL.iter().zip(values) {
            self.set(*field, value);
        }
    }

    /// Assign numbers to fields by classification
    ///
    /// Returns the fields that were set and whether any number needed the
    /// fallback field.
    fn set_classified(&mut self, values: &[f64]) -> (Vec<Field>, bool) {
        let mut fields = Vec::with_capacity(values.len());
        let mut fallback = false;
        for (value, classification) in classify_row(values, &self.priors()) {
            if classification.fallback {
                tracing::warn!(
                    value,
                    field = %classification.field,
                    "no field accepts value; assigned by fallback"
                );
                fallback = true;
            }
            fields.push(classification.field);
            self.set(classification.field, value);
        }
        (fields, fallback)
    }

    /// Fold one rank row into the state
    ///
    /// Returns `true` when a number was assigned by the classifier fallback
    /// and the rank should be reviewed by hand.
    pub fn apply(&mut self, observations: &[Observation]) -> bool {
        let numbers = numbers_of(observations);
        let has_marker = numbers.len() < observations.len();

        if !has_marker {
            return match numbers.len() {
                0 => false,
                1 | 2 => self.set_classified(&numbers).1,
                _ => {
                    if numbers.len() > 3 {
                        tracing::debug!(extra = numbers.len() - 3, "ignoring surplus numbers");
                    }
                    self.set_positional(&numbers[..3]);
                    false
                }
            };
        }

        // Init, cost, then a marker in the duration slot
        if observations.len() == 3 && observations[2] == Observation::NoValue {
            for (field, observation) in Field::ALL.iter().zip(&observations[..2]) {
                if let Observation::Number(n) = observation {
                    self.set(*field, *n);
                }
            }
            self.duration = SkillDuration::Instant;
            return false;
        }

        let (assigned, fallback) = match numbers.len() {
            0 => (Vec::new(), false),
            1 | 2 => self.set_classified(&numbers),
            _ => {
                self.set_positional(&numbers[..3]);
                (Field::ALL.to_vec(), false)
            }
        };
        if !assigned.contains(&Field::Duration) {
            self.duration = SkillDuration::Instant;
        }
        fallback
    }
}

fn numbers_of(observations: &[Observation]) -> Vec<f64> {
    observations
        .iter()
        .filter_map(|o| match o {
            Observation::Number(n) => Some(*n),
            Observation::NoValue => None,
        })
        .collect()
}

/// Resolved parameters of one skill rank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankRecord {
    pub init_sp: Option<f64>,
    pub cost_sp: Option<f64>,
    pub duration: SkillDuration,
    pub effect: Option<String>,
    /// Attack multiplier read from the effect; `None` must be supplied by hand
    pub multiplier: Option<f64>,
    /// A number in this row was placed by the classifier fallback
    pub needs_review: bool,
}

/// All resolved ranks of one skill sheet, in canonical rank order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillSheet {
    pub ranks: BTreeMap<Rank, RankRecord>,
}

impl SkillSheet {
    pub fn get(&self, rank: Rank) -> Option<&RankRecord> {
        self.ranks.get(&rank)
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Ranks present in the sheet, in canonical order
    pub fn available(&self) -> Vec<Rank> {
        self.ranks.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Rank, &RankRecord)> {
        self.ranks.iter().map(|(rank, record)| (*rank, record))
    }
}

/// Resolve a parsed sheet table into per-rank records
pub fn resolve_sheet(table: &Table) -> SkillSheet {
    resolve_rows(&table.rows)
}

/// Resolve rows in source order, header already removed
pub fn resolve_rows(rows: &[Row]) -> SkillSheet {
    let mut state = ResolverState::new();
    let mut sheet = SkillSheet::default();

    for row in rows {
        let Some(rank) = row.label().as_deref().and_then(Rank::from_label) else {
            tracing::debug!(label = ?row.label(), "skipping row without a rank label");
            continue;
        };

        let split = RowCells::from_cells(row.cells.iter().skip(1));
        let needs_review = state.apply(&split.observations);
        if needs_review {
            tracing::warn!(rank = rank.label(), "rank resolved by fallback; review by hand");
        }

        let multiplier = extract_multiplier(split.effect.as_deref());
        sheet.ranks.insert(
            rank,
            RankRecord {
                init_sp: state.init_sp,
                cost_sp: state.cost_sp,
                duration: state.duration,
                effect: split.effect,
                multiplier,
                needs_review,
            },
        );
    }

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_csv_str;
    use Observation::{NoValue, Number};

    fn state(init: f64, cost: f64, duration: f64) -> ResolverState {
        ResolverState {
            init_sp: Some(init),
            cost_sp: Some(cost),
            duration: SkillDuration::Seconds(duration),
        }
    }

    #[test]
    fn test_row_cells_split() {
        let cells = [
            CellValue::Integer(10),
            CellValue::Empty,
            CellValue::NoValue,
            CellValue::String("攻撃力+30%".to_string()),
        ];
        let split = RowCells::from_cells(&cells);
        assert_eq!(split.observations, vec![Number(10.0), NoValue]);
        assert_eq!(split.effect.as_deref(), Some("攻撃力+30%"));
        assert_eq!(numbers_of(&split.observations), vec![10.0]);
    }

    #[test]
    fn test_row_cells_limit() {
        let cells: Vec<CellValue> = (1..=6).map(CellValue::Integer).collect();
        let split = RowCells::from_cells(&cells);
        assert_eq!(split.observations.len(), RANK_CELLS);
    }

    #[test]
    fn test_three_numbers_positional_override() {
        let mut s = state(10.0, 40.0, 20.0);
        s.apply(&[Number(1.0), Number(99.0), Number(5.0)]);
        assert_eq!(s, state(1.0, 99.0, 5.0));
    }

    #[test]
    fn test_zero_numbers_carry_forward() {
        let mut s = state(10.0, 40.0, 20.0);
        assert!(!s.apply(&[]));
        assert_eq!(s, state(10.0, 40.0, 20.0));
    }

    #[test]
    fn test_single_number_classified() {
        let mut s = state(10.0, 40.0, 20.0);
        s.apply(&[Number(38.0)]);
        assert_eq!(s, state(10.0, 38.0, 20.0));
    }

    #[test]
    fn test_two_numbers_distinct_fields() {
        let mut s = state(10.0, 40.0, 20.0);
        s.apply(&[Number(15.0), Number(35.0)]);
        assert_eq!(s, state(15.0, 35.0, 20.0));
    }

    #[test]
    fn test_marker_in_duration_slot() {
        let mut s = state(10.0, 40.0, 20.0);
        s.apply(&[Number(15.0), Number(35.0), NoValue]);
        assert_eq!(s.init_sp, Some(15.0));
        assert_eq!(s.cost_sp, Some(35.0));
        assert_eq!(s.duration, SkillDuration::Instant);
    }

    #[test]
    fn test_marker_keeps_positional_value() {
        let mut s = state(10.0, 40.0, 20.0);
        s.apply(&[NoValue, Number(35.0), NoValue]);
        assert_eq!(s.init_sp, Some(10.0));
        assert_eq!(s.cost_sp, Some(35.0));
        assert_eq!(s.duration, SkillDuration::Instant);
    }

    #[test]
    fn test_marker_with_classified_number_clears_duration() {
        let mut s = state(10.0, 40.0, 20.0);
        s.apply(&[Number(35.0), NoValue]);
        assert_eq!(s.cost_sp, Some(35.0));
        assert_eq!(s.duration, SkillDuration::Instant);
    }

    #[test]
    fn test_marker_keeps_duration_assigned_this_row() {
        let mut s = state(10.0, 40.0, 20.0);
        s.apply(&[NoValue, Number(25.0)]);
        assert_eq!(s.duration, SkillDuration::Seconds(25.0));
    }

    #[test]
    fn test_lone_marker_clears_duration() {
        let mut s = state(10.0, 40.0, 20.0);
        s.apply(&[NoValue]);
        assert_eq!(s.init_sp, Some(10.0));
        assert_eq!(s.cost_sp, Some(40.0));
        assert_eq!(s.duration, SkillDuration::Instant);
    }

    #[test]
    fn test_instant_duration_is_not_a_prior() {
        let mut s = ResolverState {
            init_sp: Some(10.0),
            cost_sp: Some(40.0),
            duration: SkillDuration::Instant,
        };
        s.apply(&[Number(25.0)]);
        // 25 can only move init upward; duration has no numeric prior
        assert_eq!(s.init_sp, Some(25.0));
        assert_eq!(s.duration, SkillDuration::Instant);
    }

    #[test]
    fn test_fallback_flags_review() {
        let mut s = ResolverState::new();
        assert!(s.apply(&[Number(12.0)]));
        assert_eq!(s.cost_sp, Some(12.0));
    }

    #[test]
    fn test_resolve_sheet() {
        let csv = "\
ランク,B,C,D,E
1,0,45,20,攻撃力+30%
2,,,,攻撃力+35%
3,44,,,攻撃力+40%
4,5,,,攻撃力+45%
5,,,,攻撃力+50%
6,10,40,,攻撃力+55%
7,,,25,攻撃力+60%
特化I,15,,,攻撃力+70%
特化II,16,,,攻撃力+80%
特化III,20,38,,攻撃力+100%
";
        let table = parse_csv_str(csv, "スキル1 テスト1.csv").unwrap();
        let sheet = resolve_sheet(&table);

        assert_eq!(sheet.ranks.len(), 10);

        let r1 = sheet.get(Rank::Level1).unwrap();
        assert_eq!(r1.init_sp, Some(0.0));
        assert_eq!(r1.cost_sp, Some(45.0));
        assert_eq!(r1.duration, SkillDuration::Seconds(20.0));
        assert!((r1.multiplier.unwrap() - 1.3).abs() < 1e-9);

        // Rank 2 reports nothing and inherits everything
        let r2 = sheet.get(Rank::Level2).unwrap();
        assert_eq!(r2.init_sp, Some(0.0));
        assert_eq!(r2.cost_sp, Some(45.0));
        assert_eq!(r2.duration, SkillDuration::Seconds(20.0));

        // 44 is just below the cost of 45
        assert_eq!(sheet.get(Rank::Level3).unwrap().cost_sp, Some(44.0));

        // 5 only fits init (0 -> 5)
        assert_eq!(sheet.get(Rank::Level4).unwrap().init_sp, Some(5.0));

        let r6 = sheet.get(Rank::Level6).unwrap();
        assert_eq!(r6.init_sp, Some(10.0));
        assert_eq!(r6.cost_sp, Some(40.0));

        assert_eq!(
            sheet.get(Rank::Level7).unwrap().duration,
            SkillDuration::Seconds(25.0)
        );

        let m3 = sheet.get(Rank::Mastery3).unwrap();
        assert_eq!(m3.init_sp, Some(20.0));
        assert_eq!(m3.cost_sp, Some(38.0));
        assert_eq!(m3.duration, SkillDuration::Seconds(25.0));
        assert!((m3.multiplier.unwrap() - 2.0).abs() < 1e-9);
        assert!(sheet.iter().all(|(_, r)| !r.needs_review));
    }

    #[test]
    fn test_resolve_sheet_skips_noise_rows() {
        let csv = "ランク,B,C,D\n備考,1,2,3\n1,10,40,-\n特化IV,1,1,1\n";
        let table = parse_csv_str(csv, "sheet.csv").unwrap();
        let sheet = resolve_sheet(&table);

        assert_eq!(sheet.available(), vec![Rank::Level1]);
        let r1 = sheet.get(Rank::Level1).unwrap();
        assert_eq!(r1.duration, SkillDuration::Instant);
        assert_eq!(r1.effect, None);
        assert_eq!(r1.multiplier, None);
    }

    #[test]
    fn test_resolve_empty_sheet() {
        let table = parse_csv_str("ランク,B\n", "sheet.csv").unwrap();
        assert!(resolve_sheet(&table).is_empty());
    }
}
