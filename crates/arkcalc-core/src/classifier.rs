//! Field classification for unlabeled skill sheet numbers
//!
//! A rank row lists only the values that changed since the previous rank, and
//! the cells carry no labels. Which field a number belongs to is inferred from
//! how each field moves across ranks: initial SP and duration only grow, SP
//! cost only shrinks. Among the fields a number could legally update, the one
//! whose previous value is nearest wins.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three values tracked across a skill's ranks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    /// Initial SP
    Init,
    /// SP cost
    Cost,
    /// Skill duration in seconds
    Duration,
}

/// Direction a field moves in as rank increases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Increasing,
    Decreasing,
}

impl Direction {
    /// Whether moving from `prior` to `value` follows this direction
    pub fn permits(self, prior: f64, value: f64) -> bool {
        match self {
            Direction::Increasing => value > prior,
            Direction::Decreasing => value < prior,
        }
    }
}

impl Field {
    /// Fields in tie-break order
    pub const ALL: [Field; 3] = [Field::Init, Field::Cost, Field::Duration];

    /// Field used when no field accepts a value
    pub const FALLBACK: Field = Field::Cost;

    /// Fallback preference once earlier numbers of a row took some fields
    pub const FALLBACK_ORDER: [Field; 3] = [Field::Cost, Field::Init, Field::Duration];

    pub fn direction(self) -> Direction {
        match self {
            Field::Init | Field::Duration => Direction::Increasing,
            Field::Cost => Direction::Decreasing,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Init => "init_sp",
            Field::Cost => "cost_sp",
            Field::Duration => "duration",
        })
    }
}

/// Previous values of the three fields; `None` means unknown
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Priors {
    pub init: Option<f64>,
    pub cost: Option<f64>,
    pub duration: Option<f64>,
}

impl Priors {
    pub fn new(init: Option<f64>, cost: Option<f64>, duration: Option<f64>) -> Self {
        Self {
            init,
            cost,
            duration,
        }
    }

    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::Init => self.init,
            Field::Cost => self.cost,
            Field::Duration => self.duration,
        }
    }

    /// Same priors with `field` treated as unknown
    ///
    /// Used for the second number of a row so it cannot land on the field the
    /// first number already took.
    pub fn without(mut self, field: Field) -> Self {
        match field {
            Field::Init => self.init = None,
            Field::Cost => self.cost = None,
            Field::Duration => self.duration = None,
        }
        self
    }

    /// Distance from `value` to `field`'s prior, if `field` may take `value`
    pub fn candidate_distance(&self, field: Field, value: f64) -> Option<f64> {
        let prior = self.get(field)?;
        field
            .direction()
            .permits(prior, value)
            .then(|| (value - prior).abs())
    }
}

/// Outcome of classifying one number
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub field: Field,
    /// No field accepted the value and [`Field::FALLBACK`] was used
    pub fallback: bool,
}

/// Decide which field `value` updates
///
/// A field is a candidate only when its prior is known and `value` moves in
/// the field's direction. The nearest candidate wins, ties resolved in
/// [`Field::ALL`] order. With no candidate the result is [`Field::FALLBACK`].
pub fn classify(value: f64, priors: &Priors) -> Classification {
    classify_excluding(value, priors, &[])
}

/// Like [`classify`], but fields in `taken` are never chosen, not even as
/// the fallback
pub fn classify_excluding(value: f64, priors: &Priors, taken: &[Field]) -> Classification {
    let masked = taken.iter().fold(*priors, |p, &field| p.without(field));
    let mut best: Option<(Field, f64)> = None;

    for field in Field::ALL {
        if let Some(distance) = masked.candidate_distance(field, value) {
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((field, distance));
            }
        }
    }

    match best {
        Some((field, _)) => Classification {
            field,
            fallback: false,
        },
        None => Classification {
            field: Field::FALLBACK_ORDER
                .into_iter()
                .find(|f| !taken.contains(f))
                .unwrap_or(Field::FALLBACK),
            fallback: true,
        },
    }
}

/// Classify the numbers of one row in order, each excluding the fields taken
/// by the numbers before it
pub fn classify_row(values: &[f64], priors: &Priors) -> Vec<(f64, Classification)> {
    let mut taken = Vec::with_capacity(values.len());
    values
        .iter()
        .map(|&value| {
            let classification = classify_excluding(value, priors, &taken);
            taken.push(classification.field);
            (value, classification)
        })
        .collect()
}
