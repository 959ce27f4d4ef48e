//! arkcalc-core: Skill sheet resolution and damage calculation for Arknights operators
//!
//! This library provides functionality to:
//! - Load the operator roster and parse attack cadence labels
//! - Discover and parse exported skill sheets (one CSV per sheet)
//! - Reconstruct per-rank SP and duration values from sheets that only list
//!   what changed, and read attack multipliers from effect text
//! - Compute hit damage, sustained damage and DPS
//! - Render calculation reports and append them to a transcript log

pub mod character;
pub mod classifier;
pub mod config;
pub mod damage;
pub mod error;
pub mod multiplier;
pub mod parser;
pub mod rank;
pub mod report;
pub mod resolver;
pub mod scanner;
pub mod speed;
pub mod table;
pub mod transcript;
pub mod tree;

pub use character::{CharacterStats, Lookup, Roster};
pub use classifier::{classify, classify_row, Classification, Field, Priors};
pub use config::Config;
pub use damage::{hit_damage, total_damage, DamageKind, HitDamage, SustainedDamage};
pub use error::{Error, Result};
pub use multiplier::extract_multiplier;
pub use parser::{parse_csv, parse_csv_str};
pub use rank::Rank;
pub use report::{fmt_sp, rank_line, CalcReport, Scenario};
pub use resolver::{resolve_sheet, RankRecord, ResolverState, SkillDuration, SkillSheet};
pub use scanner::{load_skills, Skill};
pub use speed::parse_attack_speed;
pub use table::{CellValue, Column, Row, Table};
pub use transcript::TranscriptLog;
pub use tree::{render_tree, update_structure_file, TreeOptions};
