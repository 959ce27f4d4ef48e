//! Character roster loaded from the operator table

use crate::error::Result;
use crate::parser::{parse_csv, parse_csv_str};
use crate::speed::parse_attack_speed;
use crate::table::{Row, Table};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fewest columns a roster row needs (tags are optional)
const MIN_COLUMNS: usize = 13;

/// Name used by the template row of the roster sheet
const TEMPLATE_NAME: &str = "名前";

/// Base stats of one operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub image: String,
    pub name: String,
    pub class: String,
    pub subclass: String,
    pub hp: i64,
    pub attack: i64,
    pub defense: i64,
    pub resistance: i64,
    pub redeploy: String,
    pub cost: i64,
    pub block: i64,
    /// Seconds per attack
    pub attack_speed: f64,
    /// Speed label as written in the roster, e.g. `1.25s(やや遅い)`
    pub attack_speed_label: String,
    pub source: String,
    pub tags: String,
}

impl CharacterStats {
    /// Build from a roster row; `None` for template, blank or malformed rows
    pub fn from_row(row: &Row) -> Option<Self> {
        if row.cells.len() < MIN_COLUMNS {
            return None;
        }

        let text = |i: usize| {
            row.get(i)
                .map(|c| c.to_string_value().trim().to_string())
                .unwrap_or_default()
        };
        let int = |i: usize| row.get(i).and_then(|c| c.as_number()).map(|n| n as i64);

        let name = text(1);
        if name.is_empty() || name == TEMPLATE_NAME {
            return None;
        }

        // Placeholder rows carry no attack value
        let attack = int(5).filter(|a| *a != 0)?;

        let (Some(hp), Some(defense), Some(resistance), Some(cost), Some(block)) =
            (int(4), int(6), int(7), int(9), int(10))
        else {
            tracing::debug!(name = %name, "skipping roster row with non-numeric stats");
            return None;
        };

        let attack_speed_label = text(11);
        Some(Self {
            image: text(0),
            name,
            class: text(2),
            subclass: text(3),
            hp,
            attack,
            defense,
            resistance,
            redeploy: text(8),
            cost,
            block,
            attack_speed: parse_attack_speed(&attack_speed_label),
            attack_speed_label,
            source: text(12),
            tags: text(13),
        })
    }
}

/// Loaded operators, in roster order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    pub characters: Vec<CharacterStats>,
}

/// How a lookup query matched the roster
#[derive(Debug, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a CharacterStats),
    /// Several names contain the query
    Ambiguous(Vec<&'a CharacterStats>),
    NotFound,
}

impl Roster {
    /// Load the roster CSV
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_table(&parse_csv(path)?))
    }

    /// Load the roster from CSV text (useful for testing)
    pub fn from_csv_str(content: &str) -> Result<Self> {
        Ok(Self::from_table(&parse_csv_str(content, "roster.csv")?))
    }

    pub fn from_table(table: &Table) -> Self {
        Self {
            characters: table.rows.iter().filter_map(CharacterStats::from_row).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Find a character by exact name
    pub fn find(&self, name: &str) -> Option<&CharacterStats> {
        self.characters.iter().find(|c| c.name == name)
    }

    /// Resolve a query: a 1-based roster index, an exact name, or a
    /// substring of a name
    pub fn lookup(&self, query: &str) -> Lookup<'_> {
        let query = query.trim();
        if query.is_empty() {
            return Lookup::NotFound;
        }

        if query.chars().all(|c| c.is_ascii_digit()) {
            return match query.parse::<usize>().ok().and_then(|i| i.checked_sub(1)) {
                Some(idx) => self
                    .characters
                    .get(idx)
                    .map_or(Lookup::NotFound, Lookup::Found),
                None => Lookup::NotFound,
            };
        }

        if let Some(exact) = self.find(query) {
            return Lookup::Found(exact);
        }

        let matches: Vec<&CharacterStats> = self
            .characters
            .iter()
            .filter(|c| c.name.contains(query))
            .collect();
        match matches.len() {
            0 => Lookup::NotFound,
            1 => Lookup::Found(matches[0]),
            _ => Lookup::Ambiguous(matches),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: &str = "\
画像,名前,職業,職分,HP,攻撃力,防御力,術耐性,再配置,コスト,ブロック,攻撃速度,入手,タグ
,名前,職業,職分,0,0,0,0,70s,0,0,1.0s,,
a.png,シルバーアッシュ,前衛,領主,2560,713,397,10,70s,21,2,1.3s(やや遅い),限定外,火力
b.png,エイヤフィヤトラ,術師,中堅術師,1743,735,122,20,70s,21,1,1.6s(遅い),通常
c.png,テンプレ,前衛,領主,100,0,0,0,70s,0,0,1.0s,,
d.png,シルバー見習い,前衛,領主,1000,abc,0,0,70s,10,1,1.0s,,
";

    #[test]
    fn test_load_roster() {
        let roster = Roster::from_csv_str(ROSTER).unwrap();
        assert_eq!(roster.len(), 2);

        let sa = &roster.characters[0];
        assert_eq!(sa.name, "シルバーアッシュ");
        assert_eq!(sa.attack, 713);
        assert_eq!(sa.block, 2);
        assert_eq!(sa.attack_speed, 1.3);
        assert_eq!(sa.attack_speed_label, "1.3s(やや遅い)");
        assert_eq!(sa.tags, "火力");

        let eya = &roster.characters[1];
        assert_eq!(eya.class, "術師");
        assert_eq!(eya.tags, "");
    }

    #[test]
    fn test_lookup_by_index_and_name() {
        let roster = Roster::from_csv_str(ROSTER).unwrap();
        assert!(matches!(roster.lookup("2"), Lookup::Found(c) if c.name == "エイヤフィヤトラ"));
        assert!(matches!(roster.lookup("0"), Lookup::NotFound));
        assert!(matches!(roster.lookup("9"), Lookup::NotFound));
        assert!(matches!(roster.lookup("アッシュ"), Lookup::Found(c) if c.attack == 713));
        assert!(matches!(roster.lookup("ドクター"), Lookup::NotFound));
    }

    #[test]
    fn test_lookup_ambiguous() {
        let mut roster = Roster::from_csv_str(ROSTER).unwrap();
        let mut copy = roster.characters[0].clone();
        copy.name = "シルバーアッシュ(昇進)".to_string();
        roster.characters.push(copy);

        // Exact name wins over substring matches
        assert!(matches!(roster.lookup("シルバーアッシュ"), Lookup::Found(_)));
        match roster.lookup("シルバー") {
            Lookup::Ambiguous(list) => assert_eq!(list.len(), 2),
            other => panic!("expected ambiguous lookup, got {:?}", other),
        }
    }
}
