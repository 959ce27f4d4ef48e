//! Skill rank labels and their canonical ordering

use serde::{Deserialize, Serialize};
use std::fmt;

/// A skill rank: seven numbered levels followed by three mastery tiers
///
/// Declaration order is the canonical sheet order, so `Ord` sorts ranks the
/// way the game presents them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Level1,
    Level2,
    Level3,
    Level4,
    Level5,
    Level6,
    Level7,
    Mastery1,
    Mastery2,
    Mastery3,
}

impl Rank {
    /// All ranks in canonical order
    pub const ALL: [Rank; 10] = [
        Rank::Level1,
        Rank::Level2,
        Rank::Level3,
        Rank::Level4,
        Rank::Level5,
        Rank::Level6,
        Rank::Level7,
        Rank::Mastery1,
        Rank::Mastery2,
        Rank::Mastery3,
    ];

    /// Parse the label used in the first column of a skill sheet
    pub fn from_label(label: &str) -> Option<Rank> {
        Self::ALL.into_iter().find(|r| r.label() == label.trim())
    }

    /// Parse user input, accepting sheet labels, Roman numeral glyphs and
    /// the `m1`..`m3` shorthand for mastery tiers
    pub fn from_input(input: &str) -> Option<Rank> {
        let normalized = input
            .trim()
            .replace('Ⅲ', "III")
            .replace('Ⅱ', "II")
            .replace('Ⅰ', "I");

        if let Some(rank) = Self::from_label(&normalized) {
            return Some(rank);
        }

        match normalized.to_lowercase().as_str() {
            "m1" => Some(Rank::Mastery1),
            "m2" => Some(Rank::Mastery2),
            "m3" => Some(Rank::Mastery3),
            _ => None,
        }
    }

    /// Label as written in skill sheets
    pub fn label(self) -> &'static str {
        match self {
            Rank::Level1 => "1",
            Rank::Level2 => "2",
            Rank::Level3 => "3",
            Rank::Level4 => "4",
            Rank::Level5 => "5",
            Rank::Level6 => "6",
            Rank::Level7 => "7",
            Rank::Mastery1 => "特化I",
            Rank::Mastery2 => "特化II",
            Rank::Mastery3 => "特化III",
        }
    }

    /// Label shown to users
    pub fn display_name(self) -> &'static str {
        match self {
            Rank::Level1 => "ランク1",
            Rank::Level2 => "ランク2",
            Rank::Level3 => "ランク3",
            Rank::Level4 => "ランク4",
            Rank::Level5 => "ランク5",
            Rank::Level6 => "ランク6",
            Rank::Level7 => "ランク7",
            Rank::Mastery1 => "特化Ⅰ",
            Rank::Mastery2 => "特化Ⅱ",
            Rank::Mastery3 => "特化Ⅲ",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label() {
        assert_eq!(Rank::from_label("1"), Some(Rank::Level1));
        assert_eq!(Rank::from_label("特化II"), Some(Rank::Mastery2));
        assert_eq!(Rank::from_label("8"), None);
        assert_eq!(Rank::from_label("ランク"), None);
    }

    #[test]
    fn test_from_input_aliases() {
        assert_eq!(Rank::from_input("特化Ⅲ"), Some(Rank::Mastery3));
        assert_eq!(Rank::from_input("特化Ⅱ"), Some(Rank::Mastery2));
        assert_eq!(Rank::from_input("M1"), Some(Rank::Mastery1));
        assert_eq!(Rank::from_input(" 7 "), Some(Rank::Level7));
        assert_eq!(Rank::from_input("m4"), None);
    }

    #[test]
    fn test_canonical_order() {
        let mut ranks = vec![Rank::Mastery1, Rank::Level7, Rank::Level1, Rank::Mastery3];
        ranks.sort();
        assert_eq!(
            ranks,
            vec![Rank::Level1, Rank::Level7, Rank::Mastery1, Rank::Mastery3]
        );
    }
}
