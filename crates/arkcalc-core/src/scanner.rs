//! Skill sheet discovery for a character
//!
//! Each character's workbook is exported as one CSV per sheet into
//! `<sheets_dir>/<character>/`. Detail sheets are named `スキルN 名前1.csv`;
//! other sheets (overviews, notes) are ignored.

use crate::parser::parse_csv;
use crate::resolver::{resolve_sheet, SkillSheet};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

static DETAIL_SHEET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^スキル(\d+) (.+?)1$").expect("valid regex"));

/// A detail sheet found on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetFile {
    pub path: PathBuf,
    pub number: u32,
    pub name: String,
}

/// One skill with its resolved ranks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub number: u32,
    pub name: String,
    pub sheet: SkillSheet,
}

/// Directory holding a character's exported sheets
pub fn character_dir<P: AsRef<Path>>(sheets_dir: P, character: &str) -> PathBuf {
    sheets_dir.as_ref().join(character)
}

/// List the detail sheets under a character directory, sorted by skill number
///
/// Entries that cannot be read (dangling links, permission errors) are skipped.
pub fn scan_sheets<P: AsRef<Path>>(dir: P) -> Vec<SheetFile> {
    let mut sheets = Vec::new();

    for entry in WalkDir::new(dir.as_ref()).max_depth(1).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry in sheet directory");
                continue;
            }
        };
        let path = entry.path();

        if !path.extension().is_some_and(|ext| ext == "csv") {
            continue;
        }

        if let Some((number, name)) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(parse_sheet_name)
        {
            sheets.push(SheetFile {
                path: path.to_path_buf(),
                number,
                name,
            });
        }
    }

    sheets.sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.path.cmp(&b.path)));
    sheets
}

/// Load and resolve every skill of a character
///
/// Returns `None` when the character has no sheet directory. Sheets that
/// fail to parse are skipped with a warning.
pub fn load_skills<P: AsRef<Path>>(sheets_dir: P, character: &str) -> Option<Vec<Skill>> {
    let dir = character_dir(sheets_dir, character);
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "no sheet directory for character");
        return None;
    }

    let mut skills = Vec::new();
    for sheet in scan_sheets(&dir) {
        let table = match parse_csv(&sheet.path) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(path = %sheet.path.display(), error = %e, "failed to load skill sheet");
                continue;
            }
        };
        skills.push(Skill {
            number: sheet.number,
            name: sheet.name,
            sheet: resolve_sheet(&table),
        });
    }

    Some(skills)
}

/// Split a detail sheet name into skill number and skill name
///
/// Examples:
/// - "スキル1 強撃1" -> (1, "強撃")
/// - "スキル3 真銀斬1" -> (3, "真銀斬")
/// - "スキル1 強撃" -> None (overview sheet)
fn parse_sheet_name(stem: &str) -> Option<(u32, String)> {
    let caps = DETAIL_SHEET_RE.captures(stem)?;
    let number = caps[1].parse().ok()?;
    Some((number, caps[2].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::Rank;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_sheet_name() {
        assert_eq!(parse_sheet_name("スキル1 強撃1"), Some((1, "強撃".to_string())));
        assert_eq!(
            parse_sheet_name("スキル3 真銀斬1"),
            Some((3, "真銀斬".to_string()))
        );
        assert_eq!(parse_sheet_name("スキル1 強撃"), None);
        assert_eq!(parse_sheet_name("概要"), None);
    }

    #[test]
    fn test_load_skills_missing_character() {
        let temp = TempDir::new().unwrap();
        assert!(load_skills(temp.path(), "ドクター").is_none());
    }

    #[test]
    fn test_load_skills_sorted_and_resolved() {
        let temp = TempDir::new().unwrap();
        let dir = character_dir(temp.path(), "シルバーアッシュ");
        fs::create_dir_all(&dir).unwrap();

        fs::write(
            dir.join("スキル3 真銀斬1.csv"),
            "ランク,B,C,D,E\n1,10,90,20,攻撃力+50%\n",
        )
        .unwrap();
        fs::write(
            dir.join("スキル1 強撃1.csv"),
            "ランク,B,C,D,E\n1,0,5,-,攻撃力が200%まで上昇\n",
        )
        .unwrap();
        fs::write(dir.join("スキル1 強撃.csv"), "概要\nignored\n").unwrap();
        fs::write(dir.join("notes.txt"), "not a sheet").unwrap();

        let skills = load_skills(temp.path(), "シルバーアッシュ").unwrap();
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].number, 1);
        assert_eq!(skills[0].name, "強撃");
        assert_eq!(skills[1].number, 3);

        let r1 = skills[0].sheet.get(Rank::Level1).unwrap();
        assert_eq!(r1.multiplier, Some(2.0));
        assert_eq!(r1.cost_sp, Some(5.0));
    }

    #[cfg(unix)]
    #[test]
    fn test_load_skills_skips_dangling_link() {
        let temp = TempDir::new().unwrap();
        let dir = character_dir(temp.path(), "シルバーアッシュ");
        fs::create_dir_all(&dir).unwrap();

        fs::write(
            dir.join("スキル1 強撃1.csv"),
            "ランク,B,C,D,E\n1,0,5,-,攻撃力+50%\n",
        )
        .unwrap();
        std::os::unix::fs::symlink(dir.join("missing.csv"), dir.join("old.csv")).unwrap();

        let skills = load_skills(temp.path(), "シルバーアッシュ").unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].name, "強撃");
    }
}
