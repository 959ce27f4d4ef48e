//! Data file locations

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ROSTER_FILE: &str = "arknights_star6.csv";
pub const SHEETS_DIR: &str = "sheets";
pub const LOG_FILE: &str = "calc_log.txt";

/// Paths to the roster, exported skill sheets and transcript log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub characters_csv: PathBuf,
    pub sheets_dir: PathBuf,
    pub log_file: PathBuf,
}

impl Config {
    /// Default layout under a data directory
    pub fn from_data_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            characters_csv: data_dir.join(ROSTER_FILE),
            sheets_dir: data_dir.join(SHEETS_DIR),
            log_file: data_dir.join(LOG_FILE),
        }
    }

    /// Load a config file from JSON
    ///
    /// Relative paths in the file are resolved against the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Config = serde_json::from_str(&content)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Self {
            characters_csv: base.join(config.characters_csv),
            sheets_dir: base.join(config.sheets_dir),
            log_file: base.join(config.log_file),
        })
    }

    /// Save the config file to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_data_dir() {
        let config = Config::from_data_dir("/srv/ark");
        assert_eq!(config.characters_csv, PathBuf::from("/srv/ark/arknights_star6.csv"));
        assert_eq!(config.sheets_dir, PathBuf::from("/srv/ark/sheets"));
        assert_eq!(config.log_file, PathBuf::from("/srv/ark/calc_log.txt"));
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("arkcalc.json");
        fs::write(
            &path,
            r#"{"characters_csv":"roster.csv","sheets_dir":"xlsx","log_file":"/var/log/calc.txt"}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.characters_csv, temp.path().join("roster.csv"));
        assert_eq!(config.sheets_dir, temp.path().join("xlsx"));
        assert_eq!(config.log_file, PathBuf::from("/var/log/calc.txt"));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, "{").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::Json(_))));
    }
}
