//! Append-only transcript of calculation results
//!
//! Every printed result is also appended to a log file with a timestamp.
//! The log is never read back.

use crate::error::{Error, Result};
use chrono::{DateTime, Local, TimeZone};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A transcript log file
#[derive(Debug, Clone)]
pub struct TranscriptLog {
    path: PathBuf,
}

impl TranscriptLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append lines stamped with the current local time
    pub fn append(&self, lines: &[String]) -> Result<()> {
        self.append_at(Local::now(), lines)
    }

    /// Append lines stamped with `timestamp`
    pub fn append_at<Tz: TimeZone>(&self, timestamp: DateTime<Tz>, lines: &[String]) -> Result<()>
    where
        Tz::Offset: std::fmt::Display,
    {
        let entry = format_entry(&timestamp.format(TIMESTAMP_FORMAT).to_string(), lines);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::FileWrite {
                path: self.path.clone(),
                source: e,
            })?;
        file.write_all(entry.as_bytes()).map_err(|e| Error::FileWrite {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(())
    }
}

fn format_entry(timestamp: &str, lines: &[String]) -> String {
    format!("\n[{}]\n{}\n", timestamp, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_format_entry() {
        let lines = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            format_entry("2024-01-02 03:04:05", &lines),
            "\n[2024-01-02 03:04:05]\na\nb\n"
        );
    }

    #[test]
    fn test_append_keeps_previous_entries() {
        let temp = TempDir::new().unwrap();
        let log = TranscriptLog::new(temp.path().join("logs").join("calc_log.txt"));
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        log.append_at(ts, &["first".to_string()]).unwrap();
        log.append_at(ts, &["second".to_string()]).unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            content,
            "\n[2024-05-01 12:00:00]\nfirst\n\n[2024-05-01 12:00:00]\nsecond\n"
        );
    }

    #[test]
    fn test_append_failure_is_a_write_error() {
        let temp = TempDir::new().unwrap();
        // a directory cannot be opened for append
        let log = TranscriptLog::new(temp.path());

        let err = log.append(&["x".to_string()]).unwrap_err();
        assert!(matches!(err, Error::FileWrite { .. }));
        assert!(err.to_string().starts_with("failed to write file"));
    }
}
