//! Core table types for representing exported spreadsheet sheets

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Literal written in a sheet cell when a value does not apply
pub const NO_VALUE_MARKER: &str = "-";

/// A parsed sheet from a single CSV file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Column definitions taken from the header row
    pub columns: Vec<Column>,
    /// Row data, header excluded
    pub rows: Vec<Row>,
    /// Source file path
    pub source_path: PathBuf,
}

/// A column definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Header text
    pub name: String,
    /// Column index (0-based)
    pub index: usize,
}

impl Column {
    /// Create a new column
    pub fn new(name: String, index: usize) -> Self {
        Self { name, index }
    }
}

/// A row of data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    /// Cell values for each column, in source order
    pub cells: Vec<CellValue>,
}

impl Row {
    /// Create a new row
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }

    /// Row label, i.e. the first cell rendered as text
    ///
    /// Sheets store rank labels such as `7` as numbers, so numeric cells are
    /// rendered back to their text form.
    pub fn label(&self) -> Option<String> {
        match self.cells.first()? {
            CellValue::Empty => None,
            other => Some(other.to_string_value()),
        }
    }
}

/// A cell value with type detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Float(f64),
    /// String value
    String(String),
    /// Explicit "does not apply" marker (`-`)
    NoValue,
    /// Empty/null cell
    Empty,
}

impl CellValue {
    /// Parse a string into a CellValue, detecting the type
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return CellValue::Empty;
        }

        if trimmed == NO_VALUE_MARKER {
            return CellValue::NoValue;
        }

        // Try parsing as integer first
        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Integer(i);
        }

        // Only plain decimals count as floats; "inf" or "NaN" stay text
        if trimmed.contains('.') {
            if let Ok(f) = trimmed.parse::<f64>() {
                if f.is_finite() {
                    return CellValue::Float(f);
                }
            }
        }

        // Otherwise, keep as string
        CellValue::String(trimmed.to_string())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Numeric value, if this cell holds one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Convert to a display string
    pub fn to_string_value(&self) -> String {
        match self {
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::String(s) => s.clone(),
            CellValue::NoValue => NO_VALUE_MARKER.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_parse_integer() {
        assert_eq!(CellValue::parse("42"), CellValue::Integer(42));
        assert_eq!(CellValue::parse(" 0 "), CellValue::Integer(0));
    }

    #[test]
    fn test_cell_value_parse_float() {
        assert_eq!(CellValue::parse("1.5"), CellValue::Float(1.5));
        assert_eq!(CellValue::parse("-2.5"), CellValue::Float(-2.5));
    }

    #[test]
    fn test_cell_value_parse_marker() {
        assert_eq!(CellValue::parse("-"), CellValue::NoValue);
        assert_eq!(CellValue::parse(" - "), CellValue::NoValue);
        assert!(CellValue::NoValue.as_number().is_none());
    }

    #[test]
    fn test_cell_value_parse_string() {
        assert_eq!(
            CellValue::parse("攻撃力+30%"),
            CellValue::String("攻撃力+30%".to_string())
        );
        assert_eq!(CellValue::parse("NaN"), CellValue::String("NaN".to_string()));
        assert_eq!(
            CellValue::parse("1.25s"),
            CellValue::String("1.25s".to_string())
        );
    }

    #[test]
    fn test_cell_value_parse_empty() {
        assert_eq!(CellValue::parse(""), CellValue::Empty);
        assert_eq!(CellValue::parse("   "), CellValue::Empty);
    }

    #[test]
    fn test_row_label() {
        let row = Row::new(vec![
            CellValue::Integer(7),
            CellValue::Integer(10),
            CellValue::Empty,
            CellValue::String("効果".to_string()),
        ]);
        assert_eq!(row.label(), Some("7".to_string()));
        assert_eq!(Row::new(vec![CellValue::Empty]).label(), None);
    }
}
