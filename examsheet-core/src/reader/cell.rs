//! Typed access to cell values
//!
//! Every reader comes in two flavours: `try_*` returns `None` when the cell does
//! not hold the requested type and is meant for scans that stop at the first
//! cell without data, while `read_*` turns the mismatch into a [`CellTypeError`]
//! for fields that must be present.

use super::workbook::{CachedValue, CellReference, CellValue, Sheet};
use thiserror::Error;

/// Scalar type a cell was required to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Number,
    WholeNumber,
    String,
    /// String, number or any formula result
    Version,
}

impl Expected {
    pub fn as_str(&self) -> &str {
        match self {
            Expected::Number => "a number",
            Expected::WholeNumber => "a whole number",
            Expected::String => "a string",
            Expected::Version => "a string or number",
        }
    }
}

/// A cell did not hold the scalar type it was required to hold
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", self.describe())]
pub struct CellTypeError {
    pub sheet: String,
    pub cell: CellReference,
    pub expected: Expected,
    /// Human-readable name of the field stored in the cell
    pub field: Option<String>,
}

impl CellTypeError {
    fn describe(&self) -> String {
        match &self.field {
            Some(field) => format!(
                "{} at {}!{} (row {}, col {}) is not {}",
                field,
                self.sheet,
                self.cell,
                self.cell.row,
                self.cell.col,
                self.expected.as_str()
            ),
            None => format!(
                "Cell (row: {} col: {}) on sheet '{}' is not {}",
                self.cell.row,
                self.cell.col,
                self.sheet,
                self.expected.as_str()
            ),
        }
    }
}

/// Numeric literal, or a formula whose cached result is numeric
pub fn try_number(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) => Some(*n),
        CellValue::Formula {
            cached: Some(CachedValue::Number(n)),
            ..
        } => Some(*n),
        _ => None,
    }
}

/// Text literal, a formula whose cached result is text, or a stringified number
pub fn try_string(value: &CellValue) -> Option<String> {
    match value {
        CellValue::Text(s) => Some(s.clone()),
        CellValue::Formula {
            cached: Some(CachedValue::Text(s)),
            ..
        } => Some(s.clone()),
        CellValue::Number(n) => Some(format_number(*n)),
        _ => None,
    }
}

/// Version cells accept any literal string or number and any formula result
pub fn try_version(value: &CellValue) -> Option<String> {
    match value {
        CellValue::Text(s) => Some(s.clone()),
        CellValue::Number(n) => Some(format_number(*n)),
        CellValue::Formula {
            cached: Some(cached),
            ..
        } => match cached {
            CachedValue::Text(s) => Some(s.clone()),
            CachedValue::Number(n) => Some(format_number(*n)),
            CachedValue::Boolean(b) => Some(b.to_string()),
            CachedValue::Error(_) => None,
        },
        _ => None,
    }
}

/// Render a number the way it is shown for an unformatted cell (`7`, `7.5`)
pub fn format_number(n: f64) -> String {
    n.to_string()
}

fn as_whole_number(n: f64) -> Option<u32> {
    if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 {
        Some(n as u32)
    } else {
        None
    }
}

impl Sheet {
    fn type_error(
        &self,
        at: CellReference,
        expected: Expected,
        field: Option<&str>,
    ) -> CellTypeError {
        CellTypeError {
            sheet: self.name.clone(),
            cell: at,
            expected,
            field: field.map(str::to_string),
        }
    }

    pub fn try_number(&self, at: CellReference) -> Option<f64> {
        try_number(self.value_at(at.row, at.col))
    }

    pub fn try_string(&self, at: CellReference) -> Option<String> {
        try_string(self.value_at(at.row, at.col))
    }

    pub fn read_number(
        &self,
        at: CellReference,
        field: Option<&str>,
    ) -> Result<f64, CellTypeError> {
        self.try_number(at)
            .ok_or_else(|| self.type_error(at, Expected::Number, field))
    }

    pub fn read_string(
        &self,
        at: CellReference,
        field: Option<&str>,
    ) -> Result<String, CellTypeError> {
        self.try_string(at)
            .ok_or_else(|| self.type_error(at, Expected::String, field))
    }

    /// Non-negative integral number, used for counts and question numbers
    pub fn read_whole_number(
        &self,
        at: CellReference,
        field: Option<&str>,
    ) -> Result<u32, CellTypeError> {
        self.try_number(at)
            .and_then(as_whole_number)
            .ok_or_else(|| self.type_error(at, Expected::WholeNumber, field))
    }

    pub fn read_version(
        &self,
        at: CellReference,
        field: Option<&str>,
    ) -> Result<String, CellTypeError> {
        try_version(self.value_at(at.row, at.col))
            .ok_or_else(|| self.type_error(at, Expected::Version, field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(row: u32, col: u32) -> CellReference {
        CellReference::new(row, col)
    }

    #[test]
    fn test_read_number() {
        let sheet = Sheet::new("Blad1")
            .with_cell(0, 0, 3.5)
            .with_cell(0, 1, CellValue::formula("A1*2", CachedValue::Number(7.0)))
            .with_cell(0, 2, "abc");

        assert_eq!(sheet.read_number(at(0, 0), None), Ok(3.5));
        assert_eq!(sheet.read_number(at(0, 1), None), Ok(7.0));

        let err = sheet.read_number(at(0, 2), None).unwrap_err();
        assert_eq!(err.expected, Expected::Number);
        assert_eq!(err.cell, at(0, 2));
        assert_eq!(err.to_string(), "Cell (row: 0 col: 2) on sheet 'Blad1' is not a number");
    }

    #[test]
    fn test_read_number_rejects_text_formula() {
        let sheet = Sheet::new("Blad1").with_cell(
            0,
            0,
            CellValue::formula("A2", CachedValue::Text("x".into())),
        );
        assert!(sheet.read_number(at(0, 0), None).is_err());
        assert_eq!(sheet.try_number(at(5, 5)), None);
    }

    #[test]
    fn test_read_string() {
        let sheet = Sheet::new("Blad1")
            .with_cell(0, 0, "T1")
            .with_cell(0, 1, 7.0)
            .with_cell(0, 2, CellValue::formula("A1", CachedValue::Text("T1".into())))
            .with_cell(0, 3, CellValue::Boolean(true));

        assert_eq!(sheet.read_string(at(0, 0), None), Ok("T1".to_string()));
        assert_eq!(sheet.read_string(at(0, 1), None), Ok("7".to_string()));
        assert_eq!(sheet.read_string(at(0, 2), None), Ok("T1".to_string()));
        assert!(sheet.read_string(at(0, 3), None).is_err());
        assert!(sheet.read_string(at(9, 9), None).is_err());
    }

    #[test]
    fn test_field_name_in_message() {
        let sheet = Sheet::new("Toetsen");
        let err = sheet.read_string(at(1, 1), Some("Sheet code")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Sheet code at Toetsen!B2 (row 1, col 1) is not a string"
        );
    }

    #[test]
    fn test_read_whole_number() {
        let sheet = Sheet::new("Blad1")
            .with_cell(0, 0, 3.0)
            .with_cell(0, 1, 2.5)
            .with_cell(0, 2, -1.0);

        assert_eq!(sheet.read_whole_number(at(0, 0), None), Ok(3));
        assert!(sheet.read_whole_number(at(0, 1), None).is_err());
        assert!(sheet.read_whole_number(at(0, 2), None).is_err());
    }

    #[test]
    fn test_read_version() {
        let sheet = Sheet::new("Blad1")
            .with_cell(0, 0, "A")
            .with_cell(0, 1, 2.0)
            .with_cell(0, 2, CellValue::formula("1+1", CachedValue::Number(2.0)))
            .with_cell(0, 3, CellValue::Boolean(false));

        assert_eq!(sheet.read_version(at(0, 0), None), Ok("A".to_string()));
        assert_eq!(sheet.read_version(at(0, 1), None), Ok("2".to_string()));
        assert_eq!(sheet.read_version(at(0, 2), None), Ok("2".to_string()));
        assert!(sheet.read_version(at(0, 3), None).is_err());
        assert!(sheet.read_version(at(0, 4), None).is_err());
    }
}
