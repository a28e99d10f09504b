//! Excel/ODS file reader using calamine

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use std::path::Path;

pub mod cell;
pub mod workbook;

pub use cell::{CellTypeError, Expected};
pub use workbook::{CachedValue, Cell, CellReference, CellValue, Sheet, Workbook};

/// Read a workbook from a file path
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let path = path.as_ref();
    let mut excel: Sheets<_> = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    let sheet_names = excel.sheet_names();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in &sheet_names {
        let range = excel
            .worksheet_range(sheet_name)
            .with_context(|| format!("Failed to read sheet '{}'", sheet_name))?;

        // Without formulas every cell still has its cached value, so keep going
        let formula_range = match excel.worksheet_formula(sheet_name) {
            Ok(range) => Some(range),
            Err(e) => {
                log::warn!("Could not read formulas of sheet '{}': {:?}", sheet_name, e);
                None
            }
        };

        sheets.push(parse_sheet(sheet_name, &range, formula_range.as_ref()));
    }

    log::debug!("Read {} sheets from {}", sheets.len(), path.display());

    Ok(Workbook::new(path, sheets))
}

fn parse_sheet(name: &str, range: &Range<Data>, formula_range: Option<&Range<String>>) -> Sheet {
    let mut sheet = Sheet::new(name);

    if let Some((start_row, start_col)) = range.start() {
        for (rel_row, rel_col, data) in range.used_cells() {
            sheet.set_cell(
                start_row + rel_row as u32,
                start_col + rel_col as u32,
                parse_cell_value(data),
            );
        }
    }

    // Formula cells keep the value calamine computed for them as their cached result
    if let Some(f) = formula_range {
        if let Some((start_row, start_col)) = f.start() {
            for (rel_row, rel_col, formula) in f.used_cells() {
                let row = start_row + rel_row as u32;
                let col = start_col + rel_col as u32;
                let cached = match sheet.value_at(row, col) {
                    CellValue::Number(n) => Some(CachedValue::Number(*n)),
                    CellValue::Text(s) => Some(CachedValue::Text(s.clone())),
                    CellValue::Boolean(b) => Some(CachedValue::Boolean(*b)),
                    CellValue::Error(e) => Some(CachedValue::Error(e.clone())),
                    CellValue::Empty | CellValue::Formula { .. } => None,
                };
                sheet.set_cell(
                    row,
                    col,
                    CellValue::Formula {
                        formula: formula.clone(),
                        cached,
                    },
                );
            }
        }
    }

    sheet
}

fn parse_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        Data::Empty => CellValue::Empty,
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_value() {
        assert_eq!(parse_cell_value(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(
            parse_cell_value(&Data::String("T1".into())),
            CellValue::Text("T1".into())
        );
        assert!(parse_cell_value(&Data::Empty).is_empty());
    }

    #[test]
    fn test_formula_keeps_cached_value() {
        let mut values: Range<Data> = Range::new((0, 0), (0, 1));
        values.set_value((0, 0), Data::Float(2.0));
        values.set_value((0, 1), Data::String("a@x.com".into()));

        let mut formulas: Range<String> = Range::new((0, 0), (0, 1));
        formulas.set_value((0, 0), "1+1".to_string());

        let sheet = parse_sheet("Blad1", &values, Some(&formulas));

        assert_eq!(
            sheet.value_at(0, 0),
            &CellValue::formula("1+1", CachedValue::Number(2.0))
        );
        assert_eq!(sheet.value_at(0, 1), &CellValue::Text("a@x.com".into()));
    }
}
