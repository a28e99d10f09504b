//! Find the answer sheet belonging to a test

use crate::error::SheetNotFoundError;
use crate::layout::AnswerSheetLayout;
use crate::reader::{Sheet, Workbook};

/// First sheet, in workbook order, whose sheet code cell equals `code`.
///
/// Sheets whose code cell is empty or not text-like are skipped.
pub fn find_sheet_by_code<'a>(
    workbook: &'a Workbook,
    layout: &AnswerSheetLayout,
    code: &str,
) -> Result<&'a Sheet, SheetNotFoundError> {
    workbook
        .sheets
        .iter()
        .find(|sheet| sheet.try_string(layout.sheet_code).as_deref() == Some(code))
        .ok_or_else(|| SheetNotFoundError {
            code: code.to_string(),
        })
}
