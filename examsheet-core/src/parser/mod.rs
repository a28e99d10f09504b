//! Extraction of tests, questions and answers from a workbook

pub mod answers;
pub mod locate;
pub mod test_block;

use crate::error::ImportError;
use crate::layout::Layout;
use crate::model::{Question, QuestionAnswer, Test};
use crate::reader::Workbook;

pub use answers::parse_answers;
pub use locate::find_sheet_by_code;
pub use test_block::{TestBlock, parse_master_sheet, parse_test_block};

/// Every record found in one workbook, each with a fresh identity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedWorkbook {
    pub tests: Vec<Test>,
    pub questions: Vec<Question>,
    pub answers: Vec<QuestionAnswer>,
}

/// Parse the master sheet, then the answer sheet of every test found on it
pub fn parse_workbook(
    workbook: &Workbook,
    layout: &Layout,
) -> Result<ParsedWorkbook, ImportError> {
    let master = workbook.get_sheet(&layout.master.sheet_name).ok_or_else(|| {
        log::debug!(
            "Sheets in {}: {:?}",
            workbook.path.display(),
            workbook.sheet_names()
        );
        ImportError::MasterSheetNotFound(layout.master.sheet_name.clone())
    })?;

    let mut parsed = ParsedWorkbook::default();
    for block in parse_master_sheet(master, &layout.master)? {
        parsed.tests.push(block.test);
        parsed.questions.extend(block.questions);
    }

    for test in &parsed.tests {
        let sheet = find_sheet_by_code(workbook, &layout.answers, &test.sheet_code)?;
        let answers = parse_answers(sheet, &layout.answers, test)?;
        log::info!(
            "Test '{}' version {}: {} answers on sheet '{}'",
            test.name,
            test.version,
            answers.len(),
            sheet.name
        );
        parsed.answers.extend(answers);
    }

    Ok(parsed)
}
