//! Test definitions on the master sheet

use crate::enums::{QuestionDimension, QuestionDomain, QuestionType, UnknownCodeError};
use crate::error::ImportError;
use crate::layout::MasterLayout;
use crate::model::{Question, Test, fresh_id};
use crate::reader::{CellReference, Sheet};

/// One test and its questions, read from a single block of rows
#[derive(Debug, Clone, PartialEq)]
pub struct TestBlock {
    pub test: Test,
    pub questions: Vec<Question>,
}

/// Read every block of the master sheet, stopping at the first block without a sheet code
pub fn parse_master_sheet(
    sheet: &Sheet,
    layout: &MasterLayout,
) -> Result<Vec<TestBlock>, ImportError> {
    let mut blocks = Vec::new();

    for start_row in (0..layout.max_rows).step_by(layout.block_stride.max(1) as usize) {
        let code_cell = layout.at(layout.sheet_code, start_row);
        if sheet.value_at(code_cell.row, code_cell.col).is_empty() {
            break;
        }
        blocks.push(parse_test_block(sheet, layout, start_row)?);
    }

    log::info!("Found {} tests on sheet '{}'", blocks.len(), sheet.name);
    Ok(blocks)
}

/// Read the block starting at `start_row`
pub fn parse_test_block(
    sheet: &Sheet,
    layout: &MasterLayout,
    start_row: u32,
) -> Result<TestBlock, ImportError> {
    let total_points =
        sheet.read_number(layout.at(layout.total_points, start_row), Some("Total points"))?;
    let sheet_code =
        sheet.read_string(layout.at(layout.sheet_code, start_row), Some("Sheet code"))?;
    let name = sheet.read_string(layout.at(layout.test_name, start_row), Some("Test name"))?;
    let version = sheet.read_version(layout.at(layout.version, start_row), Some("Version"))?;
    let total_questions = sheet.read_whole_number(
        layout.at(layout.total_questions, start_row),
        Some("Total questions"),
    )?;

    let test = Test {
        id: fresh_id(),
        name,
        sheet_code,
        version,
        total_points,
        total_questions,
    };

    let questions = (0..total_questions)
        .map(|index| parse_question(sheet, layout, start_row, index, &test))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "Parsed test '{}' version {} with {} questions at row {}",
        test.name,
        test.version,
        questions.len(),
        start_row
    );

    Ok(TestBlock { test, questions })
}

fn parse_question(
    sheet: &Sheet,
    layout: &MasterLayout,
    start_row: u32,
    index: u32,
    test: &Test,
) -> Result<Question, ImportError> {
    let question_number = sheet.read_whole_number(
        layout.question_at(layout.question_number_row, start_row, index),
        Some("Question number"),
    )?;
    let points = sheet.read_number(
        layout.question_at(layout.question_points_row, start_row, index),
        Some("Question points"),
    )?;
    let dimension = read_code(
        sheet,
        layout.question_at(layout.question_dimension_row, start_row, index),
        "Question dimension",
        QuestionDimension::from_code,
    )?;
    let question_type = read_code(
        sheet,
        layout.question_at(layout.question_type_row, start_row, index),
        "Question type",
        QuestionType::from_code,
    )?;
    let domain = read_code(
        sheet,
        layout.question_at(layout.question_domain_row, start_row, index),
        "Question domain",
        QuestionDomain::from_code,
    )?;

    Ok(Question {
        id: fresh_id(),
        test: test.id,
        question_number,
        points,
        dimension,
        question_type,
        domain,
        test_name: test.name.clone(),
    })
}

fn read_code<T>(
    sheet: &Sheet,
    at: CellReference,
    field: &'static str,
    decode: fn(&str) -> Result<T, UnknownCodeError>,
) -> Result<T, ImportError> {
    let code = sheet.read_string(at, Some(field))?;
    decode(&code).map_err(|source| ImportError::UnknownCode {
        field,
        sheet: sheet.name.clone(),
        cell: at,
        source,
    })
}
