//! Fixed cell coordinates of the master sheet and the answer sheets
//!
//! All coordinates are 0-based. Master sheet coordinates are offsets from the
//! first row of a test block; answer sheet coordinates are absolute.

use crate::reader::CellReference;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Complete grid description used by the parsers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub master: MasterLayout,
    #[serde(default)]
    pub answers: AnswerSheetLayout,
}

/// Sheet listing the tests, one block of rows per test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterLayout {
    pub sheet_name: String,
    /// Rows between the starts of two consecutive blocks
    pub block_stride: u32,
    /// Safety bound on the rows scanned for blocks
    pub max_rows: u32,
    pub test_name: CellReference,
    /// Also the end-of-blocks marker: a block whose code cell is empty ends the list
    pub sheet_code: CellReference,
    pub version: CellReference,
    pub total_points: CellReference,
    pub total_questions: CellReference,
    pub question_number_row: u32,
    pub question_points_row: u32,
    pub question_dimension_row: u32,
    pub question_type_row: u32,
    pub question_domain_row: u32,
    /// Question `i` of a block lives in column `first_question_column + i`
    pub first_question_column: u32,
}

impl Default for MasterLayout {
    fn default() -> Self {
        Self {
            sheet_name: "Toetsen".to_string(),
            block_stride: 5,
            max_rows: 10_000,
            test_name: CellReference::new(0, 1),
            sheet_code: CellReference::new(1, 1),
            version: CellReference::new(2, 1),
            total_points: CellReference::new(3, 1),
            total_questions: CellReference::new(4, 1),
            question_number_row: 0,
            question_points_row: 1,
            question_dimension_row: 2,
            question_type_row: 3,
            question_domain_row: 4,
            first_question_column: 3,
        }
    }
}

impl MasterLayout {
    /// Absolute position of a test-level field in the block starting at `start_row`
    pub fn at(&self, field: CellReference, start_row: u32) -> CellReference {
        CellReference::new(start_row + field.row, field.col)
    }

    /// Absolute position of a per-question field for question index `index`
    pub fn question_at(&self, row_offset: u32, start_row: u32, index: u32) -> CellReference {
        CellReference::new(start_row + row_offset, self.first_question_column + index)
    }

    fn test_fields(&self) -> [(&'static str, CellReference); 5] {
        [
            ("test_name", self.test_name),
            ("sheet_code", self.sheet_code),
            ("version", self.version),
            ("total_points", self.total_points),
            ("total_questions", self.total_questions),
        ]
    }

    fn question_rows(&self) -> [(&'static str, u32); 5] {
        [
            ("question_number_row", self.question_number_row),
            ("question_points_row", self.question_points_row),
            ("question_dimension_row", self.question_dimension_row),
            ("question_type_row", self.question_type_row),
            ("question_domain_row", self.question_domain_row),
        ]
    }
}

/// Per-test sheet holding one row of points per student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerSheetLayout {
    /// Cell identifying which test the sheet belongs to
    pub sheet_code: CellReference,
    pub first_student_row: u32,
    pub email_column: u32,
    pub version_column: u32,
    /// Points for question `k + 1` live in column `first_question_column + k`
    pub first_question_column: u32,
    /// Safety bound on student rows scanned per sheet
    pub max_students: u32,
    /// Safety bound on question columns scanned per student
    pub max_questions: u32,
}

impl Default for AnswerSheetLayout {
    fn default() -> Self {
        Self {
            sheet_code: CellReference::new(0, 1),
            first_student_row: 2,
            email_column: 0,
            version_column: 1,
            first_question_column: 2,
            max_students: 1000,
            max_questions: 1000,
        }
    }
}

impl Layout {
    /// Reject grids whose fields overlap each other
    pub fn validate(&self) -> Result<()> {
        let master = &self.master;
        if master.block_stride == 0 {
            anyhow::bail!("Layout error: master block_stride must be at least 1");
        }

        for (name, cell) in master.test_fields() {
            if cell.row >= master.block_stride {
                anyhow::bail!(
                    "Layout error: master {} row offset {} does not fit in a block of {} rows",
                    name,
                    cell.row,
                    master.block_stride
                );
            }
            if cell.col >= master.first_question_column {
                anyhow::bail!(
                    "Layout error: master {} column {} overlaps the question columns starting at {}",
                    name,
                    cell.col,
                    master.first_question_column
                );
            }
        }

        for (name, row) in master.question_rows() {
            if row >= master.block_stride {
                anyhow::bail!(
                    "Layout error: master {} {} does not fit in a block of {} rows",
                    name,
                    row,
                    master.block_stride
                );
            }
        }

        let answers = &self.answers;
        if answers.sheet_code.row >= answers.first_student_row {
            anyhow::bail!(
                "Layout error: answer sheet code row {} must come before the first student row {}",
                answers.sheet_code.row,
                answers.first_student_row
            );
        }
        for (name, col) in [
            ("email_column", answers.email_column),
            ("version_column", answers.version_column),
        ] {
            if col >= answers.first_question_column {
                anyhow::bail!(
                    "Layout error: answer {} {} overlaps the question columns starting at {}",
                    name,
                    col,
                    answers.first_question_column
                );
            }
        }
        if answers.email_column == answers.version_column {
            anyhow::bail!(
                "Layout error: answer email and version share column {}",
                answers.email_column
            );
        }

        Ok(())
    }
}
