//! Student scores on an answer sheet

use crate::error::ImportError;
use crate::layout::AnswerSheetLayout;
use crate::model::{QuestionAnswer, Test};
use crate::reader::{CellReference, Sheet};

/// Read the points of every student whose version matches `test`.
///
/// The student scan ends at the first row without an email, the question scan
/// of a student at the first column without a number. Students of another
/// version are skipped, their rows are read again for that version's test.
pub fn parse_answers(
    sheet: &Sheet,
    layout: &AnswerSheetLayout,
    test: &Test,
) -> Result<Vec<QuestionAnswer>, ImportError> {
    let mut answers = Vec::new();

    for student in 0..layout.max_students {
        let row = layout.first_student_row + student;

        let Some(email) = sheet.try_string(CellReference::new(row, layout.email_column)) else {
            break;
        };

        let field = format!(
            "Version of student {} on sheet with code {}",
            email, test.sheet_code
        );
        let version =
            sheet.read_string(CellReference::new(row, layout.version_column), Some(&field))?;
        if version != test.version {
            log::debug!(
                "Skipping {} on sheet '{}': version {} belongs to another test than '{}' ({})",
                email,
                sheet.name,
                version,
                test.name,
                test.version
            );
            continue;
        }

        for question in 0..layout.max_questions {
            let at = CellReference::new(row, layout.first_question_column + question);
            let Some(points) = sheet.try_number(at) else {
                break;
            };
            answers.push(QuestionAnswer::new(test, question + 1, &email, points));
        }
    }

    log::debug!(
        "Read {} answers for test '{}' from sheet '{}'",
        answers.len(),
        test.name,
        sheet.name
    );
    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fresh_id;
    use crate::reader::{CachedValue, CellValue};

    fn test_def(version: &str) -> Test {
        Test {
            id: fresh_id(),
            name: "Hoofdstuk 1".into(),
            sheet_code: "T1".into(),
            version: version.into(),
            total_points: 5.0,
            total_questions: 2,
        }
    }

    fn answer_sheet() -> Sheet {
        Sheet::new("H1")
            .with_cell(0, 1, "T1")
            .with_cell(2, 0, "a@x.com")
            .with_cell(2, 1, "A")
            .with_cell(2, 2, 1.0)
            .with_cell(2, 3, 2.5)
            .with_cell(3, 0, "b@x.com")
            .with_cell(3, 1, "B")
            .with_cell(3, 2, 0.0)
            .with_cell(4, 0, "C@X.com")
            .with_cell(4, 1, "A")
            .with_cell(4, 2, CellValue::formula("1+2", CachedValue::Number(3.0)))
            .with_cell(4, 4, 9.0)
    }

    #[test]
    fn test_only_matching_version_is_read() {
        let test = test_def("A");
        let answers =
            parse_answers(&answer_sheet(), &AnswerSheetLayout::default(), &test).unwrap();

        let seen: Vec<_> = answers
            .iter()
            .map(|a| (a.email.as_str(), a.question_number, a.points))
            .collect();
        assert_eq!(
            seen,
            [("a@x.com", 1, 1.0), ("a@x.com", 2, 2.5), ("c@x.com", 1, 3.0)]
        );
        assert!(answers.iter().all(|a| a.test == test.id && a.version == "A"));
        assert!(answers.iter().all(|a| a.test_name == "Hoofdstuk 1"));
    }

    #[test]
    fn test_other_version_picks_up_skipped_rows() {
        let test = test_def("B");
        let answers =
            parse_answers(&answer_sheet(), &AnswerSheetLayout::default(), &test).unwrap();

        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].email, "b@x.com");
        assert_eq!(answers[0].points, 0.0);
    }

    #[test]
    fn test_missing_version_is_an_error() {
        let sheet = answer_sheet().with_cell(3, 1, CellValue::Empty);
        let err =
            parse_answers(&sheet, &AnswerSheetLayout::default(), &test_def("A")).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Version of student b@x.com on sheet with code T1 at H1!B4 (row 3, col 1) is not a string"
        );
    }

    #[test]
    fn test_scan_stops_at_first_row_without_email() {
        let sheet = answer_sheet()
            .with_cell(5, 0, CellValue::Boolean(false))
            .with_cell(6, 0, "late@x.com")
            .with_cell(6, 1, "A")
            .with_cell(6, 2, 4.0);
        let answers =
            parse_answers(&sheet, &AnswerSheetLayout::default(), &test_def("A")).unwrap();

        assert!(answers.iter().all(|a| a.email != "late@x.com"));
    }

    #[test]
    fn test_scan_is_bounded() {
        let layout = AnswerSheetLayout {
            max_students: 1,
            max_questions: 1,
            ..AnswerSheetLayout::default()
        };
        let answers = parse_answers(&answer_sheet(), &layout, &test_def("A")).unwrap();

        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].question_number, 1);
    }
}
