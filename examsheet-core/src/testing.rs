//! Workbook fixtures shared by unit tests

use crate::reader::{Sheet, Workbook};

/// Master sheet with test "Hoofdstuk 1" (code T1, version A, two questions)
pub(crate) fn master_sheet() -> Sheet {
    Sheet::new("Toetsen")
        .with_cell(0, 1, "Hoofdstuk 1")
        .with_cell(1, 1, "T1")
        .with_cell(2, 1, "A")
        .with_cell(3, 1, 5.0)
        .with_cell(4, 1, 2.0)
        .with_cell(0, 3, 1.0)
        .with_cell(1, 3, 2.0)
        .with_cell(2, 3, "O")
        .with_cell(3, 3, "M")
        .with_cell(4, 3, "Algebra")
        .with_cell(0, 4, 2.0)
        .with_cell(1, 4, 3.0)
        .with_cell(2, 4, "I")
        .with_cell(3, 4, "O")
        .with_cell(4, 4, "Statistiek")
}

/// Answer sheet for code T1 with one row per `(email, version, points)`
pub(crate) fn answer_sheet(students: &[(&str, &str, &[f64])]) -> Sheet {
    let mut sheet = Sheet::new("Hoofdstuk 1")
        .with_cell(0, 0, "Bladcode")
        .with_cell(0, 1, "T1")
        .with_cell(1, 0, "Email")
        .with_cell(1, 1, "Versie");
    for (i, (email, version, points)) in students.iter().enumerate() {
        let row = 2 + i as u32;
        sheet = sheet.with_cell(row, 0, *email).with_cell(row, 1, *version);
        for (k, p) in points.iter().enumerate() {
            sheet = sheet.with_cell(row, 2 + k as u32, *p);
        }
    }
    sheet
}

pub(crate) fn workbook_with(students: &[(&str, &str, &[f64])]) -> Workbook {
    Workbook::new("toetsen.xlsx", vec![master_sheet(), answer_sheet(students)])
}

/// Student a@x.com has version A, b@x.com version B
pub(crate) fn scenario_workbook() -> Workbook {
    workbook_with(&[("a@x.com", "A", &[2.0, 1.5][..]), ("b@x.com", "B", &[1.0, 3.0][..])])
}
