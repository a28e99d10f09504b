//! Output formatters for import results

use anyhow::Result;
use colored::*;
use examsheet_core::{ImportSummary, ParsedWorkbook, Tally};
use std::collections::BTreeMap;
use std::path::Path;

/// Print the import summary in human-readable format with colors
pub fn print_human(file_path: &Path, database: &Path, summary: &ImportSummary) {
    println!(
        "{}",
        format!("Imported: {} -> {}", file_path.display(), database.display()).bold()
    );
    println!();

    print_tally("Tests:", &summary.tests);
    print_tally("Questions:", &summary.questions);
    print_tally("Answers:", &summary.answers);
    if summary.answers_deleted > 0 {
        println!(
            "  {} {}",
            "Replaced answers:".yellow().bold(),
            summary.answers_deleted
        );
    }

    println!();
    println!("{}", "✓ Import complete".green().bold());
}

fn print_tally(label: &str, tally: &Tally) {
    println!(
        "  {} {} inserted, {} updated, {} unchanged",
        label.bold(),
        tally.inserted.to_string().green(),
        tally.updated.to_string().yellow(),
        tally.unchanged.to_string().bright_black()
    );
}

/// Print what a dry run found, grouped by test
pub fn print_human_dry_run(file_path: &Path, parsed: &ParsedWorkbook) {
    println!("{}", format!("Checked: {}", file_path.display()).bold());
    println!();

    if parsed.tests.is_empty() {
        println!("{}", "No tests found".yellow().bold());
        return;
    }

    let mut students: BTreeMap<_, BTreeMap<&str, usize>> = BTreeMap::new();
    for answer in &parsed.answers {
        *students
            .entry(answer.test)
            .or_default()
            .entry(answer.email.as_str())
            .or_default() += 1;
    }

    for test in &parsed.tests {
        let questions = parsed.questions.iter().filter(|q| q.test == test.id).count();
        println!(
            "{} {} {}",
            "Test:".bold(),
            test.name.cyan().bold(),
            format!("(sheet {}, version {})", test.sheet_code, test.version).bright_black()
        );
        println!("  {} {}", "Questions:".bold(), questions);
        match students.get(&test.id) {
            Some(by_email) => {
                println!("  {} {}", "Students:".bold(), by_email.len());
                for (email, count) in by_email {
                    println!("    {} {}", email.yellow(), count);
                }
            }
            None => println!("  {} 0", "Students:".bold()),
        }
        println!();
    }

    println!("{}", "✓ Workbook is valid, nothing written".green().bold());
}

/// Print the import summary in JSON format
pub fn print_json(file_path: &Path, database: &Path, summary: &ImportSummary) -> Result<()> {
    let output = serde_json::json!({
        "file": file_path.display().to_string(),
        "database": database.display().to_string(),
        "summary": summary,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn print_json_dry_run(file_path: &Path, parsed: &ParsedWorkbook) -> Result<()> {
    let tests: Vec<_> = parsed
        .tests
        .iter()
        .map(|test| {
            serde_json::json!({
                "name": test.name,
                "sheet_code": test.sheet_code,
                "version": test.version,
                "total_points": test.total_points,
                "questions": parsed.questions.iter().filter(|q| q.test == test.id).count(),
                "answers": parsed.answers.iter().filter(|a| a.test == test.id).count(),
            })
        })
        .collect();

    let output = serde_json::json!({
        "file": file_path.display().to_string(),
        "dry_run": true,
        "tests": tests,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
