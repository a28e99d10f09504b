//! Insert-or-update of parsed records against the store

use crate::error::ImportError;
use crate::model::RecordId;
use crate::parser::ParsedWorkbook;
use crate::store::{Store, StoreError};
use serde::Serialize;
use std::collections::HashMap;

/// Fresh identities replaced by stored ones
#[derive(Debug, Default)]
pub struct IdRemap {
    resolved: HashMap<RecordId, RecordId>,
}

impl IdRemap {
    pub fn insert(&mut self, fresh: RecordId, stored: RecordId) {
        if fresh != stored {
            self.resolved.insert(fresh, stored);
        }
    }

    /// The stored identity for `id`, or `id` itself when it was never replaced
    pub fn resolve(&self, id: RecordId) -> RecordId {
        self.resolved.get(&id).copied().unwrap_or(id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.inserted + self.updated + self.unchanged
    }
}

/// What one import run wrote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub tests: Tally,
    pub questions: Tally,
    pub answers: Tally,
    /// Stored answers removed before the new answer sets were written
    pub answers_deleted: usize,
}

fn insert_failed(record: String) -> impl FnOnce(StoreError) -> ImportError {
    move |source| ImportError::StorageInsert { record, source }
}

/// Write every parsed record, tests first, then questions, then answers.
///
/// A test that already exists under its name keeps its stored identity, and
/// every question and answer that referenced the fresh identity is moved to
/// the stored one. Stored answers of every parsed test are deleted before the
/// new answers are written. Records are only updated when a field differs.
pub fn reconcile<S: Store + ?Sized>(
    store: &mut S,
    parsed: ParsedWorkbook,
) -> Result<ImportSummary, ImportError> {
    let ParsedWorkbook {
        tests,
        mut questions,
        mut answers,
    } = parsed;
    let mut summary = ImportSummary::default();
    let mut tests_remap = IdRemap::default();

    for mut test in tests {
        match store.find_test_by_name(&test.name)? {
            Some(existing) => {
                log::debug!("Test {} already exists, updating test", test.name);
                tests_remap.insert(test.id, existing.id);
                test.id = existing.id;

                if test != existing {
                    store.update_test(existing.id, &test)?;
                    summary.tests.updated += 1;
                } else {
                    summary.tests.unchanged += 1;
                }
            }
            None => {
                log::debug!("Test {} is new, inserting test", test.name);
                let record = format!("Test '{}'", test.name);
                let stored = store.insert_test(&test).map_err(insert_failed(record))?;
                tests_remap.insert(test.id, stored);
                test.id = stored;
                summary.tests.inserted += 1;
            }
        }

        // the answer set of a test is always replaced as a whole
        let deleted = store.delete_answers_for_test(test.id)?;
        if deleted > 0 {
            log::debug!("Deleted {} stored answers of test {}", deleted, test.name);
        }
        summary.answers_deleted += deleted;
    }

    for question in &mut questions {
        question.test = tests_remap.resolve(question.test);
    }
    for answer in &mut answers {
        answer.test = tests_remap.resolve(answer.test);
    }

    for mut question in questions {
        match store.find_question(question.test, question.question_number)? {
            Some(existing) => {
                question.id = existing.id;
                if question != existing {
                    log::debug!(
                        "Question {} of test {} changed, updating question",
                        question.question_number,
                        question.test_name
                    );
                    store.update_question(existing.id, &question)?;
                    summary.questions.updated += 1;
                } else {
                    summary.questions.unchanged += 1;
                }
            }
            None => {
                let record = format!(
                    "Question {} of test '{}'",
                    question.question_number, question.test_name
                );
                store
                    .insert_question(&question)
                    .map_err(insert_failed(record))?;
                summary.questions.inserted += 1;
            }
        }
    }

    for mut answer in answers {
        match store.find_answer(&answer.key())? {
            Some(existing) => {
                answer.id = existing.id;
                if answer != existing {
                    store.update_answer(existing.id, &answer)?;
                    summary.answers.updated += 1;
                } else {
                    summary.answers.unchanged += 1;
                }
            }
            None => {
                let record = format!(
                    "Answer of {} to question {} of test '{}'",
                    answer.email, answer.question_number, answer.test_name
                );
                store.insert_answer(&answer).map_err(insert_failed(record))?;
                summary.answers.inserted += 1;
            }
        }
    }

    log::info!(
        "Imported {} tests, {} questions and {} answers ({} stale answers deleted)",
        summary.tests.total(),
        summary.questions.total(),
        summary.answers.total(),
        summary.answers_deleted
    );
    Ok(summary)
}
