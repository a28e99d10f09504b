//! Persistent store for tests, questions and answers

pub mod sqlite;

use crate::model::{AnswerKey, Question, QuestionAnswer, RecordId, Test};
use thiserror::Error;

pub use sqlite::{SqliteStore, StoreCounts};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored row could not be turned back into a record
    #[error("Invalid stored row: {0}")]
    InvalidRow(String),

    #[error("Insert of {0} did not add a row")]
    NotInserted(String),

    #[error("No stored {kind} with id {id}")]
    NotFound { kind: &'static str, id: RecordId },
}

/// Lookup by natural key plus insert/update by identity, per record kind.
///
/// Inserts return the identity under which the record was stored.
pub trait Store {
    fn find_test_by_name(&self, name: &str) -> Result<Option<Test>, StoreError>;
    fn insert_test(&mut self, test: &Test) -> Result<RecordId, StoreError>;
    fn update_test(&mut self, id: RecordId, test: &Test) -> Result<(), StoreError>;

    fn find_question(
        &self,
        test: RecordId,
        question_number: u32,
    ) -> Result<Option<Question>, StoreError>;
    fn insert_question(&mut self, question: &Question) -> Result<RecordId, StoreError>;
    fn update_question(&mut self, id: RecordId, question: &Question) -> Result<(), StoreError>;

    fn find_answer(&self, key: &AnswerKey) -> Result<Option<QuestionAnswer>, StoreError>;
    fn insert_answer(&mut self, answer: &QuestionAnswer) -> Result<RecordId, StoreError>;
    fn update_answer(&mut self, id: RecordId, answer: &QuestionAnswer) -> Result<(), StoreError>;
    /// Returns the number of answers removed
    fn delete_answers_for_test(&mut self, test: RecordId) -> Result<usize, StoreError>;
}
