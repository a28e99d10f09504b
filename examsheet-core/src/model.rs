//! Records produced by the parsers and kept in the store

use crate::enums::{QuestionDimension, QuestionDomain, QuestionType};
use uuid::Uuid;

/// Identity of a stored record
pub type RecordId = Uuid;

/// Generate an identity for a freshly parsed record
pub fn fresh_id() -> RecordId {
    Uuid::new_v4()
}

/// A test definition; `name` is its natural key
#[derive(Debug, Clone, PartialEq)]
pub struct Test {
    pub id: RecordId,
    pub name: String,
    /// Code in the designated cell of the sheet holding this test's scores
    pub sheet_code: String,
    pub version: String,
    pub total_points: f64,
    pub total_questions: u32,
}

/// A question of a test; natural key is `(test, question_number)`
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: RecordId,
    pub test: RecordId,
    pub question_number: u32,
    pub points: f64,
    pub dimension: QuestionDimension,
    pub question_type: QuestionType,
    pub domain: QuestionDomain,
    pub test_name: String,
}

/// Points a student earned on one question
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionAnswer {
    pub id: RecordId,
    pub test: RecordId,
    pub question_number: u32,
    /// Always lower-cased
    pub email: String,
    pub version: String,
    pub points: f64,
    pub test_name: String,
}

impl QuestionAnswer {
    pub fn new(test: &Test, question_number: u32, email: &str, points: f64) -> Self {
        Self {
            id: fresh_id(),
            test: test.id,
            question_number,
            email: normalize_email(email),
            version: test.version.clone(),
            points,
            test_name: test.name.clone(),
        }
    }

    pub fn key(&self) -> AnswerKey {
        AnswerKey {
            test: self.test,
            question_number: self.question_number,
            email: normalize_email(&self.email),
            version: self.version.clone(),
        }
    }
}

/// Natural key of a [`QuestionAnswer`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnswerKey {
    pub test: RecordId,
    pub question_number: u32,
    pub email: String,
    pub version: String,
}

/// Emails compare case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}
