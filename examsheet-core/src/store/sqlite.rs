//! SQLite-backed [`Store`]

use super::{Store, StoreError};
use crate::enums::{QuestionDimension, QuestionDomain, QuestionType};
use crate::model::{AnswerKey, Question, QuestionAnswer, RecordId, Test, normalize_email};
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

pub struct SqliteStore {
    conn: Connection,
}

/// Number of stored records per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub tests: usize,
    pub questions: usize,
    pub answers: usize,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute("PRAGMA foreign_keys = ON", [])?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS tests(
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                sheet_code TEXT NOT NULL,
                version TEXT NOT NULL,
                total_points REAL NOT NULL,
                total_questions INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS questions(
                id TEXT PRIMARY KEY,
                test_id TEXT NOT NULL,
                question_number INTEGER NOT NULL,
                points REAL NOT NULL,
                dimension TEXT NOT NULL,
                question_type TEXT NOT NULL,
                domain TEXT NOT NULL,
                test_name TEXT NOT NULL,
                FOREIGN KEY(test_id) REFERENCES tests(id),
                UNIQUE(test_id, question_number)
            )",
            [],
        )?;

        // question_number is not a foreign key: answers to unknown questions are kept
        conn.execute(
            "CREATE TABLE IF NOT EXISTS question_answers(
                id TEXT PRIMARY KEY,
                test_id TEXT NOT NULL,
                question_number INTEGER NOT NULL,
                email TEXT NOT NULL,
                version TEXT NOT NULL,
                points REAL NOT NULL,
                test_name TEXT NOT NULL,
                FOREIGN KEY(test_id) REFERENCES tests(id),
                UNIQUE(test_id, question_number, email, version)
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_question_answers_test ON question_answers(test_id)",
            [],
        )?;

        Ok(Self { conn })
    }

    pub fn counts(&self) -> Result<StoreCounts, StoreError> {
        let count = |table: &str| -> Result<usize, StoreError> {
            let n: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?;
            Ok(n as usize)
        };
        Ok(StoreCounts {
            tests: count("tests")?,
            questions: count("questions")?,
            answers: count("question_answers")?,
        })
    }

    /// All answers of a test, ordered by student and question
    pub fn answers_for_test(&self, test: RecordId) -> Result<Vec<QuestionAnswer>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, test_id, question_number, email, version, points, test_name
             FROM question_answers WHERE test_id = ?
             ORDER BY email, question_number",
        )?;
        let rows = stmt
            .query_map([test.to_string()], answer_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(AnswerRow::into_answer).collect()
    }
}

fn parse_id(raw: &str) -> Result<RecordId, StoreError> {
    Uuid::parse_str(raw).map_err(|e| StoreError::InvalidRow(format!("bad id '{}': {}", raw, e)))
}

fn expect_one_row(changed: usize, what: impl FnOnce() -> String) -> Result<(), StoreError> {
    if changed == 1 {
        Ok(())
    } else {
        Err(StoreError::NotInserted(what()))
    }
}

fn expect_updated(changed: usize, kind: &'static str, id: RecordId) -> Result<(), StoreError> {
    if changed == 0 {
        Err(StoreError::NotFound { kind, id })
    } else {
        Ok(())
    }
}

type TestRow = (String, String, String, String, f64, u32);

fn test_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TestRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn into_test(row: TestRow) -> Result<Test, StoreError> {
    let (id, name, sheet_code, version, total_points, total_questions) = row;
    Ok(Test {
        id: parse_id(&id)?,
        name,
        sheet_code,
        version,
        total_points,
        total_questions,
    })
}

struct QuestionRow {
    id: String,
    test: String,
    question_number: u32,
    points: f64,
    dimension: String,
    question_type: String,
    domain: String,
    test_name: String,
}

fn question_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<QuestionRow> {
    Ok(QuestionRow {
        id: row.get(0)?,
        test: row.get(1)?,
        question_number: row.get(2)?,
        points: row.get(3)?,
        dimension: row.get(4)?,
        question_type: row.get(5)?,
        domain: row.get(6)?,
        test_name: row.get(7)?,
    })
}

impl QuestionRow {
    fn into_question(self) -> Result<Question, StoreError> {
        let invalid = |e: crate::enums::UnknownCodeError| StoreError::InvalidRow(e.to_string());
        Ok(Question {
            id: parse_id(&self.id)?,
            test: parse_id(&self.test)?,
            question_number: self.question_number,
            points: self.points,
            dimension: QuestionDimension::from_code(&self.dimension).map_err(invalid)?,
            question_type: QuestionType::from_code(&self.question_type).map_err(invalid)?,
            domain: QuestionDomain::from_code(&self.domain).map_err(invalid)?,
            test_name: self.test_name,
        })
    }
}

struct AnswerRow {
    id: String,
    test: String,
    question_number: u32,
    email: String,
    version: String,
    points: f64,
    test_name: String,
}

fn answer_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AnswerRow> {
    Ok(AnswerRow {
        id: row.get(0)?,
        test: row.get(1)?,
        question_number: row.get(2)?,
        email: row.get(3)?,
        version: row.get(4)?,
        points: row.get(5)?,
        test_name: row.get(6)?,
    })
}

impl AnswerRow {
    fn into_answer(self) -> Result<QuestionAnswer, StoreError> {
        Ok(QuestionAnswer {
            id: parse_id(&self.id)?,
            test: parse_id(&self.test)?,
            question_number: self.question_number,
            email: self.email,
            version: self.version,
            points: self.points,
            test_name: self.test_name,
        })
    }
}

impl Store for SqliteStore {
    fn find_test_by_name(&self, name: &str) -> Result<Option<Test>, StoreError> {
        self.conn
            .query_row(
                "SELECT id, name, sheet_code, version, total_points, total_questions
                 FROM tests WHERE name = ?",
                [name],
                test_row,
            )
            .optional()?
            .map(into_test)
            .transpose()
    }

    fn insert_test(&mut self, test: &Test) -> Result<RecordId, StoreError> {
        let changed = self.conn.execute(
            "INSERT INTO tests(id, name, sheet_code, version, total_points, total_questions)
             VALUES(?, ?, ?, ?, ?, ?)",
            (
                test.id.to_string(),
                &test.name,
                &test.sheet_code,
                &test.version,
                test.total_points,
                test.total_questions,
            ),
        )?;
        expect_one_row(changed, || format!("test '{}'", test.name))?;
        Ok(test.id)
    }

    fn update_test(&mut self, id: RecordId, test: &Test) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE tests SET name = ?, sheet_code = ?, version = ?, total_points = ?,
                total_questions = ?
             WHERE id = ?",
            (
                &test.name,
                &test.sheet_code,
                &test.version,
                test.total_points,
                test.total_questions,
                id.to_string(),
            ),
        )?;
        expect_updated(changed, "test", id)
    }

    fn find_question(
        &self,
        test: RecordId,
        question_number: u32,
    ) -> Result<Option<Question>, StoreError> {
        self.conn
            .query_row(
                "SELECT id, test_id, question_number, points, dimension, question_type, domain,
                    test_name
                 FROM questions WHERE test_id = ? AND question_number = ?",
                (test.to_string(), question_number),
                question_row,
            )
            .optional()?
            .map(QuestionRow::into_question)
            .transpose()
    }

    fn insert_question(&mut self, question: &Question) -> Result<RecordId, StoreError> {
        let changed = self.conn.execute(
            "INSERT INTO questions(id, test_id, question_number, points, dimension,
                question_type, domain, test_name)
             VALUES(?, ?, ?, ?, ?, ?, ?, ?)",
            (
                question.id.to_string(),
                question.test.to_string(),
                question.question_number,
                question.points,
                question.dimension.as_code(),
                question.question_type.as_code(),
                question.domain.as_code(),
                &question.test_name,
            ),
        )?;
        expect_one_row(changed, || {
            format!(
                "question {} of test '{}'",
                question.question_number, question.test_name
            )
        })?;
        Ok(question.id)
    }

    fn update_question(&mut self, id: RecordId, question: &Question) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE questions SET test_id = ?, question_number = ?, points = ?, dimension = ?,
                question_type = ?, domain = ?, test_name = ?
             WHERE id = ?",
            (
                question.test.to_string(),
                question.question_number,
                question.points,
                question.dimension.as_code(),
                question.question_type.as_code(),
                question.domain.as_code(),
                &question.test_name,
                id.to_string(),
            ),
        )?;
        expect_updated(changed, "question", id)
    }

    fn find_answer(&self, key: &AnswerKey) -> Result<Option<QuestionAnswer>, StoreError> {
        self.conn
            .query_row(
                "SELECT id, test_id, question_number, email, version, points, test_name
                 FROM question_answers
                 WHERE test_id = ? AND question_number = ? AND email = ? AND version = ?",
                (
                    key.test.to_string(),
                    key.question_number,
                    normalize_email(&key.email),
                    &key.version,
                ),
                answer_row,
            )
            .optional()?
            .map(AnswerRow::into_answer)
            .transpose()
    }

    fn insert_answer(&mut self, answer: &QuestionAnswer) -> Result<RecordId, StoreError> {
        let changed = self.conn.execute(
            "INSERT INTO question_answers(id, test_id, question_number, email, version, points,
                test_name)
             VALUES(?, ?, ?, ?, ?, ?, ?)",
            (
                answer.id.to_string(),
                answer.test.to_string(),
                answer.question_number,
                normalize_email(&answer.email),
                &answer.version,
                answer.points,
                &answer.test_name,
            ),
        )?;
        expect_one_row(changed, || {
            format!(
                "answer to question {} of test '{}' for {}",
                answer.question_number, answer.test_name, answer.email
            )
        })?;
        Ok(answer.id)
    }

    fn update_answer(&mut self, id: RecordId, answer: &QuestionAnswer) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE question_answers SET test_id = ?, question_number = ?, email = ?, version = ?,
                points = ?, test_name = ?
             WHERE id = ?",
            (
                answer.test.to_string(),
                answer.question_number,
                normalize_email(&answer.email),
                &answer.version,
                answer.points,
                &answer.test_name,
                id.to_string(),
            ),
        )?;
        expect_updated(changed, "answer", id)
    }

    fn delete_answers_for_test(&mut self, test: RecordId) -> Result<usize, StoreError> {
        Ok(self.conn.execute(
            "DELETE FROM question_answers WHERE test_id = ?",
            [test.to_string()],
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fresh_id;

    fn sample_test() -> Test {
        Test {
            id: fresh_id(),
            name: "Hoofdstuk 1".into(),
            sheet_code: "T1".into(),
            version: "A".into(),
            total_points: 5.0,
            total_questions: 1,
        }
    }

    #[test]
    fn test_test_round_trip_and_update() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let test = sample_test();

        assert_eq!(store.insert_test(&test).unwrap(), test.id);
        assert_eq!(store.find_test_by_name("Hoofdstuk 1").unwrap(), Some(test.clone()));
        assert_eq!(store.find_test_by_name("Hoofdstuk 2").unwrap(), None);

        let changed = Test {
            version: "B".into(),
            ..test.clone()
        };
        store.update_test(test.id, &changed).unwrap();
        assert_eq!(store.find_test_by_name("Hoofdstuk 1").unwrap(), Some(changed));
    }

    #[test]
    fn test_duplicate_natural_key_is_rejected() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.insert_test(&sample_test()).unwrap();
        assert!(matches!(
            store.insert_test(&sample_test()),
            Err(StoreError::Sqlite(_))
        ));
    }

    #[test]
    fn test_update_of_missing_record() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let test = sample_test();
        assert!(matches!(
            store.update_test(test.id, &test),
            Err(StoreError::NotFound { kind: "test", .. })
        ));
    }

    #[test]
    fn test_question_codes_are_stored() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let test = sample_test();
        store.insert_test(&test).unwrap();

        let question = Question {
            id: fresh_id(),
            test: test.id,
            question_number: 1,
            points: 2.0,
            dimension: QuestionDimension::Integrate,
            question_type: QuestionType::TrueFalse,
            domain: QuestionDomain::Numbers,
            test_name: test.name.clone(),
        };
        store.insert_question(&question).unwrap();

        assert_eq!(store.find_question(test.id, 1).unwrap(), Some(question));
        assert_eq!(store.find_question(test.id, 2).unwrap(), None);
    }

    #[test]
    fn test_answer_lookup_ignores_email_case_and_delete() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let test = sample_test();
        store.insert_test(&test).unwrap();

        let answer = QuestionAnswer::new(&test, 7, "A@X.com", 1.0);
        store.insert_answer(&answer).unwrap();

        let key = AnswerKey {
            test: test.id,
            question_number: 7,
            email: "a@X.COM".into(),
            version: "A".into(),
        };
        assert_eq!(store.find_answer(&key).unwrap(), Some(answer.clone()));
        assert_eq!(store.answers_for_test(test.id).unwrap(), vec![answer]);

        assert_eq!(store.delete_answers_for_test(test.id).unwrap(), 1);
        assert_eq!(store.find_answer(&key).unwrap(), None);
        assert_eq!(
            store.counts().unwrap(),
            StoreCounts {
                tests: 1,
                questions: 0,
                answers: 0
            }
        );
    }
}
