use crate::catalog::{read_question_records, scan_quizzes};
use crate::db;
use crate::error::QuizError;
use crate::models::{Question, QuestionRecord, QuizContext, QuizKey};
use async_trait::async_trait;
use std::path::PathBuf;

/// Where quizzes and their questions come from.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Questions of one quiz, in creation order.
    async fn fetch_questions(&self, key: &QuizKey) -> Result<Vec<Question>, QuizError>;

    async fn list_quizzes(&self) -> Result<Vec<QuizContext>, QuizError>;
}

fn into_questions(records: Vec<QuestionRecord>) -> Result<Vec<Question>, QuizError> {
    records.into_iter().map(QuestionRecord::into_question).collect()
}

/// Quizzes stored as JSON documents under `<root>/<grade>/<subject>/<chapter>/<quiz>/`.
#[derive(Debug, Clone)]
pub struct JsonTreeSource {
    root: PathBuf,
}

impl JsonTreeSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl QuestionSource for JsonTreeSource {
    async fn fetch_questions(&self, key: &QuizKey) -> Result<Vec<Question>, QuizError> {
        let root = self.root.clone();
        let key = key.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<Question>, QuizError> {
            into_questions(read_question_records(&root, &key)?)
        })
        .await
        .map_err(|e| QuizError::Io(std::io::Error::other(e)))?
    }

    async fn list_quizzes(&self) -> Result<Vec<QuizContext>, QuizError> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || scan_quizzes(&root))
            .await
            .map_err(|e| QuizError::Io(std::io::Error::other(e)))?
    }
}

/// Quizzes stored in the SQLite `quizzes` / `questions` tables.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    path: PathBuf,
}

impl SqliteSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl QuestionSource for SqliteSource {
    async fn fetch_questions(&self, key: &QuizKey) -> Result<Vec<Question>, QuizError> {
        let path = self.path.clone();
        let key = key.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<Question>, QuizError> {
            let conn = db::init_db(&path)?;
            into_questions(db::question::list_questions(&conn, &key)?)
        })
        .await
        .map_err(|e| QuizError::Io(std::io::Error::other(e)))?
    }

    async fn list_quizzes(&self) -> Result<Vec<QuizContext>, QuizError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<QuizContext>, QuizError> {
            let conn = db::init_db(&path)?;
            Ok(db::question::list_quizzes(&conn)?)
        })
        .await
        .map_err(|e| QuizError::Io(std::io::Error::other(e)))?
    }
}

/// Copies every quiz of `source` into the SQLite store at `conn`. Each quiz is
/// written in its own transaction, so a failed quiz keeps its previous rows.
pub async fn import_into_sqlite(
    source: &dyn QuestionSource,
    conn: &rusqlite::Connection,
) -> Result<usize, QuizError> {
    let quizzes = source.list_quizzes().await?;
    let mut imported = 0;
    for context in &quizzes {
        let key = context.key();
        let questions = source.fetch_questions(&key).await?;
        let tx = conn.unchecked_transaction()?;
        db::question::insert_quiz(&tx, context)?;
        db::question::delete_questions(&tx, &key)?;
        for (order, question) in questions.iter().enumerate() {
            db::question::insert_question(&tx, &key, question, order as i64)?;
        }
        tx.commit()?;
        imported += 1;
    }
    Ok(imported)
}
