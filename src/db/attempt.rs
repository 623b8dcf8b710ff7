use crate::models::QuizContext;
use crate::results::QuizResult;
use rusqlite::{Connection, Result};

use super::now;

#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRecord {
    pub id: u64,
    pub user_name: Option<String>,
    pub quiz_id: String,
    pub quiz_title: String,
    pub grade: String,
    pub subject_id: String,
    pub chapter_id: String,
    pub started_at: u64,
    pub completed_at: u64,
    pub correct_count: usize,
    pub answered_count: usize,
    pub total_questions: usize,
    pub score: u32,
    pub accuracy: u32,
    pub timed_out: bool,
}

pub fn record_attempt(
    conn: &Connection,
    user_name: Option<&str>,
    context: &QuizContext,
    started_at: u64,
    result: &QuizResult,
    timed_out: bool,
) -> Result<u64> {
    conn.execute(
        "INSERT INTO attempts
            (user_name, quiz_id, quiz_title, grade, subject_id, chapter_id, started_at, completed_at,
             correct_count, answered_count, total_questions, score, accuracy, timed_out)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        rusqlite::params![
            user_name,
            context.quiz_id,
            context.quiz.title,
            context.grade,
            context.subject_id,
            context.chapter_id,
            started_at,
            now(),
            result.correct_count,
            result.answered_count,
            result.total_questions,
            result.score,
            result.accuracy,
            timed_out
        ],
    )?;

    Ok(conn.last_insert_rowid() as u64)
}

pub fn list_recent_attempts(conn: &Connection, limit: usize) -> Result<Vec<AttemptRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_name, quiz_id, quiz_title, grade, subject_id, chapter_id, started_at, completed_at,
                correct_count, answered_count, total_questions, score, accuracy, timed_out
         FROM attempts ORDER BY completed_at DESC, id DESC LIMIT ?",
    )?;

    let attempts = stmt
        .query_map([limit], |row| {
            Ok(AttemptRecord {
                id: row.get(0)?,
                user_name: row.get(1)?,
                quiz_id: row.get(2)?,
                quiz_title: row.get(3)?,
                grade: row.get(4)?,
                subject_id: row.get(5)?,
                chapter_id: row.get(6)?,
                started_at: row.get(7)?,
                completed_at: row.get(8)?,
                correct_count: row.get(9)?,
                answered_count: row.get(10)?,
                total_questions: row.get(11)?,
                score: row.get(12)?,
                accuracy: row.get(13)?,
                timed_out: row.get(14)?,
            })
        })?
        .filter_map(|r| r.ok())
        .collect();

    Ok(attempts)
}
