use crate::models::{Difficulty, Question, QuestionRecord, Quiz, QuizContext, QuizKey};
use rusqlite::{Connection, Result};

use super::now;

pub fn insert_quiz(conn: &Connection, context: &QuizContext) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO quizzes
            (quiz_id, grade, subject, subject_id, chapter, chapter_id, title, description, duration, difficulty, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        rusqlite::params![
            context.quiz_id,
            context.grade,
            context.subject,
            context.subject_id,
            context.chapter,
            context.chapter_id,
            context.quiz.title,
            context.quiz.description,
            context.quiz.duration,
            context.quiz.difficulty.to_string(),
            now()
        ],
    )?;
    Ok(())
}

pub fn list_quizzes(conn: &Connection) -> Result<Vec<QuizContext>> {
    let mut stmt = conn.prepare(
        "SELECT quiz_id, grade, subject, subject_id, chapter, chapter_id, title, description, duration, difficulty
         FROM quizzes ORDER BY grade, subject, chapter, title",
    )?;

    let quizzes = stmt
        .query_map([], |row| {
            let difficulty: String = row.get(9)?;
            Ok(QuizContext {
                quiz_id: row.get(0)?,
                grade: row.get(1)?,
                subject: row.get(2)?,
                subject_id: row.get(3)?,
                chapter: row.get(4)?,
                chapter_id: row.get(5)?,
                quiz: Quiz {
                    title: row.get(6)?,
                    description: row.get(7)?,
                    duration: row.get(8)?,
                    difficulty: Difficulty::from(difficulty),
                },
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(quizzes)
}

pub fn insert_question(
    conn: &Connection,
    key: &QuizKey,
    question: &Question,
    created_at: i64,
) -> Result<u64> {
    let record = QuestionRecord::from(question);
    let options_json = serde_json::to_string(&record.options)
        .map_err(|e| rusqlite::Error::InvalidParameterName(e.to_string()))?;

    conn.execute(
        "INSERT INTO questions
            (grade, subject_id, chapter_id, quiz_id, question_id, question_type, prompt, options, correct_answer, explanation, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        rusqlite::params![
            key.grade,
            key.subject_id,
            key.chapter_id,
            key.quiz_id,
            record.id,
            record.question_type,
            record.question,
            options_json,
            record.correct_answer,
            record.explanation,
            created_at
        ],
    )?;

    Ok(conn.last_insert_rowid() as u64)
}

/// Removes every question of one quiz, used before re-importing it.
pub fn delete_questions(conn: &Connection, key: &QuizKey) -> Result<usize> {
    conn.execute(
        "DELETE FROM questions WHERE grade = ? AND subject_id = ? AND chapter_id = ? AND quiz_id = ?",
        rusqlite::params![key.grade, key.subject_id, key.chapter_id, key.quiz_id],
    )
}

/// Questions of one quiz in creation order.
pub fn list_questions(conn: &Connection, key: &QuizKey) -> Result<Vec<QuestionRecord>> {
    let mut stmt = conn.prepare(
        "SELECT question_id, question_type, prompt, options, correct_answer, explanation, created_at
         FROM questions
         WHERE grade = ? AND subject_id = ? AND chapter_id = ? AND quiz_id = ?
         ORDER BY created_at, id",
    )?;

    let records = stmt
        .query_map(
            rusqlite::params![key.grade, key.subject_id, key.chapter_id, key.quiz_id],
            |row| {
                let options_json: String = row.get(3)?;
                let options: Vec<String> = serde_json::from_str(&options_json).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        3,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
                Ok(QuestionRecord {
                    id: row.get(0)?,
                    question_type: row.get(1)?,
                    question: row.get(2)?,
                    options,
                    correct_answer: row.get(4)?,
                    explanation: row.get(5)?,
                    created_at: row.get(6)?,
                })
            },
        )?
        .collect::<Result<Vec<_>>>()?;

    Ok(records)
}
