use crate::error::QuizError;
use crate::logger;
use crate::models::{QuestionRecord, QuizContext, QuizKey};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const QUIZ_FILE: &str = "quiz.json";
pub const QUESTIONS_FILE: &str = "questions.json";

/// Directory of one quiz: `<root>/<grade>/<subject_id>/<chapter_id>/<quiz_id>`.
pub fn quiz_dir(root: &Path, key: &QuizKey) -> PathBuf {
    root.join(&key.grade)
        .join(&key.subject_id)
        .join(&key.chapter_id)
        .join(&key.quiz_id)
}

fn sorted_subdirs(dir: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                dirs.push(path);
            }
        }
    }
    dirs.sort();
    dirs
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Walks the document tree and returns every quiz that has a `quiz.json`.
/// The directory a quiz was found in is its key; ids in the file are
/// overwritten by the path segments.
pub fn scan_quizzes(root: &Path) -> Result<Vec<QuizContext>, QuizError> {
    let mut quizzes = Vec::new();

    for grade in sorted_subdirs(root) {
        for subject in sorted_subdirs(&grade) {
            for chapter in sorted_subdirs(&subject) {
                for quiz in sorted_subdirs(&chapter) {
                    let meta_path = quiz.join(QUIZ_FILE);
                    if !meta_path.is_file() {
                        continue;
                    }
                    let content = fs::read_to_string(&meta_path)?;
                    let mut context: QuizContext = serde_json::from_str(&content)?;
                    take_path_id(&mut context.grade, dir_name(&grade), &meta_path);
                    take_path_id(&mut context.subject_id, dir_name(&subject), &meta_path);
                    take_path_id(&mut context.chapter_id, dir_name(&chapter), &meta_path);
                    take_path_id(&mut context.quiz_id, dir_name(&quiz), &meta_path);
                    quizzes.push(context);
                }
            }
        }
    }

    Ok(quizzes)
}

fn take_path_id(field: &mut String, segment: String, meta_path: &Path) {
    if !field.trim().is_empty() && *field != segment {
        logger::log(&format!(
            "{}: id {:?} does not match directory {:?}, using the directory",
            meta_path.display(),
            field,
            segment
        ));
    }
    *field = segment;
}

/// Reads `questions.json`, sorted by `createdAt` ascending. Questions without
/// a timestamp keep file order after the timestamped ones.
pub fn read_question_records(root: &Path, key: &QuizKey) -> Result<Vec<QuestionRecord>, QuizError> {
    let path = quiz_dir(root, key).join(QUESTIONS_FILE);
    if !path.is_file() {
        return Err(QuizError::NotFound(format!(
            "no questions for {} ({})",
            key,
            path.display()
        )));
    }

    let content = fs::read_to_string(&path)?;
    let mut records: Vec<QuestionRecord> = serde_json::from_str(&content)?;
    records.sort_by_key(|r| r.created_at.unwrap_or(i64::MAX));

    {
        let mut seen = HashSet::new();
        if let Some(dup) = records.iter().find(|r| !seen.insert(r.id.as_str())) {
            return Err(QuizError::InvalidQuestion {
                id: dup.id.clone(),
                reason: "duplicate id".to_string(),
            });
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn key() -> QuizKey {
        QuizKey {
            grade: "7".to_string(),
            subject_id: "math".to_string(),
            chapter_id: "ch1".to_string(),
            quiz_id: "quiz1".to_string(),
        }
    }

    #[test]
    fn test_scan_quizzes_fills_ids_from_path() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("7/math/ch1/quiz1/quiz.json"),
            r#"{
                "quiz": {"title": "Fractions", "duration": 5, "difficulty": "easy"},
                "quizId": "",
                "grade": "",
                "subject": "Math",
                "subjectId": "",
                "chapter": "Numbers",
                "chapterId": ""
            }"#,
        );
        // A quiz directory without metadata is skipped
        fs::create_dir_all(dir.path().join("7/math/ch1/draft")).unwrap();

        let quizzes = scan_quizzes(dir.path()).unwrap();
        assert_eq!(quizzes.len(), 1);
        assert_eq!(quizzes[0].key(), key());
        assert_eq!(quizzes[0].quiz.title, "Fractions");
        assert!(quizzes[0].is_complete());
    }

    #[test]
    fn test_scan_keys_quiz_by_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("7/math/ch1/quiz1/quiz.json"),
            r#"{
                "quiz": {"title": "Fractions", "duration": 5},
                "quizId": "other-quiz",
                "grade": "8",
                "subject": "Math",
                "subjectId": "algebra",
                "chapter": "Numbers",
                "chapterId": "ch9"
            }"#,
        );
        write(
            &quiz_dir(dir.path(), &key()).join(QUESTIONS_FILE),
            r#"[{"id": "a", "type": "short_answer", "question": "A?", "correctAnswer": "a"}]"#,
        );

        let quizzes = scan_quizzes(dir.path()).unwrap();
        assert_eq!(quizzes.len(), 1);
        assert_eq!(quizzes[0].key(), key());
        assert_eq!(quizzes[0].subject, "Math");

        // The listed key loads the questions stored next to quiz.json
        let records = read_question_records(dir.path(), &quizzes[0].key()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_scan_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let quizzes = scan_quizzes(&dir.path().join("nope")).unwrap();
        assert!(quizzes.is_empty());
    }

    #[test]
    fn test_scan_rejects_malformed_metadata() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("7/math/ch1/quiz1/quiz.json"), "{ not json");
        assert!(matches!(scan_quizzes(dir.path()), Err(QuizError::Json(_))));
    }

    #[test]
    fn test_read_question_records_sorted_by_creation() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &quiz_dir(dir.path(), &key()).join(QUESTIONS_FILE),
            r#"[
                {"id": "c", "type": "short_answer", "question": "C?", "correctAnswer": "c"},
                {"id": "b", "type": "short_answer", "question": "B?", "correctAnswer": "b", "createdAt": 20},
                {"id": "a", "type": "short_answer", "question": "A?", "correctAnswer": "a", "createdAt": 10}
            ]"#,
        );

        let ids: Vec<String> = read_question_records(dir.path(), &key())
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_missing_questions_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_question_records(dir.path(), &key()).unwrap_err();
        assert!(matches!(err, QuizError::NotFound(_)));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &quiz_dir(dir.path(), &key()).join(QUESTIONS_FILE),
            r#"[
                {"id": "a", "type": "short_answer", "question": "A?", "correctAnswer": "a"},
                {"id": "a", "type": "short_answer", "question": "A again?", "correctAnswer": "a"}
            ]"#,
        );
        let err = read_question_records(dir.path(), &key()).unwrap_err();
        assert!(err.to_string().contains("duplicate id"));
    }
}
