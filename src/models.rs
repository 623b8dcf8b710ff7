use crate::error::QuizError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

pub const TRUE_ANSWER: &str = "true";
pub const FALSE_ANSWER: &str = "false";
pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Other(String),
}

impl From<String> for Difficulty {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Other(value),
        }
    }
}

impl From<Difficulty> for String {
    fn from(value: Difficulty) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
            Difficulty::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Quiz metadata. Immutable for the duration of an attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Minutes.
    pub duration: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    MultipleChoice {
        options: Vec<String>,
        correct_answer: String,
    },
    TrueFalse {
        correct_answer: bool,
    },
    ShortAnswer {
        correct_answer: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub explanation: Option<String>,
    pub kind: QuestionKind,
}

impl Question {
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            QuestionKind::MultipleChoice { .. } => "multiple_choice",
            QuestionKind::TrueFalse { .. } => "true_false",
            QuestionKind::ShortAnswer { .. } => "short_answer",
        }
    }

    /// The canonical answer string the learner's answer is compared against.
    pub fn correct_answer(&self) -> Cow<'_, str> {
        match &self.kind {
            QuestionKind::MultipleChoice { correct_answer, .. }
            | QuestionKind::ShortAnswer { correct_answer } => Cow::Borrowed(correct_answer),
            QuestionKind::TrueFalse { correct_answer } => {
                Cow::Borrowed(if *correct_answer { TRUE_ANSWER } else { FALSE_ANSWER })
            }
        }
    }

    /// Exact string comparison, no case folding or trimming.
    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer()
    }

    pub fn validate(&self) -> Result<(), QuizError> {
        let invalid = |reason: &str| QuizError::InvalidQuestion {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(invalid("missing id"));
        }
        if self.prompt.trim().is_empty() {
            return Err(invalid("missing question text"));
        }
        match &self.kind {
            QuestionKind::MultipleChoice {
                options,
                correct_answer,
            } => {
                if options.len() < MIN_OPTIONS || options.len() > MAX_OPTIONS {
                    return Err(invalid(&format!(
                        "expected {}-{} options, got {}",
                        MIN_OPTIONS,
                        MAX_OPTIONS,
                        options.len()
                    )));
                }
                if correct_answer.is_empty() {
                    return Err(invalid("missing correct answer"));
                }
            }
            QuestionKind::ShortAnswer { correct_answer } => {
                if correct_answer.is_empty() {
                    return Err(invalid("missing correct answer"));
                }
            }
            QuestionKind::TrueFalse { .. } => {}
        }
        Ok(())
    }
}

/// Stored shape of a question, as written by the authoring side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: String,
    pub question: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl QuestionRecord {
    pub fn into_question(self) -> Result<Question, QuizError> {
        let explanation = self.explanation.filter(|e| !e.trim().is_empty());
        let kind = match self.question_type.as_str() {
            "multiple_choice" => QuestionKind::MultipleChoice {
                options: self.options,
                correct_answer: self.correct_answer,
            },
            "true_false" => {
                let correct_answer = if self.correct_answer.eq_ignore_ascii_case(TRUE_ANSWER) {
                    true
                } else if self.correct_answer.eq_ignore_ascii_case(FALSE_ANSWER) {
                    false
                } else {
                    return Err(QuizError::InvalidQuestion {
                        id: self.id,
                        reason: format!(
                            "true/false answer must be 'true' or 'false', got '{}'",
                            self.correct_answer
                        ),
                    });
                };
                QuestionKind::TrueFalse { correct_answer }
            }
            "short_answer" => QuestionKind::ShortAnswer {
                correct_answer: self.correct_answer,
            },
            other => {
                return Err(QuizError::InvalidQuestion {
                    id: self.id,
                    reason: format!("unknown question type '{}'", other),
                });
            }
        };

        let question = Question {
            id: self.id,
            prompt: self.question,
            explanation,
            kind,
        };
        question.validate()?;
        Ok(question)
    }
}

impl From<&Question> for QuestionRecord {
    fn from(question: &Question) -> Self {
        let options = match &question.kind {
            QuestionKind::MultipleChoice { options, .. } => options.clone(),
            QuestionKind::TrueFalse { .. } => vec![TRUE_ANSWER.to_string(), FALSE_ANSWER.to_string()],
            QuestionKind::ShortAnswer { .. } => Vec::new(),
        };
        QuestionRecord {
            id: question.id.clone(),
            question_type: question.type_name().to_string(),
            question: question.prompt.clone(),
            options,
            correct_answer: question.correct_answer().into_owned(),
            explanation: question.explanation.clone(),
            created_at: None,
        }
    }
}

/// Identifies one quiz inside the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuizKey {
    pub grade: String,
    pub subject_id: String,
    pub chapter_id: String,
    pub quiz_id: String,
}

impl fmt::Display for QuizKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.grade, self.subject_id, self.chapter_id, self.quiz_id
        )
    }
}

/// Everything the caller already knows about the quiz before the flow starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizContext {
    pub quiz: Quiz,
    #[serde(default)]
    pub quiz_id: String,
    #[serde(default)]
    pub grade: String,
    pub subject: String,
    #[serde(default)]
    pub subject_id: String,
    pub chapter: String,
    #[serde(default)]
    pub chapter_id: String,
}

impl QuizContext {
    /// True when every identifier needed to locate the questions is present.
    pub fn is_complete(&self) -> bool {
        [
            &self.quiz_id,
            &self.grade,
            &self.subject,
            &self.subject_id,
            &self.chapter,
            &self.chapter_id,
        ]
        .iter()
        .all(|s| !s.trim().is_empty())
    }

    pub fn key(&self) -> QuizKey {
        QuizKey {
            grade: self.grade.clone(),
            subject_id: self.subject_id.clone(),
            chapter_id: self.chapter_id.clone(),
            quiz_id: self.quiz_id.clone(),
        }
    }
}

/// Learner answers keyed by question id, in the order they were first given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerMap {
    entries: Vec<(String, String)>,
}

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(id, _)| id == question_id)
            .map(|(_, value)| value.as_str())
    }

    /// Inserts a new entry or overwrites the existing one in place.
    pub fn set(&mut self, question_id: &str, value: String) {
        match self.entries.iter_mut().find(|(id, _)| id == question_id) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((question_id.to_string(), value)),
        }
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.get(question_id).is_some_and(|v| !v.is_empty())
    }

    pub fn answered_count(&self) -> usize {
        self.entries.iter().filter(|(_, v)| !v.is_empty()).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Intro,
    Active,
    Completed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Intro => write!(f, "intro"),
            Phase::Active => write!(f, "active"),
            Phase::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Menu,
    Quiz,
    QuizQuitConfirm,
}
