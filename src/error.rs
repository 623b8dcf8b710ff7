use crate::models::Phase;
use thiserror::Error;

/// Errors raised while reading or writing quiz data.
#[derive(Error, Debug)]
pub enum QuizError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid question '{id}': {reason}")]
    InvalidQuestion { id: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Errors raised by the quiz flow controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// Grade, subject, chapter or quiz identifiers were missing on entry.
    #[error("Quiz not found")]
    QuizNotFound,

    /// The question set could not be fetched.
    #[error("Failed to load questions: {0}")]
    Load(String),

    #[error("Cannot {action} while {from}")]
    InvalidTransition { from: Phase, action: &'static str },

    #[error("Unknown question id '{0}'")]
    UnknownQuestion(String),

    #[error("Question index {0} is out of range")]
    IndexOutOfRange(usize),

    /// Submit is only offered on the last question.
    #[error("Submit is only available on the last question")]
    NotOnLastQuestion,
}

impl FlowError {
    /// Entry errors end the attempt; the only way out is back to the menu.
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowError::QuizNotFound | FlowError::Load(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_errors_are_terminal() {
        assert!(FlowError::QuizNotFound.is_terminal());
        assert!(FlowError::Load("boom".to_string()).is_terminal());
        assert!(!FlowError::IndexOutOfRange(3).is_terminal());
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = FlowError::InvalidTransition {
            from: Phase::Intro,
            action: "submit",
        };
        assert_eq!(err.to_string(), "Cannot submit while intro");
    }

    #[test]
    fn test_quiz_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: QuizError = io.into();
        assert!(err.to_string().starts_with("IO error"));
    }
}
