pub mod app;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod flow;
pub mod loader;
pub mod logger;
pub mod models;
pub mod navigation;
pub mod renderer;
pub mod results;
pub mod session;
pub mod timer;
pub mod ui;
pub mod utils;

// Re-exports for convenience
pub use app::{App, Session};
pub use config::{Config, SourceKind};
pub use error::{FlowError, QuizError};
pub use flow::QuizFlow;
pub use loader::{JsonTreeSource, QuestionSource, SqliteSource};
pub use models::{AnswerMap, AppState, Phase, Question, QuestionKind, Quiz, QuizContext, QuizKey};
pub use results::{QuizResult, calculate_results};
pub use session::handle_quiz_input;
pub use timer::{Ticker, Timer, TimerEvent};
pub use ui::{draw_menu, draw_quit_confirmation, draw_quiz_screen, draw_summary};
pub use utils::calculate_wrapped_cursor_position;
