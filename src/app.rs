use crate::config::{Config, SourceKind};
use crate::db::{self, attempt::AttemptRecord};
use crate::flow::QuizFlow;
use crate::loader::{JsonTreeSource, QuestionSource, SqliteSource};
use crate::logger;
use crate::models::{AppState, QuizContext};
use crate::renderer::Locale;
use crate::session::{QuizScreen, ScreenOutcome, handle_quiz_input};
use crate::ui::{self, MenuPanel};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::Rect;
use rusqlite::Connection;
use std::sync::Arc;

const RECENT_ATTEMPTS: usize = 20;

/// Who is taking quizzes and where quizzes and results live. Handed to the
/// app explicitly so nothing reads identity or storage from globals.
pub struct Session {
    pub user: Option<String>,
    pub source: Arc<dyn QuestionSource>,
    /// Attempt history; `None` when the database could not be opened.
    pub history: Option<Connection>,
}

impl Session {
    pub fn new(
        user: Option<String>,
        source: Arc<dyn QuestionSource>,
        history: Option<Connection>,
    ) -> Self {
        Self {
            user,
            source,
            history,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let source: Arc<dyn QuestionSource> = match config.source {
            SourceKind::Json => Arc::new(JsonTreeSource::new(&config.quiz_dir)),
            SourceKind::Sqlite => Arc::new(SqliteSource::new(&config.db_path)),
        };
        let history = match db::init_db(&config.db_path) {
            Ok(conn) => Some(conn),
            Err(e) => {
                logger::log(&format!(
                    "Attempt history disabled, cannot open {}: {}",
                    config.db_path.display(),
                    e
                ));
                None
            }
        };
        Self::new(config.user.clone(), source, history)
    }

    /// Stores a finished attempt. Returns the new row id.
    pub fn record_attempt(&self, flow: &QuizFlow) -> Option<u64> {
        let conn = self.history.as_ref()?;
        let result = flow.results()?;
        let started_at = flow.started_at().unwrap_or_else(db::now);
        match db::attempt::record_attempt(
            conn,
            self.user.as_deref(),
            flow.context(),
            started_at,
            &result,
            flow.completed_by_timeout(),
        ) {
            Ok(id) => Some(id),
            Err(e) => {
                logger::log(&format!("Failed to record attempt: {}", e));
                None
            }
        }
    }

    pub fn recent_attempts(&self) -> Vec<AttemptRecord> {
        let Some(conn) = self.history.as_ref() else {
            return Vec::new();
        };
        db::attempt::list_recent_attempts(conn, RECENT_ATTEMPTS).unwrap_or_else(|e| {
            logger::log(&format!("Failed to load attempts: {}", e));
            Vec::new()
        })
    }
}

pub struct App {
    pub session: Session,
    pub locale: Locale,
    pub state: AppState,
    pub quizzes: Vec<QuizContext>,
    pub selected_quiz: usize,
    pub attempts: Vec<AttemptRecord>,
    pub selected_attempt: usize,
    pub focused_panel: MenuPanel,
    /// Error shown on the menu, e.g. when the catalog failed to load.
    pub status: Option<String>,
    pub quiz: Option<QuizScreen>,
    pub should_quit: bool,
    source_label: String,
}

impl App {
    pub fn new(session: Session, locale: Locale, source_label: impl Into<String>) -> Self {
        Self {
            session,
            locale,
            state: AppState::Menu,
            quizzes: Vec::new(),
            selected_quiz: 0,
            attempts: Vec::new(),
            selected_attempt: 0,
            focused_panel: MenuPanel::default(),
            status: None,
            quiz: None,
            should_quit: false,
            source_label: source_label.into(),
        }
    }

    /// Reloads the quiz catalog and the attempt history.
    pub async fn refresh(&mut self) {
        match self.session.source.list_quizzes().await {
            Ok(quizzes) => {
                logger::log(&format!("Found {} quizzes", quizzes.len()));
                self.quizzes = quizzes;
                self.status = None;
            }
            Err(e) => {
                logger::log(&format!("Failed to list quizzes: {}", e));
                self.quizzes.clear();
                self.status = Some(format!("Cannot list quizzes: {}", e));
            }
        }
        self.selected_quiz = self.selected_quiz.min(self.quizzes.len().saturating_sub(1));
        self.attempts = self.session.recent_attempts();
        self.selected_attempt = self
            .selected_attempt
            .min(self.attempts.len().saturating_sub(1));
    }

    pub fn is_timer_running(&self) -> bool {
        self.quiz.as_ref().is_some_and(|q| q.is_timer_running())
    }

    async fn open_quiz(&mut self, context: Option<QuizContext>) {
        let entered = QuizFlow::enter(context, self.session.source.as_ref()).await;
        self.quiz = Some(QuizScreen::new(entered, self.locale));
        self.state = AppState::Quiz;
    }

    /// The quiz behind the highlighted attempt, if it is still in the catalog.
    fn quiz_for_attempt(&self, attempt: &AttemptRecord) -> Option<QuizContext> {
        self.quizzes
            .iter()
            .find(|q| {
                q.quiz_id == attempt.quiz_id
                    && q.grade == attempt.grade
                    && q.subject_id == attempt.subject_id
                    && q.chapter_id == attempt.chapter_id
            })
            .cloned()
    }

    fn leave_quiz(&mut self) {
        if let Some(flow) = self.quiz.as_mut().and_then(|q| q.flow_mut()) {
            flow.abandon();
        }
        self.quiz = None;
        self.state = AppState::Menu;
    }

    fn finish_attempt(&mut self) {
        if let Some(flow) = self.quiz.as_ref().and_then(|q| q.flow())
            && let Some(id) = self.session.record_attempt(flow)
        {
            logger::log(&format!("Recorded attempt {}", id));
        }
        self.attempts = self.session.recent_attempts();
    }

    fn apply(&mut self, outcome: ScreenOutcome) {
        match outcome {
            ScreenOutcome::Continue => {}
            ScreenOutcome::AttemptFinished => {
                self.finish_attempt();
                // Time can run out while the quit prompt is open
                if self.state == AppState::QuizQuitConfirm {
                    self.state = AppState::Quiz;
                }
            }
            ScreenOutcome::BackToMenu => self.leave_quiz(),
        }
    }

    async fn handle_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('1') => self.focused_panel = MenuPanel::Quizzes,
            KeyCode::Char('2') => self.focused_panel = MenuPanel::Attempts,
            KeyCode::Tab => {
                self.focused_panel = match self.focused_panel {
                    MenuPanel::Quizzes => MenuPanel::Attempts,
                    MenuPanel::Attempts => MenuPanel::Quizzes,
                }
            }
            KeyCode::Up => match self.focused_panel {
                MenuPanel::Quizzes => self.selected_quiz = self.selected_quiz.saturating_sub(1),
                MenuPanel::Attempts => {
                    self.selected_attempt = self.selected_attempt.saturating_sub(1)
                }
            },
            KeyCode::Down => match self.focused_panel {
                MenuPanel::Quizzes => {
                    if self.selected_quiz + 1 < self.quizzes.len() {
                        self.selected_quiz += 1;
                    }
                }
                MenuPanel::Attempts => {
                    if self.selected_attempt + 1 < self.attempts.len() {
                        self.selected_attempt += 1;
                    }
                }
            },
            KeyCode::Enter => match self.focused_panel {
                MenuPanel::Quizzes => {
                    if let Some(context) = self.quizzes.get(self.selected_quiz).cloned() {
                        self.open_quiz(Some(context)).await;
                    }
                }
                MenuPanel::Attempts => {
                    if let Some(attempt) = self.attempts.get(self.selected_attempt) {
                        let context = self.quiz_for_attempt(attempt);
                        self.open_quiz(context).await;
                    }
                }
            },
            KeyCode::Char('r') => self.refresh().await,
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.leave_quiz();
            self.should_quit = true;
            return;
        }

        match self.state {
            AppState::Menu => self.handle_menu_key(key).await,
            AppState::Quiz => {
                if let Some(screen) = self.quiz.as_mut() {
                    let outcome = handle_quiz_input(screen, key, &mut self.state);
                    self.apply(outcome);
                }
            }
            AppState::QuizQuitConfirm => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.leave_quiz(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.state = AppState::Quiz
                }
                _ => {}
            },
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, frame_area: Rect) {
        if self.state != AppState::Quiz {
            return;
        }
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind
            && let Some(screen) = self.quiz.as_mut()
        {
            let outcome = screen.handle_click(frame_area, mouse.column, mouse.row);
            self.apply(outcome);
        }
    }

    /// One second from the ticker.
    pub fn handle_tick(&mut self) {
        if let Some(screen) = self.quiz.as_mut() {
            let outcome = screen.handle_tick();
            self.apply(outcome);
        }
    }

    pub fn draw(&self, f: &mut Frame) {
        match self.state {
            AppState::Menu => {
                let label = match &self.session.user {
                    Some(user) => format!("{} · {}", user, self.source_label),
                    None => self.source_label.clone(),
                };
                ui::draw_menu(
                    f,
                    &self.quizzes,
                    self.selected_quiz,
                    &self.attempts,
                    self.selected_attempt,
                    self.focused_panel,
                    &label,
                    self.status.as_deref(),
                )
            }
            AppState::Quiz => {
                if let Some(screen) = &self.quiz {
                    ui::draw_quiz_screen(f, screen);
                }
            }
            AppState::QuizQuitConfirm => ui::draw_quit_confirmation(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FlowError, QuizError};
    use crate::models::{Difficulty, Phase, Question, QuestionKind, Quiz, QuizKey};
    use crate::session::FlowScreen;
    use async_trait::async_trait;

    struct OneQuiz;

    fn context() -> QuizContext {
        QuizContext {
            quiz: Quiz {
                title: "Planets".to_string(),
                description: String::new(),
                duration: 1,
                difficulty: Difficulty::Easy,
            },
            quiz_id: "planets".to_string(),
            grade: "4".to_string(),
            subject: "Science".to_string(),
            subject_id: "science".to_string(),
            chapter: "Space".to_string(),
            chapter_id: "space".to_string(),
        }
    }

    #[async_trait]
    impl QuestionSource for OneQuiz {
        async fn fetch_questions(&self, _key: &QuizKey) -> Result<Vec<Question>, QuizError> {
            Ok(vec![Question {
                id: "p1".to_string(),
                prompt: "Largest planet?".to_string(),
                explanation: Some("Jupiter is the largest.".to_string()),
                kind: QuestionKind::MultipleChoice {
                    options: vec!["Mars".to_string(), "Jupiter".to_string()],
                    correct_answer: "Jupiter".to_string(),
                },
            }])
        }

        async fn list_quizzes(&self) -> Result<Vec<QuizContext>, QuizError> {
            Ok(vec![context()])
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    async fn app() -> App {
        let conn = Connection::open_in_memory().unwrap();
        db::run_migrations(&conn).unwrap();
        let session = Session::new(Some("amina".to_string()), Arc::new(OneQuiz), Some(conn));
        let mut app = App::new(session, Locale::En, "test");
        app.refresh().await;
        app
    }

    #[tokio::test]
    async fn test_refresh_lists_quizzes() {
        let app = app().await;
        assert_eq!(app.quizzes.len(), 1);
        assert!(app.attempts.is_empty());
        assert!(app.status.is_none());
    }

    #[tokio::test]
    async fn test_completed_attempt_is_recorded_once() {
        let mut app = app().await;
        app.handle_key(key(KeyCode::Enter)).await;
        assert_eq!(app.state, AppState::Quiz);
        assert!(!app.is_timer_running());

        app.handle_key(key(KeyCode::Enter)).await;
        assert!(app.is_timer_running());
        app.handle_key(key(KeyCode::Char('2'))).await;
        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
            .await;

        assert!(!app.is_timer_running());
        assert_eq!(app.attempts.len(), 1);
        let attempt = &app.attempts[0];
        assert_eq!(attempt.score, 100);
        assert_eq!(attempt.user_name.as_deref(), Some("amina"));
        assert!(!attempt.timed_out);

        // Stale ticks after completion do not record again
        app.handle_tick();
        assert_eq!(app.attempts.len(), 1);
    }

    #[tokio::test]
    async fn test_timeout_during_quit_prompt_shows_results() {
        let mut app = app().await;
        app.handle_key(key(KeyCode::Enter)).await;
        app.handle_key(key(KeyCode::Enter)).await;
        app.handle_key(key(KeyCode::Esc)).await;
        assert_eq!(app.state, AppState::QuizQuitConfirm);

        for _ in 0..60 {
            app.handle_tick();
        }
        assert_eq!(app.state, AppState::Quiz);
        let flow = app.quiz.as_ref().and_then(|q| q.flow()).unwrap();
        assert_eq!(flow.phase(), Phase::Completed);
        assert!(app.attempts[0].timed_out);
    }

    #[tokio::test]
    async fn test_quit_confirmation_abandons_attempt() {
        let mut app = app().await;
        app.handle_key(key(KeyCode::Enter)).await;
        app.handle_key(key(KeyCode::Enter)).await;
        app.handle_key(key(KeyCode::Esc)).await;
        app.handle_key(key(KeyCode::Char('y'))).await;

        assert_eq!(app.state, AppState::Menu);
        assert!(app.quiz.is_none());
        assert!(!app.is_timer_running());
        assert!(app.attempts.is_empty());
    }

    #[tokio::test]
    async fn test_attempt_for_removed_quiz_is_not_found() {
        let mut app = app().await;
        app.handle_key(key(KeyCode::Enter)).await;
        app.handle_key(key(KeyCode::Enter)).await;
        app.handle_key(key(KeyCode::Char('2'))).await;
        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
            .await;
        app.handle_key(key(KeyCode::Char('m'))).await;
        assert_eq!(app.state, AppState::Menu);

        app.quizzes.clear();
        app.handle_key(key(KeyCode::Char('2'))).await;
        app.handle_key(key(KeyCode::Enter)).await;

        let screen = app.quiz.as_ref().unwrap();
        assert!(matches!(
            screen.screen,
            FlowScreen::Failed(FlowError::QuizNotFound)
        ));
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_from_anywhere() {
        let mut app = app().await;
        app.handle_key(key(KeyCode::Enter)).await;
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .await;
        assert!(app.should_quit);
    }
}
