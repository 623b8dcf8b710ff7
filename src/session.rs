use crate::error::FlowError;
use crate::flow::QuizFlow;
use crate::logger;
use crate::models::{AppState, Phase};
use crate::navigation::ForwardAction;
use crate::renderer::{Locale, QuestionRenderer};
use crate::timer::TimerEvent;
use crate::ui::layout::{calculate_quiz_chunks, indicator_at};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;

/// What the app loop should do after an input was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenOutcome {
    Continue,
    BackToMenu,
    /// The attempt just moved to completed and can be recorded.
    AttemptFinished,
}

#[derive(Debug)]
pub enum FlowScreen {
    Ready(QuizFlow),
    Failed(FlowError),
}

#[derive(Debug)]
pub struct QuizScreen {
    pub screen: FlowScreen,
    pub renderer: QuestionRenderer,
    pub locale: Locale,
    /// Digits typed after Ctrl+G, 1-based question number.
    pub jump_input: Option<String>,
    pub notice: Option<String>,
    pub summary_scroll: u16,
}

impl QuizScreen {
    pub fn new(entered: Result<QuizFlow, FlowError>, locale: Locale) -> Self {
        let screen = match entered {
            Ok(flow) => FlowScreen::Ready(flow),
            Err(e) => FlowScreen::Failed(e),
        };
        Self {
            screen,
            renderer: QuestionRenderer::new(),
            locale,
            jump_input: None,
            notice: None,
            summary_scroll: 0,
        }
    }

    pub fn flow(&self) -> Option<&QuizFlow> {
        match &self.screen {
            FlowScreen::Ready(flow) => Some(flow),
            FlowScreen::Failed(_) => None,
        }
    }

    pub fn flow_mut(&mut self) -> Option<&mut QuizFlow> {
        match &mut self.screen {
            FlowScreen::Ready(flow) => Some(flow),
            FlowScreen::Failed(_) => None,
        }
    }

    pub fn is_timer_running(&self) -> bool {
        self.flow().is_some_and(|f| f.is_timer_running())
    }

    fn sync_renderer(&mut self) {
        if let FlowScreen::Ready(flow) = &self.screen
            && let Some(question) = flow.current_question()
        {
            self.renderer
                .sync(question, flow.answers().get(&question.id), self.locale);
        }
    }

    fn go_to(&mut self, index: usize) {
        if let Some(flow) = self.flow_mut() {
            match flow.go_to(index) {
                Ok(()) => self.notice = None,
                Err(e) => self.notice = Some(e.to_string()),
            }
        }
        self.sync_renderer();
    }

    fn step(&mut self, forward: bool) {
        if let Some(flow) = self.flow_mut() {
            let moved = if forward { flow.next() } else { flow.previous() };
            if let Err(e) = moved {
                self.notice = Some(e.to_string());
            } else {
                self.notice = None;
            }
        }
        self.sync_renderer();
    }

    fn submit(&mut self) -> ScreenOutcome {
        let Some(flow) = self.flow_mut() else {
            return ScreenOutcome::Continue;
        };
        match flow.submit() {
            Ok(_) => {
                self.notice = None;
                ScreenOutcome::AttemptFinished
            }
            Err(e) => {
                self.notice = Some(e.to_string());
                ScreenOutcome::Continue
            }
        }
    }

    /// Offers the key to the question input; returns whether it was used.
    fn answer_key(&mut self, key: KeyEvent) -> bool {
        let FlowScreen::Ready(flow) = &mut self.screen else {
            return false;
        };
        let Some(question) = flow.current_question().cloned() else {
            return false;
        };
        let current = flow.answers().get(&question.id).map(str::to_string);

        let mut change = None;
        let used = self.renderer.handle_key(
            &question,
            current.as_deref(),
            key,
            self.locale,
            |id, value| change = Some((id.to_string(), value)),
        );

        if let Some((id, value)) = change
            && let Err(e) = flow.set_answer(&id, value)
        {
            logger::log(&format!("Rejected answer for {}: {}", id, e));
        }
        used
    }

    fn handle_jump_key(&mut self, code: KeyCode) {
        let Some(buffer) = self.jump_input.as_mut() else {
            return;
        };
        match code {
            KeyCode::Char(c) if c.is_ascii_digit() => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Enter => {
                let target = buffer.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
                self.jump_input = None;
                match target {
                    Some(index) => self.go_to(index),
                    None => self.notice = Some("Enter a question number".to_string()),
                }
            }
            KeyCode::Esc => self.jump_input = None,
            _ => {}
        }
    }

    /// One elapsed second from the ticker.
    pub fn handle_tick(&mut self) -> ScreenOutcome {
        match self.flow_mut().and_then(|f| f.tick()) {
            Some(TimerEvent::Expired) => {
                self.jump_input = None;
                self.notice = None;
                ScreenOutcome::AttemptFinished
            }
            _ => ScreenOutcome::Continue,
        }
    }

    /// Jumps to the question whose indicator was clicked.
    pub fn handle_click(&mut self, frame_area: Rect, column: u16, row: u16) -> ScreenOutcome {
        let Some(flow) = self.flow() else {
            return ScreenOutcome::Continue;
        };
        if flow.phase() != Phase::Active {
            return ScreenOutcome::Continue;
        }
        let layout = calculate_quiz_chunks(frame_area);
        let total = flow.questions().len();
        if let Some(index) = indicator_at(
            layout.progress_area,
            total,
            flow.current_index(),
            column,
            row,
        ) {
            self.go_to(index);
        }
        ScreenOutcome::Continue
    }
}

pub fn handle_quiz_input(
    screen: &mut QuizScreen,
    key: KeyEvent,
    app_state: &mut AppState,
) -> ScreenOutcome {
    let phase = match &screen.screen {
        FlowScreen::Failed(_) => {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('b') => ScreenOutcome::BackToMenu,
                _ => ScreenOutcome::Continue,
            };
        }
        FlowScreen::Ready(flow) => flow.phase(),
    };

    match phase {
        Phase::Intro => match key.code {
            KeyCode::Enter | KeyCode::Char('s') => {
                if let Some(flow) = screen.flow_mut()
                    && let Err(e) = flow.start()
                {
                    screen.notice = Some(e.to_string());
                }
                screen.sync_renderer();
                ScreenOutcome::Continue
            }
            KeyCode::Esc | KeyCode::Char('b') => ScreenOutcome::BackToMenu,
            _ => ScreenOutcome::Continue,
        },
        Phase::Completed => match key.code {
            KeyCode::Char('r') => {
                if let Some(flow) = screen.flow_mut()
                    && let Err(e) = flow.retry()
                {
                    screen.notice = Some(e.to_string());
                }
                screen.renderer = QuestionRenderer::new();
                screen.summary_scroll = 0;
                ScreenOutcome::Continue
            }
            KeyCode::Up => {
                screen.summary_scroll = screen.summary_scroll.saturating_sub(1);
                ScreenOutcome::Continue
            }
            KeyCode::Down => {
                screen.summary_scroll = screen.summary_scroll.saturating_add(1);
                ScreenOutcome::Continue
            }
            KeyCode::Char('m') | KeyCode::Esc => ScreenOutcome::BackToMenu,
            _ => ScreenOutcome::Continue,
        },
        Phase::Active => {
            if screen.jump_input.is_some() {
                screen.handle_jump_key(key.code);
                return ScreenOutcome::Continue;
            }

            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return match key.code {
                    KeyCode::Char('s') => screen.submit(),
                    KeyCode::Char('g') => {
                        screen.jump_input = Some(String::new());
                        ScreenOutcome::Continue
                    }
                    KeyCode::Char('n') => {
                        screen.step(true);
                        ScreenOutcome::Continue
                    }
                    KeyCode::Char('p') => {
                        screen.step(false);
                        ScreenOutcome::Continue
                    }
                    _ => ScreenOutcome::Continue,
                };
            }

            if key.code == KeyCode::Esc {
                *app_state = AppState::QuizQuitConfirm;
                return ScreenOutcome::Continue;
            }

            if screen.answer_key(key) {
                return ScreenOutcome::Continue;
            }

            match key.code {
                KeyCode::Tab | KeyCode::PageDown | KeyCode::Right => {
                    screen.step(true);
                    ScreenOutcome::Continue
                }
                KeyCode::BackTab | KeyCode::PageUp | KeyCode::Left => {
                    screen.step(false);
                    ScreenOutcome::Continue
                }
                KeyCode::Enter => {
                    let on_last = screen
                        .flow()
                        .is_some_and(|f| f.navigation().forward == ForwardAction::Submit);
                    if on_last {
                        screen.submit()
                    } else {
                        screen.step(true);
                        ScreenOutcome::Continue
                    }
                }
                _ => ScreenOutcome::Continue,
            }
        }
    }
}
