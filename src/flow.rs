//! Quiz flow controller.
//!
//! ```text
//! Intro --start--> Active --submit | time up--> Completed --retry--> Intro
//! ```
//!
//! The controller is the only owner of the attempt: the answer map, the
//! current index and the timer. Timer ticks arrive as messages through
//! `tick()`, so time can run out between two key presses without anything
//! else touching the attempt.

use crate::error::FlowError;
use crate::loader::QuestionSource;
use crate::logger;
use crate::models::{AnswerMap, Phase, Question, QuizContext};
use crate::navigation::{self, NavigationPanel};
use crate::results::{QuizResult, calculate_results};
use crate::timer::{Timer, TimerEvent};

#[derive(Debug)]
pub struct QuizFlow {
    context: QuizContext,
    questions: Vec<Question>,
    answers: AnswerMap,
    phase: Phase,
    current_index: usize,
    timer: Timer,
    timed_out: bool,
    /// Unix seconds when the current attempt was started.
    started_at: Option<u64>,
}

impl QuizFlow {
    /// Validates the context and fetches the question set once.
    pub async fn enter(
        context: Option<QuizContext>,
        source: &dyn QuestionSource,
    ) -> Result<Self, FlowError> {
        let context = match context {
            Some(ctx) if ctx.is_complete() => ctx,
            _ => {
                logger::log("Quiz flow entered without a complete quiz context");
                return Err(FlowError::QuizNotFound);
            }
        };

        let key = context.key();
        logger::log(&format!("Loading questions for {}", key));
        match source.fetch_questions(&key).await {
            Ok(questions) => {
                logger::log(&format!("Loaded {} questions for {}", questions.len(), key));
                Ok(Self::new(context, questions))
            }
            Err(e) => {
                logger::log(&format!("Failed to load questions for {}: {}", key, e));
                Err(FlowError::Load(e.to_string()))
            }
        }
    }

    pub fn new(context: QuizContext, questions: Vec<Question>) -> Self {
        let timer = Timer::new(context.quiz.duration);
        Self {
            context,
            questions,
            answers: AnswerMap::new(),
            phase: Phase::Intro,
            current_index: 0,
            timer,
            timed_out: false,
            started_at: None,
        }
    }

    pub fn context(&self) -> &QuizContext {
        &self.context
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn current_answer(&self) -> Option<&str> {
        self.current_question()
            .and_then(|q| self.answers.get(&q.id))
    }

    pub fn remaining_secs(&self) -> u32 {
        self.timer.remaining_secs()
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Whether the attempt ended because time ran out.
    pub fn completed_by_timeout(&self) -> bool {
        self.timed_out
    }

    pub fn started_at(&self) -> Option<u64> {
        self.started_at
    }

    pub fn navigation(&self) -> NavigationPanel {
        NavigationPanel::new(&self.questions, &self.answers, self.current_index)
    }

    fn require(&self, phase: Phase, action: &'static str) -> Result<(), FlowError> {
        if self.phase != phase {
            return Err(FlowError::InvalidTransition {
                from: self.phase,
                action,
            });
        }
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), FlowError> {
        self.require(Phase::Intro, "start")?;
        self.phase = Phase::Active;
        self.timed_out = false;
        self.started_at = Some(crate::db::now());
        self.timer.start();
        logger::log(&format!(
            "Attempt started: {} ({} questions, {}s)",
            self.context.quiz.title,
            self.questions.len(),
            self.timer.remaining_secs()
        ));
        Ok(())
    }

    /// Records the learner's answer, replacing any earlier one.
    pub fn set_answer(&mut self, question_id: &str, value: String) -> Result<(), FlowError> {
        self.require(Phase::Active, "answer")?;
        if !self.questions.iter().any(|q| q.id == question_id) {
            return Err(FlowError::UnknownQuestion(question_id.to_string()));
        }
        self.answers.set(question_id, value);
        Ok(())
    }

    /// Moves straight to `index`.
    pub fn go_to(&mut self, index: usize) -> Result<(), FlowError> {
        self.require(Phase::Active, "navigate")?;
        if index >= self.questions.len() {
            return Err(FlowError::IndexOutOfRange(index));
        }
        self.current_index = index;
        Ok(())
    }

    /// Returns false when already on the last question.
    pub fn next(&mut self) -> Result<bool, FlowError> {
        self.require(Phase::Active, "navigate")?;
        match navigation::next_index(self.current_index, self.questions.len()) {
            Some(index) => {
                self.current_index = index;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Returns false when already on the first question.
    pub fn previous(&mut self) -> Result<bool, FlowError> {
        self.require(Phase::Active, "navigate")?;
        match navigation::previous_index(self.current_index) {
            Some(index) => {
                self.current_index = index;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Ends the attempt. Only offered on the last question; unanswered
    /// questions do not block it.
    pub fn submit(&mut self) -> Result<QuizResult, FlowError> {
        self.require(Phase::Active, "submit")?;
        let total = self.questions.len();
        if total > 0 && !navigation::is_last(self.current_index, total) {
            return Err(FlowError::NotOnLastQuestion);
        }
        self.complete(false);
        Ok(calculate_results(&self.questions, &self.answers))
    }

    /// Feeds one elapsed second into the timer. Ticks outside the active
    /// phase are stale and ignored.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if self.phase != Phase::Active {
            return None;
        }
        let event = self.timer.tick()?;
        if event == TimerEvent::Expired {
            logger::log(&format!("Time is up for {}", self.context.quiz.title));
            self.complete(true);
        }
        Some(event)
    }

    fn complete(&mut self, timed_out: bool) {
        self.timer.stop();
        self.timed_out = timed_out;
        self.phase = Phase::Completed;
        logger::log(&format!(
            "Attempt completed: {} ({})",
            self.context.quiz.title,
            if timed_out { "time up" } else { "submitted" }
        ));
    }

    pub fn results(&self) -> Option<QuizResult> {
        (self.phase == Phase::Completed).then(|| calculate_results(&self.questions, &self.answers))
    }

    /// Back to the intro with a fresh attempt.
    pub fn retry(&mut self) -> Result<(), FlowError> {
        self.require(Phase::Completed, "retry")?;
        self.current_index = 0;
        self.answers.clear();
        self.timer.reset();
        self.timed_out = false;
        self.started_at = None;
        self.phase = Phase::Intro;
        Ok(())
    }

    /// Stops the clock when the learner leaves the flow mid-attempt.
    pub fn abandon(&mut self) {
        if self.timer.is_running() {
            logger::log(&format!("Attempt abandoned: {}", self.context.quiz.title));
        }
        self.timer.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, QuestionKind, Quiz};

    fn context(duration: u32) -> QuizContext {
        QuizContext {
            quiz: Quiz {
                title: "Colours".to_string(),
                description: "Primary colours".to_string(),
                duration,
                difficulty: Difficulty::Easy,
            },
            quiz_id: "colours".to_string(),
            grade: "3".to_string(),
            subject: "Art".to_string(),
            subject_id: "art".to_string(),
            chapter: "Colour".to_string(),
            chapter_id: "ch1".to_string(),
        }
    }

    fn questions() -> Vec<Question> {
        ["q1", "q2"]
            .iter()
            .map(|id| Question {
                id: id.to_string(),
                prompt: format!("{}?", id),
                explanation: None,
                kind: QuestionKind::ShortAnswer {
                    correct_answer: "red".to_string(),
                },
            })
            .collect()
    }

    #[test]
    fn test_new_flow_starts_in_intro() {
        let flow = QuizFlow::new(context(1), questions());
        assert_eq!(flow.phase(), Phase::Intro);
        assert_eq!(flow.current_index(), 0);
        assert_eq!(flow.remaining_secs(), 60);
        assert!(!flow.is_timer_running());
        assert!(flow.results().is_none());
    }

    #[test]
    fn test_start_runs_timer() {
        let mut flow = QuizFlow::new(context(1), questions());
        flow.start().unwrap();
        assert_eq!(flow.phase(), Phase::Active);
        assert!(flow.is_timer_running());
        assert!(flow.started_at().is_some());
    }

    #[test]
    fn test_invalid_transitions_leave_state_untouched() {
        let mut flow = QuizFlow::new(context(1), questions());
        assert!(matches!(flow.submit(), Err(FlowError::InvalidTransition { .. })));
        assert!(matches!(flow.retry(), Err(FlowError::InvalidTransition { .. })));
        assert!(flow.set_answer("q1", "red".to_string()).is_err());
        assert_eq!(flow.phase(), Phase::Intro);

        flow.start().unwrap();
        assert!(flow.start().is_err());
        assert!(flow.retry().is_err());
        assert_eq!(flow.phase(), Phase::Active);
    }

    #[test]
    fn test_unknown_question_rejected() {
        let mut flow = QuizFlow::new(context(1), questions());
        flow.start().unwrap();
        assert_eq!(
            flow.set_answer("nope", "x".to_string()),
            Err(FlowError::UnknownQuestion("nope".to_string()))
        );
        assert!(flow.answers().is_empty());
    }

    #[test]
    fn test_submit_only_from_last_question() {
        let mut flow = QuizFlow::new(context(1), questions());
        flow.start().unwrap();
        assert_eq!(flow.submit(), Err(FlowError::NotOnLastQuestion));
        assert!(flow.next().unwrap());
        assert!(!flow.next().unwrap());
        let result = flow.submit().unwrap();
        assert_eq!(result.answered_count, 0);
        assert_eq!(flow.phase(), Phase::Completed);
        assert!(!flow.is_timer_running());
        assert!(!flow.completed_by_timeout());
    }

    #[test]
    fn test_previous_bounded_at_zero() {
        let mut flow = QuizFlow::new(context(1), questions());
        flow.start().unwrap();
        assert!(!flow.previous().unwrap());
        assert_eq!(flow.current_index(), 0);
    }

    #[test]
    fn test_go_to_out_of_range() {
        let mut flow = QuizFlow::new(context(1), questions());
        flow.start().unwrap();
        assert_eq!(flow.go_to(5), Err(FlowError::IndexOutOfRange(5)));
        assert_eq!(flow.current_index(), 0);
    }

    #[test]
    fn test_stale_ticks_ignored_outside_active() {
        let mut flow = QuizFlow::new(context(1), questions());
        assert_eq!(flow.tick(), None);
        assert_eq!(flow.remaining_secs(), 60);

        flow.start().unwrap();
        flow.tick();
        flow.go_to(1).unwrap();
        flow.submit().unwrap();
        assert_eq!(flow.tick(), None);
        assert_eq!(flow.remaining_secs(), 59);
    }

    #[test]
    fn test_empty_quiz_can_be_submitted() {
        let mut flow = QuizFlow::new(context(1), Vec::new());
        flow.start().unwrap();
        assert!(flow.current_question().is_none());
        let result = flow.submit().unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.accuracy, 0);
    }

    #[test]
    fn test_abandon_stops_timer() {
        let mut flow = QuizFlow::new(context(1), questions());
        flow.start().unwrap();
        flow.abandon();
        assert!(!flow.is_timer_running());
    }
}
