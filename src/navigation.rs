use crate::models::{AnswerMap, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    Current,
    Answered,
    Unanswered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionIndicator {
    pub index: usize,
    pub answered: bool,
    pub current: bool,
}

impl QuestionIndicator {
    /// The current question wins over its answered state.
    pub fn state(&self) -> IndicatorState {
        if self.current {
            IndicatorState::Current
        } else if self.answered {
            IndicatorState::Answered
        } else {
            IndicatorState::Unanswered
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardAction {
    Next,
    Submit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationPanel {
    pub current_index: usize,
    pub answered: usize,
    pub total: usize,
    pub indicators: Vec<QuestionIndicator>,
    pub can_go_previous: bool,
    pub forward: ForwardAction,
    /// Unanswered questions left, shown when submitting from the last question.
    pub unanswered_warning: Option<usize>,
}

impl NavigationPanel {
    pub fn new(questions: &[Question], answers: &AnswerMap, current_index: usize) -> Self {
        let total = questions.len();
        let indicators: Vec<QuestionIndicator> = questions
            .iter()
            .enumerate()
            .map(|(index, q)| QuestionIndicator {
                index,
                answered: answers.is_answered(&q.id),
                current: index == current_index,
            })
            .collect();
        let answered = indicators.iter().filter(|i| i.answered).count();
        let on_last = is_last(current_index, total);
        let unanswered = total - answered;

        Self {
            current_index,
            answered,
            total,
            indicators,
            can_go_previous: current_index > 0,
            forward: if on_last {
                ForwardAction::Submit
            } else {
                ForwardAction::Next
            },
            unanswered_warning: (on_last && unanswered > 0).then_some(unanswered),
        }
    }

    /// Fraction of questions answered, in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.answered as f64 / self.total as f64
    }

    pub fn counter_label(&self) -> String {
        format!("{} / {} answered", self.answered, self.total)
    }
}

pub fn is_last(index: usize, total: usize) -> bool {
    total > 0 && index == total - 1
}

pub fn previous_index(current: usize) -> Option<usize> {
    current.checked_sub(1)
}

pub fn next_index(current: usize, total: usize) -> Option<usize> {
    (current + 1 < total).then_some(current + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionKind;

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question {
                id: format!("q{}", i),
                prompt: format!("Q{}", i),
                explanation: None,
                kind: QuestionKind::TrueFalse {
                    correct_answer: true,
                },
            })
            .collect()
    }

    #[test]
    fn test_first_question_panel() {
        let qs = questions(3);
        let panel = NavigationPanel::new(&qs, &AnswerMap::new(), 0);
        assert!(!panel.can_go_previous);
        assert_eq!(panel.forward, ForwardAction::Next);
        assert_eq!(panel.unanswered_warning, None);
        assert_eq!(panel.counter_label(), "0 / 3 answered");
        assert_eq!(panel.indicators[0].state(), IndicatorState::Current);
        assert_eq!(panel.indicators[1].state(), IndicatorState::Unanswered);
    }

    #[test]
    fn test_last_question_offers_submit_with_warning() {
        let qs = questions(3);
        let mut answers = AnswerMap::new();
        answers.set("q0", "true".to_string());
        let panel = NavigationPanel::new(&qs, &answers, 2);
        assert!(panel.can_go_previous);
        assert_eq!(panel.forward, ForwardAction::Submit);
        assert_eq!(panel.unanswered_warning, Some(2));
        assert_eq!(panel.indicators[0].state(), IndicatorState::Answered);
    }

    #[test]
    fn test_no_warning_when_everything_answered() {
        let qs = questions(2);
        let mut answers = AnswerMap::new();
        answers.set("q0", "true".to_string());
        answers.set("q1", "false".to_string());
        let panel = NavigationPanel::new(&qs, &answers, 1);
        assert_eq!(panel.unanswered_warning, None);
        assert_eq!(panel.ratio(), 1.0);
        // Current wins over answered
        assert_eq!(panel.indicators[1].state(), IndicatorState::Current);
        assert!(panel.indicators[1].answered);
    }

    #[test]
    fn test_ratio() {
        let qs = questions(4);
        let mut answers = AnswerMap::new();
        answers.set("q1", "true".to_string());
        let panel = NavigationPanel::new(&qs, &answers, 0);
        assert_eq!(panel.ratio(), 0.25);
        assert_eq!(NavigationPanel::new(&[], &answers, 0).ratio(), 0.0);
    }

    #[test]
    fn test_index_helpers() {
        assert_eq!(previous_index(0), None);
        assert_eq!(previous_index(2), Some(1));
        assert_eq!(next_index(1, 3), Some(2));
        assert_eq!(next_index(2, 3), None);
        assert!(is_last(2, 3));
        assert!(!is_last(0, 0));
    }
}
