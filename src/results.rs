use crate::models::{AnswerMap, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unanswered,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOutcome {
    pub question_id: String,
    pub prompt: String,
    pub outcome: Outcome,
    pub given_answer: Option<String>,
    /// Only filled in for unanswered and incorrect questions.
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    pub correct_count: usize,
    pub answered_count: usize,
    pub total_questions: usize,
    /// Percent of all questions answered correctly.
    pub score: u32,
    /// Percent of answered questions answered correctly.
    pub accuracy: u32,
    pub outcomes: Vec<QuestionOutcome>,
}

impl QuizResult {
    pub fn incorrect_count(&self) -> usize {
        self.answered_count - self.correct_count
    }

    pub fn unanswered_count(&self) -> usize {
        self.total_questions - self.answered_count
    }
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (100.0 * part as f64 / whole as f64).round() as u32
}

pub fn classify(question: &Question, answer: Option<&str>) -> Outcome {
    match answer {
        None | Some("") => Outcome::Unanswered,
        Some(a) if question.is_correct(a) => Outcome::Correct,
        Some(_) => Outcome::Incorrect,
    }
}

pub fn calculate_results(questions: &[Question], answers: &AnswerMap) -> QuizResult {
    let outcomes: Vec<QuestionOutcome> = questions
        .iter()
        .map(|question| {
            let given = answers.get(&question.id);
            let outcome = classify(question, given);
            let reveal = outcome != Outcome::Correct;
            QuestionOutcome {
                question_id: question.id.clone(),
                prompt: question.prompt.clone(),
                outcome,
                given_answer: given.filter(|a| !a.is_empty()).map(str::to_string),
                correct_answer: reveal.then(|| question.correct_answer().into_owned()),
                explanation: if reveal {
                    question.explanation.clone()
                } else {
                    None
                },
            }
        })
        .collect();

    let correct_count = outcomes
        .iter()
        .filter(|o| o.outcome == Outcome::Correct)
        .count();
    let answered_count = outcomes
        .iter()
        .filter(|o| o.outcome != Outcome::Unanswered)
        .count();
    let total_questions = questions.len();

    QuizResult {
        correct_count,
        answered_count,
        total_questions,
        score: percent(correct_count, total_questions),
        accuracy: percent(correct_count, answered_count),
        outcomes,
    }
}
