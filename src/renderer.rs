use crate::models::{FALSE_ANSWER, Question, QuestionKind, TRUE_ANSWER};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Locale::En),
            "ar" => Some(Locale::Ar),
            _ => None,
        }
    }

    pub fn true_label(&self) -> &'static str {
        match self {
            Locale::En => "True",
            Locale::Ar => "صح",
        }
    }

    pub fn false_label(&self) -> &'static str {
        match self {
            Locale::En => "False",
            Locale::Ar => "خطأ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    /// The value stored in the answer map.
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerInput {
    Choices(Vec<ChoiceOption>),
    Text,
}

pub fn input_for(question: &Question, locale: Locale) -> AnswerInput {
    match &question.kind {
        QuestionKind::MultipleChoice { options, .. } => AnswerInput::Choices(
            options
                .iter()
                .map(|o| ChoiceOption {
                    value: o.clone(),
                    label: o.clone(),
                })
                .collect(),
        ),
        QuestionKind::TrueFalse { .. } => AnswerInput::Choices(vec![
            ChoiceOption {
                value: TRUE_ANSWER.to_string(),
                label: locale.true_label().to_string(),
            },
            ChoiceOption {
                value: FALSE_ANSWER.to_string(),
                label: locale.false_label().to_string(),
            },
        ]),
        QuestionKind::ShortAnswer { .. } => AnswerInput::Text,
    }
}

fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Input state for the question on screen. The answer itself always comes
/// from the answer map; only the highlight row and text cursor live here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionRenderer {
    pub highlighted: usize,
    /// Cursor position in characters.
    pub cursor: usize,
}

impl QuestionRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-aligns the highlight and cursor with the question now on screen.
    pub fn sync(&mut self, question: &Question, answer: Option<&str>, locale: Locale) {
        match input_for(question, locale) {
            AnswerInput::Choices(options) => {
                self.highlighted = answer
                    .and_then(|a| options.iter().position(|o| o.value == a))
                    .unwrap_or(0);
                self.cursor = 0;
            }
            AnswerInput::Text => {
                self.highlighted = 0;
                self.cursor = answer.map(|a| a.chars().count()).unwrap_or(0);
            }
        }
    }

    /// Applies one key press. Every change to the answer is reported through
    /// `on_change(question_id, new_value)`. Returns whether the key was used.
    pub fn handle_key<F>(
        &mut self,
        question: &Question,
        answer: Option<&str>,
        key: KeyEvent,
        locale: Locale,
        mut on_change: F,
    ) -> bool
    where
        F: FnMut(&str, String),
    {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }

        match input_for(question, locale) {
            AnswerInput::Choices(options) => match key.code {
                KeyCode::Up => {
                    self.highlighted = self.highlighted.saturating_sub(1);
                    true
                }
                KeyCode::Down => {
                    if self.highlighted + 1 < options.len() {
                        self.highlighted += 1;
                    }
                    true
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    if let Some(option) = options.get(self.highlighted) {
                        on_change(&question.id, option.value.clone());
                    }
                    true
                }
                KeyCode::Char(c) => match c.to_digit(10) {
                    Some(d) if d >= 1 && (d as usize) <= options.len() => {
                        self.highlighted = d as usize - 1;
                        on_change(&question.id, options[self.highlighted].value.clone());
                        true
                    }
                    _ => false,
                },
                _ => false,
            },
            AnswerInput::Text => {
                let mut text = answer.unwrap_or("").to_string();
                let len = text.chars().count();
                self.cursor = self.cursor.min(len);

                match key.code {
                    KeyCode::Left => {
                        self.cursor = self.cursor.saturating_sub(1);
                        true
                    }
                    KeyCode::Right => {
                        self.cursor = (self.cursor + 1).min(len);
                        true
                    }
                    KeyCode::Home => {
                        self.cursor = 0;
                        true
                    }
                    KeyCode::End => {
                        self.cursor = len;
                        true
                    }
                    KeyCode::Backspace => {
                        if self.cursor > 0 {
                            text.remove(byte_index(&text, self.cursor - 1));
                            self.cursor -= 1;
                            on_change(&question.id, text);
                        }
                        true
                    }
                    KeyCode::Delete => {
                        if self.cursor < len {
                            text.remove(byte_index(&text, self.cursor));
                            on_change(&question.id, text);
                        }
                        true
                    }
                    KeyCode::Char(c) => {
                        text.insert(byte_index(&text, self.cursor), c);
                        self.cursor += 1;
                        on_change(&question.id, text);
                        true
                    }
                    _ => false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn mc() -> Question {
        Question {
            id: "mc".to_string(),
            prompt: "Pick".to_string(),
            explanation: None,
            kind: QuestionKind::MultipleChoice {
                options: vec!["Red".to_string(), "Green".to_string(), "Blue".to_string()],
                correct_answer: "Green".to_string(),
            },
        }
    }

    fn short() -> Question {
        Question {
            id: "sa".to_string(),
            prompt: "Capital of France?".to_string(),
            explanation: None,
            kind: QuestionKind::ShortAnswer {
                correct_answer: "Paris".to_string(),
            },
        }
    }

    fn tf() -> Question {
        Question {
            id: "tf".to_string(),
            prompt: "Sky is blue".to_string(),
            explanation: None,
            kind: QuestionKind::TrueFalse {
                correct_answer: true,
            },
        }
    }

    #[test]
    fn test_true_false_has_two_localized_options() {
        match input_for(&tf(), Locale::Ar) {
            AnswerInput::Choices(options) => {
                assert_eq!(options.len(), 2);
                assert_eq!(options[0].value, "true");
                assert_eq!(options[0].label, "صح");
                assert_eq!(options[1].value, "false");
                assert_eq!(options[1].label, "خطأ");
            }
            AnswerInput::Text => panic!("true/false should render choices"),
        }
    }

    #[test]
    fn test_short_answer_renders_text_input() {
        assert_eq!(input_for(&short(), Locale::En), AnswerInput::Text);
    }

    #[test]
    fn test_choice_selection_replaces_previous() {
        let question = mc();
        let mut renderer = QuestionRenderer::new();
        let mut reported = Vec::new();

        renderer.handle_key(&question, None, key(KeyCode::Char('1')), Locale::En, |id, v| {
            reported.push((id.to_string(), v))
        });
        renderer.handle_key(&question, Some("Red"), key(KeyCode::Char('3')), Locale::En, |id, v| {
            reported.push((id.to_string(), v))
        });

        assert_eq!(
            reported,
            vec![
                ("mc".to_string(), "Red".to_string()),
                ("mc".to_string(), "Blue".to_string())
            ]
        );
        assert_eq!(renderer.highlighted, 2);
    }

    #[test]
    fn test_highlight_then_enter_selects() {
        let question = mc();
        let mut renderer = QuestionRenderer::new();
        let mut selected = None;

        renderer.handle_key(&question, None, key(KeyCode::Down), Locale::En, |_, _| {});
        renderer.handle_key(&question, None, key(KeyCode::Down), Locale::En, |_, _| {});
        renderer.handle_key(&question, None, key(KeyCode::Down), Locale::En, |_, _| {});
        assert_eq!(renderer.highlighted, 2);
        renderer.handle_key(&question, None, key(KeyCode::Up), Locale::En, |_, _| {});
        renderer.handle_key(&question, None, key(KeyCode::Enter), Locale::En, |_, v| {
            selected = Some(v)
        });
        assert_eq!(selected.as_deref(), Some("Green"));
    }

    #[test]
    fn test_out_of_range_digit_ignored() {
        let question = tf();
        let mut renderer = QuestionRenderer::new();
        let mut calls = 0;
        let used = renderer.handle_key(&question, None, key(KeyCode::Char('3')), Locale::En, |_, _| {
            calls += 1
        });
        assert!(!used);
        assert_eq!(calls, 0);
    }

    fn press(
        renderer: &mut QuestionRenderer,
        question: &Question,
        answer: &mut String,
        code: KeyCode,
        locale: Locale,
    ) {
        let current = answer.clone();
        renderer.handle_key(question, Some(&current), key(code), locale, |_, v| *answer = v);
    }

    #[test]
    fn test_every_keystroke_reports_full_text() {
        let question = short();
        let mut renderer = QuestionRenderer::new();
        let mut reports = Vec::new();
        let mut answer = String::new();

        for c in "Pris".chars() {
            let current = answer.clone();
            renderer.handle_key(&question, Some(&current), key(KeyCode::Char(c)), Locale::En, |_, v| {
                reports.push(v.clone());
                answer = v;
            });
        }
        assert_eq!(reports, vec!["P", "Pr", "Pri", "Pris"]);

        // Insert the missing 'a' after "P"
        for _ in 0..3 {
            press(&mut renderer, &question, &mut answer, KeyCode::Left, Locale::En);
        }
        press(&mut renderer, &question, &mut answer, KeyCode::Char('a'), Locale::En);
        assert_eq!(answer, "Paris");
        assert_eq!(renderer.cursor, 2);

        press(&mut renderer, &question, &mut answer, KeyCode::Backspace, Locale::En);
        assert_eq!(answer, "Pris");
        assert_eq!(renderer.cursor, 1);
    }

    #[test]
    fn test_multibyte_text_editing() {
        let question = short();
        let mut renderer = QuestionRenderer::new();
        let mut answer = "باريس".to_string();
        renderer.sync(&question, Some(&answer), Locale::Ar);
        assert_eq!(renderer.cursor, 5);

        press(&mut renderer, &question, &mut answer, KeyCode::Backspace, Locale::Ar);
        assert_eq!(answer, "باري");
        press(&mut renderer, &question, &mut answer, KeyCode::Home, Locale::Ar);
        press(&mut renderer, &question, &mut answer, KeyCode::Delete, Locale::Ar);
        assert_eq!(answer, "اري");
    }

    #[test]
    fn test_sync_highlights_existing_answer() {
        let mut renderer = QuestionRenderer::new();
        renderer.sync(&mc(), Some("Blue"), Locale::En);
        assert_eq!(renderer.highlighted, 2);
        renderer.sync(&tf(), None, Locale::En);
        assert_eq!(renderer.highlighted, 0);
    }

    #[test]
    fn test_control_keys_are_left_to_navigation() {
        let mut renderer = QuestionRenderer::new();
        let used = renderer.handle_key(
            &short(),
            None,
            KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
            Locale::En,
            |_, _| panic!("should not change the answer"),
        );
        assert!(!used);
    }

    #[test]
    fn test_locale_codes() {
        assert_eq!(Locale::from_code("AR"), Some(Locale::Ar));
        assert_eq!(Locale::from_code("en"), Some(Locale::En));
        assert_eq!(Locale::from_code("fr"), None);
    }
}
