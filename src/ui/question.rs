use crate::models::Question;
use crate::renderer::{AnswerInput, Locale, QuestionRenderer, input_for};
use crate::utils::calculate_wrapped_cursor_position;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

const PLACEHOLDER: &str = "[Type your answer here...]";

fn kind_title(question: &Question) -> &'static str {
    match question.type_name() {
        "multiple_choice" => "Multiple Choice",
        "true_false" => "True / False",
        _ => "Short Answer",
    }
}

/// Answer widget content: the choice list with the selection marked, or the
/// typed text.
pub fn answer_text(
    question: &Question,
    answer: Option<&str>,
    renderer: &QuestionRenderer,
    locale: Locale,
) -> Text<'static> {
    match input_for(question, locale) {
        AnswerInput::Choices(options) => {
            let mut text = Text::default();
            for (i, option) in options.iter().enumerate() {
                let selected = answer == Some(option.value.as_str());
                let highlighted = i == renderer.highlighted;
                let marker = if selected { "(•)" } else { "( )" };
                let pointer = if highlighted { ">" } else { " " };

                let style = if selected {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else if highlighted {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                text.push_line(Line::from(Span::styled(
                    format!("{} {} {}. {}", pointer, marker, i + 1, option.label),
                    style,
                )));
            }
            text
        }
        AnswerInput::Text => match answer {
            Some(value) if !value.is_empty() => Text::from(value.to_string()),
            _ => Text::from(Span::styled(
                PLACEHOLDER,
                Style::default().fg(Color::DarkGray),
            )),
        },
    }
}

pub(crate) fn draw_question(
    f: &mut Frame,
    question_area: Rect,
    answer_area: Rect,
    question: &Question,
    answer: Option<&str>,
    renderer: &QuestionRenderer,
    locale: Locale,
) {
    let prompt = Paragraph::new(question.prompt.as_str())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(kind_title(question)),
        );
    f.render_widget(prompt, question_area);

    let content = answer_text(question, answer, renderer, locale);
    let is_text = matches!(input_for(question, locale), AnswerInput::Text);

    let text_width = answer_area.width.saturating_sub(2) as usize;
    let visible_height = answer_area.height.saturating_sub(2) as usize;
    let (cursor_line, cursor_col) = if is_text {
        calculate_wrapped_cursor_position(answer.unwrap_or(""), renderer.cursor, text_width.max(1))
    } else {
        (0, 0)
    };
    let scroll_y = if visible_height > 0 && cursor_line >= visible_height {
        (cursor_line + 1 - visible_height) as u16
    } else {
        0
    };

    let answer_widget = Paragraph::new(content)
        .wrap(Wrap { trim: true })
        .scroll((scroll_y, 0))
        .block(Block::default().borders(Borders::ALL).title("Your Answer"));
    f.render_widget(answer_widget, answer_area);

    if is_text && visible_height > 0 {
        let cursor_x = answer_area.x + 1 + cursor_col as u16;
        let cursor_y = answer_area.y + 1 + (cursor_line as u16).saturating_sub(scroll_y);
        f.set_cursor_position((cursor_x, cursor_y));
    }
}
