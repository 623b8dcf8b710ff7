use crate::flow::QuizFlow;
use crate::results::{Outcome, QuestionOutcome, QuizResult, calculate_results};
use crate::ui::layout::calculate_summary_chunks;
use crate::utils::truncate_string;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::key_span;

fn outcome_mark(outcome: Outcome) -> Span<'static> {
    match outcome {
        Outcome::Correct => Span::styled("[✓]", Style::default().fg(Color::Green)),
        Outcome::Incorrect => Span::styled("[✗]", Style::default().fg(Color::Red)),
        Outcome::Unanswered => Span::styled("[ ]", Style::default().fg(Color::DarkGray)),
    }
}

fn score_text(result: &QuizResult, timed_out: bool) -> Text<'static> {
    let mut text = Text::default();
    let score_color = match result.score {
        80.. => Color::Green,
        50..=79 => Color::Yellow,
        _ => Color::Red,
    };
    text.push_line(Line::from(vec![
        Span::styled("Score: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("{}%", result.score),
            Style::default()
                .fg(score_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(format!(
            "  ({} of {} correct)",
            result.correct_count, result.total_questions
        )),
    ]));
    text.push_line(Line::from(vec![
        Span::styled("Accuracy: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::from(format!(
            "{}%  ({} of {} answered)",
            result.accuracy, result.correct_count, result.answered_count
        )),
    ]));
    text.push_line(Line::from(format!(
        "Incorrect: {}  Unanswered: {}",
        result.incorrect_count(),
        result.unanswered_count()
    )));
    if timed_out {
        text.push_line(Line::from(Span::styled(
            "Time ran out. The quiz was submitted automatically.",
            Style::default().fg(Color::Yellow),
        )));
    }
    text
}

/// One block per question; incorrect and unanswered ones carry the correct
/// answer and the explanation.
fn review_lines(outcomes: &[QuestionOutcome]) -> Text<'static> {
    let mut text = Text::default();
    for (i, outcome) in outcomes.iter().enumerate() {
        text.push_line(Line::from(vec![
            outcome_mark(outcome.outcome),
            Span::from(format!(" {}. {}", i + 1, truncate_string(&outcome.prompt, 70))),
        ]));
        if let Some(given) = &outcome.given_answer {
            text.push_line(Line::from(format!(
                "   Your Answer: {}",
                truncate_string(given, 66)
            )));
        }
        if let Some(correct) = &outcome.correct_answer {
            text.push_line(Line::from(Span::styled(
                format!("   Correct Answer: {}", correct),
                Style::default().fg(Color::Green),
            )));
        }
        if let Some(explanation) = &outcome.explanation {
            text.push_line(Line::from(Span::styled(
                format!("   {}", explanation),
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
        text.push_line(Line::from(""));
    }
    text
}

pub fn draw_summary(f: &mut Frame, flow: &QuizFlow, scroll: u16) {
    let layout = calculate_summary_chunks(f.area());
    let result = flow
        .results()
        .unwrap_or_else(|| calculate_results(flow.questions(), flow.answers()));

    let title = Paragraph::new(format!("Results - {}", flow.context().quiz.title))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.header_area);

    let score = Paragraph::new(score_text(&result, flow.completed_by_timeout()))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(score, layout.score_area);

    let review = Paragraph::new(review_lines(&result.outcomes))
        .wrap(Wrap { trim: true })
        .scroll((scroll, 0))
        .block(Block::default().borders(Borders::ALL).title("Review"));
    f.render_widget(review, layout.content_area);

    let help_text = vec![Line::from(vec![
        key_span("r"),
        Span::from(" Retry  "),
        key_span("↑/↓"),
        Span::from(" Scroll  "),
        key_span("m"),
        Span::from(" Main Menu  "),
        key_span("Ctrl+C"),
        Span::from(" Exit App"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.footer_area);
}
