use crate::flow::QuizFlow;
use crate::timer::format_remaining;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::key_span;

pub fn draw_intro(f: &mut Frame, flow: &QuizFlow) {
    let context = flow.context();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new(context.quiz.title.as_str())
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let label = Style::default().add_modifier(Modifier::BOLD);
    let mut text = Text::default();
    if !context.quiz.description.is_empty() {
        text.push_line(Line::from(context.quiz.description.as_str()));
        text.push_line(Line::from(""));
    }
    text.push_line(Line::from(vec![
        Span::styled("Subject: ", label),
        Span::from(context.subject.as_str()),
    ]));
    text.push_line(Line::from(vec![
        Span::styled("Chapter: ", label),
        Span::from(context.chapter.as_str()),
    ]));
    text.push_line(Line::from(vec![
        Span::styled("Grade: ", label),
        Span::from(context.grade.as_str()),
    ]));
    text.push_line(Line::from(vec![
        Span::styled("Difficulty: ", label),
        Span::from(context.quiz.difficulty.to_string()),
    ]));
    text.push_line(Line::from(vec![
        Span::styled("Questions: ", label),
        Span::from(flow.questions().len().to_string()),
    ]));
    text.push_line(Line::from(vec![
        Span::styled("Time limit: ", label),
        Span::from(format_remaining(flow.remaining_secs())),
    ]));
    text.push_line(Line::from(""));
    text.push_line(Line::from(Span::styled(
        "The timer starts as soon as you begin. When it runs out the quiz is submitted for you.",
        Style::default().fg(Color::Yellow),
    )));

    let details = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("About this quiz"));
    f.render_widget(details, chunks[1]);

    let help = Paragraph::new(Line::from(vec![
        key_span("Enter"),
        Span::from(" Start Quiz  "),
        key_span("Esc"),
        Span::from(" Back to Menu  "),
        key_span("Ctrl+C"),
        Span::from(" Exit App"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
