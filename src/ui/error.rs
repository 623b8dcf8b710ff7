use crate::error::FlowError;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::key_span;

pub fn draw_flow_error(f: &mut Frame, error: &FlowError) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let (title, lines) = match error {
        FlowError::QuizNotFound => (
            "Quiz not found",
            vec![Line::from(
                "The selected quiz is missing or incomplete. Pick another one from the menu.",
            )],
        ),
        FlowError::Load(message) => (
            "Could not load questions",
            vec![
                Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(Color::Red),
                )),
                Line::from(""),
                Line::from("Check the quiz files or database and try again."),
            ],
        ),
        other => ("Something went wrong", vec![Line::from(other.to_string())]),
    };

    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(body, chunks[1]);

    let help = Paragraph::new(Line::from(vec![
        key_span("Esc"),
        Span::from(" Back to Menu  "),
        key_span("Ctrl+C"),
        Span::from(" Exit App"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
