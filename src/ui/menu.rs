use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use super::key_span;
use crate::db::attempt::AttemptRecord;
use crate::models::QuizContext;
use crate::timer::format_remaining;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuPanel {
    #[default]
    Quizzes,
    Attempts,
}

pub fn format_attempt_date(timestamp: u64) -> String {
    use std::time::{Duration, UNIX_EPOCH};

    let attempt_time = UNIX_EPOCH + Duration::from_secs(timestamp);
    let datetime: chrono::DateTime<chrono::Local> = attempt_time.into();

    let today = chrono::Local::now().date_naive();
    let attempt_date = datetime.date_naive();

    if attempt_date == today {
        format!("Today {}", datetime.format("%H:%M"))
    } else if attempt_date == today - chrono::Duration::days(1) {
        format!("Yesterday {}", datetime.format("%H:%M"))
    } else {
        attempt_date.format("%Y-%m-%d").to_string()
    }
}

fn format_quiz_item(quiz: &QuizContext) -> String {
    format!(
        "Grade {} · {} · {} - {} ({}, {})",
        quiz.grade,
        quiz.subject,
        quiz.chapter,
        quiz.quiz.title,
        quiz.quiz.difficulty,
        format_remaining(quiz.quiz.duration.saturating_mul(60)),
    )
}

fn format_attempt_item(attempt: &AttemptRecord) -> String {
    format!(
        "{} - {} {}% ({}/{}){}",
        format_attempt_date(attempt.completed_at),
        attempt.quiz_title,
        attempt.score,
        attempt.correct_count,
        attempt.total_questions,
        if attempt.timed_out { " time up" } else { "" }
    )
}

fn draw_panel_header(area: Rect, title: &str, focused: bool, f: &mut Frame) {
    let style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let header = Paragraph::new(title)
        .style(style)
        .alignment(Alignment::Left)
        .block(Block::default());

    f.render_widget(header, area);
}

fn panel_list<'a>(items: Vec<ListItem<'a>>, focused: bool) -> List<'a> {
    List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if focused {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::DarkGray)
                }),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
}

fn placeholder(text: &str) -> ListItem<'_> {
    ListItem::new(text).style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )
}

#[allow(clippy::too_many_arguments)]
pub fn draw_menu(
    f: &mut Frame,
    quizzes: &[QuizContext],
    selected_quiz_index: usize,
    attempts: &[AttemptRecord],
    selected_attempt_index: usize,
    focused_panel: MenuPanel,
    source_label: &str,
    status: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Interactive Quizzes v0.1.0")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let quiz_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(chunks[1]);
    let attempt_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(chunks[2]);

    let quizzes_focused = focused_panel == MenuPanel::Quizzes;
    draw_panel_header(quiz_chunks[0], "[1] Quizzes", quizzes_focused, f);

    let quiz_items: Vec<ListItem> = if quizzes.is_empty() {
        vec![placeholder("No quizzes found")]
    } else {
        quizzes
            .iter()
            .enumerate()
            .map(|(i, quiz)| {
                let style = if i == selected_quiz_index && quizzes_focused {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(format_quiz_item(quiz)).style(style)
            })
            .collect()
    };
    f.render_widget(panel_list(quiz_items, quizzes_focused), quiz_chunks[1]);

    let attempts_focused = focused_panel == MenuPanel::Attempts;
    draw_panel_header(
        attempt_chunks[0],
        "[2] Recent Attempts",
        attempts_focused,
        f,
    );

    let attempt_items: Vec<ListItem> = if attempts.is_empty() {
        vec![placeholder("No attempts yet")]
    } else {
        attempts
            .iter()
            .enumerate()
            .map(|(i, attempt)| {
                let style = if i == selected_attempt_index && attempts_focused {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(format_attempt_item(attempt)).style(style)
            })
            .collect()
    };
    f.render_widget(panel_list(attempt_items, attempts_focused), attempt_chunks[1]);

    let footer_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(chunks[3]);

    let (status_text, status_color) = match status {
        Some(message) => (message.to_string(), Color::Red),
        None => (format!("Source: {}", source_label), Color::Green),
    };
    let status_widget = Paragraph::new(status_text)
        .style(
            Style::default()
                .fg(status_color)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status_widget, footer_chunks[0]);

    let help_text = vec![Line::from(vec![
        key_span("1/2"),
        Span::from(" Focus Panel  "),
        key_span("↑/↓"),
        Span::from(" Navigate  "),
        key_span("Enter"),
        Span::from(" Open Quiz  "),
        key_span("Esc/Ctrl+C"),
        Span::from(" Quit"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, footer_chunks[1]);
}
