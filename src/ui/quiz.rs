use crate::flow::QuizFlow;
use crate::models::Phase;
use crate::navigation::{ForwardAction, IndicatorState, NavigationPanel};
use crate::session::{FlowScreen, QuizScreen};
use crate::timer::format_remaining;
use crate::ui::layout::{
    INDICATOR_WIDTH, calculate_quiz_chunks, gauge_area, indicator_capacity, indicator_position,
    indicator_window_start, indicators_area, warning_area,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use super::key_span;
use super::question::draw_question;

/// Seconds left below which the clock turns red.
const LOW_TIME_SECS: u32 = 60;

/// Draws whichever part of the quiz flow is current.
pub fn draw_quiz_screen(f: &mut Frame, screen: &QuizScreen) {
    match &screen.screen {
        FlowScreen::Failed(error) => super::draw_flow_error(f, error),
        FlowScreen::Ready(flow) => match flow.phase() {
            Phase::Intro => super::draw_intro(f, flow),
            Phase::Active => draw_quiz(f, flow, screen),
            Phase::Completed => super::draw_summary(f, flow, screen.summary_scroll),
        },
    }
}

pub fn draw_quiz(f: &mut Frame, flow: &QuizFlow, screen: &QuizScreen) {
    let layout = calculate_quiz_chunks(f.area());
    let nav = flow.navigation();

    draw_header(f, layout.header_area, flow);

    match flow.current_question() {
        Some(question) => draw_question(
            f,
            layout.question_area,
            layout.answer_area,
            question,
            flow.current_answer(),
            &screen.renderer,
            screen.locale,
        ),
        None => {
            let empty = Paragraph::new("This quiz has no questions. Press Ctrl+S to finish.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(empty, layout.question_area);
        }
    }

    draw_progress(f, layout.progress_area, &nav, screen);
    draw_help(f, layout.help_area, &nav);
}

fn draw_header(f: &mut Frame, area: Rect, flow: &QuizFlow) {
    let total = flow.questions().len();
    let position = if total == 0 {
        0
    } else {
        flow.current_index() + 1
    };
    let title = format!(
        "Question {} / {} - {}",
        position,
        total,
        flow.context().quiz.title
    );

    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(12)])
        .split(inner);

    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(header, columns[0]);

    let remaining = flow.remaining_secs();
    let clock_color = if remaining <= LOW_TIME_SECS {
        Color::Red
    } else {
        Color::Green
    };
    let clock = Paragraph::new(format!("⏱ {}", format_remaining(remaining)))
        .style(
            Style::default()
                .fg(clock_color)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Right);
    f.render_widget(clock, columns[1]);
}

fn indicator_style(state: IndicatorState) -> Style {
    match state {
        IndicatorState::Current => Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        IndicatorState::Answered => Style::default().fg(Color::Black).bg(Color::Green),
        IndicatorState::Unanswered => Style::default().fg(Color::White).bg(Color::DarkGray),
    }
}

fn draw_progress(f: &mut Frame, area: Rect, nav: &NavigationPanel, screen: &QuizScreen) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(nav.counter_label());
    f.render_widget(block, area);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
        .ratio(nav.ratio().clamp(0.0, 1.0))
        .label(format!("{:.0}%", nav.ratio() * 100.0));
    f.render_widget(gauge, gauge_area(area));

    let rows = indicators_area(area);
    let cell_width = INDICATOR_WIDTH.saturating_sub(1);
    let start = indicator_window_start(area, nav.current_index);
    let shown = nav.indicators.iter().skip(start).take(indicator_capacity(area));
    for (slot, indicator) in shown.enumerate() {
        let (x, y) = indicator_position(area, slot);
        if x + cell_width > rows.x + rows.width || y >= rows.y + rows.height {
            continue;
        }
        let cell = Paragraph::new(format!("{:^width$}", indicator.index + 1, width = cell_width as usize))
            .style(indicator_style(indicator.state()));
        f.render_widget(cell, Rect::new(x, y, cell_width, 1));
    }

    let status = if let Some(buffer) = &screen.jump_input {
        Line::from(vec![
            Span::styled(
                "Go to question: ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::from(buffer.clone()),
            Span::styled("_", Style::default().fg(Color::Cyan)),
        ])
    } else if let Some(notice) = &screen.notice {
        Line::from(Span::styled(notice.clone(), Style::default().fg(Color::Yellow)))
    } else if let Some(unanswered) = nav.unanswered_warning {
        Line::from(Span::styled(
            format!(
                "{} question{} still unanswered. You can submit anyway.",
                unanswered,
                if unanswered == 1 { " is" } else { "s are" }
            ),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(status), warning_area(area));
}

fn draw_help(f: &mut Frame, area: Rect, nav: &NavigationPanel) {
    let mut nav_spans = Vec::new();
    if nav.can_go_previous {
        nav_spans.extend([key_span("Shift+Tab"), Span::from(" Previous  ")]);
    }
    match nav.forward {
        ForwardAction::Next => nav_spans.extend([key_span("Tab"), Span::from(" Next  ")]),
        ForwardAction::Submit => nav_spans.extend([
            Span::styled(
                "Ctrl+S",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::from(" Submit  "),
        ]),
    }
    nav_spans.extend([
        key_span("↑/↓"),
        Span::from(" Choose  "),
        key_span("1-9"),
        Span::from(" Pick Option"),
    ]);

    let ctrl_spans = vec![
        key_span("Ctrl+G"),
        Span::from(" Go to Question  "),
        key_span("Esc"),
        Span::from(" Quit to Menu  "),
        key_span("Ctrl+C"),
        Span::from(" Exit App"),
    ];

    let help = Paragraph::new(vec![Line::from(nav_spans), Line::from(ctrl_spans)])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

pub fn draw_quit_confirmation(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Quit to Menu")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new(vec![
        Line::from("Return to main menu?"),
        Line::from(""),
        Line::from("Your answers and the remaining time will be lost."),
    ])
    .style(Style::default().fg(Color::White))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Yes (Return to Menu)  "),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::from(" No (Continue Quiz)  "),
        key_span("Ctrl+C"),
        Span::from(" Exit App"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
