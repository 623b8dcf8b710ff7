mod error;
mod intro;
pub mod layout;
mod menu;
mod question;
mod quiz;
mod summary;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

pub use error::draw_flow_error;
pub use intro::draw_intro;
pub use layout::{calculate_quiz_chunks, calculate_summary_chunks};
pub use menu::{MenuPanel, draw_menu, format_attempt_date};
pub use question::answer_text;
pub use quiz::{draw_quit_confirmation, draw_quiz, draw_quiz_screen};
pub use summary::draw_summary;

/// Cyan bold key name used in the help lines.
fn key_span(key: &str) -> Span<'static> {
    Span::styled(
        key.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}
