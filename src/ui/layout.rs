use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Columns taken by one question indicator, including the gap after it.
pub const INDICATOR_WIDTH: u16 = 5;
/// Rows of indicators inside the progress panel.
pub const INDICATOR_ROWS: u16 = 2;

pub struct QuizLayout {
    pub header_area: Rect,
    pub question_area: Rect,
    pub answer_area: Rect,
    pub progress_area: Rect,
    pub help_area: Rect,
}

pub struct SummaryLayout {
    pub header_area: Rect,
    pub score_area: Rect,
    pub content_area: Rect,
    pub footer_area: Rect,
}

pub fn calculate_quiz_chunks(area: Rect) -> QuizLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Percentage(40),
            Constraint::Length(6),
            Constraint::Length(4),
        ])
        .split(area);

    QuizLayout {
        header_area: chunks[0],
        question_area: chunks[1],
        answer_area: chunks[2],
        progress_area: chunks[3],
        help_area: chunks[4],
    }
}

pub fn calculate_summary_chunks(area: Rect) -> SummaryLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    SummaryLayout {
        header_area: chunks[0],
        score_area: chunks[1],
        content_area: chunks[2],
        footer_area: chunks[3],
    }
}

/// Inside of the progress panel border.
fn progress_inner(progress_area: Rect) -> Rect {
    Rect {
        x: progress_area.x.saturating_add(1),
        y: progress_area.y.saturating_add(1),
        width: progress_area.width.saturating_sub(2),
        height: progress_area.height.saturating_sub(2),
    }
}

/// Row of the progress gauge.
pub fn gauge_area(progress_area: Rect) -> Rect {
    let inner = progress_inner(progress_area);
    Rect {
        height: inner.height.min(1),
        ..inner
    }
}

/// Rows holding the question indicators, below the gauge.
pub fn indicators_area(progress_area: Rect) -> Rect {
    let inner = progress_inner(progress_area);
    Rect {
        x: inner.x,
        y: inner.y.saturating_add(1),
        width: inner.width,
        height: inner.height.saturating_sub(1).min(INDICATOR_ROWS),
    }
}

/// Row for the unanswered warning or a notice.
pub fn warning_area(progress_area: Rect) -> Rect {
    let inner = progress_inner(progress_area);
    let offset = 1 + INDICATOR_ROWS;
    Rect {
        x: inner.x,
        y: inner.y.saturating_add(offset),
        width: inner.width,
        height: inner.height.saturating_sub(offset).min(1),
    }
}

pub fn indicators_per_row(progress_area: Rect) -> usize {
    (indicators_area(progress_area).width / INDICATOR_WIDTH).max(1) as usize
}

/// How many indicators fit in the panel.
pub fn indicator_capacity(progress_area: Rect) -> usize {
    indicators_per_row(progress_area) * indicators_area(progress_area).height as usize
}

/// First question shown in the indicator rows. Indicators are paged so the
/// page holding `current` is the one on screen.
pub fn indicator_window_start(progress_area: Rect, current: usize) -> usize {
    match indicator_capacity(progress_area) {
        0 => 0,
        capacity => current / capacity * capacity,
    }
}

/// Top-left cell of the indicator in `slot`, counted from the window start.
pub fn indicator_position(progress_area: Rect, slot: usize) -> (u16, u16) {
    let area = indicators_area(progress_area);
    let per_row = indicators_per_row(progress_area);
    let col = area.x + (slot % per_row) as u16 * INDICATOR_WIDTH;
    let row = area.y + (slot / per_row) as u16;
    (col, row)
}

/// Maps a mouse position to the question whose indicator is under it, given
/// the page that holds `current`.
pub fn indicator_at(
    progress_area: Rect,
    total: usize,
    current: usize,
    column: u16,
    row: u16,
) -> Option<usize> {
    let area = indicators_area(progress_area);
    if column < area.x
        || row < area.y
        || column >= area.x + area.width
        || row >= area.y + area.height
    {
        return None;
    }

    let offset = column - area.x;
    // The last column of each cell is the gap
    if offset % INDICATOR_WIDTH == INDICATOR_WIDTH - 1 {
        return None;
    }

    let per_row = indicators_per_row(progress_area);
    let col_index = (offset / INDICATOR_WIDTH) as usize;
    if col_index >= per_row {
        return None;
    }
    let slot = (row - area.y) as usize * per_row + col_index;
    let index = indicator_window_start(progress_area, current) + slot;
    (index < total).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_layout() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = calculate_quiz_chunks(area);

        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.progress_area.height, 6);
        assert_eq!(layout.help_area.height, 4);
        assert!(layout.answer_area.height > 0);
        assert!(layout.question_area.height >= 3);
    }

    #[test]
    fn test_summary_layout() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = calculate_summary_chunks(area);

        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.score_area.height, 6);
        assert_eq!(layout.footer_area.height, 3);
        // 38 after margins, minus the fixed rows
        assert_eq!(layout.content_area.height, 38 - 12);
    }

    #[test]
    fn test_progress_panel_rows() {
        let progress = Rect::new(0, 10, 42, 6);
        assert_eq!(gauge_area(progress), Rect::new(1, 11, 40, 1));
        assert_eq!(indicators_area(progress), Rect::new(1, 12, 40, 2));
        assert_eq!(warning_area(progress), Rect::new(1, 14, 40, 1));
        assert_eq!(indicators_per_row(progress), 8);
        assert_eq!(indicator_capacity(progress), 16);
    }

    #[test]
    fn test_indicator_hit_testing() {
        let progress = Rect::new(0, 10, 42, 6);

        for index in [0, 3, 7, 8, 12] {
            let (col, row) = indicator_position(progress, index);
            assert_eq!(indicator_at(progress, 13, 0, col, row), Some(index));
            assert_eq!(indicator_at(progress, 13, 0, col + 3, row), Some(index));
        }

        // Gap between cells
        let (col, row) = indicator_position(progress, 0);
        assert_eq!(indicator_at(progress, 13, 0, col + 4, row), None);
        // Past the last question
        let (col, row) = indicator_position(progress, 13);
        assert_eq!(indicator_at(progress, 13, 0, col, row), None);
        // Gauge row
        assert_eq!(indicator_at(progress, 13, 0, 1, 11), None);
    }

    #[test]
    fn test_tiny_area_does_not_panic() {
        let progress = Rect::new(0, 0, 1, 1);
        assert_eq!(indicators_per_row(progress), 1);
        assert_eq!(indicator_at(progress, 5, 0, 0, 0), None);
        assert_eq!(indicator_window_start(progress, 3), 0);
    }

    #[test]
    fn test_indicator_pages_follow_current() {
        // 8 per row, 2 rows
        let progress = Rect::new(0, 10, 42, 6);
        assert_eq!(indicator_window_start(progress, 0), 0);
        assert_eq!(indicator_window_start(progress, 15), 0);
        assert_eq!(indicator_window_start(progress, 16), 16);
        assert_eq!(indicator_window_start(progress, 35), 32);

        // On the third page the first slot is question 33
        let (col, row) = indicator_position(progress, 0);
        assert_eq!(indicator_at(progress, 40, 35, col, row), Some(32));
        let (col, row) = indicator_position(progress, 3);
        assert_eq!(indicator_at(progress, 40, 35, col, row), Some(35));
        // Slots past the last question stay empty
        let (col, row) = indicator_position(progress, 8);
        assert_eq!(indicator_at(progress, 40, 35, col, row), None);
    }
}
