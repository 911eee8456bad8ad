//! Layout management and calculations

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Manages layout calculations and constraints for the widgets
pub struct LayoutManager;

impl LayoutManager {
    /// Split an area into the two side-by-side pane rectangles
    #[must_use]
    pub fn pane_layout(area: Rect) -> (Rect, Rect) {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        (halves[0], halves[1])
    }

    /// Split a pane into the source map strip on top and the list below.
    ///
    /// `map_rows` is the number of icon rows in the map (not counting the
    /// strip's borders).
    #[must_use]
    pub fn source_pane_layout(area: Rect, map_rows: u16) -> (Rect, Rect) {
        let strip_height = (map_rows + 2).min(area.height);
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(strip_height), Constraint::Min(0)])
            .split(area);
        (parts[0], parts[1])
    }

    /// Calculate a centered rectangle with percentage width and fixed line height
    #[must_use]
    pub fn centered_rect_lines(percent_x: u16, height_lines: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(height_lines),
                Constraint::Min(0),
            ])
            .split(r);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }

    /// Check whether an absolute terminal coordinate falls inside a rectangle
    #[must_use]
    pub fn contains(area: Rect, x: u16, y: u16) -> bool {
        x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
    }
}
