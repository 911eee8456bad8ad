//! The closed set of input actions the widgets consume, plus the default
//! key and mouse bindings that produce them.
//!
//! Hosts that need different bindings can bypass [`Action::from_event`] and
//! feed actions straight into the widgets' `handle_action` methods.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};

/// User intents understood by the list, source and transfer widgets.
///
/// Mouse variants carry absolute terminal coordinates; the widgets hit-test
/// them against their own areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Cursor movement
    Up,
    Down,
    PageUp,
    PageDown,

    // Selection
    Select,
    SelectPartial,
    SelectWhole,
    SelectAll,

    // List control
    Sort,
    Filter,
    ResetFilter,
    Quit,

    // Mouse
    MouseSelect(u16, u16),
    MouseMove(u16, u16),

    // Pane control (consumed by the transfer UI)
    SwitchPane,
    PaneLeft,
    PaneRight,

    // Source control (consumed by sourced lists)
    CycleSources,
    NextSlot,
    PrevSlot,
    /// Jump directly to a source slot by index
    Source(usize),
}

impl Action {
    /// Map a terminal event to an action using the default bindings.
    ///
    /// Returns `None` for events with no binding (including key releases).
    pub fn from_event(event: &Event) -> Option<Action> {
        match event {
            Event::Key(key) => Self::from_key(*key),
            Event::Mouse(mouse) => Self::from_mouse(*mouse),
            _ => None,
        }
    }

    fn from_key(key: KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::Down),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::Enter => Some(Action::Select),
            KeyCode::Char('p') => Some(Action::SelectPartial),
            KeyCode::Char('w') => Some(Action::SelectWhole),
            KeyCode::Char('A') => Some(Action::SelectAll),
            KeyCode::Char('s') => Some(Action::Sort),
            KeyCode::Char('/') | KeyCode::Char('f') => Some(Action::Filter),
            KeyCode::Char('r') => Some(Action::ResetFilter),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Tab => Some(Action::SwitchPane),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::PaneLeft),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::PaneRight),
            KeyCode::Char('c') => Some(Action::CycleSources),
            KeyCode::Char(']') => Some(Action::NextSlot),
            KeyCode::Char('[') => Some(Action::PrevSlot),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                Some(Action::Source(c as usize - '0' as usize))
            }
            _ => None,
        }
    }

    fn from_mouse(mouse: MouseEvent) -> Option<Action> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                Some(Action::MouseSelect(mouse.column, mouse.row))
            }
            MouseEventKind::Moved => Some(Action::MouseMove(mouse.column, mouse.row)),
            MouseEventKind::ScrollUp => Some(Action::PageUp),
            MouseEventKind::ScrollDown => Some(Action::PageDown),
            _ => None,
        }
    }
}
