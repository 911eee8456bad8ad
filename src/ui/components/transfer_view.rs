//! Dual-pane transfer component.
//!
//! [`TransferUi`] couples two [`SourcedListView`] panes side by side and
//! alternates control between them: [`TransferUi::show`] drives a modal
//! selection round on the focused pane, hands any confirmed selection to the
//! caller's selection hook, then drains a FIFO event queue that the round
//! may have filled. Pane switching, swapping and teardown all flow through
//! that queue, so there is exactly one place where pane state changes.
//!
//! The queue is also part of the public surface: callers push
//! [`UiEvent::SwapPanes`] when they detect both panes showing the same
//! source, or [`UiEvent::ActivityRebuild`] when a long-running operation
//! should tear the UI down to be resumed later.

use std::collections::VecDeque;
use std::rc::Rc;

use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use crate::ui::core::actions::Action;
use crate::ui::core::state::TransferSaveState;
use crate::ui::layout::LayoutManager;

use super::list_view::{Outcome, Selection};
use super::source_view::SourcedListView;

/// Left pane index.
pub const LEFT: usize = 0;
/// Right pane index.
pub const RIGHT: usize = 1;

/// Events processed by the coordinator between selection rounds, in FIFO
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// Leave [`TransferUi::show`].
    Quit,
    /// Exchange the two pane objects and re-run the layout.
    SwapPanes,
    /// Toggle which pane has focus.
    SwitchFocus,
    /// Force both panes to rebuild on their next redraw, then leave
    /// [`TransferUi::show`] so the caller can run the pending operation.
    ActivityRebuild,
}

/// Selection hook: called with every non-empty selection the focused pane
/// confirms.
pub type SelectHook<T> = Rc<dyn Fn(&mut TransferUi<T>, &[Selection])>;
/// Input hook, called with every action after internal handling.
pub type TransferInputHook<T> = Rc<dyn Fn(&mut TransferUi<T>, &Action)>;

pub struct TransferUi<T> {
    panes: [SourcedListView<T>; 2],
    cpane: usize,
    events: VecDeque<UiEvent>,
    fselect: Option<SelectHook<T>>,
    fctxt: Option<TransferInputHook<T>>,
    area: Rect,
    exit: bool,
}

impl<T: 'static> TransferUi<T> {
    pub fn new(map_columns: u16) -> Self {
        Self {
            panes: [
                SourcedListView::new(map_columns),
                SourcedListView::new(map_columns),
            ],
            cpane: LEFT,
            events: VecDeque::new(),
            fselect: None,
            fctxt: None,
            area: Rect::default(),
            exit: true,
        }
    }

    pub fn left(&self) -> &SourcedListView<T> {
        &self.panes[LEFT]
    }

    pub fn left_mut(&mut self) -> &mut SourcedListView<T> {
        &mut self.panes[LEFT]
    }

    pub fn right(&self) -> &SourcedListView<T> {
        &self.panes[RIGHT]
    }

    pub fn right_mut(&mut self) -> &mut SourcedListView<T> {
        &mut self.panes[RIGHT]
    }

    /// The focused pane.
    pub fn cur_pane(&self) -> &SourcedListView<T> {
        &self.panes[self.cpane]
    }

    pub fn cur_pane_mut(&mut self) -> &mut SourcedListView<T> {
        &mut self.panes[self.cpane]
    }

    /// The unfocused pane.
    pub fn other_pane(&self) -> &SourcedListView<T> {
        &self.panes[1 - self.cpane]
    }

    pub fn other_pane_mut(&mut self) -> &mut SourcedListView<T> {
        &mut self.panes[1 - self.cpane]
    }

    /// Index of the focused pane ([`LEFT`] or [`RIGHT`]).
    pub fn focus(&self) -> usize {
        self.cpane
    }

    /// Set the hook receiving confirmed selections.
    pub fn on_select(&mut self, func: impl Fn(&mut TransferUi<T>, &[Selection]) + 'static) {
        self.fselect = Some(Rc::new(func));
    }

    /// Set a handler called with every action after internal handling.
    pub fn on_input(&mut self, func: impl Fn(&mut TransferUi<T>, &Action) + 'static) {
        self.fctxt = Some(Rc::new(func));
    }

    /// Queue an event for processing after the current selection round.
    pub fn push_event(&mut self, event: UiEvent) {
        self.events.push_back(event);
    }

    /// Force both panes to re-materialize on their next redraw.
    pub fn force_rebuild(&mut self, state: bool) {
        for pane in &mut self.panes {
            pane.force_rebuild(state);
        }
    }

    /// Lay both panes out side by side inside `area`.
    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        let (left, right) = LayoutManager::pane_layout(area);
        self.panes[LEFT].resize(left);
        self.panes[RIGHT].resize(right);
    }

    pub fn save_state(&self) -> TransferSaveState {
        TransferSaveState {
            left: self.panes[LEFT].save_state(),
            right: self.panes[RIGHT].save_state(),
            focus: self.cpane,
            initialized: true,
        }
    }

    pub fn load_state(&mut self, state: &TransferSaveState, rebuild: bool) {
        self.panes[LEFT].load_state(&state.left, rebuild);
        self.panes[RIGHT].load_state(&state.right, rebuild);
        self.cpane = state.focus.min(RIGHT);
    }

    /// Run the dual-pane loop until a [`UiEvent::Quit`] or
    /// [`UiEvent::ActivityRebuild`] is processed.
    pub fn show<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.exit = false;
        self.force_rebuild(false);
        while !self.exit {
            let selection = self.pane_select(terminal)?;
            if !selection.is_empty() {
                if let Some(hook) = self.fselect.clone() {
                    hook(self, &selection);
                }
            }
            self.drain_events();
        }
        Ok(())
    }

    /// Apply every queued event in arrival order. [`TransferUi::show`] calls
    /// this between selection rounds; hosts driving the coordinator through
    /// [`TransferUi::handle_action`] call it themselves.
    pub fn drain_events(&mut self) {
        while let Some(event) = self.events.pop_front() {
            self.process(event);
        }
    }

    /// Apply one action: the focused pane handles it first, then the
    /// coordinator raises its own events, then the caller's input hook runs.
    ///
    /// Queued events are not processed here; see [`TransferUi::drain_events`].
    pub fn handle_action(&mut self, action: &Action) -> Outcome {
        let outcome = self.panes[self.cpane].handle_action(action);
        self.intercept(action);
        if let Some(hook) = self.fctxt.clone() {
            hook(self, action);
        }
        outcome
    }

    fn process(&mut self, event: UiEvent) {
        match event {
            UiEvent::Quit => {
                self.exit = true;
            }
            UiEvent::SwapPanes => {
                self.panes.swap(LEFT, RIGHT);
                self.resize(self.area);
            }
            UiEvent::SwitchFocus => {
                self.cpane = 1 - self.cpane;
            }
            UiEvent::ActivityRebuild => {
                self.force_rebuild(true);
                self.exit = true;
            }
        }
    }

    /// One selection round on the focused pane, rendering both panes.
    fn pane_select<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<Vec<Selection>> {
        self.panes[self.cpane].set_active(true);
        self.panes[1 - self.cpane].set_active(false);
        for pane in &mut self.panes {
            if pane.needs_init() {
                pane.rebuild();
            }
        }

        loop {
            terminal.draw(|frame| {
                if self.area.width == 0 || self.area.height == 0 {
                    self.resize(frame.area());
                }
                self.panes[1 - self.cpane].render(frame);
                self.panes[self.cpane].render(frame);
            })?;

            let ev = event::read()?;
            if let Event::Resize(width, height) = ev {
                self.resize(Rect::new(0, 0, width, height));
                continue;
            }
            if self.panes[self.cpane].is_modal() {
                if let Event::Key(key) = ev {
                    if let Outcome::Done(selection) = self.panes[self.cpane].handle_modal_key(key)
                    {
                        return Ok(selection);
                    }
                }
                continue;
            }

            let Some(action) = Action::from_event(&ev) else {
                continue;
            };
            let outcome = self.handle_action(&action);
            if let Outcome::Done(selection) = outcome {
                return Ok(selection);
            }
            if self.panes[self.cpane].suspended() {
                return Ok(Vec::new());
            }
        }
    }

    /// Raise coordinator events from low-level actions before the caller's
    /// own input hook sees them.
    fn intercept(&mut self, action: &Action) {
        match *action {
            Action::Quit => self.events.push_back(UiEvent::Quit),
            Action::SwitchPane => self.switch_focus(),
            Action::PaneLeft => {
                if self.cpane == RIGHT {
                    self.switch_focus();
                }
            }
            Action::PaneRight => {
                if self.cpane == LEFT {
                    self.switch_focus();
                }
            }
            Action::MouseSelect(x, y) => {
                if LayoutManager::contains(self.other_pane().area(), x, y) {
                    self.switch_focus();
                }
            }
            _ => {}
        }
    }

    fn switch_focus(&mut self) {
        self.events.push_back(UiEvent::SwitchFocus);
        self.panes[self.cpane].suspend();
    }
}
