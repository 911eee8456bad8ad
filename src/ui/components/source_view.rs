//! Multi-source list component.
//!
//! [`SourcedListView`] wraps a [`ListView`] and lets the user switch the
//! underlying data between registered sources. Sources are grouped into
//! slots: a slot holds one or more alternative bindings for the same
//! conceptual location, distinguished by a one-character icon, each with its
//! own availability predicate. Exactly one icon per slot is current at a
//! time.
//!
//! Switching source *materializes* it: the bound producer is invoked and its
//! snapshot replaces the wrapped list's buffer wholesale, so the displayed
//! collection is always a point-in-time copy and never a live view into
//! caller state.
//!
//! A small map of the registered slots is rendered in a strip above the
//! list, with the current source's label and one icon cell per slot.

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included, Unbounded};
use std::rc::Rc;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent};
use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};

use crate::constants::ICON_CELL_WIDTH;
use crate::ui::core::actions::Action;
use crate::ui::core::state::ListSaveState;
use crate::ui::layout::LayoutManager;

use super::list_view::{ListView, Outcome, Selection};

/// Label printer for a source.
pub type SourceLabelFn = Rc<dyn Fn() -> String>;
/// Data producer: invoked on demand to materialize a fresh snapshot.
pub type SourceFn<T> = Rc<dyn Fn() -> Vec<T>>;
/// Availability predicate, re-evaluated on every lookup; must be cheap.
pub type SourceAvailFn = Rc<dyn Fn() -> bool>;
/// Extra-decoration hook.
pub type SourceDrawHook<T> = Rc<dyn Fn(&SourcedListView<T>, &mut Frame<'_>)>;
/// Input hook, called with every action after internal handling.
pub type SourceInputHook<T> = Rc<dyn Fn(&mut SourcedListView<T>, &Action)>;

/// One data-source binding within a slot.
pub struct SourceEntry<T> {
    pub label: SourceLabelFn,
    pub icon: char,
    pub supply: SourceFn<T>,
    pub available: SourceAvailFn,
}

impl<T> SourceEntry<T> {
    pub fn new(
        icon: char,
        label: impl Fn() -> String + 'static,
        supply: impl Fn() -> Vec<T> + 'static,
        available: impl Fn() -> bool + 'static,
    ) -> Self {
        Self {
            label: Rc::new(label),
            icon,
            supply: Rc::new(supply),
            available: Rc::new(available),
        }
    }
}

/// Identity of a source binding: slot, icon and current availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRef {
    pub slot: usize,
    pub icon: char,
    pub available: bool,
}

impl SourceRef {
    /// Whether two refs point at the same binding, ignoring availability.
    pub fn same_binding(&self, other: &SourceRef) -> bool {
        self.slot == other.slot && self.icon == other.icon
    }
}

struct Slot<T> {
    current: char,
    entries: BTreeMap<char, SourceEntry<T>>,
}

pub struct SourcedListView<T> {
    list: ListView<T>,
    sources: BTreeMap<usize, Slot<T>>,
    cslot: usize,
    // mouse-highlighted slot in the map strip
    hslot: Option<usize>,
    prev: Option<SourceRef>,
    map_columns: u16,
    area: Rect,
    map_area: Rect,
    slot_cells: Vec<(Rect, usize)>,
    fdraw: Option<SourceDrawHook<T>>,
    fctxt: Option<SourceInputHook<T>>,
    needs_init: bool,
    force_rebuild: bool,
}

impl<T: 'static> SourcedListView<T> {
    pub fn new(map_columns: u16) -> Self {
        Self {
            list: ListView::new(),
            sources: BTreeMap::new(),
            cslot: 0,
            hslot: None,
            prev: None,
            map_columns: map_columns.max(1),
            area: Rect::default(),
            map_area: Rect::default(),
            slot_cells: Vec::new(),
            fdraw: None,
            fctxt: None,
            needs_init: true,
            force_rebuild: false,
        }
    }

    /// The wrapped list, for configuring columns, sorters, hooks and for
    /// resolving selections.
    pub fn list(&self) -> &ListView<T> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView<T> {
        &mut self.list
    }

    /// Bind a source to a slot, replacing any binding with the same icon.
    /// The first binding added to a new slot becomes that slot's current
    /// icon.
    pub fn add_source(&mut self, slot: usize, source: SourceEntry<T>) {
        let icon = source.icon;
        let slot_entry = self.sources.entry(slot).or_insert_with(|| Slot {
            current: icon,
            entries: BTreeMap::new(),
        });
        slot_entry.entries.insert(icon, source);
    }

    /// Make a slot's source current.
    ///
    /// With `icon` unset the slot's remembered icon is requested. If the
    /// requested binding is missing or unavailable, the slot is searched
    /// cyclically for the first available icon. When nothing in the slot is
    /// available and `fallthrough` is set, the materialized buffer is
    /// emptied so the list shows a well-defined "nothing here" state.
    ///
    /// Returns whether an available source was actually set.
    pub fn set_source(
        &mut self,
        slot: usize,
        icon: Option<char>,
        fallthrough: bool,
        rebuild: bool,
    ) -> bool {
        let Some(slot_entry) = self.sources.get(&slot) else {
            if fallthrough {
                self.list.rebuild(Some(Vec::new()));
            }
            return false;
        };
        let requested = icon.unwrap_or(slot_entry.current);
        let valid = slot_entry
            .entries
            .get(&requested)
            .is_some_and(|entry| (entry.available)());
        let target = if valid {
            Some(requested)
        } else {
            // requested icon is not usable: take the first available one
            let first = slot_entry.entries.keys().next().copied();
            first.and_then(|start| self.cycle_icons(slot, Some(start)))
        };

        if let Some(target) = target {
            self.prev = self.current_ref();
            if let Some(slot_entry) = self.sources.get_mut(&slot) {
                slot_entry.current = target;
            }
            self.cslot = slot;
            log::debug!("source set to slot {slot} icon '{target}'");
            if rebuild {
                self.materialize();
            }
            return true;
        }

        if fallthrough {
            self.list.rebuild(Some(Vec::new()));
        }
        false
    }

    /// The current source binding, if any sources are registered.
    pub fn get_source(&self) -> Option<SourceRef> {
        self.current_ref()
    }

    /// The binding that was current before the last successful switch.
    pub fn get_source_prev(&self) -> Option<SourceRef> {
        self.prev
    }

    /// Re-materialize the current slot and rebuild the wrapped list.
    pub fn rebuild(&mut self) {
        self.needs_init = false;
        self.set_source(self.cslot, None, true, true);
    }

    /// Run the modal input loop on this pane alone.
    pub fn select<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<Vec<Selection>> {
        self.list.set_active(true);
        if self.needs_init {
            self.rebuild();
        }

        loop {
            terminal.draw(|frame| {
                if self.area.width == 0 || self.area.height == 0 {
                    self.resize(frame.area());
                }
                self.render(frame);
            })?;

            let ev = event::read()?;
            if let Event::Resize(width, height) = ev {
                self.resize(Rect::new(0, 0, width, height));
                continue;
            }
            if self.list.is_modal() {
                if let Event::Key(key) = ev {
                    if let Outcome::Done(selection) = self.handle_modal_key(key) {
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
            if let Some(hook) = self.fctxt.clone() {
                hook(self, &action);
            }
            if self.list.suspended() {
                return Ok(Vec::new());
            }
        }
    }

    /// Apply one action: list handling first, then source switching.
    pub fn handle_action(&mut self, action: &Action) -> Outcome {
        let outcome = self.list.handle_action(action);
        let switched = match *action {
            Action::Source(slot) => self.set_source(slot, None, false, false),
            Action::CycleSources => self.cycle_current_slot(),
            Action::NextSlot => self.step_slot(true),
            Action::PrevSlot => self.step_slot(false),
            Action::MouseSelect(x, y) | Action::MouseMove(x, y) => {
                self.handle_mouse(action, x, y)
            }
            _ => false,
        };
        if switched {
            self.materialize();
        }
        outcome
    }

    /// Feed one key event into the wrapped list's modal prompt.
    pub fn handle_modal_key(&mut self, key: KeyEvent) -> Outcome {
        self.list.handle_modal_key(key)
    }

    pub fn is_modal(&self) -> bool {
        self.list.is_modal()
    }

    /// Whether the pane has never been materialized.
    pub fn needs_init(&self) -> bool {
        self.needs_init
    }

    pub fn peek(&self) -> Vec<Selection> {
        self.list.peek()
    }

    pub fn suspend(&mut self) {
        self.list.suspend();
    }

    pub fn suspended(&self) -> bool {
        self.list.suspended()
    }

    pub fn set_active(&mut self, active: bool) {
        self.list.set_active(active);
    }

    /// Re-materialize on every redraw while set; used to pick up external
    /// mutations after a long-running operation.
    pub fn force_rebuild(&mut self, state: bool) {
        self.force_rebuild = state;
        self.list.force_rebuild(false);
    }

    pub fn on_redraw(&mut self, func: impl Fn(&SourcedListView<T>, &mut Frame<'_>) + 'static) {
        self.fdraw = Some(Rc::new(func));
    }

    pub fn on_input(&mut self, func: impl Fn(&mut SourcedListView<T>, &Action) + 'static) {
        self.fctxt = Some(Rc::new(func));
    }

    /// Lay out the map strip and the list inside `area`.
    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        let (map_area, list_area) = LayoutManager::source_pane_layout(area, self.map_rows());
        self.map_area = map_area;
        self.list.resize(list_area);
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn save_state(&self) -> ListSaveState {
        let mut state = self.list.save_state();
        state.slot = self.cslot;
        state.icon = self.sources.get(&self.cslot).map(|slot| slot.current);
        state
    }

    pub fn load_state(&mut self, state: &ListSaveState, rebuild: bool) {
        self.cslot = state.slot;
        self.set_source(self.cslot, state.icon, true, false);
        self.list.load_state(state, false);
        if rebuild {
            self.rebuild();
        }
    }

    // --- internals ---

    fn current_ref(&self) -> Option<SourceRef> {
        let slot = self.sources.get(&self.cslot)?;
        let entry = slot.entries.get(&slot.current)?;
        Some(SourceRef {
            slot: self.cslot,
            icon: slot.current,
            available: (entry.available)(),
        })
    }

    /// Invoke the current producer and replace the list's buffer with the
    /// fresh snapshot.
    fn materialize(&mut self) {
        let items = self
            .sources
            .get(&self.cslot)
            .and_then(|slot| slot.entries.get(&slot.current))
            .map(|entry| (entry.supply)())
            .unwrap_or_default();
        self.list.rebuild(Some(items));
    }

    /// Find the next available icon in a slot.
    ///
    /// Scans forward from the pivot to the end of the slot, then wraps to
    /// the beginning. With `from` set the scan starts at that icon
    /// inclusively; otherwise it starts after the slot's current icon (and
    /// may come back around to it).
    fn cycle_icons(&self, slot: usize, from: Option<char>) -> Option<char> {
        let slot_entry = self.sources.get(&slot)?;
        let pivot = from.unwrap_or(slot_entry.current);
        let (forward_start, wrap_end) = match from {
            Some(_) => (Included(pivot), Excluded(pivot)),
            None => (Excluded(pivot), Included(pivot)),
        };
        slot_entry
            .entries
            .range((forward_start, Unbounded))
            .find(|(_, entry)| (entry.available)())
            .or_else(|| {
                slot_entry
                    .entries
                    .range((Unbounded, wrap_end))
                    .find(|(_, entry)| (entry.available)())
            })
            .map(|(icon, _)| *icon)
    }

    /// Advance among the current slot's alternative icons.
    fn cycle_current_slot(&mut self) -> bool {
        match self.cycle_icons(self.cslot, None) {
            Some(next) => self.set_source(self.cslot, Some(next), false, false),
            None => false,
        }
    }

    /// Move to the neighbouring slot, wrapping across the registry ends.
    fn step_slot(&mut self, forward: bool) -> bool {
        let next = if forward {
            self.sources
                .range((Excluded(self.cslot), Unbounded))
                .next()
                .or_else(|| self.sources.iter().next())
                .map(|(slot, _)| *slot)
        } else {
            self.sources
                .range((Unbounded, Excluded(self.cslot)))
                .next_back()
                .or_else(|| self.sources.iter().next_back())
                .map(|(slot, _)| *slot)
        };
        match next {
            Some(slot) => self.set_source(slot, None, false, false),
            None => false,
        }
    }

    fn handle_mouse(&mut self, action: &Action, x: u16, y: u16) -> bool {
        if !LayoutManager::contains(self.map_area, x, y) {
            return false;
        }
        let hit = self
            .slot_cells
            .iter()
            .find(|(cell, _)| LayoutManager::contains(*cell, x, y))
            .map(|(_, slot)| *slot);
        self.hslot = hit;
        if let Some(slot) = hit {
            if matches!(action, Action::MouseSelect(..)) {
                // clicking the current slot cycles its alternate icon instead
                return if slot == self.cslot {
                    self.cycle_current_slot()
                } else {
                    self.set_source(slot, None, false, false)
                };
            }
        }
        false
    }

    fn map_rows(&self) -> u16 {
        let nslots = self.sources.len() as u16;
        nslots.div_ceil(self.map_columns).max(1)
    }

    fn count_available(&self, slot: usize) -> usize {
        self.sources.get(&slot).map_or(0, |slot_entry| {
            slot_entry
                .entries
                .values()
                .filter(|entry| (entry.available)())
                .count()
        })
    }

    // --- rendering ---

    pub fn render(&mut self, frame: &mut Frame<'_>) {
        if self.force_rebuild {
            self.materialize();
        }
        self.render_map(frame);
        self.list.render(frame);
        if let Some(hook) = self.fdraw.clone() {
            hook(self, frame);
        }
    }

    fn render_map(&mut self, frame: &mut Frame<'_>) {
        let area = self.map_area;
        if area.width < ICON_CELL_WIDTH + 2 || area.height < 3 {
            return;
        }
        let active = !self.list.suspended();
        let border_style = if active {
            Style::default().fg(Color::Blue)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default().borders(Borders::ALL).border_style(border_style);
        let inner = block.inner(area);
        frame.render_widget(Clear, area);
        frame.render_widget(block, area);

        self.slot_cells.clear();

        // current source label on the left, truncated clear of the icon grid
        let icons_width = self.map_columns * ICON_CELL_WIDTH;
        let label_width = inner.width.saturating_sub(icons_width + 1);
        if label_width > 0 {
            let label = self
                .sources
                .get(&self.cslot)
                .and_then(|slot| slot.entries.get(&slot.current))
                .map(|entry| (entry.label)())
                .unwrap_or_default();
            let truncated: String = label.chars().take(usize::from(label_width)).collect();
            frame.render_widget(
                Paragraph::new(truncated),
                Rect::new(inner.x, inner.y, label_width, 1),
            );
        }

        for (grid_pos, (&slot, slot_entry)) in self.sources.iter().enumerate() {
            let Some(entry) = slot_entry.entries.get(&slot_entry.current) else {
                continue;
            };
            let col = grid_pos as u16 % self.map_columns;
            let row = grid_pos as u16 / self.map_columns;
            if row >= inner.height {
                break;
            }
            let offset = (self.map_columns - col) * ICON_CELL_WIDTH;
            if offset > inner.width {
                continue;
            }
            let x = inner.x + inner.width - offset;
            let y = inner.y + row;

            let base_color = if slot == self.cslot {
                Color::White
            } else if (entry.available)() {
                Color::Gray
            } else {
                Color::Red
            };
            let style = if self.hslot == Some(slot) {
                Style::default().fg(base_color).add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(base_color)
            };
            // angle brackets flag slots with more than one live alternative
            let text = if self.count_available(slot) > 1 {
                format!("<{}>", entry.icon)
            } else {
                format!("[{}]", entry.icon)
            };
            let cell = Rect::new(x, y, ICON_CELL_WIDTH, 1);
            frame.render_widget(Paragraph::new(Span::styled(text, style)), cell);
            self.slot_cells.push((cell, slot));
        }

        if self.force_rebuild {
            frame.render_widget(
                Paragraph::new(Line::styled("*", Style::default().fg(Color::LightRed))),
                Rect::new(inner.x + inner.width.saturating_sub(1), inner.y, 1, 1),
            );
        }
    }
}
