//! Generic list browsing component.
//!
//! [`ListView`] owns a snapshot of caller-supplied elements and maintains a
//! filtered, sorted, grouped and paginated view over it. It drives a modal
//! input loop ([`ListView::select`]) that blocks until the user confirms a
//! selection or dismisses the list, and exposes the same state machine
//! piecewise ([`ListView::handle_action`]) so wrapping components can embed
//! it in their own loops.
//!
//! All behaviour is configured with plain function values: column printers,
//! sorters, groupers, filter predicates and hooks live in named registries
//! and can be replaced at any time. None of them are required; every unset
//! hook is a no-op and every degenerate input (empty list, tiny viewport,
//! stale saved state) clamps or produces an empty result instead of failing.

use std::cmp::Ordering;
use std::rc::Rc;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};

use crate::constants::{COLUMN_SPACING, FILTER_MAX_LEN, LIST_FOOTER_ROWS, LIST_HEADER_ROWS};
use crate::ui::core::actions::Action;
use crate::ui::core::state::ListSaveState;
use crate::ui::layout::LayoutManager;

/// Column printer: element and cell width (0 means unconstrained) to text.
///
/// Printers must be deterministic and side-effect free; implicit column
/// sorters and the default filter both compare their output.
pub type ColPrinter<T> = Rc<dyn Fn(&T, u16) -> String>;
/// Comparison function used by sorters and groupers.
pub type SortCmp<T> = Rc<dyn Fn(&T, &T) -> Ordering>;
/// Group label printer.
pub type GroupLabelFn<T> = Rc<dyn Fn(&T) -> String>;
/// Filter predicate: element and filter text.
pub type FilterFn<T> = Rc<dyn Fn(&T, &str) -> bool>;
/// Element counting function, used for partial/whole/all selection.
pub type CountFn<T> = Rc<dyn Fn(&T) -> usize>;
/// Rebuild hook: called with `None` once per rebuild (reset), then with
/// `Some(element)` for every element that survives the filter.
pub type RebuildHook<T> = Rc<dyn Fn(Option<&T>)>;
/// Extra-decoration hook, called after the widget finishes drawing itself.
pub type DrawHook<T> = Rc<dyn Fn(&ListView<T>, &mut Frame<'_>)>;
/// Resize hook, called with the new terminal size instead of the built-in
/// resize when set.
pub type ResizeHook<T> = Rc<dyn Fn(&mut ListView<T>, Rect)>;
/// Input hook, called with every action after internal handling.
pub type InputHook<T> = Rc<dyn Fn(&mut ListView<T>, &Action)>;

/// A display column: name, printer and relative width weight.
///
/// Weights determine proportional allocation of the inner width; the last
/// column always receives the remaining space.
pub struct Column<T> {
    pub name: String,
    pub printer: ColPrinter<T>,
    pub weight: u16,
}

impl<T> Column<T> {
    pub fn new(
        name: impl Into<String>,
        weight: u16,
        printer: impl Fn(&T, u16) -> String + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            printer: Rc::new(printer),
            weight,
        }
    }
}

/// A named sorter. `cmp: None` is the "none" sentinel preserving insertion
/// order.
pub struct Sorter<T> {
    pub name: String,
    pub cmp: Option<SortCmp<T>>,
}

impl<T> Sorter<T> {
    pub fn new(name: impl Into<String>, cmp: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        Self {
            name: name.into(),
            cmp: Some(Rc::new(cmp)),
        }
    }
}

/// A named grouper: ordering between groups plus a label printer. Entries
/// with equal labels form contiguous runs after sorting.
pub struct Grouper<T> {
    pub name: String,
    pub cmp: Option<SortCmp<T>>,
    pub label: Option<GroupLabelFn<T>>,
}

impl<T> Grouper<T> {
    pub fn new(
        name: impl Into<String>,
        cmp: impl Fn(&T, &T) -> Ordering + 'static,
        label: impl Fn(&T) -> String + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            cmp: Some(Rc::new(cmp)),
            label: Some(Rc::new(label)),
        }
    }
}

/// One confirmed selection: a count (always > 0) and the index of the
/// element in the widget's snapshot buffer (resolve with [`ListView::item`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub count: usize,
    pub index: usize,
}

/// Result of feeding one action or key into the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep going; nothing to report.
    Continue,
    /// The modal round is over. An empty vector means the list was dismissed.
    Done(Vec<Selection>),
}

/// Entry in the filtered view: insertion index (for "none" sorting) and the
/// element's position in the snapshot buffer.
struct Entry {
    idx: usize,
    pos: usize,
}

/// Modal input states, routed before normal key bindings.
enum Mode {
    Normal,
    Filter { input: String },
    Partial { input: String, max: usize },
    SortMenu { cursor: usize },
}

pub struct ListView<T> {
    items: Vec<T>,
    list: Vec<Entry>,
    pages: Vec<(usize, usize)>,
    columns: Vec<Column<T>>,
    sorters: Vec<Sorter<T>>,
    groupers: Vec<Grouper<T>>,
    filter: String,
    filter_desc: String,
    ffilter: Option<FilterFn<T>>,
    fcounter: Option<CountFn<T>>,
    frebuild: Option<RebuildHook<T>>,
    fdraw: Option<DrawHook<T>>,
    fdraw_filter: Option<DrawHook<T>>,
    fresize: Option<ResizeHook<T>>,
    fctxt: Option<InputHook<T>>,
    csort: usize,
    cgroup: usize,
    cidx: usize,
    cpage: usize,
    area: Rect,
    page_size: usize,
    mode: Mode,
    exit: bool,
    needs_init: bool,
    force_rebuild: bool,
    // screen row of each visible entry, for mouse selection
    idx_line_map: Vec<(u16, usize)>,
}

impl<T: 'static> Default for ListView<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> ListView<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            list: Vec::new(),
            pages: vec![(0, 0)],
            columns: Vec::new(),
            sorters: vec![Sorter {
                name: "none".to_string(),
                cmp: None,
            }],
            groupers: vec![Grouper {
                name: "none".to_string(),
                cmp: None,
                label: None,
            }],
            filter: String::new(),
            filter_desc: String::new(),
            ffilter: None,
            fcounter: None,
            frebuild: None,
            fdraw: None,
            fdraw_filter: None,
            fresize: None,
            fctxt: None,
            csort: 0,
            cgroup: 0,
            cidx: 0,
            cpage: 0,
            area: Rect::default(),
            page_size: 1,
            mode: Mode::Normal,
            exit: true,
            needs_init: true,
            force_rebuild: false,
            idx_line_map: Vec::new(),
        }
    }

    /// Replace the column set. With `implicit`, one lexicographic sorter per
    /// column (comparing printer output, case-insensitively) is upserted
    /// under the column's name.
    pub fn set_columns(&mut self, columns: Vec<Column<T>>, implicit: bool) {
        self.columns = columns;
        if !implicit {
            return;
        }
        let implicits: Vec<Sorter<T>> = self
            .columns
            .iter()
            .map(|col| {
                let printer = Rc::clone(&col.printer);
                Sorter {
                    name: col.name.clone(),
                    cmp: Some(Rc::new(move |lhs: &T, rhs: &T| {
                        printer(lhs, 0)
                            .to_lowercase()
                            .cmp(&printer(rhs, 0).to_lowercase())
                    })),
                }
            })
            .collect();
        for sorter in implicits {
            self.add_sorter(sorter);
        }
    }

    /// Add a sorter, replacing any existing sorter with the same name in
    /// place (including implicit column sorters).
    pub fn add_sorter(&mut self, sorter: Sorter<T>) {
        match self.sorters.iter_mut().find(|s| s.name == sorter.name) {
            Some(slot) => *slot = sorter,
            None => self.sorters.push(sorter),
        }
    }

    /// Add a grouper, replacing any existing grouper with the same name.
    pub fn add_grouper(&mut self, grouper: Grouper<T>) {
        match self.groupers.iter_mut().find(|g| g.name == grouper.name) {
            Some(slot) => *slot = grouper,
            None => self.groupers.push(grouper),
        }
    }

    /// Set the counting function, enabling partial and whole selection.
    /// Without one every element counts as 1.
    pub fn set_fcounting(&mut self, func: impl Fn(&T) -> usize + 'static) {
        self.fcounter = Some(Rc::new(func));
    }

    /// Set the rebuild hook; meant for collecting per-element stats.
    pub fn on_rebuild(&mut self, func: impl Fn(Option<&T>) + 'static) {
        self.frebuild = Some(Rc::new(func));
    }

    /// Set a hook drawing extra decorations after the widget itself.
    pub fn on_redraw(&mut self, func: impl Fn(&ListView<T>, &mut Frame<'_>) + 'static) {
        self.fdraw = Some(Rc::new(func));
    }

    /// Set a hook drawing filter instructions while the filter prompt is open.
    pub fn on_filter(&mut self, func: impl Fn(&ListView<T>, &mut Frame<'_>) + 'static) {
        self.fdraw_filter = Some(Rc::new(func));
    }

    /// Set a hook replacing the built-in reaction to terminal resizes.
    pub fn on_resize(&mut self, func: impl Fn(&mut ListView<T>, Rect) + 'static) {
        self.fresize = Some(Rc::new(func));
    }

    /// Set a handler called with every action after internal handling.
    pub fn on_input(&mut self, func: impl Fn(&mut ListView<T>, &Action) + 'static) {
        self.fctxt = Some(Rc::new(func));
    }

    /// Replace the filter predicate. The default matches the filter text
    /// case-insensitively against every column's printer output.
    pub fn set_ffilter(
        &mut self,
        desc: impl Into<String>,
        func: impl Fn(&T, &str) -> bool + 'static,
    ) {
        self.filter_desc = desc.into();
        self.ffilter = Some(Rc::new(func));
    }

    /// Re-scan the snapshot buffer, applying the filter, sort, grouping and
    /// pagination, and clamp the cursor back into range. `replacement`
    /// becomes the new buffer when given.
    ///
    /// Calling this twice without intervening mutation yields the same view.
    pub fn rebuild(&mut self, replacement: Option<Vec<T>>) {
        if let Some(items) = replacement {
            self.items = items;
        }

        let filter = self.filter.clone();
        let mut kept: Vec<usize> = Vec::with_capacity(self.items.len());
        for (pos, item) in self.items.iter().enumerate() {
            if filter.is_empty() || self.filter_matches(item, &filter) {
                kept.push(pos);
            }
        }

        if let Some(hook) = self.frebuild.clone() {
            hook(None);
            for &pos in &kept {
                hook(Some(&self.items[pos]));
            }
        }

        log::debug!("list rebuilt: {} of {} entries kept", kept.len(), self.items.len());
        self.list = kept
            .into_iter()
            .enumerate()
            .map(|(idx, pos)| Entry { idx, pos })
            .collect();
        self.apply_sort(self.csort, self.cgroup);
        self.paginate();
        self.set_index(self.cidx);
        self.needs_init = false;
    }

    /// Run the modal input loop until the user confirms a selection or
    /// dismisses the list. Returns an empty vector on quit or suspension.
    pub fn select<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<Vec<Selection>> {
        self.exit = false;
        if self.needs_init {
            self.rebuild(None);
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
                let size = Rect::new(0, 0, width, height);
                match self.fresize.clone() {
                    Some(hook) => hook(self, size),
                    None => self.resize(size),
                }
                continue;
            }

            if self.is_modal() {
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
            if self.exit {
                return Ok(Vec::new());
            }
        }
    }

    /// Apply one normal-mode action to the widget.
    ///
    /// Pane- and source-level actions are ignored here so wrapping
    /// components can layer their own handling on the same action stream.
    pub fn handle_action(&mut self, action: &Action) -> Outcome {
        match *action {
            Action::Up => self.dec_index(1),
            Action::Down => self.inc_index(1),
            Action::PageUp => self.dec_index(self.page_size),
            Action::PageDown => self.inc_index(self.page_size),
            Action::Sort => self.mode = Mode::SortMenu { cursor: self.csort },
            Action::Filter => {
                self.mode = Mode::Filter {
                    input: self.filter.clone(),
                }
            }
            Action::ResetFilter => self.set_filter(String::new()),
            Action::Select => return Outcome::Done(self.peek()),
            Action::SelectPartial => {
                if !self.list.is_empty() {
                    self.mode = Mode::Partial {
                        input: String::new(),
                        max: self.peek_count(),
                    };
                }
            }
            Action::SelectWhole => return Outcome::Done(self.peek_n(self.peek_count())),
            Action::SelectAll => return Outcome::Done(self.peek_all()),
            Action::Quit => self.exit = true,
            Action::MouseSelect(x, y) | Action::MouseMove(x, y) => {
                if LayoutManager::contains(self.area, x, y) {
                    let hit = self.idx_line_map.iter().find(|(row, _)| *row == y).copied();
                    if let Some((_, lidx)) = hit {
                        if matches!(action, Action::MouseSelect(..)) && lidx == self.cidx {
                            return Outcome::Done(self.peek());
                        }
                        self.set_index(lidx);
                    }
                }
            }
            _ => {}
        }
        Outcome::Continue
    }

    /// Feed one key event into the active modal prompt (filter, partial
    /// amount, sort menu). No-op in normal mode.
    pub fn handle_modal_key(&mut self, key: KeyEvent) -> Outcome {
        if key.kind != KeyEventKind::Press {
            return Outcome::Continue;
        }
        match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Normal => Outcome::Continue,
            Mode::Filter { mut input } => {
                match key.code {
                    KeyCode::Enter | KeyCode::Esc => {}
                    KeyCode::Backspace => {
                        input.pop();
                        self.set_filter(input.clone());
                        self.mode = Mode::Filter { input };
                    }
                    KeyCode::Char(c) if !c.is_control() && input.len() < FILTER_MAX_LEN => {
                        input.push(c);
                        self.set_filter(input.clone());
                        self.mode = Mode::Filter { input };
                    }
                    _ => self.mode = Mode::Filter { input },
                }
                Outcome::Continue
            }
            Mode::Partial { mut input, max } => {
                match key.code {
                    KeyCode::Esc => {}
                    KeyCode::Enter => {
                        let amount = input.parse::<usize>().unwrap_or(0).min(max);
                        if amount > 0 {
                            return Outcome::Done(self.peek_n(amount));
                        }
                    }
                    KeyCode::Backspace => {
                        input.pop();
                        self.mode = Mode::Partial { input, max };
                    }
                    KeyCode::Char(c) if c.is_ascii_digit() && input.len() < 6 => {
                        input.push(c);
                        self.mode = Mode::Partial { input, max };
                    }
                    _ => self.mode = Mode::Partial { input, max },
                }
                Outcome::Continue
            }
            Mode::SortMenu { mut cursor } => {
                let total = self.sorters.len() + self.groupers.len();
                match key.code {
                    KeyCode::Esc => {}
                    KeyCode::Up | KeyCode::Char('k') => {
                        cursor = if cursor == 0 { total - 1 } else { cursor - 1 };
                        self.mode = Mode::SortMenu { cursor };
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        cursor = if cursor + 1 >= total { 0 } else { cursor + 1 };
                        self.mode = Mode::SortMenu { cursor };
                    }
                    KeyCode::Enter => {
                        if cursor < self.sorters.len() {
                            self.apply_sort(cursor, self.cgroup);
                        } else {
                            self.apply_sort(self.csort, cursor - self.sorters.len());
                            self.paginate();
                            self.set_index(self.cidx);
                        }
                    }
                    _ => self.mode = Mode::SortMenu { cursor },
                }
                Outcome::Continue
            }
        }
    }

    /// Whether a modal prompt is currently open.
    pub fn is_modal(&self) -> bool {
        !matches!(self.mode, Mode::Normal)
    }

    /// Sort by a registered sorter's name; unknown names are a no-op.
    pub fn sort(&mut self, name: &str) {
        if let Some(pos) = self.sorters.iter().position(|s| s.name == name) {
            self.apply_sort(pos, self.cgroup);
        }
    }

    /// Group by a registered grouper's name; unknown names are a no-op.
    pub fn group(&mut self, name: &str) {
        if let Some(pos) = self.groupers.iter().position(|g| g.name == name) {
            self.apply_sort(self.csort, pos);
            self.paginate();
            self.set_index(self.cidx);
        }
    }

    /// The currently highlighted element as a single selection with count 1.
    pub fn peek(&self) -> Vec<Selection> {
        self.peek_n(1)
    }

    /// Force the modal loop in [`ListView::select`] to return empty on its
    /// next check. Idempotent.
    pub fn suspend(&mut self) {
        self.exit = true;
    }

    /// Whether the widget has been suspended or dismissed.
    pub fn suspended(&self) -> bool {
        self.exit
    }

    /// Toggle active rendering (bright vs dimmed borders). The transfer UI
    /// dims the unfocused pane with this.
    pub fn set_active(&mut self, active: bool) {
        self.exit = !active;
    }

    /// Re-materialize the view on the next redraw while set.
    pub fn force_rebuild(&mut self, state: bool) {
        self.force_rebuild = state;
    }

    /// Recompute the widget's geometry for a new area. Changing the number
    /// of visible rows triggers a rebuild.
    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        // borders + decoration rows + one column-header row
        let reserved = 2 + LIST_HEADER_ROWS + LIST_FOOTER_ROWS + 1;
        let new_size = usize::from(area.height.saturating_sub(reserved)).max(1);
        if new_size != self.page_size {
            self.page_size = new_size;
            self.rebuild(None);
        }
    }

    /// Capture the widget state for persistence.
    pub fn save_state(&self) -> ListSaveState {
        ListSaveState {
            slot: 0,
            idx: self.cidx,
            sort: self.csort,
            group: self.cgroup,
            icon: None,
            filter: self.filter.clone(),
            initialized: true,
        }
    }

    /// Restore widget state. Out-of-range indices are clamped. With
    /// `rebuild` false only the indices are restored; the caller is expected
    /// to rebuild separately.
    pub fn load_state(&mut self, state: &ListSaveState, rebuild: bool) {
        self.csort = state.sort.min(self.sorters.len() - 1);
        self.cgroup = state.group.min(self.groupers.len() - 1);
        self.filter = state.filter.clone();
        self.cidx = state.idx;
        if rebuild {
            self.rebuild(None);
        } else {
            self.set_index(state.idx);
        }
    }

    // --- accessors ---

    /// Element by snapshot-buffer index, as carried by [`Selection`].
    pub fn item(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// The full snapshot buffer, in insertion order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Elements of the filtered view, in display order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.list.iter().map(|entry| &self.items[entry.pos])
    }

    /// Number of entries in the filtered view.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// The page table: half-open index ranges into the filtered view.
    pub fn pages(&self) -> &[(usize, usize)] {
        &self.pages
    }

    /// Cursor position in the filtered view.
    pub fn current_index(&self) -> usize {
        self.cidx
    }

    pub fn current_page(&self) -> usize {
        self.cpage
    }

    pub fn filter_text(&self) -> &str {
        &self.filter
    }

    pub fn sort_index(&self) -> usize {
        self.csort
    }

    pub fn group_index(&self) -> usize {
        self.cgroup
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Move the cursor down, wrapping from the last entry of the filtered
    /// list to the first.
    pub fn inc_index(&mut self, amount: usize) {
        let end = self.list_end();
        if end == 0 {
            self.cidx = 0;
            self.cpage = 0;
            return;
        }
        self.cidx = if self.cidx >= end - 1 {
            0
        } else {
            (self.cidx + amount).min(end - 1)
        };
        self.cpage = self.page_of(self.cidx);
    }

    /// Move the cursor up, wrapping from the first entry to the last.
    pub fn dec_index(&mut self, amount: usize) {
        let end = self.list_end();
        if end == 0 {
            self.cidx = 0;
            self.cpage = 0;
            return;
        }
        self.cidx = if self.cidx == 0 {
            end - 1
        } else {
            self.cidx.saturating_sub(amount)
        };
        self.cpage = self.page_of(self.cidx);
    }

    /// Place the cursor, clamped to the last valid entry.
    pub fn set_index(&mut self, idx: usize) {
        let end = self.list_end();
        self.cidx = if end == 0 { 0 } else { idx.min(end - 1) };
        self.cpage = self.page_of(self.cidx);
    }

    // --- internals ---

    fn list_end(&self) -> usize {
        self.pages.last().map_or(0, |page| page.1)
    }

    fn page_of(&self, idx: usize) -> usize {
        let mut page = 0;
        while page + 1 < self.pages.len() && self.pages[page].1 <= idx {
            page += 1;
        }
        page
    }

    fn filter_matches(&self, item: &T, filter: &str) -> bool {
        match &self.ffilter {
            Some(func) => func(item, filter),
            None => self.basic_filter(item, filter),
        }
    }

    fn basic_filter(&self, item: &T, filter: &str) -> bool {
        let needle = filter.to_lowercase();
        self.columns
            .iter()
            .any(|col| (col.printer)(item, 0).to_lowercase().contains(&needle))
    }

    fn set_filter(&mut self, filter: String) {
        self.filter = filter;
        self.rebuild(None);
    }

    /// Single stable sort under the composite grouper-then-sorter order:
    /// entries in different groups follow the grouper, entries in the same
    /// group (or with grouping off) follow the sorter, and the "none"
    /// sorter falls back to insertion order.
    fn apply_sort(&mut self, sidx: usize, gidx: usize) {
        let sorter = self.sorters[sidx].cmp.clone();
        let gcmp = self.groupers[gidx].cmp.clone();
        let glabel = self.groupers[gidx].label.clone();
        let items = &self.items;
        self.list.sort_by(|a, b| {
            let (lhs, rhs) = (&items[a.pos], &items[b.pos]);
            match (&gcmp, &glabel) {
                (Some(cmp), Some(label)) if label(lhs) != label(rhs) => cmp(lhs, rhs),
                _ => match &sorter {
                    Some(cmp) => cmp(lhs, rhs),
                    None => a.idx.cmp(&b.idx),
                },
            }
        });
        self.csort = sidx;
        self.cgroup = gidx;
    }

    /// Cut the sorted list into pages. Every page reprints the header of the
    /// group it opens with, so grouping reserves one row up front and a
    /// label change mid-page charges one extra row. A page is cut before the
    /// entry that would not fit, which restarts the count at that entry.
    fn paginate(&mut self) {
        self.pages.clear();
        let glabel = if self.cgroup != 0 {
            self.groupers[self.cgroup].label.clone()
        } else {
            None
        };
        let capacity = match &glabel {
            Some(_) => self.page_size.saturating_sub(1),
            None => self.page_size,
        };
        let mut begin = 0usize;
        if capacity > 0 {
            let mut count = 0usize;
            let mut prev: Option<String> = None;
            for i in 0..self.list.len() {
                let label = glabel.as_ref().map(|f| f(&self.items[self.list[i].pos]));
                let charge = if label.is_some() && prev.is_some() && label != prev {
                    2
                } else {
                    1
                };
                count += charge;
                prev = label;
                if count > capacity {
                    self.pages.push((begin, i));
                    begin = i;
                    count = 1;
                }
            }
        }
        if begin < self.list.len() || self.list.is_empty() {
            self.pages.push((begin, self.list.len()));
        }
    }

    fn count(&self, lidx: usize) -> usize {
        if self.list.is_empty() {
            return 0;
        }
        match &self.fcounter {
            Some(func) => func(&self.items[self.list[lidx].pos]),
            None => 1,
        }
    }

    fn peek_count(&self) -> usize {
        self.count(self.cidx)
    }

    fn peek_n(&self, amount: usize) -> Vec<Selection> {
        if self.list.is_empty() || amount == 0 {
            return Vec::new();
        }
        vec![Selection {
            count: amount,
            index: self.list[self.cidx].pos,
        }]
    }

    fn peek_all(&self) -> Vec<Selection> {
        (0..self.list.len())
            .map(|lidx| Selection {
                count: self.count(lidx),
                index: self.list[lidx].pos,
            })
            .collect()
    }

    // --- rendering ---

    pub fn render(&mut self, frame: &mut Frame<'_>) {
        if self.force_rebuild {
            self.rebuild(None);
        }
        let area = self.area;
        if area.width < 4 || area.height < 5 {
            return;
        }
        let active = !self.exit;

        let border_style = if active {
            Style::default().fg(Color::Blue)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default().borders(Borders::ALL).border_style(border_style);
        let inner = block.inner(area);
        frame.render_widget(Clear, area);
        frame.render_widget(block, area);

        self.render_headers(frame, inner, active);
        self.render_entries(frame, inner, active);
        self.render_footer(frame, inner);

        if let Some(hook) = self.fdraw.clone() {
            hook(self, frame);
        }
        match &self.mode {
            Mode::Filter { .. } => {
                if let Some(hook) = self.fdraw_filter.clone() {
                    hook(self, frame);
                }
            }
            Mode::Partial { input, max } => self.render_partial_popup(frame, input, *max),
            Mode::SortMenu { cursor } => self.render_sort_menu(frame, *cursor),
            Mode::Normal => {}
        }
    }

    fn render_headers(&self, frame: &mut Frame<'_>, inner: Rect, active: bool) {
        let sort_line = Line::from(format!("< [s] Sort: {} >", self.sorters[self.csort].name));
        frame.render_widget(
            Paragraph::new(sort_line),
            Rect::new(inner.x, inner.y, inner.width, 1),
        );
        if self.force_rebuild {
            let marker = Line::from(Span::styled("*", Style::default().fg(Color::LightRed)))
                .alignment(Alignment::Right);
            frame.render_widget(
                Paragraph::new(marker),
                Rect::new(inner.x, inner.y, inner.width, 1),
            );
        }

        let page_line = Line::styled(
            format!("[<] page {} of {} [>]", self.cpage + 1, self.pages.len().max(1)),
            Style::default().fg(Color::LightBlue),
        );
        frame.render_widget(
            Paragraph::new(page_line),
            Rect::new(inner.x, inner.y + 1, inner.width, 1),
        );

        let header_style = if active {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::Gray)
        };
        let widths = self.column_widths(inner.width);
        let spans: Vec<Span> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, width)| Span::styled(cell_text(&col.name, *width), header_style))
            .collect();
        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect::new(inner.x, inner.y + LIST_HEADER_ROWS, inner.width, 1),
        );
    }

    fn render_entries(&mut self, frame: &mut Frame<'_>, inner: Rect, active: bool) {
        let rows = Rect::new(
            inner.x,
            inner.y + LIST_HEADER_ROWS + 1,
            inner.width,
            inner
                .height
                .saturating_sub(LIST_HEADER_ROWS + 1 + LIST_FOOTER_ROWS),
        );
        self.idx_line_map.clear();

        let (pbegin, pend) = self.pages.get(self.cpage).copied().unwrap_or((0, 0));
        let glabel = if self.cgroup != 0 {
            self.groupers[self.cgroup].label.clone()
        } else {
            None
        };
        let widths = self.column_widths(inner.width);
        let base_style = if active {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let hilite_style = Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD);

        let mut lines: Vec<Line> = Vec::new();
        let mut current_group: Option<String> = None;
        for i in pbegin..pend {
            if lines.len() >= rows.height as usize {
                break;
            }
            let item = &self.items[self.list[i].pos];

            if let Some(label_fn) = &glabel {
                let label = label_fn(item);
                if current_group.as_deref() != Some(label.as_str()) {
                    lines.push(
                        Line::styled(format!("[{label}]"), Style::default().fg(Color::Cyan))
                            .alignment(Alignment::Center),
                    );
                    current_group = Some(label);
                    if lines.len() >= rows.height as usize {
                        break;
                    }
                }
            }

            let hilited = i == self.cidx && active;
            let style = if hilited { hilite_style } else { base_style };
            let spans: Vec<Span> = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(col, width)| {
                    Span::styled(cell_text(&(col.printer)(item, *width), *width), style)
                })
                .collect();
            lines.push(Line::from(spans));
            self.idx_line_map.push((rows.y + lines.len() as u16 - 1, i));
        }
        frame.render_widget(Paragraph::new(lines), rows);
    }

    fn render_footer(&self, frame: &mut Frame<'_>, inner: Rect) {
        let footer = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);
        let line = match &self.mode {
            Mode::Filter { input } if !self.filter_desc.is_empty() => Line::styled(
                format!("< Filter ({}): {input}_ >", self.filter_desc),
                Style::default().fg(Color::Yellow),
            ),
            Mode::Filter { input } => Line::styled(
                format!("< Filter: {input}_ >"),
                Style::default().fg(Color::Yellow),
            ),
            _ if !self.filter.is_empty() => {
                Line::from(format!("< [/] Filter: {} >", self.filter))
            }
            _ => Line::from("< [/] Filter >"),
        };
        frame.render_widget(Paragraph::new(line), footer);
    }

    fn render_partial_popup(&self, frame: &mut Frame<'_>, input: &str, max: usize) {
        let popup = LayoutManager::centered_rect_lines(40, 3, frame.area());
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Select amount ");
        let inner = block.inner(popup);
        frame.render_widget(Clear, popup);
        frame.render_widget(block, popup);
        let prompt = format!("How many? [Max {max}] (0 to cancel): {input}_");
        frame.render_widget(Paragraph::new(prompt), inner);
    }

    fn render_sort_menu(&self, frame: &mut Frame<'_>, cursor: usize) {
        let height = (self.sorters.len() + self.groupers.len() + 3) as u16;
        let popup = LayoutManager::centered_rect_lines(30, height, frame.area());
        let block = Block::default().borders(Borders::ALL).title(" Sort by ");
        let inner = block.inner(popup);
        frame.render_widget(Clear, popup);
        frame.render_widget(block, popup);

        let hilite = Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD);
        let mut lines: Vec<Line> = Vec::new();
        for (i, sorter) in self.sorters.iter().enumerate() {
            let style = if cursor == i { hilite } else { Style::default() };
            lines.push(Line::styled(sorter.name.clone(), style));
        }
        lines.push(Line::styled(
            "- Group by -",
            Style::default().fg(Color::DarkGray),
        ));
        for (i, grouper) in self.groupers.iter().enumerate() {
            let style = if cursor == self.sorters.len() + i {
                hilite
            } else {
                Style::default()
            };
            lines.push(Line::styled(grouper.name.clone(), style));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    /// Proportional column widths over the inner width; the last column
    /// takes the remainder.
    fn column_widths(&self, inner_width: u16) -> Vec<u16> {
        let ncols = self.columns.len();
        if ncols == 0 {
            return Vec::new();
        }
        let total: u32 = self.columns.iter().map(|col| u32::from(col.weight)).sum();
        let mut widths = Vec::with_capacity(ncols);
        let mut used = 0u16;
        for (i, col) in self.columns.iter().enumerate() {
            let remaining = inner_width.saturating_sub(used);
            let width = if i + 1 == ncols {
                remaining
            } else if total == 0 {
                inner_width / ncols as u16
            } else {
                let share = (u32::from(col.weight) * u32::from(inner_width)).div_ceil(total);
                (share as u16).min(remaining)
            };
            widths.push(width);
            used += width;
        }
        widths
    }
}

/// Truncate and pad text to one column cell, leaving the column spacing.
fn cell_text(text: &str, width: u16) -> String {
    let content = usize::from(width.saturating_sub(COLUMN_SPACING));
    let truncated: String = text.chars().take(content).collect();
    format!("{truncated:<pad$}", pad = usize::from(width))
}
