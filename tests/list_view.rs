use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use stashlist::ui::components::list_view::{Column, Grouper, ListView, Outcome, Sorter};
use stashlist::ui::core::actions::Action;

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    name: String,
    group: String,
    value: usize,
}

fn entry(name: &str, group: &str, value: usize) -> Entry {
    Entry {
        name: name.to_string(),
        group: group.to_string(),
        value,
    }
}

/// A list with a name column, a numeric "value" sorter and a group-field
/// grouper, sized to `page_size` visible entry rows.
fn list_with(items: Vec<Entry>, page_size: u16) -> ListView<Entry> {
    let mut list = ListView::new();
    list.set_columns(
        vec![Column::new("name", 1, |e: &Entry, _| e.name.clone())],
        true,
    );
    list.add_sorter(Sorter::new("value", |a: &Entry, b: &Entry| {
        a.value.cmp(&b.value)
    }));
    list.add_grouper(Grouper::new(
        "group",
        |a: &Entry, b: &Entry| a.group.cmp(&b.group),
        |e: &Entry| e.group.clone(),
    ));
    // widget chrome takes 6 rows: borders, two header rows, the column
    // header and the filter footer
    list.resize(Rect::new(0, 0, 40, page_size + 6));
    list.rebuild(Some(items));
    list
}

fn names(list: &ListView<Entry>) -> Vec<String> {
    list.iter().map(|e| e.name.clone()).collect()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn pages_partition_the_list_exactly() {
    for n in [0usize, 1, 2, 5, 7, 23] {
        for page_size in [1u16, 2, 3, 10] {
            let items = (0..n).map(|i| entry(&format!("item{i}"), "g", i)).collect();
            let list = list_with(items, page_size);

            let pages = list.pages();
            assert!(!pages.is_empty());
            let mut expected_begin = 0;
            for &(begin, end) in pages {
                assert_eq!(begin, expected_begin, "pages must be contiguous");
                assert!(end >= begin);
                expected_begin = end;
            }
            assert_eq!(expected_begin, n, "pages must cover the whole list");
        }
    }
}

#[test]
fn empty_list_has_exactly_one_empty_page() {
    let list = list_with(Vec::new(), 3);
    assert_eq!(list.pages(), &[(0, 0)]);
    assert_eq!(list.current_index(), 0);
    assert!(list.peek().is_empty());
}

#[test]
fn grouped_pages_never_overflow_with_alternating_labels() {
    // page_size 2 leaves room for one entry plus the page's group header;
    // alternating labels force a header for every entry
    let items = vec![
        entry("a", "g1", 0),
        entry("b", "g2", 1),
        entry("c", "g1", 2),
        entry("d", "g2", 3),
    ];
    let mut list = list_with(items, 2);
    list.group("group");

    // grouping is by label, so entries collapse into two runs of two; each
    // page holds one header plus one entry
    for &(begin, end) in list.pages() {
        assert!(end - begin <= 1, "page {begin}..{end} holds too many entries");
    }
    let pages = list.pages().to_vec();
    assert_eq!(pages.last().map(|p| p.1), Some(4));
}

#[test]
fn grouped_pages_handle_labels_that_stay_interleaved() {
    // a grouper ordering by value leaves the labels alternating after the
    // sort, so every single entry opens a new header run
    let items = vec![
        entry("a", "g1", 0),
        entry("b", "g2", 1),
        entry("c", "g1", 2),
        entry("d", "g2", 3),
    ];
    let mut list = list_with(items, 2);
    list.add_grouper(Grouper::new(
        "group",
        |a: &Entry, b: &Entry| a.value.cmp(&b.value),
        |e: &Entry| e.group.clone(),
    ));
    list.group("group");

    assert_eq!(
        names(&list),
        ["a", "b", "c", "d"],
        "value-ordered grouper keeps the interleaving"
    );
    for &(begin, end) in list.pages() {
        assert!(end - begin <= 1, "page {begin}..{end} holds too many entries");
    }
    let mut covered = 0;
    for &(begin, end) in list.pages() {
        assert_eq!(begin, covered);
        covered = end;
    }
    assert_eq!(covered, 4);
}

#[test]
fn none_sorter_restores_insertion_order() {
    let items = vec![entry("c", "g", 2), entry("a", "g", 0), entry("b", "g", 1)];
    let mut list = list_with(items, 5);

    list.sort("name");
    assert_eq!(names(&list), ["a", "b", "c"]);

    list.sort("none");
    assert_eq!(names(&list), ["c", "a", "b"]);
}

#[test]
fn unknown_sorter_name_is_a_no_op() {
    let items = vec![entry("b", "g", 1), entry("a", "g", 0)];
    let mut list = list_with(items, 5);
    list.sort("name");
    list.sort("does-not-exist");
    assert_eq!(names(&list), ["a", "b"]);
}

#[test]
fn grouping_keeps_equal_labels_contiguous() {
    let items = vec![
        entry("a", "tools", 0),
        entry("b", "food", 1),
        entry("c", "tools", 2),
        entry("d", "food", 3),
        entry("e", "tools", 4),
    ];
    let mut list = list_with(items, 10);
    list.group("group");

    let groups: Vec<String> = list.iter().map(|e| e.group.clone()).collect();
    let mut seen: Vec<&String> = Vec::new();
    for g in &groups {
        match seen.last() {
            Some(last) if *last == g => {}
            _ => {
                assert!(!seen.contains(&g), "group {g} appears in two separate runs");
                seen.push(g);
            }
        }
    }
    // groups themselves follow the grouper's order
    assert_eq!(seen, ["food", "tools"]);
}

#[test]
fn sort_applies_within_groups() {
    let items = vec![
        entry("x", "tools", 9),
        entry("y", "food", 5),
        entry("z", "tools", 1),
    ];
    let mut list = list_with(items, 10);
    list.group("group");
    list.sort("value");
    assert_eq!(names(&list), ["y", "z", "x"]);
}

#[test]
fn implicit_column_sorter_is_replaced_by_explicit_one() {
    // lexicographically "10" < "9", numerically 9 < 10
    let items = vec![entry("10", "g", 10), entry("9", "g", 9)];
    let mut list = list_with(items, 5);

    list.sort("name");
    assert_eq!(names(&list), ["10", "9"]);

    list.add_sorter(Sorter::new("name", |a: &Entry, b: &Entry| {
        a.value.cmp(&b.value)
    }));
    list.sort("name");
    assert_eq!(names(&list), ["9", "10"]);
}

#[test]
fn cursor_wraps_across_the_whole_list() {
    let items = (0..5).map(|i| entry(&format!("i{i}"), "g", i)).collect();
    // two pages of two plus one
    let mut list = list_with(items, 2);

    assert_eq!(list.current_index(), 0);
    list.handle_action(&Action::Up);
    assert_eq!(list.current_index(), 4, "up from first wraps to last");
    list.handle_action(&Action::Down);
    assert_eq!(list.current_index(), 0, "down from last wraps to first");

    list.set_index(3);
    list.handle_action(&Action::Down);
    assert_eq!(list.current_index(), 4);
    list.handle_action(&Action::PageDown);
    assert_eq!(list.current_index(), 0, "page-down from last wraps too");
}

#[test]
fn cursor_page_follows_index() {
    let items = (0..6).map(|i| entry(&format!("i{i}"), "g", i)).collect();
    let mut list = list_with(items, 2);
    assert_eq!(list.pages().len(), 3);

    list.set_index(5);
    assert_eq!(list.current_page(), 2);
    list.set_index(0);
    assert_eq!(list.current_page(), 0);
    list.set_index(99);
    assert_eq!(list.current_index(), 5, "out-of-range index clamps");
}

#[test]
fn default_filter_matches_any_column_case_insensitively() {
    let items = vec![
        entry("rock", "g", 1),
        entry("rag", "g", 2),
        entry("rope", "g", 1),
    ];
    let mut list = list_with(items, 10);

    list.handle_action(&Action::Filter);
    assert!(list.is_modal());
    list.handle_modal_key(key(KeyCode::Char('R')));
    list.handle_modal_key(key(KeyCode::Char('o')));
    list.handle_modal_key(key(KeyCode::Enter));
    assert!(!list.is_modal());

    assert_eq!(list.filter_text(), "Ro");
    assert_eq!(names(&list), ["rock", "rope"], "original relative order kept");

    list.handle_action(&Action::ResetFilter);
    assert_eq!(list.len(), 3);
}

#[test]
fn filter_predicate_only_runs_with_nonempty_text() {
    use std::cell::Cell;
    use std::rc::Rc;

    let calls = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&calls);
    let mut list = list_with(vec![entry("a", "g", 0)], 5);
    list.set_ffilter("never matches", move |_: &Entry, _: &str| {
        counter.set(counter.get() + 1);
        false
    });
    list.rebuild(None);
    assert_eq!(calls.get(), 0, "empty filter must not invoke the predicate");
    assert_eq!(list.len(), 1);
}

#[test]
fn rebuild_is_idempotent() {
    let items = vec![entry("b", "g2", 1), entry("a", "g1", 0)];
    let mut list = list_with(items, 5);
    list.sort("name");
    list.group("group");
    let before = names(&list);
    let pages_before = list.pages().to_vec();

    list.rebuild(None);
    list.rebuild(None);
    assert_eq!(names(&list), before);
    assert_eq!(list.pages(), pages_before.as_slice());
}

#[test]
fn rebuild_hook_sees_reset_then_each_survivor() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let log: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let mut list = list_with(vec![entry("rock", "g", 1), entry("rag", "g", 2)], 5);
    list.on_rebuild(move |item: Option<&Entry>| {
        sink.borrow_mut().push(match item {
            None => "reset".to_string(),
            Some(e) => e.name.clone(),
        });
    });
    list.rebuild(None);
    assert_eq!(*log.borrow(), ["reset", "rock", "rag"]);
}

#[test]
fn partial_select_reads_an_amount() {
    let mut list = list_with(vec![entry("rock", "g", 1)], 5);
    list.set_fcounting(|_| 5);

    assert_eq!(list.handle_action(&Action::SelectPartial), Outcome::Continue);
    assert!(list.is_modal());
    list.handle_modal_key(key(KeyCode::Char('3')));
    let outcome = list.handle_modal_key(key(KeyCode::Enter));
    match outcome {
        Outcome::Done(selection) => {
            assert_eq!(selection.len(), 1);
            assert_eq!(selection[0].count, 3);
            assert_eq!(list.item(selection[0].index).map(|e| e.name.as_str()), Some("rock"));
        }
        Outcome::Continue => panic!("expected a selection"),
    }
}

#[test]
fn partial_select_zero_cancels() {
    let mut list = list_with(vec![entry("rock", "g", 1)], 5);
    list.set_fcounting(|_| 5);

    list.handle_action(&Action::SelectPartial);
    list.handle_modal_key(key(KeyCode::Char('0')));
    assert_eq!(list.handle_modal_key(key(KeyCode::Enter)), Outcome::Continue);
    assert!(!list.is_modal(), "cancel leaves the prompt");
}

#[test]
fn partial_select_clamps_to_the_counting_function() {
    let mut list = list_with(vec![entry("rock", "g", 1)], 5);
    list.set_fcounting(|_| 5);

    list.handle_action(&Action::SelectPartial);
    for c in ['9', '9'] {
        list.handle_modal_key(key(KeyCode::Char(c)));
    }
    match list.handle_modal_key(key(KeyCode::Enter)) {
        Outcome::Done(selection) => assert_eq!(selection[0].count, 5),
        Outcome::Continue => panic!("expected a selection"),
    }
}

#[test]
fn select_whole_uses_the_stack_count() {
    let mut list = list_with(vec![entry("rock", "g", 1)], 5);
    list.set_fcounting(|_| 7);
    match list.handle_action(&Action::SelectWhole) {
        Outcome::Done(selection) => assert_eq!(selection[0].count, 7),
        Outcome::Continue => panic!("expected a selection"),
    }
}

#[test]
fn select_all_returns_every_entry() {
    let items = vec![entry("a", "g", 0), entry("b", "g", 1), entry("c", "g", 2)];
    let mut list = list_with(items, 5);
    match list.handle_action(&Action::SelectAll) {
        Outcome::Done(selection) => {
            assert_eq!(selection.len(), 3);
            assert!(selection.iter().all(|s| s.count == 1));
        }
        Outcome::Continue => panic!("expected a selection"),
    }
}

#[test]
fn select_without_counting_function_counts_one() {
    let mut list = list_with(vec![entry("rock", "g", 1)], 5);
    match list.handle_action(&Action::Select) {
        Outcome::Done(selection) => assert_eq!(selection[0].count, 1),
        Outcome::Continue => panic!("expected a selection"),
    }
}

#[test]
fn quit_action_suspends_the_list() {
    let mut list = list_with(vec![entry("rock", "g", 1)], 5);
    list.set_active(true);
    assert!(!list.suspended());
    assert_eq!(list.handle_action(&Action::Quit), Outcome::Continue);
    assert!(list.suspended());
    list.suspend();
    assert!(list.suspended(), "suspend is idempotent");
}

#[test]
fn state_round_trip_restores_view() {
    let items = vec![
        entry("c", "g2", 2),
        entry("a", "g1", 0),
        entry("b", "g1", 1),
    ];
    let mut list = list_with(items.clone(), 5);
    list.sort("value");
    list.group("group");
    list.handle_action(&Action::Filter);
    for c in ['b'] {
        list.handle_modal_key(key(KeyCode::Char(c)));
    }
    list.handle_modal_key(key(KeyCode::Enter));
    list.set_index(0);

    let state = list.save_state();
    assert!(state.initialized);

    let mut restored = list_with(items, 5);
    restored.load_state(&state, true);
    assert_eq!(restored.sort_index(), list.sort_index());
    assert_eq!(restored.group_index(), list.group_index());
    assert_eq!(restored.filter_text(), "b");
    assert_eq!(restored.current_index(), 0);
    assert_eq!(names(&restored), ["b"]);
}

#[test]
fn stale_state_indices_clamp_instead_of_failing() {
    let mut state = list_with(vec![entry("a", "g", 0)], 5).save_state();
    state.sort = 99;
    state.group = 99;
    state.idx = 99;

    let mut list = list_with(vec![entry("a", "g", 0), entry("b", "g", 1)], 5);
    list.load_state(&state, true);
    assert!(list.sort_index() < 3);
    assert!(list.group_index() < 2);
    assert_eq!(list.current_index(), 1, "cursor clamps to the last entry");
}

#[test]
fn resize_reclamps_the_cursor() {
    let items = (0..10).map(|i| entry(&format!("i{i}"), "g", i)).collect();
    let mut list = list_with(items, 4);
    list.set_index(9);
    list.resize(Rect::new(0, 0, 40, 8));
    assert_eq!(list.current_index(), 9);
    assert_eq!(list.pages().last().map(|p| p.1), Some(10));
}

#[test]
fn render_smoke_test() {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    let items = vec![entry("rock", "g", 1), entry("rag", "g", 2)];
    let mut list = list_with(items, 4);
    list.set_active(true);

    let backend = TestBackend::new(40, 10);
    let mut terminal = Terminal::new(backend).unwrap();
    list.resize(Rect::new(0, 0, 40, 10));
    terminal.draw(|frame| list.render(frame)).unwrap();

    let buffer = terminal.backend().buffer().clone();
    let mut screen = String::new();
    for y in 0..10 {
        for x in 0..40 {
            if let Some(cell) = buffer.cell((x, y)) {
                screen.push_str(cell.symbol());
            }
        }
        screen.push('\n');
    }
    assert!(screen.contains("Sort: none"), "missing sort header:\n{screen}");
    assert!(screen.contains("page 1 of 1"), "missing page line:\n{screen}");
    assert!(screen.contains("name"), "missing column header:\n{screen}");
    assert!(screen.contains("rock"), "missing entry:\n{screen}");
    assert!(screen.contains("Filter"), "missing footer:\n{screen}");
}
