use stashlist::ui::core::state::{ListSaveState, TransferSaveState};

#[test]
fn json_round_trip_preserves_every_field() {
    let state = TransferSaveState {
        left: ListSaveState {
            slot: 2,
            idx: 7,
            sort: 1,
            group: 1,
            icon: Some('v'),
            filter: "rope".to_string(),
            initialized: true,
        },
        right: ListSaveState {
            slot: 0,
            idx: 0,
            sort: 0,
            group: 0,
            icon: Some('g'),
            filter: String::new(),
            initialized: true,
        },
        focus: 1,
        initialized: true,
    };

    let json = serde_json::to_string(&state).unwrap();
    let back: TransferSaveState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
}

#[test]
fn missing_fields_take_defaults() {
    let back: TransferSaveState = serde_json::from_str("{}").unwrap();
    assert!(!back.initialized);
    assert_eq!(back.focus, 0);
    assert_eq!(back.left, ListSaveState::default());

    let partial: ListSaveState =
        serde_json::from_str(r#"{"idx": 3, "filter": "rock"}"#).unwrap();
    assert_eq!(partial.idx, 3);
    assert_eq!(partial.filter, "rock");
    assert_eq!(partial.icon, None);
    assert!(!partial.initialized);
}

#[test]
fn missing_file_degrades_to_default() {
    let state = TransferSaveState::load_or_default("/nonexistent/stashlist-state.json");
    assert!(!state.initialized);
}

#[test]
fn corrupt_file_degrades_to_default() {
    let path = std::env::temp_dir().join("stashlist-corrupt-state-test.json");
    std::fs::write(&path, "not json at all").unwrap();
    let state = TransferSaveState::load_or_default(&path);
    assert!(!state.initialized);
    std::fs::remove_file(&path).ok();
}

#[test]
fn save_then_load_round_trips_through_disk() {
    let path = std::env::temp_dir().join("stashlist-state-roundtrip-test.json");
    let mut state = TransferSaveState::default();
    state.left.filter = "bottle".to_string();
    state.left.icon = Some('b');
    state.focus = 1;
    state.initialized = true;

    state.save(&path).unwrap();
    let back = TransferSaveState::load(&path).unwrap();
    assert_eq!(back, state);
    std::fs::remove_file(&path).ok();
}
