//! Core UI plumbing shared by all widgets: input actions and persisted state.

pub mod actions;
pub mod state;

pub use actions::Action;
pub use state::{ListSaveState, StateError, TransferSaveState};
