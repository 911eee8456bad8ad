//! UI module for stashlist
//!
//! This module contains the widget components, the shared input/state
//! plumbing and the layout helpers.

pub mod components;
pub mod core;
pub mod layout;

pub use components::{Column, Grouper, ListView, Selection, Sorter};
pub use components::{SourceEntry, SourceRef, SourcedListView};
pub use components::{TransferUi, UiEvent};
pub use layout::LayoutManager;
