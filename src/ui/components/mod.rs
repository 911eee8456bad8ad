//! The widget components: list browsing, source switching, dual-pane
//! transfer.

pub mod list_view;
pub mod source_view;
pub mod transfer_view;

pub use list_view::{Column, Grouper, ListView, Outcome, Selection, Sorter};
pub use source_view::{SourceEntry, SourceRef, SourcedListView};
pub use transfer_view::{TransferUi, UiEvent, LEFT, RIGHT};
