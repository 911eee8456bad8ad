//! Stashlist - browsable, sortable list widgets for terminal games
//!
//! This library provides a family of composable Ratatui components for
//! browsing, sorting, filtering, grouping and multi-selecting items drawn
//! from caller-supplied collections, built for inventory-style screens in
//! terminal games:
//!
//! * [`ui::ListView`] - a generic paginated list over an owned snapshot,
//!   configured entirely with function values (column printers, sorters,
//!   groupers, filters, hooks)
//! * [`ui::SourcedListView`] - a list whose data can be switched between
//!   registered sources, with availability fallback and an on-screen
//!   source map
//! * [`ui::TransferUi`] - two sourced lists side by side with a FIFO event
//!   queue, for move/transfer workflows
//!
//! The binary target runs a small demo inventory-transfer screen over a toy
//! item world.

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// Demo application: toy item world and transfer screen wiring
pub mod demo;

/// Logging utilities for debugging and error tracking
pub mod logger;

/// Widget components, input actions, persisted state and layout helpers
pub mod ui;

// Re-export the widgets for convenient access
pub use ui::components::{Column, Grouper, ListView, Outcome, Selection, Sorter};
pub use ui::components::{SourceEntry, SourceRef, SourcedListView};
pub use ui::components::{TransferUi, UiEvent};
