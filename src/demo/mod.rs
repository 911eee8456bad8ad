//! Demo application modules: a toy item world and the transfer screen
//! wired over it.

pub mod app;
pub mod items;
