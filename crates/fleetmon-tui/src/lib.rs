//! fleetmon-tui - Terminal UI for Fleet Monitor
//!
//! This crate provides the ratatui-based terminal interface. It drives an
//! Engine from fleetmon-app and adds terminal rendering, key polling, and
//! widget display.

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

pub use runner::run;
