//! fleetmon-app - Application state and orchestration for Fleet Monitor
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management, the Engine abstraction shared by the TUI and headless runners,
//! configuration loading, and the background pollers.
//!
//! ## Stateful components
//! - [`robot_list::RobotList`] - Fleet list reconciliation
//! - [`message_log::MessageLog`] - Grouped message log with scroll state
//! - [`config_editor::ConfigEditor`] - Config values with pending edits
//! - [`scenario::ScenarioRunner`] - Scenario choice and run state machine

pub mod actions;
pub mod config;
pub mod config_editor;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod message_log;
pub mod pollers;
pub mod process;
pub mod robot_list;
pub mod scenario;
pub mod signals;
pub mod state;

// Re-export primary types
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use handler::{handle_key, UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use state::{AppState, UiMode};
