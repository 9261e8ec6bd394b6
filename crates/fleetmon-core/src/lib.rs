//! # fleetmon-core - Core Domain Types
//!
//! Foundation crate for Fleet Monitor. Provides the fleet domain model,
//! error handling, and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, tracing, dirs).
//!
//! ## Public API
//!
//! ### Fleet (`types`)
//! - [`Pose`] - Position and heading of a robot
//! - [`RobotSnapshot`] - One robot as reported by a fleet poll
//! - [`FleetSnapshot`] - All robots, iterated in lexicographic id order
//!
//! ### Robot messages (`robot_log`)
//! - [`RobotMessage`], [`MessageKind`], [`MessageAuthor`]
//!
//! ### Configuration values (`config_value`)
//! - [`ConfigValue`], [`ConfigValueType`]
//!
//! ### Scenarios (`scenario`)
//! - [`ScenarioStatus`], [`ScenarioResult`], [`ScenarioInfo`]
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with a `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! ```rust
//! use fleetmon_core::prelude::*;
//! ```

pub mod config_value;
pub mod error;
pub mod logging;
pub mod robot_log;
pub mod scenario;
pub mod types;

/// Prelude for common imports used throughout all Fleet Monitor crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use config_value::{ConfigValue, ConfigValueType};
pub use error::{Error, Result, ResultExt};
pub use robot_log::{MessageAuthor, MessageKind, RobotMessage};
pub use scenario::{ResultRow, ScenarioId, ScenarioInfo, ScenarioResult, ScenarioStatus};
pub use types::{json_text, FleetSnapshot, Pose, RobotId, RobotSnapshot};
