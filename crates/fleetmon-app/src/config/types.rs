//! Configuration types for Fleet Monitor
//!
//! Defines:
//! - `Settings` - Global application settings (`config.toml`)
//! - `ApiSettings`, `PollingSettings`, `UiSettings` - its sections

use std::time::Duration;

use fleetmon_api::RetryPolicy;
use serde::{Deserialize, Serialize};

/// Application settings (config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub polling: PollingSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

/// Where the controller lives
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiSettings {
    /// Base URL of the fleet controller
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ApiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    2000
}

/// Poll cadences and readiness budgets
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PollingSettings {
    /// Fleet and message refresh period
    #[serde(default = "default_fleet_interval_ms")]
    pub fleet_interval_ms: u64,

    /// Scenario status refresh period while a run is active
    #[serde(default = "default_scenario_interval_ms")]
    pub scenario_interval_ms: u64,

    /// Wait between asking a robot to sync its config and polling for it
    #[serde(default = "default_config_sync_delay_ms")]
    pub config_sync_delay_ms: u64,

    /// Gap between consecutive config writes when applying edits
    #[serde(default = "default_config_apply_pacing_ms")]
    pub config_apply_pacing_ms: u64,

    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            fleet_interval_ms: default_fleet_interval_ms(),
            scenario_interval_ms: default_scenario_interval_ms(),
            config_sync_delay_ms: default_config_sync_delay_ms(),
            config_apply_pacing_ms: default_config_apply_pacing_ms(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl PollingSettings {
    pub fn fleet_interval(&self) -> Duration {
        Duration::from_millis(self.fleet_interval_ms.max(1))
    }

    pub fn scenario_interval(&self) -> Duration {
        Duration::from_millis(self.scenario_interval_ms.max(1))
    }

    pub fn config_sync_delay(&self) -> Duration {
        Duration::from_millis(self.config_sync_delay_ms)
    }

    pub fn config_apply_pacing(&self) -> Duration {
        Duration::from_millis(self.config_apply_pacing_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_max_attempts,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

fn default_fleet_interval_ms() -> u64 {
    500
}

fn default_scenario_interval_ms() -> u64 {
    100
}

fn default_config_sync_delay_ms() -> u64 {
    1000
}

fn default_config_apply_pacing_ms() -> u64 {
    100
}

fn default_retry_max_attempts() -> u32 {
    fleetmon_api::DEFAULT_MAX_ATTEMPTS
}

fn default_retry_delay_ms() -> u64 {
    500
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiSettings {
    /// Oldest message groups are evicted beyond this count
    #[serde(default = "default_message_log_max_groups")]
    pub message_log_max_groups: usize,

    /// Initial distance/angle used by movement keys
    #[serde(default = "default_command_amount")]
    pub default_command_amount: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            message_log_max_groups: default_message_log_max_groups(),
            default_command_amount: default_command_amount(),
        }
    }
}

fn default_message_log_max_groups() -> usize {
    2000
}

fn default_command_amount() -> String {
    "100".to_string()
}
