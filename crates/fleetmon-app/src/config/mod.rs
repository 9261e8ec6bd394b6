//! Configuration file parsing for Fleet Monitor
//!
//! Supports `<config_dir>/fleet-monitor/config.toml` plus the
//! `FLEETMON_API_URL` / `--api-url` base URL overrides.

pub mod settings;
pub mod types;

pub use settings::{
    apply_overrides, default_config_path, env_api_url, init_config_file, load_settings, validate,
    API_URL_ENV, APP_DIR, CONFIG_FILENAME,
};
pub use types::*;
