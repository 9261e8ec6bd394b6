//! Settings file loading, overrides, and initialisation

use std::path::{Path, PathBuf};

use fleetmon_core::prelude::*;
use url::Url;

use super::types::Settings;

/// Directory under the platform config dir
pub const APP_DIR: &str = "fleet-monitor";

/// Settings filename
pub const CONFIG_FILENAME: &str = "config.toml";

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "FLEETMON_API_URL";

/// Default settings file location (`~/.config/fleet-monitor/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILENAME))
}

/// Base URL override from the environment, if set
pub fn env_api_url() -> Option<String> {
    std::env::var(API_URL_ENV).ok()
}

/// Load settings from `path`.
///
/// A missing file yields defaults. An unreadable or malformed file also
/// yields defaults, with a warning in the log.
pub fn load_settings(path: &Path) -> Settings {
    if !path.exists() {
        debug!("No config file at {:?}, using defaults", path);
        return Settings::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            Settings::default()
        }
    }
}

/// Apply the environment and command-line base URL overrides, then
/// validate the result. The command line wins over the environment.
pub fn apply_overrides(
    mut settings: Settings,
    env_api_url: Option<String>,
    cli_api_url: Option<String>,
) -> Result<Settings> {
    if let Some(url) = env_api_url.filter(|u| !u.trim().is_empty()) {
        debug!("{} overrides api.base_url", API_URL_ENV);
        settings.api.base_url = url;
    }
    if let Some(url) = cli_api_url {
        debug!("--api-url overrides api.base_url");
        settings.api.base_url = url;
    }
    validate(&settings)?;
    Ok(settings)
}

/// Check values that would otherwise fail later in surprising ways
pub fn validate(settings: &Settings) -> Result<()> {
    let url = Url::parse(&settings.api.base_url).map_err(|e| {
        Error::config_invalid(format!(
            "api.base_url '{}' is not a valid URL: {}",
            settings.api.base_url, e
        ))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::config_invalid(format!(
            "api.base_url must use http or https, got '{}'",
            url.scheme()
        )));
    }
    if settings.polling.retry_max_attempts == 0 {
        return Err(Error::config_invalid(
            "polling.retry_max_attempts must be at least 1",
        ));
    }
    if settings.ui.message_log_max_groups == 0 {
        return Err(Error::config_invalid(
            "ui.message_log_max_groups must be at least 1",
        ));
    }
    Ok(())
}

/// Write a commented default settings file. Existing files are left alone.
///
/// Returns `true` when a file was written.
pub fn init_config_file(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }

    let default_content = r#"# Fleet Monitor Configuration

[api]
# Base URL of the fleet controller (overridden by FLEETMON_API_URL or --api-url)
base_url = "http://127.0.0.1:5000"
request_timeout_ms = 2000

[polling]
# Fleet positions and robot messages
fleet_interval_ms = 500
# Scenario status while a run is active
scenario_interval_ms = 100
# Wait after asking a robot to sync its configuration before polling for it
config_sync_delay_ms = 1000
# Gap between configuration writes when applying edits
config_apply_pacing_ms = 100
# Readiness polling budget for configuration values
retry_max_attempts = 100
retry_delay_ms = 500

[ui]
# Oldest message groups are dropped beyond this count
message_log_max_groups = 2000
# Initial distance (mm) / angle (deg) for movement keys
default_command_amount = "100"
"#;

    std::fs::write(path, default_content).with_context(|| format!("Failed to write {:?}", path))?;
    info!("Created default config at {:?}", path);
    Ok(true)
}
