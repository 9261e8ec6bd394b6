//! Fleet Monitor - terminal monitor for a warehouse robot fleet
//!
//! This is the binary entry point. All logic lives in the libraries.

use std::path::PathBuf;

use clap::Parser;
use fleetmon_api::ApiClient;
use fleetmon_app::config::{self, Settings};
use fleetmon_app::Engine;

/// Fleet Monitor - watch and drive warehouse robots from the terminal
#[derive(Parser, Debug)]
#[command(name = "fleetmon", version)]
#[command(about = "A terminal monitor for warehouse robot fleets", long_about = None)]
struct Args {
    /// Base URL of the fleet controller (overrides FLEETMON_API_URL and the config file)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Settings file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run in headless mode (NDJSON on stdout, commands on stdin)
    #[arg(long)]
    headless: bool,

    /// Write a default settings file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let config_path = args.config.clone().or_else(config::default_config_path);

    if args.init_config {
        let Some(path) = config_path else {
            eprintln!("No config directory on this platform; pass --config <PATH>");
            std::process::exit(1);
        };
        if config::init_config_file(&path)? {
            eprintln!("Wrote {}", path.display());
        } else {
            eprintln!("{} already exists, left untouched", path.display());
        }
        return Ok(());
    }

    fleetmon_core::logging::init()?;

    let settings = match &config_path {
        Some(path) => config::load_settings(path),
        None => Settings::default(),
    };
    let settings = config::apply_overrides(settings, config::env_api_url(), args.api_url)?;

    let api = ApiClient::new(&settings.api.base_url, settings.api.request_timeout())?;
    let engine = Engine::new(settings, api);

    if args.headless {
        fleet_monitor::run_headless(engine).await?;
    } else {
        fleetmon_tui::run(engine).await?;
    }
    Ok(())
}
