//! Main TUI runner - entry point and event loop

use std::time::Duration;

use fleetmon_api::FleetApi;
use fleetmon_app::Engine;
use fleetmon_core::prelude::*;

use crate::{event, render, terminal};

/// How long a frame waits for a key press before redrawing
const FRAME_POLL: Duration = Duration::from_millis(50);

/// Run the terminal UI on top of `engine` until the user quits
pub async fn run<A>(mut engine: Engine<A>) -> Result<()>
where
    A: FleetApi + Send + Sync + 'static,
{
    terminal::install_panic_hook();
    let mut term = ratatui::init();

    engine.start();

    let result = run_loop(&mut term, &mut engine);

    engine.shutdown().await;
    ratatui::restore();

    result
}

fn run_loop<A>(terminal: &mut ratatui::DefaultTerminal, engine: &mut Engine<A>) -> Result<()>
where
    A: FleetApi + Send + Sync + 'static,
{
    while !engine.should_quit() {
        // Poller results, signal handler, spawned actions
        engine.drain_pending_messages();

        terminal.draw(|frame| render::view(frame, &engine.state))?;

        if let Some(message) = event::poll(FRAME_POLL)? {
            engine.process_message(message);
        }
    }

    Ok(())
}
