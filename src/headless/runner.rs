//! Headless mode runner - main event loop without TUI

use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};

use fleetmon_api::FleetApi;
use fleetmon_app::{Engine, EngineEvent, Message};
use fleetmon_core::prelude::*;

use super::{command, HeadlessEvent};

/// Run in headless mode: NDJSON events on stdout, commands on stdin
pub async fn run_headless<A>(mut engine: Engine<A>) -> Result<()>
where
    A: FleetApi + Send + Sync + 'static,
{
    info!("═══════════════════════════════════════════════════════");
    info!("Fleet Monitor starting in HEADLESS mode");
    info!("Controller: {}", engine.settings.api.base_url);
    info!("═══════════════════════════════════════════════════════");

    let mut events = engine.subscribe();

    let stdin_tx = engine.msg_sender();
    std::thread::spawn(move || {
        read_stdin_blocking(stdin_tx);
    });

    engine.start();

    let result = headless_event_loop(&mut engine, &mut events).await;

    engine.shutdown().await;
    flush_events(&mut events);

    info!("Fleet Monitor headless mode exiting");
    result
}

async fn headless_event_loop<A>(
    engine: &mut Engine<A>,
    events: &mut broadcast::Receiver<EngineEvent>,
) -> Result<()>
where
    A: FleetApi + Send + Sync + 'static,
{
    loop {
        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        match engine.msg_rx.recv().await {
            Some(msg) => {
                engine.process_message(msg);
                flush_events(events);
            }
            None => {
                info!("Message channel closed");
                break;
            }
        }
    }

    Ok(())
}

/// Write every event broadcast so far to stdout
fn flush_events(events: &mut broadcast::Receiver<EngineEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => HeadlessEvent::from(event).emit(),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!("Headless output fell behind, {} events dropped", skipped);
            }
            Err(_) => break,
        }
    }
}

/// Forward stdin commands to the engine until `quit` or end of input
fn read_stdin_blocking(msg_tx: mpsc::Sender<Message>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };

        let messages = match command::parse(&line) {
            Ok(messages) => messages,
            Err(reason) => {
                warn!("Rejected stdin command {:?}: {}", line.trim(), reason);
                HeadlessEvent::error(reason, false).emit();
                continue;
            }
        };

        let quit = messages.iter().any(|m| matches!(m, Message::Quit));
        for msg in messages {
            if msg_tx.blocking_send(msg).is_err() {
                info!("Engine gone, stdin reader exiting");
                return;
            }
        }
        if quit {
            break;
        }
    }

    info!("Stdin reader exiting");
}
