//! Engine - shared orchestration state for TUI and headless runners
//!
//! The Engine owns the TEA state, the message channel, the shutdown signal,
//! the fleet ticker and the event broadcaster. Frontends only feed it
//! messages and read `state` (TUI) or subscribe to events (headless).

use std::sync::Arc;
use std::time::Duration;

use fleetmon_api::FleetApi;
use fleetmon_core::{FleetSnapshot, RobotId};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::actions::{handle_action, ActionContext};
use crate::config::Settings;
use crate::config_editor::ConfigLoad;
use crate::engine_event::EngineEvent;
use crate::handler::UpdateAction;
use crate::message::Message;
use crate::pollers;
use crate::process;
use crate::scenario::{RunOutcome, RunState};
use crate::signals;
use crate::state::{AppState, Notice, NoticeLevel};

/// Where the scenario run stood when the snapshot was taken
#[derive(Debug, Clone, PartialEq)]
enum RunMark {
    Idle,
    Starting,
    Running { uuid: String, percent: u8 },
    Finished { uuid: String, success: bool },
}

impl RunMark {
    fn capture(state: &RunState) -> Self {
        match state {
            RunState::Idle => Self::Idle,
            RunState::Starting { .. } => Self::Starting,
            RunState::Running { uuid, percent, .. } => Self::Running {
                uuid: uuid.clone(),
                percent: *percent,
            },
            RunState::Finished { uuid, outcome } => Self::Finished {
                uuid: uuid.clone(),
                success: matches!(outcome, RunOutcome::Success(_)),
            },
        }
    }
}

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone)]
struct StateSnapshot {
    fleet: FleetSnapshot,
    selected: Option<RobotId>,
    appended: u64,
    config_load: ConfigLoad,
    run: RunMark,
    notice: Option<Notice>,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            fleet: state.fleet.clone(),
            selected: state.selected.clone(),
            appended: state.message_log.total_appended(),
            config_load: state.config_editor.load().clone(),
            run: RunMark::capture(state.scenario.state()),
            notice: state.notice.clone(),
        }
    }
}

/// Orchestration engine for the fleet monitor.
///
/// Generic over the controller API so tests can drive it with a fake.
pub struct Engine<A> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (signal handler, stdin reader).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    /// The frontend event loop drains messages from here.
    pub msg_rx: mpsc::Receiver<Message>,

    /// Sender for the shutdown signal. Send `true` to initiate shutdown.
    pub shutdown_tx: watch::Sender<bool>,

    /// Receiver for the shutdown signal. Clone for background tasks.
    pub shutdown_rx: watch::Receiver<bool>,

    /// Loaded settings
    pub settings: Settings,

    ctx: ActionContext<A>,

    /// Long-lived tasks awaited on shutdown
    tasks: Vec<JoinHandle<()>>,

    /// Event broadcaster for external consumers.
    event_tx: broadcast::Sender<EngineEvent>,
}

impl<A> Engine<A>
where
    A: FleetApi + Send + Sync + 'static,
{
    /// Create an engine. Nothing runs until [`Engine::start`].
    pub fn new(settings: Settings, api: A) -> Self {
        let state = AppState::with_settings(settings.clone());
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (event_tx, _) = broadcast::channel(256);

        let ctx = ActionContext {
            api: Arc::new(api),
            msg_tx: msg_tx.clone(),
            shutdown_rx: shutdown_rx.clone(),
            polling: settings.polling.clone(),
        };

        Self {
            state,
            msg_tx,
            msg_rx,
            shutdown_tx,
            shutdown_rx,
            settings,
            ctx,
            tasks: Vec::new(),
            event_tx,
        }
    }

    /// Start background work:
    /// - signal handler
    /// - fleet ticker (first tick fires immediately)
    /// - scenario list fetch
    pub fn start(&mut self) {
        signals::spawn_signal_handler(self.msg_tx.clone());

        let ticker = pollers::spawn_fleet_ticker(
            self.settings.polling.fleet_interval(),
            self.msg_tx.clone(),
            self.shutdown_rx.clone(),
        );
        self.tasks.push(ticker);

        handle_action(UpdateAction::FetchScenarios, &self.ctx);
        info!(
            "Engine started, polling {} every {:?}",
            self.settings.api.base_url,
            self.settings.polling.fleet_interval()
        );
    }

    /// Subscribe to engine events.
    ///
    /// If the subscriber falls behind (buffer full), older events are
    /// dropped. Use `broadcast::error::RecvError::Lagged` to detect this.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Process a single message through the TEA update cycle and emit
    /// events for whatever it changed.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        process::process_message(&mut self.state, msg, &self.ctx);

        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Initiate shutdown: cancel the scenario poller, signal background
    /// tasks, wait for the long-lived ones.
    pub async fn shutdown(&mut self) {
        self.emit(EngineEvent::Shutdown);

        self.state.scenario.shutdown();
        let _ = self.shutdown_tx.send(true);

        for handle in self.tasks.drain(..) {
            match tokio::time::timeout(Duration::from_secs(2), handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Background task panicked: {}", e),
                Err(_) => warn!("Background task shutdown timed out"),
            }
        }
        info!("Engine stopped");
    }

    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        if pre.fleet != post.fleet {
            self.emit(EngineEvent::FleetChanged {
                robots: post.fleet.iter().cloned().collect(),
            });
        }

        if pre.selected != post.selected {
            if let Some(robot) = &post.selected {
                self.emit(EngineEvent::RobotSelected {
                    robot: robot.clone(),
                });
            }
        }

        if post.appended > pre.appended {
            if let Some(robot) = &post.selected {
                let new_count = (post.appended - pre.appended) as usize;
                self.emit(EngineEvent::Messages {
                    robot: robot.clone(),
                    messages: self.state.message_log.last_messages(new_count),
                });
            }
        }

        if pre.config_load != post.config_load {
            if let Some(robot) = self.state.config_editor.robot() {
                match &post.config_load {
                    ConfigLoad::Ready => self.emit(EngineEvent::ConfigLoaded {
                        robot: robot.to_string(),
                        values: self
                            .state
                            .config_editor
                            .fields()
                            .iter()
                            .map(|f| f.synced.clone())
                            .collect(),
                    }),
                    ConfigLoad::Failed(message) => self.emit(EngineEvent::ConfigFailed {
                        robot: robot.to_string(),
                        message: message.clone(),
                    }),
                    ConfigLoad::Idle | ConfigLoad::Syncing => {}
                }
            }
        }

        if pre.run != post.run {
            match &post.run {
                RunMark::Running { uuid, percent } => match &pre.run {
                    RunMark::Running { uuid: old, .. } if old == uuid => {
                        self.emit(EngineEvent::ScenarioProgress {
                            uuid: uuid.clone(),
                            percent: *percent,
                        });
                    }
                    _ => self.emit(EngineEvent::ScenarioStarted { uuid: uuid.clone() }),
                },
                RunMark::Finished { uuid, success } => {
                    self.emit(EngineEvent::ScenarioFinished {
                        uuid: uuid.clone(),
                        success: *success,
                        result: self.state.scenario.result_table().cloned(),
                    });
                }
                RunMark::Idle | RunMark::Starting => {}
            }
        }

        if pre.notice != post.notice {
            if let Some(Notice {
                level: NoticeLevel::Error,
                text,
            }) = &post.notice
            {
                self.emit(EngineEvent::Error {
                    message: text.clone(),
                });
            }
        }
    }

    /// send() returns Err only if there are no receivers
    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetmon_api::test_utils::{
        running_status, test_config_value, test_fleet, ApiCall, FakeFleetApi,
    };
    use fleetmon_core::{MessageKind, RobotMessage, ScenarioStatus};

    fn engine(api: FakeFleetApi) -> Engine<FakeFleetApi> {
        Engine::new(Settings::default(), api)
    }

    fn drain_events(rx: &mut broadcast::Receiver<EngineEvent>) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_engine_new_creates_valid_state() {
        let engine = engine(FakeFleetApi::new());
        assert!(!engine.should_quit());
        assert!(engine.state.fleet.is_empty());
        assert!(!*engine.shutdown_receiver().borrow());
    }

    #[tokio::test]
    async fn test_engine_drain_empty_channel() {
        let mut engine = engine(FakeFleetApi::new());
        assert_eq!(engine.drain_pending_messages(), 0);
    }

    #[tokio::test]
    async fn test_engine_process_quit_message() {
        let mut engine = engine(FakeFleetApi::new());
        engine.process_message(Message::Quit);
        assert!(engine.should_quit());
    }

    #[tokio::test]
    async fn test_subscribe_receives_shutdown_event() {
        let mut engine = engine(FakeFleetApi::new());
        let mut rx = engine.subscribe();

        engine.shutdown().await;

        assert_eq!(rx.try_recv().ok(), Some(EngineEvent::Shutdown));
        assert!(*engine.shutdown_receiver().borrow());
    }

    #[tokio::test]
    async fn test_no_subscribers_no_error() {
        let mut engine = engine(FakeFleetApi::new());
        engine.process_message(Message::FleetReceived(Ok(test_fleet(&["1"]))));
    }

    #[tokio::test]
    async fn test_fleet_change_emits_once_per_change() {
        let mut engine = engine(FakeFleetApi::new());
        let mut rx = engine.subscribe();

        engine.process_message(Message::FleetReceived(Ok(test_fleet(&["1", "2"]))));
        engine.process_message(Message::FleetReceived(Ok(test_fleet(&["1", "2"]))));

        let events = drain_events(&mut rx);
        assert_eq!(events.len(), 1);
        match &events[0] {
            EngineEvent::FleetChanged { robots } => assert_eq!(robots.len(), 2),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_selection_and_messages_emit_events() {
        let mut engine = engine(FakeFleetApi::new());
        engine.process_message(Message::FleetReceived(Ok(test_fleet(&["1"]))));
        let mut rx = engine.subscribe();

        engine.process_message(Message::SelectRobot("1".into()));
        engine.process_message(Message::MessagesReceived {
            robot: "1".into(),
            result: Ok(vec![RobotMessage {
                kind: MessageKind::Response,
                message_id: "1".into(),
                category: "nav".into(),
                text: "arrived".into(),
            }]),
        });

        let events = drain_events(&mut rx);
        assert_eq!(
            events[0],
            EngineEvent::RobotSelected { robot: "1".into() }
        );
        match &events[1] {
            EngineEvent::Messages { robot, messages } => {
                assert_eq!(robot, "1");
                assert_eq!(messages.len(), 1);
                assert_eq!(messages[0].text, "arrived");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_config_load_emits_values() {
        let mut engine = engine(FakeFleetApi::new());
        engine.process_message(Message::FleetReceived(Ok(test_fleet(&["1"]))));
        engine.process_message(Message::SelectRobot("1".into()));
        let mut rx = engine.subscribe();

        engine.process_message(Message::ConfigLoaded {
            robot: "1".into(),
            result: Ok(vec![test_config_value("1", "speed", "5")]),
        });

        match drain_events(&mut rx).first() {
            Some(EngineEvent::ConfigLoaded { robot, values }) => {
                assert_eq!(robot, "1");
                assert_eq!(values.len(), 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_scenario_lifecycle_events() {
        let mut engine = engine(FakeFleetApi::new());
        engine.process_message(Message::FleetReceived(Ok(test_fleet(&["1"]))));
        engine.process_message(Message::SelectRobot("1".into()));
        engine.process_message(Message::ScenariosReceived(Ok(vec!["spin".into()])));
        engine.process_message(Message::RunScenario);
        let mut rx = engine.subscribe();

        engine.process_message(Message::ScenarioStartResult {
            scenario: "spin".into(),
            result: Ok("u-1".into()),
        });
        engine.process_message(Message::ScenarioStatusReceived {
            uuid: "u-1".into(),
            result: Ok(running_status(40)),
        });
        engine.process_message(Message::ScenarioStatusReceived {
            uuid: "u-1".into(),
            result: Ok(ScenarioStatus {
                finished: true,
                success: false,
                percent_complete: 100,
                result: Default::default(),
            }),
        });

        let kinds: Vec<_> = drain_events(&mut rx)
            .iter()
            .map(|e| e.event_type())
            .filter(|t| t.starts_with("scenario"))
            .collect();
        assert_eq!(
            kinds,
            vec!["scenario_started", "scenario_progress", "scenario_finished"]
        );
    }

    #[tokio::test]
    async fn test_error_notice_emits_error_event() {
        let mut engine = engine(FakeFleetApi::new());
        let mut rx = engine.subscribe();

        engine.process_message(Message::SelectRobot("ghost".into()));

        assert!(drain_events(&mut rx)
            .iter()
            .any(|e| matches!(e, EngineEvent::Error { .. })));
    }

    #[tokio::test]
    async fn test_start_polls_fleet_and_scenarios() {
        let api = FakeFleetApi::new()
            .with_fleet(test_fleet(&["1"]))
            .with_scenarios(&["spin"]);
        let mut engine = engine(api.clone());

        engine.start();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while (!engine.state.fleet_loaded || engine.state.scenario.scenarios().is_empty())
            && tokio::time::Instant::now() < deadline
        {
            if let Ok(Some(msg)) =
                tokio::time::timeout(Duration::from_millis(50), engine.msg_rx.recv()).await
            {
                engine.process_message(msg);
            }
        }

        assert!(engine.state.fleet_loaded);
        assert_eq!(engine.state.scenario.chosen_id().map(String::as_str), Some("spin"));
        assert!(api.count(|c| matches!(c, ApiCall::Robots)) >= 1);

        engine.shutdown().await;
    }
}
