//! Custom widget components

mod config_modal;
mod header;
mod message_log;
pub mod modal_overlay;
mod robot_info;
mod robot_list;
mod scenario_panel;
mod status_bar;

pub use config_modal::ConfigModal;
pub use header::{LinkStatus, MainHeader};
pub use message_log::MessageLogView;
pub use robot_info::RobotInfo;
pub use robot_list::RobotListPanel;
pub use scenario_panel::ScenarioPanel;
pub use status_bar::StatusBar;
