//! Controller endpoints and URL path construction

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped inside a single path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Direction of a straight move. The controller expects `1` for forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
}

impl MoveDirection {
    pub fn wire(self) -> u8 {
        match self {
            Self::Forward => 1,
            Self::Backward => 0,
        }
    }
}

/// Direction of an in-place rotation. The controller expects `1` for right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateDirection {
    Right,
    Left,
}

impl RotateDirection {
    pub fn wire(self) -> u8 {
        match self {
            Self::Right => 1,
            Self::Left => 0,
        }
    }
}

/// One controller endpoint with its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Robots,
    NewMessages {
        robot: String,
    },
    Move {
        robot: String,
        millimeters: u32,
        direction: MoveDirection,
    },
    Rotate {
        robot: String,
        degrees: u32,
        direction: RotateDirection,
    },
    Scenarios,
    RunScenario {
        robot: String,
        scenario: String,
    },
    ScenarioStatus {
        uuid: String,
    },
    ScenarioInfo {
        scenario: String,
    },
    SyncConfig {
        robot: String,
    },
    AllConfigValues {
        robot: String,
    },
    SetConfigValue {
        robot: String,
        config: String,
        value: String,
    },
    StoreAndReboot {
        robot: String,
    },
}

impl Route {
    /// URL path relative to the controller base URL, with every dynamic
    /// segment percent-encoded
    pub fn path(&self) -> String {
        match self {
            Route::Robots => "/robot/all".to_string(),
            Route::NewMessages { robot } => format!("/robot/{}/newmessages", seg(robot)),
            Route::Move {
                robot,
                millimeters,
                direction,
            } => format!(
                "/robot/{}/move/{}/{}",
                seg(robot),
                millimeters,
                direction.wire()
            ),
            Route::Rotate {
                robot,
                degrees,
                direction,
            } => format!(
                "/robot/{}/rotate/{}/{}",
                seg(robot),
                degrees,
                direction.wire()
            ),
            Route::Scenarios => "/scenario/all".to_string(),
            Route::RunScenario { robot, scenario } => {
                format!("/scenario/run/{}/{}", seg(robot), seg(scenario))
            }
            Route::ScenarioStatus { uuid } => format!("/scenario/status/{}", seg(uuid)),
            Route::ScenarioInfo { scenario } => format!("/scenario/info/{}", seg(scenario)),
            Route::SyncConfig { robot } => {
                format!("/config/sync_value_information/{}", seg(robot))
            }
            Route::AllConfigValues { robot } => {
                format!("/config/get_all_value_information/{}", seg(robot))
            }
            Route::SetConfigValue {
                robot,
                config,
                value,
            } => format!(
                "/config/set_value/{}/{}/{}",
                seg(robot),
                seg(config),
                seg(value)
            ),
            Route::StoreAndReboot { robot } => {
                format!("/config/store_and_reboot/{}", seg(robot))
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn seg(raw: &str) -> String {
    utf8_percent_encode(raw, PATH_SEGMENT).to_string()
}
