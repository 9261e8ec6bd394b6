//! Stdin commands understood in headless mode
//!
//! One command per line:
//!
//! ```text
//! select 3
//! move 250 forward
//! rotate 90 left
//! run robot_rotation_time
//! set 2 0.35
//! set 5 north dock
//! apply
//! quit
//! ```

use fleetmon_api::{MoveDirection, RotateDirection};
use fleetmon_app::Message;

/// Parse one stdin line into the messages it stands for.
///
/// Returns `Ok(vec![])` for blank lines and `Err` with a short reason for
/// anything unrecognised.
pub fn parse(line: &str) -> Result<Vec<Message>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();

    let messages = match words.as_slice() {
        [] => Vec::new(),
        ["q" | "quit"] => vec![Message::Quit],
        ["select", robot] => vec![Message::SelectRobot(robot.to_string())],
        ["move", amount, direction] => {
            let direction = match *direction {
                "forward" | "f" => MoveDirection::Forward,
                "backward" | "b" => MoveDirection::Backward,
                other => return Err(format!("unknown direction '{other}'")),
            };
            vec![Message::MoveRobot {
                millimeters: Some(parse_amount(amount)?),
                direction,
            }]
        }
        ["rotate", amount, direction] => {
            let direction = match *direction {
                "left" | "l" => RotateDirection::Left,
                "right" | "r" => RotateDirection::Right,
                other => return Err(format!("unknown direction '{other}'")),
            };
            vec![Message::RotateRobot {
                degrees: Some(parse_amount(amount)?),
                direction,
            }]
        }
        ["run", scenario] => vec![
            Message::ChooseScenario(scenario.to_string()),
            Message::RunScenario,
        ],
        ["info", scenario] => vec![
            Message::ChooseScenario(scenario.to_string()),
            Message::RequestScenarioInfo,
        ],
        ["set", config, _, ..] => vec![Message::ConfigFieldInput {
            config: config.to_string(),
            text: rest_after(line, 2).to_string(),
        }],
        ["apply"] => vec![Message::ApplyConfig],
        ["discard"] => vec![Message::DiscardConfig],
        ["store"] => vec![Message::StoreAndReboot],
        [verb, ..] => return Err(format!("unknown command '{verb}'")),
    };

    Ok(messages)
}

/// Text of `line` after its first `skip` words, inner spacing kept
fn rest_after(line: &str, skip: usize) -> &str {
    let mut rest = line.trim();
    for _ in 0..skip {
        rest = rest
            .split_once(char::is_whitespace)
            .map_or("", |(_, tail)| tail)
            .trim_start();
    }
    rest
}

fn parse_amount(text: &str) -> Result<u32, String> {
    text.parse::<u32>()
        .map_err(|_| format!("'{text}' is not a whole number"))
}
