//! Typed controller operations
//!
//! The application layer talks to the controller only through [`FleetApi`],
//! so its background tasks can run against [`ApiClient`] in production and
//! against a scripted fake in tests.

use fleetmon_core::prelude::*;
use fleetmon_core::{ConfigValue, FleetSnapshot, RobotMessage, ScenarioInfo, ScenarioStatus};

use crate::client::{ApiClient, RetryPolicy};
use crate::protocol::{
    AckResponse, ConfigValuesResponse, InfoResponse, MessagesResponse, RobotsResponse,
    RunResponse, ScenariosResponse, StatusResponse,
};
use crate::routes::{MoveDirection, RotateDirection, Route};

/// Controller operations used by the monitor
#[trait_variant::make(FleetApi: Send)]
pub trait LocalFleetApi {
    /// Current fleet snapshot
    async fn robots(&self) -> Result<FleetSnapshot>;

    /// Messages logged for `robot` since the previous call
    async fn new_messages(&self, robot: &str) -> Result<Vec<RobotMessage>>;

    async fn move_robot(&self, robot: &str, millimeters: u32, direction: MoveDirection);

    async fn rotate_robot(&self, robot: &str, degrees: u32, direction: RotateDirection);

    /// Ids of every scenario the controller can run
    async fn scenarios(&self) -> Result<Vec<String>>;

    /// Start `scenario` on `robot`, returning the run uuid
    async fn run_scenario(&self, robot: &str, scenario: &str) -> Result<String>;

    async fn scenario_status(&self, uuid: &str) -> Result<ScenarioStatus>;

    async fn scenario_info(&self, scenario: &str) -> Result<ScenarioInfo>;

    /// Ask the controller to re-read every config value from the robot
    async fn sync_config(&self, robot: &str);

    /// Poll until the controller reports a complete sync, then return the values
    async fn config_values_when_ready(
        &self,
        robot: &str,
        policy: &RetryPolicy,
    ) -> Result<Vec<ConfigValue>>;

    async fn set_config_value(&self, robot: &str, config: &str, value: &str) -> Result<()>;

    async fn store_and_reboot(&self, robot: &str);
}

impl FleetApi for ApiClient {
    async fn robots(&self) -> Result<FleetSnapshot> {
        let resp: RobotsResponse = self.fetch_json(&Route::Robots).await?;
        Ok(resp.into_fleet())
    }

    async fn new_messages(&self, robot: &str) -> Result<Vec<RobotMessage>> {
        let resp: MessagesResponse = self
            .fetch_json(&Route::NewMessages {
                robot: robot.to_string(),
            })
            .await?;
        resp.into_result()
    }

    async fn move_robot(&self, robot: &str, millimeters: u32, direction: MoveDirection) {
        self.fire_and_forget(&Route::Move {
            robot: robot.to_string(),
            millimeters,
            direction,
        })
        .await
    }

    async fn rotate_robot(&self, robot: &str, degrees: u32, direction: RotateDirection) {
        self.fire_and_forget(&Route::Rotate {
            robot: robot.to_string(),
            degrees,
            direction,
        })
        .await
    }

    async fn scenarios(&self) -> Result<Vec<String>> {
        let resp: ScenariosResponse = self.fetch_json(&Route::Scenarios).await?;
        Ok(resp.scenarios)
    }

    async fn run_scenario(&self, robot: &str, scenario: &str) -> Result<String> {
        let resp: RunResponse = self
            .fetch_json(&Route::RunScenario {
                robot: robot.to_string(),
                scenario: scenario.to_string(),
            })
            .await?;
        resp.into_result()
    }

    async fn scenario_status(&self, uuid: &str) -> Result<ScenarioStatus> {
        let resp: StatusResponse = self
            .fetch_json(&Route::ScenarioStatus {
                uuid: uuid.to_string(),
            })
            .await?;
        Ok(resp.into())
    }

    async fn scenario_info(&self, scenario: &str) -> Result<ScenarioInfo> {
        let resp: InfoResponse = self
            .fetch_json(&Route::ScenarioInfo {
                scenario: scenario.to_string(),
            })
            .await?;
        resp.into_result()
    }

    async fn sync_config(&self, robot: &str) {
        self.fire_and_forget(&Route::SyncConfig {
            robot: robot.to_string(),
        })
        .await
    }

    async fn config_values_when_ready(
        &self,
        robot: &str,
        policy: &RetryPolicy,
    ) -> Result<Vec<ConfigValue>> {
        let resp: ConfigValuesResponse = self
            .fetch_json_until(
                &Route::AllConfigValues {
                    robot: robot.to_string(),
                },
                |r: &ConfigValuesResponse| r.success,
                policy,
            )
            .await?;
        Ok(resp.into_values())
    }

    async fn set_config_value(&self, robot: &str, config: &str, value: &str) -> Result<()> {
        let resp: AckResponse = self
            .fetch_json(&Route::SetConfigValue {
                robot: robot.to_string(),
                config: config.to_string(),
                value: value.to_string(),
            })
            .await?;
        resp.into_result()
    }

    async fn store_and_reboot(&self, robot: &str) {
        self.fire_and_forget(&Route::StoreAndReboot {
            robot: robot.to_string(),
        })
        .await
    }
}
