// src/scenario/traffic_light.rs
//
// Signaled intersection variants. Which one runs depends on the route's
// turn classification at the stop line; the dispatch strategy still routes
// left turns to the protected variant until the dedicated left-turn stage
// pipeline lands.

use super::{Scenario, ScenarioStatus};
use crate::context::PlanningContext;
use crate::frame::Frame;
use crate::types::{OverlapKind, ScenarioType, TrafficLightConfig, TurnType};

fn signal_within_stop_distance(frame: &Frame, max_valid_stop_distance: f64) -> bool {
    let reference_line = frame.first_reference_line();
    match reference_line.first_encountered(OverlapKind::Signal) {
        Some(signal) => {
            let distance = signal.start_s - reference_line.adc_front_edge_s;
            distance <= max_valid_stop_distance
        }
        None => false,
    }
}

/// Cross on a protected phase: stop on red, proceed on green.
pub struct TrafficLightProtectedScenario {
    config: TrafficLightConfig,
    status: ScenarioStatus,
}

impl TrafficLightProtectedScenario {
    pub fn new(config: TrafficLightConfig) -> Self {
        Self {
            config,
            status: ScenarioStatus::Running,
        }
    }
}

impl Scenario for TrafficLightProtectedScenario {
    fn scenario_type(&self) -> ScenarioType {
        ScenarioType::TrafficLightProtected
    }

    fn status(&self) -> ScenarioStatus {
        self.status
    }

    fn set_status(&mut self, status: ScenarioStatus) {
        self.status = status;
    }

    fn is_transferable(&self, _: &dyn Scenario, frame: &Frame, _: &PlanningContext) -> bool {
        // Right turns go to the dedicated unprotected variant.
        frame.first_reference_line().turn_type != TurnType::RightTurn
            && signal_within_stop_distance(frame, self.config.max_valid_stop_distance)
    }
}

/// Unprotected left turn across oncoming traffic at a signal.
pub struct TrafficLightUnprotectedLeftTurnScenario {
    config: TrafficLightConfig,
    status: ScenarioStatus,
}

impl TrafficLightUnprotectedLeftTurnScenario {
    pub fn new(config: TrafficLightConfig) -> Self {
        Self {
            config,
            status: ScenarioStatus::Running,
        }
    }
}

impl Scenario for TrafficLightUnprotectedLeftTurnScenario {
    fn scenario_type(&self) -> ScenarioType {
        ScenarioType::TrafficLightUnprotectedLeftTurn
    }

    fn status(&self) -> ScenarioStatus {
        self.status
    }

    fn set_status(&mut self, status: ScenarioStatus) {
        self.status = status;
    }

    fn is_transferable(&self, _: &dyn Scenario, frame: &Frame, _: &PlanningContext) -> bool {
        frame.first_reference_line().turn_type == TurnType::LeftTurn
            && signal_within_stop_distance(frame, self.config.max_valid_stop_distance)
    }
}

/// Unprotected right turn on red/green with yield.
pub struct TrafficLightUnprotectedRightTurnScenario {
    config: TrafficLightConfig,
    status: ScenarioStatus,
}

impl TrafficLightUnprotectedRightTurnScenario {
    pub fn new(config: TrafficLightConfig) -> Self {
        Self {
            config,
            status: ScenarioStatus::Running,
        }
    }
}

impl Scenario for TrafficLightUnprotectedRightTurnScenario {
    fn scenario_type(&self) -> ScenarioType {
        ScenarioType::TrafficLightUnprotectedRightTurn
    }

    fn status(&self) -> ScenarioStatus {
        self.status
    }

    fn set_status(&mut self, status: ScenarioStatus) {
        self.status = status;
    }

    fn is_transferable(&self, _: &dyn Scenario, frame: &Frame, _: &PlanningContext) -> bool {
        frame.first_reference_line().turn_type == TurnType::RightTurn
            && signal_within_stop_distance(frame, self.config.max_valid_stop_distance)
    }
}
