// src/scenario/side_pass.rs

use super::{Scenario, ScenarioStatus};
use crate::context::PlanningContext;
use crate::frame::Frame;
use crate::types::{OverlapKind, ScenarioType, SidePassConfig};

/// Passing a stalled obstacle that blocks the lane.
pub struct SidePassScenario {
    config: SidePassConfig,
    status: ScenarioStatus,
}

impl SidePassScenario {
    pub fn new(config: SidePassConfig) -> Self {
        Self {
            config,
            status: ScenarioStatus::Running,
        }
    }
}

impl Scenario for SidePassScenario {
    fn scenario_type(&self) -> ScenarioType {
        ScenarioType::SidePass
    }

    fn status(&self) -> ScenarioStatus {
        self.status
    }

    fn set_status(&mut self, status: ScenarioStatus) {
        self.status = status;
    }

    /// Legal only while a qualifying obstacle is still present ahead.
    fn is_transferable(&self, _: &dyn Scenario, frame: &Frame, _: &PlanningContext) -> bool {
        let reference_line = frame.first_reference_line();
        match reference_line.first_encountered(OverlapKind::Obstacle) {
            Some(obstacle) => {
                let distance = obstacle.start_s - reference_line.adc_front_edge_s;
                distance > 0.0 && distance <= self.config.max_obstacle_distance
            }
            None => false,
        }
    }
}
