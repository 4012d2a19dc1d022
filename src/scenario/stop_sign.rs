// src/scenario/stop_sign.rs

use super::{Scenario, ScenarioStatus};
use crate::context::PlanningContext;
use crate::frame::Frame;
use crate::types::{OverlapKind, ScenarioType, StopSignUnprotectedConfig};

/// Stop, yield and creep through a stop-sign controlled intersection
/// without right-of-way coordination.
pub struct StopSignUnprotectedScenario {
    config: StopSignUnprotectedConfig,
    status: ScenarioStatus,
}

impl StopSignUnprotectedScenario {
    pub fn new(config: StopSignUnprotectedConfig) -> Self {
        Self {
            config,
            status: ScenarioStatus::Running,
        }
    }
}

impl Scenario for StopSignUnprotectedScenario {
    fn scenario_type(&self) -> ScenarioType {
        ScenarioType::StopSignUnprotected
    }

    fn status(&self) -> ScenarioStatus {
        self.status
    }

    fn set_status(&mut self, status: ScenarioStatus) {
        self.status = status;
    }

    /// Legal once the stop sign's stop line is ahead and within the
    /// trigger distance.
    fn is_transferable(&self, _: &dyn Scenario, frame: &Frame, _: &PlanningContext) -> bool {
        let reference_line = frame.first_reference_line();
        match reference_line.first_encountered(OverlapKind::StopSign) {
            Some(stop_sign) => {
                let distance = stop_sign.start_s - reference_line.adc_front_edge_s;
                distance > 0.0 && distance <= self.config.start_stop_sign_scenario_distance
            }
            None => false,
        }
    }
}
