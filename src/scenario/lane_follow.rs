// src/scenario/lane_follow.rs

use super::{Scenario, ScenarioStatus};
use crate::context::PlanningContext;
use crate::frame::Frame;
use crate::types::{LaneFollowConfig, ScenarioType};

/// Plain lane keeping. The default behavior and the fallback every
/// selection pass resolves to when nothing else triggers.
pub struct LaneFollowScenario {
    #[allow(dead_code)]
    config: LaneFollowConfig,
    status: ScenarioStatus,
}

impl LaneFollowScenario {
    pub fn new(config: LaneFollowConfig) -> Self {
        Self {
            config,
            status: ScenarioStatus::Running,
        }
    }
}

impl Scenario for LaneFollowScenario {
    fn scenario_type(&self) -> ScenarioType {
        ScenarioType::LaneFollow
    }

    fn status(&self) -> ScenarioStatus {
        self.status
    }

    fn set_status(&mut self, status: ScenarioStatus) {
        self.status = status;
    }

    // The default scenario is assumed always enterable.
    fn is_transferable(&self, _: &dyn Scenario, _: &Frame, _: &PlanningContext) -> bool {
        true
    }
}
