// src/scenario/factory.rs
//
// Type tag → constructor registry. Adding a scenario means one new variant
// and one entry here; the manager's selection logic stays untouched.

use super::{
    LaneFollowScenario, Scenario, SidePassScenario, StopSignUnprotectedScenario,
    TrafficLightProtectedScenario, TrafficLightUnprotectedLeftTurnScenario,
    TrafficLightUnprotectedRightTurnScenario,
};
use crate::types::{ScenarioConfigSet, ScenarioType};
use std::collections::HashMap;

type BuildFn = fn(&ScenarioConfigSet) -> Box<dyn Scenario>;

pub struct ScenarioFactory {
    configs: ScenarioConfigSet,
    builders: HashMap<ScenarioType, BuildFn>,
}

impl ScenarioFactory {
    pub fn new(configs: ScenarioConfigSet) -> Self {
        let mut builders: HashMap<ScenarioType, BuildFn> = HashMap::new();
        builders.insert(ScenarioType::LaneFollow, |c| {
            Box::new(LaneFollowScenario::new(c.lane_follow.clone()))
        });
        builders.insert(ScenarioType::SidePass, |c| {
            Box::new(SidePassScenario::new(c.side_pass.clone()))
        });
        builders.insert(ScenarioType::StopSignUnprotected, |c| {
            Box::new(StopSignUnprotectedScenario::new(
                c.stop_sign_unprotected.clone(),
            ))
        });
        builders.insert(ScenarioType::TrafficLightProtected, |c| {
            Box::new(TrafficLightProtectedScenario::new(
                c.traffic_light_protected.clone(),
            ))
        });
        builders.insert(ScenarioType::TrafficLightUnprotectedLeftTurn, |c| {
            Box::new(TrafficLightUnprotectedLeftTurnScenario::new(
                c.traffic_light_unprotected_left_turn.clone(),
            ))
        });
        builders.insert(ScenarioType::TrafficLightUnprotectedRightTurn, |c| {
            Box::new(TrafficLightUnprotectedRightTurnScenario::new(
                c.traffic_light_unprotected_right_turn.clone(),
            ))
        });
        Self { configs, builders }
    }

    /// Construct a fresh scenario of the requested type. A type without a
    /// registered builder is a startup contract breach and aborts.
    pub fn create(&self, scenario_type: ScenarioType) -> Box<dyn Scenario> {
        let build = self.builders.get(&scenario_type).unwrap_or_else(|| {
            panic!("no configuration registered for scenario {scenario_type}")
        });
        build(&self.configs)
    }

    pub fn configs(&self) -> &ScenarioConfigSet {
        &self.configs
    }
}
