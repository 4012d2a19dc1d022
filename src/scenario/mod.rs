// src/scenario/mod.rs
//
// Polymorphic driving-behavior modes.
//
// Selection flow:
//   Frame → ScenarioManager::update → { dispatch | self-vote }
//         → IsTransferable probes on candidate scenarios
//         → ScenarioFactory::create on a committed switch
//
// A scenario's type never changes after construction; switching behavior
// always means constructing a new scenario through the factory.

mod factory;
mod lane_follow;
mod side_pass;
mod stop_sign;
mod traffic_light;

pub use factory::ScenarioFactory;
pub use lane_follow::LaneFollowScenario;
pub use side_pass::SidePassScenario;
pub use stop_sign::StopSignUnprotectedScenario;
pub use traffic_light::{
    TrafficLightProtectedScenario, TrafficLightUnprotectedLeftTurnScenario,
    TrafficLightUnprotectedRightTurnScenario,
};

use crate::context::PlanningContext;
use crate::frame::Frame;
use crate::types::ScenarioType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioStatus {
    Running,
    Done,
}

pub trait Scenario {
    fn scenario_type(&self) -> ScenarioType;

    fn name(&self) -> &'static str {
        self.scenario_type().as_str()
    }

    /// Whether the scenario's own goal (e.g. fully stopped and yielded at
    /// the stop line) has been satisfied.
    fn status(&self) -> ScenarioStatus;

    /// Status transitions are driven by the scenario's stage execution
    /// downstream. The manager observes status but never sets it.
    fn set_status(&mut self, status: ScenarioStatus);

    /// Is entering this scenario legal right now, given the active scenario
    /// and this cycle's inputs? Called repeatedly while candidates are
    /// probed, so it must stay cheap and side-effect-free.
    fn is_transferable(
        &self,
        current: &dyn Scenario,
        frame: &Frame,
        context: &PlanningContext,
    ) -> bool;
}
