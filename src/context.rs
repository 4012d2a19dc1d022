// src/context.rs
//
// Cross-cycle scratch state shared between the manager and the scenario
// implementations. Owned by the manager and passed by reference; nothing
// else survives between cycles besides the active scenario itself.

use crate::types::{Overlap, TrafficLightColor};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct PlanningContext {
    /// The stop line the active stop-sign scenario is servicing.
    pub current_stop_sign_overlap: Option<Overlap>,
    /// Overlap ids whose stop-wait is complete. Cleared whenever neither a
    /// stop-sign nor a traffic-light scenario is active.
    pub stop_done_overlap_ids: Vec<String>,
    /// Latest observed signal state per light id. Fully replaced each cycle.
    pub traffic_lights: HashMap<String, TrafficLightColor>,
    /// Signaled overlaps ahead, maintained by the traffic-light decider and
    /// read during traffic-light scenario selection.
    pub current_traffic_light_overlaps: Vec<Overlap>,
}

impl PlanningContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn traffic_light_color(&self, id: &str) -> TrafficLightColor {
        self.traffic_lights
            .get(id)
            .copied()
            .unwrap_or(TrafficLightColor::Unknown)
    }

    pub fn is_stop_done(&self, overlap_id: &str) -> bool {
        self.stop_done_overlap_ids.iter().any(|id| id == overlap_id)
    }
}
