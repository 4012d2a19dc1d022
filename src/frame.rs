// src/frame.rs
//
// One planning cycle's input. Single source of truth for everything the
// selection pass reads — every probe sees the same snapshot instead of
// stale cached values.

use crate::types::{Overlap, OverlapKind, TrafficLightColor, TurnType};

/// One observed light from the perception detection message.
#[derive(Debug, Clone)]
pub struct TrafficLightObservation {
    pub id: String,
    pub color: TrafficLightColor,
}

/// Perception's traffic light message, stamped at capture time.
#[derive(Debug, Clone)]
pub struct TrafficLightDetection {
    pub timestamp_sec: f64,
    pub lights: Vec<TrafficLightObservation>,
}

/// A candidate route for this cycle, with the vehicle's longitudinal
/// boundary and the road features it will encounter, all in the route's
/// arc-length coordinate.
#[derive(Debug, Clone)]
pub struct ReferenceLineInfo {
    /// Arc-length position of the ADC front edge on this route.
    pub adc_front_edge_s: f64,
    pub turn_type: TurnType,
    /// First encountered overlap per category, in route order.
    pub first_encountered_overlaps: Vec<(OverlapKind, Overlap)>,
    /// Full stop-sign overlap list from the map path. The route is
    /// recomputed every cycle, so a cached overlap must be re-resolved
    /// by id against this list rather than reused verbatim.
    pub stop_sign_overlaps: Vec<Overlap>,
}

impl ReferenceLineInfo {
    pub fn first_encountered(&self, kind: OverlapKind) -> Option<&Overlap> {
        self.first_encountered_overlaps
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, overlap)| overlap)
    }
}

#[derive(Debug, Clone)]
pub struct Frame {
    /// Cycle clock, seconds. Detection staleness is measured against this.
    pub timestamp_sec: f64,
    pub reference_lines: Vec<ReferenceLineInfo>,
    pub traffic_light_detection: Option<TrafficLightDetection>,
}

impl Frame {
    /// The route the manager arbitrates on. Multi-route arbitration is a
    /// change-lane concern and not implemented yet.
    pub fn first_reference_line(&self) -> &ReferenceLineInfo {
        &self.reference_lines[0]
    }
}
