// src/types.rs

use serde::{Deserialize, Serialize};

// ============================================================================
// SCENARIO TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScenarioType {
    LaneFollow,
    ChangeLane,
    SidePass,
    Approach,
    StopSignProtected,
    StopSignUnprotected,
    TrafficLightProtected,
    TrafficLightUnprotectedLeftTurn,
    TrafficLightUnprotectedRightTurn,
}

impl ScenarioType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioType::LaneFollow => "LANE_FOLLOW",
            ScenarioType::ChangeLane => "CHANGE_LANE",
            ScenarioType::SidePass => "SIDE_PASS",
            ScenarioType::Approach => "APPROACH",
            ScenarioType::StopSignProtected => "STOP_SIGN_PROTECTED",
            ScenarioType::StopSignUnprotected => "STOP_SIGN_UNPROTECTED",
            ScenarioType::TrafficLightProtected => "TRAFFIC_LIGHT_PROTECTED",
            ScenarioType::TrafficLightUnprotectedLeftTurn => {
                "TRAFFIC_LIGHT_UNPROTECTED_LEFT_TURN"
            }
            ScenarioType::TrafficLightUnprotectedRightTurn => {
                "TRAFFIC_LIGHT_UNPROTECTED_RIGHT_TURN"
            }
        }
    }

    pub fn is_stop_sign(&self) -> bool {
        matches!(
            self,
            ScenarioType::StopSignProtected | ScenarioType::StopSignUnprotected
        )
    }

    pub fn is_traffic_light(&self) -> bool {
        matches!(
            self,
            ScenarioType::TrafficLightProtected
                | ScenarioType::TrafficLightUnprotectedLeftTurn
                | ScenarioType::TrafficLightUnprotectedRightTurn
        )
    }
}

impl std::fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ROAD FEATURES
// ============================================================================

/// A road feature's span along the route, in arc-length coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlap {
    pub object_id: String,
    pub start_s: f64,
    pub end_s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlapKind {
    Obstacle,
    StopSign,
    Signal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnType {
    Straight,
    LeftTurn,
    RightTurn,
    UTurn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrafficLightColor {
    Unknown,
    Red,
    Yellow,
    Green,
    Black,
}

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    Dispatch,
    SelfVote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioManagerConfig {
    pub strategy: SelectionStrategy,
    pub signal_expire_sec: f64,
    pub enable_stop_sign: bool,
    pub enable_traffic_light: bool,
    pub enable_side_pass: bool,
    pub prefer_signal_on_tie: bool,
}

impl Default for ScenarioManagerConfig {
    fn default() -> Self {
        Self {
            strategy: SelectionStrategy::Dispatch,
            signal_expire_sec: 5.0,
            enable_stop_sign: true,
            enable_traffic_light: true,
            enable_side_pass: true,
            prefer_signal_on_tie: true, // equal start_s resolves to the signal
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaneFollowConfig {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SidePassConfig {
    pub max_obstacle_distance: f64,
}

impl Default for SidePassConfig {
    fn default() -> Self {
        Self {
            max_obstacle_distance: 30.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopSignUnprotectedConfig {
    pub start_stop_sign_scenario_distance: f64,
    pub all_way_stop: bool,
}

impl Default for StopSignUnprotectedConfig {
    fn default() -> Self {
        Self {
            start_stop_sign_scenario_distance: 10.0,
            all_way_stop: false, // all-way determination not wired up yet
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficLightConfig {
    pub max_valid_stop_distance: f64,
}

impl Default for TrafficLightConfig {
    fn default() -> Self {
        Self {
            max_valid_stop_distance: 3.5,
        }
    }
}

/// Per-type configuration table, loaded once at startup and handed to the
/// factory. Types without a record here cannot be constructed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioConfigSet {
    #[serde(default)]
    pub lane_follow: LaneFollowConfig,
    #[serde(default)]
    pub side_pass: SidePassConfig,
    #[serde(default)]
    pub stop_sign_unprotected: StopSignUnprotectedConfig,
    #[serde(default)]
    pub traffic_light_protected: TrafficLightConfig,
    #[serde(default)]
    pub traffic_light_unprotected_left_turn: TrafficLightConfig,
    #[serde(default)]
    pub traffic_light_unprotected_right_turn: TrafficLightConfig,
}
