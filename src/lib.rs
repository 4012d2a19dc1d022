// src/lib.rs
//
// Scenario selection for a planning pipeline: decides, once per planning
// cycle, which driving-behavior mode the trajectory optimizer executes next.
//
// Control flow per cycle:
//   Frame → ScenarioManager::update
//         → observe (refresh shared traffic-light map)
//         → { dispatch | self-vote } selection
//         → planning-context bookkeeping
//         → possible scenario (re)construction via ScenarioFactory

pub mod config;
pub mod context;
pub mod frame;
pub mod manager;
pub mod scenario;
pub mod types;

// Re-exports for ergonomic access
pub use context::PlanningContext;
pub use frame::{Frame, ReferenceLineInfo, TrafficLightDetection, TrafficLightObservation};
pub use manager::ScenarioManager;
pub use scenario::{Scenario, ScenarioFactory, ScenarioStatus};
pub use types::{
    Overlap, OverlapKind, ScenarioConfigSet, ScenarioManagerConfig, ScenarioType,
    SelectionStrategy, TrafficLightColor, TurnType,
};
