// src/manager.rs
//
// Scenario arbitration. Once per planning cycle the manager observes the
// perception inputs, runs one of two selection strategies and commits a
// scenario switch through the factory. The downstream trajectory optimizer
// only ever sees the committed scenario, never a half-applied switch.

use crate::context::PlanningContext;
use crate::frame::Frame;
use crate::scenario::{Scenario, ScenarioFactory, ScenarioStatus};
use crate::types::{
    Overlap, OverlapKind, ScenarioConfigSet, ScenarioManagerConfig, ScenarioType,
    SelectionStrategy, TurnType,
};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info};

pub struct ScenarioManager {
    config: ScenarioManagerConfig,
    factory: ScenarioFactory,
    supported_scenarios: BTreeSet<ScenarioType>,
    default_scenario_type: ScenarioType,
    current_scenario: Box<dyn Scenario>,
    context: PlanningContext,
}

impl ScenarioManager {
    /// Builds the factory from the per-type configuration table and starts
    /// out in LaneFollow. The manager always holds exactly one active
    /// scenario from here on.
    pub fn new(
        config: ScenarioManagerConfig,
        scenario_configs: ScenarioConfigSet,
        supported_scenarios: BTreeSet<ScenarioType>,
    ) -> Self {
        let factory = ScenarioFactory::new(scenario_configs);
        let default_scenario_type = ScenarioType::LaneFollow;
        let current_scenario = factory.create(default_scenario_type);
        Self {
            config,
            factory,
            supported_scenarios,
            default_scenario_type,
            current_scenario,
            context: PlanningContext::new(),
        }
    }

    pub fn current_scenario(&self) -> &dyn Scenario {
        self.current_scenario.as_ref()
    }

    /// Mutable handle for the stage executor that runs the scenario and
    /// advances its status between selection passes.
    pub fn current_scenario_mut(&mut self) -> &mut dyn Scenario {
        self.current_scenario.as_mut()
    }

    pub fn context(&self) -> &PlanningContext {
        &self.context
    }

    /// The signal-overlap tracking that feeds `current_traffic_light_overlaps`
    /// lives with the traffic-light decider, which reaches the context here.
    pub fn context_mut(&mut self) -> &mut PlanningContext {
        &mut self.context
    }

    // ========================================================================
    // UPDATE (entry point)
    // ========================================================================

    pub fn update(&mut self, frame: &Frame) {
        assert!(
            !frame.reference_lines.is_empty(),
            "frame carries no reference line"
        );

        self.observe(frame);

        match self.config.strategy {
            SelectionStrategy::Dispatch => self.scenario_dispatch(frame),
            SelectionStrategy::SelfVote => self.scenario_self_vote(frame),
        }
    }

    // ========================================================================
    // OBSERVE
    // ========================================================================

    fn observe(&mut self, frame: &Frame) {
        self.read_traffic_light(frame);
    }

    /// Rebuilds the shared signal map from this cycle's detection message.
    /// An absent or expired message leaves the map empty: no known state,
    /// no active constraint.
    fn read_traffic_light(&mut self, frame: &Frame) {
        self.context.traffic_lights.clear();

        let detection = match &frame.traffic_light_detection {
            Some(detection) => detection,
            None => {
                debug!("no traffic light detection this cycle");
                return;
            }
        };

        let age_sec = frame.timestamp_sec - detection.timestamp_sec;
        if age_sec > self.config.signal_expire_sec {
            debug!("traffic light detection expired, age {:.2}s", age_sec);
            return;
        }

        for light in &detection.lights {
            self.context
                .traffic_lights
                .insert(light.id.clone(), light.color);
        }
    }

    // ========================================================================
    // DISPATCH STRATEGY
    // ========================================================================

    fn scenario_dispatch(&mut self, frame: &Frame) {
        let mut scenario_type = ScenarioType::LaneFollow;

        // An in-progress maneuver is never re-arbitrated away.
        match self.current_scenario.scenario_type() {
            ScenarioType::SidePass
            | ScenarioType::StopSignProtected
            | ScenarioType::StopSignUnprotected
            | ScenarioType::TrafficLightProtected
            | ScenarioType::TrafficLightUnprotectedLeftTurn
            | ScenarioType::TrafficLightUnprotectedRightTurn => {
                if self.current_scenario.status() != ScenarioStatus::Done {
                    scenario_type = self.current_scenario.scenario_type();
                }
            }
            _ => {}
        }

        // Intersection scenarios: the nearer of the first-encountered stop
        // sign and signal decides which selection rule runs.
        if scenario_type == ScenarioType::LaneFollow {
            let reference_line = frame.first_reference_line();
            let stop_sign_overlap = reference_line.first_encountered(OverlapKind::StopSign);
            let traffic_light_overlap = reference_line.first_encountered(OverlapKind::Signal);

            let (stop_sign_found, traffic_light_found) =
                match (stop_sign_overlap, traffic_light_overlap) {
                    (Some(stop_sign), Some(signal)) => {
                        let stop_sign_first = if self.config.prefer_signal_on_tie {
                            stop_sign.start_s < signal.start_s
                        } else {
                            stop_sign.start_s <= signal.start_s
                        };
                        (stop_sign_first, !stop_sign_first)
                    }
                    (Some(_), None) => (true, false),
                    (None, Some(_)) => (false, true),
                    (None, None) => (false, false),
                };

            if stop_sign_found {
                if self.config.enable_stop_sign {
                    if let Some(overlap) = stop_sign_overlap {
                        scenario_type = self.select_stop_sign_scenario(frame, overlap);
                    }
                }
            } else if traffic_light_found && self.config.enable_traffic_light {
                scenario_type = self.select_traffic_light_scenario(frame);
            }
        }

        if scenario_type == ScenarioType::LaneFollow {
            scenario_type = self.select_change_lane_scenario(frame);
        }

        if scenario_type == ScenarioType::LaneFollow {
            scenario_type = self.select_side_pass_scenario(frame);
        }

        debug!("dispatch resolved scenario: {}", scenario_type);

        self.update_planning_context(frame, scenario_type);

        if self.current_scenario.scenario_type() != scenario_type {
            info!(
                "switch scenario: {} -> {}",
                self.current_scenario.scenario_type(),
                scenario_type
            );
            self.current_scenario = self.factory.create(scenario_type);
        }
    }

    fn select_stop_sign_scenario(&self, frame: &Frame, stop_sign_overlap: &Overlap) -> ScenarioType {
        let reference_line = frame.first_reference_line();
        let adc_distance_to_stop_sign =
            stop_sign_overlap.start_s - reference_line.adc_front_edge_s;
        debug!(
            "stop sign [{}] distance {:.2}m",
            stop_sign_overlap.object_id, adc_distance_to_stop_sign
        );

        let config = &self.factory.configs().stop_sign_unprotected;
        let stop_sign_ahead = adc_distance_to_stop_sign > 0.0
            && adc_distance_to_stop_sign <= config.start_stop_sign_scenario_distance;

        match self.current_scenario.scenario_type() {
            ScenarioType::LaneFollow
            | ScenarioType::ChangeLane
            | ScenarioType::SidePass
            | ScenarioType::Approach => {
                if stop_sign_ahead {
                    if config.all_way_stop {
                        ScenarioType::StopSignProtected
                    } else {
                        ScenarioType::StopSignUnprotected
                    }
                } else {
                    ScenarioType::LaneFollow
                }
            }
            current if current.is_stop_sign() => {
                if self.current_scenario.status() == ScenarioStatus::Done {
                    ScenarioType::LaneFollow
                } else {
                    current
                }
            }
            _ => ScenarioType::LaneFollow,
        }
    }

    fn select_traffic_light_scenario(&self, frame: &Frame) -> ScenarioType {
        let config = &self.factory.configs().traffic_light_protected;
        let reference_line = frame.first_reference_line();
        let right_turn = reference_line.turn_type == TurnType::RightTurn;
        let left_turn = reference_line.turn_type == TurnType::LeftTurn;

        for traffic_light_overlap in &self.context.current_traffic_light_overlaps {
            let adc_distance_to_stop_line =
                traffic_light_overlap.start_s - reference_line.adc_front_edge_s;
            debug!(
                "traffic light [{}] distance {:.2}m right_turn[{}] left_turn[{}]",
                traffic_light_overlap.object_id, adc_distance_to_stop_line, right_turn, left_turn
            );

            match self.current_scenario.scenario_type() {
                ScenarioType::LaneFollow
                | ScenarioType::ChangeLane
                | ScenarioType::SidePass
                | ScenarioType::Approach => {
                    if adc_distance_to_stop_line <= config.max_valid_stop_distance {
                        if right_turn {
                            return ScenarioType::TrafficLightUnprotectedRightTurn;
                        }
                        if left_turn {
                            // TODO: route to TrafficLightUnprotectedLeftTurn
                            // once its stage pipeline is complete.
                            return ScenarioType::TrafficLightProtected;
                        }
                        return ScenarioType::TrafficLightProtected;
                    }
                }
                current if current.is_traffic_light() => {
                    if self.current_scenario.status() == ScenarioStatus::Done {
                        return ScenarioType::LaneFollow;
                    }
                    return current;
                }
                _ => {}
            }
        }

        ScenarioType::LaneFollow
    }

    /// Multi-route arbitration is not implemented; a single reference line
    /// always resolves to LaneFollow.
    fn select_change_lane_scenario(&self, frame: &Frame) -> ScenarioType {
        if frame.reference_lines.len() > 1 {
            return ScenarioType::LaneFollow;
        }
        ScenarioType::LaneFollow
    }

    fn select_side_pass_scenario(&self, frame: &Frame) -> ScenarioType {
        // Reuse the in-flight side pass if it is still transferable from
        // itself; a fresh trial otherwise.
        if self.current_scenario.scenario_type() == ScenarioType::SidePass
            && self.current_scenario.is_transferable(
                self.current_scenario.as_ref(),
                frame,
                &self.context,
            )
        {
            return ScenarioType::SidePass;
        }

        let trial = self.factory.create(ScenarioType::SidePass);
        if trial.is_transferable(self.current_scenario.as_ref(), frame, &self.context) {
            return ScenarioType::SidePass;
        }
        ScenarioType::LaneFollow
    }

    // ========================================================================
    // SELF-VOTE STRATEGY
    // ========================================================================

    fn scenario_self_vote(&mut self, frame: &Frame) {
        // Bias toward stability: a non-default maneuver that is still
        // transferable from itself keeps running untouched.
        let mut rejected_scenarios: HashSet<ScenarioType> = HashSet::new();
        if self.current_scenario.scenario_type() != self.default_scenario_type
            && self.reuse_current_scenario(frame)
        {
            debug!("reuse current scenario: {}", self.current_scenario.name());
            return;
        }
        rejected_scenarios.insert(self.current_scenario.scenario_type());

        let mut preferred_scenarios = vec![ScenarioType::LaneFollow];
        for (kind, _) in &frame.first_reference_line().first_encountered_overlaps {
            match kind {
                OverlapKind::Obstacle => preferred_scenarios.push(ScenarioType::SidePass),
                OverlapKind::StopSign => {
                    preferred_scenarios.push(ScenarioType::StopSignUnprotected)
                }
                OverlapKind::Signal => {
                    preferred_scenarios.push(ScenarioType::TrafficLightProtected);
                    preferred_scenarios.push(ScenarioType::TrafficLightUnprotectedLeftTurn);
                    preferred_scenarios.push(ScenarioType::TrafficLightUnprotectedRightTurn);
                }
            }
        }

        for preferred_scenario in preferred_scenarios {
            if rejected_scenarios.contains(&preferred_scenario)
                || !self.supported_scenarios.contains(&preferred_scenario)
            {
                continue;
            }
            if self.select_scenario(preferred_scenario, frame) {
                info!("select preferred scenario: {}", preferred_scenario);
                return;
            }
            rejected_scenarios.insert(preferred_scenario);
        }

        // First transferable scenario from the whole supported set.
        let supported: Vec<ScenarioType> = self.supported_scenarios.iter().copied().collect();
        for scenario_type in supported {
            if rejected_scenarios.contains(&scenario_type) {
                continue;
            }
            if !self.config.enable_side_pass && scenario_type == ScenarioType::SidePass {
                continue;
            }
            if !self.config.enable_stop_sign && scenario_type == ScenarioType::StopSignUnprotected
            {
                continue;
            }
            if !self.config.enable_traffic_light && scenario_type.is_traffic_light() {
                continue;
            }

            if self.select_scenario(scenario_type, frame) {
                info!("select transferable scenario: {}", scenario_type);
                return;
            }
            rejected_scenarios.insert(scenario_type);
        }

        // Nothing accepted: force the default, which is always enterable.
        if self.current_scenario.scenario_type() != self.default_scenario_type {
            info!("select default scenario: {}", self.default_scenario_type);
            self.current_scenario = self.factory.create(self.default_scenario_type);
        }
    }

    fn reuse_current_scenario(&self, frame: &Frame) -> bool {
        self.current_scenario
            .is_transferable(self.current_scenario.as_ref(), frame, &self.context)
    }

    /// Accepts the candidate trivially when it already runs, otherwise
    /// probes a trial instance and commits only on a passing transfer test.
    fn select_scenario(&mut self, scenario_type: ScenarioType, frame: &Frame) -> bool {
        if self.current_scenario.scenario_type() == scenario_type {
            return true;
        }

        let trial = self.factory.create(scenario_type);
        if trial.is_transferable(self.current_scenario.as_ref(), frame, &self.context) {
            info!("switch to scenario: {}", trial.name());
            self.current_scenario = trial;
            return true;
        }
        false
    }

    // ========================================================================
    // PLANNING CONTEXT BOOKKEEPING
    // ========================================================================

    fn update_planning_context(&mut self, frame: &Frame, scenario_type: ScenarioType) {
        if !scenario_type.is_stop_sign() && !scenario_type.is_traffic_light() {
            self.context.stop_done_overlap_ids.clear();
            return;
        }

        if scenario_type.is_stop_sign() {
            if scenario_type != self.current_scenario.scenario_type() {
                // Fresh entry: latch the first-encountered stop sign.
                let first_encountered = frame
                    .first_reference_line()
                    .first_encountered(OverlapKind::StopSign);
                if let Some(overlap) = first_encountered {
                    debug!("latch stop sign overlap [{}]", overlap.object_id);
                    self.context.current_stop_sign_overlap = Some(overlap.clone());
                }
            } else if let Some(current_overlap) = &self.context.current_stop_sign_overlap {
                // The route is recomputed every cycle; re-resolve the latched
                // overlap by id instead of trusting last cycle's geometry.
                let refreshed = frame
                    .first_reference_line()
                    .stop_sign_overlaps
                    .iter()
                    .find(|overlap| overlap.object_id == current_overlap.object_id);
                if let Some(overlap) = refreshed {
                    self.context.current_stop_sign_overlap = Some(overlap.clone());
                }
            }
            return;
        }

        // Traffic-light bookkeeping is owned by the traffic-light decider;
        // nothing to latch here yet.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{ReferenceLineInfo, TrafficLightDetection, TrafficLightObservation};
    use crate::types::TrafficLightColor;

    fn supported_all() -> BTreeSet<ScenarioType> {
        [
            ScenarioType::LaneFollow,
            ScenarioType::SidePass,
            ScenarioType::StopSignUnprotected,
            ScenarioType::TrafficLightProtected,
            ScenarioType::TrafficLightUnprotectedLeftTurn,
            ScenarioType::TrafficLightUnprotectedRightTurn,
        ]
        .into_iter()
        .collect()
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("scenario_manager=debug")
            .try_init();
    }

    fn mk_manager(config: ScenarioManagerConfig) -> ScenarioManager {
        init_tracing();
        ScenarioManager::new(config, ScenarioConfigSet::default(), supported_all())
    }

    fn mk_overlap(id: &str, start_s: f64) -> Overlap {
        Overlap {
            object_id: id.into(),
            start_s,
            end_s: start_s + 2.0,
        }
    }

    fn mk_frame(
        adc_front_edge_s: f64,
        turn_type: TurnType,
        overlaps: Vec<(OverlapKind, Overlap)>,
    ) -> Frame {
        let stop_sign_overlaps = overlaps
            .iter()
            .filter(|(kind, _)| *kind == OverlapKind::StopSign)
            .map(|(_, overlap)| overlap.clone())
            .collect();
        Frame {
            timestamp_sec: 1000.0,
            reference_lines: vec![ReferenceLineInfo {
                adc_front_edge_s,
                turn_type,
                first_encountered_overlaps: overlaps,
                stop_sign_overlaps,
            }],
            traffic_light_detection: None,
        }
    }

    fn stop_sign_frame(adc_front_edge_s: f64) -> Frame {
        mk_frame(
            adc_front_edge_s,
            TurnType::Straight,
            vec![(OverlapKind::StopSign, mk_overlap("ss_1", 105.0))],
        )
    }

    fn scenario_ptr(manager: &ScenarioManager) -> *const () {
        (manager.current_scenario() as *const dyn Scenario).cast::<()>()
    }

    // ------------------------------------------------------------------------
    // invariants
    // ------------------------------------------------------------------------

    #[test]
    fn test_starts_in_lane_follow() {
        let manager = mk_manager(ScenarioManagerConfig::default());
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::LaneFollow
        );
        assert_eq!(manager.current_scenario().status(), ScenarioStatus::Running);
    }

    #[test]
    #[should_panic(expected = "no reference line")]
    fn test_empty_reference_lines_is_fatal() {
        let mut manager = mk_manager(ScenarioManagerConfig::default());
        let frame = Frame {
            timestamp_sec: 0.0,
            reference_lines: vec![],
            traffic_light_detection: None,
        };
        manager.update(&frame);
    }

    // ------------------------------------------------------------------------
    // observe
    // ------------------------------------------------------------------------

    fn frame_with_detection(detection_age_sec: f64) -> Frame {
        let mut frame = mk_frame(100.0, TurnType::Straight, vec![]);
        frame.traffic_light_detection = Some(TrafficLightDetection {
            timestamp_sec: frame.timestamp_sec - detection_age_sec,
            lights: vec![TrafficLightObservation {
                id: "tl_1".into(),
                color: TrafficLightColor::Red,
            }],
        });
        frame
    }

    #[test]
    fn test_observe_populates_signal_map() {
        let mut manager = mk_manager(ScenarioManagerConfig::default());
        manager.update(&frame_with_detection(1.0));
        assert_eq!(
            manager.context().traffic_light_color("tl_1"),
            TrafficLightColor::Red
        );
    }

    #[test]
    fn test_observe_drops_stale_detection() {
        let mut manager = mk_manager(ScenarioManagerConfig::default());
        // default signal_expire_sec is 5.0
        manager.update(&frame_with_detection(6.0));
        assert!(manager.context().traffic_lights.is_empty());
    }

    #[test]
    fn test_observe_replaces_map_each_cycle() {
        let mut manager = mk_manager(ScenarioManagerConfig::default());
        manager.update(&frame_with_detection(1.0));
        assert!(!manager.context().traffic_lights.is_empty());
        manager.update(&mk_frame(100.0, TurnType::Straight, vec![]));
        assert!(manager.context().traffic_lights.is_empty());
    }

    // ------------------------------------------------------------------------
    // dispatch: stop sign
    // ------------------------------------------------------------------------

    #[test]
    fn test_stop_sign_distance_gating() {
        // default start_stop_sign_scenario_distance is 10.0, overlap at 105.0
        let cases = [
            (100.0, ScenarioType::StopSignUnprotected), // distance 5.0
            (96.0, ScenarioType::StopSignUnprotected),  // distance 9.0
            (94.0, ScenarioType::LaneFollow),           // distance 11.0, too far
            (106.0, ScenarioType::LaneFollow),          // distance -1.0, passed
        ];
        for (adc_front_edge_s, expected) in cases {
            let mut manager = mk_manager(ScenarioManagerConfig::default());
            manager.update(&stop_sign_frame(adc_front_edge_s));
            assert_eq!(
                manager.current_scenario().scenario_type(),
                expected,
                "front edge at {adc_front_edge_s}"
            );
        }
    }

    #[test]
    fn test_stop_sign_feature_gate() {
        let config = ScenarioManagerConfig {
            enable_stop_sign: false,
            ..Default::default()
        };
        let mut manager = mk_manager(config);
        manager.update(&stop_sign_frame(100.0));
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::LaneFollow
        );
    }

    #[test]
    fn test_stop_sign_entry_latches_overlap() {
        let mut manager = mk_manager(ScenarioManagerConfig::default());
        manager.update(&stop_sign_frame(100.0));
        let latched = manager.context().current_stop_sign_overlap.as_ref().unwrap();
        assert_eq!(latched.object_id, "ss_1");
        assert_eq!(latched.start_s, 105.0);
    }

    #[test]
    fn test_stop_sign_overlap_refreshed_by_id_across_cycles() {
        let mut manager = mk_manager(ScenarioManagerConfig::default());
        manager.update(&stop_sign_frame(100.0));

        // next cycle recomputes the route and the overlap moves slightly
        let frame = mk_frame(
            100.5,
            TurnType::Straight,
            vec![(OverlapKind::StopSign, mk_overlap("ss_1", 104.5))],
        );
        manager.update(&frame);
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::StopSignUnprotected
        );
        let latched = manager.context().current_stop_sign_overlap.as_ref().unwrap();
        assert_eq!(latched.start_s, 104.5);
    }

    #[test]
    fn test_active_scenario_kept_when_type_unchanged() {
        let mut manager = mk_manager(ScenarioManagerConfig::default());
        let frame = stop_sign_frame(100.0);
        manager.update(&frame);
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::StopSignUnprotected
        );

        let before = scenario_ptr(&manager);
        manager.update(&frame);
        assert_eq!(scenario_ptr(&manager), before, "instance was replaced");
    }

    #[test]
    fn test_in_progress_stop_sign_is_sticky() {
        let mut manager = mk_manager(ScenarioManagerConfig::default());
        manager.update(&stop_sign_frame(100.0));

        // stop line now behind the front edge, but the wait is not done yet
        manager.update(&stop_sign_frame(106.0));
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::StopSignUnprotected
        );
    }

    #[test]
    fn test_done_stop_sign_returns_to_lane_follow() {
        let mut manager = mk_manager(ScenarioManagerConfig::default());
        manager.update(&stop_sign_frame(100.0));

        manager.current_scenario_mut().set_status(ScenarioStatus::Done);
        manager.update(&stop_sign_frame(100.0));
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::LaneFollow
        );
    }

    #[test]
    fn test_leaving_stop_sign_clears_stop_done_ids() {
        let mut manager = mk_manager(ScenarioManagerConfig::default());
        manager.update(&stop_sign_frame(100.0));
        manager
            .context_mut()
            .stop_done_overlap_ids
            .push("ss_1".into());

        manager.current_scenario_mut().set_status(ScenarioStatus::Done);
        manager.update(&mk_frame(100.0, TurnType::Straight, vec![]));
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::LaneFollow
        );
        assert!(manager.context().stop_done_overlap_ids.is_empty());
    }

    // ------------------------------------------------------------------------
    // dispatch: traffic light
    // ------------------------------------------------------------------------

    fn traffic_light_configs(max_valid_stop_distance: f64) -> ScenarioConfigSet {
        let mut configs = ScenarioConfigSet::default();
        configs.traffic_light_protected.max_valid_stop_distance = max_valid_stop_distance;
        configs
            .traffic_light_unprotected_left_turn
            .max_valid_stop_distance = max_valid_stop_distance;
        configs
            .traffic_light_unprotected_right_turn
            .max_valid_stop_distance = max_valid_stop_distance;
        configs
    }

    fn mk_signal_manager(config: ScenarioManagerConfig) -> ScenarioManager {
        let mut manager = ScenarioManager::new(config, traffic_light_configs(15.0), supported_all());
        manager
            .context_mut()
            .current_traffic_light_overlaps
            .push(mk_overlap("tl_1", 108.0));
        manager
    }

    fn signal_frame(turn_type: TurnType) -> Frame {
        mk_frame(
            100.0,
            turn_type,
            vec![(OverlapKind::Signal, mk_overlap("tl_1", 108.0))],
        )
    }

    #[test]
    fn test_traffic_light_right_turn_selects_unprotected_right_turn() {
        let mut manager = mk_signal_manager(ScenarioManagerConfig::default());
        manager.update(&signal_frame(TurnType::RightTurn));
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::TrafficLightUnprotectedRightTurn
        );
    }

    #[test]
    fn test_traffic_light_straight_selects_protected() {
        let mut manager = mk_signal_manager(ScenarioManagerConfig::default());
        manager.update(&signal_frame(TurnType::Straight));
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::TrafficLightProtected
        );
    }

    #[test]
    fn test_traffic_light_left_turn_still_routes_to_protected() {
        let mut manager = mk_signal_manager(ScenarioManagerConfig::default());
        manager.update(&signal_frame(TurnType::LeftTurn));
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::TrafficLightProtected
        );
    }

    #[test]
    fn test_traffic_light_beyond_stop_distance_stays_lane_follow() {
        let mut manager = ScenarioManager::new(
            ScenarioManagerConfig::default(),
            traffic_light_configs(15.0),
            supported_all(),
        );
        manager
            .context_mut()
            .current_traffic_light_overlaps
            .push(mk_overlap("tl_1", 140.0));
        let frame = mk_frame(
            100.0,
            TurnType::Straight,
            vec![(OverlapKind::Signal, mk_overlap("tl_1", 140.0))],
        );
        manager.update(&frame);
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::LaneFollow
        );
    }

    // ------------------------------------------------------------------------
    // dispatch: stop sign vs traffic light arbitration
    // ------------------------------------------------------------------------

    fn tied_overlaps_frame() -> Frame {
        mk_frame(
            100.0,
            TurnType::Straight,
            vec![
                (OverlapKind::StopSign, mk_overlap("ss_1", 108.0)),
                (OverlapKind::Signal, mk_overlap("tl_1", 108.0)),
            ],
        )
    }

    #[test]
    fn test_tie_break_prefers_signal_by_default() {
        let mut manager = mk_signal_manager(ScenarioManagerConfig::default());
        manager.update(&tied_overlaps_frame());
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::TrafficLightProtected
        );
    }

    #[test]
    fn test_tie_break_configurable_to_prefer_stop_sign() {
        let config = ScenarioManagerConfig {
            prefer_signal_on_tie: false,
            ..Default::default()
        };
        let mut manager = mk_signal_manager(config);
        manager.update(&tied_overlaps_frame());
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::StopSignUnprotected
        );
    }

    #[test]
    fn test_strictly_nearer_stop_sign_wins() {
        let mut manager = mk_signal_manager(ScenarioManagerConfig::default());
        let frame = mk_frame(
            100.0,
            TurnType::Straight,
            vec![
                (OverlapKind::StopSign, mk_overlap("ss_1", 106.0)),
                (OverlapKind::Signal, mk_overlap("tl_1", 108.0)),
            ],
        );
        manager.update(&frame);
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::StopSignUnprotected
        );
    }

    // ------------------------------------------------------------------------
    // dispatch: side pass
    // ------------------------------------------------------------------------

    #[test]
    fn test_obstacle_ahead_selects_side_pass() {
        let mut manager = mk_manager(ScenarioManagerConfig::default());
        let frame = mk_frame(
            100.0,
            TurnType::Straight,
            vec![(OverlapKind::Obstacle, mk_overlap("obs_1", 120.0))],
        );
        manager.update(&frame);
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::SidePass
        );
    }

    #[test]
    fn test_no_trigger_stays_lane_follow() {
        let mut manager = mk_manager(ScenarioManagerConfig::default());
        manager.update(&mk_frame(100.0, TurnType::Straight, vec![]));
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::LaneFollow
        );
    }

    // ------------------------------------------------------------------------
    // self-vote strategy
    // ------------------------------------------------------------------------

    fn self_vote_config() -> ScenarioManagerConfig {
        ScenarioManagerConfig {
            strategy: SelectionStrategy::SelfVote,
            ..Default::default()
        }
    }

    #[test]
    fn test_self_vote_prefers_side_pass_over_stop_sign_in_list_order() {
        let mut manager = mk_manager(self_vote_config());
        let frame = mk_frame(
            100.0,
            TurnType::Straight,
            vec![
                (OverlapKind::Obstacle, mk_overlap("obs_1", 110.0)),
                (OverlapKind::StopSign, mk_overlap("ss_1", 105.0)),
            ],
        );
        manager.update(&frame);
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::SidePass
        );
    }

    #[test]
    fn test_self_vote_walks_signal_candidates_in_fixed_order() {
        // Right turn at a signal: Protected and UnprotectedLeftTurn are
        // probed first and rejected, UnprotectedRightTurn accepted.
        let mut manager = ScenarioManager::new(
            self_vote_config(),
            traffic_light_configs(15.0),
            supported_all(),
        );
        manager.update(&signal_frame(TurnType::RightTurn));
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::TrafficLightUnprotectedRightTurn
        );
    }

    #[test]
    fn test_self_vote_reuses_transferable_non_default_scenario() {
        let mut manager = mk_manager(self_vote_config());
        let frame = mk_frame(
            100.0,
            TurnType::Straight,
            vec![(OverlapKind::Obstacle, mk_overlap("obs_1", 110.0))],
        );
        manager.update(&frame);
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::SidePass
        );

        let before = scenario_ptr(&manager);
        manager.update(&frame);
        assert_eq!(scenario_ptr(&manager), before, "instance was replaced");
    }

    #[test]
    fn test_self_vote_falls_back_to_default_when_obstacle_clears() {
        let mut manager = mk_manager(self_vote_config());
        let frame = mk_frame(
            100.0,
            TurnType::Straight,
            vec![(OverlapKind::Obstacle, mk_overlap("obs_1", 110.0))],
        );
        manager.update(&frame);
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::SidePass
        );

        manager.update(&mk_frame(100.0, TurnType::Straight, vec![]));
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::LaneFollow
        );
    }

    #[test]
    fn test_self_vote_terminates_when_everything_rejected() {
        // No overlaps at all: every candidate in the supported set fails
        // its transfer test and the default survives.
        let mut manager = mk_manager(self_vote_config());
        manager.update(&mk_frame(100.0, TurnType::Straight, vec![]));
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::LaneFollow
        );
    }

    #[test]
    fn test_self_vote_skips_unsupported_types() {
        let supported: BTreeSet<ScenarioType> =
            [ScenarioType::LaneFollow, ScenarioType::StopSignUnprotected]
                .into_iter()
                .collect();
        let mut manager = ScenarioManager::new(
            self_vote_config(),
            ScenarioConfigSet::default(),
            supported,
        );
        let frame = mk_frame(
            100.0,
            TurnType::Straight,
            vec![(OverlapKind::Obstacle, mk_overlap("obs_1", 110.0))],
        );
        manager.update(&frame);
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::LaneFollow
        );
    }

    #[test]
    fn test_self_vote_feature_gates_bind_only_the_supported_sweep() {
        let config = ScenarioManagerConfig {
            strategy: SelectionStrategy::SelfVote,
            enable_side_pass: false,
            ..Default::default()
        };
        let mut manager = mk_manager(config);
        // The gate is checked in the supported-set sweep only; an obstacle
        // overlap still promotes SidePass through the preferred list.
        let frame = mk_frame(
            100.0,
            TurnType::Straight,
            vec![(OverlapKind::Obstacle, mk_overlap("obs_1", 110.0))],
        );
        manager.update(&frame);
        assert_eq!(
            manager.current_scenario().scenario_type(),
            ScenarioType::SidePass
        );
    }
}
