/**
 * Purpose: `World`, the orchestrator that binds every subsystem into
 * one deterministic run (spec §4.8, §5).
 *
 * Invariants enforced:
 * - `advance_time` is the only entry point that moves the clock: flush
 *   due intents -> commit them to the event log and spine -> step the
 *   spine -> step every vessel's biology -> sync mirrors -> advance
 *   `now_h`.
 * - Biology never writes `t_treatment_start_h`; `World` populates it
 *   the moment a `TreatCompound` event commits, using
 *   `entry(..).or_insert(..)` so redosing never resets the attrition
 *   clock (spec §4.5, §9 worked example: 12h gate).
 * - `SeedVessel` is self-flushing: `submit_intent`/`submit_design`
 *   commit it immediately rather than queuing it, so a vessel exists
 *   before any other same-cycle event can reference it (spec §4.4).
 *
 * What this file does NOT do:
 * - Does not decide what an agent proposes (`bvm_protocol::Design` is
 *   produced by an external collaborator; see `crate::bridge`).
 * - Does not persist anything to disk (that is `bvm-persistence`,
 *   reading `World::event_log`/`World::debt_bits` after the fact).
 */
use std::collections::BTreeMap;

use tracing::{debug, trace, warn};

use bvm_biology::{step_vessel, CellLineParams, DeathCause, VesselState};
use bvm_epistemic::{EntropySource, EpistemicController, Penalty, ProvisionalOutcome};
use bvm_events::{Event, EventIdAllocator, EventLog, EventPayload};
use bvm_measurement::{measure_cell_painting, measure_cytotoxicity, Assay, MeasurementConfig, Observation, RunContext};
use bvm_physics::InjectionManager;
use bvm_protocol::Design;
use bvm_scheduler::{OperationScheduler, StepGuard};
use rng::{RngRegistry, RngSubsystem};

use crate::bridge::{Claim, DesignBridge, ScheduledEvent};
use crate::config::WorldConfig;
use crate::error::WorldError;
use crate::refusal::MeasurementRefusal;

/// The orchestrator owning every subsystem for the lifetime of one run
/// (spec §3 "Ownership rules").
pub struct World {
    config: WorldConfig,
    rng: RngRegistry,
    spine: InjectionManager,
    epistemic: EpistemicController,
    event_log: EventLog,
    id_alloc: EventIdAllocator,
    scheduler: OperationScheduler,
    vessels: BTreeMap<String, VesselState>,
    step_guard: StepGuard,
    now_h: f64,
    run_context: Option<RunContext>,
}

impl World {
    /// Construct a fresh world. `now_h` starts at zero; nothing has run
    /// yet and no streams have been drawn from.
    pub fn new(config: WorldConfig) -> Self {
        let rng = RngRegistry::from_root_seed(config.root_seed);
        let spine = InjectionManager::new(config.evaporation.clone(), config.chemistry.clone());
        let epistemic = EpistemicController::new(config.epistemic.clone(), config.epistemic_baseline_entropy);
        Self {
            config,
            rng,
            spine,
            epistemic,
            event_log: EventLog::new(),
            id_alloc: EventIdAllocator::new(),
            scheduler: OperationScheduler::new(),
            vessels: BTreeMap::new(),
            step_guard: StepGuard::new(),
            now_h: 0.0,
            run_context: None,
        }
    }

    pub fn now_h(&self) -> f64 {
        self.now_h
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn vessel(&self, vessel_id: &str) -> Option<&VesselState> {
        self.vessels.get(vessel_id)
    }

    pub fn vessels(&self) -> impl Iterator<Item = (&String, &VesselState)> {
        self.vessels.iter()
    }

    pub fn debt_bits(&self) -> f64 {
        self.epistemic.debt_bits()
    }

    /// Submit one already-translated event. A `SeedVessel` payload is
    /// self-flushing (spec §4.4) and commits immediately; every other
    /// payload is queued and only committed once `advance_time` flushes
    /// a due boundary.
    pub fn submit_intent(&mut self, scheduled: ScheduledEvent) -> Result<u64, WorldError> {
        let event_id = self.id_alloc.allocate();
        if matches!(scheduled.payload, EventPayload::SeedVessel { .. }) {
            self.commit_event(
                event_id,
                scheduled.scheduled_time_h,
                scheduled.priority,
                scheduled.payload,
                scheduled.metadata,
            )?;
        } else {
            self.scheduler.submit_intent(
                event_id,
                scheduled.scheduled_time_h,
                scheduled.priority,
                scheduled.payload,
                scheduled.metadata,
            );
        }
        Ok(event_id)
    }

    /// Translate `design` through `bridge` and submit every resulting
    /// event and claim (spec §6).
    pub fn submit_design<B: DesignBridge>(&mut self, bridge: &B, design: &Design) -> Result<Vec<u64>, WorldError> {
        let (events, claims) = bridge.to_events(design, self.now_h)?;
        let mut event_ids = Vec::with_capacity(events.len());
        for scheduled in events {
            event_ids.push(self.submit_intent(scheduled)?);
        }
        for claim in claims {
            self.claim_action(claim)?;
        }
        Ok(event_ids)
    }

    /// Register an epistemic claim directly, bypassing a `DesignBridge`
    /// (spec §4.7 `claim_action`, timestamped at the current cycle).
    pub fn claim_action(&mut self, claim: Claim) -> Result<(), WorldError> {
        self.epistemic.claim_action(
            claim.action_id,
            claim.action_type,
            claim.expected_gain_bits,
            claim.prior_modalities,
            claim.claimed_marginal_gain,
            claim.entropy_source,
            self.now_h,
        )?;
        Ok(())
    }

    /// Advance the clock by `dt_h`: flush due intents, commit and apply
    /// them, step the spine's evaporation model, step every vessel's
    /// biology, sync mirrors, then move `now_h` forward (spec §4.8).
    ///
    /// Per-vessel biology steps are logically barrier-synced: every
    /// vessel steps against the spine state the evaporation step left
    /// behind, and no vessel's mirror is updated until after every
    /// vessel in the cycle has stepped, so a fan-out across vessels
    /// would see the same world no matter its execution order (spec
    /// §5).
    pub fn advance_time(&mut self, dt_h: f64) -> Result<(), WorldError> {
        if dt_h < 0.0 {
            warn!(dt_h, "rejected negative-dt advance_time");
            return Err(WorldError::NegativeDt { dt_h });
        }

        trace!(now_h = self.now_h, dt_h, "advancing time");
        self.flush_now()?;

        self.step_guard.begin();
        let result = self.step_spine_and_biology(dt_h);
        self.step_guard.commit();
        result?;

        self.now_h += dt_h;
        Ok(())
    }

    /// Flush and commit every intent due at the current time, without
    /// advancing the clock or stepping biology. Exposed so a caller can
    /// deliver a same-instant boundary (e.g. a seed immediately followed
    /// by a same-cycle treat) without a `dt_h = 0.0` biology no-op.
    pub fn flush_now(&mut self) -> Result<Vec<Event>, WorldError> {
        let due = self.scheduler.flush_due(self.now_h);
        let mut committed = Vec::with_capacity(due.len());
        for intent in due {
            let event = self.commit_event(
                intent.event_id,
                intent.scheduled_time_h,
                intent.priority,
                intent.payload,
                intent.metadata,
            )?;
            committed.push(event);
        }
        self.sync_all_mirrors()?;
        Ok(committed)
    }

    /// Copy the spine's current view into every vessel's read-only
    /// mirror. Called after every boundary (`flush_now` and the flush
    /// step inside `advance_time`) so `vessel.mirror` never lags behind
    /// a just-committed event, matching spec §4.4's "flush_now()...
    /// equivalent to advance_time(0.0)" contract.
    fn sync_all_mirrors(&mut self) -> Result<(), WorldError> {
        let vessel_ids: Vec<String> = self.vessels.keys().cloned().collect();
        for vessel_id in vessel_ids {
            let mirror = self.spine.mirror_snapshot(&vessel_id)?;
            if let Some(vessel) = self.vessels.get_mut(&vessel_id) {
                vessel.sync_mirror(mirror);
            }
        }
        Ok(())
    }

    fn commit_event(
        &mut self,
        event_id: u64,
        scheduled_time_h: f64,
        priority: i32,
        payload: EventPayload,
        metadata: BTreeMap<String, String>,
    ) -> Result<Event, WorldError> {
        let prev_hash = self.event_log.head_hash();
        let event = Event::new(event_id, scheduled_time_h, priority, payload, metadata, prev_hash);
        event.validate()?;
        self.spine.apply(&event)?;
        self.event_log.append(event.clone())?;
        debug!(event_id, scheduled_time_h, priority, "committed event");

        match &event.payload {
            EventPayload::SeedVessel {
                vessel_id,
                cell_line,
                initial_cells,
                ..
            } => {
                self.register_vessel(vessel_id.clone(), cell_line.clone(), *initial_cells, event.scheduled_time_h)?;
            }
            EventPayload::TreatCompound { vessel_id, compound_id, .. } => {
                if let Some(vessel) = self.vessels.get_mut(vessel_id) {
                    vessel
                        .t_treatment_start_h
                        .entry(compound_id.clone())
                        .or_insert(event.scheduled_time_h);
                }
            }
            EventPayload::FeedVessel { .. } | EventPayload::WashoutCompound { .. } => {}
        }

        Ok(event)
    }

    fn register_vessel(
        &mut self,
        vessel_id: String,
        cell_line_id: String,
        initial_cells: f64,
        t_seed_h: f64,
    ) -> Result<(), WorldError> {
        let cell_line = self.cell_line_params(&vessel_id, &cell_line_id)?.clone();
        let vessel_capacity = self.config.biology.vessel_capacity * cell_line.carrying_capacity_scalar;
        let mirror = self.spine.mirror_snapshot(&vessel_id)?;
        let vessel = VesselState::new(vessel_id.clone(), cell_line_id, initial_cells, vessel_capacity, t_seed_h, mirror);
        let _ = self.vessels.insert(vessel_id, vessel);
        Ok(())
    }

    fn cell_line_params(&self, vessel_id: &str, cell_line_id: &str) -> Result<&CellLineParams, WorldError> {
        self.config
            .biology
            .cell_lines
            .get(cell_line_id)
            .ok_or_else(|| WorldError::UnknownCellLine {
                vessel_id: vessel_id.to_string(),
                cell_line: cell_line_id.to_string(),
            })
    }

    fn step_spine_and_biology(&mut self, dt_h: f64) -> Result<(), WorldError> {
        self.spine.step(dt_h, self.now_h)?;

        let vessel_ids: Vec<String> = self.vessels.keys().cloned().collect();
        let now_h = self.now_h;
        for vessel_id in &vessel_ids {
            let mirror = self.spine.mirror_snapshot(vessel_id)?;
            let total_compound_um: f64 = mirror.compounds.values().sum();
            let contamination_onset = self.draw_contamination_onset(vessel_id, dt_h);

            let cell_line_id = match self.vessels.get(vessel_id) {
                Some(vessel) => vessel.cell_line.clone(),
                None => continue,
            };
            let cell_line = self.cell_line_params(vessel_id, &cell_line_id)?.clone();

            if let Some(vessel) = self.vessels.get_mut(vessel_id) {
                step_vessel(
                    vessel,
                    &cell_line,
                    &self.config.biology,
                    &mirror.compounds,
                    total_compound_um,
                    &mirror.nutrients,
                    contamination_onset,
                    now_h,
                    dt_h,
                )?;
            }
        }

        self.sync_all_mirrors()?;
        Ok(())
    }

    /// Draw whether contamination onsets this step, from
    /// `rng_operational_events` keyed per vessel so enabling/disabling
    /// contamination never perturbs `rng_biology` draws (spec §4.1).
    fn draw_contamination_onset(&mut self, vessel_id: &str, dt_h: f64) -> bool {
        if !self.config.biology.contamination.enabled {
            return false;
        }
        let threshold = self.config.biology.contamination.onset_probability_per_h * dt_h;
        let draw = self
            .rng
            .vessel_stream(RngSubsystem::OperationalEvents, vessel_id)
            .next_f64();
        draw < threshold
    }

    /// Produce an observation for `vessel_id` (spec §4.6). Samples the
    /// run's batch context exactly once, on the first call of the run.
    pub fn measure(
        &mut self,
        vessel_id: &str,
        assay: &Assay,
        observation_time_h: f64,
        include_structured_artifacts: bool,
    ) -> Result<Observation, WorldError> {
        let vessel = self
            .vessels
            .get(vessel_id)
            .ok_or_else(|| WorldError::UnknownVessel { vessel_id: vessel_id.to_string() })?;
        let cell_line = self.cell_line_params(vessel_id, &vessel.cell_line)?.clone();
        let is_edge_well = self.spine.is_edge_well(vessel_id)?;
        let hours_since_seed = observation_time_h - vessel.t_seed_h;
        let dose_occupancy = vessel
            .mirror
            .compounds
            .iter()
            .map(|(compound_id, dose_um)| cell_line.dose_fraction(compound_id, *dose_um))
            .fold(0.0_f64, f64::max);

        self.ensure_run_context();
        let run_context = self.run_context_or_default();

        let vessel = self
            .vessels
            .get(vessel_id)
            .ok_or_else(|| WorldError::UnknownVessel { vessel_id: vessel_id.to_string() })?;

        let observation = match assay {
            Assay::CellPainting { channels } => {
                let rng_stream = self.rng.vessel_stream(RngSubsystem::Assay, vessel_id);
                measure_cell_painting(
                    vessel,
                    &cell_line,
                    &self.config.measurement,
                    &run_context,
                    channels,
                    dose_occupancy,
                    is_edge_well,
                    hours_since_seed,
                    observation_time_h,
                    include_structured_artifacts,
                    rng_stream,
                )?
            }
            Assay::Cytotoxicity => {
                let rng_stream = self.rng.vessel_stream(RngSubsystem::Assay, vessel_id);
                measure_cytotoxicity(
                    vessel,
                    &self.config.measurement,
                    &run_context,
                    is_edge_well,
                    observation_time_h,
                    rng_stream,
                )?
            }
        };
        trace!(vessel_id, observation_time_h, "produced observation");
        Ok(observation)
    }

    fn ensure_run_context(&mut self) {
        if self.run_context.is_some() {
            return;
        }
        let channels = self.config.measurement_channels.clone();
        let rc = RunContext::sample(self.rng.stream(RngSubsystem::Batch), &channels);
        self.run_context = Some(rc);
    }

    fn run_context_or_default(&self) -> RunContext {
        self.run_context.clone().unwrap_or_else(|| RunContext {
            illumination_bias: 1.0,
            channel_gain: BTreeMap::new(),
            operator_shift: 0.0,
            day_shift: 0.0,
            plate_shift: 0.0,
        })
    }

    /// Measurement configuration for this run, for a caller assembling
    /// channel lists without reaching into `config()` directly.
    pub fn measurement_config(&self) -> &MeasurementConfig {
        &self.config.measurement
    }

    /// Cost `base_cost` would actually incur given accrued debt (spec
    /// §4.7 `get_inflated_cost`).
    pub fn get_inflated_cost(&self, base_cost: f64) -> f64 {
        self.epistemic.get_inflated_cost(base_cost)
    }

    /// Gate an expensive assay request against the epistemic
    /// controller's preconditions before the caller spends a
    /// `measure()` call on it (spec §7 "Quota/justification failure").
    /// Returns the inflated cost the caller owes if justified, or a
    /// structured [`MeasurementRefusal`] otherwise. Refusing here is
    /// recoverable: it advances no state, unlike an invariant violation.
    pub fn authorize_measurement(
        &self,
        base_cost: f64,
        claimed_marginal_gain_bits: f64,
    ) -> Result<f64, MeasurementRefusal> {
        let inflated = self.get_inflated_cost(base_cost);
        let result = crate::refusal::authorize(inflated, claimed_marginal_gain_bits, self.config.max_cost_per_bit);
        if result.is_err() {
            debug!(base_cost, inflated, claimed_marginal_gain_bits, "measurement authorization refused");
        }
        result
    }

    /// Record realized information gain from a prior/posterior entropy
    /// pair (spec §4.7 `measure_information_gain`).
    pub fn measure_information_gain(
        &mut self,
        prior_entropy: f64,
        posterior_entropy: f64,
        entropy_source: EntropySource,
    ) -> Result<f64, WorldError> {
        Ok(self
            .epistemic
            .measure_information_gain(prior_entropy, posterior_entropy, entropy_source)?)
    }

    /// Resolve an outstanding claim against what was actually realized
    /// (spec §4.7 `resolve_action`).
    pub fn resolve_action(&mut self, action_id: u64, realized_bits: f64) -> Result<(), WorldError> {
        Ok(self.epistemic.resolve_action(action_id, realized_bits)?)
    }

    /// Current entropy-widening penalty (spec §4.7 `compute_penalty`).
    pub fn compute_penalty(&self) -> Penalty {
        self.epistemic.compute_penalty()
    }

    /// Escrow a provisional penalty (spec §4.7 `add_provisional_penalty`).
    pub fn add_provisional_penalty(&mut self, action_id: u64, amount: f64, horizon_steps: u32) {
        self.epistemic.add_provisional_penalty(action_id, amount, horizon_steps);
    }

    /// Advance every escrowed provisional penalty by one cycle (spec
    /// §4.7 `step_provisional`).
    pub fn step_provisional(&mut self) -> Vec<ProvisionalOutcome> {
        self.epistemic.step_provisional()
    }

    /// Direct-state "instant kill" debug hook (spec §4.4 guardrail):
    /// forces `fraction` of the vessel's remaining living mass to die
    /// immediately under `cause`, bypassing the interval-integrated
    /// hazard model. Refuses while a biology step is open; this is the
    /// one call site `StepGuard::guard_direct_mutation` exists to gate,
    /// since mutating `viability`/`death_ledger` mid-step would desync
    /// the step's own before/after conservation check.
    pub fn force_kill_fraction(&mut self, vessel_id: &str, fraction: f64, cause: DeathCause) -> Result<(), WorldError> {
        self.step_guard.guard_direct_mutation()?;
        if !(0.0..=1.0).contains(&fraction) {
            return Err(WorldError::InvalidDirectMutation {
                detail: format!("fraction must be in [0, 1], got {fraction}"),
            });
        }
        let vessel = self
            .vessels
            .get_mut(vessel_id)
            .ok_or_else(|| WorldError::UnknownVessel { vessel_id: vessel_id.to_string() })?;
        let killed = vessel.viability * fraction;
        vessel.viability -= killed;
        *vessel.death_ledger.entry(cause).or_insert(0.0) += killed;
        vessel.cell_count = (vessel.cell_count * (1.0 - fraction)).max(0.0);
        warn!(vessel_id, fraction, cause = cause.as_str(), "direct-state instant kill applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bvm_biology::CellLineParams;
    use bvm_events::{priority, PlateCoordinate};
    use std::collections::BTreeMap;

    fn line_a() -> CellLineParams {
        let mut ic50_um = BTreeMap::new();
        let _ = ic50_um.insert("compound-x".to_string(), 10.0);
        CellLineParams {
            baseline_growth_rate_per_h: 0.03,
            carrying_capacity_scalar: 1.0,
            ic50_um,
            hill_coefficient: BTreeMap::new(),
            max_attrition_hazard_per_h: 0.2,
            baseline_channel_means: BTreeMap::new(),
        }
    }

    fn world_with_one_cell_line() -> World {
        let mut config = WorldConfig::default();
        config.root_seed = 42;
        let _ = config.biology.cell_lines.insert("line-a".to_string(), line_a());
        World::new(config)
    }

    fn seed_event(vessel_id: &str) -> ScheduledEvent {
        ScheduledEvent {
            scheduled_time_h: 0.0,
            priority: priority::SEED,
            payload: EventPayload::SeedVessel {
                vessel_id: vessel_id.to_string(),
                position: PlateCoordinate::new(5, 5),
                cell_line: "line-a".to_string(),
                initial_cells: 3000.0,
                initial_volume_ul: 200.0,
                initial_nutrients_mm: BTreeMap::new(),
            },
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn seeding_is_self_flushing() {
        let mut world = world_with_one_cell_line();
        world.submit_intent(seed_event("A1")).unwrap();
        assert!(world.vessel("A1").is_some());
        assert_eq!(world.event_log().len(), 1);
    }

    #[test]
    fn treat_then_advance_sets_treatment_start_once() {
        let mut world = world_with_one_cell_line();
        world.submit_intent(seed_event("A1")).unwrap();

        let treat = ScheduledEvent {
            scheduled_time_h: 0.0,
            priority: priority::TREAT,
            payload: EventPayload::TreatCompound {
                vessel_id: "A1".to_string(),
                compound_id: "compound-x".to_string(),
                dose_um: 10.0,
            },
            metadata: BTreeMap::new(),
        };
        world.submit_intent(treat.clone()).unwrap();
        world.advance_time(6.0).unwrap();

        let vessel = world.vessel("A1").unwrap();
        assert_eq!(vessel.t_treatment_start_h.get("compound-x"), Some(&0.0));

        // Redosing must not reset the attrition clock.
        world.submit_intent(treat).unwrap();
        world.advance_time(6.0).unwrap();
        let vessel = world.vessel("A1").unwrap();
        assert_eq!(vessel.t_treatment_start_h.get("compound-x"), Some(&0.0));
    }

    #[test]
    fn advance_time_rejects_negative_dt() {
        let mut world = world_with_one_cell_line();
        assert!(matches!(world.advance_time(-1.0), Err(WorldError::NegativeDt { .. })));
    }

    #[test]
    fn measuring_unknown_vessel_is_rejected() {
        let mut world = world_with_one_cell_line();
        let result = world.measure("ghost", &Assay::Cytotoxicity, 24.0, false);
        assert!(matches!(result, Err(WorldError::UnknownVessel { .. })));
    }

    #[test]
    fn measure_is_deterministic_for_a_fixed_seed() {
        let mut world_a = world_with_one_cell_line();
        let mut world_b = world_with_one_cell_line();
        world_a.submit_intent(seed_event("A1")).unwrap();
        world_b.submit_intent(seed_event("A1")).unwrap();
        world_a.advance_time(6.0).unwrap();
        world_b.advance_time(6.0).unwrap();

        let obs_a = world_a.measure("A1", &Assay::Cytotoxicity, 6.0, false).unwrap();
        let obs_b = world_b.measure("A1", &Assay::Cytotoxicity, 6.0, false).unwrap();
        assert_eq!(obs_a, obs_b);
    }

    #[test]
    fn epistemic_claims_flow_through_the_world() {
        let mut world = world_with_one_cell_line();
        world
            .claim_action(Claim {
                action_id: 0,
                action_type: "cell_painting".to_string(),
                expected_gain_bits: 0.5,
                prior_modalities: vec![],
                claimed_marginal_gain: 0.5,
                entropy_source: bvm_epistemic::EntropySource::MeasurementNarrowing,
            })
            .unwrap();
        world.resolve_action(0, 0.2).unwrap();
        assert!(world.debt_bits() > 0.0);
        assert!(world.get_inflated_cost(100.0) > 100.0);
    }

    #[test]
    fn unjustified_measurement_request_is_refused() {
        let world = world_with_one_cell_line();
        let result = world.authorize_measurement(1000.0, 0.1);
        assert!(matches!(
            result,
            Err(MeasurementRefusal { violation_code: "COST_EXCEEDS_JUSTIFICATION", .. })
        ));
    }

    #[test]
    fn justified_measurement_request_returns_inflated_cost() {
        let world = world_with_one_cell_line();
        let cost = world.authorize_measurement(10.0, 5.0).unwrap();
        assert_eq!(cost, 10.0);
    }

    #[test]
    fn force_kill_fraction_moves_viability_into_the_named_cause() {
        let mut world = world_with_one_cell_line();
        world.submit_intent(seed_event("A1")).unwrap();
        world.force_kill_fraction("A1", 0.25, DeathCause::Contamination).unwrap();

        let vessel = world.vessel("A1").unwrap();
        assert!((vessel.viability - 0.75).abs() < 1e-9);
        assert!((vessel.death_ledger[&DeathCause::Contamination] - 0.25).abs() < 1e-9);
    }

    #[test]
    fn force_kill_fraction_refuses_while_a_biology_step_is_open() {
        let mut world = world_with_one_cell_line();
        world.submit_intent(seed_event("A1")).unwrap();
        world.step_guard.begin();
        let result = world.force_kill_fraction("A1", 0.25, DeathCause::Contamination);
        world.step_guard.commit();
        assert!(matches!(result, Err(WorldError::StepGuard(_))));
    }

    #[test]
    fn force_kill_fraction_rejects_out_of_range_fraction() {
        let mut world = world_with_one_cell_line();
        world.submit_intent(seed_event("A1")).unwrap();
        assert!(matches!(
            world.force_kill_fraction("A1", 1.5, DeathCause::Contamination),
            Err(WorldError::InvalidDirectMutation { .. })
        ));
    }
}
