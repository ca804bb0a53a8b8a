/**
 * Purpose: Seam between an agent's per-cycle `Design` and the concrete
 * events the boundary scheduler and epistemic controller need (spec §6
 * "the bridge between `Design` and internal events is itself part of
 * the public contract").
 *
 * What this file does NOT do:
 * - Does not decide what an agent should propose (that is agent
 *   policy, out of scope per spec §1).
 * - Does not submit anything itself; `World::submit_design` calls
 *   `to_events` and does the submitting.
 */
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use bvm_epistemic::EntropySource;
use bvm_events::{priority, EventPayload, PlateCoordinate};
use bvm_protocol::{Design, Treatment, WellIntent};

/// One event waiting to be submitted to the world, already carrying the
/// priority its kind resolves to (spec §4.4 fixed priority table).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledEvent {
    pub scheduled_time_h: f64,
    pub priority: i32,
    pub payload: EventPayload,
    pub metadata: BTreeMap<String, String>,
}

/// One epistemic claim to register alongside a design's events (spec
/// §4.7 `claim_action`, minus the `timestamp_h` the world orchestrator
/// fills in from its own clock).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claim {
    pub action_id: u64,
    pub action_type: String,
    pub expected_gain_bits: f64,
    pub prior_modalities: Vec<String>,
    pub claimed_marginal_gain: f64,
    pub entropy_source: EntropySource,
}

/// Failure modes translating a `Design` into events (spec §7).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BridgeError {
    #[error("well intent for cell line {cell_line} requesting {treatment} needs an explicit vessel_id")]
    MissingVesselId { cell_line: String, treatment: &'static str },
}

/// Translates an agent's `Design` into the events and claims the world
/// orchestrator submits for the current cycle (spec §6).
pub trait DesignBridge {
    fn to_events(&self, design: &Design, now_h: f64) -> Result<(Vec<ScheduledEvent>, Vec<Claim>), BridgeError>;
}

/// Mechanical, policy-free translation: one `ScheduledEvent` per
/// `WellIntent` with a `Treatment`, scheduled for the current cycle, and
/// no claims (claims are an agent-policy concern the core does not
/// synthesize on the agent's behalf).
///
/// A `Seed` intent with `vessel_id: None` mints a deterministic id from
/// its plate position (`row{r}col{c}`), so two designs that seed the
/// same well always agree on its id regardless of submission order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDesignBridge;

impl DesignBridge for DefaultDesignBridge {
    fn to_events(&self, design: &Design, now_h: f64) -> Result<(Vec<ScheduledEvent>, Vec<Claim>), BridgeError> {
        let mut events = Vec::new();
        for intent in &design.well_intents {
            if let Some(event) = self.translate_intent(intent, now_h)? {
                events.push(event);
            }
        }
        Ok((events, Vec::new()))
    }
}

impl DefaultDesignBridge {
    fn translate_intent(&self, intent: &WellIntent, now_h: f64) -> Result<Option<ScheduledEvent>, BridgeError> {
        let Some(treatment) = &intent.treatment else {
            return Ok(None);
        };

        let metadata = BTreeMap::new();
        let event = match treatment {
            Treatment::Seed {
                position,
                initial_cells,
                initial_volume_ul,
                initial_nutrients_mm,
            } => {
                let vessel_id = intent
                    .vessel_id
                    .clone()
                    .unwrap_or_else(|| mint_vessel_id(position));
                ScheduledEvent {
                    scheduled_time_h: now_h,
                    priority: priority::SEED,
                    payload: EventPayload::SeedVessel {
                        vessel_id,
                        position: *position,
                        cell_line: intent.cell_line.clone(),
                        initial_cells: *initial_cells,
                        initial_volume_ul: *initial_volume_ul,
                        initial_nutrients_mm: initial_nutrients_mm.clone(),
                    },
                    metadata,
                }
            }
            Treatment::TreatCompound { compound_id, dose_um } => {
                let vessel_id = self.require_vessel_id(intent, "treat_compound")?;
                ScheduledEvent {
                    scheduled_time_h: now_h,
                    priority: priority::TREAT,
                    payload: EventPayload::TreatCompound {
                        vessel_id,
                        compound_id: compound_id.clone(),
                        dose_um: *dose_um,
                    },
                    metadata,
                }
            }
            Treatment::Feed { nutrients_mm } => {
                let vessel_id = self.require_vessel_id(intent, "feed")?;
                ScheduledEvent {
                    scheduled_time_h: now_h,
                    priority: priority::FEED,
                    payload: EventPayload::FeedVessel {
                        vessel_id,
                        nutrients_mm: nutrients_mm.clone(),
                    },
                    metadata,
                }
            }
            Treatment::Washout { compound_id } => {
                let vessel_id = self.require_vessel_id(intent, "washout")?;
                ScheduledEvent {
                    scheduled_time_h: now_h,
                    priority: priority::WASHOUT,
                    payload: EventPayload::WashoutCompound {
                        vessel_id,
                        compound_id: compound_id.clone(),
                    },
                    metadata,
                }
            }
        };
        Ok(Some(event))
    }

    fn require_vessel_id(&self, intent: &WellIntent, treatment: &'static str) -> Result<String, BridgeError> {
        intent.vessel_id.clone().ok_or_else(|| BridgeError::MissingVesselId {
            cell_line: intent.cell_line.clone(),
            treatment,
        })
    }
}

fn mint_vessel_id(position: &PlateCoordinate) -> String {
    format!("row{}col{}", position.row, position.col)
}
