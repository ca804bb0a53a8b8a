use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The concrete assay kinds a design can request (spec §4.6
/// [SUPPLEMENT]: "Cell-Painting-style" morphology and "LDH-like"
/// cytotoxicity are the two named in the spec's own scenarios).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Assay {
    CellPainting { channels: Vec<String> },
    Cytotoxicity,
}

impl Assay {
    pub fn kind(&self) -> &'static str {
        match self {
            Assay::CellPainting { .. } => "cell_painting",
            Assay::Cytotoxicity => "cytotoxicity",
        }
    }
}

/// Closed set of rare well-failure modes (spec §4.6 layer 7, §9 "sum
/// types, not inheritance"). Each carries a characteristic signature
/// applied by [`crate::noise::apply_well_failure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WellFailureMode {
    Bubble,
    Contamination,
    FocusFailure,
    PipettingMiss,
}

impl WellFailureMode {
    pub const ALL: [WellFailureMode; 4] = [
        WellFailureMode::Bubble,
        WellFailureMode::Contamination,
        WellFailureMode::FocusFailure,
        WellFailureMode::PipettingMiss,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WellFailureMode::Bubble => "bubble",
            WellFailureMode::Contamination => "contamination",
            WellFailureMode::FocusFailure => "focus_failure",
            WellFailureMode::PipettingMiss => "pipetting_miss",
        }
    }
}

/// Per-channel QC flags attached to an observation (spec §6 "per-channel
/// QC flags").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QcFlag {
    WellFailure(WellFailureMode),
    LowQualitySegmentation,
    Dropped,
}

/// Opt-in structured breakdown of the imaging pipeline (spec §4.6
/// "Structured artifacts"). When the caller does not request this,
/// the default scalar observation is produced and is byte-identical to
/// the release that predates this record's existence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImagingArtifacts {
    pub background_multiplier: f64,
    pub segmentation_mode: String,
    pub spatial_field_row: f64,
    pub spatial_field_col: f64,
}

/// Canonical, flat observation record returned to the agent (spec §6:
/// "a canonical, flat schema"). `observation_time_h` means hours since
/// treatment start when the assay readout is taken; no synonym is
/// accepted at this boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub vessel_id: String,
    pub assay_kind: &'static str,
    pub observation_time_h: f64,
    pub viability: f64,
    pub observed_cell_count: f64,
    pub channel_intensities: BTreeMap<String, f64>,
    pub channel_qc_flags: BTreeMap<String, Vec<QcFlag>>,
    pub segmentation_quality: f64,
    pub dropped: bool,
    pub imaging_artifacts: Option<ImagingArtifacts>,
}
