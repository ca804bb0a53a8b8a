//! Event schema and log for the Concentration Spine.
//!
//! All mutations to per-vessel concentrations and volumes flow through
//! [`Event`]; the [`EventLog`] records them in commit order with a
//! blake3 hash chain so a run can be replayed bit-exactly from its root
//! seed and log alone.
//!
//! # Usage
//!
//! ```rust
//! use bvm_events::{Event, EventPayload, PlateCoordinate, priority};
//! use std::collections::BTreeMap;
//!
//! let event = Event::new(
//!     0,
//!     0.0,
//!     priority::SEED,
//!     EventPayload::SeedVessel {
//!         vessel_id: "A1".to_string(),
//!         position: PlateCoordinate::new(0, 0),
//!         cell_line: "line-a".to_string(),
//!         initial_cells: 3000.0,
//!         initial_volume_ul: 200.0,
//!         initial_nutrients_mm: BTreeMap::new(),
//!     },
//!     BTreeMap::new(),
//!     [0u8; 32],
//! );
//! assert!(event.validate().is_ok());
//! ```

/// Event struct, hash chaining, and schema validation.
pub mod event;

/// The closed set of operations the spine understands.
pub mod payload;

/// Monotonic event_id allocation.
pub mod id;

/// Append-only, hash-chained event log.
pub mod log;

pub use event::{priority, Event, EventError};
pub use id::EventIdAllocator;
pub use log::{EventLog, LoadError};
pub use payload::{EventPayload, PlateCoordinate};
