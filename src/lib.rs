//! `aquaflow` — telemetry replay server and dashboard state engine for a
//! water-treatment plant.
//!
//! The crate covers both halves of the pipeline:
//! - **Server**: [`source`] loads the finite historical record set,
//!   [`routes`] serves it over WebSocket with an independent per-connection
//!   replay cursor (see the `aquaflow` binary).
//! - **Client**: [`decoder`] turns each inbound message into a normalized
//!   record, [`store`] folds records into the six derived dashboard views,
//!   and [`filters`] provides the read-time transforms (time-range cutoff,
//!   visibility toggles, anomaly grouping) the panels render from.
//!
//! Data flow: record source → replay emitter → (network) → decoder →
//! windowed state store → view filters → presentation.

pub mod config;
pub mod decoder;
pub mod filters;
pub mod models;
pub mod routes;
pub mod source;
pub mod store;

pub use config::Config;

// These re-exports form the crate's working vocabulary; routes/*.rs and
// downstream consumers use them without knowing which sibling module defines
// what.
pub use models::{ActuatorState, DecodedRecord, Measurement, WireRecord};
pub use store::{ActuatorStatus, DashboardState, PH_WINDOW_CAPACITY};
