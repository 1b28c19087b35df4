//! Per-message telemetry decoder for the dashboard client side.
//!
//! A pure function from one inbound text message to one normalized record.
//! The decoder has no internal state and is applied independently per
//! message; messages that fail structural parsing are dropped in place and
//! never reach the state store.

use crate::models::{DecodedRecord, WireRecord};

// ---

/// Decode one inbound WebSocket text message.
///
/// Returns `None` when the message is not a JSON object of the wire shape;
/// the caller drops the message and processes the next one. Individual field
/// problems (missing fields, non-numeric values) do not fail the decode —
/// they degrade to gaps via [`crate::Measurement::Invalid`] and the OFF
/// actuator fallback.
pub fn decode(message: &str) -> Option<DecodedRecord> {
    // ---
    match serde_json::from_str::<WireRecord>(message) {
        Ok(wire) => Some(wire.to_decoded()),
        Err(e) => {
            tracing::debug!("Dropping undecodable telemetry message: {}", e);
            None
        }
    }
}
