//! Data models for the water-treatment telemetry pipeline.
//!
//! Two shapes travel through the system:
//! - [`WireRecord`] — one row of the historical record set exactly as it
//!   appears on the wire. The replay server reads these from CSV and sends
//!   them verbatim, so every value is a string; validation happens on the
//!   consuming side.
//! - [`DecodedRecord`] — the normalized form produced by the decoder: the
//!   timestamp truncated to whole seconds, each numeric field coerced through
//!   an explicit fallible parse, and actuator fields lifted into an enum.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---

/// One telemetry row as carried on the wire.
///
/// Field names are part of the wire contract and must not change. Every field
/// defaults to the empty string so a partial row still round-trips; downstream
/// coercion turns missing values into gaps rather than errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireRecord {
    // ---
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub water_inflow_m3: String,
    #[serde(default)]
    pub water_outflow_m3: String,
    #[serde(default, rename = "pH")]
    pub ph: String,
    #[serde(default, rename = "turbidity_NTU")]
    pub turbidity_ntu: String,
    #[serde(default)]
    pub alum_mg_per_l: String,
    #[serde(default)]
    pub chlorine_mg_per_l: String,
    #[serde(default)]
    pub energy_kwh: String,
    #[serde(default)]
    pub inflow_pump_state: String,
    #[serde(default)]
    pub chemical_doser_state: String,
    #[serde(default)]
    pub filtration_unit_state: String,
    #[serde(default)]
    pub anomaly_alerts: String,
}

/// A numeric wire value after explicit coercion.
///
/// A field that fails to parse becomes [`Measurement::Invalid`] and stays
/// that way; charts render it as a gap and no view update is blocked by it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    Value(f64),
    Invalid,
}

impl Measurement {
    /// Coerce a raw wire string. Leading/trailing whitespace is tolerated;
    /// anything `f64` cannot parse (including the empty string) is `Invalid`.
    pub fn parse(raw: &str) -> Self {
        // ---
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Measurement::Value(v),
            _ => Measurement::Invalid,
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Measurement::Value(v) => Some(v),
            Measurement::Invalid => None,
        }
    }

    pub fn is_valid(self) -> bool {
        matches!(self, Measurement::Value(_))
    }
}

/// State of a plant actuator as reported per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActuatorState {
    On,
    #[default]
    Off,
    Maintenance,
}

impl ActuatorState {
    /// Coerce a raw wire string. Unrecognized or missing values fall back to
    /// `Off`, the dashboard's default for unknown actuator state.
    pub fn parse(raw: &str) -> Self {
        // ---
        match raw.trim() {
            "ON" => ActuatorState::On,
            "OFF" => ActuatorState::Off,
            "MAINTENANCE" => ActuatorState::Maintenance,
            _ => ActuatorState::Off,
        }
    }
}

impl fmt::Display for ActuatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActuatorState::On => "ON",
            ActuatorState::Off => "OFF",
            ActuatorState::Maintenance => "MAINTENANCE",
        };
        f.write_str(s)
    }
}

/// Normalized record handed to the state store, one per inbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    // ---
    /// Wire timestamp truncated to whole seconds (everything after the first
    /// `'.'` dropped). Used for display and grouping throughout.
    pub timestamp: String,
    pub inflow: Measurement,
    pub outflow: Measurement,
    pub ph: Measurement,
    pub turbidity: Measurement,
    pub alum: Measurement,
    pub chlorine: Measurement,
    pub energy: Measurement,
    pub inflow_pump: ActuatorState,
    pub chemical_doser: ActuatorState,
    pub filtration_unit: ActuatorState,
    /// Raw alert label string; the store splits it. `"Normal"` or empty
    /// means no alerts.
    pub anomaly_alerts: String,
}

/// Normalization helpers
impl WireRecord {
    // ---
    pub fn to_decoded(&self) -> DecodedRecord {
        // ---
        let timestamp = self
            .timestamp
            .split('.')
            .next()
            .unwrap_or_default()
            .to_string();

        DecodedRecord {
            timestamp,
            inflow: Measurement::parse(&self.water_inflow_m3),
            outflow: Measurement::parse(&self.water_outflow_m3),
            ph: Measurement::parse(&self.ph),
            turbidity: Measurement::parse(&self.turbidity_ntu),
            alum: Measurement::parse(&self.alum_mg_per_l),
            chlorine: Measurement::parse(&self.chlorine_mg_per_l),
            energy: Measurement::parse(&self.energy_kwh),
            inflow_pump: ActuatorState::parse(&self.inflow_pump_state),
            chemical_doser: ActuatorState::parse(&self.chemical_doser_state),
            filtration_unit: ActuatorState::parse(&self.filtration_unit_state),
            anomaly_alerts: self.anomaly_alerts.clone(),
        }
    }
}
