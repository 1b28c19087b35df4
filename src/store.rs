//! Windowed state store: the dashboard's client-side aggregation engine.
//!
//! [`DashboardState`] consumes decoded records one at a time and maintains
//! six independently-shaped derived views: the flow, energy, and chemical
//! time series (unbounded), the anomaly log (unbounded), the actuator status
//! snapshot (overwritten per record), and the pH sliding window (most recent
//! [`PH_WINDOW_CAPACITY`] entries only).
//!
//! Updates are an explicit reducer — `(state, record) -> state` via
//! [`DashboardState::apply`] — called exactly once per inbound message, in
//! arrival order. Consumers read the views through the snapshot accessors and
//! never mutate them; view filtering happens at read time in
//! [`crate::filters`].

use std::collections::VecDeque;

use crate::models::{ActuatorState, DecodedRecord, Measurement};

// ---

/// Sliding-window capacity of the pH view.
pub const PH_WINDOW_CAPACITY: usize = 60;

/// One flow reading: paired inflow/outflow volumes.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowPoint {
    pub timestamp: String,
    pub inflow: Measurement,
    pub outflow: Measurement,
}

/// One anomaly log entry; a single record can contribute several.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyEntry {
    pub timestamp: String,
    pub r#type: String,
}

/// Current state of the three plant actuators. Overwritten wholesale by each
/// record: a record that omits an actuator field clears the previous value
/// (it decodes as OFF), it does not preserve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActuatorStatus {
    pub inflow_pump: ActuatorState,
    pub chemical_doser: ActuatorState,
    pub filtration_unit: ActuatorState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnergyPoint {
    pub timestamp: String,
    pub energy: Measurement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhPoint {
    pub timestamp: String,
    pub ph: Measurement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChemicalPoint {
    pub timestamp: String,
    pub turbidity: Measurement,
    pub alum: Measurement,
    pub chlorine: Measurement,
}

// ---

/// All derived dashboard views plus the last-updated marker.
///
/// Created empty at connection start, mutated only through [`apply`], torn
/// down with the connection. Nothing here persists.
///
/// [`apply`]: DashboardState::apply
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    // ---
    last_updated: Option<String>,
    flow: Vec<FlowPoint>,
    anomalies: Vec<AnomalyEntry>,
    actuators: ActuatorStatus,
    energy: Vec<EnergyPoint>,
    ph: VecDeque<PhPoint>,
    chemicals: Vec<ChemicalPoint>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one decoded record into every view.
    ///
    /// The update order is part of the contract: marker, flow, anomalies,
    /// actuators, energy, pH window (append then trim), chemicals. Each view
    /// update is independent — an invalid field degrades only the view that
    /// carries it.
    pub fn apply(&mut self, record: &DecodedRecord) {
        // ---
        if !record.timestamp.is_empty() {
            self.last_updated = Some(record.timestamp.clone());
        }

        self.flow.push(FlowPoint {
            timestamp: record.timestamp.clone(),
            inflow: record.inflow,
            outflow: record.outflow,
        });

        if !record.anomaly_alerts.is_empty() && record.anomaly_alerts != "Normal" {
            for issue in record
                .anomaly_alerts
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
            {
                self.anomalies.push(AnomalyEntry {
                    timestamp: record.timestamp.clone(),
                    r#type: issue.to_string(),
                });
            }
        }

        self.actuators = ActuatorStatus {
            inflow_pump: record.inflow_pump,
            chemical_doser: record.chemical_doser,
            filtration_unit: record.filtration_unit,
        };

        self.energy.push(EnergyPoint {
            timestamp: record.timestamp.clone(),
            energy: record.energy,
        });

        self.ph.push_back(PhPoint {
            timestamp: record.timestamp.clone(),
            ph: record.ph,
        });
        while self.ph.len() > PH_WINDOW_CAPACITY {
            self.ph.pop_front();
        }

        self.chemicals.push(ChemicalPoint {
            timestamp: record.timestamp.clone(),
            turbidity: record.turbidity,
            alum: record.alum,
            chlorine: record.chlorine,
        });
    }

    // --- Read-only snapshot accessors ---

    /// Normalized timestamp of the most recent record, if any arrived yet.
    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    pub fn flow(&self) -> &[FlowPoint] {
        &self.flow
    }

    pub fn anomalies(&self) -> &[AnomalyEntry] {
        &self.anomalies
    }

    pub fn actuators(&self) -> ActuatorStatus {
        self.actuators
    }

    pub fn energy(&self) -> &[EnergyPoint] {
        &self.energy
    }

    /// The pH sliding window, oldest first.
    pub fn ph(&self) -> impl Iterator<Item = &PhPoint> {
        self.ph.iter()
    }

    pub fn chemicals(&self) -> &[ChemicalPoint] {
        &self.chemicals
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::WireRecord;

    fn record_at(seconds: usize) -> DecodedRecord {
        // ---
        WireRecord {
            timestamp: format!("2025-03-26 18:45:{:02}", seconds % 60),
            water_inflow_m3: "1200.0".to_string(),
            water_outflow_m3: "1100.0".to_string(),
            ph: format!("{:.2}", 7.0 + seconds as f64 * 0.01),
            turbidity_ntu: "3.1".to_string(),
            alum_mg_per_l: "18.4".to_string(),
            chlorine_mg_per_l: "1.6".to_string(),
            energy_kwh: "240.0".to_string(),
            inflow_pump_state: "ON".to_string(),
            chemical_doser_state: "ON".to_string(),
            filtration_unit_state: "ON".to_string(),
            anomaly_alerts: "Normal".to_string(),
        }
        .to_decoded()
    }

    #[test]
    fn test_unbounded_series_grow_one_per_record_in_order() {
        // ---
        let mut state = DashboardState::new();
        for i in 0..75 {
            state.apply(&record_at(i));
        }

        assert_eq!(state.flow().len(), 75);
        assert_eq!(state.energy().len(), 75);
        assert_eq!(state.chemicals().len(), 75);

        // Arrival order is preserved
        assert_eq!(state.flow()[0].timestamp, "2025-03-26 18:45:00");
        assert_eq!(state.flow()[74].timestamp, "2025-03-26 18:45:14");
    }

    #[test]
    fn test_ph_window_holds_last_sixty() {
        // ---
        let mut state = DashboardState::new();

        for i in 0..30 {
            state.apply(&record_at(i));
        }
        assert_eq!(state.ph().count(), 30);

        for i in 30..100 {
            state.apply(&record_at(i));
        }
        assert_eq!(state.ph().count(), PH_WINDOW_CAPACITY);

        // Window holds exactly the last 60 pH values, oldest first
        let expected: Vec<f64> = (40..100).map(|i| 7.0 + i as f64 * 0.01).collect();
        let got: Vec<f64> = state.ph().map(|p| p.ph.value().unwrap()).collect();
        assert_eq!(got.len(), expected.len());
        for (g, e) in got.iter().zip(&expected) {
            assert!((g - e).abs() < 1e-9);
        }
    }

    #[test]
    fn test_normal_and_empty_alerts_add_nothing() {
        // ---
        let mut state = DashboardState::new();

        let mut normal = record_at(0);
        normal.anomaly_alerts = "Normal".to_string();
        state.apply(&normal);

        let mut empty = record_at(1);
        empty.anomaly_alerts = String::new();
        state.apply(&empty);

        assert!(state.anomalies().is_empty());
    }

    #[test]
    fn test_alert_labels_split_trimmed_in_order() {
        // ---
        let mut state = DashboardState::new();
        let mut record = record_at(0);
        record.anomaly_alerts = "High Chlorine, Abnormal pH".to_string();
        state.apply(&record);

        assert_eq!(state.anomalies().len(), 2);
        assert_eq!(state.anomalies()[0].r#type, "High Chlorine");
        assert_eq!(state.anomalies()[1].r#type, "Abnormal pH");
        assert_eq!(state.anomalies()[0].timestamp, record.timestamp);
        assert_eq!(state.anomalies()[1].timestamp, record.timestamp);
    }

    #[test]
    fn test_stray_commas_produce_no_empty_entries() {
        // ---
        let mut state = DashboardState::new();
        let mut record = record_at(0);
        record.anomaly_alerts = " High Turbidity ,, Backflow Risk ,".to_string();
        state.apply(&record);

        let types: Vec<&str> = state.anomalies().iter().map(|a| a.r#type.as_str()).collect();
        assert_eq!(types, ["High Turbidity", "Backflow Risk"]);
    }

    #[test]
    fn test_actuator_status_is_overwritten_not_merged() {
        // ---
        let mut state = DashboardState::new();
        state.apply(&record_at(0));
        assert_eq!(state.actuators().inflow_pump, ActuatorState::On);

        // A record missing actuator fields clears the previous values
        let partial = crate::decoder::decode(r#"{"timestamp":"2025-03-26 18:46:00"}"#).unwrap();
        state.apply(&partial);

        assert_eq!(
            state.actuators(),
            ActuatorStatus {
                inflow_pump: ActuatorState::Off,
                chemical_doser: ActuatorState::Off,
                filtration_unit: ActuatorState::Off,
            }
        );
    }

    #[test]
    fn test_invalid_field_degrades_only_its_view() {
        // ---
        let mut state = DashboardState::new();
        let mut record = record_at(0);
        record.ph = Measurement::Invalid;
        state.apply(&record);

        // pH shows a gap; every other view updated normally
        assert_eq!(state.ph().next().unwrap().ph, Measurement::Invalid);
        assert_eq!(state.flow().len(), 1);
        assert!(state.flow()[0].inflow.is_valid());
        assert_eq!(state.energy().len(), 1);
        assert_eq!(state.last_updated(), Some("2025-03-26 18:45:00"));
    }

    #[test]
    fn test_last_updated_tracks_latest_record() {
        // ---
        let mut state = DashboardState::new();
        assert_eq!(state.last_updated(), None);

        state.apply(&record_at(0));
        state.apply(&record_at(1));
        assert_eq!(state.last_updated(), Some("2025-03-26 18:45:01"));
    }
}
