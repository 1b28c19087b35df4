//! Historical record source for the replay server.
//!
//! Loads the finite telemetry record set from a CSV file, once, before any
//! client connection is accepted. The CSV header row must carry the wire
//! field names (see [`crate::WireRecord`]); values are kept verbatim as
//! strings — the server replays rows as-is and never validates their content.
//!
//! A load failure is fatal at startup (EMBP: single gateway call from
//! `main.rs`); there is no partial or lazy loading.

use anyhow::{Context, Result};
use std::path::Path;

use crate::WireRecord;

// ---

/// Materialize the full record set from `path`, in file order.
///
/// Rows that fail structural CSV deserialization abort the load: a broken
/// source file should be fixed, not silently truncated. Row *content* is not
/// validated here; a malformed value is replayed as-is and handled by the
/// decoder on the consuming side.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<WireRecord>> {
    // ---
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open record source '{}'", path.display()))?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: WireRecord = row
            .with_context(|| format!("Malformed row in record source '{}'", path.display()))?;
        records.push(record);
    }

    tracing::info!(
        "Record source loaded with {} rows from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use std::io::Write;

    const SAMPLE_CSV: &str = "\
timestamp,water_inflow_m3,water_outflow_m3,pH,turbidity_NTU,alum_mg_per_l,chlorine_mg_per_l,energy_kwh,inflow_pump_state,chemical_doser_state,filtration_unit_state,anomaly_alerts
2025-03-26 18:45:00,1200.5,1100.0,7.2,3.1,18.4,1.6,240.0,ON,ON,ON,Normal
2025-03-26 18:45:01,1210.0,1105.5,7.1,3.4,18.2,1.7,242.5,ON,OFF,MAINTENANCE,\"High Chlorine, Abnormal pH\"
";

    #[test]
    fn test_load_records_preserves_order_and_values() -> Result<()> {
        // ---
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(SAMPLE_CSV.as_bytes())?;

        let records = load_records(file.path())?;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp, "2025-03-26 18:45:00");
        assert_eq!(records[0].water_inflow_m3, "1200.5");
        assert_eq!(records[0].anomaly_alerts, "Normal");
        assert_eq!(records[1].anomaly_alerts, "High Chlorine, Abnormal pH");
        assert_eq!(records[1].filtration_unit_state, "MAINTENANCE");
        Ok(())
    }

    #[test]
    fn test_load_records_missing_file_is_an_error() {
        // ---
        let err = load_records("/nonexistent/data.csv").unwrap_err();
        assert!(err.to_string().contains("Failed to open record source"));
    }

    #[test]
    fn test_loaded_rows_keep_values_verbatim() -> Result<()> {
        // ---
        // A non-numeric value is not the source's problem; it must survive
        // the load untouched so the decoder can classify it.
        let csv = "\
timestamp,water_inflow_m3,water_outflow_m3,pH,turbidity_NTU,alum_mg_per_l,chlorine_mg_per_l,energy_kwh,inflow_pump_state,chemical_doser_state,filtration_unit_state,anomaly_alerts
2025-03-26 18:45:00,garbage,1100.0,7.2,3.1,18.4,1.6,240.0,ON,ON,ON,Normal
";
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(csv.as_bytes())?;

        let records = load_records(file.path())?;
        assert_eq!(records[0].water_inflow_m3, "garbage");
        Ok(())
    }
}
