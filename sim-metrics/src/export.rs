//! JSON export for snapshots and metric reports
//!
//! Exports any serializable simulation value in structured JSON, suitable for
//! programmatic consumption and visualization tools.

use crate::error::MetricsError;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON exporter writing to a fixed path.
#[derive(Debug)]
pub struct JsonExporter {
    path: PathBuf,
    pretty: bool,
}

impl JsonExporter {
    /// # Arguments
    /// * `path` - Output file path
    /// * `pretty` - Whether to pretty-print the JSON
    pub fn new(path: &Path, pretty: bool) -> Self {
        Self {
            path: path.to_path_buf(),
            pretty,
        }
    }

    /// Serialize `value` and write it to the exporter's path.
    pub fn export<T: Serialize>(&self, value: &T) -> Result<(), MetricsError> {
        let json = to_json_string(value, self.pretty)?;
        let mut file = File::create(&self.path)?;
        file.write_all(json.as_bytes())?;
        debug!(path = %self.path.display(), bytes = json.len(), "report exported");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Serialize `value` to a JSON string.
pub fn to_json_string<T: Serialize>(value: &T, pretty: bool) -> Result<String, MetricsError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::SimulationMetrics;

    #[test]
    fn test_to_json_string_round_trips() {
        let metrics = SimulationMetrics {
            success: 3,
            failed: 1,
            throughput: 2.0,
            avg_latency_ms: 150.0,
            ..SimulationMetrics::default()
        };

        let json = to_json_string(&metrics, false).unwrap();
        let parsed: SimulationMetrics = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, metrics);
    }

    #[test]
    fn test_exporter_writes_file() {
        let path = std::env::temp_dir().join("resim_export_test.json");
        let exporter = JsonExporter::new(&path, true);

        exporter.export(&SimulationMetrics::default()).unwrap();

        let contents = std::fs::read_to_string(exporter.path()).unwrap();
        assert!(contents.contains("throughput"));
        let _ = std::fs::remove_file(&path);
    }
}
