//! Probe-report assembly and output.
//!
//! Every subcommand produces one JSON object on stdout: `{probe, success,
//! error?, timestamp, ...stage-specific fields}`. Exit code is always 0;
//! `success` is the machine-readable status.

use serde_json::{json, Map, Value};

/// Builder for a single probe report, accumulating stage-specific fields
/// before being serialized to stdout.
pub struct ProbeReport {
    probe: &'static str,
    timestamp: String,
    fields: Map<String, Value>,
}

impl ProbeReport {
    pub fn new(probe: &'static str, timestamp: impl Into<String>) -> Self {
        let timestamp = timestamp.into();
        Self {
            probe,
            timestamp,
            fields: Map::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Finalize a successful report, printing it to stdout.
    pub fn success(self, pretty: bool) {
        self.emit(true, None, pretty);
    }

    /// Finalize a failed report, printing it to stdout. Exit code stays 0;
    /// `success: false` is the signal.
    pub fn failure(self, error: impl Into<String>, pretty: bool) {
        self.emit(false, Some(error.into()), pretty);
    }

    fn emit(self, success: bool, error: Option<String>, pretty: bool) {
        let mut root = json!({
            "probe": self.probe,
            "success": success,
            "timestamp": self.timestamp,
        });
        if let Some(err) = error {
            root["error"] = Value::String(err);
        }
        if let Value::Object(ref mut map) = root {
            for (k, v) in self.fields {
                map.insert(k, v);
            }
        }

        let rendered = if pretty {
            serde_json::to_string_pretty(&root)
        } else {
            serde_json::to_string(&root)
        }
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize report: {e}\"}}"));

        println!("{rendered}");
    }
}
