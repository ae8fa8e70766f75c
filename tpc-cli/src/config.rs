//! CLI configuration loading, including TOML `include`-directive composition.

use color_eyre::eyre::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use tpc_core::ProbeConfig;

/// Deep merge JSON values; override takes precedence over base. Objects
/// merge key by key, arrays and scalars are replaced wholesale.
fn merge_json_values(base: &mut JsonValue, override_val: JsonValue) {
    match (base, override_val) {
        (JsonValue::Object(base_map), JsonValue::Object(override_map)) => {
            for (key, value) in override_map {
                if let Some(base_value) = base_map.get_mut(&key) {
                    merge_json_values(base_value, value);
                } else {
                    base_map.insert(key, value);
                }
            }
        }
        (base_val, override_val) => {
            *base_val = override_val;
        }
    }
}

fn deserialize_include_optional<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrVec {
        String(String),
        Vec(Vec<String>),
    }

    let opt: Option<StringOrVec> = Option::deserialize(deserializer)?;
    match opt {
        None => Ok(Vec::new()),
        Some(StringOrVec::String(s)) => Ok(vec![s]),
        Some(StringOrVec::Vec(v)) => Ok(v),
    }
}

/// Complete CLI configuration bundle: the probe's run parameters plus
/// output formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_include_optional")]
    pub include: Vec<String>,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Report formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: default_pretty() }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            probe: ProbeConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file, resolving `include` directives
    /// relative to the including file's directory and deep-merging each
    /// included file before the current file's own settings are applied.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let config_toml: toml::Value =
            toml::from_str(&content).wrap_err("Failed to parse TOML configuration")?;
        let mut config_json =
            serde_json::to_value(&config_toml).wrap_err("Failed to convert TOML to JSON")?;

        let includes = match config_json.get("include") {
            Some(JsonValue::String(s)) => vec![s.clone()],
            Some(JsonValue::Array(arr)) => arr.iter().filter_map(|v| v.as_str().map(String::from)).collect(),
            _ => Vec::new(),
        };

        if let JsonValue::Object(ref mut map) = config_json {
            map.remove("include");
        }

        let mut base_json = serde_json::to_value(Self::default()).wrap_err("Failed to create default config")?;

        for include_path in &includes {
            let include_full_path = if Path::new(include_path).is_absolute() {
                PathBuf::from(include_path)
            } else {
                path.parent().unwrap_or_else(|| Path::new(".")).join(include_path)
            };

            let included_config = Self::from_file(&include_full_path)
                .wrap_err_with(|| format!("Failed to load included config: {}", include_full_path.display()))?;
            let included_json =
                serde_json::to_value(&included_config).wrap_err("Failed to convert included config to JSON")?;

            merge_json_values(&mut base_json, included_json);
        }

        merge_json_values(&mut base_json, config_json);

        let config: CliConfig =
            serde_json::from_value(base_json).wrap_err("Failed to parse final configuration")?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_documented_probe_defaults() {
        let cfg = CliConfig::default();
        assert_eq!(cfg.probe.sample_rate, 48_000);
        assert!(cfg.output.pretty);
    }

    #[test]
    fn loading_missing_include_matches_deep_merge_from_file_roundtrip() {
        let dir = std::env::temp_dir().join(format!("tpc-cli-config-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let base_path = dir.join("base.toml");
        std::fs::write(&base_path, "[probe]\nsample_rate = 44100\n").unwrap();

        let overlay_path = dir.join("overlay.toml");
        std::fs::write(&overlay_path, "include = \"base.toml\"\n[probe]\ncalibration_packets = 20\n").unwrap();

        let cfg = CliConfig::from_file(&overlay_path).unwrap();
        assert_eq!(cfg.probe.sample_rate, 44_100);
        assert_eq!(cfg.probe.calibration_packets, 20);

        std::fs::remove_dir_all(&dir).ok();
    }
}
