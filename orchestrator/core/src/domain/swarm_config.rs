// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Swarm Configuration Types
//
// Defines the configuration schema for a SwarmPilot controller host:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Roster location
// - Positioning source selection (beacon hedge or replay file)
// - Outbound command settings
// - Control loop tuning

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const API_VERSION: &str = "swarmpilot/v1";
pub const KIND: &str = "SwarmConfig";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "SWARMPILOT_CONFIG_PATH";

/// Top-level Kubernetes-style swarm configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmConfigManifest {
    /// API version (must be "swarmpilot/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "SwarmConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: SwarmConfigSpec,
}

/// Manifest metadata (Kubernetes-style)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Human-readable name of this swarm deployment
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

/// Configuration specification (content under spec:)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwarmConfigSpec {
    /// Roster file; the CLI `--roster` flag takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster: Option<PathBuf>,

    #[serde(default)]
    pub positioning: PositioningConfig,

    #[serde(default)]
    pub commands: CommandConfig,

    #[serde(default)]
    pub control: ControlConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositioningSourceKind {
    /// Live beacon network read from a serial device
    Hedge,
    /// Recorded fix sequences read from a YAML file
    Replay,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositioningConfig {
    #[serde(default = "default_source")]
    pub source: PositioningSourceKind,

    /// Serial device of the mobile beacon modem (hedge source)
    #[serde(default = "default_device")]
    pub device: PathBuf,

    /// Line speed of the modem's serial port (hedge source)
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Replay file (replay source)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    /// User-Agent header the robot firmware expects
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout; unset means requests block until the transport gives up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Arrival tolerance applied to every roster entry
    #[serde(default = "default_epsilon")]
    pub default_epsilon: f64,

    /// FORWARD magnitude issued by each `go` step
    #[serde(default = "default_magnitude")]
    pub forward_magnitude: f64,

    /// FORWARD magnitude of the initial nudge that gives every robot a heading
    #[serde(default = "default_magnitude")]
    pub seed_magnitude: f64,

    /// Settle time after starting the positioning source
    #[serde(default = "default_startup_delay")]
    pub startup_delay_ms: u64,

    /// Pause between cycles
    #[serde(default)]
    pub cycle_interval_ms: u64,
}

fn default_source() -> PositioningSourceKind {
    PositioningSourceKind::Hedge
}

fn default_device() -> PathBuf {
    PathBuf::from("/dev/ttyACM0")
}

fn default_baud_rate() -> u32 {
    9600
}

fn default_user_agent() -> String {
    "Car".to_string()
}

fn default_epsilon() -> f64 {
    4.0
}

fn default_magnitude() -> f64 {
    0.5
}

fn default_startup_delay() -> u64 {
    2000
}

impl Default for PositioningConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            device: default_device(),
            baud_rate: default_baud_rate(),
            replay_file: None,
        }
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_ms: None,
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            default_epsilon: default_epsilon(),
            forward_magnitude: default_magnitude(),
            seed_magnitude: default_magnitude(),
            startup_delay_ms: default_startup_delay(),
            cycle_interval_ms: 0,
        }
    }
}

impl Default for SwarmConfigManifest {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: "swarmpilot".to_string(),
                labels: None,
            },
            spec: SwarmConfigSpec::default(),
        }
    }
}

impl SwarmConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Candidate locations, in precedence order, excluding the CLI flag
    /// 1. SWARMPILOT_CONFIG_PATH environment variable
    /// 2. ./swarmpilot.yaml (working directory)
    /// 3. ~/.swarmpilot/config.yaml (user home)
    /// 4. /etc/swarmpilot/config.yaml (system)
    pub fn discovery_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            paths.push(PathBuf::from(path));
        }

        paths.push(PathBuf::from("./swarmpilot.yaml"));

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".swarmpilot").join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/swarmpilot/config.yaml"));
        paths
    }

    /// First existing file among [`Self::discovery_paths`]
    pub fn discover_config() -> Option<PathBuf> {
        Self::discovery_paths().into_iter().find(|p| p.exists())
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path (fail if missing/invalid)
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(device) = std::env::var("SWARMPILOT_HEDGE_DEVICE") {
            tracing::info!("Environment override: SWARMPILOT_HEDGE_DEVICE={}", device);
            self.spec.positioning.device = PathBuf::from(device);
        }

        if let Ok(val) = std::env::var("SWARMPILOT_DEFAULT_EPSILON") {
            match val.parse::<f64>() {
                Ok(epsilon) => {
                    tracing::info!("Environment override: SWARMPILOT_DEFAULT_EPSILON={}", epsilon);
                    self.spec.control.default_epsilon = epsilon;
                }
                Err(_) => {
                    tracing::warn!(
                        "Invalid value for SWARMPILOT_DEFAULT_EPSILON: '{}'. Expected a number. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        let control = &self.spec.control;
        for (field, value) in [
            ("control.default_epsilon", control.default_epsilon),
            ("control.forward_magnitude", control.forward_magnitude),
            ("control.seed_magnitude", control.seed_magnitude),
        ] {
            if !value.is_finite() || value <= 0.0 {
                anyhow::bail!("{} must be a positive number, got {}", field, value);
            }
        }

        match self.spec.positioning.source {
            PositioningSourceKind::Hedge => {
                if self.spec.positioning.device.as_os_str().is_empty() {
                    anyhow::bail!("positioning.device is required for the hedge source");
                }
                if self.spec.positioning.baud_rate == 0 {
                    anyhow::bail!("positioning.baud_rate must be greater than zero");
                }
            }
            PositioningSourceKind::Replay => {
                if self.spec.positioning.replay_file.is_none() {
                    anyhow::bail!("positioning.replay_file is required for the replay source");
                }
            }
        }

        if self.spec.commands.user_agent.is_empty() {
            anyhow::bail!("commands.user_agent cannot be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_manifest() {
        let manifest = SwarmConfigManifest::default();
        assert_eq!(manifest.api_version, "swarmpilot/v1");
        assert_eq!(manifest.kind, "SwarmConfig");
        assert_eq!(manifest.spec.positioning.source, PositioningSourceKind::Hedge);
        assert_eq!(manifest.spec.positioning.baud_rate, 9600);
        assert_eq!(manifest.spec.control.forward_magnitude, 0.5);
        assert_eq!(manifest.spec.control.startup_delay_ms, 2000);
        assert_eq!(manifest.spec.commands.user_agent, "Car");
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
apiVersion: swarmpilot/v1
kind: SwarmConfig
metadata:
  name: lab
spec:
  roster: ./robots.txt
  positioning:
    source: replay
    replay_file: ./bench.yaml
  control:
    cycle_interval_ms: 250
"#;
        let manifest = SwarmConfigManifest::from_yaml_str(yaml).unwrap();
        assert_eq!(manifest.spec.roster, Some(PathBuf::from("./robots.txt")));
        assert_eq!(manifest.spec.positioning.source, PositioningSourceKind::Replay);
        assert_eq!(manifest.spec.control.cycle_interval_ms, 250);
        assert_eq!(manifest.spec.control.seed_magnitude, 0.5);
        assert_eq!(manifest.spec.commands.request_timeout_ms, None);
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut manifest = SwarmConfigManifest::default();

        manifest.api_version = "wrong/v1".to_string();
        assert!(manifest.validate().is_err());
        manifest.api_version = API_VERSION.to_string();

        manifest.kind = "RobotRoster".to_string();
        assert!(manifest.validate().is_err());
        manifest.kind = KIND.to_string();

        manifest.spec.control.forward_magnitude = 0.0;
        assert!(manifest.validate().is_err());
        manifest.spec.control.forward_magnitude = 0.5;

        manifest.spec.control.default_epsilon = f64::NAN;
        assert!(manifest.validate().is_err());
        manifest.spec.control.default_epsilon = 4.0;

        manifest.spec.positioning.baud_rate = 0;
        assert!(manifest.validate().is_err());
        manifest.spec.positioning.baud_rate = 115_200;
        assert!(manifest.validate().is_ok());

        // replay source without a file
        manifest.spec.positioning.source = PositioningSourceKind::Replay;
        assert!(manifest.validate().is_err());
        manifest.spec.positioning.replay_file = Some(PathBuf::from("fixes.yaml"));
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "apiVersion: swarmpilot/v1\nkind: SwarmConfig\nmetadata:\n  name: bench\nspec:\n  commands:\n    user_agent: Rover\n"
        )
        .unwrap();

        let manifest = SwarmConfigManifest::load_or_default(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(manifest.metadata.name, "bench");
        assert_eq!(manifest.spec.commands.user_agent, "Rover");
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let result = SwarmConfigManifest::load_or_default(Some(PathBuf::from(
            "/nonexistent/swarmpilot/config.yaml",
        )));
        assert!(result.is_err());
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swarmpilot.yaml");

        let mut manifest = SwarmConfigManifest::default();
        manifest.metadata.name = "yard".to_string();
        manifest.spec.control.default_epsilon = 0.25;
        manifest.to_yaml_file(&path).unwrap();

        let parsed = SwarmConfigManifest::from_yaml_file(&path).unwrap();
        assert_eq!(parsed.metadata.name, "yard");
        assert_eq!(parsed.spec.control.default_epsilon, 0.25);
    }
}
