//! Experiment configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML or JSON, chosen by extension)
//! 2. Environment variables (with QRELAY_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line flags (applied by the binaries)
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{TeleportError, TeleportResult};
use crate::noise::BellPairNoise;
use crate::sweep::linspace;

/// Complete experiment configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Polar angle of the teleported state
    #[serde(default = "default_theta")]
    pub theta: f64,

    /// Azimuthal angle of the teleported state
    #[serde(default = "default_phi")]
    pub phi: f64,

    /// Shots per basis measurement
    #[serde(default = "default_shots")]
    pub shots: u32,

    /// Base simulator seed; unseeded runs draw from OS entropy
    #[serde(default)]
    pub seed: Option<u64>,

    /// Directory for rendered figures and JSON reports
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Feed-forward delay sweep
    #[serde(default)]
    pub dephasing: DephasingConfig,

    /// Bell-pair noise sweep
    #[serde(default)]
    pub bell_pair: BellPairConfig,
}

/// Delay sweep settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DephasingConfig {
    /// Dephasing time constant
    #[serde(default = "default_t2")]
    pub t2: f64,

    /// Longest delay, in the same unit as `t2`
    #[serde(default = "default_max_delay")]
    pub max_delay: f64,

    /// Number of delays from 0 to `max_delay`, inclusive
    #[serde(default = "default_delay_points")]
    pub points: usize,
}

/// Bell-pair noise settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BellPairConfig {
    /// Noise kinds to sweep
    #[serde(default = "default_kinds")]
    pub kinds: Vec<BellPairNoise>,

    /// Largest noise strength
    #[serde(default = "default_max_strength")]
    pub max_strength: f64,

    /// Number of strengths from 0 to `max_strength`, inclusive
    #[serde(default = "default_strength_points")]
    pub points: usize,

    /// Strength used for the raw Bell-pair histograms
    #[serde(default = "default_histogram_strength")]
    pub histogram_strength: f64,

    /// Shots for the raw Bell-pair histograms
    #[serde(default = "default_histogram_shots")]
    pub histogram_shots: u32,
}

fn default_theta() -> f64 {
    FRAC_PI_3
}

fn default_phi() -> f64 {
    FRAC_PI_2
}

fn default_shots() -> u32 {
    5000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_t2() -> f64 {
    150.0
}

fn default_max_delay() -> f64 {
    1000.0
}

fn default_delay_points() -> usize {
    13
}

fn default_kinds() -> Vec<BellPairNoise> {
    BellPairNoise::ALL.to_vec()
}

fn default_max_strength() -> f64 {
    1.0
}

fn default_strength_points() -> usize {
    11
}

fn default_histogram_strength() -> f64 {
    1.0
}

fn default_histogram_shots() -> u32 {
    2000
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            theta: default_theta(),
            phi: default_phi(),
            shots: default_shots(),
            seed: None,
            output_dir: default_output_dir(),
            dephasing: DephasingConfig::default(),
            bell_pair: BellPairConfig::default(),
        }
    }
}

impl Default for DephasingConfig {
    fn default() -> Self {
        DephasingConfig {
            t2: default_t2(),
            max_delay: default_max_delay(),
            points: default_delay_points(),
        }
    }
}

impl Default for BellPairConfig {
    fn default() -> Self {
        BellPairConfig {
            kinds: default_kinds(),
            max_strength: default_max_strength(),
            points: default_strength_points(),
            histogram_strength: default_histogram_strength(),
            histogram_shots: default_histogram_shots(),
        }
    }
}

impl DephasingConfig {
    /// Delay times of the sweep.
    pub fn delays(&self) -> Vec<f64> {
        linspace(0.0, self.max_delay, self.points)
    }
}

impl BellPairConfig {
    /// Noise strengths of the sweep.
    pub fn strengths(&self) -> Vec<f64> {
        linspace(0.0, self.max_strength, self.points)
    }
}

impl ExperimentConfig {
    /// Load configuration from a YAML (`.yaml`, `.yml`) or JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> TeleportResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&contents)?
        } else {
            Self::from_yaml_str(&contents)?
        };
        Ok(config)
    }

    /// Parse and validate YAML.
    pub fn from_yaml_str(contents: &str) -> TeleportResult<Self> {
        let config: ExperimentConfig = serde_yaml_ng::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON.
    pub fn from_json_str(contents: &str) -> TeleportResult<Self> {
        let config: ExperimentConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Override values from `QRELAY_*` environment variables.
    ///
    /// Unparseable values are ignored.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        fn var<T: std::str::FromStr>(name: &str) -> Option<T> {
            std::env::var(name).ok().and_then(|v| v.parse().ok())
        }

        if let Some(shots) = var("QRELAY_SHOTS") {
            self.shots = shots;
        }
        if let Some(seed) = var("QRELAY_SEED") {
            self.seed = Some(seed);
        }
        if let Some(dir) = var::<PathBuf>("QRELAY_OUTPUT_DIR") {
            self.output_dir = dir;
        }
        if let Some(t2) = var("QRELAY_T2") {
            self.dephasing.t2 = t2;
        }
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> TeleportResult<()> {
        if self.shots == 0 {
            return Err(TeleportError::Config("shots must be > 0".into()));
        }
        if !self.theta.is_finite() || !self.phi.is_finite() {
            return Err(TeleportError::Config("theta and phi must be finite".into()));
        }
        if !(self.dephasing.t2 > 0.0) {
            return Err(TeleportError::Config(format!(
                "dephasing.t2 must be positive, got {}",
                self.dephasing.t2
            )));
        }
        if !(self.dephasing.max_delay >= 0.0) || self.dephasing.points == 0 {
            return Err(TeleportError::Config(
                "dephasing sweep needs max_delay >= 0 and at least one point".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.bell_pair.max_strength) || self.bell_pair.points == 0 {
            return Err(TeleportError::Config(
                "bell_pair sweep needs max_strength in [0, 1] and at least one point".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.bell_pair.histogram_strength) {
            return Err(TeleportError::Config(
                "bell_pair.histogram_strength must be in [0, 1]".into(),
            ));
        }
        if self.bell_pair.histogram_shots == 0 {
            return Err(TeleportError::Config(
                "bell_pair.histogram_shots must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExperimentConfig::default();
        assert_eq!(config.shots, 5000);
        assert_eq!(config.dephasing.delays().len(), 13);
        assert_eq!(config.bell_pair.strengths().len(), 11);
        assert!((config.dephasing.delays()[1] - 1000.0 / 12.0).abs() < 1e-9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "\
shots: 1000
seed: 7
dephasing:
  t2: 80.0
bell_pair:
  kinds: [amplitude_damping]
";
        let config = ExperimentConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.shots, 1000);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.dephasing.t2, 80.0);
        assert_eq!(config.dephasing.points, 13);
        assert_eq!(config.bell_pair.kinds, vec![BellPairNoise::AmplitudeDamping]);
        assert_eq!(config.theta, FRAC_PI_3);
    }

    #[test]
    fn test_json() {
        let config = ExperimentConfig::from_json_str(r#"{"theta": 0.5, "phi": 1.0}"#).unwrap();
        assert_eq!(config.theta, 0.5);
        assert_eq!(config.shots, 5000);
    }

    #[test]
    fn test_json_roundtrip_keeps_angles_exact() {
        let config = ExperimentConfig {
            phi: std::f64::consts::FRAC_PI_2 / 3.0,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back = ExperimentConfig::from_json_str(&json).unwrap();
        assert_eq!(back.theta.to_bits(), config.theta.to_bits());
        assert_eq!(back.phi.to_bits(), config.phi.to_bits());
        assert_eq!(back, config);
    }

    #[test]
    fn test_validation() {
        assert!(ExperimentConfig::from_yaml_str("shots: 0").is_err());
        assert!(ExperimentConfig::from_yaml_str("dephasing:\n  t2: 0.0").is_err());
        assert!(ExperimentConfig::from_yaml_str("bell_pair:\n  max_strength: 2.0").is_err());
        assert!(ExperimentConfig::from_yaml_str("shots: [").is_err());
    }
}
