//! carbongate.toml configuration and job spec parsing.
//!
//! [`GateConfig`] carries the tunables the estimator needs (thresholds,
//! harmonic orders, source deadline); [`JobSpec`] describes one training
//! job to evaluate. Both are TOML files with every section optional and
//! documented defaults, validated on construction rather than at the
//! call sites that consume them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Gate thresholds as fractions of the monthly budget overage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThresholdConfig {
    /// Overage fraction up to which the gate only warns.
    pub warn_fraction: f64,
    /// Overage fraction up to which the gate soft-blocks.
    pub soft_block_fraction: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            warn_fraction: 0.10,
            soft_block_fraction: 0.20,
        }
    }
}

/// Harmonic forecaster tunables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastConfig {
    /// How far ahead to search for a low-carbon window.
    pub lookahead_hours: u32,
    /// Cos/sin pairs fitted at the 24 h period.
    pub daily_harmonics: u32,
    /// Cos/sin pairs fitted at the 168 h and 336 h periods (when the
    /// history is long enough to support them).
    pub weekly_harmonics: u32,
    /// Minimum live-feed points before it replaces the harmonic model.
    pub live_feed_min_points: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            lookahead_hours: 48,
            daily_harmonics: 5,
            weekly_harmonics: 2,
            live_feed_min_points: 12,
        }
    }
}

/// Live data source settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    /// Per-request deadline in milliseconds. On expiry the estimator
    /// degrades to the static fallback; there is no retry.
    pub deadline_ms: u64,
    /// Override for the live API base URL (tests point this at a stub).
    pub api_base: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            deadline_ms: 5_000,
            api_base: None,
        }
    }
}

/// Deployment assumptions for the lifecycle projection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LifecycleParams {
    pub model_params_billions: f64,
    pub queries_per_day: f64,
    pub deployment_months: f64,
}

impl Default for LifecycleParams {
    fn default() -> Self {
        Self {
            model_params_billions: 7.0,
            queries_per_day: 10_000.0,
            deployment_months: 12.0,
        }
    }
}

/// Top-level estimator configuration (carbongate.toml).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GateConfig {
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub lifecycle: LifecycleParams,
}

impl GateConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GateConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject configurations the decision engine cannot make sense of.
    pub fn validate(&self) -> ConfigResult<()> {
        let t = &self.thresholds;
        if t.warn_fraction <= 0.0 {
            return Err(ConfigError::Invalid(
                "thresholds.warn_fraction must be positive".to_string(),
            ));
        }
        if t.soft_block_fraction <= t.warn_fraction {
            return Err(ConfigError::Invalid(format!(
                "thresholds.soft_block_fraction ({}) must exceed warn_fraction ({})",
                t.soft_block_fraction, t.warn_fraction
            )));
        }
        if self.forecast.lookahead_hours == 0 {
            return Err(ConfigError::Invalid(
                "forecast.lookahead_hours must be at least 1".to_string(),
            ));
        }
        if self.forecast.daily_harmonics == 0 {
            return Err(ConfigError::Invalid(
                "forecast.daily_harmonics must be at least 1".to_string(),
            ));
        }
        if self.source.deadline_ms == 0 {
            return Err(ConfigError::Invalid(
                "source.deadline_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// One training job to evaluate (job.toml).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobSpec {
    /// Accelerator identifier; unknown ids use the default profile.
    pub accelerator: String,
    pub duration_hours: f64,
    /// Region identifier; unknown ids use the default region.
    pub region: String,
    pub ambient_temp_c: f64,
    /// Spot intensity from the caller's own feed, when it has one.
    pub current_intensity_g_kwh: Option<f64>,
    /// Ordered hourly intensity history (g CO₂/kWh), oldest first.
    #[serde(default)]
    pub intensity_history: Vec<f64>,
    pub monthly_budget_kg: f64,
    #[serde(default)]
    pub monthly_used_kg: f64,
    /// Combined kg from the previous gate check for the same job.
    pub previous_estimate_kg: Option<f64>,
    /// Whether the alternative low-carbon infrastructure can take
    /// this job.
    #[serde(default)]
    pub alternate_available: bool,
    /// Whether the job is already targeted at that infrastructure.
    #[serde(default)]
    pub alternate_active: bool,
    /// Deployment assumptions; falls back to the config defaults.
    pub lifecycle: Option<LifecycleParams>,
}

impl JobSpec {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let spec: JobSpec = toml::from_str(&content)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.duration_hours <= 0.0 {
            return Err(ConfigError::Invalid(
                "duration_hours must be positive".to_string(),
            ));
        }
        if self.monthly_budget_kg < 0.0 {
            return Err(ConfigError::Invalid(
                "monthly_budget_kg must not be negative".to_string(),
            ));
        }
        if self.monthly_used_kg < 0.0 {
            return Err(ConfigError::Invalid(
                "monthly_used_kg must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Scaffold a starter job spec.
    pub fn scaffold() -> Self {
        JobSpec {
            accelerator: "A100".to_string(),
            duration_hours: 4.0,
            region: "us-east-1".to_string(),
            ambient_temp_c: 18.0,
            current_intensity_g_kwh: None,
            intensity_history: Vec::new(),
            monthly_budget_kg: 50.0,
            monthly_used_kg: 0.0,
            previous_estimate_kg: None,
            alternate_available: false,
            alternate_active: false,
            lifecycle: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        GateConfig::default().validate().unwrap();
    }

    #[test]
    fn default_thresholds() {
        let config = GateConfig::default();
        assert_eq!(config.thresholds.warn_fraction, 0.10);
        assert_eq!(config.thresholds.soft_block_fraction, 0.20);
        assert_eq!(config.forecast.lookahead_hours, 48);
    }

    #[test]
    fn parse_minimal_config() {
        let config: GateConfig = toml::from_str("").unwrap();
        assert_eq!(config, GateConfig::default());
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
[thresholds]
warn_fraction = 0.05
soft_block_fraction = 0.15
"#;
        let config: GateConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.thresholds.warn_fraction, 0.05);
        // Untouched sections keep their defaults.
        assert_eq!(config.forecast.daily_harmonics, 5);
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let config = GateConfig {
            thresholds: ThresholdConfig {
                warn_fraction: 0.30,
                soft_block_fraction: 0.20,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn scaffold_round_trips() {
        let spec = JobSpec::scaffold();
        let toml_str = spec.to_toml_string().unwrap();
        let parsed: JobSpec = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, spec);
    }

    #[test]
    fn parse_minimal_job_spec() {
        let toml_str = r#"
accelerator = "H100"
duration_hours = 2.5
region = "eu-north-1"
ambient_temp_c = 12.0
monthly_budget_kg = 25.0
"#;
        let spec: JobSpec = toml::from_str(toml_str).unwrap();
        spec.validate().unwrap();
        assert_eq!(spec.accelerator, "H100");
        assert!(spec.intensity_history.is_empty());
        assert!(!spec.alternate_available);
    }

    #[test]
    fn zero_duration_rejected() {
        let mut spec = JobSpec::scaffold();
        spec.duration_hours = 0.0;
        assert!(spec.validate().is_err());
    }
}
