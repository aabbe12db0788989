use crate::error::ConfigError;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Weight of the language average in the composite score.
pub const LANGUAGE_WEIGHT: f64 = 0.6;
/// Weight of the acoustic average in the composite score.
pub const ACOUSTIC_WEIGHT: f64 = 0.4;
/// Lowest composite score (0-100) still classed as low risk.
pub const LOW_RISK_THRESHOLD: f64 = 80.0;
pub const MEDIUM_RISK_THRESHOLD: f64 = 60.0;
pub const HIGH_RISK_THRESHOLD: f64 = 40.0;
/// Speech rates (words/min) inside this band keep the full acoustic score.
pub const SPEECH_RATE_MIN: f64 = 80.0;
pub const SPEECH_RATE_MAX: f64 = 140.0;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub audio: AudioConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScoringConfig {
    #[serde(default = "default_language_weight")]
    pub language_weight: f64,

    #[serde(default = "default_acoustic_weight")]
    pub acoustic_weight: f64,

    #[serde(default = "default_low_risk_threshold")]
    pub low_risk_threshold: f64,

    #[serde(default = "default_medium_risk_threshold")]
    pub medium_risk_threshold: f64,

    #[serde(default = "default_high_risk_threshold")]
    pub high_risk_threshold: f64,

    #[serde(default = "default_speech_rate_min")]
    pub speech_rate_min: f64,

    #[serde(default = "default_speech_rate_max")]
    pub speech_rate_max: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            language_weight: LANGUAGE_WEIGHT,
            acoustic_weight: ACOUSTIC_WEIGHT,
            low_risk_threshold: LOW_RISK_THRESHOLD,
            medium_risk_threshold: MEDIUM_RISK_THRESHOLD,
            high_risk_threshold: HIGH_RISK_THRESHOLD,
            speech_rate_min: SPEECH_RATE_MIN,
            speech_rate_max: SPEECH_RATE_MAX,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.language_weight < 0.0 || self.acoustic_weight < 0.0 {
            return Err(ConfigError::Invalid(
                "scoring weights must be non-negative".to_string(),
            ));
        }
        if self.language_weight + self.acoustic_weight <= 0.0 {
            return Err(ConfigError::Invalid(
                "scoring weights must not both be zero".to_string(),
            ));
        }
        let thresholds = [
            self.low_risk_threshold,
            self.medium_risk_threshold,
            self.high_risk_threshold,
        ];
        if thresholds.iter().any(|t| !(0.0..=100.0).contains(t)) {
            return Err(ConfigError::Invalid(
                "risk thresholds must lie within [0, 100]".to_string(),
            ));
        }
        if !(self.low_risk_threshold > self.medium_risk_threshold
            && self.medium_risk_threshold > self.high_risk_threshold)
        {
            return Err(ConfigError::Invalid(format!(
                "risk thresholds must be strictly descending (got {} / {} / {})",
                self.low_risk_threshold, self.medium_risk_threshold, self.high_risk_threshold
            )));
        }
        if self.speech_rate_min >= self.speech_rate_max {
            return Err(ConfigError::Invalid(format!(
                "speech_rate_min ({}) must be below speech_rate_max ({})",
                self.speech_rate_min, self.speech_rate_max
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AudioConfig {
    #[serde(default = "default_sample_rate")]
    pub default_sample_rate: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            default_sample_rate: default_sample_rate(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            formats: default_formats(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_language_weight() -> f64 {
    LANGUAGE_WEIGHT
}

fn default_acoustic_weight() -> f64 {
    ACOUSTIC_WEIGHT
}

fn default_low_risk_threshold() -> f64 {
    LOW_RISK_THRESHOLD
}

fn default_medium_risk_threshold() -> f64 {
    MEDIUM_RISK_THRESHOLD
}

fn default_high_risk_threshold() -> f64 {
    HIGH_RISK_THRESHOLD
}

fn default_speech_rate_min() -> f64 {
    SPEECH_RATE_MIN
}

fn default_speech_rate_max() -> f64 {
    SPEECH_RATE_MAX
}

fn default_sample_rate() -> u32 {
    16000
}

fn default_out_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_formats() -> Vec<String> {
    vec!["json".to_string()]
}

/// Interpolate `${VAR}` patterns with environment variable values.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::Invalid(e.to_string()))?;
    let mut result = input.to_string();

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        let val = std::env::var(var_name)
            .map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;
        result = result.replace(&cap[0], &val);
    }

    Ok(result)
}

impl AppConfig {
    /// Load configuration from a TOML file, with environment variable interpolation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let interpolated = interpolate_env_vars(s)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.validate()?;
        if self.audio.default_sample_rate == 0 {
            return Err(ConfigError::Invalid(
                "audio.default_sample_rate must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
