use crate::error::ConfigError;
use crate::types::MicrophoneArray;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub detector: DetectorConfig,

    #[serde(default)]
    pub array: ArrayConfig,

    #[serde(default)]
    pub physics: PhysicsConfig,

    #[serde(default)]
    pub solver: SolverConfig,

    #[serde(default)]
    pub delay: DelayConfig,
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

#[derive(Debug, Deserialize, Clone)]
pub struct DetectorConfig {
    /// Analysis window in samples. Unset derives `sample_rate / 4`.
    #[serde(default)]
    pub window_length: Option<usize>,

    #[serde(default = "default_band_low")]
    pub band_low_hz: f64,

    #[serde(default = "default_band_high")]
    pub band_high_hz: f64,

    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl DetectorConfig {
    pub fn window_length_for(&self, sample_rate: u32) -> usize {
        self.window_length
            .unwrap_or_else(|| (sample_rate / 4) as usize)
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_length: None,
            band_low_hz: default_band_low(),
            band_high_hz: default_band_high(),
            threshold: default_threshold(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArrayConfig {
    #[serde(default = "default_positions")]
    pub positions: [[f64; 2]; 3],

    #[serde(default = "default_reference")]
    pub reference: usize,

    #[serde(default = "default_measurement")]
    pub measurement: [usize; 2],
}

impl ArrayConfig {
    pub fn build(&self) -> Result<MicrophoneArray, ConfigError> {
        MicrophoneArray::new(self.positions, self.reference, self.measurement)
    }
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            positions: default_positions(),
            reference: default_reference(),
            measurement: default_measurement(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PhysicsConfig {
    /// Metres per second, fixed for the whole run.
    #[serde(default = "default_speed_of_sound")]
    pub speed_of_sound: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            speed_of_sound: default_speed_of_sound(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SolverConfig {
    #[serde(default = "default_initial_guess")]
    pub initial_guess: [f64; 2],

    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_guess: default_initial_guess(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DelayConfig {
    /// Largest lag magnitude in samples considered by the delay estimator.
    /// Unset accepts the whole correlation frame.
    #[serde(default)]
    pub max_lag_samples: Option<usize>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_band_low() -> f64 {
    100.0
}

fn default_band_high() -> f64 {
    3000.0
}

fn default_threshold() -> f64 {
    0.5
}

fn default_positions() -> [[f64; 2]; 3] {
    [[-0.5, 0.0], [0.0, 0.0], [0.5, 0.0]]
}

fn default_reference() -> usize {
    1
}

fn default_measurement() -> [usize; 2] {
    [0, 2]
}

/// Speed of sound at 25 °C.
fn default_speed_of_sound() -> f64 {
    346.3
}

fn default_initial_guess() -> [f64; 2] {
    [1.0, 1.0]
}

fn default_max_iterations() -> usize {
    100
}

fn default_tolerance() -> f64 {
    1e-9
}

/// Interpolate `${VAR}` patterns with environment variable values.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();
    let mut result = input.to_string();
    let mut errors = Vec::new();

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(val) => {
                result = result.replace(&cap[0], &val);
            }
            Err(_) => {
                errors.push(var_name.to_string());
            }
        }
    }

    if let Some(first_missing) = errors.into_iter().next() {
        return Err(ConfigError::EnvVarNotFound(first_missing));
    }

    Ok(result)
}

impl AppConfig {
    /// Load configuration from a TOML file, with environment variable interpolation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let interpolated = interpolate_env_vars(&content)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        Ok(config)
    }

    /// Parse configuration from a TOML string (for testing).
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let interpolated = interpolate_env_vars(s)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        Ok(config)
    }
}
