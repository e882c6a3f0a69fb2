//! Configuration System using Figment
//!
//! Configuration is loaded from:
//! 1. `config/vendor_daq.toml` (base configuration)
//! 2. Environment variables (prefixed with `VENDOR_DAQ_`)
//!
//! # Environment Variable Overrides
//!
//! Nested keys are separated by a double underscore so that key names can
//! contain single underscores:
//!
//! ```text
//! VENDOR_DAQ_APPLICATION__LOG_LEVEL=debug
//! VENDOR_DAQ_MMC__COM_PORT=3
//! VENDOR_DAQ_TIMEHARP__ACQUISITION_MS=5000
//! ```
//!
//! # Example
//!
//! ```no_run
//! use vendor_daq::config::VendorConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = VendorConfig::load()?;
//!     println!("Application: {}", config.application.name);
//!     println!("MMC configured: {}", config.mmc.is_some());
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use th260_sys::consts;

use crate::hardware::pi_mmc::{StageModel, BAUD_RATES, MAX_AXIS};
use crate::hardware::timeharp::{MeasurementMode, TriggerEdge};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/vendor_daq.toml";

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "VENDOR_DAQ_";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file or an environment override could not be parsed.
    #[error("Configuration load error: {0}")]
    LoadError(#[from] figment::Error),
    /// A value parsed but is outside its allowed range.
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorConfig {
    /// Application settings
    pub application: ApplicationConfig,
    /// PI Mercury stage on `MMC410.DLL`; absent when no stage is attached
    #[serde(default)]
    pub mmc: Option<MmcConfig>,
    /// PicoQuant TimeHarp 260; absent when no TCSPC board is attached
    #[serde(default)]
    pub timeharp: Option<TimeHarpConfig>,
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    pub name: String,
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// PI Mercury controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MmcConfig {
    /// COM port number passed to `MMC_COM_open` (1 = COM1)
    pub com_port: i32,
    /// Serial baud rate (9600 or 19200)
    #[serde(default = "default_mmc_baud_rate")]
    pub baud_rate: i32,
    /// Stage model, e.g. "M521DG"
    #[serde(default = "default_stage")]
    pub stage: String,
    /// Device number 1..=16, or 0 for the currently selected device
    #[serde(default = "default_axis")]
    pub axis: i32,
}

/// TimeHarp 260 configuration
///
/// CFD settings apply to PICO boards, trigger settings to NANO boards; the
/// driver picks the set matching the detected model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeHarpConfig {
    /// Path or file name of TH260Lib; platform default when unset
    #[serde(default)]
    pub library: Option<PathBuf>,
    /// Device index 0..MAXDEVNUM
    #[serde(default)]
    pub device_index: i32,
    /// Measurement mode
    #[serde(default)]
    pub mode: MeasurementMode,
    /// Binning code (0 = base resolution)
    #[serde(default)]
    pub binning: i32,
    /// Histogram offset in ns
    #[serde(default)]
    pub offset_ns: i32,
    /// Acquisition time in ms
    #[serde(default = "default_acquisition_ms")]
    pub acquisition_ms: i32,
    /// Sync divider
    #[serde(default = "default_sync_divider")]
    pub sync_divider: i32,
    /// Sync CFD level in mV (PICO)
    #[serde(default = "default_cfd_level")]
    pub sync_cfd_level_mv: i32,
    /// Sync CFD zero cross in mV (PICO)
    #[serde(default = "default_cfd_zero_cross")]
    pub sync_cfd_zero_cross_mv: i32,
    /// Input CFD level in mV (PICO)
    #[serde(default = "default_cfd_level")]
    pub input_cfd_level_mv: i32,
    /// Input CFD zero cross in mV (PICO)
    #[serde(default = "default_cfd_zero_cross")]
    pub input_cfd_zero_cross_mv: i32,
    /// Sync trigger level in mV (NANO)
    #[serde(default = "default_trigger_level")]
    pub sync_trigger_level_mv: i32,
    /// Sync trigger edge (NANO)
    #[serde(default)]
    pub sync_trigger_edge: TriggerEdge,
    /// Input trigger level in mV (NANO)
    #[serde(default = "default_trigger_level")]
    pub input_trigger_level_mv: i32,
    /// Input trigger edge (NANO)
    #[serde(default)]
    pub input_trigger_edge: TriggerEdge,
    /// Histogram length code 0..=MAXLENCODE (length = 1024 * 2^code)
    #[serde(default = "default_histogram_length_code")]
    pub histogram_length_code: i32,
    /// CTC status poll interval in ms
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_mmc_baud_rate() -> i32 {
    9600
}

fn default_stage() -> String {
    "M521DG".to_string()
}

fn default_axis() -> i32 {
    1
}

fn default_acquisition_ms() -> i32 {
    1000
}

fn default_sync_divider() -> i32 {
    1
}

fn default_cfd_level() -> i32 {
    -50
}

fn default_cfd_zero_cross() -> i32 {
    -10
}

fn default_trigger_level() -> i32 {
    -50
}

fn default_histogram_length_code() -> i32 {
    consts::MAXLENCODE
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn check_range(field: &str, value: i32, min: i32, max: i32) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "Invalid {field} {value}. Must be {min}..={max}"
        )))
    }
}

impl VendorConfig {
    /// Load configuration from `config/vendor_daq.toml` and environment variables
    ///
    /// Environment variables (`VENDOR_DAQ_` prefix) take precedence over the
    /// file. After loading, configuration is validated.
    ///
    /// # Errors
    ///
    /// Returns a ConfigError if the file cannot be loaded or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific file path
    ///
    /// # Errors
    ///
    /// Returns a ConfigError if the file cannot be loaded or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::LoadError)?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    ///
    /// Checks the log level, and every value of the `[mmc]` and `[timeharp]`
    /// sections against the limits documented by the vendor libraries.
    ///
    /// # Errors
    ///
    /// Returns a ConfigError with a descriptive message for any validation failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.application.log_level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.application.log_level,
                valid_levels.join(", ")
            )));
        }

        if let Some(mmc) = &self.mmc {
            mmc.validate()?;
        }
        if let Some(timeharp) = &self.timeharp {
            timeharp.validate()?;
        }
        Ok(())
    }
}

impl MmcConfig {
    /// Validate the `[mmc]` section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.com_port < 1 {
            return Err(ConfigError::ValidationError(format!(
                "Invalid com_port {}. COM ports are numbered from 1",
                self.com_port
            )));
        }
        if !BAUD_RATES.contains(&self.baud_rate) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid baud_rate {}. Must be one of: {:?}",
                self.baud_rate, BAUD_RATES
            )));
        }
        if StageModel::lookup(&self.stage).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "Unknown stage '{}'. Known stages: {}",
                self.stage,
                StageModel::known_names().join(", ")
            )));
        }
        check_range("axis", self.axis, 0, MAX_AXIS)
    }
}

impl TimeHarpConfig {
    /// Validate the `[timeharp]` section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("device_index", self.device_index, 0, consts::MAXDEVNUM - 1)?;
        check_range("binning", self.binning, 0, consts::MAXBINSTEPS - 1)?;
        check_range("offset_ns", self.offset_ns, consts::OFFSETMIN, consts::OFFSETMAX)?;
        check_range(
            "acquisition_ms",
            self.acquisition_ms,
            consts::ACQTMIN,
            consts::ACQTMAX,
        )?;
        check_range(
            "sync_divider",
            self.sync_divider,
            consts::SYNCDIVMIN,
            consts::SYNCDIVMAX,
        )?;
        for (field, value) in [
            ("sync_cfd_level_mv", self.sync_cfd_level_mv),
            ("input_cfd_level_mv", self.input_cfd_level_mv),
        ] {
            check_range(field, value, consts::CFDLVLMIN, consts::CFDLVLMAX)?;
        }
        for (field, value) in [
            ("sync_cfd_zero_cross_mv", self.sync_cfd_zero_cross_mv),
            ("input_cfd_zero_cross_mv", self.input_cfd_zero_cross_mv),
        ] {
            check_range(field, value, consts::CFDZCMIN, consts::CFDZCMAX)?;
        }
        for (field, value) in [
            ("sync_trigger_level_mv", self.sync_trigger_level_mv),
            ("input_trigger_level_mv", self.input_trigger_level_mv),
        ] {
            check_range(field, value, consts::TRGLVLMIN, consts::TRGLVLMAX)?;
        }
        check_range(
            "histogram_length_code",
            self.histogram_length_code,
            0,
            consts::MAXLENCODE,
        )?;
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "Invalid poll_interval_ms 0. Must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TimeHarpConfig {
    fn default() -> Self {
        Self {
            library: None,
            device_index: 0,
            mode: MeasurementMode::default(),
            binning: 0,
            offset_ns: 0,
            acquisition_ms: default_acquisition_ms(),
            sync_divider: default_sync_divider(),
            sync_cfd_level_mv: default_cfd_level(),
            sync_cfd_zero_cross_mv: default_cfd_zero_cross(),
            input_cfd_level_mv: default_cfd_level(),
            input_cfd_zero_cross_mv: default_cfd_zero_cross(),
            sync_trigger_level_mv: default_trigger_level(),
            sync_trigger_edge: TriggerEdge::default(),
            input_trigger_level_mv: default_trigger_level(),
            input_trigger_edge: TriggerEdge::default(),
            histogram_length_code: default_histogram_length_code(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> VendorConfig {
        VendorConfig {
            application: ApplicationConfig {
                name: "Test DAQ".to_string(),
                log_level: "info".to_string(),
            },
            mmc: Some(MmcConfig {
                com_port: 1,
                baud_rate: 9600,
                stage: "M521DG".to_string(),
                axis: 1,
            }),
            timeharp: Some(TimeHarpConfig::default()),
        }
    }

    #[test]
    fn test_config_validation_valid() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_sections_are_optional() {
        let mut config = base_config();
        config.mmc = None;
        config.timeharp = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = base_config();
        config.application.log_level = "verbose".to_string();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid log_level"));
    }

    #[test]
    fn test_invalid_baud_rate() {
        let mut config = base_config();
        if let Some(mmc) = config.mmc.as_mut() {
            mmc.baud_rate = 115200;
        }
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("Invalid baud_rate 115200"));
    }

    #[test]
    fn test_unknown_stage() {
        let mut config = base_config();
        if let Some(mmc) = config.mmc.as_mut() {
            mmc.stage = "M999".to_string();
        }
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("Unknown stage 'M999'"));
        assert!(err.contains("M521DG"));
    }

    #[test]
    fn test_axis_out_of_range() {
        let mut config = base_config();
        if let Some(mmc) = config.mmc.as_mut() {
            mmc.axis = 17;
        }
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("Invalid axis 17. Must be 0..=16"));
    }

    #[test]
    fn test_timeharp_limits() {
        let cases: [(&str, fn(&mut TimeHarpConfig)); 9] = [
            ("device_index", |t| t.device_index = 4),
            ("binning", |t| t.binning = 22),
            ("acquisition_ms", |t| t.acquisition_ms = 0),
            ("sync_divider", |t| t.sync_divider = 9),
            ("sync_cfd_level_mv", |t| t.sync_cfd_level_mv = 10),
            ("input_cfd_zero_cross_mv", |t| t.input_cfd_zero_cross_mv = -41),
            ("sync_trigger_level_mv", |t| t.sync_trigger_level_mv = 1201),
            ("histogram_length_code", |t| t.histogram_length_code = 6),
            ("poll_interval_ms", |t| t.poll_interval_ms = 0),
        ];

        for (field, mutate) in cases {
            let mut timeharp = TimeHarpConfig::default();
            mutate(&mut timeharp);
            let err = timeharp.validate().unwrap_err().to_string();
            assert!(err.contains(field), "{field}: {err}");
        }
    }
}
