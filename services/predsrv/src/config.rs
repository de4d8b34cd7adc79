//! predsrv configuration
//!
//! Layered with figment: built-in defaults, then `config/predsrv.yaml`, then
//! `PREDSRV_` environment variables (`__` separates nesting, for example
//! `PREDSRV_FORECAST__EMA_ALPHA=0.5`).

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use freshpoint_forecast::params::{MAX_EMA_ALPHA, MIN_EMA_ALPHA};
use freshpoint_forecast::ForecastDefaults;
use serde::{Deserialize, Serialize};

use crate::error::{PredSrvError, Result};

pub const SERVICE_NAME: &str = "predsrv";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_CONFIG_PATH: &str = "config/predsrv.yaml";
/// Matches the 100 KiB JSON body limit clients already expect
pub const DEFAULT_MAX_BODY_BYTES: usize = 100 * 1024;
pub const ENV_PREFIX: &str = "PREDSRV_";

/// HTTP service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub host: String,
    pub port: u16,
    /// Maximum accepted request body, larger bodies get 413
    pub max_body_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: SERVICE_NAME.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base level when `RUST_LOG` is unset
    pub level: String,
    pub dir: PathBuf,
    #[serde(default = "common::serde_helpers::bool_false")]
    pub enable_file: bool,
    #[serde(default = "common::serde_helpers::bool_false")]
    pub enable_json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: PathBuf::from("logs"),
            enable_file: false,
            enable_json: false,
        }
    }
}

/// Full service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredsrvConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Fallbacks for requests that do not override `ema_alpha` / `future_weeks`
    #[serde(default)]
    pub forecast: ForecastDefaults,
}

impl PredsrvConfig {
    /// Defaults merged with a YAML file (missing file is skipped)
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Yaml::file(path))
    }

    /// Load from defaults, the YAML file and the environment
    ///
    /// An explicitly given path must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) if !p.exists() => {
                return Err(PredSrvError::config(format!(
                    "configuration file not found: {}",
                    p.display()
                )));
            },
            Some(p) => p.to_path_buf(),
            None => PathBuf::from(DEFAULT_CONFIG_PATH),
        };

        let figment = Self::figment(&path).merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::extract(&figment)
    }

    /// Load from defaults and a YAML file only
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::extract(&Self::figment(path))
    }

    fn extract(figment: &Figment) -> Result<Self> {
        let config: Self = figment
            .extract()
            .map_err(|e| PredSrvError::config(format!("failed to load configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.service.name.trim().is_empty() {
            return Err(PredSrvError::config("service.name must not be empty"));
        }
        if self.service.port == 0 {
            return Err(PredSrvError::config("service.port must not be 0"));
        }
        if self.service.max_body_bytes == 0 {
            return Err(PredSrvError::config("service.max_body_bytes must be positive"));
        }

        let alpha = self.forecast.ema_alpha;
        if !(MIN_EMA_ALPHA..=MAX_EMA_ALPHA).contains(&alpha) {
            return Err(PredSrvError::config(format!(
                "forecast.ema_alpha must be within [{}, {}], got {}",
                MIN_EMA_ALPHA, MAX_EMA_ALPHA, alpha
            )));
        }
        let weeks = self.forecast.future_weeks;
        if weeks.is_nan() || weeks < 1.0 {
            return Err(PredSrvError::config(format!(
                "forecast.future_weeks must be at least 1, got {}",
                weeks
            )));
        }
        let max_weeks = self.forecast.max_future_weeks;
        if max_weeks == 0 || weeks > max_weeks as f64 {
            return Err(PredSrvError::config(format!(
                "forecast.max_future_weeks must be at least future_weeks ({}), got {}",
                weeks, max_weeks
            )));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service.host, self.service.port)
    }
}
