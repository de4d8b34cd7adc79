//! Named parameter overrides and forecast configuration
//!
//! Callers send overrides as a list of `{name, value}` pairs where `value` is
//! either a JSON number or a numeric string. Resolution never fails: anything
//! unusable falls back to the default.

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Parameter name for the EMA smoothing factor
pub const EMA_ALPHA: &str = "ema_alpha";
/// Parameter name for the forecast horizon in weeks
pub const FUTURE_WEEKS: &str = "future_weeks";

/// Lower bound for the smoothing factor
pub const MIN_EMA_ALPHA: f64 = 0.01;
/// Upper bound for the smoothing factor
pub const MAX_EMA_ALPHA: f64 = 0.99;

pub const DEFAULT_EMA_ALPHA: f64 = 0.3;
pub const DEFAULT_FUTURE_WEEKS: f64 = 10.0;
/// Longest horizon a request may ask for, one century of weeks
pub const DEFAULT_MAX_FUTURE_WEEKS: usize = 5200;

/// Parameter value: a number or a numeric string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    /// Numeric interpretation of the value (may be NaN or infinite)
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => parse_number(s),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Named configuration override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Parameter {
    pub name: String,
    pub value: ParamValue,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Parse a string as a whole number literal
///
/// Surrounding whitespace is ignored and a blank string reads as `0`.
/// Unsigned `0x`/`0o`/`0b` integer literals are accepted. Anything else that
/// is not a plain decimal literal yields NaN.
pub fn parse_number(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }

    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&s[2..], radix)
            .map(|v| v as f64)
            .unwrap_or(f64::NAN);
    }

    // Only digits, sign, dot and exponent; rejects "inf", "nan" and friends
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Look up `name` in `params`, falling back when missing or not finite
///
/// The first entry with a matching name wins.
pub fn resolve(params: Option<&[Parameter]>, name: &str, fallback: f64) -> f64 {
    let Some(params) = params else {
        return fallback;
    };
    let Some(param) = params.iter().find(|p| p.name == name) else {
        return fallback;
    };

    let value = param.value.as_number();
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Fallback values used when a request carries no usable override
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastDefaults {
    #[serde(default = "default_ema_alpha")]
    pub ema_alpha: f64,
    #[serde(default = "default_future_weeks")]
    pub future_weeks: f64,
    /// Requests resolving to a longer horizon are rejected
    #[serde(default = "default_max_future_weeks")]
    pub max_future_weeks: usize,
}

fn default_ema_alpha() -> f64 {
    DEFAULT_EMA_ALPHA
}

fn default_future_weeks() -> f64 {
    DEFAULT_FUTURE_WEEKS
}

fn default_max_future_weeks() -> usize {
    DEFAULT_MAX_FUTURE_WEEKS
}

impl Default for ForecastDefaults {
    fn default() -> Self {
        Self {
            ema_alpha: DEFAULT_EMA_ALPHA,
            future_weeks: DEFAULT_FUTURE_WEEKS,
            max_future_weeks: DEFAULT_MAX_FUTURE_WEEKS,
        }
    }
}

/// Effective configuration for one forecast run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastConfig {
    /// Smoothing factor, always within [`MIN_EMA_ALPHA`, `MAX_EMA_ALPHA`]
    pub ema_alpha: f64,
    /// Forecast horizon in weeks, always >= 1
    pub future_weeks: usize,
    /// Upper bound on `future_weeks`
    pub max_future_weeks: usize,
}

impl ForecastConfig {
    /// Derive the effective configuration from request overrides
    pub fn resolve(params: Option<&[Parameter]>, defaults: &ForecastDefaults) -> Self {
        let raw_alpha = resolve(params, EMA_ALPHA, defaults.ema_alpha);
        let raw_weeks = resolve(params, FUTURE_WEEKS, defaults.future_weeks);

        Self {
            ema_alpha: raw_alpha.clamp(MIN_EMA_ALPHA, MAX_EMA_ALPHA),
            // Float-to-int casts saturate, so absurd horizons stay representable
            future_weeks: raw_weeks.floor().max(1.0) as usize,
            max_future_weeks: defaults.max_future_weeks,
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self::resolve(None, &ForecastDefaults::default())
    }
}
