//! freshpoint-forecast - Forecasting core for FreshPoint
//!
//! Pure, synchronous computation from a set of `(timestamp, value)` samples
//! to a smoothed reconstruction plus a weekly forecast.
//!
//! # Pipeline
//!
//! 1. Resolve parameters (`ema_alpha`, `future_weeks`) with fallbacks
//! 2. Parse timestamps and stable-sort the samples
//! 3. Smooth the values with an exponential moving average
//! 4. Fit an ordinary least-squares line to the smoothed series
//! 5. Evaluate the line over the history and `future_weeks` steps ahead
//!
//! # Example
//!
//! ```rust
//! use freshpoint_forecast::{predict, Parameter, Sample};
//!
//! let samples = vec![
//!     Sample::new("2024-01-08T00:00:00Z", 20.0),
//!     Sample::new("2024-01-01T00:00:00Z", 10.0),
//! ];
//! let params = vec![Parameter::new("future_weeks", "3")];
//!
//! let prediction = predict(Some(&params), &samples).unwrap();
//! let values: Vec<i64> = prediction.data.iter().map(|p| p.value).collect();
//! assert_eq!(values, vec![10, 13, 16, 19, 22]);
//! assert_eq!(prediction.data[2].timestamp, "2024-01-15T00:00:00.000Z");
//! ```
//!
//! # Parameters
//!
//! | Name | Default | Effective value |
//! |------|---------|-----------------|
//! | `ema_alpha` | `0.3` | clamped to `[0.01, 0.99]` |
//! | `future_weeks` | `10` | `max(1, floor(value))` |

pub mod error;
pub mod forecaster;
pub mod params;
pub mod series;
pub mod smoothing;
pub mod trend;

// Re-exports for convenience
pub use error::{ForecastError, Result};
pub use forecaster::{predict, predict_with_config, round_half_up, Forecaster, PredictedPoint, Prediction};
pub use params::{resolve, ForecastConfig, ForecastDefaults, ParamValue, Parameter};
pub use series::{normalize, parse_timestamp, Sample, Series, SeriesPoint};
pub use smoothing::ema;
pub use trend::{fit_linear, LinearTrend};
