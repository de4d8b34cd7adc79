//! Forecast extrapolation
//!
//! Turns an unordered sample set into a reconstruction of the history plus a
//! weekly forecast. Two regimes, keyed on the number of samples:
//!
//! - one sample: not enough data for a trend, project the value flat
//! - two or more: smooth with an EMA, fit a line to the smoothed series and
//!   extend it forward

use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::error::{ForecastError, Result};
use crate::params::{ForecastConfig, ForecastDefaults, Parameter};
use crate::series::{add_weeks_at_midnight, format_timestamp, normalize, Sample, SeriesPoint};
use crate::smoothing::ema;
use crate::trend::{fit_linear, LinearTrend};

/// One reconstructed or forecast point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PredictedPoint {
    pub timestamp: String,
    pub value: i64,
}

/// Reconstructed history followed by the forecast
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Prediction {
    pub data: Vec<PredictedPoint>,
}

impl Prediction {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Round to the nearest integer, ties toward positive infinity
///
/// `2.5 -> 3`, `-2.5 -> -2`
pub fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

// i64::MAX is not exactly representable; 2^63 is the first value out of range
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

fn to_integer(index: usize, value: f64) -> Result<i64> {
    let rounded = round_half_up(value);
    if rounded.is_finite() && rounded >= -I64_LIMIT && rounded < I64_LIMIT {
        Ok(rounded as i64)
    } else {
        Err(ForecastError::unrepresentable(index, value))
    }
}

/// Forecaster with configurable fallback parameters
#[derive(Debug, Clone, Default)]
pub struct Forecaster {
    defaults: ForecastDefaults,
}

impl Forecaster {
    pub fn new(defaults: ForecastDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &ForecastDefaults {
        &self.defaults
    }

    /// Resolve `params` against the defaults and forecast `samples`
    pub fn predict(&self, params: Option<&[Parameter]>, samples: &[Sample]) -> Result<Prediction> {
        let config = ForecastConfig::resolve(params, &self.defaults);
        predict_with_config(&config, samples)
    }
}

/// Forecast with the built-in defaults (`ema_alpha = 0.3`, `future_weeks = 10`)
pub fn predict(params: Option<&[Parameter]>, samples: &[Sample]) -> Result<Prediction> {
    Forecaster::default().predict(params, samples)
}

/// Forecast with an already resolved configuration
pub fn predict_with_config(config: &ForecastConfig, samples: &[Sample]) -> Result<Prediction> {
    let series = normalize(samples)?;
    let weeks = config.future_weeks;
    if !series.is_empty() && weeks > config.max_future_weeks {
        return Err(ForecastError::HorizonTooLong {
            requested: weeks,
            max: config.max_future_weeks,
        });
    }

    let prediction = match series.points() {
        [] => Prediction::empty(),
        [single] => {
            check_horizon(single, weeks)?;
            flat_projection(single, weeks)?
        },
        points => {
            let last = &points[points.len() - 1];
            check_horizon(last, weeks)?;

            let smoothed = ema(&series.values(), config.ema_alpha);
            let trend = fit_linear(&smoothed);
            debug!(
                samples = points.len(),
                alpha = config.ema_alpha,
                weeks = weeks,
                intercept = trend.intercept,
                slope = trend.slope,
                "trend fitted"
            );
            trend_projection(points, &trend, weeks)?
        },
    };

    Ok(prediction)
}

// Fail before allocating anything when the horizon runs off the calendar
fn check_horizon(last: &SeriesPoint, weeks: usize) -> Result<()> {
    add_weeks_at_midnight(last.at, weeks).map(|_| ())
}

fn flat_projection(point: &SeriesPoint, weeks: usize) -> Result<Prediction> {
    let value = to_integer(0, point.value)?;

    let mut data = Vec::with_capacity(weeks + 1);
    data.push(PredictedPoint {
        timestamp: point.timestamp.clone(),
        value,
    });
    for k in 1..=weeks {
        data.push(PredictedPoint {
            timestamp: format_timestamp(add_weeks_at_midnight(point.at, k)?),
            value,
        });
    }

    Ok(Prediction { data })
}

fn trend_projection(points: &[SeriesPoint], trend: &LinearTrend, weeks: usize) -> Result<Prediction> {
    let n = points.len();
    let last = &points[n - 1];

    let mut data = Vec::with_capacity(n + weeks);
    for (i, point) in points.iter().enumerate() {
        data.push(PredictedPoint {
            timestamp: point.timestamp.clone(),
            value: to_integer(i, trend.value_at(i))?,
        });
    }
    for k in 1..=weeks {
        let index = n - 1 + k;
        data.push(PredictedPoint {
            timestamp: format_timestamp(add_weeks_at_midnight(last.at, k)?),
            value: to_integer(index, trend.value_at(index))?,
        });
    }

    Ok(Prediction { data })
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::params::{EMA_ALPHA, FUTURE_WEEKS};

    fn weekly(values: &[f64]) -> Vec<Sample> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let day = 1 + 7 * i as u32;
                let month_day = if day <= 31 {
                    format!("2024-01-{:02}", day)
                } else {
                    format!("2024-02-{:02}", day - 31)
                };
                Sample::new(format!("{}T00:00:00Z", month_day), v)
            })
            .collect()
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.4999), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
        assert_eq!(round_half_up(0.49999999999999994), 0.0);
    }

    #[test]
    fn test_empty_input() {
        let prediction = predict(None, &[]).unwrap();
        assert!(prediction.is_empty());

        let p = vec![Parameter::new(FUTURE_WEEKS, 3.0)];
        assert!(predict(Some(&p), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_single_sample_flat() {
        let samples = vec![Sample::new("2024-03-05T13:20:00Z", 41.6)];
        let p = vec![Parameter::new(FUTURE_WEEKS, 3.0)];
        let prediction = predict(Some(&p), &samples).unwrap();

        assert_eq!(prediction.len(), 4);
        assert!(prediction.data.iter().all(|pt| pt.value == 42));
        assert_eq!(prediction.data[0].timestamp, "2024-03-05T13:20:00Z");
        assert_eq!(prediction.data[1].timestamp, "2024-03-12T00:00:00.000Z");
        assert_eq!(prediction.data[2].timestamp, "2024-03-19T00:00:00.000Z");
        assert_eq!(prediction.data[3].timestamp, "2024-03-26T00:00:00.000Z");
    }

    #[test]
    fn test_two_samples_default_params() {
        let samples = vec![
            Sample::new("2024-01-01T00:00:00Z", 10.0),
            Sample::new("2024-01-08T00:00:00Z", 20.0),
        ];
        let prediction = predict(None, &samples).unwrap();

        assert_eq!(prediction.len(), 12);
        let values: Vec<i64> = prediction.data.iter().map(|p| p.value).collect();
        assert_eq!(
            values,
            vec![10, 13, 16, 19, 22, 25, 28, 31, 34, 37, 40, 43]
        );
        assert_eq!(prediction.data[0].timestamp, "2024-01-01T00:00:00Z");
        assert_eq!(prediction.data[1].timestamp, "2024-01-08T00:00:00Z");
        assert_eq!(prediction.data[2].timestamp, "2024-01-15T00:00:00.000Z");
        assert_eq!(prediction.data[3].timestamp, "2024-01-22T00:00:00.000Z");
        assert_eq!(prediction.data[11].timestamp, "2024-03-18T00:00:00.000Z");
    }

    #[test]
    fn test_output_follows_single_line() {
        let samples = weekly(&[12.0, 15.0, 11.0, 19.0, 22.0, 18.0]);
        let p = vec![Parameter::new(EMA_ALPHA, 0.5), Parameter::new(FUTURE_WEEKS, 4.0)];
        let prediction = predict(Some(&p), &samples).unwrap();

        let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
        let trend = fit_linear(&ema(&values, 0.5));

        assert_eq!(prediction.len(), samples.len() + 4);
        for (idx, point) in prediction.data.iter().enumerate() {
            assert_eq!(point.value, round_half_up(trend.value_at(idx)) as i64);
        }
    }

    #[test]
    fn test_reverse_order_same_prediction() {
        let samples = weekly(&[5.0, 9.0, 4.0, 12.0, 15.0]);
        let mut reversed = samples.clone();
        reversed.reverse();

        assert_eq!(
            predict(None, &samples).unwrap(),
            predict(None, &reversed).unwrap()
        );
    }

    #[test]
    fn test_forecast_timestamps_weekly() {
        let samples = vec![
            Sample::new("2024-01-08T18:00:00Z", 3.0),
            Sample::new("2024-01-01T09:00:00Z", 1.0),
        ];
        let p = vec![Parameter::new(FUTURE_WEEKS, 2.0)];
        let prediction = predict(Some(&p), &samples).unwrap();

        // History comes back sorted with the caller's timestamps
        assert_eq!(prediction.data[0].timestamp, "2024-01-01T09:00:00Z");
        assert_eq!(prediction.data[1].timestamp, "2024-01-08T18:00:00Z");
        assert_eq!(prediction.data[2].timestamp, "2024-01-15T00:00:00.000Z");
        assert_eq!(prediction.data[3].timestamp, "2024-01-22T00:00:00.000Z");
    }

    #[test]
    fn test_invalid_timestamp_fails_fast() {
        let samples = vec![Sample::new("2024-01-01", 1.0), Sample::new("soon", 2.0)];
        let err = predict(None, &samples).unwrap_err();
        assert!(err.is_input_error());
        assert_eq!(err, ForecastError::invalid_timestamp(1, "soon"));
    }

    #[test]
    fn test_unrepresentable_value() {
        let samples = vec![Sample::new("2024-01-01", 1e300)];
        let err = predict(None, &samples).unwrap_err();
        assert!(!err.is_input_error());
        assert!(matches!(err, ForecastError::UnrepresentableValue { index: 0, .. }));
    }

    #[test]
    fn test_horizon_over_cap_rejected() {
        let samples = vec![Sample::new("2024-01-01", 1.0), Sample::new("2024-01-08", 2.0)];
        let params = vec![Parameter::new(FUTURE_WEEKS, 10_000_000.0)];

        let err = predict(Some(&params), &samples).unwrap_err();
        assert!(err.is_input_error());
        assert_eq!(
            err,
            ForecastError::HorizonTooLong {
                requested: 10_000_000,
                max: crate::params::DEFAULT_MAX_FUTURE_WEEKS,
            }
        );

        // The cap itself is allowed
        let params = vec![Parameter::new(FUTURE_WEEKS, 5200.0)];
        assert_eq!(predict(Some(&params), &samples).unwrap().len(), 2 + 5200);
    }

    #[test]
    fn test_custom_defaults() {
        let forecaster = Forecaster::new(ForecastDefaults {
            ema_alpha: 0.3,
            future_weeks: 2.0,
            ..ForecastDefaults::default()
        });
        let samples = vec![Sample::new("2024-01-01", 5.0)];
        assert_eq!(forecaster.predict(None, &samples).unwrap().len(), 3);
    }
}
