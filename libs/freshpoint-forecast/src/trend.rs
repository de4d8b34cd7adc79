//! Ordinary least-squares trend against index position
//!
//! Fits `y = intercept + slope * i` for `i = 0..n-1`.

use serde::{Deserialize, Serialize};

/// Fitted straight line
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearTrend {
    pub fn new(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope }
    }

    /// Evaluate the line at index position `index`
    pub fn value_at(&self, index: usize) -> f64 {
        self.intercept + self.slope * index as f64
    }
}

/// Fit a linear trend to `y` by ordinary least squares
///
/// - empty input: `{0, 0}`
/// - one value: flat line through it
pub fn fit_linear(y: &[f64]) -> LinearTrend {
    let n = y.len();
    match n {
        0 => return LinearTrend::default(),
        1 => return LinearTrend::new(y[0], 0.0),
        _ => {},
    }

    let n_f = n as f64;
    let x_mean = (n_f - 1.0) / 2.0;
    let y_mean = y.iter().sum::<f64>() / n_f;

    let (num, den) = y
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, &yi)| {
            let dx = i as f64 - x_mean;
            (num + dx * (yi - y_mean), den + dx * dx)
        });

    // Only reachable for n <= 1, kept as a guard against division by zero
    if den == 0.0 {
        return LinearTrend::new(y_mean, 0.0);
    }

    let slope = num / den;
    LinearTrend::new(y_mean - slope * x_mean, slope)
}
