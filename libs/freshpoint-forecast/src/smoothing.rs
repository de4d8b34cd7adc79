//! Exponential moving average
//!
//! ```text
//! e_0 = v_0
//! e_i = alpha * v_i + (1 - alpha) * e_{i-1}
//! ```

/// Smooth `values` with an exponential moving average
///
/// Output has the same length as the input; the first element is passed
/// through unchanged.
pub fn ema(values: &[f64], alpha: f64) -> Vec<f64> {
    let Some((&first, rest)) = values.split_first() else {
        return Vec::new();
    };

    let mut smoothed = Vec::with_capacity(values.len());
    let mut previous = first;
    smoothed.push(previous);

    for &value in rest {
        previous = alpha * value + (1.0 - alpha) * previous;
        smoothed.push(previous);
    }

    smoothed
}
