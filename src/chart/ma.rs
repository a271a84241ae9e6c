//! Simple moving averages over close prices.

/// `MA(n)` over `closes`: same length as the input, `None` for the first
/// `n - 1` entries, then the arithmetic mean of the `n` closes ending at each
/// index. A window longer than the input (or zero) yields all `None`.
///
/// Each window is summed directly rather than with a rolling sum, so every
/// value is exactly the mean of its own `n` inputs.
pub fn moving_average(closes: &[f64], n: usize) -> Vec<Option<f64>> {
    if n == 0 {
        return vec![None; closes.len()];
    }
    (0..closes.len())
        .map(|i| {
            if i + 1 < n {
                None
            } else {
                let window = &closes[i + 1 - n..=i];
                Some(window.iter().sum::<f64>() / n as f64)
            }
        })
        .collect()
}

/// Last defined value of a series, for legend text.
pub fn latest_value(series: &[Option<f64>]) -> Option<f64> {
    series.iter().rev().find_map(|v| *v)
}
