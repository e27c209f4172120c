//! Summary statistics used for baselines and reference amplitudes.

use ndarray::Array1;

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Median, or `None` for an empty slice.
pub fn median(data: &[f64]) -> Option<f64> {
    quantile(data, 0.5)
}

/// Sample quantile with linear interpolation between order statistics
/// (Hyndman & Fan type 7).
///
/// Returns `None` for an empty slice or `prob` outside [0, 1].
pub fn quantile(data: &[f64], prob: f64) -> Option<f64> {
    if data.is_empty() || !(0.0..=1.0).contains(&prob) {
        return None;
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let h = (sorted.len() - 1) as f64 * prob;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

/// Find maximum value and its index.
pub fn find_max(data: &[f64]) -> Option<(f64, usize)> {
    if data.is_empty() {
        return None;
    }

    let mut max_val = f64::NEG_INFINITY;
    let mut max_idx = 0;

    for (i, &val) in data.iter().enumerate() {
        if val > max_val {
            max_val = val;
            max_idx = i;
        }
    }

    Some((max_val, max_idx))
}

/// Centered moving average.
///
/// Each output averages the samples in `[i - (window - 1) / 2, i + window / 2]`
/// clipped to the series, so boundary windows are partial. Non-finite samples
/// are skipped; a window with no finite samples yields NaN.
pub fn rolling_mean(data: &[f64], window: usize) -> Array1<f64> {
    let n = data.len();
    if n == 0 || window == 0 {
        return Array1::from_elem(n, f64::NAN);
    }

    // Prefix sums over finite samples and their counts.
    let mut sums = Vec::with_capacity(n + 1);
    let mut counts = Vec::with_capacity(n + 1);
    sums.push(0.0);
    counts.push(0usize);
    for &v in data {
        let (s, c) = if v.is_finite() { (v, 1) } else { (0.0, 0) };
        sums.push(sums[sums.len() - 1] + s);
        counts.push(counts[counts.len() - 1] + c);
    }

    let left = (window - 1) / 2;
    let right = window / 2;

    Array1::from_shape_fn(n, |i| {
        let start = i.saturating_sub(left);
        let end = (i + right + 1).min(n);
        let count = counts[end] - counts[start];
        if count == 0 {
            f64::NAN
        } else {
            (sums[end] - sums[start]) / count as f64
        }
    })
}
