//! Statistical and smoothing helpers for the Network State Index pipeline.
//!
//! Everything here operates on plain `f64` slices and allocates a fresh
//! output; callers are expected to validate their parameters first.

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Linear-interpolation quantile (Hyndman & Fan type 7).
///
/// **Expects pre-sorted input** (caller's responsibility). `p` is a fraction
/// in `[0, 1]`.
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn quantile_type7(sorted: &[f64], p: f64) -> f64 {
    assert!(
        !sorted.is_empty(),
        "quantile_type7: input must not be empty"
    );
    let n = sorted.len();
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    sorted[lo] + (h - h.floor()) * (sorted[hi] - sorted[lo])
}

/// Quantile of unsorted data, `p` as a fraction in `[0, 1]`.
///
/// Sorts a copy of `data` and delegates to [`quantile_type7`].
///
/// # Panics
///
/// Panics if `data` is empty.
pub fn percentile(data: &[f64], p: f64) -> f64 {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    quantile_type7(&sorted, p)
}

/// Averages consecutive, non-overlapping blocks of `block` samples.
///
/// Trailing samples that do not fill a whole block are dropped, so the output
/// has `data.len() / block` elements.
///
/// # Panics
///
/// Panics if `block` is zero.
pub fn block_mean(data: &[f64], block: usize) -> Vec<f64> {
    assert!(block > 0, "block_mean: block size must be positive");
    data.chunks_exact(block).map(mean).collect()
}

/// Normalized Gaussian weights for a standard deviation of `sigma` samples.
///
/// The kernel is truncated at four standard deviations and has
/// `2 * radius + 1` taps with `radius = round(4 * sigma)`.
///
/// # Panics
///
/// Panics if `sigma` is zero.
pub fn gaussian_kernel(sigma: usize) -> Vec<f64> {
    assert!(sigma > 0, "gaussian_kernel: sigma must be positive");
    let sigma = sigma as f64;
    let radius = (4.0 * sigma + 0.5) as i64;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|k| (-0.5 * (k * k) as f64 / (sigma * sigma)).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

/// Gaussian smoothing with a standard deviation of `sigma` samples.
///
/// Boundaries are handled by half-sample symmetric reflection
/// (`d c b a | a b c d | d c b a`), repeated as often as the kernel needs, so
/// the output has the input length even when the kernel is wider than the
/// data.
///
/// # Panics
///
/// Panics if `sigma` is zero.
pub fn gaussian_smooth(data: &[f64], sigma: usize) -> Vec<f64> {
    let weights = gaussian_kernel(sigma);
    let n = data.len();
    if n == 0 {
        return Vec::new();
    }
    let radius = (weights.len() / 2) as i64;
    (0..n as i64)
        .map(|i| {
            weights
                .iter()
                .enumerate()
                .map(|(j, &w)| w * data[reflect_index(i + j as i64 - radius, n)])
                .sum()
        })
        .collect()
}

/// Maps any integer position onto `0..n` by half-sample symmetric reflection.
fn reflect_index(i: i64, n: usize) -> usize {
    let period = 2 * n as i64;
    let r = i.rem_euclid(period);
    if r < n as i64 {
        r as usize
    } else {
        (period - 1 - r) as usize
    }
}
