//! Continuous Wavelet Transform (CWT) with amplitude-normalized Morlet kernels.
//!
//! Each row is computed independently: the signal is detrended by its moving
//! average over the kernel support, convolved ("same" mode) with the
//! conjugated kernel via zero-padded FFTs, and divided by the kernel's
//! normalization constant. FFT plans are built once per transform and shared
//! by the rows, which are computed in parallel.

use std::iter;
use std::sync::Arc;

use num_complex::Complex;
use rayon::prelude::*;
use rustfft::{Fft, FftPlanner};
use tracing::debug;

use crate::error::WaveletError;
use crate::frequency::FrequencySet;
use crate::kernel::{DEFAULT_W0, MorletKernel};

/// Configuration for the Continuous Wavelet Transform.
///
/// # Example
///
/// ```ignore
/// use nsi_wavelet::CwtConfig;
///
/// let config = CwtConfig::new(1e-3).with_w0(7.0);
/// ```
#[derive(Clone, Debug)]
pub struct CwtConfig {
    /// Sampling interval of the analyzed data, in seconds.
    dt: f64,
    /// Morlet shape parameter.
    w0: f64,
}

impl CwtConfig {
    /// Creates a configuration for data sampled every `dt` seconds.
    ///
    /// Defaults: `w0 = 6.0`.
    pub fn new(dt: f64) -> Self {
        Self { dt, w0: DEFAULT_W0 }
    }

    /// Sets the Morlet shape parameter.
    pub fn with_w0(mut self, w0: f64) -> Self {
        self.w0 = w0;
        self
    }

    /// Returns the sampling interval.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the Morlet shape parameter.
    pub fn w0(&self) -> f64 {
        self.w0
    }
}

/// Complex time–frequency matrix `[n_frequencies][n_times]`.
///
/// Column `t` is aligned with input sample `t`; row `i` holds the transform at
/// `frequencies()[i]`.
#[derive(Clone, Debug)]
pub struct CwtMatrix {
    coefficients: Vec<Vec<Complex<f64>>>,
    frequencies: FrequencySet,
    dt: f64,
    w0: f64,
}

impl CwtMatrix {
    /// Returns the complex coefficients `[n_frequencies][n_times]`.
    pub fn coefficients(&self) -> &[Vec<Complex<f64>>] {
        &self.coefficients
    }

    /// Returns the row for frequency index `index`, if any.
    pub fn row(&self, index: usize) -> Option<&[Complex<f64>]> {
        self.coefficients.get(index).map(Vec::as_slice)
    }

    /// Returns the analyzed frequencies.
    pub fn frequencies(&self) -> &FrequencySet {
        &self.frequencies
    }

    /// Returns the sampling interval used.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the Morlet shape parameter used.
    pub fn w0(&self) -> f64 {
        self.w0
    }

    /// Returns the number of frequencies (rows).
    pub fn n_frequencies(&self) -> usize {
        self.coefficients.len()
    }

    /// Returns the number of time samples (columns).
    pub fn n_times(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    /// Magnitude `|W(f, t)|` of every coefficient.
    pub fn magnitude(&self) -> Vec<Vec<f64>> {
        self.coefficients
            .iter()
            .map(|row| row.iter().map(|c| c.norm()).collect())
            .collect()
    }

    /// Per-sample mean magnitude across frequencies.
    pub fn mean_magnitude(&self) -> Vec<f64> {
        let n_freq = self.n_frequencies() as f64;
        let mut acc = vec![0.0; self.n_times()];
        for row in &self.coefficients {
            for (a, c) in acc.iter_mut().zip(row) {
                *a += c.norm();
            }
        }
        acc.into_iter().map(|a| a / n_freq).collect()
    }

    /// Per-sample maximum magnitude across frequencies.
    pub fn max_magnitude(&self) -> Vec<f64> {
        let mut acc = vec![f64::NEG_INFINITY; self.n_times()];
        for row in &self.coefficients {
            for (a, c) in acc.iter_mut().zip(row) {
                *a = a.max(c.norm());
            }
        }
        acc
    }
}

/// Computes the amplitude-normalized Morlet CWT of `data`.
///
/// A pure sinusoid of frequency `f` and amplitude `A` yields `|W| ≈ A` in the
/// row for `f`, away from the edges.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`WaveletError::EmptySignal`] | `data` is empty |
/// | [`WaveletError::NonFiniteData`] | `data` contains NaN or infinity |
/// | [`WaveletError::InvalidSampling`] | `config.dt()` not finite or `<= 0` |
/// | [`WaveletError::InvalidShape`] | `config.w0()` not finite or `< 1` |
pub fn cwt(
    data: &[f64],
    frequencies: &FrequencySet,
    config: &CwtConfig,
) -> Result<CwtMatrix, WaveletError> {
    if data.is_empty() {
        return Err(WaveletError::EmptySignal);
    }
    if !data.iter().all(|v| v.is_finite()) {
        return Err(WaveletError::NonFiniteData);
    }
    if frequencies.is_empty() {
        return Err(WaveletError::EmptyFrequencySet);
    }

    // Build every kernel up front so parameter errors surface before any work.
    let kernels = frequencies
        .as_slice()
        .iter()
        .map(|&f| MorletKernel::new(f, config.dt, config.w0))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        n_times = data.len(),
        n_frequencies = kernels.len(),
        longest_kernel = kernels.iter().map(MorletKernel::len).max().unwrap_or(0),
        "computing CWT"
    );

    // Kernels of similar length share a padded size; the planner hands back
    // the same plan for each repeated size.
    let mut planner = FftPlanner::new();
    let plans: Vec<FftPlans> = kernels
        .iter()
        .map(|k| FftPlans::for_lengths(&mut planner, data.len(), k.len()))
        .collect();

    let coefficients: Vec<Vec<Complex<f64>>> = kernels
        .par_iter()
        .zip(&plans)
        .map(|(k, p)| transform_row(data, k, p))
        .collect();

    Ok(CwtMatrix {
        coefficients,
        frequencies: frequencies.clone(),
        dt: config.dt,
        w0: config.w0,
    })
}

/// One CWT row: local detrending, convolution with the conjugated kernel, normalization.
fn transform_row(data: &[f64], kernel: &MorletKernel, plans: &FftPlans) -> Vec<Complex<f64>> {
    let trend = moving_average(data, kernel.len());
    let detrended: Vec<Complex<f64>> = data
        .iter()
        .zip(&trend)
        .map(|(&x, &m)| Complex::new(x - m, 0.0))
        .collect();
    let norm = kernel.norm_constant();
    convolve_same(&detrended, &kernel.conjugate(), plans)
        .into_iter()
        .map(|c| c / norm)
        .collect()
}

/// Centered moving average over `window` samples ("same" mode, zero extension).
///
/// Every output is divided by the full `window` length, including near the
/// edges where fewer than `window` samples exist.
pub(crate) fn moving_average(data: &[f64], window: usize) -> Vec<f64> {
    let n = data.len();
    let half = (window - 1) / 2;
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    let mut running = 0.0;
    for &x in data {
        running += x;
        prefix.push(running);
    }
    let w = window as f64;
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + window - 1 - half).min(n - 1);
            (prefix[hi + 1] - prefix[lo]) / w
        })
        .collect()
}

/// Forward and inverse FFT plans of one padded length.
#[derive(Clone)]
pub(crate) struct FftPlans {
    len: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl FftPlans {
    /// Plans transforms of length `len`.
    pub(crate) fn new(planner: &mut FftPlanner<f64>, len: usize) -> Self {
        Self {
            len,
            forward: planner.plan_fft_forward(len),
            inverse: planner.plan_fft_inverse(len),
        }
    }

    /// Plans the smallest power-of-two length holding the linear convolution
    /// of `n` signal samples with `m` kernel samples.
    pub(crate) fn for_lengths(planner: &mut FftPlanner<f64>, n: usize, m: usize) -> Self {
        Self::new(planner, (n + m - 1).next_power_of_two())
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

/// Linear convolution truncated to the central `signal.len()` samples.
///
/// Output sample `i` is centered on the kernel sample at `(m - 1) / 2`.
/// `plans` must be at least `signal.len() + kernel.len() - 1` long.
pub(crate) fn convolve_same(
    signal: &[Complex<f64>],
    kernel: &[Complex<f64>],
    plans: &FftPlans,
) -> Vec<Complex<f64>> {
    let n = signal.len();
    let m = kernel.len();
    let npad = plans.len();
    debug_assert!(npad >= n + m - 1, "FFT length {npad} too short for {n} + {m} - 1");
    let zero = Complex::new(0.0, 0.0);

    let mut a: Vec<Complex<f64>> = signal
        .iter()
        .copied()
        .chain(iter::repeat_n(zero, npad - n))
        .collect();
    let mut b: Vec<Complex<f64>> = kernel
        .iter()
        .copied()
        .chain(iter::repeat_n(zero, npad - m))
        .collect();

    plans.forward.process(&mut a);
    plans.forward.process(&mut b);
    for (x, y) in a.iter_mut().zip(&b) {
        *x *= *y;
    }
    plans.inverse.process(&mut a);

    // rustfft is unnormalized
    let scale = 1.0 / npad as f64;
    let offset = (m - 1) / 2;
    a[offset..offset + n].iter().map(|&c| c * scale).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn direct_convolve_same(signal: &[Complex<f64>], kernel: &[Complex<f64>]) -> Vec<Complex<f64>> {
        let n = signal.len() as i64;
        let m = kernel.len() as i64;
        let h = (m - 1) / 2;
        (0..n)
            .map(|i| {
                (0..m)
                    .filter_map(|j| {
                        let idx = i + h - j;
                        (0..n)
                            .contains(&idx)
                            .then(|| signal[idx as usize] * kernel[j as usize])
                    })
                    .sum()
            })
            .collect()
    }

    #[test]
    fn config_defaults_and_builder() {
        let config = CwtConfig::new(1e-3);
        assert_eq!(config.dt(), 1e-3);
        assert_eq!(config.w0(), 6.0);
        let config = config.with_w0(8.0);
        assert_eq!(config.w0(), 8.0);
    }

    #[test]
    fn moving_average_interior_and_edges() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        let avg = moving_average(&data, 3);
        // Edges divide by the full window: (0 + 1 + 2) / 3 and (4 + 5 + 0) / 3.
        let expected = [1.0, 2.0, 3.0, 4.0, 3.0];
        for (a, e) in avg.iter().zip(expected) {
            assert_relative_eq!(*a, e, epsilon = 1e-12);
        }
    }

    #[test]
    fn moving_average_window_longer_than_data() {
        let avg = moving_average(&[3.0, 3.0], 5);
        assert_relative_eq!(avg[0], 6.0 / 5.0, epsilon = 1e-12);
        assert_relative_eq!(avg[1], 6.0 / 5.0, epsilon = 1e-12);
    }

    #[test]
    fn convolve_same_matches_direct_sum() {
        let signal: Vec<Complex<f64>> = (0..37)
            .map(|i| Complex::new((i as f64 * 0.37).sin(), 0.0))
            .collect();
        let kernel: Vec<Complex<f64>> = (0..9)
            .map(|j| Complex::new(j as f64 - 4.0, (j as f64 * 0.5).cos()))
            .collect();
        let mut planner = FftPlanner::new();
        let plans = FftPlans::for_lengths(&mut planner, signal.len(), kernel.len());
        assert_eq!(plans.len(), 64);
        let fast = convolve_same(&signal, &kernel, &plans);
        let slow = direct_convolve_same(&signal, &kernel);
        assert_eq!(fast.len(), signal.len());
        for (f, s) in fast.iter().zip(&slow) {
            assert_relative_eq!(f.re, s.re, epsilon = 1e-10);
            assert_relative_eq!(f.im, s.im, epsilon = 1e-10);
        }
    }

    #[test]
    fn convolve_same_kernel_longer_than_signal() {
        let signal = vec![Complex::new(1.0, 0.0); 4];
        let kernel: Vec<Complex<f64>> = (0..11).map(|j| Complex::new(j as f64, 0.0)).collect();
        let plans = FftPlans::for_lengths(&mut FftPlanner::new(), signal.len(), kernel.len());
        let fast = convolve_same(&signal, &kernel, &plans);
        let slow = direct_convolve_same(&signal, &kernel);
        assert_eq!(fast.len(), 4);
        for (f, s) in fast.iter().zip(&slow) {
            assert_relative_eq!(f.re, s.re, epsilon = 1e-10);
        }
    }

    #[test]
    fn convolve_same_is_unchanged_by_longer_plans() {
        let signal: Vec<Complex<f64>> = (0..50)
            .map(|i| Complex::new((i as f64 * 0.21).cos(), (i as f64 * 0.05).sin()))
            .collect();
        let kernel: Vec<Complex<f64>> = (0..7).map(|j| Complex::new(1.0, j as f64)).collect();
        let mut planner = FftPlanner::new();
        let tight = convolve_same(&signal, &kernel, &FftPlans::new(&mut planner, 56));
        let wide = convolve_same(&signal, &kernel, &FftPlans::new(&mut planner, 256));
        for (t, w) in tight.iter().zip(&wide) {
            assert_relative_eq!(t.re, w.re, epsilon = 1e-10);
            assert_relative_eq!(t.im, w.im, epsilon = 1e-10);
        }
    }

    #[test]
    fn planner_shares_plans_of_equal_length() {
        let mut planner = FftPlanner::new();
        // 1000 + 25 - 1 and 1000 + 24 - 1 both pad to 1024.
        let a = FftPlans::for_lengths(&mut planner, 1000, 25);
        let b = FftPlans::for_lengths(&mut planner, 1000, 24);
        assert_eq!(a.len(), 1024);
        assert!(Arc::ptr_eq(&a.forward, &b.forward));
        assert!(Arc::ptr_eq(&a.inverse, &b.inverse));
    }

    #[test]
    fn empty_signal_rejected() {
        let freqs = FrequencySet::new(vec![10.0]).unwrap();
        let err = cwt(&[], &freqs, &CwtConfig::new(1e-3)).unwrap_err();
        assert_eq!(err, WaveletError::EmptySignal);
    }

    #[test]
    fn non_finite_rejected() {
        let freqs = FrequencySet::new(vec![10.0]).unwrap();
        let err = cwt(&[0.0, f64::NAN], &freqs, &CwtConfig::new(1e-3)).unwrap_err();
        assert_eq!(err, WaveletError::NonFiniteData);
    }

    #[test]
    fn invalid_dt_rejected() {
        let freqs = FrequencySet::new(vec![10.0]).unwrap();
        let err = cwt(&[0.0; 8], &freqs, &CwtConfig::new(-1.0)).unwrap_err();
        assert_eq!(err, WaveletError::InvalidSampling { dt: -1.0 });
    }

    #[test]
    fn invalid_w0_rejected() {
        let freqs = FrequencySet::new(vec![10.0]).unwrap();
        let config = CwtConfig::new(1e-3).with_w0(0.0);
        let err = cwt(&[0.0; 8], &freqs, &config).unwrap_err();
        assert_eq!(err, WaveletError::InvalidShape { w0: 0.0 });
    }

    #[test]
    fn output_dimensions() {
        let data: Vec<f64> = (0..300).map(|i| (i as f64 * 0.1).sin()).collect();
        let freqs = FrequencySet::linear(5.0, 40.0, 4).unwrap();
        let result = cwt(&data, &freqs, &CwtConfig::new(1e-2)).unwrap();
        assert_eq!(result.n_frequencies(), 4);
        assert_eq!(result.n_times(), 300);
        for row in result.coefficients() {
            assert_eq!(row.len(), 300);
        }
        assert_eq!(result.frequencies(), &freqs);
        assert_eq!(result.dt(), 1e-2);
        assert_eq!(result.w0(), 6.0);
        assert!(result.row(3).is_some());
        assert!(result.row(4).is_none());
    }

    #[test]
    fn mean_and_max_magnitude_reduce_rows() {
        let data: Vec<f64> = (0..200).map(|i| (i as f64 * 0.3).cos()).collect();
        let freqs = FrequencySet::new(vec![20.0, 40.0, 80.0]).unwrap();
        let result = cwt(&data, &freqs, &CwtConfig::new(1e-3)).unwrap();
        let mag = result.magnitude();
        let mean = result.mean_magnitude();
        let max = result.max_magnitude();
        for t in 0..200 {
            let column: Vec<f64> = mag.iter().map(|row| row[t]).collect();
            assert_relative_eq!(mean[t], column.iter().sum::<f64>() / 3.0, epsilon = 1e-12);
            assert_relative_eq!(max[t], column.iter().copied().fold(0.0, f64::max), epsilon = 1e-12);
        }
    }

    #[test]
    fn result_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<CwtMatrix>();
        assert_impl::<CwtConfig>();
    }
}
