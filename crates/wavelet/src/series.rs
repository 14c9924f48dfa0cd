//! Validated, uniformly sampled signal.

use crate::error::WaveletError;

/// A uniformly sampled signal of finite `f64` values.
///
/// Wraps the samples together with their sampling interval and guarantees:
/// - at least one sample
/// - all values are finite (no NaN or infinity)
/// - `dt` is finite and strictly positive
///
/// # Example
///
/// ```ignore
/// use nsi_wavelet::Signal;
///
/// let signal = Signal::new(vec![0.0, 1.0, 0.0, -1.0], 1e-3)?;
/// assert_eq!(signal.len(), 4);
/// assert_eq!(signal.duration(), 4e-3);
/// ```
#[derive(Clone, Debug)]
pub struct Signal {
    samples: Vec<f64>,
    dt: f64,
}

impl Signal {
    /// Creates a new `Signal` after validating the samples and interval.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`WaveletError::InvalidSampling`] | `dt` is not finite or `dt <= 0` |
    /// | [`WaveletError::EmptySignal`] | `samples` is empty |
    /// | [`WaveletError::NonFiniteData`] | any sample is NaN or infinite |
    pub fn new(samples: Vec<f64>, dt: f64) -> Result<Self, WaveletError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(WaveletError::InvalidSampling { dt });
        }
        if samples.is_empty() {
            return Err(WaveletError::EmptySignal);
        }
        if !samples.iter().all(|v| v.is_finite()) {
            return Err(WaveletError::NonFiniteData);
        }
        Ok(Self { samples, dt })
    }

    /// Returns the samples as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    /// Returns the sampling interval in seconds.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if the signal is empty.
    ///
    /// Note: a valid `Signal` is never empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the covered duration, `len * dt`, in seconds.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 * self.dt
    }

    /// Returns the time of every sample, `k * dt`.
    pub fn times(&self) -> Vec<f64> {
        (0..self.samples.len())
            .map(|k| k as f64 * self.dt)
            .collect()
    }

    /// Consumes `self` and returns the owned samples.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

impl AsRef<[f64]> for Signal {
    fn as_ref(&self) -> &[f64] {
        &self.samples
    }
}
