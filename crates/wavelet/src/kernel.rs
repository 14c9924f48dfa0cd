//! Discretized complex Morlet kernels and their amplitude normalization.

use num_complex::Complex;
use std::f64::consts::PI;

use crate::error::WaveletError;

/// Default Morlet shape parameter.
pub const DEFAULT_W0: f64 = 6.0;

/// A complex Morlet kernel sampled on a symmetric grid.
///
/// `ψ(t) = exp(i·2πft) · exp(-0.5·(2πft / w0)²)` evaluated at `t = k·dt` for
/// `k` in `-half_width..=half_width`, with
/// `half_width = round(morlet_decay(f, w0) / dt)`. The length is therefore
/// always odd and the center sample sits at `t = 0`.
#[derive(Clone, Debug)]
pub struct MorletKernel {
    frequency: f64,
    dt: f64,
    w0: f64,
    half_width: usize,
    coefficients: Vec<Complex<f64>>,
}

impl MorletKernel {
    /// Builds the kernel for `frequency` (Hz) at sampling interval `dt` (s).
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`WaveletError::InvalidFrequency`] | `frequency` not finite or `<= 0` |
    /// | [`WaveletError::InvalidSampling`] | `dt` not finite or `<= 0` |
    /// | [`WaveletError::InvalidShape`] | `w0` not finite or `< 1` |
    pub fn new(frequency: f64, dt: f64, w0: f64) -> Result<Self, WaveletError> {
        validate(frequency, dt, w0)?;

        let half_width = (morlet_decay(frequency, w0) / dt).round() as usize;
        let coefficients = (-(half_width as i64)..=half_width as i64)
            .map(|k| morlet(k as f64 * dt, frequency, w0))
            .collect();

        Ok(Self {
            frequency,
            dt,
            w0,
            half_width,
            coefficients,
        })
    }

    /// Returns the kernel samples, from `t = -half_width·dt` to `+half_width·dt`.
    pub fn coefficients(&self) -> &[Complex<f64>] {
        &self.coefficients
    }

    /// Returns the complex-conjugated kernel samples used for analysis.
    pub fn conjugate(&self) -> Vec<Complex<f64>> {
        self.coefficients.iter().map(|c| c.conj()).collect()
    }

    /// Returns the sample time of every coefficient.
    pub fn times(&self) -> Vec<f64> {
        let h = self.half_width as i64;
        (-h..=h).map(|k| k as f64 * self.dt).collect()
    }

    /// Returns the number of samples on each side of the center.
    pub fn half_width(&self) -> usize {
        self.half_width
    }

    /// Returns the kernel length, `2 * half_width + 1`.
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// Returns `true` if the kernel has no samples (never for a built kernel).
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Returns the center frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Returns the sampling interval in seconds.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the shape parameter.
    pub fn w0(&self) -> f64 {
        self.w0
    }

    /// Returns the amplitude normalization for this kernel.
    ///
    /// See [`norm_constant`].
    pub fn norm_constant(&self) -> f64 {
        norm_constant(self.frequency, self.dt, self.w0)
    }
}

/// Evaluates the (unnormalized) complex Morlet wavelet at time `t`.
pub fn morlet(t: f64, frequency: f64, w0: f64) -> Complex<f64> {
    let x = 2.0 * PI * frequency * t;
    Complex::from_polar((-0.5 * (x / w0).powi(2)).exp(), x)
}

/// Support half-width in seconds, `Tmax = √2·w0 / (π·f)`.
pub fn morlet_decay(frequency: f64, w0: f64) -> f64 {
    std::f64::consts::SQRT_2 * w0 / (PI * frequency)
}

/// Closed-form normalization of a discrete Morlet convolution.
///
/// `(w0 / (2·√(2π)·f)) · (1 + exp(-w0²/2)) / dt`. Dividing a convolution with
/// the conjugated kernel by this constant maps a unit-amplitude sinusoid at
/// `f` to a unit-magnitude response.
pub fn norm_constant(frequency: f64, dt: f64, w0: f64) -> f64 {
    let n = (w0 / (2.0 * (2.0 * PI).sqrt() * frequency)) * (1.0 + (-w0 * w0 / 2.0).exp());
    n / dt
}

fn validate(frequency: f64, dt: f64, w0: f64) -> Result<(), WaveletError> {
    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(WaveletError::InvalidFrequency { frequency });
    }
    if !dt.is_finite() || dt <= 0.0 {
        return Err(WaveletError::InvalidSampling { dt });
    }
    if !w0.is_finite() || w0 < 1.0 {
        return Err(WaveletError::InvalidShape { w0 });
    }
    Ok(())
}
