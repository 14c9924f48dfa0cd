//! High-frequency power envelope ("pLFP") and its baseline level.

use nsi_stats::{block_mean, gaussian_smooth, percentile};
use nsi_wavelet::{CwtConfig, FrequencySet, Signal, cwt};
use tracing::debug;

use crate::config::{EnvelopeConfig, samples_for};
use crate::error::{NsiError, Stage};

/// Smoothed, subsampled gamma-band amplitude envelope.
///
/// Sample `k` sits at `k * new_dt`. The raw envelope at the source sampling
/// interval is kept alongside for inspection.
#[derive(Debug, Clone)]
pub struct PowerEnvelope {
    /// Smoothed envelope at `new_dt`.
    plfp: Vec<f64>,
    /// Coarse sampling interval, in seconds.
    new_dt: f64,
    /// Baseline level, the `percentile`-th quantile of `plfp`.
    p0: f64,
    /// Percentile used for `p0`, as a fraction.
    percentile: f64,
    /// Mean CWT magnitude across the gamma band at the source interval.
    raw_envelope: Vec<f64>,
    /// Sampling interval of the source signal.
    source_dt: f64,
    /// Number of source samples averaged per envelope sample.
    subsample_factor: usize,
    /// Gaussian smoothing width, in envelope samples.
    smoothing_sigma: usize,
    /// Gamma-band frequencies.
    frequencies: FrequencySet,
}

impl PowerEnvelope {
    /// Returns the smoothed envelope.
    pub fn plfp(&self) -> &[f64] {
        &self.plfp
    }

    /// Returns the envelope sampling interval.
    pub fn new_dt(&self) -> f64 {
        self.new_dt
    }

    /// Returns the time of every envelope sample, `k * new_dt`.
    pub fn times(&self) -> Vec<f64> {
        (0..self.plfp.len())
            .map(|k| k as f64 * self.new_dt)
            .collect()
    }

    /// Returns the baseline level `p0`.
    pub fn p0(&self) -> f64 {
        self.p0
    }

    /// Returns the percentile (fraction) that defines `p0`.
    pub fn percentile(&self) -> f64 {
        self.percentile
    }

    /// Returns the unsubsampled mean-magnitude envelope.
    pub fn raw_envelope(&self) -> &[f64] {
        &self.raw_envelope
    }

    /// Returns the source sampling interval.
    pub fn source_dt(&self) -> f64 {
        self.source_dt
    }

    /// Returns the number of source samples per envelope sample.
    pub fn subsample_factor(&self) -> usize {
        self.subsample_factor
    }

    /// Returns the smoothing width in envelope samples.
    pub fn smoothing_sigma(&self) -> usize {
        self.smoothing_sigma
    }

    /// Returns the gamma-band frequencies.
    pub fn frequencies(&self) -> &FrequencySet {
        &self.frequencies
    }

    /// Returns the number of envelope samples.
    pub fn len(&self) -> usize {
        self.plfp.len()
    }

    /// Returns `true` if the envelope has no samples (never for a built one).
    pub fn is_empty(&self) -> bool {
        self.plfp.is_empty()
    }
}

/// Builds the power envelope of `signal`.
///
/// 1. CWT over the gamma band, mean magnitude across frequencies.
/// 2. Average blocks of `round(new_dt / dt)` samples, dropping the remainder.
/// 3. Gaussian smoothing with `σ = round(smoothing / new_dt)` samples.
/// 4. `p0` = percentile of the smoothed envelope.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`NsiError::InvalidSampling`] | `new_dt` not finite or `<= 0` |
/// | [`NsiError::InvalidParameter`] | `new_dt` finer than the signal's `dt` |
/// | [`NsiError::InvalidParameter`] | smoothing rounds to 0 samples |
/// | [`NsiError::InvalidParameter`] | percentile outside `[0, 1]` |
/// | [`NsiError::InvalidParameter`] | signal shorter than one subsampling block |
/// | [`NsiError::Wavelet`] | the gamma-band transform rejects its input |
#[tracing::instrument(skip_all, fields(n_samples = signal.len(), dt = signal.dt()))]
pub fn build_power_envelope(
    signal: &Signal,
    config: &EnvelopeConfig,
) -> Result<PowerEnvelope, NsiError> {
    let stage = Stage::PowerEnvelope;
    config.validate()?;

    let dt = signal.dt();
    let new_dt = config.new_dt();
    if new_dt < dt {
        return Err(NsiError::InvalidParameter {
            stage,
            name: "new_dt",
            reason: format!("{new_dt} s is finer than the signal interval {dt} s"),
        });
    }
    let subsample_factor = (new_dt / dt).round() as usize;
    if signal.len() < subsample_factor {
        return Err(NsiError::InvalidParameter {
            stage,
            name: "new_dt",
            reason: format!(
                "signal has {} samples, fewer than one block of {subsample_factor}",
                signal.len()
            ),
        });
    }
    let smoothing_sigma = samples_for(stage, "smoothing", config.smoothing(), new_dt)?;

    let cwt_config = CwtConfig::new(dt).with_w0(config.w0());
    let matrix = cwt(signal.as_slice(), config.frequencies(), &cwt_config)
        .map_err(NsiError::wavelet(stage))?;
    let raw_envelope = matrix.mean_magnitude();

    let subsampled = block_mean(&raw_envelope, subsample_factor);
    let plfp = gaussian_smooth(&subsampled, smoothing_sigma);
    let p0 = percentile(&plfp, config.percentile_for_p0());

    debug!(
        subsample_factor,
        smoothing_sigma,
        n_envelope = plfp.len(),
        p0,
        "power envelope built"
    );

    Ok(PowerEnvelope {
        plfp,
        new_dt,
        p0,
        percentile: config.percentile_for_p0(),
        raw_envelope,
        source_dt: dt,
        subsample_factor,
        smoothing_sigma,
        frequencies: config.frequencies().clone(),
    })
}
