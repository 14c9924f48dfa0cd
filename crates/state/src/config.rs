//! Configuration for the envelope, index and validation stages.

use nsi_wavelet::{DEFAULT_W0, FrequencySet};

use crate::error::{NsiError, Stage};

/// Default coarse sampling interval of the power envelope, in seconds.
pub const DEFAULT_NEW_DT: f64 = 5e-3;
/// Default Gaussian smoothing width of the power envelope, in seconds.
pub const DEFAULT_SMOOTHING: f64 = 42e-3;
/// Default baseline percentile, as a fraction (1 %).
pub const DEFAULT_PERCENTILE_FOR_P0: f64 = 0.01;
/// Default weight of the rhythmic term.
pub const DEFAULT_ALPHA: f64 = 2.85;
/// Default sliding-mean width, in seconds.
pub const DEFAULT_T_SLIDING_MEAN: f64 = 0.5;
/// Default half-window of the stability test, in seconds.
pub const DEFAULT_T_STATE: f64 = 0.2;
/// Default number of low-frequency wavelets.
pub const DEFAULT_N_WAVELETS: usize = 20;

/// Default center of the low-frequency band, `√20 ≈ 4.47` Hz.
pub fn default_root_freq() -> f64 {
    20.0_f64.sqrt()
}

/// Default band factor, `√5 ≈ 2.24`, spanning 2–10 Hz around the root.
pub fn default_band_factor() -> f64 {
    5.0_f64.sqrt()
}

/// Tolerance used by the stability test.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ValidationTolerance {
    /// Use the envelope's baseline level `p0` as the tolerance.
    #[default]
    Baseline,
    /// Use a fixed tolerance in index units.
    Fixed(f64),
}

impl ValidationTolerance {
    /// Returns the tolerance value given the envelope baseline `p0`.
    pub fn resolve(&self, p0: f64) -> f64 {
        match self {
            ValidationTolerance::Baseline => p0,
            ValidationTolerance::Fixed(v) => *v,
        }
    }
}

/// Configuration of the power-envelope stage.
///
/// # Example
///
/// ```ignore
/// use nsi_state::EnvelopeConfig;
///
/// let config = EnvelopeConfig::new()
///     .with_new_dt(2.5e-3)
///     .with_smoothing(40e-3);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeConfig {
    /// Gamma-band frequencies averaged into the envelope.
    frequencies: FrequencySet,
    /// Coarse sampling interval of the envelope, in seconds.
    new_dt: f64,
    /// Gaussian smoothing width, in seconds.
    smoothing: f64,
    /// Baseline percentile as a fraction in `[0, 1]`.
    percentile_for_p0: f64,
    /// Morlet shape parameter.
    w0: f64,
}

impl EnvelopeConfig {
    /// Creates a configuration with the default parameters.
    ///
    /// Defaults: 5 frequencies evenly spaced over 50–300 Hz, `new_dt = 5 ms`,
    /// `smoothing = 42 ms`, `percentile_for_p0 = 0.01`, `w0 = 6`.
    pub fn new() -> Self {
        Self {
            frequencies: FrequencySet::gamma_band(),
            new_dt: DEFAULT_NEW_DT,
            smoothing: DEFAULT_SMOOTHING,
            percentile_for_p0: DEFAULT_PERCENTILE_FOR_P0,
            w0: DEFAULT_W0,
        }
    }

    /// Sets the gamma-band frequencies.
    pub fn with_frequencies(mut self, frequencies: FrequencySet) -> Self {
        self.frequencies = frequencies;
        self
    }

    /// Sets the coarse sampling interval.
    pub fn with_new_dt(mut self, new_dt: f64) -> Self {
        self.new_dt = new_dt;
        self
    }

    /// Sets the Gaussian smoothing width.
    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Sets the baseline percentile (a fraction, `0.01` is 1 %).
    pub fn with_percentile_for_p0(mut self, percentile: f64) -> Self {
        self.percentile_for_p0 = percentile;
        self
    }

    /// Sets the Morlet shape parameter.
    pub fn with_w0(mut self, w0: f64) -> Self {
        self.w0 = w0;
        self
    }

    /// Returns the gamma-band frequencies.
    pub fn frequencies(&self) -> &FrequencySet {
        &self.frequencies
    }

    /// Returns the coarse sampling interval.
    pub fn new_dt(&self) -> f64 {
        self.new_dt
    }

    /// Returns the Gaussian smoothing width.
    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    /// Returns the baseline percentile.
    pub fn percentile_for_p0(&self) -> f64 {
        self.percentile_for_p0
    }

    /// Returns the Morlet shape parameter.
    pub fn w0(&self) -> f64 {
        self.w0
    }

    /// Validates the parameters that do not depend on the input signal.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`NsiError::InvalidSampling`] | `new_dt` not finite or `<= 0` |
    /// | [`NsiError::InvalidParameter`] | `smoothing` not finite or `< 0`, or rounds to 0 samples |
    /// | [`NsiError::InvalidParameter`] | `percentile_for_p0` outside `[0, 1]` |
    pub fn validate(&self) -> Result<(), NsiError> {
        let stage = Stage::PowerEnvelope;
        if !self.new_dt.is_finite() || self.new_dt <= 0.0 {
            return Err(NsiError::InvalidSampling {
                stage,
                name: "new_dt",
                value: self.new_dt,
            });
        }
        samples_for(stage, "smoothing", self.smoothing, self.new_dt)?;
        if !(0.0..=1.0).contains(&self.percentile_for_p0) {
            return Err(NsiError::InvalidParameter {
                stage,
                name: "percentile_for_p0",
                reason: format!("{} is outside [0, 1]", self.percentile_for_p0),
            });
        }
        Ok(())
    }
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration of the index and validation stages.
///
/// The low-frequency band is `n_wavelets` geometrically spaced frequencies
/// between `root_freq / band_factor` and `root_freq * band_factor`.
///
/// # Example
///
/// ```ignore
/// use nsi_state::{IndexConfig, ValidationTolerance};
///
/// let config = IndexConfig::new()
///     .with_alpha(3.0)
///     .with_tolerance(ValidationTolerance::Fixed(0.25));
/// ```
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Center of the low-frequency band, in Hz.
    root_freq: f64,
    /// Multiplicative half-width of the low-frequency band.
    band_factor: f64,
    /// Number of low-frequency wavelets.
    n_wavelets: usize,
    /// Sliding-mean width, in seconds.
    t_sliding_mean: f64,
    /// Weight of the rhythmic term.
    alpha: f64,
    /// Half-window of the stability test, in seconds.
    t_state: f64,
    /// Tolerance of the stability test.
    tolerance: ValidationTolerance,
    /// Morlet shape parameter of the low-frequency transform.
    w0: f64,
}

impl IndexConfig {
    /// Creates a configuration with the default parameters.
    ///
    /// Defaults: `root_freq = √20`, `band_factor = √5`, `n_wavelets = 20`,
    /// `t_sliding_mean = 0.5 s`, `alpha = 2.85`, `t_state = 200 ms`,
    /// `tolerance = Baseline`, `w0 = 6`.
    pub fn new() -> Self {
        Self {
            root_freq: default_root_freq(),
            band_factor: default_band_factor(),
            n_wavelets: DEFAULT_N_WAVELETS,
            t_sliding_mean: DEFAULT_T_SLIDING_MEAN,
            alpha: DEFAULT_ALPHA,
            t_state: DEFAULT_T_STATE,
            tolerance: ValidationTolerance::Baseline,
            w0: DEFAULT_W0,
        }
    }

    /// Sets the center of the low-frequency band.
    pub fn with_root_freq(mut self, root_freq: f64) -> Self {
        self.root_freq = root_freq;
        self
    }

    /// Sets the band factor.
    pub fn with_band_factor(mut self, band_factor: f64) -> Self {
        self.band_factor = band_factor;
        self
    }

    /// Sets the number of low-frequency wavelets.
    pub fn with_n_wavelets(mut self, n_wavelets: usize) -> Self {
        self.n_wavelets = n_wavelets;
        self
    }

    /// Sets the sliding-mean width.
    pub fn with_t_sliding_mean(mut self, t_sliding_mean: f64) -> Self {
        self.t_sliding_mean = t_sliding_mean;
        self
    }

    /// Sets the weight of the rhythmic term.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the half-window of the stability test.
    pub fn with_t_state(mut self, t_state: f64) -> Self {
        self.t_state = t_state;
        self
    }

    /// Sets the tolerance of the stability test.
    pub fn with_tolerance(mut self, tolerance: ValidationTolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the Morlet shape parameter of the low-frequency transform.
    pub fn with_w0(mut self, w0: f64) -> Self {
        self.w0 = w0;
        self
    }

    /// Returns the center of the low-frequency band.
    pub fn root_freq(&self) -> f64 {
        self.root_freq
    }

    /// Returns the band factor.
    pub fn band_factor(&self) -> f64 {
        self.band_factor
    }

    /// Returns the number of low-frequency wavelets.
    pub fn n_wavelets(&self) -> usize {
        self.n_wavelets
    }

    /// Returns the sliding-mean width.
    pub fn t_sliding_mean(&self) -> f64 {
        self.t_sliding_mean
    }

    /// Returns the weight of the rhythmic term.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns the half-window of the stability test.
    pub fn t_state(&self) -> f64 {
        self.t_state
    }

    /// Returns the tolerance of the stability test.
    pub fn tolerance(&self) -> ValidationTolerance {
        self.tolerance
    }

    /// Returns the Morlet shape parameter of the low-frequency transform.
    pub fn w0(&self) -> f64 {
        self.w0
    }

    /// Builds the low-frequency band.
    ///
    /// # Errors
    ///
    /// [`NsiError::Wavelet`] if the band parameters do not describe a valid
    /// frequency set.
    pub fn low_frequencies(&self) -> Result<FrequencySet, NsiError> {
        FrequencySet::band(self.root_freq, self.band_factor, self.n_wavelets)
            .map_err(NsiError::wavelet(Stage::NetworkStateIndex))
    }

    /// Validates the parameters that do not depend on a sampling interval.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`NsiError::InvalidParameter`] | `alpha` not finite or `< 0` |
    /// | [`NsiError::InvalidParameter`] | `band_factor` not finite or `< 1` |
    /// | [`NsiError::InvalidParameter`] | fixed tolerance not finite or `< 0` |
    pub fn validate(&self) -> Result<(), NsiError> {
        check_alpha(self.alpha)?;
        if !self.band_factor.is_finite() || self.band_factor < 1.0 {
            return Err(NsiError::InvalidParameter {
                stage: Stage::NetworkStateIndex,
                name: "band_factor",
                reason: format!("{} must be finite and >= 1", self.band_factor),
            });
        }
        if let ValidationTolerance::Fixed(v) = self.tolerance {
            check_tolerance(v)?;
        }
        Ok(())
    }

    /// Validates the configuration against an envelope sampled every `new_dt`
    /// seconds.
    ///
    /// Runs [`validate`](Self::validate), then checks that both windows span
    /// at least one envelope sample and that the low-frequency band can be
    /// built.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`NsiError::InvalidParameter`] | any [`validate`](Self::validate) failure |
    /// | [`NsiError::InvalidParameter`] | `t_sliding_mean` rounds to 0 samples |
    /// | [`NsiError::InvalidParameter`] | `t_state` rounds to 0 samples |
    /// | [`NsiError::Wavelet`] | invalid low-frequency band |
    pub fn validate_for(&self, new_dt: f64) -> Result<(), NsiError> {
        self.validate()?;
        samples_for(
            Stage::NetworkStateIndex,
            "t_sliding_mean",
            self.t_sliding_mean,
            new_dt,
        )?;
        samples_for(Stage::StateValidation, "t_state", self.t_state, new_dt)?;
        self.low_frequencies()?;
        Ok(())
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration of the full pipeline.
#[derive(Debug, Clone, Default)]
pub struct NsiConfig {
    envelope: EnvelopeConfig,
    index: IndexConfig,
}

impl NsiConfig {
    /// Creates a pipeline configuration from its two stage configurations.
    pub fn new(envelope: EnvelopeConfig, index: IndexConfig) -> Self {
        Self { envelope, index }
    }

    /// Replaces the envelope configuration.
    pub fn with_envelope(mut self, envelope: EnvelopeConfig) -> Self {
        self.envelope = envelope;
        self
    }

    /// Replaces the index configuration.
    pub fn with_index(mut self, index: IndexConfig) -> Self {
        self.index = index;
        self
    }

    /// Returns the envelope configuration.
    pub fn envelope(&self) -> &EnvelopeConfig {
        &self.envelope
    }

    /// Returns the index configuration.
    pub fn index(&self) -> &IndexConfig {
        &self.index
    }

    /// Validates both stage configurations, the index windows against the
    /// envelope's `new_dt`.
    pub fn validate(&self) -> Result<(), NsiError> {
        self.envelope.validate()?;
        self.index.validate_for(self.envelope.new_dt)
    }
}

/// Converts a duration to a whole number of samples, rejecting zero.
pub(crate) fn samples_for(
    stage: Stage,
    name: &'static str,
    duration: f64,
    dt: f64,
) -> Result<usize, NsiError> {
    if !duration.is_finite() || duration < 0.0 {
        return Err(NsiError::InvalidParameter {
            stage,
            name,
            reason: format!("{duration} s must be finite and >= 0"),
        });
    }
    let samples = (duration / dt).round();
    if samples < 1.0 {
        return Err(NsiError::InvalidParameter {
            stage,
            name,
            reason: format!("{duration} s rounds to 0 samples at dt = {dt} s"),
        });
    }
    Ok(samples as usize)
}

pub(crate) fn check_alpha(alpha: f64) -> Result<(), NsiError> {
    if !alpha.is_finite() || alpha < 0.0 {
        return Err(NsiError::InvalidParameter {
            stage: Stage::NetworkStateIndex,
            name: "alpha",
            reason: format!("{alpha} must be finite and >= 0"),
        });
    }
    Ok(())
}

pub(crate) fn check_tolerance(tolerance: f64) -> Result<(), NsiError> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(NsiError::InvalidParameter {
            stage: Stage::StateValidation,
            name: "var_criteria",
            reason: format!("{tolerance} must be finite and >= 0"),
        });
    }
    Ok(())
}
