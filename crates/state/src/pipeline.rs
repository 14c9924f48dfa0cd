//! End-to-end records: envelope → index → validated states.

use nsi_wavelet::Signal;
use tracing::{debug, info};

use crate::config::{IndexConfig, NsiConfig};
use crate::envelope::{PowerEnvelope, build_power_envelope};
use crate::error::{NsiError, Stage};
use crate::index::{RhythmicityFeatures, network_state_index, rhythmicity};
use crate::validate::{StateValidation, validate_states};

/// Index series of one envelope, with the features and validation behind it.
#[derive(Debug, Clone)]
pub struct NetworkStateIndex {
    values: Vec<f64>,
    features: RhythmicityFeatures,
    validation: StateValidation,
    alpha: f64,
    new_dt: f64,
}

impl NetworkStateIndex {
    /// Returns the index, aligned with the envelope samples.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the rhythmicity features the index was computed from.
    pub fn features(&self) -> &RhythmicityFeatures {
        &self.features
    }

    /// Returns the stability test outcome.
    pub fn validation(&self) -> &StateValidation {
        &self.validation
    }

    /// Returns the rhythmic-term weight used.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns the time of every index sample.
    pub fn times(&self) -> Vec<f64> {
        (0..self.values.len())
            .map(|k| k as f64 * self.new_dt)
            .collect()
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the record, returning its features for a later
    /// [`recompute_nsi`].
    pub fn into_features(self) -> RhythmicityFeatures {
        self.features
    }
}

/// Result of a full run: the envelope and the validated index.
#[derive(Debug, Clone)]
pub struct NsiAnalysis {
    envelope: PowerEnvelope,
    index: NetworkStateIndex,
}

impl NsiAnalysis {
    /// Returns the power envelope.
    pub fn envelope(&self) -> &PowerEnvelope {
        &self.envelope
    }

    /// Returns the index record.
    pub fn index(&self) -> &NetworkStateIndex {
        &self.index
    }

    /// Splits the analysis into its two records.
    pub fn into_parts(self) -> (PowerEnvelope, NetworkStateIndex) {
        (self.envelope, self.index)
    }
}

/// Computes the rhythmicity features, the index and its validation.
///
/// # Errors
///
/// Any error of [`rhythmicity`], [`network_state_index`] or
/// [`validate_states`]; configuration errors from [`IndexConfig::validate_for`].
#[tracing::instrument(skip_all, fields(n_envelope = envelope.len(), alpha = config.alpha()))]
pub fn compute_nsi(
    envelope: &PowerEnvelope,
    config: &IndexConfig,
) -> Result<NetworkStateIndex, NsiError> {
    config.validate_for(envelope.new_dt())?;
    let features = rhythmicity(envelope, config)?;
    recompute_nsi(envelope, features, config)
}

/// Evaluates the index and its validation from already computed features.
///
/// Neither wavelet transform is run again, so `alpha`, `t_state` or the
/// tolerance can be changed cheaply.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`NsiError::InvariantViolation`] | `features` not aligned with `envelope` |
/// | [`NsiError::InvalidParameter`] | any [`IndexConfig::validate_for`] failure |
/// | [`NsiError::Wavelet`] | invalid low-frequency band |
pub fn recompute_nsi(
    envelope: &PowerEnvelope,
    features: RhythmicityFeatures,
    config: &IndexConfig,
) -> Result<NetworkStateIndex, NsiError> {
    config.validate_for(envelope.new_dt())?;
    if features.len() != envelope.len() {
        return Err(NsiError::InvariantViolation {
            stage: Stage::NetworkStateIndex,
            details: format!(
                "rhythmicity features have {} samples, envelope has {}",
                features.len(),
                envelope.len()
            ),
        });
    }

    let values = network_state_index(
        features.sliding_mean(),
        features.max_low_freqs_power(),
        envelope.p0(),
        config.alpha(),
    )?;
    let tolerance = config.tolerance().resolve(envelope.p0());
    let validation = validate_states(&values, envelope.new_dt(), config.t_state(), tolerance)?;

    debug!(
        n_positive = values.iter().filter(|&&v| v > 0.0).count(),
        n_validated = validation.n_validated(),
        "index computed"
    );

    Ok(NetworkStateIndex {
        values,
        features,
        validation,
        alpha: config.alpha(),
        new_dt: envelope.new_dt(),
    })
}

/// Runs the whole pipeline on `signal`.
///
/// # Errors
///
/// Any error of [`build_power_envelope`] or [`compute_nsi`].
#[tracing::instrument(skip_all, fields(n_samples = signal.len(), dt = signal.dt()))]
pub fn analyze(signal: &Signal, config: &NsiConfig) -> Result<NsiAnalysis, NsiError> {
    config.validate()?;
    let envelope = build_power_envelope(signal, config.envelope())?;
    let index = compute_nsi(&envelope, config.index())?;

    info!(
        n_envelope = envelope.len(),
        p0 = envelope.p0(),
        n_validated = index.validation().n_validated(),
        "analysis complete"
    );

    Ok(NsiAnalysis { envelope, index })
}
