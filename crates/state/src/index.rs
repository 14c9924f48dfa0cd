//! Rhythmicity features and the Network State Index formula.
//!
//! ```text
//! X   = p0 + alpha * max_low_freqs_power - sliding_mean
//! NSI = -2 * max_low_freqs_power * H(X) + H(-X) * (sliding_mean - p0)
//! ```
//!
//! A rhythmic envelope (strong low-frequency modulation, `X > 0`) gives a
//! negative index; an elevated but arrhythmic envelope gives a positive one.

use nsi_stats::gaussian_smooth;
use nsi_wavelet::{CwtConfig, FrequencySet, cwt};
use tracing::debug;

use crate::config::{IndexConfig, check_alpha, samples_for};
use crate::envelope::PowerEnvelope;
use crate::error::{NsiError, Stage};

/// Low-frequency features of a power envelope.
///
/// Both series are aligned sample-for-sample with the envelope they were
/// computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct RhythmicityFeatures {
    /// Gaussian sliding mean of the envelope.
    sliding_mean: Vec<f64>,
    /// Per-sample maximum CWT magnitude across the low band.
    max_low_freqs_power: Vec<f64>,
    /// Low-frequency band used.
    low_frequencies: FrequencySet,
}

impl RhythmicityFeatures {
    /// Wraps previously computed features, e.g. loaded from an earlier run.
    ///
    /// # Errors
    ///
    /// [`NsiError::InvariantViolation`] if the two series differ in length.
    pub fn new(
        sliding_mean: Vec<f64>,
        max_low_freqs_power: Vec<f64>,
        low_frequencies: FrequencySet,
    ) -> Result<Self, NsiError> {
        if sliding_mean.len() != max_low_freqs_power.len() {
            return Err(NsiError::InvariantViolation {
                stage: Stage::NetworkStateIndex,
                details: format!(
                    "sliding mean has {} samples, low-frequency power has {}",
                    sliding_mean.len(),
                    max_low_freqs_power.len()
                ),
            });
        }
        Ok(Self {
            sliding_mean,
            max_low_freqs_power,
            low_frequencies,
        })
    }

    /// Returns the sliding mean.
    pub fn sliding_mean(&self) -> &[f64] {
        &self.sliding_mean
    }

    /// Returns the per-sample maximum low-frequency magnitude.
    pub fn max_low_freqs_power(&self) -> &[f64] {
        &self.max_low_freqs_power
    }

    /// Returns the low-frequency band.
    pub fn low_frequencies(&self) -> &FrequencySet {
        &self.low_frequencies
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.sliding_mean.len()
    }

    /// Returns `true` if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.sliding_mean.is_empty()
    }
}

/// Computes the sliding mean and low-frequency power of `envelope`.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`NsiError::InvalidParameter`] | `t_sliding_mean` rounds to 0 envelope samples |
/// | [`NsiError::Wavelet`] | invalid low band or shape parameter |
#[tracing::instrument(skip_all, fields(n_envelope = envelope.len()))]
pub fn rhythmicity(
    envelope: &PowerEnvelope,
    config: &IndexConfig,
) -> Result<RhythmicityFeatures, NsiError> {
    let stage = Stage::NetworkStateIndex;
    let sigma = samples_for(
        stage,
        "t_sliding_mean",
        config.t_sliding_mean(),
        envelope.new_dt(),
    )?;
    let low_frequencies = config.low_frequencies()?;

    let sliding_mean = gaussian_smooth(envelope.plfp(), sigma);
    let cwt_config = CwtConfig::new(envelope.new_dt()).with_w0(config.w0());
    let max_low_freqs_power = cwt(envelope.plfp(), &low_frequencies, &cwt_config)
        .map_err(NsiError::wavelet(stage))?
        .max_magnitude();

    debug!(
        sliding_sigma = sigma,
        n_low_frequencies = low_frequencies.len(),
        "rhythmicity features computed"
    );

    RhythmicityFeatures::new(sliding_mean, max_low_freqs_power, low_frequencies)
}

/// Step function with a half-weight tie: 1 above zero, 0 below, 0.5 at zero.
pub fn heaviside(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        0.0
    } else {
        0.5
    }
}

/// Evaluates the index formula sample by sample.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`NsiError::EmptySignal`] | both series are empty |
/// | [`NsiError::InvariantViolation`] | the series differ in length |
/// | [`NsiError::InvalidParameter`] | `alpha` not finite or `< 0` |
pub fn network_state_index(
    sliding_mean: &[f64],
    max_low_freqs_power: &[f64],
    p0: f64,
    alpha: f64,
) -> Result<Vec<f64>, NsiError> {
    let stage = Stage::NetworkStateIndex;
    if sliding_mean.len() != max_low_freqs_power.len() {
        return Err(NsiError::InvariantViolation {
            stage,
            details: format!(
                "sliding mean has {} samples, low-frequency power has {}",
                sliding_mean.len(),
                max_low_freqs_power.len()
            ),
        });
    }
    if sliding_mean.is_empty() {
        return Err(NsiError::EmptySignal { stage });
    }
    check_alpha(alpha)?;

    Ok(sliding_mean
        .iter()
        .zip(max_low_freqs_power)
        .map(|(&mean, &power)| {
            let x = p0 + alpha * power - mean;
            -2.0 * power * heaviside(x) + heaviside(-x) * (mean - p0)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn heaviside_three_way() {
        assert_eq!(heaviside(3.0), 1.0);
        assert_eq!(heaviside(1e-300), 1.0);
        assert_eq!(heaviside(-2.0), 0.0);
        assert_eq!(heaviside(0.0), 0.5);
        assert_eq!(heaviside(-0.0), 0.5);
    }

    #[test]
    fn rhythmic_branch_is_negative() {
        // X = 0.1 + 2 * 1.0 - 0.5 > 0
        let nsi = network_state_index(&[0.5], &[1.0], 0.1, 2.0).unwrap();
        assert_relative_eq!(nsi[0], -2.0);
    }

    #[test]
    fn activated_branch_is_positive() {
        // X = 0.1 + 2 * 0.05 - 1.0 < 0
        let nsi = network_state_index(&[1.0], &[0.05], 0.1, 2.0).unwrap();
        assert_relative_eq!(nsi[0], 0.9);
    }

    #[test]
    fn tie_gives_half_weights() {
        // X = 0.25 + 1 * 0.25 - 0.5 = 0 exactly
        let nsi = network_state_index(&[0.5], &[0.25], 0.25, 1.0).unwrap();
        assert_relative_eq!(nsi[0], -0.25 + 0.5 * (0.5 - 0.25));
    }

    #[test]
    fn zero_alpha_reduces_to_mean_test() {
        let nsi = network_state_index(&[0.5, 0.05], &[0.4, 0.4], 0.1, 0.0).unwrap();
        assert_relative_eq!(nsi[0], 0.4);
        assert_relative_eq!(nsi[1], -0.8);
    }

    #[test]
    fn length_mismatch_is_invariant_violation() {
        let err = network_state_index(&[1.0, 2.0], &[1.0], 0.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            NsiError::InvariantViolation {
                stage: Stage::NetworkStateIndex,
                ..
            }
        ));
    }

    #[test]
    fn empty_series_is_rejected() {
        let err = network_state_index(&[], &[], 0.0, 1.0).unwrap_err();
        assert_eq!(
            err,
            NsiError::EmptySignal {
                stage: Stage::NetworkStateIndex
            }
        );
    }

    #[test]
    fn negative_alpha_is_rejected() {
        let err = network_state_index(&[1.0], &[1.0], 0.0, -1.0).unwrap_err();
        assert!(matches!(err, NsiError::InvalidParameter { name: "alpha", .. }));
    }

    #[test]
    fn features_constructor_checks_lengths() {
        let freqs = FrequencySet::new(vec![4.0]).unwrap();
        assert!(RhythmicityFeatures::new(vec![1.0; 3], vec![0.0; 3], freqs.clone()).is_ok());
        let err = RhythmicityFeatures::new(vec![1.0; 3], vec![0.0; 2], freqs).unwrap_err();
        assert!(matches!(err, NsiError::InvariantViolation { .. }));
    }
}
