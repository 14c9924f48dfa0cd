//! Error types for the nsi-state crate.

use std::fmt;

use nsi_wavelet::WaveletError;

/// Pipeline stage in which an error was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Wavelet envelope, subsampling, smoothing and baseline.
    PowerEnvelope,
    /// Sliding mean, low-frequency power and the index formula.
    NetworkStateIndex,
    /// Sliding-window stability test.
    StateValidation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::PowerEnvelope => "power envelope",
            Stage::NetworkStateIndex => "network state index",
            Stage::StateValidation => "state validation",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while computing the Network State Index.
///
/// Every variant records the [`Stage`] that rejected its input. Stages
/// validate before computing, so an error never comes with partial output.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NsiError {
    /// A wavelet transform rejected its input.
    #[error("{stage}: {source}")]
    Wavelet {
        stage: Stage,
        #[source]
        source: WaveletError,
    },

    /// A sampling interval is not finite or not strictly positive.
    #[error("{stage}: invalid sampling interval {name} = {value}: must be finite and > 0")]
    InvalidSampling {
        stage: Stage,
        name: &'static str,
        value: f64,
    },

    /// A parameter is outside its domain or rounds to a degenerate window.
    #[error("{stage}: invalid parameter {name}: {reason}")]
    InvalidParameter {
        stage: Stage,
        name: &'static str,
        reason: String,
    },

    /// Internal series lengths disagree; signals a composition bug.
    #[error("{stage}: invariant violated: {details}")]
    InvariantViolation { stage: Stage, details: String },

    /// The input series has no samples.
    #[error("{stage}: input series is empty")]
    EmptySignal { stage: Stage },
}

impl NsiError {
    /// Returns the stage that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            NsiError::Wavelet { stage, .. }
            | NsiError::InvalidSampling { stage, .. }
            | NsiError::InvalidParameter { stage, .. }
            | NsiError::InvariantViolation { stage, .. }
            | NsiError::EmptySignal { stage } => *stage,
        }
    }

    pub(crate) fn wavelet(stage: Stage) -> impl FnOnce(WaveletError) -> NsiError {
        move |source| NsiError::Wavelet { stage, source }
    }
}
