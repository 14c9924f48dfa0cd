//! Error types for the nsi-wavelet crate.

/// Error type for all fallible operations in the nsi-wavelet crate.
///
/// Every variant is an input-validation failure detected before any
/// computation starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WaveletError {
    /// Returned when the input signal has no samples.
    #[error("signal is empty")]
    EmptySignal,

    /// Returned when the input data contains non-finite values (NaN or infinity).
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Returned when the sampling interval is not strictly positive.
    #[error("invalid sampling interval {dt}: must be finite and > 0")]
    InvalidSampling {
        /// Sampling interval that was provided, in seconds.
        dt: f64,
    },

    /// Returned when a wavelet frequency is not strictly positive.
    #[error("invalid frequency {frequency} Hz: must be finite and > 0")]
    InvalidFrequency {
        /// Frequency that was provided.
        frequency: f64,
    },

    /// Returned when a band factor would invert or collapse a band.
    #[error("invalid band factor {band_factor}: must be finite and >= 1")]
    InvalidBandFactor {
        /// Band factor that was provided.
        band_factor: f64,
    },

    /// Returned when a frequency set has no frequencies.
    #[error("frequency set is empty")]
    EmptyFrequencySet,

    /// Returned when the Morlet shape parameter is below 1.
    #[error("invalid Morlet shape parameter w0 = {w0}: must be >= 1")]
    InvalidShape {
        /// Shape parameter that was provided.
        w0: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_empty_signal() {
        assert_eq!(WaveletError::EmptySignal.to_string(), "signal is empty");
    }

    #[test]
    fn error_non_finite_data() {
        let err = WaveletError::NonFiniteData;
        assert_eq!(err.to_string(), "input data contains non-finite values");
    }

    #[test]
    fn error_invalid_sampling() {
        let err = WaveletError::InvalidSampling { dt: -0.001 };
        assert_eq!(
            err.to_string(),
            "invalid sampling interval -0.001: must be finite and > 0"
        );
    }

    #[test]
    fn error_invalid_frequency() {
        let err = WaveletError::InvalidFrequency { frequency: 0.0 };
        assert_eq!(
            err.to_string(),
            "invalid frequency 0 Hz: must be finite and > 0"
        );
    }

    #[test]
    fn error_invalid_band_factor() {
        let err = WaveletError::InvalidBandFactor { band_factor: 0.5 };
        assert_eq!(
            err.to_string(),
            "invalid band factor 0.5: must be finite and >= 1"
        );
    }

    #[test]
    fn error_empty_frequency_set() {
        let err = WaveletError::EmptyFrequencySet;
        assert_eq!(err.to_string(), "frequency set is empty");
    }

    #[test]
    fn error_invalid_shape() {
        let err = WaveletError::InvalidShape { w0: 0.5 };
        assert_eq!(
            err.to_string(),
            "invalid Morlet shape parameter w0 = 0.5: must be >= 1"
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<WaveletError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<WaveletError>();
    }
}
