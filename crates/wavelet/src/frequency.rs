//! Frequency sets defining a bank of wavelets.

use crate::error::WaveletError;

/// An ordered, non-empty set of strictly positive frequencies (Hz).
///
/// Each frequency selects one Morlet kernel in a [`cwt`](crate::cwt) call;
/// row `i` of the resulting matrix belongs to `frequencies()[i]`.
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencySet {
    frequencies: Vec<f64>,
}

impl FrequencySet {
    /// Creates a set from explicit frequencies, keeping their order.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`WaveletError::EmptyFrequencySet`] | `frequencies` is empty |
    /// | [`WaveletError::InvalidFrequency`] | any frequency is not finite or `<= 0` |
    pub fn new(frequencies: Vec<f64>) -> Result<Self, WaveletError> {
        if frequencies.is_empty() {
            return Err(WaveletError::EmptyFrequencySet);
        }
        if let Some(&frequency) = frequencies.iter().find(|f| !f.is_finite() || **f <= 0.0) {
            return Err(WaveletError::InvalidFrequency { frequency });
        }
        Ok(Self { frequencies })
    }

    /// `n` evenly spaced frequencies from `low` to `high` inclusive.
    ///
    /// With `n == 1` the set holds `low` only.
    pub fn linear(low: f64, high: f64, n: usize) -> Result<Self, WaveletError> {
        let frequencies = match n {
            0 => Vec::new(),
            1 => vec![low],
            _ => {
                let step = (high - low) / (n - 1) as f64;
                (0..n).map(|i| low + step * i as f64).collect()
            }
        };
        Self::new(frequencies)
    }

    /// `n` geometrically spaced frequencies from `low` to `high` inclusive.
    pub fn geometric(low: f64, high: f64, n: usize) -> Result<Self, WaveletError> {
        for frequency in [low, high] {
            if !frequency.is_finite() || frequency <= 0.0 {
                return Err(WaveletError::InvalidFrequency { frequency });
            }
        }
        let frequencies = match n {
            0 => Vec::new(),
            1 => vec![low],
            _ => {
                let ratio = (high / low).ln() / (n - 1) as f64;
                (0..n).map(|i| low * (ratio * i as f64).exp()).collect()
            }
        };
        Self::new(frequencies)
    }

    /// `n` geometrically spaced frequencies spanning
    /// `root / band_factor ..= root * band_factor`.
    ///
    /// `band_factor` must be at least 1 so that the band is not inverted.
    pub fn band(root: f64, band_factor: f64, n: usize) -> Result<Self, WaveletError> {
        if !band_factor.is_finite() || band_factor < 1.0 {
            return Err(WaveletError::InvalidBandFactor { band_factor });
        }
        Self::geometric(root / band_factor, root * band_factor, n)
    }

    /// Default high-frequency ("gamma") set: 5 points evenly spaced in 50–300 Hz.
    pub fn gamma_band() -> Self {
        Self {
            frequencies: vec![50.0, 112.5, 175.0, 237.5, 300.0],
        }
    }

    /// Returns the frequencies as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.frequencies
    }

    /// Returns the number of frequencies.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Returns `true` if the set is empty (never for a constructed set).
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Returns the lowest frequency.
    pub fn min(&self) -> f64 {
        self.frequencies.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Returns the highest frequency.
    pub fn max(&self) -> f64 {
        self.frequencies
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

impl AsRef<[f64]> for FrequencySet {
    fn as_ref(&self) -> &[f64] {
        &self.frequencies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_keeps_order() {
        let set = FrequencySet::new(vec![10.0, 2.0, 5.0]).unwrap();
        assert_eq!(set.as_slice(), &[10.0, 2.0, 5.0]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.min(), 2.0);
        assert_eq!(set.max(), 10.0);
    }

    #[test]
    fn new_empty_rejected() {
        assert_eq!(
            FrequencySet::new(vec![]).unwrap_err(),
            WaveletError::EmptyFrequencySet
        );
    }

    #[test]
    fn new_non_positive_rejected() {
        let err = FrequencySet::new(vec![4.0, -1.0]).unwrap_err();
        assert_eq!(err, WaveletError::InvalidFrequency { frequency: -1.0 });
        let err = FrequencySet::new(vec![0.0]).unwrap_err();
        assert_eq!(err, WaveletError::InvalidFrequency { frequency: 0.0 });
    }

    #[test]
    fn linear_matches_gamma_default() {
        let set = FrequencySet::linear(50.0, 300.0, 5).unwrap();
        let gamma = FrequencySet::gamma_band();
        for (a, b) in set.as_slice().iter().zip(gamma.as_slice()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn linear_single_point() {
        let set = FrequencySet::linear(8.0, 20.0, 1).unwrap();
        assert_eq!(set.as_slice(), &[8.0]);
    }

    #[test]
    fn linear_zero_points_rejected() {
        assert_eq!(
            FrequencySet::linear(1.0, 2.0, 0).unwrap_err(),
            WaveletError::EmptyFrequencySet
        );
    }

    #[test]
    fn geometric_endpoints_and_ratio() {
        let set = FrequencySet::geometric(2.0, 10.0, 20).unwrap();
        let f = set.as_slice();
        assert_eq!(f.len(), 20);
        assert_relative_eq!(f[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(f[19], 10.0, epsilon = 1e-12);
        let r = f[1] / f[0];
        for w in f.windows(2) {
            assert_relative_eq!(w[1] / w[0], r, epsilon = 1e-12);
        }
    }

    #[test]
    fn band_is_centered_on_root() {
        let set = FrequencySet::band(4.0, 2.0, 3).unwrap();
        let f = set.as_slice();
        assert_relative_eq!(f[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(f[1], 4.0, epsilon = 1e-12);
        assert_relative_eq!(f[2], 8.0, epsilon = 1e-12);
    }

    #[test]
    fn band_rejects_inverted_factor() {
        let err = FrequencySet::band(4.0, 0.5, 3).unwrap_err();
        assert_eq!(err, WaveletError::InvalidBandFactor { band_factor: 0.5 });
        assert!(matches!(
            FrequencySet::band(4.0, f64::NAN, 3),
            Err(WaveletError::InvalidBandFactor { .. })
        ));
    }

    #[test]
    fn band_rejects_non_positive_root() {
        let err = FrequencySet::band(0.0, 2.0, 3).unwrap_err();
        assert!(matches!(err, WaveletError::InvalidFrequency { .. }));
    }
}
