//! Sliding-window stability test of the index.
//!
//! Every `iTstate = round(t_state / new_dt)` samples, starting at `iTstate`
//! and stopping while a full window still fits, the sample `i` is validated
//! when every value in `nsi[i - iTstate .. i + iTstate)` lies within the
//! tolerance of `nsi[i]`. Tested samples that fail are flagged unvalidated;
//! samples that are never tested carry neither flag.

use tracing::{debug, warn};

use crate::config::{check_tolerance, samples_for};
use crate::error::{NsiError, Stage};

/// A validated sample: its time, position in the series and index value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedState {
    pub time: f64,
    pub index: usize,
    pub value: f64,
}

/// Outcome of the stability test.
#[derive(Debug, Clone, PartialEq)]
pub struct StateValidation {
    validated: Vec<bool>,
    unvalidated: Vec<bool>,
    states: Vec<ValidatedState>,
    window: usize,
    tolerance: f64,
}

impl StateValidation {
    /// Returns the mask of validated samples.
    pub fn validated_mask(&self) -> &[bool] {
        &self.validated
    }

    /// Returns the mask of tested samples that failed.
    pub fn unvalidated_mask(&self) -> &[bool] {
        &self.unvalidated
    }

    /// Returns the validated samples in time order.
    pub fn states(&self) -> &[ValidatedState] {
        &self.states
    }

    /// Returns the times of the validated samples.
    pub fn validated_times(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.time).collect()
    }

    /// Returns the positions of the validated samples.
    pub fn validated_indices(&self) -> Vec<usize> {
        self.states.iter().map(|s| s.index).collect()
    }

    /// Returns the index values of the validated samples.
    pub fn validated_values(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.value).collect()
    }

    /// Returns the number of validated samples.
    pub fn n_validated(&self) -> usize {
        self.states.len()
    }

    /// Returns the number of tested samples.
    pub fn n_tested(&self) -> usize {
        self.states.len() + self.unvalidated.iter().filter(|&&u| u).count()
    }

    /// Returns the half-window (and test stride) in samples.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Returns the tolerance the test was run with.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

/// Runs the stability test over `nsi`, sampled every `new_dt` seconds.
///
/// A half-window longer than the series simply tests nothing.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`NsiError::EmptySignal`] | `nsi` is empty |
/// | [`NsiError::InvalidSampling`] | `new_dt` not finite or `<= 0` |
/// | [`NsiError::InvalidParameter`] | `t_state` rounds to 0 samples |
/// | [`NsiError::InvalidParameter`] | `tolerance` not finite or `< 0` |
#[tracing::instrument(skip_all, fields(n = nsi.len(), t_state = t_state, tolerance = tolerance))]
pub fn validate_states(
    nsi: &[f64],
    new_dt: f64,
    t_state: f64,
    tolerance: f64,
) -> Result<StateValidation, NsiError> {
    let stage = Stage::StateValidation;
    if nsi.is_empty() {
        return Err(NsiError::EmptySignal { stage });
    }
    if !new_dt.is_finite() || new_dt <= 0.0 {
        return Err(NsiError::InvalidSampling {
            stage,
            name: "new_dt",
            value: new_dt,
        });
    }
    let window = samples_for(stage, "t_state", t_state, new_dt)?;
    check_tolerance(tolerance)?;

    let n = nsi.len();
    let mut validated = vec![false; n];
    let mut unvalidated = vec![false; n];
    let mut states = Vec::new();

    for i in (window..n).step_by(window).take_while(|&i| i + window < n) {
        let center = nsi[i];
        let stable = nsi[i - window..i + window]
            .iter()
            .all(|&v| (v - center).abs() <= tolerance);
        if stable {
            validated[i] = true;
            states.push(ValidatedState {
                time: i as f64 * new_dt,
                index: i,
                value: center,
            });
        } else {
            unvalidated[i] = true;
        }
    }

    let n_tested = states.len() + unvalidated.iter().filter(|&&u| u).count();
    debug!(window, n_tested, n_validated = states.len(), "states validated");
    if states.is_empty() {
        warn!(window, n_tested, tolerance, "no sample passed the stability test");
    }

    Ok(StateValidation {
        validated,
        unvalidated,
        states,
        window,
        tolerance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn constant_series_validates_every_tested_sample() {
        let nsi = vec![0.7; 25];
        // window = round(0.02 / 0.005) = 4 -> tested 4, 8, 12, 16, 20
        let v = validate_states(&nsi, 5e-3, 0.02, 0.0).unwrap();
        assert_eq!(v.window(), 4);
        assert_eq!(v.validated_indices(), vec![4, 8, 12, 16, 20]);
        assert_eq!(v.n_tested(), 5);
        assert!(v.unvalidated_mask().iter().all(|&u| !u));
        assert_relative_eq!(v.validated_times()[1], 0.04, epsilon = 1e-12);
        assert_eq!(v.validated_values(), vec![0.7; 5]);
    }

    #[test]
    fn last_multiple_is_not_tested() {
        // n = 24, window 4: multiples 0..=20, drop first and last -> 4..=16
        let v = validate_states(&[1.0; 24], 1.0, 4.0, 0.0).unwrap();
        assert_eq!(v.validated_indices(), vec![4, 8, 12, 16]);
        assert!(!v.validated_mask()[20]);
        assert!(!v.unvalidated_mask()[20]);
    }

    #[test]
    fn window_is_half_open() {
        // window 2; sample 6 sits at i + window for i = 4 and is excluded.
        let mut nsi = vec![0.0; 12];
        nsi[6] = 10.0;
        let v = validate_states(&nsi, 1.0, 2.0, 0.1).unwrap();
        assert!(v.validated_mask()[4]);
        assert!(v.unvalidated_mask()[6]);
        assert!(v.unvalidated_mask()[8]);
    }

    #[test]
    fn masks_are_disjoint_and_untested_samples_carry_neither_flag() {
        let nsi: Vec<f64> = (0..40).map(|i| if i < 20 { 0.0 } else { 1.0 }).collect();
        let v = validate_states(&nsi, 1.0, 5.0, 0.5).unwrap();
        for i in 0..nsi.len() {
            assert!(!(v.validated_mask()[i] && v.unvalidated_mask()[i]));
            if i % 5 != 0 || i == 0 || i >= 35 {
                assert!(!v.validated_mask()[i] && !v.unvalidated_mask()[i]);
            }
        }
        // Only the window around the step at 20 mixes both levels.
        assert_eq!(v.validated_indices(), vec![5, 10, 15, 25, 30]);
        assert!(v.unvalidated_mask()[20]);
        assert_eq!(v.n_tested(), 6);
    }

    #[test]
    fn window_longer_than_half_series_tests_nothing() {
        let v = validate_states(&[0.0; 10], 1.0, 6.0, 1.0).unwrap();
        assert_eq!(v.n_tested(), 0);
        assert_eq!(v.n_validated(), 0);
        assert!(v.states().is_empty());
    }

    #[test]
    fn validation_is_idempotent() {
        let nsi: Vec<f64> = (0..200).map(|i| (i as f64 * 0.05).sin()).collect();
        let a = validate_states(&nsi, 1e-2, 0.1, 0.3).unwrap();
        let b = validate_states(&nsi, 1e-2, 0.1, 0.3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_degenerate_inputs() {
        assert_eq!(
            validate_states(&[], 1.0, 1.0, 1.0).unwrap_err(),
            NsiError::EmptySignal {
                stage: Stage::StateValidation
            }
        );
        assert!(matches!(
            validate_states(&[0.0; 4], 0.0, 1.0, 1.0).unwrap_err(),
            NsiError::InvalidSampling { .. }
        ));
        assert!(matches!(
            validate_states(&[0.0; 4], 1.0, 0.2, 1.0).unwrap_err(),
            NsiError::InvalidParameter { name: "t_state", .. }
        ));
        assert!(matches!(
            validate_states(&[0.0; 4], 1.0, 1.0, -1.0).unwrap_err(),
            NsiError::InvalidParameter {
                name: "var_criteria",
                ..
            }
        ));
    }
}
