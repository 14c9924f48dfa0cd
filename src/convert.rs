//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result};

use nsi_state::{EnvelopeConfig, IndexConfig, NsiConfig, ValidationTolerance};
use nsi_wavelet::FrequencySet;

use crate::config::{EnvelopeToml, IndexToml, NsiToml};

/// Builds an [`EnvelopeConfig`] from the TOML envelope configuration.
pub fn build_envelope_config(envelope: &EnvelopeToml) -> Result<EnvelopeConfig> {
    let mut cfg = EnvelopeConfig::new()
        .with_new_dt(envelope.new_dt)
        .with_smoothing(envelope.smoothing)
        .with_percentile_for_p0(envelope.percentile_for_p0)
        .with_w0(envelope.w0);
    if let Some(ref freqs) = envelope.freqs {
        let set = FrequencySet::new(freqs.clone()).context("invalid [envelope].freqs")?;
        cfg = cfg.with_frequencies(set);
    }
    Ok(cfg)
}

/// Builds an [`IndexConfig`] from the TOML index configuration.
///
/// An unset `t_sliding_mean` becomes `2 * tstate`; an unset `var_criteria`
/// keeps the baseline tolerance.
pub fn build_index_config(index: &IndexToml) -> IndexConfig {
    let tolerance = match index.var_criteria {
        Some(v) => ValidationTolerance::Fixed(v),
        None => ValidationTolerance::Baseline,
    };
    IndexConfig::new()
        .with_root_freq(index.root_freq)
        .with_band_factor(index.band_factor)
        .with_n_wavelets(index.n_wavelets)
        .with_t_state(index.tstate)
        .with_t_sliding_mean(index.t_sliding_mean.unwrap_or(2.0 * index.tstate))
        .with_alpha(index.alpha)
        .with_tolerance(tolerance)
        .with_w0(index.w0)
}

/// Builds the full pipeline configuration.
pub fn build_nsi_config(config: &NsiToml) -> Result<NsiConfig> {
    Ok(NsiConfig::new(
        build_envelope_config(&config.envelope)?,
        build_index_config(&config.index),
    ))
}
