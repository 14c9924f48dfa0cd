use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use nsi_state::{
    DEFAULT_ALPHA, DEFAULT_N_WAVELETS, DEFAULT_NEW_DT, DEFAULT_PERCENTILE_FOR_P0,
    DEFAULT_SMOOTHING, DEFAULT_T_STATE, default_band_factor, default_root_freq,
};
use nsi_wavelet::DEFAULT_W0;

/// Top-level NSI configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct NsiToml {
    /// Power-envelope settings.
    #[serde(default)]
    pub envelope: EnvelopeToml,

    /// Index and validation settings.
    #[serde(default)]
    pub index: IndexToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvelopeToml {
    /// Explicit gamma-band frequencies (Hz); 5 points over 50–300 Hz if unset.
    #[serde(default)]
    pub freqs: Option<Vec<f64>>,
    #[serde(default = "default_new_dt")]
    pub new_dt: f64,
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,
    /// Fraction, `0.01` is the 1st percentile.
    #[serde(default = "default_percentile_for_p0")]
    pub percentile_for_p0: f64,
    #[serde(default = "default_w0")]
    pub w0: f64,
}

impl Default for EnvelopeToml {
    fn default() -> Self {
        Self {
            freqs: None,
            new_dt: default_new_dt(),
            smoothing: default_smoothing(),
            percentile_for_p0: default_percentile_for_p0(),
            w0: default_w0(),
        }
    }
}

fn default_new_dt() -> f64 {
    DEFAULT_NEW_DT
}
fn default_smoothing() -> f64 {
    DEFAULT_SMOOTHING
}
fn default_percentile_for_p0() -> f64 {
    DEFAULT_PERCENTILE_FOR_P0
}
fn default_w0() -> f64 {
    DEFAULT_W0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexToml {
    #[serde(default = "default_root_freq")]
    pub root_freq: f64,
    #[serde(default = "default_band_factor")]
    pub band_factor: f64,
    #[serde(default = "default_n_wavelets")]
    pub n_wavelets: usize,
    #[serde(default = "default_tstate")]
    pub tstate: f64,
    /// Sliding-mean width; `2 * tstate` when unset.
    #[serde(default)]
    pub t_sliding_mean: Option<f64>,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Fixed validation tolerance; the envelope baseline `p0` when unset.
    #[serde(default)]
    pub var_criteria: Option<f64>,
    #[serde(default = "default_w0")]
    pub w0: f64,
}

impl Default for IndexToml {
    fn default() -> Self {
        Self {
            root_freq: default_root_freq(),
            band_factor: default_band_factor(),
            n_wavelets: default_n_wavelets(),
            tstate: default_tstate(),
            t_sliding_mean: None,
            alpha: default_alpha(),
            var_criteria: None,
            w0: default_w0(),
        }
    }
}

fn default_n_wavelets() -> usize {
    DEFAULT_N_WAVELETS
}
fn default_tstate() -> f64 {
    DEFAULT_T_STATE
}
fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

/// Reads the TOML file at `path`, or returns the defaults when no path is given.
pub fn load(path: Option<&Path>) -> Result<NsiToml> {
    let Some(path) = path else {
        return Ok(NsiToml::default());
    };
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&toml_str).context("failed to parse TOML config")
}
