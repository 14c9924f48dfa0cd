//! JSON reports written by the subcommands.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use nsi_state::{IndexConfig, NsiAnalysis, PowerEnvelope, ValidationTolerance};

#[derive(Debug, Serialize)]
pub struct EnvelopeReport {
    pub dt: f64,
    pub new_dt: f64,
    pub subsample_factor: usize,
    pub smoothing_sigma: usize,
    pub percentile_for_p0: f64,
    pub p0: f64,
    pub gamma_freqs: Vec<f64>,
    pub time: Vec<f64>,
    pub plfp: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct IndexParameters {
    pub alpha: f64,
    pub tstate: f64,
    pub t_sliding_mean: f64,
    pub root_freq: f64,
    pub band_factor: f64,
    pub n_wavelets: usize,
    /// `"p0"` or `"fixed"`.
    pub tolerance_source: &'static str,
    pub var_criteria: f64,
    pub low_freqs: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct ValidatedRow {
    pub time: f64,
    pub index: usize,
    pub nsi: f64,
}

#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub envelope: EnvelopeReport,
    pub index: IndexParameters,
    pub n_tested: usize,
    pub validated: Vec<ValidatedRow>,
    pub nsi: Vec<f64>,
    pub sliding_mean: Vec<f64>,
    pub max_low_freqs_power: Vec<f64>,
    pub validated_mask: Vec<bool>,
    pub unvalidated_mask: Vec<bool>,
}

/// Builds the envelope section of a report.
pub fn envelope_report(envelope: &PowerEnvelope) -> EnvelopeReport {
    EnvelopeReport {
        dt: envelope.source_dt(),
        new_dt: envelope.new_dt(),
        subsample_factor: envelope.subsample_factor(),
        smoothing_sigma: envelope.smoothing_sigma(),
        percentile_for_p0: envelope.percentile(),
        p0: envelope.p0(),
        gamma_freqs: envelope.frequencies().as_slice().to_vec(),
        time: envelope.times(),
        plfp: envelope.plfp().to_vec(),
    }
}

/// Builds the full report of an analysis run with `config`.
pub fn analysis_report(analysis: &NsiAnalysis, config: &IndexConfig) -> AnalysisReport {
    let index = analysis.index();
    let features = index.features();
    let validation = index.validation();
    let tolerance_source = match config.tolerance() {
        ValidationTolerance::Baseline => "p0",
        ValidationTolerance::Fixed(_) => "fixed",
    };

    AnalysisReport {
        envelope: envelope_report(analysis.envelope()),
        index: IndexParameters {
            alpha: index.alpha(),
            tstate: config.t_state(),
            t_sliding_mean: config.t_sliding_mean(),
            root_freq: config.root_freq(),
            band_factor: config.band_factor(),
            n_wavelets: config.n_wavelets(),
            tolerance_source,
            var_criteria: validation.tolerance(),
            low_freqs: features.low_frequencies().as_slice().to_vec(),
        },
        n_tested: validation.n_tested(),
        validated: validation
            .states()
            .iter()
            .map(|s| ValidatedRow {
                time: s.time,
                index: s.index,
                nsi: s.value,
            })
            .collect(),
        nsi: index.values().to_vec(),
        sliding_mean: features.sliding_mean().to_vec(),
        max_low_freqs_power: features.max_low_freqs_power().to_vec(),
        validated_mask: validation.validated_mask().to_vec(),
        unvalidated_mask: validation.unvalidated_mask().to_vec(),
    }
}

/// Serializes `report` as pretty JSON to `path`.
pub fn write_json<T: Serialize>(path: &Path, report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write report: {}", path.display()))?;
    info!(path = %path.display(), "report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsi_state::{NsiConfig, analyze};
    use nsi_wavelet::Signal;

    fn analysis(config: &NsiConfig) -> NsiAnalysis {
        let samples = (0..3000)
            .map(|i| (i as f64 * 0.02).sin() * (i as f64 * 0.5).sin())
            .collect();
        let signal = Signal::new(samples, 1e-3).unwrap();
        analyze(&signal, config).unwrap()
    }

    #[test]
    fn report_series_are_aligned() {
        let config = NsiConfig::default();
        let a = analysis(&config);
        let report = analysis_report(&a, config.index());
        let n = report.envelope.plfp.len();
        assert_eq!(n, 600);
        assert_eq!(report.envelope.time.len(), n);
        assert_eq!(report.nsi.len(), n);
        assert_eq!(report.sliding_mean.len(), n);
        assert_eq!(report.validated_mask.len(), n);
        assert_eq!(report.index.tolerance_source, "p0");
        assert_eq!(report.index.var_criteria, report.envelope.p0);
        assert_eq!(report.index.low_freqs.len(), 20);
    }

    #[test]
    fn report_serializes_validated_rows() {
        let config = NsiConfig::default().with_index(
            IndexConfig::new().with_tolerance(ValidationTolerance::Fixed(1e9)),
        );
        let a = analysis(&config);
        let report = analysis_report(&a, config.index());
        assert_eq!(report.validated.len(), report.n_tested);
        assert_eq!(report.index.tolerance_source, "fixed");

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&report).unwrap()).unwrap();
        let rows = json["validated"].as_array().unwrap();
        assert_eq!(rows.len(), report.validated.len());
        assert!(rows[0]["time"].is_number());
        assert!(rows[0]["nsi"].is_number());
        assert!(json["envelope"]["p0"].is_number());
    }
}
