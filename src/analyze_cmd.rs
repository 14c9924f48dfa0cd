//! Analyze command: envelope, index and validated states of one channel.

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use nsi_state::analyze;

use crate::cli::AnalyzeArgs;
use crate::{config, convert, input, report};

/// Run the full pipeline and write the JSON report.
pub fn run(args: AnalyzeArgs) -> Result<()> {
    let _cmd = info_span!("analyze").entered();

    // 1. Load TOML and apply CLI overrides
    let mut file_config = config::load(args.input.config.as_deref())?;
    if let Some(alpha) = args.alpha {
        file_config.index.alpha = alpha;
    }
    if let Some(tstate) = args.tstate {
        file_config.index.tstate = tstate;
    }
    let nsi_config = convert::build_nsi_config(&file_config)?;

    // 2. Read the recording
    let signal = input::read_signal(&args.input.input, args.input.channel, args.input.dt)?;

    // 3. Run the pipeline
    let analysis = analyze(&signal, &nsi_config).context("NSI analysis failed")?;
    let validation = analysis.index().validation();
    info!(
        n_envelope = analysis.envelope().len(),
        p0 = analysis.envelope().p0(),
        n_tested = validation.n_tested(),
        n_validated = validation.n_validated(),
        "analysis finished"
    );
    if validation.n_tested() == 0 {
        warn!(
            tstate = nsi_config.index().t_state(),
            "recording too short for the validation window"
        );
    }

    // 4. Write the report
    let out_path = args
        .output
        .unwrap_or_else(|| args.input.input.with_extension("nsi.json"));
    let report = report::analysis_report(&analysis, nsi_config.index());
    report::write_json(&out_path, &report)?;

    Ok(())
}
