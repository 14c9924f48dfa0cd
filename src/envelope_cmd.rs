//! Envelope command: high-frequency power envelope of one channel.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use nsi_state::build_power_envelope;

use crate::cli::EnvelopeArgs;
use crate::{config, convert, input, report};

/// Build the power envelope and write it as JSON.
pub fn run(args: EnvelopeArgs) -> Result<()> {
    let _cmd = info_span!("envelope").entered();

    let file_config = config::load(args.input.config.as_deref())?;
    let envelope_config = convert::build_envelope_config(&file_config.envelope)?;

    let signal = input::read_signal(&args.input.input, args.input.channel, args.input.dt)?;

    let envelope =
        build_power_envelope(&signal, &envelope_config).context("power envelope failed")?;
    info!(
        n_envelope = envelope.len(),
        subsample_factor = envelope.subsample_factor(),
        p0 = envelope.p0(),
        "envelope built"
    );

    let out_path = args
        .output
        .unwrap_or_else(|| args.input.input.with_extension("envelope.json"));
    report::write_json(&out_path, &report::envelope_report(&envelope))?;

    Ok(())
}
