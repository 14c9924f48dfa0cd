//! Plain-text recordings: one time sample per line, one column per channel.
//!
//! Columns are separated by whitespace or commas. Blank lines and everything
//! after a `#` are ignored.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use nsi_wavelet::Signal;

/// Extracts column `channel` from the text of a recording.
pub fn parse_samples(text: &str, channel: usize) -> Result<Vec<f64>> {
    let mut samples = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let content = line.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        let field = content
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .nth(channel)
            .with_context(|| format!("line {}: no column {channel}", lineno + 1))?;
        let value: f64 = field
            .parse()
            .with_context(|| format!("line {}: invalid number {field:?}", lineno + 1))?;
        samples.push(value);
    }
    if samples.is_empty() {
        bail!("recording contains no samples");
    }
    Ok(samples)
}

/// Reads one channel of the recording at `path`, sampled every `dt` seconds.
pub fn read_signal(path: &Path, channel: usize, dt: f64) -> Result<Signal> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read recording: {}", path.display()))?;
    let samples = parse_samples(&text, channel)
        .with_context(|| format!("failed to parse recording: {}", path.display()))?;
    let signal = Signal::new(samples, dt).context("invalid recording")?;
    info!(
        path = %path.display(),
        channel,
        n_samples = signal.len(),
        duration = signal.duration(),
        "recording loaded"
    );
    Ok(signal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_column_with_comments() {
        let text = "# recorded at 1 kHz\n0.5\n\n-1.25  # spike\n3e-2\n";
        assert_eq!(parse_samples(text, 0).unwrap(), vec![0.5, -1.25, 0.03]);
    }

    #[test]
    fn comma_and_whitespace_columns() {
        let text = "1.0, 2.0, 3.0\n4.0 5.0\t6.0\n7.0,8.0,9.0\n";
        assert_eq!(parse_samples(text, 1).unwrap(), vec![2.0, 5.0, 8.0]);
        assert_eq!(parse_samples(text, 2).unwrap(), vec![3.0, 6.0, 9.0]);
    }

    #[test]
    fn missing_column_reports_line() {
        let err = parse_samples("1 2\n3\n", 1).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn invalid_number_is_rejected() {
        let err = parse_samples("1.0\nabc\n", 0).unwrap_err();
        assert!(err.to_string().contains("\"abc\""));
    }

    #[test]
    fn empty_recording_is_rejected() {
        assert!(parse_samples("# nothing\n\n", 0).is_err());
    }
}
