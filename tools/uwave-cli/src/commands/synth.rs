//! Generate a synthetic accelerometer trace.

use std::path::PathBuf;

use uwave_trace::{synthesize, SynthConfig};

pub fn run(output: PathBuf, config: SynthConfig) -> anyhow::Result<()> {
    if config.axis_count == 0 {
        anyhow::bail!("A trace needs at least one axis");
    }
    if config.sample_rate_hz == 0 {
        anyhow::bail!("Sampling rate must be positive");
    }

    let trace = synthesize(&config);
    trace
        .save(&output)
        .map_err(|e| anyhow::anyhow!("Failed to write trace: {e}"))?;

    tracing::debug!(?config, "synthetic trace generated");
    println!(
        "Wrote {} {} samples ({} axes, {:.2}s) to {}",
        trace.samples.len(),
        config.shape,
        config.axis_count,
        trace.duration_secs(),
        output.display()
    );
    Ok(())
}
