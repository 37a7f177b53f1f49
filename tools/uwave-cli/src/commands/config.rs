//! Show or save the effective configuration.

use uwave_common::config::AppConfig;

pub fn run(config: &AppConfig, save: bool) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);

    if save {
        config
            .save()
            .map_err(|e| anyhow::anyhow!("Failed to save config: {e}"))?;
        println!("\nSaved to {}", AppConfig::path().display());
    } else {
        println!("\nConfig file: {}", AppConfig::path().display());
    }
    Ok(())
}
