//! Record template traces and match a live trace against them.

use std::path::PathBuf;

use uwave_common::config::AppConfig;
use uwave_gesture_core::{GestureId, Session, SessionConfig};
use uwave_trace::Trace;

pub fn run(
    config: &AppConfig,
    templates: Vec<PathBuf>,
    live: PathBuf,
    window: Option<usize>,
    alpha: Option<f64>,
    every: usize,
) -> anyhow::Result<()> {
    let live_trace =
        Trace::load(&live).map_err(|e| anyhow::anyhow!("Failed to load live trace: {e}"))?;
    let axis_count = live_trace
        .axis_count()
        .ok_or_else(|| anyhow::anyhow!("Live trace has no samples: {}", live.display()))?;

    let mut session_config = SessionConfig::from(&config.engine);
    session_config.axis_count = axis_count;
    if let Some(window) = window {
        session_config.window_size = window;
    }
    if let Some(alpha) = alpha {
        session_config.alpha = alpha;
    }
    let mut session = Session::with_config(session_config)?;

    println!(
        "Session: {} axes, window {}, alpha {}",
        session.axis_count(),
        session.window_size(),
        session.alpha()
    );

    let mut names: Vec<String> = Vec::with_capacity(templates.len());
    for path in &templates {
        let trace = Trace::load(path)
            .map_err(|e| anyhow::anyhow!("Failed to load template {}: {e}", path.display()))?;
        if trace.axis_count() != Some(axis_count) {
            anyhow::bail!(
                "Template {} has {:?} axes, live trace has {axis_count}",
                path.display(),
                trace.axis_count()
            );
        }

        let id = session.begin_gesture()?;
        for row in trace.rows() {
            session.tick(row)?;
        }
        session.end_gesture(id).map_err(|e| {
            anyhow::anyhow!("Template {} is too short to record: {e}", path.display())
        })?;

        let name = trace
            .label()
            .map(str::to_string)
            .unwrap_or_else(|| path.display().to_string());
        let frames = session.gesture(id).map_or(0, |g| g.template().len());
        println!("  Recorded {id} {name} ({frames} frames)");
        names.push(name);
    }

    let name_of = |id: GestureId| names.get(id.index()).map_or("?", String::as_str);

    println!(
        "\nMatching {} ({} samples)...",
        live.display(),
        live_trace.samples.len()
    );
    for (i, row) in live_trace.rows().enumerate() {
        session.tick(row)?;
        if every > 0 && (i + 1) % every == 0 {
            if let Some(best) = session.best_match() {
                println!(
                    "  [{:>6}] best {} {} (affinity {})",
                    i + 1,
                    best.gesture,
                    name_of(best.gesture),
                    best.affinity
                );
            }
        }
    }

    match session.best_match() {
        Some(best) => {
            println!(
                "\nBest match: {} {} (affinity {})",
                best.gesture,
                name_of(best.gesture),
                best.affinity
            );
            println!("Ranking:");
            for entry in session.ranking() {
                println!(
                    "  {} {:<24} {}",
                    entry.gesture,
                    name_of(entry.gesture),
                    entry.affinity
                );
            }
        }
        None => println!("\nNo recorded gesture to match against."),
    }

    Ok(())
}
