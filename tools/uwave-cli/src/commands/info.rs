//! Show trace information.

use std::path::PathBuf;

use uwave_gesture_core::filter::normalize;
use uwave_trace::Trace;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let trace = Trace::load(&path).map_err(|e| anyhow::anyhow!("Failed to load trace: {e}"))?;

    println!("Trace: {}", path.display());
    if let Some(header) = &trace.header {
        println!("  Schema: {}", header.schema_version);
        println!("  Label: {}", header.label.as_deref().unwrap_or("(none)"));
        println!("  Recorded: {}", header.recorded_at.to_rfc3339());
        println!("  Sample rate: {}Hz", header.sample_rate_hz);
    } else {
        println!("  No header");
    }
    println!("  Samples: {}", trace.samples.len());
    println!("  Duration: {:.3}s", trace.duration_secs());

    let Some(axis_count) = trace.axis_count() else {
        return Ok(());
    };

    println!();
    println!("Axes:");
    for axis in 0..axis_count {
        let values: Vec<i64> = trace.rows().map(|row| i64::from(row[axis])).collect();
        let (Some(min), Some(max)) = (values.iter().min(), values.iter().max()) else {
            continue;
        };
        let mean = values.iter().sum::<i64>() / values.len() as i64;
        // Axis values fit i32, so their mean does too.
        let mean = mean as i32;
        println!(
            "  [{axis}] min {min:>7} max {max:>7} mean {mean:>7} (normalized {})",
            normalize(mean)
        );
    }

    Ok(())
}
