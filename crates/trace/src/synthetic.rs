//! Synthetic accelerometer motions.
//!
//! Generated traces are deterministic for a given [`SynthConfig`], which
//! makes them usable as demo input and as test fixtures.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::sample::{SampleEvent, TraceHeader};
use crate::trace::Trace;

/// Motion pattern to synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// One full circle in the first two axes.
    Circle,
    /// Fast back-and-forth on the first axis.
    Shake,
    /// Slow ramp from rest to a tilted hold.
    Tilt,
}

/// Parameters for [`synthesize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthConfig {
    pub shape: Shape,
    pub axis_count: usize,
    pub samples: usize,
    pub sample_rate_hz: u32,
    /// Peak raw value of the motion.
    pub amplitude: f64,
    /// Peak absolute noise added to every value.
    pub noise: i32,
    pub seed: u64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            shape: Shape::Circle,
            axis_count: 3,
            samples: 200,
            sample_rate_hz: 100,
            amplitude: 1000.0,
            noise: 0,
            seed: 1,
        }
    }
}

impl Shape {
    /// Motion value of `axis` at phase `t` in `[0, 1)`, scaled to `[-1, 1]`.
    fn value(self, axis: usize, t: f64) -> f64 {
        use std::f64::consts::TAU;
        match (self, axis) {
            (Shape::Circle, 0) => (TAU * t).cos(),
            (Shape::Circle, 1) => (TAU * t).sin(),
            (Shape::Shake, 0) => (TAU * 4.0 * t).sin(),
            (Shape::Tilt, 0) => (2.0 * t).min(1.0),
            (Shape::Tilt, 1) => -(2.0 * t).min(1.0) * 0.5,
            _ => 0.0,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Circle => "circle",
            Shape::Shake => "shake",
            Shape::Tilt => "tilt",
        };
        f.write_str(name)
    }
}

impl FromStr for Shape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "circle" => Ok(Shape::Circle),
            "shake" => Ok(Shape::Shake),
            "tilt" => Ok(Shape::Tilt),
            other => Err(format!("unknown shape '{other}' (expected circle|shake|tilt)")),
        }
    }
}

/// Generate a labelled trace for `config`.
pub fn synthesize(config: &SynthConfig) -> Trace {
    let mut noise = NoiseSource::new(config.seed);
    let interval_ns = 1_000_000_000 / u64::from(config.sample_rate_hz.max(1));

    let samples = (0..config.samples)
        .map(|i| {
            let t = i as f64 / config.samples.max(1) as f64;
            let axes = (0..config.axis_count)
                .map(|axis| {
                    let clean = (config.shape.value(axis, t) * config.amplitude).round() as i32;
                    clean.saturating_add(noise.next_within(config.noise))
                })
                .collect();
            SampleEvent::new(i as u64 * interval_ns, axes)
        })
        .collect();

    let header = TraceHeader::new(config.axis_count, config.sample_rate_hz)
        .with_label(config.shape.to_string());
    Trace::new(header, samples)
}

/// xorshift64* noise, reproducible across platforms.
struct NoiseSource(u64);

impl NoiseSource {
    fn new(seed: u64) -> Self {
        // xorshift state must be non-zero.
        Self(seed.max(1))
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform integer in `[-bound, bound]`.
    fn next_within(&mut self, bound: i32) -> i32 {
        if bound <= 0 {
            return 0;
        }
        let span = 2 * u64::from(bound.unsigned_abs()) + 1;
        (self.next_u64() % span) as i32 - bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_shape_parsing() {
        assert_eq!("Circle".parse::<Shape>(), Ok(Shape::Circle));
        assert_eq!("shake".parse::<Shape>(), Ok(Shape::Shake));
        assert!("spiral".parse::<Shape>().is_err());
        assert_eq!(Shape::Tilt.to_string(), "tilt");
    }

    #[test]
    fn test_synthesize_dimensions_and_timing() {
        let config = SynthConfig {
            axis_count: 2,
            samples: 50,
            sample_rate_hz: 50,
            ..Default::default()
        };
        let trace = synthesize(&config);
        assert_eq!(trace.samples.len(), 50);
        assert_eq!(trace.axis_count(), Some(2));
        assert_eq!(trace.label(), Some("circle"));
        assert_eq!(trace.samples[1].timestamp_ns, 20_000_000);
        trace.validate().unwrap();
    }

    #[test]
    fn test_circle_starts_at_peak() {
        let trace = synthesize(&SynthConfig::default());
        assert_eq!(trace.samples[0].axes, vec![1000, 0, 0]);
    }

    #[test]
    fn test_shapes_differ() {
        let circle = synthesize(&SynthConfig::default());
        let shake = synthesize(&SynthConfig {
            shape: Shape::Shake,
            ..Default::default()
        });
        assert_ne!(circle.samples, shake.samples);
    }

    proptest! {
        #[test]
        fn prop_same_seed_same_samples(seed in any::<u64>(), noise in 0i32..200) {
            let config = SynthConfig { noise, seed, samples: 40, ..Default::default() };
            prop_assert_eq!(synthesize(&config).samples, synthesize(&config).samples);
        }

        #[test]
        fn prop_noise_is_bounded(seed in any::<u64>(), bound in 0i32..500) {
            let mut source = NoiseSource::new(seed);
            for _ in 0..64 {
                let n = source.next_within(bound);
                prop_assert!(n >= -bound && n <= bound);
            }
        }
    }
}
