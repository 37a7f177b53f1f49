//! Incremental time-warped template matching.
//!
//! Full DTW of a live stream of `T` frames against a template of `N` frames
//! costs `O(N * T)` and needs the whole live history. The [`Matcher`] keeps
//! only one cost per template position (`affinities`) and folds each new
//! live frame into it in `O(N)`:
//!
//! 1. **Backward pass** (`i = N-1 ..= 0`): `affinities[0] = cost(0)`, and for
//!    `i > 0`, `affinities[i] = min(alpha * affinities[i], cost(i) + affinities[i-1])`.
//!    Walking downward means `affinities[i-1]` still holds the value from the
//!    previous live frame, so this step advances the live sequence by one
//!    frame (the diagonal and vertical DTW moves).
//! 2. **Forward pass** (`i = 1 .. N`): `affinities[i] = min(affinities[i], affinities[i-1] + cost(i))`.
//!    This reads values already updated in this tick, letting one live frame
//!    stretch across several template frames (the horizontal DTW move).
//!
//! The two passes must stay separate and in this order; merging them changes
//! the recurrence.
//!
//! `affinities[N-1]` is then the best-effort cost of aligning the live
//! stream, ending now, against the whole template. Lower is better.

use uwave_common::error::{GestureError, GestureResult};

use crate::filter::FrameValue;

/// Cumulative alignment cost. Lower is a better match.
pub type Affinity = u64;

/// Initial cost of every template position before any live frame was seen.
pub const UNEVALUATED_AFFINITY: Affinity = i16::MAX as Affinity;

/// Retention factor that keeps previous affinities unchanged.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// L1 distance between a template frame and a live frame.
pub fn frame_distance(template: &[FrameValue], live: &[FrameValue]) -> Affinity {
    template
        .iter()
        .zip(live)
        .map(|(&t, &l)| (i64::from(t) - i64::from(l)).unsigned_abs())
        .sum()
}

/// Streaming matcher shared by every gesture of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matcher {
    alpha: f64,
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl Matcher {
    /// Create a matcher with the given retention factor.
    ///
    /// `alpha` must be finite and positive; values above 1.0 make earlier
    /// low-cost alignments fade more slowly than new ones are built.
    pub fn new(alpha: f64) -> GestureResult<Self> {
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(GestureError::invalid_parameter(format!(
                "alpha must be finite and positive, got {alpha}"
            )));
        }
        Ok(Self { alpha })
    }

    /// Retention factor applied to previous affinities.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Fold one live frame into `affinities`.
    pub fn update(
        &self,
        template: &[Vec<FrameValue>],
        affinities: &mut [Affinity],
        live: &[FrameValue],
    ) -> GestureResult<()> {
        if template.is_empty() {
            return Err(GestureError::internal("matching against an empty template"));
        }
        if affinities.len() != template.len() {
            return Err(GestureError::internal(format!(
                "{} affinities for a template of {} frames",
                affinities.len(),
                template.len()
            )));
        }
        if let Some(frame) = template.iter().find(|f| f.len() != live.len()) {
            return Err(GestureError::internal(format!(
                "template frame has {} axes, live frame has {}",
                frame.len(),
                live.len()
            )));
        }

        for i in (0..template.len()).rev() {
            let cost = frame_distance(&template[i], live);
            affinities[i] = if i == 0 {
                cost
            } else {
                self.retain(affinities[i])
                    .min(cost.saturating_add(affinities[i - 1]))
            };
        }

        for i in 1..template.len() {
            let cost = frame_distance(&template[i], live);
            affinities[i] = affinities[i].min(affinities[i - 1].saturating_add(cost));
        }

        tracing::trace!(
            final_affinity = affinities[affinities.len() - 1],
            "affinities updated"
        );
        Ok(())
    }

    fn retain(&self, affinity: Affinity) -> Affinity {
        if self.alpha == DEFAULT_ALPHA {
            affinity
        } else {
            // Float to int casts saturate.
            (self.alpha * affinity as f64) as Affinity
        }
    }
}
