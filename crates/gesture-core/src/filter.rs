//! Per-axis framing filter.
//!
//! Raw accelerometer samples arrive at the hardware rate. Each axis of each
//! gesture owns a [`FrameFilter`] that block-averages `window_size`
//! consecutive samples into one frame (non-overlapping: every raw sample
//! belongs to exactly one frame) and then compresses the frame with a signed
//! integer cube root.
//!
//! # Rounding
//!
//! Both steps truncate toward zero:
//! - the block average is `running_sum / window_size` on an `i64`
//!   accumulator, so `avg(-3, -4) == -3`;
//! - [`normalize`] is the exact integer cube root with the sign carried
//!   through, so `normalize(7) == 1`, `normalize(8) == 2`,
//!   `normalize(-9) == -2`.

use std::num::NonZeroUsize;

/// One raw accelerometer reading for a single axis.
pub type RawSample = i32;

/// A block-averaged or normalized frame value for a single axis.
pub type FrameValue = i32;

/// Signed integer cube root, truncated toward zero.
///
/// Exact for every `i32`: a floating-point estimate is corrected with
/// integer arithmetic so no input lands on the wrong side of a perfect cube.
pub fn integer_cube_root(x: i32) -> i32 {
    let n = i64::from(x).unsigned_abs();
    let mut root = (n as f64).cbrt() as u64;
    while root > 0 && root * root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) * (root + 1) <= n {
        root += 1;
    }
    // |x| <= 2^31, so the root is at most 1290.
    let root = root as i32;
    if x < 0 {
        -root
    } else {
        root
    }
}

/// Compress a block-averaged value into the range used by templates.
///
/// Compression rather than clamping, so large swings stay distinguishable
/// on sensors with a wide range.
pub fn normalize(average: FrameValue) -> FrameValue {
    integer_cube_root(average)
}

/// Non-overlapping block-averaging filter for one axis.
///
/// Only the running sum of the open window and the last completed average
/// are kept, so [`observe`](Self::observe) is constant time and never
/// allocates.
#[derive(Debug, Clone)]
pub struct FrameFilter {
    window_size: NonZeroUsize,
    /// Raw samples received since the last frame boundary.
    count_in_window: usize,
    running_sum: i64,
    latest: Option<FrameValue>,
}

impl FrameFilter {
    /// Create a filter that emits one frame every `window_size` samples.
    pub fn new(window_size: NonZeroUsize) -> Self {
        Self {
            window_size,
            count_in_window: 0,
            running_sum: 0,
            latest: None,
        }
    }

    /// Feed one raw sample. Returns `true` when this sample completed a frame.
    pub fn observe(&mut self, sample: RawSample) -> bool {
        self.count_in_window += 1;
        self.running_sum += i64::from(sample);

        if self.count_in_window < self.window_size.get() {
            return false;
        }

        // The mean of i32 values always fits back into an i32.
        self.latest = Some((self.running_sum / self.window_size.get() as i64) as FrameValue);
        self.count_in_window = 0;
        self.running_sum = 0;
        true
    }

    /// Drop any partial window and the last completed frame.
    pub fn reset(&mut self) {
        self.count_in_window = 0;
        self.running_sum = 0;
        self.latest = None;
    }

    /// Block average of the most recently completed frame.
    pub fn latest_average(&self) -> Option<FrameValue> {
        self.latest
    }

    /// Normalized value of the most recently completed frame.
    pub fn latest_frame(&self) -> Option<FrameValue> {
        self.latest.map(normalize)
    }

    /// Samples received since the last frame boundary.
    pub fn count_in_window(&self) -> usize {
        self.count_in_window
    }

    /// Raw samples that make up one frame.
    pub fn window_size(&self) -> NonZeroUsize {
        self.window_size
    }
}
