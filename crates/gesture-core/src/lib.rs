//! uwave Gesture Core
//!
//! Streaming accelerometer gesture recognition in the style of uWave:
//! - **Framing:** Block-average raw samples per axis and cube-root compress them
//! - **Recording:** Collect framed motion into reference templates
//! - **Matching:** Fold each live frame into an incremental time-warped
//!   alignment cost against every template
//!
//! This crate is pure computation: no I/O, no threads, no clocks. The caller
//! drives it by calling [`Session::tick`] once per hardware sample.
//!
//! ```
//! use uwave_gesture_core::Session;
//!
//! let mut session = Session::new(1, 2)?;
//! let wave = session.begin_gesture()?;
//! for sample in [8, 8, 64, 64, 8, 8] {
//!     session.tick(&[sample])?;
//! }
//! session.end_gesture(wave)?;
//!
//! for sample in [8, 8, 64, 64, 8, 8] {
//!     session.tick(&[sample])?;
//! }
//! let best = session.best_match().expect("one gesture is recorded");
//! assert_eq!(best.gesture, wave);
//! assert_eq!(best.affinity, 0);
//! # Ok::<(), uwave_common::GestureError>(())
//! ```

pub mod filter;
pub mod gesture;
pub mod matcher;
pub mod session;

pub use filter::{normalize, FrameFilter, FrameValue, RawSample};
pub use gesture::{Frame, GestureId, GestureRecord, GestureState};
pub use matcher::{Affinity, Matcher, DEFAULT_ALPHA, UNEVALUATED_AFFINITY};
pub use session::{BestMatch, Session, SessionConfig};
