//! Top-level gesture session.
//!
//! A [`Session`] owns every gesture record, fans each raw sample out to all
//! of them, and answers which recorded gesture the live motion resembles
//! most. All operations run synchronously on the caller's thread; callers
//! sharing a session across threads must serialize access themselves.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use uwave_common::config::EngineDefaults;
use uwave_common::error::{GestureError, GestureResult};

use crate::filter::RawSample;
use crate::gesture::{GestureId, GestureRecord};
use crate::matcher::{Affinity, Matcher, DEFAULT_ALPHA};

/// Parameters fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Values per raw sample.
    pub axis_count: usize,

    /// Raw samples averaged into one frame.
    pub window_size: usize,

    /// Retention factor for previous affinities.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

impl SessionConfig {
    pub fn new(axis_count: usize, window_size: usize) -> Self {
        Self {
            axis_count,
            window_size,
            alpha: DEFAULT_ALPHA,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Reject zero axis count or window size and unusable alpha values.
    pub fn validate(&self) -> GestureResult<()> {
        self.checked().map(|_| ())
    }

    fn checked(&self) -> GestureResult<(NonZeroUsize, NonZeroUsize, Matcher)> {
        let axis_count = NonZeroUsize::new(self.axis_count)
            .ok_or_else(|| GestureError::invalid_parameter("axis count must be positive"))?;
        let window_size = NonZeroUsize::new(self.window_size)
            .ok_or_else(|| GestureError::invalid_parameter("window size must be positive"))?;
        let matcher = Matcher::new(self.alpha)?;
        Ok((axis_count, window_size, matcher))
    }
}

impl From<&EngineDefaults> for SessionConfig {
    fn from(defaults: &EngineDefaults) -> Self {
        Self {
            axis_count: defaults.axis_count,
            window_size: defaults.window_size,
            alpha: defaults.alpha,
        }
    }
}

/// The recorded gesture closest to the live motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestMatch {
    pub gesture: GestureId,
    pub affinity: Affinity,
}

/// Recorder and matcher for a set of reference gestures.
#[derive(Debug)]
pub struct Session {
    axis_count: NonZeroUsize,
    window_size: NonZeroUsize,
    matcher: Matcher,
    records: Vec<GestureRecord>,
}

impl Session {
    /// Create a session with the default retention factor.
    pub fn new(axis_count: usize, window_size: usize) -> GestureResult<Self> {
        Self::with_config(SessionConfig::new(axis_count, window_size))
    }

    /// Create a session from a full configuration.
    pub fn with_config(config: SessionConfig) -> GestureResult<Self> {
        let (axis_count, window_size, matcher) = config.checked()?;

        tracing::debug!(
            axis_count = axis_count.get(),
            window_size = window_size.get(),
            alpha = config.alpha,
            "gesture session created"
        );

        Ok(Self {
            axis_count,
            window_size,
            matcher,
            records: Vec::new(),
        })
    }

    /// Allocate a new gesture and start recording it.
    ///
    /// Nothing is added to the session unless every allocation succeeds.
    pub fn begin_gesture(&mut self) -> GestureResult<GestureId> {
        self.records
            .try_reserve(1)
            .map_err(|e| GestureError::from_reserve("gesture collection", e))?;

        let mut record = GestureRecord::new(self.axis_count, self.window_size)?;
        record.begin_recording()?;

        let id = GestureId::new(self.records.len());
        self.records.push(record);
        tracing::debug!(gesture = %id, "gesture recording started");
        Ok(id)
    }

    /// Stop recording a gesture and make it available for matching.
    pub fn end_gesture(&mut self, id: GestureId) -> GestureResult<()> {
        let record = self.records.get_mut(id.index()).ok_or_else(|| {
            GestureError::invalid_parameter(format!("unknown gesture {id}"))
        })?;

        if let Err(e) = record.end_recording() {
            tracing::warn!(gesture = %id, error = %e, "cannot end gesture recording");
            return Err(e);
        }
        tracing::debug!(
            gesture = %id,
            frames = record.template().len(),
            "gesture recorded"
        );
        Ok(())
    }

    /// Feed one raw sample (one value per axis) to every gesture.
    ///
    /// A failing gesture does not stop the others from being processed. If
    /// any failed, the last failure is returned once all were visited.
    pub fn tick(&mut self, sample: &[RawSample]) -> GestureResult<()> {
        if sample.len() != self.axis_count.get() {
            return Err(GestureError::invalid_parameter(format!(
                "sample has {} axes, session expects {}",
                sample.len(),
                self.axis_count
            )));
        }

        let mut status = Ok(());
        for (index, record) in self.records.iter_mut().enumerate() {
            if let Err(e) = record.tick(sample, &self.matcher) {
                tracing::warn!(gesture = index, error = %e, "gesture tick failed");
                status = Err(e);
            }
        }
        status
    }

    /// The recorded gesture with the lowest final affinity.
    ///
    /// Ties go to the gesture created first. `None` when no gesture has
    /// finished recording.
    pub fn best_match(&self) -> Option<BestMatch> {
        let mut best: Option<BestMatch> = None;
        for candidate in self.recorded() {
            if best.map_or(true, |current| candidate.affinity < current.affinity) {
                best = Some(candidate);
            }
        }
        best
    }

    /// Every recorded gesture, best match first. Equal affinities keep
    /// creation order.
    pub fn ranking(&self) -> Vec<BestMatch> {
        let mut ranking: Vec<BestMatch> = self.recorded().collect();
        ranking.sort_by_key(|m| m.affinity);
        ranking
    }

    fn recorded(&self) -> impl Iterator<Item = BestMatch> + '_ {
        self.records.iter().enumerate().filter_map(|(index, record)| {
            record.final_affinity().map(|affinity| BestMatch {
                gesture: GestureId::new(index),
                affinity,
            })
        })
    }

    /// Look up a gesture by handle.
    pub fn gesture(&self, id: GestureId) -> Option<&GestureRecord> {
        self.records.get(id.index())
    }

    /// All gestures in creation order.
    pub fn gestures(&self) -> impl Iterator<Item = (GestureId, &GestureRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| (GestureId::new(index), record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Values expected in every raw sample.
    pub fn axis_count(&self) -> usize {
        self.axis_count.get()
    }

    /// Raw samples averaged into one frame.
    pub fn window_size(&self) -> usize {
        self.window_size.get()
    }

    /// Retention factor applied to previous affinities.
    pub fn alpha(&self) -> f64 {
        self.matcher.alpha()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::normalize;
    use crate::gesture::GestureState;
    use crate::matcher::UNEVALUATED_AFFINITY;
    use proptest::prelude::*;
    use uwave_common::error::ErrorKind;

    fn feed(session: &mut Session, samples: &[i32]) {
        for &s in samples {
            session.tick(&[s]).unwrap();
        }
    }

    /// Record a one-axis gesture from raw samples and end it.
    fn record(session: &mut Session, samples: &[i32]) -> GestureId {
        let id = session.begin_gesture().unwrap();
        feed(session, samples);
        session.end_gesture(id).unwrap();
        id
    }

    #[test]
    fn test_create_rejects_zero_parameters() {
        assert_eq!(
            Session::new(0, 4).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
        assert_eq!(
            Session::new(3, 0).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
        assert_eq!(
            Session::with_config(SessionConfig::new(3, 4).with_alpha(-2.0))
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidParameter
        );
    }

    #[test]
    fn test_config_validate() {
        SessionConfig::new(3, 4).validate().unwrap();
        SessionConfig::new(1, 1).with_alpha(0.5).validate().unwrap();

        let bad = [
            SessionConfig::new(0, 4),
            SessionConfig::new(3, 0),
            SessionConfig::new(3, 4).with_alpha(f64::NAN),
            SessionConfig::new(3, 4).with_alpha(f64::INFINITY),
            SessionConfig::new(3, 4).with_alpha(0.0),
        ];
        for config in bad {
            assert_eq!(
                config.validate().unwrap_err().kind(),
                ErrorKind::InvalidParameter,
                "{config:?}"
            );
        }
    }

    #[test]
    fn test_config_from_engine_defaults() {
        let config = SessionConfig::from(&EngineDefaults::default());
        let session = Session::with_config(config).unwrap();
        assert_eq!(session.axis_count(), 3);
        assert_eq!(session.window_size(), 4);
        assert_eq!(session.alpha(), 1.0);
    }

    #[test]
    fn test_handles_are_sequential() {
        let mut session = Session::new(2, 3).unwrap();
        let a = session.begin_gesture().unwrap();
        let b = session.begin_gesture().unwrap();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(session.len(), 2);
        assert_eq!(
            session.gesture(b).map(|g| g.state()),
            Some(GestureState::Recording)
        );
    }

    #[test]
    fn test_window_two_scenario() {
        // avg(2, 2) = 2 -> cbrt 1; avg(4, 4) = 4 -> cbrt 1.
        let mut session = Session::new(1, 2).unwrap();
        let id = record(&mut session, &[2, 2, 4, 4]);
        let gesture = session.gesture(id).unwrap();
        assert_eq!(gesture.template(), &[vec![1], vec![1]]);
        assert_eq!(gesture.affinities(), &[UNEVALUATED_AFFINITY; 2]);

        feed(&mut session, &[2, 2]);
        assert_eq!(session.gesture(id).unwrap().affinities(), &[0, 0]);

        // avg 27 -> 3, two away from every template frame.
        feed(&mut session, &[27, 27]);
        assert_eq!(session.gesture(id).unwrap().affinities(), &[2, 0]);

        // avg -9 -> -2, three away.
        feed(&mut session, &[-9, -9]);
        assert_eq!(session.gesture(id).unwrap().affinities(), &[3, 0]);
    }

    #[test]
    fn test_end_without_frames_is_invalid() {
        let mut session = Session::new(1, 4).unwrap();
        let id = session.begin_gesture().unwrap();
        feed(&mut session, &[1, 2, 3]);
        let err = session.end_gesture(id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);

        // One more sample completes a frame; now ending works.
        feed(&mut session, &[4]);
        session.end_gesture(id).unwrap();
        assert_eq!(session.gesture(id).unwrap().template(), &[vec![1]]);
    }

    #[test]
    fn test_end_rejects_unknown_and_double_end() {
        let mut session = Session::new(1, 1).unwrap();
        let id = record(&mut session, &[5]);
        assert_eq!(
            session.end_gesture(id).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
        assert_eq!(
            session.end_gesture(GestureId::new(7)).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
    }

    #[test]
    fn test_tick_rejects_wrong_axis_count_before_mutation() {
        let mut session = Session::new(3, 2).unwrap();
        let id = session.begin_gesture().unwrap();
        session.tick(&[1, 1, 1]).unwrap();
        let err = session.tick(&[1, 1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        let filters = session.gesture(id).unwrap().filters();
        assert!(filters.iter().all(|f| f.count_in_window() == 1));
    }

    #[test]
    fn test_no_frame_before_window_fills() {
        let mut session = Session::new(2, 5).unwrap();
        let id = session.begin_gesture().unwrap();
        for _ in 0..4 {
            session.tick(&[100, -100]).unwrap();
        }
        assert!(session.gesture(id).unwrap().template().is_empty());
        session.tick(&[100, -100]).unwrap();
        assert_eq!(
            session.gesture(id).unwrap().template(),
            &[vec![normalize(100), normalize(-100)]]
        );
    }

    #[test]
    fn test_best_match_none_without_recorded_gestures() {
        let mut session = Session::new(1, 1).unwrap();
        assert_eq!(session.best_match(), None);
        session.begin_gesture().unwrap();
        feed(&mut session, &[1, 2, 3]);
        assert_eq!(session.best_match(), None);
        assert!(session.ranking().is_empty());
    }

    #[test]
    fn test_best_match_prefers_closest_template() {
        let mut session = Session::new(1, 1).unwrap();
        let up = record(&mut session, &[1, 8, 27, 64]);
        let down = record(&mut session, &[64, 27, 8, 1]);
        // Still recording, must be ignored.
        session.begin_gesture().unwrap();

        feed(&mut session, &[1, 8, 27, 64]);
        let best = session.best_match().unwrap();
        assert_eq!(best.gesture, up);
        assert_eq!(best.affinity, 0);

        let ranking = session.ranking();
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[1].gesture, down);
        assert!(ranking[1].affinity > 0);
    }

    #[test]
    fn test_best_match_ties_go_to_first_created() {
        let mut session = Session::new(1, 1).unwrap();
        let first = session.begin_gesture().unwrap();
        let second = session.begin_gesture().unwrap();
        feed(&mut session, &[8, 8]);
        session.end_gesture(first).unwrap();
        session.end_gesture(second).unwrap();
        assert_eq!(
            session.best_match(),
            Some(BestMatch {
                gesture: first,
                affinity: UNEVALUATED_AFFINITY
            })
        );

        feed(&mut session, &[27, 27, 27]);
        let best = session.best_match().unwrap();
        assert_eq!(best.gesture, first);
        assert_eq!(
            session.gesture(second).unwrap().final_affinity(),
            Some(best.affinity)
        );
        assert_eq!(session.ranking()[0].gesture, first);
    }

    #[test]
    fn test_recording_and_evaluating_gestures_coexist() {
        let mut session = Session::new(1, 1).unwrap();
        let recorded = record(&mut session, &[1, 8]);
        let recording = session.begin_gesture().unwrap();
        feed(&mut session, &[1, 8]);

        assert_eq!(session.gesture(recorded).unwrap().template().len(), 2);
        assert_eq!(session.gesture(recorded).unwrap().final_affinity(), Some(0));
        assert_eq!(
            session.gesture(recording).unwrap().template(),
            &[vec![1], vec![2]]
        );
    }

    #[test]
    fn test_failing_gesture_does_not_stop_others() {
        let mut session = Session::new(1, 1).unwrap();
        let idle = GestureRecord::new(session.axis_count, session.window_size).unwrap();
        session.records.push(idle);
        let id = session.begin_gesture().unwrap();

        let err = session.tick(&[8]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalInconsistency);
        assert_eq!(session.gesture(id).unwrap().template(), &[vec![2]]);
    }

    #[test]
    fn test_perfect_replay_multi_axis() {
        let samples: Vec<[i32; 3]> = (0..40)
            .map(|t| [t * 7 - 100, (t % 9) * 30, 500 - t * t])
            .collect();
        let mut session = Session::new(3, 4).unwrap();
        let id = session.begin_gesture().unwrap();
        for s in &samples {
            session.tick(s).unwrap();
        }
        session.end_gesture(id).unwrap();
        for s in &samples {
            session.tick(s).unwrap();
        }
        assert_eq!(session.gesture(id).unwrap().template().len(), 10);
        assert_eq!(session.best_match().map(|m| m.affinity), Some(0));
    }

    fn run(samples: &[i32], live: &[i32], window: usize) -> Vec<Affinity> {
        let mut session = Session::new(1, window).unwrap();
        let id = session.begin_gesture().unwrap();
        feed(&mut session, samples);
        if session.end_gesture(id).is_err() {
            return Vec::new();
        }
        feed(&mut session, live);
        session.gesture(id).unwrap().affinities().to_vec()
    }

    proptest! {
        #[test]
        fn prop_affinities_match_template_length(
            window in 1usize..6,
            samples in proptest::collection::vec(-2000i32..2000, 0..120),
            live in proptest::collection::vec(-2000i32..2000, 0..120),
        ) {
            let affinities = run(&samples, &live, window);
            prop_assert_eq!(affinities.len(), samples.len() / window);
        }

        #[test]
        fn prop_runs_are_deterministic(
            window in 1usize..6,
            samples in proptest::collection::vec(-2000i32..2000, 1..120),
            live in proptest::collection::vec(-2000i32..2000, 0..120),
        ) {
            prop_assert_eq!(run(&samples, &live, window), run(&samples, &live, window));
        }

        #[test]
        fn prop_perfect_replay_is_zero_cost(
            window in 1usize..6,
            samples in proptest::collection::vec(-2000i32..2000, 6..120),
        ) {
            let affinities = run(&samples, &samples, window);
            prop_assert_eq!(affinities.last().copied(), Some(0));
        }
    }
}
