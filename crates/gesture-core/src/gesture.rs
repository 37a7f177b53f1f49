//! A single reference gesture: its template, its running affinities, and
//! the per-axis filters that frame incoming samples for it.

use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use uwave_common::error::{GestureError, GestureResult};

use crate::filter::{FrameFilter, FrameValue, RawSample};
use crate::matcher::{Affinity, Matcher, UNEVALUATED_AFFINITY};

/// One normalized value per axis.
pub type Frame = Vec<FrameValue>;

/// Stable handle to a gesture inside a [`Session`](crate::Session).
///
/// Handles are assigned in creation order and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GestureId(usize);

impl GestureId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the gesture in creation order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for GestureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a gesture record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureState {
    /// Allocated but recording has not started.
    Idle,
    /// Completed frames are appended to the template.
    Recording,
    /// Template is frozen; completed frames are matched against it.
    Recorded,
}

/// A reference gesture and its matching state.
#[derive(Debug, Clone)]
pub struct GestureRecord {
    state: GestureState,
    template: Vec<Frame>,
    affinities: Vec<Affinity>,
    filters: Vec<FrameFilter>,
}

impl GestureRecord {
    /// Allocate an idle record with one filter per axis.
    pub(crate) fn new(axis_count: NonZeroUsize, window_size: NonZeroUsize) -> GestureResult<Self> {
        let mut filters = Vec::new();
        filters
            .try_reserve_exact(axis_count.get())
            .map_err(|e| GestureError::from_reserve("gesture filters", e))?;
        for _ in 0..axis_count.get() {
            filters.push(FrameFilter::new(window_size));
        }

        Ok(Self {
            state: GestureState::Idle,
            template: Vec::new(),
            affinities: Vec::new(),
            filters,
        })
    }

    /// Start recording into an empty template.
    pub fn begin_recording(&mut self) -> GestureResult<()> {
        if self.state != GestureState::Idle {
            return Err(GestureError::invalid_parameter(format!(
                "cannot begin recording a gesture that is {:?}",
                self.state
            )));
        }
        self.template.clear();
        self.state = GestureState::Recording;
        Ok(())
    }

    /// Freeze the template and prepare for matching.
    ///
    /// Rejects an empty template; the record then stays in `Recording` so
    /// more frames can still arrive.
    pub fn end_recording(&mut self) -> GestureResult<()> {
        if self.state != GestureState::Recording {
            return Err(GestureError::invalid_parameter(format!(
                "cannot end recording of a gesture that is {:?}",
                self.state
            )));
        }
        if self.template.is_empty() {
            return Err(GestureError::invalid_parameter(
                "no frame was completed while recording",
            ));
        }

        let mut affinities = Vec::new();
        affinities
            .try_reserve_exact(self.template.len())
            .map_err(|e| GestureError::from_reserve("gesture affinities", e))?;
        affinities.resize(self.template.len(), UNEVALUATED_AFFINITY);

        self.affinities = affinities;
        self.state = GestureState::Recorded;
        for filter in &mut self.filters {
            filter.reset();
        }
        Ok(())
    }

    /// Feed one raw sample (one value per axis).
    ///
    /// When the sample completes a frame on every axis the frame is appended
    /// to the template (`Recording`) or matched against it (`Recorded`).
    /// Returns whether a frame was completed.
    pub fn tick(&mut self, sample: &[RawSample], matcher: &Matcher) -> GestureResult<bool> {
        if self.state == GestureState::Idle {
            return Err(GestureError::internal(
                "tick reached a gesture that is neither recording nor recorded",
            ));
        }
        if sample.len() != self.filters.len() {
            return Err(GestureError::invalid_parameter(format!(
                "sample has {} axes, gesture expects {}",
                sample.len(),
                self.filters.len()
            )));
        }

        // Every axis must see the sample, so no short-circuiting here.
        let mut frame_ready = true;
        for (filter, &value) in self.filters.iter_mut().zip(sample) {
            frame_ready &= filter.observe(value);
        }
        if !frame_ready {
            return Ok(false);
        }

        let frame = self.live_frame()?;
        match self.state {
            GestureState::Recording => self.append_frame(frame)?,
            GestureState::Recorded => matcher.update(&self.template, &mut self.affinities, &frame)?,
            GestureState::Idle => {
                return Err(GestureError::internal("gesture left its lifecycle mid-tick"))
            }
        }
        Ok(true)
    }

    /// The latest normalized frame across all axes.
    fn live_frame(&self) -> GestureResult<Frame> {
        self.filters
            .iter()
            .enumerate()
            .map(|(axis, filter)| {
                filter.latest_frame().ok_or_else(|| {
                    GestureError::internal(format!("axis {axis} reported ready without a frame"))
                })
            })
            .collect()
    }

    fn append_frame(&mut self, frame: Frame) -> GestureResult<()> {
        self.template
            .try_reserve(1)
            .map_err(|e| GestureError::from_reserve("gesture template", e))?;
        self.template.push(frame);
        tracing::debug!(frames = self.template.len(), "template frame recorded");
        Ok(())
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_recorded(&self) -> bool {
        self.state == GestureState::Recorded
    }

    /// Recorded frames, oldest first.
    pub fn template(&self) -> &[Frame] {
        &self.template
    }

    /// Per-position alignment costs. Empty until recording ends.
    pub fn affinities(&self) -> &[Affinity] {
        &self.affinities
    }

    /// Cost of aligning the live stream against the whole template.
    pub fn final_affinity(&self) -> Option<Affinity> {
        match self.state {
            GestureState::Recorded => self.affinities.last().copied(),
            _ => None,
        }
    }

    pub fn axis_count(&self) -> usize {
        self.filters.len()
    }

    /// Per-axis filters, in axis order.
    pub fn filters(&self) -> &[FrameFilter] {
        &self.filters
    }
}
