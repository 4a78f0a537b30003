// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animated transitions between two formations.
//!
//! A [`Transition`] is time-stepped: the caller feeds it elapsed time once per
//! frame, from a real frame clock or from synthetic steps in tests. Each step
//! yields the positions to write for that frame. The last step always lands
//! exactly on the target formation.

use crate::dancer::{DancerId, Position};
use crate::keyframe::{Interpolation, Keyframe};

/// Path of one dancer through a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DancerPath {
    /// Dancer being moved
    pub dancer: DancerId,
    /// Start position
    pub from: Position,
    /// End position
    pub to: Position,
}

/// Positions produced by one transition step
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionFrame {
    /// Fraction of the transition completed, in `[0, 1]`
    pub t: f64,
    /// Position of every moving dancer at `t`
    pub positions: Vec<(DancerId, Position)>,
    /// Whether this was the final step
    pub finished: bool,
}

/// An in-flight transition from one keyframe to another
#[derive(Debug, Clone)]
pub struct Transition {
    paths: Vec<DancerPath>,
    duration_ms: f64,
    elapsed_ms: f64,
    target: usize,
    finished: bool,
}

impl Transition {
    /// Create a transition towards the keyframe at index `target`
    ///
    /// Only dancers present in both keyframes move.
    pub fn new(from: &Keyframe, to: &Keyframe, duration_ms: f64, target: usize) -> Self {
        let paths = from
            .positions
            .iter()
            .filter_map(|(id, start)| {
                to.positions.get(id).map(|end| DancerPath {
                    dancer: *id,
                    from: *start,
                    to: *end,
                })
            })
            .collect();

        Self {
            paths,
            duration_ms,
            elapsed_ms: 0.0,
            target,
            finished: false,
        }
    }

    /// Index of the keyframe being approached
    pub fn target(&self) -> usize {
        self.target
    }

    /// Total duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Time elapsed so far in milliseconds
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Dancers moved by this transition
    pub fn paths(&self) -> &[DancerPath] {
        &self.paths
    }

    /// Check if the final step has been produced
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Current fraction, clamped to `[0, 1]`
    pub fn fraction(&self) -> f64 {
        if !(self.duration_ms > 0.0) {
            return 1.0;
        }
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Positions at fraction `t`
    ///
    /// At `t >= 1` the target positions are returned verbatim.
    pub fn sample(&self, t: f64) -> Vec<(DancerId, Position)> {
        self.paths
            .iter()
            .map(|path| {
                let position = if t >= 1.0 {
                    path.to
                } else {
                    Interpolation::lerp_position(path.from, path.to, t)
                };
                (path.dancer, position)
            })
            .collect()
    }

    /// Advance by `delta_ms` and produce the frame for the new time
    ///
    /// Negative deltas count as zero. Once finished, further calls keep
    /// returning the final frame.
    pub fn advance(&mut self, delta_ms: f64) -> TransitionFrame {
        if !self.finished && delta_ms > 0.0 {
            self.elapsed_ms += delta_ms;
        }
        let t = self.fraction();
        if t >= 1.0 {
            self.finished = true;
        }
        TransitionFrame {
            t,
            positions: self.sample(t),
            finished: self.finished,
        }
    }
}
