// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe (formation) definitions and capture.

use crate::dancer::{Dancer, DancerId, Position};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Transition time used when a keyframe has no usable duration
pub const DEFAULT_DURATION_MS: f64 = 1000.0;

/// Smallest duration step offered to users, in seconds
pub const DURATION_STEP_SECONDS: f64 = 0.1;

/// Unique identifier for a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyframeId(pub u64);

impl KeyframeId {
    /// Get the raw ID value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for KeyframeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A formation: every dancer's position plus the time taken to reach it
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    /// Unique keyframe ID
    pub id: KeyframeId,
    /// Transition time from the previous keyframe, in milliseconds
    pub duration: f64,
    /// Position of each dancer, in capture order
    pub positions: IndexMap<DancerId, Position>,
}

impl Keyframe {
    /// Create an empty keyframe
    pub fn new(id: KeyframeId, duration: f64) -> Self {
        Self {
            id,
            duration,
            positions: IndexMap::new(),
        }
    }

    /// Snapshot the current position of every dancer
    pub fn capture(id: KeyframeId, dancers: &[Dancer], duration: f64) -> Self {
        Self {
            id,
            duration,
            positions: dancers.iter().map(|d| (d.id, d.position())).collect(),
        }
    }

    /// Add a position entry
    pub fn with_position(mut self, dancer: DancerId, position: Position) -> Self {
        self.positions.insert(dancer, position);
        self
    }

    /// Position of a dancer in this formation
    pub fn position(&self, dancer: DancerId) -> Option<Position> {
        self.positions.get(&dancer).copied()
    }

    /// Duration to play the transition into this keyframe
    ///
    /// Non-positive or non-finite durations fall back to [`DEFAULT_DURATION_MS`].
    pub fn transition_ms(&self) -> f64 {
        if self.duration > 0.0 && self.duration.is_finite() {
            self.duration
        } else {
            DEFAULT_DURATION_MS
        }
    }

    /// Duration in seconds, as shown to users
    pub fn duration_seconds(&self) -> f64 {
        self.duration / 1000.0
    }

    /// Set the duration from seconds
    pub fn set_duration_seconds(&mut self, seconds: f64) {
        self.duration = seconds * 1000.0;
    }
}

/// Display label for the keyframe at `index`
pub fn formation_label(index: usize) -> String {
    format!("Formation {}", index + 1)
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two values
    pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + (b - a) * t
    }

    /// Interpolate a stage position
    pub fn lerp_position(a: Position, b: Position, t: f64) -> Position {
        Position::new(Self::lerp(a.x, b.x, t), Self::lerp(a.y, b.y, t))
    }
}
