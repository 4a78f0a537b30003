// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline navigation over the keyframe sequence.
//!
//! The navigator tracks which keyframe is current and whether a transition
//! is playing. The current index and keyframe ID are stored together so they
//! can never disagree.

use crate::keyframe::{Keyframe, KeyframeId};

/// Outcome of a navigation command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Dancers were moved to the target formation immediately
    Jumped,
    /// An animated transition to the next formation has started
    TransitionStarted,
    /// Rejected: a transition is playing
    Busy,
    /// Rejected: the target index does not exist
    OutOfRange,
    /// Rejected: there is no formation in the requested direction
    NoFurtherFormation,
}

impl Navigation {
    /// Check if the command was carried out
    pub fn is_accepted(&self) -> bool {
        matches!(self, Navigation::Jumped | Navigation::TransitionStarted)
    }
}

/// Current position in the keyframe sequence
#[derive(Debug, Clone, Default)]
pub struct TimelineNavigator {
    current: Option<(usize, KeyframeId)>,
    playing: bool,
}

impl TimelineNavigator {
    /// Create a navigator with no current keyframe
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the current keyframe
    pub fn current_index(&self) -> Option<usize> {
        self.current.map(|(index, _)| index)
    }

    /// ID of the current keyframe
    pub fn current_keyframe_id(&self) -> Option<KeyframeId> {
        self.current.map(|(_, id)| id)
    }

    /// Check if a transition is playing
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Check whether a jump to `index` would be accepted
    pub fn check_jump(&self, index: usize, len: usize) -> Navigation {
        if self.playing {
            Navigation::Busy
        } else if index >= len {
            Navigation::OutOfRange
        } else {
            Navigation::Jumped
        }
    }

    /// Check whether stepping forward would be accepted
    pub fn check_next(&self, len: usize) -> Navigation {
        if self.playing {
            return Navigation::Busy;
        }
        match self.current_index() {
            Some(index) if index + 1 < len => Navigation::TransitionStarted,
            _ => Navigation::NoFurtherFormation,
        }
    }

    /// Check whether stepping backward would be accepted
    pub fn check_previous(&self) -> Navigation {
        if self.playing {
            return Navigation::Busy;
        }
        match self.current_index() {
            Some(index) if index > 0 => Navigation::Jumped,
            _ => Navigation::NoFurtherFormation,
        }
    }

    /// Point at the keyframe at `index`
    ///
    /// Returns false and leaves the state untouched if the index is out of range.
    pub fn set_current(&mut self, index: usize, keyframes: &[Keyframe]) -> bool {
        match keyframes.get(index) {
            Some(kf) => {
                self.current = Some((index, kf.id));
                true
            }
            None => false,
        }
    }

    /// Point at the first keyframe, or nothing if the sequence is empty
    pub fn reset(&mut self, keyframes: &[Keyframe]) {
        self.current = keyframes.first().map(|kf| (0, kf.id));
        self.playing = false;
    }

    /// Mark a transition as playing
    pub fn begin_transition(&mut self) {
        self.playing = true;
    }

    /// Clear the playing flag and advance to the transition target
    pub fn finish_transition(&mut self, target: usize, keyframes: &[Keyframe]) {
        self.playing = false;
        if !self.set_current(target, keyframes) {
            tracing::warn!("Transition target {target} no longer exists");
        }
    }

    /// Re-anchor after the keyframe at `removed` was deleted
    ///
    /// `keyframes` is the sequence after removal.
    pub fn keyframe_removed(&mut self, removed: usize, keyframes: &[Keyframe]) {
        let Some((current, id)) = self.current else {
            return;
        };

        if removed < current {
            self.current = Some((current - 1, id));
        } else if removed == current {
            let index = current.saturating_sub(1);
            self.current = keyframes.get(index).map(|kf| (index, kf.id));
        }
    }
}
