// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ghost overlay tracking.
//!
//! The ghost remembers where every dancer stood just before the latest
//! capture or navigation. It is advisory only and never persisted.

use crate::dancer::{Dancer, DancerId, Position};
use indexmap::IndexMap;

/// Snapshot of the previous dancer positions
#[derive(Debug, Clone, Default)]
pub struct GhostTracker {
    snapshot: IndexMap<DancerId, Position>,
}

impl GhostTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current position of every dancer, replacing the previous snapshot
    pub fn record(&mut self, dancers: &[Dancer]) {
        self.snapshot = dancers.iter().map(|d| (d.id, d.position())).collect();
    }

    /// Recorded position of a dancer
    pub fn position(&self, id: DancerId) -> Option<Position> {
        self.snapshot.get(&id).copied()
    }

    /// All recorded entries
    pub fn positions(&self) -> impl Iterator<Item = (DancerId, Position)> + '_ {
        self.snapshot.iter().map(|(id, p)| (*id, *p))
    }

    /// Entries for dancers that still exist, paired with the dancer for display
    pub fn visible<'a>(
        &'a self,
        dancers: &'a [Dancer],
    ) -> impl Iterator<Item = (&'a Dancer, Position)> + 'a {
        self.snapshot.iter().filter_map(move |(id, position)| {
            dancers.iter().find(|d| d.id == *id).map(|d| (d, *position))
        })
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    /// Check if nothing is recorded
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }
}
