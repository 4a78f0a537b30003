// SPDX-License-Identifier: MIT OR Apache-2.0
//! Entity store holding the dancers and the keyframe sequence.
//!
//! The store keeps two invariants across every mutation:
//! - every keyframe has a position entry for each dancer added after it was captured
//! - no keyframe keeps an entry for a deleted dancer

use crate::dancer::{Dancer, DancerId, Position};
use crate::keyframe::{Keyframe, KeyframeId, DEFAULT_DURATION_MS};

/// Largest dancer or keyframe ID the store will hand out or accept on import
pub const MAX_ID: u64 = u64::MAX - 1;

/// Take the next ID from a counter, or `None` once it has run out
fn allocate(counter: &mut u64) -> Option<u64> {
    if *counter > MAX_ID {
        return None;
    }
    let id = *counter;
    *counter += 1;
    Some(id)
}

/// Name, colour and spawn point used by [`EntityStore::add_dancer`]
#[derive(Debug, Clone, PartialEq)]
pub struct DancerDefaults {
    /// Colour of new dancers
    pub color: String,
    /// Where new dancers appear
    pub spawn: Position,
}

impl Default for DancerDefaults {
    fn default() -> Self {
        Self {
            color: "#000000".to_string(),
            spawn: Position::new(400.0, 300.0),
        }
    }
}

/// Canonical list of dancers and ordered list of keyframes
#[derive(Debug, Clone)]
pub struct EntityStore {
    dancers: Vec<Dancer>,
    keyframes: Vec<Keyframe>,
    next_dancer_id: u64,
    next_keyframe_id: u64,
    defaults: DancerDefaults,
}

impl EntityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            dancers: Vec::new(),
            keyframes: Vec::new(),
            next_dancer_id: 1,
            next_keyframe_id: 1,
            defaults: DancerDefaults::default(),
        }
    }

    /// Create a store with the given dancers and no keyframes
    pub fn with_dancers(dancers: Vec<Dancer>) -> Self {
        let mut store = Self::new();
        store.replace(dancers, Vec::new());
        store
    }

    /// Set the defaults for new dancers
    pub fn set_defaults(&mut self, defaults: DancerDefaults) {
        self.defaults = defaults;
    }

    /// Get all dancers
    pub fn dancers(&self) -> &[Dancer] {
        &self.dancers
    }

    /// Get a dancer
    pub fn dancer(&self, id: DancerId) -> Option<&Dancer> {
        self.dancers.iter().find(|d| d.id == id)
    }

    fn dancer_mut(&mut self, id: DancerId) -> Option<&mut Dancer> {
        self.dancers.iter_mut().find(|d| d.id == id)
    }

    /// Get all keyframes in playback order
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Get the keyframe at an index
    pub fn keyframe(&self, index: usize) -> Option<&Keyframe> {
        self.keyframes.get(index)
    }

    /// Get keyframe count
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    /// Add a dancer at the spawn point
    ///
    /// Every existing keyframe gains an entry at the spawn point so earlier
    /// formations keep their shape. Returns `None` once dancer IDs have run
    /// out.
    pub fn add_dancer(&mut self) -> Option<DancerId> {
        let Some(id) = allocate(&mut self.next_dancer_id).map(DancerId) else {
            tracing::warn!("Dancer ids exhausted");
            return None;
        };

        let name = format!("Dancer {}", self.dancers.len() + 1);
        let dancer = Dancer::new(id, name, self.defaults.color.clone(), self.defaults.spawn);
        let position = dancer.position();
        self.dancers.push(dancer);

        for kf in &mut self.keyframes {
            kf.positions.insert(id, position);
        }

        tracing::debug!("Added dancer {id}");
        Some(id)
    }

    /// Delete a dancer and strip it from every keyframe
    ///
    /// Returns false if the dancer does not exist.
    pub fn delete_dancer(&mut self, id: DancerId) -> bool {
        let Some(index) = self.dancers.iter().position(|d| d.id == id) else {
            return false;
        };
        self.dancers.remove(index);

        for kf in &mut self.keyframes {
            kf.positions.shift_remove(&id);
        }

        tracing::debug!("Deleted dancer {id}");
        true
    }

    /// Rename a dancer
    pub fn update_name(&mut self, id: DancerId, name: impl Into<String>) -> bool {
        match self.dancer_mut(id) {
            Some(dancer) => {
                dancer.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Recolour a dancer
    pub fn update_color(&mut self, id: DancerId, color: impl Into<String>) -> bool {
        match self.dancer_mut(id) {
            Some(dancer) => {
                dancer.color = color.into();
                true
            }
            None => false,
        }
    }

    /// Move a dancer, optionally snapping to a grid of `snap` units
    pub fn set_position(&mut self, id: DancerId, position: Position, snap: Option<f64>) -> bool {
        let position = match snap {
            Some(cell) => position.snapped(cell),
            None => position,
        };
        match self.dancer_mut(id) {
            Some(dancer) => {
                dancer.set_position(position);
                true
            }
            None => false,
        }
    }

    /// Apply a keyframe's positions to the dancers it mentions
    ///
    /// Dancers absent from the keyframe keep their current position.
    pub fn apply_keyframe(&mut self, index: usize) -> bool {
        let Some(kf) = self.keyframes.get(index) else {
            return false;
        };
        for dancer in &mut self.dancers {
            if let Some(position) = kf.positions.get(&dancer.id) {
                dancer.set_position(*position);
            }
        }
        true
    }

    /// Snapshot the current dancer positions into a new keyframe at the end
    /// of the sequence
    ///
    /// Returns the index of the new keyframe, or `None` once keyframe IDs
    /// have run out.
    pub fn capture_keyframe(&mut self, duration: f64) -> Option<usize> {
        let id = self.allocate_keyframe_id()?;
        self.keyframes.push(Keyframe::capture(id, &self.dancers, duration));
        let index = self.keyframes.len() - 1;
        tracing::debug!("Captured keyframe {id} at index {index}");
        Some(index)
    }

    /// Capture with the default duration
    pub fn capture_default(&mut self) -> Option<usize> {
        self.capture_keyframe(DEFAULT_DURATION_MS)
    }

    /// Remove the keyframe at an index
    pub fn remove_keyframe(&mut self, index: usize) -> Option<Keyframe> {
        if index < self.keyframes.len() {
            Some(self.keyframes.remove(index))
        } else {
            None
        }
    }

    /// Set the transition duration of the keyframe at an index, in milliseconds
    pub fn set_keyframe_duration(&mut self, index: usize, duration: f64) -> bool {
        match self.keyframes.get_mut(index) {
            Some(kf) => {
                kf.duration = duration;
                true
            }
            None => false,
        }
    }

    /// Allocate a keyframe ID from the store counter
    pub fn allocate_keyframe_id(&mut self) -> Option<KeyframeId> {
        let id = allocate(&mut self.next_keyframe_id).map(KeyframeId);
        if id.is_none() {
            tracing::warn!("Keyframe ids exhausted");
        }
        id
    }

    /// Replace all dancers and keyframes
    ///
    /// ID counters move past every incoming ID and never move back, so IDs
    /// stay unique for the whole session. An incoming ID above [`MAX_ID`]
    /// leaves that counter exhausted.
    pub fn replace(&mut self, dancers: Vec<Dancer>, keyframes: Vec<Keyframe>) {
        if let Some(max) = dancers.iter().map(|d| d.id.0).max() {
            self.next_dancer_id = self.next_dancer_id.max(max.saturating_add(1));
        }
        if let Some(max) = keyframes.iter().map(|k| k.id.0).max() {
            self.next_keyframe_id = self.next_keyframe_id.max(max.saturating_add(1));
        }
        self.dancers = dancers;
        self.keyframes = keyframes;
    }

    /// Smallest keyframe ID the store will hand out next
    pub fn next_keyframe_id(&self) -> KeyframeId {
        KeyframeId(self.next_keyframe_id)
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}
