// SPDX-License-Identifier: MIT OR Apache-2.0
//! Show exchange format.
//!
//! A show is stored as JSON with two top-level lists:
//!
//! ```json
//! {
//!   "dancers": [{ "id": 1, "name": "Alex", "color": "#e74c3c", "x": 150, "y": 200 }],
//!   "keyframes": [{ "id": 1, "duration": 1000, "positions": [{ "id": 1, "x": 150, "y": 200 }] }]
//! }
//! ```
//!
//! Both lists are required on import and always written on export.

use crate::dancer::{Dancer, DancerId, Position};
use crate::error::{Result, SequencerError};
use crate::keyframe::{Keyframe, KeyframeId, DEFAULT_DURATION_MS};
use crate::store::MAX_ID;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Default file name for saved shows
pub const SHOW_FILE_NAME: &str = "formation.json";

/// One dancer position inside a keyframe record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    /// Dancer ID
    pub id: DancerId,
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

/// A keyframe as stored in a show file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeRecord {
    /// Keyframe ID
    ///
    /// Older files stored wall-clock floats here, so any JSON number (or
    /// nothing) is accepted on import.
    #[serde(default)]
    pub id: Option<serde_json::Number>,
    /// Transition time in milliseconds
    #[serde(default = "default_duration")]
    pub duration: f64,
    /// Dancer positions
    #[serde(default)]
    pub positions: Vec<PositionRecord>,
}

fn default_duration() -> f64 {
    DEFAULT_DURATION_MS
}

impl From<&Keyframe> for KeyframeRecord {
    fn from(kf: &Keyframe) -> Self {
        Self {
            id: Some(kf.id.0.into()),
            duration: kf.duration,
            positions: kf
                .positions
                .iter()
                .map(|(id, p)| PositionRecord { id: *id, x: p.x, y: p.y })
                .collect(),
        }
    }
}

/// A complete show: dancers plus the keyframe sequence
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ShowDocument {
    /// Dancers in display order
    pub dancers: Vec<Dancer>,
    /// Keyframes in playback order
    pub keyframes: Vec<KeyframeRecord>,
}

/// Shape used while parsing, so missing lists can be reported by name
#[derive(Deserialize)]
struct RawDocument {
    dancers: Option<Vec<Dancer>>,
    keyframes: Option<Vec<KeyframeRecord>>,
}

impl ShowDocument {
    /// Build a document from the store contents
    pub fn from_state(dancers: &[Dancer], keyframes: &[Keyframe]) -> Self {
        Self {
            dancers: dancers.to_vec(),
            keyframes: keyframes.iter().map(KeyframeRecord::from).collect(),
        }
    }

    /// Parse a document, requiring both lists
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let raw: RawDocument = serde_json::from_slice(bytes)?;
        match (raw.dancers, raw.keyframes) {
            (Some(dancers), Some(keyframes)) => Ok(Self { dancers, keyframes }),
            (None, Some(_)) => Err(SequencerError::invalid_format("missing `dancers` list")),
            (Some(_), None) => Err(SequencerError::invalid_format("missing `keyframes` list")),
            (None, None) => Err(SequencerError::invalid_format(
                "missing `dancers` and `keyframes` lists",
            )),
        }
    }

    /// Serialize as pretty JSON
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Convert into store data
    ///
    /// Integer keyframe IDs are kept. IDs that are missing, fractional,
    /// negative or repeated are replaced with fresh IDs starting at `next_id`
    /// and above every kept ID. Fails if any ID is above [`MAX_ID`] or the
    /// fresh IDs would run past it.
    pub fn into_parts(self, next_id: KeyframeId) -> Result<(Vec<Dancer>, Vec<Keyframe>)> {
        if let Some(dancer) = self.dancers.iter().find(|d| d.id.0 > MAX_ID) {
            return Err(SequencerError::invalid_format(format!(
                "dancer id {} is out of range",
                dancer.id
            )));
        }

        let kept: Vec<Option<u64>> = {
            let mut seen = HashSet::new();
            self.keyframes
                .iter()
                .map(|record| {
                    record
                        .id
                        .as_ref()
                        .and_then(serde_json::Number::as_u64)
                        .filter(|id| seen.insert(*id))
                })
                .collect()
        };
        if let Some(id) = kept.iter().flatten().find(|id| **id > MAX_ID) {
            return Err(SequencerError::invalid_format(format!(
                "keyframe id {id} is out of range"
            )));
        }

        // Kept IDs are at most MAX_ID, so `+ 1` cannot overflow
        let mut fresh = kept.iter().flatten().map(|id| id + 1).fold(next_id.0, u64::max);

        let mut keyframes = Vec::with_capacity(self.keyframes.len());
        for (record, kept_id) in self.keyframes.into_iter().zip(kept) {
            let id = match kept_id {
                Some(id) => KeyframeId(id),
                None => {
                    if fresh > MAX_ID {
                        return Err(SequencerError::invalid_format(
                            "no keyframe ids left to renumber legacy keyframes",
                        ));
                    }
                    let id = KeyframeId(fresh);
                    fresh += 1;
                    tracing::warn!("Reassigned keyframe id {:?} to {id}", record.id);
                    id
                }
            };
            let mut kf = Keyframe::new(id, record.duration);
            for p in record.positions {
                kf.positions.insert(p.id, Position::new(p.x, p.y));
            }
            keyframes.push(kf);
        }

        Ok((self.dancers, keyframes))
    }

    /// Load a document from a file
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let document = Self::from_slice(&bytes)?;
        tracing::info!(
            "Loaded show from {} ({} dancers, {} keyframes)",
            path.display(),
            document.dancers.len(),
            document.keyframes.len()
        );
        Ok(document)
    }

    /// Save the document to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_vec()?)?;
        tracing::info!("Saved show to {}", path.display());
        Ok(())
    }
}

/// Serialize dancers and keyframes to the exchange format
pub fn export_state(dancers: &[Dancer], keyframes: &[Keyframe]) -> Result<Vec<u8>> {
    ShowDocument::from_state(dancers, keyframes).to_vec()
}

/// Parse the exchange format into dancers and keyframes
///
/// Keyframe IDs that cannot be kept are numbered from `next_id`.
pub fn import_state(bytes: &[u8], next_id: KeyframeId) -> Result<(Vec<Dancer>, Vec<Keyframe>)> {
    ShowDocument::from_slice(bytes)?.into_parts(next_id)
}
