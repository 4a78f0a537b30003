// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the sequencer.
//!
//! Only hard failures live here. Commands that reference a missing dancer,
//! step past the end of the sequence or arrive while a transition is running
//! are reported through their return values instead.

use thiserror::Error;

/// Sequencer errors
#[derive(Debug, Error)]
pub enum SequencerError {
    /// Show payload is malformed or lacks a required list
    #[error("Invalid show format: {0}")]
    InvalidFormat(String),

    /// The show cannot be replaced while a transition is in flight
    #[error("A formation transition is still playing")]
    PlaybackActive,

    /// Settings file could not be used
    #[error("Settings error: {0}")]
    Settings(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SequencerError {
    /// Build an [`SequencerError::InvalidFormat`] from any message
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }
}

impl From<serde_json::Error> for SequencerError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidFormat(err.to_string())
    }
}

/// Result type for sequencer operations
pub type Result<T> = std::result::Result<T, SequencerError>;
