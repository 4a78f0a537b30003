// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe sequencer for the Formation Editor.
//!
//! This crate provides choreography sequencing for dancers on a 2D stage:
//! - Dancer and formation (keyframe) data model
//! - Keyframe capture from the current stage
//! - Timeline navigation with previous/next/jump
//! - Time-stepped linear transitions between formations
//! - Ghost overlay of the previous positions
//! - JSON show import/export
//!
//! ## Architecture
//!
//! [`FormationEditor`] is the session entry point. It owns an
//! [`EntityStore`], a [`TimelineNavigator`], a [`GhostTracker`] and at most
//! one in-flight [`Transition`], which the host advances once per frame with
//! [`FormationEditor::advance`].

pub mod dancer;
pub mod document;
pub mod editor;
pub mod error;
pub mod ghost;
pub mod keyframe;
pub mod palette;
pub mod settings;
pub mod store;
pub mod timeline;
pub mod transition;

pub use dancer::{starter_cast, Dancer, DancerId, Position};
pub use document::{export_state, import_state, KeyframeRecord, PositionRecord, ShowDocument, SHOW_FILE_NAME};
pub use editor::FormationEditor;
pub use error::{Result, SequencerError};
pub use ghost::GhostTracker;
pub use keyframe::{formation_label, Interpolation, Keyframe, KeyframeId, DEFAULT_DURATION_MS, DURATION_STEP_SECONDS};
pub use palette::ColorPalette;
pub use settings::{EditorSettings, SETTINGS_FILE_NAME};
pub use store::{DancerDefaults, EntityStore, MAX_ID};
pub use timeline::{Navigation, TimelineNavigator};
pub use transition::{DancerPath, Transition, TransitionFrame};
