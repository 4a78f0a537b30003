// SPDX-License-Identifier: MIT OR Apache-2.0
//! Formation editor session.
//!
//! [`FormationEditor`] wires the store, navigator, ghost tracker and the
//! active transition together. It is the single entry point for user
//! intents, and it enforces the playback lock: while a transition is in
//! flight only the transition moves dancers.

use crate::dancer::{starter_cast, Dancer, DancerId, Position};
use crate::document::{export_state, import_state, ShowDocument};
use crate::error::{Result, SequencerError};
use crate::ghost::GhostTracker;
use crate::keyframe::{Keyframe, KeyframeId};
use crate::settings::EditorSettings;
use crate::store::EntityStore;
use crate::timeline::{Navigation, TimelineNavigator};
use crate::transition::{Transition, TransitionFrame};
use std::path::Path;

/// An editing session over one show
#[derive(Debug, Clone)]
pub struct FormationEditor {
    store: EntityStore,
    navigator: TimelineNavigator,
    ghost: GhostTracker,
    transition: Option<Transition>,
    settings: EditorSettings,
    selected: Option<DancerId>,
}

impl FormationEditor {
    /// Create an editor over an empty show
    pub fn new(settings: EditorSettings) -> Self {
        let mut store = EntityStore::new();
        store.set_defaults(settings.dancer_defaults());
        Self {
            store,
            navigator: TimelineNavigator::new(),
            ghost: GhostTracker::new(),
            transition: None,
            settings,
            selected: None,
        }
    }

    /// Create an editor over the starter cast
    pub fn with_starter_cast(settings: EditorSettings) -> Self {
        let mut editor = Self::new(settings);
        editor.store.replace(starter_cast(), Vec::new());
        editor
    }

    /// Editor settings
    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Replace the editor settings
    pub fn set_settings(&mut self, settings: EditorSettings) {
        self.store.set_defaults(settings.dancer_defaults());
        self.settings = settings;
    }

    /// All dancers
    pub fn dancers(&self) -> &[Dancer] {
        self.store.dancers()
    }

    /// Get a dancer
    pub fn dancer(&self, id: DancerId) -> Option<&Dancer> {
        self.store.dancer(id)
    }

    /// All keyframes in playback order
    pub fn keyframes(&self) -> &[Keyframe] {
        self.store.keyframes()
    }

    /// Index of the current keyframe
    pub fn current_index(&self) -> Option<usize> {
        self.navigator.current_index()
    }

    /// ID of the current keyframe
    pub fn current_keyframe_id(&self) -> Option<KeyframeId> {
        self.navigator.current_keyframe_id()
    }

    /// Check if a transition is playing
    pub fn is_playing(&self) -> bool {
        self.navigator.is_playing()
    }

    /// The in-flight transition
    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// Ghost overlay
    pub fn ghost(&self) -> &GhostTracker {
        &self.ghost
    }

    /// Selected dancer
    pub fn selected(&self) -> Option<DancerId> {
        self.selected
    }

    /// Select a dancer, or clear the selection
    pub fn select(&mut self, id: Option<DancerId>) -> bool {
        match id {
            Some(id) if self.store.dancer(id).is_none() => false,
            _ => {
                self.selected = id;
                true
            }
        }
    }

    // Dancers

    /// Add a dancer at the spawn point
    ///
    /// Returns `None` once dancer IDs have run out.
    pub fn add_dancer(&mut self) -> Option<DancerId> {
        self.store.add_dancer()
    }

    /// Delete a dancer
    ///
    /// Confirmation is the caller's concern.
    pub fn delete_dancer(&mut self, id: DancerId) -> bool {
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.store.delete_dancer(id)
    }

    /// Rename a dancer
    pub fn update_name(&mut self, id: DancerId, name: impl Into<String>) -> bool {
        self.store.update_name(id, name)
    }

    /// Recolour a dancer
    pub fn update_color(&mut self, id: DancerId, color: impl Into<String>) -> bool {
        self.store.update_color(id, color)
    }

    /// Move a dancer in response to a drag, snapping if enabled
    ///
    /// Rejected while a transition is playing.
    pub fn drag_dancer(&mut self, id: DancerId, x: f64, y: f64) -> bool {
        if self.is_playing() {
            tracing::warn!("Ignoring drag of dancer {id} during playback");
            return false;
        }
        self.store.set_position(id, Position::new(x, y), self.settings.snap())
    }

    // Keyframes

    /// Capture the current positions as a new keyframe at the end of the
    /// sequence and make it current
    ///
    /// Returns the new keyframe's index, or `None` while a transition is
    /// playing or once keyframe IDs have run out.
    pub fn capture_keyframe(&mut self) -> Option<usize> {
        if self.is_playing() {
            tracing::warn!("Ignoring capture during playback");
            return None;
        }
        let index = self.store.capture_keyframe(self.settings.default_duration_ms)?;
        self.ghost.record(self.store.dancers());
        self.navigator.set_current(index, self.store.keyframes());
        Some(index)
    }

    /// Delete the keyframe at an index and re-anchor the navigator
    ///
    /// Confirmation is the caller's concern.
    pub fn delete_keyframe(&mut self, index: usize) -> bool {
        if self.is_playing() {
            tracing::warn!("Ignoring keyframe deletion during playback");
            return false;
        }
        match self.store.remove_keyframe(index) {
            Some(removed) => {
                self.navigator.keyframe_removed(index, self.store.keyframes());
                tracing::debug!("Deleted keyframe {} at index {index}", removed.id);
                true
            }
            None => false,
        }
    }

    /// Set the transition duration of a keyframe, in milliseconds
    pub fn set_keyframe_duration(&mut self, index: usize, duration_ms: f64) -> bool {
        if self.is_playing() {
            return false;
        }
        self.store.set_keyframe_duration(index, duration_ms)
    }

    // Navigation

    /// Move the dancers to the keyframe at `index` immediately
    pub fn jump_to(&mut self, index: usize) -> Navigation {
        let outcome = self.navigator.check_jump(index, self.store.keyframe_count());
        if outcome != Navigation::Jumped {
            tracing::debug!("Jump to {index} rejected: {outcome:?}");
            return outcome;
        }

        self.ghost.record(self.store.dancers());
        self.navigator.set_current(index, self.store.keyframes());
        self.store.apply_keyframe(index);
        tracing::debug!("Jumped to keyframe {index}");
        outcome
    }

    /// Start an animated transition to the next keyframe
    ///
    /// The current index advances once the transition finishes; drive it
    /// with [`FormationEditor::advance`].
    pub fn next(&mut self) -> Navigation {
        let outcome = self.navigator.check_next(self.store.keyframe_count());
        if outcome != Navigation::TransitionStarted {
            tracing::debug!("Next rejected: {outcome:?}");
            return outcome;
        }
        let Some(from_index) = self.navigator.current_index() else {
            return Navigation::NoFurtherFormation;
        };
        let target = from_index + 1;
        let keyframes = self.store.keyframes();
        let to = &keyframes[target];
        let transition = Transition::new(&keyframes[from_index], to, to.transition_ms(), target);

        self.ghost.record(self.store.dancers());
        self.navigator.begin_transition();
        tracing::debug!(
            "Transition {from_index} -> {target} over {}ms",
            transition.duration_ms()
        );
        self.transition = Some(transition);
        outcome
    }

    /// Jump back to the previous keyframe without animation
    pub fn previous(&mut self) -> Navigation {
        let outcome = self.navigator.check_previous();
        if outcome != Navigation::Jumped {
            tracing::debug!("Previous rejected: {outcome:?}");
            return outcome;
        }
        match self.navigator.current_index() {
            Some(index) => self.jump_to(index - 1),
            None => Navigation::NoFurtherFormation,
        }
    }

    /// Advance the in-flight transition by `delta_ms` and write the
    /// resulting positions
    ///
    /// Returns `None` when nothing is playing. On the final frame the
    /// playback lock is released and the navigator moves to the target.
    pub fn advance(&mut self, delta_ms: f64) -> Option<TransitionFrame> {
        let transition = self.transition.as_mut()?;
        let frame = transition.advance(delta_ms);
        for (id, position) in &frame.positions {
            self.store.set_position(*id, *position, None);
        }

        if frame.finished {
            let target = transition.target();
            self.transition = None;
            self.navigator.finish_transition(target, self.store.keyframes());
            tracing::debug!("Transition finished at keyframe {target}");
        }
        Some(frame)
    }

    // Persistence

    /// Serialize the show
    pub fn export_state(&self) -> Result<Vec<u8>> {
        export_state(self.store.dancers(), self.store.keyframes())
    }

    /// Replace the show with a serialized one
    ///
    /// On failure the editor is left untouched.
    pub fn import_state(&mut self, bytes: &[u8]) -> Result<()> {
        if self.is_playing() {
            return Err(SequencerError::PlaybackActive);
        }
        let (dancers, keyframes) = import_state(bytes, self.store.next_keyframe_id())?;
        self.install(dancers, keyframes);
        Ok(())
    }

    /// Save the show to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        ShowDocument::from_state(self.store.dancers(), self.store.keyframes()).save(path)
    }

    /// Load a show from a file
    pub fn load(&mut self, path: &Path) -> Result<()> {
        if self.is_playing() {
            return Err(SequencerError::PlaybackActive);
        }
        let document = ShowDocument::load(path)?;
        let (dancers, keyframes) = document.into_parts(self.store.next_keyframe_id())?;
        self.install(dancers, keyframes);
        Ok(())
    }

    fn install(&mut self, dancers: Vec<Dancer>, keyframes: Vec<Keyframe>) {
        tracing::info!(
            "Installing show with {} dancers and {} keyframes",
            dancers.len(),
            keyframes.len()
        );
        self.store.replace(dancers, keyframes);
        self.navigator.reset(self.store.keyframes());
        self.ghost.record(self.store.dancers());
        self.selected = None;
    }
}

impl Default for FormationEditor {
    fn default() -> Self {
        Self::with_starter_cast(EditorSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MAX_ID;

    fn positions(editor: &FormationEditor) -> Vec<Position> {
        editor.dancers().iter().map(Dancer::position).collect()
    }

    /// Starter cast, K1 as spawned (1000ms), K2 after moving everyone (2000ms)
    fn two_formations() -> FormationEditor {
        let mut settings = EditorSettings::default();
        settings.snap_to_grid = false;
        let mut editor = FormationEditor::with_starter_cast(settings);

        editor.capture_keyframe();
        editor.drag_dancer(DancerId(1), 450.0, 100.0);
        editor.drag_dancer(DancerId(2), 600.0, 500.0);
        editor.drag_dancer(DancerId(3), 25.0, 75.0);
        editor.capture_keyframe();
        editor.set_keyframe_duration(1, 2000.0);
        editor
    }

    #[test]
    fn test_capture_makes_keyframe_current() {
        let mut editor = FormationEditor::default();
        assert_eq!(editor.capture_keyframe(), Some(0));
        assert_eq!(editor.current_index(), Some(0));
        assert_eq!(editor.current_keyframe_id(), Some(editor.keyframes()[0].id));
        assert_eq!(editor.keyframes()[0].duration, 1000.0);

        editor.drag_dancer(DancerId(1), 500.0, 500.0);
        assert_eq!(editor.capture_keyframe(), Some(1));
        assert_eq!(editor.current_keyframe_id(), Some(editor.keyframes()[1].id));
        // Ghost shows where dancers stood before the capture
        assert_eq!(editor.ghost().position(DancerId(1)), Some(Position::new(500.0, 500.0)));
    }

    #[test]
    fn test_drag_snaps_to_grid() {
        let mut editor = FormationEditor::default();
        assert!(editor.drag_dancer(DancerId(1), 176.0, 224.0));
        assert_eq!(editor.dancer(DancerId(1)).unwrap().position(), Position::new(200.0, 200.0));
        assert!(!editor.drag_dancer(DancerId(42), 0.0, 0.0));
    }

    #[test]
    fn test_next_interpolates_midpoint() {
        let mut editor = two_formations();
        let k1 = editor.keyframes()[0].clone();
        let k2 = editor.keyframes()[1].clone();
        assert_eq!(editor.jump_to(0), Navigation::Jumped);

        assert_eq!(editor.next(), Navigation::TransitionStarted);
        assert!(editor.is_playing());
        assert_eq!(editor.current_index(), Some(0));
        let transition = editor.transition().unwrap();
        assert_eq!(transition.target(), 1);
        assert_eq!(transition.duration_ms(), 2000.0);

        let frame = editor.advance(1000.0).unwrap();
        assert_eq!(frame.t, 0.5);
        for dancer in editor.dancers() {
            let a = k1.position(dancer.id).unwrap();
            let b = k2.position(dancer.id).unwrap();
            assert_eq!(dancer.x, (a.x + b.x) / 2.0);
            assert_eq!(dancer.y, (a.y + b.y) / 2.0);
        }
        assert_eq!(editor.current_index(), Some(0));

        let frame = editor.advance(1000.0).unwrap();
        assert!(frame.finished);
        assert!(!editor.is_playing());
        assert_eq!(editor.current_index(), Some(1));
        assert_eq!(editor.current_keyframe_id(), Some(k2.id));
        for dancer in editor.dancers() {
            assert_eq!(Some(dancer.position()), k2.position(dancer.id));
        }
        assert!(editor.transition().is_none());
        assert!(editor.advance(16.0).is_none());
    }

    #[test]
    fn test_first_tick_at_zero_is_from_positions() {
        let mut editor = two_formations();
        editor.jump_to(0);
        editor.drag_dancer(DancerId(1), 0.0, 0.0);
        editor.next();

        editor.advance(0.0);
        let k1 = &editor.keyframes()[0];
        for dancer in editor.dancers() {
            assert_eq!(Some(dancer.position()), k1.position(dancer.id));
        }
    }

    #[test]
    fn test_playback_lock() {
        let mut editor = two_formations();
        editor.jump_to(0);
        editor.next();

        assert_eq!(editor.next(), Navigation::Busy);
        assert_eq!(editor.previous(), Navigation::Busy);
        assert_eq!(editor.jump_to(1), Navigation::Busy);
        assert!(!editor.drag_dancer(DancerId(1), 0.0, 0.0));
        assert_eq!(editor.capture_keyframe(), None);
        assert!(!editor.delete_keyframe(0));
        assert!(!editor.set_keyframe_duration(0, 10.0));

        let bytes = editor.export_state().unwrap();
        assert!(matches!(editor.import_state(&bytes), Err(SequencerError::PlaybackActive)));

        editor.advance(5000.0);
        assert_eq!(editor.previous(), Navigation::Jumped);
        assert_eq!(editor.current_index(), Some(0));
    }

    #[test]
    fn test_next_at_end_is_no_further_formation() {
        let mut editor = FormationEditor::default();
        assert_eq!(editor.next(), Navigation::NoFurtherFormation);
        editor.capture_keyframe();
        assert_eq!(editor.next(), Navigation::NoFurtherFormation);
        assert_eq!(editor.previous(), Navigation::NoFurtherFormation);
        assert_eq!(editor.jump_to(3), Navigation::OutOfRange);
        assert!(!editor.is_playing());
    }

    #[test]
    fn test_previous_jumps_without_animation() {
        let mut editor = two_formations();
        let before = positions(&editor);
        assert_eq!(editor.current_index(), Some(1));

        assert_eq!(editor.previous(), Navigation::Jumped);
        assert!(!editor.is_playing());
        assert_eq!(editor.current_index(), Some(0));
        let k1 = &editor.keyframes()[0];
        for dancer in editor.dancers() {
            assert_eq!(Some(dancer.position()), k1.position(dancer.id));
        }
        let ghost: Vec<_> = editor.ghost().positions().map(|(_, p)| p).collect();
        assert_eq!(ghost, before);
    }

    #[test]
    fn test_added_dancer_follows_its_spawn_entries() {
        let mut editor = two_formations();
        editor.jump_to(0);
        let extra = editor.add_dancer().unwrap();
        editor.drag_dancer(extra, 700.0, 50.0);
        // The new dancer exists in both keyframes at its spawn point
        editor.next();
        editor.advance(500.0);
        assert_eq!(editor.dancer(extra).unwrap().position(), Position::new(400.0, 300.0));
    }

    #[test]
    fn test_delete_keyframe_before_current() {
        let mut editor = two_formations();
        let current = editor.current_keyframe_id();
        assert_eq!(editor.current_index(), Some(1));

        assert!(editor.delete_keyframe(0));
        assert_eq!(editor.current_index(), Some(0));
        assert_eq!(editor.current_keyframe_id(), current);
    }

    #[test]
    fn test_delete_current_last_keyframe() {
        let mut editor = two_formations();
        assert!(editor.delete_keyframe(1));
        assert_eq!(editor.current_index(), Some(0));
        assert_eq!(editor.current_keyframe_id(), Some(editor.keyframes()[0].id));

        assert!(editor.delete_keyframe(0));
        assert_eq!(editor.current_index(), None);
        assert_eq!(editor.current_keyframe_id(), None);
        assert!(!editor.delete_keyframe(0));
    }

    #[test]
    fn test_delete_dancer_cascades_and_clears_selection() {
        let mut editor = two_formations();
        assert!(editor.select(Some(DancerId(2))));
        assert!(editor.delete_dancer(DancerId(2)));
        assert_eq!(editor.selected(), None);
        assert!(editor.keyframes().iter().all(|k| k.position(DancerId(2)).is_none()));
        assert!(!editor.select(Some(DancerId(2))));
    }

    #[test]
    fn test_import_resets_navigation_and_ghost() {
        let source = two_formations();
        let bytes = source.export_state().unwrap();

        let mut editor = FormationEditor::new(EditorSettings::default());
        editor.import_state(&bytes).unwrap();
        assert_eq!(editor.dancers(), source.dancers());
        assert_eq!(editor.keyframes(), source.keyframes());
        assert_eq!(editor.current_index(), Some(0));
        assert_eq!(editor.current_keyframe_id(), Some(source.keyframes()[0].id));
        let ghost: Vec<_> = editor.ghost().positions().map(|(_, p)| p).collect();
        assert_eq!(ghost, positions(&source));

        // New keyframes never collide with imported ones
        editor.capture_keyframe();
        let mut ids: Vec<_> = editor.keyframes().iter().map(|k| k.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_import_empty_show() {
        let mut editor = two_formations();
        editor.import_state(br#"{"dancers": [], "keyframes": []}"#).unwrap();
        assert!(editor.dancers().is_empty());
        assert_eq!(editor.current_index(), None);
        assert_eq!(editor.current_keyframe_id(), None);
    }

    #[test]
    fn test_failed_import_leaves_editor_untouched() {
        let mut editor = two_formations();
        let dancers = editor.dancers().to_vec();
        let keyframes = editor.keyframes().to_vec();
        let current = editor.current_index();

        let err = editor
            .import_state(br#"{"dancers": []}"#)
            .unwrap_err();
        assert!(matches!(err, SequencerError::InvalidFormat(_)));
        assert_eq!(editor.dancers(), dancers.as_slice());
        assert_eq!(editor.keyframes(), keyframes.as_slice());
        assert_eq!(editor.current_index(), current);
    }

    #[test]
    fn test_save_and_load_file() {
        let source = two_formations();
        let path = std::env::temp_dir().join(format!(
            "formation_editor_test_{}.json",
            std::process::id()
        ));
        source.save(&path).unwrap();

        let mut editor = FormationEditor::new(EditorSettings::default());
        editor.load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(editor.dancers(), source.dancers());
        assert_eq!(editor.keyframes(), source.keyframes());
    }

    #[test]
    fn test_changed_settings_apply_to_new_dancers_and_drags() {
        let mut editor = FormationEditor::default();
        let mut settings = editor.settings().clone();
        settings.grid_size = 20.0;
        settings.spawn_position = Position::new(100.0, 120.0);
        settings.default_color = "#9b59b6".to_string();
        editor.set_settings(settings);
        assert_eq!(editor.settings().grid_size, 20.0);

        let id = editor.add_dancer().unwrap();
        let dancer = editor.dancer(id).unwrap();
        assert_eq!(dancer.color, "#9b59b6");
        assert_eq!(dancer.position(), Position::new(100.0, 120.0));

        assert!(editor.drag_dancer(id, 33.0, 49.0));
        assert_eq!(editor.dancer(id).unwrap().position(), Position::new(40.0, 40.0));

        let mut settings = editor.settings().clone();
        settings.snap_to_grid = false;
        editor.set_settings(settings);
        assert!(editor.drag_dancer(id, 33.0, 49.0));
        assert_eq!(editor.dancer(id).unwrap().position(), Position::new(33.0, 49.0));
    }

    #[test]
    fn test_import_of_out_of_range_dancer_id_is_rejected() {
        let mut editor = two_formations();
        let dancers = editor.dancers().to_vec();
        let keyframes = editor.keyframes().to_vec();

        let payload = format!(
            r##"{{"dancers": [{{"id": {}, "name": "A", "color": "#000000", "x": 0, "y": 0}}], "keyframes": []}}"##,
            u64::MAX
        );
        let err = editor.import_state(payload.as_bytes()).unwrap_err();
        assert!(matches!(err, SequencerError::InvalidFormat(_)));
        assert_eq!(editor.dancers(), dancers.as_slice());
        assert_eq!(editor.keyframes(), keyframes.as_slice());
        assert_eq!(editor.add_dancer(), Some(DancerId(4)));
    }

    #[test]
    fn test_add_dancer_after_importing_the_last_id() {
        let mut editor = FormationEditor::new(EditorSettings::default());
        let payload = format!(
            r##"{{"dancers": [{{"id": {MAX_ID}, "name": "A", "color": "#000000", "x": 0, "y": 0}}],
                "keyframes": [{{"id": {MAX_ID}, "duration": 1000, "positions": []}}]}}"##
        );
        editor.import_state(payload.as_bytes()).unwrap();

        assert_eq!(editor.add_dancer(), None);
        assert_eq!(editor.dancers().len(), 1);
        assert_eq!(editor.capture_keyframe(), None);
        assert_eq!(editor.keyframes().len(), 1);
        assert_eq!(editor.current_index(), Some(0));
    }
}
