// SPDX-License-Identifier: MIT OR Apache-2.0
//! Real-time playback driver.
//!
//! Steps a [`FormationEditor`] through every formation, feeding each
//! transition the time a [`FrameSource`] reports between frames.

use formation_sequencer::{formation_label, FormationEditor, Navigation};
use std::time::{Duration, Instant};

/// Source of frame deltas for playback
pub trait FrameSource {
    /// Start timing a new transition
    fn restart(&mut self);

    /// Wait for the next frame and return the milliseconds since the previous one
    fn tick(&mut self) -> f64;
}

/// Fixed-rate wall-clock frame source
pub struct FrameClock {
    frame: Duration,
    last: Instant,
}

impl FrameClock {
    /// Create a clock ticking at `fps` frames per second
    pub fn new(fps: u32) -> Self {
        Self {
            frame: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            last: Instant::now(),
        }
    }
}

impl FrameSource for FrameClock {
    fn restart(&mut self) {
        self.last = Instant::now();
    }

    fn tick(&mut self) -> f64 {
        let due = self.last + self.frame;
        let now = Instant::now();
        if due > now {
            std::thread::sleep(due - now);
        }
        let now = Instant::now();
        let delta = now.duration_since(self.last);
        self.last = now;
        delta.as_secs_f64() * 1000.0
    }
}

/// Summary of a playback run
#[derive(Debug, Default)]
pub struct PlaybackReport {
    /// Transitions played
    pub transitions: usize,
    /// Frames rendered across all transitions
    pub frames: u64,
}

/// Play every transition from the first formation to the last
pub fn play_all(
    editor: &mut FormationEditor,
    clock: &mut impl FrameSource,
    speed: f64,
) -> PlaybackReport {
    let mut report = PlaybackReport::default();
    if editor.jump_to(0) != Navigation::Jumped {
        tracing::warn!("Show has no formations to play");
        return report;
    }
    tracing::info!("At {}", formation_label(0));

    loop {
        match editor.next() {
            Navigation::TransitionStarted => {}
            outcome => {
                tracing::debug!("Playback stopped: {outcome:?}");
                break;
            }
        }

        clock.restart();
        while editor.is_playing() {
            let delta = clock.tick() * speed;
            if let Some(frame) = editor.advance(delta) {
                report.frames += 1;
                tracing::trace!("t = {:.3}", frame.t);
            }
        }

        report.transitions += 1;
        if let Some(index) = editor.current_index() {
            tracing::info!("Reached {}", formation_label(index));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use formation_sequencer::{DancerId, EditorSettings};

    /// Frame source that advances by a fixed step without waiting
    struct FixedStep {
        step_ms: f64,
        restarts: usize,
    }

    impl FixedStep {
        fn new(step_ms: f64) -> Self {
            Self { step_ms, restarts: 0 }
        }
    }

    impl FrameSource for FixedStep {
        fn restart(&mut self) {
            self.restarts += 1;
        }

        fn tick(&mut self) -> f64 {
            self.step_ms
        }
    }

    /// Starter cast over three formations, 1000ms per transition
    fn three_formations() -> FormationEditor {
        let mut settings = EditorSettings::default();
        settings.snap_to_grid = false;
        let mut editor = FormationEditor::with_starter_cast(settings);
        editor.capture_keyframe();
        editor.drag_dancer(DancerId(1), 10.0, 20.0);
        editor.capture_keyframe();
        editor.drag_dancer(DancerId(1), 30.0, 40.0);
        editor.capture_keyframe();
        editor
    }

    #[test]
    fn test_play_all_reaches_last_formation() {
        let mut editor = three_formations();
        let report = play_all(&mut editor, &mut FixedStep::new(100.0), 1.0);

        assert_eq!(report.transitions, 2);
        // 10 frames of 100ms per 1000ms transition
        assert_eq!(report.frames, 20);
        assert_eq!(editor.current_index(), Some(2));
        assert!(!editor.is_playing());
        let alex = editor.dancer(DancerId(1)).unwrap();
        assert_eq!((alex.x, alex.y), (30.0, 40.0));
    }

    #[test]
    fn test_speed_scales_frame_deltas() {
        let mut editor = three_formations();
        let mut clock = FixedStep::new(100.0);
        let report = play_all(&mut editor, &mut clock, 2.5);

        assert_eq!(report.transitions, 2);
        assert_eq!(report.frames, 8);
        assert_eq!(clock.restarts, 2);
        assert_eq!(editor.current_index(), Some(2));
    }

    #[test]
    fn test_frame_clock_waits_one_frame() {
        let mut clock = FrameClock::new(1000);
        clock.restart();
        assert!(clock.tick() >= 0.999);
    }

    #[test]
    fn test_play_all_without_formations() {
        let mut editor = FormationEditor::default();
        let mut clock = FixedStep::new(16.0);
        let report = play_all(&mut editor, &mut clock, 1.0);
        assert_eq!(clock.restarts, 0);
        assert_eq!(report.transitions, 0);
        assert_eq!(report.frames, 0);
    }
}
