//! Frame-stepping playback state.

use std::fmt;

/// Whether playback is advancing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    /// The current frame stays put.
    #[default]
    Paused,
    /// Each tick advances one frame, wrapping at the end.
    Playing,
}

impl PlaybackState {
    /// Check if playback is advancing.
    #[must_use]
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// The other state.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Paused => Self::Playing,
            Self::Playing => Self::Paused,
        }
    }
}

/// Playback position and state over a trajectory of `frame_count` frames.
///
/// The current frame always lies in `[0, frame_count - 1]`. With zero frames
/// playback is disabled: every operation is a no-op and the state stays
/// [`PlaybackState::Paused`].
///
/// # Example
///
/// ```
/// use trajectory_playback::{PlaybackController, PlaybackState};
///
/// let mut playback = PlaybackController::new(10);
/// playback.toggle();
/// for _ in 0..15 {
///     playback.tick();
/// }
/// assert_eq!(playback.current_frame(), 5);
/// assert_eq!(playback.state(), PlaybackState::Playing);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackController {
    frame_count: usize,
    current: usize,
    state: PlaybackState,
}

impl PlaybackController {
    /// Paused at frame 0.
    #[must_use]
    pub const fn new(frame_count: usize) -> Self {
        Self {
            frame_count,
            current: 0,
            state: PlaybackState::Paused,
        }
    }

    /// Number of frames under control.
    #[must_use]
    pub const fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Check if there is anything to play.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.frame_count > 0
    }

    /// Current frame index.
    #[must_use]
    pub const fn current_frame(&self) -> usize {
        self.current
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    /// Switch between playing and paused. Returns the new state.
    pub fn toggle(&mut self) -> PlaybackState {
        if self.is_enabled() {
            self.state = self.state.toggled();
        }
        self.state
    }

    /// Jump to `frame`, clamped into range. The state is unchanged.
    ///
    /// Returns the frame actually selected.
    pub fn seek(&mut self, frame: i64) -> usize {
        if !self.is_enabled() {
            return self.current;
        }
        let last = self.frame_count - 1;
        self.current = usize::try_from(frame).map_or(0, |f| f.min(last));
        self.current
    }

    /// Back to frame 0, paused.
    pub fn reset(&mut self) {
        self.current = 0;
        self.state = PlaybackState::Paused;
    }

    /// Advance one frame while playing, wrapping after the last frame.
    ///
    /// Returns true if the frame changed.
    pub fn tick(&mut self) -> bool {
        if !self.state.is_playing() || !self.is_enabled() {
            return false;
        }
        let next = (self.current + 1) % self.frame_count;
        let changed = next != self.current;
        self.current = next;
        changed
    }
}

/// Ratio between the render-loop rate and the capture frame rate.
///
/// Playback advances one trajectory frame per rendered frame, so a 60 Hz
/// display replays a 12 fps capture five times faster than real time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayRate {
    /// Render-loop rate in Hz.
    pub display_rate_hz: f64,
    /// Capture frame rate.
    pub capture_fps: f64,
}

impl ReplayRate {
    /// Pair a display rate with a capture rate.
    #[must_use]
    pub const fn new(display_rate_hz: f64, capture_fps: f64) -> Self {
        Self {
            display_rate_hz,
            capture_fps,
        }
    }

    /// Playback speed relative to real time.
    #[must_use]
    pub fn speedup(&self) -> f64 {
        self.display_rate_hz / self.capture_fps
    }

    /// Check if the speedup differs from 1 by more than `tolerance`.
    #[must_use]
    pub fn diverges(&self, tolerance: f64) -> bool {
        (self.speedup() - 1.0).abs() > tolerance
    }
}

impl fmt::Display for ReplayRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} Hz display over {:.1} fps capture ({:.2}x)",
            self.display_rate_hz,
            self.capture_fps,
            self.speedup()
        )
    }
}
