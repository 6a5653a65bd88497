//! Wall-clock frame timing for the window host.
//!
//! The particle engine steps per frame and never reads the clock. Only the
//! springs (orb entrance, cursor) and the fps readout need real time, and they
//! get it from [`FrameClock`].
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//! // each redraw:
//! let dt = clock.tick();
//! cursor.update(dt);
//! window.set_title(&format!("driftfield - {:.0} fps", clock.fps()));
//! ```

use std::time::{Duration, Instant};

/// Largest delta handed out, in seconds. A stall (window drag, breakpoint)
/// turns into one long frame rather than a jump.
pub const MAX_DELTA: f32 = 0.1;

const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Per-frame timing.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    delta: f32,
    elapsed: f32,
    frame: u64,
    fps: f32,
    fps_since: Instant,
    fps_frames: u64,
    paused: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Clock starting now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Clock starting at `now`.
    pub fn starting_at(now: Instant) -> Self {
        Self {
            last: now,
            delta: 0.0,
            elapsed: 0.0,
            frame: 0,
            fps: 0.0,
            fps_since: now,
            fps_frames: 0,
            paused: false,
        }
    }

    /// Mark a new frame at the current instant. Returns the delta in seconds.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Mark a new frame at `now`. Returns the delta in seconds.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let raw = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;
        self.frame += 1;

        self.delta = if self.paused { 0.0 } else { raw.min(MAX_DELTA) };
        self.elapsed += self.delta;

        self.fps_frames += 1;
        let window = now.saturating_duration_since(self.fps_since);
        if window >= FPS_WINDOW {
            self.fps = self.fps_frames as f32 / window.as_secs_f32();
            self.fps_frames = 0;
            self.fps_since = now;
        }

        self.delta
    }

    /// Seconds since the previous frame, clamped to [`MAX_DELTA`]; 0 while paused.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Unpaused seconds accumulated so far.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Frames marked so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Frames per second, averaged over the last half second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Freeze animation time. Frames are still counted.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after [`pause`](Self::pause).
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Flip between paused and running.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Whether animation time is frozen.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_and_elapsed() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let dt = clock.tick_at(start + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-4);
        clock.tick_at(start + Duration::from_millis(32));
        assert_eq!(clock.frame(), 2);
        assert!((clock.elapsed() - 0.032).abs() < 1e-4);
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        assert_eq!(clock.tick_at(start + Duration::from_secs(3)), MAX_DELTA);
    }

    #[test]
    fn test_pause_freezes_elapsed() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        clock.pause();
        assert_eq!(clock.tick_at(start + Duration::from_millis(50)), 0.0);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.frame(), 1);
        clock.toggle_pause();
        assert!(!clock.is_paused());
        assert!(clock.tick_at(start + Duration::from_millis(60)) > 0.0);
    }

    #[test]
    fn test_fps_window() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        for i in 1..=30 {
            clock.tick_at(start + Duration::from_millis(i * 20));
        }
        // 25 frames filled the first 500 ms window.
        assert!((clock.fps() - 50.0).abs() < 0.5);
    }
}
