// Frame timing
//
// The game advances once per rendered frame by the wall-clock time since the
// previous frame. Frames per second are counted over whole seconds so the
// window title can show a steady number.

use std::time::{Duration, Instant};

/// Longest step the game takes in one frame (seconds), so a stalled
/// window (drag, minimise) does not fling the player across the map
pub const MAX_FRAME_DELTA: f32 = 0.25;

const FPS_SAMPLE_WINDOW: Duration = Duration::from_secs(1);

/// Per-frame timing state
pub struct FrameClock {
    /// Time of last frame
    last_frame_time: Instant,

    /// Start of the current FPS sampling window
    window_start: Instant,

    /// Frames seen in the current sampling window
    window_frames: u32,

    /// Current frame number
    frame_count: u64,

    /// Frames counted in the last completed sampling window
    current_fps: u32,
}

impl FrameClock {
    /// Create a new frame clock
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame_time: now,
            window_start: now,
            window_frames: 0,
            frame_count: 0,
            current_fps: 0,
        }
    }

    /// Begin a new frame, returning the seconds elapsed since the last one
    pub fn begin_frame(&mut self) -> f32 {
        self.begin_frame_at(Instant::now())
    }

    fn begin_frame_at(&mut self, now: Instant) -> f32 {
        let frame_time = now.saturating_duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.frame_count += 1;
        self.window_frames += 1;

        if now.saturating_duration_since(self.window_start) >= FPS_SAMPLE_WINDOW {
            self.current_fps = self.window_frames;
            self.window_frames = 0;
            self.window_start = now;
        }

        frame_time.as_secs_f32().min(MAX_FRAME_DELTA)
    }

    /// True on the frame a new FPS sample became available
    pub fn fps_updated(&self) -> bool {
        self.window_frames == 0 && self.frame_count > 0
    }

    /// Frames rendered during the last full second
    pub fn fps(&self) -> u32 {
        self.current_fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock_creation() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame_count, 0);
        assert_eq!(clock.fps(), 0);
        assert!(!clock.fps_updated());
    }

    #[test]
    fn test_frame_counting() {
        let mut clock = FrameClock::new();
        clock.begin_frame();
        assert_eq!(clock.frame_count, 1);

        clock.begin_frame();
        assert_eq!(clock.frame_count, 2);
    }

    #[test]
    fn test_delta_is_measured() {
        let mut clock = FrameClock::new();
        let start = clock.last_frame_time;

        let dt = clock.begin_frame_at(start + Duration::from_millis(20));
        assert!((dt - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut clock = FrameClock::new();
        let start = clock.last_frame_time;

        let dt = clock.begin_frame_at(start + Duration::from_secs(3));
        assert_eq!(dt, MAX_FRAME_DELTA);
    }

    #[test]
    fn test_fps_counted_per_second() {
        let mut clock = FrameClock::new();
        let start = clock.last_frame_time;

        for i in 1..=50 {
            clock.begin_frame_at(start + Duration::from_millis(i * 20));
            if i < 50 {
                assert!(!clock.fps_updated());
            }
        }

        // 50 frames * 20ms closes the first one-second window
        assert_eq!(clock.fps(), 50);
        assert!(clock.fps_updated());
    }
}
