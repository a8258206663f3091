//! Frame rate counter
//!
//! Counts ticks and reports how many happened in each whole second of
//! accumulated tick time.

/// Counts frames per second from per-frame delta times
#[derive(Debug, Clone, Default)]
pub struct FrameRateCounter {
    frames: u32,
    clock: f64,
    window_start: f64,
    last_fps: Option<u32>,
}

impl FrameRateCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one frame that took `dt` seconds
    ///
    /// Returns the frame count of the second that just completed, if any.
    pub fn tick(&mut self, dt: f32) -> Option<u32> {
        if dt.is_finite() && dt > 0.0 {
            self.clock += dt as f64;
        }
        self.frames += 1;

        if self.clock > self.window_start + 1.0 {
            let fps = self.frames;
            self.window_start += 1.0;
            self.frames = 0;
            self.last_fps = Some(fps);
            tracing::debug!("FPS: {}", fps);
            return Some(fps);
        }
        None
    }

    /// Frame count of the most recently completed second
    pub fn last_fps(&self) -> Option<u32> {
        self.last_fps
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
