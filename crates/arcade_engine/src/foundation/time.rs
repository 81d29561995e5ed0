//! Time management utilities

use std::time::{Duration, Instant};

/// Frame limiter for fixed-rate loops
///
/// [`tick`](Self::tick) sleeps until the next frame slot and returns the time
/// since the previous tick, so a loop calling it once per iteration runs at
/// most `fps` times per second.
pub struct FrameClock {
    last_tick: Instant,
    total_time: f32,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a clock whose first frame starts now
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Wait for the next frame slot and return the frame time in seconds
    ///
    /// An `fps` of zero disables the limit.
    pub fn tick(&mut self, fps: u32) -> f32 {
        if fps > 0 {
            let frame = Duration::from_secs_f64(1.0 / f64::from(fps));
            let elapsed = self.last_tick.elapsed();
            if elapsed < frame {
                std::thread::sleep(frame - elapsed);
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).as_secs_f32();
        self.total_time += dt;
        self.last_tick = now;
        self.frame_count += 1;
        dt
    }

    /// Total time across all ticks in seconds
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of ticks so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since the clock was created
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}
