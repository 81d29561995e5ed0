//! Core engine implementation
//!
//! [`MainLoop`] runs one [`Scene`] at a time at a fixed frame rate and swaps
//! it when the scene hands over to another one.

use crate::audio::AudioAssetStore;
use crate::events::close_requested;
use crate::foundation::time::FrameClock;
use crate::render::{Canvas, Display, RenderError};
use crate::scene::Scene;

/// Why the main loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The window asked to close
    CloseRequested,
    /// The active scene stopped running without naming a successor
    SceneFinished,
}

/// Fixed frame rate scene runner
pub struct MainLoop {
    fps: u32,
    clock: FrameClock,
}

impl MainLoop {
    /// Create a loop targeting `fps` frames per second (0 runs unthrottled)
    pub fn new(fps: u32) -> Self {
        Self {
            fps,
            clock: FrameClock::new(),
        }
    }

    /// Target frame rate
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Frame timing of the last run
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Run `first` and its successors until the window closes or a scene
    /// finishes
    ///
    /// Every frame drains the display's events, lets the scene handle them,
    /// advances it, draws it and presents the result. A close request ends
    /// the loop before the scene sees the frame's events. Display failures
    /// are returned to the caller.
    pub fn run(
        &mut self,
        display: &mut dyn Display,
        audio: &mut AudioAssetStore,
        first: Box<dyn Scene>,
    ) -> Result<ExitReason, RenderError> {
        let mut scene = first;
        log::info!("Entering scene '{}'", scene.name());
        scene.enter(audio);

        let (width, height) = display.size();
        let mut canvas = Canvas::new(width, height);

        while scene.is_running() {
            let dt = self.clock.tick(self.fps);

            let events = display.poll_events();
            if close_requested(&events) {
                log::info!("Close requested in scene '{}'", scene.name());
                scene.cleanup(audio);
                self.log_timing();
                return Ok(ExitReason::CloseRequested);
            }

            scene.handle_events(&events, audio);
            scene.update(dt, audio);

            let (width, height) = display.size();
            if (canvas.width(), canvas.height()) != (width, height) {
                canvas.resize(width, height);
            }
            scene.draw(&mut canvas);
            display.present(&canvas)?;

            if let Some(mut next) = scene.take_next_scene() {
                log::info!("Switching scene '{}' -> '{}'", scene.name(), next.name());
                scene.cleanup(audio);
                next.enter(audio);
                scene = next;
            }
        }

        log::info!("Scene '{}' finished", scene.name());
        scene.cleanup(audio);
        self.log_timing();
        Ok(ExitReason::SceneFinished)
    }

    fn log_timing(&self) {
        log::debug!(
            "Main loop ran {} frames in {:.2}s ({:.1} fps average)",
            self.clock.frame_count(),
            self.clock.total_time(),
            self.clock.average_fps()
        );
    }
}
