use vitrine_engine::events::HostSignal;

use crate::manager::SceneManager;

/// Per-frame sequencing for a [`SceneManager`].
///
/// Order within a frame: host signals, timers, content completions, one
/// `update`, then queued navigation. A transition requested anywhere in the
/// frame therefore takes effect before the next frame starts.
///
/// Elapsed time comes from the runtime's frame clock.
#[derive(Debug, Default)]
pub struct FrameDriver {
    frames: u64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one frame.
    pub fn frame(&mut self, manager: &mut SceneManager, elapsed_ms: f32, signals: &[HostSignal]) {
        for signal in signals {
            manager.dispatch(*signal);
        }
        manager.advance_timers(elapsed_ms);
        manager.poll_content();
        manager.update(elapsed_ms);
        manager.apply_navigation();

        self.frames += 1;
        log::trace!("frame {} ({elapsed_ms:.2} ms, {} signals)", self.frames, signals.len());
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
