use std::thread;
use std::time::Duration;

/// Suspension points of the roll state machine.
///
/// The driver yields once per committed pose so the drawing layer sees pips
/// at a stable coordinate before a slide begins, and waits out the animated
/// phase so cycles never overlap. Injectable so tests can run the whole state
/// machine without real delays.
pub trait Scheduler {
    /// Yield one frame boundary to the drawing layer.
    fn next_frame(&mut self);

    /// Suspend for the given duration.
    fn wait(&mut self, duration: Duration);
}

/// Wall-clock scheduler; frames are fixed-length sleeps
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    frame: Duration,
}

impl FrameScheduler {
    pub fn new() -> Self {
        // ~60fps frame boundary
        Self { frame: Duration::from_millis(16) }
    }

    pub fn with_frame(frame: Duration) -> Self {
        Self { frame }
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for FrameScheduler {
    fn next_frame(&mut self) {
        thread::sleep(self.frame);
    }

    fn wait(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Scheduler that never sleeps.
///
/// For tests, and for drivers whose surface performs its own timed tween
/// inside `commit` and would otherwise pay every wait twice.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn next_frame(&mut self) {}

    fn wait(&mut self, _duration: Duration) {}
}
