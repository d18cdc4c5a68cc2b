use alloc::string::String;
use core::time::Duration;
use serde::{Deserialize, Serialize};

/// Play time of a session, only advancing while play is running.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTimer {
    elapsed: Duration,
    running: bool,
}

impl SessionTimer {
    pub const fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
            running: false,
        }
    }

    /// A stopped timer resuming from a saved value.
    pub const fn restored(elapsed: Duration) -> Self {
        Self {
            elapsed,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick(&mut self, delta: Duration) {
        if self.running {
            self.elapsed = self.elapsed.saturating_add(delta);
        }
    }

    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Whole seconds played, truncated.
    pub const fn elapsed_secs(&self) -> u64 {
        self.elapsed.as_secs()
    }

    /// `mm:ss` of the truncated elapsed time, minutes keep growing past 99.
    pub fn clock(&self) -> String {
        let secs = self.elapsed_secs();
        alloc::format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}
