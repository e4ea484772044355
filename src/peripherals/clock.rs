use std::time::{Duration, Instant};

/// Free-running millisecond counter. The epoch is the moment the clock was started.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    epoch: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Clock { epoch: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Milliseconds since start, wrapping at 2^32 like the microcontroller counter
    pub fn millis(&self) -> u32 {
        self.elapsed().as_millis() as u32
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::start()
    }
}
