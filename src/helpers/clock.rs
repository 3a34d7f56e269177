use std::time::Instant;

/// Monotonic tick source counting from the start of the wake cycle.
#[derive(Clone, Copy, Debug)]
pub struct BootClock {
    boot: Instant,
}

impl BootClock {
    pub fn start() -> Self {
        BootClock {
            boot: Instant::now(),
        }
    }

    pub fn millis(&self) -> u64 {
        self.boot.elapsed().as_millis() as u64
    }
}

impl Default for BootClock {
    fn default() -> Self {
        BootClock::start()
    }
}
