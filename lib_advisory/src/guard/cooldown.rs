//! Cooldown deadline with an injectable clock.
//!
//! The deadline is a plain value object rather than a module-level
//! global: fetchers share one instance behind an `Arc`, and tests drive
//! it with a fake clock.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Monotonic time source for the guard.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The real clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Default suppression window after a rate-limit signal.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

/// Shared cooldown state for all AI-backed fetch calls.
pub struct CooldownGuard {
    window: Duration,
    until: Mutex<Option<Instant>>,
    clock: Arc<dyn Clock>,
}

impl CooldownGuard {
    /// Creates a guard with the default 60 second window and real clock.
    pub fn new() -> Self {
        Self::with_clock(DEFAULT_COOLDOWN, Arc::new(SystemClock))
    }

    /// Creates a guard with an explicit window and clock.
    pub fn with_clock(window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            window,
            until: Mutex::new(None),
            clock,
        }
    }

    /// Whether the current time is still inside an armed cooldown window.
    pub fn is_cooling_down(&self) -> bool {
        let until = self.until.lock().unwrap();
        match *until {
            Some(deadline) => self.clock.now() < deadline,
            None => false,
        }
    }

    /// Arms the cooldown: now + window.
    pub fn start_cooldown(&self) {
        let deadline = self.clock.now() + self.window;
        *self.until.lock().unwrap() = Some(deadline);
    }
}

impl Default for CooldownGuard {
    fn default() -> Self {
        Self::new()
    }
}
