//! Clock abstraction so debounce windows and dispatch pauses can be tested.
//!
//! - `SystemClock`: real `tokio::time`
//! - `MockClock`: manual time; `sleep()` returns at once, advances the clock
//!   and records the requested duration

use std::sync::{Arc, Mutex};
use tokio::time::{Duration, Instant};

/// Source of time for the entry point and the dispatcher.
#[allow(async_fn_in_trait)]
pub trait Clock: Send + Sync + 'static {
    /// Return the current instant.
    fn now(&self) -> Instant;

    /// Sleep for the given duration.
    async fn sleep(&self, duration: Duration);
}

/// Live implementation: delegates to real tokio time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Mock clock for unit tests.
#[derive(Clone)]
pub struct MockClock {
    inner: Arc<Mutex<MockClockInner>>,
}

struct MockClockInner {
    current: Instant,
    sleeps: Vec<Duration>,
}

impl MockClock {
    /// Create a mock clock fixed at `Instant::now()`.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockClockInner {
                current: Instant::now(),
                sleeps: Vec::new(),
            })),
        }
    }

    /// Move time forward without recording a sleep.
    pub fn advance(&self, duration: Duration) {
        self.inner.lock().unwrap().current += duration;
    }

    /// Every duration passed to `sleep()`, in call order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.inner.lock().unwrap().sleeps.clone()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.inner.lock().unwrap().current
    }

    async fn sleep(&self, duration: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.current += duration;
        inner.sleeps.push(duration);
    }
}
