use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use crate::error::ConfigError;

/// Millisecond timestamp. Used both for wall-clock samples and for the logic clock.
pub type Ticks = u64;

/// Longest budget a rate may produce, a bit over 49 days.
pub const MAX_BUDGET_MS: u64 = u32::MAX as u64;

/// Target wall-clock duration of one loop iteration, in whole milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameBudget(u64);

impl FrameBudget {
    /// `round(1000 / rate)` with halves rounded up. 60 fps gives 17 ms.
    pub fn from_rate(rate: f64) -> Result<Self, ConfigError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ConfigError::InvalidRate(rate));
        }

        let ms = (1000.0 / rate + 0.5).floor();
        if ms < 1.0 {
            return Err(ConfigError::BudgetTooSmall(rate));
        }
        if ms > MAX_BUDGET_MS as f64 {
            return Err(ConfigError::BudgetTooLarge(rate));
        }

        Ok(Self(ms as u64))
    }

    #[inline]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    #[inline]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl fmt::Display for FrameBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Remaining budget after `now - sample` has elapsed, clamped at zero.
///
/// A clock reading earlier than `sample` counts as no time elapsed.
#[inline]
pub fn pacing_wait(sample: Ticks, now: Ticks, budget: FrameBudget) -> u64 {
    let elapsed = now.saturating_sub(sample);
    budget.as_millis().saturating_sub(elapsed)
}

/// Monotonic millisecond time source with a blocking sleep.
pub trait Clock {
    fn now_ticks(&self) -> Ticks;
    fn sleep_ms(&self, ms: u64);
}

/// Wall clock measured from the moment it was created.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now_ticks(&self) -> Ticks {
        self.origin.elapsed().as_millis() as Ticks
    }

    fn sleep_ms(&self, ms: u64) {
        if ms > 0 {
            thread::sleep(Duration::from_millis(ms));
        }
    }
}

/// Clock that only moves when told to. Sleeping advances it instantly.
///
/// Clones share the same counter, so a test can keep a handle while the
/// engine owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
    slept: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: Ticks) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
            slept: Arc::new(AtomicU64::new(0)),
        }
    }

    #[inline]
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    #[inline]
    pub fn set(&self, ticks: Ticks) {
        self.now.store(ticks, Ordering::SeqCst);
    }

    /// Total milliseconds spent in `sleep_ms` so far.
    #[inline]
    pub fn total_slept(&self) -> u64 {
        self.slept.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now_ticks(&self) -> Ticks {
        self.now.load(Ordering::SeqCst)
    }

    fn sleep_ms(&self, ms: u64) {
        self.slept.fetch_add(ms, Ordering::SeqCst);
        self.advance(ms);
    }
}
