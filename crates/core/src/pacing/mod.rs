use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::config::{MAX_DELAY_MS, MIN_DELAY_MS};

/// Live-adjustable step delay shared between the control surface and the
/// worker. The pacer re-reads the value before every pause, so changes made
/// mid-run apply to the next step.
#[derive(Debug, Clone)]
pub struct SpeedControl {
    delay_ms: Arc<AtomicU64>,
}

impl SpeedControl {
    /// Creates a control holding `delay_ms`, clamped to the accepted range.
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms: Arc::new(AtomicU64::new(clamp_delay(delay_ms))),
        }
    }

    /// Updates the delay, clamped to the accepted range. Takes effect on the
    /// next pause, including within an in-flight run.
    pub fn set(&self, delay_ms: u64) {
        self.delay_ms.store(clamp_delay(delay_ms), Ordering::Relaxed);
    }

    /// Current delay between steps.
    pub fn current(&self) -> Duration {
        Duration::from_millis(self.delay_ms.load(Ordering::Relaxed))
    }

    fn zero() -> Self {
        Self {
            delay_ms: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl Default for SpeedControl {
    fn default() -> Self {
        Self::new(crate::config::PacingConfig::default().delay_ms)
    }
}

fn clamp_delay(delay_ms: u64) -> u64 {
    delay_ms.clamp(MIN_DELAY_MS, MAX_DELAY_MS)
}

/// Marker for a pause interrupted by cancellation. Not an error: the engine
/// treats it as the cooperative stop signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// Cooperative cancellation flag shared between the controller and the
/// worker. Cancelling wakes any thread currently suspended in a pause.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<TokenState>,
}

#[derive(Debug, Default)]
struct TokenState {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation and wakes any sleeper.
    pub fn cancel(&self) {
        let mut cancelled = self
            .inner
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *cancelled = true;
        self.inner.wake.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self
            .inner
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks for up to `timeout`, returning early when cancelled. Returns
    /// whether the token was cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut cancelled = self
            .inner
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while !*cancelled {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let (guard, _) = self
                .inner
                .wake
                .wait_timeout(cancelled, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            cancelled = guard;
        }
        *cancelled
    }
}

/// Inserts the configured delay between engine steps.
///
/// The pause is a non-busy wait on the cancellation token, so a cancel
/// request interrupts it immediately instead of waiting the delay out.
#[derive(Debug, Clone)]
pub struct Pacer {
    speed: SpeedControl,
    token: CancelToken,
}

impl Pacer {
    pub fn new(speed: SpeedControl, token: CancelToken) -> Self {
        Self { speed, token }
    }

    /// Zero-delay pacer for traces and tests. Still observes cancellation.
    pub fn unpaced() -> Self {
        Self {
            speed: SpeedControl::zero(),
            token: CancelToken::new(),
        }
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Re-reads the speed control and suspends the calling thread for that
    /// duration. Returns `Err(Cancelled)` when the wait was interrupted or
    /// the token was already cancelled.
    pub fn pause(&self) -> std::result::Result<(), Cancelled> {
        let delay = self.speed.current();
        if delay.is_zero() {
            if self.token.is_cancelled() {
                return Err(Cancelled);
            }
            return Ok(());
        }
        if self.token.wait_timeout(delay) {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}
