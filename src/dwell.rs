//! Interruptible dwell timing and the shutdown flag.
//!
//! The dwell is the only place the control loop waits. It is always bounded
//! by the configured duration and returns early once [`StopFlag::request`]
//! has been called, so shutdown never waits out a full dwell.
//!
//! [`StopFlag`] is a plain atomic and works from `static` storage, an `Arc`,
//! or a signal handler.

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;

/// Shutdown request shared between the control loop and whoever stops it.
#[derive(Debug, Default)]
pub struct StopFlag(AtomicBool);

impl StopFlag {
    /// A flag with no stop requested.
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Ask the loop to stop at the next opportunity.
    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// `true` once a stop has been requested.
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Withdraw a pending request so the flag can be reused.
    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// How a dwell ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WaitOutcome {
    /// The full duration elapsed.
    Completed,
    /// A stop request cut the wait short.
    Interrupted,
}

/// A bounded, interruptible wait.
pub trait DwellTimer {
    /// Wait for at most `duration`, returning early once `stop` is raised.
    ///
    /// Must return [`WaitOutcome::Interrupted`] immediately when `stop` is
    /// already raised on entry.
    fn dwell(&mut self, duration: Duration, stop: &StopFlag) -> WaitOutcome;
}

impl<T: DwellTimer + ?Sized> DwellTimer for &mut T {
    fn dwell(&mut self, duration: Duration, stop: &StopFlag) -> WaitOutcome {
        (**self).dwell(duration, stop)
    }
}

/// Default polling slice of [`ThreadDwell`].
#[cfg(feature = "std")]
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Thread-sleeping dwell that re-checks the stop flag every `poll_interval`.
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThreadDwell {
    /// Longest single sleep between stop-flag checks.
    pub poll_interval: Duration,
}

#[cfg(feature = "std")]
impl ThreadDwell {
    /// Construct a timer with the given polling slice (zero is raised to 1 ms).
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval: poll_interval.max(Duration::from_millis(1)),
        }
    }
}

#[cfg(feature = "std")]
impl Default for ThreadDwell {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

#[cfg(feature = "std")]
impl DwellTimer for ThreadDwell {
    fn dwell(&mut self, duration: Duration, stop: &StopFlag) -> WaitOutcome {
        if stop.is_requested() {
            return WaitOutcome::Interrupted;
        }
        // A duration past the end of the clock has no deadline: wait for the stop.
        let deadline = std::time::Instant::now().checked_add(duration);
        loop {
            if stop.is_requested() {
                return WaitOutcome::Interrupted;
            }
            let slice = match deadline {
                Some(deadline) => {
                    let now = std::time::Instant::now();
                    if now >= deadline {
                        return WaitOutcome::Completed;
                    }
                    (deadline - now).min(self.poll_interval)
                }
                None => self.poll_interval,
            };
            std::thread::sleep(slice);
        }
    }
}
