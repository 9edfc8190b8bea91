/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Trailing intensity window and plateau detection.
//!
//! The cart hill-climbs on total light intensity. Once it passes a local
//! maximum the total starts to fall; [`TrendTracker`] notices by comparing the
//! newest reading in a short trailing window against the oldest.
//!
//! ```text
//! lag = 3
//! record: 100  90  80
//! window: [100, 90, 80]   newest 80 < oldest 100  → declining
//! ```
//!
//! Comparing ends rather than requiring a monotonic run lets single-cycle
//! noise inside the window pass without masking a real decline.
//!
//! # Invariants
//!
//! - Window length never exceeds `lag`; eviction is FIFO.
//! - After `k` records the window holds `min(k, lag)` entries, the most recent
//!   ones, in arrival order.
//! - `is_declining()` is `false` for any window not yet at capacity.
//! - Storage is fixed-capacity ([`MAX_TREND_LAG`]); no heap.

use heapless::Deque;

use crate::error::{CartError, Result};

/// Largest supported window length.
pub const MAX_TREND_LAG: usize = 32;

/// Window length of the reference cart.
pub const DEFAULT_TREND_LAG: usize = 3;

/// Bounded FIFO of recent total-intensity readings.
#[derive(Clone, Debug)]
pub struct TrendTracker {
    lag: usize,
    window: Deque<f32, MAX_TREND_LAG>,
    /// Highest total recorded since the last reset.
    peak: Option<f32>,
}

impl TrendTracker {
    /// Construct a tracker with window length `lag`.
    ///
    /// Fails with [`CartError::InvalidConfig`] unless `1 <= lag <= MAX_TREND_LAG`.
    pub fn new(lag: usize) -> Result<Self> {
        if lag == 0 {
            return Err(CartError::invalid_config("trend lag must be at least 1"));
        }
        if lag > MAX_TREND_LAG {
            return Err(CartError::invalid_config("trend lag exceeds MAX_TREND_LAG"));
        }
        Ok(Self {
            lag,
            window: Deque::new(),
            peak: None,
        })
    }

    /// Append a total-intensity reading, evicting the oldest beyond `lag`.
    pub fn record(&mut self, total_intensity: f32) {
        while self.window.len() >= self.lag {
            self.window.pop_front();
        }
        // lag <= MAX_TREND_LAG, so the loop above always leaves room.
        let _ = self.window.push_back(total_intensity);

        match self.peak {
            Some(p) if p >= total_intensity => {}
            _ => self.peak = Some(total_intensity),
        }
    }

    /// `true` iff the window is full and its newest entry is strictly below its oldest.
    pub fn is_declining(&self) -> bool {
        if self.window.len() != self.lag {
            return false;
        }
        match (self.window.front(), self.window.back()) {
            (Some(oldest), Some(newest)) => newest < oldest,
            _ => false,
        }
    }

    /// Empty the window and forget the peak.
    pub fn reset(&mut self) {
        self.window.clear();
        self.peak = None;
    }

    /// Configured window length.
    pub fn lag(&self) -> usize {
        self.lag
    }

    /// Number of readings currently held.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// `true` when no readings are held.
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// `true` when the window holds `lag` readings.
    pub fn is_full(&self) -> bool {
        self.window.len() == self.lag
    }

    /// Oldest reading in the window.
    pub fn oldest(&self) -> Option<f32> {
        self.window.front().copied()
    }

    /// Newest reading in the window.
    pub fn newest(&self) -> Option<f32> {
        self.window.back().copied()
    }

    /// Readings oldest-first.
    pub fn window(&self) -> impl Iterator<Item = f32> + '_ {
        self.window.iter().copied()
    }

    /// Highest total recorded since construction or the last [`reset`](Self::reset).
    pub fn peak(&self) -> Option<f32> {
        self.peak
    }
}

impl Default for TrendTracker {
    fn default() -> Self {
        Self {
            lag: DEFAULT_TREND_LAG,
            window: Deque::new(),
            peak: None,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    fn contents(t: &TrendTracker) -> Vec<f32> {
        t.window().collect()
    }

    #[test]
    fn test_lag_bounds() {
        assert!(TrendTracker::new(0).is_err());
        assert!(TrendTracker::new(MAX_TREND_LAG + 1).is_err());
        assert_eq!(TrendTracker::new(MAX_TREND_LAG).unwrap().lag(), MAX_TREND_LAG);
        assert_eq!(TrendTracker::default().lag(), DEFAULT_TREND_LAG);
    }

    #[test]
    fn test_window_bound_and_fifo_order() {
        let mut t = TrendTracker::new(3).unwrap();
        let readings = [5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        for (k, &r) in readings.iter().enumerate() {
            t.record(r);
            let expected_len = core::cmp::min(k + 1, 3);
            assert_eq!(t.len(), expected_len);
            let start = (k + 1).saturating_sub(3);
            assert_eq!(contents(&t), readings[start..=k].to_vec());
        }
    }

    #[test]
    fn test_declining_scenario_then_reset() {
        let mut t = TrendTracker::new(3).unwrap();
        t.record(100.0);
        t.record(90.0);
        assert!(!t.is_declining(), "partial window must not report decline");
        t.record(80.0);
        assert!(t.is_declining());

        t.reset();
        assert!(t.is_empty());
        t.record(70.0);
        t.record(60.0);
        assert!(!t.is_declining());
    }

    #[test]
    fn test_partial_window_never_declines() {
        let mut t = TrendTracker::new(5).unwrap();
        for r in [100.0, 1.0, 0.5, 0.1] {
            t.record(r);
            assert!(!t.is_declining());
        }
        t.record(0.0);
        assert!(t.is_declining());
    }

    #[test]
    fn test_noise_inside_window_is_tolerated() {
        let mut t = TrendTracker::new(3).unwrap();
        // Dip in the middle, but newest still above oldest.
        t.record(50.0);
        t.record(40.0);
        t.record(55.0);
        assert!(!t.is_declining());
    }

    #[test]
    fn test_equal_ends_are_not_declining() {
        let mut t = TrendTracker::new(3).unwrap();
        for r in [20.0, 10.0, 20.0] {
            t.record(r);
        }
        assert!(!t.is_declining());
    }

    #[test]
    fn test_lag_one_compares_entry_with_itself() {
        let mut t = TrendTracker::new(1).unwrap();
        t.record(10.0);
        assert!(!t.is_declining());
        t.record(1.0);
        assert!(!t.is_declining());
        assert_eq!(t.oldest(), Some(1.0));
    }

    #[test]
    fn test_peak_tracks_maximum_until_reset() {
        let mut t = TrendTracker::new(3).unwrap();
        assert_eq!(t.peak(), None);
        for r in [3.0, 9.0, 4.0, 2.0, 1.0] {
            t.record(r);
        }
        assert_eq!(t.peak(), Some(9.0));
        assert_eq!(t.newest(), Some(1.0));
        t.reset();
        assert_eq!(t.peak(), None);
    }
}
