/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Single-cycle stop/go gate on proximity clearances.
//!
//! # Invariants
//!
//! - A move is allowed only when *every* clearance strictly exceeds the threshold.
//! - An empty clearance set never allows a move.
//! - A NaN clearance never allows a move.

/// Minimum clearance of the reference cart (mm).
pub const DEFAULT_MIN_CLEARANCE_MM: f32 = 30.0;

/// Outcome of vetting one clearance set.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GateDecision {
    /// Every beam has room; the move may go ahead.
    Clear,
    /// At least one beam is at or inside the threshold.
    Blocked {
        /// Smallest clearance seen (NaN if a beam reported NaN).
        nearest: f32,
    },
    /// No clearance data at all.
    Unavailable,
}

impl GateDecision {
    /// `true` only for [`GateDecision::Clear`].
    pub fn allows(&self) -> bool {
        matches!(self, GateDecision::Clear)
    }
}

/// Fail-closed clearance predicate.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SafetyGate {
    /// Clearances must strictly exceed this distance (mm).
    pub min_clearance: f32,
}

impl SafetyGate {
    /// Construct a gate with the given threshold (mm).
    pub const fn new(min_clearance: f32) -> Self {
        Self { min_clearance }
    }

    /// Classify a clearance set.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn evaluate(&self, clearances: &[f32]) -> GateDecision {
        if clearances.is_empty() {
            return GateDecision::Unavailable;
        }

        let mut nearest = f32::INFINITY;
        let mut blocked = false;
        for &d in clearances {
            // `!(d > min)` rather than `d <= min` so NaN counts as blocked.
            if !(d > self.min_clearance) {
                blocked = true;
            }
            if d.is_nan() || d < nearest {
                nearest = d;
                if d.is_nan() {
                    break;
                }
            }
        }

        if blocked {
            GateDecision::Blocked { nearest }
        } else {
            GateDecision::Clear
        }
    }

    /// `true` iff every clearance strictly exceeds the threshold and the set is non-empty.
    pub fn allows(&self, clearances: &[f32]) -> bool {
        self.evaluate(clearances).allows()
    }
}

impl Default for SafetyGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CLEARANCE_MM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_clear_allows() {
        let gate = SafetyGate::default();
        assert!(gate.allows(&[300.0]));
        assert!(gate.allows(&[31.0, 500.0, 30.001]));
        assert_eq!(gate.evaluate(&[300.0]), GateDecision::Clear);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let gate = SafetyGate::new(30.0);
        assert!(!gate.allows(&[30.0]));
        assert!(!gate.allows(&[100.0, 30.0, 100.0]));
        assert_eq!(
            gate.evaluate(&[100.0, 30.0, 45.0]),
            GateDecision::Blocked { nearest: 30.0 }
        );
    }

    #[test]
    fn test_any_close_beam_blocks() {
        let gate = SafetyGate::default();
        assert_eq!(
            gate.evaluate(&[200.0, 12.5, 29.0]),
            GateDecision::Blocked { nearest: 12.5 }
        );
    }

    #[test]
    fn test_empty_fails_closed() {
        let gate = SafetyGate::default();
        assert!(!gate.allows(&[]));
        assert_eq!(gate.evaluate(&[]), GateDecision::Unavailable);
    }

    #[test]
    fn test_nan_fails_closed() {
        let gate = SafetyGate::default();
        assert!(!gate.allows(&[100.0, f32::NAN]));
        match gate.evaluate(&[f32::NAN, 100.0]) {
            GateDecision::Blocked { nearest } => assert!(nearest.is_nan()),
            other => panic!("expected Blocked, got {:?}", other),
        }
    }
}
