//! Self-collision arming for a trail segment
//!
//! A fresh segment starts right under its owner's head, so the head would
//! immediately touch it. The segment is therefore `Disarmed` until it has
//! grown enough, then switches to `Armed` exactly once and stays there.

use serde::{Deserialize, Serialize};

/// Arming thresholds copied from the match config
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmingRule {
    /// Point count at which the segment arms
    pub min_points: usize,
    /// Head distance from the segment seed also required (0 disables)
    pub min_distance: f32,
}

impl ArmingRule {
    pub fn is_met(&self, point_count: usize, distance_from_seed: f32) -> bool {
        point_count >= self.min_points && distance_from_seed >= self.min_distance
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArmingState {
    #[default]
    Disarmed,
    Armed,
}

impl ArmingState {
    pub fn is_armed(self) -> bool {
        self == ArmingState::Armed
    }

    /// Feed the segment's current growth; returns true on the single
    /// Disarmed -> Armed transition
    pub fn observe(&mut self, rule: &ArmingRule, point_count: usize, distance_from_seed: f32) -> bool {
        match self {
            ArmingState::Armed => false,
            ArmingState::Disarmed => {
                if rule.is_met(point_count, distance_from_seed) {
                    *self = ArmingState::Armed;
                    true
                } else {
                    false
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RULE: ArmingRule = ArmingRule {
        min_points: 4,
        min_distance: 0.0,
    };

    #[test]
    fn test_arms_at_threshold() {
        let mut state = ArmingState::default();
        assert!(!state.observe(&RULE, 3, 1.0));
        assert!(!state.is_armed());
        assert!(state.observe(&RULE, 4, 1.0));
        assert!(state.is_armed());
        // Only the first crossing reports a transition
        assert!(!state.observe(&RULE, 5, 1.0));
    }

    #[test]
    fn test_distance_requirement() {
        let rule = ArmingRule {
            min_points: 2,
            min_distance: 0.35,
        };
        let mut state = ArmingState::default();
        assert!(!state.observe(&rule, 10, 0.2));
        assert!(state.observe(&rule, 10, 0.4));
    }

    proptest! {
        #[test]
        fn prop_armed_never_reverts(counts in prop::collection::vec(0usize..12, 1..40)) {
            let mut state = ArmingState::default();
            let mut seen_armed = false;
            for count in counts {
                state.observe(&RULE, count, 1.0);
                if seen_armed {
                    prop_assert!(state.is_armed());
                }
                seen_armed |= state.is_armed();
            }
        }
    }
}
