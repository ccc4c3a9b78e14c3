//! Formation invariants - sanity checks that detect bugs.
//!
//! The mutation API is designed so that none of these can trigger. If
//! one does, it is a programming error, not a gameplay condition.

use std::collections::HashSet;

use crate::formation::FormationEngine;

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all formation invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(engine: &FormationEngine) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    // Indices must be exactly 0..len in order
    for (expected, slot) in engine.slots().iter().enumerate() {
        if slot.index != expected {
            violations.push(InvariantViolation {
                message: format!(
                    "Slot at position {expected} has index {} (gap or reorder)",
                    slot.index
                ),
            });
        }

        if !slot.position.is_finite() {
            violations.push(InvariantViolation {
                message: format!(
                    "Slot {} has non-finite position ({}, {})",
                    slot.index, slot.position.x, slot.position.z
                ),
            });
        }
    }

    // Each unit occupies at most one slot
    let mut seen = HashSet::with_capacity(engine.soldier_count());
    for slot in engine.slots() {
        if !seen.insert(slot.unit) {
            violations.push(InvariantViolation {
                message: format!("Unit {} occupies more than one slot", slot.unit),
            });
        }
    }

    if engine.soldier_count() > engine.max_soldiers() {
        violations.push(InvariantViolation {
            message: format!(
                "Roster size {} exceeds max {}",
                engine.soldier_count(),
                engine.max_soldiers()
            ),
        });
    }

    if engine.settle().frames_remaining() > engine.settle_frames() {
        violations.push(InvariantViolation {
            message: format!(
                "Settle window has {} frames left, longer than configured {}",
                engine.settle().frames_remaining(),
                engine.settle_frames()
            ),
        });
    }

    violations
}

/// Assert all formation invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(engine: &FormationEngine) {
    let violations = check_invariants(engine);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Formation invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_engine: &FormationEngine) {}
