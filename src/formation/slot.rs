//! Roster slots.

use serde::{Deserialize, Serialize};

use crate::formation::Offset;

/// Opaque identifier for a unit instantiated by a [`UnitFactory`].
///
/// [`UnitFactory`]: crate::roster::UnitFactory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitHandle(pub u64);

impl std::fmt::Display for UnitHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// Placement state of one unit in the formation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RosterSlot {
    /// Ordinal position in the roster. Determines the target offset.
    pub index: usize,
    /// Current rendered offset from the formation origin.
    pub position: Offset,
    /// Unit occupying this slot.
    pub unit: UnitHandle,
}

impl RosterSlot {
    /// Create a slot already placed at `position`.
    #[must_use]
    pub const fn new(index: usize, position: Offset, unit: UnitHandle) -> Self {
        Self {
            index,
            position,
            unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_handle_display() {
        assert_eq!(UnitHandle(7).to_string(), "unit#7");
    }

    #[test]
    fn test_slot_creation() {
        let slot = RosterSlot::new(3, Offset::new(1.0, -1.0), UnitHandle(9));
        assert_eq!(slot.index, 3);
        assert_eq!(slot.position, Offset::new(1.0, -1.0));
        assert_eq!(slot.unit, UnitHandle(9));
    }
}
