//! Unit collaborators.
//!
//! The formation only tracks placement. Everything a soldier *is* (its
//! model, weapon, animation) lives behind these traits, implemented by
//! the host game. [`UnitRegistry`] is a plain in-memory implementation
//! used by the CLI, scenarios and tests.

use std::collections::BTreeMap;

use tracing::trace;

use crate::formation::{Offset, UnitHandle};

/// Lateral movement direction reported to units for animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveDirection {
    /// Moving towards negative x.
    Left,
    /// Not moving sideways.
    #[default]
    Idle,
    /// Moving towards positive x.
    Right,
}

impl MoveDirection {
    /// Direction from the sign of `delta`. Zero and NaN are idle.
    #[must_use]
    pub fn from_delta(delta: f32) -> Self {
        if delta > 0.0 {
            Self::Right
        } else if delta < 0.0 {
            Self::Left
        } else {
            Self::Idle
        }
    }

    /// Signed value: -1, 0 or 1.
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Self::Left => -1,
            Self::Idle => 0,
            Self::Right => 1,
        }
    }
}

/// Creates and tears down the game-facing representation of units.
pub trait UnitFactory {
    /// Instantiate a unit for the slot at `slot_index`, placed at
    /// `position` relative to the formation origin.
    fn instantiate(&mut self, slot_index: usize, position: Offset) -> UnitHandle;

    /// Tear down a unit previously returned by [`instantiate`](Self::instantiate).
    fn destroy(&mut self, unit: UnitHandle);
}

/// Drives a unit's autonomous behaviour.
pub trait UnitBehavior {
    /// Begin shooting forward automatically.
    fn start_auto_fire(&mut self, unit: UnitHandle);

    /// Stop shooting.
    fn stop_auto_fire(&mut self, unit: UnitHandle);

    /// Report the squad's lateral movement for animation.
    fn set_move_direction(&mut self, unit: UnitHandle, direction: MoveDirection);
}

/// Everything the roster needs from the host: creation, teardown and
/// behaviour control.
pub trait UnitHost: UnitFactory + UnitBehavior {}

impl<T: UnitFactory + UnitBehavior + ?Sized> UnitHost for T {}

/// Recorded state of a live unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitState {
    /// Slot the unit was created for.
    pub slot_index: usize,
    /// Offset the unit was created at.
    pub spawn_position: Offset,
    /// Whether auto-fire is on.
    pub firing: bool,
    /// Last reported movement direction.
    pub direction: MoveDirection,
}

/// In-memory unit host.
///
/// Handles are allocated from a monotonically increasing counter and are
/// never reused.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    next_handle: u64,
    units: BTreeMap<UnitHandle, UnitState>,
    spawned: u64,
    despawned: u64,
}

impl UnitRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State of a live unit.
    #[must_use]
    pub fn get(&self, unit: UnitHandle) -> Option<&UnitState> {
        self.units.get(&unit)
    }

    /// Number of live units.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.units.len()
    }

    /// Number of live units with auto-fire on.
    #[must_use]
    pub fn firing_count(&self) -> usize {
        self.units.values().filter(|u| u.firing).count()
    }

    /// Total units ever instantiated.
    #[must_use]
    pub const fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Total units ever destroyed.
    #[must_use]
    pub const fn despawned(&self) -> u64 {
        self.despawned
    }

    /// Iterate over live units in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (UnitHandle, &UnitState)> {
        self.units.iter().map(|(handle, state)| (*handle, state))
    }

    fn with_unit(&mut self, unit: UnitHandle, f: impl FnOnce(&mut UnitState)) {
        match self.units.get_mut(&unit) {
            Some(state) => f(state),
            None => trace!(%unit, "behaviour call for unknown unit ignored"),
        }
    }
}

impl UnitFactory for UnitRegistry {
    fn instantiate(&mut self, slot_index: usize, position: Offset) -> UnitHandle {
        let handle = UnitHandle(self.next_handle);
        self.next_handle += 1;
        self.spawned += 1;
        self.units.insert(
            handle,
            UnitState {
                slot_index,
                spawn_position: position,
                firing: false,
                direction: MoveDirection::Idle,
            },
        );
        handle
    }

    fn destroy(&mut self, unit: UnitHandle) {
        if self.units.remove(&unit).is_some() {
            self.despawned += 1;
        } else {
            trace!(%unit, "destroy for unknown unit ignored");
        }
    }
}

impl UnitBehavior for UnitRegistry {
    fn start_auto_fire(&mut self, unit: UnitHandle) {
        self.with_unit(unit, |state| state.firing = true);
    }

    fn stop_auto_fire(&mut self, unit: UnitHandle) {
        self.with_unit(unit, |state| state.firing = false);
    }

    fn set_move_direction(&mut self, unit: UnitHandle, direction: MoveDirection) {
        self.with_unit(unit, |state| state.direction = direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_direction_from_delta() {
        assert_eq!(MoveDirection::from_delta(12.0), MoveDirection::Right);
        assert_eq!(MoveDirection::from_delta(-0.5), MoveDirection::Left);
        assert_eq!(MoveDirection::from_delta(0.0), MoveDirection::Idle);
        assert_eq!(MoveDirection::from_delta(f32::NAN), MoveDirection::Idle);
        assert_eq!(MoveDirection::Left.sign(), -1);
    }

    #[test]
    fn test_registry_lifecycle() {
        let mut registry = UnitRegistry::new();
        let a = registry.instantiate(0, Offset::new(1.0, 0.0));
        let b = registry.instantiate(1, Offset::new(0.0, 1.0));
        assert_ne!(a, b);
        assert_eq!(registry.live_count(), 2);

        registry.start_auto_fire(a);
        assert_eq!(registry.firing_count(), 1);

        registry.set_move_direction(b, MoveDirection::Left);
        assert_eq!(registry.get(b).map(|u| u.direction), Some(MoveDirection::Left));

        registry.destroy(a);
        assert_eq!(registry.live_count(), 1);
        assert_eq!(registry.spawned(), 2);
        assert_eq!(registry.despawned(), 1);
    }

    #[test]
    fn test_handles_never_reused() {
        let mut registry = UnitRegistry::new();
        let a = registry.instantiate(0, Offset::ZERO);
        registry.destroy(a);
        let b = registry.instantiate(0, Offset::ZERO);
        assert_ne!(a, b);
    }

    #[test]
    fn test_unknown_unit_ignored() {
        let mut registry = UnitRegistry::new();
        registry.start_auto_fire(UnitHandle(42));
        registry.destroy(UnitHandle(42));
        assert_eq!(registry.live_count(), 0);
        assert_eq!(registry.despawned(), 0);
    }
}
