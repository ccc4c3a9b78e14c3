//! Roster mutations: add, remove, multiply, divide.
//!
//! Every operation holds the engine's update guard while it runs, leaves
//! every slot exactly on its target, and opens a settle window so the
//! next few frames also skip interpolation.

use std::cmp::Ordering;

use tracing::{debug, error, warn};

use crate::config::SANITY_MAX_SOLDIERS;
use crate::error::{RosterError, RosterResult};
use crate::formation::{assert_invariants, FormationEngine};
use crate::roster::UnitHost;

/// Soldier count before and after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationReport {
    /// Roster size before the call.
    pub before: usize,
    /// Roster size after the call.
    pub after: usize,
}

impl MutationReport {
    /// A report for a call that left the roster untouched.
    #[must_use]
    pub const fn unchanged(count: usize) -> Self {
        Self {
            before: count,
            after: count,
        }
    }

    /// Soldiers added by the call.
    #[must_use]
    pub const fn added(&self) -> usize {
        self.after.saturating_sub(self.before)
    }

    /// Soldiers removed by the call.
    #[must_use]
    pub const fn removed(&self) -> usize {
        self.before.saturating_sub(self.after)
    }
}

/// Write access to a formation's roster.
///
/// Borrows the engine and, optionally, the unit host for the duration of
/// a batch of mutations. Without a host, soldiers can still be removed
/// but none can be added.
#[derive(Debug)]
pub struct RosterMutator<'a, U: UnitHost + ?Sized> {
    engine: &'a mut FormationEngine,
    units: Option<&'a mut U>,
}

impl<'a, U: UnitHost + ?Sized> RosterMutator<'a, U> {
    /// Bind a mutator to an engine and an optional unit host.
    pub fn new(engine: &'a mut FormationEngine, units: Option<&'a mut U>) -> Self {
        Self { engine, units }
    }

    /// The engine being mutated.
    #[must_use]
    pub fn engine(&self) -> &FormationEngine {
        self.engine
    }

    /// Current roster size.
    #[must_use]
    pub fn soldier_count(&self) -> usize {
        self.engine.soldier_count()
    }

    /// Append `count` soldiers at the tail of the roster.
    ///
    /// Each new slot is placed on its target before its unit is asked to
    /// start firing. The add is all or nothing, so a successful
    /// `add_soldiers(k)` is always undone by `remove_soldiers(k)`.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::FactoryUnavailable`] if no unit host is
    /// attached, or [`RosterError::CapacityExceeded`] if the roster would
    /// grow past the engine's `max_soldiers`. The roster is untouched in
    /// both cases.
    pub fn add_soldiers(&mut self, count: usize) -> RosterResult<MutationReport> {
        let before = self.engine.soldier_count();
        let Some(units) = self.units.as_deref_mut() else {
            error!(requested = count, before, "no unit factory configured; cannot add soldiers");
            return Err(RosterError::FactoryUnavailable { requested: count });
        };

        let available = self.engine.max_soldiers().saturating_sub(before);
        if count > available {
            warn!(requested = count, available, "roster at capacity; add rejected");
            return Err(RosterError::CapacityExceeded {
                requested: count,
                available,
            });
        }

        let mut engine = self.engine.hold_updates();
        for _ in 0..count {
            let (index, target) = engine.next_slot_target();
            let unit = units.instantiate(index, target);
            engine.push_slot(unit);
            units.start_auto_fire(unit);
        }

        // Existing slots too, so nothing drifts from a stale position
        engine.force_reposition_all();
        engine.open_settle_window();
        assert_invariants(&engine);

        let report = MutationReport {
            before,
            after: engine.soldier_count(),
        };
        debug!(added = report.added(), before, after = report.after, "soldiers added");
        Ok(report)
    }

    /// Remove up to `count` soldiers from the tail of the roster.
    ///
    /// Asking for more than the roster holds empties it.
    ///
    /// # Errors
    ///
    /// Never fails; the `Result` mirrors the other mutations.
    pub fn remove_soldiers(&mut self, count: usize) -> RosterResult<MutationReport> {
        let before = self.engine.soldier_count();
        let to_remove = count.min(before);
        let mut units = self.units.as_deref_mut();
        if units.is_none() && to_remove > 0 {
            debug!(to_remove, "no unit factory configured; dropping slots without teardown");
        }

        let mut engine = self.engine.hold_updates();
        for _ in 0..to_remove {
            let Some(slot) = engine.pop_slot() else {
                break;
            };
            if let Some(units) = units.as_deref_mut() {
                units.destroy(slot.unit);
            }
        }

        engine.force_reposition_all();
        engine.open_settle_window();
        assert_invariants(&engine);

        let report = MutationReport {
            before,
            after: engine.soldier_count(),
        };
        debug!(removed = report.removed(), before, after = report.after, "soldiers removed");
        Ok(report)
    }

    /// Scale the roster to `round(count * factor)`.
    ///
    /// Rounds half away from zero. A factor of zero empties the roster;
    /// negative factors are treated as zero and NaN is ignored. Growth
    /// stops at the engine's `max_soldiers`.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::FactoryUnavailable`] if the roster would
    /// grow and no unit host is attached.
    pub fn multiply_squad(&mut self, factor: f32) -> RosterResult<MutationReport> {
        let current = self.engine.soldier_count();
        if factor.is_nan() {
            warn!(current, "NaN multiplier ignored");
            return Ok(MutationReport::unchanged(current));
        }
        let factor = if factor < 0.0 {
            warn!(factor, "negative multiplier treated as zero");
            0.0
        } else {
            factor
        };

        #[allow(clippy::cast_precision_loss)]
        let target = round_count(current as f64 * f64::from(factor));
        let max = self.engine.max_soldiers();
        let target = if target > max && target > current {
            warn!(target, max, "multiplied roster over capacity; clamping");
            max.max(current)
        } else {
            target
        };
        self.resize_to(current, target)
    }

    /// Shrink the roster to `round(count / divisor)`.
    ///
    /// Never grows the roster, even when rounding would. Non-positive and
    /// NaN divisors are ignored.
    ///
    /// # Errors
    ///
    /// Never fails; the `Result` mirrors the other mutations.
    pub fn divide_squad(&mut self, divisor: f32) -> RosterResult<MutationReport> {
        let current = self.engine.soldier_count();
        if divisor.is_nan() || divisor <= 0.0 {
            warn!(divisor, current, "non-positive divisor ignored");
            return Ok(MutationReport::unchanged(current));
        }

        #[allow(clippy::cast_precision_loss)]
        let target = round_count(current as f64 / f64::from(divisor));
        if target < current {
            self.remove_soldiers(current - target)
        } else {
            Ok(MutationReport::unchanged(current))
        }
    }

    fn resize_to(&mut self, current: usize, target: usize) -> RosterResult<MutationReport> {
        match target.cmp(&current) {
            Ordering::Greater => self.add_soldiers(target - current),
            Ordering::Less => self.remove_soldiers(current - target),
            Ordering::Equal => Ok(MutationReport::unchanged(current)),
        }
    }
}

/// Round half away from zero into a roster size, saturating at the
/// sanity ceiling.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn round_count(value: f64) -> usize {
    let rounded = value.round();
    if rounded.is_nan() || rounded <= 0.0 {
        0
    } else if rounded >= SANITY_MAX_SOLDIERS as f64 {
        SANITY_MAX_SOLDIERS
    } else {
        rounded as usize
    }
}
