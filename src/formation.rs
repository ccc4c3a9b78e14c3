//! Formation layer.
//!
//! Lays the roster out on a golden-angle spiral:
//! - Pure layout function (target offset per slot index)
//! - Roster slots and unit handles
//! - Settle-window state after roster changes
//! - The per-frame engine (interpolation and force placement)
//! - Invariant checks and packing metrics

mod engine;
mod invariants;
mod layout;
mod packing;
mod settle;
mod slot;

pub use engine::{
    FormationEngine, FrameOutcome, Smoothing, DEFAULT_REFERENCE_RATE, DEFAULT_SMOOTHING,
    MIN_SMOOTHING,
};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use layout::{
    layout, radius_for_count, target_position, FormationParams, Offset, GOLDEN_ANGLE_DEG,
};
pub(crate) use layout::clamp_unit;
pub use packing::PackingStats;
pub use settle::{SettleState, DEFAULT_SETTLE_FRAMES};
pub use slot::{RosterSlot, UnitHandle};
