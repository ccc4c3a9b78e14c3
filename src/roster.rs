//! Roster layer.
//!
//! Grows and shrinks the formation in response to gameplay:
//! - Unit collaborator traits and an in-memory registry
//! - The roster mutator (add, remove, multiply, divide)
//! - Power-up / obstacle effects and detection zones

mod effects;
mod mutator;
mod units;

pub use effects::{DetectionKind, DetectionZone, Effect, ENEMY_PADDING, PICKUP_PADDING};
pub use mutator::{MutationReport, RosterMutator};
pub use units::{
    MoveDirection, UnitBehavior, UnitFactory, UnitHost, UnitRegistry, UnitState,
};
