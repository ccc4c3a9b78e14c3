// Allow unwrap and exact float comparison in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::float_cmp))]
//! Squadron: squad formation and roster engine for crowd-runner games.
//!
//! This crate lays a variable number of soldiers out on a golden-angle
//! (Vogel) spiral and keeps that layout stable while the squad grows and
//! shrinks:
//! - Per-frame layout with frame-rate independent smoothing
//! - A settle window that snaps every slot onto its target after a
//!   roster change
//! - Add, remove, multiply and divide, driven by gameplay effects
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Scenarios / CLI / viewer          │
//! ├─────────────────────────────────────┤
//! │   Squad (steering, unit fan-out)    │
//! ├─────────────────────────────────────┤
//! │   Roster (mutator, effects, units)  │
//! ├─────────────────────────────────────┤
//! │   Formation (layout, settle, guard) │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod control;
pub mod error;
pub mod formation;
pub mod roster;
pub mod scenario;
pub mod squad;

pub use config::{DragConfig, FormationConfig, SquadConfig};
pub use error::{ConfigError, RosterError, RosterResult, ScenarioError};

// Re-export key types at crate root for convenience
pub use formation::{FormationEngine, FormationParams, FrameOutcome, Offset, UnitHandle};
pub use roster::{Effect, MutationReport, RosterMutator, UnitBehavior, UnitFactory, UnitHost};
pub use squad::Squad;
