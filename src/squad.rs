//! The player's squad: formation, units and steering in one place.
//!
//! A [`Squad`] owns its [`FormationEngine`], the unit host and the drag
//! controller, and runs them in frame order: steering moves the origin,
//! the engine lays out the roster around it, then every unit hears the
//! current movement direction.

use tracing::{debug, error};

use crate::config::SquadConfig;
use crate::control::DragController;
use crate::formation::{FormationEngine, FrameOutcome, Offset};
use crate::roster::{
    DetectionKind, DetectionZone, Effect, MoveDirection, MutationReport, RosterMutator, UnitHost,
};

/// A steerable squad of soldiers.
#[derive(Debug)]
pub struct Squad<U: UnitHost> {
    engine: FormationEngine,
    units: Option<U>,
    drag: DragController,
    origin: Offset,
    frame: u64,
}

impl<U: UnitHost> Squad<U> {
    /// Build a squad and seed `initial_soldiers` units.
    ///
    /// The configuration is sanitized first, so out-of-range values are
    /// clamped and logged. Without a unit host the squad starts empty and
    /// the failed seeding is logged.
    pub fn new(config: &SquadConfig, units: Option<U>) -> Self {
        let config = config.sanitized();
        let mut squad = Self {
            engine: FormationEngine::new(&config.formation),
            units,
            drag: DragController::new(config.drag),
            origin: Offset::ZERO,
            frame: 0,
        };

        if squad.engine.is_empty() && config.initial_soldiers > 0 {
            squad.apply_effect(Effect::Add(config.initial_soldiers));
        }
        squad
    }

    /// The formation engine.
    #[must_use]
    pub const fn engine(&self) -> &FormationEngine {
        &self.engine
    }

    /// The unit host, if one is attached.
    #[must_use]
    pub const fn units(&self) -> Option<&U> {
        self.units.as_ref()
    }

    /// Drag steering state.
    #[must_use]
    pub const fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Roster write access for a batch of mutations.
    pub fn mutator(&mut self) -> RosterMutator<'_, U> {
        RosterMutator::new(&mut self.engine, self.units.as_mut())
    }

    /// Apply a gameplay effect.
    ///
    /// Failures are logged rather than returned; gameplay carries on with
    /// the roster unchanged.
    pub fn apply_effect(&mut self, effect: Effect) -> Option<MutationReport> {
        match effect.apply(&mut self.mutator()) {
            Ok(report) => {
                debug!(%effect, before = report.before, after = report.after, "effect applied");
                Some(report)
            }
            Err(err) => {
                error!(%effect, %err, "effect failed");
                None
            }
        }
    }

    /// Frames ticked so far.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Advance one frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> FrameOutcome {
        let outcome = self.engine.update(dt);
        self.frame += 1;

        let direction = self.drag.direction();
        if let Some(units) = self.units.as_mut() {
            for slot in self.engine.slots() {
                units.set_move_direction(slot.unit, direction);
            }
        }
        outcome
    }

    /// Current lateral movement direction.
    #[must_use]
    pub const fn direction(&self) -> MoveDirection {
        self.drag.direction()
    }

    /// Turn auto-fire on for every soldier.
    pub fn start_shooting(&mut self) {
        if let Some(units) = self.units.as_mut() {
            for slot in self.engine.slots() {
                units.start_auto_fire(slot.unit);
            }
        }
    }

    /// Turn auto-fire off for every soldier.
    pub fn stop_shooting(&mut self) {
        if let Some(units) = self.units.as_mut() {
            for slot in self.engine.slots() {
                units.stop_auto_fire(slot.unit);
            }
        }
    }

    /// Formation origin in world coordinates.
    #[must_use]
    pub const fn origin(&self) -> Offset {
        self.origin
    }

    /// Move the origin's x, clamped to the lane. Non-finite x is ignored.
    pub fn set_origin_x(&mut self, x: f32) {
        if x.is_finite() {
            self.origin.x = self.drag.clamp_origin(x);
        }
    }

    /// Pointer pressed at screen x.
    pub fn press(&mut self, pointer_x: f32) {
        self.drag.press(pointer_x, self.origin.x);
    }

    /// Pointer held at screen x.
    pub fn drag_to(&mut self, pointer_x: f32) {
        if let Some(x) = self.drag.drag(pointer_x) {
            self.origin.x = x;
        }
    }

    /// Pointer released.
    pub fn release(&mut self) {
        self.drag.release();
    }

    /// World position of the soldier in slot `index`.
    #[must_use]
    pub fn world_position(&self, index: usize) -> Option<Offset> {
        self.engine
            .slot_position(index)
            .map(|p| Offset::new(self.origin.x + p.x, self.origin.z + p.z))
    }

    /// Overlap query for `kind` around the squad.
    #[must_use]
    pub fn detection_zone(&self, kind: DetectionKind) -> DetectionZone {
        DetectionZone::around(self.origin, self.engine.radius(), kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DragConfig, FormationConfig};
    use crate::roster::UnitRegistry;

    fn squad() -> Squad<UnitRegistry> {
        Squad::new(&SquadConfig::default(), Some(UnitRegistry::new()))
    }

    #[test]
    fn test_new_seeds_initial_soldiers() {
        let squad = squad();
        assert_eq!(squad.engine().soldier_count(), 1);
        assert_eq!(squad.units().map(UnitRegistry::firing_count), Some(1));
        assert!(squad.engine().settle().is_settling());
    }

    #[test]
    fn test_new_sanitizes_inverted_drag_bounds() {
        let config = SquadConfig {
            drag: DragConfig {
                min_x: 3.0,
                max_x: -3.0,
                ..DragConfig::default()
            },
            ..SquadConfig::default()
        };
        let mut squad = Squad::new(&config, Some(UnitRegistry::new()));
        assert_eq!(squad.drag().config().min_x, -3.0);
        assert_eq!(squad.drag().config().max_x, 3.0);

        squad.set_origin_x(0.0);
        assert_eq!(squad.origin().x, 0.0);
        squad.set_origin_x(10.0);
        assert_eq!(squad.origin().x, 3.0);
        squad.set_origin_x(f32::NAN);
        assert_eq!(squad.origin().x, 3.0);
    }

    #[test]
    fn test_new_sanitizes_nan_bounds_and_oversized_seed() {
        let config = SquadConfig {
            formation: FormationConfig {
                max_soldiers: 4,
                ..FormationConfig::default()
            },
            drag: DragConfig {
                min_x: f32::NAN,
                ..DragConfig::default()
            },
            initial_soldiers: 50,
        };
        let mut squad = Squad::new(&config, Some(UnitRegistry::new()));
        assert_eq!(squad.engine().soldier_count(), 4);

        squad.press(0.0);
        squad.drag_to(-100_000.0);
        assert_eq!(squad.origin().x, DragConfig::default().min_x);
    }

    #[test]
    fn test_new_without_host_starts_empty() {
        let squad = Squad::<UnitRegistry>::new(&SquadConfig::default(), None);
        assert!(squad.engine().is_empty());
        assert!(squad.units().is_none());
    }

    #[test]
    fn test_effects_and_failures() {
        let mut squad = squad();
        let report = squad.apply_effect(Effect::Multiply(4.0)).unwrap();
        assert_eq!(report.after, 4);

        let mut empty = Squad::<UnitRegistry>::new(&SquadConfig::default(), None);
        assert_eq!(empty.apply_effect(Effect::Add(2)), None);
        assert!(empty.engine().is_empty());
    }

    #[test]
    fn test_tick_broadcasts_direction() {
        let mut squad = squad();
        squad.apply_effect(Effect::Add(2));

        squad.press(500.0);
        squad.drag_to(200.0);
        squad.tick(1.0 / 60.0);

        let units = squad.units().unwrap();
        assert!(units.iter().all(|(_, u)| u.direction == MoveDirection::Left));
        assert!(squad.origin().x < 0.0);
        assert_eq!(squad.frame(), 1);

        squad.release();
        squad.tick(1.0 / 60.0);
        let units = squad.units().unwrap();
        assert!(units.iter().all(|(_, u)| u.direction == MoveDirection::Idle));
    }

    #[test]
    fn test_shooting_fans_out() {
        let mut squad = squad();
        squad.apply_effect(Effect::Add(4));
        squad.stop_shooting();
        assert_eq!(squad.units().map(UnitRegistry::firing_count), Some(0));
        squad.start_shooting();
        assert_eq!(squad.units().map(UnitRegistry::firing_count), Some(5));
    }

    #[test]
    fn test_world_position_follows_origin() {
        let mut squad = squad();
        squad.set_origin_x(2.0);
        let local = squad.engine().slot_position(0).unwrap();
        let world = squad.world_position(0).unwrap();
        assert_eq!(world, Offset::new(local.x + 2.0, local.z));
        assert_eq!(squad.world_position(7), None);

        squad.set_origin_x(100.0);
        assert_eq!(squad.origin().x, squad.drag().config().max_x);
    }

    #[test]
    fn test_detection_zone_tracks_radius() {
        let mut squad = squad();
        squad.apply_effect(Effect::Add(15));
        let zone = squad.detection_zone(DetectionKind::Enemy);
        assert_eq!(zone.center, squad.origin());
        assert_eq!(zone.radius, squad.engine().radius() + 1.0);
    }
}
