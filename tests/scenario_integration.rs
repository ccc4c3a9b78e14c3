//! Integration tests driving whole squads through multi-frame runs.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::float_cmp)]

use std::path::PathBuf;

use squadron::config::{FormationConfig, SquadConfig};
use squadron::formation::{check_invariants, FormationEngine, FrameOutcome, Offset, UnitHandle};
use squadron::roster::{
    DetectionKind, Effect, MoveDirection, RosterMutator, UnitBehavior, UnitFactory, UnitHost,
    UnitRegistry,
};
use squadron::scenario::{run_scenario, Action, Scenario, ScenarioPlayer};
use squadron::squad::Squad;
use squadron::RosterError;
use tempfile::NamedTempFile;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name)
}

#[test]
fn test_bundled_scenario_runs() {
    let config = SquadConfig::load(&fixture("squad_config.json")).unwrap();
    assert_eq!(config.initial_soldiers, 1);
    assert_eq!(config.formation.settle_frames, 3);
    assert_eq!(config.formation.max_soldiers, 10_000);

    let scenario = Scenario::load(&fixture("pickup_run.json")).unwrap();
    let result = run_scenario(&scenario, &config).unwrap();

    assert_eq!(result.snapshots.len(), 240);
    let count_at = |frame: usize| result.snapshots[frame].soldier_count;
    assert_eq!(count_at(9), 1);
    assert_eq!(count_at(10), 5);
    assert_eq!(count_at(60), 15);
    assert_eq!(count_at(120), 9);
    // 9 / 2 = 4.5 rounds away from zero
    assert_eq!(count_at(150), 5);
    assert_eq!(count_at(180), 10);

    assert_eq!(result.final_count, 10);
    assert_eq!(result.spawned, 20);
    assert_eq!(result.despawned, 10);

    // Released left of centre and stays there
    let origin_x = result.snapshots[239].origin.x;
    assert!((origin_x + 240.0 / 1080.0 * 10.0).abs() < 1e-4);
    assert_eq!(result.snapshots[239].direction, MoveDirection::Idle);
}

#[test]
fn test_every_frame_keeps_slots_on_target() {
    let scenario = Scenario::load(&fixture("pickup_run.json")).unwrap();
    let mut player = ScenarioPlayer::new(scenario, SquadConfig::default()).unwrap();

    while !player.is_finished() {
        let snapshot = player.step_forward().unwrap();
        let engine = player.squad().engine();
        assert!(check_invariants(engine).is_empty());
        for (i, p) in snapshot.positions.iter().enumerate() {
            assert_eq!(*p, engine.target_of(i), "frame {} slot {i}", snapshot.frame);
        }
    }
}

#[test]
fn test_settle_window_then_interpolation() {
    let scenario = Scenario::new("settle", 8, 60.0).with_event(0, Action::Effect {
        effect: Effect::Multiply(5.0),
    });
    let result = run_scenario(&scenario, &SquadConfig::default()).unwrap();

    let outcomes: Vec<FrameOutcome> = result.snapshots.iter().map(|s| s.outcome).collect();
    assert_eq!(&outcomes[..4], &[
        FrameOutcome::Settled { remaining: 2 },
        FrameOutcome::Settled { remaining: 1 },
        FrameOutcome::Settled { remaining: 0 },
        FrameOutcome::Interpolated,
    ]);
    assert!(outcomes[4..].iter().all(|o| *o == FrameOutcome::Interpolated));
}

#[test]
fn test_longer_settle_window_from_config() {
    let mut config = SquadConfig::default();
    config.formation.settle_frames = 6;

    let result = run_scenario(&Scenario::new("long", 8, 60.0), &config).unwrap();
    assert_eq!(result.snapshots[5].outcome, FrameOutcome::Settled { remaining: 0 });
    assert_eq!(result.snapshots[6].outcome, FrameOutcome::Interpolated);
}

#[test]
fn test_recorded_session_replays_from_file() {
    let config = SquadConfig::default();
    let mut live = ScenarioPlayer::new(Scenario::new("live", 30, 60.0), config).unwrap();
    for frame in 0..30 {
        match frame {
            3 => live.inject(Action::Press { x: 100.0 }).unwrap(),
            5 => live.inject(Action::Drag { x: 1000.0 }).unwrap(),
            8 => live
                .inject(Action::Effect {
                    effect: Effect::Add(7),
                })
                .unwrap(),
            12 => live.inject(Action::Release).unwrap(),
            _ => {}
        }
        live.step_forward().unwrap();
    }

    let file = NamedTempFile::new().unwrap();
    live.scenario().save(file.path()).unwrap();
    let replayed = run_scenario(&Scenario::load(file.path()).unwrap(), &config).unwrap();

    let squad = live.squad();
    let last = replayed.snapshots.last().unwrap();
    assert_eq!(last.soldier_count, squad.engine().soldier_count());
    assert_eq!(last.origin, squad.origin());
    assert_eq!(replayed.final_count, 8);
}

#[test]
fn test_drag_is_clamped_to_lane() {
    let config = SquadConfig::default();
    let mut squad = Squad::new(&config, Some(UnitRegistry::new()));

    squad.press(0.0);
    squad.drag_to(100_000.0);
    squad.tick(1.0 / 60.0);
    assert_eq!(squad.origin().x, config.drag.max_x);
    assert_eq!(squad.direction(), MoveDirection::Right);

    squad.drag_to(-100_000.0);
    assert_eq!(squad.origin().x, config.drag.min_x);

    // The whole formation moves with the origin
    let local = squad.engine().slot_position(0).unwrap();
    let world = squad.world_position(0).unwrap();
    assert_eq!(world.x, config.drag.min_x + local.x);
}

#[test]
fn test_detection_zone_grows_with_squad() {
    let mut squad = Squad::new(&SquadConfig::default(), Some(UnitRegistry::new()));
    let small = squad.detection_zone(DetectionKind::PowerUp);

    squad.apply_effect(Effect::Add(99));
    let large = squad.detection_zone(DetectionKind::PowerUp);
    assert!(large.radius > small.radius);
    assert!((large.radius - (0.5 * 10.0 + 0.5)).abs() < 1e-5);

    // Every soldier sits inside the enemy zone
    let enemy = squad.detection_zone(DetectionKind::Enemy);
    for i in 0..squad.engine().soldier_count() {
        assert!(enemy.contains(squad.world_position(i).unwrap()));
    }
}

#[test]
fn test_missing_factory_is_non_fatal() {
    let mut engine = FormationEngine::new(&FormationConfig::default());
    let err = RosterMutator::<UnitRegistry>::new(&mut engine, None)
        .add_soldiers(2)
        .unwrap_err();
    assert_eq!(err, RosterError::FactoryUnavailable { requested: 2 });

    // The engine keeps ticking normally
    assert_eq!(engine.update(1.0 / 60.0), FrameOutcome::Interpolated);
    assert!(engine.is_empty());
}

/// A host that counts behaviour calls instead of storing units.
#[derive(Debug, Default)]
struct Counter {
    next: u64,
    fires: usize,
    directions: usize,
}

impl UnitFactory for Counter {
    fn instantiate(&mut self, _slot_index: usize, _position: Offset) -> UnitHandle {
        self.next += 1;
        UnitHandle(self.next)
    }

    fn destroy(&mut self, _unit: UnitHandle) {}
}

impl UnitBehavior for Counter {
    fn start_auto_fire(&mut self, _unit: UnitHandle) {
        self.fires += 1;
    }

    fn stop_auto_fire(&mut self, _unit: UnitHandle) {}

    fn set_move_direction(&mut self, _unit: UnitHandle, _direction: MoveDirection) {
        self.directions += 1;
    }
}

#[test]
fn test_custom_host_sees_every_unit_each_tick() {
    let mut squad = Squad::new(&SquadConfig::default(), Some(Counter::default()));
    squad.apply_effect(Effect::Add(4));
    for _ in 0..10 {
        squad.tick(1.0 / 60.0);
    }

    let counter = squad.units().unwrap();
    assert_eq!(counter.fires, 5);
    assert_eq!(counter.directions, 50);
}

#[test]
fn test_boxed_host_through_mutator() {
    let mut engine = FormationEngine::default();
    let mut host: Box<dyn UnitHost> = Box::new(UnitRegistry::new());
    RosterMutator::new(&mut engine, Some(host.as_mut()))
        .add_soldiers(6)
        .unwrap();
    assert_eq!(engine.soldier_count(), 6);
}
