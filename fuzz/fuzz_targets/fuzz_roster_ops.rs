#![no_main]

//! Roster session fuzzer.
//!
//! Drives a formation through arbitrary interleavings of mutations, frame
//! updates and update suspension, checking after every step that:
//! 1. Slot indices stay contiguous and positions finite
//! 2. The unit host and the roster agree on the soldier count
//! 3. The re-entrancy guard is released by every mutation
//! 4. An add either lands in full or leaves the roster untouched

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use squadron::config::FormationConfig;
use squadron::formation::{check_invariants, FormationEngine, FrameOutcome};
use squadron::roster::{RosterMutator, UnitRegistry};

/// A fuzzer-generated roster operation.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzOp {
    Add(u8),
    Remove(u8),
    Multiply(f32),
    Divide(f32),
    Update(f32),
    Suspend,
    Resume,
    AddWithoutFactory(u8),
}

/// Structured input for roster fuzzing.
#[derive(Arbitrary, Debug)]
struct RosterInput {
    radius_factor: f32,
    angle_factor: f32,
    settle_frames: u8,
    ops: Vec<FuzzOp>,
}

fuzz_target!(|input: RosterInput| {
    let config = FormationConfig {
        radius_factor: input.radius_factor,
        angle_factor: input.angle_factor,
        settle_frames: u32::from(input.settle_frames % 16),
        max_soldiers: 2_000,
        ..FormationConfig::default()
    }
    .sanitized();
    let mut engine = FormationEngine::new(&config);
    let mut units = UnitRegistry::new();
    let mut suspensions = 0u32;

    for op in input.ops.into_iter().take(64) {
        match op {
            FuzzOp::Add(n) => {
                let before = engine.soldier_count();
                let added = RosterMutator::new(&mut engine, Some(&mut units)).add_soldiers(usize::from(n));
                match added {
                    Ok(report) => assert_eq!(report.after, before + usize::from(n)),
                    Err(_) => assert_eq!(engine.soldier_count(), before),
                }
            }
            FuzzOp::Remove(n) => {
                let _ = RosterMutator::new(&mut engine, Some(&mut units)).remove_soldiers(usize::from(n));
            }
            FuzzOp::Multiply(f) => {
                let _ = RosterMutator::new(&mut engine, Some(&mut units)).multiply_squad(f);
            }
            FuzzOp::Divide(d) => {
                let _ = RosterMutator::new(&mut engine, Some(&mut units)).divide_squad(d);
            }
            FuzzOp::AddWithoutFactory(n) => {
                let before = engine.soldier_count();
                let result = RosterMutator::<UnitRegistry>::new(&mut engine, None).add_soldiers(usize::from(n));
                assert!(result.is_err());
                assert_eq!(engine.soldier_count(), before);
            }
            FuzzOp::Update(dt) => {
                let outcome = engine.update(dt);
                assert_eq!(suspensions > 0, outcome == FrameOutcome::Suppressed);
            }
            FuzzOp::Suspend => {
                engine.suspend_updates();
                suspensions += 1;
            }
            FuzzOp::Resume => {
                engine.resume_updates();
                suspensions = suspensions.saturating_sub(1);
            }
        }

        let violations = check_invariants(&engine);
        assert!(violations.is_empty(), "{violations:?}");
        assert_eq!(units.live_count(), engine.soldier_count());
        assert_eq!(engine.suspensions(), suspensions);
        assert_eq!(engine.settle().update_in_progress(), suspensions > 0);
        for slot in engine.slots() {
            assert!(slot.position.is_finite());
        }
    }
});
