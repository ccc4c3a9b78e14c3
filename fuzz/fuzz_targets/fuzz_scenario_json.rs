#![no_main]

//! Scenario parsing fuzzer.
//!
//! Arbitrary bytes must either fail to parse, fail validation, or play to
//! completion without panicking.

use libfuzzer_sys::fuzz_target;
use squadron::config::SquadConfig;
use squadron::scenario::{run_scenario, Scenario};

fuzz_target!(|data: &[u8]| {
    let Ok(mut scenario) = serde_json::from_slice::<Scenario>(data) else {
        return;
    };
    // Keep runs short
    scenario.frames = scenario.frames.min(256);
    scenario.events.retain(|e| e.frame < scenario.frames);

    let config = SquadConfig {
        formation: squadron::config::FormationConfig {
            max_soldiers: 1_000,
            ..Default::default()
        },
        ..SquadConfig::default()
    };
    if let Ok(result) = run_scenario(&scenario, &config) {
        assert_eq!(result.snapshots.len() as u32, scenario.frames);
        assert!(result.final_count <= 1_000);
    }
});
