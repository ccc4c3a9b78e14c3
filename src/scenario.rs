//! Scripted, replayable squad runs.
//!
//! A [`Scenario`] is a frame count, a fixed frame rate and a timeline of
//! inputs (pickups, obstacles, pointer drags, debug keys). Playback is
//! deterministic, so a scenario doubles as a recording: the interactive
//! viewer saves what the user did as a scenario that replays exactly.

mod player;
mod render;
mod script;

pub use player::{run_scenario, FrameSnapshot, ScenarioPlayer, ScenarioResult};
pub use render::render_ascii;
pub use script::{Action, DebugKey, Scenario, ScriptedEvent};
