//! Deterministic scenario playback.
//!
//! A run is fully determined by the scenario and the configuration, so
//! seeking never needs stored state:
//! - **Forward**: apply the frame's events, then tick the squad
//! - **Backward**: re-run from frame 0 to (current_frame - 1)
//! - **Jump to frame N**: re-run from frame 0 to N

use crate::config::SquadConfig;
use crate::error::ScenarioError;
use crate::formation::{FrameOutcome, Offset};
use crate::roster::{MoveDirection, UnitRegistry};
use crate::scenario::{Action, Scenario};
use crate::squad::Squad;

/// State of the squad after one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    /// Zero-based frame number.
    pub frame: u32,
    /// Branch the formation update took.
    pub outcome: FrameOutcome,
    /// Events applied before the update.
    pub events: usize,
    /// Roster size.
    pub soldier_count: usize,
    /// Formation radius.
    pub radius: f32,
    /// Settle frames left.
    pub settle_remaining: u32,
    /// Formation origin.
    pub origin: Offset,
    /// Lateral direction reported to units.
    pub direction: MoveDirection,
    /// Slot positions relative to the origin, by index.
    pub positions: Vec<Offset>,
}

/// Outcome of a complete run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    /// Scenario name.
    pub name: String,
    /// Simulation rate the run used.
    pub frame_rate: f32,
    /// One snapshot per frame.
    pub snapshots: Vec<FrameSnapshot>,
    /// Roster size after the last frame.
    pub final_count: usize,
    /// Units created over the run, including the initial seed.
    pub spawned: u64,
    /// Units destroyed over the run.
    pub despawned: u64,
}

/// Steps a squad through a scenario.
#[derive(Debug)]
pub struct ScenarioPlayer {
    scenario: Scenario,
    config: SquadConfig,
    squad: Squad<UnitRegistry>,
    frame: u32,
    cursor: usize,
}

impl ScenarioPlayer {
    /// Start a scenario at frame 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario does not validate.
    pub fn new(scenario: Scenario, config: SquadConfig) -> Result<Self, ScenarioError> {
        Self::new_at_frame(scenario, config, 0)
    }

    /// Start a scenario and run it up to `target` frames.
    ///
    /// Events are stably sorted by frame first, so a hand-built timeline
    /// plays the same as one loaded from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario does not validate or `target` is
    /// past its end.
    pub fn new_at_frame(
        mut scenario: Scenario,
        config: SquadConfig,
        target: u32,
    ) -> Result<Self, ScenarioError> {
        scenario.sort_events();
        scenario.validate()?;
        if target > scenario.frames {
            return Err(ScenarioError::FrameOutOfBounds {
                requested: target,
                frames: scenario.frames,
            });
        }

        let mut player = Self {
            squad: Squad::new(&config, Some(UnitRegistry::new())),
            scenario,
            config,
            frame: 0,
            cursor: 0,
        };
        for _ in 0..target {
            player.advance();
        }
        Ok(player)
    }

    /// The scenario being played, including injected events.
    #[must_use]
    pub const fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Configuration the squad was built from.
    #[must_use]
    pub const fn config(&self) -> &SquadConfig {
        &self.config
    }

    /// The squad in its current state.
    #[must_use]
    pub const fn squad(&self) -> &Squad<UnitRegistry> {
        &self.squad
    }

    /// Frames played so far.
    #[must_use]
    pub const fn frame(&self) -> u32 {
        self.frame
    }

    /// Whether every frame has been played.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.frame >= self.scenario.frames
    }

    /// Play one frame.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::FrameOutOfBounds`] once the scenario is
    /// finished.
    pub fn step_forward(&mut self) -> Result<FrameSnapshot, ScenarioError> {
        if self.is_finished() {
            return Err(ScenarioError::FrameOutOfBounds {
                requested: self.frame + 1,
                frames: self.scenario.frames,
            });
        }
        Ok(self.advance())
    }

    /// Go back one frame by replaying from the start.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::FrameOutOfBounds`] at frame 0.
    pub fn step_backward(&mut self) -> Result<(), ScenarioError> {
        let Some(target) = self.frame.checked_sub(1) else {
            return Err(ScenarioError::FrameOutOfBounds {
                requested: 0,
                frames: self.scenario.frames,
            });
        };
        self.goto_frame(target)
    }

    /// Jump to `target` frames played by replaying from the start.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::FrameOutOfBounds`] past the end.
    pub fn goto_frame(&mut self, target: u32) -> Result<(), ScenarioError> {
        *self = Self::new_at_frame(self.scenario.clone(), self.config, target)?;
        Ok(())
    }

    /// Record `action` for the next frame to be played.
    ///
    /// The action lands after any scripted events for that frame, so
    /// replays reproduce it in the same order.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::FrameOutOfBounds`] once the scenario is
    /// finished.
    pub fn inject(&mut self, action: Action) -> Result<(), ScenarioError> {
        if self.is_finished() {
            return Err(ScenarioError::FrameOutOfBounds {
                requested: self.frame,
                frames: self.scenario.frames,
            });
        }
        self.scenario.push(self.frame, action);
        Ok(())
    }

    /// Snapshot of the current state without advancing.
    #[must_use]
    pub fn snapshot(&self, outcome: FrameOutcome, events: usize) -> FrameSnapshot {
        let engine = self.squad.engine();
        FrameSnapshot {
            frame: self.frame.saturating_sub(1),
            outcome,
            events,
            soldier_count: engine.soldier_count(),
            radius: engine.radius(),
            settle_remaining: engine.settle().frames_remaining(),
            origin: self.squad.origin(),
            direction: self.squad.direction(),
            positions: engine.slots().iter().map(|s| s.position).collect(),
        }
    }

    fn advance(&mut self) -> FrameSnapshot {
        let mut applied = 0;
        while let Some(event) = self.scenario.events.get(self.cursor) {
            if event.frame != self.frame {
                break;
            }
            event.action.apply(&mut self.squad);
            self.cursor += 1;
            applied += 1;
        }

        let outcome = self.squad.tick(self.scenario.dt());
        self.frame += 1;
        self.snapshot(outcome, applied)
    }
}

/// Play `scenario` from start to finish.
///
/// # Errors
///
/// Returns an error if the scenario does not validate.
pub fn run_scenario(
    scenario: &Scenario,
    config: &SquadConfig,
) -> Result<ScenarioResult, ScenarioError> {
    let mut player = ScenarioPlayer::new(scenario.clone(), *config)?;
    let mut snapshots = Vec::with_capacity(scenario.frames as usize);
    while !player.is_finished() {
        snapshots.push(player.step_forward()?);
    }

    let squad = player.squad();
    let (spawned, despawned) = squad
        .units()
        .map_or((0, 0), |u| (u.spawned(), u.despawned()));
    Ok(ScenarioResult {
        name: scenario.name.clone(),
        frame_rate: scenario.frame_rate,
        snapshots,
        final_count: squad.engine().soldier_count(),
        spawned,
        despawned,
    })
}
