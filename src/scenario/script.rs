//! Scenario scripts: a fixed frame count and a timeline of inputs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;
use crate::roster::{Effect, MutationReport, UnitHost};
use crate::squad::Squad;

/// Debug shortcuts for poking at the roster by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugKey {
    /// Add one soldier.
    Add,
    /// Remove one soldier.
    Remove,
    /// Double the squad.
    Multiply,
    /// Halve the squad.
    Divide,
}

impl DebugKey {
    /// The roster effect bound to this key.
    #[must_use]
    pub const fn effect(self) -> Effect {
        match self {
            Self::Add => Effect::Add(1),
            Self::Remove => Effect::Subtract(1),
            Self::Multiply => Effect::Multiply(2.0),
            Self::Divide => Effect::Divide(2.0),
        }
    }
}

/// One scripted input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// The squad ran into a power-up or obstacle.
    Effect {
        /// What it does to the roster.
        effect: Effect,
    },
    /// Pointer pressed at screen x.
    Press {
        /// Screen x in pixels.
        x: f32,
    },
    /// Pointer held at screen x.
    Drag {
        /// Screen x in pixels.
        x: f32,
    },
    /// Pointer released.
    Release,
    /// A debug key was pressed.
    DebugKey {
        /// Which key.
        key: DebugKey,
    },
    /// Every soldier starts shooting.
    StartShooting,
    /// Every soldier stops shooting.
    StopShooting,
}

impl Action {
    /// Perform the action on `squad`.
    ///
    /// Returns the mutation report for roster-changing actions that
    /// succeeded.
    pub fn apply<U: UnitHost>(self, squad: &mut Squad<U>) -> Option<MutationReport> {
        match self {
            Self::Effect { effect } => squad.apply_effect(effect),
            Self::DebugKey { key } => squad.apply_effect(key.effect()),
            Self::Press { x } => {
                squad.press(x);
                None
            }
            Self::Drag { x } => {
                squad.drag_to(x);
                None
            }
            Self::Release => {
                squad.release();
                None
            }
            Self::StartShooting => {
                squad.start_shooting();
                None
            }
            Self::StopShooting => {
                squad.stop_shooting();
                None
            }
        }
    }
}

/// An action scheduled before a given frame's update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedEvent {
    /// Zero-based frame the action fires on.
    pub frame: u32,
    /// What happens.
    pub action: Action,
}

/// A deterministic run of the squad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Display name.
    pub name: String,
    /// Number of frames to run.
    pub frames: u32,
    /// Fixed simulation rate in frames per second.
    pub frame_rate: f32,
    /// Timeline, ordered by frame.
    pub events: Vec<ScriptedEvent>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "untitled".to_string(),
            frames: 600,
            frame_rate: 60.0,
            events: Vec::new(),
        }
    }
}

impl Scenario {
    /// An empty scenario.
    #[must_use]
    pub fn new(name: impl Into<String>, frames: u32, frame_rate: f32) -> Self {
        Self {
            name: name.into(),
            frames,
            frame_rate,
            events: Vec::new(),
        }
    }

    /// Schedule `action` on `frame`, after anything already on that frame.
    pub fn push(&mut self, frame: u32, action: Action) {
        let at = self.events.partition_point(|e| e.frame <= frame);
        self.events.insert(at, ScriptedEvent { frame, action });
    }

    /// Builder form of [`push`](Self::push).
    #[must_use]
    pub fn with_event(mut self, frame: u32, action: Action) -> Self {
        self.push(frame, action);
        self
    }

    /// Stably order the timeline by frame; same-frame events keep their
    /// relative order.
    pub fn sort_events(&mut self) {
        self.events.sort_by_key(|e| e.frame);
    }

    /// Seconds per frame.
    #[must_use]
    pub fn dt(&self) -> f32 {
        1.0 / self.frame_rate
    }

    /// Check the frame rate and event frames.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive frame rate or an event past the
    /// last frame.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(ScenarioError::InvalidFrameRate(self.frame_rate));
        }
        if let Some(event) = self.events.iter().find(|e| e.frame >= self.frames) {
            return Err(ScenarioError::EventOutOfRange {
                frame: event.frame,
                frames: self.frames,
            });
        }
        Ok(())
    }

    /// Load and validate a scenario from a JSON file.
    ///
    /// Events are stably sorted by frame, so same-frame events keep file
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut scenario: Self =
            serde_json::from_str(&text).map_err(|source| ScenarioError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        scenario.sort_events();
        scenario.validate()?;
        Ok(scenario)
    }

    /// Write the scenario to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn save(&self, path: &Path) -> Result<(), ScenarioError> {
        let json = serde_json::to_string_pretty(self).map_err(ScenarioError::Encode)?;
        std::fs::write(path, json).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_push_keeps_frame_order() {
        let mut scenario = Scenario::new("order", 10, 60.0);
        scenario.push(5, Action::Release);
        scenario.push(1, Action::Press { x: 10.0 });
        scenario.push(5, Action::StopShooting);

        let kinds: Vec<Action> = scenario.events.iter().map(|e| e.action).collect();
        assert_eq!(
            kinds,
            vec![Action::Press { x: 10.0 }, Action::Release, Action::StopShooting]
        );
    }

    #[test]
    fn test_validate() {
        assert!(Scenario::new("ok", 10, 30.0).validate().is_ok());

        let err = Scenario::new("rate", 10, 0.0).validate().unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidFrameRate(_)));

        let late = Scenario::new("late", 10, 60.0).with_event(10, Action::Release);
        assert!(matches!(
            late.validate(),
            Err(ScenarioError::EventOutOfRange { frame: 10, frames: 10 })
        ));
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{
            "name": "pickup",
            "frames": 30,
            "events": [
                {"frame": 4, "action": {"kind": "debug_key", "key": "multiply"}},
                {"frame": 2, "action": {"kind": "effect", "effect": {"type": "add", "value": 3}}},
                {"frame": 2, "action": {"kind": "press", "x": 540.0}}
            ]
        }"#;
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), json).unwrap();

        let scenario = Scenario::load(file.path()).unwrap();
        assert_eq!(scenario.frame_rate, 60.0);
        assert_eq!(scenario.events[0].action, Action::Effect {
            effect: Effect::Add(3)
        });
        assert_eq!(scenario.events[1].action, Action::Press { x: 540.0 });
        assert_eq!(scenario.events[2].frame, 4);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let scenario = Scenario::new("saved", 20, 30.0)
            .with_event(0, Action::DebugKey { key: DebugKey::Add })
            .with_event(3, Action::Drag { x: 12.5 });
        let file = NamedTempFile::new().unwrap();
        scenario.save(file.path()).unwrap();
        assert_eq!(Scenario::load(file.path()).unwrap(), scenario);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Scenario::load(Path::new("/nonexistent/scenario.json")).unwrap_err();
        assert!(matches!(err, ScenarioError::Io { .. }));
    }

    #[test]
    fn test_debug_key_effects() {
        assert_eq!(DebugKey::Add.effect(), Effect::Add(1));
        assert_eq!(DebugKey::Remove.effect(), Effect::Subtract(1));
        assert_eq!(DebugKey::Multiply.effect(), Effect::Multiply(2.0));
        assert_eq!(DebugKey::Divide.effect(), Effect::Divide(2.0));
    }
}
