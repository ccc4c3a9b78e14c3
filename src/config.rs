//! Squad configuration.
//!
//! Every field has a default matching the shipped game tuning, so a
//! config file only needs to name the values it changes. Values outside
//! their valid range are clamped by [`SquadConfig::sanitized`] rather
//! than rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::formation::{
    clamp_unit, DEFAULT_REFERENCE_RATE, DEFAULT_SETTLE_FRAMES, DEFAULT_SMOOTHING, MIN_SMOOTHING,
};

/// Hard ceiling on the roster size, regardless of configuration.
pub const SANITY_MAX_SOLDIERS: usize = 100_000;

/// Longest settle window accepted, in frames.
pub const MAX_SETTLE_FRAMES: u32 = 600;

/// Formation shape and timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    /// Spacing between soldiers, in `[0, 1]` (default: 0.5).
    pub radius_factor: f32,
    /// Fraction of the golden angle per slot, in `[0, 1]` (default: 1.0).
    pub angle_factor: f32,
    /// Frames of forced placement after each roster change (default: 3).
    pub settle_frames: u32,
    /// Fraction of the distance to target covered per reference frame
    /// (default: 0.2).
    pub smoothing: f32,
    /// Frame rate the smoothing factor is expressed at (default: 60).
    pub reference_frame_rate: f32,
    /// Largest roster the mutators will grow to (default: 10,000).
    pub max_soldiers: usize,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            radius_factor: 0.5,
            angle_factor: 1.0,
            settle_frames: DEFAULT_SETTLE_FRAMES,
            smoothing: DEFAULT_SMOOTHING,
            reference_frame_rate: DEFAULT_REFERENCE_RATE,
            max_soldiers: 10_000,
        }
    }
}

/// Pointer drag steering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// World units the squad moves for a drag across the full screen
    /// width (default: 10).
    pub horizontal_speed: f32,
    /// Leftmost squad origin x (default: -6.46).
    pub min_x: f32,
    /// Rightmost squad origin x (default: 6.46).
    pub max_x: f32,
    /// Pointer travel in pixels before a press becomes a drag
    /// (default: 5).
    pub drag_threshold: f32,
    /// Screen width in pixels (default: 1080).
    pub screen_width: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            horizontal_speed: 10.0,
            min_x: -6.46,
            max_x: 6.46,
            drag_threshold: 5.0,
            screen_width: 1080.0,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquadConfig {
    /// Formation shape and timing.
    pub formation: FormationConfig,
    /// Drag steering.
    pub drag: DragConfig,
    /// Soldiers spawned when a squad starts empty (default: 1).
    pub initial_soldiers: usize,
}

impl Default for SquadConfig {
    fn default() -> Self {
        Self {
            formation: FormationConfig::default(),
            drag: DragConfig::default(),
            initial_soldiers: 1,
        }
    }
}

impl SquadConfig {
    /// Load a configuration from a JSON file and sanitize it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.sanitized())
    }

    /// Clamp every field into its valid range, logging each change.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            formation: self.formation.sanitized(),
            drag: self.drag.sanitized(),
            initial_soldiers: clamp_logged(
                "initial_soldiers",
                self.initial_soldiers,
                self.initial_soldiers.min(self.formation.max_soldiers.min(SANITY_MAX_SOLDIERS)),
            ),
        }
    }
}

impl FormationConfig {
    /// Clamp every field into its valid range, logging each change.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let smoothing = if self.smoothing.is_nan() {
            DEFAULT_SMOOTHING
        } else {
            self.smoothing.clamp(MIN_SMOOTHING, 1.0)
        };
        let reference_frame_rate =
            if self.reference_frame_rate.is_finite() && self.reference_frame_rate > 0.0 {
                self.reference_frame_rate
            } else {
                DEFAULT_REFERENCE_RATE
            };

        Self {
            radius_factor: clamp_logged(
                "radius_factor",
                self.radius_factor,
                clamp_unit(self.radius_factor),
            ),
            angle_factor: clamp_logged(
                "angle_factor",
                self.angle_factor,
                clamp_unit(self.angle_factor),
            ),
            settle_frames: clamp_logged(
                "settle_frames",
                self.settle_frames,
                self.settle_frames.min(MAX_SETTLE_FRAMES),
            ),
            smoothing: clamp_logged("smoothing", self.smoothing, smoothing),
            reference_frame_rate: clamp_logged(
                "reference_frame_rate",
                self.reference_frame_rate,
                reference_frame_rate,
            ),
            max_soldiers: clamp_logged(
                "max_soldiers",
                self.max_soldiers,
                self.max_soldiers.min(SANITY_MAX_SOLDIERS),
            ),
        }
    }
}

impl DragConfig {
    /// Clamp every field into its valid range, logging each change.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let finite_or = |name: &str, value: f32, fallback: f32| {
            clamp_logged(name, value, if value.is_finite() { value } else { fallback })
        };

        let min_x = finite_or("min_x", self.min_x, defaults.min_x);
        let max_x = finite_or("max_x", self.max_x, defaults.max_x);
        let (min_x, max_x) = if min_x > max_x {
            warn!(min_x, max_x, "drag bounds inverted; swapping");
            (max_x, min_x)
        } else {
            (min_x, max_x)
        };

        let screen_width = if self.screen_width.is_finite() && self.screen_width > 0.0 {
            self.screen_width
        } else {
            defaults.screen_width
        };
        let drag_threshold = if self.drag_threshold.is_finite() {
            self.drag_threshold.max(0.0)
        } else {
            defaults.drag_threshold
        };

        Self {
            horizontal_speed: finite_or(
                "horizontal_speed",
                self.horizontal_speed,
                defaults.horizontal_speed,
            ),
            min_x,
            max_x,
            drag_threshold: clamp_logged("drag_threshold", self.drag_threshold, drag_threshold),
            screen_width: clamp_logged("screen_width", self.screen_width, screen_width),
        }
    }
}

/// Return `clamped`, warning when it differs from `original`.
fn clamp_logged<T>(field: &str, original: T, clamped: T) -> T
where
    T: PartialEq + std::fmt::Debug,
{
    if original != clamped {
        warn!(field, ?original, ?clamped, "config value out of range; clamped");
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = SquadConfig::default();
        assert_eq!(config.sanitized(), config);
        assert_eq!(config.formation.settle_frames, 3);
        assert_eq!(config.initial_soldiers, 1);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SquadConfig =
            serde_json::from_str(r#"{ "formation": { "radius_factor": 0.8 } }"#).unwrap();
        assert_eq!(config.formation.radius_factor, 0.8);
        assert_eq!(config.formation.angle_factor, 1.0);
        assert_eq!(config.drag, DragConfig::default());
    }

    #[test]
    fn test_sanitize_clamps_formation() {
        let config = FormationConfig {
            radius_factor: 4.0,
            angle_factor: -1.0,
            settle_frames: 10_000,
            smoothing: 0.0,
            reference_frame_rate: 0.0,
            max_soldiers: usize::MAX,
        }
        .sanitized();

        assert_eq!(config.radius_factor, 1.0);
        assert_eq!(config.angle_factor, 0.0);
        assert_eq!(config.settle_frames, MAX_SETTLE_FRAMES);
        assert_eq!(config.smoothing, MIN_SMOOTHING);
        assert_eq!(config.reference_frame_rate, DEFAULT_REFERENCE_RATE);
        assert_eq!(config.max_soldiers, SANITY_MAX_SOLDIERS);
    }

    #[test]
    fn test_sanitize_swaps_inverted_bounds() {
        let drag = DragConfig {
            min_x: 3.0,
            max_x: -3.0,
            screen_width: -10.0,
            ..DragConfig::default()
        }
        .sanitized();

        assert_eq!(drag.min_x, -3.0);
        assert_eq!(drag.max_x, 3.0);
        assert_eq!(drag.screen_width, DragConfig::default().screen_width);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("squad.json");
        std::fs::write(
            &path,
            r#"{ "initial_soldiers": 4, "formation": { "angle_factor": 2.5 } }"#,
        )
        .unwrap();

        let config = SquadConfig::load(&path).unwrap();
        assert_eq!(config.initial_soldiers, 4);
        assert_eq!(config.formation.angle_factor, 1.0);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            SquadConfig::load(&missing),
            Err(ConfigError::Io { .. })
        ));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(SquadConfig::load(&bad), Err(ConfigError::Parse { .. })));
    }
}
