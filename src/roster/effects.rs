//! Gameplay effects on the roster and the detection zones that trigger
//! them.
//!
//! Power-ups grow the squad (add or multiply), obstacles shrink it
//! (subtract or divide). Collision code sizes its overlap queries from
//! the squad radius plus a per-kind padding.

use serde::{Deserialize, Serialize};

use crate::error::RosterResult;
use crate::formation::Offset;
use crate::roster::{MutationReport, RosterMutator, UnitHost};

/// Padding added to the squad radius when looking for enemies.
pub const ENEMY_PADDING: f32 = 1.0;

/// Padding added to the squad radius when looking for power-ups and
/// obstacles.
pub const PICKUP_PADDING: f32 = 0.5;

/// A roster change triggered by gameplay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Effect {
    /// Power-up: add a fixed number of soldiers.
    Add(usize),
    /// Power-up: multiply the squad size.
    Multiply(f32),
    /// Obstacle: remove a fixed number of soldiers.
    Subtract(usize),
    /// Obstacle: divide the squad size.
    Divide(f32),
}

impl Effect {
    /// What kind of object carries this effect.
    #[must_use]
    pub const fn source(&self) -> DetectionKind {
        match self {
            Self::Add(_) | Self::Multiply(_) => DetectionKind::PowerUp,
            Self::Subtract(_) | Self::Divide(_) => DetectionKind::Obstacle,
        }
    }

    /// Apply the effect through `mutator`.
    ///
    /// # Errors
    ///
    /// Propagates [`RosterError`] from growing effects.
    ///
    /// [`RosterError`]: crate::error::RosterError
    pub fn apply<U: UnitHost + ?Sized>(
        self,
        mutator: &mut RosterMutator<'_, U>,
    ) -> RosterResult<MutationReport> {
        match self {
            Self::Add(count) => mutator.add_soldiers(count),
            Self::Multiply(factor) => mutator.multiply_squad(factor),
            Self::Subtract(count) => mutator.remove_soldiers(count),
            Self::Divide(divisor) => mutator.divide_squad(divisor),
        }
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add(count) => write!(f, "+{count}"),
            Self::Multiply(factor) => write!(f, "x{factor}"),
            Self::Subtract(count) => write!(f, "-{count}"),
            Self::Divide(divisor) => write!(f, "/{divisor}"),
        }
    }
}

/// Category of object the squad can run into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionKind {
    /// Hostile units.
    Enemy,
    /// Squad-growing pickups.
    PowerUp,
    /// Squad-shrinking obstacles.
    Obstacle,
}

impl DetectionKind {
    /// Extra reach beyond the squad radius.
    #[must_use]
    pub const fn padding(self) -> f32 {
        match self {
            Self::Enemy => ENEMY_PADDING,
            Self::PowerUp | Self::Obstacle => PICKUP_PADDING,
        }
    }
}

/// Circular overlap query around the squad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionZone {
    /// Centre of the query, in world coordinates on the formation plane.
    pub center: Offset,
    /// Query radius.
    pub radius: f32,
}

impl DetectionZone {
    /// Zone for `kind` around a squad at `center` with the given formation
    /// radius.
    #[must_use]
    pub fn around(center: Offset, squad_radius: f32, kind: DetectionKind) -> Self {
        Self {
            center,
            radius: squad_radius + kind.padding(),
        }
    }

    /// Whether `point` lies inside the zone (boundary inclusive).
    #[must_use]
    pub fn contains(&self, point: Offset) -> bool {
        self.center.distance(point) <= self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formation::FormationEngine;
    use crate::roster::UnitRegistry;

    #[test]
    fn test_effect_sources() {
        assert_eq!(Effect::Add(3).source(), DetectionKind::PowerUp);
        assert_eq!(Effect::Multiply(2.0).source(), DetectionKind::PowerUp);
        assert_eq!(Effect::Subtract(1).source(), DetectionKind::Obstacle);
        assert_eq!(Effect::Divide(2.0).source(), DetectionKind::Obstacle);
    }

    #[test]
    fn test_effects_drive_mutator() {
        let mut engine = FormationEngine::default();
        let mut units = UnitRegistry::new();
        let mut mutator = RosterMutator::new(&mut engine, Some(&mut units));

        assert_eq!(Effect::Add(3).apply(&mut mutator).unwrap().after, 3);
        assert_eq!(Effect::Multiply(3.0).apply(&mut mutator).unwrap().after, 9);
        assert_eq!(Effect::Divide(2.0).apply(&mut mutator).unwrap().after, 5);
        assert_eq!(Effect::Subtract(2).apply(&mut mutator).unwrap().after, 3);
    }

    #[test]
    fn test_effect_json_shape() {
        let json = serde_json::to_string(&Effect::Multiply(2.0)).unwrap();
        assert_eq!(json, r#"{"type":"multiply","value":2.0}"#);

        let parsed: Effect = serde_json::from_str(r#"{"type":"subtract","value":4}"#).unwrap();
        assert_eq!(parsed, Effect::Subtract(4));
    }

    #[test]
    fn test_detection_zone_padding() {
        let zone = DetectionZone::around(Offset::ZERO, 2.0, DetectionKind::Enemy);
        assert_eq!(zone.radius, 3.0);
        assert!(zone.contains(Offset::new(3.0, 0.0)));
        assert!(!zone.contains(Offset::new(2.5, 2.5)));

        let zone = DetectionZone::around(Offset::new(1.0, 1.0), 0.0, DetectionKind::PowerUp);
        assert!(zone.contains(Offset::new(1.3, 1.3)));
        assert!(!zone.contains(Offset::ZERO));
    }

    #[test]
    fn test_effect_display() {
        assert_eq!(Effect::Add(5).to_string(), "+5");
        assert_eq!(Effect::Divide(2.0).to_string(), "/2");
    }
}
