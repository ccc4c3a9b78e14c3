//! Golden-angle spiral layout.
//!
//! Slot `i` sits on a Vogel spiral: radius grows with `sqrt(i + 1)` and
//! each successive slot turns by a fixed fraction of the golden angle.
//! The result is an even, non-overlapping cluster whose spacing is set
//! by `radius_factor` and whose braiding is set by `angle_factor`.

use serde::{Deserialize, Serialize};

/// Base angular step in degrees (golden-angle approximation).
pub const GOLDEN_ANGLE_DEG: f32 = 137.5;

/// An offset on the flat formation plane, relative to the squad origin.
///
/// The vertical component is always zero, so only `x` and `z` are stored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    /// Lateral offset.
    pub x: f32,
    /// Forward offset.
    pub z: f32,
}

impl Offset {
    /// The formation origin.
    pub const ZERO: Self = Self { x: 0.0, z: 0.0 };

    /// Create a new offset.
    #[must_use]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Euclidean distance to another offset.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.z - other.z)
    }

    /// Linear interpolation towards `target` by `t`.
    ///
    /// `t = 1.0` lands exactly on `target`.
    #[must_use]
    pub fn lerp(self, target: Self, t: f32) -> Self {
        if t >= 1.0 {
            return target;
        }
        Self {
            x: self.x + (target.x - self.x) * t,
            z: self.z + (target.z - self.z) * t,
        }
    }

    /// Check both components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.z.is_finite()
    }
}

/// Shape parameters of the spiral.
///
/// Both factors are clamped to `[0, 1]` on construction; NaN becomes zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormationParams {
    radius_factor: f32,
    angle_factor: f32,
}

impl Default for FormationParams {
    fn default() -> Self {
        Self {
            radius_factor: 0.5,
            angle_factor: 1.0,
        }
    }
}

impl FormationParams {
    /// Create parameters, clamping both factors into `[0, 1]`.
    #[must_use]
    pub fn new(radius_factor: f32, angle_factor: f32) -> Self {
        Self {
            radius_factor: clamp_unit(radius_factor),
            angle_factor: clamp_unit(angle_factor),
        }
    }

    /// Radial growth rate.
    #[must_use]
    pub const fn radius_factor(&self) -> f32 {
        self.radius_factor
    }

    /// Fraction of the golden angle used per slot.
    #[must_use]
    pub const fn angle_factor(&self) -> f32 {
        self.angle_factor
    }

    /// Angular step between consecutive slots, in degrees.
    #[must_use]
    pub fn angle_step_deg(&self) -> f32 {
        GOLDEN_ANGLE_DEG * self.angle_factor
    }
}

/// Clamp into `[0, 1]`. NaN becomes 0.
pub(crate) fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Target offset for the slot at `index`.
///
/// Pure and deterministic: identical inputs always give bit-identical
/// output, so it is safe to recompute every frame.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn target_position(index: usize, params: &FormationParams) -> Offset {
    let rank = (index + 1) as f32;
    let angle = (params.angle_step_deg() * rank).to_radians();
    let r = params.radius_factor * rank.sqrt();
    Offset {
        x: r * angle.cos(),
        z: r * angle.sin(),
    }
}

/// Radius enclosing a formation of `count` slots.
///
/// Matches the radial term of [`target_position`] at the outermost
/// index (`count - 1`), and is zero for an empty formation.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn radius_for_count(count: usize, params: &FormationParams) -> f32 {
    if count == 0 {
        return 0.0;
    }
    params.radius_factor * (count as f32).sqrt()
}

/// Lay out `count` slots in order.
#[must_use]
pub fn layout(count: usize, params: &FormationParams) -> Vec<Offset> {
    (0..count).map(|i| target_position(i, params)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_slot_matches_closed_form() {
        let params = FormationParams::new(0.5, 1.0);
        let pos = target_position(0, &params);

        let angle = (GOLDEN_ANGLE_DEG * 1.0).to_radians();
        assert_eq!(pos.x, 0.5 * angle.cos());
        assert_eq!(pos.z, 0.5 * angle.sin());
    }

    #[test]
    fn test_target_position_is_pure() {
        let params = FormationParams::new(0.37, 0.81);
        for i in 0..64 {
            assert_eq!(target_position(i, &params), target_position(i, &params));
        }
    }

    #[test]
    fn test_radius_grows_with_sqrt_rank() {
        let params = FormationParams::new(1.0, 1.0);
        let p3 = target_position(3, &params);
        assert!((p3.distance(Offset::ZERO) - 2.0).abs() < 1e-5);

        let p8 = target_position(8, &params);
        assert!((p8.distance(Offset::ZERO) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_params_clamped() {
        let params = FormationParams::new(1.5, -0.2);
        assert_eq!(params.radius_factor(), 1.0);
        assert_eq!(params.angle_factor(), 0.0);

        let params = FormationParams::new(f32::NAN, f32::INFINITY);
        assert_eq!(params.radius_factor(), 0.0);
        assert_eq!(params.angle_factor(), 1.0);
    }

    #[test]
    fn test_zero_radius_collapses_to_origin() {
        let params = FormationParams::new(0.0, 1.0);
        for pos in layout(10, &params) {
            assert_eq!(pos.distance(Offset::ZERO), 0.0);
        }
    }

    #[test]
    fn test_radius_for_count_matches_outermost_slot() {
        let params = FormationParams::new(0.5, 1.0);
        assert_eq!(radius_for_count(0, &params), 0.0);
        for count in 1..50 {
            let outer = target_position(count - 1, &params).distance(Offset::ZERO);
            assert!((radius_for_count(count, &params) - outer).abs() < 1e-5);
        }
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Offset::new(1.0, 2.0);
        let b = Offset::new(-3.0, 4.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        let mid = a.lerp(b, 0.5);
        assert_eq!(mid, Offset::new(-1.0, 3.0));
    }
}
