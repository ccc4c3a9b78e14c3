//! Packing quality of a laid-out formation.
//!
//! Used to tune `radius_factor` / `angle_factor`: a good pair keeps the
//! nearest-neighbour spacing even while the overall radius stays small.

use crate::formation::{layout, radius_for_count, FormationParams, Offset};

/// Spacing statistics for `count` slots under one parameter pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackingStats {
    /// Number of slots measured.
    pub count: usize,
    /// Smallest distance between any two slots (0 below two slots).
    pub min_spacing: f32,
    /// Mean distance from each slot to its nearest neighbour.
    pub mean_nearest: f32,
    /// Enclosing radius of the formation.
    pub radius: f32,
}

impl PackingStats {
    /// Lay out `count` slots and measure them.
    ///
    /// Quadratic in `count`.
    #[must_use]
    pub fn measure(params: &FormationParams, count: usize) -> Self {
        let positions = layout(count, params);
        let nearest = nearest_distances(&positions);

        let (min_spacing, mean_nearest) = if nearest.is_empty() {
            (0.0, 0.0)
        } else {
            let min = nearest.iter().copied().fold(f32::INFINITY, f32::min);
            #[allow(clippy::cast_precision_loss)]
            let mean = nearest.iter().sum::<f32>() / nearest.len() as f32;
            (min, mean)
        };

        Self {
            count,
            min_spacing,
            mean_nearest,
            radius: radius_for_count(count, params),
        }
    }

    /// Ratio of the smallest to the mean nearest-neighbour spacing.
    ///
    /// 1.0 is perfectly even; values near 0 mean some slots overlap.
    #[must_use]
    pub fn evenness(&self) -> f32 {
        if self.mean_nearest > 0.0 {
            self.min_spacing / self.mean_nearest
        } else {
            0.0
        }
    }
}

/// Nearest-neighbour distance of every position. Empty below two points.
fn nearest_distances(positions: &[Offset]) -> Vec<f32> {
    if positions.len() < 2 {
        return Vec::new();
    }
    positions
        .iter()
        .enumerate()
        .map(|(i, a)| {
            positions
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, b)| a.distance(*b))
                .fold(f32::INFINITY, f32::min)
        })
        .collect()
}
