//! Output formatting utilities for CLI.

use serde::Serialize;
use squadron::formation::{FormationParams, Offset, PackingStats};
use squadron::scenario::{FrameSnapshot, ScenarioResult};

/// JSON-serializable slot position.
#[derive(Debug, Serialize)]
pub(super) struct JsonPosition {
    /// Slot index.
    index: usize,
    /// Lateral offset.
    x: f32,
    /// Forward offset.
    z: f32,
}

fn json_positions(positions: &[Offset]) -> Vec<JsonPosition> {
    positions
        .iter()
        .enumerate()
        .map(|(index, p)| JsonPosition {
            index,
            x: p.x,
            z: p.z,
        })
        .collect()
}

/// JSON-serializable formation layout.
#[derive(Debug, Serialize)]
pub(super) struct JsonLayout {
    /// Number of slots.
    count: usize,
    /// Spiral radius factor.
    radius_factor: f32,
    /// Spiral angle factor.
    angle_factor: f32,
    /// Enclosing radius.
    radius: f32,
    /// Target positions by index.
    positions: Vec<JsonPosition>,
}

impl JsonLayout {
    /// Create from layout parameters and positions.
    pub(super) fn new(params: &FormationParams, radius: f32, positions: &[Offset]) -> Self {
        Self {
            count: positions.len(),
            radius_factor: params.radius_factor(),
            angle_factor: params.angle_factor(),
            radius,
            positions: json_positions(positions),
        }
    }
}

/// Format a layout as a human-readable table.
pub(super) fn format_layout_text(params: &FormationParams, radius: f32, positions: &[Offset]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Formation ({} soldiers, radius factor {}, angle factor {})\n",
        positions.len(),
        params.radius_factor(),
        params.angle_factor()
    ));
    output.push_str(&format!("  Radius: {radius:.4}\n\n"));
    output.push_str("  index         x         z      dist\n");
    for (i, p) in positions.iter().enumerate() {
        output.push_str(&format!(
            "  {:>5} {:>9.4} {:>9.4} {:>9.4}\n",
            i,
            p.x,
            p.z,
            p.distance(Offset::ZERO)
        ));
    }

    output
}

/// Format a layout as CSV.
pub(super) fn format_layout_csv(positions: &[Offset]) -> String {
    let mut output = String::from("index,x,z\n");
    for (i, p) in positions.iter().enumerate() {
        output.push_str(&format!("{i},{:.6},{:.6}\n", p.x, p.z));
    }
    output
}

/// JSON-serializable frame summary.
#[derive(Debug, Serialize)]
pub(super) struct JsonFrame {
    /// Zero-based frame number.
    frame: u32,
    /// Update branch taken.
    outcome: String,
    /// Events applied before the update.
    events: usize,
    /// Roster size.
    soldier_count: usize,
    /// Formation radius.
    radius: f32,
    /// Settle frames left.
    settle_remaining: u32,
    /// Origin x.
    origin_x: f32,
    /// Lateral direction (-1, 0, 1).
    direction: i8,
}

impl JsonFrame {
    fn from_snapshot(s: &FrameSnapshot) -> Self {
        Self {
            frame: s.frame,
            outcome: s.outcome.to_string(),
            events: s.events,
            soldier_count: s.soldier_count,
            radius: s.radius,
            settle_remaining: s.settle_remaining,
            origin_x: s.origin.x,
            direction: s.direction.sign(),
        }
    }
}

/// JSON-serializable scenario result.
#[derive(Debug, Serialize)]
pub(super) struct JsonScenarioResult {
    /// Scenario name.
    name: String,
    /// Simulation rate.
    frame_rate: f32,
    /// Roster size at the end.
    final_count: usize,
    /// Units created.
    spawned: u64,
    /// Units destroyed.
    despawned: u64,
    /// Per-frame summaries.
    frames: Vec<JsonFrame>,
    /// Slot positions after the last frame.
    final_positions: Vec<JsonPosition>,
}

impl JsonScenarioResult {
    /// Create from a scenario result.
    pub(super) fn from_result(result: &ScenarioResult) -> Self {
        Self {
            name: result.name.clone(),
            frame_rate: result.frame_rate,
            final_count: result.final_count,
            spawned: result.spawned,
            despawned: result.despawned,
            frames: result.snapshots.iter().map(JsonFrame::from_snapshot).collect(),
            final_positions: result
                .snapshots
                .last()
                .map(|s| json_positions(&s.positions))
                .unwrap_or_default(),
        }
    }
}

/// Format a scenario result as human-readable text.
///
/// With `quiet`, only frames that applied events are listed.
pub(super) fn format_simulation_text(result: &ScenarioResult, quiet: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Scenario '{}' ({} frames @ {} fps)\n\n",
        result.name,
        result.snapshots.len(),
        result.frame_rate
    ));
    output.push_str("  frame  soldiers    radius  settle  origin_x  outcome\n");
    for s in result
        .snapshots
        .iter()
        .filter(|s| !quiet || s.events > 0)
    {
        output.push_str(&format!(
            "  {:>5}  {:>8}  {:>8.3}  {:>6}  {:>8.3}  {}\n",
            s.frame, s.soldier_count, s.radius, s.settle_remaining, s.origin.x, s.outcome
        ));
    }

    output.push_str(&format!(
        "\nFinal soldiers: {}  (spawned {}, despawned {})\n",
        result.final_count, result.spawned, result.despawned
    ));

    output
}

/// Format a scenario result as CSV.
pub(super) fn format_simulation_csv(result: &ScenarioResult) -> String {
    let mut output =
        String::from("frame,soldiers,radius,settle_remaining,origin_x,direction,events,outcome\n");
    for s in &result.snapshots {
        output.push_str(&format!(
            "{},{},{:.6},{},{:.6},{},{},{}\n",
            s.frame,
            s.soldier_count,
            s.radius,
            s.settle_remaining,
            s.origin.x,
            s.direction.sign(),
            s.events,
            s.outcome
        ));
    }
    output
}

/// One measured parameter pair in a sweep.
#[derive(Debug, Clone, Copy, Serialize)]
pub(super) struct SweepRow {
    /// Spiral radius factor.
    pub(super) radius_factor: f32,
    /// Spiral angle factor.
    pub(super) angle_factor: f32,
    /// Smallest pairwise spacing.
    pub(super) min_spacing: f32,
    /// Mean nearest-neighbour spacing.
    pub(super) mean_nearest: f32,
    /// Enclosing radius.
    pub(super) radius: f32,
    /// Spacing evenness (0-1).
    pub(super) evenness: f32,
}

impl SweepRow {
    /// Create from a parameter pair and its measurement.
    pub(super) fn new(params: &FormationParams, stats: &PackingStats) -> Self {
        Self {
            radius_factor: params.radius_factor(),
            angle_factor: params.angle_factor(),
            min_spacing: stats.min_spacing,
            mean_nearest: stats.mean_nearest,
            radius: stats.radius,
            evenness: stats.evenness(),
        }
    }
}

/// Format sweep rows as human-readable text, best first.
pub(super) fn format_sweep_text(rows: &[SweepRow], count: usize, top: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Packing Sweep ({} parameter pairs, {count} soldiers)\n",
        rows.len()
    ));
    output.push_str("========================================\n\n");
    output.push_str("  radius_f  angle_f  evenness  min_spacing  radius\n");
    for row in rows.iter().take(top) {
        output.push_str(&format!(
            "  {:>8.3}  {:>7.3}  {:>8.4}  {:>11.4}  {:>6.3}\n",
            row.radius_factor, row.angle_factor, row.evenness, row.min_spacing, row.radius
        ));
    }
    if rows.len() > top {
        output.push_str(&format!("  ... {} more\n", rows.len() - top));
    }

    output
}

/// Format sweep rows as CSV.
pub(super) fn format_sweep_csv(rows: &[SweepRow]) -> String {
    let mut output =
        String::from("radius_factor,angle_factor,min_spacing,mean_nearest,radius,evenness\n");
    for row in rows {
        output.push_str(&format!(
            "{:.4},{:.4},{:.6},{:.6},{:.6},{:.6}\n",
            row.radius_factor,
            row.angle_factor,
            row.min_spacing,
            row.mean_nearest,
            row.radius,
            row.evenness
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use squadron::config::SquadConfig;
    use squadron::formation::layout;
    use squadron::scenario::{run_scenario, Scenario};

    #[test]
    fn test_layout_csv_rows() {
        let params = FormationParams::default();
        let csv = format_layout_csv(&layout(4, &params));
        assert_eq!(csv.lines().count(), 5);
        assert!(csv.starts_with("index,x,z\n0,"));
    }

    #[test]
    fn test_simulation_outputs() {
        let result = run_scenario(&Scenario::new("quick", 3, 60.0), &SquadConfig::default()).unwrap();

        let text = format_simulation_text(&result, false);
        assert!(text.contains("Scenario 'quick' (3 frames @ 60 fps)"));
        assert!(text.contains("Final soldiers: 1"));

        let csv = format_simulation_csv(&result);
        assert_eq!(csv.lines().count(), 4);

        let json = JsonScenarioResult::from_result(&result);
        assert_eq!(json.frames.len(), 3);
        assert_eq!(json.final_positions.len(), 1);
    }

    #[test]
    fn test_sweep_text_truncates() {
        let params = FormationParams::default();
        let row = SweepRow::new(&params, &PackingStats::measure(&params, 10));
        let text = format_sweep_text(&[row; 5], 10, 2);
        assert!(text.contains("... 3 more"));
    }
}
