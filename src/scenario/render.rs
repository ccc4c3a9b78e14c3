//! Top-down ASCII plot of a frame for terminal output.

use crate::scenario::FrameSnapshot;

/// Render a snapshot as a `width` x `height` character grid.
///
/// The view is centred on the formation origin and scaled to fit the
/// formation radius. `+` marks the origin, `o` a soldier and `#` a cell
/// holding more than one.
///
/// ```text
/// frame 42  soldiers 7  radius 1.32  interpolated
/// . . . . o . . .
/// . . o . . . o .
/// . . . . + o . .
/// ```
#[must_use]
pub fn render_ascii(snapshot: &FrameSnapshot, width: usize, height: usize) -> String {
    let width = width.max(3);
    let height = height.max(3);
    let mut grid = vec![vec![0u32; width]; height];

    let extent = snapshot.radius.max(1.0) * 1.1;
    for p in &snapshot.positions {
        if let (Some(col), Some(row)) = (cell(p.x, extent, width), cell(-p.z, extent, height)) {
            grid[row][col] += 1;
        }
    }

    let mut output = format!(
        "frame {}  soldiers {}  radius {:.2}  {}\n",
        snapshot.frame, snapshot.soldier_count, snapshot.radius, snapshot.outcome
    );
    let center = (width / 2, height / 2);
    for (row, cells) in grid.iter().enumerate() {
        let line: Vec<&str> = cells
            .iter()
            .enumerate()
            .map(|(col, &n)| match n {
                0 if (col, row) == center => "+",
                0 => ".",
                1 => "o",
                _ => "#",
            })
            .collect();
        output.push_str(&line.join(" "));
        output.push('\n');
    }
    output
}

/// Map a coordinate in `[-extent, extent]` onto `0..cells`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn cell(value: f32, extent: f32, cells: usize) -> Option<usize> {
    let t = (value + extent) / (2.0 * extent);
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some(((t * cells as f32) as usize).min(cells - 1))
}
