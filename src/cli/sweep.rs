//! Sweep command implementation.

use super::output::{format_sweep_csv, format_sweep_text, SweepRow};
use super::{load_config, to_json, CliError, OutputFormat};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use squadron::formation::{FormationParams, PackingStats};
use std::path::PathBuf;
use std::time::Instant;

/// Inclusive range split into evenly spaced samples.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Grid {
    /// First sample.
    pub(crate) min: f32,
    /// Last sample.
    pub(crate) max: f32,
    /// Number of samples (at least 1).
    pub(crate) steps: u32,
}

impl Grid {
    /// Sample `i` of the grid.
    #[allow(clippy::cast_precision_loss)]
    fn value(&self, i: u32) -> f32 {
        if self.steps <= 1 {
            return self.min;
        }
        self.min + (self.max - self.min) * i as f32 / (self.steps - 1) as f32
    }
}

/// Execute the sweep command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the grid is
/// empty.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    radius: Grid,
    angle: Grid,
    count: Option<usize>,
    threads: Option<usize>,
    top: usize,
    format: OutputFormat,
    progress: bool,
    config: Option<PathBuf>,
) -> Result<(), CliError> {
    if radius.steps == 0 || angle.steps == 0 {
        return Err(CliError::new("sweep grid needs at least one step per axis"));
    }
    let config = load_config(config.as_deref())?;
    let count = count.unwrap_or(config.formation.max_soldiers.min(500));

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pairs: Vec<FormationParams> = (0..radius.steps)
        .flat_map(|r| (0..angle.steps).map(move |a| (r, a)))
        .map(|(r, a)| FormationParams::new(radius.value(r), angle.value(a)))
        .collect();

    let pb = if progress {
        let pb = ProgressBar::new(pairs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pairs ({per_sec})")
                .map_err(|e| CliError::new(format!("invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let mut rows: Vec<SweepRow> = pairs
        .par_iter()
        .map(|params| {
            let row = SweepRow::new(params, &PackingStats::measure(params, count));
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            row
        })
        .collect();

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }
    let duration = start.elapsed();

    // Most even first, tighter formation breaks ties
    rows.sort_by(|a, b| {
        b.evenness
            .total_cmp(&a.evenness)
            .then(a.radius.total_cmp(&b.radius))
    });

    match format {
        OutputFormat::Text => {
            print!("{}", format_sweep_text(&rows, count, top));
            println!();
            println!("Duration: {:.2}s", duration.as_secs_f64());
        }
        OutputFormat::Json => println!("{}", to_json(&rows)?),
        OutputFormat::Csv => print!("{}", format_sweep_csv(&rows)),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_endpoints() {
        let grid = Grid {
            min: 0.2,
            max: 1.0,
            steps: 5,
        };
        assert!((grid.value(0) - 0.2).abs() < 1e-6);
        assert!((grid.value(4) - 1.0).abs() < 1e-6);
        assert!((grid.value(2) - 0.6).abs() < 1e-6);

        let single = Grid {
            min: 0.5,
            max: 0.9,
            steps: 1,
        };
        assert!((single.value(0) - 0.5).abs() < 1e-6);
    }
}
