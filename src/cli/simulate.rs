//! Simulate command implementation.

use super::output::{format_simulation_csv, format_simulation_text, JsonScenarioResult};
use super::{load_config, to_json, CliError, OutputFormat};
use squadron::scenario::{render_ascii, run_scenario, Scenario};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Width and height of the final-frame plot.
const PLOT_SIZE: (usize, usize) = (41, 21);

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the scenario or configuration cannot be loaded.
pub(crate) fn execute(
    scenario: PathBuf,
    format: OutputFormat,
    quiet: bool,
    plot: bool,
    config: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let scenario = Scenario::load(&scenario)?;

    let start = Instant::now();
    let result = run_scenario(&scenario, &config)?;
    info!(
        name = %result.name,
        frames = result.snapshots.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "scenario finished"
    );

    match format {
        OutputFormat::Text => {
            print!("{}", format_simulation_text(&result, quiet));
            if plot && let Some(last) = result.snapshots.last() {
                println!();
                print!("{}", render_ascii(last, PLOT_SIZE.0, PLOT_SIZE.1));
            }
        }
        OutputFormat::Json => println!("{}", to_json(&JsonScenarioResult::from_result(&result))?),
        OutputFormat::Csv => print!("{}", format_simulation_csv(&result)),
    }

    Ok(())
}
