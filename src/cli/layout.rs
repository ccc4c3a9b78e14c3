//! Layout command implementation.

use super::output::{format_layout_csv, format_layout_text, JsonLayout};
use super::{load_config, to_json, CliError, OutputFormat};
use squadron::formation::{layout, radius_for_count, FormationParams};
use std::path::PathBuf;

/// Execute the layout command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub(crate) fn execute(
    count: usize,
    radius_factor: Option<f32>,
    angle_factor: Option<f32>,
    format: OutputFormat,
    config: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let params = FormationParams::new(
        radius_factor.unwrap_or(config.formation.radius_factor),
        angle_factor.unwrap_or(config.formation.angle_factor),
    );

    let positions = layout(count, &params);
    let radius = radius_for_count(count, &params);

    match format {
        OutputFormat::Text => print!("{}", format_layout_text(&params, radius, &positions)),
        OutputFormat::Json => println!("{}", to_json(&JsonLayout::new(&params, radius, &positions))?),
        OutputFormat::Csv => print!("{}", format_layout_csv(&positions)),
    }

    Ok(())
}
