//! Modes command implementation

use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use crate::config::load_config;
use crate::field::particle_count;
use crate::models::DisasterMode;

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// One row of the modes listing.
#[derive(Debug, Serialize)]
pub(crate) struct ModeInfo {
    pub mode: DisasterMode,
    /// Pixels of viewport per particle
    pub density: f64,
    pub particles: usize,
}

pub(crate) fn mode_table(width: u32, height: u32) -> Vec<ModeInfo> {
    DisasterMode::all()
        .into_iter()
        .map(|mode| ModeInfo {
            mode,
            density: mode.density(),
            particles: particle_count(mode, width, height),
        })
        .collect()
}

/// Execute the modes command
pub fn run_modes(
    width: Option<u32>,
    height: Option<u32>,
    config_path: Option<&Path>,
    json: bool,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let width = width.unwrap_or(config.backdrop.width);
    let height = height.unwrap_or(config.backdrop.height);
    let table = mode_table(width, height);

    if json {
        match serde_json::to_string_pretty(&table) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        println!("Modes at {}x{}:", width, height);
        for row in &table {
            println!("  {:<8} 1 per {:>6} px  {:>4} particles", row.mode.name(), row.density, row.particles);
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}
