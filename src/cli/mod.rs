//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod feed;
mod modes;
mod render;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::feed::FeedKind;
use crate::models::DisasterMode;

pub use render::{parse_resize_event, parse_switch_event, HostEvent, RenderArgs};

/// Process exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Aura Haven - disaster-mode particle backdrops and preparedness feeds
#[derive(Parser)]
#[command(name = "aura")]
#[command(about = "Aura Haven - render disaster-mode particle backdrops and print preparedness feeds")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Simulate a backdrop and write PNG, GIF or frame strip output
    Render(RenderArgs),

    /// List disaster modes with their particle densities
    Modes {
        /// Viewport width used for the particle count (default: config or 1280)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        width: Option<u32>,

        /// Viewport height used for the particle count (default: config or 720)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        height: Option<u32>,

        /// Path to aura.toml (default: discovered from the working directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a preparedness feed document as JSON
    Feed {
        /// Document to print
        #[arg(value_enum)]
        kind: FeedKind,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
}

/// Log level implied by the verbosity flags.
pub fn log_level(verbose: u8, quiet: bool) -> log::LevelFilter {
    if quiet {
        return log::LevelFilter::Error;
    }
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = log_level(verbose, quiet).to_string().to_lowercase();
    // RUST_LOG still wins when set
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Render(args) => render::run_render(&args),
        Commands::Modes { width, height, config, json } => {
            modes::run_modes(width, height, config.as_deref(), json)
        }
        Commands::Feed { kind, pretty } => feed::run_feed(kind, pretty),
    }
}

/// Parse a mode name for clap, listing the choices on failure.
pub(crate) fn parse_mode(s: &str) -> Result<DisasterMode, String> {
    s.parse::<DisasterMode>().map_err(|e| e.to_string())
}
