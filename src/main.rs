//! Aura Haven - command-line tool for rendering disaster backdrops

use std::process::ExitCode;

use aura_haven::cli;

fn main() -> ExitCode {
    cli::run()
}
