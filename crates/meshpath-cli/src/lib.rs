//! The `meshpath` command-line driver.
//!
//! # Commands
//!
//! - `path`: shortest path between two vertices of an STL mesh, written as
//!   marker triangles to `<STL>_path.stl`
//! - `bench`: seeded random vertex-pair searches with timing
//!
//! Failures exit with code 1. A query whose ends are not connected is not a
//! failure.

pub mod args;
pub mod commands;
pub mod error;
pub mod logger;

use std::io::Write;

pub use args::{BenchArgs, Cli, Command, Endpoint, PathArgs};
pub use error::CliError;

/// Dispatch a parsed command line. Command output goes to `out`.
pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<(), CliError> {
    match &cli.command {
        Command::Path(args) => commands::path::run(args, &cli.resolve_config(), out).map(drop),
        Command::Bench(args) => commands::bench::run(args, out).map(drop),
    }
}
