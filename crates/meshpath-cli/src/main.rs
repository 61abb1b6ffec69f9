use std::io;
use std::process::ExitCode;

use clap::Parser;
use meshpath_cli::{Cli, logger};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logger::init(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("meshpath: {e}");
        return ExitCode::FAILURE;
    }

    match meshpath_cli::run(&cli, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
