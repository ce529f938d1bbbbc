use std::process::ExitCode;

use clap::Parser;
use gitsync::{Res, cli::Args, error::Error};
use log::LevelFilter;

fn main() -> ExitCode {
    let args = Args::parse();

    match start(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn start(args: &Args) -> Res<()> {
    if args.version {
        println!(
            "{} {}",
            gitsync::APP_NAME,
            git_version::git_version!(
                args = ["--tags", "--always", "--dirty=-modified"],
                fallback = "unknown"
            )
        );
        return Ok(());
    }

    if args.log {
        simple_logging::log_to_file("gitsync.log", LevelFilter::Trace)
            .map_err(Error::OpenLogFile)?;
    }

    gitsync::run(args)
}
