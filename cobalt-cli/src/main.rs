mod run;
mod segment;

use std::process::ExitCode;

use clap::{Command, arg};
use env_logger::Env;
use log::error;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "cobalt";
    pub const BIN_NAME: &str = "cobalt";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Copy-number ratios from per-window read depth, with GC bias and diploid correction.")
        .subcommand_required(true)
        .arg(
            arg!(-v --verbose)
                .global(true)
                .help("Log at debug level (RUST_LOG overrides)"),
        )
        .subcommand(run::cli::create_run_cli())
        .subcommand(segment::cli::create_segment_cli())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn main() -> ExitCode {
    let matches = build_parser().get_matches();
    init_logging(matches.get_flag("verbose"));

    let result = match matches.subcommand() {
        //
        // RATIOS
        //
        Some((run::cli::RUN_CMD, matches)) => run::handlers::run_ratios(matches),

        //
        // SEGMENTATION OF AN EXISTING RATIO TABLE
        //
        Some((segment::cli::SEGMENT_CMD, matches)) => segment::handlers::run_segment(matches),

        _ => unreachable!("Subcommand not found"),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{} failed: {:#}", consts::PKG_NAME, e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_parser() {
        build_parser().debug_assert();
    }
}
