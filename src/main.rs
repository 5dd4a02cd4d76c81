use std::error::Error;
use std::io;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use mmdb_lookup::{lookup, Cli, LookupError, EXIT_USAGE};

fn init_logging(level: LevelFilter) {
    // Logs go to stderr; stdout carries only the record.
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn report(err: &LookupError) {
    eprintln!("error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
    log::debug!("{err:?}");
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version land here as well and go to stdout.
            let code = if err.use_stderr() { EXIT_USAGE } else { 0 };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    init_logging(cli.log_level());
    let config = cli.into_config();
    log::info!("looking up {} in {}", config.address, config.database.display());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match lookup::run(&config, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::from(err.exit_code())
        }
    }
}
