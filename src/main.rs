use clap::Parser;
use expense_tracker::args::{Args, Command};
use expense_tracker::{commands, Config, Result, Shell};
use std::io;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let config = Config::from_common(args.common())?;
    debug!("Using data file {}", config.data_file().display());

    let _: () = match args.command() {
        Command::Shell => {
            // The menu starts even if the data file is damaged; the damaged file is moved aside.
            let mut store = config.open_store();
            let stdin = io::stdin();
            Shell::new(&mut store, stdin.lock(), io::stdout().lock()).run()?
        }

        Command::Add(add_args) => {
            let mut store = config.load_store()?;
            commands::add(&mut store, add_args)?.print()
        }

        Command::List => commands::list(&config.load_store()?).print(),

        Command::Delete(delete_args) => {
            let mut store = config.load_store()?;
            commands::delete(&mut store, delete_args)?.print()
        }

        Command::Categories => commands::categories(&config.load_store()?).print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
