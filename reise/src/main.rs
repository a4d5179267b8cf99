use std::io::{self, Write};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use reise::Error;
use reise::cli::{Args, Invocation, split_flag_clusters};
use reise::commands::Dispatcher;
use reise::config::Config;
use reise::entur::EnturClient;
use reise::prompt::TerminalChooser;
use reise::store::{CacheFile, CacheStore};

fn main() -> ExitCode {
    // Logs go to stderr so departures on stdout stay pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match run(Args::parse_from(split_flag_clusters(std::env::args_os()))) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            if let Some(hint) = e.hint() {
                eprintln!("{hint}");
            }
            e.exit_code()
        }
    }
}

fn run(args: Args) -> Result<(), Error> {
    let command = match args.into_invocation()? {
        Invocation::Help => {
            Args::command().print_help()?;
            return Ok(());
        }
        Invocation::Version => {
            writeln!(io::stdout(), "reise version {}", env!("CARGO_PKG_VERSION"))?;
            return Ok(());
        }
        Invocation::Run(command) => command,
    };

    let config = Config::from_env()?;
    let client = EnturClient::new(config.client).map_err(|e| Error::Config(e.to_string()))?;
    let mut store = CacheStore::open(CacheFile::new(config.cache))?;
    let mut chooser = TerminalChooser::stdio();

    Dispatcher::new(&mut store, &client, &mut chooser, io::stdout().lock()).run(command)
}
