//! MiniDB interactive shell
//!
//! ```bash
//! # Start the prompt over ./metadata and ./data
//! minidb
//!
//! # Use another storage root and run a single statement
//! minidb --data-dir /tmp/db -c "SELECT * FROM Users"
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use minidb::{
    config::Config,
    error::{Error, Result},
    sql::engine::Session,
};

const PROMPT: &str = "SQL> ";

const HELP: &str = "Supported commands:
  - CREATE TABLE <table_name> (<column> <type>, ...)
  - DROP TABLE <table_name>
  - INSERT INTO <table_name> VALUES (<values>)
  - SELECT * FROM <table_name> [WHERE <column> = <value>]
  - DELETE FROM <table_name> WHERE <column> = <value>
  - UPDATE <table_name> SET <column> = <value> WHERE <column> = <value>
  - EXPORT TABLE <table_name> TO '<file>'";

/// Minimal single-user relational store
#[derive(Parser, Debug)]
#[command(name = "minidb", version, about)]
struct Args {
    /// Storage root holding metadata/ and data/
    #[arg(short = 'd', long, value_name = "DIR", env = "MINIDB_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Execute a single statement and exit
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Suppress banner and prompt
    #[arg(short = 'q', long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("minidb=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("minidb=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    info!(data_dir = %config.data_dir.display(), rewrite = ?config.rewrite, "opening storage");
    let session = Session::new(config.open());

    if let Some(command) = &args.command {
        println!("{}", session.execute(command)?);
        return Ok(());
    }

    repl(&session, args.quiet)
}

fn repl(session: &Session, quiet: bool) -> Result<()> {
    if !quiet {
        println!("Welcome to MiniDB");
        println!("Type 'exit' to quit\n");
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if !quiet {
            print!("{}", PROMPT);
            io::stdout().flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim().trim_end_matches(';').trim_end();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        match session.execute(input) {
            Ok(result) => println!("{}", result),
            Err(Error::Parse(err)) => {
                println!("Unrecognized command: {}", err);
                println!("{}", HELP);
            }
            Err(err) => println!("Error: {}", err),
        }
    }

    if !quiet {
        println!("\nGoodbye!");
    }
    Ok(())
}
