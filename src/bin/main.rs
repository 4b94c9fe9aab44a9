//! Parley CLI - run board operations against a local store
//!
//! Usage:
//!   parley init
//!   parley sql <intent>
//!   parley ask <intent> [--param <value>]...
//!   parley list
//!   parley vote <message> <user> <value>
//!   parley react <message> <user> <emoji>
//!
//! Examples:
//!   parley ask "Get the user whose userId is ?1" --param 7
//!   parley vote 3 7 -1

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use parley::board::Board;
use parley::compiler::{CompilerOptions, QueryCompiler};
use parley::config::Settings;
use parley::executor::{Row, Scalar, SqliteExecutor};
use parley::synth::DeferredSynthesizer;
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Parley - a discussion board whose queries are written by a language model")]
#[command(version)]
struct Cli {
    /// Path to a config file (defaults to PARLEY_CONFIG, ./parley.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the board tables
    Init,

    /// Compile an intent and print the SQL without running it
    Sql {
        /// Natural-language intent
        intent: String,
    },

    /// Compile an intent, run it and print the rows as JSON
    Ask {
        /// Natural-language intent
        intent: String,

        /// Positional parameter bound as ?1, ?2, ... (repeatable)
        #[arg(short, long = "param", allow_hyphen_values = true)]
        params: Vec<String>,
    },

    /// List messages, newest first
    List,

    /// Toggle a vote (1 or -1)
    Vote {
        message: i64,
        user: i64,
        #[arg(allow_hyphen_values = true)]
        value: i64,
    },

    /// Toggle an emoji reaction
    React {
        message: i64,
        user: i64,
        emoji: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("PARLEY_LOG").unwrap_or_else(|_| EnvFilter::new("parley=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> CliResult<()> {
    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::load()?,
    };

    let executor = SqliteExecutor::open_with(
        settings.database.resolved_path()?,
        settings.database.foreign_keys,
    )?;

    if let Commands::Init = cli.command {
        executor.install_schema().await?;
        println!("Schema installed");
        return Ok(());
    }

    let board = build_board(&settings, executor);

    match cli.command {
        Commands::Init => {}
        Commands::Sql { intent } => {
            let statement = board.compiler().compile(&intent, &[]).await?;
            println!("-- kind: {}", statement.kind);
            println!("{}", statement.sql);
        }
        Commands::Ask { intent, params } => {
            let params: Vec<Scalar> = params.iter().map(|p| Scalar::from_literal(p)).collect();
            let rows = board.compiler().compile_and_run(&intent, &params).await?;
            print_rows(&rows)?;
        }
        Commands::List => {
            let rows = board.list_messages().await?;
            print_rows(&rows)?;
        }
        Commands::Vote {
            message,
            user,
            value,
        } => {
            let outcome = board.vote(message, user, value).await?;
            println!("{:?}", outcome);
        }
        Commands::React {
            message,
            user,
            emoji,
        } => {
            let outcome = board.react(message, user, &emoji).await?;
            println!("{:?}", outcome);
        }
    }

    Ok(())
}

/// The completion client is built on the first synthesis, so `list` and
/// atomic toggles run without an API key.
fn build_board(settings: &Settings, executor: SqliteExecutor) -> Board {
    let compiler = QueryCompiler::new(
        Arc::new(DeferredSynthesizer::new(settings.completion.clone())),
        Arc::new(executor),
    )
    .with_options(CompilerOptions::from(&settings.compiler));

    Board::from_settings(compiler, settings)
}

fn print_rows(rows: &[Row]) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}
