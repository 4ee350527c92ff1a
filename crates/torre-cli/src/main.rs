//! `torre` - tower admission and release console.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use torre_core::QueueKind;
use torre_engine::{Config, ListOrder};

#[derive(Parser)]
#[command(name = "torre", version, about = "Tower flight admission and release console")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the registry files and reset both queues
    ImportData,
    /// List flight plans from the registry
    List {
        /// Sort order for the listing
        #[arg(long, value_enum, default_value = "id")]
        by: SortKey,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Admit a flight into the departure or arrival queue
    Enqueue {
        /// Queue to join
        #[arg(value_enum)]
        queue: QueueArg,
        /// Flight id from the plan registry
        #[arg(long)]
        flight: String,
    },
    /// Release the next eligible flight in a queue onto a runway
    Authorize {
        /// Queue to release from
        #[arg(value_enum)]
        queue: QueueArg,
        /// Target runway id
        #[arg(long)]
        runway: String,
    },
    /// Show runways, queues, weather and advisories
    Status {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write the period operations report
    Report,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum QueueArg {
    /// Departure queue
    Departure,
    /// Arrival queue
    Arrival,
}

impl From<QueueArg> for QueueKind {
    fn from(arg: QueueArg) -> Self {
        match arg {
            QueueArg::Departure => QueueKind::Departure,
            QueueArg::Arrival => QueueKind::Arrival,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortKey {
    /// Alphabetical by flight id
    Id,
    /// Earliest scheduled departure first
    DepartureTime,
    /// Emergencies, then commercial, then cargo
    Category,
    /// Highest priority first
    Priority,
}

impl From<SortKey> for ListOrder {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Id => ListOrder::FlightId,
            SortKey::DepartureTime => ListOrder::DepartureTime,
            SortKey::Category => ListOrder::Category,
            SortKey::Priority => ListOrder::Priority,
        }
    }
}

fn main() {
    if let Err(err) = init_tracing() {
        eprintln!("failed to initialize logging: {err}");
        process::exit(1);
    }

    let cli = Cli::parse();
    let config = Config::from_env();
    if let Err(err) = config.ensure_dirs() {
        eprintln!(
            "error: cannot create directories under {}: {err}",
            config.base_dir.display()
        );
        process::exit(1);
    }

    let code = match run(cli.command, &config) {
        Ok(code) => code,
        Err(err) => {
            tracing::warn!(error = %err, "command failed");
            eprintln!("error: {err:#}");
            1
        }
    };
    process::exit(code);
}

// Logs go to stderr so table and JSON output stay clean on stdout.
fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("torre_cli=info".parse()?)
                .add_directive("torre_engine=info".parse()?)
                .add_directive("torre_core=info".parse()?),
        )
        .init();
    Ok(())
}

fn run(command: Command, config: &Config) -> Result<i32> {
    match command {
        Command::ImportData => commands::import_data(config),
        Command::List { by, json } => commands::list(config, by.into(), json),
        Command::Enqueue { queue, flight } => commands::enqueue(config, &flight, queue.into()),
        Command::Authorize { queue, runway } => commands::authorize(config, queue.into(), &runway),
        Command::Status { json } => commands::status(config, json),
        Command::Report => commands::report(config),
    }
}
