use anyhow::Context as _;
use bridge_movements::movement::{self, Kind};
use bridge_movements::store::{self, ArrangementStore};
use bridge_movements::validate::{self, ValidationError};
use bridge_movements::{known_seatings, search_seatings, Arrangement};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[cfg(test)]
mod test;

/// Prints log records to stderr, tagged with level and module
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", log_line(record));
        }
    }

    fn flush(&self) {}
}

fn log_line(record: &log::Record) -> String {
    format!("[{:<5} {}] {}", record.level(), record.target(), record.args())
}

static LOGGER: StderrLogger = StderrLogger;

#[derive(Parser)]
#[command(name = "arrange")]
#[command(about = "Generate, check, and store bridge movements", long_about = None)]
struct Cli {
    /// Log level printed to stderr
    #[arg(long, global = true, default_value = "warn")]
    log_level: log::LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a Howell movement
    Howell {
        /// Number of pairs
        #[arg(long)]
        pairs: u8,

        /// Boards per round
        #[arg(long)]
        decks: Option<u8>,

        /// Store file to save the movement in
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Generate a Mitchell movement
    Mitchell {
        /// Number of pairs
        #[arg(long)]
        pairs: u8,

        /// Boards per round
        #[arg(long)]
        decks: Option<u8>,
    },

    /// Search round-1 Howell seatings
    Seatings {
        /// Number of tables
        #[arg(long)]
        tables: usize,
    },

    /// Load and check a stored movement
    Load {
        /// Number of pairs
        #[arg(long)]
        pairs: u8,

        /// Store file
        #[arg(long)]
        store: PathBuf,

        /// Boards per round
        #[arg(long)]
        decks: Option<u8>,
    },
}

const NOT_FOUND: u8 = 2;
const INVALID: u8 = 3;

fn print_arrangement(arrangement: &Arrangement, decks: u8) {
    print!("{}", arrangement.display());

    let boards = arrangement.rounds() * usize::from(decks);
    println!("{decks} boards per round, {boards} boards");

    if let Some(movement) = arrangement.board_movement() {
        println!("Board movement: {movement:?}");
    }
}

fn print_check(name: &str, result: Result<(), ValidationError>) {
    match result {
        Ok(()) => println!("{name}: ok"),
        Err(error) => println!("{name}: {error}"),
    }
}

fn howell(pairs: u8, decks: Option<u8>, store: Option<PathBuf>) -> anyhow::Result<ExitCode> {
    let arrangement = movement::howell(pairs)?;
    validate::validate(&arrangement)?;
    print_arrangement(&arrangement, decks.unwrap_or(Kind::Howell.decks(pairs)));

    if let Some(path) = store {
        ArrangementStore::open(&path)?
            .save(&arrangement)
            .with_context(|| format!("Failed to save to {}", path.display()))?;
    }

    Ok(ExitCode::SUCCESS)
}

fn mitchell(pairs: u8, decks: Option<u8>) -> anyhow::Result<ExitCode> {
    let arrangement = movement::mitchell(pairs)?;
    print_arrangement(&arrangement, decks.unwrap_or(Kind::Mitchell.decks(pairs)));

    for pair in arrangement.pair_ids() {
        if let Some((side, number)) = pair.mitchell_number() {
            println!("Pair {pair:>2} plays as {side} {number}");
        }
    }

    print_check("Movement", validate::check_movement(&arrangement));
    print_check("Pairings", validate::check_pairings(&arrangement));
    print_check("Boards", validate::check_boards(&arrangement));
    Ok(ExitCode::SUCCESS)
}

fn seatings(tables: usize) -> anyhow::Result<ExitCode> {
    let known = known_seatings(tables);

    for seating in search_seatings(tables)? {
        let cached = known.is_some_and(|known| known.iter().any(|&cached| cached == seating.as_slice()));
        println!("{seating:?}{}", if cached { " (cached)" } else { "" });
    }

    Ok(ExitCode::SUCCESS)
}

fn load(pairs: u8, path: PathBuf, decks: Option<u8>) -> anyhow::Result<ExitCode> {
    match store::load_arrangement(pairs, &path) {
        Ok(arrangement) => {
            let kind = Kind::of(&arrangement);
            log::info!("The stored movement for {pairs} pairs is a {kind}");
            print_arrangement(&arrangement, decks.unwrap_or(kind.decks(pairs)));
            Ok(ExitCode::SUCCESS)
        }
        Err(error @ store::Error::NotFound { .. }) => {
            eprintln!("{}: {error}", path.display());
            Ok(ExitCode::from(NOT_FOUND))
        }
        Err(error @ (store::Error::Malformed { .. } | store::Error::Invalid { .. })) => {
            eprintln!("{}: {error}", path.display());
            Ok(ExitCode::from(INVALID))
        }
        Err(error) => Err(error).with_context(|| format!("Failed to read {}", path.display())),
    }
}

#[doc = include_str!("README.md")]
fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    log::set_logger(&LOGGER).context("Failed to install the logger")?;
    log::set_max_level(cli.log_level);

    match cli.command {
        Command::Howell {
            pairs,
            decks,
            store,
        } => howell(pairs, decks, store),
        Command::Mitchell { pairs, decks } => mitchell(pairs, decks),
        Command::Seatings { tables } => seatings(tables),
        Command::Load {
            pairs,
            store,
            decks,
        } => load(pairs, store, decks),
    }
}
