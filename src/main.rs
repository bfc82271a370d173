use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use pgnboard::{GameReplayer, Piece, Snapshot};

/// PGN board replay
///
/// Reads the movetext of a single game, replays every half-move from the
/// standard starting position and prints the final board.
///
/// ## Usage Examples:
/// ```bash
/// # Print the final position as a diagram
/// ./pgnboard game.pgn
///
/// # Read from stdin and keep going past moves that cannot be resolved
/// cat game.pgn | ./pgnboard --best-effort -
///
/// # Raw 64-entry row-major snapshot, failing on ambiguous notation
/// ./pgnboard --output snapshot --reject-ambiguous game.pgn
/// ```
#[derive(Parser)]
#[command(name = "pgnboard")]
#[command(about = "Replay PGN movetext and print the final board")]
#[command(version = "0.1.0")]
struct Args {
    /// PGN game file ("-" reads standard input)
    #[arg(value_name = "GAME")]
    game: PathBuf,

    /// Skip half-moves that cannot be resolved instead of stopping
    #[arg(long)]
    best_effort: bool,

    /// Fail when more than one piece could make a move
    #[arg(long)]
    reject_ambiguous: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Board)]
    output: OutputFormat,

    /// Log every resolved half-move (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// 8x8 diagram with rank and file labels
    Board,
    /// 64 entries, rank 8 to rank 1, file a to h
    Snapshot,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let movetext = match read_game(&args.game) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading game '{}': {}", args.game.display(), e);
            process::exit(1);
        }
    };

    let replayer = GameReplayer::new()
        .with_best_effort(args.best_effort)
        .with_reject_ambiguous(args.reject_ambiguous);

    let report = match replayer.replay(&movetext) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error replaying game: {}", e);
            process::exit(1);
        }
    };

    for skipped in &report.skipped {
        eprintln!(
            "Skipped move {} ({}) '{}': {}",
            skipped.number, skipped.color, skipped.token, skipped.error
        );
    }

    let snapshot = report.board.snapshot();
    match args.output {
        OutputFormat::Board => println!("{}", snapshot),
        OutputFormat::Snapshot => println!("{}", row_major_list(&snapshot)),
    }

    if !report.skipped.is_empty() {
        process::exit(2);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_game(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        fs::read_to_string(path)
    }
}

fn row_major_list(snapshot: &Snapshot) -> String {
    snapshot
        .to_row_major()
        .chunks(8)
        .map(|rank| {
            let entries: Vec<String> = rank
                .iter()
                .map(|slot| format!("'{}'", slot.map(Piece::to_char).unwrap_or(' ')))
                .collect();
            format!("[{}]", entries.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
