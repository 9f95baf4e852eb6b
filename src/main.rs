//! proofmark - surrounding pair and alignment highlighting viewer
//!
//! Opens a text file in the terminal and highlights the brackets and
//! quotes around the cursor, an alignment column, and quote marks or
//! search matches in the selection.

mod display;
mod input;
mod report;
mod terminal;
mod viewer;
mod window;

use std::env;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use proofmark::buffer::Buffer;
use proofmark::error::{ProofmarkError, Result};
use proofmark::Config;

use report::{parse_position, render_report, ReportOptions};
use terminal::Terminal;
use viewer::Viewer;

/// Log level filter, e.g. `PROOFMARK_LOG=debug`
const LOG_ENV: &str = "PROOFMARK_LOG";
/// Log destination for the interactive viewer
const LOG_FILE_ENV: &str = "PROOFMARK_LOG_FILE";

/// Parsed command line
#[derive(Debug, Default)]
struct Args {
    file: Option<PathBuf>,
    at: Option<String>,
    align: bool,
    no_surround: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = Args::default();
    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-V" => {
                print_version();
                return Ok(());
            }
            "--at" => {
                let value = iter
                    .next()
                    .ok_or_else(|| ProofmarkError::Message("--at needs LINE:COL".into()))?;
                args.at = Some(value);
            }
            "--align" => args.align = true,
            "--no-surround" => args.no_surround = true,
            _ if arg.starts_with('-') => {
                return Err(ProofmarkError::Message(format!("Unknown option '{}'", arg)));
            }
            _ => args.file = Some(PathBuf::from(arg)),
        }
    }

    let Some(path) = args.file else {
        print_usage();
        return Ok(());
    };

    match args.at {
        Some(at) => {
            init_logging(false)?;
            let config = Config::load()?;
            let options = ReportOptions {
                cursor: parse_position(&at)?,
                surround: !args.no_surround,
                align: args.align,
            };
            let buffer = Buffer::from_file(&path)?;
            print!("{}", render_report(&buffer, config, options)?);
        }
        None => {
            init_logging(true)?;
            let config = Config::load()?;
            let terminal = Terminal::new()?;
            let mut viewer = Viewer::open(terminal, &path, config)?;
            viewer.run()?;
        }
    }
    Ok(())
}

/// Install the tracing subscriber
///
/// The interactive viewer owns the screen, so it only logs when a log file
/// is named; report mode logs to stderr.
fn init_logging(interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    if !interactive {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
        return Ok(());
    }

    if let Some(log_path) = env::var_os(LOG_FILE_ENV) {
        let file = File::create(log_path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}

fn print_usage() {
    println!("proofmark {} - bracket, quote and alignment highlighting", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: proofmark [OPTIONS] FILE");
    println!();
    println!("Options:");
    println!("  --at LINE:COL  Print the highlights for a cursor position and exit");
    println!("  --align        With --at, also show the alignment column left of the cursor");
    println!("  --no-surround  With --at, skip surrounding pair highlights");
    println!("  -h, --help     Show this help message");
    println!("  -V, --version  Show version information");
    println!();
    println!("Key bindings:");
    println!("  Arrows, PgUp, PgDn, Home, End  Move");
    println!("  C-SPC          Set the mark (selection runs from mark to cursor)");
    println!("  Esc, C-g       Clear the mark");
    println!("  F5, C-;        Toggle surrounding quote/bracket highlighting");
    println!("  F6             Toggle the alignment column");
    println!("  F3 / F4        Highlight single / double quotes in the selection");
    println!("  F7             Highlight a string or regex (Tab: exact/regex, C-n: nocase,");
    println!("                 C-w: whole word, C-a: selection/document)");
    println!("  F8, C-0        Remove all highlights");
    println!("  C-l            Redraw screen");
    println!("  C-q            Quit (edits are never saved)");
    println!();
    println!("Config: ~/.proofmark.toml   Logging: {}=debug {}=path", LOG_ENV, LOG_FILE_ENV);
}

fn print_version() {
    println!("proofmark {}", env!("CARGO_PKG_VERSION"));
}
