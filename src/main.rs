// SPDX-License-Identifier: MIT
//
// vimline: command-line host for the vimline editing engine.
//
// The engine has no UI of its own; this binary drives it over a
// `TextBuffer` with keys from a script instead of a terminal:
//
//   vimline run <DIR>              replay `vim -W` keystroke logs and
//                                  compare against expected buffers
//   vimline keys <NOTATION>        feed `"d2w"`-style keys, print the text
//
// Each key flows through:
//
//   decoder → Session::feed → CommandLine (prompt open) or Engine::handle_key
//           → HostRequest → Session (save, quit, notices)
//
// Logging goes to stderr, filtered by `VIMLINE_LOG`, then `RUST_LOG`,
// then `warn`.

mod prompt;
mod runner;
mod session;

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vimline_engine::{Options, TextBuffer};
use vimline_input::notation;

use crate::session::Session;

/// Exit status when a conformance case fails.
const EXIT_FAILURES: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "vimline", version, about = "Vim-style modal editing engine host")]
struct Cli {
    /// Engine options file (TOML).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay every `test_case_<N>.keystrokes.txt` in a directory.
    Run {
        /// Directory holding the case files.
        dir: PathBuf,
    },
    /// Feed keys in angle-bracket notation and print the resulting text.
    Keys {
        /// Keys to type, e.g. `d2w` or `ci(new<Esc>`.
        notation: String,
        /// Initial buffer text.
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        /// File to edit; `:w` writes it back.
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
        /// Also print the final mode and cursor.
        #[arg(long, short)]
        verbose: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("vimline: {err:#}");
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let options = match &cli.config {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };

    match cli.command {
        Command::Run { dir } => {
            let summary = runner::run(&dir, &options)?;
            Ok(if summary.all_passed() { 0 } else { EXIT_FAILURES })
        }
        Command::Keys {
            notation,
            text,
            file,
            verbose,
        } => {
            keys(&notation, text.as_deref(), file.as_deref(), verbose, options)?;
            Ok(0)
        }
    }
}

fn keys(
    input: &str,
    text: Option<&str>,
    file: Option<&Path>,
    verbose: bool,
    options: Options,
) -> Result<()> {
    let keys = notation::parse(input).context("invalid key notation")?;
    let buffer = match file {
        Some(path) if path.exists() => TextBuffer::from_file(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        _ => TextBuffer::from_text(text.unwrap_or_default()),
    };
    let mut session = Session::new(buffer, options);
    if let Some(path) = file {
        session = session.with_save_path(path.to_path_buf());
    }
    session.feed_all(keys);

    let engine = session.engine();
    println!("{}", engine.text());
    if verbose {
        println!("mode: {}", engine.mode());
        println!("cursor: {}", engine.cursor());
        println!("register: {:?}", engine.register().content());
        if let Some((kind, input)) = session.open_prompt() {
            println!("prompt: {}{input}", kind.prefix());
        }
        if session.has_quit() {
            println!("quit");
        }
    }
    Ok(())
}

/// Install the stderr subscriber. `VIMLINE_LOG` wins over `RUST_LOG`.
fn init_logging() {
    let filter = env::var("VIMLINE_LOG")
        .ok()
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    // A second init (tests, embedding) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
