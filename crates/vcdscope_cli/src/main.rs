//! vcdscope: a terminal viewer for Value Change Dump waveforms.
//!
//! Provides `vcdscope view` for the interactive command loop, `vcdscope list`
//! for the signal table, `vcdscope show` for rendering a time window and
//! `vcdscope value` for point queries.

#![warn(missing_docs)]

mod error;
mod list;
mod pipeline;
mod render;
mod selection;
mod session;
mod show;
mod value;
mod view;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Inspect VCD waveforms from the terminal.
#[derive(Parser, Debug)]
#[command(name = "vcdscope", version, about = "Terminal VCD waveform viewer")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print parse statistics.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `vcdscope.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open a dump in the interactive command loop.
    View(FileArgs),
    /// List the canonical keys of every signal.
    List(ListArgs),
    /// Render signals over a time window.
    Show(ShowArgs),
    /// Print the value a signal holds at a time.
    Value(ValueArgs),
}

/// Arguments for `vcdscope view`.
#[derive(Parser, Debug)]
pub struct FileArgs {
    /// The dump to open (`.vcd` or `.vcd.gz`).
    pub file: PathBuf,
}

/// Arguments for `vcdscope list`.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// The dump to read.
    pub file: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `vcdscope show`.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// The dump to read.
    pub file: PathBuf,

    /// Canonical keys of the signals to render.
    #[arg(required = true)]
    pub keys: Vec<String>,

    /// Window start time (default from config).
    #[arg(long)]
    pub start: Option<u64>,

    /// Window length in time units (default from config).
    #[arg(long)]
    pub length: Option<u64>,

    /// Time units per column (default from config).
    #[arg(long)]
    pub stride: Option<u64>,
}

/// Arguments for `vcdscope value`.
#[derive(Parser, Debug)]
pub struct ValueArgs {
    /// The dump to read.
    pub file: PathBuf,

    /// Canonical key of the signal.
    pub key: String,

    /// The time to query.
    pub time: u64,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stdout is a terminal.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Output format for `list`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// One key per line.
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Global settings derived from CLI flags.
#[derive(Clone, Debug)]
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print parse statistics.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stdout().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::View(ref args) => view::run(args, &global),
        Command::List(ref args) => list::run(args, &global),
        Command::Show(ref args) => show::run(args, &global),
        Command::Value(ref args) => value::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
