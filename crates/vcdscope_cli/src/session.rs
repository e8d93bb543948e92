//! The `vcdscope view` command loop.
//!
//! Reads one command per line, keeps a signal selection and a time window over
//! the loaded dump, and prints rendered windows on request.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use vcdscope_config::ViewerConfig;
use vcdscope_vcd::ParseOptions;

use crate::error::CliError;
use crate::pipeline::{load_waveform, LoadedWaveform};
use crate::render::{render_window, RenderOptions};
use crate::selection::Selection;
use crate::GlobalArgs;

/// How far `f` moves the window, in time units.
const FORWARD_STEP: u64 = 5;

/// A parsed command-loop command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewCommand {
    /// Leave the loop.
    Quit,
    /// Show the command list.
    Help,
    /// Render the selected signals over the current window.
    Print,
    /// Move the window forward and render.
    Forward,
    /// Set the window and render.
    Range {
        /// New window start.
        start: u64,
        /// New window length.
        length: u64,
    },
    /// Re-read the current file.
    Reload,
    /// Switch to another file.
    Load(PathBuf),
    /// List all signals.
    Signals {
        /// One key per line instead of space-separated.
        one_per_line: bool,
    },
    /// Add keys to the selection.
    Add(Vec<String>),
    /// Select every signal.
    AddAll,
    /// Remove keys from the selection.
    Delete(Vec<String>),
    /// Clear the selection.
    DeleteAll,
    /// Write the selection to the selection file.
    SaveSelection,
    /// Replace the selection from the selection file.
    LoadSelection,
    /// Show timescale, max time and window.
    Time,
}

/// What the loop should do after a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// Print the text and keep reading.
    Output(String),
    /// Stop reading.
    Quit,
}

/// Parses one line of input.
pub fn parse_command(input: &str) -> Result<ViewCommand, String> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let Some((&cmd, args)) = parts.split_first() else {
        return Err("empty command".to_string());
    };
    let keys = || args.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    match cmd {
        "q" => Ok(ViewCommand::Quit),
        "help" => Ok(ViewCommand::Help),
        "p" => Ok(ViewCommand::Print),
        "f" => Ok(ViewCommand::Forward),
        "r" => match args {
            [] => Ok(ViewCommand::Reload),
            [start, length] => Ok(ViewCommand::Range {
                start: parse_time(start, "start")?,
                length: parse_time(length, "length")?,
            }),
            _ => Err("r takes a start and a length, or nothing to reload".to_string()),
        },
        "l" => match args {
            [file] => Ok(ViewCommand::Load(PathBuf::from(file))),
            _ => Err("l requires a file".to_string()),
        },
        "s" => Ok(ViewCommand::Signals {
            one_per_line: false,
        }),
        "ss" => Ok(ViewCommand::Signals { one_per_line: true }),
        "a" if args.is_empty() => Err("a requires signal key(s)".to_string()),
        "a" => Ok(ViewCommand::Add(keys())),
        "aa" => Ok(ViewCommand::AddAll),
        "d" if args.is_empty() => Err("d requires signal key(s)".to_string()),
        "d" => Ok(ViewCommand::Delete(keys())),
        "da" => Ok(ViewCommand::DeleteAll),
        "sc" => Ok(ViewCommand::SaveSelection),
        "lc" => Ok(ViewCommand::LoadSelection),
        "t" => Ok(ViewCommand::Time),
        _ => Err(format!("unknown command {cmd}")),
    }
}

fn parse_time(text: &str, what: &str) -> Result<u64, String> {
    text.parse()
        .map_err(|_| format!("invalid {what} '{text}': expected a non-negative integer"))
}

/// State of one command-loop session.
#[derive(Debug)]
pub struct Session {
    waveform: LoadedWaveform,
    options: ParseOptions,
    selection: Selection,
    selection_file: PathBuf,
    start: u64,
    length: u64,
    stride: u64,
    name_width: usize,
    global: GlobalArgs,
}

impl Session {
    /// Creates a session over `waveform` with the window from `config`.
    pub fn new(waveform: LoadedWaveform, config: &ViewerConfig, global: GlobalArgs) -> Self {
        Self {
            waveform,
            options: config.parse_options(),
            selection: Selection::new(),
            selection_file: config.selection.file.clone(),
            start: config.view.start,
            length: config.view.length,
            stride: config.view.stride,
            name_width: config.view.name_width,
            global,
        }
    }

    /// Runs one command.
    pub fn execute(&mut self, cmd: &ViewCommand) -> Result<CommandResult, CliError> {
        let text = match cmd {
            ViewCommand::Quit => return Ok(CommandResult::Quit),
            ViewCommand::Help => help_text(),
            ViewCommand::Print => self.print()?,
            ViewCommand::Forward => {
                let max = self.waveform.store.max_time();
                self.start = self.start.saturating_add(FORWARD_STEP).min(max);
                self.print()?
            }
            ViewCommand::Range { start, length } => {
                self.start = *start;
                self.length = *length;
                self.print()?
            }
            ViewCommand::Reload => self.reload()?,
            ViewCommand::Load(path) => {
                self.waveform = load_waveform(path, &self.options, &self.global)?;
                format!("loaded {}", self.summary())
            }
            ViewCommand::Signals { one_per_line } => self.signals(*one_per_line),
            ViewCommand::Add(keys) => self.add(keys),
            ViewCommand::AddAll => {
                let before = self.selection.len();
                for entry in self.waveform.store.list_signals() {
                    self.selection.add(&entry.key());
                }
                format!("added {} signals", self.selection.len() - before)
            }
            ViewCommand::Delete(keys) => {
                let mut lines = Vec::new();
                for key in keys {
                    if !self.selection.remove(key) {
                        lines.push(format!("`{key}` is not selected"));
                    }
                }
                lines.push(format!("{} signals selected", self.selection.len()));
                lines.join("\n")
            }
            ViewCommand::DeleteAll => {
                self.selection.clear();
                "selection cleared".to_string()
            }
            ViewCommand::SaveSelection => {
                self.selection.save(&self.selection_file)?;
                format!(
                    "saved {} signals to {}",
                    self.selection.len(),
                    self.selection_file.display()
                )
            }
            ViewCommand::LoadSelection => {
                self.selection = Selection::load(&self.selection_file)?;
                let unresolved = self
                    .selection
                    .keys()
                    .iter()
                    .filter(|key| self.waveform.store.find_by_key(key).is_none())
                    .count();
                let mut text = format!(
                    "loaded {} signals from {}",
                    self.selection.len(),
                    self.selection_file.display()
                );
                if unresolved > 0 {
                    text.push_str(&format!(" ({unresolved} not in this file)"));
                }
                text
            }
            ViewCommand::Time => self.time(),
        };
        Ok(CommandResult::Output(text))
    }

    fn print(&self) -> Result<String, CliError> {
        if self.selection.is_empty() {
            return Ok("no signals selected (use `a <key>` or `aa`)".to_string());
        }
        let opts = RenderOptions {
            start: self.start,
            length: self.length,
            stride: self.stride,
            name_width: self.name_width,
            color: self.global.color,
        };
        let text = render_window(&self.waveform.store, self.selection.keys(), &opts)?;
        Ok(text.trim_end_matches('\n').to_string())
    }

    /// Loads the current file again; the old store stays if that fails.
    fn reload(&mut self) -> Result<String, CliError> {
        let path = self.waveform.path.clone();
        let fresh = load_waveform(&path, &self.options, &self.global)?;
        if fresh.hash == self.waveform.hash {
            return Ok(format!("{} is unchanged", path.display()));
        }
        self.waveform = fresh;
        Ok(format!("reloaded {}", self.summary()))
    }

    fn summary(&self) -> String {
        let store = &self.waveform.store;
        format!(
            "{}: {} signals, max time #{}",
            self.waveform.path.display(),
            store.signal_count(),
            store.max_time()
        )
    }

    fn signals(&self, one_per_line: bool) -> String {
        let entries = self.waveform.store.list_signals();
        if entries.is_empty() {
            return "no signals".to_string();
        }
        let marked = entries.iter().map(|entry| {
            let key = entry.key();
            let mark = if self.selection.contains(&key) { "->" } else { "" };
            (mark, key)
        });
        if one_per_line {
            let lines: Vec<String> = marked
                .map(|(mark, key)| format!("{mark:<3}{key}"))
                .collect();
            format!("Signals:\n{}", lines.join("\n"))
        } else {
            let words: Vec<String> = marked.map(|(mark, key)| format!("{mark}{key}")).collect();
            format!("Signals: {}", words.join(" "))
        }
    }

    fn add(&mut self, keys: &[String]) -> String {
        let mut lines = Vec::new();
        let mut added = 0;
        for key in keys {
            if self.waveform.store.find_by_key(key).is_none() {
                lines.push(format!("no signal named `{key}`"));
            } else if self.selection.add(key) {
                added += 1;
            }
        }
        lines.push(format!("added {added} signals"));
        lines.join("\n")
    }

    fn time(&self) -> String {
        let store = &self.waveform.store;
        let timescale = store
            .metadata()
            .timescale
            .map_or_else(|| "unspecified".to_string(), |ts| ts.to_string());
        let mut text = format!(
            "timescale {timescale}, max time #{}, window #{}..#{} (stride {})",
            store.max_time(),
            self.start,
            self.start.saturating_add(self.length),
            self.stride
        );
        let dropped = self.waveform.report.unresolved.len();
        if dropped > 0 {
            text.push_str(&format!(", {dropped} changes for undeclared ids dropped"));
        }
        text
    }

    /// Runs the loop, reading commands from `input` and writing to `output`.
    ///
    /// Stops at end of input or `q`. Command errors are printed and the loop
    /// continues.
    pub fn run_repl<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<(), CliError> {
        writeln!(output, "vcdscope {}", self.summary())?;
        writeln!(output, "Type 'help' for available commands.")?;

        let mut line = String::new();
        loop {
            write!(output, "vcdscope> ")?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match parse_command(trimmed) {
                Ok(cmd) => match self.execute(&cmd) {
                    Ok(CommandResult::Output(text)) => writeln!(output, "{text}")?,
                    Ok(CommandResult::Quit) => break,
                    Err(err) => writeln!(output, "error: {err}")?,
                },
                Err(err) => writeln!(output, "{err}")?,
            }
        }
        Ok(())
    }
}

fn help_text() -> String {
    "\
Commands:
  p                 Print selected signals in the window
  f                 Move the window forward and print
  r <start> <len>   Set the window and print
  r                 Reload the current file
  l <file>          Load another file
  s / ss            List signals (-> marks selected)
  a <key>...        Add signals to the selection
  aa                Add all signals
  d <key>...        Remove signals from the selection
  da                Clear the selection
  sc / lc           Save / load the selection file
  t                 Show timescale, max time and window
  help              Show this help
  q                 Quit"
        .to_string()
}
