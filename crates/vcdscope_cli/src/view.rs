//! Implementation of the `vcdscope view` command.

use std::io;

use crate::error::CliError;
use crate::pipeline::{load_config, load_waveform};
use crate::session::Session;
use crate::{FileArgs, GlobalArgs};

/// Loads the dump and runs the command loop on stdin/stdout.
pub fn run(args: &FileArgs, global: &GlobalArgs) -> Result<i32, CliError> {
    let config = load_config(global)?;
    let waveform = load_waveform(&args.file, &config.parse_options(), global)?;
    let mut session = Session::new(waveform, &config, global.clone());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();
    session.run_repl(&mut input, &mut output)?;
    Ok(0)
}
