//! Implementation of the `vcdscope value` command.

use vcdscope_vcd::{Sample, WaveformStore};

use crate::error::CliError;
use crate::pipeline::{load_config, load_waveform};
use crate::{GlobalArgs, ValueArgs};

/// Prints the value `key` holds at `time`.
pub fn run(args: &ValueArgs, global: &GlobalArgs) -> Result<i32, CliError> {
    let config = load_config(global)?;
    let waveform = load_waveform(&args.file, &config.parse_options(), global)?;
    println!("{}", describe(&waveform.store, &args.key, args.time)?);
    Ok(0)
}

fn describe(store: &WaveformStore, key: &str, time: u64) -> Result<String, CliError> {
    let signal = store
        .find_by_key(key)
        .ok_or_else(|| CliError::UnknownKey(key.to_string()))?;
    let text = match store.value_at_or_before(&signal.id, time)? {
        Sample::Held(change) => {
            format!("{key} @ {time} = {} (since #{})", change.value, change.time)
        }
        Sample::NoData => format!("{key} @ {time} = no data"),
    };
    Ok(text)
}
