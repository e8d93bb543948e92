//! Implementation of the `vcdscope list` command.

use serde::Serialize;
use vcdscope_common::Timescale;
use vcdscope_vcd::{VarType, WaveformStore};

use crate::error::CliError;
use crate::pipeline::{load_config, load_waveform};
use crate::{GlobalArgs, ListArgs, ReportFormat};

/// JSON shape of `list --format json`.
#[derive(Serialize)]
struct Listing<'a> {
    timescale: Option<Timescale>,
    max_time: u64,
    signals: Vec<ListedSignal<'a>>,
}

#[derive(Serialize)]
struct ListedSignal<'a> {
    key: String,
    scope: &'a [String],
    name: &'a str,
    id: &'a str,
    var_type: VarType,
    width: u32,
}

/// Prints every signal key in declaration order.
pub fn run(args: &ListArgs, global: &GlobalArgs) -> Result<i32, CliError> {
    let config = load_config(global)?;
    let waveform = load_waveform(&args.file, &config.parse_options(), global)?;
    print!("{}", format_listing(&waveform.store, args.format)?);
    Ok(0)
}

fn format_listing(store: &WaveformStore, format: ReportFormat) -> Result<String, CliError> {
    let signals = store.histories().iter().map(|history| history.signal());
    match format {
        ReportFormat::Text => Ok(signals.map(|s| format!("{}\n", s.key())).collect()),
        ReportFormat::Json => {
            let listing = Listing {
                timescale: store.metadata().timescale,
                max_time: store.max_time(),
                signals: signals
                    .map(|s| ListedSignal {
                        key: s.key(),
                        scope: &s.scope,
                        name: &s.name,
                        id: &s.id,
                        var_type: s.var_type,
                        width: s.width,
                    })
                    .collect(),
            };
            Ok(format!("{}\n", serde_json::to_string_pretty(&listing)?))
        }
    }
}
