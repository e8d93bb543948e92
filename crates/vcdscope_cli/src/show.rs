//! Implementation of the `vcdscope show` command.

use vcdscope_config::ViewConfig;
use vcdscope_vcd::WaveformStore;

use crate::error::CliError;
use crate::pipeline::{load_config, load_waveform};
use crate::render::{render_window, RenderOptions};
use crate::{GlobalArgs, ShowArgs};

/// Renders the requested keys over a window; flags override `[view]`.
pub fn run(args: &ShowArgs, global: &GlobalArgs) -> Result<i32, CliError> {
    let config = load_config(global)?;
    let waveform = load_waveform(&args.file, &config.parse_options(), global)?;
    let opts = window_options(args, &config.view, global.color);
    print!("{}", show(&waveform.store, &args.keys, &opts)?);
    Ok(0)
}

fn window_options(args: &ShowArgs, view: &ViewConfig, color: bool) -> RenderOptions {
    RenderOptions {
        start: args.start.unwrap_or(view.start),
        length: args.length.unwrap_or(view.length),
        stride: args.stride.unwrap_or(view.stride),
        name_width: view.name_width,
        color,
    }
}

fn show(store: &WaveformStore, keys: &[String], opts: &RenderOptions) -> Result<String, CliError> {
    if let Some(missing) = keys.iter().find(|key| store.find_by_key(key).is_none()) {
        return Err(CliError::UnknownKey(missing.clone()));
    }
    render_window(store, keys, opts)
}
