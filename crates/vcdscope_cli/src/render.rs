//! Text rendering of a time window: a ruler row and one row per signal.
//!
//! Single-bit signals draw as levels and edges. Buses, reals and strings draw
//! as `╳<value>` labels at each change, in reverse video when colour is on.

use crossterm::style::{style, Stylize};
use vcdscope_vcd::{Sample, Signal, Trace, Value, WaveformStore};

use crate::error::CliError;

const HIGH: char = '‾';
const LOW: char = '_';
const RISING: char = '/';
const FALLING: char = '\\';
const UNKNOWN: char = '╳';
const NO_DATA: char = '―';

/// Window geometry and styling for [`render_window`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// First tick time.
    pub start: u64,
    /// Window length in time units.
    pub length: u64,
    /// Time units per column.
    pub stride: u64,
    /// Characters of the name shown per row.
    pub name_width: usize,
    /// Whether to emit ANSI styling.
    pub color: bool,
}

/// Renders the signals named by `keys` over the configured window.
///
/// Keys that do not resolve in `store` are listed after the rows.
pub fn render_window(
    store: &WaveformStore,
    keys: &[String],
    opts: &RenderOptions,
) -> Result<String, CliError> {
    let mut missing = Vec::new();
    let mut signals: Vec<&Signal> = Vec::new();
    for key in keys {
        match store.find_by_key(key) {
            Some(signal) => signals.push(signal),
            None => missing.push(key.as_str()),
        }
    }

    let window = store.window(
        signals.iter().map(|s| s.id.as_str()),
        opts.start,
        opts.length,
        opts.stride,
    )?;
    let ticks: Vec<u64> = window.ticks().collect();

    let mut ruler = vec![' '; ticks.len()];
    let mut rows = Vec::new();
    for trace in window.traces() {
        let signal = trace.history().signal();
        let row = draw_trace(signal, trace);
        for (idx, changed) in row.changed.iter().enumerate() {
            if *changed {
                stamp(&mut ruler, idx, &ticks[idx].to_string());
            }
        }
        let cells: String = row.cells.into_iter().collect();
        let cells = if opts.color && row.labelled {
            style(cells).reverse().to_string()
        } else {
            cells
        };
        rows.push(format!("{}: {cells}", name_column(&signal.name, opts.name_width)));
    }

    let mut out = String::new();
    out.push_str(&" ".repeat(opts.name_width + 2));
    out.push_str(ruler.into_iter().collect::<String>().trim_end());
    out.push('\n');
    for row in rows {
        out.push_str(&row);
        out.push('\n');
    }
    for key in missing {
        out.push_str(&format!("(`{key}` is not in this file)\n"));
    }
    Ok(out)
}

struct Row {
    cells: Vec<char>,
    changed: Vec<bool>,
    /// Whether the row uses value labels rather than levels.
    labelled: bool,
}

fn draw_trace(signal: &Signal, trace: Trace<'_>) -> Row {
    let mut labelled = signal.width > 1 || signal.var_type.is_real();
    let mut cells = Vec::new();
    let mut changed = Vec::new();
    let mut prev_tick: Option<u64> = None;
    let mut prev_sample = Sample::NoData;

    for (tick, sample) in trace {
        let is_change = match (sample.since(), prev_tick) {
            (Some(since), Some(prev)) => since > prev,
            (Some(since), None) => since == tick,
            (None, _) => false,
        };
        let idx = changed.len();
        if cells.len() <= idx {
            cells.push(' ');
        }
        changed.push(is_change);

        match sample.value() {
            None => cells[idx] = NO_DATA,
            Some(value) if !labelled && level(value).is_some() => {
                cells[idx] = level_glyph(value, prev_sample.value(), is_change);
            }
            Some(value) => {
                labelled = true;
                if is_change || prev_tick.is_none() || prev_sample.value().is_none() {
                    // Labels may run into the following cells; later writes win.
                    stamp_label(&mut cells, idx, value);
                }
            }
        }
        prev_tick = Some(tick);
        prev_sample = sample;
    }

    // The label writer may have pushed past the final cell.
    let len = changed.len();
    cells.truncate(len);
    Row {
        cells,
        changed,
        labelled,
    }
}

/// `Some(high)` for resolved single bits, `None` for unknown; other values are not levels.
fn level(value: &Value) -> Option<Option<bool>> {
    match value {
        Value::SingleUnknown => Some(None),
        other => other.as_bool().map(Some),
    }
}

fn level_glyph(value: &Value, prev: Option<&Value>, is_change: bool) -> char {
    match level(value).flatten() {
        None => UNKNOWN,
        Some(high) => {
            let edge = is_change && prev.is_some();
            match (high, edge) {
                (true, true) => RISING,
                (true, false) => HIGH,
                (false, true) => FALLING,
                (false, false) => LOW,
            }
        }
    }
}

fn stamp_label(cells: &mut Vec<char>, idx: usize, value: &Value) {
    let label = format!("{UNKNOWN}{value}");
    for (offset, ch) in label.chars().enumerate() {
        let pos = idx + offset;
        if pos < cells.len() {
            cells[pos] = ch;
        } else {
            cells.push(ch);
        }
    }
}

fn stamp(ruler: &mut [char], idx: usize, text: &str) {
    for (pos, ch) in (idx..ruler.len()).zip(text.chars()) {
        ruler[pos] = ch;
    }
}

fn name_column(name: &str, width: usize) -> String {
    let shown: String = name.chars().take(width).collect();
    format!("{shown:<width$}")
}
