//! Value change dump decoding, waveform storage and time queries.
//!
//! Text flows through four stages:
//!
//! 1. [`lexer`] splits the buffer into whitespace-delimited tokens with spans.
//! 2. [`parser`] pulls tokens and yields one [`VcdEvent`] at a time.
//! 3. [`ingest`] applies each event to a [`WaveformStore`], decoding raw value
//!    tokens with [`value::decode`].
//! 4. [`query`] answers "value at time t" and windowed questions against the
//!    finished store.
//!
//! ```
//! let text = "$scope module top $end\n$var reg 1 ! clk $end\n$upscope $end\n\
//!             $enddefinitions $end\n#0\n0!\n#10\n1!\n";
//! let parsed = vcdscope_vcd::parse(text).unwrap();
//! let clk = parsed.store.find_by_key("top:clk").unwrap();
//! let sample = parsed.store.value_at_or_before(&clk.id, 15).unwrap();
//! assert_eq!(sample.value().unwrap().to_string(), "1");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod event;
pub mod ingest;
pub mod lexer;
pub mod parser;
pub mod query;
pub mod scope;
pub mod signal;
pub mod store;
pub mod value;

pub use error::VcdError;
pub use event::{DumpKind, RawValue, ScopeKind, Spanned, ValueKind, VcdEvent};
pub use ingest::{parse, parse_with, ParseOptions, ParseReport, ParsedWaveform, TimePolicy, UnresolvedRef};
pub use parser::VcdParser;
pub use query::{QueryError, Sample, Trace, Window};
pub use signal::{canonical_key, Signal, SignalEntry, VarType};
pub use store::{Change, Declared, Metadata, ScopeInfo, SignalHistory, StoreError, WaveformStore};
pub use value::{decode, DecodeError, Value};
