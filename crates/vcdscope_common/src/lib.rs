//! Shared foundational types used across the vcdscope workspace.
//!
//! This crate provides arbitrary-width unsigned bit values, timescale units
//! as declared in a value change dump header, and content hashing for
//! detecting unchanged input on reload.

#![warn(missing_docs)]

pub mod bit_value;
pub mod hash;
pub mod timescale;

pub use bit_value::BitValue;
pub use hash::ContentHash;
pub use timescale::{ParseTimescaleError, TimeUnit, Timescale};
