//! Typed signal values and the decoder from raw value tokens.

use crate::event::{RawValue, ValueKind};
use crate::signal::Signal;
use serde::Serialize;
use std::fmt;
use vcdscope_common::BitValue;

/// A decoded signal value.
///
/// The shape always agrees with the signal's declared width and type.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// A fully resolved binary value; the [`BitValue`] carries the width.
    Bits(BitValue),
    /// A multi-bit value containing `x` or `z` digits, kept verbatim.
    SymbolicBits {
        /// Declared width of the signal.
        width: u32,
        /// The literal as written.
        pattern: String,
    },
    /// A single-bit unknown or high-impedance value.
    SingleUnknown,
    /// A floating-point value of a `real` or `realtime` signal.
    Real(f64),
    /// A string value.
    Text(String),
}

impl Value {
    /// Bit width for binary values; `None` for real and text values.
    pub fn width(&self) -> Option<u32> {
        match self {
            Value::Bits(bits) => Some(bits.width()),
            Value::SymbolicBits { width, .. } => Some(*width),
            Value::SingleUnknown => Some(1),
            Value::Real(_) | Value::Text(_) => None,
        }
    }

    /// Returns `Some(true)` for a resolved high bit and `Some(false)` for a
    /// resolved low bit of a single-bit value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bits(bits) if bits.width() == 1 => Some(bits.bit(0)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bits(bits) if bits.width() == 1 => {
                f.write_str(if bits.bit(0) { "1" } else { "0" })
            }
            Value::Bits(bits) => write!(f, "{bits}"),
            Value::SymbolicBits { pattern, .. } => f.write_str(pattern),
            Value::SingleUnknown => f.write_str("x"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(text) => f.write_str(text),
        }
    }
}

/// Why a raw value could not be reconciled with its signal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The value's shape does not fit the declared width or type.
    #[error("value `{literal}` does not fit signal `{id}`: {reason}")]
    ValueMismatch {
        /// Identifier code of the target signal.
        id: String,
        /// The literal as written.
        literal: String,
        /// What does not fit.
        reason: String,
    },
}

/// Decodes `raw` into a [`Value`] shaped for `signal`.
///
/// Binary literals longer than the declared width may carry redundant leading
/// zeros, which are dropped. Signals declared with width 0 are treated as
/// single-bit.
///
/// # Errors
///
/// Returns [`DecodeError::ValueMismatch`] when the literal is too wide, when a
/// binary literal targets a real signal, when a real literal targets a
/// non-real signal, or when the literal is malformed.
pub fn decode(raw: &RawValue<'_>, signal: &Signal) -> Result<Value, DecodeError> {
    let mismatch = |reason: String| DecodeError::ValueMismatch {
        id: signal.id.clone(),
        literal: raw.literal.to_string(),
        reason,
    };

    match raw.kind {
        ValueKind::Text => Ok(Value::Text(raw.literal.to_string())),
        ValueKind::Real => {
            if !signal.var_type.is_real() {
                return Err(mismatch(format!(
                    "real value for {} signal",
                    signal.var_type
                )));
            }
            raw.literal
                .parse::<f64>()
                .map(Value::Real)
                .map_err(|_| mismatch("not a real number".into()))
        }
        ValueKind::Scalar | ValueKind::Vector => {
            if signal.var_type.is_real() {
                return Err(mismatch(format!(
                    "binary value for {} signal",
                    signal.var_type
                )));
            }
            decode_binary(raw.literal, signal.width.max(1)).map_err(mismatch)
        }
    }
}

fn decode_binary(literal: &str, width: u32) -> Result<Value, String> {
    let digits = strip_excess_zeros(literal, width);
    if digits.is_empty() {
        return Err("empty binary literal".into());
    }
    if digits.len() > width as usize {
        return Err(format!(
            "{} digits for a {width}-bit signal",
            digits.len()
        ));
    }

    if width == 1 {
        return match digits {
            "0" => Ok(Value::Bits(BitValue::from_u64(0, 1))),
            "1" => Ok(Value::Bits(BitValue::from_u64(1, 1))),
            "x" | "X" | "z" | "Z" => Ok(Value::SingleUnknown),
            _ => Err(format!("invalid binary digit in `{digits}`")),
        };
    }

    if digits.bytes().any(|b| matches!(b, b'x' | b'X' | b'z' | b'Z')) {
        if !digits.bytes().all(|b| b"01xXzZ".contains(&b)) {
            return Err(format!("invalid binary digit in `{digits}`"));
        }
        return Ok(Value::SymbolicBits {
            width,
            pattern: digits.to_string(),
        });
    }

    BitValue::from_binary_str(digits, width)
        .map(Value::Bits)
        .ok_or_else(|| format!("invalid binary digit in `{digits}`"))
}

/// Drops leading `0` digits while the literal is wider than `width`.
fn strip_excess_zeros(literal: &str, width: u32) -> &str {
    let excess = literal.len().saturating_sub(width as usize);
    let zeros = literal
        .bytes()
        .take(excess)
        .take_while(|b| *b == b'0')
        .count();
    &literal[zeros..]
}
