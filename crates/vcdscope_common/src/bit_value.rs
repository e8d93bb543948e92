//! Arbitrary-width unsigned integers for fully-resolved binary signal values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bits stored per `u64` word.
const BITS_PER_WORD: u32 = 64;

/// An exact unsigned integer of a declared bit width.
///
/// Words are stored least-significant first and only up to the highest set
/// bit, so storage follows the value rather than the declared width. Values
/// wider than 64 bits keep every bit, so a 128-bit bus decodes without
/// clamping or truncation.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitValue {
    width: u32,
    /// No trailing zero words; zero is the empty vector.
    words: Vec<u64>,
}

impl BitValue {
    /// Creates a zero value of the given width.
    pub fn zero(width: u32) -> Self {
        Self {
            width,
            words: Vec::new(),
        }
    }

    /// Creates a value from a `u64`, dropping bits at or above `width`.
    pub fn from_u64(value: u64, width: u32) -> Self {
        let masked = if width >= BITS_PER_WORD {
            value
        } else {
            value & ((1u64 << width) - 1)
        };
        Self {
            width,
            words: if masked == 0 { Vec::new() } else { vec![masked] },
        }
    }

    /// Parses an MSB-first string of `0`/`1` digits into a value of `width` bits.
    ///
    /// Shorter literals are zero-extended. Returns `None` if the string is
    /// empty, contains any other character, or sets a bit at or above `width`.
    pub fn from_binary_str(digits: &str, width: u32) -> Option<Self> {
        if digits.is_empty() {
            return None;
        }
        let significant = digits.trim_start_matches('0').len();
        if u32::try_from(significant).map_or(true, |len| len > width) {
            return None;
        }
        let mut v = Self {
            width,
            words: vec![0; significant.div_ceil(BITS_PER_WORD as usize)],
        };
        for (index, ch) in digits.bytes().rev().enumerate() {
            match ch {
                b'0' => {}
                // Below `significant`, which fits in u32.
                b'1' => v.set_bit(index as u32),
                _ => return None,
            }
        }
        Some(v)
    }

    /// Returns the declared bit width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the bit at `index`, or `false` when `index` is out of range.
    pub fn bit(&self, index: u32) -> bool {
        if index >= self.width {
            return false;
        }
        self.words
            .get((index / BITS_PER_WORD) as usize)
            .is_some_and(|word| (word >> (index % BITS_PER_WORD)) & 1 == 1)
    }

    /// Returns `true` if every bit is zero.
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Converts to `u64` if the value fits, regardless of the declared width.
    pub fn to_u64(&self) -> Option<u64> {
        if self.words.iter().skip(1).any(|w| *w != 0) {
            return None;
        }
        Some(self.words.first().copied().unwrap_or(0))
    }

    fn set_bit(&mut self, index: u32) {
        let word = &mut self.words[(index / BITS_PER_WORD) as usize];
        *word |= 1u64 << (index % BITS_PER_WORD);
    }
}

impl fmt::LowerHex for BitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut digits = String::new();
        let mut leading = true;
        for word in self.words.iter().rev() {
            if leading {
                if *word == 0 {
                    continue;
                }
                digits.push_str(&format!("{word:x}"));
                leading = false;
            } else {
                digits.push_str(&format!("{word:016x}"));
            }
        }
        if digits.is_empty() {
            digits.push('0');
        }
        f.pad_integral(true, "0x", &digits)
    }
}

impl fmt::Display for BitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:#x}")
    }
}

impl fmt::Debug for BitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitValue({}'h{self:x})", self.width)
    }
}
