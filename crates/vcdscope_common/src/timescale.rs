//! Timescale declarations: an integer magnitude plus a time unit tag.
//!
//! Timestamps in a dump are raw integers in timescale units. The magnitude and
//! unit are kept as declared; nothing in the workspace converts between units.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A time unit accepted in a `$timescale` declaration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Femtoseconds.
    Fs,
    /// Picoseconds.
    Ps,
    /// Nanoseconds.
    Ns,
    /// Microseconds.
    Us,
    /// Milliseconds.
    Ms,
    /// Seconds.
    S,
}

impl TimeUnit {
    /// Returns the unit's textual form as written in a dump.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Fs => "fs",
            TimeUnit::Ps => "ps",
            TimeUnit::Ns => "ns",
            TimeUnit::Us => "us",
            TimeUnit::Ms => "ms",
            TimeUnit::S => "s",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = ParseTimescaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fs" => Ok(TimeUnit::Fs),
            "ps" => Ok(TimeUnit::Ps),
            "ns" => Ok(TimeUnit::Ns),
            "us" => Ok(TimeUnit::Us),
            "ms" => Ok(TimeUnit::Ms),
            "s" => Ok(TimeUnit::S),
            _ => Err(ParseTimescaleError::UnknownUnit(s.to_string())),
        }
    }
}

/// A declared timescale such as `10ns`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Timescale {
    /// The integer magnitude (1, 10, 100, ...).
    pub magnitude: u64,
    /// The unit tag.
    pub unit: TimeUnit,
}

impl Timescale {
    /// Creates a timescale from a magnitude and unit.
    pub fn new(magnitude: u64, unit: TimeUnit) -> Self {
        Self { magnitude, unit }
    }
}

impl fmt::Display for Timescale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit)
    }
}

/// Error type for parsing timescale strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseTimescaleError {
    /// The magnitude is missing or not an integer.
    #[error("invalid timescale magnitude in '{0}'")]
    InvalidMagnitude(String),
    /// The unit is not one of fs/ps/ns/us/ms/s.
    #[error("unknown time unit '{0}'")]
    UnknownUnit(String),
}

impl FromStr for Timescale {
    type Err = ParseTimescaleError;

    /// Parses `"1ns"`, `"10 ps"` or `"100us"`; whitespace between the parts is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digit_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (num, unit) = s.split_at(digit_end);
        let magnitude = num
            .parse::<u64>()
            .map_err(|_| ParseTimescaleError::InvalidMagnitude(s.to_string()))?;
        let unit = unit.trim().parse::<TimeUnit>()?;
        Ok(Self { magnitude, unit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_adjacent() {
        let ts: Timescale = "1ns".parse().unwrap();
        assert_eq!(ts, Timescale::new(1, TimeUnit::Ns));
    }

    #[test]
    fn parse_separated() {
        let ts: Timescale = "100 ps".parse().unwrap();
        assert_eq!(ts.magnitude, 100);
        assert_eq!(ts.unit, TimeUnit::Ps);
    }

    #[test]
    fn parse_all_units() {
        for unit in ["fs", "ps", "ns", "us", "ms", "s"] {
            let ts: Timescale = format!("10{unit}").parse().unwrap();
            assert_eq!(ts.unit.as_str(), unit);
        }
    }

    #[test]
    fn missing_magnitude() {
        assert_eq!(
            "ns".parse::<Timescale>(),
            Err(ParseTimescaleError::InvalidMagnitude("ns".into()))
        );
    }

    #[test]
    fn unknown_unit() {
        let err = "1 min".parse::<Timescale>().unwrap_err();
        assert_eq!(err, ParseTimescaleError::UnknownUnit("min".into()));
        assert_eq!(err.to_string(), "unknown time unit 'min'");
    }

    #[test]
    fn display() {
        assert_eq!(Timescale::new(10, TimeUnit::Us).to_string(), "10us");
    }
}
