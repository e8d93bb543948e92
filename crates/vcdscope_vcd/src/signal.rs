//! Variable declarations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The declared type of a `$var`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum VarType {
    Event,
    Integer,
    Parameter,
    Real,
    Realtime,
    Reg,
    Supply0,
    Supply1,
    Time,
    Tri,
    Triand,
    Trior,
    Trireg,
    Tri0,
    Tri1,
    Wand,
    Wire,
    Wor,
}

const VAR_TYPES: [(&str, VarType); 18] = [
    ("event", VarType::Event),
    ("integer", VarType::Integer),
    ("parameter", VarType::Parameter),
    ("real", VarType::Real),
    ("realtime", VarType::Realtime),
    ("reg", VarType::Reg),
    ("supply0", VarType::Supply0),
    ("supply1", VarType::Supply1),
    ("time", VarType::Time),
    ("tri", VarType::Tri),
    ("triand", VarType::Triand),
    ("trior", VarType::Trior),
    ("trireg", VarType::Trireg),
    ("tri0", VarType::Tri0),
    ("tri1", VarType::Tri1),
    ("wand", VarType::Wand),
    ("wire", VarType::Wire),
    ("wor", VarType::Wor),
];

impl VarType {
    /// Returns the keyword as written in a dump.
    pub fn as_str(self) -> &'static str {
        VAR_TYPES
            .iter()
            .find(|(_, ty)| *ty == self)
            .map_or("", |(kw, _)| kw)
    }

    /// `real` and `realtime` carry floating-point values.
    pub fn is_real(self) -> bool {
        matches!(self, VarType::Real | VarType::Realtime)
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a `$var` type keyword is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variable type '{0}'")]
pub struct UnknownVarType(pub String);

impl FromStr for VarType {
    type Err = UnknownVarType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VAR_TYPES
            .iter()
            .find(|(kw, _)| *kw == s)
            .map(|(_, ty)| *ty)
            .ok_or_else(|| UnknownVarType(s.to_string()))
    }
}

/// A declared variable. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// The identifier code used to tag value changes.
    pub id: String,
    /// The declared type.
    pub var_type: VarType,
    /// Declared bit width.
    pub width: u32,
    /// Display name, including any bit-range suffix such as `[7:0]`.
    pub name: String,
    /// Scope path at the point of declaration, outermost first.
    pub scope: Vec<String>,
}

impl Signal {
    /// Returns the canonical `scope:...:name` key.
    pub fn key(&self) -> String {
        canonical_key(&self.scope, &self.name)
    }

    /// Returns a listing entry for this signal.
    pub fn entry(&self) -> SignalEntry {
        SignalEntry {
            scope: self.scope.clone(),
            name: self.name.clone(),
            id: self.id.clone(),
        }
    }
}

/// Builds the canonical key: the scope path joined with `:`, then `:` and the name.
///
/// A signal outside any scope gets a leading `:`.
pub fn canonical_key(scope: &[String], name: &str) -> String {
    format!("{}:{}", scope.join(":"), name)
}

/// One row of [`WaveformStore::list_signals`](crate::WaveformStore::list_signals).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalEntry {
    /// Scope path, outermost first.
    pub scope: Vec<String>,
    /// Display name.
    pub name: String,
    /// Identifier code.
    pub id: String,
}

impl SignalEntry {
    /// Returns the canonical key.
    pub fn key(&self) -> String {
        canonical_key(&self.scope, &self.name)
    }
}
