//! Semantic events produced by the parser.

use crate::signal::Signal;
use serde::{Deserialize, Serialize};
use std::fmt;
use vcdscope_common::Timescale;
use vcdscope_source::Span;

/// A value paired with the byte range it was recognized from.
#[derive(Clone, Debug, PartialEq)]
pub struct Spanned<T> {
    /// The recognized item.
    pub node: T,
    /// The bytes it covers, from its first token to its last.
    pub span: Span,
}

impl<T> Spanned<T> {
    /// Pairs `node` with `span`.
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// The kind keyword of a `$scope` declaration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    /// `begin` block.
    Begin,
    /// `fork` block.
    Fork,
    /// `function`.
    Function,
    /// `module` instance.
    Module,
    /// `task`.
    Task,
}

impl ScopeKind {
    /// Maps a scope kind keyword such as `module` to its kind.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "begin" => Some(ScopeKind::Begin),
            "fork" => Some(ScopeKind::Fork),
            "function" => Some(ScopeKind::Function),
            "module" => Some(ScopeKind::Module),
            "task" => Some(ScopeKind::Task),
            _ => None,
        }
    }

    /// Returns the keyword as written in a dump.
    pub fn as_str(self) -> &'static str {
        match self {
            ScopeKind::Begin => "begin",
            ScopeKind::Fork => "fork",
            ScopeKind::Function => "function",
            ScopeKind::Module => "module",
            ScopeKind::Task => "task",
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which `$dump*` keyword opened a block of value changes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DumpKind {
    /// `$dumpvars`: initial values.
    Vars,
    /// `$dumpall`: checkpoint of every value.
    All,
    /// `$dumpoff`: dumping suspended.
    Off,
    /// `$dumpon`: dumping resumed.
    On,
}

impl DumpKind {
    /// Maps a keyword such as `$dumpvars` to its kind.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "$dumpvars" => Some(DumpKind::Vars),
            "$dumpall" => Some(DumpKind::All),
            "$dumpoff" => Some(DumpKind::Off),
            "$dumpon" => Some(DumpKind::On),
            _ => None,
        }
    }

    /// Returns the keyword that opens this block.
    pub fn keyword(self) -> &'static str {
        match self {
            DumpKind::Vars => "$dumpvars",
            DumpKind::All => "$dumpall",
            DumpKind::Off => "$dumpoff",
            DumpKind::On => "$dumpon",
        }
    }
}

/// Which value-change syntax a raw value was written in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ValueKind {
    /// One character from `01xXzZ` with no radix marker.
    Scalar,
    /// `b`/`B` followed by `01xXzZ` digits.
    Vector,
    /// `r`/`R` followed by a floating-point literal.
    Real,
    /// `s` followed by an alphanumeric/underscore string.
    Text,
}

/// An undecoded value token: its syntax and literal text without the marker.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RawValue<'src> {
    /// The syntax the value was written in.
    pub kind: ValueKind,
    /// The literal, borrowed from the buffer.
    pub literal: &'src str,
}

/// One recognized construct of a dump, in file order.
#[derive(Clone, Debug, PartialEq)]
pub enum VcdEvent<'src> {
    /// `$date` contents, joined with single spaces.
    Date(String),
    /// `$version` contents, joined with single spaces.
    Version(String),
    /// `$timescale` declaration.
    TimescaleSet(Timescale),
    /// `$scope`; `path` ends with the new scope's name.
    ScopeOpen {
        /// The scope kind keyword.
        kind: ScopeKind,
        /// Full path of the opened scope from the root.
        path: Vec<String>,
    },
    /// `$upscope`.
    ScopeClose,
    /// `$var`, with the scope path at the point of declaration.
    VarDecl(Signal),
    /// `$enddefinitions`.
    EndDefinitions,
    /// `#<time>`.
    TimeMark(u64),
    /// Opening keyword of a `$dump*` block.
    DumpBegin(DumpKind),
    /// `$end` closing a `$dump*` block.
    DumpEnd(DumpKind),
    /// A value change for an identifier code.
    ValueChange {
        /// The undecoded value.
        value: RawValue<'src>,
        /// The identifier code it applies to.
        id: &'src str,
    },
}
