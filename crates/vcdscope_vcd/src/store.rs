//! The in-memory waveform database built during ingestion.
//!
//! Signals are kept in declaration order, each with its own time-ordered
//! change history. The store is rebuilt from scratch for every parse; only
//! histories grow once a signal has been declared.

use crate::event::ScopeKind;
use crate::signal::{Signal, SignalEntry};
use crate::value::Value;
use serde::Serialize;
use std::collections::HashMap;
use vcdscope_common::Timescale;

/// Errors reported by store mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A change referenced an identifier code that was never declared.
    #[error("unknown signal identifier `{0}`")]
    UnknownSignal(String),
    /// An identifier code was re-declared with a different name or scope.
    #[error("identifier `{id}` already declared as `{existing}`, redeclared as `{redeclared}`")]
    DuplicateSignal {
        /// The conflicting identifier code.
        id: String,
        /// Canonical key of the first declaration.
        existing: String,
        /// Canonical key of the conflicting declaration.
        redeclared: String,
    },
    /// Time moved backwards.
    #[error("time went backwards from #{previous} to #{time}")]
    NonMonotonicTime {
        /// The active time before the call.
        previous: u64,
        /// The requested time.
        time: u64,
    },
}

/// Outcome of a successful [`WaveformStore::declare`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Declared {
    /// The identifier code was new.
    New,
    /// The identifier code was already declared with the same name and scope.
    Alias,
}

/// One entry of a change history.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Change {
    /// Simulation time in timescale units.
    pub time: u64,
    /// The value from this time until the next change.
    pub value: Value,
}

/// A signal together with its changes, sorted by strictly increasing time.
#[derive(Clone, Debug, PartialEq)]
pub struct SignalHistory {
    signal: Signal,
    changes: Vec<Change>,
}

impl SignalHistory {
    fn new(signal: Signal) -> Self {
        Self {
            signal,
            changes: Vec::new(),
        }
    }

    /// The declaration this history belongs to.
    pub fn signal(&self) -> &Signal {
        &self.signal
    }

    /// All changes in time order.
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// The most recent change, if any.
    pub fn last(&self) -> Option<&Change> {
        self.changes.last()
    }

    /// Inserts a change in time order; a change at an existing time replaces it.
    fn record(&mut self, time: u64, value: Value) {
        // Ingestion appends in the common case.
        if self.changes.last().map_or(true, |last| last.time < time) {
            self.changes.push(Change { time, value });
            return;
        }
        match self.changes.binary_search_by_key(&time, |c| c.time) {
            Ok(idx) => self.changes[idx].value = value,
            Err(idx) => self.changes.insert(idx, Change { time, value }),
        }
    }
}

/// A scope seen during declarations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScopeInfo {
    /// The scope kind keyword.
    pub kind: ScopeKind,
    /// Full path from the root, ending with the scope's own name.
    pub path: Vec<String>,
}

/// Header information from the dump.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// `$date` contents.
    pub date: Option<String>,
    /// `$version` contents.
    pub version: Option<String>,
    /// `$timescale` declaration.
    pub timescale: Option<Timescale>,
}

/// Signal table, change histories and time bounds for one dump.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WaveformStore {
    histories: Vec<SignalHistory>,
    index: HashMap<String, usize>,
    scopes: Vec<ScopeInfo>,
    metadata: Metadata,
    max_time: u64,
    active_time: u64,
}

impl WaveformStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every signal, history, scope, metadata field and time bound.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Adds a signal declaration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateSignal`] if the identifier code is
    /// already declared with a different name or scope.
    pub fn declare(&mut self, signal: Signal) -> Result<Declared, StoreError> {
        if let Some(&idx) = self.index.get(&signal.id) {
            let existing = &self.histories[idx].signal;
            if existing.name == signal.name && existing.scope == signal.scope {
                return Ok(Declared::Alias);
            }
            return Err(StoreError::DuplicateSignal {
                id: signal.id.clone(),
                existing: existing.key(),
                redeclared: signal.key(),
            });
        }
        self.index.insert(signal.id.clone(), self.histories.len());
        self.histories.push(SignalHistory::new(signal));
        Ok(Declared::New)
    }

    /// Records a value change for `id` at `time`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownSignal`] if `id` was never declared.
    pub fn record_change(&mut self, id: &str, time: u64, value: Value) -> Result<(), StoreError> {
        let idx = *self
            .index
            .get(id)
            .ok_or_else(|| StoreError::UnknownSignal(id.to_string()))?;
        self.histories[idx].record(time, value);
        Ok(())
    }

    /// Moves the active time forward and extends the maximum time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NonMonotonicTime`] if `time` is below the current
    /// active time; the store is left unchanged.
    pub fn advance_time(&mut self, time: u64) -> Result<(), StoreError> {
        if time < self.active_time {
            return Err(StoreError::NonMonotonicTime {
                previous: self.active_time,
                time,
            });
        }
        self.force_time(time);
        Ok(())
    }

    /// Sets the active time unconditionally, still extending the maximum time.
    pub fn force_time(&mut self, time: u64) {
        self.active_time = time;
        self.max_time = self.max_time.max(time);
    }

    /// The time that value changes are currently recorded at.
    pub fn active_time(&self) -> u64 {
        self.active_time
    }

    /// The largest time marker seen.
    pub fn max_time(&self) -> u64 {
        self.max_time
    }

    /// Records a scope seen in the declarations.
    pub fn add_scope(&mut self, scope: ScopeInfo) {
        self.scopes.push(scope);
    }

    /// Declared scopes in file order.
    pub fn scopes(&self) -> &[ScopeInfo] {
        &self.scopes
    }

    /// Header metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Mutable header metadata, for ingestion.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Looks up a declaration by identifier code.
    pub fn signal(&self, id: &str) -> Option<&Signal> {
        self.history(id).map(SignalHistory::signal)
    }

    /// Looks up a history by identifier code.
    pub fn history(&self, id: &str) -> Option<&SignalHistory> {
        self.index.get(id).map(|&idx| &self.histories[idx])
    }

    /// All histories in declaration order.
    pub fn histories(&self) -> &[SignalHistory] {
        &self.histories
    }

    /// Scope, name and identifier of every signal in declaration order.
    pub fn list_signals(&self) -> Vec<SignalEntry> {
        self.histories.iter().map(|h| h.signal.entry()).collect()
    }

    /// Resolves a canonical `scope:name` key to the first matching signal.
    pub fn find_by_key(&self, key: &str) -> Option<&Signal> {
        self.histories
            .iter()
            .map(SignalHistory::signal)
            .find(|s| s.key() == key)
    }

    /// Number of declared signals.
    pub fn signal_count(&self) -> usize {
        self.histories.len()
    }

    /// Total number of recorded changes across all signals.
    pub fn change_count(&self) -> usize {
        self.histories.iter().map(|h| h.changes.len()).sum()
    }
}
