//! Point and window queries with last-change-before semantics.
//!
//! A signal holds each value from the time of its change until the next
//! change. Before the first change there is no data.

use crate::store::{Change, SignalHistory, WaveformStore};
use crate::value::Value;

/// Errors returned by queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// The identifier code is not declared in the store.
    #[error("unknown signal identifier `{0}`")]
    UnknownSignal(String),
    /// A window was requested with a stride of zero.
    #[error("window stride must be at least 1")]
    ZeroStride,
}

/// The state of a signal at a point in time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sample<'a> {
    /// The latest change at or before the queried time.
    Held(&'a Change),
    /// The queried time is before the signal's first change.
    NoData,
}

impl<'a> Sample<'a> {
    /// The held value, if any.
    pub fn value(&self) -> Option<&'a Value> {
        match self {
            Sample::Held(change) => Some(&change.value),
            Sample::NoData => None,
        }
    }

    /// The time of the change that produced the held value.
    pub fn since(&self) -> Option<u64> {
        match self {
            Sample::Held(change) => Some(change.time),
            Sample::NoData => None,
        }
    }
}

impl SignalHistory {
    /// Returns the value held at `time`.
    pub fn sample_at(&self, time: u64) -> Sample<'_> {
        let changes = self.changes();
        match changes.partition_point(|c| c.time <= time) {
            0 => Sample::NoData,
            n => Sample::Held(&changes[n - 1]),
        }
    }
}

impl WaveformStore {
    /// Returns the value of `id` from its latest change at or before `time`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnknownSignal`] if `id` is not declared.
    pub fn value_at_or_before(&self, id: &str, time: u64) -> Result<Sample<'_>, QueryError> {
        self.history(id)
            .map(|h| h.sample_at(time))
            .ok_or_else(|| QueryError::UnknownSignal(id.to_string()))
    }

    /// Describes a sampling window over `ids`.
    ///
    /// Ticks fall at `start`, `start + stride`, ... strictly below
    /// `start + length`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::ZeroStride`] for a zero stride and
    /// [`QueryError::UnknownSignal`] for the first undeclared id.
    pub fn window<I, S>(
        &self,
        ids: I,
        start: u64,
        length: u64,
        stride: u64,
    ) -> Result<Window<'_>, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if stride == 0 {
            return Err(QueryError::ZeroStride);
        }
        let histories = ids
            .into_iter()
            .map(|id| {
                let id = id.as_ref();
                self.history(id)
                    .ok_or_else(|| QueryError::UnknownSignal(id.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Window {
            histories,
            start,
            end: start.saturating_add(length),
            stride,
        })
    }
}

/// A restartable sampling window over a set of signals.
#[derive(Clone, Debug)]
pub struct Window<'a> {
    histories: Vec<&'a SignalHistory>,
    start: u64,
    end: u64,
    stride: u64,
}

impl<'a> Window<'a> {
    /// First tick time.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Exclusive upper bound of tick times.
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Time between ticks.
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// The tick times of this window.
    pub fn ticks(&self) -> Ticks {
        Ticks {
            next: (self.start < self.end).then_some(self.start),
            end: self.end,
            stride: self.stride,
        }
    }

    /// Number of ticks in the window.
    pub fn tick_count(&self) -> usize {
        self.ticks().count()
    }

    /// One lazy trace per signal, in the order the ids were given.
    pub fn traces(&self) -> impl Iterator<Item = Trace<'a>> + '_ {
        self.histories.iter().map(move |history| Trace {
            history: *history,
            ticks: self.ticks(),
            cursor: None,
        })
    }
}

/// Stride-spaced times in `[start, end)`.
#[derive(Clone, Debug)]
pub struct Ticks {
    next: Option<u64>,
    end: u64,
    stride: u64,
}

impl Iterator for Ticks {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let time = self.next?;
        self.next = time
            .checked_add(self.stride)
            .filter(|next| *next < self.end);
        Some(time)
    }
}

/// Samples of one signal at every tick of a [`Window`].
#[derive(Clone, Debug)]
pub struct Trace<'a> {
    history: &'a SignalHistory,
    ticks: Ticks,
    /// Number of changes at or before the previous tick.
    cursor: Option<usize>,
}

impl<'a> Trace<'a> {
    /// The history being sampled.
    pub fn history(&self) -> &'a SignalHistory {
        self.history
    }
}

impl<'a> Iterator for Trace<'a> {
    type Item = (u64, Sample<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let time = self.ticks.next()?;
        let changes = self.history.changes();
        let mut seen = match self.cursor {
            Some(seen) => seen,
            None => changes.partition_point(|c| c.time <= time),
        };
        while seen < changes.len() && changes[seen].time <= time {
            seen += 1;
        }
        self.cursor = Some(seen);
        let sample = match seen {
            0 => Sample::NoData,
            n => Sample::Held(&changes[n - 1]),
        };
        Some((time, sample))
    }
}
