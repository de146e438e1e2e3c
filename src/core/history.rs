//! Dispatch history tracking.
//!
//! Records every action a store applied, in order, so the current snapshot
//! can be rebuilt from the initial one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single dispatched action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DispatchRecord<A> {
    /// The action that was applied
    pub action: A,
    /// When the action was applied
    pub timestamp: DateTime<Utc>,
    /// Zero-based position in the history
    pub sequence: usize,
}

/// Ordered history of dispatched actions.
///
/// History is immutable - `record` returns a new history with the action
/// appended.
///
/// # Example
///
/// ```rust
/// use city_store::core::{Action, CityId, History};
/// use chrono::Utc;
///
/// let history = History::new();
/// let history = history.record(Action::Loading, Utc::now());
/// let history = history.record(Action::CityDeleted(CityId::new(1)), Utc::now());
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.records()[1].sequence, 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct History<A> {
    records: Vec<DispatchRecord<A>>,
}

impl<A> Default for History<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> History<A> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in dispatch order.
    pub fn records(&self) -> &[DispatchRecord<A>] {
        &self.records
    }

    /// Calculate total duration from first to last record.
    ///
    /// Returns `None` for an empty history.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.first(), self.records.last()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }
}

impl<A: Clone> History<A> {
    /// Record an action, returning a new history.
    ///
    /// The existing history is left unchanged.
    pub fn record(&self, action: A, timestamp: DateTime<Utc>) -> Self {
        let mut records = self.records.clone();
        records.push(DispatchRecord {
            action,
            timestamp,
            sequence: self.records.len(),
        });
        Self { records }
    }

    /// The recorded actions, cloned, in dispatch order.
    pub fn actions(&self) -> impl Iterator<Item = A> + '_ {
        self.records.iter().map(|record| record.action.clone())
    }
}
