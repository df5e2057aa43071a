use std::sync::{Arc, Mutex};

use embassy_time::Instant;

/// A recorded value, with the time it was recorded at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<T> {
    /// Time of the recording.
    pub at: Instant,
    /// Recorded value.
    pub value: T,
}

/// Shared log of everything a simulated peripheral sent.
#[derive(Debug)]
pub struct Recorder<T> {
    records: Arc<Mutex<Vec<Record<T>>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T: Clone> Recorder<T> {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, value: T) {
        crate::lock(&self.records).push(Record {
            at: Instant::now(),
            value,
        });
    }

    /// Returns a copy of the records, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<Record<T>> {
        crate::lock(&self.records).clone()
    }

    /// Returns a copy of the recorded values, oldest first.
    #[must_use]
    pub fn values(&self) -> Vec<T> {
        crate::lock(&self.records)
            .iter()
            .map(|record| record.value.clone())
            .collect()
    }

    /// Removes and returns the records.
    #[must_use]
    pub fn take(&self) -> Vec<Record<T>> {
        std::mem::take(&mut *crate::lock(&self.records))
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        crate::lock(&self.records).len()
    }

    /// Returns whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
