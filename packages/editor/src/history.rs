//! # History Manager
//!
//! Bounded undo/redo over whole-document snapshots.
//!
//! ## Design
//!
//! - Every tracked update pushes the current present onto `past`
//! - Undo moves the last past entry into present, old present to the front
//!   of `future`; redo is the mirror image
//! - New tracked updates clear `future` (the alternate branch is discarded)
//! - Both stacks hold at most `capacity` entries; the oldest is evicted
//! - Batches coalesce several tracked updates into one undo step
//!
//! ## Example
//!
//! ```rust
//! use pagesmith_editor::{History, SetStateOptions};
//!
//! let mut history = History::new(0, 50);
//! history.set_state(1, SetStateOptions::default());
//! history.set_state(2, SetStateOptions::default());
//!
//! assert!(history.undo());
//! assert_eq!(*history.present(), 1);
//! assert!(history.redo());
//! assert_eq!(*history.present(), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetStateOptions {
    /// Replace the present without recording an undo step
    pub skip_history: bool,
}

impl SetStateOptions {
    pub fn skip_history() -> Self {
        Self { skip_history: true }
    }
}

#[derive(Debug, Clone)]
struct Batch<T> {
    /// Present when the batch started
    base: T,
    dirty: bool,
}

#[derive(Debug, Clone)]
pub struct History<T> {
    /// Oldest first
    past: VecDeque<T>,
    present: T,
    /// Next redo first
    future: VecDeque<T>,
    capacity: usize,
    batch: Option<Batch<T>>,
}

/// Serializable form of a [`History`], used by the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState<T> {
    pub past: Vec<T>,
    pub present: T,
    pub future: Vec<T>,
    pub capacity: usize,
}

impl<T: Clone> History<T> {
    /// Capacity is at least 1
    pub fn new(initial: T, capacity: usize) -> Self {
        Self {
            past: VecDeque::new(),
            present: initial,
            future: VecDeque::new(),
            capacity: capacity.max(1),
            batch: None,
        }
    }

    /// Rebuild from persisted state, trimming both stacks to `capacity`
    pub fn from_state(state: HistoryState<T>, capacity: usize) -> Self {
        let mut history = Self::new(state.present, capacity);
        history.past = state.past.into();
        history.future = state.future.into();
        while history.past.len() > history.capacity {
            history.past.pop_front();
        }
        history.future.truncate(history.capacity);
        history
    }

    /// Snapshot of the stacks; an open batch is folded in as one step
    pub fn to_state(&self) -> HistoryState<T> {
        let mut past: Vec<T> = self.past.iter().cloned().collect();
        let mut future: Vec<T> = self.future.iter().cloned().collect();
        if let Some(batch) = self.batch.as_ref().filter(|batch| batch.dirty) {
            past.push(batch.base.clone());
            if past.len() > self.capacity {
                past.remove(0);
            }
            future.clear();
        }
        HistoryState {
            past,
            present: self.present.clone(),
            future,
            capacity: self.capacity,
        }
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn set_state(&mut self, next: T, options: SetStateOptions) {
        if options.skip_history {
            self.present = next;
            return;
        }

        if let Some(batch) = &mut self.batch {
            batch.dirty = true;
            self.present = next;
            return;
        }

        let previous = std::mem::replace(&mut self.present, next);
        self.push_past(previous);
        self.future.clear();
    }

    /// Tracked update derived from the present.
    ///
    /// `None` from `f` leaves the history untouched and is returned as
    /// `false`.
    pub fn update(&mut self, f: impl FnOnce(&T) -> Option<T>) -> bool {
        match f(&self.present) {
            Some(next) => {
                self.set_state(next, SetStateOptions::default());
                true
            }
            None => false,
        }
    }

    fn push_past(&mut self, entry: T) {
        self.past.push_back(entry);
        if self.past.len() > self.capacity {
            self.past.pop_front();
        }
    }

    pub fn undo(&mut self) -> bool {
        self.end_batch();
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        self.future.truncate(self.capacity);
        true
    }

    pub fn redo(&mut self) -> bool {
        self.end_batch();
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.push_past(current);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty() || self.batch.as_ref().is_some_and(|batch| batch.dirty)
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty() && self.batch.as_ref().map_or(true, |batch| !batch.dirty)
    }

    pub fn undo_levels(&self) -> usize {
        self.past.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.future.len()
    }

    /// Drop both stacks, keeping the present
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.batch = None;
    }

    /// Start coalescing tracked updates into a single undo step
    pub fn begin_batch(&mut self) {
        if self.batch.is_none() {
            self.batch = Some(Batch {
                base: self.present.clone(),
                dirty: false,
            });
        }
    }

    /// Close the open batch; returns whether it recorded an undo step
    pub fn end_batch(&mut self) -> bool {
        match self.batch.take() {
            Some(batch) if batch.dirty => {
                self.push_past(batch.base);
                self.future.clear();
                true
            }
            _ => false,
        }
    }

    pub fn is_batching(&self) -> bool {
        self.batch.is_some()
    }
}
