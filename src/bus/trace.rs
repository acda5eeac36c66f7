use super::Transaction;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

//===========================================================================//

/// The number of trace entries kept by a [`TraceHistory`] constructed with
/// [`TraceHistory::new`].
pub const DEFAULT_TRACE_CAPACITY: usize = 10000;

//===========================================================================//

/// One recorded transaction in a [`TraceHistory`], together with the global
/// index at which it was recorded.
///
/// The transaction snapshot is immutable and cheaply shareable; cloning a
/// trace entry (or a whole history) shares the snapshot rather than copying
/// it.
#[derive(Clone, Debug)]
pub struct TraceEntry {
    index: u64,
    transaction: Rc<Transaction>,
}

impl TraceEntry {
    /// Returns the global index at which this entry was recorded.  Global
    /// indices increase monotonically and remain stable even after older
    /// entries have been evicted.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Returns the recorded transaction snapshot.
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{:6} {}", self.index, self.transaction)
    }
}

//===========================================================================//

/// A capacity-bounded, insertion-ordered log of processed transactions.
///
/// Entries are addressed by a monotonically increasing global index: the
/// first transaction ever appended has index 0, and indices stay valid (or
/// become out of range) as old entries are evicted, but are never reused for
/// a different transaction.  `base_index() + len()` always equals the total
/// number of transactions appended since the last [`clear`](Self::clear).
#[derive(Clone, Debug)]
pub struct TraceHistory {
    entries: VecDeque<Rc<Transaction>>,
    base_index: u64,
    capacity: usize,
}

impl TraceHistory {
    /// Constructs an empty history with the default capacity.
    pub fn new() -> TraceHistory {
        TraceHistory::with_capacity(DEFAULT_TRACE_CAPACITY)
    }

    /// Constructs an empty history that keeps at most `capacity` entries.
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> TraceHistory {
        assert!(capacity > 0);
        TraceHistory { entries: VecDeque::new(), base_index: 0, capacity }
    }

    /// Returns the number of entries currently in the history.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the history contains no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the global index of the oldest entry still in the history,
    /// which equals the number of entries ever evicted.
    pub fn base_index(&self) -> u64 {
        self.base_index
    }

    /// Returns the global index that the next appended transaction will
    /// receive.
    pub fn next_index(&self) -> u64 {
        self.base_index + self.entries.len() as u64
    }

    /// Appends a transaction snapshot to the history, evicting the oldest
    /// entry if the history is at capacity.
    pub fn append(&mut self, transaction: Rc<Transaction>) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
            self.base_index += 1;
        }
        self.entries.push_back(transaction);
    }

    /// Empties the history and resets the base index to zero.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.base_index = 0;
    }

    /// Returns the entry with the given global index, or `None` if that
    /// index is below `base_index()` (already evicted) or at or above
    /// `next_index()` (not yet recorded).
    pub fn entry_at(&self, index: u64) -> Option<TraceEntry> {
        if index < self.base_index {
            return None;
        }
        let position = usize::try_from(index - self.base_index).ok()?;
        let transaction = self.entries.get(position)?;
        Some(TraceEntry { index, transaction: Rc::clone(transaction) })
    }

    /// Returns an iterator over the entries in the history, most recent
    /// first.
    pub fn iter_recent(&self) -> impl Iterator<Item = TraceEntry> + '_ {
        let next_index = self.next_index();
        self.entries.iter().rev().enumerate().map(move |(i, transaction)| {
            TraceEntry {
                index: next_index - 1 - i as u64,
                transaction: Rc::clone(transaction),
            }
        })
    }
}

impl Default for TraceHistory {
    fn default() -> TraceHistory {
        TraceHistory::new()
    }
}

//===========================================================================//


//===========================================================================//
