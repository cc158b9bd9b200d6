use sift_memory::{RecordMemory, RecordView};
use sift_types::PageId;

use crate::buffer::SortEntry;

#[derive(Clone, Copy)]
struct Loaded<'a> {
    view: RecordView<'a>,
    prefix: u64,
}

/// Forward cursor over the sorted entries. The slice it holds is a snapshot
/// taken at sort time; while the cursor lives it borrows both the sorter
/// and the record memory, so neither can change underneath it.
///
/// Only one record is live at a time: every `advance` overwrites the
/// decoded fields in place, so the walk allocates nothing. Consumers that
/// need to hold several records copy the fields out, or `clone` the cursor
/// to branch iteration without moving the original.
#[derive(Clone)]
pub struct SortedIterator<'a> {
    memory: &'a dyn RecordMemory,
    entries: &'a [SortEntry],
    position: usize,
    current: Option<Loaded<'a>>,
}

impl<'a> SortedIterator<'a> {
    pub(crate) fn new(memory: &'a dyn RecordMemory, entries: &'a [SortEntry]) -> Self {
        Self {
            memory,
            entries,
            position: 0,
            current: None,
        }
    }

    pub fn has_next(&self) -> bool {
        self.position < self.entries.len()
    }

    /// Records not yet returned by `advance`.
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.position
    }

    /// Decode the record at the cursor and step past it. Advancing an
    /// exhausted cursor is a caller bug.
    pub fn advance(&mut self) {
        assert!(self.has_next(), "sorted iterator exhausted");
        let entry = self.entries[self.position];
        self.current = Some(Loaded {
            view: self.memory.view(entry.pointer),
            prefix: entry.prefix,
        });
        self.position += 1;
    }

    pub fn page(&self) -> PageId {
        self.loaded().view.page
    }

    /// In-page offset of the record bytes, already past the length header.
    pub fn offset(&self) -> usize {
        self.loaded().view.offset
    }

    pub fn record_len(&self) -> usize {
        self.loaded().view.payload.len()
    }

    pub fn payload(&self) -> &'a [u8] {
        self.loaded().view.payload
    }

    pub fn prefix(&self) -> u64 {
        self.loaded().prefix
    }

    fn loaded(&self) -> &Loaded<'a> {
        self.current
            .as_ref()
            .expect("no record loaded; call advance() first")
    }
}
