use std::mem::size_of;

use sift_types::RecordPointer;

/// One buffer slot: the record's address token next to its key prefix.
/// Kept as a single two-word value so the sort engine always exchanges
/// pointer and prefix together.
#[repr(C)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SortEntry {
    pub pointer: RecordPointer,
    pub prefix: u64,
}

pub const ENTRY_BYTES: u64 = size_of::<SortEntry>() as u64;

/// Largest entry count a single allocation can hold on this platform.
pub const MAX_PAIRS: usize = isize::MAX as usize / size_of::<SortEntry>();

fn next_capacity(capacity: usize, max_pairs: usize) -> usize {
    if capacity >= max_pairs {
        return max_pairs;
    }
    capacity.saturating_mul(2).clamp(1, max_pairs)
}

/// Flat working set of the sort: inserted entries in a contiguous
/// allocation, grown by doubling up to a ceiling, reusable across passes.
#[derive(Debug)]
pub struct SortBuffer {
    entries: Vec<SortEntry>,
    capacity: usize,
    max_pairs: usize,
}

impl SortBuffer {
    pub fn new(initial_pairs: usize, max_pairs: usize) -> Self {
        let capacity = initial_pairs.min(max_pairs);
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            max_pairs,
        }
    }

    /// Number of entries inserted so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries the current allocation can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn has_space_for_record(&self) -> bool {
        self.entries.len() < self.capacity
    }

    /// Capacity after the next `grow`. Unchanged once the ceiling is
    /// reached, at which point growth is a no-op.
    pub fn growth_target(&self) -> usize {
        next_capacity(self.capacity, self.max_pairs)
    }

    /// Bytes held by the current allocation.
    pub fn memory_usage(&self) -> u64 {
        self.capacity as u64 * ENTRY_BYTES
    }

    /// Additional bytes the next `grow` would acquire. Lets a budgeted
    /// caller check or reserve before triggering the reallocation.
    pub fn memory_to_expand(&self) -> u64 {
        (self.growth_target() - self.capacity) as u64 * ENTRY_BYTES
    }

    /// Reallocate to `growth_target`, carrying all entries over. The old
    /// allocation is released here.
    pub fn grow(&mut self) {
        let target = self.growth_target();
        if target == self.capacity {
            return;
        }
        let mut grown = Vec::with_capacity(target);
        grown.extend_from_slice(&self.entries);
        self.entries = grown;
        self.capacity = target;
    }

    /// Append one entry. Callers must have ensured space beforehand;
    /// pushing into a full buffer is a programming error.
    pub fn push(&mut self, entry: SortEntry) {
        assert!(
            self.has_space_for_record(),
            "sort buffer full; grow before pushing"
        );
        self.entries.push(entry);
    }

    /// Forget all entries, keeping the allocation for reuse.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn entries(&self) -> &[SortEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [SortEntry] {
        &mut self.entries
    }
}
