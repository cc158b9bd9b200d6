use std::sync::Arc;

use sift_memory::RecordMemory;
use sift_types::{RecordPointer, Result, SiftError};
use tracing::trace;

use crate::buffer::{SortBuffer, SortEntry, MAX_PAIRS};
use crate::compare::{PrefixComparator, RecordComparator, SortComparator};
use crate::iter::SortedIterator;
use crate::metrics::{SorterMetrics, SorterMetricsSnapshot};

pub const DEFAULT_INITIAL_CAPACITY: usize = 4096;

#[derive(Clone, Copy, Debug)]
pub struct SorterOptions {
    /// Entry capacity allocated up front.
    pub initial_capacity: usize,
    /// Growth ceiling, in entries. Hosts running this sorter under a memory
    /// budget lower it to bound the buffer; inserts past it report
    /// `CapacityExceeded` instead of growing.
    pub max_capacity: usize,
}

impl Default for SorterOptions {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_capacity: MAX_PAIRS,
        }
    }
}

/// Pointer/prefix record sorter. Records stay where the arena wrote them;
/// what gets sorted is a packed buffer of (pointer, prefix) entries, and
/// full records are only consulted when two prefixes tie. Sorting is
/// unstable: entries whose records compare equal may come out in either
/// order.
///
/// Single-threaded by contract. Independent instances may sort separate
/// partitions on separate threads; one instance must not be shared.
#[derive(Debug)]
pub struct InMemorySorter<P, R> {
    prefix_cmp: P,
    record_cmp: R,
    buffer: SortBuffer,
    metrics: Arc<SorterMetrics>,
}

impl<P: PrefixComparator, R: RecordComparator> InMemorySorter<P, R> {
    pub fn new(prefix_cmp: P, record_cmp: R, options: SorterOptions) -> Result<Self> {
        if options.max_capacity > MAX_PAIRS {
            return Err(SiftError::Invalid(
                "maximum capacity exceeds addressable entries",
            ));
        }
        if options.initial_capacity > options.max_capacity {
            return Err(SiftError::Invalid(
                "initial capacity exceeds maximum capacity",
            ));
        }
        Ok(Self {
            prefix_cmp,
            record_cmp,
            buffer: SortBuffer::new(options.initial_capacity, options.max_capacity),
            metrics: Arc::new(SorterMetrics::default()),
        })
    }

    /// Queue one record for sorting. Grows the buffer first when it is
    /// full; once the growth ceiling is reached this fails with
    /// `CapacityExceeded` and the already-inserted records stay intact.
    pub fn insert_record(&mut self, pointer: RecordPointer, prefix: u64) -> Result<()> {
        if !self.buffer.has_space_for_record() {
            if self.buffer.growth_target() == self.buffer.capacity() {
                return Err(SiftError::CapacityExceeded);
            }
            let from_pairs = self.buffer.capacity();
            self.buffer.grow();
            self.metrics.add_buffer_growths(1);
            trace!(
                from_pairs,
                to_pairs = self.buffer.capacity(),
                "sorter.grow"
            );
        }
        self.buffer.push(SortEntry { pointer, prefix });
        self.metrics.add_records_inserted(1);
        Ok(())
    }

    pub fn num_records(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes held by the sort buffer, for accounting against a budget.
    pub fn memory_usage(&self) -> u64 {
        self.buffer.memory_usage()
    }

    /// Bytes the next growth would acquire; zero at the ceiling. Budgeted
    /// hosts check this before letting an insert trigger the growth.
    pub fn memory_to_expand(&self) -> u64 {
        self.buffer.memory_to_expand()
    }

    /// Drop all queued records, keeping the buffer allocation for the next
    /// pass.
    pub fn reset(&mut self) {
        self.buffer.reset();
        trace!("sorter.reset");
    }

    /// Sort the queued entries in place and return a cursor over them in
    /// ascending order. `memory` must be the memory whose pointers were
    /// inserted. The cursor borrows this sorter and `memory` for its whole
    /// lifetime, so neither can be mutated mid-iteration.
    pub fn sorted_iterator<'a>(&'a mut self, memory: &'a dyn RecordMemory) -> SortedIterator<'a> {
        let comparator = SortComparator::new(memory, &self.prefix_cmp, &self.record_cmp);
        self.buffer
            .entries_mut()
            .sort_unstable_by(|a, b| comparator.compare(a, b));
        self.metrics.add_sorts(1);
        trace!(records = self.buffer.len(), "sorter.sort");
        SortedIterator::new(memory, self.buffer.entries())
    }

    pub fn metrics(&self) -> Arc<SorterMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn metrics_snapshot(&self) -> SorterMetricsSnapshot {
        self.metrics.snapshot()
    }
}
