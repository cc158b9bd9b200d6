use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct SorterMetrics {
    records_inserted: AtomicU64,
    buffer_growths: AtomicU64,
    sorts: AtomicU64,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SorterMetricsSnapshot {
    pub records_inserted: u64,
    pub buffer_growths: u64,
    pub sorts: u64,
}

impl SorterMetrics {
    pub fn records_inserted(&self) -> u64 {
        self.records_inserted.load(Ordering::Relaxed)
    }

    pub fn buffer_growths(&self) -> u64 {
        self.buffer_growths.load(Ordering::Relaxed)
    }

    pub fn sorts(&self) -> u64 {
        self.sorts.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> SorterMetricsSnapshot {
        SorterMetricsSnapshot {
            records_inserted: self.records_inserted(),
            buffer_growths: self.buffer_growths(),
            sorts: self.sorts(),
        }
    }

    pub(crate) fn add_records_inserted(&self, delta: u64) {
        if delta != 0 {
            self.records_inserted.fetch_add(delta, Ordering::Relaxed);
        }
    }

    pub(crate) fn add_buffer_growths(&self, delta: u64) {
        if delta != 0 {
            self.buffer_growths.fetch_add(delta, Ordering::Relaxed);
        }
    }

    pub(crate) fn add_sorts(&self, delta: u64) {
        if delta != 0 {
            self.sorts.fetch_add(delta, Ordering::Relaxed);
        }
    }
}
