#![forbid(unsafe_code)]

use sift_types::{PageId, RecordPointer, Result, SiftError};
use tracing::trace;

pub mod codec {
    //! Record pointer packing: page number in the upper bits, in-page offset
    //! in the lower bits, one 64-bit token per record.

    use sift_types::{PageId, RecordPointer};

    pub const PAGE_NUMBER_BITS: u32 = 13;
    pub const OFFSET_BITS: u32 = 51;
    pub const PAGE_TABLE_SIZE: usize = 1 << PAGE_NUMBER_BITS;
    pub const MAX_PAGE_BYTES: u64 = 1 << OFFSET_BITS;

    const OFFSET_MASK: u64 = (1 << OFFSET_BITS) - 1;

    pub fn encode_pointer(page: PageId, offset: u64) -> RecordPointer {
        debug_assert!((page.0 as usize) < PAGE_TABLE_SIZE);
        debug_assert!(offset <= OFFSET_MASK);
        RecordPointer(((page.0 as u64) << OFFSET_BITS) | (offset & OFFSET_MASK))
    }

    pub fn decode_page(ptr: RecordPointer) -> PageId {
        PageId((ptr.0 >> OFFSET_BITS) as u32)
    }

    pub fn decode_offset(ptr: RecordPointer) -> u64 {
        ptr.0 & OFFSET_MASK
    }
}

/// Every stored record starts with its payload length as a 4-byte
/// big-endian integer; the pointer addresses that header.
pub const RECORD_LEN_BYTES: usize = 4;

pub const DEFAULT_PAGE_SIZE: usize = 1 << 20;

/// Decoded view of one stored record. `offset` is already past the length
/// header; the header itself sits at `offset - RECORD_LEN_BYTES`.
#[derive(Clone, Copy, Debug)]
pub struct RecordView<'a> {
    pub page: PageId,
    pub offset: usize,
    pub payload: &'a [u8],
}

impl<'a> RecordView<'a> {
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Resolves record pointers back into record bytes. Implemented by the
/// memory that produced the pointers; the sorter only consumes this seam.
pub trait RecordMemory {
    /// Decode `ptr` and return the record it addresses. Passing a pointer
    /// this memory did not produce is a caller bug and fails fatally.
    fn view(&self, ptr: RecordPointer) -> RecordView<'_>;
}

#[derive(Clone, Copy, Debug)]
pub struct ArenaOptions {
    pub page_size: usize,
}

impl ArenaOptions {
    pub fn with_page_size(page_size: usize) -> Self {
        Self { page_size }
    }
}

impl Default for ArenaOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Append-only record heap backing the sorter: fixed-size pages addressed
/// through the pointer codec, each record stored as a length header followed
/// by its payload bytes.
pub struct PageArena {
    page_size: usize,
    pages: Vec<Vec<u8>>,
}

impl PageArena {
    pub fn new(options: ArenaOptions) -> Result<Self> {
        if options.page_size <= RECORD_LEN_BYTES {
            return Err(SiftError::Invalid("page size too small for a record"));
        }
        if options.page_size as u64 > codec::MAX_PAGE_BYTES {
            return Err(SiftError::Invalid("page size exceeds addressable offset"));
        }
        Ok(Self {
            page_size: options.page_size,
            pages: Vec::new(),
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Bytes reserved by allocated pages, for accounting against a budget.
    pub fn memory_usage(&self) -> u64 {
        (self.pages.len() * self.page_size) as u64
    }

    /// Store `payload` as a new record and return its pointer.
    pub fn append(&mut self, payload: &[u8]) -> Result<RecordPointer> {
        if payload.len() > u32::MAX as usize {
            return Err(SiftError::RecordTooLarge);
        }
        let needed = RECORD_LEN_BYTES + payload.len();
        if needed > self.page_size {
            return Err(SiftError::RecordTooLarge);
        }
        let page_index = match self.pages.last() {
            Some(page) if page.len() + needed <= self.page_size => self.pages.len() - 1,
            _ => self.allocate_page()?,
        };
        let page = &mut self.pages[page_index];
        let offset = page.len() as u64;
        page.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        page.extend_from_slice(payload);
        Ok(codec::encode_pointer(PageId(page_index as u32), offset))
    }

    /// Drop all pages, invalidating every pointer handed out so far.
    pub fn clear(&mut self) {
        let freed = self.memory_usage();
        self.pages.clear();
        trace!(freed_bytes = freed, "arena.clear");
    }

    fn allocate_page(&mut self) -> Result<usize> {
        if self.pages.len() >= codec::PAGE_TABLE_SIZE {
            return Err(SiftError::PageTableFull);
        }
        self.pages.push(Vec::with_capacity(self.page_size));
        trace!(
            page = self.pages.len() - 1,
            size = self.page_size,
            "arena.allocate_page"
        );
        Ok(self.pages.len() - 1)
    }
}

impl Default for PageArena {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            pages: Vec::new(),
        }
    }
}

impl RecordMemory for PageArena {
    fn view(&self, ptr: RecordPointer) -> RecordView<'_> {
        let page_id = codec::decode_page(ptr);
        let start = codec::decode_offset(ptr) as usize;
        let page = &self.pages[page_id.0 as usize];
        let header: [u8; RECORD_LEN_BYTES] = page[start..start + RECORD_LEN_BYTES]
            .try_into()
            .expect("record length header truncated");
        let len = u32::from_be_bytes(header) as usize;
        let offset = start + RECORD_LEN_BYTES;
        RecordView {
            page: page_id,
            offset,
            payload: &page[offset..offset + len],
        }
    }
}
