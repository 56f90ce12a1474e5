//! Input log
//!
//! Flat byte buffer of fixed-stride records with a read cursor. Recording
//! appends at the end; playback reads sequentially from the cursor.

use super::codec::{RECORD_SIZE, Record};

/// Ordered sequence of encoded channel samples
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLog {
    bytes: Vec<u8>,
    cursor: usize,
}

impl InputLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap raw body bytes loaded from a movie file
    ///
    /// A trailing partial record is kept but never yielded by
    /// [`read_next`](Self::read_next).
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes, cursor: 0 }
    }

    /// Append one record
    pub fn append(&mut self, record: &Record) {
        self.bytes.extend_from_slice(record);
    }

    /// Yield the record at the cursor and advance past it
    ///
    /// Returns `None` (end of log) when less than one full record remains.
    pub fn read_next(&mut self) -> Option<Record> {
        if !self.has_next() {
            return None;
        }

        let mut record = [0u8; RECORD_SIZE];
        record.copy_from_slice(&self.bytes[self.cursor..self.cursor + RECORD_SIZE]);
        self.cursor += RECORD_SIZE;
        Some(record)
    }

    /// Whether another full record remains after the cursor
    pub fn has_next(&self) -> bool {
        self.cursor + RECORD_SIZE <= self.bytes.len()
    }

    /// Rewind the cursor to the first record
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Cursor position in bytes
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of complete records
    pub fn record_count(&self) -> usize {
        self.bytes.len() / RECORD_SIZE
    }

    /// Bytes past the last complete record
    pub fn trailing_bytes(&self) -> usize {
        self.bytes.len() % RECORD_SIZE
    }

    /// Total length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw body bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Iterate over every complete record without touching the cursor
    pub fn records(&self) -> impl Iterator<Item = &[u8]> {
        self.bytes.chunks_exact(RECORD_SIZE)
    }
}
