//! Safe-copy memory sources.
//!
//! The engine re-reads every load's value itself instead of trusting the
//! event, so it needs a way to copy bytes out of the observed program's
//! memory that reports failure instead of faulting. [`MemorySource`] is that
//! seam; [`SparseMemory`] is the in-process image used for trace replay.

use std::collections::HashMap;

/// A memory that can be copied from without faulting.
pub trait MemorySource {
    /// Copies up to `buf.len()` bytes starting at `addr` into `buf`.
    ///
    /// # Returns
    ///
    /// The number of bytes actually copied. Anything short of `buf.len()`
    /// means the read failed part-way (or entirely).
    fn safe_copy(&self, addr: u64, buf: &mut [u8]) -> usize;
}

/// Keeps the low `size` bytes of `value`.
///
/// A store of `size` bytes can only make those bytes visible to later loads.
pub const fn truncate(value: u64, size: usize) -> u64 {
    if size >= 8 {
        value
    } else {
        value & ((1u64 << (size * 8)) - 1)
    }
}

/// Byte-granular sparse memory image.
///
/// Only bytes that have been written are mapped; a copy stops at the first
/// unmapped byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseMemory {
    bytes: HashMap<u64, u8>,
}

impl SparseMemory {
    /// Creates an empty (fully unmapped) memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the low `size` bytes of `value` at `addr`, little-endian.
    ///
    /// Widths above 8 are clamped to 8.
    pub fn write(&mut self, addr: u64, size: usize, value: u64) {
        let bytes = value.to_le_bytes();
        self.write_bytes(addr, &bytes[..size.min(bytes.len())]);
    }

    /// Writes `data` starting at `addr`.
    pub fn write_bytes(&mut self, addr: u64, data: &[u8]) {
        for (offset, &byte) in (0u64..).zip(data) {
            let _ = self.bytes.insert(addr.wrapping_add(offset), byte);
        }
    }

    /// Reads `size` bytes at `addr` as a little-endian value.
    ///
    /// Returns `None` if any byte is unmapped or `size` exceeds 8.
    pub fn read(&self, addr: u64, size: usize) -> Option<u64> {
        let mut buf = [0u8; 8];
        let dst = buf.get_mut(..size)?;
        (self.safe_copy(addr, dst) == size).then(|| u64::from_le_bytes(buf))
    }

    /// Removes `len` bytes starting at `addr` from the image.
    pub fn unmap(&mut self, addr: u64, len: u64) {
        for offset in 0..len {
            let _ = self.bytes.remove(&addr.wrapping_add(offset));
        }
    }

    /// Number of mapped bytes.
    pub fn mapped_bytes(&self) -> usize {
        self.bytes.len()
    }
}

impl MemorySource for SparseMemory {
    fn safe_copy(&self, addr: u64, buf: &mut [u8]) -> usize {
        let mut copied = 0;
        for (offset, slot) in (0u64..).zip(buf.iter_mut()) {
            match self.bytes.get(&addr.wrapping_add(offset)) {
                Some(&byte) => *slot = byte,
                None => break,
            }
            copied += 1;
        }
        copied
    }
}
