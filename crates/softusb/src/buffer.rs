//! Destination buffers for host-to-device control data.
//!
//! The packet path writes chunks into a buffer that some other context (usually the main loop)
//! owns and polls. Completion is signalled through a 32-bit header: once the final chunk lands the
//! header holds the transfer length. Zero means "not complete", which also covers transfers that
//! were abandoned by a new SETUP; owners must [`CollectStorage::arm`] the buffer before handing it
//! out and must never assume completion without a non-zero header.
//!
//! Chunks are always written as full 8-byte units, so a transfer of `len` bytes touches
//! `round_up(len, 8)` bytes of storage. [`required_capacity`] computes that size.

use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use thiserror::Error;

use crate::usb::ENDPOINT0_SIZE;

/// Size of the completion header that precedes the data region.
pub const COLLECT_HEADER_LEN: usize = 4;

#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum CollectError {
    #[error("collection buffer holds {capacity} bytes but the transfer needs {required}")]
    BufferTooSmall { capacity: usize, required: usize },

    #[error("chunk at offset {offset} does not fit in a {capacity} byte buffer")]
    ChunkOutOfBounds { offset: usize, capacity: usize },
}

/// Storage a transfer of `declared_len` bytes needs once padded to whole chunks.
pub const fn required_capacity(declared_len: usize) -> usize {
    declared_len.div_ceil(ENDPOINT0_SIZE) * ENDPOINT0_SIZE
}

/// Owned backing store: a completion header plus `N` data bytes.
#[derive(Debug)]
pub struct CollectStorage<const N: usize> {
    header: AtomicU32,
    data: [AtomicU8; N],
}

impl<const N: usize> CollectStorage<N> {
    #[allow(clippy::declare_interior_mutable_const)]
    const ZERO: AtomicU8 = AtomicU8::new(0);

    pub const fn new() -> Self {
        Self {
            header: AtomicU32::new(0),
            data: [Self::ZERO; N],
        }
    }

    /// Borrowed view handed to the packet path.
    pub fn buffer(&self) -> CollectBuffer<'_> {
        CollectBuffer {
            header: &self.header,
            data: &self.data,
        }
    }

    /// Clears the completion header ahead of a new transfer.
    pub fn arm(&self) {
        self.header.store(0, Ordering::Release);
    }

    pub fn header(&self) -> u32 {
        self.header.load(Ordering::Acquire)
    }

    /// Transfer length if the last chunk has been written.
    pub fn completed_len(&self) -> Option<u32> {
        match self.header() {
            0 => None,
            len => Some(len),
        }
    }

    /// Copies the data region into `out`, returning the number of bytes copied.
    pub fn copy_to(&self, out: &mut [u8]) -> usize {
        let n = out.len().min(N);
        for (dst, src) in out[..n].iter_mut().zip(&self.data) {
            *dst = src.load(Ordering::Relaxed);
        }
        n
    }
}

impl<const N: usize> Default for CollectStorage<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// A bounds-checked, shareable view of a [`CollectStorage`].
#[derive(Clone, Copy, Debug)]
pub struct CollectBuffer<'a> {
    header: &'a AtomicU32,
    data: &'a [AtomicU8],
}

impl<'a> CollectBuffer<'a> {
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Writes one full chunk at `offset`: `chunk` followed by zero fill up to 8 bytes.
    ///
    /// Nothing is written unless the whole chunk fits.
    pub fn write_chunk(&self, offset: usize, chunk: &[u8]) -> Result<(), CollectError> {
        let end = offset
            .checked_add(ENDPOINT0_SIZE)
            .filter(|&end| end <= self.data.len())
            .ok_or(CollectError::ChunkOutOfBounds {
                offset,
                capacity: self.data.len(),
            })?;

        let src = chunk.iter().copied().chain(core::iter::repeat(0));
        for (dst, byte) in self.data[offset..end].iter().zip(src) {
            dst.store(byte, Ordering::Relaxed);
        }
        Ok(())
    }

    /// Same as [`CollectStorage::arm`], for holders of a view.
    pub fn arm(&self) {
        self.header.store(0, Ordering::Release);
    }

    /// Publishes completion; data written before this call is visible to an `Acquire` reader.
    pub fn mark_complete(&self, len: u32) {
        self.header.store(len, Ordering::Release);
    }

    pub fn header(&self) -> u32 {
        self.header.load(Ordering::Acquire)
    }
}

/// Two views are equal when they refer to the same storage.
impl PartialEq for CollectBuffer<'_> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.header, other.header) && core::ptr::eq(self.data, other.data)
    }
}

impl Eq for CollectBuffer<'_> {}
