//! Growable de-escaping buffer.
//!
//! Units that carry emulation prevention bytes are rewritten into a
//! [`GrowableBuffer`] owned by the splitter. The buffer always keeps
//! [`PADDING_SIZE`] zeroed bytes past the logical end so bit readers can
//! over-read a little without bounds checks.

use crate::error::{Result, SplitError};

/// Zeroed bytes kept past the written region
pub const PADDING_SIZE: usize = 64;

/// Upper bound for a single allocation
const MAX_ALLOCATION: usize = isize::MAX as usize;

/// Byte region with a logical length and trailing zero padding.
///
/// The backing storage is fully initialised (zero filled), so `capacity()`
/// is the number of addressable bytes and `len()` the number committed.
#[derive(Debug, Default)]
pub struct GrowableBuffer {
    data: Vec<u8>,
    len: usize,
}

impl GrowableBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed bytes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Addressable bytes, padding included
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// The padding past the logical end (shorter only before the first allocation)
    pub fn padding(&self) -> &[u8] {
        let end = self.len.saturating_add(PADDING_SIZE).min(self.data.len());
        &self.data[self.len..end]
    }

    /// Prepare the buffer for a packet of `size` bytes and reset its length.
    ///
    /// Existing storage is reused when it already holds `size` plus padding;
    /// otherwise it is released and a larger zeroed region is allocated with
    /// roughly 1/16 over-allocation to amortise growth across packets.
    pub fn prepare(&mut self, size: usize) -> Result<()> {
        let padded = size
            .checked_add(PADDING_SIZE)
            .filter(|&n| n <= MAX_ALLOCATION)
            .ok_or(SplitError::OutOfMemory { requested: size })?;

        if self.data.len() >= padded {
            self.data[size..padded].fill(0);
            let head = PADDING_SIZE.min(self.data.len());
            self.data[..head].fill(0);
        } else {
            let target = padded
                .saturating_add(padded / 16)
                .saturating_add(32)
                .min(MAX_ALLOCATION);
            // free the old storage before allocating the new one
            self.data = Vec::new();
            self.data = allocate_zeroed(target)?;
        }

        self.len = 0;
        Ok(())
    }

    /// Make room for `additional` bytes plus padding after the logical end,
    /// keeping the committed bytes in place.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let needed = self
            .len
            .checked_add(additional)
            .and_then(|n| n.checked_add(PADDING_SIZE))
            .filter(|&n| n <= MAX_ALLOCATION)
            .ok_or(SplitError::OutOfMemory {
                requested: additional,
            })?;

        if self.data.len() >= needed {
            return Ok(());
        }

        let target = needed
            .saturating_add(needed / 16)
            .saturating_add(32)
            .min(MAX_ALLOCATION);
        self.data
            .try_reserve_exact(target - self.data.len())
            .map_err(|_| SplitError::OutOfMemory { requested: target })?;
        self.data.resize(target, 0);
        Ok(())
    }

    /// Writable region after the logical end
    pub(crate) fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.len..]
    }

    /// Mark `n` more bytes as written
    pub(crate) fn commit(&mut self, n: usize) {
        debug_assert!(self.len + n <= self.data.len());
        self.len += n;
    }

    /// Drop the storage
    pub fn release(&mut self) {
        self.data = Vec::new();
        self.len = 0;
    }
}

fn allocate_zeroed(size: usize) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    data.try_reserve_exact(size)
        .map_err(|_| SplitError::OutOfMemory { requested: size })?;
    data.resize(size, 0);
    Ok(data)
}
