//! SpanHandle wraps an established mapping and scopes its lifetime: the span
//! is mapped when the handle is constructed and unmapped when it drops, so
//! release happens on every exit path, including early `?` returns. Handles
//! are request-scoped and never survive the operation that created them.
use std::sync::Arc;

use super::{
    error::{MapError, MapResult},
    AddressSpaceMapper, MapPerms, MapperRef, PhysAddr, WORD_BYTES,
};

pub struct SpanHandle {
    mapper: MapperRef,
    start: PhysAddr,
    len: usize,
    perms: MapPerms,
}

impl SpanHandle {
    /// Map `words` 32-bit words starting at `start` with the given access.
    pub fn map(
        mapper: &MapperRef,
        start: PhysAddr,
        words: usize,
        perms: MapPerms,
    ) -> MapResult<Self> {
        let len = words * WORD_BYTES;
        lock(mapper).map(start, len, perms)?;
        Ok(Self {
            mapper: Arc::clone(mapper),
            start,
            len,
            perms,
        })
    }

    pub fn read_word(&self, word: usize) -> MapResult<u32> {
        let addr = self.word_addr(word)?;
        if !self.perms.contains(MapPerms::READ) {
            return Err(MapError::PermissionDenied { address: addr });
        }
        lock(&self.mapper).read_word(addr)
    }

    pub fn write_word(&mut self, word: usize, value: u32) -> MapResult<()> {
        let addr = self.word_addr(word)?;
        if !self.perms.contains(MapPerms::WRITE) {
            return Err(MapError::PermissionDenied { address: addr });
        }
        lock(&self.mapper).write_word(addr, value)
    }

    #[inline(always)]
    pub fn start(&self) -> PhysAddr {
        self.start
    }

    #[inline(always)]
    pub fn words(&self) -> usize {
        self.len / WORD_BYTES
    }

    fn word_addr(&self, word: usize) -> MapResult<PhysAddr> {
        let offset = word * WORD_BYTES;
        if offset + WORD_BYTES > self.len {
            return Err(MapError::OutOfSpan {
                address: self.start + offset,
                start: self.start,
                len: self.len,
            });
        }
        Ok(self.start + offset)
    }
}

impl Drop for SpanHandle {
    fn drop(&mut self) {
        lock(&self.mapper).unmap(self.start);
    }
}

fn lock(mapper: &MapperRef) -> std::sync::MutexGuard<'_, dyn AddressSpaceMapper + 'static> {
    mapper.lock().unwrap_or_else(|err| err.into_inner())
}
