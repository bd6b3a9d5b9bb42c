use crate::mapper::{PhysAddr, WORD_BYTES};

/// Byte span of physical address space touched by one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddrSpan {
    pub start: PhysAddr,
    pub len: usize,
}

impl AddrSpan {
    pub fn word(addr: PhysAddr) -> Self {
        Self::words(addr, 1)
    }

    pub fn words(addr: PhysAddr, count: usize) -> Self {
        Self {
            start: addr,
            len: count * WORD_BYTES,
        }
    }

    #[inline(always)]
    pub fn end(&self) -> PhysAddr {
        self.start + self.len
    }

    pub fn contains(&self, addr: PhysAddr) -> bool {
        self.start <= addr && addr < self.end()
    }

    pub fn overlaps(&self, other: &AddrSpan) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}
