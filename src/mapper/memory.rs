//! SparseMemory models a flat, unbounded physical word space: any aligned
//! address is a valid target and reads as zero until something is written.
//! Address ranges can be marked unmappable so callers can exercise mapping
//! failures, and active mappings are counted so tests can assert that every
//! map is balanced by an unmap.
use ahash::{AHashMap, AHashSet};

use super::{
    error::{MapError, MapResult},
    AddressSpaceMapper, MapPerms, PhysAddr, WORD_BYTES,
};

#[derive(Debug, Clone, Copy)]
struct Mapping {
    len: usize,
    perms: MapPerms,
}

pub struct SparseMemory {
    name: String,
    words: AHashMap<PhysAddr, u32>,
    denied: AHashSet<PhysAddr>,
    write_denied: AHashSet<PhysAddr>,
    active: AHashMap<PhysAddr, Mapping>,
    map_calls: usize,
}

impl SparseMemory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            words: AHashMap::new(),
            denied: AHashSet::new(),
            write_denied: AHashSet::new(),
            active: AHashMap::new(),
            map_calls: 0,
        }
    }

    /// Seed a word directly, bypassing the mapping protocol. Used to stage
    /// already-programmed registers.
    pub fn preload(&mut self, addr: PhysAddr, value: u32) {
        self.words.insert(addr, value);
    }

    /// Observe a word directly, bypassing the mapping protocol.
    pub fn peek(&self, addr: PhysAddr) -> u32 {
        self.words.get(&addr).copied().unwrap_or(0)
    }

    /// Mark `len` bytes at `addr` as unmappable; `map` calls touching the
    /// range fail with `MapError::Unmappable`.
    pub fn deny(&mut self, addr: PhysAddr, len: usize) {
        for word in span_words(addr, len) {
            self.denied.insert(word);
        }
    }

    /// Mark the word at `addr` as unmappable for write access only. Read
    /// mappings still succeed, so a two-phase writer passes validation and
    /// fails at commit.
    pub fn deny_writes(&mut self, addr: PhysAddr) {
        self.write_denied.insert(addr);
    }

    /// Number of mappings currently established.
    #[inline(always)]
    pub fn outstanding(&self) -> usize {
        self.active.len()
    }

    /// Total `map` calls observed, successful or not.
    #[inline(always)]
    pub fn map_calls(&self) -> usize {
        self.map_calls
    }
}

impl AddressSpaceMapper for SparseMemory {
    fn name(&self) -> &str {
        &self.name
    }

    fn map(&mut self, addr: PhysAddr, len: usize, perms: MapPerms) -> MapResult<()> {
        self.map_calls += 1;
        for word in span_words(addr, len) {
            if self.denied.contains(&word) {
                return Err(MapError::Unmappable {
                    address: word,
                    reason: "address range is marked inaccessible",
                });
            }
            if perms.contains(MapPerms::WRITE) && self.write_denied.contains(&word) {
                return Err(MapError::Unmappable {
                    address: word,
                    reason: "address range is marked read-only",
                });
            }
        }
        self.active.insert(addr, Mapping { len, perms });
        Ok(())
    }

    fn unmap(&mut self, addr: PhysAddr) {
        self.active.remove(&addr);
    }

    fn read_word(&mut self, addr: PhysAddr) -> MapResult<u32> {
        self.covering(addr, MapPerms::READ)?;
        Ok(self.peek(addr))
    }

    fn write_word(&mut self, addr: PhysAddr, value: u32) -> MapResult<()> {
        self.covering(addr, MapPerms::WRITE)?;
        self.words.insert(addr, value);
        Ok(())
    }
}

impl SparseMemory {
    fn covering(&self, addr: PhysAddr, perm: MapPerms) -> MapResult<()> {
        let mapping = self
            .active
            .iter()
            .find(|(start, mapping)| **start <= addr && addr + WORD_BYTES <= **start + mapping.len)
            .map(|(_, mapping)| mapping)
            .ok_or(MapError::Unmappable {
                address: addr,
                reason: "no active mapping covers the address",
            })?;
        if !mapping.perms.contains(perm) {
            return Err(MapError::PermissionDenied { address: addr });
        }
        Ok(())
    }
}

fn span_words(addr: PhysAddr, len: usize) -> impl Iterator<Item = PhysAddr> {
    (0..len.div_ceil(WORD_BYTES)).map(move |i| addr + i * WORD_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritten_words_read_as_zero() {
        let mut mem = SparseMemory::new("mem");
        mem.map(0x4000, WORD_BYTES, MapPerms::READ).expect("map");
        assert_eq!(
            mem.read_word(0x4000).expect("read"),
            0,
            "fresh word should read as zero"
        );
    }

    #[test]
    fn denied_range_refuses_to_map() {
        let mut mem = SparseMemory::new("mem");
        mem.deny(0x8000, 8);
        assert!(
            matches!(
                mem.map(0x8004, WORD_BYTES, MapPerms::READ),
                Err(MapError::Unmappable { .. })
            ),
            "denied word should not map"
        );
        assert!(
            mem.map(0x8008, WORD_BYTES, MapPerms::READ).is_ok(),
            "word past the denied range should map"
        );
    }

    #[test]
    fn access_requires_an_active_mapping() {
        let mut mem = SparseMemory::new("mem");
        assert!(
            matches!(mem.read_word(0x100), Err(MapError::Unmappable { .. })),
            "read without a mapping should fail"
        );
        mem.map(0x100, WORD_BYTES, MapPerms::READ | MapPerms::WRITE)
            .expect("map");
        mem.write_word(0x100, 0xDEAD_BEEF).expect("write");
        mem.unmap(0x100);
        assert!(
            matches!(mem.write_word(0x100, 1), Err(MapError::Unmappable { .. })),
            "write after unmap should fail"
        );
        assert_eq!(mem.peek(0x100), 0xDEAD_BEEF, "peek bypasses the protocol");
        assert_eq!(mem.outstanding(), 0, "map and unmap should balance");
    }
}
