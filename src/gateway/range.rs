//! Range transaction coordinator. Composes the write-once guard over N
//! contiguous words with two-phase semantics: validate every word reads zero,
//! then commit every value, both passes in ascending address order. Physical
//! writes cannot be rolled back, so a mapping failure mid-commit surfaces as
//! `PartialCommit` with the exact number of words already written.
use log::warn;

use crate::mapper::{MapPerms, MapperRef, PhysAddr, SpanHandle, WORD_BYTES};

use super::{
    error::{GateError, GateResult},
    guard,
};

pub(crate) fn read_range(mapper: &MapperRef, addr: PhysAddr, count: usize) -> GateResult<Vec<u32>> {
    let mut values = Vec::with_capacity(count);
    for i in 0..count {
        values.push(guard::guarded_read(mapper, addr + i * WORD_BYTES)?);
    }
    Ok(values)
}

pub(crate) fn write_range(mapper: &MapperRef, addr: PhysAddr, values: &[u32]) -> GateResult<()> {
    // Validate phase: every word must read zero before anything is written.
    for i in 0..values.len() {
        let word = addr + i * WORD_BYTES;
        let current = guard::guarded_read(mapper, word)?;
        if current != 0 {
            return Err(GateError::AlreadyProgrammed {
                address: word,
                current,
            });
        }
    }

    // Commit phase: all words validated zero, write in ascending order.
    for (i, value) in values.iter().enumerate() {
        let word = addr + i * WORD_BYTES;
        let mut handle = SpanHandle::map(mapper, word, 1, MapPerms::READ | MapPerms::WRITE)
            .map_err(|source| commit_failure(addr, i, source))?;
        handle
            .write_word(0, *value)
            .map_err(|source| commit_failure(addr, i, source))?;
    }
    Ok(())
}

fn commit_failure(addr: PhysAddr, written: usize, source: crate::mapper::MapError) -> GateError {
    if written == 0 {
        return GateError::Map { source };
    }
    warn!("range write at 0x{addr:X} aborted after {written} word(s): {source}");
    GateError::PartialCommit { written, source }
}
