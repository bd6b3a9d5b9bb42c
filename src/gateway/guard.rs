//! Write-once guard: the read-then-conditionally-write primitive. A register
//! reading zero counts as unprogrammed and may be written; a non-zero register
//! is protected and the write fails with no side effect. Callers must hold the
//! access serializer over the span, or two concurrent guards can both observe
//! zero and both write.
use log::debug;

use crate::mapper::{MapPerms, MapperRef, PhysAddr, SpanHandle};

use super::error::{GateError, GateResult};

/// Read one register. Zero is a valid result, not an error.
pub(crate) fn guarded_read(mapper: &MapperRef, addr: PhysAddr) -> GateResult<u32> {
    let handle = SpanHandle::map(mapper, addr, 1, MapPerms::READ)?;
    Ok(handle.read_word(0)?)
}

/// Write one register, but only if it currently reads zero.
pub(crate) fn guarded_write(mapper: &MapperRef, addr: PhysAddr, value: u32) -> GateResult<()> {
    let mut handle = SpanHandle::map(mapper, addr, 1, MapPerms::READ | MapPerms::WRITE)?;
    let current = handle.read_word(0)?;
    if current != 0 {
        debug!("write to 0x{addr:X} refused: register holds 0x{current:08X}");
        return Err(GateError::AlreadyProgrammed {
            address: addr,
            current,
        });
    }
    handle.write_word(0, value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::mapper::{MapError, SparseMemory};

    fn make_mapper() -> (Arc<Mutex<SparseMemory>>, MapperRef) {
        let mem = Arc::new(Mutex::new(SparseMemory::new("guard-mem")));
        let mapper: MapperRef = mem.clone();
        (mem, mapper)
    }

    #[test]
    fn zero_register_accepts_exactly_one_write() {
        let (mem, mapper) = make_mapper();
        guarded_write(&mapper, 0x100, 0x55).expect("first write on zero register");
        assert_eq!(
            guarded_read(&mapper, 0x100).expect("read back"),
            0x55,
            "written value should be observable"
        );

        let second = guarded_write(&mapper, 0x100, 0x99);
        assert!(
            matches!(
                second,
                Err(GateError::AlreadyProgrammed {
                    address: 0x100,
                    current: 0x55
                })
            ),
            "second write should report the programmed value"
        );
        assert_eq!(
            mem.lock().unwrap().peek(0x100),
            0x55,
            "refused write must not modify the register"
        );
    }

    #[test]
    fn reading_zero_is_not_an_error() {
        let (_mem, mapper) = make_mapper();
        assert_eq!(
            guarded_read(&mapper, 0x200).expect("read fresh register"),
            0,
            "unprogrammed register reads as zero"
        );
    }

    #[test]
    fn unmappable_register_reports_map_error() {
        let (mem, mapper) = make_mapper();
        mem.lock().unwrap().deny(0x300, 4);
        assert!(
            matches!(
                guarded_write(&mapper, 0x300, 1),
                Err(GateError::Map {
                    source: MapError::Unmappable { .. }
                })
            ),
            "denied address should surface as a map failure"
        );
        assert_eq!(
            mem.lock().unwrap().outstanding(),
            0,
            "failed map must not leak a mapping"
        );
    }
}
