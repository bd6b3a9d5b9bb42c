//! RegisterGateway: the front door. Every operation validates the request
//! shape, takes the span lock, and only then touches hardware through the
//! mapper. The gateway caches nothing; programmed status is re-derived from
//! a live read every time, so it cannot desynchronize from the registers.
use log::trace;

use crate::mapper::{AddressSpaceMapper, MapperRef, PhysAddr};
use std::sync::{Arc, Mutex};

use super::{
    error::GateResult,
    guard, range,
    request::{self, Outcome, Request},
    serializer::AccessSerializer,
    span::AddrSpan,
};

pub struct RegisterGateway {
    mapper: MapperRef,
    serializer: AccessSerializer,
}

impl RegisterGateway {
    pub fn new(mapper: MapperRef) -> Self {
        Self {
            mapper,
            serializer: AccessSerializer::new(),
        }
    }

    pub fn with_mapper(mapper: impl AddressSpaceMapper + 'static) -> Self {
        Self::new(Arc::new(Mutex::new(mapper)))
    }

    /// Read one register.
    pub fn read(&self, addr: PhysAddr) -> GateResult<u32> {
        request::check_alignment(addr)?;
        trace!("read 0x{addr:X}");
        let _lock = self.serializer.acquire(AddrSpan::word(addr));
        guard::guarded_read(&self.mapper, addr)
    }

    /// Write one register, only if it currently reads zero.
    pub fn write(&self, addr: PhysAddr, value: u32) -> GateResult<()> {
        request::check_alignment(addr)?;
        trace!("write 0x{value:08X} to 0x{addr:X}");
        let _lock = self.serializer.acquire(AddrSpan::word(addr));
        guard::guarded_write(&self.mapper, addr, value)
    }

    /// Read `count` contiguous registers starting at `addr`.
    pub fn read_range(&self, addr: PhysAddr, count: usize) -> GateResult<Vec<u32>> {
        request::check_alignment(addr)?;
        request::check_count(count)?;
        trace!("read {count} words from 0x{addr:X}");
        let _lock = self.serializer.acquire(AddrSpan::words(addr, count));
        range::read_range(&self.mapper, addr, count)
    }

    /// Write `values` to contiguous registers starting at `addr`, only if
    /// every target currently reads zero.
    pub fn write_range(&self, addr: PhysAddr, values: &[u32]) -> GateResult<()> {
        request::check_alignment(addr)?;
        request::check_count(values.len())?;
        trace!("write {} words to 0x{addr:X}", values.len());
        let _lock = self.serializer.acquire(AddrSpan::words(addr, values.len()));
        range::write_range(&self.mapper, addr, values)
    }

    /// Control-request boundary: dispatch one request to the matching
    /// operation and wrap the result as an `Outcome`.
    pub fn submit(&self, request: Request) -> GateResult<Outcome> {
        request.validate()?;
        match request {
            Request::Read { addr } => self.read(addr).map(|value| Outcome::Value { addr, value }),
            Request::Write { addr, value } => self
                .write(addr, value)
                .map(|()| Outcome::Written { addr, value }),
            Request::ReadRange { addr, count } => self
                .read_range(addr, count)
                .map(|values| Outcome::Values { addr, values }),
            Request::WriteRange { addr, values } => {
                let count = values.len();
                self.write_range(addr, &values)
                    .map(|()| Outcome::RangeWritten { addr, count })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::gateway::error::GateError;
    use crate::mapper::SparseMemory;

    fn make_gateway() -> (Arc<Mutex<SparseMemory>>, RegisterGateway) {
        let mem = Arc::new(Mutex::new(SparseMemory::new("gate-mem")));
        let mapper: MapperRef = mem.clone();
        (mem, RegisterGateway::new(mapper))
    }

    #[test]
    fn misaligned_requests_never_reach_the_mapper() {
        let (mem, gateway) = make_gateway();
        assert!(
            matches!(
                gateway.read(0x101),
                Err(GateError::InvalidAlignment { address: 0x101 })
            ),
            "misaligned read rejected"
        );
        assert!(
            matches!(
                gateway.write_range(0x102, &[1]),
                Err(GateError::InvalidAlignment { address: 0x102 })
            ),
            "misaligned range write rejected"
        );
        assert_eq!(
            mem.lock().unwrap().map_calls(),
            0,
            "validation failures must not touch hardware"
        );
    }

    #[test]
    fn out_of_bound_counts_never_reach_the_mapper() {
        let (mem, gateway) = make_gateway();
        assert!(
            matches!(
                gateway.read_range(0x100, 0),
                Err(GateError::InvalidCount { count: 0 })
            ),
            "zero count rejected"
        );
        assert!(
            matches!(
                gateway.read_range(0x100, 257),
                Err(GateError::InvalidCount { count: 257 })
            ),
            "oversized count rejected, not truncated"
        );
        assert_eq!(
            mem.lock().unwrap().map_calls(),
            0,
            "validation failures must not touch hardware"
        );
    }

    #[test]
    fn submit_mirrors_the_typed_operations() {
        let (_mem, gateway) = make_gateway();
        let outcome = gateway
            .submit(Request::Write {
                addr: 0x100,
                value: 0x55,
            })
            .expect("submit write");
        assert_eq!(
            outcome,
            Outcome::Written {
                addr: 0x100,
                value: 0x55
            },
            "write outcome"
        );

        let outcome = gateway
            .submit(Request::Read { addr: 0x100 })
            .expect("submit read");
        assert_eq!(
            outcome,
            Outcome::Value {
                addr: 0x100,
                value: 0x55
            },
            "read outcome should observe the written value"
        );
    }
}
