//! reggate mediates read/write access to memory-mapped 32-bit hardware
//! registers. Four operations are exposed over a control-request boundary:
//! single-word read and write, and contiguous range read and write of up to
//! 256 words. Addresses must be 32-bit aligned, and a register may only be
//! written while it still reads zero; once programmed it is immutable through
//! the gateway. Range writes are all-or-nothing with respect to that check,
//! and overlapping operations are serialized so the check cannot race.
//!
//! Physical memory is only reached through an [`mapper::AddressSpaceMapper`],
//! supplied by the host; [`mapper::SparseMemory`] is the in-process
//! implementation used in tests and on hosts without hardware.
pub mod gateway;
pub mod mapper;

pub use gateway::{
    AccessSerializer, AddrSpan, GateError, GateResult, Outcome, RegisterGateway, Request,
    SpanLock, MAX_RANGE_WORDS,
};
pub use mapper::{
    AddressSpaceMapper, MapError, MapPerms, MapResult, MapperRef, PhysAddr, SpanHandle,
    SparseMemory, WORD_BYTES,
};
