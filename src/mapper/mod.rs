//! Address-space mapper boundary. The gateway never touches physical memory
//! directly; it asks an `AddressSpaceMapper` for temporary access to a span,
//! reads and writes 32-bit words through the mapping, and releases it before
//! the request completes. `SparseMemory` is the in-process implementation used
//! by hosts without real hardware and by the test suite.
pub mod error;
pub mod handle;
pub mod memory;

pub use error::{MapError, MapResult};
pub use handle::SpanHandle;
pub use memory::SparseMemory;

use std::sync::{Arc, Mutex};

use bitflags::bitflags;

/// Physical register address. Registers are 32-bit words, so valid addresses
/// are multiples of `WORD_BYTES`.
pub type PhysAddr = usize;

pub const WORD_BYTES: usize = 4;

bitflags! {
    /// Access requested when establishing a mapping.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MapPerms: u32 {
        const READ  = 0b01;
        const WRITE = 0b10;
    }
}

/// Capability that turns a physical address span into accessible words.
/// `map`/`unmap` are symmetric; every established mapping must be released.
/// Word accesses are only defined while a mapping covering the address with
/// the right permission is active.
pub trait AddressSpaceMapper: Send {
    fn name(&self) -> &str;

    /// Establish access to `len` bytes starting at `addr`.
    fn map(&mut self, addr: PhysAddr, len: usize, perms: MapPerms) -> MapResult<()>;

    /// Release the mapping previously established at `addr`.
    fn unmap(&mut self, addr: PhysAddr);

    fn read_word(&mut self, addr: PhysAddr) -> MapResult<u32>;

    fn write_word(&mut self, addr: PhysAddr, value: u32) -> MapResult<()>;
}

pub type MapperRef = Arc<Mutex<dyn AddressSpaceMapper>>;
