//! Request and Outcome types for the control-request boundary, plus the
//! request validator. Validation is a pure function of the request shape;
//! no hardware is touched until a request has passed it.
use std::fmt;

use crate::mapper::{PhysAddr, WORD_BYTES};

use super::{
    error::{GateError, GateResult},
    span::AddrSpan,
};

/// Largest word count a range operation accepts. Oversized requests are
/// rejected outright, never truncated.
pub const MAX_RANGE_WORDS: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Read { addr: PhysAddr },
    Write { addr: PhysAddr, value: u32 },
    ReadRange { addr: PhysAddr, count: usize },
    WriteRange { addr: PhysAddr, values: Vec<u32> },
}

impl Request {
    pub fn addr(&self) -> PhysAddr {
        match self {
            Request::Read { addr }
            | Request::Write { addr, .. }
            | Request::ReadRange { addr, .. }
            | Request::WriteRange { addr, .. } => *addr,
        }
    }

    pub fn word_count(&self) -> usize {
        match self {
            Request::Read { .. } | Request::Write { .. } => 1,
            Request::ReadRange { count, .. } => *count,
            Request::WriteRange { values, .. } => values.len(),
        }
    }

    /// Address span the request will touch, used for serialization.
    pub fn span(&self) -> AddrSpan {
        AddrSpan::words(self.addr(), self.word_count())
    }

    pub fn validate(&self) -> GateResult<()> {
        check_alignment(self.addr())?;
        match self {
            Request::Read { .. } | Request::Write { .. } => Ok(()),
            Request::ReadRange { count, .. } => check_count(*count),
            Request::WriteRange { values, .. } => check_count(values.len()),
        }
    }
}

pub(crate) fn check_alignment(addr: PhysAddr) -> GateResult<()> {
    if addr % WORD_BYTES != 0 {
        return Err(GateError::InvalidAlignment { address: addr });
    }
    Ok(())
}

pub(crate) fn check_count(count: usize) -> GateResult<()> {
    if count == 0 || count > MAX_RANGE_WORDS {
        return Err(GateError::InvalidCount { count });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Value { addr: PhysAddr, value: u32 },
    Written { addr: PhysAddr, value: u32 },
    Values { addr: PhysAddr, values: Vec<u32> },
    RangeWritten { addr: PhysAddr, count: usize },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Value { addr, value } => {
                write!(f, "Value at 0x{addr:X} = 0x{value:X}")
            }
            Outcome::Written { addr, value } => {
                write!(f, "Wrote 0x{value:X} to 0x{addr:X} (only if previously 0)")
            }
            Outcome::Values { addr, values } => {
                writeln!(f, "Reading {} values from 0x{addr:X}:", values.len())?;
                for (i, value) in values.iter().enumerate() {
                    writeln!(f, "  [0x{:X}] = 0x{value:X}", addr + i * WORD_BYTES)?;
                }
                Ok(())
            }
            Outcome::RangeWritten { addr, count } => {
                write!(f, "Wrote {count} values to 0x{addr:X} (only if previously 0)")
            }
        }
    }
}
