use std::{error::Error, fmt};

use crate::mapper::{MapError, PhysAddr};

pub type GateResult<T> = Result<T, GateError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    InvalidAlignment {
        address: PhysAddr,
    },
    InvalidCount {
        count: usize,
    },
    AlreadyProgrammed {
        address: PhysAddr,
        current: u32,
    },
    Map {
        source: MapError,
    },
    /// A range commit failed after `written` words were already written.
    /// Written words stay written; the gateway never rolls back a completed
    /// unprogrammed-to-programmed transition.
    PartialCommit {
        written: usize,
        source: MapError,
    },
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateError::InvalidAlignment { address } => {
                write!(f, "address 0x{address:016X} is not 32-bit aligned")
            }
            GateError::InvalidCount { count } => {
                write!(f, "word count {count} outside the accepted range [1, 256]")
            }
            GateError::AlreadyProgrammed { address, current } => write!(
                f,
                "register 0x{address:016X} already programmed with 0x{current:08X}"
            ),
            GateError::Map { .. } => write!(f, "address-space mapper could not establish access"),
            GateError::PartialCommit { written, .. } => write!(
                f,
                "range write aborted after committing {written} word(s)"
            ),
        }
    }
}

impl From<MapError> for GateError {
    fn from(source: MapError) -> Self {
        GateError::Map { source }
    }
}

impl Error for GateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GateError::Map { source } | GateError::PartialCommit { source, .. } => Some(source),
            _ => None,
        }
    }
}
