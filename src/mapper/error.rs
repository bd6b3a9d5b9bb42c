use std::{error::Error, fmt};

use super::PhysAddr;

pub type MapResult<T> = Result<T, MapError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    Unmappable {
        address: PhysAddr,
        reason: &'static str,
    },
    OutOfSpan {
        address: PhysAddr,
        start: PhysAddr,
        len: usize,
    },
    PermissionDenied {
        address: PhysAddr,
    },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Unmappable { address, reason } => {
                write!(f, "cannot map address 0x{address:016X}: {reason}")
            }
            MapError::OutOfSpan {
                address,
                start,
                len,
            } => {
                let end = start.saturating_add(*len);
                write!(
                    f,
                    "address 0x{address:016X} outside mapped span 0x{start:016X}..0x{end:016X}"
                )
            }
            MapError::PermissionDenied { address } => {
                write!(f, "mapping at 0x{address:016X} does not permit the access")
            }
        }
    }
}

impl Error for MapError {}
