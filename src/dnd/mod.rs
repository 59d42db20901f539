// Drag-and-drop data exchange
// In-process drop target, drop source and data object, plus the engine host
// that drives them through a modal drag loop

pub mod data_object;
pub mod drop_source;
pub mod drop_target;
pub mod engine;
pub mod format;
pub mod hglobal;
pub mod session;

use crate::com::Interface;
use thiserror::Error;

/// Failures reported across the drag-and-drop protocol.
///
/// Each variant corresponds to the HRESULT an OLE implementation would return,
/// see [`DndError::hresult`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DndError {
    /// The caller passed something unusable, e.g. a path that doesn't exist
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A shared memory block could not be allocated
    #[error("out of memory allocating {0} bytes")]
    OutOfMemory(usize),

    /// The requested (format, medium) pair isn't offered
    #[error("format not supported")]
    FormatNotSupported,

    /// Permanently unsupported operation
    #[error("not implemented")]
    NotImplemented,

    /// The object does not accept data change notifications
    #[error("advise not supported")]
    AdviseNotSupported,

    /// The object does not implement the queried capability
    #[error("interface {0} not supported")]
    NoInterface(Interface),

    /// The payload could not be interpreted
    #[error("malformed payload: {0}")]
    Malformed(&'static str),
}

impl DndError {
    /// The Windows HRESULT for this failure
    pub fn hresult(&self) -> u32 {
        match self {
            DndError::InvalidArg(_) => 0x8007_0057,
            DndError::OutOfMemory(_) => 0x8007_000E,
            DndError::FormatNotSupported => 0x8004_0064,
            DndError::NotImplemented => 0x8000_4001,
            DndError::AdviseNotSupported => 0x8004_0003,
            DndError::NoInterface(_) => 0x8000_4002,
            DndError::Malformed(_) => 0x8000_FFFF,
        }
    }
}
