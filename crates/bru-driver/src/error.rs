//! Error types for BRU control-plane operations

use thiserror::Error;

/// Result type alias for BRU operations
pub type Result<T> = std::result::Result<T, BruError>;

/// Errors that can occur while acquiring or driving the register window
#[derive(Debug, Error)]
pub enum BruError {
    /// Register range is already owned by another consumer.
    /// Fatal to startup; there is no retry.
    #[error("Register window at {base:#x} is busy (held by another process)")]
    RegionBusy {
        /// Physical base of the contested window
        base: u64,
    },

    /// Range was acquired but the mapping could not be established.
    /// The acquisition is released before this propagates.
    #[error("Failed to map register window: {reason}")]
    MapFailed {
        /// Reason for failure
        reason: String,
    },

    /// Register access outside the mapped window
    #[error("Out of bounds access: offset={offset:#x}, window={len:#x} bytes")]
    OutOfBounds {
        /// Byte offset of the attempted access
        offset: usize,
        /// Window length in bytes
        len: usize,
    },

    /// Register access not aligned to a 64-bit word
    #[error("Misaligned register access at offset {offset:#x}")]
    Misaligned {
        /// Byte offset of the attempted access
        offset: usize,
    },

    /// A domain budget write of literal 0. Recovered locally: the domain's
    /// previous budget stays in place and the rest of the request proceeds.
    #[error("Domain {domain} assigned budget of 0")]
    InvalidBudget {
        /// Domain whose update was rejected
        domain: usize,
    },

    /// Domain or client index out of range
    #[error("Index {index} out of range (have {count})")]
    InvalidIndex {
        /// Requested index
        index: usize,
        /// Number of entities in the layout
        count: usize,
    },

    /// The layout does not fit inside the window
    #[error("Window too small: layout needs {need:#x} bytes, window has {have:#x}")]
    WindowTooSmall {
        /// Bytes the layout addresses
        need: usize,
        /// Bytes the window provides
        have: usize,
    },

    /// More clients than the shared 64-bit enable word can carry
    #[error("Layout declares {clients} clients; the enable word carries at most 64")]
    TooManyClients {
        /// Declared client count
        clients: usize,
    },

    /// I/O error while opening the window's backing device
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error
        #[from]
        source: std::io::Error,
    },
}

impl BruError {
    /// Create a mapping failure error
    pub fn map_failed(reason: impl Into<String>) -> Self {
        Self::MapFailed {
            reason: reason.into(),
        }
    }
}
