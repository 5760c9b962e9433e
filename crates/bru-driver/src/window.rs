//! Register window access trait
//!
//! The seam between the register protocol and whatever backs the window:
//! the real memory-mapped hardware ([`crate::backends::MappedWindow`]) or an
//! in-memory stand-in for tests and development
//! ([`crate::backends::SimWindow`]).

use crate::error::{BruError, Result};

/// A span of 64-bit-word-aligned register storage.
///
/// Every read observes live state (backends must not cache), and every
/// access is bounds- and alignment-checked against the window length.
/// Reads take `&self`; writes require `&mut self`, so exclusive access is
/// enforced by the borrow checker rather than by the backend.
pub trait RegisterWindow: Send {
    /// Window length in bytes.
    fn len(&self) -> usize;

    /// Whether the window has zero length.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the 64-bit register at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if `offset` is out of bounds or misaligned.
    fn read_u64(&self, offset: usize) -> Result<u64>;

    /// Write the 64-bit register at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if `offset` is out of bounds or misaligned.
    fn write_u64(&mut self, offset: usize, value: u64) -> Result<()>;
}

/// Shared bounds/alignment check for window backends.
pub(crate) fn check_access(offset: usize, len: usize) -> Result<()> {
    if offset % 8 != 0 {
        return Err(BruError::Misaligned { offset });
    }
    if offset + 8 > len {
        return Err(BruError::OutOfBounds { offset, len });
    }
    Ok(())
}
