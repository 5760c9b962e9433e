//! Simulated register window
//!
//! An in-memory stand-in for the hardware window. The register protocol is
//! pure address arithmetic over 64-bit slots, so a `Vec<u64>` reproduces it
//! exactly — this is what lets the whole control plane run in CI without a
//! BRU on the bus, and what the CLI's `--sim` flag drives for dry runs.
//!
//! The simulation models storage only: it does not replenish budgets on a
//! period timer or enforce anything. Register contents change only through
//! writes.

use crate::error::Result;
use crate::window::{check_access, RegisterWindow};
use bru_chip::Layout;

/// In-memory register window.
#[derive(Debug, Clone)]
pub struct SimWindow {
    words: Vec<u64>,
}

impl SimWindow {
    /// Zero-filled window of `len` bytes, rounded down to whole words.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len / 8],
        }
    }

    /// Smallest window that fits `layout`.
    #[must_use]
    pub fn for_layout(layout: &Layout) -> Self {
        Self::new(layout.required_len())
    }
}

impl RegisterWindow for SimWindow {
    fn len(&self) -> usize {
        self.words.len() * 8
    }

    fn read_u64(&self, offset: usize) -> Result<u64> {
        check_access(offset, self.len())?;
        Ok(self.words[offset / 8])
    }

    fn write_u64(&mut self, offset: usize, value: u64) -> Result<()> {
        check_access(offset, self.len())?;
        self.words[offset / 8] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BruError;

    #[test]
    fn words_round_trip() {
        let mut w = SimWindow::new(64);
        w.write_u64(24, 0xdead_beef).unwrap();
        assert_eq!(w.read_u64(24).unwrap(), 0xdead_beef);
        assert_eq!(w.read_u64(32).unwrap(), 0);
    }

    #[test]
    fn bounds_and_alignment_enforced() {
        let mut w = SimWindow::new(64);
        assert!(matches!(
            w.read_u64(64),
            Err(BruError::OutOfBounds { .. })
        ));
        assert!(matches!(
            w.write_u64(72, 1),
            Err(BruError::OutOfBounds { .. })
        ));
        assert!(matches!(w.read_u64(3), Err(BruError::Misaligned { .. })));
    }

    #[test]
    fn layout_sized_window() {
        let w = SimWindow::for_layout(&Layout::new(4, 3));
        assert_eq!(w.len(), Layout::new(4, 3).required_len());
    }
}
