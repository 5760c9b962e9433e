//! Field codec for the BRU register protocol
//!
//! Typed accessors over the raw 64-bit window primitives: one method pair
//! per logical field, addressed through [`bru_chip::Layout`]. Values are
//! identity-mapped u64s except where noted; the single validated invariant
//! is that a domain budget of 0 is rejected rather than stored.
//!
//! There is no shadow copy: every accessor goes straight to the live
//! window, so a write is visible to the hardware's enforcement logic (and
//! to any subsequent read) immediately.

use crate::error::{BruError, Result};
use crate::window::RegisterWindow;
use bru_chip::layout::{CLIENTS_PER_WORD, GLOBAL_EN, PERIOD};
use bru_chip::Layout;

/// Typed register access for one BRU instance.
///
/// Owns the window; construction validates that the layout fits inside it,
/// so the per-field accessors can only fail if the window itself does.
#[derive(Debug)]
pub struct Bru<W: RegisterWindow> {
    window: W,
    layout: Layout,
}

impl<W: RegisterWindow> Bru<W> {
    /// Bind a layout to a window.
    ///
    /// # Errors
    ///
    /// - [`BruError::TooManyClients`] if the layout declares more clients
    ///   than the shared enable word carries
    /// - [`BruError::WindowTooSmall`] if the window does not cover every
    ///   field the layout addresses
    pub fn new(window: W, layout: Layout) -> Result<Self> {
        if layout.clients > CLIENTS_PER_WORD {
            return Err(BruError::TooManyClients {
                clients: layout.clients,
            });
        }
        let need = layout.required_len();
        if need > window.len() {
            return Err(BruError::WindowTooSmall {
                need,
                have: window.len(),
            });
        }
        Ok(Self { window, layout })
    }

    /// The layout this instance was opened with.
    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    // ── Global settings ──────────────────────────────────────────────────

    /// Whether the BRU is enforcing budgets (enable word nonzero).
    ///
    /// # Errors
    ///
    /// Returns an error if the window access fails.
    pub fn global_enabled(&self) -> Result<bool> {
        Ok(self.window.read_u64(GLOBAL_EN)? != 0)
    }

    /// Store a raw enable value. Deliberately unmasked: the hardware only
    /// interprets bit 0, but the protocol stores what the operator wrote.
    ///
    /// # Errors
    ///
    /// Returns an error if the window access fails.
    pub fn set_global_enable(&mut self, raw: u64) -> Result<()> {
        self.window.write_u64(GLOBAL_EN, raw)
    }

    /// Budget replenishment period, in cycles.
    ///
    /// # Errors
    ///
    /// Returns an error if the window access fails.
    pub fn period(&self) -> Result<u64> {
        self.window.read_u64(PERIOD)
    }

    /// Set the replenishment period.
    ///
    /// # Errors
    ///
    /// Returns an error if the window access fails.
    pub fn set_period(&mut self, cycles: u64) -> Result<()> {
        self.window.write_u64(PERIOD, cycles)
    }

    // ── Domain budgets ───────────────────────────────────────────────────

    /// Current budget of domain `i`.
    ///
    /// # Errors
    ///
    /// Returns an error if `i` is out of range or the window access fails.
    pub fn domain_budget(&self, i: usize) -> Result<u64> {
        self.check_domain(i)?;
        self.window.read_u64(self.layout.domain_budget(i))
    }

    /// Set the budget of domain `i`.
    ///
    /// # Errors
    ///
    /// - [`BruError::InvalidBudget`] if `budget` is 0 — the previous value
    ///   stays in place
    /// - [`BruError::InvalidIndex`] if `i` is out of range
    pub fn set_domain_budget(&mut self, i: usize, budget: u64) -> Result<()> {
        self.check_domain(i)?;
        if budget == 0 {
            return Err(BruError::InvalidBudget { domain: i });
        }
        self.window.write_u64(self.layout.domain_budget(i), budget)
    }

    // ── Clients ──────────────────────────────────────────────────────────

    /// The shared client enable word (bit `i` = client `i`).
    ///
    /// # Errors
    ///
    /// Returns an error if the window access fails.
    pub fn client_enable_word(&self) -> Result<u64> {
        self.window.read_u64(self.layout.client_enable_word())
    }

    /// Replace the shared client enable word. Callers updating a subset of
    /// clients must read-modify-write — this stores the whole word.
    ///
    /// # Errors
    ///
    /// Returns an error if the window access fails.
    pub fn set_client_enable_word(&mut self, word: u64) -> Result<()> {
        self.window.write_u64(self.layout.client_enable_word(), word)
    }

    /// Whether client `i` is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if `i` is out of range or the window access fails.
    pub fn client_enabled(&self, i: usize) -> Result<bool> {
        self.check_client(i)?;
        Ok((self.client_enable_word()? >> i) & 1 != 0)
    }

    /// Domain membership mask of client `i`. One-hot by intent.
    ///
    /// # Errors
    ///
    /// Returns an error if `i` is out of range or the window access fails.
    pub fn client_domain(&self, i: usize) -> Result<u64> {
        self.check_client(i)?;
        self.window.read_u64(self.layout.client_domain(i))
    }

    /// Set client `i`'s domain mask. The mask is stored verbatim; the
    /// one-hot convention is not enforced (a multi-bit or zero mask is
    /// accepted and logged), matching the hardware contract as deployed.
    ///
    /// # Errors
    ///
    /// Returns an error if `i` is out of range or the window access fails.
    pub fn set_client_domain(&mut self, i: usize, mask: u64) -> Result<()> {
        self.check_client(i)?;
        if mask.count_ones() != 1 {
            tracing::warn!("Client {i} domain mask {mask:#x} is not one-hot");
        }
        self.window.write_u64(self.layout.client_domain(i), mask)
    }

    fn check_domain(&self, i: usize) -> Result<()> {
        if i < self.layout.domains {
            Ok(())
        } else {
            Err(BruError::InvalidIndex {
                index: i,
                count: self.layout.domains,
            })
        }
    }

    fn check_client(&self, i: usize) -> Result<()> {
        if i < self.layout.clients {
            Ok(())
        } else {
            Err(BruError::InvalidIndex {
                index: i,
                count: self.layout.clients,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::SimWindow;

    fn bru(domains: usize, clients: usize) -> Bru<SimWindow> {
        let layout = Layout::new(domains, clients);
        Bru::new(SimWindow::for_layout(&layout), layout).unwrap()
    }

    #[test]
    fn budget_round_trip() {
        let mut b = bru(3, 1);
        for i in 0..3 {
            b.set_domain_budget(i, 100 + i as u64).unwrap();
        }
        for i in 0..3 {
            assert_eq!(b.domain_budget(i).unwrap(), 100 + i as u64);
        }
    }

    #[test]
    fn zero_budget_rejected_prior_value_kept() {
        let mut b = bru(1, 1);
        b.set_domain_budget(0, 100).unwrap();
        assert!(matches!(
            b.set_domain_budget(0, 0),
            Err(BruError::InvalidBudget { domain: 0 })
        ));
        assert_eq!(b.domain_budget(0).unwrap(), 100);
    }

    #[test]
    fn period_round_trip_full_width() {
        let mut b = bru(1, 1);
        b.set_period(u64::MAX).unwrap();
        assert_eq!(b.period().unwrap(), u64::MAX);
        b.set_period(5000).unwrap();
        assert_eq!(b.period().unwrap(), 5000);
    }

    #[test]
    fn enable_stored_verbatim_read_as_nonzero() {
        let mut b = bru(1, 1);
        b.set_global_enable(2).unwrap();
        // Unmasked store: the raw value 2 counts as "on".
        assert!(b.global_enabled().unwrap());
        b.set_global_enable(0).unwrap();
        assert!(!b.global_enabled().unwrap());
    }

    #[test]
    fn client_enable_bits() {
        let mut b = bru(1, 4);
        b.set_client_enable_word(0b1010).unwrap();
        assert!(!b.client_enabled(0).unwrap());
        assert!(b.client_enabled(1).unwrap());
        assert!(!b.client_enabled(2).unwrap());
        assert!(b.client_enabled(3).unwrap());
    }

    #[test]
    fn client_domain_mask_is_permissive() {
        let mut b = bru(2, 1);
        // Multi-bit mask accepted (logged, not rejected).
        b.set_client_domain(0, 0b11).unwrap();
        assert_eq!(b.client_domain(0).unwrap(), 0b11);
    }

    #[test]
    fn indices_bounds_checked() {
        let mut b = bru(2, 2);
        assert!(matches!(
            b.domain_budget(2),
            Err(BruError::InvalidIndex { index: 2, count: 2 })
        ));
        assert!(matches!(
            b.set_client_domain(5, 1),
            Err(BruError::InvalidIndex { index: 5, count: 2 })
        ));
    }

    #[test]
    fn construction_validates_window() {
        let layout = Layout::new(1, 1);
        assert!(matches!(
            Bru::new(SimWindow::new(32), layout),
            Err(BruError::WindowTooSmall { need: 64, have: 32 })
        ));
        assert!(matches!(
            Bru::new(SimWindow::new(4096), Layout::new(1, 65)),
            Err(BruError::TooManyClients { clients: 65 })
        ));
    }
}
