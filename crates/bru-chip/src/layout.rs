//! Register map for the BRU control window.
//!
//! Every field is a little-endian-native 64-bit word. The fixed head of the
//! window holds the global settings; the variable tail is a function of the
//! domain and client counts:
//!
//! ```text
//! 0x00              global_enable
//! 0x08              settings (reserved)
//! 0x10              period
//! 24 + 8i           domain_budget[i],   i < domains
//! 24 + 8*domains    client_enable_word  (one bit per client, shared word)
//! 48 + 8*domains
//!      + 8i         client_domain[i],   i < clients  (one-hot by intent)
//! ```
//!
//! Note the reserved gap between the client enable word and the first
//! `client_domain` slot: the enable word occupies a single 64-bit slot but
//! the domain array starts 24 bytes further along.

// ── Fixed-offset fields ──────────────────────────────────────────────────────

/// Global enable word. Bit 0 gates budget enforcement; the hardware ignores
/// the remaining bits on read, and software stores written values verbatim.
pub const GLOBAL_EN: usize = 0x00;

/// Reserved settings word between enable and period. Unused.
pub const SETTINGS: usize = 0x08;

/// Budget replenishment period, in cycles.
pub const PERIOD: usize = 0x10;

/// First domain budget slot.
pub const DOMAIN_BASE: usize = 24;

/// Byte width of every register field.
pub const REG_BYTES: usize = 8;

/// Client enables share one 64-bit word, one bit per client.
pub const CLIENTS_PER_WORD: usize = 64;

// ── Variable layout ──────────────────────────────────────────────────────────

/// Register layout parameterised by domain and client counts.
///
/// The counts are supplied at window-open time rather than baked in at
/// compile time, so the same binary drives BRU instances of any size once
/// the hardware grows discovery registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Number of budget domains.
    pub domains: usize,
    /// Number of hardware clients.
    pub clients: usize,
}

impl Layout {
    /// Layout with explicit counts.
    #[must_use]
    pub const fn new(domains: usize, clients: usize) -> Self {
        Self { domains, clients }
    }

    /// Byte offset of `domain_budget[i]`.
    #[must_use]
    pub const fn domain_budget(&self, i: usize) -> usize {
        DOMAIN_BASE + REG_BYTES * i
    }

    /// Byte offset of the shared client enable word.
    #[must_use]
    pub const fn client_enable_word(&self) -> usize {
        DOMAIN_BASE + REG_BYTES * self.domains
    }

    /// Byte offset of `client_domain[i]`.
    #[must_use]
    pub const fn client_domain(&self, i: usize) -> usize {
        48 + REG_BYTES * self.domains + REG_BYTES * i
    }

    /// Minimum window length, in bytes, that covers every addressed field.
    #[must_use]
    pub const fn required_len(&self) -> usize {
        48 + REG_BYTES * self.domains + REG_BYTES * self.clients
    }
}

impl Default for Layout {
    /// Counts of the current deployment. Placeholder pending hardware
    /// discovery registers.
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_head_offsets() {
        assert_eq!(GLOBAL_EN, 0x00);
        assert_eq!(SETTINGS, 0x08);
        assert_eq!(PERIOD, 0x10);
        assert_eq!(DOMAIN_BASE, 24);
    }

    #[test]
    fn deployment_layout_offsets() {
        // 1 domain, 1 client — the current silicon.
        let l = Layout::default();
        assert_eq!(l.domain_budget(0), 24);
        assert_eq!(l.client_enable_word(), 32);
        assert_eq!(l.client_domain(0), 56);
        assert_eq!(l.required_len(), 64);
    }

    #[test]
    fn tail_scales_with_counts() {
        let l = Layout::new(4, 3);
        assert_eq!(l.domain_budget(3), 24 + 8 * 3);
        assert_eq!(l.client_enable_word(), 24 + 8 * 4);
        assert_eq!(l.client_domain(0), 48 + 8 * 4);
        assert_eq!(l.client_domain(2), 48 + 8 * 4 + 8 * 2);
        assert_eq!(l.required_len(), 48 + 8 * 4 + 8 * 3);
    }

    #[test]
    fn enable_word_precedes_domain_array() {
        // The enable word sits in the reserved gap before client_domain[0].
        let l = Layout::new(2, 8);
        assert!(l.client_enable_word() + REG_BYTES <= l.client_domain(0));
    }

    #[test]
    fn fields_do_not_overlap() {
        let l = Layout::new(2, 2);
        assert!(PERIOD + REG_BYTES <= l.domain_budget(0));
        assert!(l.domain_budget(1) + REG_BYTES <= l.client_enable_word());
    }
}
