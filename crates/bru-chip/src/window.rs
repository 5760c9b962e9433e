//! Physical geometry of the BRU register window.
//!
//! These are configuration constants of the current deployment, not protocol
//! invariants: the platform's device tree places the BRU control block at a
//! fixed physical address. A different integration only needs different
//! values here (or on the command line) — nothing in the register protocol
//! depends on them.

/// Physical base address of the register window.
pub const WINDOW_BASE: u64 = 0x2000_0000;

/// Window length in bytes (256 × 64-bit slots).
pub const WINDOW_LEN: usize = 0x800;
