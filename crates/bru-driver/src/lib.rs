//! Userspace control plane for the Bandwidth Regulation Unit (BRU).
//!
//! The BRU throttles memory-bus access for groups of hardware clients
//! ("domains") by enforcing a periodic access budget. This crate is the
//! software side of that contract: the register field codec, the
//! line-oriented operator protocol, and scoped ownership of the
//! memory-mapped register window. The silicon model itself (offsets,
//! window geometry) lives in `bru-chip`.
//!
//! # Window backends
//!
//! ```text
//! Production:
//!   MappedWindow — exclusive acquisition + mmap of the physical window
//!
//! Development / CI:
//!   SimWindow    — in-memory window, no hardware required
//! ```
//!
//! # Quick start
//!
//! ```
//! use bru_chip::Layout;
//! use bru_driver::{backends::SimWindow, Bru, ControlPlane};
//!
//! # fn main() -> bru_driver::Result<()> {
//! let layout = Layout::default(); // 1 domain, 1 client
//! let bru = Bru::new(SimWindow::for_layout(&layout), layout)?;
//! let plane = ControlPlane::new(bru);
//!
//! plane.apply_domain_budgets("100")?;
//! plane.apply_enable("1")?;
//! print!("{}", plane.domain_report()?);
//! # Ok(())
//! # }
//! ```
//!
//! On real hardware, replace the `SimWindow` with
//! `MappedWindow::open(bru_chip::window::WINDOW_BASE, bru_chip::window::WINDOW_LEN)`.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod backends;
mod control;
mod error;
mod regs;
mod window;

pub use backends::{MappedWindow, SimWindow};
pub use control::ControlPlane;
pub use error::{BruError, Result};
pub use regs::Bru;
pub use window::RegisterWindow;

/// Commonly used types.
pub mod prelude {
    pub use crate::{Bru, BruError, ControlPlane, MappedWindow, RegisterWindow, Result, SimWindow};
    pub use bru_chip::Layout;
}
