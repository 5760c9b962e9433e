//! Silicon model for the Bandwidth Regulation Unit (BRU).
//!
//! The BRU is a memory-mapped IP block that throttles memory-bus access for
//! groups of hardware clients ("domains") by enforcing a periodic access
//! budget. This crate has **no dependencies** and **no hardware access** — it
//! is a pure model of the silicon: the register layout as a function of
//! domain/client counts, and the physical window geometry of the current
//! deployment.
//!
//! # Crate organisation
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`layout`] | Register map — byte offset of every field |
//! | [`window`] | Physical window geometry (base address, length) |

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod layout;
pub mod window;

pub use layout::Layout;
