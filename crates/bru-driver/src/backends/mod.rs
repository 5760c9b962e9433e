//! Register window backends
//!
//! Two backings for the same [`crate::RegisterWindow`] seam:
//! - **Devmem**: the real memory-mapped hardware window, with exclusive
//!   acquisition and guaranteed release (production path)
//! - **Sim**: an in-memory window for tests, CI, and CLI dry runs

pub mod devmem;
pub mod sim;

pub use devmem::MappedWindow;
pub use sim::SimWindow;
