//! Memory-mapped register window
//!
//! Owns the physical register range for the life of the process: takes an
//! exclusive advisory lock on the backing device (the acquisition step),
//! maps the window into the address space, and guarantees unmap + release
//! on every exit path via `Drop` — including the partial-initialization
//! path where the lock is held but the mapping failed.

use crate::error::{BruError, Result};
use crate::window::{check_access, RegisterWindow};
use rustix::fs::{flock, FlockOperation};
use rustix::io::Errno;
use rustix::mm::{mmap, munmap, MapFlags, ProtFlags};
use std::fs::{File, OpenOptions};
use std::os::unix::io::AsFd;
use std::path::Path;
use std::ptr::NonNull;

/// Default backing device for physical memory windows.
pub const DEVMEM_PATH: &str = "/dev/mem";

/// Memory-mapped BRU register window
///
/// Provides volatile, bounds-checked 64-bit access to the hardware
/// registers. Unsafe operations are encapsulated; the public API is safe.
#[derive(Debug)]
pub struct MappedWindow {
    ptr: NonNull<u8>,
    len: usize,
    base: u64,
    // Keeps the fd (and with it the exclusive flock) alive for the
    // lifetime of the mapping.
    _file: File,
}

impl MappedWindow {
    /// Acquire and map the register window at physical `base`, `len` bytes,
    /// backed by [`DEVMEM_PATH`].
    ///
    /// # Errors
    ///
    /// - [`BruError::RegionBusy`] if another process holds the window
    /// - [`BruError::MapFailed`] if the mapping cannot be established
    ///   (the acquisition is released before this returns)
    /// - [`BruError::Io`] if the backing device cannot be opened
    pub fn open(base: u64, len: usize) -> Result<Self> {
        Self::open_at(Path::new(DEVMEM_PATH), base, len)
    }

    /// Acquire and map the window through an explicit backing device.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`MappedWindow::open`].
    pub fn open_at(path: &Path, base: u64, len: usize) -> Result<Self> {
        tracing::info!("Acquiring register window {base:#x}+{len:#x} via {}", path.display());

        let file = OpenOptions::new().read(true).write(true).open(path)?;

        // Acquisition: non-blocking exclusive lock, the userspace analogue
        // of claiming the physical range. Held until `file` drops.
        flock(file.as_fd(), FlockOperation::NonBlockingLockExclusive).map_err(|e| {
            if e == Errno::WOULDBLOCK {
                BruError::RegionBusy { base }
            } else {
                BruError::map_failed(format!("flock on {}: {e}", path.display()))
            }
        })?;

        if len == 0 || len % 8 != 0 {
            return Err(BruError::map_failed(format!(
                "window length {len:#x} is not a positive multiple of 8"
            )));
        }

        // SAFETY: mmap necessary for MMIO — maps the register window into the
        // process address space. Invariants: (1) file just opened and locked;
        // (2) len validated non-zero; (3) offset is the physical base, which
        // the device expects page-aligned — the kernel rejects bad offsets
        // with an error we propagate; (4) rustix returns Err or a valid
        // mapping of len bytes. On Err, `file` drops and the flock releases
        // before the error propagates.
        let ptr = unsafe {
            let addr = mmap(
                std::ptr::null_mut(),
                len,
                ProtFlags::READ | ProtFlags::WRITE,
                MapFlags::SHARED,
                file.as_fd(),
                base,
            )
            .map_err(|e| BruError::map_failed(format!("mmap {base:#x}+{len:#x}: {e}")))?;

            NonNull::new(addr.cast::<u8>()).ok_or_else(|| {
                BruError::map_failed("mmap returned null".to_string())
            })?
        };

        tracing::info!("Mapped register window {base:#x} at {ptr:p} ({len:#x} bytes)");

        Ok(Self {
            ptr,
            len,
            base,
            _file: file,
        })
    }

    /// Physical base address of the window.
    #[must_use]
    pub const fn base(&self) -> u64 {
        self.base
    }
}

impl RegisterWindow for MappedWindow {
    fn len(&self) -> usize {
        self.len
    }

    fn read_u64(&self, offset: usize) -> Result<u64> {
        check_access(offset, self.len)?;

        // SAFETY: Volatile read from a memory-mapped hardware register.
        // Invariants: (1) ptr from successful mmap, valid for self.len;
        // (2) offset + 8 <= len and offset is 8-aligned (check_access);
        // (3) read_volatile is required — hardware may change the value and
        //     the compiler must not cache, elide, or reorder the access.
        #[allow(clippy::cast_ptr_alignment)]
        let value = unsafe { self.ptr.as_ptr().add(offset).cast::<u64>().read_volatile() };

        tracing::trace!("read  u64 @ {offset:#x} = {value:#x}");
        Ok(value)
    }

    fn write_u64(&mut self, offset: usize, value: u64) -> Result<()> {
        check_access(offset, self.len)?;

        tracing::trace!("write u64 @ {offset:#x} = {value:#x}");

        // SAFETY: Volatile write to a memory-mapped hardware register.
        // Invariants: (1) ptr from successful mmap, valid for self.len;
        // (2) offset + 8 <= len and offset is 8-aligned (check_access);
        // (3) write_volatile is required — the store has hardware side
        //     effects and must reach the device in program order.
        #[allow(clippy::cast_ptr_alignment)]
        unsafe {
            self.ptr.as_ptr().add(offset).cast::<u64>().write_volatile(value);
        }

        Ok(())
    }
}

impl Drop for MappedWindow {
    fn drop(&mut self) {
        // SAFETY: munmap with the exact ptr/len returned by mmap in
        // open_at(). Drop runs at most once; no other references exist.
        unsafe {
            if let Err(e) = munmap(self.ptr.as_ptr().cast(), self.len) {
                tracing::error!("munmap failed during drop: {e}");
            }
        }
        // `_file` drops next, releasing the exclusive lock.
        tracing::info!("Released register window {:#x}", self.base);
    }
}

// SAFETY: MappedWindow owns the mapping exclusively (flock + no other
// in-process references); moving it between threads does not invalidate
// the mapping. Writes require &mut self, so Send is sufficient — the
// protocol layer serializes multi-register sequences behind its own lock.
unsafe impl Send for MappedWindow {}
