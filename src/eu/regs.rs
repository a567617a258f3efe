#![allow(unsafe_code)]

//! 32-bit register access primitive.
//!
//! The event unit and the iDMA front-ends are plain memory-mapped register
//! windows. Everything above this module talks to them through
//! [`RegisterBlock`], so the wait algorithms run unchanged on silicon
//! ([`Mmio`]) and against a simulated tile in tests.

use core::ptr::{read_volatile, write_volatile};

/// A window of 32-bit registers addressed by byte offset.
///
/// Accesses take `&self`: a register read may have side effects in hardware
/// (sleeping, popping an id), but never requires exclusive access in Rust
/// terms.
pub trait RegisterBlock {
    /// Reads the 32-bit register at `offset` bytes from the window base.
    fn read32(&self, offset: usize) -> u32;
    /// Writes the 32-bit register at `offset` bytes from the window base.
    fn write32(&self, offset: usize, value: u32);
}

impl<T: RegisterBlock + ?Sized> RegisterBlock for &T {
    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        (**self).read32(offset)
    }

    #[inline]
    fn write32(&self, offset: usize, value: u32) {
        (**self).write32(offset, value)
    }
}

/// Memory-mapped register window at a fixed physical address.
#[derive(Debug)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// Creates a window starting at `base`.
    ///
    /// # Safety
    /// `base` must be the 4-byte aligned address of a device register window
    /// that stays mapped for the lifetime of the returned value, and no other
    /// `Mmio` may drive the same window concurrently.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    pub const fn base(&self) -> usize {
        self.base
    }
}

impl RegisterBlock for Mmio {
    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        debug_assert!(offset % 4 == 0, "unaligned register offset {:#x}", offset);
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write32(&self, offset: usize, value: u32) {
        debug_assert!(offset % 4 == 0, "unaligned register offset {:#x}", offset);
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }
}
