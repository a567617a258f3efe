#![allow(unsafe_code)]

//! The executing hart's side of waiting.
//!
//! Polling needs a small fixed delay between observations; suspending needs
//! an architectural "sleep until any enabled event fires" primitive. Both are
//! supplied by the target through [`Hart`].

/// Delay and sleep capability of the hart running the waits.
pub trait Hart {
    /// Burns roughly `cycles` cycles without giving up the hart.
    fn spin(&mut self, cycles: u32);

    /// Sleeps until an IRQ-enabled event line sees an edge.
    ///
    /// The wake carries no information about which line fired and may be
    /// spurious; callers must re-read the event buffer afterwards.
    fn suspend(&mut self);
}

impl<H: Hart + ?Sized> Hart for &mut H {
    #[inline]
    fn spin(&mut self, cycles: u32) {
        (**self).spin(cycles)
    }

    #[inline]
    fn suspend(&mut self) {
        (**self).suspend()
    }
}

/// Portable hart that never really sleeps.
///
/// `suspend` degrades to a single spin-loop hint, which the waits treat as a
/// spurious wake-up.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinHart;

impl Hart for SpinHart {
    fn spin(&mut self, cycles: u32) {
        for _ in 0..cycles {
            core::hint::spin_loop();
        }
    }

    fn suspend(&mut self) {
        core::hint::spin_loop();
    }
}

/// CV32E40X core with the event unit wired to its wait-for-event input.
#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct Cv32e40x;

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
impl Hart for Cv32e40x {
    fn spin(&mut self, cycles: u32) {
        for _ in 0..cycles {
            unsafe { core::arch::asm!("nop", options(nomem, nostack)) };
        }
    }

    fn suspend(&mut self) {
        // Custom `wfe` encoding of the CV32E40X.
        unsafe { core::arch::asm!(".word 0x8C000073", options(nostack)) };
    }
}
