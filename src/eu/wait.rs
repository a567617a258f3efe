//! The two blocking primitives every multi-device wait is built from.
//!
//! - [`EventUnit::poll`]: bounded busy polling, never suspends the hart.
//! - [`EventUnit::suspend`]: one observe / sleep / observe cycle driven by the
//!   wake-on-event input of the hart.
//!
//! Both only ever clear bits they observed in the same call.

use log::trace;

use crate::eu::{hart::Hart, mask::EventMask, regs::RegisterBlock, unit::EventUnit};

/// Cycles burnt between two observations while polling.
pub const POLL_QUANTUM_CYCLES: u32 = 10;

/// How a wait blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitMode {
    /// Busy-wait on the buffer with an iteration budget.
    #[default]
    Polling,
    /// Sleep on the hart's wait-for-event input. Unbounded.
    Suspend,
}

/// Polling budget, counted in poll iterations rather than wall-clock time.
///
/// One iteration is one observation followed by a
/// [`POLL_QUANTUM_CYCLES`] delay. A budget of zero never runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget(u32);

impl Budget {
    /// Polls forever.
    pub const UNBOUNDED: Self = Budget(0);
    /// One million cycles, the firmware's single-wait watchdog.
    pub const DEFAULT: Self = Budget::from_cycles(1_000_000);
    /// One hundred cycles, the length of one ALL-mode polling round.
    pub const DEFAULT_SLICE: Self = Budget::from_cycles(100);

    #[inline]
    pub const fn iterations(n: u32) -> Self {
        Budget(n)
    }

    /// Converts a cycle count into whole poll iterations, rounding up.
    #[inline]
    pub const fn from_cycles(cycles: u32) -> Self {
        Budget(cycles.div_ceil(POLL_QUANTUM_CYCLES))
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_unbounded(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub(crate) const fn is_exhausted(self, elapsed: u32) -> bool {
        self.0 != 0 && elapsed >= self.0
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl<R: RegisterBlock> EventUnit<R> {
    /// Busy-polls until a line in `mask` is pending or `budget` runs out.
    ///
    /// Returns the observed lines, already cleared, or the empty mask on
    /// timeout. Lines outside `mask` are never touched.
    pub fn poll<H: Hart + ?Sized>(
        &mut self,
        hart: &mut H,
        mask: EventMask,
        budget: Budget,
    ) -> EventMask {
        let mut elapsed = 0u32;
        loop {
            let seen = self.take(mask);
            if !seen.is_empty() {
                trace!("poll {:?}: {:?} after {} iterations", mask, seen, elapsed);
                return seen;
            }

            hart.spin(POLL_QUANTUM_CYCLES);
            elapsed = elapsed.saturating_add(1);

            if budget.is_exhausted(elapsed) {
                trace!("poll {:?}: nothing after {} iterations", mask, elapsed);
                return EventMask::EMPTY;
            }
        }
    }

    /// One observe / sleep / observe cycle on the lines in `mask`.
    ///
    /// `mask` is added to the IRQ-enabled lines first, since the wake-up is
    /// driven by the same edge that would raise the interrupt. If a line is
    /// already pending the hart does not sleep at all.
    ///
    /// Returns the observed lines, already cleared. An empty result means the
    /// hart was woken by some other line; the caller decides whether to
    /// suspend again.
    pub fn suspend<H: Hart + ?Sized>(&mut self, hart: &mut H, mask: EventMask) -> EventMask {
        if !self.irq_enabled().contains(mask) {
            self.enable_irq(mask);
        }

        let seen = self.take(mask);
        if !seen.is_empty() {
            return seen;
        }

        hart.suspend();

        let seen = self.take(mask);
        trace!("suspend {:?}: woke with {:?}", mask, seen);
        seen
    }

    /// Dispatches to [`poll`](Self::poll) or [`suspend`](Self::suspend).
    ///
    /// `budget` only applies to polling.
    pub fn wait<H: Hart + ?Sized>(
        &mut self,
        hart: &mut H,
        mask: EventMask,
        mode: WaitMode,
        budget: Budget,
    ) -> EventMask {
        match mode {
            WaitMode::Polling => self.poll(hart, mask, budget),
            WaitMode::Suspend => self.suspend(hart, mask),
        }
    }
}
