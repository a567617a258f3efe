//! Waiting on several devices at once.
//!
//! A session looks like this:
//!
//! 1. [`EventUnit::arm`] with the plan, before any device is started.
//! 2. Start the devices (outside this crate).
//! 3. [`EventUnit::wait_any`] or [`EventUnit::wait_all`] with the same plan.
//!
//! Completions are independent edges that may retire in any order, some of
//! them before the wait is even entered. `wait_all` therefore accumulates what
//! it has seen and only ever asks the wait strategy for the lines still
//! missing.

use log::{debug, trace, warn};

use crate::eu::{
    EuError,
    builder::WaitPlan,
    device::Device,
    dma::Direction,
    hart::Hart,
    mask::EventMask,
    regs::RegisterBlock,
    unit::EventUnit,
    wait::{Budget, WaitMode},
};

/// Which devices take part in a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceSet {
    pub accelerator: bool,
    /// L2 to L1 iDMA.
    pub dma_dir0: bool,
    /// L1 to L2 iDMA.
    pub dma_dir1: bool,
    pub barrier: bool,
}

impl DeviceSet {
    pub const NONE: Self = DeviceSet {
        accelerator: false,
        dma_dir0: false,
        dma_dir1: false,
        barrier: false,
    };

    pub const ALL: Self = DeviceSet {
        accelerator: true,
        dma_dir0: true,
        dma_dir1: true,
        barrier: true,
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    /// The selected devices in a fixed order.
    pub fn devices(&self) -> heapless::Vec<Device, 4> {
        let mut out = heapless::Vec::new();
        let candidates = [
            (self.accelerator, Device::Accelerator),
            (self.dma_dir0, Device::Dma(Direction::L2ToL1)),
            (self.dma_dir1, Device::Dma(Direction::L1ToL2)),
            (self.barrier, Device::Barrier),
        ];
        for (selected, device) in candidates {
            if selected {
                out.push(device).ok();
            }
        }
        out
    }

    /// Union of the done lines, the mask `wait_any` / `wait_all` work on.
    pub fn done_mask(&self) -> EventMask {
        self.devices()
            .iter()
            .fold(EventMask::EMPTY, |acc, dev| acc | dev.done_mask())
    }

    /// Union of every line the selected devices own.
    pub fn event_mask(&self) -> EventMask {
        self.devices()
            .iter()
            .fold(EventMask::EMPTY, |acc, dev| acc | dev.enable_mask())
    }
}

impl<R: RegisterBlock> EventUnit<R> {
    /// Starts a session: drops everything latched so far, enables the lines of
    /// the selected devices and, in suspend mode, their done interrupts.
    ///
    /// Must run before the devices are started, or their completions are lost.
    pub fn arm(&mut self, plan: &WaitPlan) {
        let devices = plan.devices();

        self.clear(EventMask::ALL);
        self.enable(devices.event_mask());
        if plan.mode() == WaitMode::Suspend {
            self.enable_irq(devices.done_mask());
        }

        debug!(
            "armed {:?} in {:?} mode, lines {:?}",
            devices,
            plan.mode(),
            devices.event_mask()
        );
    }

    /// Waits until at least one line of `mask` was observed.
    ///
    /// In suspend mode a wake-up caused by some other line just suspends
    /// again; only polling can time out.
    pub fn wait_any_of<H: Hart + ?Sized>(
        &mut self,
        hart: &mut H,
        mask: EventMask,
        mode: WaitMode,
        budget: Budget,
    ) -> Result<EventMask, EuError> {
        if mask.is_empty() {
            return Err(EuError::EmptyMask);
        }

        loop {
            let seen = self.wait(hart, mask, mode, budget);
            if !seen.is_empty() {
                return Ok(seen);
            }
            if mode == WaitMode::Polling {
                warn!("wait_any {:?}: timed out after {} iterations", mask, budget.get());
                return Err(EuError::Timeout);
            }
        }
    }

    /// Waits until any selected device is done.
    ///
    /// Returns every done line seen in the same observation, already cleared.
    pub fn wait_any<H: Hart + ?Sized>(
        &mut self,
        hart: &mut H,
        plan: &WaitPlan,
    ) -> Result<EventMask, EuError> {
        self.wait_any_of(hart, plan.devices().done_mask(), plan.mode(), plan.budget())
    }

    /// Waits until every selected device is done.
    ///
    /// Returns the full done mask, already cleared. On timeout the lines that
    /// did arrive are consumed but not reported.
    pub fn wait_all<H: Hart + ?Sized>(
        &mut self,
        hart: &mut H,
        plan: &WaitPlan,
    ) -> Result<EventMask, EuError> {
        self.wait_all_traced(hart, plan, |_| {})
    }

    /// [`wait_all`](Self::wait_all), reporting every mask handed to the wait
    /// strategy to `on_request`.
    pub(crate) fn wait_all_traced<H: Hart + ?Sized>(
        &mut self,
        hart: &mut H,
        plan: &WaitPlan,
        mut on_request: impl FnMut(EventMask),
    ) -> Result<EventMask, EuError> {
        let required = plan.devices().done_mask();
        if required.is_empty() {
            return Err(EuError::EmptyMask);
        }

        let mut accumulated = EventMask::EMPTY;

        match plan.mode() {
            WaitMode::Suspend => {
                while !accumulated.contains(required) {
                    let missing = required.difference(accumulated);
                    on_request(missing);

                    let seen = self.suspend(hart, missing);
                    if !seen.is_empty() {
                        trace!(
                            "wait_all: got {:?}, still missing {:?}",
                            seen,
                            missing.difference(seen)
                        );
                    }
                    accumulated |= seen;
                }

                // Each line was cleared when it was taken; this only covers
                // lines re-posted in the meantime.
                self.clear(accumulated);
            }
            WaitMode::Polling => {
                let budget = plan.budget();
                let slice = plan.slice();
                let mut elapsed = 0u32;

                loop {
                    let missing = required.difference(accumulated);
                    on_request(missing);

                    // The last round never spins past the outer budget.
                    let round = if budget.is_unbounded() {
                        slice
                    } else {
                        Budget::iterations(slice.get().min(budget.get() - elapsed))
                    };
                    let seen = self.poll(hart, missing, round);
                    if !seen.is_empty() {
                        trace!(
                            "wait_all: got {:?}, still missing {:?}",
                            seen,
                            missing.difference(seen)
                        );
                    }
                    accumulated |= seen;

                    if accumulated.contains(required) {
                        break;
                    }

                    elapsed = elapsed.saturating_add(slice.get());
                    if budget.is_exhausted(elapsed) {
                        warn!(
                            "wait_all {:?}: timed out with {:?} outstanding",
                            required,
                            required.difference(accumulated)
                        );
                        return Err(EuError::Timeout);
                    }
                }
            }
        }

        debug!("wait_all: {:?} complete", accumulated);
        Ok(accumulated)
    }
}
