use core::marker::PhantomData;

use crate::eu::{
    aggregate::DeviceSet,
    wait::{Budget, WaitMode},
};

// Builder states
pub struct NeedMode;
pub struct Ready;

/// Everything one multi-device wait needs to know: which devices take part,
/// how to block and, when polling, for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPlan {
    devices: DeviceSet,
    mode: WaitMode,
    budget: Budget,
    slice: Budget,
}

impl WaitPlan {
    pub fn builder() -> WaitPlanBuilder<NeedMode> {
        WaitPlanBuilder::new()
    }

    pub fn devices(&self) -> DeviceSet {
        self.devices
    }

    pub fn mode(&self) -> WaitMode {
        self.mode
    }

    /// Overall polling budget. Ignored in suspend mode.
    pub fn budget(&self) -> Budget {
        self.budget
    }

    /// Length of one ALL-mode polling round, charged in full against
    /// [`budget`](Self::budget).
    pub fn slice(&self) -> Budget {
        self.slice
    }
}

pub struct WaitPlanBuilder<State> {
    devices: DeviceSet,
    mode: WaitMode,
    budget: Budget,
    slice: Budget,
    _state: PhantomData<State>,
}

// Start the builder
impl WaitPlanBuilder<NeedMode> {
    pub fn new() -> Self {
        WaitPlanBuilder {
            devices: DeviceSet::NONE,
            mode: WaitMode::Polling,
            budget: Budget::DEFAULT,
            slice: Budget::DEFAULT_SLICE,
            _state: PhantomData,
        }
    }
}

impl Default for WaitPlanBuilder<NeedMode> {
    fn default() -> Self {
        Self::new()
    }
}

// Device selection and budgets, allowed in any state
impl<State> WaitPlanBuilder<State> {
    pub fn accelerator(mut self) -> Self {
        self.devices.accelerator = true;
        self
    }

    /// Selects the L2 to L1 iDMA direction.
    pub fn dma_dir0(mut self) -> Self {
        self.devices.dma_dir0 = true;
        self
    }

    /// Selects the L1 to L2 iDMA direction.
    pub fn dma_dir1(mut self) -> Self {
        self.devices.dma_dir1 = true;
        self
    }

    pub fn barrier(mut self) -> Self {
        self.devices.barrier = true;
        self
    }

    /// Replaces the whole device selection.
    pub fn devices(mut self, devices: DeviceSet) -> Self {
        self.devices = devices;
        self
    }

    pub fn budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    /// Sets the ALL-mode polling round length.
    ///
    /// An unbounded slice would never hand control back to the outer loop,
    /// so zero is stored as a single iteration.
    pub fn slice(mut self, slice: Budget) -> Self {
        self.slice = if slice.is_unbounded() {
            Budget::iterations(1)
        } else {
            slice
        };
        self
    }

    fn with_mode(self, mode: WaitMode) -> WaitPlanBuilder<Ready> {
        WaitPlanBuilder {
            devices: self.devices,
            mode,
            budget: self.budget,
            slice: self.slice,
            _state: PhantomData,
        }
    }
}

// Choose how to block
impl WaitPlanBuilder<NeedMode> {
    pub fn mode(self, mode: WaitMode) -> WaitPlanBuilder<Ready> {
        self.with_mode(mode)
    }

    pub fn polling(self) -> WaitPlanBuilder<Ready> {
        self.with_mode(WaitMode::Polling)
    }

    pub fn suspend(self) -> WaitPlanBuilder<Ready> {
        self.with_mode(WaitMode::Suspend)
    }
}

impl WaitPlanBuilder<Ready> {
    pub fn build(self) -> WaitPlan {
        WaitPlan {
            devices: self.devices,
            mode: self.mode,
            budget: self.budget,
            slice: self.slice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_firmware_watchdogs() {
        let plan = WaitPlan::builder().accelerator().polling().build();

        assert_eq!(plan.mode(), WaitMode::Polling);
        assert_eq!(plan.budget(), Budget::DEFAULT);
        assert_eq!(plan.slice(), Budget::DEFAULT_SLICE);
        assert_eq!(
            plan.devices(),
            DeviceSet {
                accelerator: true,
                ..DeviceSet::NONE
            }
        );
    }

    #[test]
    fn devices_can_be_added_after_the_mode() {
        let plan = WaitPlan::builder()
            .dma_dir0()
            .suspend()
            .dma_dir1()
            .barrier()
            .build();

        let devices = plan.devices();
        assert!(!devices.accelerator);
        assert!(devices.dma_dir0 && devices.dma_dir1 && devices.barrier);
        assert_eq!(plan.mode(), WaitMode::Suspend);
    }

    #[test]
    fn budgets_are_configurable() {
        let plan = WaitPlan::builder()
            .devices(DeviceSet::ALL)
            .budget(Budget::iterations(500))
            .slice(Budget::iterations(4))
            .mode(WaitMode::Polling)
            .build();

        assert_eq!(plan.devices(), DeviceSet::ALL);
        assert_eq!(plan.budget().get(), 500);
        assert_eq!(plan.slice().get(), 4);
    }

    #[test]
    fn unbounded_slice_is_clamped() {
        let plan = WaitPlan::builder()
            .slice(Budget::UNBOUNDED)
            .polling()
            .build();
        assert_eq!(plan.slice(), Budget::iterations(1));
    }
}
