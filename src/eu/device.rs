//! Single-device shortcuts on top of the event unit.

use crate::eu::{
    EuError,
    aggregate::DeviceSet,
    dma::Direction,
    hart::Hart,
    map::{ACC_ALL, ACC_BUSY, ACC_DONE, BARRIER_ALL, BARRIER_DONE, BARRIER_ERROR, DMA_ERROR_ALL},
    mask::EventMask,
    regs::RegisterBlock,
    unit::EventUnit,
    wait::{Budget, WaitMode},
};

/// A hardware unit that posts into the event buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    Accelerator,
    Dma(Direction),
    Barrier,
}

impl Device {
    /// The line that signals a finished job.
    pub const fn done_mask(self) -> EventMask {
        match self {
            Device::Accelerator => ACC_DONE,
            Device::Dma(dir) => dir.done_event(),
            Device::Barrier => BARRIER_DONE,
        }
    }

    /// Every line the device owns that is worth enabling.
    pub const fn enable_mask(self) -> EventMask {
        match self {
            Device::Accelerator => ACC_ALL,
            Device::Dma(dir) => dir
                .done_event()
                .union(dir.error_event())
                .union(dir.busy_event()),
            Device::Barrier => BARRIER_ALL,
        }
    }

    pub const fn error_mask(self) -> EventMask {
        match self {
            Device::Accelerator => EventMask::EMPTY,
            Device::Dma(dir) => dir.error_event(),
            Device::Barrier => BARRIER_ERROR,
        }
    }

    pub const fn busy_mask(self) -> EventMask {
        match self {
            Device::Accelerator => ACC_BUSY,
            Device::Dma(dir) => dir.busy_event(),
            Device::Barrier => EventMask::EMPTY,
        }
    }
}

impl From<Device> for DeviceSet {
    fn from(device: Device) -> Self {
        let mut set = DeviceSet::NONE;
        match device {
            Device::Accelerator => set.accelerator = true,
            Device::Dma(Direction::L2ToL1) => set.dma_dir0 = true,
            Device::Dma(Direction::L1ToL2) => set.dma_dir1 = true,
            Device::Barrier => set.barrier = true,
        }
        set
    }
}

impl<R: RegisterBlock> EventUnit<R> {
    /// Prepares the unit for one device: clears every pending line, enables
    /// the device's lines and, if `irq` is set, its done interrupt.
    pub fn init_device(&mut self, device: Device, irq: bool) {
        self.clear(EventMask::ALL);
        self.enable(device.enable_mask());
        if irq {
            self.enable_irq(device.done_mask());
        }
    }

    /// Waits for `device` to finish, polling with [`Budget::DEFAULT`].
    pub fn wait_device<H: Hart + ?Sized>(
        &mut self,
        hart: &mut H,
        device: Device,
        mode: WaitMode,
    ) -> Result<EventMask, EuError> {
        self.wait_any_of(hart, device.done_mask(), mode, Budget::DEFAULT)
    }

    pub fn is_done(&self, device: Device) -> bool {
        !self.observe(device.done_mask()).is_empty()
    }

    /// Reads the device's busy line. Always false for the barrier, which has
    /// none.
    pub fn is_busy(&self, device: Device) -> bool {
        !self.observe(device.busy_mask()).is_empty()
    }

    pub fn has_error(&self, device: Device) -> bool {
        !self.observe(device.error_mask()).is_empty()
    }

    /// Either iDMA direction has latched an error, enabled or not.
    pub fn dma_any_error(&self) -> bool {
        self.pending().intersects(DMA_ERROR_ALL)
    }
}
