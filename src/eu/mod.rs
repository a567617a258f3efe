pub mod aggregate;
pub mod builder;
pub mod device;
pub mod dma;
pub mod error;
pub mod hart;
pub mod map;
pub mod mask;
pub mod regs;
pub mod unit;
pub mod wait;

#[cfg(test)]
mod test_support;

pub use aggregate::DeviceSet;
pub use builder::{WaitPlan, WaitPlanBuilder};
pub use device::Device;
pub use dma::{Channel, Direction, DmaTracker, TransferId};
pub use error::EuError;
pub use hart::{Hart, SpinHart};
pub use map::*;
pub use mask::EventMask;
pub use regs::{Mmio, RegisterBlock};
pub use unit::EventUnit;
pub use wait::{Budget, POLL_QUANTUM_CYCLES, WaitMode};

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
pub use hart::Cv32e40x;

pub mod prelude {
    pub use super::map::*;
    pub use super::{
        Budget, Channel, Device, DeviceSet, Direction, DmaTracker, EuError, EventMask, EventUnit,
        Hart, Mmio, RegisterBlock, SpinHart, TransferId, WaitMode, WaitPlan, WaitPlanBuilder,
    };
}
