use crate::eu::{EuError, mask::EventMask, regs::RegisterBlock};

/// Byte offsets of the event unit core registers.
pub mod offsets {
    /// R/W: lines the buffer reports through the masked views.
    pub const MASK: usize = 0x00;
    /// W: clears the written bits in `MASK`.
    pub const MASK_AND: usize = 0x04;
    /// W: sets the written bits in `MASK`.
    pub const MASK_OR: usize = 0x08;
    /// R/W: lines that raise the wake / interrupt condition.
    pub const IRQ_MASK: usize = 0x0C;
    pub const IRQ_MASK_AND: usize = 0x10;
    pub const IRQ_MASK_OR: usize = 0x14;
    /// R: bit 0 is the core clock enable.
    pub const STATUS: usize = 0x18;
    /// R: raw latched buffer.
    pub const BUFFER: usize = 0x1C;
    /// R: buffer & `MASK`.
    pub const BUFFER_MASKED: usize = 0x20;
    /// R: buffer & `IRQ_MASK`.
    pub const BUFFER_IRQ_MASKED: usize = 0x24;
    /// W: clears the written bits in the buffer.
    pub const BUFFER_CLEAR: usize = 0x28;
    pub const SW_EVENTS_MASK: usize = 0x2C;
    pub const SW_EVENTS_MASK_AND: usize = 0x30;
    pub const SW_EVENTS_MASK_OR: usize = 0x34;
    /// R: sleeps until an enabled event, returns the masked buffer.
    pub const EVENT_WAIT: usize = 0x38;
    /// R: as `EVENT_WAIT`, then clears the buffer.
    pub const EVENT_WAIT_CLEAR: usize = 0x3C;
    /// W: base of the 8 software event triggers, 4 bytes apart.
    pub const TRIGG_SW_EVENT: usize = 0x600;
    /// R: base of the 8 trigger-and-sleep registers, 4 bytes apart.
    pub const TRIGG_SW_EVENT_WAIT: usize = 0x640;
}

/// Number of software event lines.
pub const SW_EVENT_COUNT: u8 = 8;

/// Handle owning the event unit register window of one tile.
///
/// There is exactly one per tile. Create it once at start-up and thread it
/// through every wait; nothing in this crate keeps hidden global state.
///
/// Pending bits are set by hardware edges only and cleared by software only
/// through [`clear`](Self::clear) and [`take`](Self::take).
#[derive(Debug)]
pub struct EventUnit<R: RegisterBlock> {
    regs: R,
}

impl<R: RegisterBlock> EventUnit<R> {
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Gives back the register window.
    pub fn release(self) -> R {
        self.regs
    }

    /// Clears every pending event and disables all lines and IRQs.
    pub fn init(&mut self) {
        self.regs.write32(offsets::BUFFER_CLEAR, u32::MAX);
        self.regs.write32(offsets::MASK, 0);
        self.regs.write32(offsets::IRQ_MASK, 0);
    }

    /// Adds `mask` to the lines reported by [`observe`](Self::observe).
    pub fn enable(&mut self, mask: EventMask) {
        self.regs.write32(offsets::MASK_OR, mask.bits());
    }

    pub fn disable(&mut self, mask: EventMask) {
        self.regs.write32(offsets::MASK_AND, mask.bits());
    }

    /// Adds `mask` to the lines that wake a suspended hart.
    pub fn enable_irq(&mut self, mask: EventMask) {
        self.regs.write32(offsets::IRQ_MASK_OR, mask.bits());
    }

    pub fn disable_irq(&mut self, mask: EventMask) {
        self.regs.write32(offsets::IRQ_MASK_AND, mask.bits());
    }

    pub fn enabled(&self) -> EventMask {
        EventMask::from_bits(self.regs.read32(offsets::MASK))
    }

    pub fn irq_enabled(&self) -> EventMask {
        EventMask::from_bits(self.regs.read32(offsets::IRQ_MASK))
    }

    /// Raw buffer, including lines that are not enabled.
    pub fn pending(&self) -> EventMask {
        EventMask::from_bits(self.regs.read32(offsets::BUFFER))
    }

    /// Buffer restricted to the enabled lines.
    pub fn pending_masked(&self) -> EventMask {
        EventMask::from_bits(self.regs.read32(offsets::BUFFER_MASKED))
    }

    /// Buffer restricted to the IRQ-enabled lines.
    pub fn pending_irq_masked(&self) -> EventMask {
        EventMask::from_bits(self.regs.read32(offsets::BUFFER_IRQ_MASKED))
    }

    /// Enabled pending lines within `mask`. Never clears anything.
    #[inline]
    pub fn observe(&self, mask: EventMask) -> EventMask {
        self.pending_masked() & mask
    }

    /// Clears exactly the lines in `mask`.
    ///
    /// The buffer is write-one-to-clear, so lines outside `mask` that fire
    /// concurrently are never lost.
    #[inline]
    pub fn clear(&mut self, mask: EventMask) {
        self.regs.write32(offsets::BUFFER_CLEAR, mask.bits());
    }

    /// Observes `mask` and clears exactly what was observed.
    ///
    /// Both steps run inside one critical section so a handler on this hart
    /// cannot clear in between.
    pub fn take(&mut self, mask: EventMask) -> EventMask {
        critical_section::with(|_| {
            let seen = self.observe(mask);
            if !seen.is_empty() {
                self.clear(seen);
            }
            seen
        })
    }

    /// Returns true if the event unit core clock is running.
    pub fn clock_enabled(&self) -> bool {
        self.regs.read32(offsets::STATUS) & 0x1 != 0
    }

    /// Adds `mask` to the cores targeted by software events.
    pub fn enable_sw_targets(&mut self, mask: u32) {
        self.regs.write32(offsets::SW_EVENTS_MASK_OR, mask);
    }

    pub fn disable_sw_targets(&mut self, mask: u32) {
        self.regs.write32(offsets::SW_EVENTS_MASK_AND, mask);
    }

    pub fn sw_targets(&self) -> u32 {
        self.regs.read32(offsets::SW_EVENTS_MASK)
    }

    /// Fires software event `id` towards the configured targets.
    pub fn trigger_sw_event(&mut self, id: u8) -> Result<(), EuError> {
        if id >= SW_EVENT_COUNT {
            return Err(EuError::InvalidSwEvent);
        }
        self.regs.write32(offsets::TRIGG_SW_EVENT + usize::from(id) * 4, 1);
        Ok(())
    }

    /// Fires software event `id` and sleeps until the answer arrives.
    ///
    /// Returns the masked buffer seen on wake-up, uncleared.
    pub fn trigger_sw_event_wait(&mut self, id: u8) -> Result<EventMask, EuError> {
        if id >= SW_EVENT_COUNT {
            return Err(EuError::InvalidSwEvent);
        }
        let bits = self.regs.read32(offsets::TRIGG_SW_EVENT_WAIT + usize::from(id) * 4);
        Ok(EventMask::from_bits(bits))
    }

    /// Stalls on the event unit's own wait register until an enabled line
    /// is pending, and returns the masked buffer without clearing it.
    pub fn sleep(&mut self) -> EventMask {
        EventMask::from_bits(self.regs.read32(offsets::EVENT_WAIT))
    }

    /// Like [`sleep`](Self::sleep), but the hardware clears the buffer on
    /// wake-up.
    ///
    /// This clears lines the caller has not looked at yet, so none of the
    /// waits in this crate use it.
    pub fn sleep_clear(&mut self) -> EventMask {
        EventMask::from_bits(self.regs.read32(offsets::EVENT_WAIT_CLEAR))
    }
}
