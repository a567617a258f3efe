//! Completion tracking for the two iDMA front-ends.
//!
//! Each direction exposes 16 channels. A channel hands out a fresh transfer id
//! every time its next-id register is read (which also issues the programmed
//! transfer) and reports the id of the transfer that retired last.
//!
//! Only the most recent id is visible. Waiting for an older transfer after a
//! newer one on the same channel has already retired never succeeds; callers
//! must await transfers in issue order.

use log::{trace, warn};

use crate::eu::{
    EuError,
    hart::Hart,
    map::{
        DMA0_BUSY, DMA0_DONE, DMA0_ERROR, DMA0_START, DMA1_BUSY, DMA1_DONE, DMA1_ERROR, DMA1_START,
    },
    mask::EventMask,
    regs::RegisterBlock,
    wait::{Budget, POLL_QUANTUM_CYCLES},
};

/// Channels per direction.
pub const CHANNEL_COUNT: u8 = 16;

const STATUS: usize = 0x04;
const NEXT_ID: usize = 0x44;
const DONE_ID: usize = 0x84;
const STATUS_BUSY: u32 = 0x3FF;

/// Transfer direction, one iDMA front-end each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// AXI to OBI, event lines of direction 0.
    L2ToL1,
    /// OBI to AXI, event lines of direction 1.
    L1ToL2,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::L2ToL1, Direction::L1ToL2];

    /// Offset of this front-end's registers inside the iDMA window.
    #[inline]
    pub const fn window_offset(self) -> usize {
        match self {
            Direction::L2ToL1 => 0x100,
            Direction::L1ToL2 => 0x000,
        }
    }

    #[inline]
    pub const fn done_event(self) -> EventMask {
        match self {
            Direction::L2ToL1 => DMA0_DONE,
            Direction::L1ToL2 => DMA1_DONE,
        }
    }

    #[inline]
    pub const fn error_event(self) -> EventMask {
        match self {
            Direction::L2ToL1 => DMA0_ERROR,
            Direction::L1ToL2 => DMA1_ERROR,
        }
    }

    #[inline]
    pub const fn start_event(self) -> EventMask {
        match self {
            Direction::L2ToL1 => DMA0_START,
            Direction::L1ToL2 => DMA1_START,
        }
    }

    #[inline]
    pub const fn busy_event(self) -> EventMask {
        match self {
            Direction::L2ToL1 => DMA0_BUSY,
            Direction::L1ToL2 => DMA1_BUSY,
        }
    }
}

/// One channel of one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Channel {
    direction: Direction,
    index: u8,
}

impl Channel {
    pub fn new(direction: Direction, index: u8) -> Result<Self, EuError> {
        if index >= CHANNEL_COUNT {
            return Err(EuError::InvalidChannel);
        }
        Ok(Self { direction, index })
    }

    /// Channel 0, the one the single-channel helpers use.
    pub const fn first(direction: Direction) -> Self {
        Self {
            direction,
            index: 0,
        }
    }

    pub const fn direction(&self) -> Direction {
        self.direction
    }

    pub const fn index(&self) -> u8 {
        self.index
    }

    #[inline]
    fn register(&self, base: usize) -> usize {
        self.direction.window_offset() + base + usize::from(self.index) * 4
    }
}

/// Identifier the hardware assigned to a launched transfer.
///
/// Ids are handed out in increasing order per channel; 0 is never issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransferId(u32);

impl TransferId {
    pub const fn new(raw: u32) -> Self {
        TransferId(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Handle on the iDMA register window (both directions).
#[derive(Debug)]
pub struct DmaTracker<R: RegisterBlock> {
    regs: R,
}

impl<R: RegisterBlock> DmaTracker<R> {
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    pub fn release(self) -> R {
        self.regs
    }

    pub fn is_busy(&self, channel: Channel) -> bool {
        self.regs.read32(channel.register(STATUS)) & STATUS_BUSY != 0
    }

    /// Id of the transfer that retired most recently on `channel`.
    pub fn last_done_id(&self, channel: Channel) -> TransferId {
        TransferId(self.regs.read32(channel.register(DONE_ID)))
    }

    /// Issues the transfer programmed on `channel` and returns its id.
    pub fn launch(&mut self, channel: Channel) -> TransferId {
        let id = TransferId(self.regs.read32(channel.register(NEXT_ID)));
        trace!("dma {:?}: launched {}", channel, id.0);
        id
    }

    /// Polls until `channel` is idle with `id` as its last retired transfer.
    ///
    /// The match is exact: if a later transfer on the same channel retired
    /// first, this runs until `budget` is exhausted.
    pub fn wait_for<H: Hart + ?Sized>(
        &mut self,
        hart: &mut H,
        channel: Channel,
        id: TransferId,
        budget: Budget,
    ) -> Result<(), EuError> {
        if !id.is_valid() {
            return Err(EuError::InvalidTransfer);
        }

        let mut elapsed = 0u32;
        loop {
            if !self.is_busy(channel) && self.last_done_id(channel) == id {
                trace!("dma {:?}: {} retired after {} iterations", channel, id.0, elapsed);
                return Ok(());
            }

            hart.spin(POLL_QUANTUM_CYCLES);
            elapsed = elapsed.saturating_add(1);

            if budget.is_exhausted(elapsed) {
                warn!(
                    "dma {:?}: timed out waiting for {} (last done {})",
                    channel,
                    id.0,
                    self.last_done_id(channel).0
                );
                return Err(EuError::Timeout);
            }
        }
    }

    /// True if channel 0 of either direction last retired `id`.
    pub fn is_retired(&self, id: TransferId) -> bool {
        Direction::BOTH
            .iter()
            .any(|&dir| self.last_done_id(Channel::first(dir)) == id)
    }

    /// True if channel 0 of either direction is busy.
    pub fn any_busy(&self) -> bool {
        Direction::BOTH
            .iter()
            .any(|&dir| self.is_busy(Channel::first(dir)))
    }

    /// Spins until [`is_retired`](Self::is_retired) holds for `id`.
    pub fn wait_retired<H: Hart + ?Sized>(
        &mut self,
        hart: &mut H,
        id: TransferId,
        budget: Budget,
    ) -> Result<(), EuError> {
        if !id.is_valid() {
            return Err(EuError::InvalidTransfer);
        }
        self.spin_until(hart, budget, |dma| dma.is_retired(id))
            .inspect_err(|_| warn!("dma: timed out waiting for {} to retire", id.0))
    }

    /// Spins until no direction is busy.
    pub fn barrier<H: Hart + ?Sized>(
        &mut self,
        hart: &mut H,
        budget: Budget,
    ) -> Result<(), EuError> {
        self.spin_until(hart, budget, |dma| !dma.any_busy())
            .inspect_err(|_| warn!("dma: barrier timed out"))
    }

    fn spin_until<H: Hart + ?Sized>(
        &self,
        hart: &mut H,
        budget: Budget,
        done: impl Fn(&Self) -> bool,
    ) -> Result<(), EuError> {
        let mut elapsed = 0u32;
        while !done(self) {
            hart.spin(1);
            elapsed = elapsed.saturating_add(1);
            if budget.is_exhausted(elapsed) {
                return Err(EuError::Timeout);
            }
        }
        Ok(())
    }
}
