//! Simulated tile - only compiled in test builds.
//!
//! Time only moves when the simulated hart spins or sleeps. Hardware edges are
//! scheduled ahead of time and fire once the clock reaches them.

use core::cell::{Cell, RefCell};

use crate::eu::{
    dma::{CHANNEL_COUNT, Channel, Direction, DmaTracker},
    hart::Hart,
    mask::EventMask,
    regs::RegisterBlock,
    unit::{EventUnit, offsets::*},
    wait::POLL_QUANTUM_CYCLES,
};

/// Cycles spent by `n` poll iterations.
pub fn iters(n: u32) -> u64 {
    u64::from(n) * u64::from(POLL_QUANTUM_CYCLES)
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Edge(EventMask),
    Retire(Channel),
}

impl Action {
    /// Event lines the action raises.
    fn lines(self) -> EventMask {
        match self {
            Action::Edge(mask) => mask,
            Action::Retire(channel) => channel.direction().done_event(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct SimChannel {
    issued: u32,
    done: u32,
}

fn dir_index(direction: Direction) -> usize {
    match direction {
        Direction::L2ToL1 => 0,
        Direction::L1ToL2 => 1,
    }
}

pub struct SimTile {
    now: Cell<u64>,
    buffer: Cell<u32>,
    mask: Cell<u32>,
    irq_mask: Cell<u32>,
    sw_mask: Cell<u32>,
    clock_on: Cell<bool>,
    sw_triggers: Cell<u32>,
    suspends: Cell<u32>,
    schedule: RefCell<heapless::Vec<(u64, Action), 32>>,
    channels: RefCell<[[SimChannel; CHANNEL_COUNT as usize]; 2]>,
    clears: RefCell<heapless::Vec<u32, 128>>,
}

impl SimTile {
    pub fn new() -> Self {
        Self {
            now: Cell::new(0),
            buffer: Cell::new(0),
            mask: Cell::new(0),
            irq_mask: Cell::new(0),
            sw_mask: Cell::new(0),
            clock_on: Cell::new(true),
            sw_triggers: Cell::new(0),
            suspends: Cell::new(0),
            schedule: RefCell::new(heapless::Vec::new()),
            channels: RefCell::new([[SimChannel::default(); CHANNEL_COUNT as usize]; 2]),
            clears: RefCell::new(heapless::Vec::new()),
        }
    }

    pub fn event_unit(&self) -> EventUnit<EuWindow<'_>> {
        EventUnit::new(EuWindow(self))
    }

    pub fn dma(&self) -> DmaTracker<DmaWindow<'_>> {
        DmaTracker::new(DmaWindow(self))
    }

    pub fn hart(&self) -> SimHart<'_> {
        SimHart(self)
    }

    /// Latches `mask` right now.
    pub fn raise(&self, mask: EventMask) {
        self.buffer.set(self.buffer.get() | mask.bits());
    }

    /// Latches `mask` once `cycles` more cycles have passed.
    pub fn raise_after(&self, mask: EventMask, cycles: u64) {
        self.schedule(cycles, Action::Edge(mask));
    }

    /// Retires the oldest in-flight transfer of `channel` after `cycles`,
    /// posting the direction's done line.
    pub fn retire_after(&self, channel: Channel, cycles: u64) {
        self.schedule(cycles, Action::Retire(channel));
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }

    pub fn suspends(&self) -> u32 {
        self.suspends.get()
    }

    /// Every value written to the buffer-clear register, in order.
    pub fn clears(&self) -> heapless::Vec<u32, 128> {
        self.clears.borrow().clone()
    }

    pub fn set_clock(&self, on: bool) {
        self.clock_on.set(on);
    }

    /// Bit `n` is set once software event `n` was triggered.
    pub fn sw_triggers(&self) -> u32 {
        self.sw_triggers.get()
    }

    fn schedule(&self, cycles: u64, action: Action) {
        let at = self.now.get() + cycles;
        self.schedule
            .borrow_mut()
            .push((at, action))
            .expect("schedule full");
    }

    fn apply(&self, action: Action) {
        if let Action::Retire(channel) = action {
            let mut channels = self.channels.borrow_mut();
            let ch = &mut channels[dir_index(channel.direction())][usize::from(channel.index())];
            assert!(ch.done < ch.issued, "retiring {:?} with nothing in flight", channel);
            ch.done += 1;
        }
        self.raise(action.lines());
    }

    fn fire_due(&self) {
        loop {
            let now = self.now.get();
            let next = self
                .schedule
                .borrow()
                .iter()
                .enumerate()
                .filter(|(_, (at, _))| *at <= now)
                .min_by_key(|(_, (at, _))| *at)
                .map(|(i, _)| i);
            let Some(i) = next else { break };
            let (_, action) = self.schedule.borrow_mut().swap_remove(i);
            self.apply(action);
        }
    }

    fn advance(&self, cycles: u64) {
        self.now.set(self.now.get() + cycles);
        self.fire_due();
    }

    /// Jumps to the next scheduled edge touching `lines` and fires everything
    /// up to it.
    fn sleep_until_edge(&self, lines: u32) {
        let next = self
            .schedule
            .borrow()
            .iter()
            .filter(|(_, action)| action.lines().bits() & lines != 0)
            .map(|(at, _)| *at)
            .min();
        let Some(at) = next else {
            panic!("hart asleep at cycle {} with no wake source for {:#x}", self.now(), lines);
        };
        self.now.set(self.now.get().max(at));
        self.fire_due();
    }

    fn event_wait(&self) -> u32 {
        let mask = self.mask.get();
        if self.buffer.get() & mask == 0 {
            self.sleep_until_edge(mask);
        }
        self.buffer.get() & mask
    }

    fn channel(&self, offset: usize) -> (Direction, usize, usize) {
        let (direction, rel) = if offset >= 0x100 {
            (Direction::L2ToL1, offset - 0x100)
        } else {
            (Direction::L1ToL2, offset)
        };
        // Status, next id and done id banks, one word per channel each.
        let Some(reg) = [0x04, 0x44, 0x84]
            .into_iter()
            .find(|base| (*base..*base + 0x40).contains(&rel))
        else {
            panic!("unmapped iDMA offset {:#x}", offset);
        };
        (direction, reg, (rel - reg) / 4)
    }
}

pub struct EuWindow<'a>(&'a SimTile);

impl RegisterBlock for EuWindow<'_> {
    fn read32(&self, offset: usize) -> u32 {
        let tile = self.0;
        match offset {
            MASK => tile.mask.get(),
            IRQ_MASK => tile.irq_mask.get(),
            STATUS => u32::from(tile.clock_on.get()),
            BUFFER => tile.buffer.get(),
            BUFFER_MASKED => tile.buffer.get() & tile.mask.get(),
            BUFFER_IRQ_MASKED => tile.buffer.get() & tile.irq_mask.get(),
            SW_EVENTS_MASK => tile.sw_mask.get(),
            EVENT_WAIT => tile.event_wait(),
            EVENT_WAIT_CLEAR => {
                let seen = tile.event_wait();
                tile.buffer.set(0);
                seen
            }
            o if (TRIGG_SW_EVENT_WAIT..TRIGG_SW_EVENT_WAIT + 0x20).contains(&o) => {
                let id = (o - TRIGG_SW_EVENT_WAIT) / 4;
                tile.sw_triggers.set(tile.sw_triggers.get() | 1 << id);
                tile.buffer.get() & tile.mask.get()
            }
            o => panic!("read from unmapped event unit offset {:#x}", o),
        }
    }

    fn write32(&self, offset: usize, value: u32) {
        let tile = self.0;
        let update = |cell: &Cell<u32>, f: fn(u32, u32) -> u32| cell.set(f(cell.get(), value));
        match offset {
            MASK => tile.mask.set(value),
            MASK_AND => update(&tile.mask, |cur, v| cur & !v),
            MASK_OR => update(&tile.mask, |cur, v| cur | v),
            IRQ_MASK => tile.irq_mask.set(value),
            IRQ_MASK_AND => update(&tile.irq_mask, |cur, v| cur & !v),
            IRQ_MASK_OR => update(&tile.irq_mask, |cur, v| cur | v),
            SW_EVENTS_MASK => tile.sw_mask.set(value),
            SW_EVENTS_MASK_AND => update(&tile.sw_mask, |cur, v| cur & !v),
            SW_EVENTS_MASK_OR => update(&tile.sw_mask, |cur, v| cur | v),
            BUFFER_CLEAR => {
                update(&tile.buffer, |cur, v| cur & !v);
                tile.clears.borrow_mut().push(value).expect("clear log full");
            }
            o if (TRIGG_SW_EVENT..TRIGG_SW_EVENT + 0x20).contains(&o) => {
                let id = (o - TRIGG_SW_EVENT) / 4;
                tile.sw_triggers.set(tile.sw_triggers.get() | 1 << id);
            }
            o => panic!("write to unmapped event unit offset {:#x}", o),
        }
    }
}

pub struct DmaWindow<'a>(&'a SimTile);

impl RegisterBlock for DmaWindow<'_> {
    fn read32(&self, offset: usize) -> u32 {
        let (direction, reg, index) = self.0.channel(offset);
        let mut channels = self.0.channels.borrow_mut();
        let ch = &mut channels[dir_index(direction)][index];
        match reg {
            0x04 => u32::from(ch.done < ch.issued),
            0x44 => {
                ch.issued += 1;
                ch.issued
            }
            0x84 => ch.done,
            _ => panic!("read from unmapped iDMA offset {:#x}", offset),
        }
    }

    fn write32(&self, offset: usize, _value: u32) {
        panic!("write to read-only iDMA offset {:#x}", offset);
    }
}

pub struct SimHart<'a>(&'a SimTile);

impl Hart for SimHart<'_> {
    fn spin(&mut self, cycles: u32) {
        self.0.advance(u64::from(cycles));
    }

    fn suspend(&mut self) {
        let tile = self.0;
        tile.suspends.set(tile.suspends.get() + 1);
        tile.sleep_until_edge(tile.irq_mask.get());
    }
}
