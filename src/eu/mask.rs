use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use bitmaps::Bitmap;

use crate::eu::map::EventBit;

/// A set of event lines of the 32-bit event unit buffer.
///
/// Used both to select which events to enable or wait for and to report
/// which events were observed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EventMask(u32);

impl EventMask {
    /// The empty set. Also the "nothing observed" / timeout result of a wait.
    pub const EMPTY: Self = EventMask(0);
    /// Every line of the buffer.
    pub const ALL: Self = EventMask(u32::MAX);

    #[inline]
    pub const fn empty() -> Self {
        Self::EMPTY
    }

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        EventMask(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if every line of `other` is also in `self`.
    #[inline]
    pub const fn contains(self, other: EventMask) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn intersects(self, other: EventMask) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn union(self, other: EventMask) -> Self {
        EventMask(self.0 | other.0)
    }

    #[inline]
    pub const fn intersection(self, other: EventMask) -> Self {
        EventMask(self.0 & other.0)
    }

    /// Lines of `self` that are not in `other`.
    #[inline]
    pub const fn difference(self, other: EventMask) -> Self {
        EventMask(self.0 & !other.0)
    }

    /// Number of lines in the set.
    #[inline]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Calls `f` with the position of every set line, lowest first.
    pub fn for_each_position(self, mut f: impl FnMut(u8)) {
        let map = Bitmap::<32>::from_value(self.0);
        let mut idx = map.first_index();
        while let Some(pos) = idx {
            f(pos as u8);
            idx = map.next_index(pos);
        }
    }

    /// The named lines present in the set, lowest first.
    ///
    /// Positions without a documented meaning are skipped.
    pub fn events(self) -> heapless::Vec<EventBit, 32> {
        let mut out = heapless::Vec::new();
        self.for_each_position(|pos| {
            if let Some(bit) = EventBit::from_position(pos) {
                out.push(bit).ok();
            }
        });
        out
    }
}

impl From<EventBit> for EventMask {
    fn from(bit: EventBit) -> Self {
        bit.mask()
    }
}

impl core::fmt::Debug for EventMask {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "EventMask({:#010x}", self.0)?;
        let mut sep = " ";
        for bit in self.events() {
            write!(f, "{}{}", sep, bit.name())?;
            sep = "|";
        }
        write!(f, ")")
    }
}

impl BitOr for EventMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for EventMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for EventMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.intersection(rhs)
    }
}

impl BitAndAssign for EventMask {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for EventMask {
    type Output = Self;

    fn not(self) -> Self {
        EventMask(!self.0)
    }
}
