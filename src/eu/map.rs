//! Event line assignments of the tile event unit.
//!
//! Every hardware unit that can post into the shared buffer owns a fixed set of
//! lines. These are process-wide constants; nothing here is created or
//! destroyed at runtime.
//!
//! | Lines   | Source                                             |
//! |---------|----------------------------------------------------|
//! | 1:0     | synchronisation / dispatch                         |
//! | 3:2     | iDMA done, L2->L1 (dir0) and L1->L2 (dir1)         |
//! | 5:4     | timers                                             |
//! | 11:8    | accelerator (reserved, busy, done, aux)            |
//! | 25:24   | barrier done / error                               |
//! | 31:26   | iDMA error, start and busy, per direction          |

use crate::eu::mask::EventMask;

/// Generates [`EventBit`] and one [`EventMask`] constant per line.
///
/// The constant name is the upper snake case form of the variant name, so
/// `AccDone` becomes `ACC_DONE`.
macro_rules! event_map {
    ($( $(#[$doc:meta])* $name:ident = $pos:literal, $label:literal; )*) => {
        /// One named line of the event buffer.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum EventBit {
            $( $(#[$doc])* $name = $pos, )*
        }

        impl EventBit {
            /// Every documented line, lowest position first.
            pub const ALL: &'static [EventBit] = &[$(EventBit::$name),*];

            /// Bit position in the 32-bit buffer.
            #[inline]
            pub const fn position(self) -> u8 {
                self as u8
            }

            #[inline]
            pub const fn mask(self) -> EventMask {
                EventMask::from_bits(1 << (self as u8))
            }

            /// Human readable name, e.g. `"accelerator-done"`.
            pub const fn name(self) -> &'static str {
                match self {
                    $( EventBit::$name => $label, )*
                }
            }

            /// Looks up the line at `pos`, if it has a documented meaning.
            pub const fn from_position(pos: u8) -> Option<Self> {
                match pos {
                    $( $pos => Some(EventBit::$name), )*
                    _ => None,
                }
            }
        }

        paste::paste! {
            $(
                #[doc = "Mask of the `" $label "` line."]
                pub const [<$name:snake:upper>]: EventMask = EventBit::$name.mask();
            )*
        }
    };
}

event_map! {
    /// Synchronisation / barrier broadcast.
    Sync = 0, "sync";
    /// Dispatch event.
    Dispatch = 1, "dispatch";
    /// iDMA AXI->OBI (L2 to L1) transfer retired.
    Dma0Done = 2, "dma-dir0-done";
    /// iDMA OBI->AXI (L1 to L2) transfer retired.
    Dma1Done = 3, "dma-dir1-done";
    Timer0 = 4, "timer0";
    Timer1 = 5, "timer1";
    /// Accelerator line 0, tied to zero in hardware.
    AccReserved = 8, "accelerator-reserved";
    AccBusy = 9, "accelerator-busy";
    AccDone = 10, "accelerator-done";
    AccAux = 11, "accelerator-aux";
    BarrierDone = 24, "barrier-done";
    BarrierError = 25, "barrier-error";
    Dma0Error = 26, "dma-dir0-error";
    Dma1Error = 27, "dma-dir1-error";
    Dma0Start = 28, "dma-dir0-start";
    Dma1Start = 29, "dma-dir1-start";
    Dma0Busy = 30, "dma-dir0-busy";
    Dma1Busy = 31, "dma-dir1-busy";
}

/// All accelerator lines (11:8).
pub const ACC_ALL: EventMask = EventMask::from_bits(0x0000_0F00);
/// Done lines of both iDMA directions.
pub const DMA_DONE_ALL: EventMask = DMA0_DONE.union(DMA1_DONE);
/// Extended iDMA status lines (31:26).
pub const DMA_STATUS_ALL: EventMask = EventMask::from_bits(0xFC00_0000);
/// Error lines of both iDMA directions.
pub const DMA_ERROR_ALL: EventMask = DMA0_ERROR.union(DMA1_ERROR);
/// Barrier done and error.
pub const BARRIER_ALL: EventMask = BARRIER_DONE.union(BARRIER_ERROR);
pub const TIMER_ALL: EventMask = TIMER0.union(TIMER1);
