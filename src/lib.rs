//! A `no_std`, no-alloc driver for a tile event unit shared by several
//! asynchronously completing hardware units.
//!
//! A compute accelerator, two iDMA engines (one per transfer direction) and a
//! barrier unit all post completion edges into one latched 32-bit event
//! buffer. This crate lets a single consumer reliably observe "exactly these
//! events happened" without losing edges that arrive between an observation
//! and a clear.
//!
//! # Features
//!
//! - **Observe-before-clear** - no bit is ever cleared unless the same call observed it
//! - **Two wait strategies** - bounded busy polling and suspend-until-woken
//! - **ANY / ALL aggregation** - wait for one of, or every one of, a device set
//! - **DMA completion tracking** - per-direction busy / done-id queries
//! - **Pluggable hardware** - registers and the hart are traits, so the same
//!   algorithms run on silicon and in a simulator
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  edges  ┌──────────────────────────┐
//! │ Accelerator      │────────▶│                          │
//! │ iDMA L2->L1      │────────▶│   Event unit buffer      │
//! │ iDMA L1->L2      │────────▶│   (latched, W1C clear)   │
//! │ Barrier          │────────▶│                          │
//! └──────────────────┘         └────────────┬─────────────┘
//!                                           │ observe / take
//!                              ┌────────────▼─────────────┐
//!                              │ poll()      suspend()    │
//!                              │ wait_any()  wait_all()   │
//!                              └──────────────────────────┘
//! ```
//!
//! - **Hardware** only ever sets pending bits
//! - **Software** only ever clears bits it has just observed
//! - **ALL waits** accumulate staggered completions across several wake-ups
//!
//! # Example
//!
//! ```rust,no_run
//! use event_unit::prelude::*;
//!
//! // Event unit registers live at a fixed tile address.
//! let regs = unsafe { Mmio::new(0x0000_2000) };
//! let mut unit = EventUnit::new(regs);
//! let mut hart = SpinHart;
//!
//! let plan = WaitPlan::builder()
//!     .accelerator()
//!     .dma_dir0()
//!     .polling()
//!     .build();
//!
//! unit.init();
//! unit.arm(&plan);
//! // ... launch the accelerator job and the L2->L1 transfer here ...
//! match unit.wait_all(&mut hart, &plan) {
//!     Ok(events) => assert!(events.contains(ACC_DONE | DMA0_DONE)),
//!     Err(EuError::Timeout) => { /* report failure */ }
//!     Err(_) => unreachable!(),
//! }
//! ```

#![deny(unsafe_code)]
#![no_std]

pub mod eu;

pub mod prelude {
    pub use crate::eu::prelude::*;
}
