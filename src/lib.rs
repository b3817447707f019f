//! This crate drives an IEEE 1149.1 Test Access Port by bit-banging the four
//! TAP lines (TCK, TMS, TDI, TDO) plus an independent device reset line.  At
//! the lowest level, the `Phy` trait performs one atomic clock pulse; a GPIO
//! implementation over `embedded-hal` pins is provided, and other backends
//! can be added.
//!
//! On top of the PHY sits the `Engine`: a faithful TAP controller state
//! machine that consumes a caller-built queue of `Leg` operations (register
//! shifts, resets, delays, idle holds), assembles captured bits into result
//! values, and takes the Update-to-Select shortcut when register shifts are
//! scheduled back-to-back.  Configuration streams get an MSB-first write-only
//! fast path; everything else shifts LSB-first.
//!
//! The engine is single-threaded and blocking by design: protocol correctness
//! depends on pulses happening in strict sequence, so exactly one session may
//! own a set of lines at a time.
//!
//! # Example
//! ```
//! use jtag_bitbang::engine::Engine;
//! use jtag_bitbang::leg::{Leg, LegQueue};
//! use jtag_bitbang::phy::Phy;
//!
//! // A PHY with TDI looped straight back to TDO.
//! struct Loopback;
//!
//! impl Phy for Loopback {
//!     type Error = core::convert::Infallible;
//!     fn pulse(&mut self, tdi: bool, _tms: bool) -> Result<bool, Self::Error> {
//!         Ok(tdi)
//!     }
//!     fn pulse_reset(&mut self) -> Result<(), Self::Error> {
//!         Ok(())
//!     }
//!     fn delay_ms(&mut self, _ms: u32) {}
//! }
//!
//! let mut queue = LegQueue::new();
//! queue.push(Leg::reset());
//! queue.push(Leg::ir(0b001001, 6, "idcode").unwrap());
//! queue.push(Leg::dr(0xffff_ffff, 32, "").unwrap());
//!
//! let mut engine = Engine::new(Loopback, queue);
//! engine.run_to_completion().unwrap();
//! assert_eq!(engine.results().last(), Some(&0xffff_ffff));
//! ```

#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

extern crate alloc;

pub mod bits;
pub mod engine;
pub mod error;
pub mod leg;
pub mod mnemonic;
pub mod phy;
