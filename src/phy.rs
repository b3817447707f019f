//! The physical layer owns the four TAP lines (clock, mode select, data out
//! to the target, data in from the target) plus the independent device reset
//! line.  Hardware backends implement the `Phy` trait; everything the engine
//! does is expressed through `pulse`.
pub mod gpio;

/// Time the device reset line is held low before release.
pub const RESET_SETTLE_MS: u32 = 100;

pub trait Phy {
    type Error;

    /// Run one complete clock pulse: sample the data-in line, then drive the
    /// data and mode lines through a low/high/low clock sequence.  Returns
    /// the bit sampled before the clock moved; in the Shift states the
    /// target's data-out is already valid at that point.
    fn pulse(&mut self, tdi: bool, tms: bool) -> Result<bool, Self::Error>;

    /// Write-only pulse used by the configuration fast path: drives the data
    /// line and the clock, skipping the TDO sample and leaving the mode line
    /// untouched.  Backends that can shave off the sample should override
    /// this.
    fn pulse_write(&mut self, tdi: bool) -> Result<(), Self::Error> {
        self.pulse(tdi, false).map(|_| ())
    }

    /// Pulse the device reset line low, wait for the target to settle, then
    /// release it.  Independent of the TAP protocol itself.
    fn pulse_reset(&mut self) -> Result<(), Self::Error>;

    /// Blocking delay used by `LongDelay` legs.
    fn delay_ms(&mut self, ms: u32);
}
