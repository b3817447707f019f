//! Bit-banged `Phy` over raw GPIO lines.  Clock, mode and data-out are push
//! pull outputs, data-in is an input, and the device reset line is a fifth
//! output held high except during `pulse_reset`.
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::phy::{Phy, RESET_SETTLE_MS};

pub struct GpioPhy<Clk, Tdi, Tdo, Tms, Rst, Delay> {
    half_period: u32,
    delay: Delay,
    clock: Clk,
    tdi: Tdi,
    tdo: Tdo,
    tms: Tms,
    reset: Rst,
}

impl<E, Clk, Tdi, Tdo, Tms, Rst, Delay> GpioPhy<Clk, Tdi, Tdo, Tms, Rst, Delay>
where
    Clk: OutputPin<Error = E>,
    Tdi: OutputPin<Error = E>,
    Tdo: InputPin<Error = E>,
    Tms: OutputPin<Error = E>,
    Rst: OutputPin<Error = E>,
    Delay: DelayNs,
{
    /// Take ownership of the five lines and park them in their quiescent
    /// levels: clock, data and mode low, reset released.
    pub fn new(
        freq_khz: u32,
        mut clock: Clk,
        mut tdi: Tdi,
        tdo: Tdo,
        mut tms: Tms,
        mut reset: Rst,
        delay: Delay,
    ) -> Result<Self, E> {
        let period_ns = 1_000_000 / freq_khz;
        let half_period = period_ns / 2;

        clock.set_low()?;
        tdi.set_low()?;
        tms.set_low()?;
        reset.set_high()?;

        Ok(GpioPhy { half_period, delay, clock, tdi, tdo, tms, reset })
    }
}

impl<E, Clk, Tdi, Tdo, Tms, Rst, Delay> Phy for GpioPhy<Clk, Tdi, Tdo, Tms, Rst, Delay>
where
    Clk: OutputPin<Error = E>,
    Tdi: OutputPin<Error = E>,
    Tdo: InputPin<Error = E>,
    Tms: OutputPin<Error = E>,
    Rst: OutputPin<Error = E>,
    Delay: DelayNs,
{
    type Error = E;

    fn pulse(&mut self, tdi: bool, tms: bool) -> Result<bool, E> {
        // Sample before the clock moves; in Shift the target drives TDO as
        // soon as the previous falling edge lands.
        let sample = self.tdo.is_high()?;

        self.clock.set_low()?;
        self.tdi.set_state(PinState::from(tdi))?;
        self.tms.set_state(PinState::from(tms))?;
        self.delay.delay_ns(self.half_period);

        self.clock.set_high()?;
        self.delay.delay_ns(self.half_period);

        self.clock.set_low()?;
        self.delay.delay_ns(self.half_period);

        Ok(sample)
    }

    fn pulse_write(&mut self, tdi: bool) -> Result<(), E> {
        self.tdi.set_state(PinState::from(tdi))?;
        self.clock.set_high()?;
        self.delay.delay_ns(self.half_period);
        self.clock.set_low()?;
        self.delay.delay_ns(self.half_period);
        Ok(())
    }

    fn pulse_reset(&mut self) -> Result<(), E> {
        self.reset.set_low()?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        self.reset.set_high()
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    #[derive(Clone)]
    struct Line(Rc<Cell<bool>>);

    impl Line {
        fn new(level: bool) -> Self {
            Line(Rc::new(Cell::new(level)))
        }
    }

    impl ErrorType for Line {
        type Error = Infallible;
    }

    impl OutputPin for Line {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.set(true);
            Ok(())
        }
    }

    impl InputPin for Line {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0.get())
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0.get())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn looped_phy() -> GpioPhy<Line, Line, Line, Line, Line, NoDelay> {
        // TDI wired straight back to TDO.
        let wire = Line::new(false);
        GpioPhy::new(
            1000,
            Line::new(false),
            wire.clone(),
            wire,
            Line::new(false),
            Line::new(false),
            NoDelay,
        )
        .unwrap()
    }

    #[test]
    fn pulse_samples_before_driving() {
        let mut phy = looped_phy();
        // The first pulse sees the idle level, not the bit it drives.
        assert!(!phy.pulse(true, false).unwrap());
        assert!(phy.pulse(false, false).unwrap());
        assert!(!phy.pulse(false, false).unwrap());
    }

    #[test]
    fn reset_line_ends_released() {
        let rst = Line::new(false);
        let mut phy = GpioPhy::new(
            1000,
            Line::new(false),
            Line::new(false),
            Line::new(false),
            Line::new(false),
            rst.clone(),
            NoDelay,
        )
        .unwrap();
        assert!(rst.0.get());
        phy.pulse_reset().unwrap();
        assert!(rst.0.get());
    }
}
