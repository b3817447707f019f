//! The TAP state machine.  An `Engine` owns one PHY and one leg queue, and
//! walks the canonical controller states one clock pulse at a time, shifting
//! payloads out and assembling captured bits into the result store.
//!
//! The engine assumes the physical TAP starts in a state compatible with
//! Run-Test/Idle; a `Reset` leg is queued first when a true reset is needed.
//! There is no error state: malformed legs are rejected at construction, and
//! a PHY failure mid-shift is fatal to the session since the protocol state
//! is then ambiguous.  Recovery is a fresh `Reset` leg and a restart of the
//! sequence from a known-good point.
use alloc::vec::Vec;

use log::{debug, trace};

use crate::bits::{self, Bits};
use crate::leg::{Leg, LegKind, LegQueue};
use crate::mnemonic::decode_mnemonic;
use crate::phy::Phy;

/// Sleep taken by a `LongDelay` leg.
const LONG_DELAY_MS: u32 = 5;
/// TMS-high pulses in a `Reset` burst.  Five are enough to reach
/// Test-Logic-Reset from any state; the extra pulses are margin.
const RESET_PULSES: usize = 12;

/// The nine TAP controller states.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TapState {
    Reset,
    Idle,
    Select,
    Capture,
    Shift,
    Exit1,
    Pause,
    Exit2,
    Update,
}

/// One engine session: exactly one of these may own a set of physical lines
/// at a time, and it is never shared across threads.
pub struct Engine<P: Phy> {
    phy: P,
    state: TapState,
    queue: LegQueue,
    cur: Option<Leg>,
    capture: Bits,
    results: Vec<u64>,
    last_readout: Option<u64>,
    do_pause: bool,
    readout: bool,
}

impl<P: Phy> Engine<P> {
    /// Create a session over `phy` with a caller-populated queue.  The
    /// engine starts in `Idle`.
    pub fn new(phy: P, queue: LegQueue) -> Self {
        Self {
            phy,
            state: TapState::Idle,
            queue,
            cur: None,
            capture: Bits::new(),
            results: Vec::new(),
            last_readout: None,
            do_pause: false,
            readout: false,
        }
    }

    pub fn state(&self) -> TapState {
        self.state
    }

    /// Every captured value so far, one per leg that reached Update.
    pub fn results(&self) -> &[u64] {
        &self.results
    }

    /// The capture of the most recently completed readback leg.
    pub fn last_readout(&self) -> Option<u64> {
        self.last_readout
    }

    /// Access the PHY, e.g. to pulse the device reset line before a run.
    pub fn phy_mut(&mut self) -> &mut P {
        &mut self.phy
    }

    /// Give the PHY back once the queue is drained.
    pub fn release(self) -> P {
        self.phy
    }

    /// Execute one state machine transition: at most one leg dispatch and one
    /// pulse, except for reset bursts and configuration streams, which go out
    /// in a single step.
    pub fn step(&mut self) -> Result<(), P::Error> {
        match self.state {
            TapState::Reset => {
                self.phy.pulse(false, false)?;
                self.state = TapState::Idle;
            }
            TapState::Idle => self.step_idle()?,
            TapState::Select => {
                self.phy.pulse(false, false)?;
                self.state = TapState::Capture;
            }
            TapState::Capture => {
                self.phy.pulse(false, false)?;
                self.capture.clear();
                self.state = TapState::Shift;
            }
            TapState::Shift => self.step_shift()?,
            TapState::Exit1 => {
                if self.do_pause {
                    self.phy.pulse(false, false)?;
                    self.do_pause = false;
                    self.state = TapState::Pause;
                } else {
                    self.phy.pulse(false, true)?;
                    self.state = TapState::Update;
                }
            }
            TapState::Pause => {
                trace!("pause");
                self.phy.pulse(false, true)?;
                self.state = TapState::Exit2;
            }
            TapState::Exit2 => {
                self.phy.pulse(false, true)?;
                self.state = TapState::Update;
            }
            TapState::Update => self.step_update()?,
        }
        Ok(())
    }

    /// Run the next leg (or reset burst) to completion and settle back into
    /// `Reset`/`Idle`.  With nothing queued this is a single quiescent pulse.
    pub fn advance_to_idle(&mut self) -> Result<(), P::Error> {
        if matches!(self.state, TapState::Reset | TapState::Idle) {
            if self.cur.is_none() && self.queue.is_empty() {
                return self.step();
            }
            // Run until the next shift pulls us out of the idle states, or
            // the queue runs dry on housekeeping legs.
            while matches!(self.state, TapState::Reset | TapState::Idle)
                && (self.cur.is_some() || !self.queue.is_empty())
            {
                self.step()?;
            }
        }
        while !matches!(self.state, TapState::Reset | TapState::Idle) {
            self.step()?;
        }
        Ok(())
    }

    /// Drain the queue by repeated advances.
    pub fn run_to_completion(&mut self) -> Result<(), P::Error> {
        while self.cur.is_some() || !self.queue.is_empty() {
            self.advance_to_idle()?;
        }
        Ok(())
    }

    fn next_leg(&mut self) {
        self.cur = self.queue.pop_front();
        if let Some(leg) = &self.cur {
            log_leg(leg);
        }
    }

    fn step_idle(&mut self) -> Result<(), P::Error> {
        let Some(kind) = self.cur.as_ref().map(Leg::kind) else {
            if self.queue.is_empty() {
                // Quiescent hold.
                self.phy.pulse(false, false)?;
            } else {
                self.next_leg();
            }
            return Ok(());
        };

        match kind {
            LegKind::Dr | LegKind::DrConfig | LegKind::DrConfigReadback | LegKind::DrRecoveryReadback => {
                self.readout = kind.is_readback();
                self.phy.pulse(false, true)?;
                self.state = TapState::Select;
            }
            LegKind::Ir | LegKind::IrDirect => {
                self.phy.pulse(false, true)?;
                self.phy.pulse(false, true)?;
                self.do_pause = false;
                self.state = TapState::Select;
            }
            LegKind::IrPause => {
                self.phy.pulse(false, true)?;
                self.phy.pulse(false, true)?;
                self.do_pause = true;
                self.state = TapState::Select;
            }
            LegKind::Reset => {
                debug!("tms reset");
                for _ in 0..RESET_PULSES {
                    self.phy.pulse(false, true)?;
                }
                self.next_leg();
                self.state = TapState::Reset;
            }
            LegKind::LongDelay => {
                self.phy.delay_ms(LONG_DELAY_MS);
                self.next_leg();
            }
            LegKind::Idle => {
                self.phy.pulse(false, false)?;
                self.next_leg();
            }
        }
        Ok(())
    }

    fn step_shift(&mut self) -> Result<(), P::Error> {
        // Shift is only ever entered with a leg in hand.
        let Some(mut leg) = self.cur.take() else {
            return Ok(());
        };

        if leg.kind().is_config() {
            // The whole stream goes out in one step, MSB-first.  The plain
            // config path skips TDO sampling entirely; readback samples every
            // pulse.
            let readback = leg.kind().is_readback();
            let last = leg.payload.len() - 1;
            for bit in leg.payload[..last].iter().by_vals() {
                if readback {
                    let tdo = self.phy.pulse(bit, false)?;
                    self.capture.push(tdo);
                } else {
                    self.phy.pulse_write(bit)?;
                }
            }
            let tdo = self.phy.pulse(leg.payload[last], true)?;
            self.capture.push(tdo);
            self.state = TapState::Exit1;
            trace!("leaving config");
        } else if leg.payload.len() > 1 {
            // LSB-first, one bit per step.
            let bit = leg.payload.pop().unwrap_or(false);
            let tdo = self.phy.pulse(bit, false)?;
            self.capture.push(tdo);
            self.cur = Some(leg);
        } else {
            // Final bit leaves Shift with TMS high.
            let tdo = self.phy.pulse(leg.payload[0], true)?;
            self.capture.push(tdo);
            self.state = TapState::Exit1;
        }
        Ok(())
    }

    fn step_update(&mut self) -> Result<(), P::Error> {
        let value = bits::value_lsb_first(&self.capture);
        debug!("result: {:#x}", value);
        self.results.push(value);
        if self.readout {
            self.last_readout = Some(value);
            self.readout = false;
        }
        self.capture.clear();

        // Shortcut: when the next leg is another register shift, go straight
        // to Select instead of taking the Idle round-trip.  Update-to-Select
        // is a legal TAP transition, so this only saves pulses.
        match self.queue.peek_next_kind() {
            Some(kind)
                if kind.is_dr_family()
                    || matches!(kind, LegKind::IrPause | LegKind::IrDirect) =>
            {
                if matches!(kind, LegKind::IrPause | LegKind::IrDirect) {
                    // One extra cycle to pass Select-DR on the way to
                    // Select-IR.
                    debug!("IR bypassing wait state");
                    self.phy.pulse(false, true)?;
                }
                if kind == LegKind::IrPause {
                    self.do_pause = true;
                }
                if kind.is_dr_family() {
                    self.readout = kind.is_readback();
                }
                self.next_leg();
                self.phy.pulse(false, true)?;
                self.state = TapState::Select;
            }
            _ => {
                self.phy.pulse(false, false)?;
                self.state = TapState::Idle;
            }
        }
        Ok(())
    }
}

fn log_leg(leg: &Leg) {
    if leg.kind().is_config() {
        // Config payloads carry secrets; log only the length.
        debug!("start: {:?} config data of length {}", leg.kind(), leg.payload.len());
    } else {
        let value = bits::value_of(&leg.payload);
        debug!(
            "start: {:?} {:#x} ({}) / {}",
            leg.kind(),
            value,
            decode_mnemonic(value as u8),
            leg.label()
        );
    }
}
