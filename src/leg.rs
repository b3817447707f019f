//! Legs are the unit of work the engine executes: one register shift, reset
//! burst, delay or idle hold, together with its payload and a diagnostic
//! label.  The caller builds the full sequence up front as a `LegQueue` and
//! hands it to the engine.
use alloc::collections::VecDeque;
use alloc::string::String;

use crate::bits::{self, Bits};
use crate::error::Error;

/// The ten operation kinds the engine understands.  The state machine matches
/// on these exhaustively, so adding a kind is a compile-time-checked change.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LegKind {
    /// Data register shift, payload consumed LSB-first.
    Dr,
    /// Instruction register shift, payload consumed LSB-first.
    Ir,
    /// Twelve TMS-high pulses forcing Test-Logic-Reset.
    Reset,
    /// Fixed 5 ms blocking delay, no pulses.
    LongDelay,
    /// One quiescent pulse in Run-Test/Idle.
    Idle,
    /// Instruction register shift that detours through Pause on exit.
    IrPause,
    /// Instruction register shift entered directly from Update.
    IrDirect,
    /// Configuration stream, consumed MSB-first on the write-only fast path.
    DrConfig,
    /// Configuration stream with TDO sampled on every pulse.
    DrConfigReadback,
    /// Data register shift whose capture is latched into the readout register.
    DrRecoveryReadback,
}

impl LegKind {
    /// Kinds that scan the data register path.
    pub fn is_dr_family(self) -> bool {
        matches!(
            self,
            LegKind::Dr | LegKind::DrConfig | LegKind::DrConfigReadback | LegKind::DrRecoveryReadback
        )
    }

    /// Kinds shifted MSB-first on the configuration fast path.
    pub fn is_config(self) -> bool {
        matches!(self, LegKind::DrConfig | LegKind::DrConfigReadback)
    }

    /// Kinds whose capture overwrites the last-readout register.
    pub fn is_readback(self) -> bool {
        matches!(self, LegKind::DrConfigReadback | LegKind::DrRecoveryReadback)
    }

    fn shifts(self) -> bool {
        !matches!(self, LegKind::Reset | LegKind::LongDelay | LegKind::Idle)
    }
}

/// One queued operation.  The label is diagnostic only and never affects
/// behavior.
#[derive(Clone, Debug)]
pub struct Leg {
    pub(crate) kind: LegKind,
    pub(crate) payload: Bits,
    pub(crate) label: String,
}

impl Leg {
    /// Build a leg from a raw payload.  Shift kinds require at least one
    /// payload bit; zero-length shifts are rejected here rather than handled
    /// mid-state-machine.
    pub fn new(kind: LegKind, payload: Bits, label: &str) -> Result<Self, Error> {
        if kind.shifts() && payload.is_empty() {
            return Err(Error::EmptyPayload);
        }
        Ok(Self { kind, payload, label: label.into() })
    }

    /// Data register shift of `value`, zero-padded to `width` bits.
    pub fn dr(value: u64, width: usize, label: &str) -> Result<Self, Error> {
        Self::new(LegKind::Dr, bits::to_fixed_width_bits(value, width)?, label)
    }

    /// Instruction register shift.
    pub fn ir(value: u64, width: usize, label: &str) -> Result<Self, Error> {
        Self::new(LegKind::Ir, bits::to_fixed_width_bits(value, width)?, label)
    }

    /// Instruction register shift that detours through Pause on exit.
    pub fn ir_pause(value: u64, width: usize, label: &str) -> Result<Self, Error> {
        Self::new(LegKind::IrPause, bits::to_fixed_width_bits(value, width)?, label)
    }

    /// Instruction register shift entered directly from Update.
    pub fn ir_direct(value: u64, width: usize, label: &str) -> Result<Self, Error> {
        Self::new(LegKind::IrDirect, bits::to_fixed_width_bits(value, width)?, label)
    }

    /// Data register shift whose capture lands in the readout register.
    pub fn recovery_readback(value: u64, width: usize, label: &str) -> Result<Self, Error> {
        Self::new(LegKind::DrRecoveryReadback, bits::to_fixed_width_bits(value, width)?, label)
    }

    /// Configuration stream, transmitted MSB-first per byte without sampling.
    pub fn config(data: &[u8], label: &str) -> Result<Self, Error> {
        Self::new(LegKind::DrConfig, Bits::from_slice(data), label)
    }

    /// Configuration stream with TDO sampled on every pulse.
    pub fn config_readback(data: &[u8], label: &str) -> Result<Self, Error> {
        Self::new(LegKind::DrConfigReadback, Bits::from_slice(data), label)
    }

    /// Reset burst leg.
    pub fn reset() -> Self {
        Self { kind: LegKind::Reset, payload: Bits::new(), label: "reset".into() }
    }

    /// 5 ms blocking delay leg.
    pub fn long_delay() -> Self {
        Self { kind: LegKind::LongDelay, payload: Bits::new(), label: String::new() }
    }

    /// Single idle-hold pulse leg.
    pub fn idle() -> Self {
        Self { kind: LegKind::Idle, payload: Bits::new(), label: String::new() }
    }

    pub fn kind(&self) -> LegKind {
        self.kind
    }

    pub fn payload(&self) -> &Bits {
        &self.payload
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// FIFO of legs.  The engine pops from the front; `peek_next_kind` is the
/// one-leg lookahead the Update-state shortcut relies on.
#[derive(Default)]
pub struct LegQueue {
    legs: VecDeque<Leg>,
}

impl LegQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, leg: Leg) {
        self.legs.push_back(leg);
    }

    pub fn pop_front(&mut self) -> Option<Leg> {
        self.legs.pop_front()
    }

    pub fn peek_next_kind(&self) -> Option<LegKind> {
        self.legs.front().map(|leg| leg.kind)
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_kinds_reject_empty_payloads() {
        assert_eq!(Leg::new(LegKind::Dr, Bits::new(), "").unwrap_err(), Error::EmptyPayload);
        assert_eq!(Leg::new(LegKind::Ir, Bits::new(), "").unwrap_err(), Error::EmptyPayload);
        assert_eq!(Leg::config(&[], "").unwrap_err(), Error::EmptyPayload);
    }

    #[test]
    fn housekeeping_kinds_need_no_payload() {
        assert_eq!(Leg::reset().kind(), LegKind::Reset);
        assert_eq!(Leg::long_delay().kind(), LegKind::LongDelay);
        assert_eq!(Leg::idle().kind(), LegKind::Idle);
    }

    #[test]
    fn dr_payload_is_fixed_width() {
        let leg = Leg::dr(0b10110, 5, "").unwrap();
        assert_eq!(leg.payload().len(), 5);
        assert!(Leg::dr(0b100000, 5, "").is_err());
    }

    #[test]
    fn queue_lookahead() {
        let mut queue = LegQueue::new();
        assert_eq!(queue.peek_next_kind(), None);
        queue.push(Leg::dr(1, 1, "").unwrap());
        queue.push(Leg::reset());
        assert_eq!(queue.peek_next_kind(), Some(LegKind::Dr));
        assert_eq!(queue.pop_front().unwrap().kind(), LegKind::Dr);
        assert_eq!(queue.peek_next_kind(), Some(LegKind::Reset));
    }
}
