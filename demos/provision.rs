//! Builds the BBRAM provisioning sequence for a 7-series device as a leg
//! queue and runs it against a loopback PHY, printing every captured value.
//! On real hardware the `Loopback` below would be a `GpioPhy` over the
//! debug-header pins, and the key words would come from the device console
//! instead of the placeholder pattern used here.
use jtag_bitbang::engine::Engine;
use jtag_bitbang::leg::{Leg, LegQueue};
use jtag_bitbang::phy::Phy;

struct Loopback;

impl Phy for Loopback {
    type Error = core::convert::Infallible;

    fn pulse(&mut self, tdi: bool, _tms: bool) -> Result<bool, Self::Error> {
        Ok(tdi)
    }

    fn pulse_reset(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn delay_ms(&mut self, _ms: u32) {}
}

fn main() {
    env_logger::init();

    let key_words: [u32; 8] = [0x11223344; 8];

    let mut queue = LegQueue::new();
    queue.push(Leg::reset());
    queue.push(Leg::long_delay());
    queue.push(Leg::ir(0b001011, 6, "jprogram").unwrap());
    queue.push(Leg::ir(0b010100, 6, "isc_noop").unwrap());
    queue.push(Leg::ir(0b010100, 6, "isc_noop").unwrap());
    queue.push(Leg::ir_pause(0b010000, 6, "isc_enable").unwrap());
    queue.push(Leg::dr(0b10101, 5, "").unwrap());
    for _ in 0..12 {
        queue.push(Leg::idle());
    }
    queue.push(Leg::dr(0b10101, 5, "").unwrap());
    queue.push(Leg::ir_pause(0b010010, 6, "program_key").unwrap());
    queue.push(Leg::idle());
    queue.push(Leg::dr(0xffff_ffff, 32, "").unwrap());
    for _ in 0..12 {
        queue.push(Leg::idle());
    }
    queue.push(Leg::ir(0b010001, 6, "isc_program").unwrap());
    queue.push(Leg::dr(0x557b, 32, "").unwrap());

    for word in key_words {
        queue.push(Leg::ir(0b010001, 6, "isc_program").unwrap());
        queue.push(Leg::dr(word as u64, 32, "").unwrap());
    }

    // Verification read cycles.
    for _ in 0..9 {
        queue.push(Leg::ir(0b010101, 6, "bbkey_rbk").unwrap());
        queue.push(Leg::recovery_readback(0x1f_ffff_ffff, 37, "").unwrap());
    }

    queue.push(Leg::ir(0b010110, 6, "isc_disable").unwrap());
    for _ in 0..12 {
        queue.push(Leg::idle());
    }
    queue.push(Leg::reset());
    for _ in 0..5 {
        queue.push(Leg::idle());
    }
    queue.push(Leg::ir(0b111111, 6, "bypass").unwrap());
    queue.push(Leg::long_delay());
    queue.push(Leg::ir(0b111111, 6, "bypass").unwrap());

    let mut engine = Engine::new(Loopback, queue);
    engine.phy_mut().pulse_reset().unwrap();
    engine.run_to_completion().unwrap();

    for (i, result) in engine.results().iter().enumerate() {
        println!("leg {i}: {result:#x}");
    }
    if let Some(readout) = engine.last_readout() {
        println!("last readout: {readout:#x}");
    }
}
