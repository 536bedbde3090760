//! Eight-bit indicator LED bank. Bits without a fitted LED are tracked but drive nothing.

use hal::gpio::Pin;

use bumpguard_algo::interlock::IndicatorOutputs;

use super::pinout::{led, PinDef};

pub struct IndicatorBank {
    pins: [Option<Pin>; 8],
    state: u8,
}

impl IndicatorBank {
    /// Configure the LED pins with every indicator off.
    pub fn new() -> Self {
        let pins = core::array::from_fn(|bit| led::BANK[bit].as_ref().map(PinDef::init));
        let mut bank = IndicatorBank { pins, state: 0 };
        bank.apply(0xFF);
        bank
    }

    pub fn state(&self) -> u8 {
        self.state
    }

    // Drive the LEDs in `mask` to match `state`; the LEDs are lit when low
    fn apply(&mut self, mask: u8) {
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            if mask & (1 << bit) == 0 {
                continue;
            }
            if let Some(pin) = pin {
                if self.state & (1 << bit) != 0 {
                    pin.set_low();
                } else {
                    pin.set_high();
                }
            }
        }
    }
}

impl Default for IndicatorBank {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorOutputs for IndicatorBank {
    fn toggle_bits(&mut self, mask: u8) {
        self.state ^= mask;
        self.apply(mask);
    }

    fn clear_bits(&mut self, mask: u8) {
        self.state &= !mask;
        self.apply(mask);
    }
}
