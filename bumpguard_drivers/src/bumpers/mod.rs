// Implements the bump switch inputs on EXTI lines 10..15.

// Key Features:
// - Sensor bit `n` maps to PC(10 + n) and EXTI line 10 + n
// - Pull-ups keep idle lines high; a pressed switch pulls its line low (falling edge)
// - All six lines share the EXTI15_10 vector, masked and unmasked at the NVIC

use cortex_m::peripheral::NVIC;
use hal::{
    gpio::{self, Edge, Pin, Pull},
    pac,
};

use bumpguard_algo::event_source::{BumpVector, EdgeInputs};
use bumpguard_algo::regs::IrqPriority;

use super::pinout::bumper::{SENSORS, SENSOR_COUNT};

pub struct BumperBank {
    pins: [Pin; SENSOR_COUNT],
}

impl BumperBank {
    pub fn new() -> Self {
        let pins = core::array::from_fn(|i| {
            let mut pin = SENSORS[i].init();
            pin.pull(Pull::Up);
            pin
        });
        BumperBank { pins }
    }

    #[inline(always)]
    fn line(sensor: usize) -> u8 {
        SENSORS[sensor].pin()
    }

    fn sensors(mask: u8) -> impl Iterator<Item = usize> {
        (0..SENSOR_COUNT).filter(move |&i| mask & (1 << i) != 0)
    }
}

impl Default for BumperBank {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeInputs for BumperBank {
    fn configure_falling_edges(&mut self, mask: u8) {
        for i in Self::sensors(mask) {
            self.pins[i].enable_interrupt(Edge::Falling);
        }
    }

    fn pending(&self) -> u8 {
        // Read-only access to the pending register; writes go through `clear_exti_interrupt`
        let pr = unsafe { (*pac::EXTI::ptr()).pr1.read().bits() };
        let mut bits = 0;
        for i in 0..SENSOR_COUNT {
            if pr & (1 << Self::line(i)) != 0 {
                bits |= 1 << i;
            }
        }
        bits
    }

    fn clear_pending(&mut self, mask: u8) {
        for i in Self::sensors(mask) {
            gpio::clear_exti_interrupt(Self::line(i));
        }
    }

    fn read(&self) -> BumpVector {
        let mut bits = 0;
        for (i, pin) in self.pins.iter().enumerate() {
            if pin.is_low() {
                bits |= 1 << i;
            }
        }
        BumpVector::new(bits)
    }

    fn enable_interrupt(&mut self, priority: IrqPriority) {
        defmt::debug!("EXTI15_10 unmasked at priority {}", priority.level());
        // The RTIC binding owns the priority; the vector is only unmasked here
        unsafe { NVIC::unmask(pac::Interrupt::EXTI15_10) };
    }

    fn disable_interrupt(&mut self) {
        NVIC::mask(pac::Interrupt::EXTI15_10);
    }
}
