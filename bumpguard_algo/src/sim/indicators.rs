//! Eight-bit indicator output port.

use core::cell::Cell;

use crate::interlock::IndicatorOutputs;

#[derive(Debug, Default)]
pub struct SimIndicators {
    port: Cell<u8>,
}

impl SimIndicators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current output levels, 1 = indicator lit.
    pub fn level(&self) -> u8 {
        self.port.get()
    }

    pub fn set_level(&self, level: u8) {
        self.port.set(level);
    }
}

impl IndicatorOutputs for &SimIndicators {
    fn toggle_bits(&mut self, mask: u8) {
        self.port.set(self.port.get() ^ mask);
    }

    fn clear_bits(&mut self, mask: u8) {
        self.port.set(self.port.get() & !mask);
    }
}
