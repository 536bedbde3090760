//! Busy-wait delay on the Cortex-M SysTick. Polls the counter flag with interrupts enabled.

use cortex_m::{delay::Delay, peripheral::SYST};
use embedded_time::duration::Milliseconds;

use bumpguard_algo::delay::BoundedDelay;

pub struct SysTickDelay {
    delay: Delay,
}

impl SysTickDelay {
    pub fn new(syst: SYST, ahb_frequency: u32) -> Self {
        SysTickDelay {
            delay: Delay::new(syst, ahb_frequency),
        }
    }
}

impl BoundedDelay for SysTickDelay {
    fn delay(&mut self, duration: Milliseconds<u32>) {
        self.delay.delay_ms(duration.0);
    }
}
