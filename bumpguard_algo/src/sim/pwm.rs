//! Two-channel PWM timer with preloaded compare registers.
//!
//! The model samples each output once per counter tick and records, for every completed
//! period, how many ticks the output was active and which compare value was latched at the
//! start of that period.

use std::cell::{Cell, RefCell};

use crate::pwm_channels::{Polarity, PwmChannelId, PwmTimer};
use crate::regs::TimerConfig;

#[derive(Debug, Default)]
pub struct SimPwmTimer {
    period: Cell<u32>,
    counter: Cell<u32>,
    counting: Cell<bool>,
    shadow: [Cell<u32>; 2],
    active: [Cell<u32>; 2],
    polarity: [Cell<Option<Polarity>>; 2],
    high_ticks: [Cell<u32>; 2],
    counts: [RefCell<Vec<u32>>; 2],
    latched: [RefCell<Vec<u32>>; 2],
}

impl SimPwmTimer {
    pub fn new() -> Self {
        Self::default()
    }

    fn latch_shadows(&self) {
        for i in 0..2 {
            self.active[i].set(self.shadow[i].get());
            self.high_ticks[i].set(0);
        }
    }

    /// Advance `n` counter ticks.
    pub fn run_ticks(&self, n: u32) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Advance to the end of the current period, `n` times.
    pub fn run_periods(&self, n: u32) {
        for _ in 0..n {
            loop {
                if self.tick() {
                    break;
                }
            }
        }
    }

    // One counter tick; true if a period just completed.
    fn tick(&self) -> bool {
        if !self.counting.get() || self.period.get() == 0 {
            return false;
        }
        let count = self.counter.get();
        for i in 0..2 {
            if count < self.active[i].get() {
                self.high_ticks[i].set(self.high_ticks[i].get() + 1);
            }
        }
        if count + 1 >= self.period.get() {
            for i in 0..2 {
                self.counts[i].borrow_mut().push(self.high_ticks[i].get());
                self.latched[i].borrow_mut().push(self.active[i].get());
            }
            self.counter.set(0);
            self.latch_shadows();
            true
        } else {
            self.counter.set(count + 1);
            false
        }
    }

    pub fn is_counting(&self) -> bool {
        self.counting.get()
    }

    pub fn shadow_compare(&self, channel: PwmChannelId) -> u32 {
        self.shadow[channel.index()].get()
    }

    pub fn polarity(&self, channel: PwmChannelId) -> Option<Polarity> {
        self.polarity[channel.index()].get()
    }

    /// Active ticks of each completed period.
    pub fn active_counts(&self, channel: PwmChannelId) -> Vec<u32> {
        self.counts[channel.index()].borrow().clone()
    }

    /// Compare value in effect during each completed period.
    pub fn latched_duties(&self, channel: PwmChannelId) -> Vec<u32> {
        self.latched[channel.index()].borrow().clone()
    }
}

// 16-bit compare registers, like the general-purpose timers the servos run on
impl PwmTimer for &SimPwmTimer {
    const MAX_COMPARE: u32 = 0xFFFF;

    fn halt(&mut self) {
        self.counting.set(false);
    }

    fn configure_carrier(&mut self, config: &TimerConfig) {
        self.period.set(config.period_ticks());
        self.counter.set(0);
    }

    fn write_compare(&mut self, channel: PwmChannelId, ticks: u32) {
        self.shadow[channel.index()].set(ticks);
    }

    fn enable_output(&mut self, channel: PwmChannelId, polarity: Polarity) {
        self.polarity[channel.index()].set(Some(polarity));
    }

    fn start(&mut self) {
        self.counter.set(0);
        self.latch_shadows();
        self.counting.set(true);
    }
}
