//! Up-counting timer with prescaler, compare match and update flag.

use core::cell::Cell;

use crate::regs::{IrqPriority, TimerConfig};
use crate::tick_source::TickTimer;

#[derive(Debug, Default)]
pub struct SimTickTimer {
    divisor: Cell<u32>,
    compare: Cell<u16>,
    prescale_count: Cell<u32>,
    counter: Cell<u32>,
    counting: Cell<bool>,
    pending: Cell<bool>,
    irq_enabled: Cell<bool>,
    priority: Cell<Option<IrqPriority>>,
    cycles: Cell<u64>,
}

impl SimTickTimer {
    pub fn new() -> Self {
        Self {
            divisor: Cell::new(1),
            ..Default::default()
        }
    }

    /// Advance one source clock cycle.
    pub fn clock(&self) {
        self.cycles.set(self.cycles.get() + 1);
        if !self.counting.get() {
            return;
        }
        let p = self.prescale_count.get() + 1;
        if p < self.divisor.get() {
            self.prescale_count.set(p);
            return;
        }
        self.prescale_count.set(0);
        if self.counter.get() >= u32::from(self.compare.get()) {
            self.counter.set(0);
            self.pending.set(true);
        } else {
            self.counter.set(self.counter.get() + 1);
        }
    }

    /// Source cycles seen since creation.
    pub fn cycles(&self) -> u64 {
        self.cycles.get()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    pub fn is_counting(&self) -> bool {
        self.counting.get()
    }

    pub fn interrupt_enabled(&self) -> bool {
        self.irq_enabled.get()
    }

    /// True when the NVIC would enter the handler.
    pub fn irq_requested(&self) -> bool {
        self.pending.get() && self.irq_enabled.get()
    }

    pub fn compare_register(&self) -> u16 {
        self.compare.get()
    }

    pub fn counter(&self) -> u32 {
        self.counter.get()
    }

    pub fn priority(&self) -> Option<IrqPriority> {
        self.priority.get()
    }
}

impl TickTimer for &SimTickTimer {
    fn halt(&mut self) {
        self.counting.set(false);
    }

    fn configure(&mut self, config: &TimerConfig) {
        self.divisor.set(config.prescale.divisor());
        self.compare.set(config.compare_value());
        self.prescale_count.set(0);
        self.counter.set(0);
    }

    fn clear_pending(&mut self) {
        self.pending.set(false);
    }

    fn enable_interrupt(&mut self, priority: IrqPriority) {
        self.priority.set(Some(priority));
        self.irq_enabled.set(true);
    }

    fn disable_interrupt(&mut self) {
        self.irq_enabled.set(false);
    }

    fn start_repeating(&mut self) {
        self.counting.set(true);
    }
}
