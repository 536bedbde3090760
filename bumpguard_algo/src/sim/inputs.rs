//! Bank of eight switch inputs with falling-edge detection.

use core::cell::Cell;

use crate::event_source::{BumpVector, EdgeInputs};
use crate::regs::IrqPriority;

#[derive(Debug, Default)]
pub struct SimBumpers {
    active: Cell<u8>,
    falling_edges: Cell<u8>,
    pending: Cell<u8>,
    irq_enabled: Cell<bool>,
    priority: Cell<Option<IrqPriority>>,
}

impl SimBumpers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Press the switches in `bits`. Lines that go active raise their pending flag if they
    /// are configured for falling edges.
    pub fn press(&self, bits: u8) {
        let newly = bits & !self.active.get();
        self.active.set(self.active.get() | bits);
        self.pending
            .set(self.pending.get() | (newly & self.falling_edges.get()));
    }

    pub fn release(&self, bits: u8) {
        self.active.set(self.active.get() & !bits);
    }

    /// Set pending flags directly, as a line with its own edge configuration would.
    pub fn raise_pending(&self, bits: u8) {
        self.pending.set(self.pending.get() | bits);
    }

    pub fn clear_all_pending(&self) {
        self.pending.set(0);
    }

    pub fn pending_flags(&self) -> u8 {
        self.pending.get()
    }

    pub fn interrupt_enabled(&self) -> bool {
        self.irq_enabled.get()
    }

    pub fn irq_requested(&self) -> bool {
        self.irq_enabled.get() && self.pending.get() != 0
    }

    pub fn priority(&self) -> Option<IrqPriority> {
        self.priority.get()
    }
}

impl EdgeInputs for &SimBumpers {
    fn configure_falling_edges(&mut self, mask: u8) {
        self.falling_edges.set(mask);
    }

    fn pending(&self) -> u8 {
        self.pending.get()
    }

    fn clear_pending(&mut self, mask: u8) {
        self.pending.set(self.pending.get() & !mask);
    }

    fn read(&self) -> BumpVector {
        BumpVector::new(self.active.get())
    }

    fn enable_interrupt(&mut self, priority: IrqPriority) {
        self.priority.set(Some(priority));
        self.irq_enabled.set(true);
    }

    fn disable_interrupt(&mut self) {
        self.irq_enabled.set(false);
    }
}
