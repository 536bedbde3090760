// Implements the asynchronous bump event source.

// Key Features:
// - One falling-edge interrupt line per monitored sensor bit (switches pull the line low)
// - Every pending line on the vector is acknowledged first, monitored or not, so a stray
//   line cannot re-enter the interrupt
// - The handler receives the full sampled sensor vector, masked to the monitored bits
// - The interrupt can be disabled and re-enabled without rebinding the handler

// Detailed Operation:
// Sensor bit `n` of the vector is 1 while switch `n` is pressed. The source does not
// debounce: a bouncing switch produces several interrupts, and the handler contract (the
// collision latch) makes repeats harmless.

use crate::error::ConfigError;
use crate::regs::IrqPriority;

/// Sampled bump sensor state, one bit per sensor, 1 = active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BumpVector(u8);

impl BumpVector {
    pub const NONE: BumpVector = BumpVector(0);

    pub const fn new(bits: u8) -> Self {
        Self(bits)
    }

    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_active(self, sensor: u8) -> bool {
        sensor < 8 && self.0 & (1 << sensor) != 0
    }

    pub const fn active_count(self) -> u32 {
        self.0.count_ones()
    }

    pub const fn any(self) -> bool {
        self.0 != 0
    }

    pub const fn masked(self, mask: u8) -> Self {
        Self(self.0 & mask)
    }
}

/// Register-level operations on the sensor input lines.
pub trait EdgeInputs {
    /// Select falling-edge triggering on the lines in `mask`.
    fn configure_falling_edges(&mut self, mask: u8);
    /// Pending flags, one bit per sensor line.
    fn pending(&self) -> u8;
    fn clear_pending(&mut self, mask: u8);
    /// Current (active-high) sensor levels.
    fn read(&self) -> BumpVector;
    fn enable_interrupt(&mut self, priority: IrqPriority);
    fn disable_interrupt(&mut self);
}

/// Work done for each bump interrupt. Runs in interrupt context: must not block.
pub trait BumpHandler {
    fn on_bump(&mut self, vector: BumpVector);
}

impl<F: FnMut(BumpVector)> BumpHandler for F {
    fn on_bump(&mut self, vector: BumpVector) {
        self(vector)
    }
}

pub struct EventSourceBuilder<E, H> {
    inputs: E,
    handler: Option<H>,
    mask: u8,
    priority: u8,
}

impl<E: EdgeInputs, H: BumpHandler> EventSourceBuilder<E, H> {
    /// Sensor bits that raise interrupts.
    pub fn monitor(mut self, mask: u8) -> Self {
        self.mask = mask;
        self
    }

    pub fn priority(mut self, priority: IrqPriority) -> Self {
        self.priority = priority.level();
        self
    }

    pub fn bind(mut self, handler: H) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Configure edges, clear stale pending flags and enable the interrupt.
    ///
    /// On error the inputs are returned with the interrupt disabled.
    pub fn start(self) -> core::result::Result<EventSource<E, H>, (ConfigError, E)> {
        let mut inputs = self.inputs;
        inputs.disable_interrupt();

        if self.mask == 0 {
            return Err((ConfigError::NoMonitoredInputs, inputs));
        }
        let priority = match IrqPriority::new(self.priority) {
            Ok(p) => p,
            Err(e) => return Err((e, inputs)),
        };
        let handler = match self.handler {
            Some(h) => h,
            None => return Err((ConfigError::UnboundCallback, inputs)),
        };

        inputs.configure_falling_edges(self.mask);
        inputs.clear_pending(self.mask);
        inputs.enable_interrupt(priority);
        log_info!("bump inputs armed: mask {:#x}", self.mask);

        Ok(EventSource {
            inputs,
            handler,
            mask: self.mask,
            priority,
            enabled: true,
        })
    }
}

pub struct EventSource<E, H> {
    inputs: E,
    handler: H,
    mask: u8,
    priority: IrqPriority,
    enabled: bool,
}

impl<E: EdgeInputs, H: BumpHandler> EventSource<E, H> {
    pub fn builder(inputs: E) -> EventSourceBuilder<E, H> {
        EventSourceBuilder {
            inputs,
            handler: None,
            mask: 0,
            priority: 1,
        }
    }

    /// Interrupt entry. Returns false if none of the monitored lines was pending.
    #[inline(always)]
    pub fn on_interrupt(&mut self) -> bool {
        let pending = self.inputs.pending();
        self.inputs.clear_pending(pending);
        if pending & self.mask == 0 {
            return false;
        }
        let vector = self.inputs.read().masked(self.mask);
        self.handler.on_bump(vector);
        true
    }

    pub fn disable(&mut self) {
        self.inputs.disable_interrupt();
        self.enabled = false;
    }

    /// Re-enable after `disable`, dropping edges that arrived in between.
    pub fn enable(&mut self) {
        self.inputs.clear_pending(self.mask);
        self.inputs.enable_interrupt(self.priority);
        self.enabled = true;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn mask(&self) -> u8 {
        self.mask
    }

    pub fn priority(&self) -> IrqPriority {
        self.priority
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn release(mut self) -> (E, H) {
        self.disable();
        (self.inputs, self.handler)
    }
}
