// Implements the periodic tick source: one up-counting hardware timer, one bound handler.

// Key Features:
// - Builder collects clock source, prescale, period, priority and the handler; `start()`
//   validates everything before the timer is touched beyond halting it
// - A failed start leaves the timer halted with its interrupt disabled
// - The interrupt entry point acknowledges the pending update flag before the handler runs,
//   so a slow or panicking handler can never cause an interrupt storm
// - Period can be changed at runtime; a rejected period keeps the previous one running

// Detailed Operation:
// The counter runs 0..=period-1 at `clock / prescale` and raises its update flag on every
// wrap. Hardware access goes through `TickTimer`; the firmware implements it for TIM4 and
// `sim::SimTickTimer` implements it for host tests.

use embedded_time::rate::Hertz;

use crate::error::{ConfigError, Result};
use crate::regs::{ClockSource, IrqPriority, TimerConfig};

/// Register-level operations the tick source needs from a timer peripheral.
pub trait TickTimer {
    /// Stop counting. Leaves the interrupt enable untouched.
    fn halt(&mut self);
    /// Program clock source, prescaler and compare value, and reset the counter to 0.
    fn configure(&mut self, config: &TimerConfig);
    /// Acknowledge the update (period elapsed) condition.
    fn clear_pending(&mut self);
    fn enable_interrupt(&mut self, priority: IrqPriority);
    fn disable_interrupt(&mut self);
    /// Start counting up with auto-reload.
    fn start_repeating(&mut self);
}

/// Work done once per tick, in interrupt context.
pub trait TickHandler {
    fn on_tick(&mut self);
}

impl<F: FnMut()> TickHandler for F {
    fn on_tick(&mut self) {
        self()
    }
}

/// Collects the tick source parameters; nothing reaches the hardware before `start()`.
pub struct TickSourceBuilder<T, H> {
    timer: T,
    handler: Option<H>,
    clock_source: ClockSource,
    prescale: u32,
    period: u32,
    priority: u8,
}

impl<T: TickTimer, H: TickHandler> TickSourceBuilder<T, H> {
    pub fn clock_source(mut self, source: ClockSource) -> Self {
        self.clock_source = source;
        self
    }

    pub fn prescale(mut self, divisor: u32) -> Self {
        self.prescale = divisor;
        self
    }

    pub fn period(mut self, ticks: u32) -> Self {
        self.period = ticks;
        self
    }

    pub fn priority(mut self, priority: IrqPriority) -> Self {
        self.priority = priority.level();
        self
    }

    /// Bind the handler. A source has exactly one handler for its lifetime.
    pub fn bind(mut self, handler: H) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Halt any running instance, validate, program the timer and start it.
    ///
    /// On error the timer is returned to the caller halted with its interrupt disabled.
    pub fn start(self) -> core::result::Result<TickSource<T, H>, (ConfigError, T)> {
        let mut timer = self.timer;
        timer.halt();
        timer.disable_interrupt();

        let validated = TimerConfig::new(self.clock_source, self.prescale, self.period)
            .and_then(|config| IrqPriority::new(self.priority).map(|prio| (config, prio)))
            .and_then(|(config, prio)| {
                self.handler
                    .ok_or(ConfigError::UnboundCallback)
                    .map(|handler| (config, prio, handler))
            });

        match validated {
            Ok((config, priority, handler)) => {
                let mut source = TickSource {
                    timer,
                    handler,
                    config,
                    priority,
                    running: false,
                };
                source.arm();
                log_info!(
                    "tick source started: prescale {} period {}",
                    config.prescale.divisor(),
                    config.period_ticks()
                );
                Ok(source)
            }
            Err(e) => Err((e, timer)),
        }
    }
}

/// A running (or stopped) periodic tick source owning its timer and handler.
pub struct TickSource<T, H> {
    timer: T,
    handler: H,
    config: TimerConfig,
    priority: IrqPriority,
    running: bool,
}

impl<T: TickTimer, H: TickHandler> TickSource<T, H> {
    pub fn builder(timer: T) -> TickSourceBuilder<T, H> {
        TickSourceBuilder {
            timer,
            handler: None,
            clock_source: ClockSource::Kernel,
            prescale: 1,
            period: 0,
            priority: 1,
        }
    }

    // Program and start from a halted timer with its interrupt disabled.
    fn arm(&mut self) {
        self.timer.configure(&self.config);
        self.timer.clear_pending();
        self.timer.enable_interrupt(self.priority);
        self.timer.start_repeating();
        self.running = true;
    }

    /// Halt the timer and disable its interrupt. Safe to call when already stopped.
    pub fn stop(&mut self) {
        self.timer.halt();
        self.timer.disable_interrupt();
        self.timer.clear_pending();
        if self.running {
            log_debug!("tick source stopped");
        }
        self.running = false;
    }

    /// Restart from count 0 with the current configuration.
    pub fn restart(&mut self) {
        self.stop();
        self.arm();
    }

    /// Replace the period. An invalid period is rejected and the current one keeps running.
    pub fn set_period(&mut self, ticks: u32) -> Result<()> {
        let config = TimerConfig::new(self.config.clock_source, self.config.prescale.divisor(), ticks)?;
        self.stop();
        self.config = config;
        self.arm();
        Ok(())
    }

    /// Interrupt entry. Acknowledges the update flag, then runs the handler.
    #[inline(always)]
    pub fn on_interrupt(&mut self) {
        self.timer.clear_pending();
        self.handler.on_tick();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn priority(&self) -> IrqPriority {
        self.priority
    }

    /// Handler invocation rate for a given kernel clock.
    pub fn tick_hz(&self, kernel_clock: Hertz) -> Hertz {
        self.config.overflow_rate(kernel_clock)
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Stop the source and hand back the timer and handler.
    pub fn release(mut self) -> (T, H) {
        self.stop();
        (self.timer, self.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimTickTimer;
    use core::cell::Cell;

    #[test]
    fn test_first_tick_after_one_period() {
        let sim = SimTickTimer::new();
        let count = Cell::new(0u32);
        let mut source = TickSource::builder(&sim)
            .prescale(4)
            .period(5)
            .priority(IrqPriority::level_const(2))
            .bind(|| count.set(count.get() + 1))
            .start()
            .map_err(|(e, _)| e)
            .unwrap();

        assert!(sim.is_counting());
        assert_eq!(sim.compare_register(), 4);
        // 4 * 5 source cycles to the first update
        for _ in 0..19 {
            sim.clock();
            assert!(!sim.irq_requested());
        }
        sim.clock();
        assert!(sim.irq_requested());
        source.on_interrupt();
        assert!(!sim.irq_requested());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_cadence_has_no_drift() {
        let sim = SimTickTimer::new();
        let count = Cell::new(0u32);
        let mut source = TickSource::builder(&sim)
            .prescale(3)
            .period(7)
            .bind(|| count.set(count.get() + 1))
            .start()
            .map_err(|(e, _)| e)
            .unwrap();

        let mut last_fire = 0u64;
        for n in 0..1_000u64 {
            let mut cycles = 0u64;
            loop {
                sim.clock();
                cycles += 1;
                if sim.irq_requested() {
                    break;
                }
            }
            assert_eq!(cycles, 21, "period {} was {} cycles", n, cycles);
            source.on_interrupt();
            last_fire = sim.cycles();
        }
        assert_eq!(count.get(), 1_000);
        assert_eq!(last_fire, 21 * 1_000);
    }

    #[test]
    fn test_ack_happens_before_handler() {
        let sim = SimTickTimer::new();
        let seen_pending = Cell::new(None);
        let mut source = TickSource::builder(&sim)
            .period(2)
            .bind(|| seen_pending.set(Some(sim.is_pending())))
            .start()
            .map_err(|(e, _)| e)
            .unwrap();
        sim.clock();
        sim.clock();
        assert!(sim.is_pending());
        source.on_interrupt();
        assert_eq!(seen_pending.get(), Some(false));
    }

    #[test]
    fn test_zero_period_leaves_timer_halted() {
        let sim = SimTickTimer::new();
        let (err, _) = TickSource::builder(&sim)
            .period(0)
            .bind(|| {})
            .start()
            .err()
            .unwrap();
        assert_eq!(err, ConfigError::ZeroPeriod);
        assert!(!sim.is_counting());
        assert!(!sim.interrupt_enabled());
    }

    #[test]
    fn test_unbound_handler_is_rejected() {
        let sim = SimTickTimer::new();
        let (err, _) = TickSource::<_, fn()>::builder(&sim)
            .period(10)
            .start()
            .err()
            .unwrap();
        assert_eq!(err, ConfigError::UnboundCallback);
        assert!(!sim.is_counting());
        assert!(!sim.interrupt_enabled());
    }

    #[test]
    fn test_start_halts_previous_instance() {
        let sim = SimTickTimer::new();
        let first = TickSource::builder(&sim)
            .period(10)
            .bind(|| {})
            .start()
            .map_err(|(e, _)| e)
            .unwrap();
        assert!(first.is_running());
        let _ = TickSource::builder(&sim).period(0).bind(|| {}).start();
        assert!(!sim.is_counting());
        assert!(!sim.interrupt_enabled());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let sim = SimTickTimer::new();
        let mut source = TickSource::builder(&sim)
            .period(3)
            .bind(|| {})
            .start()
            .map_err(|(e, _)| e)
            .unwrap();
        source.stop();
        source.stop();
        assert!(!source.is_running());
        assert!(!sim.interrupt_enabled());
        for _ in 0..10 {
            sim.clock();
        }
        assert!(!sim.irq_requested());
    }

    #[test]
    fn test_restart_counts_a_full_period() {
        let sim = SimTickTimer::new();
        let count = Cell::new(0u32);
        let mut source = TickSource::builder(&sim)
            .period(5)
            .bind(|| count.set(count.get() + 1))
            .start()
            .map_err(|(e, _)| e)
            .unwrap();
        for _ in 0..3 {
            sim.clock();
        }
        source.restart();
        assert!(source.is_running());
        assert!(sim.interrupt_enabled());
        for _ in 0..4 {
            sim.clock();
            assert!(!sim.irq_requested());
        }
        sim.clock();
        assert!(sim.irq_requested());
        source.on_interrupt();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_set_period_rejects_and_keeps_running() {
        let sim = SimTickTimer::new();
        let mut source = TickSource::builder(&sim)
            .period(3)
            .bind(|| {})
            .start()
            .map_err(|(e, _)| e)
            .unwrap();
        assert_eq!(source.set_period(0), Err(ConfigError::ZeroPeriod));
        assert!(source.is_running());
        assert_eq!(source.config().period_ticks(), 3);

        source.set_period(8).unwrap();
        assert_eq!(sim.compare_register(), 7);
        assert!(sim.is_counting());
    }

    #[test]
    fn test_tick_rate_and_release() {
        let sim = SimTickTimer::new();
        let source = TickSource::builder(&sim)
            .prescale(17_000)
            .period(1_000)
            .bind(|| {})
            .start()
            .map_err(|(e, _)| e)
            .unwrap();
        assert_eq!(source.tick_hz(Hertz(170_000_000)), Hertz(10u32));
        let _ = source.release();
        assert!(!sim.is_counting());
    }
}
