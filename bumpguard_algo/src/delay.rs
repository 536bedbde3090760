//! Bounded foreground waits.
//!
//! A `BoundedDelay` spins (or sleeps in a way that keeps interrupts live) for a fixed time.
//! Implementations must never mask interrupts: the tick and collision handlers keep running
//! while the foreground waits, and `delay_unless` relies on that to observe the latch.

use embedded_time::duration::Milliseconds;

/// How a [`BoundedDelay::delay_unless`] wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitOutcome {
    Elapsed,
    Interrupted,
}

pub trait BoundedDelay {
    /// Wait for `duration` without masking interrupts.
    fn delay(&mut self, duration: Milliseconds<u32>);

    /// Wait for `duration`, returning early once `stop` reports true.
    ///
    /// `stop` is polled before every 1 ms slice, so the reaction time is at most one slice
    /// after the condition becomes true.
    fn delay_unless<F: FnMut() -> bool>(
        &mut self,
        duration: Milliseconds<u32>,
        mut stop: F,
    ) -> WaitOutcome {
        for _ in 0..duration.0 {
            if stop() {
                return WaitOutcome::Interrupted;
            }
            self.delay(Milliseconds(1));
        }
        if stop() {
            WaitOutcome::Interrupted
        } else {
            WaitOutcome::Elapsed
        }
    }
}
