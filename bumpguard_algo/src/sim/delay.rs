//! Virtual-time delay with scheduled event injection.
//!
//! Events stand in for interrupts: each one fires once, when virtual time reaches its
//! timestamp, in the middle of whatever wait is running.

use embedded_time::duration::Milliseconds;

use crate::delay::BoundedDelay;

pub struct SimDelay<'a> {
    elapsed_ms: u32,
    events: Vec<(u32, Box<dyn FnOnce() + 'a>)>,
}

impl<'a> SimDelay<'a> {
    pub fn new() -> Self {
        Self {
            elapsed_ms: 0,
            events: Vec::new(),
        }
    }

    /// Run `event` once virtual time reaches `at_ms`.
    pub fn schedule<F: FnOnce() + 'a>(&mut self, at_ms: u32, event: F) {
        self.events.push((at_ms, Box::new(event)));
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    fn fire_due(&mut self) {
        let now = self.elapsed_ms;
        let mut i = 0;
        while i < self.events.len() {
            if self.events[i].0 <= now {
                let (_, event) = self.events.remove(i);
                event();
            } else {
                i += 1;
            }
        }
    }
}

impl Default for SimDelay<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundedDelay for SimDelay<'_> {
    fn delay(&mut self, duration: Milliseconds<u32>) {
        for _ in 0..duration.0 {
            self.elapsed_ms += 1;
            self.fire_due();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn test_events_fire_once_in_order_of_time() {
        let hits = Cell::new(0u32);
        let mut delay = SimDelay::new();
        delay.schedule(10, || hits.set(hits.get() + 1));
        delay.schedule(30, || hits.set(hits.get() + 10));
        delay.delay(Milliseconds(20));
        assert_eq!(hits.get(), 1);
        delay.delay(Milliseconds(20));
        assert_eq!(hits.get(), 11);
        delay.delay(Milliseconds(100));
        assert_eq!(hits.get(), 11);
        assert_eq!(delay.elapsed_ms(), 140);
    }
}
