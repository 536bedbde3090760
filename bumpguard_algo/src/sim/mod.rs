//! Simulated hardware for host tests.
//!
//! Each model implements one of the core's hardware traits on a shared reference
//! (`&SimTickTimer: TickTimer` and so on) with interior mutability, so a test can hand the
//! model to a tick source or handler and still inspect and drive it from outside, the way
//! an interrupt and a debugger see the same registers.
//!
//! Available under `cfg(test)` and with the `std` feature (on by default for host builds).

mod delay;
mod indicators;
mod inputs;
mod motors;
mod pwm;
mod tick_timer;

pub use delay::SimDelay;
pub use indicators::SimIndicators;
pub use inputs::SimBumpers;
pub use motors::{MotorCommand, SimMotors};
pub use pwm::SimPwmTimer;
pub use tick_timer::SimTickTimer;
