// Hardware-independent core of the bump-guard firmware.

// Key Features:
// - Typed timer/interrupt register fields validated at the API boundary
// - Periodic tick source that acknowledges its interrupt before running the bound handler
// - Two-channel PWM generator writing preloaded compare registers (no mid-period glitch)
// - Falling-edge bump event source handing the sampled sensor vector to one handler
// - One-shot collision latch shared between both interrupt contexts and the foreground
// - Drive gate, recovery maneuver and foreground pilot built on top of the latch

// Detailed Operation:
// Hardware is reached only through the traits `TickTimer`, `PwmTimer`, `EdgeInputs`,
// `IndicatorOutputs`, `MotorDriver` and `BoundedDelay`. The firmware crate implements them
// for the STM32G4 peripherals; the `sim` module implements them for host tests.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[macro_use]
mod logging;

pub mod config;
pub mod delay;
pub mod drive;
pub mod error;
pub mod event_source;
pub mod interlock;
pub mod pwm_channels;
pub mod regs;
pub mod tick_source;

#[cfg(any(test, feature = "std"))]
pub mod sim;

pub use error::{ConfigError, DriveError, Result};
pub use interlock::{InterlockState, Mode};
