//! This module defines the pin configurations for the H-bridge motor driver.
use super::PinDef;
use super::{PinMode, Port};

/// Sleep (active low) pin for both bridges
pub const SLEEP: PinDef = PinDef {
    port: Port::A,
    pin: 4,
    mode: PinMode::Output,
};

/// PWM input of the left bridge, TIM2_CH1
pub const PWM_LEFT: PinDef = PinDef {
    port: Port::A,
    pin: 0,
    mode: PinMode::Alt(1),
};

/// PWM input of the right bridge, TIM2_CH2
pub const PWM_RIGHT: PinDef = PinDef {
    port: Port::A,
    pin: 1,
    mode: PinMode::Alt(1),
};

/// Direction of the left bridge, high = reverse
pub const DIR_LEFT: PinDef = PinDef {
    port: Port::B,
    pin: 10,
    mode: PinMode::Output,
};

/// Direction of the right bridge, high = reverse
pub const DIR_RIGHT: PinDef = PinDef {
    port: Port::B,
    pin: 11,
    mode: PinMode::Output,
};
