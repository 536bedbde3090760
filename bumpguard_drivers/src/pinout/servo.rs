use super::PinDef;
use super::{PinMode, Port};

/// Servo 1 signal, TIM3_CH1
pub const SERVO_1: PinDef = PinDef {
    port: Port::A,
    pin: 6,
    mode: PinMode::Alt(2),
};

/// Servo 2 signal, TIM3_CH2
pub const SERVO_2: PinDef = PinDef {
    port: Port::A,
    pin: 7,
    mode: PinMode::Alt(2),
};
