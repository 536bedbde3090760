//! Bump switches, sensor bit `n` on PC(10 + n). Switches short the input to ground.
use super::PinDef;
use super::{PinMode, Port};

pub const SENSOR_COUNT: usize = 6;

pub const SENSORS: [PinDef; SENSOR_COUNT] = [
    PinDef::new(Port::C, 10, PinMode::Input),
    PinDef::new(Port::C, 11, PinMode::Input),
    PinDef::new(Port::C, 12, PinMode::Input),
    PinDef::new(Port::C, 13, PinMode::Input),
    PinDef::new(Port::C, 14, PinMode::Input),
    PinDef::new(Port::C, 15, PinMode::Input),
];
