//! Indicator LEDs, indexed by indicator bit. All are lit when driven low.
use super::PinDef;
use super::{PinMode, Port};

/// Bit 0: green, normal group
pub const GRN: PinDef = PinDef {
    port: Port::B,
    pin: 14,
    mode: PinMode::Output,
};

/// Bit 5: red, normal group
pub const RED: PinDef = PinDef {
    port: Port::B,
    pin: 13,
    mode: PinMode::Output,
};

/// Bit 6: blue, alarm group
pub const BLU: PinDef = PinDef {
    port: Port::B,
    pin: 15,
    mode: PinMode::Output,
};

/// Bit 7: external alarm lamp
pub const LAMP: PinDef = PinDef {
    port: Port::C,
    pin: 6,
    mode: PinMode::Output,
};

/// LED on each indicator bit, `None` where nothing is fitted
pub const BANK: [Option<PinDef>; 8] = [Some(GRN), None, None, None, None, Some(RED), Some(BLU), Some(LAMP)];
