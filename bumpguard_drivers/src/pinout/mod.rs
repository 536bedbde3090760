use hal::gpio::{Pin, PinMode, Port};

pub mod bumper;
pub mod driver;
pub mod led;
pub mod servo;

/// Represents the definition of a GPIO pin.
pub struct PinDef {
    /// The port to which the pin belongs (e.g., Port::A, Port::B).
    port: Port,
    /// The pin number within the port, also its EXTI line.
    pin: u8,
    /// The mode of the pin (e.g., Output, Input, Alternate function).
    mode: PinMode,
}

impl PinDef {
    pub const fn new(port: Port, pin: u8, mode: PinMode) -> PinDef {
        PinDef { port, pin, mode }
    }

    pub const fn pin(&self) -> u8 {
        self.pin
    }

    /// Converts the PinDef struct to a configured Pin.
    /// # Example
    /// ```ignore
    /// let mut sleep = pinout::driver::SLEEP.init();
    /// sleep.set_high();
    /// ```
    pub fn init(&self) -> Pin {
        Pin::new(self.port, self.pin, self.mode)
    }
}
