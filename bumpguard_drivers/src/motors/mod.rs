// Implements the motor driver contract for a dual H-bridge in PWM + direction mode.

// Detailed Operation:
// TIM2 channel 1 and 2 set the speed of the left and right bridge; DIR_LEFT / DIR_RIGHT
// select reverse when high; SLEEP must be high for the bridges to drive. Duties are
// checked against the carrier before any pin changes, so a rejected command leaves the
// previous one running.

use hal::gpio::Pin;

use bumpguard_algo::drive::{Direction, MotorDriver};
use bumpguard_algo::pwm_channels::{PwmChannelId, PwmGenerator};
use bumpguard_algo::Result;

use super::pinout;
use super::pwm::MotorPwm;

pub struct HBridgeMotors {
    pwm: PwmGenerator<MotorPwm>,
    dir_left: Pin,
    dir_right: Pin,
    sleep: Pin,
}

impl HBridgeMotors {
    /// Take a running motor carrier; the bridges start asleep.
    pub fn new(pwm: PwmGenerator<MotorPwm>) -> Self {
        let mut sleep = pinout::driver::SLEEP.init();
        sleep.set_low();
        HBridgeMotors {
            pwm,
            dir_left: pinout::driver::DIR_LEFT.init(),
            dir_right: pinout::driver::DIR_RIGHT.init(),
            sleep,
        }
    }

    pub fn pwm(&self) -> &PwmGenerator<MotorPwm> {
        &self.pwm
    }

    fn set_reverse(pin: &mut Pin, reverse: bool) {
        if reverse {
            pin.set_high();
        } else {
            pin.set_low();
        }
    }
}

impl MotorDriver for HBridgeMotors {
    fn drive(&mut self, direction: Direction, left: u32, right: u32) -> Result<()> {
        self.pwm.check_duty(PwmChannelId::One, left)?;
        self.pwm.check_duty(PwmChannelId::Two, right)?;

        let (left_rev, right_rev) = match direction {
            Direction::Forward => (false, false),
            Direction::Backward => (true, true),
            Direction::Left => (true, false),
            Direction::Right => (false, true),
        };
        Self::set_reverse(&mut self.dir_left, left_rev);
        Self::set_reverse(&mut self.dir_right, right_rev);
        self.sleep.set_high();
        self.pwm.set_duties(left, right)
    }

    fn stop(&mut self) {
        self.pwm.off();
        self.sleep.set_low();
    }
}
