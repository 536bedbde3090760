//! Motor driver that records every accepted command.

use std::cell::RefCell;

use crate::drive::{Direction, MotorDriver};
use crate::error::{ConfigError, Result};
use crate::pwm_channels::PwmChannelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorCommand {
    /// Direction, left duty, right duty
    Drive(Direction, u32, u32),
    Stop,
}

#[derive(Debug)]
pub struct SimMotors {
    period: u32,
    log: RefCell<Vec<MotorCommand>>,
}

impl SimMotors {
    pub fn new(period: u32) -> Self {
        Self {
            period,
            log: RefCell::new(Vec::new()),
        }
    }

    pub fn log(&self) -> Vec<MotorCommand> {
        self.log.borrow().clone()
    }

    pub fn last(&self) -> Option<MotorCommand> {
        self.log.borrow().last().copied()
    }

    /// True while the last accepted command moves the wheels.
    pub fn is_moving(&self) -> bool {
        matches!(self.last(), Some(MotorCommand::Drive(_, l, r)) if l > 0 || r > 0)
    }
}

impl MotorDriver for &SimMotors {
    fn drive(&mut self, direction: Direction, left: u32, right: u32) -> Result<()> {
        for (channel, duty) in [(PwmChannelId::One, left), (PwmChannelId::Two, right)] {
            if duty > self.period {
                return Err(ConfigError::DutyOutOfRange {
                    channel,
                    duty,
                    period: self.period,
                });
            }
        }
        self.log
            .borrow_mut()
            .push(MotorCommand::Drive(direction, left, right));
        Ok(())
    }

    fn stop(&mut self) {
        self.log.borrow_mut().push(MotorCommand::Stop);
    }
}
