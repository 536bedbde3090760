use embedded_time::duration::Milliseconds;

use super::{Direction, Drive, MotorDriver};
use crate::delay::{BoundedDelay, WaitOutcome};
use crate::error::DriveError;
use crate::interlock::Mode;

/// Foreground policy: cruise forward, back off and turn after a collision.
pub struct Pilot<'a, M> {
    drive: Drive<'a, M>,
    cruise_duty: u32,
    slice: Milliseconds<u32>,
}

impl<'a, M: MotorDriver> Pilot<'a, M> {
    /// `slice` is how long one `step` cruises when nothing happens.
    pub fn new(drive: Drive<'a, M>, cruise_duty: u32, slice: Milliseconds<u32>) -> Self {
        Self {
            drive,
            cruise_duty,
            slice,
        }
    }

    /// One foreground iteration.
    ///
    /// With the latch set this runs the full recovery maneuver and reports `Mode::Alarm`.
    /// Otherwise it drives forward for one slice; a collision during the slice stops the
    /// motors within one delay slice of the latch being set and the step returns early.
    pub fn step<D: BoundedDelay>(&mut self, delay: &mut D) -> Result<Mode, DriveError> {
        let interlock = self.drive.interlock();
        if interlock.is_latched() {
            self.drive.recover(delay)?;
            return Ok(Mode::Alarm);
        }

        match self
            .drive
            .command(Direction::Forward, self.cruise_duty, self.cruise_duty)
        {
            Ok(()) => {}
            // latched between the check above and the command
            Err(DriveError::Interlocked) => return Ok(Mode::Alarm),
            Err(e) => return Err(e),
        }

        if delay.delay_unless(self.slice, || interlock.is_latched()) == WaitOutcome::Interrupted {
            self.drive.stop();
            return Ok(Mode::Alarm);
        }
        Ok(Mode::Normal)
    }

    pub fn drive(&self) -> &Drive<'a, M> {
        &self.drive
    }
}
