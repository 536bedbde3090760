// Implements the gate between the foreground and the motor driver.

// Key Features:
// - `MotorDriver`: the contract the core needs from an H-bridge (two duties + direction, stop)
// - `Drive`: forwards commands unless the collision latch forbids them
// - `Drive::recover`: runs the recovery maneuver and is the only path that clears the latch

// Detailed Operation:
// While the latch is set, forward and turn commands return `DriveError::Interlocked` without
// reaching the motors. Stop and reverse always pass: they are what recovery is made of.
// `recover` talks to the motors directly, so the gate does not block its own maneuver.

pub mod pilot;
pub mod recovery;

pub use pilot::Pilot;
pub use recovery::{Maneuver, RecoveryStep, RECOVERY_STEPS};

use crate::delay::BoundedDelay;
use crate::error::{DriveError, Result};
use crate::interlock::{InterlockState, RecoveryComplete};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

impl Direction {
    /// Directions refused while the collision latch is set.
    pub const fn is_gated(self) -> bool {
        !matches!(self, Direction::Backward)
    }
}

/// Motor driver contract. Duties are in carrier ticks, `0..=period`.
pub trait MotorDriver {
    /// Apply both duties with the given direction. Out-of-range duties are rejected and the
    /// motors keep their previous command.
    fn drive(&mut self, direction: Direction, left: u32, right: u32) -> Result<()>;
    /// Zero both duties and put the bridge to sleep.
    fn stop(&mut self);
}

pub struct Drive<'a, M> {
    motors: M,
    interlock: &'a InterlockState,
}

impl<'a, M: MotorDriver> Drive<'a, M> {
    pub fn new(motors: M, interlock: &'a InterlockState) -> Self {
        Self { motors, interlock }
    }

    /// Forward a motion command unless the latch forbids it.
    pub fn command(&mut self, direction: Direction, left: u32, right: u32) -> core::result::Result<(), DriveError> {
        if direction.is_gated() && self.interlock.is_latched() {
            log_debug!("drive command {:?} blocked", direction);
            return Err(DriveError::Interlocked);
        }
        self.motors.drive(direction, left, right)?;
        Ok(())
    }

    pub fn stop(&mut self) {
        self.motors.stop();
    }

    /// Run the recovery maneuver and clear the latch once it has finished.
    ///
    /// Collisions reported while it runs do not restart it. If the motor driver rejects a step
    /// the motors are stopped and the latch stays set.
    pub fn recover<D: BoundedDelay>(&mut self, delay: &mut D) -> core::result::Result<(), DriveError> {
        log_info!("Recovery started");
        let done = match self.run_recovery(delay) {
            Ok(done) => done,
            Err(e) => {
                self.motors.stop();
                return Err(e.into());
            }
        };
        self.interlock.clear(done);
        log_info!("Recovery finished, resuming");
        Ok(())
    }

    fn run_recovery<D: BoundedDelay>(&mut self, delay: &mut D) -> Result<RecoveryComplete> {
        for step in RECOVERY_STEPS.iter() {
            match step.maneuver {
                Maneuver::Stop => self.motors.stop(),
                Maneuver::Move { direction, duty } => self.motors.drive(direction, duty, duty)?,
            }
            delay.delay(step.hold);
        }
        Ok(RecoveryComplete::new())
    }

    pub fn interlock(&self) -> &'a InterlockState {
        self.interlock
    }

    pub fn motors(&self) -> &M {
        &self.motors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CRUISE_DUTY, MOTOR_PERIOD_TICKS};
    use crate::error::ConfigError;
    use crate::event_source::BumpVector;
    use crate::sim::{MotorCommand, SimDelay, SimMotors};

    #[test]
    fn test_gate_blocks_forward_and_turns_when_latched() {
        let state = InterlockState::new();
        let motors = SimMotors::new(MOTOR_PERIOD_TICKS);
        let mut drive = Drive::new(&motors, &state);

        drive.command(Direction::Forward, CRUISE_DUTY, CRUISE_DUTY).unwrap();
        state.latch(BumpVector::new(0x01));
        for dir in [Direction::Forward, Direction::Left, Direction::Right] {
            assert_eq!(drive.command(dir, 100, 100), Err(DriveError::Interlocked));
        }
        assert_eq!(drive.command(Direction::Backward, 100, 100), Ok(()));
        drive.stop();

        assert_eq!(
            motors.log(),
            vec![
                MotorCommand::Drive(Direction::Forward, CRUISE_DUTY, CRUISE_DUTY),
                MotorCommand::Drive(Direction::Backward, 100, 100),
                MotorCommand::Stop,
            ]
        );
    }

    #[test]
    fn test_driver_errors_pass_through() {
        let state = InterlockState::new();
        let motors = SimMotors::new(1_000);
        let mut drive = Drive::new(&motors, &state);
        assert_eq!(
            drive.command(Direction::Forward, 1_001, 0),
            Err(DriveError::Config(ConfigError::DutyOutOfRange {
                channel: crate::pwm_channels::PwmChannelId::One,
                duty: 1_001,
                period: 1_000
            }))
        );
        assert!(motors.log().is_empty());
    }

    #[test]
    fn test_recovery_sequence_and_clear() {
        let state = InterlockState::new();
        let motors = SimMotors::new(MOTOR_PERIOD_TICKS);
        let mut drive = Drive::new(&motors, &state);
        let mut delay = SimDelay::new();
        state.latch(BumpVector::new(0x21));

        drive.recover(&mut delay).unwrap();

        assert!(!state.is_latched());
        assert_eq!(delay.elapsed_ms(), 13_000);
        assert_eq!(
            motors.log(),
            vec![
                MotorCommand::Stop,
                MotorCommand::Drive(Direction::Backward, 4_500, 4_500),
                MotorCommand::Stop,
                MotorCommand::Drive(Direction::Right, 1_500, 1_500),
                MotorCommand::Stop,
            ]
        );
    }

    #[test]
    fn test_recovery_failure_keeps_latch() {
        let state = InterlockState::new();
        // Carrier too short for the reverse duty
        let motors = SimMotors::new(1_000);
        let mut drive = Drive::new(&motors, &state);
        let mut delay = SimDelay::new();
        state.latch(BumpVector::new(0x01));

        assert!(drive.recover(&mut delay).is_err());
        assert!(state.is_latched());
        assert_eq!(motors.log().last(), Some(&MotorCommand::Stop));
    }
}
