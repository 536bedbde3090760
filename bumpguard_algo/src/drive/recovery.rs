use embedded_time::duration::Milliseconds;

use super::Direction;
use crate::config::{RECOVERY_PAUSE, RECOVERY_REVERSE, RECOVERY_SETTLE, RECOVERY_TURN, REVERSE_DUTY, TURN_DUTY};

/// One motor action of the recovery maneuver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maneuver {
    Stop,
    /// Both wheels at `duty` in `direction`
    Move { direction: Direction, duty: u32 },
}

/// A maneuver held for a fixed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryStep {
    pub maneuver: Maneuver,
    pub hold: Milliseconds<u32>,
}

/// Stop, back off, pause, turn away, settle.
pub const RECOVERY_STEPS: [RecoveryStep; 5] = [
    RecoveryStep {
        maneuver: Maneuver::Stop,
        hold: RECOVERY_SETTLE,
    },
    RecoveryStep {
        maneuver: Maneuver::Move {
            direction: Direction::Backward,
            duty: REVERSE_DUTY,
        },
        hold: RECOVERY_REVERSE,
    },
    RecoveryStep {
        maneuver: Maneuver::Stop,
        hold: RECOVERY_PAUSE,
    },
    RecoveryStep {
        maneuver: Maneuver::Move {
            direction: Direction::Right,
            duty: TURN_DUTY,
        },
        hold: RECOVERY_TURN,
    },
    RecoveryStep {
        maneuver: Maneuver::Stop,
        hold: RECOVERY_SETTLE,
    },
];

/// Total time the maneuver keeps the robot busy.
pub const fn recovery_duration() -> Milliseconds<u32> {
    let mut total = 0;
    let mut i = 0;
    while i < RECOVERY_STEPS.len() {
        total += RECOVERY_STEPS[i].hold.0;
        i += 1;
    }
    Milliseconds(total)
}
