use super::{PwmGenerator, PwmTimer};
use crate::error::Result;

/// Moves both servo channels together between two end positions, one step per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoSweep {
    positions: [u32; 2],
    next: usize,
}

impl ServoSweep {
    pub const fn new(first: u32, second: u32) -> Self {
        Self {
            positions: [first, second],
            next: 0,
        }
    }

    /// Queue the next position on both channels and return it.
    ///
    /// A position the carrier cannot represent is reported and the sweep does not advance.
    pub fn advance<P: PwmTimer>(&mut self, pwm: &mut PwmGenerator<P>) -> Result<u32> {
        let target = self.positions[self.next];
        pwm.set_duties(target, target)?;
        self.next ^= 1;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SERVO_POSITION_0_DEG, SERVO_POSITION_180_DEG, SERVO_TIMER};
    use crate::pwm_channels::PwmChannelId;
    use crate::regs::{ClockSource, TimerConfig};
    use crate::sim::SimPwmTimer;

    #[test]
    fn test_sweep_alternates() {
        let sim = SimPwmTimer::new();
        let mut pwm = PwmGenerator::init(&sim, SERVO_TIMER, 0, 0)
            .map_err(|(e, _)| e)
            .unwrap();
        let mut sweep = ServoSweep::new(SERVO_POSITION_0_DEG, SERVO_POSITION_180_DEG);

        assert_eq!(sweep.advance(&mut pwm), Ok(567));
        assert_eq!(pwm.duty(PwmChannelId::Two), 567);
        assert_eq!(sweep.advance(&mut pwm), Ok(2_333));
        assert_eq!(sweep.advance(&mut pwm), Ok(567));
    }

    #[test]
    fn test_unreachable_position_does_not_advance() {
        let sim = SimPwmTimer::new();
        let carrier = TimerConfig::new(ClockSource::Kernel, 1, 1_000).unwrap();
        let mut pwm = PwmGenerator::init(&sim, carrier, 0, 0)
            .map_err(|(e, _)| e)
            .unwrap();
        let mut sweep = ServoSweep::new(500, 2_333);

        assert_eq!(sweep.advance(&mut pwm), Ok(500));
        assert!(sweep.advance(&mut pwm).is_err());
        assert!(sweep.advance(&mut pwm).is_err());
        assert_eq!(pwm.duty(PwmChannelId::One), 500);
    }
}
