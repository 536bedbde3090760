// Implements a two-channel PWM generator sharing one carrier timer.

// Key Features:
// - Shared carrier period, two independently updatable compare channels
// - Duty writes go to the preload (shadow) compare register; hardware latches them at the
//   next period boundary, so a period never mixes two duty values
// - Out-of-range duties are rejected, never clamped, and the previous duty stays in effect
// - Per-channel output polarity

// Detailed Operation:
// `duty = 0` holds the output inactive for the whole period, `duty = period` holds it active.
// Holding it active needs a compare value of `period`, so a carrier is only accepted when
// `period` fits the timer's compare register.
// Initialization halts the timer, validates the carrier and both initial duties, programs
// the carrier, enables both outputs, preloads both compares and finally starts the timer
// with a forced update so the initial duties apply to the very first period.

pub mod sweep;

pub use sweep::ServoSweep;

use crate::error::{ConfigError, Result};
use crate::regs::TimerConfig;

/// Compare channel of the carrier timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmChannelId {
    One,
    Two,
}

impl PwmChannelId {
    pub const ALL: [PwmChannelId; 2] = [PwmChannelId::One, PwmChannelId::Two];

    #[inline(always)]
    pub const fn index(self) -> usize {
        match self {
            PwmChannelId::One => 0,
            PwmChannelId::Two => 1,
        }
    }
}

/// Output level while the counter is below the compare value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

/// Snapshot of one channel's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmChannel {
    pub period_ticks: u32,
    pub duty_ticks: u32,
    pub polarity: Polarity,
}

impl PwmChannel {
    pub fn is_always_off(&self) -> bool {
        self.duty_ticks == 0
    }

    pub fn is_always_on(&self) -> bool {
        self.duty_ticks == self.period_ticks
    }
}

/// Register-level operations the generator needs from a PWM-capable timer.
pub trait PwmTimer {
    /// Largest value the compare registers hold (`0xFFFF` on 16-bit timers).
    const MAX_COMPARE: u32;

    fn halt(&mut self);
    /// Program prescaler and auto-reload (with auto-reload preload enabled).
    fn configure_carrier(&mut self, config: &TimerConfig);
    /// Write the preload compare register; takes effect at the next update event.
    fn write_compare(&mut self, channel: PwmChannelId, ticks: u32);
    fn enable_output(&mut self, channel: PwmChannelId, polarity: Polarity);
    /// Force an update event (latching all preloads) and start counting.
    fn start(&mut self);
}

pub struct PwmGenerator<P> {
    timer: P,
    config: TimerConfig,
    duty: [u32; 2],
    polarity: [Polarity; 2],
}

impl<P: PwmTimer> PwmGenerator<P> {
    /// Start both channels active-high with the given initial duties.
    pub fn init(timer: P, config: TimerConfig, duty_1: u32, duty_2: u32) -> core::result::Result<Self, (ConfigError, P)> {
        Self::init_with_polarity(timer, config, [duty_1, duty_2], [Polarity::ActiveHigh; 2])
    }

    pub fn init_with_polarity(
        mut timer: P,
        config: TimerConfig,
        duty: [u32; 2],
        polarity: [Polarity; 2],
    ) -> core::result::Result<Self, (ConfigError, P)> {
        timer.halt();

        let period = config.period_ticks();
        if period > P::MAX_COMPARE {
            return Err((
                ConfigError::PeriodTooLong {
                    ticks: period,
                    max: P::MAX_COMPARE,
                },
                timer,
            ));
        }
        for ch in PwmChannelId::ALL {
            if let Err(e) = check_duty(ch, duty[ch.index()], period) {
                return Err((e, timer));
            }
        }

        timer.configure_carrier(&config);
        for ch in PwmChannelId::ALL {
            timer.enable_output(ch, polarity[ch.index()]);
            timer.write_compare(ch, duty[ch.index()]);
        }
        timer.start();

        log_info!("pwm started: period {} duty {} / {}", period, duty[0], duty[1]);
        Ok(Self {
            timer,
            config,
            duty,
            polarity,
        })
    }

    /// Queue a new duty for `channel`, applied from the next carrier period.
    pub fn set_duty(&mut self, channel: PwmChannelId, duty_ticks: u32) -> Result<()> {
        self.check_duty(channel, duty_ticks)?;
        self.timer.write_compare(channel, duty_ticks);
        self.duty[channel.index()] = duty_ticks;
        Ok(())
    }

    /// Queue both duties; if either is out of range neither is written.
    pub fn set_duties(&mut self, duty_1: u32, duty_2: u32) -> Result<()> {
        self.check_duty(PwmChannelId::One, duty_1)?;
        self.check_duty(PwmChannelId::Two, duty_2)?;
        self.timer.write_compare(PwmChannelId::One, duty_1);
        self.timer.write_compare(PwmChannelId::Two, duty_2);
        self.duty = [duty_1, duty_2];
        Ok(())
    }

    /// Drive both outputs inactive from the next carrier period.
    pub fn off(&mut self) {
        for ch in PwmChannelId::ALL {
            self.timer.write_compare(ch, 0);
        }
        self.duty = [0, 0];
    }

    pub fn check_duty(&self, channel: PwmChannelId, duty_ticks: u32) -> Result<()> {
        check_duty(channel, duty_ticks, self.period())
    }

    pub fn duty(&self, channel: PwmChannelId) -> u32 {
        self.duty[channel.index()]
    }

    pub fn channel(&self, channel: PwmChannelId) -> PwmChannel {
        PwmChannel {
            period_ticks: self.period(),
            duty_ticks: self.duty[channel.index()],
            polarity: self.polarity[channel.index()],
        }
    }

    #[inline(always)]
    pub fn period(&self) -> u32 {
        self.config.period_ticks()
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn timer(&self) -> &P {
        &self.timer
    }

    /// Halt the carrier and hand back the timer.
    pub fn release(mut self) -> P {
        self.timer.halt();
        self.timer
    }
}

fn check_duty(channel: PwmChannelId, duty: u32, period: u32) -> Result<()> {
    if duty > period {
        Err(ConfigError::DutyOutOfRange {
            channel,
            duty,
            period,
        })
    } else {
        Ok(())
    }
}
