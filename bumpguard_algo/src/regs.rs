// Typed register fields for timers and interrupt lines.

// Key Features:
// - `Prescale` and `PeriodTicks` carry the value a programmer thinks in (a divisor, a tick
//   count) and derive the value the register wants (`divisor - 1`, `ticks - 1`)
// - `IrqPriority` uses logical levels: a larger level preempts a smaller one, 0 is the
//   foreground context
// - `TimerConfig` bundles clock source, prescale and period, and derives the effective
//   tick and overflow rates

// Every constructor validates its range, so an out-of-range value is reported where it is
// written down instead of being silently truncated by a register write.

use embedded_time::rate::Hertz;

use crate::error::{ConfigError, Result};

/// Clock feeding a timer's prescaler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// Internal timer kernel clock (TIMxCLK)
    Kernel,
    /// External clock input (ETR pin)
    External,
}

/// Prescale divisor applied to the source clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Prescale(u32);

impl Prescale {
    pub const MAX: u32 = 65_536;

    pub const fn new(divisor: u32) -> Result<Self> {
        if divisor == 0 || divisor > Self::MAX {
            Err(ConfigError::InvalidPrescale { divisor })
        } else {
            Ok(Self(divisor))
        }
    }

    #[inline(always)]
    pub const fn divisor(self) -> u32 {
        self.0
    }

    /// Value for the PSC register (the counter clock is `source / (PSC + 1)`).
    #[inline(always)]
    pub const fn register_value(self) -> u16 {
        (self.0 - 1) as u16
    }
}

/// Length of one timer period in effective ticks.
///
/// The counter runs `0, 1, .., ticks - 1` and restarts at 0, so the reload register holds
/// `ticks - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeriodTicks(u32);

impl PeriodTicks {
    pub const MAX: u32 = 65_536;

    pub const fn new(ticks: u32) -> Result<Self> {
        if ticks == 0 {
            Err(ConfigError::ZeroPeriod)
        } else if ticks > Self::MAX {
            Err(ConfigError::PeriodTooLong {
                ticks,
                max: Self::MAX,
            })
        } else {
            Ok(Self(ticks))
        }
    }

    #[inline(always)]
    pub const fn ticks(self) -> u32 {
        self.0
    }

    /// Value for the compare/reload register (zero-based count).
    #[inline(always)]
    pub const fn reload_value(self) -> u16 {
        (self.0 - 1) as u16
    }
}

/// Logical interrupt priority. Higher levels preempt lower ones; level 0 is the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrqPriority(u8);

impl IrqPriority {
    /// Levels available with the 4 NVIC priority bits of the Cortex-M4
    pub const MAX_LEVEL: u8 = 15;

    pub const fn new(level: u8) -> Result<Self> {
        if level == 0 || level > Self::MAX_LEVEL {
            Err(ConfigError::InvalidPriority { level })
        } else {
            Ok(Self(level))
        }
    }

    /// Const constructor for configuration tables; an invalid level fails the build.
    pub const fn level_const(level: u8) -> Self {
        match Self::new(level) {
            Ok(p) => p,
            Err(_) => panic!("interrupt priority out of range"),
        }
    }

    #[inline(always)]
    pub const fn level(self) -> u8 {
        self.0
    }

    /// True if an interrupt at `self` can interrupt a handler running at `other`.
    #[inline(always)]
    pub const fn preempts(self, other: IrqPriority) -> bool {
        self.0 > other.0
    }
}

/// Clock source, prescale divisor and period of one hardware timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerConfig {
    pub clock_source: ClockSource,
    pub prescale: Prescale,
    pub period: PeriodTicks,
}

impl TimerConfig {
    pub const fn new(clock_source: ClockSource, prescale_divisor: u32, period_ticks: u32) -> Result<Self> {
        let prescale = match Prescale::new(prescale_divisor) {
            Ok(p) => p,
            Err(e) => return Err(e),
        };
        let period = match PeriodTicks::new(period_ticks) {
            Ok(p) => p,
            Err(e) => return Err(e),
        };
        Ok(Self {
            clock_source,
            prescale,
            period,
        })
    }

    /// Const constructor for configuration tables; an invalid value fails the build.
    pub const fn new_const(clock_source: ClockSource, prescale_divisor: u32, period_ticks: u32) -> Self {
        match Self::new(clock_source, prescale_divisor, period_ticks) {
            Ok(c) => c,
            Err(_) => panic!("timer configuration out of range"),
        }
    }

    #[inline(always)]
    pub const fn period_ticks(&self) -> u32 {
        self.period.ticks()
    }

    /// Value for the compare register that ends the period (`period - 1`).
    #[inline(always)]
    pub const fn compare_value(&self) -> u16 {
        self.period.reload_value()
    }

    /// Counter rate after the prescaler.
    pub const fn tick_rate(&self, source: Hertz) -> Hertz {
        Hertz(source.0 / self.prescale.divisor())
    }

    /// Rate at which the counter wraps (one interrupt or one PWM period per wrap).
    pub const fn overflow_rate(&self, source: Hertz) -> Hertz {
        Hertz(source.0 / self.prescale.divisor() / self.period.ticks())
    }
}
