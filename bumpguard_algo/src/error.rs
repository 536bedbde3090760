//! Error types for configuration and drive commands.

use core::fmt;

use crate::pwm_channels::PwmChannelId;

/// Result type for configuration and update operations
pub type Result<T> = core::result::Result<T, ConfigError>;

/// Configuration errors, reported synchronously to the caller.
///
/// Nothing in this crate clamps an out-of-range value; the caller gets one of these instead
/// and the affected peripheral keeps its previous (or halted) state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A timer period of zero ticks
    ZeroPeriod,
    /// Period does not fit the reload register, or full-on duty does not fit the compare register
    PeriodTooLong { ticks: u32, max: u32 },
    /// Prescale divisor outside `1..=65_536`
    InvalidPrescale { divisor: u32 },
    /// Duty cycle larger than the carrier period
    DutyOutOfRange {
        channel: PwmChannelId,
        duty: u32,
        period: u32,
    },
    /// Interrupt source started without a handler
    UnboundCallback,
    /// Event source started with an empty sensor mask
    NoMonitoredInputs,
    /// Normal and alarm indicator groups share output bits (or one is empty)
    OverlappingIndicators { normal: u8, alarm: u8 },
    /// Interrupt priority outside the supported levels
    InvalidPriority { level: u8 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroPeriod => write!(f, "period must be at least one tick"),
            ConfigError::PeriodTooLong { ticks, max } => {
                write!(f, "period of {} ticks exceeds the {} tick maximum", ticks, max)
            }
            ConfigError::InvalidPrescale { divisor } => {
                write!(f, "prescale divisor {} is not in 1..=65536", divisor)
            }
            ConfigError::DutyOutOfRange {
                channel,
                duty,
                period,
            } => write!(
                f,
                "duty {} on {:?} is outside 0..={}",
                duty, channel, period
            ),
            ConfigError::UnboundCallback => write!(f, "no handler bound to interrupt source"),
            ConfigError::NoMonitoredInputs => write!(f, "no sensor inputs selected"),
            ConfigError::OverlappingIndicators { normal, alarm } => write!(
                f,
                "indicator groups {:#x} and {:#x} must be disjoint and non-empty",
                normal, alarm
            ),
            ConfigError::InvalidPriority { level } => {
                write!(f, "interrupt priority {} is not supported", level)
            }
        }
    }
}

/// Reasons a drive command was not passed to the motors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveError {
    /// The collision latch is set; only stop and reverse are allowed
    Interlocked,
    /// The motor driver rejected the duty values
    Config(ConfigError),
}

impl From<ConfigError> for DriveError {
    fn from(err: ConfigError) -> Self {
        DriveError::Config(err)
    }
}

impl fmt::Display for DriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveError::Interlocked => write!(f, "command blocked by collision interlock"),
            DriveError::Config(e) => write!(f, "motor driver error: {}", e),
        }
    }
}
