// Integrator constants for the bump-guard firmware.

// Key Features:
// - Timer kernel clock, tick rate, servo and motor carriers expressed as typed `TimerConfig`s
// - Drive duties and recovery hold times
// - Interrupt priorities, bump sensor mask and indicator bit groups

// Detailed Operation:
// Every derived value is computed in a const context. The `const _` assertions at the end
// of the file turn an inconsistent edit (a tick rate the prescaler cannot produce, indicator
// groups that overlap, a priority order that lets the tick preempt the collision handler)
// into a build failure.

use embedded_time::duration::Milliseconds;
use embedded_time::rate::Hertz;

use crate::regs::{ClockSource, IrqPriority, TimerConfig};

/// Timer kernel clock (APB1 timers at full SYSCLK on the STM32G431)
pub const TIMER_CLOCK: Hertz = Hertz(170_000_000);

// ---------------------------------------------------------------------------------------------
// Periodic tick
// ---------------------------------------------------------------------------------------------

pub const TICK_FREQUENCY: Hertz = Hertz(10);
/// 170 MHz / 17 000 = 10 kHz counter
pub const TICK_PRESCALE: u32 = 17_000;
pub const TICK_PERIOD_TICKS: u32 = period_for(TIMER_CLOCK, TICK_PRESCALE, TICK_FREQUENCY);
pub const TICK_TIMER: TimerConfig =
    TimerConfig::new_const(ClockSource::Kernel, TICK_PRESCALE, TICK_PERIOD_TICKS);

// ---------------------------------------------------------------------------------------------
// Servo carrier (two channels, 1 us resolution)
// ---------------------------------------------------------------------------------------------

pub const SERVO_CARRIER: Hertz = Hertz(50);
pub const SERVO_PRESCALE: u32 = 170;
pub const SERVO_PERIOD_TICKS: u32 = period_for(TIMER_CLOCK, SERVO_PRESCALE, SERVO_CARRIER);
pub const SERVO_TIMER: TimerConfig =
    TimerConfig::new_const(ClockSource::Kernel, SERVO_PRESCALE, SERVO_PERIOD_TICKS);
pub const SERVO_DUTY_INITIAL: [u32; 2] = [0, 0];
/// Pulse width for the 0 degree end of travel
pub const SERVO_POSITION_0_DEG: u32 = 567;
/// Pulse width for the 180 degree end of travel
pub const SERVO_POSITION_180_DEG: u32 = 2_333;
/// Time between servo sweeps, also the length of one cruise slice in the foreground loop
pub const SERVO_DWELL: Milliseconds<u32> = Milliseconds(5_000);

// ---------------------------------------------------------------------------------------------
// Motor carrier (H-bridge inputs)
// ---------------------------------------------------------------------------------------------

pub const MOTOR_PRESCALE: u32 = 1;
pub const MOTOR_PERIOD_TICKS: u32 = 15_000;
pub const MOTOR_TIMER: TimerConfig =
    TimerConfig::new_const(ClockSource::Kernel, MOTOR_PRESCALE, MOTOR_PERIOD_TICKS);
pub const MOTOR_DUTY_INITIAL: [u32; 2] = [0, 0];

/// 50 % duty, normal forward cruise
pub const CRUISE_DUTY: u32 = MOTOR_PERIOD_TICKS / 2;
/// 30 % duty, recovery reverse
pub const REVERSE_DUTY: u32 = MOTOR_PERIOD_TICKS * 3 / 10;
/// 10 % duty, recovery turn
pub const TURN_DUTY: u32 = MOTOR_PERIOD_TICKS / 10;

// Recovery maneuver hold times
pub const RECOVERY_SETTLE: Milliseconds<u32> = Milliseconds(2_000);
pub const RECOVERY_REVERSE: Milliseconds<u32> = Milliseconds(3_000);
pub const RECOVERY_PAUSE: Milliseconds<u32> = Milliseconds(1_000);
pub const RECOVERY_TURN: Milliseconds<u32> = Milliseconds(5_000);

// ---------------------------------------------------------------------------------------------
// Interrupts and I/O groups
// ---------------------------------------------------------------------------------------------

pub const TICK_PRIORITY: IrqPriority = IrqPriority::level_const(2);
pub const COLLISION_PRIORITY: IrqPriority = IrqPriority::level_const(3);

/// Six bump switches on sensor bits 0..=5
pub const BUMP_SENSOR_MASK: u8 = 0x3F;
/// Indicators toggled while driving normally
pub const NORMAL_INDICATORS: u8 = 0x21;
/// Indicators toggled while the collision latch is set
pub const ALARM_INDICATORS: u8 = 0xC0;

/// Period in effective ticks that produces `rate` from `clock` after `prescale`.
pub const fn period_for(clock: Hertz, prescale: u32, rate: Hertz) -> u32 {
    clock.0 / prescale / rate.0
}

const _: () = assert!(COLLISION_PRIORITY.preempts(TICK_PRIORITY));
const _: () = assert!(NORMAL_INDICATORS & ALARM_INDICATORS == 0);
const _: () = assert!(NORMAL_INDICATORS != 0 && ALARM_INDICATORS != 0);
const _: () = assert!(BUMP_SENSOR_MASK != 0);
const _: () = assert!(TICK_TIMER.overflow_rate(TIMER_CLOCK).0 == TICK_FREQUENCY.0);
const _: () = assert!(SERVO_TIMER.overflow_rate(TIMER_CLOCK).0 == SERVO_CARRIER.0);
const _: () = assert!(SERVO_POSITION_180_DEG <= SERVO_PERIOD_TICKS);
const _: () = assert!(CRUISE_DUTY <= MOTOR_PERIOD_TICKS);
