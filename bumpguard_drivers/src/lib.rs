// STM32G431 bindings for the bump-guard core.

// Key Features:
// - TIM4 as the periodic tick timer
// - TIM2 (motor H-bridge inputs) and TIM3 (servos) as two-channel PWM carriers
// - Six bump switches on PC10..PC15 sharing the EXTI15_10 interrupt
// - Eight-bit indicator LED bank, H-bridge motor driver, SysTick delay

// Every type here implements one hardware trait of `bumpguard_algo`; none of them decides
// anything on its own.

#![no_std]

pub mod bumpers;
pub mod delay;
pub mod indicators;
pub mod motors;
pub mod pinout;
pub mod pwm;
pub mod tick_timer;
