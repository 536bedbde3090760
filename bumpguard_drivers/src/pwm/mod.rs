// Two-channel PWM carriers: TIM2 drives the H-bridge inputs, TIM3 the servos.

// Both timers run edge-aligned, up-counting, with ARR and CCR preload enabled, so duty and
// period writes are picked up at the next update event and never cut a pulse short.

use hal::{
    clocks::Clocks,
    pac::{TIM2, TIM3},
    timer::{
        Alignment, CaptureCompareDma, CountDir, OutputCompare, Polarity as HalPolarity,
        TimChannel, Timer, TimerConfig as HalTimerConfig, UpdateReqSrc,
    },
};

use bumpguard_algo::pwm_channels::{Polarity, PwmChannelId, PwmTimer};
use bumpguard_algo::regs::TimerConfig;

use super::pinout;

fn hal_channel(channel: PwmChannelId) -> TimChannel {
    match channel {
        PwmChannelId::One => TimChannel::C1,
        PwmChannelId::Two => TimChannel::C2,
    }
}

fn hal_polarity(polarity: Polarity) -> HalPolarity {
    match polarity {
        Polarity::ActiveHigh => HalPolarity::ActiveHigh,
        Polarity::ActiveLow => HalPolarity::ActiveLow,
    }
}

fn carrier_config() -> HalTimerConfig {
    HalTimerConfig {
        one_pulse_mode: false,
        update_request_source: UpdateReqSrc::Any,
        auto_reload_preload: true,
        alignment: Alignment::Edge,
        capture_compare_dma: CaptureCompareDma::Update,
        direction: CountDir::Up,
    }
}

macro_rules! pwm_carrier {
    ($name:ident, $TIM:ident, $new:ident, $max_compare:expr, $out_1:expr, $out_2:expr) => {
        pub struct $name {
            tim: Timer<$TIM>,
        }

        impl $name {
            /// Take the timer and route both compare outputs to their pins. The carrier is
            /// programmed by `PwmGenerator::init`.
            pub fn new(regs: $TIM, clock_cfg: &Clocks, config: &TimerConfig) -> Self {
                let freq = config.overflow_rate(bumpguard_algo::config::TIMER_CLOCK).0 as f32;
                let mut timer = Timer::$new(regs, freq, carrier_config(), clock_cfg);
                timer.disable();
                $out_1.init();
                $out_2.init();
                $name { tim: timer }
            }

            pub fn get_timer(&mut self) -> &mut Timer<$TIM> {
                &mut self.tim
            }
        }

        impl PwmTimer for $name {
            const MAX_COMPARE: u32 = $max_compare;

            fn halt(&mut self) {
                self.tim.disable();
            }

            fn configure_carrier(&mut self, config: &TimerConfig) {
                self.tim.set_prescaler(config.prescale.register_value());
                self.tim.set_auto_reload(config.compare_value() as u32);
                self.tim.reset_count();
            }

            fn write_compare(&mut self, channel: PwmChannelId, ticks: u32) {
                self.tim.set_duty(hal_channel(channel), ticks);
            }

            fn enable_output(&mut self, channel: PwmChannelId, polarity: Polarity) {
                let ch = hal_channel(channel);
                self.tim.enable_pwm_output(ch, OutputCompare::Pwm1, 0.0);
                self.tim.set_polarity(ch, hal_polarity(polarity));
            }

            fn start(&mut self) {
                // UG copies the preloaded ARR and CCR values into the active registers
                self.tim.reinitialize();
                self.tim.enable();
            }
        }
    };
}

// TIM2 is a 32-bit timer, TIM3 has 16-bit CCR registers
pwm_carrier!(MotorPwm, TIM2, new_tim2, u32::MAX, pinout::driver::PWM_LEFT, pinout::driver::PWM_RIGHT);
pwm_carrier!(ServoPwm, TIM3, new_tim3, 0xFFFF, pinout::servo::SERVO_1, pinout::servo::SERVO_2);
