#![no_main]
#![no_std]

use defmt_rtt as _;
use panic_probe as _;

use hal::{self, clocks::Clocks, pac};

use bumpguard_algo::{
    config,
    drive::{Drive, Pilot},
    event_source::EventSource,
    interlock::{CollisionLatch, IndicatorSets, IndicatorTask},
    pwm_channels::{PwmGenerator, ServoSweep},
    tick_source::TickSource,
    ConfigError, InterlockState, Mode,
};

// RTIC priorities are literals in the task attributes below; keep them in step with config
const _: () = assert!(config::TICK_PRIORITY.level() == 2);
const _: () = assert!(config::COLLISION_PRIORITY.level() == 3);

/// Init cannot continue without a working peripheral; report the error and halt.
fn required<T, R>(result: Result<T, (ConfigError, R)>, what: &str) -> T {
    match result {
        Ok(v) => v,
        Err((e, _)) => defmt::panic!("{} init failed: {}", what, e),
    }
}

#[rtic::app(device = pac, peripherals = true)]
mod app {
    use super::*;

    use bumpguard_drivers::*;

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        tick_source: TickSource<tick_timer::TickTim4, IndicatorTask<'static, indicators::IndicatorBank>>,
        bump_source: EventSource<bumpers::BumperBank, CollisionLatch<'static>>,
        pilot: Pilot<'static, motors::HBridgeMotors>,
        servo: PwmGenerator<pwm::ServoPwm>,
        sweep: ServoSweep,
        delay: delay::SysTickDelay,
    }

    #[init(local = [interlock: InterlockState = InterlockState::new()])]
    fn init(ctx: init::Context) -> (Shared, Local) {
        let dp = ctx.device;
        let cp = ctx.core;
        let interlock: &'static InterlockState = ctx.local.interlock;

        let clock_cfg = Clocks::default();
        if clock_cfg.setup().is_err() {
            defmt::panic!("SYSTEM: clock setup failed");
        }
        defmt::debug!("SYSTEM: Clock frequency is {} MHz", clock_cfg.sysclk() / 1_000_000);
        if clock_cfg.apb1_timer() != config::TIMER_CLOCK.0 {
            defmt::warn!(
                "SYSTEM: timer clock {} Hz, configured for {} Hz",
                clock_cfg.apb1_timer(),
                config::TIMER_CLOCK.0
            );
        }

        let sets = match IndicatorSets::new(config::NORMAL_INDICATORS, config::ALARM_INDICATORS) {
            Ok(s) => s,
            Err(e) => defmt::panic!("indicator groups: {}", e),
        };

        // Collision path first so a bump during the rest of init is not lost
        let bump_source = required(
            EventSource::builder(bumpers::BumperBank::new())
                .monitor(config::BUMP_SENSOR_MASK)
                .priority(config::COLLISION_PRIORITY)
                .bind(CollisionLatch::new(interlock))
                .start(),
            "bump inputs",
        );

        let tick_source = required(
            TickSource::builder(tick_timer::TickTim4::new(dp.TIM4, &clock_cfg))
                .clock_source(config::TICK_TIMER.clock_source)
                .prescale(config::TICK_TIMER.prescale.divisor())
                .period(config::TICK_TIMER.period_ticks())
                .priority(config::TICK_PRIORITY)
                .bind(IndicatorTask::new(interlock, indicators::IndicatorBank::new(), sets))
                .start(),
            "tick timer",
        );

        let motor_pwm = required(
            PwmGenerator::init(
                pwm::MotorPwm::new(dp.TIM2, &clock_cfg, &config::MOTOR_TIMER),
                config::MOTOR_TIMER,
                config::MOTOR_DUTY_INITIAL[0],
                config::MOTOR_DUTY_INITIAL[1],
            ),
            "motor pwm",
        );
        let servo = required(
            PwmGenerator::init(
                pwm::ServoPwm::new(dp.TIM3, &clock_cfg, &config::SERVO_TIMER),
                config::SERVO_TIMER,
                config::SERVO_DUTY_INITIAL[0],
                config::SERVO_DUTY_INITIAL[1],
            ),
            "servo pwm",
        );

        let drive = Drive::new(motors::HBridgeMotors::new(motor_pwm), interlock);
        let pilot = Pilot::new(drive, config::CRUISE_DUTY, config::SERVO_DWELL);
        let sweep = ServoSweep::new(config::SERVO_POSITION_0_DEG, config::SERVO_POSITION_180_DEG);
        let delay = delay::SysTickDelay::new(cp.SYST, clock_cfg.systick());

        defmt::info!("bump-guard running");
        (
            Shared {},
            Local {
                tick_source,
                bump_source,
                pilot,
                servo,
                sweep,
                delay,
            },
        )
    }

    #[idle(local = [pilot, servo, sweep, delay])]
    fn idle(cx: idle::Context) -> ! {
        loop {
            match cx.local.pilot.step(&mut *cx.local.delay) {
                Ok(Mode::Normal) => {
                    if let Err(e) = cx.local.sweep.advance(&mut *cx.local.servo) {
                        defmt::warn!("servo sweep: {}", e);
                    }
                }
                Ok(Mode::Alarm) => {}
                Err(e) => defmt::warn!("drive: {}", e),
            }
        }
    }

    #[task(binds = TIM4, priority = 2, local = [tick_source])]
    fn tim4_tick(cx: tim4_tick::Context) {
        cx.local.tick_source.on_interrupt();
    }

    #[task(binds = EXTI15_10, priority = 3, local = [bump_source])]
    fn exti15_10_bump(cx: exti15_10_bump::Context) {
        cx.local.bump_source.on_interrupt();
    }
}

// same panicking *behavior* as `panic-probe` but doesn't print a panic message
// this prevents the panic message being printed *twice* when `defmt::panic` is invoked
#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}
