// End-to-end collision scenarios on simulated hardware.
//
// Tick source, event source, interlock, indicators and drive are wired the same way the
// firmware wires them; interrupts are delivered by polling the simulated request lines.

use bumpguard_algo::config::{
    ALARM_INDICATORS, BUMP_SENSOR_MASK, COLLISION_PRIORITY, CRUISE_DUTY, MOTOR_PERIOD_TICKS,
    NORMAL_INDICATORS, TICK_PRIORITY,
};
use bumpguard_algo::drive::{Direction, Drive, Pilot};
use bumpguard_algo::event_source::{BumpVector, EventSource};
use bumpguard_algo::interlock::{CollisionLatch, IndicatorSets, IndicatorTask};
use bumpguard_algo::sim::{MotorCommand, SimBumpers, SimDelay, SimIndicators, SimMotors, SimTickTimer};
use bumpguard_algo::tick_source::TickSource;
use bumpguard_algo::{DriveError, InterlockState, Mode};
use embedded_time::duration::Milliseconds;

const TICK_PERIOD: u32 = 10;

#[test]
fn collision_switches_indicators_and_blocks_forward() {
    let interlock = InterlockState::new();
    let timer = SimTickTimer::new();
    let port = SimIndicators::new();
    let bumpers = SimBumpers::new();
    let motors = SimMotors::new(MOTOR_PERIOD_TICKS);

    let sets = IndicatorSets::new(NORMAL_INDICATORS, ALARM_INDICATORS).unwrap();
    let mut tick = TickSource::builder(&timer)
        .period(TICK_PERIOD)
        .priority(TICK_PRIORITY)
        .bind(IndicatorTask::new(&interlock, &port, sets))
        .start()
        .map_err(|(e, _)| e)
        .unwrap();
    let mut events = EventSource::builder(&bumpers)
        .monitor(BUMP_SENSOR_MASK)
        .priority(COLLISION_PRIORITY)
        .bind(CollisionLatch::new(&interlock))
        .start()
        .map_err(|(e, _)| e)
        .unwrap();
    let mut drive = Drive::new(&motors, &interlock);

    const T: u32 = 6;
    let mut history = Vec::new();
    for n in 1..=20u32 {
        for _ in 0..TICK_PERIOD {
            timer.clock();
        }
        assert!(timer.irq_requested());
        tick.on_interrupt();
        history.push(port.level());

        if n == T {
            bumpers.press(0x21);
            assert!(bumpers.irq_requested());
            assert!(events.on_interrupt());
            assert!(interlock.is_latched());
        }
    }

    assert_eq!(interlock.latched_vector(), Some(BumpVector::new(0x21)));
    assert_eq!(interlock.mode(), Mode::Alarm);

    for (i, level) in history.iter().enumerate() {
        let n = i as u32 + 1;
        if n <= T {
            assert_eq!(level & ALARM_INDICATORS, 0, "tick {}", n);
            let expected = if n % 2 == 1 { NORMAL_INDICATORS } else { 0 };
            assert_eq!(level & NORMAL_INDICATORS, expected, "tick {}", n);
        } else {
            // alarm group toggles from the tick right after the collision
            assert_eq!(level & NORMAL_INDICATORS, 0, "tick {}", n);
            let expected = if (n - T) % 2 == 1 { ALARM_INDICATORS } else { 0 };
            assert_eq!(level & ALARM_INDICATORS, expected, "tick {}", n);
        }
    }

    assert_eq!(
        drive.command(Direction::Forward, CRUISE_DUTY, CRUISE_DUTY),
        Err(DriveError::Interlocked)
    );
    assert_eq!(
        drive.command(Direction::Left, CRUISE_DUTY, CRUISE_DUTY),
        Err(DriveError::Interlocked)
    );
    assert!(motors.log().is_empty());

    let mut delay = SimDelay::new();
    drive.recover(&mut delay).unwrap();
    assert_eq!(interlock.mode(), Mode::Normal);
    assert_eq!(drive.command(Direction::Forward, CRUISE_DUTY, CRUISE_DUTY), Ok(()));

    // the next tick returns to the normal group
    for _ in 0..TICK_PERIOD {
        timer.clock();
    }
    tick.on_interrupt();
    assert_eq!(port.level() & ALARM_INDICATORS, 0);
}

#[test]
fn second_collision_during_recovery_is_ignored() {
    let interlock = InterlockState::new();
    let bumpers = SimBumpers::new();
    let motors = SimMotors::new(MOTOR_PERIOD_TICKS);
    let mut events = EventSource::builder(&bumpers)
        .monitor(BUMP_SENSOR_MASK)
        .priority(COLLISION_PRIORITY)
        .bind(CollisionLatch::new(&interlock))
        .start()
        .map_err(|(e, _)| e)
        .unwrap();
    let mut drive = Drive::new(&motors, &interlock);

    bumpers.press(0x01);
    events.on_interrupt();
    bumpers.release(0x01);

    {
        let mut delay = SimDelay::new();
        delay.schedule(4_000, || {
            bumpers.press(0x08);
            assert!(events.on_interrupt());
            assert_eq!(interlock.latched_vector(), Some(BumpVector::new(0x01)));
        });
        drive.recover(&mut delay).unwrap();
        assert_eq!(delay.elapsed_ms(), 13_000);
    }

    // the latch cleared at the end of the maneuver and kept the first vector until then
    assert!(!interlock.is_latched());
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
fn collision_during_cruise_stops_within_a_millisecond() {
    let interlock = InterlockState::new();
    let bumpers = SimBumpers::new();
    let motors = SimMotors::new(MOTOR_PERIOD_TICKS);
    let mut events = EventSource::builder(&bumpers)
        .monitor(BUMP_SENSOR_MASK)
        .priority(COLLISION_PRIORITY)
        .bind(CollisionLatch::new(&interlock))
        .start()
        .map_err(|(e, _)| e)
        .unwrap();
    let mut pilot = Pilot::new(Drive::new(&motors, &interlock), CRUISE_DUTY, Milliseconds(5_000));

    let mut delay = SimDelay::new();
    delay.schedule(7_300, || {
        bumpers.press(0x02);
        events.on_interrupt();
    });

    assert_eq!(pilot.step(&mut delay), Ok(Mode::Normal));
    assert!(motors.is_moving());
    assert_eq!(pilot.step(&mut delay), Ok(Mode::Alarm));
    assert!(delay.elapsed_ms() - 7_300 <= 1);
    assert_eq!(motors.last(), Some(MotorCommand::Stop));

    assert_eq!(pilot.step(&mut delay), Ok(Mode::Alarm));
    assert!(!interlock.is_latched());
    assert_eq!(pilot.step(&mut delay), Ok(Mode::Normal));
    assert_eq!(
        motors.last(),
        Some(MotorCommand::Drive(Direction::Forward, CRUISE_DUTY, CRUISE_DUTY))
    );
}
