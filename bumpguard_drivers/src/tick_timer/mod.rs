// Implements the periodic tick timer on TIM4.

// Detailed Operation:
// The timer is created halted. `configure` writes PSC and ARR and forces an update event so
// both take effect immediately; the update request source is limited to counter overflow,
// so that forced update does not set the interrupt flag. The NVIC side of the interrupt is
// owned by the RTIC binding; this driver only gates the update interrupt enable (UIE).

use hal::{
    clocks::Clocks,
    pac::TIM4,
    timer::{
        Alignment, CaptureCompareDma, CountDir, Timer, TimerConfig as HalTimerConfig,
        TimerInterrupt, UpdateReqSrc,
    },
};

use bumpguard_algo::config::TICK_FREQUENCY;
use bumpguard_algo::regs::{ClockSource, IrqPriority, TimerConfig};
use bumpguard_algo::tick_source::TickTimer;

pub struct TickTim4 {
    tim: Timer<TIM4>,
}

impl TickTim4 {
    pub fn new(tim4: TIM4, clock_cfg: &Clocks) -> Self {
        let mut timer = Timer::new_tim4(
            tim4,
            TICK_FREQUENCY.0 as f32,
            HalTimerConfig {
                one_pulse_mode: false,
                update_request_source: UpdateReqSrc::OverUnderFlow,
                auto_reload_preload: true,
                alignment: Alignment::Edge,
                capture_compare_dma: CaptureCompareDma::Update,
                direction: CountDir::Up,
            },
            clock_cfg,
        );
        timer.disable();
        TickTim4 { tim: timer }
    }

    pub fn get_timer(&mut self) -> &mut Timer<TIM4> {
        &mut self.tim
    }

    fn select_clock(&mut self, source: ClockSource) {
        // External clock mode 2: count rising edges on ETR
        match source {
            ClockSource::Kernel => self.tim.regs.smcr.modify(|_, w| w.ece().clear_bit()),
            ClockSource::External => self.tim.regs.smcr.modify(|_, w| w.ece().set_bit()),
        }
    }
}

impl TickTimer for TickTim4 {
    fn halt(&mut self) {
        self.tim.disable();
    }

    fn configure(&mut self, config: &TimerConfig) {
        self.select_clock(config.clock_source);
        self.tim.set_prescaler(config.prescale.register_value());
        self.tim.set_auto_reload(config.compare_value() as u32);
        self.tim.reset_count();
        self.tim.reinitialize();
    }

    fn clear_pending(&mut self) {
        self.tim.clear_interrupt(TimerInterrupt::Update);
    }

    fn enable_interrupt(&mut self, priority: IrqPriority) {
        defmt::debug!("TIM4 update interrupt at priority {}", priority.level());
        self.tim.enable_interrupt(TimerInterrupt::Update);
    }

    fn disable_interrupt(&mut self) {
        self.tim.disable_interrupt(TimerInterrupt::Update);
    }

    fn start_repeating(&mut self) {
        self.tim.enable();
    }
}
