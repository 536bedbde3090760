// Implements the collision latch and the mode-dependent indicator task.

// Key Features:
// - `InterlockState`: one-shot latch plus the sensor vector that set it, lock-free
// - Set only by the collision handler, cleared only with a `RecoveryComplete` token
// - `CollisionLatch`: the bump handler that sets the latch (first event wins)
// - `IndicatorTask`: the tick handler that blinks the normal or alarm indicator group

// Detailed Operation:
// The collision interrupt is the only writer that sets the latch and runs at the highest
// priority in the system, so a plain load/store pair cannot race with another setter. The
// vector is stored before the flag is published with `Release`; readers load the flag with
// `Acquire` and therefore see the matching vector.
// The foreground clears the latch only after the recovery maneuver finished; the collision
// interrupt cannot observe a half-cleared state because clearing is a single store.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::error::{ConfigError, Result};
use crate::event_source::{BumpHandler, BumpVector};
use crate::tick_source::TickHandler;

/// Operating mode derived from the latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Normal,
    Alarm,
}

/// Proof that the recovery maneuver ran to completion.
///
/// Only the recovery routine can create one, so nothing else can clear the latch.
#[derive(Debug)]
pub struct RecoveryComplete {
    _private: (),
}

impl RecoveryComplete {
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }
}

/// Collision latch shared by the collision handler, the tick handler and the foreground.
#[derive(Debug)]
pub struct InterlockState {
    collision_latched: AtomicBool,
    vector: AtomicU8,
}

impl InterlockState {
    pub const fn new() -> Self {
        Self {
            collision_latched: AtomicBool::new(false),
            vector: AtomicU8::new(0),
        }
    }

    /// Set the latch. Returns false (and changes nothing) if it was already set.
    pub fn latch(&self, vector: BumpVector) -> bool {
        if self.collision_latched.load(Ordering::Acquire) {
            return false;
        }
        self.vector.store(vector.bits(), Ordering::Relaxed);
        self.collision_latched.store(true, Ordering::Release);
        true
    }

    #[inline(always)]
    pub fn is_latched(&self) -> bool {
        self.collision_latched.load(Ordering::Acquire)
    }

    #[inline(always)]
    pub fn mode(&self) -> Mode {
        if self.is_latched() {
            Mode::Alarm
        } else {
            Mode::Normal
        }
    }

    /// Vector that caused the current latch, if latched.
    pub fn latched_vector(&self) -> Option<BumpVector> {
        if self.is_latched() {
            Some(BumpVector::new(self.vector.load(Ordering::Relaxed)))
        } else {
            None
        }
    }

    /// End the episode. Consumes the token returned by the recovery routine.
    pub fn clear(&self, _done: RecoveryComplete) {
        self.collision_latched.store(false, Ordering::Release);
    }
}

impl Default for InterlockState {
    fn default() -> Self {
        Self::new()
    }
}

/// Bump handler that latches the first collision of an episode.
pub struct CollisionLatch<'a> {
    interlock: &'a InterlockState,
}

impl<'a> CollisionLatch<'a> {
    pub fn new(interlock: &'a InterlockState) -> Self {
        Self { interlock }
    }
}

impl BumpHandler for CollisionLatch<'_> {
    fn on_bump(&mut self, vector: BumpVector) {
        if self.interlock.latch(vector) {
            log_warn!("Collision detected: sensors {:#x}", vector.bits());
        }
    }
}

/// Output port holding the indicator LEDs.
pub trait IndicatorOutputs {
    fn toggle_bits(&mut self, mask: u8);
    fn clear_bits(&mut self, mask: u8);
}

/// Normal and alarm indicator groups, validated disjoint and non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorSets {
    normal: u8,
    alarm: u8,
}

impl IndicatorSets {
    pub const fn new(normal: u8, alarm: u8) -> Result<Self> {
        if normal == 0 || alarm == 0 || normal & alarm != 0 {
            Err(ConfigError::OverlappingIndicators { normal, alarm })
        } else {
            Ok(Self { normal, alarm })
        }
    }

    pub const fn normal(&self) -> u8 {
        self.normal
    }

    pub const fn alarm(&self) -> u8 {
        self.alarm
    }
}

/// Tick handler: blinks the group for the current mode and holds the other group off.
pub struct IndicatorTask<'a, O> {
    interlock: &'a InterlockState,
    outputs: O,
    sets: IndicatorSets,
}

impl<'a, O: IndicatorOutputs> IndicatorTask<'a, O> {
    pub fn new(interlock: &'a InterlockState, mut outputs: O, sets: IndicatorSets) -> Self {
        outputs.clear_bits(sets.normal | sets.alarm);
        Self {
            interlock,
            outputs,
            sets,
        }
    }

    pub fn outputs(&self) -> &O {
        &self.outputs
    }
}

impl<O: IndicatorOutputs> TickHandler for IndicatorTask<'_, O> {
    fn on_tick(&mut self) {
        match self.interlock.mode() {
            Mode::Normal => {
                self.outputs.clear_bits(self.sets.alarm);
                self.outputs.toggle_bits(self.sets.normal);
            }
            Mode::Alarm => {
                self.outputs.clear_bits(self.sets.normal);
                self.outputs.toggle_bits(self.sets.alarm);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimIndicators;

    #[test]
    fn test_latch_is_one_shot() {
        let state = InterlockState::new();
        assert_eq!(state.mode(), Mode::Normal);
        assert_eq!(state.latched_vector(), None);

        assert!(state.latch(BumpVector::new(0x21)));
        assert!(!state.latch(BumpVector::new(0x02)));
        assert_eq!(state.mode(), Mode::Alarm);
        assert_eq!(state.latched_vector(), Some(BumpVector::new(0x21)));
    }

    #[test]
    fn test_latch_monotonic_until_cleared() {
        let state = InterlockState::new();
        let mut handler = CollisionLatch::new(&state);
        handler.on_bump(BumpVector::new(0x10));
        for bits in 0..=u8::MAX {
            handler.on_bump(BumpVector::new(bits));
            assert!(state.is_latched());
            assert_eq!(state.latched_vector(), Some(BumpVector::new(0x10)));
        }

        state.clear(RecoveryComplete::new());
        assert!(!state.is_latched());
        handler.on_bump(BumpVector::new(0x08));
        assert_eq!(state.latched_vector(), Some(BumpVector::new(0x08)));
    }

    #[test]
    fn test_indicator_sets_validation() {
        assert!(IndicatorSets::new(0x21, 0xC0).is_ok());
        assert_eq!(
            IndicatorSets::new(0x21, 0x01),
            Err(ConfigError::OverlappingIndicators {
                normal: 0x21,
                alarm: 0x01
            })
        );
        assert!(IndicatorSets::new(0, 0xC0).is_err());
    }

    #[test]
    fn test_indicators_mutually_exclusive() {
        let state = InterlockState::new();
        let port = SimIndicators::new();
        let sets = IndicatorSets::new(0x21, 0xC0).unwrap();
        let mut task = IndicatorTask::new(&state, &port, sets);

        for tick in 0..40 {
            if tick == 13 {
                state.latch(BumpVector::new(0x01));
            }
            if tick == 29 {
                state.clear(RecoveryComplete::new());
            }
            task.on_tick();
            let level = port.level();
            match state.mode() {
                Mode::Normal => assert_eq!(level & 0xC0, 0, "tick {}", tick),
                Mode::Alarm => assert_eq!(level & 0x21, 0, "tick {}", tick),
            }
        }
    }

    #[test]
    fn test_normal_group_blinks() {
        let state = InterlockState::new();
        let port = SimIndicators::new();
        let mut task = IndicatorTask::new(&state, &port, IndicatorSets::new(0x21, 0xC0).unwrap());
        task.on_tick();
        assert_eq!(port.level(), 0x21);
        task.on_tick();
        assert_eq!(port.level(), 0x00);
    }

    #[test]
    fn test_bits_outside_groups_are_untouched() {
        let state = InterlockState::new();
        let port = SimIndicators::new();
        port.set_level(0x12);
        let mut task = IndicatorTask::new(&state, &port, IndicatorSets::new(0x21, 0xC0).unwrap());
        state.latch(BumpVector::new(0x01));
        task.on_tick();
        assert_eq!(port.level(), 0x12 | 0xC0);
    }
}
