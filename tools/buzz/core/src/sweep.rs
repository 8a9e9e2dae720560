//! Fade-in/out sweeps.
//!
//! One leg of a siren: start at some divider, nudge it by `fade_step` every
//! tick, and silence the pin between ticks for a pulsed, buzzy texture. Then
//! sit quiet for `pause_ms`.
//!
//! Nothing here clamps. Dividers wrap like the 8-bit register they end up in,
//! so a leg that walks out of 1..=255 just sounds wrong. Pick `iterations` and
//! `fade_step` to stay in range; [`SweepSpec::check_range`] can tell you.

use core::fmt;

use embedded_hal::delay::DelayNs;
use log::trace;

use crate::pitch::{Pitch, Prescaler};
use crate::sequencer::Sequencer;
use crate::timer::ToneDriver;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SweepSpec {
    pub start_divider: u8,
    pub prescaler: Prescaler,
    pub iterations: u8,
    /// Tone length of each tick.
    pub step_delay_ms: u8,
    /// Silence after the last tick.
    pub pause_ms: u8,
    /// Added to the divider after every tick. Negative raises the pitch.
    pub fade_step: i8,
}

impl SweepSpec {
    pub const fn new(
        start_divider: u8,
        prescaler: Prescaler,
        iterations: u8,
        step_delay_ms: u8,
        pause_ms: u8,
        fade_step: i8,
    ) -> Self {
        Self { start_divider, prescaler, iterations, step_delay_ms, pause_ms, fade_step }
    }

    /// Divider used on tick `i` (0-based), wrapped to 8 bits.
    #[inline(always)]
    pub const fn divider_at(&self, i: u8) -> u8 {
        (self.start_divider as i32 + i as i32 * self.fade_step as i32) as u8
    }

    pub fn pitches(&self) -> impl Iterator<Item = Pitch> + '_ {
        (0..self.iterations).map(move |i| Pitch::new(self.divider_at(i), self.prescaler))
    }

    /// How long the whole leg takes, pause included.
    pub const fn duration_ms(&self) -> u32 {
        self.iterations as u32 * self.step_delay_ms as u32 + self.pause_ms as u32
    }

    /// Check that every tick's divider is in 1..=255 without wrapping.
    ///
    /// Playback never calls this; it is for legs that come from outside the
    /// built-in tables.
    pub fn check_range(&self) -> Result<(), SweepRangeError> {
        for i in 0..self.iterations {
            let divider = self.start_divider as i32 + i as i32 * self.fade_step as i32;
            if !(1..=255).contains(&divider) {
                return Err(SweepRangeError { iteration: i, divider });
            }
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SweepRangeError {
    pub iteration: u8,
    pub divider: i32,
}

impl fmt::Display for SweepRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {} would use divider {}, outside 1..=255", self.iteration, self.divider)
    }
}

impl core::error::Error for SweepRangeError {}

impl<T: ToneDriver, D: DelayNs> Sequencer<T, D> {
    /// Play one sweep leg, then its pause.
    pub fn sweep(&mut self, leg: &SweepSpec) {
        let mut divider = leg.start_divider;
        for i in 0..leg.iterations {
            trace!("sweep tick {} divider {}", i, divider);
            self.driver_mut().set_tone(Pitch::new(divider, leg.prescaler));
            divider = divider.wrapping_add_signed(leg.fade_step);
            self.wait_mut().block_ms(leg.step_delay_ms as u16);
            self.driver_mut().stop();
        }
        self.wait_mut().block_ms(leg.pause_ms as u16);
    }
}
