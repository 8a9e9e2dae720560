//! Single-button alarm.
//!
//! The button is read once, right after reset. Held down, the buzzer sweeps
//! one way and holds; left alone, it sweeps the other way and holds a
//! different note. Then it goes quiet for good. No polling and no debounce.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::debug;

use crate::pitch::Pitch;
use crate::pitch::Prescaler::N64;
use crate::sequencer::Sequencer;
use crate::sweep::SweepSpec;
use crate::timer::ToneDriver;

/// Pressed: dividers 10 through 19.
pub const PRESSED_SWEEP: SweepSpec = SweepSpec::new(10, N64, 10, 80, 0, 1);
pub const PRESSED_HOLD: Pitch = Pitch::new(20, N64);

/// Released: dividers 20 down to 11.
pub const RELEASED_SWEEP: SweepSpec = SweepSpec::new(20, N64, 10, 80, 0, -1);
pub const RELEASED_HOLD: Pitch = Pitch::new(10, N64);

pub const HOLD_MS: u16 = 200;

/// Active-low: the pull-up keeps the pin high until the button grounds it.
pub fn read_pressed<P: InputPin>(pin: &mut P) -> Result<bool, P::Error> {
    pin.is_low()
}

impl<T: ToneDriver, D: DelayNs> Sequencer<T, D> {
    pub fn button_alarm(&mut self, pressed: bool) {
        let (leg, hold) = if pressed {
            (&PRESSED_SWEEP, PRESSED_HOLD)
        } else {
            (&RELEASED_SWEEP, RELEASED_HOLD)
        };
        debug!("button {}", if pressed { "pressed" } else { "released" });
        self.sweep(leg);
        self.driver_mut().set_tone(hold);
        self.wait_mut().block_ms(HOLD_MS);
        self.driver_mut().stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::{BusyWait, Chunking};
    use crate::program::Program;
    use crate::testing::{Call, FakeButton, Recorder};

    fn run(pressed: bool) -> Recorder {
        let rec = Recorder::default();
        let mut seq = Sequencer::new(rec.driver(), BusyWait::new(rec.clock(), Chunking::Fine));
        seq.button_alarm(pressed);
        rec
    }

    #[test]
    fn pin_level_is_inverted() {
        assert_eq!(read_pressed(&mut FakeButton { pressed: true }), Ok(true));
        assert_eq!(read_pressed(&mut FakeButton { pressed: false }), Ok(false));
    }

    #[test]
    fn infallible_pin_needs_no_fallback() {
        let Ok(pressed) = read_pressed(&mut FakeButton { pressed: true });
        assert!(pressed);
        let Ok(pressed) = read_pressed(&mut FakeButton { pressed: false });
        assert!(!pressed);
    }

    #[test]
    fn pressed_sweeps_up_then_holds() {
        let rec = run(true);
        let dividers: Vec<u8> = rec.tones().iter().map(|p| p.divider).collect();
        assert_eq!(dividers, vec![10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20]);
        assert!(rec.tones().iter().all(|p| p.prescaler == N64));
        let timeline = rec.timeline();
        assert_eq!(timeline[timeline.len() - 3..], [Call::Tone(PRESSED_HOLD), Call::Wait(200), Call::Stop]);
        assert_eq!(rec.elapsed_ms(), 10 * 80 + 200);
    }

    #[test]
    fn released_sweeps_down_then_holds() {
        let rec = run(false);
        let dividers: Vec<u8> = rec.tones().iter().map(|p| p.divider).collect();
        assert_eq!(dividers, vec![20, 19, 18, 17, 16, 15, 14, 13, 12, 11, 10]);
        assert_eq!(rec.calls().last(), Some(&Call::Stop));
    }

    #[test]
    fn plays_once_per_reset() {
        let rec = Recorder::default();
        let mut seq = Sequencer::new(rec.driver(), BusyWait::new(rec.clock(), Chunking::Coarse));
        let mut playback = Program::ButtonAlarm.playback(true);
        assert!(!seq.step(&mut playback));
        let after_first = rec.calls().len();
        assert!(!seq.step(&mut playback));
        assert_eq!(rec.calls().len(), after_first);
        assert_eq!(rec.elapsed_ms(), 1000);
    }
}
