//! # Sequencer
//!
//! Owns the tone driver and the busy-wait and plays things through them. Every
//! call blocks until the sound is finished; there is nothing to cancel.
//!
//! One melody pass is: for each event, `stop()` on a rest or `set_tone()` on a
//! note, then wait the event's duration. A final `stop()` always follows the
//! last event.

use embedded_hal::delay::DelayNs;
use log::{debug, trace};

use crate::delay::BusyWait;
use crate::melody::{total_duration_ms, Event, Sound};
use crate::pitch::{lookup, Note, OCTAVES};
use crate::program::{Config, Playback};
use crate::timer::ToneDriver;

/// How long each note sounds during the startup octave walk.
pub const WALK_NOTE_MS: u16 = 80;
/// Silence after the octave walk.
pub const WALK_PAUSE_MS: u16 = 1500;
/// Settle time before the main loop starts.
pub const STARTUP_MS: u16 = 100;

pub struct Sequencer<T: ToneDriver, D: DelayNs> {
    driver: T,
    wait: BusyWait<D>,
}

impl<T: ToneDriver, D: DelayNs> Sequencer<T, D> {
    pub const fn new(driver: T, wait: BusyWait<D>) -> Self {
        Self { driver, wait }
    }

    #[inline(always)]
    pub fn play_event(&mut self, event: &Event) {
        match event.sound {
            Sound::Tone(pitch) => {
                trace!("tone {}/{} for {}ms", pitch.divider, pitch.prescaler, event.duration_ms);
                self.driver.set_tone(pitch);
            }
            Sound::Silence => {
                trace!("rest for {}ms", event.duration_ms);
                self.driver.stop();
            }
        }
        self.wait.block_ms(event.duration_ms);
    }

    /// Play `melody` once, start to finish, and leave the buzzer silent.
    pub fn play_melody(&mut self, melody: &[Event]) {
        debug!("melody: {} events, {}ms", melody.len(), total_duration_ms(melody));
        for event in melody {
            self.play_event(event);
        }
        self.driver.stop();
    }

    /// Every table entry, lowest first, then a long pause.
    pub fn walk_octaves(&mut self) {
        debug!("walking {} octaves", OCTAVES);
        for octave in 0..OCTAVES as u8 {
            for note in Note::ALL {
                self.driver.set_tone(lookup(octave, note));
                self.wait.block_ms(WALK_NOTE_MS);
            }
        }
        self.driver.stop();
        self.wait.block_ms(WALK_PAUSE_MS);
    }

    /// Everything that runs once between reset and the main loop.
    pub fn startup(&mut self, config: &Config) {
        if config.walk_octaves {
            self.walk_octaves();
        }
        self.wait.block_ms(STARTUP_MS);
    }

    /// One pass of the main loop. Returns `false` once the program has nothing left to play.
    pub fn step(&mut self, playback: &mut Playback) -> bool {
        match playback {
            Playback::Melody(melody) => {
                self.play_melody(*melody);
                true
            }
            Playback::Alarm(cycle) => {
                let alarm = cycle.next_alarm();
                self.play_alarm(alarm);
                true
            }
            Playback::Button { pressed, done } => {
                if !*done {
                    self.button_alarm(*pressed);
                    *done = true;
                }
                false
            }
        }
    }

    pub fn driver(&self) -> &T {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut T {
        &mut self.driver
    }

    pub fn wait_mut(&mut self) -> &mut BusyWait<D> {
        &mut self.wait
    }

    pub fn into_parts(self) -> (T, BusyWait<D>) {
        (self.driver, self.wait)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::Chunking;
    use crate::melody::{MELODY_1, MELODY_2};
    use crate::pitch::Pitch;
    use crate::program::Program;
    use crate::testing::{Call, FakeClock, FakeDriver, Recorder};

    fn sequencer(rec: &Recorder, chunking: Chunking) -> Sequencer<FakeDriver, FakeClock> {
        Sequencer::new(rec.driver(), BusyWait::new(rec.clock(), chunking))
    }

    #[test]
    fn same_pitch_notes_are_split_by_a_zero_rest() {
        let e4 = lookup(4, Note::E);
        let rec = Recorder::default();
        sequencer(&rec, Chunking::Fine).play_melody(&[
            Event::note(4, Note::E, 250),
            Event::rest(0),
            Event::note(4, Note::E, 250),
        ]);
        assert_eq!(
            rec.timeline(),
            vec![Call::Tone(e4), Call::Wait(250), Call::Stop, Call::Tone(e4), Call::Wait(250), Call::Stop]
        );
    }

    #[test]
    fn silence_only_stops() {
        let rec = Recorder::default();
        let mut seq = sequencer(&rec, Chunking::Fine);
        seq.play_event(&Event::rest(30));
        assert_eq!(rec.timeline(), vec![Call::Stop, Call::Wait(30)]);
        assert!(rec.tones().is_empty());
    }

    #[test]
    fn a_pass_takes_exactly_the_sum_of_its_events() {
        for chunking in [Chunking::Fine, Chunking::Coarse] {
            for melody in [&MELODY_1[..], &MELODY_2[..]] {
                let rec = Recorder::default();
                sequencer(&rec, chunking).play_melody(melody);
                assert_eq!(rec.elapsed_ms(), total_duration_ms(melody));
            }
        }
    }

    #[test]
    fn every_note_and_rest_reaches_the_driver_in_order() {
        let rec = Recorder::default();
        sequencer(&rec, Chunking::Coarse).play_melody(&MELODY_1);
        let driver_calls: Vec<Call> = rec.calls().into_iter().filter(|c| !matches!(c, Call::Wait(_))).collect();
        let mut expected: Vec<Call> = MELODY_1
            .iter()
            .map(|e| match e.sound {
                Sound::Tone(p) => Call::Tone(p),
                Sound::Silence => Call::Stop,
            })
            .collect();
        expected.push(Call::Stop);
        assert_eq!(driver_calls, expected);
    }

    #[test]
    fn empty_melody_still_stops() {
        let rec = Recorder::default();
        sequencer(&rec, Chunking::Fine).play_melody(&[]);
        assert_eq!(rec.calls(), vec![Call::Stop]);
    }

    #[test]
    fn walk_octaves_plays_the_whole_table() {
        let rec = Recorder::default();
        sequencer(&rec, Chunking::Coarse).walk_octaves();
        let tones = rec.tones();
        assert_eq!(tones.len(), 96);
        assert_eq!(tones[0], Pitch::new(142, crate::pitch::Prescaler::N256));
        assert_eq!(tones[95], lookup(7, Note::B));
        assert_eq!(rec.elapsed_ms(), 96 * 80 + 1500);
        assert_eq!(rec.timeline()[rec.timeline().len() - 2..], [Call::Stop, Call::Wait(1500)]);
    }

    #[test]
    fn startup_waits_before_the_main_loop() {
        let rec = Recorder::default();
        sequencer(&rec, Chunking::Fine).startup(&Config::new(Program::Melody1));
        assert_eq!(rec.timeline(), vec![Call::Wait(100)]);

        let rec = Recorder::default();
        let config = Config { walk_octaves: true, ..Config::new(Program::Melody1) };
        sequencer(&rec, Chunking::Fine).startup(&config);
        assert_eq!(rec.elapsed_ms(), 96 * 80 + 1500 + 100);
    }

    #[test]
    fn melody_playback_repeats_forever() {
        let rec = Recorder::default();
        let mut seq = sequencer(&rec, Chunking::Coarse);
        let mut playback = Program::Melody2.playback(false);
        assert!(seq.step(&mut playback));
        assert!(seq.step(&mut playback));
        assert_eq!(rec.elapsed_ms(), 2 * total_duration_ms(&MELODY_2));
    }
}
