//! Melody events and the two stock tunes.
//!
//! A melody is a `&'static [Event]`. Note events are resolved against the
//! pitch table at compile time, so the tune sitting in flash is already
//! `(divider, prescaler)` pairs.

use crate::pitch::{lookup, Note, Pitch};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sound {
    Tone(Pitch),
    /// No tone, just wait.
    Silence,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub sound: Sound,
    pub duration_ms: u16,
}

impl Event {
    pub const fn note(octave: u8, note: Note, duration_ms: u16) -> Self {
        Self { sound: Sound::Tone(lookup(octave, note)), duration_ms }
    }

    pub const fn tone(pitch: Pitch, duration_ms: u16) -> Self {
        Self { sound: Sound::Tone(pitch), duration_ms }
    }

    /// A zero-length rest splits two notes of the same pitch.
    pub const fn rest(duration_ms: u16) -> Self {
        Self { sound: Sound::Silence, duration_ms }
    }
}

/// Sum of every event's duration, i.e. how long one pass takes.
pub fn total_duration_ms(events: &[Event]) -> u32 {
    events.iter().map(|e| e.duration_ms as u32).sum()
}

pub const BPM: u16 = 120;
pub const QUARTER: u16 = 60_000 / BPM; // 500
pub const HALF: u16 = QUARTER * 2; // 1000
pub const EIGHTH: u16 = QUARTER / 2; // 250
pub const SIXTEENTH: u16 = QUARTER / 4; // 125
pub const WHOLE: u16 = HALF * 2; // 2000

const fn n(octave: u8, note: Note, duration_ms: u16) -> Event {
    Event::note(octave, note, duration_ms)
}

const fn r(duration_ms: u16) -> Event {
    Event::rest(duration_ms)
}

use Note::{A, B, C, D, Ds, E, F, G, Gs};

/// "Happy Birthday".
pub static MELODY_1: [Event; 33] = [
    n(4, G, EIGHTH), r(0), n(4, G, EIGHTH),
    n(4, A, QUARTER), n(4, G, QUARTER), n(5, C, QUARTER), n(4, B, QUARTER),
    r(QUARTER + EIGHTH),

    n(4, G, EIGHTH), r(0), n(4, G, EIGHTH),
    n(4, A, QUARTER), n(4, G, QUARTER), n(5, D, QUARTER), n(5, C, QUARTER),
    r(QUARTER + EIGHTH),

    n(4, G, EIGHTH), r(0), n(4, G, EIGHTH),
    n(5, G, QUARTER), n(5, E, QUARTER), n(5, C, QUARTER), n(4, B, QUARTER), n(4, A, QUARTER),
    r(QUARTER + EIGHTH),

    n(5, F, EIGHTH), r(0), n(5, F, EIGHTH),
    n(5, E, QUARTER), n(5, C, QUARTER), n(5, D, QUARTER), n(5, C, QUARTER),
    r(WHOLE),
];

/// Two-part march theme.
pub static MELODY_2: [Event; 80] = [
    n(4, E, QUARTER), r(0), n(4, E, QUARTER), r(0), n(4, E, QUARTER),
    n(4, C, SIXTEENTH + EIGHTH), n(4, G, SIXTEENTH), n(4, E, QUARTER),
    n(4, C, SIXTEENTH + EIGHTH), n(4, G, SIXTEENTH), n(4, E, QUARTER),

    r(QUARTER + EIGHTH),

    n(4, B, QUARTER), r(0), n(4, B, QUARTER), r(0), n(4, B, QUARTER), r(0),
    n(5, C, SIXTEENTH + EIGHTH), n(4, G, SIXTEENTH), n(4, Ds, QUARTER),
    n(4, C, SIXTEENTH + EIGHTH), n(4, G, SIXTEENTH), n(4, E, QUARTER),

    r(QUARTER + EIGHTH),

    n(5, E, QUARTER), n(4, E, SIXTEENTH + EIGHTH), r(0), n(4, E, SIXTEENTH),
    n(5, E, QUARTER), n(5, Ds, EIGHTH), n(5, D, EIGHTH),
    n(5, C, SIXTEENTH), n(5, B, SIXTEENTH), n(5, C, EIGHTH), r(EIGHTH),
    n(4, E, EIGHTH), n(4, A, QUARTER), n(4, Gs, EIGHTH), n(4, G, EIGHTH),
    n(4, F, SIXTEENTH), n(4, E, SIXTEENTH), n(4, F, EIGHTH), r(EIGHTH),
    n(4, C, EIGHTH), n(4, Ds, QUARTER),
    n(4, C, SIXTEENTH + EIGHTH), n(4, G, SIXTEENTH), n(4, E, QUARTER),
    n(4, C, SIXTEENTH + EIGHTH), n(4, G, SIXTEENTH), n(4, B, QUARTER),

    r(QUARTER + EIGHTH),

    n(5, E, QUARTER), n(4, E, SIXTEENTH + EIGHTH), n(4, E, SIXTEENTH),
    n(5, E, QUARTER), n(5, Ds, EIGHTH), n(5, D, EIGHTH),
    n(5, C, SIXTEENTH), n(5, B, SIXTEENTH), n(5, C, EIGHTH), r(EIGHTH),
    n(4, E, EIGHTH), n(4, A, QUARTER), n(4, Gs, EIGHTH), n(4, G, EIGHTH),
    n(4, F, SIXTEENTH), n(4, E, SIXTEENTH), n(4, F, EIGHTH), r(EIGHTH),
    n(4, C, EIGHTH), n(4, Ds, QUARTER),
    n(4, C, SIXTEENTH + EIGHTH), n(4, G, SIXTEENTH), n(4, E, QUARTER),
    n(4, C, SIXTEENTH + EIGHTH), n(4, G, SIXTEENTH), n(4, E, QUARTER),

    r(WHOLE),
];
