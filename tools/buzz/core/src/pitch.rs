//! Prescalers, notes, and the precomputed pitch table.
//!
//! All values are worked out offline for the default 1.2MHz clock. The device
//! never computes a frequency; it only copies a table entry into Timer0.

use core::fmt;
use core::str::FromStr;

use crate::timer::ClockSelect;

/// Timer0 clock divide ratio.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Prescaler {
    N1,
    N8,
    N64,
    N256,
    N1024,
}

impl Prescaler {
    pub const ALL: [Prescaler; 5] = [Self::N1, Self::N8, Self::N64, Self::N256, Self::N1024];

    /// Clock divide ratio, `N` in the frequency formula.
    #[inline(always)]
    pub const fn ratio(self) -> u16 {
        match self {
            Prescaler::N1 => 1,
            Prescaler::N8 => 8,
            Prescaler::N64 => 64,
            Prescaler::N256 => 256,
            Prescaler::N1024 => 1024,
        }
    }

    /// CS0[2:0] bit pattern selecting this ratio in TCCR0B.
    #[inline(always)]
    pub const fn clock_select(self) -> ClockSelect {
        match self {
            Prescaler::N1 => ClockSelect::CS00,
            Prescaler::N8 => ClockSelect::CS01,
            Prescaler::N64 => ClockSelect::CS01.union(ClockSelect::CS00),
            Prescaler::N256 => ClockSelect::CS02,
            Prescaler::N1024 => ClockSelect::CS02.union(ClockSelect::CS00),
        }
    }

    pub const fn from_ratio(ratio: u16) -> Option<Prescaler> {
        match ratio {
            1 => Some(Prescaler::N1),
            8 => Some(Prescaler::N8),
            64 => Some(Prescaler::N64),
            256 => Some(Prescaler::N256),
            1024 => Some(Prescaler::N1024),
            _ => None,
        }
    }
}

impl fmt::Display for Prescaler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N_{}", self.ratio())
    }
}

/// Semitone within an octave, `C` = 0 through `B` = 11.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Note {
    C, Cs, D, Ds, E, F, Fs, G, Gs, A, As, B,
}

impl Note {
    pub const ALL: [Note; 12] = [
        Note::C, Note::Cs, Note::D, Note::Ds, Note::E, Note::F,
        Note::Fs, Note::G, Note::Gs, Note::A, Note::As, Note::B,
    ];

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as u8 as usize
    }

    pub const fn from_index(index: u8) -> Option<Note> {
        if (index as usize) < Self::ALL.len() {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Note::C => "C",
            Note::Cs => "C#",
            Note::D => "D",
            Note::Ds => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::Fs => "F#",
            Note::G => "G",
            Note::Gs => "G#",
            Note::A => "A",
            Note::As => "A#",
            Note::B => "B",
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNote;

impl fmt::Display for UnknownNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown note name, expected one of C C# D D# E F F# G G# A A# B")
    }
}

impl core::error::Error for UnknownNote {}

impl FromStr for Note {
    type Err = UnknownNote;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Note::ALL
            .iter()
            .copied()
            .find(|n| n.name().eq_ignore_ascii_case(s))
            .ok_or(UnknownNote)
    }
}

/// One semitone's Timer0 configuration.
///
/// The compare register receives `divider - 1`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub divider: u8,
    pub prescaler: Prescaler,
}

impl Pitch {
    pub const fn new(divider: u8, prescaler: Prescaler) -> Self {
        Self { divider, prescaler }
    }

    /// Frequency the table was tuned for, `F_CPU / (2 * N * (1 + divider))`.
    ///
    /// The pin itself runs at `F_CPU / (2 * N * divider)` since OCR0A gets
    /// `divider - 1`; see [`SimRegisters::frequency_hz`](crate::timer::SimRegisters::frequency_hz).
    pub fn frequency_hz(&self, f_cpu: u32) -> f32 {
        f_cpu as f32 / (2.0 * self.prescaler.ratio() as f32 * (1.0 + self.divider as f32))
    }
}

const fn p(divider: u8, prescaler: Prescaler) -> Pitch {
    Pitch { divider, prescaler }
}

use Prescaler::{N8, N64, N256};

pub const OCTAVES: usize = 8;

/// Table for the 1.2MHz clock, one row per octave, `C` through `B`.
pub const PITCH_TABLE: [[Pitch; 12]; OCTAVES] = [
    // octave 0, 16.35Hz .. 30.87Hz
    [p(142, N256), p(134, N256), p(127, N256), p(120, N256), p(113, N256), p(106, N256),
     p(100, N256), p(95, N256), p(89, N256), p(84, N256), p(79, N256), p(75, N256)],
    // octave 1, 32.70Hz .. 61.74Hz
    [p(71, N256), p(67, N256), p(63, N256), p(59, N256), p(56, N256), p(53, N256),
     p(50, N256), p(47, N256), p(44, N256), p(42, N256), p(39, N256), p(37, N256)],
    // octave 2, 65.41Hz .. 123.47Hz
    [p(142, N64), p(134, N64), p(127, N64), p(120, N64), p(113, N64), p(106, N64),
     p(100, N64), p(95, N64), p(89, N64), p(84, N64), p(79, N64), p(75, N64)],
    // octave 3, 130.81Hz .. 246.94Hz
    [p(71, N64), p(67, N64), p(63, N64), p(59, N64), p(56, N64), p(53, N64),
     p(50, N64), p(47, N64), p(44, N64), p(42, N64), p(39, N64), p(37, N64)],
    // octave 4, 261.63Hz .. 493.88Hz
    [p(35, N64), p(33, N64), p(31, N64), p(29, N64), p(27, N64), p(26, N64),
     p(24, N64), p(23, N64), p(22, N64), p(20, N64), p(19, N64), p(18, N64)],
    // octave 5, 523.25Hz .. 987.77Hz
    [p(142, N8), p(134, N8), p(127, N8), p(120, N8), p(113, N8), p(106, N8),
     p(100, N8), p(95, N8), p(89, N8), p(84, N8), p(79, N8), p(75, N8)],
    // octave 6, 1046.50Hz .. 1975.53Hz
    [p(71, N8), p(67, N8), p(63, N8), p(59, N8), p(56, N8), p(53, N8),
     p(50, N8), p(47, N8), p(44, N8), p(42, N8), p(39, N8), p(37, N8)],
    // octave 7, 2093.00Hz .. 3951.07Hz
    [p(35, N8), p(33, N8), p(31, N8), p(29, N8), p(27, N8), p(26, N8),
     p(24, N8), p(23, N8), p(22, N8), p(20, N8), p(19, N8), p(18, N8)],
];

/// Table entry for `(octave, note)`. Octaves past 7 panic.
#[inline(always)]
pub const fn lookup(octave: u8, note: Note) -> Pitch {
    PITCH_TABLE[octave as usize][note.index()]
}

/// Equal-tempered target (A4 = 440Hz) the table approximates.
pub fn equal_tempered_hz(octave: u8, note: Note) -> f64 {
    const SEMITONE: f64 = 1.059_463_094_359_295_3; // 2^(1/12)

    let semitones = (octave as i32 - 4) * 12 + note.index() as i32 - Note::A.index() as i32;
    let mut hz = 440.0;
    for _ in 0..semitones.unsigned_abs() {
        if semitones > 0 {
            hz *= SEMITONE;
        } else {
            hz /= SEMITONE;
        }
    }
    hz
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::F_CPU_HZ;

    #[test]
    fn every_entry_is_a_valid_register_setting() {
        for row in PITCH_TABLE.iter() {
            for pitch in row {
                assert!(pitch.divider >= 1);
                assert!(Prescaler::ALL.contains(&pitch.prescaler));
            }
        }
    }

    #[test]
    fn every_entry_is_within_two_percent_of_equal_temperament() {
        for octave in 0..OCTAVES as u8 {
            for note in Note::ALL {
                let actual = lookup(octave, note).frequency_hz(F_CPU_HZ) as f64;
                let target = equal_tempered_hz(octave, note);
                let error = (actual - target).abs() / target;
                assert!(error < 0.02, "octave {octave} {note}: {actual:.2}Hz vs {target:.2}Hz");
            }
        }
    }

    #[test]
    fn concert_a() {
        let a4 = lookup(4, Note::A);
        assert_eq!(a4, Pitch::new(20, Prescaler::N64));
        assert!((a4.frequency_hz(F_CPU_HZ) - 446.43).abs() < 0.01);
        assert!((equal_tempered_hz(4, Note::A) - 440.0).abs() < 1e-9);
        assert!((equal_tempered_hz(0, Note::C) - 16.3516).abs() < 1e-3);
    }

    #[test]
    fn prescaler_bits_match_the_datasheet() {
        let bits: [u8; 5] = Prescaler::ALL.map(|n| n.clock_select().bits());
        assert_eq!(bits, [0b001, 0b010, 0b011, 0b100, 0b101]);
        for n in Prescaler::ALL {
            assert_eq!(Prescaler::from_ratio(n.ratio()), Some(n));
        }
        assert_eq!(Prescaler::from_ratio(32), None);
    }

    #[test]
    fn note_names_parse_both_ways() {
        for note in Note::ALL {
            assert_eq!(note.name().parse::<Note>(), Ok(note));
            assert_eq!(Note::from_index(note as u8), Some(note));
        }
        assert_eq!("a#".parse::<Note>(), Ok(Note::As));
        assert_eq!("H".parse::<Note>(), Err(UnknownNote));
        assert_eq!(Note::from_index(12), None);
    }
}
