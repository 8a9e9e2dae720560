//! What the chip plays, chosen at build time.
//!
//! The firmware turns its Cargo features into a [`Config`] once, at reset.
//! [`Program::playback`] then gives the state the main loop steps through.

use core::fmt;
use core::str::FromStr;

use crate::alarm::AlarmCycle;
use crate::delay::Chunking;
use crate::melody::{Event, MELODY_1, MELODY_2};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Program {
    #[default]
    Melody1,
    Melody2,
    TwoToneAlarm,
    ButtonAlarm,
}

impl Program {
    pub const ALL: [Program; 4] = [Self::Melody1, Self::Melody2, Self::TwoToneAlarm, Self::ButtonAlarm];

    pub fn melody(self) -> Option<&'static [Event]> {
        match self {
            Program::Melody1 => Some(&MELODY_1),
            Program::Melody2 => Some(&MELODY_2),
            Program::TwoToneAlarm | Program::ButtonAlarm => None,
        }
    }

    /// Whether the program needs the button pin wired up.
    pub const fn uses_button(self) -> bool {
        matches!(self, Program::ButtonAlarm)
    }

    /// Fresh main-loop state. `button_pressed` only matters for [`Program::ButtonAlarm`].
    pub fn playback(self, button_pressed: bool) -> Playback {
        match self {
            Program::Melody1 => Playback::Melody(&MELODY_1),
            Program::Melody2 => Playback::Melody(&MELODY_2),
            Program::TwoToneAlarm => Playback::Alarm(AlarmCycle::new()),
            Program::ButtonAlarm => Playback::Button { pressed: button_pressed, done: false },
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Program::Melody1 => "melody-1",
            Program::Melody2 => "melody-2",
            Program::TwoToneAlarm => "alarm",
            Program::ButtonAlarm => "button",
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProgram;

impl fmt::Display for UnknownProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown program, expected melody-1, melody-2, alarm or button")
    }
}

impl core::error::Error for UnknownProgram {}

impl FromStr for Program {
    type Err = UnknownProgram;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Program::ALL.into_iter().find(|p| p.name() == s).ok_or(UnknownProgram)
    }
}

/// Build-time switches.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub program: Program,
    /// Play the whole pitch table once before the main loop.
    pub walk_octaves: bool,
    pub chunking: Chunking,
}

impl Config {
    pub const fn new(program: Program) -> Self {
        Self { program, walk_octaves: false, chunking: Chunking::Fine }
    }
}

/// Main-loop state for one program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Playback {
    /// Replayed forever.
    Melody(&'static [Event]),
    Alarm(AlarmCycle),
    /// Plays once; `done` is set after it has.
    Button { pressed: bool, done: bool },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for program in Program::ALL {
            assert_eq!(program.name().parse::<Program>(), Ok(program));
        }
        assert_eq!("melody-3".parse::<Program>(), Err(UnknownProgram));
    }

    #[test]
    fn playback_matches_program() {
        assert_eq!(Program::Melody1.playback(true), Playback::Melody(&MELODY_1));
        assert_eq!(Program::Melody2.melody().map(<[Event]>::len), Some(80));
        assert_eq!(Program::TwoToneAlarm.playback(false), Playback::Alarm(AlarmCycle::new()));
        assert_eq!(Program::ButtonAlarm.playback(true), Playback::Button { pressed: true, done: false });
        assert!(Program::ButtonAlarm.melody().is_none());
        assert!(Program::ButtonAlarm.uses_button());
        assert!(!Program::TwoToneAlarm.uses_button());
    }

    #[test]
    fn config_defaults() {
        let config = Config::new(Program::Melody2);
        assert!(!config.walk_octaves);
        assert_eq!(config.chunking, Chunking::Fine);
        assert_eq!(Config::default(), Config::new(Program::Melody1));
    }
}
