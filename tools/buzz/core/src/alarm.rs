//! Two-tone siren.
//!
//! Seven alarm types, each a rising or falling sweep followed by a short
//! chirp. The main loop plays type `k` exactly `10 - k` times and then moves
//! on, so one full cycle is 10 + 9 + ... + 4 = 49 alarms.

use core::fmt;

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::pitch::Prescaler::N8;
use crate::sequencer::Sequencer;
use crate::sweep::SweepSpec;
use crate::timer::ToneDriver;

const fn leg(start: u8, iterations: u8, step_delay_ms: u8, pause_ms: u8, fade: i8) -> SweepSpec {
    SweepSpec::new(start, N8, iterations, step_delay_ms, pause_ms, fade)
}

/// Both legs of every alarm type, indexed by type.
pub static ALARM_LEGS: [[SweepSpec; 2]; AlarmType::COUNT as usize] = [
    [leg(32, 6, 10, 10, 1), leg(22, 6, 10, 0, -1)],
    [leg(123, 6, 10, 10, 1), leg(22, 6, 10, 0, -1)],
    [leg(22, 16, 10, 10, 10), leg(22, 6, 10, 0, -1)],
    [leg(180, 16, 10, 10, -10), leg(22, 6, 10, 0, -1)],
    [leg(180, 32, 10, 10, -5), leg(20, 6, 10, 0, -1)],
    [leg(180, 128, 10, 10, -1), leg(52, 6, 10, 0, -1)],
    [leg(64, 128, 10, 10, 1), leg(64, 6, 10, 0, -1)],
];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlarmType(u8);

impl AlarmType {
    pub const COUNT: u8 = 7;

    /// Raw dispatch: anything unknown plays type 0.
    pub const fn from_raw(id: u8) -> Self {
        if id < Self::COUNT { Self(id) } else { Self(0) }
    }

    pub const fn id(self) -> u8 {
        self.0
    }

    pub fn legs(self) -> &'static [SweepSpec; 2] {
        &ALARM_LEGS[self.0 as usize]
    }

    /// Plays per visit in the main loop.
    pub const fn repeats(self) -> u8 {
        10 - self.0
    }

    pub const fn next(self) -> Self {
        Self((self.0 + 1) % Self::COUNT)
    }

    pub fn duration_ms(self) -> u32 {
        self.legs().iter().map(SweepSpec::duration_ms).sum()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnknownAlarm(pub u8);

impl fmt::Display for UnknownAlarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no alarm type {}, expected 0..={}", self.0, AlarmType::COUNT - 1)
    }
}

impl core::error::Error for UnknownAlarm {}

impl TryFrom<u8> for AlarmType {
    type Error = UnknownAlarm;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        if id < Self::COUNT { Ok(Self(id)) } else { Err(UnknownAlarm(id)) }
    }
}

impl fmt::Display for AlarmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "alarm {}", self.0)
    }
}

/// Where the main loop is in the repeat schedule.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AlarmCycle {
    current: AlarmType,
    remaining: u8,
}

impl AlarmCycle {
    pub const fn new() -> Self {
        Self::starting_at(AlarmType(0))
    }

    pub const fn starting_at(alarm: AlarmType) -> Self {
        Self { current: alarm, remaining: alarm.repeats() }
    }

    /// The alarm to play now. Advances the schedule.
    pub fn next_alarm(&mut self) -> AlarmType {
        if self.remaining == 0 {
            self.current = self.current.next();
            self.remaining = self.current.repeats();
        }
        self.remaining -= 1;
        self.current
    }

    /// Alarms in one trip through every type.
    pub fn plays_per_cycle() -> u32 {
        (0..AlarmType::COUNT).map(|id| AlarmType(id).repeats() as u32).sum()
    }
}

impl Default for AlarmCycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for AlarmCycle {
    type Item = AlarmType;

    fn next(&mut self) -> Option<AlarmType> {
        Some(self.next_alarm())
    }
}

impl<T: ToneDriver, D: DelayNs> Sequencer<T, D> {
    pub fn play_alarm(&mut self, alarm: AlarmType) {
        debug!("{}", alarm);
        for leg in alarm.legs() {
            self.sweep(leg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::{BusyWait, Chunking};
    use crate::pitch::Pitch;
    use crate::testing::{Call, Recorder};

    #[test]
    fn type_zero_plays_both_legs() {
        let rec = Recorder::default();
        let mut seq = Sequencer::new(rec.driver(), BusyWait::new(rec.clock(), Chunking::Fine));
        seq.play_alarm(AlarmType::from_raw(0));

        let dividers: Vec<u8> = rec.tones().iter().map(|p| p.divider).collect();
        assert_eq!(dividers, vec![32, 33, 34, 35, 36, 37, 22, 21, 20, 19, 18, 17]);

        let mut expected = Vec::new();
        for (i, d) in dividers.iter().enumerate() {
            expected.extend([Call::Tone(Pitch::new(*d, N8)), Call::Wait(10), Call::Stop]);
            if i == 5 {
                expected.push(Call::Wait(10));
            }
        }
        assert_eq!(rec.timeline(), expected);
        assert_eq!(rec.elapsed_ms(), 130);
    }

    #[test]
    fn table_stays_in_register_range() {
        for id in 0..AlarmType::COUNT {
            for leg in AlarmType::from_raw(id).legs() {
                assert_eq!(leg.check_range(), Ok(()), "alarm {id}");
                assert_eq!(leg.prescaler, N8);
            }
        }
    }

    #[test]
    fn unknown_ids() {
        assert_eq!(AlarmType::from_raw(7), AlarmType::from_raw(0));
        assert_eq!(AlarmType::from_raw(255).legs(), &ALARM_LEGS[0]);
        assert_eq!(AlarmType::try_from(6).map(AlarmType::id), Ok(6));
        assert_eq!(AlarmType::try_from(7), Err(UnknownAlarm(7)));
        assert_eq!(UnknownAlarm(9).to_string(), "no alarm type 9, expected 0..=6");
    }

    #[test]
    fn schedule_counts_down_and_wraps() {
        let ids: Vec<u8> = AlarmCycle::new().take(50).map(AlarmType::id).collect();
        let mut expected = Vec::new();
        for id in 0..7u8 {
            expected.extend(std::iter::repeat(id).take(10 - id as usize));
        }
        expected.push(0);
        assert_eq!(AlarmCycle::plays_per_cycle(), 49);
        assert_eq!(ids, expected);
    }

    #[test]
    fn step_plays_one_alarm_per_call() {
        let rec = Recorder::default();
        let mut seq = Sequencer::new(rec.driver(), BusyWait::new(rec.clock(), Chunking::Coarse));
        let mut playback = crate::program::Program::TwoToneAlarm.playback(false);
        for _ in 0..11 {
            assert!(seq.step(&mut playback));
        }
        let alarm_0 = AlarmType::from_raw(0).duration_ms();
        let alarm_1 = AlarmType::from_raw(1).duration_ms();
        assert_eq!(rec.elapsed_ms(), 10 * alarm_0 + alarm_1);
        assert_eq!(rec.tones()[10 * 12], Pitch::new(123, N8));
    }
}
