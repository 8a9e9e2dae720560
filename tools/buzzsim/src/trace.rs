//! Recording what the buzzer pin did, and when.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use buzz_core::{F_CPU_HZ, Pitch, Prescaler, SimRegisters, Timer0, ToneDriver};
use tracing::trace;

use crate::clock::Now;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Action {
    /// Timer running. `frequency_hz` is read back from the simulated registers.
    Tone { pitch: Pitch, frequency_hz: f32 },
    Stop,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Entry {
    pub at_ms: u64,
    pub action: Action,
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            Action::Tone { pitch, frequency_hz } => write!(
                f,
                "{:>9} tone {:>3} {:<6} {:>8.2}Hz",
                self.at_ms,
                pitch.divider,
                pitch.prescaler.to_string(),
                frequency_hz
            ),
            Action::Stop => write!(f, "{:>9} stop", self.at_ms),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timeline {
    pub entries: Vec<Entry>,
    /// Time on the clock when playback finished.
    pub end_ms: u64,
}

impl Timeline {
    pub fn tones(&self) -> impl Iterator<Item = Pitch> + '_ {
        self.entries.iter().filter_map(|e| match e.action {
            Action::Tone { pitch, .. } => Some(pitch),
            Action::Stop => None,
        })
    }

    pub fn write_to(&self, mut out: impl Write) -> std::io::Result<()> {
        for entry in &self.entries {
            writeln!(out, "{entry}")?;
        }
        writeln!(out, "{:>9} end", self.end_ms)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut out = BufWriter::new(file);
        self.write_to(&mut out)
            .and_then(|_| out.flush())
            .with_context(|| format!("writing {}", path.display()))
    }
}

/// [`ToneDriver`] that drives a real [`Timer0`] over [`SimRegisters`] and logs every call.
pub struct TraceDriver {
    timer: Timer0<SimRegisters>,
    now: Now,
    entries: Vec<Entry>,
}

impl TraceDriver {
    pub fn new(now: Now) -> Self {
        let mut timer = Timer0::new(SimRegisters::default());
        timer.configure_ctc();
        Self { timer, now, entries: Vec::new() }
    }

    pub fn registers(&self) -> &SimRegisters {
        self.timer.registers()
    }

    fn now_ms(&self) -> u64 {
        self.now.get() / 1_000_000
    }

    pub fn finish(self) -> Timeline {
        let end_ms = self.now_ms();
        Timeline { entries: self.entries, end_ms }
    }
}

impl ToneDriver for TraceDriver {
    fn set_tone(&mut self, pitch: Pitch) {
        self.timer.set_tone(pitch);
        let frequency_hz = self.registers().frequency_hz(F_CPU_HZ).unwrap_or(0.0);
        let entry = Entry { at_ms: self.now_ms(), action: Action::Tone { pitch, frequency_hz } };
        trace!("{}", entry);
        self.entries.push(entry);
    }

    fn stop(&mut self) {
        self.timer.stop();
        let entry = Entry { at_ms: self.now_ms(), action: Action::Stop };
        trace!("{}", entry);
        self.entries.push(entry);
    }
}

/// Parse a prescaler ratio like `64` or `N_64`.
pub fn parse_prescaler(s: &str) -> Result<Prescaler, String> {
    let digits = s.trim_start_matches("N_").trim_start_matches('N');
    digits
        .parse::<u16>()
        .ok()
        .and_then(Prescaler::from_ratio)
        .ok_or_else(|| format!("'{s}' is not a prescaler, expected 1, 8, 64, 256 or 1024"))
}
