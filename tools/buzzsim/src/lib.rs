//! Host-side runner for the buzzer programs.
//!
//! Everything the firmware does runs here unchanged, except that Timer0 is a
//! [`SimRegisters`](buzz_core::SimRegisters) file and time is a counter. Each
//! run returns a [`Timeline`] of every driver call.

pub mod clock;
pub mod trace;

use anyhow::Context;
use buzz_core::pitch::{equal_tempered_hz, lookup, OCTAVES};
use buzz_core::{BusyWait, Chunking, Config, F_CPU_HZ, Note, Pitch, Program, Sequencer, SweepSpec};
use tracing::{debug, info};

use crate::clock::{Now, SimClock};
use crate::trace::TraceDriver;

pub use crate::trace::{parse_prescaler, Action, Entry, Timeline};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlayOptions {
    pub config: Config,
    /// Main-loop passes. A button program stops after its first.
    pub rounds: u32,
    pub button_pressed: bool,
    pub realtime: bool,
}

impl PlayOptions {
    pub fn new(program: Program) -> Self {
        Self { config: Config::new(program), rounds: 1, button_pressed: false, realtime: false }
    }
}

fn sequencer(now: &Now, chunking: Chunking, realtime: bool) -> Sequencer<TraceDriver, SimClock> {
    let clock = SimClock::new(now.clone(), realtime);
    Sequencer::new(TraceDriver::new(now.clone()), BusyWait::new(clock, chunking))
}

/// Reset, startup, then up to `rounds` passes of the main loop.
pub fn play(opts: &PlayOptions) -> Timeline {
    let now = Now::default();
    let mut seq = sequencer(&now, opts.config.chunking, opts.realtime);
    let mut playback = opts.config.program.playback(opts.button_pressed);

    info!("playing {} for {} round(s)", opts.config.program, opts.rounds);
    seq.startup(&opts.config);
    for round in 0..opts.rounds {
        debug!("round {}", round + 1);
        if !seq.step(&mut playback) {
            break;
        }
    }

    let (driver, _) = seq.into_parts();
    driver.finish()
}

/// One user-supplied leg, after checking it stays in register range.
pub fn sweep(leg: &SweepSpec, realtime: bool) -> anyhow::Result<Timeline> {
    leg.check_range().context("sweep leg leaves the timer's range")?;

    let now = Now::default();
    let mut seq = sequencer(&now, Chunking::Fine, realtime);
    seq.sweep(leg);
    let (driver, _) = seq.into_parts();
    Ok(driver.finish())
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableRow {
    pub octave: u8,
    pub note: Note,
    pub pitch: Pitch,
    pub frequency_hz: f64,
    pub target_hz: f64,
}

impl TableRow {
    /// Signed error against equal temperament, in percent.
    pub fn error_percent(&self) -> f64 {
        (self.frequency_hz - self.target_hz) / self.target_hz * 100.0
    }
}

pub fn pitch_table() -> Vec<TableRow> {
    (0..OCTAVES as u8)
        .flat_map(|octave| Note::ALL.into_iter().map(move |note| (octave, note)))
        .map(|(octave, note)| {
            let pitch = lookup(octave, note);
            TableRow {
                octave,
                note,
                pitch,
                frequency_hz: pitch.frequency_hz(F_CPU_HZ) as f64,
                target_hz: equal_tempered_hz(octave, note),
            }
        })
        .collect()
}
