//! # buzz-core
//!
//! Everything the ATtiny13 buzzer firmware does that isn't register poking.
//!
//! The firmware drives a passive piezo from OC0A with Timer0 in CTC mode. Every
//! pitch is a `(compare, prescaler)` pair, so playing music is just rewriting
//! two registers and waiting.
//!
//! ```text
//! F = F_CPU / (2 * N * (1 + OCR0A))     F_CPU = 1.2MHz, N ∈ {1, 8, 64, 256, 1024}
//! ```
//!
//! ## Pieces
//!
//! | Module        | What it does                                              |
//! |---------------|-----------------------------------------------------------|
//! | [`pitch`]     | Prescalers, notes and the precomputed 8-octave table      |
//! | [`timer`]     | Timer0 register flags and the read-modify-write driver    |
//! | [`delay`]     | Millisecond busy-waits built from a small delay primitive |
//! | [`melody`]    | Events, tempo constants and the two stock melodies        |
//! | [`sequencer`] | Plays melodies and programs                               |
//! | [`sweep`]     | Fade-in/out divider ramps                                 |
//! | [`alarm`]     | Two-tone siren table and the repeat schedule              |
//! | [`button`]    | The single-button up/down alarm                           |
//! | [`program`]   | Build-time program selection                              |
//!
//! The hardware is injected: a [`timer::TimerRegisters`] backend (real
//! volatile registers on the chip, [`timer::SimRegisters`] on a host) and an
//! [`embedded_hal::delay::DelayNs`] for waiting.

#![cfg_attr(not(test), no_std)]

pub mod alarm;
pub mod button;
pub mod delay;
pub mod melody;
pub mod pitch;
pub mod program;
pub mod sequencer;
pub mod sweep;
pub mod timer;

#[cfg(test)]
mod testing;

pub use embedded_hal;

pub use crate::alarm::{AlarmCycle, AlarmType};
pub use crate::delay::{BusyWait, Chunking};
pub use crate::melody::{Event, Sound};
pub use crate::pitch::{Note, Pitch, Prescaler};
pub use crate::program::{Config, Playback, Program};
pub use crate::sequencer::Sequencer;
pub use crate::sweep::SweepSpec;
pub use crate::timer::{SimRegisters, Timer0, TimerRegisters, ToneDriver};

/// Default ATtiny13 clock: 9.6MHz internal RC with CKDIV8.
pub const F_CPU_HZ: u32 = 1_200_000;
