//! # Timer0
//!
//! The buzzer hangs off OC0A. With Timer0 in CTC mode and OC0A set to toggle on
//! compare match, the pin is a square wave at
//! `F_CPU / (2 * N * (1 + OCR0A))`.
//!
//! | Register | Bits used                                | Purpose             |
//! |----------|------------------------------------------|---------------------|
//! | `TCCR0A` | `WGM01`, `COM0A0` ([`TimerMode`])        | CTC + toggle OC0A   |
//! | `TCCR0B` | `CS02:CS00` ([`ClockSelect`])            | Prescaler / stop    |
//! | `OCR0A`  | whole byte                               | Compare value       |
//!
//! Clock-select bits are always cleared before the new prescaler is OR'd in.
//! Writing `N_8` on top of a live `N_1024` would otherwise leave `CS02` set and
//! select the external clock on T0.

use crate::pitch::{Pitch, Prescaler};

bitflags::bitflags! {
    /// Clock-select field of `TCCR0B`. Empty means the timer is stopped.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct ClockSelect: u8 {
        const CS00 = 0b0000_0001;
        const CS01 = 0b0000_0010;
        const CS02 = 0b0000_0100;
    }

    /// Waveform and compare-output bits of `TCCR0A`.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct TimerMode: u8 {
        const WGM00  = 0b0000_0001;
        /// Clear timer on compare match.
        const WGM01  = 0b0000_0010;
        const COM0B0 = 0b0001_0000;
        const COM0B1 = 0b0010_0000;
        /// Toggle OC0A on compare match.
        const COM0A0 = 0b0100_0000;
        const COM0A1 = 0b1000_0000;
    }
}

impl ClockSelect {
    /// Every clock-select bit, cleared before each prescaler change.
    pub const MASK: ClockSelect = ClockSelect::all();

    pub const fn prescaler(self) -> Option<Prescaler> {
        match self.bits() {
            0b001 => Some(Prescaler::N1),
            0b010 => Some(Prescaler::N8),
            0b011 => Some(Prescaler::N64),
            0b100 => Some(Prescaler::N256),
            0b101 => Some(Prescaler::N1024),
            // 000 is stopped, 110/111 clock from the T0 pin
            _ => None,
        }
    }
}

/// Raw access to the three Timer0 registers the buzzer needs.
pub trait TimerRegisters {
    fn read_tccr0a(&self) -> u8;
    fn write_tccr0a(&mut self, value: u8);
    fn read_tccr0b(&self) -> u8;
    fn write_tccr0b(&mut self, value: u8);
    fn write_ocr0a(&mut self, value: u8);
}

impl<R: TimerRegisters + ?Sized> TimerRegisters for &mut R {
    #[inline(always)]
    fn read_tccr0a(&self) -> u8 {
        (**self).read_tccr0a()
    }

    #[inline(always)]
    fn write_tccr0a(&mut self, value: u8) {
        (**self).write_tccr0a(value)
    }

    #[inline(always)]
    fn read_tccr0b(&self) -> u8 {
        (**self).read_tccr0b()
    }

    #[inline(always)]
    fn write_tccr0b(&mut self, value: u8) {
        (**self).write_tccr0b(value)
    }

    #[inline(always)]
    fn write_ocr0a(&mut self, value: u8) {
        (**self).write_ocr0a(value)
    }
}

/// Something that can make (or stop making) a tone.
pub trait ToneDriver {
    /// Start emitting `pitch`, replacing whatever was playing.
    fn set_tone(&mut self, pitch: Pitch);
    /// Halt the timer clock, silencing the pin.
    fn stop(&mut self);
}

impl<T: ToneDriver + ?Sized> ToneDriver for &mut T {
    #[inline(always)]
    fn set_tone(&mut self, pitch: Pitch) {
        (**self).set_tone(pitch)
    }

    #[inline(always)]
    fn stop(&mut self) {
        (**self).stop()
    }
}

/// Tone driver on top of a Timer0 register backend.
pub struct Timer0<R: TimerRegisters> {
    regs: R,
}

impl<R: TimerRegisters> Timer0<R> {
    pub const fn new(regs: R) -> Self {
        Self { regs }
    }

    /// CTC mode with OC0A toggling on compare match. Leaves the clock stopped.
    pub fn configure_ctc(&mut self) {
        let mode = TimerMode::from_bits_retain(self.regs.read_tccr0a());
        self.regs.write_tccr0a((mode | TimerMode::WGM01 | TimerMode::COM0A0).bits());
        self.select_clock(ClockSelect::empty());
    }

    /// Clear `CS02:CS00`, then set `clock`. Other `TCCR0B` bits are untouched.
    #[inline(always)]
    pub fn select_clock(&mut self, clock: ClockSelect) {
        let tccr0b = self.regs.read_tccr0b();
        self.regs.write_tccr0b((tccr0b & !ClockSelect::MASK.bits()) | clock.bits());
    }

    pub fn registers(&self) -> &R {
        &self.regs
    }

    pub fn registers_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    pub fn into_inner(self) -> R {
        self.regs
    }
}

impl<R: TimerRegisters> ToneDriver for Timer0<R> {
    #[inline(always)]
    fn set_tone(&mut self, pitch: Pitch) {
        self.select_clock(pitch.prescaler.clock_select());
        self.regs.write_ocr0a(pitch.divider.wrapping_sub(1));
    }

    #[inline(always)]
    fn stop(&mut self) {
        self.select_clock(ClockSelect::empty());
    }
}

/// Plain-memory stand-in for Timer0, for running the core on a host.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SimRegisters {
    pub tccr0a: u8,
    pub tccr0b: u8,
    pub ocr0a: u8,
}

impl SimRegisters {
    pub fn mode(&self) -> TimerMode {
        TimerMode::from_bits_retain(self.tccr0a)
    }

    pub fn clock_select(&self) -> ClockSelect {
        ClockSelect::from_bits_truncate(self.tccr0b)
    }

    pub fn is_running(&self) -> bool {
        !self.clock_select().is_empty()
    }

    /// Frequency actually on the pin, `None` while stopped or not in CTC toggle mode.
    pub fn frequency_hz(&self, f_cpu: u32) -> Option<f32> {
        let mode = self.mode();
        if !mode.contains(TimerMode::WGM01 | TimerMode::COM0A0) {
            return None;
        }
        let n = self.clock_select().prescaler()?.ratio() as f32;
        Some(f_cpu as f32 / (2.0 * n * (1.0 + self.ocr0a as f32)))
    }
}

impl TimerRegisters for SimRegisters {
    fn read_tccr0a(&self) -> u8 {
        self.tccr0a
    }

    fn write_tccr0a(&mut self, value: u8) {
        self.tccr0a = value;
    }

    fn read_tccr0b(&self) -> u8 {
        self.tccr0b
    }

    fn write_tccr0b(&mut self, value: u8) {
        self.tccr0b = value;
    }

    fn write_ocr0a(&mut self, value: u8) {
        self.ocr0a = value;
    }
}
