//! Recording fakes shared by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};

use crate::pitch::Pitch;
use crate::timer::ToneDriver;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Tone(Pitch),
    Stop,
    /// One call into the delay primitive, in ms.
    Wait(u32),
}

/// One log for the fake driver and the fake clock, so ordering between them is kept.
#[derive(Clone, Default)]
pub struct Recorder(Rc<RefCell<Vec<Call>>>);

impl Recorder {
    pub fn driver(&self) -> FakeDriver {
        FakeDriver(self.clone())
    }

    pub fn clock(&self) -> FakeClock {
        FakeClock(self.clone())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    /// Calls with back-to-back waits folded together.
    pub fn timeline(&self) -> Vec<Call> {
        let mut out: Vec<Call> = Vec::new();
        for call in self.calls() {
            if let Call::Wait(ms) = call {
                if let Some(Call::Wait(total)) = out.last_mut() {
                    *total += ms;
                    continue;
                }
            }
            out.push(call);
        }
        out
    }

    pub fn tones(&self) -> Vec<Pitch> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Tone(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.calls()
            .into_iter()
            .map(|c| match c {
                Call::Wait(ms) => ms,
                _ => 0,
            })
            .sum()
    }

    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }
}

pub struct FakeDriver(Recorder);

impl ToneDriver for FakeDriver {
    fn set_tone(&mut self, pitch: Pitch) {
        self.0.push(Call::Tone(pitch));
    }

    fn stop(&mut self) {
        self.0.push(Call::Stop);
    }
}

pub struct FakeClock(Recorder);

impl DelayNs for FakeClock {
    fn delay_ns(&mut self, ns: u32) {
        assert_eq!(ns % 1_000_000, 0, "only whole milliseconds are expected");
        self.0.push(Call::Wait(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.push(Call::Wait(ms));
    }
}

/// Active-low button that reads the same level every time.
pub struct FakeButton {
    pub pressed: bool,
}

impl ErrorType for FakeButton {
    type Error = core::convert::Infallible;
}

impl InputPin for FakeButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.pressed)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pressed)
    }
}
