use std::cell::Cell;
use std::rc::Rc;
use std::thread::sleep;
use std::time::Duration;

use buzz_core::embedded_hal::delay::DelayNs;

/// Shared elapsed time, in nanoseconds since reset.
pub type Now = Rc<Cell<u64>>;

/// Delay primitive for the simulator.
///
/// Always advances the shared [`Now`]. With `realtime` set it also sleeps, so
/// the buzzer timeline can be followed along at the chip's speed.
pub struct SimClock {
    now: Now,
    realtime: bool,
}

impl SimClock {
    pub fn new(now: Now, realtime: bool) -> Self {
        Self { now, realtime }
    }

    fn advance(&mut self, ns: u64) {
        self.now.set(self.now.get() + ns);
        if self.realtime {
            sleep(Duration::from_nanos(ns));
        }
    }
}

impl DelayNs for SimClock {
    fn delay_ns(&mut self, ns: u32) {
        self.advance(ns as u64);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(ms as u64 * 1_000_000);
    }
}
