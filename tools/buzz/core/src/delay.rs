//! Millisecond busy-waits.
//!
//! The chip's delay primitive only takes a short, compile-time-friendly span,
//! so long waits are built from fixed chunks. [`Chunking::Fine`] is the
//! smallest code: one 1ms wait in a loop. [`Chunking::Coarse`] spends a few
//! more bytes on 100ms and 10ms chunks to cut loop overhead on long rests.
//! Either way the requested time is spent exactly, no more and no less.

use embedded_hal::delay::DelayNs;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Chunking {
    /// 1ms at a time.
    #[default]
    Fine,
    /// 100ms, then 10ms, then 1ms chunks.
    Coarse,
}

impl Chunking {
    /// Size of the next chunk to wait out of `remaining` ms.
    #[inline(always)]
    const fn next_chunk(self, remaining: u16) -> u16 {
        match self {
            Chunking::Fine => 1,
            Chunking::Coarse if remaining >= 100 => 100,
            Chunking::Coarse if remaining >= 10 => 10,
            Chunking::Coarse => 1,
        }
    }
}

/// Blocking waits on top of a [`DelayNs`] primitive.
pub struct BusyWait<D: DelayNs> {
    delay: D,
    chunking: Chunking,
}

impl<D: DelayNs> BusyWait<D> {
    pub const fn new(delay: D, chunking: Chunking) -> Self {
        Self { delay, chunking }
    }

    /// Block for `ms` milliseconds. Zero returns immediately.
    pub fn block_ms(&mut self, mut ms: u16) {
        while ms > 0 {
            let chunk = self.chunking.next_chunk(ms);
            self.delay.delay_ms(chunk as u32);
            ms -= chunk;
        }
    }

    pub fn chunking(&self) -> Chunking {
        self.chunking
    }

    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    pub fn into_inner(self) -> D {
        self.delay
    }
}

/// Passes of a `cycles_per_spin` loop that fill one millisecond at `f_cpu`.
///
/// Rounded up, so a millisecond is never cut short.
pub const fn spins_per_ms(f_cpu: u32, cycles_per_spin: u32) -> u32 {
    (f_cpu / 1000).div_ceil(cycles_per_spin)
}

/// Length of one loop pass in ns, rounded down so `ns.div_ceil(..)` over-counts.
pub const fn ns_per_spin(f_cpu: u32, cycles_per_spin: u32) -> u32 {
    (1_000_000_000u64 * cycles_per_spin as u64 / f_cpu as u64) as u32
}
