use buzz_core::F_CPU_HZ;
use buzz_core::delay::{ns_per_spin, spins_per_ms};
use buzz_core::embedded_hal::delay::DelayNs;
use core::arch::asm;

/// Clocks per pass of [`spin`]: `sbiw` (2) plus a taken `brne` (2).
const CYCLES_PER_SPIN: u32 = 4;
const SPINS_PER_MS: u16 = spins_per_ms(F_CPU_HZ, CYCLES_PER_SPIN) as u16;
const NS_PER_SPIN: u32 = ns_per_spin(F_CPU_HZ, CYCLES_PER_SPIN);

const _: () = assert!(spins_per_ms(F_CPU_HZ, CYCLES_PER_SPIN) <= u16::MAX as u32);
const _: () = assert!(NS_PER_SPIN > 0);

/// Burns `n * CYCLES_PER_SPIN` clocks, plus call overhead.
#[inline(never)]
fn spin(n: u16) {
    if n == 0 {
        return;
    }
    unsafe {
        asm!(
            "1: sbiw {n}, 1",
            "brne 1b",
            n = inout(reg_iw) n => _,
            options(nomem, nostack),
        );
    }
}

/// Calibrated busy loop for the 1.2MHz clock. Rounds short waits up.
pub struct Cycles;

impl DelayNs for Cycles {
    fn delay_ns(&mut self, ns: u32) {
        let mut spins = ns.div_ceil(NS_PER_SPIN);
        while spins > 0 {
            let n = spins.min(u16::MAX as u32) as u16;
            spin(n);
            spins -= n as u32;
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            spin(SPINS_PER_MS);
        }
    }
}
