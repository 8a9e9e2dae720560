#![no_std]
#![no_main]
#![feature(asm_experimental_arch)]

use core::panic::PanicInfo;

use buzz_core::button::read_pressed;
use buzz_core::{BusyWait, Chunking, Config, Program, Sequencer, Timer0, ToneDriver};

use crate::cycles::Cycles;
use crate::regs::{BUTTON, PortB, SPEAKER, Tc0};

mod cycles;
mod regs;

#[cfg(any(
    all(feature = "melody-1", any(feature = "melody-2", feature = "two-tone-alarm", feature = "button-alarm")),
    all(feature = "melody-2", any(feature = "two-tone-alarm", feature = "button-alarm")),
    all(feature = "two-tone-alarm", feature = "button-alarm"),
))]
compile_error!("pick one program feature (use --no-default-features to swap melody-1 out)");

const PROGRAM: Program = if cfg!(feature = "button-alarm") {
    Program::ButtonAlarm
} else if cfg!(feature = "two-tone-alarm") {
    Program::TwoToneAlarm
} else if cfg!(feature = "melody-2") {
    Program::Melody2
} else {
    Program::Melody1
};

const CONFIG: Config = Config {
    program: PROGRAM,
    walk_octaves: cfg!(feature = "walk-octaves"),
    chunking: if cfg!(feature = "coarse-delay") { Chunking::Coarse } else { Chunking::Fine },
};

#[panic_handler]
fn panic(_panic: &PanicInfo<'_>) -> ! {
    loop {}
}

#[unsafe(no_mangle)]
pub extern "C" fn main() -> ! {
    let port = unsafe { PortB::new() };
    port.make_output(SPEAKER);
    if CONFIG.program.uses_button() {
        port.make_pulled_up_input(BUTTON);
    }

    let mut timer = Timer0::new(unsafe { Tc0::new() });
    timer.configure_ctc();

    let mut seq = Sequencer::new(timer, BusyWait::new(Cycles, CONFIG.chunking));
    seq.startup(&CONFIG);

    // sampled once, after the pull-up has had the startup wait to settle
    let pressed = if CONFIG.program.uses_button() {
        let Ok(low) = read_pressed(&mut port.input(BUTTON));
        low
    } else {
        false
    };

    let mut playback = CONFIG.program.playback(pressed);
    while seq.step(&mut playback) {}

    seq.driver_mut().stop();
    loop {}
}
