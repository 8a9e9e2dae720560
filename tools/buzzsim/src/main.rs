use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use buzz_core::{Chunking, Prescaler, Program, SweepSpec};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::util::SubscriberInitExt;

use buzzsim::{parse_prescaler, pitch_table, PlayOptions, Timeline};

#[derive(Parser)]
#[command(name = "buzzsim")]
#[command(version, about = "ATtiny13 buzzer simulator", long_about = None)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the pitch table with its error against equal temperament
    Table,

    /// Run a program against the simulated timer
    Play {
        /// melody-1, melody-2, alarm or button
        program: Program,

        /// Main-loop passes to run
        #[arg(short, long, default_value_t = 1)]
        rounds: u32,

        /// Sleep for real instead of advancing a virtual clock
        #[arg(long)]
        realtime: bool,

        /// Walk the whole pitch table before the main loop
        #[arg(long)]
        walk_octaves: bool,

        /// Wait in 100ms/10ms/1ms chunks instead of 1ms
        #[arg(long)]
        coarse_delay: bool,

        /// Hold the button down at reset (button program only)
        #[arg(long)]
        pressed: bool,

        /// Write the timeline here instead of stdout
        #[arg(long)]
        trace: Option<PathBuf>,
    },

    /// Play one fade sweep
    Sweep {
        /// First divider (1 + OCR0A)
        #[arg(long)]
        start: u8,

        /// Clock divide ratio
        #[arg(long, value_parser = parse_prescaler, default_value = "8")]
        prescaler: Prescaler,

        #[arg(long, default_value_t = 6)]
        iterations: u8,

        /// Tone length of each tick in ms
        #[arg(long, default_value_t = 10)]
        delay: u8,

        /// Silence after the last tick in ms
        #[arg(long, default_value_t = 0)]
        pause: u8,

        /// Divider change per tick
        #[arg(long, default_value_t = 1, allow_hyphen_values = true)]
        fade: i8,

        #[arg(long)]
        realtime: bool,
    },
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .compact()
        .finish()
        .init();
}

fn print_table() -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "oct note  div prescaler      freq    target   error")?;
    for row in pitch_table() {
        writeln!(
            out,
            "{:>3} {:<4} {:>4} {:<9} {:>9.2} {:>9.2} {:>+6.2}%",
            row.octave,
            row.note.name(),
            row.pitch.divider,
            row.pitch.prescaler.to_string(),
            row.frequency_hz,
            row.target_hz,
            row.error_percent(),
        )?;
    }
    Ok(())
}

fn emit(timeline: &Timeline, trace: Option<PathBuf>) -> anyhow::Result<()> {
    match trace {
        Some(path) => {
            timeline.save(&path)?;
            info!("wrote {} entries to {}", timeline.entries.len(), path.display());
            Ok(())
        }
        None => timeline.write_to(io::stdout().lock()).context("writing timeline"),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Table => print_table(),

        Commands::Play { program, rounds, realtime, walk_octaves, coarse_delay, pressed, trace } => {
            let mut opts = PlayOptions::new(program);
            opts.rounds = rounds;
            opts.realtime = realtime;
            opts.button_pressed = pressed;
            opts.config.walk_octaves = walk_octaves;
            if coarse_delay {
                opts.config.chunking = Chunking::Coarse;
            }
            emit(&buzzsim::play(&opts), trace)
        }

        Commands::Sweep { start, prescaler, iterations, delay, pause, fade, realtime } => {
            let leg = SweepSpec::new(start, prescaler, iterations, delay, pause, fade);
            emit(&buzzsim::sweep(&leg, realtime)?, None)
        }
    }
}
