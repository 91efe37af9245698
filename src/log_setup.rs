//! Logging setup for binaries embedding this crate.
//!
//! The core itself only ever logs through the `log` facade; this helper
//! wires up `simplelog`'s terminal logger the way
//! `subsweep::simulation_builder::SimulationBuilder::log_setup` does,
//! minus the MPI rank branching (this crate is single-process) and minus
//! the file-output half (a log *file* is an output-format decision, left
//! to the host application alongside the rest of spec §6's non-goals).

use log::LevelFilter;
use simplelog::ColorChoice;
use simplelog::ConfigBuilder;
use simplelog::TermLogger;
use simplelog::TerminalMode;

/// Verbosity as the host application's command line would specify it:
/// `0` = info, `1` = debug, `2` = trace.
pub fn level_for_verbosity(verbosity: usize) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initialize a process-global terminal logger at the given verbosity.
/// Returns an error if a logger has already been installed.
pub fn init_term_logger(verbosity: usize) -> Result<(), log::SetLoggerError> {
    let level = level_for_verbosity(verbosity);
    let now = chrono::Local::now();
    let offset_seconds = now.offset().local_minus_utc();
    let mut builder = ConfigBuilder::default();
    builder.set_level_padding(simplelog::LevelPadding::Right);
    builder.set_thread_level(LevelFilter::Off);
    if let Ok(offset) = time::UtcOffset::from_whole_seconds(offset_seconds) {
        builder.set_time_offset(offset);
    }
    TermLogger::init(level, builder.build(), TerminalMode::Mixed, ColorChoice::Auto)
}
