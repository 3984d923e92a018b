use log::SetLoggerError;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs a stderr terminal logger. Must be called once, before any logging.
pub fn init_logging(verbose: bool) -> Result<(), SetLoggerError> {
    let mut builder = ConfigBuilder::new();
    // Falls back to UTC timestamps when the local offset cannot be determined.
    let _ = builder.set_time_offset_to_local();
    builder
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off);

    TermLogger::init(
        level_for(verbose),
        builder.build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
}
