use anyhow::Result;
use clap::Parser;
use slog::Drain;

/// Whether `args` turn on debug output, read the same way `do_main` reads
/// `-d/--debug` and `DEBUG`. Arguments that do not parse leave it off.
pub fn debug_requested(args: &[String]) -> bool {
    crate::Opts::try_parse_from(args)
        .map(|opts| opts.debug)
        .unwrap_or(false)
}

/// Build the terminal logger. Records go to stderr; drop the guard to flush them.
pub fn new_logger(debug: bool) -> (slog::Logger, slog_async::AsyncGuard) {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let (drain, guard) = slog_async::Async::new(drain).build_with_guard();

    let level = if debug { slog::Level::Debug } else { slog::Level::Warning };
    let drain = slog::LevelFilter::new(drain, level).fuse();

    (slog::Logger::root(drain, slog::o!()), guard)
}

/// Route `log` records from dependencies into `logger`.
pub fn bridge_std_log(logger: &slog::Logger, debug: bool) -> Result<()> {
    slog_scope::set_global_logger(logger.clone()).cancel_reset();

    let level = if debug { log::Level::Debug } else { log::Level::Warn };
    slog_stdlog::init_with_level(level)?;

    Ok(())
}

/// A logger that drops everything.
pub fn discard() -> slog::Logger {
    slog::Logger::root(slog::Discard, slog::o!())
}
