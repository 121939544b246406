//! Process logger: `[s3replay] message` lines, with level and target shown only for problems.

use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::fmt::Arguments;
use std::io::Write;

const NAME: &str = env!("CARGO_PKG_NAME");

/// Level for this crate's own records. The AWS SDK and hyper stay at Warn regardless.
pub fn crate_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// One rendered log line, without the trailing newline.
pub fn render_line(level: Level, target: &str, args: &Arguments<'_>) -> String {
    let tag = NAME.cyan();
    match level {
        Level::Error => format!("[{} {} {}] {}", tag, "ERROR".red(), target.white(), args),
        Level::Warn => format!("[{} {} {}] {}", tag, "WARN".yellow(), target.white(), args),
        Level::Debug | Level::Trace => format!("[{} {}] {}", tag, "DEBUG".dimmed(), args),
        Level::Info => format!("[{}] {}", tag, args),
    }
}

/// Install the process logger. `RUST_LOG` is still read, then narrowed by `verbose`.
/// A second call is a no-op.
pub fn setup_logging(verbose: bool) {
    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(NAME, crate_level(verbose))
        .format(|buf, record| {
            writeln!(
                buf,
                "{}",
                render_line(record.level(), record.target(), record.args())
            )
        })
        .try_init();
}
