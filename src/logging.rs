//! Console logger setup.
//!
//! All step output, annotated findings included, goes through the `log`
//! facade. Lines are written to stdout so findings and progress messages
//! keep their relative order. With `--output json` stdout is reserved for
//! the summary document and records move to stderr (`use_stderr`).
//!
//! `RUST_LOG` still overrides the level. Analyzer lines that are not
//! annotated are logged at info, so a filter above info (`RUST_LOG=warn`)
//! hides them from the console; the raw log export is unaffected.

use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

static TO_STDERR: AtomicBool = AtomicBool::new(false);

/// Log writer that follows the stream chosen with `use_stderr`.
struct Console;

impl Write for Console {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if TO_STDERR.load(Ordering::Relaxed) {
            io::stderr().write(buf)
        } else {
            io::stdout().write(buf)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        io::stderr().flush()
    }
}

fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Render one record the way it appears on the console.
pub fn render(level: Level, message: &str, color: bool) -> String {
    if !color {
        return match level {
            Level::Error | Level::Warn | Level::Info => message.to_string(),
            Level::Debug | Level::Trace => format!("[debug] {message}"),
        };
    }
    match level {
        Level::Error => message.red().to_string(),
        Level::Warn => message.yellow().to_string(),
        Level::Info => message.to_string(),
        Level::Debug | Level::Trace => format!("[debug] {message}").dimmed().to_string(),
    }
}

/// Install the global logger at info level.
///
/// The logger itself accepts debug records; the global max level decides,
/// so `set_verbose` can lower it once the inputs are known. Installing it
/// before input parsing keeps configuration errors visible.
pub fn init() {
    let color = use_colors();
    let installed = env_logger::Builder::new()
        .filter_level(LevelFilter::Debug)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(Console)))
        .format(move |buf, record| {
            writeln!(
                buf,
                "{}",
                render(record.level(), &record.args().to_string(), color)
            )
        })
        .try_init();
    if let Err(err) = installed {
        eprintln!("logger setup failed: {err}");
    }
    if !rust_log_set() {
        log::set_max_level(LevelFilter::Info);
    }
}

/// Switch debug output on or off unless `RUST_LOG` decides.
pub fn set_verbose(verbose: bool) {
    if rust_log_set() {
        return;
    }
    log::set_max_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
}

/// Send log records to stderr (`true`) or stdout (`false`).
pub fn use_stderr(enabled: bool) {
    TO_STDERR.store(enabled, Ordering::Relaxed);
}

fn rust_log_set() -> bool {
    std::env::var_os("RUST_LOG").is_some()
}
