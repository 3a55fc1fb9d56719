//! Shared plumbing for the command-line tools.

use tracing::Level;

/// Install a stderr subscriber: warnings by default, `-v` info, `-vv` debug, `-vvv` trace.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}
