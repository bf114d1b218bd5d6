//! Logging initialization.
//!
//! Logs always go to stderr so that `build --stdout` output can be piped.

use srcbundle_util::log::{self, LogConfig};
use std::io::IsTerminal;

/// Initialize logging based on verbosity.
pub fn init_logging(verbose: bool) {
    let config = if verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };

    log::init(LogConfig {
        ansi: std::io::stderr().is_terminal(),
        ..config
    });
}
