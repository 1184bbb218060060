//! logen: error logging middleware generator
//!
//! Wraps a Go interface so every method returning an `error` logs the
//! failure before returning it.
//!
//! ## Usage
//! ```text
//! logen SOURCE_DIR INTERFACE_NAME [go_kit_log|zap]
//! ```
//!
//! ## Configuration
//! - WRAPGEN_CONFIG: Path to a YAML config file (default: ./wrapgen.yaml)
//! - WRAPGEN_LOG: Log filter (default: warn)

use std::process::ExitCode;

use wrapgen::cli;
use wrapgen::synth::ConcernKind;

fn main() -> ExitCode {
    cli::run(ConcernKind::Logging)
}
