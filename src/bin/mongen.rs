//! mongen: monitoring middleware generator
//!
//! Wraps a Go interface with go-kit request counters, failure counters
//! and a duration histogram.

use std::process::ExitCode;

use wrapgen::cli;
use wrapgen::synth::ConcernKind;

fn main() -> ExitCode {
    cli::run(ConcernKind::Monitoring)
}
