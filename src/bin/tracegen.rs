//! tracegen: tracing middleware generator.

use std::process::ExitCode;

use wrapgen::cli;
use wrapgen::synth::ConcernKind;

fn main() -> ExitCode {
    cli::run(ConcernKind::Tracing)
}
