//! wrapgen - Go decorator generators
//!
//! Reads a Go package from disk, resolves a named interface and writes a
//! decorator implementing it that adds one cross-cutting concern: error
//! logging (`logen`), monitoring (`mongen`) or tracing (`tracegen`).
//!
//! The pipeline is [`resolution`] → [`synth`] → [`emit`], driven by
//! [`generator::Generator`].

pub mod cli;
pub mod config;
pub mod emit;
pub mod error;
pub mod generator;
pub mod imports;
pub mod model;
pub mod output;
pub mod resolution;
pub mod syntax;
pub mod synth;
pub mod utils;

pub use error::{GenError, Result};
pub use generator::{Generated, Generator};
