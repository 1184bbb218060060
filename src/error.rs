//! Top-level generator errors.

use std::path::PathBuf;

use crate::config::ConfigError;
use crate::resolution::ResolutionError;
use crate::synth::UnsupportedSelector;

/// Result type for a generation run.
pub type Result<T> = std::result::Result<T, GenError>;

#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    UnsupportedSelector(#[from] UnsupportedSelector),

    #[error("failed to {context} {}: {source}", path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
