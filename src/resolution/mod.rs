//! Interface resolution.
//!
//! The [`Locator`] maps directories and import paths onto parsed
//! packages; the [`Resolver`] finds a named interface in one of them,
//! flattens embedded interfaces and rewrites every type reference into
//! the run's import aliases.

mod locator;
mod resolver;

use std::path::PathBuf;

pub use locator::{guess_package_name, Locator, Package};
pub use resolver::{is_predeclared, Resolver};

use crate::syntax::SyntaxError;

/// Result type for resolution.
pub type Result<T> = std::result::Result<T, ResolutionError>;

/// Errors raised while locating packages or resolving an interface.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("cannot determine import path of {}: no go.mod or GOPATH entry encloses it", dir.display())]
    NotInModule { dir: PathBuf },

    #[error("cannot find package {path}")]
    PackageNotFound { path: String },

    #[error("no Go source files in {}", dir.display())]
    NoGoFiles { dir: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", file.display())]
    Syntax {
        file: PathBuf,
        #[source]
        source: SyntaxError,
    },

    #[error("type {name} not found in package {package}")]
    NotFound { name: String, package: String },

    #[error("type {name} is declared more than once in package {package}")]
    Ambiguous { name: String, package: String },

    #[error("{name} is not an interface ({kind})")]
    NotAnInterface { name: String, kind: String },

    #[error("generic interface {name} is not supported")]
    GenericInterface { name: String },

    #[error("{}: unknown package {qualifier}", file.display())]
    UnknownPackage { qualifier: String, file: PathBuf },

    #[error("interface {name} embeds itself")]
    EmbeddingCycle { name: String },
}
