//! One generation run: resolve, synthesize, render.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Config;
use crate::emit::render;
use crate::error::{GenError, Result};
use crate::imports::ImportTable;
use crate::output;
use crate::resolution::{Locator, Resolver};
use crate::synth::{self, ConcernKind};

/// A rendered decorator and where it belongs.
#[derive(Debug, Clone)]
pub struct Generated {
    /// `<import path>.<Interface>`
    pub interface: String,
    pub package: String,
    pub path: PathBuf,
    pub source: String,
}

pub struct Generator {
    kind: ConcernKind,
    config: Config,
}

impl Generator {
    pub fn new(kind: ConcernKind, config: Config) -> Self {
        Self { kind, config }
    }

    /// Generate the decorator for `interface` declared in `source_dir`.
    ///
    /// Each call starts from an empty import table, so identical input
    /// renders identical output.
    pub fn generate(
        &self,
        source_dir: &Path,
        interface: &str,
        backend: Option<&str>,
    ) -> Result<Generated> {
        let mut concern = synth::select(self.kind, backend, &self.config)?;

        let source_dir = fs::canonicalize(source_dir).map_err(|source| GenError::Io {
            context: "resolve",
            path: source_dir.to_path_buf(),
            source,
        })?;

        let mut locator = Locator::new(self.config.go.clone());
        let mut imports = ImportTable::new();
        let decl = Resolver::new(&mut locator, &mut imports).resolve(&source_dir, interface)?;

        let package =
            output::target_package(&decl.package_path, &self.config.output.package_suffix);
        let file = synth::synthesize(&decl, concern.as_mut(), &mut imports, &package);
        let source = render(&file);

        info!(
            generator = self.kind.generator(),
            interface,
            package = %package,
            imports = imports.len(),
            "generated decorator"
        );
        Ok(Generated {
            interface: format!("{}.{}", decl.package_path, decl.name),
            path: output::target_path(&source_dir, &package, self.kind, interface),
            package,
            source,
        })
    }

    /// Persist `generated` at its target path.
    pub fn write(&self, generated: &Generated) -> Result<()> {
        output::write_atomic(&generated.path, &generated.source).map_err(|source| GenError::Io {
            context: "write",
            path: generated.path.clone(),
            source,
        })
    }
}
