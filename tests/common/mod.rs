//! Shared utilities for integration tests.
//!
//! Builds throwaway Go modules on disk for the generators to read.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use wrapgen::config::Config;
use wrapgen::synth::ConcernKind;
use wrapgen::Generator;

/// Module path every fixture is declared under.
pub const MODULE: &str = "example.com/acme";

/// A Go module in a temporary directory.
pub struct GoModule {
    dir: TempDir,
}

impl GoModule {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("go.mod"), format!("module {}\n\ngo 1.21\n", MODULE))
            .expect("Failed to write go.mod");
        Self { dir }
    }

    /// Add a file at `rel`, creating directories as needed.
    pub fn file(self, rel: &str, contents: &str) -> Self {
        let path = self.dir.path().join(rel);
        fs::create_dir_all(path.parent().expect("file has a parent")).expect("Failed to mkdir");
        fs::write(&path, contents).expect("Failed to write fixture");
        self
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn dir(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }
}

/// Config that ignores the host toolchain.
pub fn test_config() -> Config {
    Config::default()
}

pub fn generator(kind: ConcernKind) -> Generator {
    Generator::new(kind, test_config())
}

/// Generate and return the rendered source.
pub fn render(kind: ConcernKind, module: &GoModule, pkg: &str, interface: &str, backend: Option<&str>) -> String {
    generator(kind)
        .generate(&module.dir(pkg), interface, backend)
        .expect("generation failed")
        .source
}

/// The package used throughout the generator tests.
pub const WORKER_SOURCE: &str = r#"package svc

import "context"

type Job struct{ ID string }

// Worker does work.
type Worker interface {
	Do(ctx context.Context, job *Job) (int, error)
	Stats() map[string]int
	Log(format string, args ...interface{})
}
"#;

pub fn worker_module() -> GoModule {
    GoModule::new().file("svc/worker.go", WORKER_SOURCE)
}
