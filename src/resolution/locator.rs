//! Package discovery.
//!
//! Maps directories to import paths and back using the enclosing
//! `go.mod`, its `vendor/` tree, GOROOT and GOPATH, and caches parsed
//! packages for the duration of one run.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, warn};

use super::{ResolutionError, Result};
use crate::config::GoConfig;
use crate::syntax::{parse_file, SourceFile, TypeSpec};

/// A parsed Go package.
#[derive(Debug)]
pub struct Package {
    /// Import path.
    pub path: String,
    /// Name from the package clause.
    pub name: String,
    pub dir: PathBuf,
    /// Non-test files in file-name order.
    pub files: Vec<SourceFile>,
}

impl Package {
    /// Whether any file declares a type called `name`.
    pub fn declares(&self, name: &str) -> bool {
        self.files.iter().any(|f| f.find_type(name).is_some())
    }

    /// The unique declaration of `name` together with its file.
    pub fn lookup(&self, name: &str) -> Result<(&SourceFile, &TypeSpec)> {
        let mut found = self
            .files
            .iter()
            .flat_map(|f| f.types.iter().filter(|t| t.name == name).map(move |t| (f, t)));
        let first = found.next().ok_or_else(|| ResolutionError::NotFound {
            name: name.to_string(),
            package: self.path.clone(),
        })?;
        if found.next().is_some() {
            return Err(ResolutionError::Ambiguous {
                name: name.to_string(),
                package: self.path.clone(),
            });
        }
        Ok(first)
    }
}

/// Resolves and loads packages.
pub struct Locator {
    go: GoConfig,
    cache: HashMap<String, Rc<Package>>,
}

impl Locator {
    pub fn new(go: GoConfig) -> Self {
        Self {
            go,
            cache: HashMap::new(),
        }
    }

    /// Import path of the package in `dir`.
    pub fn import_path_for_dir(&self, dir: &Path) -> Result<String> {
        if let Some((root, module)) = find_module(dir)? {
            let rel = dir.strip_prefix(&root).unwrap_or(Path::new(""));
            return Ok(join_import(&module, rel));
        }
        for entry in &self.go.path {
            let src = entry.join("src");
            if let Ok(rel) = dir.strip_prefix(&src) {
                if rel.as_os_str().is_empty() {
                    continue;
                }
                return Ok(join_import("", rel));
            }
        }
        Err(ResolutionError::NotInModule {
            dir: dir.to_path_buf(),
        })
    }

    /// Directory holding `import_path`, as seen from code in `from`.
    pub fn dir_for_import(&self, import_path: &str, from: &Path) -> Result<PathBuf> {
        let mut candidates = Vec::new();
        if let Some((root, module)) = find_module(from)? {
            if import_path == module {
                candidates.push(root.clone());
            } else if let Some(rest) = import_path
                .strip_prefix(module.as_str())
                .and_then(|r| r.strip_prefix('/'))
            {
                candidates.push(root.join(rest));
            }
            candidates.push(root.join("vendor").join(import_path));
        }
        if let Some(goroot) = &self.go.root {
            candidates.push(goroot.join("src").join(import_path));
        }
        for entry in &self.go.path {
            candidates.push(entry.join("src").join(import_path));
        }

        candidates
            .into_iter()
            .find(|dir| dir.is_dir())
            .ok_or_else(|| ResolutionError::PackageNotFound {
                path: import_path.to_string(),
            })
    }

    /// Load the package in `dir`.
    pub fn load_dir(&mut self, dir: &Path) -> Result<Rc<Package>> {
        let import_path = self.import_path_for_dir(dir)?;
        if let Some(pkg) = self.cache.get(&import_path) {
            return Ok(Rc::clone(pkg));
        }
        let pkg = Rc::new(read_package(dir, &import_path)?);
        self.cache.insert(import_path, Rc::clone(&pkg));
        Ok(pkg)
    }

    /// Load `import_path` as imported from code in `from`.
    pub fn load(&mut self, import_path: &str, from: &Path) -> Result<Rc<Package>> {
        if let Some(pkg) = self.cache.get(import_path) {
            return Ok(Rc::clone(pkg));
        }
        let dir = self.dir_for_import(import_path, from)?;
        debug!(path = import_path, dir = %dir.display(), "loading package");
        let pkg = Rc::new(read_package(&dir, import_path)?);
        self.cache.insert(import_path.to_string(), Rc::clone(&pkg));
        Ok(pkg)
    }
}

fn read_package(dir: &Path, import_path: &str) -> Result<Package> {
    let read_err = |source| ResolutionError::Read {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(read_err)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| is_package_source(p))
        .collect();
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let source = fs::read_to_string(&path).map_err(|source| ResolutionError::Read {
            path: path.clone(),
            source,
        })?;
        let file = parse_file(&path, &source).map_err(|source| ResolutionError::Syntax {
            file: path.clone(),
            source,
        })?;
        files.push(file);
    }

    let Some(name) = files.first().map(|f| f.package.clone()) else {
        return Err(ResolutionError::NoGoFiles {
            dir: dir.to_path_buf(),
        });
    };
    files.retain(|f| {
        let same = f.package == name;
        if !same {
            warn!(
                file = %f.path.display(),
                package = %f.package,
                expected = %name,
                "skipping file from a different package"
            );
        }
        same
    });

    debug!(path = import_path, files = files.len(), "parsed package");
    Ok(Package {
        path: import_path.to_string(),
        name,
        dir: dir.to_path_buf(),
        files,
    })
}

fn is_package_source(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    path.is_file() && name.ends_with(".go") && !name.ends_with("_test.go")
}

/// Nearest `go.mod` at or above `dir`: (module root, module path).
fn find_module(dir: &Path) -> Result<Option<(PathBuf, String)>> {
    for ancestor in dir.ancestors() {
        let go_mod = ancestor.join("go.mod");
        if !go_mod.is_file() {
            continue;
        }
        let contents = fs::read_to_string(&go_mod).map_err(|source| ResolutionError::Read {
            path: go_mod.clone(),
            source,
        })?;
        if let Some(module) = parse_module_path(&contents) {
            return Ok(Some((ancestor.to_path_buf(), module)));
        }
        warn!(file = %go_mod.display(), "go.mod has no module directive");
    }
    Ok(None)
}

fn parse_module_path(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or("").trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let module = rest.trim().trim_matches('"');
        (!module.is_empty()).then(|| module.to_string())
    })
}

fn join_import(base: &str, rel: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !base.is_empty() {
        parts.push(base.to_string());
    }
    parts.extend(
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}

/// Package name conventionally used for `import_path`: the last element,
/// skipping a major-version suffix, with `.vN` and `go-` decorations
/// removed.
pub fn guess_package_name(import_path: &str) -> String {
    let mut segments: Vec<&str> = import_path.split('/').collect();
    if segments.len() > 1 {
        if let Some(last) = segments.last() {
            let is_major = last.len() > 1
                && last.starts_with('v')
                && last[1..].chars().all(|c| c.is_ascii_digit());
            if is_major {
                segments.pop();
            }
        }
    }
    let last = segments.last().copied().unwrap_or(import_path);
    let last = last.split('.').next().unwrap_or(last);
    let last = last.strip_prefix("go-").unwrap_or(last);
    let last = last.strip_suffix("-go").unwrap_or(last);
    last.replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_guess_package_name() {
        assert_eq!(guess_package_name("context"), "context");
        assert_eq!(guess_package_name("github.com/go-kit/kit/log"), "log");
        assert_eq!(guess_package_name("gopkg.in/yaml.v2"), "yaml");
        assert_eq!(guess_package_name("github.com/jackc/pgx/v5"), "pgx");
        assert_eq!(guess_package_name("github.com/mattn/go-sqlite3"), "sqlite3");
    }

    #[test]
    fn test_parse_module_path() {
        assert_eq!(
            parse_module_path("// comment\nmodule example.com/acme // trailing\n\ngo 1.21\n"),
            Some("example.com/acme".to_string())
        );
        assert_eq!(parse_module_path("modules x\n"), None);
    }

    #[test]
    fn test_import_path_from_go_mod() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "go.mod", "module example.com/acme\n");
        write(tmp.path(), "svc/store/store.go", "package store\n");
        let locator = Locator::new(GoConfig::default());

        assert_eq!(
            locator.import_path_for_dir(&tmp.path().join("svc/store")).unwrap(),
            "example.com/acme/svc/store"
        );
        assert_eq!(locator.import_path_for_dir(tmp.path()).unwrap(), "example.com/acme");
    }

    #[test]
    fn test_import_path_from_gopath() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "src/github.com/acme/svc/svc.go", "package svc\n");
        let locator = Locator::new(GoConfig {
            root: None,
            path: vec![tmp.path().to_path_buf()],
        });
        let dir = tmp.path().join("src/github.com/acme/svc");
        assert_eq!(locator.import_path_for_dir(&dir).unwrap(), "github.com/acme/svc");
    }

    #[test]
    fn test_dir_for_import_prefers_module_then_vendor() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "go.mod", "module example.com/acme\n");
        write(tmp.path(), "api/api.go", "package api\n");
        write(tmp.path(), "vendor/github.com/ext/lib/lib.go", "package lib\n");
        let locator = Locator::new(GoConfig::default());

        assert_eq!(
            locator.dir_for_import("example.com/acme/api", tmp.path()).unwrap(),
            tmp.path().join("api")
        );
        assert_eq!(
            locator.dir_for_import("github.com/ext/lib", tmp.path()).unwrap(),
            tmp.path().join("vendor/github.com/ext/lib")
        );
        assert!(matches!(
            locator.dir_for_import("github.com/missing/pkg", tmp.path()),
            Err(ResolutionError::PackageNotFound { .. })
        ));
    }

    #[test]
    fn test_load_skips_tests_and_foreign_packages() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "go.mod", "module example.com/acme\n");
        write(tmp.path(), "a.go", "package acme\ntype A int\n");
        write(tmp.path(), "a_test.go", "package acme\ntype T int\n");
        write(tmp.path(), "gen.go", "package main\ntype G int\n");
        let mut locator = Locator::new(GoConfig::default());

        let pkg = locator.load_dir(tmp.path()).unwrap();
        assert_eq!(pkg.name, "acme");
        assert_eq!(pkg.files.len(), 1);
        assert!(pkg.declares("A"));
        assert!(!pkg.declares("T"));
        assert!(!pkg.declares("G"));
    }

    #[test]
    fn test_lookup_reports_missing_and_duplicate() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "go.mod", "module example.com/acme\n");
        write(tmp.path(), "a.go", "package acme\ntype Dup int\n");
        write(tmp.path(), "b.go", "package acme\ntype Dup string\n");
        let mut locator = Locator::new(GoConfig::default());
        let pkg = locator.load_dir(tmp.path()).unwrap();

        assert!(matches!(pkg.lookup("Dup"), Err(ResolutionError::Ambiguous { .. })));
        assert!(matches!(pkg.lookup("Nope"), Err(ResolutionError::NotFound { .. })));
    }

    #[test]
    fn test_empty_directory() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "go.mod", "module example.com/acme\n");
        let mut locator = Locator::new(GoConfig::default());
        assert!(matches!(
            locator.load_dir(tmp.path()),
            Err(ResolutionError::NoGoFiles { .. })
        ));
    }
}
