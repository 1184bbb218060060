//! Where generated files go and how they are written.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::synth::ConcernKind;
use crate::utils::to_snake_case;

/// Output package for a source package: the last import path element
/// plus `suffix`, e.g. `example.com/acme/svc` -> `svcmws`.
pub fn target_package(import_path: &str, suffix: &str) -> String {
    let base = import_path.rsplit('/').next().unwrap_or(import_path);
    let base: String = base
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("{}{}", base, suffix)
}

/// `<logging|monitoring|tracing>_<snake_case(interface)>.go`
pub fn file_name(kind: ConcernKind, interface: &str) -> String {
    format!("{}_{}.go", kind.file_prefix(), to_snake_case(interface))
}

/// Path of the generated file for `interface` in `source_dir`.
pub fn target_path(source_dir: &Path, package: &str, kind: ConcernKind, interface: &str) -> PathBuf {
    source_dir.join(package).join(file_name(kind, interface))
}

/// Write `contents` to `path`, creating parent directories.
///
/// The file is written next to its destination and renamed over it, so
/// readers never observe a partial file.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let result = fs::write(&temp_path, contents).and_then(|()| fs::rename(&temp_path, path));
    match &result {
        Ok(()) => debug!(path = %path.display(), bytes = contents.len(), "wrote file"),
        Err(_) => {
            let _ = fs::remove_file(&temp_path);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_target_package() {
        assert_eq!(target_package("github.com/acme/examples", "mws"), "examplesmws");
        assert_eq!(target_package("svc", "mws"), "svcmws");
        assert_eq!(target_package("example.com/go-kit", "wrap"), "go_kitwrap");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(ConcernKind::Logging, "GoKitService"), "logging_go_kit_service.go");
        assert_eq!(file_name(ConcernKind::Monitoring, "Worker"), "monitoring_worker.go");
        assert_eq!(file_name(ConcernKind::Tracing, "HTTPClient"), "tracing_http_client.go");
    }

    #[test]
    fn test_write_atomic_creates_and_replaces() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("svcmws").join("logging_worker.go");

        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        let entries: Vec<_> = fs::read_dir(path.parent().unwrap()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_atomic_cleans_up_on_failure() {
        let tmp = TempDir::new().unwrap();
        // Destination is a non-empty directory, so the rename fails.
        let path = tmp.path().join("out.go");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        assert!(write_atomic(&path, "data").is_err());
        assert!(!tmp.path().join("out.go.tmp").exists());
    }
}
