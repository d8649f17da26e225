//! On-disk fixtures for common test scenarios.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Write a `go.mod` declaring `module` into `dir`, creating `dir`.
pub fn write_manifest(dir: &Path, module: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join("go.mod");
    fs::write(&path, format!("module {}\n\ngo 1.21\n", module)).unwrap();
    path
}

/// Write a framework `version.go` declaring `version` into `dir`.
pub fn write_version_file(dir: &Path, version: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join("version.go");
    fs::write(
        &path,
        format!(
            "package revel\n\nconst (\n\t// Version current framework version\n\tVersion = \"{}\"\n\n\tBuildDate = \"2024-01-01\"\n)\n",
            version
        ),
    )
    .unwrap();
    path
}

/// Create an executable shell script named `name` in `dir`.
#[cfg(unix)]
pub fn fake_toolchain(dir: &Path, name: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, "#!/bin/sh\necho \"go version go1.21.0 linux/amd64\"\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Join directories into a platform path list.
pub fn join_paths(paths: &[PathBuf]) -> OsString {
    std::env::join_paths(paths).unwrap()
}
