//! Configuration file support for Mooring.
//!
//! Mooring reads two configuration file locations:
//! - Global: `~/.mooring/config.toml` - User-wide defaults
//! - Project: `.mooring/config.toml` - Overrides for the working directory
//!
//! Project config takes precedence over global config. Every setting is
//! optional; unset settings fall back to the Go toolchain conventions.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default module manifest file name.
pub const DEFAULT_MANIFEST: &str = "go.mod";

/// Default environment variable listing flat-workspace roots.
pub const DEFAULT_PATH_ENV: &str = "GOPATH";

/// Default conventional source subdirectory of a flat-workspace root.
pub const DEFAULT_SOURCE_DIR: &str = "src";

/// Default toolchain executable.
pub const DEFAULT_TOOLCHAIN: &str = "go";

/// Default framework import path.
pub const DEFAULT_FRAMEWORK: &str = "github.com/revel/revel";

/// Default framework version-declaration file.
pub const DEFAULT_VERSION_FILE: &str = "version.go";

/// Default name of the framework's version constant.
pub const DEFAULT_VERSION_CONSTANT: &str = "Version";

/// Mooring configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workspace discovery settings
    pub workspace: WorkspaceSettings,

    /// Toolchain settings
    pub toolchain: ToolchainSettings,

    /// Framework settings
    pub framework: FrameworkSettings,
}

/// Workspace discovery settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct WorkspaceSettings {
    /// Manifest file name (e.g., go.mod)
    pub manifest: Option<String>,

    /// Environment variable holding flat-workspace roots (e.g., GOPATH)
    pub path_env: Option<String>,

    /// Source subdirectory under each flat root (e.g., src)
    pub source_dir: Option<String>,
}

/// Toolchain settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// Executable name or path (e.g., go)
    pub executable: Option<String>,
}

/// Framework settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FrameworkSettings {
    /// Import path of the framework package
    pub import_path: Option<String>,

    /// File inside the framework package declaring its version
    pub version_file: Option<String>,

    /// Name of the version constant in that file
    pub version_constant: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        fn take(slot: &mut Option<String>, value: Option<String>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.workspace.manifest, other.workspace.manifest);
        take(&mut self.workspace.path_env, other.workspace.path_env);
        take(&mut self.workspace.source_dir, other.workspace.source_dir);
        take(&mut self.toolchain.executable, other.toolchain.executable);
        take(&mut self.framework.import_path, other.framework.import_path);
        take(&mut self.framework.version_file, other.framework.version_file);
        take(
            &mut self.framework.version_constant,
            other.framework.version_constant,
        );
    }

    pub fn manifest_name(&self) -> &str {
        self.workspace.manifest.as_deref().unwrap_or(DEFAULT_MANIFEST)
    }

    pub fn path_env(&self) -> &str {
        self.workspace.path_env.as_deref().unwrap_or(DEFAULT_PATH_ENV)
    }

    pub fn source_dir(&self) -> &str {
        self.workspace
            .source_dir
            .as_deref()
            .unwrap_or(DEFAULT_SOURCE_DIR)
    }

    pub fn toolchain(&self) -> &str {
        self.toolchain
            .executable
            .as_deref()
            .unwrap_or(DEFAULT_TOOLCHAIN)
    }

    pub fn framework_import_path(&self) -> &str {
        self.framework
            .import_path
            .as_deref()
            .unwrap_or(DEFAULT_FRAMEWORK)
    }

    pub fn version_file(&self) -> &str {
        self.framework
            .version_file
            .as_deref()
            .unwrap_or(DEFAULT_VERSION_FILE)
    }

    pub fn version_constant(&self) -> &str {
        self.framework
            .version_constant
            .as_deref()
            .unwrap_or(DEFAULT_VERSION_CONSTANT)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.mooring/config.toml)
/// 2. Global config (~/.mooring/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global mooring config directory (~/.mooring).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".mooring"))
}

/// Get the project config path (.mooring/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".mooring").join("config.toml")
}
