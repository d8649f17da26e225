//! Global context for Mooring operations.
//!
//! Provides centralized access to the working directory, configuration and
//! a snapshot of the process environment. Resolution code reads the
//! environment only through this snapshot, so a context can be built for any
//! directory and environment without touching the real process state.

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::workspace::enumerate_flat_roots;
use crate::util::config::{global_config_dir, load_config, project_config_path, Config};

/// Global context containing configuration, paths and environment.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global Mooring data (~/.mooring/)
    home: PathBuf,

    /// Merged configuration
    config: Config,

    /// Environment snapshot
    env: HashMap<String, OsString>,
}

impl GlobalContext {
    /// Create a new GlobalContext for the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext for a specific working directory.
    ///
    /// Loads global and project configuration and snapshots the process
    /// environment.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let mut ctx = Self::isolated(cwd);
        ctx.config = load_config(&ctx.config_path(), &project_config_path(&ctx.cwd));
        ctx.env = std::env::vars_os()
            .filter_map(|(k, v)| k.into_string().ok().map(|k| (k, v)))
            .collect();
        ctx
    }

    /// Create a GlobalContext with default configuration and an empty
    /// environment.
    pub fn isolated(cwd: PathBuf) -> Self {
        let home = global_config_dir().unwrap_or_else(|| PathBuf::from(".mooring"));

        GlobalContext {
            cwd,
            home,
            config: Config::default(),
            env: HashMap::new(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set an environment variable in the snapshot.
    pub fn with_env(mut self, key: impl Into<String>, value: impl AsRef<OsStr>) -> Self {
        self.env.insert(key.into(), value.as_ref().to_os_string());
        self
    }

    /// Remove an environment variable from the snapshot.
    pub fn without_env(mut self, key: &str) -> Self {
        self.env.remove(key);
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the Mooring home directory (~/.mooring/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// The user's home directory, from the environment snapshot when set.
    pub fn user_home(&self) -> Option<PathBuf> {
        let key = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
        match self.env_var(key) {
            Some(home) => Some(PathBuf::from(home)),
            None => directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()),
        }
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Get the merged configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Look up an environment variable; empty values count as unset.
    pub fn env_var(&self, key: &str) -> Option<&OsStr> {
        self.env
            .get(key)
            .map(OsString::as_os_str)
            .filter(|v| !v.is_empty())
    }

    /// The ordered flat-workspace roots from the configured environment
    /// variable.
    pub fn flat_roots(&self) -> Vec<PathBuf> {
        enumerate_flat_roots(self.env_var(self.config.path_env()))
    }
}
