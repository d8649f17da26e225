//! Workspace discovery.
//!
//! Two workspace models coexist:
//! - a manifest workspace, rooted at the nearest ancestor of the working
//!   directory that contains the module manifest;
//! - a flat workspace, rooted at one or more directories listed in an
//!   environment variable, with projects under `<root>/src/<import path>`.
//!
//! Each model is a [`WorkspaceLocator`]; [`locate_workspace`] tries the
//! manifest locator first and falls back to the flat one.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::util::GlobalContext;

/// A discovered workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceRoot {
    /// Directory containing the module manifest.
    Manifest { root: PathBuf },
    /// Ordered flat-workspace roots.
    Flat { roots: Vec<PathBuf> },
}

impl WorkspaceRoot {
    /// Whether this is a manifest workspace.
    pub fn is_manifest(&self) -> bool {
        matches!(self, WorkspaceRoot::Manifest { .. })
    }

    /// The manifest root, if this is a manifest workspace.
    pub fn manifest_root(&self) -> Option<&Path> {
        match self {
            WorkspaceRoot::Manifest { root } => Some(root),
            WorkspaceRoot::Flat { .. } => None,
        }
    }
}

/// A strategy for discovering a workspace root.
pub trait WorkspaceLocator {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Find a workspace root, or `None` if this strategy does not apply.
    fn locate(&self, gctx: &GlobalContext) -> Option<WorkspaceRoot>;
}

/// Finds the nearest ancestor of the working directory holding the manifest.
#[derive(Debug, Clone)]
pub struct ManifestLocator {
    manifest_name: String,
}

impl ManifestLocator {
    pub fn new(manifest_name: impl Into<String>) -> Self {
        ManifestLocator {
            manifest_name: manifest_name.into(),
        }
    }
}

impl WorkspaceLocator for ManifestLocator {
    fn name(&self) -> &'static str {
        "manifest"
    }

    fn locate(&self, gctx: &GlobalContext) -> Option<WorkspaceRoot> {
        find_manifest_root(gctx.cwd(), &self.manifest_name)
            .map(|root| WorkspaceRoot::Manifest { root })
    }
}

/// Enumerates flat-workspace roots from an environment variable.
#[derive(Debug, Clone)]
pub struct FlatLocator {
    env_var: String,
}

impl FlatLocator {
    pub fn new(env_var: impl Into<String>) -> Self {
        FlatLocator {
            env_var: env_var.into(),
        }
    }
}

impl WorkspaceLocator for FlatLocator {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn locate(&self, gctx: &GlobalContext) -> Option<WorkspaceRoot> {
        let roots = enumerate_flat_roots(gctx.env_var(&self.env_var));
        if roots.is_empty() {
            None
        } else {
            Some(WorkspaceRoot::Flat { roots })
        }
    }
}

/// Walk upward from `start` looking for a directory containing `manifest_name`.
///
/// Stops once the parent of the current directory is the directory itself.
pub fn find_manifest_root(start: &Path, manifest_name: &str) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(manifest_name).is_file() {
            debug!("found {} in {}", manifest_name, current.display());
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Split a path-list environment value into its non-empty entries, in order.
pub fn enumerate_flat_roots(value: Option<&OsStr>) -> Vec<PathBuf> {
    match value {
        Some(value) => std::env::split_paths(value)
            .filter(|p| !p.as_os_str().is_empty())
            .collect(),
        None => Vec::new(),
    }
}

/// Locate the workspace, manifest first and flat second.
pub fn locate_workspace(gctx: &GlobalContext) -> Option<WorkspaceRoot> {
    let config = gctx.config();
    let manifest = ManifestLocator::new(config.manifest_name());
    let flat = FlatLocator::new(config.path_env());
    let locators: [&dyn WorkspaceLocator; 2] = [&manifest, &flat];

    for locator in locators {
        if let Some(root) = locator.locate(gctx) {
            debug!("workspace located by {} locator: {:?}", locator.name(), root);
            return Some(root);
        }
    }

    debug!("no workspace root found from {}", gctx.cwd().display());
    None
}
