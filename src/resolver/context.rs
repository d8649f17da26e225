//! The per-invocation resolution record.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::operation::Operation;
use crate::core::toolchain::Toolchain;
use crate::core::version::Version;
use crate::core::workspace::locate_workspace;
use crate::ops::compat::check_compatibility;
use crate::ops::fetch::PackageResolver;
use crate::resolver::{resolve_app_path, resolve_import_path, ResolveError};
use crate::util::GlobalContext;

/// Everything resolved for one command invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionContext {
    pub operation: Operation,
    /// The path as given on the command line.
    pub raw_path: String,
    /// Canonical import path; empty only for `version`.
    pub import_path: String,
    /// Absolute application directory; absent only for `version`.
    pub app_path: Option<PathBuf>,
    /// Whether the application path came from a module manifest.
    pub uses_manifest: bool,
    pub manifest_root: Option<PathBuf>,
    /// The toolchain executable.
    pub toolchain: PathBuf,
    pub tool_version: Version,
    /// Set once the framework check has run.
    pub framework_version: Option<Version>,
}

impl ResolutionContext {
    /// Probe the toolchain, then resolve the import and application paths.
    pub fn resolve_paths(
        gctx: &GlobalContext,
        op: Operation,
        raw: &str,
    ) -> Result<Self, ResolveError> {
        let toolchain = Toolchain::probe(gctx)?;
        Self::resolve_paths_with(gctx, op, raw, toolchain)
    }

    /// Resolve the import and application paths with a known toolchain.
    pub fn resolve_paths_with(
        gctx: &GlobalContext,
        op: Operation,
        raw: &str,
        toolchain: Toolchain,
    ) -> Result<Self, ResolveError> {
        let workspace = locate_workspace(gctx);
        debug!("workspace: {:?}", workspace);

        let import_path = resolve_import_path(gctx, workspace.as_ref(), raw, op)?;

        let app_path = match resolve_app_path(gctx, workspace.as_ref(), &import_path, op) {
            Ok(path) => Some(path),
            Err(err @ ResolveError::NoApplicationRoot { .. }) if !op.requires_import_path() => {
                warn!("{}; continuing without an application path", err);
                None
            }
            Err(err) => return Err(err),
        };

        let manifest_root = workspace
            .as_ref()
            .and_then(|ws| ws.manifest_root())
            .map(|root| root.to_path_buf());

        Ok(ResolutionContext {
            operation: op,
            raw_path: raw.to_string(),
            import_path,
            app_path,
            uses_manifest: manifest_root.is_some(),
            manifest_root,
            toolchain: toolchain.path().to_path_buf(),
            tool_version: Version::current(),
            framework_version: None,
        })
    }

    /// Check framework compatibility and record the framework version.
    pub fn check_framework(
        &mut self,
        gctx: &GlobalContext,
        packages: &dyn PackageResolver,
    ) -> Result<&Version, ResolveError> {
        let version = check_compatibility(gctx, self, packages)?;
        Ok(self.framework_version.insert(version))
    }

    /// The toolchain recorded for this invocation.
    pub fn toolchain(&self) -> Toolchain {
        Toolchain::at(&self.toolchain)
    }
}
