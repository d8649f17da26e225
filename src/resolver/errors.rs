//! Resolution error types and diagnostics.

use std::error::Error as _;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::manifest::ManifestError;
use crate::core::version::{Incompatibility, Version, VersionError};
use crate::util::diagnostic::Diagnostic;

/// Error resolving a project.
///
/// Every variant is fatal for the invocation; none is retried.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ResolveError {
    #[error("`{name}` executable not found in PATH")]
    #[diagnostic(
        code(mooring::toolchain::not_found),
        help("Install the Go toolchain and make sure `{name}` is on PATH")
    )]
    ToolchainNotFound { name: String },

    #[error(transparent)]
    #[diagnostic(
        code(mooring::manifest::invalid),
        help("Fix the module manifest or run the command outside this module")
    )]
    Manifest(#[from] ManifestError),

    #[error("working directory `{}` is a workspace root with no project selected", path.display())]
    #[diagnostic(
        code(mooring::import_path::workspace_root),
        help("Change into a project directory or pass its import path")
    )]
    FlatRootSelected { path: PathBuf },

    #[error("unable to determine import path from `{raw}`")]
    #[diagnostic(
        code(mooring::import_path::unresolved),
        help("Pass the import path of the application, e.g. `github.com/you/app`")
    )]
    UnresolvedImportPath { raw: String },

    #[error("import path `{import_path}` is not part of module `{module}`")]
    #[diagnostic(
        code(mooring::app_path::module_mismatch),
        help("Run the command from within the project directory")
    )]
    ModuleMismatch {
        import_path: String,
        module: String,
        root: PathBuf,
    },

    #[error("no application root found for `{import_path}`")]
    #[diagnostic(
        code(mooring::app_path::not_found),
        help("Set {env_var} to your workspace roots or run the command from inside a module")
    )]
    NoApplicationRoot { import_path: String, env_var: String },

    #[error("framework package `{package}` not found for application at `{}`", app_path.display())]
    #[diagnostic(
        code(mooring::framework::not_found),
        help("Add `{package}` to the application's dependencies")
    )]
    FrameworkNotFound { package: String, app_path: PathBuf },

    #[error("failed to read framework version file `{}`", path.display())]
    #[diagnostic(code(mooring::framework::version_file))]
    VersionFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{constant}` is not declared in `{}`", path.display())]
    #[diagnostic(code(mooring::framework::version_constant))]
    VersionConstantMissing { path: PathBuf, constant: String },

    #[error("invalid framework version declared in `{}`", path.display())]
    #[diagnostic(code(mooring::framework::invalid_version))]
    InvalidVersion {
        path: PathBuf,
        #[source]
        source: VersionError,
    },

    #[error("tool version {tool} is not compatible with framework version {framework}")]
    #[diagnostic(code(mooring::framework::incompatible))]
    Incompatible {
        tool: Version,
        framework: Version,
        #[source]
        reason: Incompatibility,
    },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.to_string());

        let mut source = self.source();
        while let Some(cause) = source {
            diag = diag.with_context(cause.to_string());
            source = cause.source();
        }

        match self {
            ResolveError::Manifest(
                ManifestError::Io { path, .. }
                | ManifestError::MissingModule { path }
                | ManifestError::Syntax { path, .. },
            ) => {
                diag = diag.with_location(path);
            }
            ResolveError::ModuleMismatch { root, .. } => {
                diag = diag.with_context(format!("module root: {}", root.display()));
            }
            ResolveError::VersionFileUnreadable { path, .. }
            | ResolveError::VersionConstantMissing { path, .. }
            | ResolveError::InvalidVersion { path, .. } => {
                diag = diag.with_location(path);
            }
            ResolveError::Incompatible { reason, .. } => {
                diag = diag.with_suggestion(match reason {
                    Incompatibility::ToolOutdated => "Update mooring to a release matching the framework",
                    Incompatibility::FrameworkOutdated => "Update the framework dependency of the application",
                    Incompatibility::UnsupportedFramework => {
                        "Use a framework release supported by this tool"
                    }
                });
            }
            _ => {}
        }

        if let Some(help) = MietteDiagnostic::help(self) {
            diag = diag.with_suggestion(help.to_string());
        }

        diag
    }
}
