//! The external build toolchain.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::resolver::ResolveError;
use crate::util::process::{find_executable_in, ProcessBuilder};
use crate::util::GlobalContext;

/// A located toolchain executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    path: PathBuf,
}

impl Toolchain {
    /// Look up the configured toolchain executable on the search path.
    ///
    /// This is the one precondition of every resolution; nothing else is
    /// attempted when it fails.
    pub fn probe(gctx: &GlobalContext) -> Result<Self, ResolveError> {
        let name = gctx.config().toolchain();
        let path = find_executable_in(name, gctx.env_var("PATH"), gctx.cwd()).ok_or_else(|| {
            ResolveError::ToolchainNotFound {
                name: name.to_string(),
            }
        })?;

        debug!("using toolchain {}", path.display());
        Ok(Toolchain { path })
    }

    /// Use a known executable path without probing.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Toolchain { path: path.into() }
    }

    /// Absolute path of the executable.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A process builder invoking the toolchain.
    pub fn command(&self) -> ProcessBuilder {
        ProcessBuilder::new(&self.path)
    }
}
