//! Fetching missing packages.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::core::toolchain::Toolchain;
use crate::resolver::ResolutionContext;
use crate::util::process::ProcessBuilder;
use crate::util::GlobalContext;

/// Fetches a package so that its sources become available locally.
///
/// Implementations perform an external side effect; callers treat a failure
/// as a warning and re-check for the sources afterwards.
pub trait PackageResolver {
    fn resolve(&self, package: &str) -> Result<()>;
}

/// Fetches packages with the Go toolchain.
///
/// Module applications are tidied in place, which downloads every missing
/// requirement. Flat-workspace applications use `go get -u` with modules
/// disabled, so the package lands below the first `GOPATH` root.
#[derive(Debug, Clone)]
pub struct GoPackageResolver {
    toolchain: Toolchain,
    mode: FetchMode,
}

#[derive(Debug, Clone)]
enum FetchMode {
    Module {
        app_path: PathBuf,
    },
    Flat {
        cwd: PathBuf,
        path_env: String,
        roots: Option<String>,
    },
}

impl GoPackageResolver {
    pub fn for_context(gctx: &GlobalContext, ctx: &ResolutionContext) -> Self {
        let mode = match ctx.app_path.as_deref() {
            Some(app_path) if ctx.uses_manifest => FetchMode::Module {
                app_path: app_path.to_path_buf(),
            },
            _ => {
                let path_env = gctx.config().path_env();
                FetchMode::Flat {
                    cwd: gctx.cwd().to_path_buf(),
                    path_env: path_env.to_string(),
                    roots: gctx
                        .env_var(path_env)
                        .map(|v| v.to_string_lossy().into_owned()),
                }
            }
        };

        GoPackageResolver {
            toolchain: ctx.toolchain(),
            mode,
        }
    }

    /// The command that fetches `package`.
    pub fn command(&self, package: &str) -> ProcessBuilder {
        match &self.mode {
            FetchMode::Module { app_path } => self
                .toolchain
                .command()
                .args(["mod", "tidy"])
                .cwd(app_path),
            FetchMode::Flat {
                cwd,
                path_env,
                roots,
            } => {
                let mut cmd = self
                    .toolchain
                    .command()
                    .args(["get", "-u", package])
                    .env("GO111MODULE", "off")
                    .cwd(cwd);
                if let Some(roots) = roots {
                    cmd = cmd.env(path_env, roots);
                }
                cmd
            }
        }
    }
}

impl PackageResolver for GoPackageResolver {
    fn resolve(&self, package: &str) -> Result<()> {
        let cmd = self.command(package);
        info!("fetching {}: {}", package, cmd.display_command());
        cmd.exec_and_check()?;
        Ok(())
    }
}
