//! Framework compatibility check.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::version::Version;
use crate::ops::fetch::PackageResolver;
use crate::ops::version_file::read_declared_version;
use crate::resolver::{ResolutionContext, ResolveError};
use crate::sources::SourceLocator;
use crate::util::GlobalContext;

/// Find the framework sources for the resolved application.
///
/// When the framework is not present locally, `packages` is asked to fetch
/// it and the lookup is repeated once. A failed fetch is only logged; the
/// second lookup decides.
pub fn locate_framework(
    gctx: &GlobalContext,
    ctx: &ResolutionContext,
    packages: &dyn PackageResolver,
) -> Result<PathBuf, ResolveError> {
    let package = gctx.config().framework_import_path();
    let app_path = ctx.app_path.as_deref().unwrap_or_else(|| gctx.cwd());
    let locator = SourceLocator::new(gctx, app_path, ctx.manifest_root.as_deref());

    if let Some(dir) = locator.find(package)? {
        return Ok(dir);
    }

    info!("framework `{}` not found locally, fetching it", package);
    if let Err(err) = packages.resolve(package) {
        warn!("failed to fetch `{}`: {:#}", package, err);
    }

    locator
        .find(package)?
        .ok_or_else(|| ResolveError::FrameworkNotFound {
            package: package.to_string(),
            app_path: app_path.to_path_buf(),
        })
}

/// Find the framework sources already present locally. Never fetches.
pub fn find_framework(
    gctx: &GlobalContext,
    ctx: &ResolutionContext,
) -> Result<Option<PathBuf>, ResolveError> {
    let app_path = ctx.app_path.as_deref().unwrap_or_else(|| gctx.cwd());
    SourceLocator::new(gctx, app_path, ctx.manifest_root.as_deref())
        .find(gctx.config().framework_import_path())
}

/// Read the version the framework declares.
pub fn framework_version(
    gctx: &GlobalContext,
    ctx: &ResolutionContext,
    packages: &dyn PackageResolver,
) -> Result<Version, ResolveError> {
    let dir = locate_framework(gctx, ctx, packages)?;
    declared_framework_version(gctx, &dir)
}

/// Read the version declared by the framework sources in `dir`.
pub fn declared_framework_version(gctx: &GlobalContext, dir: &Path) -> Result<Version, ResolveError> {
    let version_file = dir.join(gctx.config().version_file());
    let version = read_declared_version(&version_file, gctx.config().version_constant())?;
    debug!("framework version {} from {}", version, version_file.display());
    Ok(version)
}

/// Check that the tool may operate on the application's framework version.
pub fn check_compatibility(
    gctx: &GlobalContext,
    ctx: &ResolutionContext,
    packages: &dyn PackageResolver,
) -> Result<Version, ResolveError> {
    let framework = framework_version(gctx, ctx, packages)?;
    let tool = &ctx.tool_version;

    tool.compatible_with(&framework)
        .map_err(|reason| ResolveError::Incompatible {
            tool: tool.clone(),
            framework: framework.clone(),
            reason,
        })?;

    info!("tool {} is compatible with framework {}", tool, framework);
    Ok(framework)
}
