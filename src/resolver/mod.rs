//! Project resolution.
//!
//! The pipeline runs once per invocation:
//!
//! 1. probe the toolchain (the only hard precondition);
//! 2. locate the workspace, manifest first;
//! 3. resolve the canonical import path;
//! 4. resolve the application path;
//! 5. for operations that work on an existing application, check that the
//!    framework it depends on is compatible with this tool.
//!
//! Every failure is returned to the caller; nothing here exits the process.

pub mod app_path;
pub mod context;
pub mod errors;
pub mod import_path;

pub use app_path::{app_path_in_module, import_path_in_module, resolve_app_path};
pub use context::ResolutionContext;
pub use errors::ResolveError;
pub use import_path::{is_filesystem_path, resolve_import_path};

use tracing::debug;

use crate::core::operation::Operation;
use crate::ops::fetch::{GoPackageResolver, PackageResolver};
use crate::util::GlobalContext;

/// Resolve `raw` for `op`, fetching missing framework sources with the Go
/// toolchain.
pub fn resolve(
    gctx: &GlobalContext,
    op: Operation,
    raw: &str,
) -> Result<ResolutionContext, ResolveError> {
    let mut ctx = ResolutionContext::resolve_paths(gctx, op, raw)?;
    if op.checks_framework() {
        let packages = GoPackageResolver::for_context(gctx, &ctx);
        ctx.check_framework(gctx, &packages)?;
    }
    Ok(ctx)
}

/// Resolve `raw` for `op` with an explicit package resolver.
pub fn resolve_with(
    gctx: &GlobalContext,
    op: Operation,
    raw: &str,
    packages: &dyn PackageResolver,
) -> Result<ResolutionContext, ResolveError> {
    let mut ctx = ResolutionContext::resolve_paths(gctx, op, raw)?;
    if op.checks_framework() {
        ctx.check_framework(gctx, packages)?;
    } else {
        debug!("`{}` does not check the framework version", op);
    }
    Ok(ctx)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::test_support::{fake_toolchain, write_manifest, write_version_file, RecordingResolver};
    use crate::util::fs::from_slash;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_with_checks_framework() {
        let tmp = TempDir::new().unwrap();
        let bin = tmp.path().join("bin");
        fake_toolchain(&bin, "go");
        let app = tmp.path().join("shop");
        write_manifest(&app, "example.com/shop");
        write_version_file(&app.join("vendor").join(from_slash("github.com/revel/revel")), "1.0.3");

        let gctx = GlobalContext::isolated(app.clone()).with_env("PATH", &bin);
        let packages = RecordingResolver::new();

        let ctx = resolve_with(&gctx, Operation::Run, ".", &packages).unwrap();
        assert_eq!(ctx.import_path, "example.com/shop");
        assert_eq!(ctx.app_path, Some(app));
        assert_eq!(ctx.toolchain, bin.join("go"));
        assert_eq!(ctx.framework_version.map(|v| v.to_string()), Some("1.0.3".to_string()));
    }

    #[test]
    fn test_new_skips_framework() {
        let tmp = TempDir::new().unwrap();
        let bin = tmp.path().join("bin");
        fake_toolchain(&bin, "go");
        let gctx = GlobalContext::isolated(tmp.path().to_path_buf()).with_env("PATH", &bin);
        let packages = RecordingResolver::failing();

        let ctx = resolve_with(&gctx, Operation::New, "blog", &packages).unwrap();
        assert_eq!(ctx.app_path, Some(tmp.path().join("blog")));
        assert_eq!(ctx.framework_version, None);
        assert!(packages.calls().is_empty());
    }
}
