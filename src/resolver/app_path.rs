//! Application path resolution.
//!
//! In a manifest workspace the application path is derived from the module
//! path declared in the manifest, and nothing else is consulted. Otherwise the
//! flat-workspace roots are searched, then absolute import paths are taken as
//! they are, and finally `new` may create the project under the working
//! directory.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::manifest::ModuleManifest;
use crate::core::operation::Operation;
use crate::core::workspace::WorkspaceRoot;
use crate::resolver::ResolveError;
use crate::util::fs::{from_slash, to_slash};
use crate::util::GlobalContext;

/// Resolve the absolute application path for `import_path`.
pub fn resolve_app_path(
    gctx: &GlobalContext,
    workspace: Option<&WorkspaceRoot>,
    import_path: &str,
    op: Operation,
) -> Result<PathBuf, ResolveError> {
    if import_path.is_empty() {
        return Err(no_application_root(gctx, import_path));
    }

    let roots: &[PathBuf] = match workspace {
        Some(WorkspaceRoot::Manifest { root }) => {
            let manifest = ModuleManifest::load(&root.join(gctx.config().manifest_name()))?;
            let app_path = app_path_in_module(root, manifest.module_path(), import_path)?;
            info!("application path from module manifest: {}", app_path.display());
            return Ok(app_path);
        }
        Some(WorkspaceRoot::Flat { roots }) => roots,
        None => &[],
    };

    let source_dir = gctx.config().source_dir();
    let mut best_root = None;
    for root in roots {
        if op.is_new() {
            if best_root.is_none() && gctx.cwd().starts_with(root) {
                debug!("working directory is inside workspace root {}", root.display());
                best_root = Some(root);
            }
            continue;
        }

        let candidate = root.join(source_dir).join(from_slash(import_path));
        if candidate.is_dir() {
            info!("application path from workspace root: {}", candidate.display());
            return Ok(candidate);
        }
    }

    if let Some(root) = best_root {
        info!("new application at workspace root: {}", root.display());
        return Ok(root.to_path_buf());
    }

    if Path::new(import_path).is_absolute() {
        debug!("import path is absolute, using it as the application path");
        return Ok(PathBuf::from(import_path));
    }

    if op.is_new() {
        let app_path = gctx.cwd().join(from_slash(import_path));
        info!("new application under working directory: {}", app_path.display());
        return Ok(app_path);
    }

    Err(no_application_root(gctx, import_path))
}

fn no_application_root(gctx: &GlobalContext, import_path: &str) -> ResolveError {
    ResolveError::NoApplicationRoot {
        import_path: import_path.to_string(),
        env_var: gctx.config().path_env().to_string(),
    }
}

/// Map an import path onto a module rooted at `root`.
///
/// The module itself maps to `root`; `module/sub/dir` maps to `root/sub/dir`.
/// Any other import path belongs to a different module.
pub fn app_path_in_module(
    root: &Path,
    module: &str,
    import_path: &str,
) -> Result<PathBuf, ResolveError> {
    if import_path == module {
        return Ok(root.to_path_buf());
    }

    match import_path
        .strip_prefix(module)
        .and_then(|rest| rest.strip_prefix('/'))
    {
        Some(rest) if !rest.is_empty() => Ok(root.join(from_slash(rest))),
        _ => Err(ResolveError::ModuleMismatch {
            import_path: import_path.to_string(),
            module: module.to_string(),
            root: root.to_path_buf(),
        }),
    }
}

/// The inverse of [`app_path_in_module`]: the import path of a directory
/// inside the module rooted at `root`.
pub fn import_path_in_module(root: &Path, module: &str, app_path: &Path) -> Option<String> {
    let rel = app_path.strip_prefix(root).ok()?;
    Some(super::import_path::join_import_path(module, &to_slash(rel)))
}
