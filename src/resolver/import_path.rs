//! Canonical import path resolution.
//!
//! A raw path from the command line is either an import path already
//! (`github.com/acme/shop`) or a filesystem path (empty, absolute, `.`,
//! `..`, `./x`, `../x`). Filesystem paths are mapped to import paths by
//! stripping the first flat-workspace root that contains them, together with
//! the conventional source directory below it.

use std::path::{Component, Path};

use tracing::{debug, warn};

use crate::core::manifest::ModuleManifest;
use crate::core::operation::Operation;
use crate::core::workspace::WorkspaceRoot;
use crate::resolver::ResolveError;
use crate::util::fs::{absolutize, to_slash};
use crate::util::GlobalContext;

/// Whether `raw` names a filesystem path rather than an import path.
pub fn is_filesystem_path(raw: &str) -> bool {
    if raw.is_empty() || raw == "." || raw == ".." || Path::new(raw).is_absolute() {
        return true;
    }
    let markers: &[&str] = if cfg!(windows) {
        &["./", "../", ".\\", "..\\"]
    } else {
        &["./", "../"]
    };
    markers.iter().any(|marker| raw.starts_with(marker))
}

/// Resolve the canonical import path for `raw`.
///
/// `workspace` is only consulted for paths that no flat root claims: a path
/// inside the manifest root becomes the module path plus the relative path.
pub fn resolve_import_path(
    gctx: &GlobalContext,
    workspace: Option<&WorkspaceRoot>,
    raw: &str,
    op: Operation,
) -> Result<String, ResolveError> {
    let import_path = if is_filesystem_path(raw) {
        from_filesystem_path(gctx, workspace, raw, op)?
    } else {
        raw.to_string()
    };

    if import_path.is_empty() && op.requires_import_path() {
        return Err(ResolveError::UnresolvedImportPath {
            raw: raw.to_string(),
        });
    }

    debug!("import path for `{}` is `{}`", raw, import_path);
    Ok(import_path)
}

fn from_filesystem_path(
    gctx: &GlobalContext,
    workspace: Option<&WorkspaceRoot>,
    raw: &str,
    op: Operation,
) -> Result<String, ResolveError> {
    let path = absolutize(gctx.cwd(), Path::new(raw));
    debug!("`{}` is a filesystem path: {}", raw, path.display());

    let source_dir = gctx.config().source_dir();
    for root in gctx.flat_roots() {
        debug!("checking {} against workspace root {}", path.display(), root.display());
        let rest = match path.strip_prefix(&root) {
            Ok(rest) if !rest.as_os_str().is_empty() => rest,
            _ => continue,
        };

        let mut components = rest.components();
        let under_source = matches!(
            components.next(),
            Some(Component::Normal(first)) if first.to_string_lossy().eq_ignore_ascii_case(source_dir)
        );
        if !under_source {
            return Ok(to_slash(rest));
        }

        let remainder = components.as_path();
        if remainder.as_os_str().is_empty() {
            if op.requires_import_path() {
                return Err(ResolveError::FlatRootSelected { path });
            }
            warn!(
                "{} is a workspace source root; continuing without an import path",
                path.display()
            );
            return Ok(String::new());
        }
        return Ok(to_slash(remainder));
    }

    if let Some(WorkspaceRoot::Manifest { root }) = workspace {
        if let Ok(rel) = path.strip_prefix(root) {
            let manifest = ModuleManifest::load(&root.join(gctx.config().manifest_name()))?;
            return Ok(join_import_path(manifest.module_path(), &to_slash(rel)));
        }
    }

    Ok(path.to_string_lossy().into_owned())
}

/// Join a module path and a `/`-separated suffix.
pub fn join_import_path(module: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        module.to_string()
    } else {
        format!("{}/{}", module, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{join_paths, write_manifest};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn gctx(cwd: &Path, roots: &[PathBuf]) -> GlobalContext {
        GlobalContext::isolated(cwd.to_path_buf()).with_env("GOPATH", join_paths(roots))
    }

    #[test]
    fn test_is_filesystem_path() {
        for raw in ["", ".", "..", "./app", "../app", "/abs/app"] {
            assert!(is_filesystem_path(raw), "{raw:?} is a filesystem path");
        }
        for raw in ["github.com/acme/shop", "shop", ".hidden", "..dots"] {
            assert!(!is_filesystem_path(raw), "{raw:?} is an import path");
        }
    }

    #[test]
    fn test_canonical_input_is_kept() {
        let ctx = gctx(Path::new("/ws/src/myapp"), &[PathBuf::from("/ws")]);
        let path = resolve_import_path(&ctx, None, "github.com/acme/shop", Operation::Run).unwrap();
        assert_eq!(path, "github.com/acme/shop");
    }

    #[test]
    fn test_current_dir_under_flat_root() {
        let ctx = gctx(Path::new("/ws/src/myapp"), &[PathBuf::from("/ws")]);
        assert_eq!(
            resolve_import_path(&ctx, None, ".", Operation::Run).unwrap(),
            "myapp"
        );
        assert_eq!(
            resolve_import_path(&ctx, None, "", Operation::Build).unwrap(),
            "myapp"
        );
    }

    #[test]
    fn test_relative_and_absolute_paths() {
        let ctx = gctx(Path::new("/ws/src/acme"), &[PathBuf::from("/ws")]);
        assert_eq!(
            resolve_import_path(&ctx, None, "./shop/web", Operation::Run).unwrap(),
            "acme/shop/web"
        );
        assert_eq!(
            resolve_import_path(&ctx, None, "../other", Operation::Run).unwrap(),
            "other"
        );
        assert_eq!(
            resolve_import_path(&ctx, None, "/ws/src/github.com/acme/shop", Operation::Test).unwrap(),
            "github.com/acme/shop"
        );
    }

    #[test]
    fn test_source_dir_is_case_insensitive() {
        let ctx = gctx(Path::new("/ws/SRC/myapp"), &[PathBuf::from("/ws")]);
        assert_eq!(
            resolve_import_path(&ctx, None, ".", Operation::Run).unwrap(),
            "myapp"
        );
    }

    #[test]
    fn test_first_matching_root_wins() {
        let ctx = gctx(
            Path::new("/ws/inner/src/app"),
            &[PathBuf::from("/ws/inner"), PathBuf::from("/ws")],
        );
        assert_eq!(
            resolve_import_path(&ctx, None, ".", Operation::Run).unwrap(),
            "app"
        );
    }

    #[test]
    fn test_root_match_is_component_wise() {
        let ctx = gctx(Path::new("/ws2/src/app"), &[PathBuf::from("/ws")]);
        assert_eq!(
            resolve_import_path(&ctx, None, ".", Operation::Run).unwrap(),
            "/ws2/src/app"
        );
    }

    #[test]
    fn test_path_outside_source_dir_keeps_remainder() {
        let ctx = gctx(Path::new("/ws/projects/app"), &[PathBuf::from("/ws")]);
        assert_eq!(
            resolve_import_path(&ctx, None, ".", Operation::Run).unwrap(),
            "projects/app"
        );
    }

    #[test]
    fn test_source_root_selected() {
        let ctx = gctx(Path::new("/ws/src"), &[PathBuf::from("/ws")]);

        let err = resolve_import_path(&ctx, None, ".", Operation::Run).unwrap_err();
        assert!(matches!(err, ResolveError::FlatRootSelected { .. }));

        assert_eq!(
            resolve_import_path(&ctx, None, ".", Operation::Version).unwrap(),
            ""
        );
    }

    #[test]
    fn test_workspace_root_itself_is_not_stripped() {
        let ctx = gctx(Path::new("/ws"), &[PathBuf::from("/ws")]);
        assert_eq!(
            resolve_import_path(&ctx, None, ".", Operation::Run).unwrap(),
            "/ws"
        );
    }

    #[test]
    fn test_outside_any_workspace_is_absolute() {
        let ctx = GlobalContext::isolated(PathBuf::from("/home/me/app"));
        assert_eq!(
            resolve_import_path(&ctx, None, ".", Operation::New).unwrap(),
            "/home/me/app"
        );
    }

    #[test]
    fn test_manifest_relative_path() {
        let tmp = TempDir::new().unwrap();
        write_manifest(tmp.path(), "github.com/acme/shop");
        let sub = tmp.path().join("cmd").join("admin");
        fs::create_dir_all(&sub).unwrap();

        let ctx = GlobalContext::isolated(sub.clone());
        let ws = WorkspaceRoot::Manifest {
            root: tmp.path().to_path_buf(),
        };

        assert_eq!(
            resolve_import_path(&ctx, Some(&ws), ".", Operation::Run).unwrap(),
            "github.com/acme/shop/cmd/admin"
        );
        assert_eq!(
            resolve_import_path(&ctx, Some(&ws), "../..", Operation::Run).unwrap(),
            "github.com/acme/shop"
        );
    }

    #[test]
    fn test_join_import_path() {
        assert_eq!(join_import_path("a.com/m", ""), "a.com/m");
        assert_eq!(join_import_path("a.com/m", "x/y"), "a.com/m/x/y");
    }
}
