//! Framework source lookup.
//!
//! The framework package can live in several places depending on how the
//! application manages its dependencies. Candidates are tried in order:
//!
//! 1. `vendor/<import path>` below the application and the manifest root;
//! 2. for manifest workspaces, the `replace` target of the owning module, or
//!    the module cache entry for its required version;
//! 3. `<root>/src/<import path>` below each flat-workspace root.

pub mod module_cache;

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::core::manifest::ModuleManifest;
use crate::resolver::ResolveError;
use crate::util::fs::{absolutize, from_slash};
use crate::util::GlobalContext;

/// Locates package sources for one application.
#[derive(Debug, Clone, Copy)]
pub struct SourceLocator<'a> {
    gctx: &'a GlobalContext,
    app_path: &'a Path,
    manifest_root: Option<&'a Path>,
}

impl<'a> SourceLocator<'a> {
    pub fn new(gctx: &'a GlobalContext, app_path: &'a Path, manifest_root: Option<&'a Path>) -> Self {
        SourceLocator {
            gctx,
            app_path,
            manifest_root,
        }
    }

    /// Find the directory holding `import_path`, if it is present locally.
    pub fn find(&self, import_path: &str) -> Result<Option<PathBuf>, ResolveError> {
        for candidate in self.candidates(import_path)? {
            trace!("looking for {} in {}", import_path, candidate.display());
            if candidate.is_dir() {
                debug!("found {} at {}", import_path, candidate.display());
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    /// Candidate directories for `import_path`, in search order.
    pub fn candidates(&self, import_path: &str) -> Result<Vec<PathBuf>, ResolveError> {
        let rel = from_slash(import_path);
        let mut candidates = vec![self.app_path.join("vendor").join(&rel)];

        if let Some(root) = self.manifest_root {
            if root != self.app_path {
                candidates.push(root.join("vendor").join(&rel));
            }
            let manifest = ModuleManifest::load(&root.join(self.gctx.config().manifest_name()))?;
            candidates.extend(self.module_candidate(root, &manifest, import_path));
        }

        let source_dir = self.gctx.config().source_dir();
        for root in self.gctx.flat_roots() {
            candidates.push(root.join(source_dir).join(&rel));
        }

        Ok(candidates)
    }

    fn module_candidate(
        &self,
        root: &Path,
        manifest: &ModuleManifest,
        import_path: &str,
    ) -> Option<PathBuf> {
        let (module, sub) = owning_module(manifest, import_path)?;

        if let Some(replacement) = manifest.replacement(module) {
            if replacement.is_local() {
                let dir = absolutize(root, &from_slash(&replacement.target));
                return Some(dir.join(from_slash(sub)));
            }
            let version = replacement.target_version.as_deref()?;
            let cache = module_cache::cache_root(self.gctx)?;
            return Some(
                module_cache::module_dir(&cache, &replacement.target, version).join(from_slash(sub)),
            );
        }

        let version = manifest.required_version(module)?;
        let cache = module_cache::cache_root(self.gctx)?;
        Some(module_cache::module_dir(&cache, module, version).join(from_slash(sub)))
    }
}

/// The longest required or replaced module containing `import_path`, and the
/// package path inside it.
fn owning_module<'m, 'i>(manifest: &'m ModuleManifest, import_path: &'i str) -> Option<(&'m str, &'i str)> {
    manifest
        .requires()
        .iter()
        .map(|r| r.path.as_str())
        .chain(manifest.replaces().iter().map(|r| r.path.as_str()))
        .filter_map(|module| {
            if import_path == module {
                Some((module, ""))
            } else {
                import_path
                    .strip_prefix(module)
                    .and_then(|rest| rest.strip_prefix('/'))
                    .map(|sub| (module, sub))
            }
        })
        .max_by_key(|(module, _)| module.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const FRAMEWORK: &str = "github.com/revel/revel";

    fn write_go_mod(dir: &Path, contents: &str) {
        fs::write(dir.join("go.mod"), contents).unwrap();
    }

    #[test]
    fn test_vendor_wins() {
        let tmp = TempDir::new().unwrap();
        let app = tmp.path().join("app");
        let vendored = app.join("vendor").join(from_slash(FRAMEWORK));
        fs::create_dir_all(&vendored).unwrap();
        let gopath = tmp.path().join("gopath");
        fs::create_dir_all(gopath.join("src").join(from_slash(FRAMEWORK))).unwrap();

        let gctx = GlobalContext::isolated(app.clone()).with_env("GOPATH", &gopath);
        let locator = SourceLocator::new(&gctx, &app, None);
        assert_eq!(locator.find(FRAMEWORK).unwrap(), Some(vendored));
    }

    #[test]
    fn test_local_replacement() {
        let tmp = TempDir::new().unwrap();
        let app = tmp.path().join("app");
        fs::create_dir_all(&app).unwrap();
        write_go_mod(
            &app,
            "module example.com/app\n\nrequire github.com/revel/revel v1.1.0\n\nreplace github.com/revel/revel => ../revel\n",
        );
        let local = tmp.path().join("revel");
        fs::create_dir_all(&local).unwrap();

        let gctx = GlobalContext::isolated(app.clone());
        let locator = SourceLocator::new(&gctx, &app, Some(&app));
        assert_eq!(locator.find(FRAMEWORK).unwrap(), Some(local));
    }

    #[test]
    fn test_module_cache_lookup() {
        let tmp = TempDir::new().unwrap();
        let app = tmp.path().join("app");
        fs::create_dir_all(&app).unwrap();
        write_go_mod(
            &app,
            "module example.com/app\n\nrequire (\n\tgithub.com/revel/revel v1.1.0\n\tgithub.com/revel/modules v1.1.0\n)\n",
        );
        let cache = tmp.path().join("modcache");
        let cached = module_cache::module_dir(&cache, FRAMEWORK, "v1.1.0");
        fs::create_dir_all(cached.join("session")).unwrap();

        let gctx = GlobalContext::isolated(app.clone()).with_env("GOMODCACHE", &cache);
        let locator = SourceLocator::new(&gctx, &app, Some(&app));
        assert_eq!(locator.find(FRAMEWORK).unwrap(), Some(cached.clone()));
        assert_eq!(
            locator.find("github.com/revel/revel/session").unwrap(),
            Some(cached.join("session"))
        );
    }

    #[test]
    fn test_flat_root_lookup_and_miss() {
        let tmp = TempDir::new().unwrap();
        let r1 = tmp.path().join("r1");
        let r2 = tmp.path().join("r2");
        let framework = r2.join("src").join(from_slash(FRAMEWORK));
        fs::create_dir_all(&framework).unwrap();
        let app = r1.join("src").join("shop");

        let gctx = GlobalContext::isolated(app.clone())
            .with_env("GOPATH", crate::test_support::join_paths(&[r1, r2]));
        let locator = SourceLocator::new(&gctx, &app, None);
        assert_eq!(locator.find(FRAMEWORK).unwrap(), Some(framework));
        assert_eq!(locator.find("github.com/other/pkg").unwrap(), None);
    }

    #[test]
    fn test_broken_manifest_is_reported() {
        let tmp = TempDir::new().unwrap();
        write_go_mod(tmp.path(), "go 1.21\n");

        let gctx = GlobalContext::isolated(tmp.path().to_path_buf());
        let locator = SourceLocator::new(&gctx, tmp.path(), Some(tmp.path()));
        assert!(matches!(
            locator.find(FRAMEWORK).unwrap_err(),
            ResolveError::Manifest(_)
        ));
    }

    #[test]
    fn test_owning_module_prefers_longest() {
        let manifest = ModuleManifest::parse(
            "module example.com/app\nrequire (\n\tgithub.com/revel v0.1.0\n\tgithub.com/revel/revel v1.1.0\n)\n",
            Path::new("go.mod"),
        )
        .unwrap();

        assert_eq!(
            owning_module(&manifest, "github.com/revel/revel/cache"),
            Some(("github.com/revel/revel", "cache"))
        );
        assert_eq!(owning_module(&manifest, "github.com/revelx"), None);
    }
}
