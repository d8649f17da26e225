//! The Go module download cache.
//!
//! Modules are extracted to `<cache>/<escaped module>@<escaped version>`,
//! where escaping replaces every uppercase letter with `!` followed by its
//! lowercase form so that paths stay unique on case-insensitive filesystems.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::util::fs::from_slash;
use crate::util::GlobalContext;

/// Escape a module path or version for use in the cache.
pub fn escape_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        if c.is_ascii_uppercase() {
            escaped.push('!');
            escaped.push(c.to_ascii_lowercase());
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Locate the module cache root.
///
/// `GOMODCACHE` wins; otherwise `pkg/mod` below the first flat root, falling
/// back to `~/go/pkg/mod` when no flat root is configured.
pub fn cache_root(gctx: &GlobalContext) -> Option<PathBuf> {
    if let Some(dir) = gctx.env_var("GOMODCACHE") {
        return Some(PathBuf::from(dir));
    }

    let root = match gctx.flat_roots().into_iter().next() {
        Some(root) => root,
        None => gctx.user_home()?.join("go"),
    };
    let cache = root.join("pkg").join("mod");
    debug!("module cache at {}", cache.display());
    Some(cache)
}

/// Directory holding `module` at `version` inside the cache rooted at `cache`.
pub fn module_dir(cache: &Path, module: &str, version: &str) -> PathBuf {
    cache.join(from_slash(&format!(
        "{}@{}",
        escape_path(module),
        escape_path(version)
    )))
}
