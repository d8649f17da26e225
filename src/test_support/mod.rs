//! Test utilities for Mooring unit tests.
//!
//! Provides a recording [`PackageResolver`] so that framework fetches can be
//! observed without running the Go toolchain, plus on-disk fixtures for
//! manifests, version files and fake toolchains.
//!
//! # Example
//!
//! ```rust,ignore
//! use mooring::test_support::{write_version_file, RecordingResolver};
//!
//! let packages = RecordingResolver::new().on_resolve(move |_| {
//!     write_version_file(&vendor_dir, "1.1.0");
//! });
//! // ... run a resolution with `&packages` ...
//! assert_eq!(packages.calls(), vec!["github.com/revel/revel"]);
//! ```

pub mod fixtures;

use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};

use crate::ops::fetch::PackageResolver;

// Re-export fixtures for convenience
pub use fixtures::*;

type ResolveHook = Arc<dyn Fn(&str) + Send + Sync>;

/// A package resolver that records every request.
#[derive(Clone, Default)]
pub struct RecordingResolver {
    calls: Arc<Mutex<Vec<String>>>,
    hook: Option<ResolveHook>,
    fail: bool,
}

impl RecordingResolver {
    /// A resolver that succeeds without doing anything.
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolver whose every fetch fails.
    pub fn failing() -> Self {
        RecordingResolver {
            fail: true,
            ..Self::default()
        }
    }

    /// Run `hook` on each request, e.g. to create the fetched sources.
    pub fn on_resolve(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Packages requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl PackageResolver for RecordingResolver {
    fn resolve(&self, package: &str) -> Result<()> {
        self.calls.lock().unwrap().push(package.to_string());
        if let Some(ref hook) = self.hook {
            hook(package);
        }
        if self.fail {
            bail!("fetching `{}` is disabled in this test", package);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_resolver() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let packages = RecordingResolver::new().on_resolve(move |p| sink.lock().unwrap().push(p.len()));

        packages.resolve("a.com/x").unwrap();
        packages.resolve("b").unwrap();
        assert_eq!(packages.calls(), vec!["a.com/x".to_string(), "b".to_string()]);
        assert_eq!(*seen.lock().unwrap(), vec![7, 1]);

        assert!(RecordingResolver::failing().resolve("c").is_err());
    }
}
