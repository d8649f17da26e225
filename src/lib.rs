//! Mooring - project resolution for Go web framework tooling
//!
//! This crate provides the core library functionality for Mooring: working
//! out a project's canonical import path and on-disk application path across
//! manifest and flat workspaces, and checking that the installed tool is
//! compatible with the framework version the project depends on.

pub mod core;
pub mod ops;
pub mod resolver;
pub mod sources;
pub mod util;

/// Test utilities for Mooring unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a recording package resolver and on-disk
/// fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{Operation, Toolchain, Version, WorkspaceRoot};
pub use resolver::{resolve, resolve_with, ResolutionContext, ResolveError};
pub use util::context::GlobalContext;
