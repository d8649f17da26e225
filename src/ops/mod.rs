//! High-level operations.
//!
//! Framework compatibility checking and the pieces it is built from.

pub mod compat;
pub mod fetch;
pub mod version_file;

pub use compat::{
    check_compatibility, declared_framework_version, find_framework, framework_version,
    locate_framework,
};
pub use fetch::{GoPackageResolver, PackageResolver};
pub use version_file::{read_declared_version, scan_constants};
