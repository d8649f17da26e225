//! Core data structures for Mooring.
//!
//! This module contains the foundational types used throughout Mooring:
//! - Versions and the compatibility table
//! - Operations requested from the command line
//! - The module manifest
//! - Workspace discovery and the toolchain probe

pub mod manifest;
pub mod operation;
pub mod toolchain;
pub mod version;
pub mod workspace;

pub use manifest::ModuleManifest;
pub use operation::Operation;
pub use toolchain::Toolchain;
pub use version::{Incompatibility, Version};
pub use workspace::{locate_workspace, WorkspaceLocator, WorkspaceRoot};
