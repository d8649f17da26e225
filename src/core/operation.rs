//! The operations a resolution is performed for.

use std::fmt;

use serde::Serialize;

/// A command-line operation that needs a resolved project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    New,
    Run,
    Build,
    Package,
    Clean,
    Test,
    Version,
}

impl Operation {
    /// Whether the operation fails without a canonical import path.
    ///
    /// Only `version` may run without selecting a project.
    pub fn requires_import_path(self) -> bool {
        self != Operation::Version
    }

    /// Whether this is the new-project operation.
    pub fn is_new(self) -> bool {
        self == Operation::New
    }

    /// Whether the framework version must be fetched and checked.
    pub fn checks_framework(self) -> bool {
        !matches!(self, Operation::New | Operation::Version)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::New => "new",
            Operation::Run => "run",
            Operation::Build => "build",
            Operation::Package => "package",
            Operation::Clean => "clean",
            Operation::Test => "test",
            Operation::Version => "version",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_flags() {
        assert!(Operation::New.requires_import_path());
        assert!(!Operation::Version.requires_import_path());
        assert!(Operation::New.is_new());
        assert!(!Operation::Run.is_new());

        for op in [Operation::Run, Operation::Build, Operation::Package, Operation::Clean, Operation::Test] {
            assert!(op.checks_framework(), "{op} should check the framework");
        }
        assert!(!Operation::New.checks_framework());
        assert!(!Operation::Version.checks_framework());
    }
}
