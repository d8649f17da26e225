//! Module manifest (`go.mod`) parsing.
//!
//! Only the directives needed for path resolution and framework lookup are
//! understood: `module`, `go`, `require` and `replace`, in both single-line
//! and parenthesized block form. Everything else is ignored.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error loading a module manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest `{}` does not declare a module path", path.display())]
    MissingModule { path: PathBuf },

    #[error("manifest `{}` line {line}: {message}", path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

/// A `require` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub path: String,
    pub version: String,
}

/// A `replace` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub path: String,
    pub version: Option<String>,
    pub target: String,
    pub target_version: Option<String>,
}

impl Replacement {
    /// Whether the replacement points at a directory rather than a module.
    pub fn is_local(&self) -> bool {
        let t = self.target.as_str();
        t.starts_with("./") || t.starts_with("../") || Path::new(t).is_absolute()
    }
}

/// A parsed module manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleManifest {
    module: String,
    go_version: Option<String>,
    requires: Vec<Requirement>,
    replaces: Vec<Replacement>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Require,
    Replace,
    Other,
}

impl ModuleManifest {
    /// Load and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    /// Parse manifest text. `path` is only used in error messages.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ManifestError> {
        let mut module = None;
        let mut go_version = None;
        let mut requires = Vec::new();
        let mut replaces = Vec::new();
        let mut block = Block::None;

        let syntax = |line: usize, message: String| ManifestError::Syntax {
            path: path.to_path_buf(),
            line,
            message,
        };

        for (idx, raw_line) in contents.lines().enumerate() {
            let line_no = idx + 1;
            let line = strip_comment(raw_line).trim();
            if line.is_empty() {
                continue;
            }

            if block != Block::None {
                if line == ")" {
                    block = Block::None;
                    continue;
                }
                let tokens = tokenize(line);
                match block {
                    Block::Require => requires.push(
                        parse_requirement(&tokens).map_err(|m| syntax(line_no, m))?,
                    ),
                    Block::Replace => replaces.push(
                        parse_replacement(&tokens).map_err(|m| syntax(line_no, m))?,
                    ),
                    _ => {}
                }
                continue;
            }

            let tokens = tokenize(line);
            let (verb, args) = match tokens.split_first() {
                Some((verb, args)) => (verb.as_str(), args),
                None => continue,
            };

            if args.first().map(String::as_str) == Some("(") {
                block = match verb {
                    "require" => Block::Require,
                    "replace" => Block::Replace,
                    _ => Block::Other,
                };
                continue;
            }

            match verb {
                "module" => {
                    let name = args
                        .first()
                        .ok_or_else(|| syntax(line_no, "`module` needs a path".to_string()))?;
                    module = Some(name.clone());
                }
                "go" => go_version = args.first().cloned(),
                "require" => {
                    requires.push(parse_requirement(args).map_err(|m| syntax(line_no, m))?)
                }
                "replace" => {
                    replaces.push(parse_replacement(args).map_err(|m| syntax(line_no, m))?)
                }
                _ => {}
            }
        }

        let module = module
            .filter(|m| !m.is_empty())
            .ok_or_else(|| ManifestError::MissingModule {
                path: path.to_path_buf(),
            })?;

        Ok(ModuleManifest {
            module,
            go_version,
            requires,
            replaces,
        })
    }

    /// The declared module path.
    pub fn module_path(&self) -> &str {
        &self.module
    }

    /// The `go` directive, if present.
    pub fn go_version(&self) -> Option<&str> {
        self.go_version.as_deref()
    }

    pub fn requires(&self) -> &[Requirement] {
        &self.requires
    }

    pub fn replaces(&self) -> &[Replacement] {
        &self.replaces
    }

    /// The required version of a module, if it is required.
    pub fn required_version(&self, module: &str) -> Option<&str> {
        self.requires
            .iter()
            .rev()
            .find(|r| r.path == module)
            .map(|r| r.version.as_str())
    }

    /// The replacement for a module, preferring a version-specific one.
    pub fn replacement(&self, module: &str) -> Option<&Replacement> {
        let required = self.required_version(module);
        self.replaces
            .iter()
            .rev()
            .find(|r| r.path == module && r.version.is_some() && r.version.as_deref() == required)
            .or_else(|| {
                self.replaces
                    .iter()
                    .rev()
                    .find(|r| r.path == module && r.version.is_none())
            })
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Split on whitespace, unquoting `"..."` and `` `...` `` tokens.
fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace()
        .map(|t| {
            t.strip_prefix('"')
                .and_then(|t| t.strip_suffix('"'))
                .or_else(|| t.strip_prefix('`').and_then(|t| t.strip_suffix('`')))
                .unwrap_or(t)
                .to_string()
        })
        .collect()
}

fn parse_requirement(tokens: &[String]) -> Result<Requirement, String> {
    match tokens {
        [path, version, ..] => Ok(Requirement {
            path: path.clone(),
            version: version.clone(),
        }),
        _ => Err("`require` needs a module path and a version".to_string()),
    }
}

fn parse_replacement(tokens: &[String]) -> Result<Replacement, String> {
    let arrow = tokens
        .iter()
        .position(|t| t == "=>")
        .ok_or_else(|| "`replace` needs `=>`".to_string())?;
    let (lhs, rhs) = (&tokens[..arrow], &tokens[arrow + 1..]);

    match (lhs, rhs) {
        ([path, rest @ ..], [target, target_rest @ ..]) if rest.len() <= 1 && target_rest.len() <= 1 => {
            Ok(Replacement {
                path: path.clone(),
                version: rest.first().cloned(),
                target: target.clone(),
                target_version: target_rest.first().cloned(),
            })
        }
        _ => Err("malformed `replace` directive".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ModuleManifest {
        ModuleManifest::parse(text, Path::new("go.mod")).unwrap()
    }

    #[test]
    fn test_parse_module_and_go() {
        let m = parse("// header\nmodule github.com/acme/shop // the shop\n\ngo 1.21\n");
        assert_eq!(m.module_path(), "github.com/acme/shop");
        assert_eq!(m.go_version(), Some("1.21"));
    }

    #[test]
    fn test_parse_quoted_module() {
        let m = parse("module \"example.com/quoted\"\n");
        assert_eq!(m.module_path(), "example.com/quoted");
    }

    #[test]
    fn test_parse_require_forms() {
        let m = parse(
            r#"module example.com/app

require github.com/revel/revel v1.1.0

require (
    github.com/revel/modules v1.0.0
    golang.org/x/net v0.17.0 // indirect
)
"#,
        );
        assert_eq!(m.requires().len(), 3);
        assert_eq!(m.required_version("github.com/revel/revel"), Some("v1.1.0"));
        assert_eq!(m.required_version("golang.org/x/net"), Some("v0.17.0"));
        assert_eq!(m.required_version("missing.org/x"), None);
    }

    #[test]
    fn test_parse_replace_forms() {
        let m = parse(
            r#"module example.com/app

require github.com/revel/revel v1.1.0

replace github.com/revel/revel => ../revel

replace (
    golang.org/x/net v0.17.0 => golang.org/x/net v0.18.0
)
"#,
        );
        let r = m.replacement("github.com/revel/revel").unwrap();
        assert_eq!(r.target, "../revel");
        assert!(r.is_local());

        let net = &m.replaces()[1];
        assert_eq!(net.version.as_deref(), Some("v0.17.0"));
        assert_eq!(net.target_version.as_deref(), Some("v0.18.0"));
        assert!(!net.is_local());
    }

    #[test]
    fn test_versioned_replacement_wins() {
        let m = parse(
            "module a\nrequire b v1.0.0\nreplace b => ./any\nreplace b v1.0.0 => ./exact\n",
        );
        assert_eq!(m.replacement("b").unwrap().target, "./exact");
    }

    #[test]
    fn test_missing_module() {
        let err = ModuleManifest::parse("go 1.21\n", Path::new("go.mod")).unwrap_err();
        assert!(matches!(err, ManifestError::MissingModule { .. }));
    }

    #[test]
    fn test_malformed_require() {
        let err = ModuleManifest::parse("module a\nrequire b\n", Path::new("go.mod")).unwrap_err();
        match err {
            ManifestError::Syntax { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = ModuleManifest::load(&tmp.path().join("go.mod")).unwrap_err();
        assert!(matches!(err, ManifestError::Io { .. }));
    }
}
