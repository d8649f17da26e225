//! Framework version declaration scanner.
//!
//! The framework declares its release in a Go source file as a top-level
//! string constant:
//!
//! ```go
//! const (
//!     // Version of the framework
//!     Version = "1.1.0"
//!     BuildDate = "2022-04-11"
//! )
//! ```
//!
//! Only top-level `const` declarations are considered, either single-line
//! or parenthesized blocks. Each spec must bind one identifier to one
//! interpreted (`"..."`) or raw (`` `...` ``) string literal.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::core::version::Version;
use crate::resolver::ResolveError;

static CONST_SPEC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*([A-Za-z_][A-Za-z0-9_]*)(?:\s+[A-Za-z_][A-Za-z0-9_.]*)?\s*=\s*(?:"((?:[^"\\]|\\.)*)"|`([^`]*)`)\s*;?\s*$"#,
    )
    .expect("const spec pattern is valid")
});

/// Read `path` and parse the version bound to `constant`.
///
/// If the constant is declared more than once the last declaration wins.
pub fn read_declared_version(path: &Path, constant: &str) -> Result<Version, ResolveError> {
    let source = fs::read_to_string(path).map_err(|source| ResolveError::VersionFileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut found = None;
    for (name, value) in scan_constants(&source) {
        if name != constant {
            continue;
        }
        if let Some(previous) = found.replace(value) {
            warn!(
                "`{}` is declared more than once in {}; ignoring `{}`",
                constant,
                path.display(),
                previous
            );
        }
    }

    let literal = found.ok_or_else(|| ResolveError::VersionConstantMissing {
        path: path.to_path_buf(),
        constant: constant.to_string(),
    })?;
    debug!("{} declares {} = {:?}", path.display(), constant, literal);

    Version::parse(&literal).map_err(|source| ResolveError::InvalidVersion {
        path: path.to_path_buf(),
        source,
    })
}

/// All top-level string constants in Go source, in declaration order.
pub fn scan_constants(source: &str) -> Vec<(String, String)> {
    let stripped = strip_comments(source);
    let mut constants = Vec::new();
    let mut in_block = false;

    for line in stripped.lines() {
        if in_block {
            if line.trim_start().starts_with(')') {
                in_block = false;
            } else {
                constants.extend(parse_const_spec(line));
            }
            continue;
        }

        // Top-level declarations start in the first column.
        let Some(rest) = line.strip_prefix("const") else {
            continue;
        };
        if !rest.starts_with(|c: char| c.is_whitespace() || c == '(') {
            continue;
        }
        let rest = rest.trim_start();

        if let Some(block) = rest.strip_prefix('(') {
            let block = block.trim();
            match block.strip_suffix(')') {
                Some(inner) => constants.extend(parse_const_spec(inner)),
                None => {
                    in_block = true;
                    constants.extend(parse_const_spec(block));
                }
            }
        } else {
            constants.extend(parse_const_spec(rest));
        }
    }

    constants
}

fn parse_const_spec(spec: &str) -> Option<(String, String)> {
    let caps = CONST_SPEC_RE.captures(spec)?;
    let name = caps.get(1)?.as_str().to_string();
    let value = match (caps.get(2), caps.get(3)) {
        (Some(interpreted), _) => unescape(interpreted.as_str()),
        (None, Some(raw)) => raw.as_str().to_string(),
        (None, None) => return None,
    };
    Some((name, value))
}

fn unescape(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Replace comments with whitespace, leaving string literals and line
/// structure intact.
fn strip_comments(source: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        LineComment,
        BlockComment,
        Interpreted,
        Raw,
        Rune,
    }

    let mut out = String::with_capacity(source.len());
    let mut state = State::Code;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push(' ');
                    state = State::BlockComment;
                }
                '"' => {
                    out.push(c);
                    state = State::Interpreted;
                }
                '`' => {
                    out.push(c);
                    state = State::Raw;
                }
                '\'' => {
                    out.push(c);
                    state = State::Rune;
                }
                _ => out.push(c),
            },
            State::LineComment => {
                if c == '\n' {
                    out.push(c);
                    state = State::Code;
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                } else if c == '\n' {
                    out.push(c);
                }
            }
            State::Interpreted | State::Rune => {
                out.push(c);
                let close = if state == State::Interpreted { '"' } else { '\'' };
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == close || c == '\n' {
                    state = State::Code;
                }
            }
            State::Raw => {
                out.push(c);
                if c == '`' {
                    state = State::Code;
                }
            }
        }
    }

    out
}
