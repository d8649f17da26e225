//! Tool and framework versions.
//!
//! Framework version strings are looser than semver: they may carry a
//! leading `v`, omit the minor or patch component, or end in a tag such as
//! `rc1` without a separator. [`Version`] accepts all of these and renders a
//! normalized form.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use semver::{BuildMetadata, Prerelease};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Pinned compatibility ranges, `[min, max)` on the release triple.
///
/// A tool and a framework are compatible when both fall inside the same range.
pub const COMPATIBILITY_TABLE: &[CompatRange] = &[
    CompatRange::new((0, 0, 0), (0, 20, 0)),
    CompatRange::new((0, 20, 0), (1, 0, 0)),
    CompatRange::new((1, 0, 0), (2, 0, 0)),
];

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^0-9]*)([0-9]+)(?:\.([0-9]+))?(?:\.([0-9]+))?(.*)$")
        .expect("version pattern is valid")
});

/// Error parsing a version string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("empty version string")]
    Empty,

    #[error("`{0}` does not contain a numeric major version")]
    MissingMajor(String),

    #[error("version component `{component}` in `{input}` is out of range")]
    Component { input: String, component: String },

    #[error("invalid tag `{tag}` in `{input}`: {message}")]
    Tag {
        input: String,
        tag: String,
        message: String,
    },
}

/// A version with an optional non-numeric prefix (e.g. `v1.2.3`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    prefix: Option<String>,
    inner: semver::Version,
}

impl Version {
    /// Create a release version without prefix or tags.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            prefix: None,
            inner: semver::Version::new(major, minor, patch),
        }
    }

    /// The version of this tool.
    pub fn current() -> Self {
        Version::parse(env!("CARGO_PKG_VERSION"))
            .unwrap_or_else(|_| Version::new(0, 0, 0))
    }

    /// Parse a version leniently.
    ///
    /// Surrounding whitespace and quotes are ignored. Missing minor and patch
    /// components default to zero. A tail that does not start with `-` or `+`
    /// is taken as a pre-release tag.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let s = input.trim().trim_matches(|c| c == '"' || c == '`').trim();
        if s.is_empty() {
            return Err(VersionError::Empty);
        }

        let caps = VERSION_RE
            .captures(s)
            .ok_or_else(|| VersionError::MissingMajor(s.to_string()))?;

        let prefix = caps
            .get(1)
            .map(|m| m.as_str())
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        let number = |idx: usize| -> Result<u64, VersionError> {
            match caps.get(idx) {
                Some(m) => m.as_str().parse().map_err(|_| VersionError::Component {
                    input: s.to_string(),
                    component: m.as_str().to_string(),
                }),
                None => Ok(0),
            }
        };

        let mut inner = semver::Version::new(number(2)?, number(3)?, number(4)?);

        let tail = caps.get(5).map_or("", |m| m.as_str());
        let (pre, build) = split_tail(tail);
        let tag_err = |tag: &str, e: semver::Error| VersionError::Tag {
            input: s.to_string(),
            tag: tag.to_string(),
            message: e.to_string(),
        };
        if !pre.is_empty() {
            inner.pre = Prerelease::new(pre).map_err(|e| tag_err(pre, e))?;
        }
        if !build.is_empty() {
            inner.build = BuildMetadata::new(build).map_err(|e| tag_err(build, e))?;
        }

        Ok(Version { prefix, inner })
    }

    /// The leading non-numeric prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The pre-release tag, empty for releases.
    pub fn pre_release(&self) -> &str {
        self.inner.pre.as_str()
    }

    /// The release triple, ignoring tags.
    pub fn release(&self) -> (u64, u64, u64) {
        (self.inner.major, self.inner.minor, self.inner.patch)
    }

    /// Access the underlying semver value.
    pub fn as_semver(&self) -> &semver::Version {
        &self.inner
    }

    /// Check whether this tool version may operate against `framework`.
    pub fn compatible_with(&self, framework: &Version) -> Result<(), Incompatibility> {
        let range = COMPATIBILITY_TABLE
            .iter()
            .find(|r| r.contains(framework))
            .ok_or(Incompatibility::UnsupportedFramework)?;

        if self.release() < range.min {
            Err(Incompatibility::ToolOutdated)
        } else if self.release() >= range.max {
            Err(Incompatibility::FrameworkOutdated)
        } else {
            Ok(())
        }
    }
}

/// Split a tail like `-rc.1+build.5` into pre-release and build parts.
fn split_tail(tail: &str) -> (&str, &str) {
    let (pre, build) = match tail.find('+') {
        Some(idx) => (&tail[..idx], &tail[idx + 1..]),
        None => (tail, ""),
    };
    (pre.strip_prefix('-').unwrap_or(pre), build)
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref prefix) = self.prefix {
            f.write_str(prefix)?;
        }
        write!(f, "{}", self.inner)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner
            .cmp(&other.inner)
            .then_with(|| self.prefix.cmp(&other.prefix))
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Version::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A half-open release range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompatRange {
    pub min: (u64, u64, u64),
    pub max: (u64, u64, u64),
}

impl CompatRange {
    pub const fn new(min: (u64, u64, u64), max: (u64, u64, u64)) -> Self {
        CompatRange { min, max }
    }

    /// Check whether a version's release triple lies in this range.
    pub fn contains(&self, version: &Version) -> bool {
        let release = version.release();
        release >= self.min && release < self.max
    }
}

/// Why a tool and framework version cannot be used together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Incompatibility {
    #[error("the framework version is not supported by any release of this tool")]
    UnsupportedFramework,

    #[error("the tool is older than the framework requires")]
    ToolOutdated,

    #[error("the framework is older than the tool supports")]
    FrameworkOutdated,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_parse_full() {
        let version = v("1.2.3");
        assert_eq!(version.release(), (1, 2, 3));
        assert_eq!(version.prefix(), None);
        assert_eq!(version.pre_release(), "");
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(v("1").release(), (1, 0, 0));
        assert_eq!(v("1.2").release(), (1, 2, 0));
        assert_eq!(v("v1.0.0").prefix(), Some("v"));
        assert_eq!(v("\"1.0.0-dev\"").pre_release(), "dev");
        assert_eq!(v("0.21.0rc1").pre_release(), "rc1");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Version::parse(""), Err(VersionError::Empty));
        assert_eq!(Version::parse("  \"\" "), Err(VersionError::Empty));
        assert!(matches!(
            Version::parse("dev"),
            Err(VersionError::MissingMajor(_))
        ));
        assert!(matches!(
            Version::parse("1.0.0-bad tag"),
            Err(VersionError::Tag { .. })
        ));
    }

    #[test]
    fn test_display_normalizes() {
        assert_eq!(v("v1.2").to_string(), "v1.2.0");
        assert_eq!(v("0.21.0rc1").to_string(), "0.21.0-rc1");
        assert_eq!(v("1.0.0-dev+20240101").to_string(), "1.0.0-dev+20240101");
    }

    #[test]
    fn test_round_trip() {
        for input in ["1.2.3", "v0.20.0", "1.0.0-dev", "2.3.4-rc.1+build.7", "v3"] {
            let rendered = v(input).to_string();
            assert_eq!(v(&rendered).to_string(), rendered, "round trip of {input}");
        }

        let constructed = Version::new(4, 5, 6);
        assert_eq!(v(&constructed.to_string()), constructed);
    }

    #[test]
    fn test_ordering() {
        assert!(v("1.0.0-dev") < v("1.0.0"));
        assert!(v("0.9.9") < v("1.0.0"));
        assert!(v("1.10.0") > v("1.9.0"));
        assert_eq!(v("v1.2.0").as_semver(), v("1.2.0").as_semver());
        assert_eq!(v("1.2.0").cmp(&v("1.2.0")), Ordering::Equal);
    }

    #[test]
    fn test_compatibility_table() {
        let cases: &[(&str, &str, Result<(), Incompatibility>)] = &[
            ("1.2.0", "1.5.0", Ok(())),
            ("1.5.0", "1.2.0", Ok(())),
            ("1.0.0", "1.0.0", Ok(())),
            ("1.9.9", "1.0.0-dev", Ok(())),
            ("2.0.0", "1.5.0", Err(Incompatibility::FrameworkOutdated)),
            ("0.25.0", "1.5.0", Err(Incompatibility::ToolOutdated)),
            ("0.20.0", "0.25.1", Ok(())),
            ("0.19.9", "0.20.0", Err(Incompatibility::ToolOutdated)),
            ("1.0.0", "0.25.1", Err(Incompatibility::FrameworkOutdated)),
            ("0.0.1", "0.19.99", Ok(())),
            ("1.2.0", "2.0.0", Err(Incompatibility::UnsupportedFramework)),
        ];

        for (tool, framework, expected) in cases {
            assert_eq!(
                v(tool).compatible_with(&v(framework)),
                *expected,
                "tool {tool} vs framework {framework}"
            );
        }
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&v("v1.2.3-dev")).unwrap();
        assert_eq!(json, "\"v1.2.3-dev\"");
        let back: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_string(), "v1.2.3-dev");
    }

    #[test]
    fn test_current_parses() {
        let current = Version::current();
        assert_eq!(current.to_string(), env!("CARGO_PKG_VERSION"));
    }
}
