use std::fmt;

use regex::Regex;

use crate::error::{Result, SemtagError};

/// Tag shape accepted by the parser: MAJOR.MINOR.PATCH with an optional
/// -label suffix. The leading 'v' is stripped before matching.
const VERSION_PATTERN: &str = r"^(\d+)\.(\d+)\.(\d+)(?:-([0-9A-Za-z][0-9A-Za-z.-]*))?$";

/// Semantic version parsed out of a tag string.
///
/// Carries the three numeric components and an optional pre-release label.
/// Whether the repository writes tags with a leading 'v' is a property of the
/// repository, not of the version, so it is tracked by the manager and not
/// stored here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub pre_release: Option<String>,
}

/// Which semantic version component a bump targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl SemanticVersion {
    /// Create a normal release version (no pre-release label)
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            pre_release: None,
        }
    }

    /// Parse a version from a tag string.
    ///
    /// Accepts `MAJOR.MINOR.PATCH` with an optional `-label` suffix, with or
    /// without a leading `v`. Only the first character counts as a prefix; a
    /// 'v' anywhere else is part of the (then invalid) version text.
    ///
    /// # Arguments
    /// * `tag` - Tag text to parse (e.g., "v1.2.3", "1.4.0-rc1")
    ///
    /// # Returns
    /// * `Ok(SemanticVersion)` - Successfully parsed version
    /// * `Err(SemtagError::InvalidFormat)` - Empty string, missing components,
    ///   non-numeric components, or trailing garbage
    pub fn parse(tag: &str) -> Result<Self> {
        let Some(first) = tag.chars().next() else {
            return Err(SemtagError::invalid_format("empty tag"));
        };

        let body = if first == 'v' { &tag[1..] } else { tag };

        let caps = match Regex::new(VERSION_PATTERN) {
            Ok(re) => re.captures(body),
            Err(_) => None,
        };
        let caps = caps.ok_or_else(|| {
            SemtagError::invalid_format(format!(
                "'{}' is not a MAJOR.MINOR.PATCH[-label] version",
                tag
            ))
        })?;

        let component = |index: usize| -> Result<u32> {
            caps[index].parse::<u32>().map_err(|_| {
                SemtagError::invalid_format(format!(
                    "version component '{}' in '{}' is out of range",
                    &caps[index], tag
                ))
            })
        };

        Ok(SemanticVersion {
            major: component(1)?,
            minor: component(2)?,
            patch: component(3)?,
            pre_release: caps.get(4).map(|m| m.as_str().to_string()),
        })
    }

    /// Check that a candidate tag is a well-formed semantic version.
    ///
    /// Rejects exactly the same set of strings as [SemanticVersion::parse]
    /// and needs no repository, so explicit user-supplied tags can be gated
    /// before any git I/O happens.
    pub fn validate_format(tag: &str) -> Result<()> {
        Self::parse(tag).map(|_| ())
    }

    /// Bump one component, zeroing every component of lower significance.
    ///
    /// A bump always produces a normal release: any pre-release label on the
    /// current version is dropped.
    pub fn bump(&self, kind: VersionBump) -> Self {
        match kind {
            VersionBump::Major => SemanticVersion::new(self.major + 1, 0, 0),
            VersionBump::Minor => SemanticVersion::new(self.major, self.minor + 1, 0),
            VersionBump::Patch => SemanticVersion::new(self.major, self.minor, self.patch + 1),
        }
    }

    /// Qualify the current version line with a pre-release label.
    ///
    /// Does not increment any numeric component.
    pub fn with_pre_release(&self, label: impl Into<String>) -> Self {
        SemanticVersion {
            major: self.major,
            minor: self.minor,
            patch: self.patch,
            pre_release: Some(label.into()),
        }
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(label) = &self.pre_release {
            write!(f, "-{}", label)?;
        }
        Ok(())
    }
}
