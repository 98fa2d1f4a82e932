use crate::error::{Result, SemanticBranchError};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Version number with an optional `.devN` prerelease counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<u64>,
}

impl Version {
    /// Create a new release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            prerelease: None,
        }
    }

    /// Same triple, tagged with a `.devN` counter
    pub fn with_prerelease(self, counter: u64) -> Self {
        Version {
            prerelease: Some(counter),
            ..self
        }
    }

    /// Same triple, without any prerelease counter
    pub fn release(self) -> Self {
        Version {
            prerelease: None,
            ..self
        }
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// Parse "1.2.3", "v1.2.3" or "1.2.3.dev7".
    ///
    /// The release triple is validated by the `semver` crate; semver-style
    /// prerelease tags ("1.2.3-rc.1") are rejected since only `.devN` is produced.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let clean = trimmed
            .strip_prefix(&['v', 'V'][..])
            .unwrap_or(trimmed);

        let (triple, prerelease) = match clean.split_once(".dev") {
            Some((triple, counter)) => {
                let counter = counter.parse::<u64>().map_err(|_| {
                    SemanticBranchError::version(format!(
                        "Invalid dev counter in '{}': expected X.Y.Z.devN",
                        text
                    ))
                })?;
                (triple, Some(counter))
            }
            None => (clean, None),
        };

        let parsed = semver::Version::parse(triple).map_err(|e| {
            SemanticBranchError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z ({})",
                text, e
            ))
        })?;

        if !parsed.pre.is_empty() {
            return Err(SemanticBranchError::version(format!(
                "Unsupported prerelease tag in '{}': only .devN counters are supported",
                text
            )));
        }

        Ok(Version {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            prerelease,
        })
    }

    /// Bump the release triple according to bump type. The prerelease counter is dropped.
    ///
    /// Fails when the bumped component would overflow `u64`.
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        let overflow = || {
            SemanticBranchError::version(format!(
                "Cannot apply {} bump to {}: component overflows",
                bump_type, self
            ))
        };
        Ok(match bump_type {
            VersionBump::Major => Version::new(self.major.checked_add(1).ok_or_else(overflow)?, 0, 0),
            VersionBump::Minor => {
                Version::new(self.major, self.minor.checked_add(1).ok_or_else(overflow)?, 0)
            }
            VersionBump::Patch => Version::new(
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or_else(overflow)?,
            ),
            VersionBump::None => self.release(),
        })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (self.prerelease, other.prerelease) {
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(&b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(counter) = self.prerelease {
            write!(f, ".dev{}", counter)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = SemanticBranchError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

/// Version bump class decided by branch rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum VersionBump {
    #[default]
    None,
    Patch,
    Minor,
    Major,
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionBump::None => "none",
            VersionBump::Patch => "patch",
            VersionBump::Minor => "minor",
            VersionBump::Major => "major",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("v1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
        assert_eq!(v.prerelease, None);
    }

    #[test]
    fn test_version_parse_dev_counter() {
        let v = Version::parse("1.2.4.dev7").unwrap();
        assert_eq!(v, Version::new(1, 2, 4).with_prerelease(7));
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(Version::parse("1.2").is_err());
        assert!(Version::parse("v1.2.3.4").is_err());
        assert!(Version::parse("1.2.3.devx").is_err());
        assert!(Version::parse("1.2.3-rc.1").is_err());
        assert!(Version::parse("").is_err());
    }

    #[test]
    fn test_version_bump_major() {
        let bumped = Version::new(1, 2, 3).bump(VersionBump::Major).unwrap();
        assert_eq!(bumped, Version::new(2, 0, 0));
    }

    #[test]
    fn test_version_bump_minor() {
        let bumped = Version::new(1, 2, 3).bump(VersionBump::Minor).unwrap();
        assert_eq!(bumped, Version::new(1, 3, 0));
    }

    #[test]
    fn test_version_bump_patch() {
        let bumped = Version::new(1, 2, 3).bump(VersionBump::Patch).unwrap();
        assert_eq!(bumped, Version::new(1, 2, 4));
    }

    #[test]
    fn test_version_bump_none_drops_counter() {
        let bumped = Version::new(1, 2, 3).with_prerelease(4).bump(VersionBump::None).unwrap();
        assert_eq!(bumped, Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_bump_overflow_is_error() {
        let max = Version::parse("18446744073709551615.0.0").unwrap();
        assert!(matches!(
            max.bump(VersionBump::Major),
            Err(SemanticBranchError::Version(_))
        ));
        assert_eq!(max.bump(VersionBump::Patch).unwrap(), Version::new(u64::MAX, 0, 1));

        let max_minor = Version::new(1, u64::MAX, 0);
        assert!(max_minor.bump(VersionBump::Minor).is_err());
        assert_eq!(max_minor.bump(VersionBump::Major).unwrap(), Version::new(2, 0, 0));

        assert!(Version::new(0, 0, u64::MAX).bump(VersionBump::Patch).is_err());
    }

    #[test]
    fn test_version_parse_single_v_prefix() {
        assert_eq!(Version::parse("V1.2.3").unwrap(), Version::new(1, 2, 3));
        assert!(Version::parse("vv1.2.3").is_err());
        assert!(Version::parse("vV1.2.3").is_err());
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(1, 2, 3).to_string(), "1.2.3");
        assert_eq!(Version::new(1, 2, 4).with_prerelease(7).to_string(), "1.2.4.dev7");
    }

    #[test]
    fn test_prerelease_sorts_before_release() {
        let dev = Version::new(1, 2, 4).with_prerelease(100);
        let release = Version::new(1, 2, 4);
        assert!(dev < release);
        assert!(Version::new(1, 2, 3) < dev);
        assert!(Version::new(1, 2, 4).with_prerelease(2) < Version::new(1, 2, 4).with_prerelease(10));
    }

    #[test]
    fn test_bump_ordering() {
        assert!(VersionBump::Major > VersionBump::Minor);
        assert!(VersionBump::Minor > VersionBump::Patch);
        assert!(VersionBump::Patch > VersionBump::None);
        assert_eq!(VersionBump::default(), VersionBump::None);
    }
}
