//! Package versions and version constraints.
//!
//! Two constraint shapes appear in manifests:
//!
//! - **Exact** versions on exports (`version="1.2.0"`), and on imports that
//!   omit the attribute, where `0.0.0` stands for "any version".
//! - **Ranges** on imports (`version="[1.0.0,2.0.0)"`), with independently
//!   inclusive or exclusive bounds.
//!
//! # Examples
//!
//! ```
//! use bundle_manifest::version::{Version, VersionConstraint};
//!
//! let import = VersionConstraint::parse("[1.0.0,2.0.0)").unwrap();
//! let export = VersionConstraint::exact(Version::new(1, 4, 0));
//! assert!(import.is_compatible(&export));
//!
//! let too_new = VersionConstraint::exact(Version::new(2, 0, 0));
//! assert!(!import.is_compatible(&too_new));
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A three-part version, ordered lexicographically over
/// `(major, minor, micro)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
}

impl Version {
    /// `0.0.0`, the wildcard lower bound.
    pub const ZERO: Version = Version::new(0, 0, 0);

    pub const fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
        }
    }

    /// Parse `major[.minor[.micro]]`.
    ///
    /// Missing components default to 0. Anything after the third component
    /// (such as a `.SNAPSHOT` qualifier) is ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::malformed_version(text, "empty version"));
        }

        let mut parts = [0u32; 3];
        for (slot, component) in parts.iter_mut().zip(trimmed.split('.')) {
            // u32::from_str takes a leading '+', so check the digits first.
            if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::malformed_version(
                    text,
                    format!("'{component}' is not a number"),
                ));
            }
            *slot = component.parse().map_err(|_| {
                Error::malformed_version(text, format!("'{component}' is out of range"))
            })?;
        }

        Ok(Self::new(parts[0], parts[1], parts[2]))
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

/// How the lower end of a range treats its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LowerBound {
    /// `(` - strictly greater than the bound
    Greater,
    /// `[` - greater than or equal to the bound
    AtLeast,
}

/// How the upper end of a range treats its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpperBound {
    /// `)` - strictly less than the bound
    Less,
    /// `]` - less than or equal to the bound
    AtMost,
}

/// A bounded interval of versions.
///
/// `lower <= upper` is not enforced; an inverted range matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionRange {
    pub lower: Version,
    pub lower_mode: LowerBound,
    pub upper: Version,
    pub upper_mode: UpperBound,
}

impl VersionRange {
    /// Check whether a concrete version lies inside the interval.
    pub fn contains(&self, version: &Version) -> bool {
        let above = match self.lower_mode {
            LowerBound::Greater => version > &self.lower,
            LowerBound::AtLeast => version >= &self.lower,
        };
        let below = match self.upper_mode {
            UpperBound::Less => version < &self.upper,
            UpperBound::AtMost => version <= &self.upper,
        };
        above && below
    }

    /// Parse `B1min,maxB2`.
    ///
    /// The first character selects the lower mode (`(` is exclusive, anything
    /// else inclusive) and the last character the upper mode (`)` is
    /// exclusive, anything else inclusive). Both are stripped before the
    /// remainder is split on `,`.
    fn parse(text: &str) -> Result<Self> {
        let mut chars = text.chars();
        let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
            return Err(Error::malformed_version(text, "range is missing its bounds"));
        };
        let inner = chars.as_str();

        let lower_mode = if first == '(' {
            LowerBound::Greater
        } else {
            LowerBound::AtLeast
        };
        let upper_mode = if last == ')' {
            UpperBound::Less
        } else {
            UpperBound::AtMost
        };

        let mut bounds = inner.split(',');
        let (Some(lower), Some(upper), None) = (bounds.next(), bounds.next(), bounds.next()) else {
            return Err(Error::malformed_version(
                text,
                "range must have exactly two bounds",
            ));
        };

        Ok(Self {
            lower: Version::parse(lower)?,
            lower_mode,
            upper: Version::parse(upper)?,
            upper_mode,
        })
    }
}

/// The shape of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Exact(Version),
    Range(VersionRange),
}

/// A version constraint as declared in a manifest.
///
/// Keeps the original text for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionConstraint {
    kind: ConstraintKind,
    raw: String,
}

impl VersionConstraint {
    /// Parse the value of a `version` attribute, without quotes.
    ///
    /// A value containing `,` is a range; anything else is an exact version.
    pub fn parse(text: &str) -> Result<Self> {
        let raw = text.trim().to_string();
        let kind = if raw.contains(',') {
            ConstraintKind::Range(VersionRange::parse(&raw)?)
        } else {
            ConstraintKind::Exact(Version::parse(&raw)?)
        };
        Ok(Self { kind, raw })
    }

    /// An exact constraint on a single version.
    pub fn exact(version: Version) -> Self {
        Self {
            kind: ConstraintKind::Exact(version),
            raw: version.to_string(),
        }
    }

    /// The implied constraint of a declaration without a `version` attribute.
    pub fn unversioned() -> Self {
        Self::exact(Version::ZERO)
    }

    /// A range constraint; the display text is rebuilt from the bounds.
    pub fn range(range: VersionRange) -> Self {
        let open = match range.lower_mode {
            LowerBound::Greater => '(',
            LowerBound::AtLeast => '[',
        };
        let close = match range.upper_mode {
            UpperBound::Less => ')',
            UpperBound::AtMost => ']',
        };
        Self {
            raw: format!("{open}{},{}{close}", range.lower, range.upper),
            kind: ConstraintKind::Range(range),
        }
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    /// Return the original constraint text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// An exact `0.0.0`, or a range whose lower bound is `0.0.0`.
    pub fn is_wildcard(&self) -> bool {
        match &self.kind {
            ConstraintKind::Exact(version) => version.is_zero(),
            ConstraintKind::Range(range) => range.lower.is_zero(),
        }
    }

    /// Check whether `export` satisfies this constraint taken as an import.
    ///
    /// A range against an exact version: a range with a `0.0.0` lower bound
    /// accepts anything, otherwise the exact version must sit inside the
    /// range. This case reads the same from either side. Two ranges are never
    /// compatible, whatever their overlap. Two exact versions must be equal,
    /// unless the import is the unversioned `0.0.0`; an unversioned export
    /// does not satisfy a versioned import.
    pub fn is_compatible(&self, export: &VersionConstraint) -> bool {
        match (&self.kind, &export.kind) {
            (ConstraintKind::Range(range), ConstraintKind::Exact(version))
            | (ConstraintKind::Exact(version), ConstraintKind::Range(range)) => {
                range.lower.is_zero() || range.contains(version)
            }
            (ConstraintKind::Range(_), ConstraintKind::Range(_)) => false,
            (ConstraintKind::Exact(import), ConstraintKind::Exact(export)) => {
                import.is_zero() || import == export
            }
        }
    }
}

impl FromStr for VersionConstraint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
