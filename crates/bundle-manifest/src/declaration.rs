//! Package declarations: one `name[;version="V"]` entry of a header.

use std::fmt;

use crate::error::{Error, Result};
use crate::manifest::split_unquoted;
use crate::version::VersionConstraint;

/// A package name paired with the version constraint it was declared with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageDeclaration {
    /// Dot-separated package name
    pub name: String,
    /// Exact version for exports, exact version or range for imports
    pub constraint: VersionConstraint,
}

impl PackageDeclaration {
    pub fn new(name: impl Into<String>, constraint: VersionConstraint) -> Self {
        Self {
            name: name.into(),
            constraint,
        }
    }

    /// Parse a `name[;attr=value]*` entry.
    ///
    /// The name ends at the first `;`. Only the `version` attribute is
    /// interpreted; its value may be quoted. Without it the declaration is
    /// unversioned (`0.0.0`). Other attributes and directives are ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let mut segments = split_unquoted(text, ';').into_iter();
        let name = segments.next().unwrap_or_default().trim();
        if name.is_empty() {
            return Err(Error::MalformedDeclaration {
                declaration: text.to_string(),
                reason: "missing package name".to_string(),
            });
        }

        let version = segments.find_map(|segment| {
            segment
                .trim()
                .strip_prefix("version=")
                .map(|value| value.trim().trim_matches('"'))
        });

        let constraint = match version {
            Some(value) => VersionConstraint::parse(value)?,
            None => VersionConstraint::unversioned(),
        };

        Ok(Self::new(name, constraint))
    }
}

impl fmt::Display for PackageDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};version=\"{}\"", self.name, self.constraint)
    }
}
