use std::fmt;
use std::str::FromStr;
use crate::error::{InstallRunError, Result};

/// A package name with an optional version or range, as typed on the command line
/// (`rimraf@2.6.2`, `@microsoft/rush`, `typescript@~3.1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpecifier {
    pub name: String,
    pub version: Option<String>,
}

impl PackageSpecifier {
    /// Parses `name[@version]`, splitting at the last `@`.
    ///
    /// A leading `@` belongs to the scope, so `@scope/pkg` has no version.
    /// An empty version (`pkg@`) is treated as absent.
    ///
    /// # Errors
    /// Returns [`InstallRunError::InvalidSpecifier`] if the name part is empty.
    pub fn parse(raw: &str) -> Result<PackageSpecifier> {
        let raw = raw.trim();
        let (name, version) = match raw.rfind('@') {
            None | Some(0) => (raw, None),
            Some(index) => (&raw[..index], Some(&raw[index + 1..])),
        };
        if name.is_empty() {
            return Err(InstallRunError::InvalidSpecifier(raw.to_string()));
        }
        Ok(PackageSpecifier {
            name: name.to_string(),
            version: version
                .filter(|version| !version.is_empty())
                .map(str::to_string),
        })
    }
}

impl FromStr for PackageSpecifier {
    type Err = InstallRunError;

    fn from_str(s: &str) -> Result<Self> {
        PackageSpecifier::parse(s)
    }
}

impl fmt::Display for PackageSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}
