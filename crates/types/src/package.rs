//! Package descriptor types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What kind of artifact a package path points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PackageKind {
    #[default]
    Xcode,
    CommandLineTools,
    Other,
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xcode => write!(f, "Xcode"),
            Self::CommandLineTools => write!(f, "Command Line Tools"),
            Self::Other => write!(f, "package"),
        }
    }
}

impl FromStr for PackageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xcode" => Ok(Self::Xcode),
            "command-line-tools" | "clt" => Ok(Self::CommandLineTools),
            "other" => Ok(Self::Other),
            _ => Err(format!("unknown package kind: {s}")),
        }
    }
}

// Implement clap::ValueEnum for PackageKind
impl clap::ValueEnum for PackageKind {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Xcode, Self::CommandLineTools, Self::Other]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Xcode => clap::builder::PossibleValue::new("xcode"),
            Self::CommandLineTools => {
                clap::builder::PossibleValue::new("command-line-tools").alias("clt")
            }
            Self::Other => clap::builder::PossibleValue::new("other"),
        })
    }
}

/// Identity of a downloadable resource
///
/// Only `path` is used to build URLs; `kind` and `version` are labels for
/// logs and reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Package {
    kind: PackageKind,
    version: Option<String>,
    path: String,
}

impl Package {
    /// Create a new package descriptor
    pub fn new(kind: PackageKind, version: Option<String>, path: impl Into<String>) -> Self {
        Self {
            kind,
            version,
            path: path.into(),
        }
    }

    /// Descriptor for a bare server-side path
    pub fn from_path(path: impl Into<String>) -> Self {
        Self::new(PackageKind::default(), None, path)
    }

    #[must_use]
    pub fn kind(&self) -> PackageKind {
        self.kind
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Server-side path, e.g. `/Developer_Tools/Xcode_15/Xcode_15.xip`
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last non-empty segment of the path, used as the default file name
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.rsplit('/').find(|segment| !segment.is_empty())
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} {version}", self.kind),
            None => write!(f, "{} ({})", self.kind, self.path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        let package = Package::from_path("/Developer_Tools/Xcode_15/Xcode_15.xip");
        assert_eq!(package.file_name(), Some("Xcode_15.xip"));

        let package = Package::from_path("Developer_Tools/Xcode_15/");
        assert_eq!(package.file_name(), Some("Xcode_15"));

        let package = Package::from_path("/");
        assert_eq!(package.file_name(), None);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Xcode".parse::<PackageKind>(), Ok(PackageKind::Xcode));
        assert_eq!(
            "clt".parse::<PackageKind>(),
            Ok(PackageKind::CommandLineTools)
        );
        assert!("sdk".parse::<PackageKind>().is_err());
    }

    #[test]
    fn test_display() {
        let package = Package::new(
            PackageKind::Xcode,
            Some("15.0".into()),
            "/Developer_Tools/Xcode_15/Xcode_15.xip",
        );
        assert_eq!(package.to_string(), "Xcode 15.0");
    }
}
