use std::io;
use std::path::PathBuf;

/// A defect in the build inputs. Every variant aborts the build.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unable to determine version from '{}'", path.display())]
    VersionNotFound { path: PathBuf },
    #[error("invalid truth value: {value}")]
    InvalidTruthValue { value: String },
    #[error("invalid value for {name}: invalid truth value: {value}")]
    InvalidFlag { name: String, value: String },
    #[error("'{requirement}' is not in the base requirements; cannot disable {feature}")]
    MissingOptional {
        feature: String,
        requirement: String,
    },
    #[error("'{requirement}' is not in the '{group}' requirements; cannot disable {feature}")]
    MissingCompanion {
        feature: String,
        group: String,
        requirement: String,
    },
    #[error("'{name}' appears more than once in the {list} requirements")]
    DuplicateRequirement { list: String, name: String },
    #[error("invalid requirement '{spec}': {reason}")]
    InvalidRequirement { spec: String, reason: String },
    #[error("invalid python_requires '{spec}': {reason}")]
    InvalidPythonRequires { spec: String, reason: String },
    #[error("unknown extra '{name}'")]
    UnknownExtra { name: String },
    #[error("invalid entry point {kind} '{value}'")]
    InvalidEntryPoint { kind: &'static str, value: String },
}

impl ConfigurationError {
    /// Stable identifier used in machine-readable output.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::VersionNotFound { .. } => "version_not_found",
            Self::InvalidTruthValue { .. } | Self::InvalidFlag { .. } => "invalid_flag",
            Self::MissingOptional { .. } | Self::MissingCompanion { .. } => "missing_requirement",
            Self::DuplicateRequirement { .. } => "duplicate_requirement",
            Self::InvalidRequirement { .. } => "invalid_requirement",
            Self::InvalidPythonRequires { .. } => "invalid_python_requires",
            Self::UnknownExtra { .. } => "unknown_extra",
            Self::InvalidEntryPoint { .. } => "invalid_entry_point",
        }
    }
}

/// A required input file is missing or unreadable.
#[derive(Debug, thiserror::Error)]
#[error("failed to read '{}'", path.display())]
pub struct ResourceError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl ResourceError {
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

impl BuildError {
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Configuration(err) => err.reason(),
            Self::Resource(_) => "missing_resource",
        }
    }
}
