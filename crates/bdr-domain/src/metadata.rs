use std::collections::BTreeMap;
use std::str::FromStr;

use pep440_rs::VersionSpecifiers;
use serde::Serialize;

use crate::errors::ConfigurationError;

pub const CONSOLE_SCRIPTS: &str = "console_scripts";

/// Entry point groups, e.g. `console_scripts`, each mapping a name to an
/// object reference such as `sanic.__main__:main`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EntryPoints(BTreeMap<String, BTreeMap<String, String>>);

impl EntryPoints {
    /// Register `name = target` under `group`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidEntryPoint`] when the group or
    /// entry name contains characters outside the permitted set.
    pub fn with(
        mut self,
        group: &str,
        name: &str,
        target: &str,
    ) -> Result<Self, ConfigurationError> {
        let group_ok = group
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
            && group
                .chars()
                .all(|c| c.is_alphanumeric() || c == '.' || c == '_');
        if !group_ok {
            return Err(ConfigurationError::InvalidEntryPoint {
                kind: "group",
                value: group.to_string(),
            });
        }
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
        {
            return Err(ConfigurationError::InvalidEntryPoint {
                kind: "name",
                value: name.to_string(),
            });
        }
        if target.trim().is_empty() {
            return Err(ConfigurationError::InvalidEntryPoint {
                kind: "target",
                value: target.to_string(),
            });
        }
        self.0
            .entry(group.to_string())
            .or_default()
            .insert(name.to_string(), target.to_string());
        Ok(self)
    }

    #[must_use]
    pub fn group(&self, group: &str) -> Option<&BTreeMap<String, String>> {
        self.0.get(group)
    }
}

/// Package metadata that never depends on the build environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticMetadata {
    pub name: String,
    pub url: String,
    pub license: String,
    pub author: String,
    pub author_email: String,
    pub description: String,
    pub package_data: BTreeMap<String, Vec<String>>,
    pub platforms: String,
    pub python_requires: String,
    pub classifiers: Vec<String>,
    pub entry_points: EntryPoints,
}

impl StaticMetadata {
    /// Metadata for the `sanic` distribution.
    ///
    /// # Errors
    ///
    /// Fails only if the built-in values stop validating.
    pub fn sanic() -> Result<Self, ConfigurationError> {
        let metadata = Self {
            name: "sanic".to_string(),
            url: "http://github.com/sanic-org/sanic/".to_string(),
            license: "MIT".to_string(),
            author: "Sanic Community".to_string(),
            author_email: "admhpkns@gmail.com".to_string(),
            description: "A web server and web framework that's written to go fast. \
                          Build fast. Run fast."
                .to_string(),
            package_data: BTreeMap::from([(
                "sanic".to_string(),
                vec!["py.typed".to_string(), "pages/styles/*".to_string()],
            )]),
            platforms: "any".to_string(),
            python_requires: ">=3.8".to_string(),
            classifiers: [
                "Development Status :: 4 - Beta",
                "Environment :: Web Environment",
                "License :: OSI Approved :: MIT License",
                "Programming Language :: Python :: 3.9",
                "Programming Language :: Python :: 3.10",
                "Programming Language :: Python :: 3.11",
                "Programming Language :: Python :: 3.12",
                "Programming Language :: Python :: 3.13",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            entry_points: EntryPoints::default().with(
                CONSOLE_SCRIPTS,
                "sanic",
                "sanic.__main__:main",
            )?,
        };
        metadata.validate()?;
        Ok(metadata)
    }

    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidPythonRequires`] when
    /// `python_requires` is not a PEP 440 specifier set.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        VersionSpecifiers::from_str(&self.python_requires).map_err(|err| {
            ConfigurationError::InvalidPythonRequires {
                spec: self.python_requires.clone(),
                reason: err.to_string(),
            }
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanic_metadata_is_valid() {
        let metadata = StaticMetadata::sanic().expect("metadata");
        assert_eq!(metadata.name, "sanic");
        assert_eq!(metadata.python_requires, ">=3.8");
        assert_eq!(
            metadata
                .entry_points
                .group(CONSOLE_SCRIPTS)
                .and_then(|group| group.get("sanic"))
                .map(String::as_str),
            Some("sanic.__main__:main")
        );
        assert!(!metadata.description.contains('\n'));
        assert_eq!(metadata.classifiers.len(), 8);
    }

    #[test]
    fn entry_point_names_are_validated() {
        let err = EntryPoints::default()
            .with(CONSOLE_SCRIPTS, "bad name", "pkg:main")
            .expect_err("space in name");
        assert_eq!(
            err,
            ConfigurationError::InvalidEntryPoint {
                kind: "name",
                value: "bad name".to_string()
            }
        );
        assert!(EntryPoints::default()
            .with(".scripts", "tool", "pkg:main")
            .is_err());
        assert!(EntryPoints::default()
            .with("sanic.plugins", "tool-x.y", "pkg:main")
            .is_ok());
    }

    #[test]
    fn python_requires_must_parse() {
        let mut metadata = StaticMetadata::sanic().expect("metadata");
        metadata.python_requires = ">=three".to_string();
        assert!(matches!(
            metadata.validate(),
            Err(ConfigurationError::InvalidPythonRequires { .. })
        ));
    }
}
