use std::collections::BTreeMap;

use pep508_rs::MarkerEnvironment;
use serde::Serialize;

use crate::extras::ExtrasMap;
use crate::manifest::Manifest;
use crate::metadata::{EntryPoints, StaticMetadata};
use crate::requirement::{Requirement, RequirementList};

/// How the backend's `test` command runs the suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCommand {
    pub runner: String,
    pub args: String,
}

impl TestCommand {
    #[must_use]
    pub fn pytest(args: impl Into<String>) -> Self {
        Self {
            runner: "pytest".to_string(),
            args: args.into(),
        }
    }
}

impl Default for TestCommand {
    fn default() -> Self {
        Self::pytest("")
    }
}

/// Everything the packaging backend needs for one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildDescriptor {
    name: String,
    version: String,
    url: String,
    license: String,
    author: String,
    author_email: String,
    description: String,
    long_description: String,
    packages: Vec<String>,
    package_data: BTreeMap<String, Vec<String>>,
    platforms: String,
    python_requires: String,
    classifiers: Vec<String>,
    entry_points: EntryPoints,
    install_requires: RequirementList,
    tests_require: RequirementList,
    extras_require: ExtrasMap,
    commands: BTreeMap<String, TestCommand>,
}

impl BuildDescriptor {
    #[must_use]
    pub fn new(
        metadata: StaticMetadata,
        version: String,
        long_description: String,
        packages: Vec<String>,
        manifest: Manifest,
        test_command: TestCommand,
    ) -> Self {
        Self {
            name: metadata.name,
            version,
            url: metadata.url,
            license: metadata.license,
            author: metadata.author,
            author_email: metadata.author_email,
            description: metadata.description,
            long_description,
            packages,
            package_data: metadata.package_data,
            platforms: metadata.platforms,
            python_requires: metadata.python_requires,
            classifiers: metadata.classifiers,
            entry_points: metadata.entry_points,
            install_requires: manifest.install_requires,
            tests_require: manifest.tests_require,
            extras_require: manifest.extras_require,
            commands: BTreeMap::from([("test".to_string(), test_command)]),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn long_description(&self) -> &str {
        &self.long_description
    }

    #[must_use]
    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    #[must_use]
    pub fn entry_points(&self) -> &EntryPoints {
        &self.entry_points
    }

    #[must_use]
    pub fn install_requires(&self) -> &RequirementList {
        &self.install_requires
    }

    #[must_use]
    pub fn tests_require(&self) -> &RequirementList {
        &self.tests_require
    }

    #[must_use]
    pub fn extras_require(&self) -> &ExtrasMap {
        &self.extras_require
    }

    #[must_use]
    pub fn test_command(&self) -> Option<&TestCommand> {
        self.commands.get("test")
    }

    /// Base requirements whose markers hold on `marker_env`.
    #[must_use]
    pub fn install_requires_for(&self, marker_env: &MarkerEnvironment) -> Vec<&Requirement> {
        self.install_requires
            .iter()
            .filter(|req| req.applies_to(marker_env))
            .collect()
    }

    /// `Requires-Dist` values: base requirements, then every extra in order.
    #[must_use]
    pub fn requires_dist(&self) -> Vec<String> {
        let base = self.install_requires.iter().map(ToString::to_string);
        let extras = self.extras_require.iter().flat_map(|(group, list)| {
            list.iter()
                .map(move |req| req.for_extra(group.as_str()))
        });
        base.chain(extras).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extras::ExtraGroup;
    use crate::flags::FeatureFlags;
    use crate::manifest::{ManifestBuilder, ManifestSeed};
    use pep508_rs::StringVersion;
    use std::str::FromStr;

    fn descriptor(flags: FeatureFlags) -> BuildDescriptor {
        let seed = ManifestSeed::standard().expect("seed");
        let manifest = ManifestBuilder::new(&seed).build(&flags).expect("manifest");
        BuildDescriptor::new(
            StaticMetadata::sanic().expect("metadata"),
            "23.12.0".to_string(),
            "Sanic\n=====\n".to_string(),
            vec!["sanic".to_string(), "sanic.http".to_string()],
            manifest,
            TestCommand::default(),
        )
    }

    fn windows() -> MarkerEnvironment {
        MarkerEnvironment {
            implementation_name: "cpython".into(),
            implementation_version: StringVersion::from_str("3.12.0").expect("impl version"),
            os_name: "nt".into(),
            platform_machine: "AMD64".into(),
            platform_python_implementation: "CPython".into(),
            platform_release: "10".into(),
            platform_system: "Windows".into(),
            platform_version: "10.0.19041".into(),
            python_full_version: StringVersion::from_str("3.12.0").expect("full version"),
            python_version: StringVersion::from_str("3.12").expect("python version"),
            sys_platform: "win32".into(),
        }
    }

    #[test]
    fn serializes_backend_fields() {
        let value = serde_json::to_value(descriptor(FeatureFlags::default())).expect("json");
        assert_eq!(value["name"], "sanic");
        assert_eq!(value["version"], "23.12.0");
        assert_eq!(value["platforms"], "any");
        assert_eq!(value["python_requires"], ">=3.8");
        assert_eq!(value["package_data"]["sanic"][0], "py.typed");
        assert_eq!(
            value["entry_points"]["console_scripts"]["sanic"],
            "sanic.__main__:main"
        );
        assert_eq!(value["commands"]["test"]["runner"], "pytest");
        assert_eq!(value["extras_require"]["http3"][0], "aioquic");
        assert!(value["install_requires"]
            .as_array()
            .expect("array")
            .iter()
            .any(|spec| spec.as_str().is_some_and(|s| s.starts_with("ujson>=1.35; "))));
    }

    #[test]
    fn accelerators_do_not_apply_on_windows() {
        let descriptor = descriptor(FeatureFlags::default());
        let names: Vec<&str> = descriptor
            .install_requires_for(&windows())
            .into_iter()
            .map(Requirement::name)
            .collect();
        assert!(!names.contains(&"ujson"));
        assert!(!names.contains(&"uvloop"));
        assert!(names.contains(&"httptools"));
        assert_eq!(names.len(), descriptor.install_requires().len() - 2);
    }

    #[test]
    fn requires_dist_scopes_extras() {
        let descriptor = descriptor(FeatureFlags::default());
        let lines = descriptor.requires_dist();
        let extras_total: usize = descriptor
            .extras_require()
            .iter()
            .map(|(_, list)| list.len())
            .sum();
        assert_eq!(lines.len(), descriptor.install_requires().len() + extras_total);
        assert!(lines.contains(&"aioquic; extra == \"http3\"".to_string()));
        assert!(lines.iter().any(|line| line.starts_with("types-ujson; (")
            && line.ends_with("and extra == \"test\"")));
        assert!(descriptor
            .extras_require()
            .get(ExtraGroup::All)
            .contains("sphinx"));
    }
}
