use std::path::{Path, PathBuf};

use bdr_domain::{
    read_text, read_version, BuildDescriptor, BuildError, FeatureFlags, ManifestBuilder,
    ManifestSeed, StaticMetadata, TestCommand, TextEncoding,
};
use tracing::{debug, info};

use crate::discovery::PackageDiscovery;

pub const VERSION_FILE: [&str; 2] = ["sanic", "__version__.py"];
pub const README_FILE: &str = "README.rst";

/// Joins the source root with a fixed relative path.
pub fn source_path(root: &Path, parts: &[&str]) -> PathBuf {
    parts.iter().fold(root.to_path_buf(), |path, part| path.join(part))
}

/// Builds the descriptor for one source tree.
pub struct DescriptorAssembler<'a> {
    root: PathBuf,
    discovery: &'a dyn PackageDiscovery,
    seed: ManifestSeed,
    metadata: StaticMetadata,
}

impl<'a> DescriptorAssembler<'a> {
    /// # Errors
    ///
    /// Fails if the built-in metadata or requirement literals are invalid.
    pub fn new(
        root: impl Into<PathBuf>,
        discovery: &'a dyn PackageDiscovery,
    ) -> Result<Self, BuildError> {
        Ok(Self {
            root: root.into(),
            discovery,
            seed: ManifestSeed::standard()?,
            metadata: StaticMetadata::sanic()?,
        })
    }

    #[must_use]
    pub fn with_seed(mut self, seed: ManifestSeed) -> Self {
        self.seed = seed;
        self
    }

    /// Version declared by the package's version module.
    ///
    /// # Errors
    ///
    /// Returns the resolver's resource or configuration error.
    pub fn version(&self) -> Result<String, BuildError> {
        let path = source_path(&self.root, &VERSION_FILE);
        let version = read_version(&path, TextEncoding::Latin1)?;
        debug!(%version, path = %path.display(), "version resolved");
        Ok(version)
    }

    /// # Errors
    ///
    /// Any failure reading inputs or building manifests aborts assembly.
    pub fn assemble(
        &self,
        flags: &FeatureFlags,
        test_command: TestCommand,
    ) -> Result<BuildDescriptor, BuildError> {
        let version = self.version()?;
        let long_description =
            read_text(&source_path(&self.root, &[README_FILE]), TextEncoding::Utf8)?;
        let manifest = ManifestBuilder::new(&self.seed).build(flags)?;
        let packages = self.discovery.packages(&self.root)?;
        info!(
            name = %self.metadata.name,
            %version,
            packages = packages.len(),
            "build descriptor assembled"
        );
        Ok(BuildDescriptor::new(
            self.metadata.clone(),
            version,
            long_description,
            packages,
            manifest,
            test_command,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{FixedPackages, SourceTreeDiscovery};
    use bdr_domain::{ConfigurationError, ExtraGroup, RequirementList};
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn source_tree(version_line: &str) -> TempDir {
        let temp = tempdir().expect("tempdir");
        let pkg = temp.path().join("sanic");
        fs::create_dir_all(&pkg).expect("pkg dir");
        fs::write(pkg.join("__init__.py"), "").expect("init");
        fs::write(pkg.join("__version__.py"), version_line).expect("version");
        fs::write(temp.path().join(README_FILE), "Sanic\n=====\n").expect("readme");
        temp
    }

    #[test]
    fn assembles_from_source_tree() {
        let temp = source_tree("__version__ = \"23.12.0\"\r\n");
        let discovery = SourceTreeDiscovery::default();
        let assembler = DescriptorAssembler::new(temp.path(), &discovery).expect("assembler");
        let descriptor = assembler
            .assemble(&FeatureFlags::default(), TestCommand::pytest("-x"))
            .expect("descriptor");
        assert_eq!(descriptor.name(), "sanic");
        assert_eq!(descriptor.version(), "23.12.0");
        assert_eq!(descriptor.long_description(), "Sanic\n=====\n");
        assert_eq!(descriptor.packages(), &["sanic".to_string()]);
        assert_eq!(descriptor.test_command().map(|cmd| cmd.args.as_str()), Some("-x"));
        assert!(descriptor.install_requires().contains("ujson"));
    }

    #[test]
    fn codec_flag_flows_into_descriptor() {
        let temp = source_tree("__version__ = \"23.12.0\"\n");
        let discovery = FixedPackages(vec!["sanic".to_string()]);
        let assembler = DescriptorAssembler::new(temp.path(), &discovery).expect("assembler");
        let flags = FeatureFlags {
            disable_json_codec: true,
            disable_event_loop: false,
        };
        let descriptor = assembler
            .assemble(&flags, TestCommand::default())
            .expect("descriptor");
        assert!(!descriptor.install_requires().contains("ujson"));
        assert!(descriptor.install_requires().contains("uvloop"));
        assert!(!descriptor.tests_require().contains("types-ujson"));
        assert!(!descriptor
            .extras_require()
            .get(ExtraGroup::Test)
            .contains("types-ujson"));
    }

    #[test]
    fn missing_readme_is_fatal() {
        let temp = source_tree("__version__ = \"23.12.0\"\n");
        fs::remove_file(temp.path().join(README_FILE)).expect("remove readme");
        let discovery = FixedPackages::default();
        let assembler = DescriptorAssembler::new(temp.path(), &discovery).expect("assembler");
        let err = assembler
            .assemble(&FeatureFlags::default(), TestCommand::default())
            .expect_err("missing readme");
        match err {
            BuildError::Resource(resource) => {
                assert_eq!(resource.path, temp.path().join(README_FILE));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unversioned_tree_is_fatal() {
        let temp = source_tree("VERSION = \"1\"\n");
        let discovery = FixedPackages::default();
        let assembler = DescriptorAssembler::new(temp.path(), &discovery).expect("assembler");
        let err = assembler
            .assemble(&FeatureFlags::default(), TestCommand::default())
            .expect_err("no version");
        assert!(matches!(
            err,
            BuildError::Configuration(ConfigurationError::VersionNotFound { .. })
        ));
    }

    #[test]
    fn custom_seed_errors_propagate() {
        let temp = source_tree("__version__ = \"23.12.0\"\n");
        let discovery = FixedPackages::default();
        let mut seed = ManifestSeed::standard().expect("seed");
        seed.test = RequirementList::parse(&["pytest"]).expect("parse");
        let assembler = DescriptorAssembler::new(temp.path(), &discovery)
            .expect("assembler")
            .with_seed(seed);
        let flags = FeatureFlags {
            disable_json_codec: true,
            disable_event_loop: false,
        };
        let err = assembler
            .assemble(&flags, TestCommand::default())
            .expect_err("missing stub");
        assert_eq!(err.reason(), "missing_requirement");
    }
}
