//! Base requirements and extras, with optional accelerators dropped on request.
//!
//! The seed lists are never modified. Building a manifest derives new lists:
//! removals happen first, then `dev` and `all` are computed from the filtered
//! authored groups so a dropped feature cannot leak back through a derived
//! group.

use serde::Serialize;
use tracing::{debug, info};

use crate::errors::ConfigurationError;
use crate::extras::{ExtraGroup, ExtrasMap};
use crate::flags::{FeatureFlags, FeatureKind};
use crate::requirement::{Requirement, RequirementList};

/// Platforms where the native accelerators build and help.
pub const ACCELERATOR_MARKER: &str =
    r#"sys_platform != "win32" and implementation_name == "cpython""#;

const BASE: &[&str] = &[
    "sanic-routing>=23.12.0",
    "httptools>=0.0.10",
    "uvloop>=0.15.0",
    "ujson>=1.35",
    "aiofiles>=0.6.0",
    "websockets>=10.0",
    "multidict>=5.0,<7.0",
    "html5tagger>=1.2.1",
    "tracerite>=1.0.0",
    "typing-extensions>=4.4.0",
    "setuptools>=70.1.0",
];

const TEST: &[&str] = &[
    "sanic-testing>=23.6.0",
    "pytest>=8.2.2",
    "coverage",
    "beautifulsoup4",
    "pytest-sanic",
    "pytest-benchmark",
    "chardet==3.*",
    "ruff",
    "bandit",
    "mypy",
    "docutils",
    "pygments",
    "uvicorn",
    "slotscheck>=0.8.0,<1",
    "types-ujson",
];

const DEV_ONLY: &[&str] = &["cryptography", "tox", "towncrier"];

const DOCS: &[&str] = &[
    "sphinx>=2.1.2",
    "sphinx_rtd_theme>=0.4.3",
    "docutils",
    "pygments",
    "m2r2",
    "enum-tools[sphinx]",
    "mistune<2.0.0",
    "autodocsumm>=0.2.11",
];

const ACCELERATED: &[&str] = &["uvloop", "ujson", "types-ujson"];

fn accelerated(spec: &str) -> String {
    let name = spec
        .split(|ch: char| matches!(ch, '<' | '>' | '=' | '!' | '~'))
        .next()
        .unwrap_or(spec);
    if ACCELERATED.contains(&name) {
        format!("{spec}; {ACCELERATOR_MARKER}")
    } else {
        spec.to_string()
    }
}

fn seed_list(label: &str, specs: &[&str]) -> Result<RequirementList, ConfigurationError> {
    let specs: Vec<String> = specs.iter().map(|spec| accelerated(spec)).collect();
    RequirementList::parse_unique(label, &specs)
}

/// A requirement that only exists because an optional feature is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Companion {
    pub group: ExtraGroup,
    pub requirement: Requirement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalFeature {
    pub kind: FeatureKind,
    pub requirement: Requirement,
    pub companions: Vec<Companion>,
}

/// The authored inputs of a manifest.
///
/// `dev_only` holds the additions `dev` makes on top of `test`; `dev` and
/// `all` themselves are always derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSeed {
    pub base: RequirementList,
    pub test: RequirementList,
    pub dev_only: RequirementList,
    pub docs: RequirementList,
    pub ext: RequirementList,
    pub http3: RequirementList,
    pub features: Vec<OptionalFeature>,
}

impl ManifestSeed {
    /// The requirement set shipped with the package.
    ///
    /// # Errors
    ///
    /// Fails only if the built-in literals stop parsing.
    pub fn standard() -> Result<Self, ConfigurationError> {
        let base = seed_list("base", BASE)?;
        let test = seed_list("test", TEST)?;
        let json_codec = OptionalFeature {
            kind: FeatureKind::JsonCodec,
            requirement: Requirement::parse(&accelerated("ujson>=1.35"))?,
            companions: vec![Companion {
                group: ExtraGroup::Test,
                requirement: Requirement::parse(&accelerated("types-ujson"))?,
            }],
        };
        let event_loop = OptionalFeature {
            kind: FeatureKind::EventLoop,
            requirement: Requirement::parse(&accelerated("uvloop>=0.15.0"))?,
            companions: Vec::new(),
        };
        Ok(Self {
            base,
            test,
            dev_only: seed_list("dev", DEV_ONLY)?,
            docs: seed_list("docs", DOCS)?,
            ext: seed_list("ext", &["sanic-ext"])?,
            http3: seed_list("http3", &["aioquic"])?,
            features: vec![json_codec, event_loop],
        })
    }
}

/// Resolved dependency manifests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub install_requires: RequirementList,
    pub tests_require: RequirementList,
    pub extras_require: ExtrasMap,
}

pub struct ManifestBuilder<'a> {
    seed: &'a ManifestSeed,
}

impl<'a> ManifestBuilder<'a> {
    #[must_use]
    pub fn new(seed: &'a ManifestSeed) -> Self {
        Self { seed }
    }

    /// Derive the manifests for `flags`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingOptional`] or
    /// [`ConfigurationError::MissingCompanion`] when a disabled feature's
    /// requirement is not where the seed declares it, and
    /// [`ConfigurationError::DuplicateRequirement`] for a base list that names
    /// a package twice.
    pub fn build(&self, flags: &FeatureFlags) -> Result<Manifest, ConfigurationError> {
        let seed = self.seed;
        seed.base.ensure_unique("base")?;

        let mut base = seed.base.clone();
        let mut authored = AuthoredGroups {
            test: seed.test.clone(),
            dev_only: seed.dev_only.clone(),
            docs: seed.docs.clone(),
            ext: seed.ext.clone(),
            http3: seed.http3.clone(),
        };

        for feature in &seed.features {
            if !flags.disables(feature.kind) {
                continue;
            }
            info!("Installing without {}", feature.kind);
            base = base.without(&feature.requirement).ok_or_else(|| {
                ConfigurationError::MissingOptional {
                    feature: feature.kind.to_string(),
                    requirement: feature.requirement.to_string(),
                }
            })?;
            for companion in &feature.companions {
                let missing = || ConfigurationError::MissingCompanion {
                    feature: feature.kind.to_string(),
                    group: companion.group.to_string(),
                    requirement: companion.requirement.to_string(),
                };
                let list = authored.slot_mut(companion.group).ok_or_else(missing)?;
                *list = list.without(&companion.requirement).ok_or_else(missing)?;
            }
        }

        let dev = authored.test.concat(&authored.dev_only);
        let all = RequirementList::union_last_wins(&[&dev, &authored.docs]);
        debug!(
            base = base.len(),
            test = authored.test.len(),
            all = all.len(),
            "manifest resolved"
        );

        let extras_require = ExtrasMap::from_fn(|group| match group {
            ExtraGroup::Test => authored.test.clone(),
            ExtraGroup::Dev => dev.clone(),
            ExtraGroup::Docs => authored.docs.clone(),
            ExtraGroup::All => all.clone(),
            ExtraGroup::Ext => authored.ext.clone(),
            ExtraGroup::Http3 => authored.http3.clone(),
        });
        Ok(Manifest {
            install_requires: base,
            tests_require: authored.test,
            extras_require,
        })
    }
}

struct AuthoredGroups {
    test: RequirementList,
    dev_only: RequirementList,
    docs: RequirementList,
    ext: RequirementList,
    http3: RequirementList,
}

impl AuthoredGroups {
    fn slot_mut(&mut self, group: ExtraGroup) -> Option<&mut RequirementList> {
        match group {
            ExtraGroup::Test => Some(&mut self.test),
            ExtraGroup::Dev => Some(&mut self.dev_only),
            ExtraGroup::Docs => Some(&mut self.docs),
            ExtraGroup::Ext => Some(&mut self.ext),
            ExtraGroup::Http3 => Some(&mut self.http3),
            ExtraGroup::All => None,
        }
    }
}
