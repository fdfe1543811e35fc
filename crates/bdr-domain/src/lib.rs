#![deny(clippy::all, warnings)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

pub mod descriptor;
pub mod errors;
pub mod extras;
pub mod flags;
pub mod manifest;
pub mod metadata;
pub mod requirement;
pub mod version_file;

pub use descriptor::{BuildDescriptor, TestCommand};
pub use errors::{BuildError, ConfigurationError, ResourceError};
pub use extras::{ExtraGroup, ExtrasMap};
pub use flags::{parse_truth_value, FeatureFlags, FeatureKind};
pub use manifest::{
    Companion, Manifest, ManifestBuilder, ManifestSeed, OptionalFeature, ACCELERATOR_MARKER,
};
pub use metadata::{EntryPoints, StaticMetadata, CONSOLE_SCRIPTS};
pub use pep508_rs::MarkerEnvironment;
pub use requirement::{canonicalize_package_name, Requirement, RequirementList};
pub use version_file::{extract_version, read_text, read_version, TextEncoding};
