//! Strict truth-value parsing for build-time feature switches.

use std::fmt;

use serde::Serialize;

use crate::errors::ConfigurationError;

const TRUTHY: [&str; 10] = [
    "y", "yes", "yep", "yup", "t", "true", "on", "enable", "enabled", "1",
];
const FALSY: [&str; 8] = ["n", "no", "f", "false", "off", "disable", "disabled", "0"];

/// Classify `value` (case-insensitive) as true or false.
///
/// # Errors
///
/// Returns [`ConfigurationError::InvalidTruthValue`] for anything outside the
/// two vocabularies.
pub fn parse_truth_value(value: &str) -> Result<bool, ConfigurationError> {
    let lowered = value.to_lowercase();
    if TRUTHY.contains(&lowered.as_str()) {
        Ok(true)
    } else if FALSY.contains(&lowered.as_str()) {
        Ok(false)
    } else {
        Err(ConfigurationError::InvalidTruthValue {
            value: value.to_string(),
        })
    }
}

/// Optional accelerators that a build may opt out of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureKind {
    JsonCodec,
    EventLoop,
}

impl FeatureKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FeatureKind::JsonCodec => "uJSON",
            FeatureKind::EventLoop => "uvLoop",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolved switches. `true` means the feature is left out of the build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    pub disable_json_codec: bool,
    pub disable_event_loop: bool,
}

impl FeatureFlags {
    #[must_use]
    pub fn disables(&self, kind: FeatureKind) -> bool {
        match kind {
            FeatureKind::JsonCodec => self.disable_json_codec,
            FeatureKind::EventLoop => self.disable_event_loop,
        }
    }
}
