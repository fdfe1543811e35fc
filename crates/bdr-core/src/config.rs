use std::collections::HashMap;
use std::env;

use bdr_domain::{parse_truth_value, ConfigurationError, FeatureFlags};
use tracing::debug;

pub const NO_UJSON_ENV: &str = "SANIC_NO_UJSON";
pub const NO_UVLOOP_ENV: &str = "SANIC_NO_UVLOOP";

#[derive(Debug, Clone)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

/// Values used for switches the environment leaves unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagDefaults {
    pub no_ujson: &'static str,
    pub no_uvloop: &'static str,
}

impl Default for FlagDefaults {
    fn default() -> Self {
        Self {
            no_ujson: "no",
            no_uvloop: "no",
        }
    }
}

/// Switches forced on from the command line, ahead of the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagOverrides {
    pub no_ujson: bool,
    pub no_uvloop: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildConfig {
    flags: FeatureFlags,
}

impl BuildConfig {
    /// Resolve every feature switch before any manifest work starts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidFlag`] naming the first variable
    /// whose value is not a recognized truth value.
    pub fn from_snapshot(
        snapshot: &EnvSnapshot,
        defaults: &FlagDefaults,
        overrides: FlagOverrides,
    ) -> Result<Self, ConfigurationError> {
        let disable_json_codec =
            read_flag(snapshot, NO_UJSON_ENV, defaults.no_ujson)? || overrides.no_ujson;
        let disable_event_loop =
            read_flag(snapshot, NO_UVLOOP_ENV, defaults.no_uvloop)? || overrides.no_uvloop;
        let flags = FeatureFlags {
            disable_json_codec,
            disable_event_loop,
        };
        debug!(?flags, "feature flags resolved");
        Ok(Self { flags })
    }

    #[must_use]
    pub fn flags(&self) -> &FeatureFlags {
        &self.flags
    }
}

fn read_flag(
    snapshot: &EnvSnapshot,
    name: &str,
    default: &str,
) -> Result<bool, ConfigurationError> {
    let raw = snapshot.var(name).unwrap_or(default);
    parse_truth_value(raw).map_err(|_| ConfigurationError::InvalidFlag {
        name: name.to_string(),
        value: raw.to_string(),
    })
}
