use crate::config::{BuildConfig, EnvSnapshot, FlagDefaults, FlagOverrides};
use bdr_domain::ConfigurationError;

pub struct CommandContext {
    env: EnvSnapshot,
    defaults: FlagDefaults,
}

impl CommandContext {
    /// Creates a new command context from the current process environment.
    pub fn new() -> Self {
        Self::with_env(EnvSnapshot::capture())
    }

    pub fn with_env(env: EnvSnapshot) -> Self {
        Self {
            env,
            defaults: FlagDefaults::default(),
        }
    }

    /// # Errors
    ///
    /// Returns the first invalid feature switch.
    pub fn build_config(&self, overrides: FlagOverrides) -> Result<BuildConfig, ConfigurationError> {
        BuildConfig::from_snapshot(&self.env, &self.defaults, overrides)
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::new()
    }
}
