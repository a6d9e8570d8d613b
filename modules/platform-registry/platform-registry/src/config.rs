//! Configuration for the platform registry.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "PLATFORM_REGISTRY_";

/// Smallest accepted `kid_length_bytes`. Shorter key ids collide across platforms.
pub const MIN_KID_LENGTH_BYTES: usize = 8;

/// Configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlatformRegistryConfig {
    /// What to do when the cached-token lookup itself fails.
    pub store_failure_policy: StoreFailurePolicy,

    /// Number of random bytes in a generated key id (hex-encoded, so the kid
    /// is twice as long).
    pub kid_length_bytes: usize,
}

impl Default for PlatformRegistryConfig {
    fn default() -> Self {
        Self {
            store_failure_policy: StoreFailurePolicy::Renew,
            kid_length_bytes: 16,
        }
    }
}

/// Handling of a failed cached-token lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreFailurePolicy {
    /// Treat the failure as a cache miss and mint a new token.
    #[default]
    Renew,
    /// Report the failure to the caller without contacting the issuer.
    Fail,
}

impl PlatformRegistryConfig {
    /// Load configuration: defaults, then the optional YAML file, then
    /// `PLATFORM_REGISTRY_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value does not
    /// deserialize.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let cfg: Self = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse configuration from a YAML document layered over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not deserialize or fails
    /// [`Self::validate`].
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let cfg: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Yaml::string(yaml))
            .extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    ///
    /// Returns an error if `kid_length_bytes` is below [`MIN_KID_LENGTH_BYTES`].
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.kid_length_bytes < MIN_KID_LENGTH_BYTES {
            anyhow::bail!(
                "kid_length_bytes must be at least {MIN_KID_LENGTH_BYTES}, got {}",
                self.kid_length_bytes
            );
        }
        Ok(())
    }
}
