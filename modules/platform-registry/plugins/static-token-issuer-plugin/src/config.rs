//! Configuration for the static token issuer plugin.

use serde::Deserialize;

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticTokenIssuerConfig {
    /// Issuing mode.
    pub mode: IssuerMode,

    /// Lifetime in seconds of tokens minted in `accept_all` mode, and of
    /// mapped tokens without their own lifetime.
    pub default_expires_in: u64,

    /// Static base-URL-to-token mappings for `static_tokens` mode.
    pub tokens: Vec<TokenMapping>,
}

impl Default for StaticTokenIssuerConfig {
    fn default() -> Self {
        Self {
            mode: IssuerMode::AcceptAll,
            default_expires_in: 3600,
            tokens: Vec::new(),
        }
    }
}

/// Issuing mode.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IssuerMode {
    /// Mint a random token for any platform.
    #[default]
    AcceptAll,
    /// Return configured tokens for specific platforms.
    StaticTokens,
}

/// Maps a platform base URL to a fixed token.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenMapping {
    /// Base URL of the platform.
    pub base_url: String,
    /// The token handed out for this platform.
    pub access_token: String,
    /// Lifetime in seconds; falls back to `default_expires_in`.
    #[serde(default)]
    pub expires_in: Option<u64>,
}
