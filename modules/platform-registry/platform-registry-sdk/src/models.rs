//! Domain models for the platform registry module.

use std::fmt;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Mechanism used to verify messages that claim to originate from a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthMethod {
    /// Raw RSA public key (PEM).
    RsaKey,
    /// A single JSON Web Key.
    JwkKey,
    /// URL of a JSON Web Key Set.
    JwkSet,
}

impl AuthMethod {
    /// Every accepted method, in declaration order.
    pub const ALL: [Self; 3] = [Self::RsaKey, Self::JwkKey, Self::JwkSet];

    /// Wire name of the method (`RSA_KEY`, `JWK_KEY`, `JWK_SET`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RsaKey => "RSA_KEY",
            Self::JwkKey => "JWK_KEY",
            Self::JwkSet => "JWK_SET",
        }
    }

    /// Parse a wire name. Matching is exact; anything else yields `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == value)
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication method paired with its credential material.
///
/// `key` holds a PEM string, a JWK document or a keyset URL depending on
/// `method`. It is never empty once the config passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthMethodConfig {
    pub method: AuthMethod,
    pub key: String,
}

/// Persisted registration of a trust partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformRecord {
    /// Display name.
    pub name: String,
    /// Base URL; the natural key of the record.
    pub base_url: String,
    /// Client id issued to this system by the platform.
    pub client_id: String,
    /// OIDC authentication endpoint.
    pub auth_endpoint: String,
    /// OAuth2 token endpoint.
    pub token_endpoint: String,
    /// Key id of this system's signing key pair for the platform.
    pub kid: String,
    /// How inbound messages from the platform are verified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_config: Option<AuthMethodConfig>,
}

/// Partial update of a [`PlatformRecord`].
///
/// The key id is deliberately absent: it never changes after registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformPatch {
    pub name: Option<String>,
    pub base_url: Option<String>,
    pub client_id: Option<String>,
    pub auth_endpoint: Option<String>,
    pub token_endpoint: Option<String>,
    pub auth_config: Option<AuthMethodConfig>,
}

impl PlatformPatch {
    /// Returns `true` when the patch carries no field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.base_url.is_none()
            && self.client_id.is_none()
            && self.auth_endpoint.is_none()
            && self.token_endpoint.is_none()
            && self.auth_config.is_none()
    }

    /// Overwrite the fields of `record` that are present in the patch.
    pub fn apply_to(&self, record: &mut PlatformRecord) {
        if let Some(name) = &self.name {
            record.name.clone_from(name);
        }
        if let Some(base_url) = &self.base_url {
            record.base_url.clone_from(base_url);
        }
        if let Some(client_id) = &self.client_id {
            record.client_id.clone_from(client_id);
        }
        if let Some(auth_endpoint) = &self.auth_endpoint {
            record.auth_endpoint.clone_from(auth_endpoint);
        }
        if let Some(token_endpoint) = &self.token_endpoint {
            record.token_endpoint.clone_from(token_endpoint);
        }
        if let Some(auth_config) = &self.auth_config {
            record.auth_config = Some(auth_config.clone());
        }
    }
}

/// Which half of a platform's signing key pair to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    PublicKey,
    PrivateKey,
}

impl KeyKind {
    /// Name of the key-material collection (`publickey` / `privatekey`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PublicKey => "publickey",
            Self::PrivateKey => "privatekey",
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signing key pair stored for a platform at registration.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub public_key: String,
    pub private_key: SecretString,
}

/// Input for registering a new platform.
#[derive(Debug, Clone)]
pub struct PlatformRegistration {
    pub name: String,
    pub base_url: String,
    pub client_id: String,
    pub auth_endpoint: String,
    pub token_endpoint: String,
    /// Key id to use; one is generated when absent.
    pub kid: Option<String>,
    /// Raw authentication method tag, validated before anything is stored.
    pub auth_method: Option<String>,
    /// Credential paired with `auth_method`.
    pub auth_key: Option<String>,
    pub keys: KeyPair,
}

/// Field-wise update requested through the public client.
///
/// Present fields are applied one by one through the platform setters.
#[derive(Debug, Clone, Default)]
pub struct PlatformUpdate {
    pub name: Option<String>,
    pub base_url: Option<String>,
    pub client_id: Option<String>,
    pub auth_endpoint: Option<String>,
    pub token_endpoint: Option<String>,
    pub auth_method: Option<String>,
    pub auth_key: Option<String>,
}

/// Token returned by a [`TokenIssuer`](crate::TokenIssuer) exchange.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: SecretString,
    /// Declared lifetime in seconds.
    pub expires_in: u64,
}

/// Last token minted for a platform, as held by the store.
#[derive(Debug, Clone)]
pub struct CachedAccessToken {
    pub access_token: SecretString,
    pub created_at: DateTime<Utc>,
    /// Declared lifetime in seconds.
    pub expires_in: u64,
}

impl CachedAccessToken {
    #[must_use]
    pub fn new(issued: IssuedToken, created_at: DateTime<Utc>) -> Self {
        Self {
            access_token: issued.access_token,
            created_at,
            expires_in: issued.expires_in,
        }
    }

    /// Whether the token is still inside its declared lifetime at `now`.
    ///
    /// The boundary is inclusive: a token exactly `expires_in` seconds old is
    /// still valid. A `created_at` in the future (clock skew) counts as valid.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        let elapsed_ms = now.signed_duration_since(self.created_at).num_milliseconds();
        i128::from(elapsed_ms) <= i128::from(self.expires_in) * 1000
    }
}
