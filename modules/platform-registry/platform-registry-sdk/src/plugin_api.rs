//! Plugin API trait for token issuer implementations.
//!
//! Issuers perform the OAuth2 client-credentials exchange against a
//! platform's token endpoint. They do not touch the store: caching the
//! returned token is the registry's job.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::TokenIssuerError;
use crate::models::{IssuedToken, PlatformRecord};

/// Plugin API trait for OAuth2 client-credentials exchanges.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Exchange a signed client assertion for an access token.
    ///
    /// # Arguments
    ///
    /// * `platform` - The platform whose token endpoint is called
    /// * `signing_key` - This system's private key for the platform's kid
    ///
    /// # Errors
    ///
    /// - `Rejected` if the platform refuses the grant
    /// - `Transport` if the endpoint cannot be reached
    /// - `InvalidResponse` if the response cannot be parsed
    /// - `Internal` for unexpected errors
    async fn issue(
        &self,
        platform: &PlatformRecord,
        signing_key: &SecretString,
    ) -> Result<IssuedToken, TokenIssuerError>;
}
