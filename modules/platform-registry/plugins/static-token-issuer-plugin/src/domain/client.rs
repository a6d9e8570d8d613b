//! Client implementation for the static token issuer plugin.
//!
//! Implements `TokenIssuer` using the domain service.

use async_trait::async_trait;
use platform_registry_sdk::{IssuedToken, PlatformRecord, TokenIssuer, TokenIssuerError};
use secrecy::{ExposeSecret, SecretString};

use super::service::Service;

#[async_trait]
impl TokenIssuer for Service {
    async fn issue(
        &self,
        platform: &PlatformRecord,
        signing_key: &SecretString,
    ) -> Result<IssuedToken, TokenIssuerError> {
        if signing_key.expose_secret().is_empty() {
            return Err(TokenIssuerError::Rejected("empty signing key".to_owned()));
        }
        self.issue(platform).ok_or_else(|| {
            TokenIssuerError::Rejected(format!("no token configured for {}", platform.base_url))
        })
    }
}
