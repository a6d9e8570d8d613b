//! Resolution of a platform's signing key material.

use std::sync::Arc;

use platform_registry_sdk::{KeyKind, PlatformStore};
use secrecy::SecretString;

/// Looks up key material by key id.
///
/// Lenient by contract: a store failure and a missing key both come back as
/// `None`. Failures are logged, never propagated.
#[derive(Clone)]
pub struct KeyResolver {
    store: Arc<dyn PlatformStore>,
}

impl KeyResolver {
    #[must_use]
    pub fn new(store: Arc<dyn PlatformStore>) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip(self), fields(kind = %kind))]
    pub async fn resolve(&self, kind: KeyKind, kid: &str) -> Option<SecretString> {
        match self.store.find_key(kind, kid).await {
            Ok(Some(key)) => Some(key),
            Ok(None) => {
                tracing::warn!(kid, "key material not found");
                None
            }
            Err(e) => {
                tracing::error!(kid, error = %e, "key material lookup failed");
                None
            }
        }
    }

    pub async fn public_key(&self, kid: &str) -> Option<SecretString> {
        self.resolve(KeyKind::PublicKey, kid).await
    }

    pub async fn private_key(&self, kid: &str) -> Option<SecretString> {
        self.resolve(KeyKind::PrivateKey, kid).await
    }
}
