//! Platform identity with write-through setters.
//!
//! Every setter persists first, filtered by the current base URL, and only
//! updates the in-memory record once the store accepted the write. A failed
//! write leaves the in-memory value untouched.

use std::sync::Arc;

use platform_registry_sdk::{AuthMethodConfig, KeyKind, PlatformPatch, PlatformRecord, PlatformStore};
use secrecy::SecretString;

use super::auth_method::validate_auth_config;
use super::error::DomainError;
use super::key_resolver::KeyResolver;
use super::token_lifecycle::AccessTokenLifecycle;

/// A registered trust partner.
pub struct Platform {
    record: PlatformRecord,
    store: Arc<dyn PlatformStore>,
    keys: KeyResolver,
    tokens: Arc<AccessTokenLifecycle>,
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform")
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}

impl Platform {
    pub(crate) fn new(
        record: PlatformRecord,
        store: Arc<dyn PlatformStore>,
        tokens: Arc<AccessTokenLifecycle>,
    ) -> Self {
        let keys = KeyResolver::new(Arc::clone(&store));
        Self {
            record,
            store,
            keys,
            tokens,
        }
    }

    #[must_use]
    pub fn record(&self) -> &PlatformRecord {
        &self.record
    }

    #[must_use]
    pub fn into_record(self) -> PlatformRecord {
        self.record
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.record.name
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.record.base_url
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.record.client_id
    }

    #[must_use]
    pub fn auth_endpoint(&self) -> &str {
        &self.record.auth_endpoint
    }

    #[must_use]
    pub fn token_endpoint(&self) -> &str {
        &self.record.token_endpoint
    }

    /// Key id of this system's signing key pair for the platform. Read-only.
    #[must_use]
    pub fn kid(&self) -> &str {
        &self.record.kid
    }

    #[must_use]
    pub fn auth_config(&self) -> Option<&AuthMethodConfig> {
        self.record.auth_config.as_ref()
    }

    /// # Errors
    ///
    /// `Persistence` if the store rejects the write.
    pub async fn set_name(&mut self, name: impl Into<String>) -> Result<(), DomainError> {
        let name = name.into();
        self.persist(
            "name",
            PlatformPatch {
                name: Some(name.clone()),
                ..PlatformPatch::default()
            },
        )
        .await?;
        self.record.name = name;
        Ok(())
    }

    /// Change the base URL. Later writes are filtered by the new value.
    ///
    /// A cached access token stays keyed by the old base URL; the next
    /// [`Self::access_token`] call renews under the new one.
    ///
    /// # Errors
    ///
    /// - `Validation` if `base_url` is empty
    /// - `Persistence` if the store rejects the write
    pub async fn set_base_url(&mut self, base_url: impl Into<String>) -> Result<(), DomainError> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            return Err(DomainError::validation("base_url", "must not be empty"));
        }
        self.persist(
            "base_url",
            PlatformPatch {
                base_url: Some(base_url.clone()),
                ..PlatformPatch::default()
            },
        )
        .await?;
        tracing::debug!(
            old_base_url = %self.record.base_url,
            new_base_url = %base_url,
            "cached access token left under previous base URL"
        );
        self.record.base_url = base_url;
        Ok(())
    }

    /// # Errors
    ///
    /// `Persistence` if the store rejects the write.
    pub async fn set_client_id(&mut self, client_id: impl Into<String>) -> Result<(), DomainError> {
        let client_id = client_id.into();
        self.persist(
            "client_id",
            PlatformPatch {
                client_id: Some(client_id.clone()),
                ..PlatformPatch::default()
            },
        )
        .await?;
        self.record.client_id = client_id;
        Ok(())
    }

    /// # Errors
    ///
    /// `Persistence` if the store rejects the write.
    pub async fn set_auth_endpoint(
        &mut self,
        auth_endpoint: impl Into<String>,
    ) -> Result<(), DomainError> {
        let auth_endpoint = auth_endpoint.into();
        self.persist(
            "auth_endpoint",
            PlatformPatch {
                auth_endpoint: Some(auth_endpoint.clone()),
                ..PlatformPatch::default()
            },
        )
        .await?;
        self.record.auth_endpoint = auth_endpoint;
        Ok(())
    }

    /// # Errors
    ///
    /// `Persistence` if the store rejects the write.
    pub async fn set_token_endpoint(
        &mut self,
        token_endpoint: impl Into<String>,
    ) -> Result<(), DomainError> {
        let token_endpoint = token_endpoint.into();
        self.persist(
            "token_endpoint",
            PlatformPatch {
                token_endpoint: Some(token_endpoint.clone()),
                ..PlatformPatch::default()
            },
        )
        .await?;
        self.record.token_endpoint = token_endpoint;
        Ok(())
    }

    /// Validate and store the authentication method used for inbound messages.
    ///
    /// Validation runs before the store is contacted.
    ///
    /// # Errors
    ///
    /// - `InvalidAuthMethod` / `MissingAuthKey` from validation
    /// - `Persistence` if the store rejects the write
    pub async fn set_auth_config(
        &mut self,
        method: &str,
        key: Option<&str>,
    ) -> Result<(), DomainError> {
        let auth_config = validate_auth_config(method, key)?;
        self.persist(
            "auth_config",
            PlatformPatch {
                auth_config: Some(auth_config.clone()),
                ..PlatformPatch::default()
            },
        )
        .await?;
        self.record.auth_config = Some(auth_config);
        Ok(())
    }

    /// Public half of the platform's signing key pair, if it can be resolved.
    ///
    /// Not secret; it comes back as a [`SecretString`] because both halves
    /// share one key collection. Use `expose_secret()` to publish it.
    pub async fn public_key(&self) -> Option<SecretString> {
        self.keys.public_key(&self.record.kid).await
    }

    /// Private half of the platform's signing key pair, if it can be resolved.
    pub async fn private_key(&self) -> Option<SecretString> {
        self.keys.private_key(&self.record.kid).await
    }

    /// A currently valid access token, minted when the cached one is absent or expired.
    ///
    /// # Errors
    ///
    /// See [`AccessTokenLifecycle::current_access_token`].
    pub async fn access_token(&self) -> Result<SecretString, DomainError> {
        self.tokens.current_access_token(&self.record).await
    }

    /// Delete the platform record and both halves of its key pair.
    ///
    /// All three deletions are issued even when one fails; the first failure
    /// is reported. Nothing is rolled back. The cached access token is not
    /// part of the removal and stays keyed by the base URL.
    ///
    /// # Errors
    ///
    /// `Persistence` with the first failed deletion.
    #[tracing::instrument(skip_all, fields(base_url = %self.record.base_url, kid = %self.record.kid))]
    pub async fn remove(self) -> Result<(), DomainError> {
        let kid = self.record.kid.as_str();
        let results = [
            ("platform", self.store.delete_platform(&self.record.base_url).await),
            (
                KeyKind::PublicKey.as_str(),
                self.store.delete_key(KeyKind::PublicKey, kid).await,
            ),
            (
                KeyKind::PrivateKey.as_str(),
                self.store.delete_key(KeyKind::PrivateKey, kid).await,
            ),
        ];

        let mut first_error = None;
        for (collection, result) in results {
            if let Err(e) = result {
                tracing::error!(collection, error = %e, "failed to delete platform data");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => {
                tracing::info!("platform removed");
                tracing::debug!("cached access token left in place");
                Ok(())
            }
        }
    }

    async fn persist(&self, field: &'static str, patch: PlatformPatch) -> Result<(), DomainError> {
        if self.record.base_url.is_empty() {
            return Err(DomainError::validation("base_url", "must not be empty"));
        }
        self.store
            .update_platform(&self.record.base_url, patch)
            .await
            .map_err(|e| {
                tracing::error!(
                    base_url = %self.record.base_url,
                    field,
                    error = %e,
                    "failed to persist platform field"
                );
                DomainError::from(e)
            })
    }
}
