use std::sync::Arc;

use platform_registry_sdk::{
    AuthMethodConfig, KeyKind, PlatformRecord, PlatformRegistration, PlatformStore,
    PlatformUpdate, StoreError, TokenIssuer,
};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use super::auth_method::validate_auth_config;
use super::clock::Clock;
use super::error::DomainError;
use super::platform::Platform;
use super::token_lifecycle::AccessTokenLifecycle;
use crate::config::{MIN_KID_LENGTH_BYTES, PlatformRegistryConfig};

const KID_ATTEMPTS: usize = 4;

/// Platform registry service.
///
/// Owns registration and lookup of platforms; everything per-platform is
/// delegated to [`Platform`].
pub struct Service {
    store: Arc<dyn PlatformStore>,
    tokens: Arc<AccessTokenLifecycle>,
    config: PlatformRegistryConfig,
}

impl Service {
    #[must_use]
    pub fn new(
        store: Arc<dyn PlatformStore>,
        issuer: Arc<dyn TokenIssuer>,
        clock: Arc<dyn Clock>,
        config: PlatformRegistryConfig,
    ) -> Self {
        let tokens = Arc::new(AccessTokenLifecycle::new(
            Arc::clone(&store),
            issuer,
            clock,
            config.store_failure_policy,
        ));
        Self {
            store,
            tokens,
            config,
        }
    }

    /// Register a platform and store its signing key pair.
    ///
    /// Keys are written first; if the platform record cannot be inserted the
    /// keys are deleted again, best-effort.
    ///
    /// # Errors
    ///
    /// - `Validation` for empty fields, unparsable URLs or a taken key id
    /// - `InvalidAuthMethod` / `MissingAuthKey` for a rejected auth config
    /// - `AlreadyExists` if the base URL is taken
    /// - `Persistence` if the store fails
    #[tracing::instrument(skip_all, fields(base_url = %registration.base_url))]
    pub async fn register(&self, registration: PlatformRegistration) -> Result<Platform, DomainError> {
        let PlatformRegistration {
            name,
            base_url,
            client_id,
            auth_endpoint,
            token_endpoint,
            kid,
            auth_method,
            auth_key,
            keys,
        } = registration;

        require("name", &name)?;
        require("client_id", &client_id)?;
        require_url("base_url", &base_url)?;
        require_url("auth_endpoint", &auth_endpoint)?;
        require_url("token_endpoint", &token_endpoint)?;
        require("public_key", &keys.public_key)?;
        require("private_key", keys.private_key.expose_secret())?;
        let auth_config = registration_auth_config(auth_method.as_deref(), auth_key.as_deref())?;

        if self.store.find_platform(&base_url).await?.is_some() {
            return Err(DomainError::AlreadyExists { base_url });
        }

        let kid = match kid.filter(|kid| !kid.is_empty()) {
            Some(kid) => {
                if self.store.find_key(KeyKind::PublicKey, &kid).await?.is_some() {
                    return Err(DomainError::validation("kid", "already in use"));
                }
                kid
            }
            None => self.unused_kid().await?,
        };

        self.store_keys(&kid, keys.public_key, keys.private_key)
            .await?;

        let record = PlatformRecord {
            name,
            base_url,
            client_id,
            auth_endpoint,
            token_endpoint,
            kid,
            auth_config,
        };
        if let Err(e) = self.store.insert_platform(record.clone()).await {
            self.discard_keys(&record.kid).await;
            return Err(match e {
                StoreError::Conflict(_) => DomainError::AlreadyExists {
                    base_url: record.base_url,
                },
                other => other.into(),
            });
        }

        info!(kid = %record.kid, "platform registered");
        Ok(Platform::new(record, Arc::clone(&self.store), Arc::clone(&self.tokens)))
    }

    /// # Errors
    ///
    /// - `NotFound` if no platform has this base URL
    /// - `Persistence` if the store fails
    pub async fn platform(&self, base_url: &str) -> Result<Platform, DomainError> {
        let record = self
            .store
            .find_platform(base_url)
            .await?
            .ok_or_else(|| DomainError::not_found(base_url))?;
        Ok(Platform::new(record, Arc::clone(&self.store), Arc::clone(&self.tokens)))
    }

    /// # Errors
    ///
    /// `Persistence` if the store fails.
    pub async fn platforms(&self) -> Result<Vec<PlatformRecord>, DomainError> {
        Ok(self.store.list_platforms().await?)
    }

    /// Apply the present fields through the platform's setters.
    ///
    /// Everything that can be checked up front is checked before the first
    /// write. The base URL is written last.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no platform has this base URL
    /// - `AlreadyExists` if the new base URL belongs to another platform
    /// - `Validation` / `InvalidAuthMethod` / `MissingAuthKey` for rejected input
    /// - `Persistence` if a write fails; earlier writes stay in place
    #[tracing::instrument(skip(self, update))]
    pub async fn update(
        &self,
        base_url: &str,
        update: PlatformUpdate,
    ) -> Result<PlatformRecord, DomainError> {
        let PlatformUpdate {
            name,
            base_url: new_base_url,
            client_id,
            auth_endpoint,
            token_endpoint,
            auth_method,
            auth_key,
        } = update;

        if let Some(name) = &name {
            require("name", name)?;
        }
        if let Some(client_id) = &client_id {
            require("client_id", client_id)?;
        }
        if let Some(url) = &new_base_url {
            require_url("base_url", url)?;
        }
        if let Some(url) = &auth_endpoint {
            require_url("auth_endpoint", url)?;
        }
        if let Some(url) = &token_endpoint {
            require_url("token_endpoint", url)?;
        }

        if let Some(url) = new_base_url.as_deref()
            && url != base_url
            && self.store.find_platform(url).await?.is_some()
        {
            return Err(DomainError::AlreadyExists {
                base_url: url.to_owned(),
            });
        }

        let mut platform = self.platform(base_url).await?;

        let auth_method = match (auth_method, &auth_key) {
            (Some(method), _) => Some(method),
            (None, Some(_)) => match platform.auth_config() {
                Some(current) => Some(current.method.as_str().to_owned()),
                None => {
                    return Err(DomainError::validation(
                        "auth_method",
                        "required when no authentication method is configured",
                    ));
                }
            },
            (None, None) => None,
        };
        if let Some(method) = &auth_method {
            validate_auth_config(method, auth_key.as_deref())?;
        }

        if let Some(name) = name {
            platform.set_name(name).await?;
        }
        if let Some(client_id) = client_id {
            platform.set_client_id(client_id).await?;
        }
        if let Some(auth_endpoint) = auth_endpoint {
            platform.set_auth_endpoint(auth_endpoint).await?;
        }
        if let Some(token_endpoint) = token_endpoint {
            platform.set_token_endpoint(token_endpoint).await?;
        }
        if let Some(method) = auth_method {
            platform
                .set_auth_config(&method, auth_key.as_deref())
                .await?;
        }
        if let Some(new_base_url) = new_base_url {
            platform
                .set_base_url(new_base_url)
                .await
                .map_err(|e| match e {
                    DomainError::Persistence(StoreError::Conflict(base_url)) => {
                        DomainError::AlreadyExists { base_url }
                    }
                    other => other,
                })?;
        }

        debug!("platform updated");
        Ok(platform.into_record())
    }

    /// # Errors
    ///
    /// - `NotFound` if no platform has this base URL
    /// - `Persistence` with the first failed deletion
    pub async fn remove(&self, base_url: &str) -> Result<(), DomainError> {
        self.platform(base_url).await?.remove().await
    }

    /// # Errors
    ///
    /// - `NotFound` if no platform has this base URL
    /// - see [`AccessTokenLifecycle::current_access_token`]
    pub async fn access_token(&self, base_url: &str) -> Result<SecretString, DomainError> {
        self.platform(base_url).await?.access_token().await
    }

    /// Random key id that holds no key material yet.
    async fn unused_kid(&self) -> Result<String, DomainError> {
        for _ in 0..KID_ATTEMPTS {
            let kid = self.generate_kid();
            if self.store.find_key(KeyKind::PublicKey, &kid).await?.is_none() {
                return Ok(kid);
            }
            warn!(kid, "generated kid already in use, regenerating");
        }
        Err(DomainError::internal("could not generate an unused kid"))
    }

    fn generate_kid(&self) -> String {
        let len = self.config.kid_length_bytes.max(MIN_KID_LENGTH_BYTES);
        let mut bytes = vec![0u8; len];
        rand::rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    async fn store_keys(
        &self,
        kid: &str,
        public_key: String,
        private_key: SecretString,
    ) -> Result<(), DomainError> {
        self.store
            .insert_key(KeyKind::PublicKey, kid, SecretString::from(public_key))
            .await?;
        if let Err(e) = self.store.insert_key(KeyKind::PrivateKey, kid, private_key).await {
            self.discard_keys(kid).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn discard_keys(&self, kid: &str) {
        for kind in [KeyKind::PublicKey, KeyKind::PrivateKey] {
            if let Err(e) = self.store.delete_key(kind, kid).await {
                warn!(kid, kind = %kind, error = %e, "failed to discard key material");
            }
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    Ok(())
}

fn require_url(field: &str, value: &str) -> Result<(), DomainError> {
    require(field, value)?;
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| DomainError::validation(field, format!("invalid URL: {e}")))
}

fn registration_auth_config(
    method: Option<&str>,
    key: Option<&str>,
) -> Result<Option<AuthMethodConfig>, DomainError> {
    match (method, key) {
        (Some(method), key) => validate_auth_config(method, key).map(Some),
        (None, Some(_)) => Err(DomainError::validation(
            "auth_method",
            "required when an authentication key is given",
        )),
        (None, None) => Ok(None),
    }
}
