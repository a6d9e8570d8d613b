//! Access token cache and renewal.
//!
//! # Flow
//!
//! ```text
//! current_access_token(platform)
//!   → look up cached token by base URL
//!   → Valid?            return it, no issuer call
//!   → Absent / Expired? join or start the renewal flight for this base URL
//!        → re-check the cache (a previous flight may have just finished)
//!        → resolve the private signing key for the platform's kid
//!        → TokenIssuer::issue
//!        → save the new token in the store
//! ```
//!
//! Expiry is evaluated lazily on every call; there is no timer or eviction.
//! Concurrent callers for the same base URL share one renewal and observe
//! the same outcome, token or error.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use platform_registry_sdk::{CachedAccessToken, PlatformRecord, PlatformStore, TokenIssuer};
use secrecy::SecretString;
use tracing::{Instrument, debug, info};

use super::clock::Clock;
use super::error::DomainError;
use super::key_resolver::KeyResolver;
use crate::config::StoreFailurePolicy;

/// Cache state of a platform's access token at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// No cached token.
    Absent,
    /// Cached token within its declared lifetime.
    Valid,
    /// Cached token whose lifetime has elapsed.
    Expired,
}

impl TokenState {
    #[must_use]
    pub fn classify(cached: Option<&CachedAccessToken>, now: chrono::DateTime<chrono::Utc>) -> Self {
        match cached {
            None => Self::Absent,
            Some(token) if token.is_valid_at(now) => Self::Valid,
            Some(_) => Self::Expired,
        }
    }
}

type RenewalFlight = Shared<BoxFuture<'static, Result<SecretString, DomainError>>>;

struct Renewer {
    store: Arc<dyn PlatformStore>,
    issuer: Arc<dyn TokenIssuer>,
    keys: KeyResolver,
    clock: Arc<dyn Clock>,
    store_failure_policy: StoreFailurePolicy,
}

impl Renewer {
    async fn lookup(&self, base_url: &str) -> Result<Option<CachedAccessToken>, DomainError> {
        match self.store.find_access_token(base_url).await {
            Ok(cached) => Ok(cached),
            Err(e) => match self.store_failure_policy {
                StoreFailurePolicy::Renew => {
                    tracing::warn!(error = %e, "cached access token lookup failed, treating as absent");
                    Ok(None)
                }
                StoreFailurePolicy::Fail => {
                    tracing::error!(error = %e, "cached access token lookup failed");
                    Err(e.into())
                }
            },
        }
    }

    async fn renew(&self, platform: &PlatformRecord) -> Result<SecretString, DomainError> {
        let now = self.clock.now();
        if let Some(cached) = self.lookup(&platform.base_url).await?
            && cached.is_valid_at(now)
        {
            debug!("access token already renewed by a previous flight");
            return Ok(cached.access_token);
        }

        let Some(signing_key) = self.keys.private_key(&platform.kid).await else {
            return Err(DomainError::SigningKeyUnavailable {
                kid: platform.kid.clone(),
            });
        };

        debug!(token_endpoint = %platform.token_endpoint, "requesting access token from issuer");
        let issued = self
            .issuer
            .issue(platform, &signing_key)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "token issuance failed");
                DomainError::from(e)
            })?;

        let access_token = issued.access_token.clone();
        let expires_in = issued.expires_in;
        let cached = CachedAccessToken::new(issued, self.clock.now());
        if let Err(e) = self
            .store
            .save_access_token(&platform.base_url, cached)
            .await
        {
            tracing::warn!(error = %e, "failed to cache renewed access token");
        }

        info!(expires_in, "access token renewed");
        Ok(access_token)
    }
}

/// Hands out currently valid access tokens, minting new ones on demand.
pub struct AccessTokenLifecycle {
    renewer: Arc<Renewer>,
    in_flight: DashMap<String, (u64, RenewalFlight)>,
    next_flight: AtomicU64,
}

impl AccessTokenLifecycle {
    #[must_use]
    pub fn new(
        store: Arc<dyn PlatformStore>,
        issuer: Arc<dyn TokenIssuer>,
        clock: Arc<dyn Clock>,
        store_failure_policy: StoreFailurePolicy,
    ) -> Self {
        let keys = KeyResolver::new(Arc::clone(&store));
        Self {
            renewer: Arc::new(Renewer {
                store,
                issuer,
                keys,
                clock,
                store_failure_policy,
            }),
            in_flight: DashMap::new(),
            next_flight: AtomicU64::new(0),
        }
    }

    /// Current state of the cached token for `base_url`.
    ///
    /// # Errors
    ///
    /// `Persistence` if the lookup fails under [`StoreFailurePolicy::Fail`].
    pub async fn state(&self, base_url: &str) -> Result<TokenState, DomainError> {
        let cached = self.renewer.lookup(base_url).await?;
        Ok(TokenState::classify(cached.as_ref(), self.renewer.clock.now()))
    }

    /// A currently valid access token for `platform`.
    ///
    /// # Errors
    ///
    /// - `Issuer` with the issuer's error, unchanged
    /// - `SigningKeyUnavailable` if the platform's private key cannot be resolved
    /// - `Persistence` if the lookup fails under [`StoreFailurePolicy::Fail`]
    #[tracing::instrument(skip_all, fields(base_url = %platform.base_url))]
    pub async fn current_access_token(
        &self,
        platform: &PlatformRecord,
    ) -> Result<SecretString, DomainError> {
        match self.renewer.lookup(&platform.base_url).await? {
            Some(cached) if cached.is_valid_at(self.renewer.clock.now()) => {
                debug!("using cached access token");
                return Ok(cached.access_token);
            }
            Some(_) => info!("cached access token expired, renewing"),
            None => info!("no cached access token, renewing"),
        }

        self.renew(platform).await
    }

    async fn renew(&self, platform: &PlatformRecord) -> Result<SecretString, DomainError> {
        let key = platform.base_url.clone();
        let (flight_id, flight) = match self.in_flight.entry(key.clone()) {
            Entry::Occupied(entry) => {
                debug!("joining in-flight renewal");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                let flight_id = self.next_flight.fetch_add(1, Ordering::Relaxed);
                let renewer = Arc::clone(&self.renewer);
                let record = platform.clone();
                let flight = async move { renewer.renew(&record).await }
                    .instrument(tracing::Span::current())
                    .boxed()
                    .shared();
                entry.insert((flight_id, flight.clone()));
                (flight_id, flight)
            }
        };

        let result = flight.await;
        self.in_flight.remove_if(&key, |_, (id, _)| *id == flight_id);
        result
    }
}
