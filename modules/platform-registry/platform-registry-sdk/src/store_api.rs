//! Persistence contract for the platform registry.
//!
//! A store holds three collections: platform records keyed by base URL,
//! key material keyed by `(kind, kid)`, and the cached access token keyed by
//! base URL. Read operations return `Ok(None)` for "not found"; `Err` is
//! reserved for backend failures.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::StoreError;
use crate::models::{CachedAccessToken, KeyKind, PlatformPatch, PlatformRecord};

/// Durable storage the registry writes through.
///
/// There is no version check on any write: concurrent writers to the same
/// key resolve as last-write-wins.
#[async_trait]
pub trait PlatformStore: Send + Sync {
    /// Look up a platform by base URL.
    ///
    /// # Errors
    ///
    /// Backend failures only; a missing record is `Ok(None)`.
    async fn find_platform(&self, base_url: &str) -> Result<Option<PlatformRecord>, StoreError>;

    /// List every registered platform.
    ///
    /// # Errors
    ///
    /// Backend failures.
    async fn list_platforms(&self) -> Result<Vec<PlatformRecord>, StoreError>;

    /// Insert a new platform record.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the base URL is already taken
    /// - Backend failures
    async fn insert_platform(&self, record: PlatformRecord) -> Result<(), StoreError>;

    /// Apply `patch` to the platform currently stored under `base_url`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no record matches
    /// - Backend failures
    async fn update_platform(&self, base_url: &str, patch: PlatformPatch)
    -> Result<(), StoreError>;

    /// Delete the platform stored under `base_url`. Deleting nothing is not an error.
    ///
    /// # Errors
    ///
    /// Backend failures.
    async fn delete_platform(&self, base_url: &str) -> Result<(), StoreError>;

    /// First key record of `kind` stored for `kid`.
    ///
    /// Both kinds are carried as [`SecretString`]; the public half is not
    /// secret but shares the collection with the private half.
    ///
    /// # Errors
    ///
    /// Backend failures only; a missing key is `Ok(None)`.
    async fn find_key(&self, kind: KeyKind, kid: &str) -> Result<Option<SecretString>, StoreError>;

    /// Store key material of `kind` under `kid`.
    ///
    /// # Errors
    ///
    /// Backend failures.
    async fn insert_key(&self, kind: KeyKind, kid: &str, key: SecretString)
    -> Result<(), StoreError>;

    /// Delete key material of `kind` stored under `kid`.
    ///
    /// # Errors
    ///
    /// Backend failures.
    async fn delete_key(&self, kind: KeyKind, kid: &str) -> Result<(), StoreError>;

    /// Cached access token for the platform at `base_url`.
    ///
    /// # Errors
    ///
    /// Backend failures only; no cached token is `Ok(None)`.
    async fn find_access_token(
        &self,
        base_url: &str,
    ) -> Result<Option<CachedAccessToken>, StoreError>;

    /// Replace the cached access token for the platform at `base_url`.
    ///
    /// # Errors
    ///
    /// Backend failures.
    async fn save_access_token(
        &self,
        base_url: &str,
        token: CachedAccessToken,
    ) -> Result<(), StoreError>;
}
