//! Public API trait for the platform registry.
//!
//! This trait defines the interface that consumers use to manage platform
//! registrations and obtain access tokens. The module implements it with a
//! local client that delegates to the domain service.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::PlatformRegistryError;
use crate::models::{PlatformRecord, PlatformRegistration, PlatformUpdate};

/// Public API trait for the platform registry.
///
/// ```ignore
/// let record = registry.register_platform(registration).await?;
/// let token = registry.access_token(&record.base_url).await?;
/// ```
#[async_trait]
pub trait PlatformRegistryClient: Send + Sync {
    /// Register a new platform together with its signing key pair.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` / `MissingArgument` for rejected input
    /// - `AlreadyExists` if the base URL is taken
    /// - `PersistenceFailed` if the store fails
    async fn register_platform(
        &self,
        registration: PlatformRegistration,
    ) -> Result<PlatformRecord, PlatformRegistryError>;

    /// Fetch a registered platform.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no platform has this base URL
    /// - `PersistenceFailed` if the store fails
    async fn get_platform(&self, base_url: &str) -> Result<PlatformRecord, PlatformRegistryError>;

    /// List all registered platforms.
    ///
    /// # Errors
    ///
    /// - `PersistenceFailed` if the store fails
    async fn list_platforms(&self) -> Result<Vec<PlatformRecord>, PlatformRegistryError>;

    /// Apply a field-wise update and return the resulting record.
    ///
    /// Fields are written one at a time; a failure leaves the fields written
    /// before it in place.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no platform has this base URL
    /// - `AlreadyExists` if the new base URL belongs to another platform
    /// - `InvalidArgument` / `MissingArgument` for a rejected auth config
    /// - `PersistenceFailed` if the store fails
    async fn update_platform(
        &self,
        base_url: &str,
        update: PlatformUpdate,
    ) -> Result<PlatformRecord, PlatformRegistryError>;

    /// Remove a platform and its key pair.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no platform has this base URL
    /// - `PersistenceFailed` if any deletion fails
    async fn remove_platform(&self, base_url: &str) -> Result<(), PlatformRegistryError>;

    /// A currently valid access token for the platform, minted when needed.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no platform has this base URL
    /// - `TokenIssuance` with the issuer's error, unchanged
    /// - `PersistenceFailed` if the store fails and the registry is configured to fail
    async fn access_token(&self, base_url: &str) -> Result<SecretString, PlatformRegistryError>;
}
