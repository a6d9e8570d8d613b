//! Error types for the platform registry module.

use thiserror::Error;

/// Errors that can occur when using the platform registry API.
#[derive(Debug, Clone, Error)]
pub enum PlatformRegistryError {
    /// No platform is registered under the given base URL.
    #[error("platform not found: {0}")]
    NotFound(String),

    /// A platform is already registered under the given base URL.
    #[error("platform already exists: {0}")]
    AlreadyExists(String),

    /// An argument was supplied but is not acceptable (e.g. unknown auth method).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A required argument was not supplied (e.g. auth method without key).
    #[error("missing argument: {0}")]
    MissingArgument(String),

    /// The backing store rejected or failed a read/write.
    #[error("persistence failed: {0}")]
    PersistenceFailed(String),

    /// The token issuer failed; the issuer's error is passed through unchanged.
    #[error(transparent)]
    TokenIssuance(#[from] TokenIssuerError),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors reported by a [`PlatformStore`](crate::PlatformStore) implementation.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The filter matched no record where one was required.
    #[error("record not found: {0}")]
    NotFound(String),

    /// A record with the same natural key already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure.
    #[error("store error: {0}")]
    Internal(String),
}

/// Errors reported by a [`TokenIssuer`](crate::TokenIssuer) implementation.
#[derive(Debug, Clone, Error)]
pub enum TokenIssuerError {
    /// The platform's token endpoint refused the client-credentials grant.
    #[error("token request rejected: {0}")]
    Rejected(String),

    /// The token endpoint could not be reached.
    #[error("token endpoint unreachable: {0}")]
    Transport(String),

    /// The token endpoint answered with something that is not a token response.
    #[error("invalid token response: {0}")]
    InvalidResponse(String),

    /// Assertion construction or any other issuer-side failure.
    #[error("token issuer error: {0}")]
    Internal(String),
}
