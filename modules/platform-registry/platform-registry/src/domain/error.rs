//! Domain errors for the platform registry.

use platform_registry_sdk::{PlatformRegistryError, StoreError, TokenIssuerError};

/// Internal domain errors.
#[derive(thiserror::Error, Debug, Clone)]
pub enum DomainError {
    #[error("platform not found: {base_url}")]
    NotFound { base_url: String },

    #[error("platform already exists: {base_url}")]
    AlreadyExists { base_url: String },

    #[error("validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("invalid authentication method '{method}', expected one of RSA_KEY, JWK_KEY, JWK_SET")]
    InvalidAuthMethod { method: String },

    #[error("missing key or keyset for authentication method {method}")]
    MissingAuthKey { method: String },

    #[error("signing key unavailable for kid '{kid}'")]
    SigningKeyUnavailable { kid: String },

    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),

    #[error(transparent)]
    Issuer(#[from] TokenIssuerError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(base_url: impl Into<String>) -> Self {
        Self::NotFound {
            base_url: base_url.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<DomainError> for PlatformRegistryError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { base_url } => Self::NotFound(base_url),
            DomainError::AlreadyExists { base_url } => Self::AlreadyExists(base_url),
            DomainError::Validation { field, message } => {
                Self::InvalidArgument(format!("{field}: {message}"))
            }
            DomainError::InvalidAuthMethod { .. } => Self::InvalidArgument(e.to_string()),
            DomainError::MissingAuthKey { .. } => Self::MissingArgument(e.to_string()),
            DomainError::Persistence(inner) => Self::PersistenceFailed(inner.to_string()),
            DomainError::Issuer(inner) => Self::TokenIssuance(inner),
            DomainError::SigningKeyUnavailable { .. } | DomainError::Internal(_) => {
                Self::Internal(e.to_string())
            }
        }
    }
}
