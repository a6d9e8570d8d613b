//! Shape gate for a platform's inbound-message authentication method.
//!
//! Only the method tag and the presence of credential material are checked.
//! Whether the key is a parsable PEM, a JWK document or a reachable keyset URL
//! is for the key consumers to find out.

use platform_registry_sdk::{AuthMethod, AuthMethodConfig};

use super::error::DomainError;

/// Validate a raw `(method, key)` pair and pair them for storage.
///
/// # Errors
///
/// - `InvalidAuthMethod` if `method` is not `RSA_KEY`, `JWK_KEY` or `JWK_SET`
/// - `MissingAuthKey` if `key` is absent or empty
pub fn validate_auth_config(method: &str, key: Option<&str>) -> Result<AuthMethodConfig, DomainError> {
    let Some(method) = AuthMethod::parse(method) else {
        tracing::debug!(method, "rejected authentication method");
        return Err(DomainError::InvalidAuthMethod {
            method: method.to_owned(),
        });
    };

    match key {
        Some(key) if !key.is_empty() => Ok(AuthMethodConfig {
            method,
            key: key.to_owned(),
        }),
        _ => {
            tracing::debug!(%method, "authentication method supplied without key");
            Err(DomainError::MissingAuthKey {
                method: method.as_str().to_owned(),
            })
        }
    }
}
