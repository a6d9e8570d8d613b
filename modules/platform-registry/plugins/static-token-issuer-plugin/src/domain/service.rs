//! Service implementation for the static token issuer plugin.

use std::collections::HashMap;

use platform_registry_sdk::{IssuedToken, PlatformRecord};
use rand::RngCore;
use secrecy::SecretString;

use crate::config::{IssuerMode, StaticTokenIssuerConfig};

/// Static token issuer service.
///
/// Hands out tokens based on configuration mode:
/// - `accept_all`: Any platform gets a freshly minted random token
/// - `static_tokens`: Configured platforms get their configured token
pub struct Service {
    mode: IssuerMode,
    default_expires_in: u64,
    token_map: HashMap<String, (String, u64)>,
}

impl Service {
    /// Create a service from plugin configuration.
    #[must_use]
    pub fn from_config(cfg: &StaticTokenIssuerConfig) -> Self {
        let token_map = cfg
            .tokens
            .iter()
            .map(|m| {
                (
                    m.base_url.clone(),
                    (
                        m.access_token.clone(),
                        m.expires_in.unwrap_or(cfg.default_expires_in),
                    ),
                )
            })
            .collect();

        Self {
            mode: cfg.mode.clone(),
            default_expires_in: cfg.default_expires_in,
            token_map,
        }
    }

    /// Issue a token for `platform`.
    ///
    /// Returns `None` if the platform is not mapped (in `static_tokens` mode).
    #[must_use]
    pub fn issue(&self, platform: &PlatformRecord) -> Option<IssuedToken> {
        match &self.mode {
            IssuerMode::AcceptAll => Some(IssuedToken {
                access_token: SecretString::from(mint_token()),
                expires_in: self.default_expires_in,
            }),
            IssuerMode::StaticTokens => {
                let (token, expires_in) = self.token_map.get(&platform.base_url)?;
                Some(IssuedToken {
                    access_token: SecretString::from(token.clone()),
                    expires_in: *expires_in,
                })
            }
        }
    }
}

fn mint_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
