//! Static token issuer plugin module.

use std::sync::{Arc, OnceLock};

use platform_registry_sdk::TokenIssuer;
use tracing::info;

use crate::config::{IssuerMode, StaticTokenIssuerConfig};
use crate::domain::Service;

/// Static token issuer plugin module.
///
/// Builds the issuer from configuration; the host passes the returned
/// [`TokenIssuer`] to the platform registry.
#[derive(Default)]
pub struct StaticTokenIssuerPlugin {
    service: OnceLock<Arc<Service>>,
}

impl StaticTokenIssuerPlugin {
    /// # Errors
    ///
    /// Returns an error if the plugin was already initialized.
    pub fn init(&self, cfg: &StaticTokenIssuerConfig) -> anyhow::Result<Arc<dyn TokenIssuer>> {
        info!("Initializing static_token_issuer_plugin");

        if matches!(cfg.mode, IssuerMode::AcceptAll) {
            tracing::warn!(
                "Static token issuer plugin is running in `accept_all` mode: \
                 every platform gets a locally minted token. \
                 Do NOT use this mode in production."
            );
        }

        info!(
            mode = ?cfg.mode,
            default_expires_in = cfg.default_expires_in,
            token_count = cfg.tokens.len(),
            "Loaded plugin configuration"
        );

        let service = Arc::new(Service::from_config(cfg));
        self.service
            .set(service.clone())
            .map_err(|_| anyhow::anyhow!("Service already initialized"))?;

        let api: Arc<dyn TokenIssuer> = service;
        Ok(api)
    }
}
