//! Platform registry module.

use std::sync::{Arc, OnceLock};

use platform_registry_sdk::{PlatformRegistryClient, PlatformStore, TokenIssuer};
use tracing::info;

use crate::config::PlatformRegistryConfig;
use crate::domain::{PlatformRegistryLocalClient, Service, SystemClock};

/// Platform registry module.
///
/// The host supplies the storage adapter and the token issuer; the module
/// wires them into the service and hands back the public client.
#[derive(Default)]
pub struct PlatformRegistryModule {
    service: OnceLock<Arc<Service>>,
}

impl PlatformRegistryModule {
    /// Build the service and return the client consumers should use.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the module was
    /// already initialized.
    #[tracing::instrument(skip_all, fields(store_failure_policy = ?cfg.store_failure_policy))]
    pub fn init(
        &self,
        cfg: PlatformRegistryConfig,
        store: Arc<dyn PlatformStore>,
        issuer: Arc<dyn TokenIssuer>,
    ) -> anyhow::Result<Arc<dyn PlatformRegistryClient>> {
        info!("Initializing platform_registry");
        cfg.validate()?;

        let svc = Arc::new(Service::new(store, issuer, Arc::new(SystemClock), cfg));
        let api: Arc<dyn PlatformRegistryClient> =
            Arc::new(PlatformRegistryLocalClient::new(Arc::clone(&svc)));

        self.service
            .set(svc)
            .map_err(|_| anyhow::anyhow!("Service already initialized"))?;

        Ok(api)
    }

    /// The service, once [`Self::init`] has run.
    #[must_use]
    pub fn service(&self) -> Option<&Arc<Service>> {
        self.service.get()
    }
}
