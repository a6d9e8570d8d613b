//! Local (in-process) client for the platform registry.

use std::sync::Arc;

use async_trait::async_trait;
use platform_registry_sdk::{
    PlatformRecord, PlatformRegistration, PlatformRegistryClient, PlatformRegistryError,
    PlatformUpdate,
};
use secrecy::SecretString;

use super::{DomainError, Service};

/// Local client wrapping the service.
///
/// Handed out by [`crate::module::PlatformRegistryModule::init`].
pub struct PlatformRegistryLocalClient {
    svc: Arc<Service>,
}

impl PlatformRegistryLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> PlatformRegistryError {
    tracing::error!(operation = op, error = ?e, "platform_registry call failed");
    e.into()
}

#[async_trait]
impl PlatformRegistryClient for PlatformRegistryLocalClient {
    async fn register_platform(
        &self,
        registration: PlatformRegistration,
    ) -> Result<PlatformRecord, PlatformRegistryError> {
        self.svc
            .register(registration)
            .await
            .map(super::Platform::into_record)
            .map_err(|e| log_and_convert("register_platform", e))
    }

    async fn get_platform(&self, base_url: &str) -> Result<PlatformRecord, PlatformRegistryError> {
        self.svc
            .platform(base_url)
            .await
            .map(super::Platform::into_record)
            .map_err(|e| log_and_convert("get_platform", e))
    }

    async fn list_platforms(&self) -> Result<Vec<PlatformRecord>, PlatformRegistryError> {
        self.svc
            .platforms()
            .await
            .map_err(|e| log_and_convert("list_platforms", e))
    }

    async fn update_platform(
        &self,
        base_url: &str,
        update: PlatformUpdate,
    ) -> Result<PlatformRecord, PlatformRegistryError> {
        self.svc
            .update(base_url, update)
            .await
            .map_err(|e| log_and_convert("update_platform", e))
    }

    async fn remove_platform(&self, base_url: &str) -> Result<(), PlatformRegistryError> {
        self.svc
            .remove(base_url)
            .await
            .map_err(|e| log_and_convert("remove_platform", e))
    }

    async fn access_token(&self, base_url: &str) -> Result<SecretString, PlatformRegistryError> {
        self.svc
            .access_token(base_url)
            .await
            .map_err(|e| log_and_convert("access_token", e))
    }
}
