//! Platform Registry Module
//!
//! Keeps the registry of trust partners ("platforms"), resolves their signing
//! key material and hands out OAuth2 client-credentials access tokens, minting
//! a new one only when the cached token is absent or expired.
//!
//! Storage and token issuance are injected through the
//! [`platform_registry_sdk::PlatformStore`] and
//! [`platform_registry_sdk::TokenIssuer`] traits; the resulting
//! [`platform_registry_sdk::PlatformRegistryClient`] is returned by
//! [`module::PlatformRegistryModule::init`].
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod infra;
pub mod module;

pub use config::{PlatformRegistryConfig, StoreFailurePolicy};
pub use infra::storage::InMemoryPlatformStore;
pub use module::PlatformRegistryModule;
