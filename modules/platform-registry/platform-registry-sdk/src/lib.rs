//! Platform Registry SDK
//!
//! This crate provides the public API for the `platform_registry` module:
//!
//! - [`PlatformRegistryClient`] - Public API trait for consumers
//! - [`PlatformStore`] - Persistence contract the module is built on
//! - [`TokenIssuer`] - Plugin API trait for OAuth2 client-credentials exchanges
//! - [`PlatformRecord`], [`AuthMethodConfig`], [`CachedAccessToken`] - Domain models
//! - [`PlatformRegistryError`], [`StoreError`], [`TokenIssuerError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use platform_registry_sdk::PlatformRegistryClient;
//! use secrecy::ExposeSecret;
//!
//! let registry: Arc<dyn PlatformRegistryClient> = /* wired by the module */;
//!
//! // Obtain a currently valid access token for a registered platform
//! let token = registry.access_token("https://platform.example.com").await?;
//! let header = format!("Bearer {}", token.expose_secret());
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod plugin_api;
pub mod store_api;

// Re-export main types at crate root
pub use api::PlatformRegistryClient;
pub use error::{PlatformRegistryError, StoreError, TokenIssuerError};
pub use models::{
    AuthMethod, AuthMethodConfig, CachedAccessToken, IssuedToken, KeyKind, KeyPair,
    PlatformPatch, PlatformRecord, PlatformRegistration, PlatformUpdate,
};
pub use plugin_api::TokenIssuer;
pub use store_api::PlatformStore;
