//! Domain layer for the platform registry.

pub mod auth_method;
pub mod clock;
pub mod error;
pub mod key_resolver;
pub mod local_client;
pub mod platform;
pub mod service;
pub mod token_lifecycle;

#[cfg(test)]
pub mod test_support;

pub use clock::{Clock, SystemClock};
pub use error::DomainError;
pub use key_resolver::KeyResolver;
pub use local_client::PlatformRegistryLocalClient;
pub use platform::Platform;
pub use service::Service;
pub use token_lifecycle::{AccessTokenLifecycle, TokenState};
