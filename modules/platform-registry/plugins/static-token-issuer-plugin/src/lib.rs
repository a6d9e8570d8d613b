#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Token Issuer Plugin
//!
//! This plugin hands out access tokens from configuration for development and testing.
//! It never contacts a real authorization server.
//!
//! ## Modes
//!
//! - **`accept_all`** (default): Mints a random opaque token for any platform, valid for
//!   `default_expires_in` seconds.
//!
//! - **`static_tokens`**: Returns the configured token for the platform's base URL and
//!   rejects every other platform.
//!
//! ## Configuration
//!
//! ```yaml
//! modules:
//!   static_token_issuer_plugin:
//!     config:
//!       mode: static_tokens
//!       default_expires_in: 3600
//!       tokens:
//!         - base_url: "https://lms.example.com"
//!           access_token: "dev-token"
//!           expires_in: 600
//! ```

pub mod config;
pub mod domain;
pub mod module;

pub use module::StaticTokenIssuerPlugin;
