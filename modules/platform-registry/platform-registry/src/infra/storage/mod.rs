//! Storage adapters implementing [`platform_registry_sdk::PlatformStore`].

pub mod memory;

pub use memory::InMemoryPlatformStore;
