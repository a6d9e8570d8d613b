//! In-process [`PlatformStore`] backed by hash maps.
//!
//! Suitable for development, single-node deployments and tests. Nothing
//! survives a restart.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;
use platform_registry_sdk::{
    CachedAccessToken, KeyKind, PlatformPatch, PlatformRecord, PlatformStore, StoreError,
};
use secrecy::SecretString;

#[derive(Default)]
struct State {
    platforms: BTreeMap<String, PlatformRecord>,
    keys: HashMap<(KeyKind, String), SecretString>,
    tokens: HashMap<String, CachedAccessToken>,
}

#[derive(Default)]
pub struct InMemoryPlatformStore {
    state: RwLock<State>,
}

impl InMemoryPlatformStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlatformStore for InMemoryPlatformStore {
    async fn find_platform(&self, base_url: &str) -> Result<Option<PlatformRecord>, StoreError> {
        Ok(self.state.read().platforms.get(base_url).cloned())
    }

    async fn list_platforms(&self) -> Result<Vec<PlatformRecord>, StoreError> {
        Ok(self.state.read().platforms.values().cloned().collect())
    }

    async fn insert_platform(&self, record: PlatformRecord) -> Result<(), StoreError> {
        let mut state = self.state.write();
        if state.platforms.contains_key(&record.base_url) {
            return Err(StoreError::Conflict(record.base_url));
        }
        state.platforms.insert(record.base_url.clone(), record);
        Ok(())
    }

    async fn update_platform(
        &self,
        base_url: &str,
        patch: PlatformPatch,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write();
        if let Some(new_url) = patch.base_url.as_deref()
            && new_url != base_url
            && state.platforms.contains_key(new_url)
        {
            return Err(StoreError::Conflict(new_url.to_owned()));
        }

        let mut record = state
            .platforms
            .remove(base_url)
            .ok_or_else(|| StoreError::NotFound(base_url.to_owned()))?;
        patch.apply_to(&mut record);
        state.platforms.insert(record.base_url.clone(), record);
        Ok(())
    }

    async fn delete_platform(&self, base_url: &str) -> Result<(), StoreError> {
        self.state.write().platforms.remove(base_url);
        Ok(())
    }

    async fn find_key(&self, kind: KeyKind, kid: &str) -> Result<Option<SecretString>, StoreError> {
        Ok(self.state.read().keys.get(&(kind, kid.to_owned())).cloned())
    }

    async fn insert_key(
        &self,
        kind: KeyKind,
        kid: &str,
        key: SecretString,
    ) -> Result<(), StoreError> {
        self.state.write().keys.insert((kind, kid.to_owned()), key);
        Ok(())
    }

    async fn delete_key(&self, kind: KeyKind, kid: &str) -> Result<(), StoreError> {
        self.state.write().keys.remove(&(kind, kid.to_owned()));
        Ok(())
    }

    async fn find_access_token(
        &self,
        base_url: &str,
    ) -> Result<Option<CachedAccessToken>, StoreError> {
        Ok(self.state.read().tokens.get(base_url).cloned())
    }

    async fn save_access_token(
        &self,
        base_url: &str,
        token: CachedAccessToken,
    ) -> Result<(), StoreError> {
        self.state.write().tokens.insert(base_url.to_owned(), token);
        Ok(())
    }
}
