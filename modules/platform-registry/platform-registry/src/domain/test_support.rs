//! Test doubles for the store, the issuer and the clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use platform_registry_sdk::{
    CachedAccessToken, IssuedToken, KeyKind, PlatformPatch, PlatformRecord, PlatformStore,
    StoreError, TokenIssuer, TokenIssuerError,
};
use secrecy::{ExposeSecret, SecretString};

use super::clock::Clock;
use crate::infra::storage::memory::InMemoryPlatformStore;

/// Which store operations should fail.
#[derive(Debug, Clone, Copy, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct FailingOps {
    pub find_platform: bool,
    pub update_platform: bool,
    pub insert_platform: bool,
    pub delete_platform: bool,
    pub find_key: bool,
    pub delete_key: bool,
    pub find_access_token: bool,
    pub save_access_token: bool,
}

/// Store call as seen by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    FindPlatform(String),
    ListPlatforms,
    InsertPlatform(String),
    UpdatePlatform(String, PlatformPatch),
    DeletePlatform(String),
    FindKey(KeyKind, String),
    InsertKey(KeyKind, String),
    DeleteKey(KeyKind, String),
    FindAccessToken(String),
    SaveAccessToken(String),
}

/// In-memory store that records every call and can be told to fail.
#[derive(Default)]
pub struct RecordingStore {
    inner: InMemoryPlatformStore,
    failing: Mutex<FailingOps>,
    calls: Mutex<Vec<StoreCall>>,
}

fn injected() -> StoreError {
    StoreError::Unavailable("injected failure".to_owned())
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail(&self, ops: FailingOps) {
        *self.failing.lock() = ops;
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn put_key(&self, kind: KeyKind, kid: &str, key: &str) {
        futures::executor::block_on(self.inner.insert_key(
            kind,
            kid,
            SecretString::from(key.to_owned()),
        ))
        .unwrap();
    }

    pub fn put_platform(&self, record: PlatformRecord) {
        futures::executor::block_on(self.inner.insert_platform(record)).unwrap();
    }

    pub fn put_token(&self, base_url: &str, token: &str, created_at: DateTime<Utc>, expires_in: u64) {
        futures::executor::block_on(self.inner.save_access_token(
            base_url,
            CachedAccessToken {
                access_token: SecretString::from(token.to_owned()),
                created_at,
                expires_in,
            },
        ))
        .unwrap();
    }

    pub fn stored_platform(&self, base_url: &str) -> Option<PlatformRecord> {
        futures::executor::block_on(self.inner.find_platform(base_url)).unwrap()
    }

    pub fn stored_token(&self, base_url: &str) -> Option<CachedAccessToken> {
        futures::executor::block_on(self.inner.find_access_token(base_url)).unwrap()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().push(call);
    }

    fn failing(&self) -> FailingOps {
        *self.failing.lock()
    }
}

#[async_trait]
impl PlatformStore for RecordingStore {
    async fn find_platform(&self, base_url: &str) -> Result<Option<PlatformRecord>, StoreError> {
        self.record(StoreCall::FindPlatform(base_url.to_owned()));
        if self.failing().find_platform {
            return Err(injected());
        }
        self.inner.find_platform(base_url).await
    }

    async fn list_platforms(&self) -> Result<Vec<PlatformRecord>, StoreError> {
        self.record(StoreCall::ListPlatforms);
        self.inner.list_platforms().await
    }

    async fn insert_platform(&self, record: PlatformRecord) -> Result<(), StoreError> {
        self.record(StoreCall::InsertPlatform(record.base_url.clone()));
        if self.failing().insert_platform {
            return Err(injected());
        }
        self.inner.insert_platform(record).await
    }

    async fn update_platform(
        &self,
        base_url: &str,
        patch: PlatformPatch,
    ) -> Result<(), StoreError> {
        self.record(StoreCall::UpdatePlatform(base_url.to_owned(), patch.clone()));
        if self.failing().update_platform {
            return Err(injected());
        }
        self.inner.update_platform(base_url, patch).await
    }

    async fn delete_platform(&self, base_url: &str) -> Result<(), StoreError> {
        self.record(StoreCall::DeletePlatform(base_url.to_owned()));
        if self.failing().delete_platform {
            return Err(injected());
        }
        self.inner.delete_platform(base_url).await
    }

    async fn find_key(&self, kind: KeyKind, kid: &str) -> Result<Option<SecretString>, StoreError> {
        self.record(StoreCall::FindKey(kind, kid.to_owned()));
        if self.failing().find_key {
            return Err(injected());
        }
        self.inner.find_key(kind, kid).await
    }

    async fn insert_key(
        &self,
        kind: KeyKind,
        kid: &str,
        key: SecretString,
    ) -> Result<(), StoreError> {
        self.record(StoreCall::InsertKey(kind, kid.to_owned()));
        self.inner.insert_key(kind, kid, key).await
    }

    async fn delete_key(&self, kind: KeyKind, kid: &str) -> Result<(), StoreError> {
        self.record(StoreCall::DeleteKey(kind, kid.to_owned()));
        if self.failing().delete_key {
            return Err(injected());
        }
        self.inner.delete_key(kind, kid).await
    }

    async fn find_access_token(
        &self,
        base_url: &str,
    ) -> Result<Option<CachedAccessToken>, StoreError> {
        self.record(StoreCall::FindAccessToken(base_url.to_owned()));
        if self.failing().find_access_token {
            return Err(injected());
        }
        self.inner.find_access_token(base_url).await
    }

    async fn save_access_token(
        &self,
        base_url: &str,
        token: CachedAccessToken,
    ) -> Result<(), StoreError> {
        self.record(StoreCall::SaveAccessToken(base_url.to_owned()));
        if self.failing().save_access_token {
            return Err(injected());
        }
        self.inner.save_access_token(base_url, token).await
    }
}

/// Issuer that counts calls and mints `token-<n>`.
pub struct CountingIssuer {
    calls: AtomicUsize,
    expires_in: u64,
    delay: Option<Duration>,
    error: Option<TokenIssuerError>,
    seen_keys: Mutex<Vec<String>>,
}

impl CountingIssuer {
    pub fn new(expires_in: u64) -> Arc<Self> {
        Arc::new(Self::build(expires_in, None, None))
    }

    pub fn slow(expires_in: u64, delay: Duration) -> Arc<Self> {
        Arc::new(Self::build(expires_in, Some(delay), None))
    }

    pub fn failing(error: TokenIssuerError) -> Arc<Self> {
        Arc::new(Self::build(0, None, Some(error)))
    }

    pub fn failing_slowly(error: TokenIssuerError, delay: Duration) -> Arc<Self> {
        Arc::new(Self::build(0, Some(delay), Some(error)))
    }

    fn build(expires_in: u64, delay: Option<Duration>, error: Option<TokenIssuerError>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            expires_in,
            delay,
            error,
            seen_keys: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_keys(&self) -> Vec<String> {
        self.seen_keys.lock().clone()
    }
}

#[async_trait]
impl TokenIssuer for CountingIssuer {
    async fn issue(
        &self,
        _platform: &PlatformRecord,
        signing_key: &SecretString,
    ) -> Result<IssuedToken, TokenIssuerError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.seen_keys
            .lock()
            .push(signing_key.expose_secret().to_owned());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(IssuedToken {
            access_token: SecretString::from(format!("token-{n}")),
            expires_in: self.expires_in,
        })
    }
}

/// Clock that only moves when told to.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

pub fn platform_record(base_url: &str, kid: &str) -> PlatformRecord {
    PlatformRecord {
        name: "Test Platform".to_owned(),
        base_url: base_url.to_owned(),
        client_id: "client-123".to_owned(),
        auth_endpoint: format!("{base_url}/auth"),
        token_endpoint: format!("{base_url}/token"),
        kid: kid.to_owned(),
        auth_config: None,
    }
}
