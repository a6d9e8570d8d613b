#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for the platform registry client with the in-memory
//! store and the static token issuer plugin.

use std::sync::Arc;

use platform_registry::{InMemoryPlatformStore, PlatformRegistryConfig, PlatformRegistryModule};
use platform_registry_sdk::{
    KeyPair, PlatformRegistration, PlatformRegistryClient, PlatformRegistryError, PlatformUpdate,
    TokenIssuerError,
};
use secrecy::{ExposeSecret, SecretString};
use static_token_issuer_plugin::StaticTokenIssuerPlugin;
use static_token_issuer_plugin::config::{IssuerMode, StaticTokenIssuerConfig, TokenMapping};

const BASE_URL: &str = "https://lms.example.com";

fn registry_with(issuer_cfg: &StaticTokenIssuerConfig) -> Arc<dyn PlatformRegistryClient> {
    let issuer = StaticTokenIssuerPlugin::default().init(issuer_cfg).unwrap();
    PlatformRegistryModule::default()
        .init(
            PlatformRegistryConfig::default(),
            Arc::new(InMemoryPlatformStore::new()),
            issuer,
        )
        .unwrap()
}

fn registry() -> Arc<dyn PlatformRegistryClient> {
    registry_with(&StaticTokenIssuerConfig::default())
}

fn registration(base_url: &str) -> PlatformRegistration {
    PlatformRegistration {
        name: "Example LMS".to_owned(),
        base_url: base_url.to_owned(),
        client_id: "client-123".to_owned(),
        auth_endpoint: format!("{base_url}/auth"),
        token_endpoint: format!("{base_url}/token"),
        kid: None,
        auth_method: Some("RSA_KEY".to_owned()),
        auth_key: Some("-----BEGIN PUBLIC KEY-----".to_owned()),
        keys: KeyPair {
            public_key: "public-pem".to_owned(),
            private_key: SecretString::from("private-pem".to_owned()),
        },
    }
}

#[tokio::test]
async fn registered_platform_can_be_read_back() {
    let registry = registry();

    let record = registry.register_platform(registration(BASE_URL)).await.unwrap();

    assert_eq!(registry.get_platform(BASE_URL).await.unwrap(), record);
    assert_eq!(registry.list_platforms().await.unwrap(), vec![record]);
}

#[tokio::test]
async fn access_token_is_reused_while_valid() {
    let registry = registry();
    registry.register_platform(registration(BASE_URL)).await.unwrap();

    let first = registry.access_token(BASE_URL).await.unwrap();
    let second = registry.access_token(BASE_URL).await.unwrap();

    assert_eq!(first.expose_secret(), second.expose_secret());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_share_one_token() {
    let registry = registry();
    registry.register_platform(registration(BASE_URL)).await.unwrap();

    let calls = (0..16).map(|_| {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move { registry.access_token(BASE_URL).await })
    });
    let tokens: Vec<String> = futures::future::join_all(calls)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap().expose_secret().to_owned())
        .collect();

    assert!(tokens.iter().all(|t| t == &tokens[0]));
}

#[tokio::test]
async fn platforms_get_their_own_tokens() {
    let registry = registry_with(&StaticTokenIssuerConfig {
        mode: IssuerMode::StaticTokens,
        tokens: vec![
            TokenMapping {
                base_url: "https://a.example.com".to_owned(),
                access_token: "token-a".to_owned(),
                expires_in: None,
            },
            TokenMapping {
                base_url: "https://b.example.com".to_owned(),
                access_token: "token-b".to_owned(),
                expires_in: Some(60),
            },
        ],
        ..StaticTokenIssuerConfig::default()
    });
    registry.register_platform(registration("https://a.example.com")).await.unwrap();
    registry.register_platform(registration("https://b.example.com")).await.unwrap();

    let a = registry.access_token("https://a.example.com").await.unwrap();
    let b = registry.access_token("https://b.example.com").await.unwrap();

    assert_eq!(a.expose_secret(), "token-a");
    assert_eq!(b.expose_secret(), "token-b");
}

#[tokio::test]
async fn issuer_rejection_reaches_caller_unchanged() {
    let registry = registry_with(&StaticTokenIssuerConfig {
        mode: IssuerMode::StaticTokens,
        ..StaticTokenIssuerConfig::default()
    });
    registry.register_platform(registration(BASE_URL)).await.unwrap();

    let err = registry.access_token(BASE_URL).await.unwrap_err();

    assert!(matches!(
        err,
        PlatformRegistryError::TokenIssuance(TokenIssuerError::Rejected(_))
    ));
}

#[tokio::test]
async fn rejected_input_maps_to_argument_errors() {
    let registry = registry();

    let mut bogus = registration(BASE_URL);
    bogus.auth_method = Some("BOGUS".to_owned());
    assert!(matches!(
        registry.register_platform(bogus).await.unwrap_err(),
        PlatformRegistryError::InvalidArgument(_)
    ));

    let mut keyless = registration(BASE_URL);
    keyless.auth_method = Some("JWK_KEY".to_owned());
    keyless.auth_key = None;
    let err = registry.register_platform(keyless).await.unwrap_err();
    match err {
        PlatformRegistryError::MissingArgument(msg) => {
            assert_eq!(msg, "missing key or keyset for authentication method JWK_KEY");
        }
        other => panic!("Expected MissingArgument, got: {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let registry = registry();
    registry.register_platform(registration(BASE_URL)).await.unwrap();

    assert!(matches!(
        registry.register_platform(registration(BASE_URL)).await.unwrap_err(),
        PlatformRegistryError::AlreadyExists(_)
    ));
}

#[tokio::test]
async fn update_then_remove() {
    let registry = registry();
    registry.register_platform(registration(BASE_URL)).await.unwrap();

    let updated = registry
        .update_platform(
            BASE_URL,
            PlatformUpdate {
                client_id: Some("client-456".to_owned()),
                ..PlatformUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.client_id, "client-456");

    registry.remove_platform(BASE_URL).await.unwrap();

    assert!(matches!(
        registry.get_platform(BASE_URL).await.unwrap_err(),
        PlatformRegistryError::NotFound(_)
    ));
    assert!(matches!(
        registry.access_token(BASE_URL).await.unwrap_err(),
        PlatformRegistryError::NotFound(_)
    ));
}

#[test]
fn module_initializes_once() {
    let module = PlatformRegistryModule::default();
    let issuer = StaticTokenIssuerPlugin::default()
        .init(&StaticTokenIssuerConfig::default())
        .unwrap();
    let store = Arc::new(InMemoryPlatformStore::new());

    module
        .init(PlatformRegistryConfig::default(), store.clone(), Arc::clone(&issuer))
        .unwrap();

    assert!(module.service().is_some());
    assert!(
        module
            .init(PlatformRegistryConfig::default(), store, issuer)
            .is_err()
    );
}

#[test]
fn module_rejects_undersized_kid_length() {
    let issuer = StaticTokenIssuerPlugin::default()
        .init(&StaticTokenIssuerConfig::default())
        .unwrap();

    let result = PlatformRegistryModule::default().init(
        PlatformRegistryConfig {
            kid_length_bytes: 0,
            ..PlatformRegistryConfig::default()
        },
        Arc::new(InMemoryPlatformStore::new()),
        issuer,
    );

    assert!(result.is_err());
}

#[tokio::test]
async fn moving_onto_taken_base_url_is_already_exists() {
    let registry = registry();
    registry.register_platform(registration("https://a.example.com")).await.unwrap();
    registry.register_platform(registration("https://b.example.com")).await.unwrap();

    let err = registry
        .update_platform(
            "https://a.example.com",
            PlatformUpdate {
                base_url: Some("https://b.example.com".to_owned()),
                ..PlatformUpdate::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PlatformRegistryError::AlreadyExists(_)));
}
