//! E2E Test: Service Worker Lifecycle
//!
//! Tests the install → activate ordering the host enforces and how requests
//! are routed at each stage.

use foodfest_e2e_tests::OfflineSite;
use foodfest_runtime::service_worker::{ServiceWorkerState, StateChangeEvent};
use foodfest_runtime::{CacheConfig, CacheStore, Request, ServiceWorkerError};

#[tokio::test]
async fn test_state_history() {
    let config = CacheConfig::default();
    let site = OfflineSite::serving(&config.manifest);
    let host = site.deploy(config).await.ok().unwrap();

    use ServiceWorkerState::*;
    let expected: Vec<StateChangeEvent> = [
        (Parsed, Installing),
        (Installing, Installed),
        (Installed, Activating),
        (Activating, Activated),
    ]
    .into_iter()
    .map(|(old_state, new_state)| StateChangeEvent {
        old_state,
        new_state,
    })
    .collect();
    assert_eq!(host.history(), expected.as_slice());
}

#[tokio::test]
async fn test_installed_worker_does_not_control_fetches() {
    let config = CacheConfig::default();
    let site = OfflineSite::serving(&config.manifest);
    let mut host = site.worker(config);
    host.install().await.unwrap();
    site.network.reset_calls();

    // Precached, but the worker is only waiting; the request goes out.
    host.fetch(Request::new("/index.html")).await.unwrap();
    assert_eq!(site.network.calls(), vec!["/index.html".to_string()]);
}

#[tokio::test]
async fn test_activate_twice_rejected() {
    let config = CacheConfig::default();
    let site = OfflineSite::serving(&config.manifest);
    let mut host = site.deploy(config).await.ok().unwrap();

    assert!(matches!(
        host.activate().await,
        Err(ServiceWorkerError::InvalidStateTransition { .. })
    ));
    assert!(host.is_active());
}

#[tokio::test]
async fn test_config_from_json_drives_deployment() {
    let config = CacheConfig::from_json(
        r#"{"app_prefix":"FoodFest","version":"version_02","manifest":["/index.html","/index.html","/dist/app.bundle.js"]}"#,
    )
    .unwrap();
    assert_eq!(config.manifest.len(), 2);

    let site = OfflineSite::serving(&config.manifest);
    site.storage.open("FoodFest-version_01").await.unwrap();

    site.deploy(config).await.ok().unwrap();
    assert_eq!(site.storage.names(), vec!["FoodFest-version_02".to_string()]);
}
