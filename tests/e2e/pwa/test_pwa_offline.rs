//! E2E Test: PWA Offline Capability
//!
//! Tests that the service worker's precache makes the site work offline:
//! 1. Install a generation and precache the manifest
//! 2. Upgrade to a new version and purge the old generation
//! 3. Simulate network disconnection
//! 4. Verify cached resources are served and misses pass through

use foodfest_e2e_tests::{OfflineSite, RecordingNetwork};
use foodfest_runtime::service_worker::{AssetManifest, NetworkError, ServiceWorkerState};
use foodfest_runtime::{CacheConfig, CacheStore, Request, Response, ServiceWorkerError};

fn app_config(version: &str) -> CacheConfig {
    CacheConfig::new("App", version, AssetManifest::new(["/a.html", "/b.js"])).unwrap()
}

#[tokio::test]
async fn test_install_precaches_manifest() {
    let config = app_config("v1");
    let site = OfflineSite::serving(&config.manifest);

    let host = site.deploy(config).await.ok().unwrap();
    assert!(host.is_active());
    assert_eq!(site.storage.names(), vec!["App-v1".to_string()]);

    let cache = site.storage.cache("App-v1").unwrap();
    assert_eq!(cache.keys(), vec!["/a.html", "/b.js"]);
    assert_eq!(
        cache.match_url("/b.js").unwrap().body,
        Some(RecordingNetwork::body_for("/b.js"))
    );
}

#[tokio::test]
async fn test_default_deployment_precaches_every_asset() {
    let config = CacheConfig::default();
    let site = OfflineSite::serving(&config.manifest);

    site.deploy(config.clone()).await.ok().unwrap();

    let cache = site.storage.cache("FoodFest-version_01").unwrap();
    assert_eq!(cache.len(), config.manifest.len());
    for url in config.manifest.iter() {
        assert!(cache.match_url(url).is_some(), "{} not cached", url);
    }
}

#[tokio::test]
async fn test_upgrade_purges_previous_generation() {
    let site = OfflineSite::serving(&app_config("v0").manifest);
    site.deploy(app_config("v0")).await.ok().unwrap();
    site.storage.open("SomeoneElse-v9").await.unwrap();

    let mut next = site.worker(app_config("v1"));
    next.install().await.unwrap();
    // Both generations exist until the new worker activates.
    assert!(site.storage.has("App-v0"));
    assert!(site.storage.has("App-v1"));

    site.network.reset_calls();
    next.activate().await.unwrap();

    assert_eq!(
        site.storage.names(),
        vec!["SomeoneElse-v9".to_string(), "App-v1".to_string()]
    );
    assert_eq!(site.network.call_count(), 0, "activation must not touch the network");
}

#[tokio::test]
async fn test_redeploying_same_version_keeps_one_generation() {
    let config = app_config("v1");
    let site = OfflineSite::serving(&config.manifest);

    site.deploy(config.clone()).await.ok().unwrap();
    site.deploy(config).await.ok().unwrap();

    assert_eq!(site.storage.names(), vec!["App-v1".to_string()]);
    assert_eq!(site.storage.cache("App-v1").unwrap().len(), 2);
}

#[tokio::test]
async fn test_offline_hit_serves_cache() {
    let config = app_config("v1");
    let site = OfflineSite::serving(&config.manifest);
    let host = site.deploy(config).await.ok().unwrap();

    site.network.set_online(false);
    site.network.reset_calls();

    let response = host.fetch(Request::new("/a.html")).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, Some(RecordingNetwork::body_for("/a.html")));
    assert!(site.network.calls().is_empty());
}

#[tokio::test]
async fn test_offline_miss_reports_network_failure() {
    let config = app_config("v1");
    let site = OfflineSite::serving(&config.manifest);
    let host = site.deploy(config).await.ok().unwrap();
    let before = site.storage.usage();

    site.network.set_online(false);
    site.network.reset_calls();

    let result = host.fetch(Request::new("/missing.png")).await;
    assert_eq!(
        result,
        Err(ServiceWorkerError::Network(NetworkError::Unreachable(
            "/missing.png".to_string()
        )))
    );
    assert_eq!(site.network.calls(), vec!["/missing.png".to_string()]);
    assert_eq!(site.storage.usage(), before);
}

#[tokio::test]
async fn test_online_miss_passes_response_through_uncached() {
    let config = app_config("v1");
    let site = OfflineSite::serving(&config.manifest);
    site.network.route("/api/events", 503);
    let host = site.deploy(config).await.ok().unwrap();
    site.network.reset_calls();

    let response = host.fetch(Request::new("/api/events")).await.unwrap();
    assert_eq!(
        response,
        Response::new(503)
            .with_url("/api/events")
            .with_body(RecordingNetwork::body_for("/api/events"))
    );
    assert_eq!(site.network.call_count(), 1);
    assert!(site.storage.cache("App-v1").unwrap().match_url("/api/events").is_none());

    // Still not cached: a second request goes out again.
    host.fetch(Request::new("/api/events")).await.unwrap();
    assert_eq!(site.network.call_count(), 2);
}

#[tokio::test]
async fn test_failed_install_leaves_previous_generation_serving() {
    let site = OfflineSite::serving(&app_config("v1").manifest);
    let old = site.deploy(app_config("v1")).await.ok().unwrap();

    let manifest = AssetManifest::new(["/a.html", "/b.js", "/c.css"]);
    let config = CacheConfig::new("App", "v2", manifest).unwrap();
    let (failed, err) = site.deploy(config).await.err().unwrap();

    assert_eq!(failed.state(), ServiceWorkerState::Redundant);
    assert_eq!(
        err,
        ServiceWorkerError::InstallStatus {
            url: "/c.css".to_string(),
            status: 404
        }
    );
    assert!(site.storage.cache("App-v2").unwrap().is_empty());
    assert_eq!(site.storage.cache("App-v1").unwrap().len(), 2);

    site.network.set_online(false);
    assert!(old.fetch(Request::new("/a.html")).await.is_ok());
}

#[tokio::test]
async fn test_concurrent_fetches_share_cache() {
    let config = app_config("v1");
    let site = OfflineSite::serving(&config.manifest);
    let host = site.deploy(config).await.ok().unwrap();
    site.network.set_online(false);
    site.network.reset_calls();

    let requests = ["/a.html", "/b.js", "/a.html"].map(|url| host.fetch(Request::new(url)));
    let responses = futures::future::join_all(requests).await;

    assert!(responses.iter().all(|r| r.as_ref().map(|r| r.ok()).unwrap_or(false)));
    assert_eq!(site.network.call_count(), 0);
}

#[tokio::test]
async fn test_version_bump_on_default_site() {
    let site = OfflineSite::serving(&CacheConfig::default().manifest);
    site.deploy(OfflineSite::version("version_01")).await.ok().unwrap();
    site.deploy(OfflineSite::version("version_02")).await.ok().unwrap();

    assert_eq!(site.storage.names(), vec!["FoodFest-version_02".to_string()]);
}
