//! End-to-end fetches against a local range server: generic, hub and
//! community URLs through the orchestrator, plus skip and failure paths.

mod common;

use std::fs;
use std::sync::Arc;

use common::range_server::{RangeServer, ServerOptions};
use modelfetch_core::config::{FetchConfig, RetryConfig};
use modelfetch_core::{FetchStatus, Orchestrator, Platform};
use tempfile::tempdir;

fn body(len: usize) -> Vec<u8> {
    (0u8..251).cycle().take(len).collect()
}

fn config() -> FetchConfig {
    FetchConfig {
        retry: Some(RetryConfig {
            max_attempts: 1,
            base_delay_secs: 0.0,
            max_delay_secs: 0,
        }),
        ..FetchConfig::default()
    }
}

#[tokio::test]
async fn generic_batch_downloads_every_file() {
    let payload = body(3 * 1024 * 1024 + 17);
    let server = RangeServer::start(payload.clone());
    let dest = tempdir().unwrap();
    let orch = Arc::new(Orchestrator::new(&config()));

    let pairs = vec![
        (server.url("files/a.bin"), dest.path().join("one")),
        (server.url("files/b.bin?sig=xyz"), dest.path().join("one")),
        (server.url("c.bin"), dest.path().join("two")),
    ];
    let report = orch.run_batch(pairs, Some(2), None).await;

    assert_eq!(report.total(), 3);
    assert_eq!(report.completed(), 3, "{report}");
    for path in ["one/a.bin", "one/b.bin", "two/c.bin"] {
        assert_eq!(fs::read(dest.path().join(path)).unwrap(), payload, "{path}");
    }
    assert!(!dest.path().join("one/.temp_download").exists());
    assert_eq!(report.by_platform()[&Platform::Generic].completed, 3);
    assert_eq!(report.bytes(), 3 * payload.len() as u64);
}

#[tokio::test]
async fn rerun_skips_without_touching_the_network() {
    let payload = body(64 * 1024);
    let server = RangeServer::start(payload.clone());
    let dest = tempdir().unwrap();
    let orch = Arc::new(Orchestrator::new(&config()));
    let url = server.url("model.safetensors");

    assert!(orch.fetch_one(&url, dest.path()).await);
    let gets = server.gets();
    assert!(gets > 0);

    let report = orch
        .run_batch(vec![(url.clone(), dest.path().to_path_buf())], None, None)
        .await;
    assert_eq!(report.skipped(), 1);
    assert_eq!(server.gets(), gets);
    assert_eq!(fs::read(dest.path().join("model.safetensors")).unwrap(), payload);
}

#[tokio::test]
async fn hub_url_uses_chunked_pull_and_flat_name() {
    let payload = body(200 * 1024);
    let server = RangeServer::start(payload.clone());
    let mut cfg = config();
    cfg.hosts.hub.push(server.authority.clone());
    let orch = Arc::new(Orchestrator::new(&cfg));
    let dest = tempdir().unwrap();

    let url = server.url("acme/sd-model/blob/main/unet/model.safetensors");
    let report = orch
        .run_batch(
            vec![
                (url, dest.path().to_path_buf()),
                (server.url("acme/sd-model/tree/main"), dest.path().to_path_buf()),
            ],
            Some(2),
            None,
        )
        .await;

    assert_eq!(report.total(), 2);
    assert_eq!((report.completed(), report.failed()), (1, 1));
    let hub = report.by_platform()[&Platform::HubRepository];
    assert_eq!(hub.total(), 2);
    assert_eq!(fs::read(dest.path().join("model.safetensors")).unwrap(), payload);
    assert!(!dest.path().join("unet").exists());
    let failed = report.failures().next().unwrap();
    assert!(failed.error_detail().unwrap().contains("malformed URL"));
}

#[tokio::test]
async fn community_name_comes_from_content_disposition() {
    let payload = body(10 * 1024);
    let server = RangeServer::start_with(
        payload.clone(),
        ServerOptions {
            content_disposition: Some("attachment; filename=\"detail tweaker.safetensors\"".into()),
            ..ServerOptions::default()
        },
    );
    let mut cfg = config();
    cfg.hosts.community.push(server.authority.clone());
    cfg.tokens.community = Some("tok".into());
    let orch = Arc::new(Orchestrator::new(&cfg));
    let dest = tempdir().unwrap();

    let url = server.url("api/download/models/123");
    let descriptor = orch.describe(&url).unwrap();
    assert_eq!(descriptor.platform, Platform::CommunitySite);
    assert!(descriptor.download_url.ends_with("?token=tok"));

    assert!(orch.fetch_one(&url, dest.path()).await);
    assert_eq!(
        fs::read(dest.path().join("detail_tweaker.safetensors")).unwrap(),
        payload
    );
}

#[tokio::test]
async fn server_without_ranges_still_completes() {
    let payload = body(2 * 1024 * 1024);
    let server = RangeServer::start_with(
        payload.clone(),
        ServerOptions {
            no_ranges: true,
            ..ServerOptions::default()
        },
    );
    let dest = tempdir().unwrap();
    let orch = Arc::new(Orchestrator::new(&config()));

    assert!(orch.fetch_one(&server.url("plain.bin"), dest.path()).await);
    assert_eq!(fs::read(dest.path().join("plain.bin")).unwrap(), payload);
}

#[tokio::test]
async fn truncated_transfer_leaves_no_file_and_no_staging() {
    let server = RangeServer::start_with(
        body(512 * 1024),
        ServerOptions {
            truncate_at: Some(1000),
            ..ServerOptions::default()
        },
    );
    let dest = tempdir().unwrap();
    let orch = Arc::new(Orchestrator::new(&config()));

    let report = orch
        .run_batch(vec![(server.url("broken.bin"), dest.path().to_path_buf())], None, None)
        .await;

    assert_eq!(report.failed(), 1);
    assert_eq!(report.outcomes()[0].status(), FetchStatus::Failed);
    assert!(!dest.path().join("broken.bin").exists());
    assert!(!dest.path().join("broken.bin.part").exists());
    assert!(!dest.path().join(".temp_download").exists());
}
