//! Integration tests: measure a local site, convert, persist, read history back.

mod common;

use common::page_server::{self, Route};
use std::time::Duration;
use webcarbon_core::error::{Error, FetchFailure};
use webcarbon_core::fetch::FetchOptions;
use webcarbon_core::{calculate, measure, measure_and_record, MetricsStore};

fn quick_opts() -> FetchOptions {
    FetchOptions {
        connect_timeout: Duration::from_secs(2),
        timeout: Duration::from_secs(2),
        ..FetchOptions::default()
    }
}

fn site() -> String {
    let root = br#"<html><head><script src="/app.js"></script></head>
        <body><img src="/hero.jpg"></body></html>"#
        .to_vec();
    page_server::start(vec![
        ("/", Route::ok(root)),
        ("/app.js", Route::ok(vec![b'j'; 40 * 1024])),
        ("/hero.jpg", Route::ok(vec![0u8; 200 * 1024])),
    ])
}

#[tokio::test]
async fn measure_uses_default_traffic_and_matches_calculator() {
    let base = site();
    let report = measure(&format!("{base}/"), None, &quick_opts())
        .await
        .unwrap();
    assert_eq!(report.monthly_visits, 10_000);
    assert!(report.page_weight.kb() > 240.0);
    let expected = calculate(report.metrics.page_weight_kb, 10_000).unwrap();
    assert_eq!(report.metrics, expected);
}

#[tokio::test]
async fn measure_and_record_then_history_returns_it() {
    let base = site();
    let url = format!("{base}/");
    let dir = tempfile::tempdir().unwrap();
    let store = MetricsStore::open_at(dir.path().join("metrics.db"))
        .await
        .unwrap();

    let recorded = measure_and_record(&store, &url, Some(25_000), &quick_opts())
        .await
        .unwrap();
    let saved = recorded.saved.expect("store is healthy");
    assert_eq!(saved.url, url);
    assert_eq!(saved.monthly_visits, 25_000);
    assert_eq!(saved.metrics(), recorded.report.metrics);

    let history = store.history(&url, 1).await.unwrap();
    assert_eq!(history, vec![saved]);
}

#[tokio::test]
async fn store_failure_keeps_the_computed_report() {
    let base = site();
    let dir = tempfile::tempdir().unwrap();
    let store = MetricsStore::open_at(dir.path().join("metrics.db"))
        .await
        .unwrap();
    store.close().await;

    let recorded = measure_and_record(&store, &format!("{base}/"), None, &quick_opts())
        .await
        .unwrap();
    let err = recorded.saved.unwrap_err();
    assert_eq!(err.operation(), Some("record"));
    assert!(recorded.report.metrics.page_weight_kb > 0.0);
}

#[tokio::test]
async fn failed_root_fetch_records_nothing() {
    let base = page_server::start(vec![("/", Route::status(503))]);
    let url = format!("{base}/");
    let dir = tempfile::tempdir().unwrap();
    let store = MetricsStore::open_at(dir.path().join("metrics.db"))
        .await
        .unwrap();

    let err = measure_and_record(&store, &url, None, &quick_opts())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Fetch(ref e) if matches!(e.cause, FetchFailure::Status(503))
    ));
    assert!(store.history(&url, 10).await.unwrap().is_empty());
}
