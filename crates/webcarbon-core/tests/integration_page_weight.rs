//! Integration tests: page weight aggregation against a local HTTP server.

mod common;

use common::page_server::{self, Route};
use std::time::Duration;
use webcarbon_core::error::FetchFailure;
use webcarbon_core::fetch::FetchOptions;
use webcarbon_core::measure_page_weight;

fn page(body_refs: &str) -> Vec<u8> {
    format!("<!doctype html><html><head><title>t</title></head><body>{body_refs}</body></html>")
        .into_bytes()
}

fn quick_opts() -> FetchOptions {
    FetchOptions {
        connect_timeout: Duration::from_secs(2),
        timeout: Duration::from_secs(2),
        ..FetchOptions::default()
    }
}

#[tokio::test]
async fn sums_root_and_successful_resources_skipping_one_failure() {
    let root = page(
        r#"<link rel="stylesheet" href="/style.css">
           <script src="app.js"></script>
           <img src="/missing.png">"#,
    );
    let base = page_server::start(vec![
        ("/", Route::ok(root.clone())),
        ("/style.css", Route::ok(vec![b'c'; 200])),
        ("/app.js", Route::ok(vec![b'j'; 100])),
        ("/missing.png", Route::status(404)),
    ]);

    let weight = measure_page_weight(&format!("{base}/"), &quick_opts())
        .await
        .expect("root fetch succeeds");

    assert_eq!(weight.root_bytes, root.len() as u64);
    assert_eq!(weight.resource_bytes, 300);
    assert_eq!(weight.total_bytes(), root.len() as u64 + 300);
    assert_eq!(weight.resources_found, 3);
    assert_eq!(weight.resources_fetched, 2);
    assert_eq!(weight.resources_skipped, 1);
    assert!((weight.kb() - (root.len() as f64 + 300.0) / 1024.0).abs() < 1e-9);
}

#[tokio::test]
async fn root_failure_aborts_the_measurement() {
    let base = page_server::start(vec![("/", Route::status(500))]);
    let url = format!("{base}/");
    let err = measure_page_weight(&url, &quick_opts()).await.unwrap_err();
    assert_eq!(err.url, url);
    assert!(matches!(err.cause, FetchFailure::Status(500)));
}

#[tokio::test]
async fn missing_root_is_a_fetch_error() {
    let base = page_server::start(vec![]);
    let err = measure_page_weight(&format!("{base}/nope"), &quick_opts())
        .await
        .unwrap_err();
    assert!(matches!(err.cause, FetchFailure::Status(404)));
}

#[tokio::test]
async fn unreported_length_counts_as_zero() {
    let root = page(r#"<img src="/streamed.png"><script src="/sized.js"></script>"#);
    let base = page_server::start(vec![
        ("/", Route::ok(root.clone())),
        ("/streamed.png", Route::ok(vec![0u8; 4096]).without_length()),
        ("/sized.js", Route::ok(vec![b'x'; 64])),
    ]);

    let weight = measure_page_weight(&format!("{base}/"), &quick_opts())
        .await
        .unwrap();
    assert_eq!(weight.resources_fetched, 2);
    assert_eq!(weight.resource_bytes, 64);
}

#[tokio::test]
async fn slow_and_unreachable_resources_are_skipped() {
    let root = page(
        r#"<img src="/slow.png">
           <script src="http://127.0.0.1:1/unreachable.js"></script>
           <link href="/ok.css">
           <img src="data:image/gif;base64,R0lGODlhAQABAAAAACw=">"#,
    );
    let base = page_server::start(vec![
        ("/", Route::ok(root.clone())),
        (
            "/slow.png",
            Route::ok(vec![1u8; 10]).delayed(Duration::from_secs(4)),
        ),
        ("/ok.css", Route::ok(vec![b'c'; 10])),
    ]);

    let opts = FetchOptions {
        timeout: Duration::from_secs(1),
        ..quick_opts()
    };
    let weight = measure_page_weight(&format!("{base}/"), &opts).await.unwrap();
    assert_eq!(weight.resources_found, 4);
    assert_eq!(weight.resources_fetched, 1);
    assert_eq!(weight.resources_skipped, 3);
    assert_eq!(weight.total_bytes(), root.len() as u64 + 10);
}

#[tokio::test]
async fn total_does_not_depend_on_fan_out() {
    let mut refs = String::new();
    let mut routes = Vec::new();
    let mut expected = 0u64;
    let paths: Vec<String> = (0..12).map(|i| format!("/asset{i}.js")).collect();
    for (i, path) in paths.iter().enumerate() {
        refs.push_str(&format!(r#"<script src="{path}"></script>"#));
        let size = (i + 1) * 37;
        expected += size as u64;
        routes.push((path.as_str(), Route::ok(vec![b'a'; size])));
    }
    let root = page(&refs);
    routes.push(("/", Route::ok(root.clone())));
    let base = page_server::start(routes);
    let url = format!("{base}/");

    let serial = measure_page_weight(
        &url,
        &FetchOptions {
            max_concurrent_fetches: 1,
            ..quick_opts()
        },
    )
    .await
    .unwrap();
    let parallel = measure_page_weight(
        &url,
        &FetchOptions {
            max_concurrent_fetches: 8,
            ..quick_opts()
        },
    )
    .await
    .unwrap();

    assert_eq!(serial.resource_bytes, expected);
    assert_eq!(serial, parallel);
}

#[tokio::test]
async fn references_resolve_against_redirected_origin() {
    let root = page(r#"<img src="images/logo.png">"#);
    let base = page_server::start(vec![
        ("/start", Route::redirect("/blog/post")),
        ("/blog/post", Route::ok(root.clone())),
        ("/images/logo.png", Route::ok(vec![9u8; 321])),
    ]);

    let weight = measure_page_weight(&format!("{base}/start"), &quick_opts())
        .await
        .unwrap();
    assert_eq!(weight.root_bytes, root.len() as u64);
    assert_eq!(weight.resource_bytes, 321);
    assert_eq!(weight.resources_skipped, 0);
}
