//! Tests for opening the history store.

use crate::cli::open_store_for_measure;
use webcarbon_core::config::WebcarbonConfig;

#[tokio::test]
async fn measure_goes_on_without_an_unsupported_store() {
    let cfg = WebcarbonConfig::default();
    let store =
        open_store_for_measure(&cfg, Ok("postgres://user:pw@localhost/metrics".to_string())).await;
    assert!(store.is_none());
}

#[tokio::test]
async fn measure_goes_on_without_a_store_location() {
    let cfg = WebcarbonConfig::default();
    let store = open_store_for_measure(&cfg, Err(anyhow::anyhow!("no state dir"))).await;
    assert!(store.is_none());
}

#[tokio::test]
async fn measure_uses_a_reachable_store() {
    let cfg = WebcarbonConfig::default();
    let store = open_store_for_measure(&cfg, Ok("sqlite::memory:".to_string())).await;
    let store = store.expect("in-memory store opens");
    store.close().await;
}
