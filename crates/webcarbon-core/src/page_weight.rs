//! Page-weight aggregation: root document plus statically referenced resources.
//!
//! The root fetch must succeed; every sub-resource is best effort. A broken
//! image or a timed-out script is logged and left out of the total rather
//! than failing the whole measurement.

use serde::Serialize;
use tokio::task::JoinSet;

use crate::error::{FetchError, FetchFailure};
use crate::fetch::{self, FetchOptions};
use crate::html;
use crate::url_model;

/// Bytes transferred for one page, split by origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageWeight {
    /// Length of the root document body.
    pub root_bytes: u64,
    /// Sum of reported `Content-Length` of fetched sub-resources.
    pub resource_bytes: u64,
    /// References found in the markup.
    pub resources_found: usize,
    pub resources_fetched: usize,
    /// Unfetchable references plus fetches that failed.
    pub resources_skipped: usize,
}

impl PageWeight {
    pub fn total_bytes(&self) -> u64 {
        self.root_bytes + self.resource_bytes
    }

    pub fn kb(&self) -> f64 {
        self.total_bytes() as f64 / 1024.0
    }
}

async fn fetch_root(url: &str, opts: &FetchOptions) -> Result<fetch::Document, FetchFailure> {
    let owned_url = url.to_string();
    let opts = opts.clone();
    tokio::task::spawn_blocking(move || fetch::fetch_document(&owned_url, &opts))
        .await
        .map_err(|e| FetchFailure::Task(e.to_string()))?
}

/// Fetch `url`, discover its `script`/`link`/`img` references and sum their sizes.
///
/// Sub-resources are probed with at most `opts.max_concurrent_fetches` in
/// flight. Dropping the returned future abandons probes that have not started.
pub async fn measure_page_weight(url: &str, opts: &FetchOptions) -> Result<PageWeight, FetchError> {
    let doc = fetch_root(url, opts).await.map_err(|cause| FetchError {
        url: url.to_string(),
        cause,
    })?;

    let refs = html::extract_resource_refs(&doc.body);
    let mut weight = PageWeight {
        root_bytes: doc.body.len() as u64,
        resources_found: refs.len(),
        ..PageWeight::default()
    };

    let mut targets = Vec::with_capacity(refs.len());
    for reference in &refs {
        match url_model::resolve_reference(&doc.effective_url, reference) {
            Some(target) => targets.push(target),
            None => {
                tracing::debug!(reference = %reference, "skipping unfetchable reference");
                weight.resources_skipped += 1;
            }
        }
    }

    tracing::debug!(
        url,
        root_bytes = weight.root_bytes,
        references = refs.len(),
        fetchable = targets.len(),
        "root document fetched"
    );

    let max_in_flight = opts.max_concurrent_fetches.max(1);
    let mut pending = targets.into_iter();
    let mut join_set = JoinSet::new();

    loop {
        while join_set.len() < max_in_flight {
            let Some(target) = pending.next() else {
                break;
            };
            let opts = opts.clone();
            join_set.spawn_blocking(move || {
                let result = fetch::probe_resource(&target, &opts);
                (target, result)
            });
        }

        let Some(joined) = join_set.join_next().await else {
            break;
        };
        match joined {
            Ok((_, Ok(headers))) => {
                weight.resources_fetched += 1;
                weight.resource_bytes += headers.content_length.unwrap_or(0);
            }
            Ok((target, Err(e))) => {
                tracing::debug!(resource = %target, "skipping resource: {}", e);
                weight.resources_skipped += 1;
            }
            Err(e) => {
                tracing::debug!("resource probe task failed: {}", e);
                weight.resources_skipped += 1;
            }
        }
    }

    tracing::info!(
        url,
        total_bytes = weight.total_bytes(),
        fetched = weight.resources_fetched,
        skipped = weight.resources_skipped,
        "page weight measured"
    );

    Ok(weight)
}
