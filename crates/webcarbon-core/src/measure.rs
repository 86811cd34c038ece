//! Measurement pipeline: validate, weigh the page, convert, optionally persist.
//!
//! A measurement is fully computed before the store is touched, so a store
//! failure can only cost the history entry, never the computed metrics.

use serde::Serialize;

use crate::carbon::{self, Metrics};
use crate::config::DEFAULT_MONTHLY_VISITS;
use crate::error::{Error, InvalidInput, StoreError};
use crate::fetch::FetchOptions;
use crate::page_weight::{self, PageWeight};
use crate::store::{Measurement, MetricsStore};
use crate::url_model;

/// Result of one measurement run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Normalized URL that was measured.
    pub url: String,
    pub monthly_visits: u32,
    pub page_weight: PageWeight,
    pub metrics: Metrics,
}

/// A report plus the outcome of persisting it.
#[derive(Debug)]
pub struct RecordedReport {
    pub report: Report,
    /// `Err` means the history entry was lost; `report` is still valid.
    pub saved: Result<Measurement, StoreError>,
}

/// Check inputs at the boundary; `None` visits become [`DEFAULT_MONTHLY_VISITS`].
pub fn check_request(url: &str, monthly_visits: Option<u32>) -> Result<(String, u32), InvalidInput> {
    let url = url_model::validate_url(url)?;
    let visits = monthly_visits.unwrap_or(DEFAULT_MONTHLY_VISITS);
    if visits == 0 {
        return Err(InvalidInput::MonthlyVisits(0));
    }
    Ok((url, visits))
}

/// Measure `url` and convert its weight at `monthly_visits` (default 10,000).
pub async fn measure(
    url: &str,
    monthly_visits: Option<u32>,
    opts: &FetchOptions,
) -> Result<Report, Error> {
    let (url, monthly_visits) = check_request(url, monthly_visits)?;

    let page_weight = page_weight::measure_page_weight(&url, opts).await?;
    let metrics = carbon::calculate(page_weight.kb(), monthly_visits)?;

    Ok(Report {
        url,
        monthly_visits,
        page_weight,
        metrics,
    })
}

/// [`measure`], then append the result to `store`.
///
/// Input and fetch errors are returned as `Err`; a store error is reported
/// in [`RecordedReport::saved`] next to the computed report.
pub async fn measure_and_record(
    store: &MetricsStore,
    url: &str,
    monthly_visits: Option<u32>,
    opts: &FetchOptions,
) -> Result<RecordedReport, Error> {
    let report = measure(url, monthly_visits, opts).await?;
    let saved = store
        .record(&report.url, &report.metrics, report.monthly_visits)
        .await;
    if let Err(e) = &saved {
        tracing::warn!(url = %report.url, "measurement computed but not saved: {}", e);
    }
    Ok(RecordedReport { report, saved })
}
