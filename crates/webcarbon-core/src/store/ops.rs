//! Store operations: record a measurement, read a URL's history.

use sqlx::sqlite::SqliteRow;
use sqlx::{Connection, Row};
use std::time::{SystemTime, UNIX_EPOCH};

use super::db::{exhausted, MetricsStore};
use super::session::Session;
use super::types::Measurement;
use crate::carbon::{self, Metrics};
use crate::error::{InvalidInput, StoreError};
use crate::retry::{classify_sqlx_error, retry_async};
use crate::url_model;

const COLUMNS: &str = "id, url, recorded_at_ms, page_weight_kb, monthly_visits, \
                       annual_energy_kwh, annual_carbon_kg, trees_needed";

impl MetricsStore {
    /// Append one measurement for `url` and return it as stored.
    ///
    /// The timestamp is assigned here, never by the caller. `metrics` must be
    /// exactly what the calculator yields for its page weight and
    /// `monthly_visits`; anything else is rejected before touching the store.
    pub async fn record(
        &self,
        url: &str,
        metrics: &Metrics,
        monthly_visits: u32,
    ) -> Result<Measurement, StoreError> {
        let url = url_model::validate_url(url)?;
        let expected = carbon::calculate(metrics.page_weight_kb, monthly_visits)?;
        if expected != *metrics {
            return Err(InvalidInput::InconsistentMetrics {
                page_weight_kb: metrics.page_weight_kb,
                monthly_visits,
            }
            .into());
        }

        let measurement = retry_async(&self.retry, "record", classify_sqlx_error, || {
            self.insert_once(&url, metrics, monthly_visits)
        })
        .await
        .map_err(|f| exhausted("record", f))?;

        tracing::info!(
            url = %measurement.url,
            id = measurement.id,
            timestamp_ms = measurement.timestamp_ms,
            "measurement recorded"
        );
        Ok(measurement)
    }

    /// Up to `limit` most recent measurements for `url`, newest first.
    ///
    /// A URL that was never measured yields an empty list.
    pub async fn history(&self, url: &str, limit: u32) -> Result<Vec<Measurement>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let url = url_model::normalize_url(url);
        retry_async(&self.retry, "history", classify_sqlx_error, || {
            self.history_once(url, limit)
        })
        .await
        .map_err(|f| exhausted("history", f))
    }

    async fn insert_once(
        &self,
        url: &str,
        metrics: &Metrics,
        monthly_visits: u32,
    ) -> Result<Measurement, sqlx::Error> {
        let mut session = Session::acquire(&self.pool, "record").await?;
        let mut tx = session.conn().begin().await?;

        // Wall-clock millis, bumped past the newest row so timestamps never repeat or go back.
        let inserted = sqlx::query(&format!(
            r#"
            INSERT INTO website_metrics (
                url, recorded_at_ms, page_weight_kb, monthly_visits,
                annual_energy_kwh, annual_carbon_kg, trees_needed
            ) VALUES (
                ?1,
                MAX(?2, COALESCE((SELECT MAX(recorded_at_ms) FROM website_metrics), 0) + 1),
                ?3, ?4, ?5, ?6, ?7
            )
            RETURNING {COLUMNS}
            "#
        ))
        .bind(url)
        .bind(unix_millis())
        .bind(metrics.page_weight_kb)
        .bind(i64::from(monthly_visits))
        .bind(metrics.annual_energy_kwh)
        .bind(metrics.annual_carbon_kg)
        .bind(i64::try_from(metrics.trees_needed).unwrap_or(i64::MAX))
        .fetch_one(&mut *tx)
        .await
        .and_then(|row| measurement_from_row(&row));

        match inserted {
            Ok(measurement) => {
                tx.commit().await?;
                Ok(measurement)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!("rollback after failed insert also failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    async fn history_once(&self, url: &str, limit: u32) -> Result<Vec<Measurement>, sqlx::Error> {
        let mut session = Session::acquire(&self.pool, "history").await?;
        let rows = sqlx::query(&format!(
            r#"
            SELECT {COLUMNS}
            FROM website_metrics
            WHERE url = ?1
            ORDER BY recorded_at_ms DESC, id DESC
            LIMIT ?2
            "#
        ))
        .bind(url)
        .bind(i64::from(limit))
        .fetch_all(session.conn())
        .await?;

        rows.iter().map(measurement_from_row).collect()
    }
}

fn measurement_from_row(row: &SqliteRow) -> Result<Measurement, sqlx::Error> {
    let monthly_visits: i64 = row.try_get("monthly_visits")?;
    let trees_needed: i64 = row.try_get("trees_needed")?;
    Ok(Measurement {
        id: row.try_get("id")?,
        url: row.try_get("url")?,
        timestamp_ms: row.try_get("recorded_at_ms")?,
        page_weight_kb: row.try_get("page_weight_kb")?,
        monthly_visits: u32::try_from(monthly_visits).map_err(|e| sqlx::Error::Decode(e.into()))?,
        annual_energy_kwh: row.try_get("annual_energy_kwh")?,
        annual_carbon_kg: row.try_get("annual_carbon_kg")?,
        trees_needed: u64::try_from(trees_needed).map_err(|e| sqlx::Error::Decode(e.into()))?,
    })
}

fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
