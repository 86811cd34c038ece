//! CLI for the webcarbon footprint estimator.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use webcarbon_core::config::{self, WebcarbonConfig};
use webcarbon_core::store::{self, MetricsStore};

use commands::{run_calc, run_history, run_measure, MeasureArgs};

/// Top-level CLI for webcarbon.
#[derive(Debug, Parser)]
#[command(name = "webcarbon")]
#[command(about = "Estimate a website's page weight, energy use and carbon footprint", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Measure a page's weight, convert it to annual footprint, and save it to history.
    Measure {
        /// Absolute HTTP/HTTPS URL of the page.
        url: String,
        /// Estimated monthly visits (default from config, 10000).
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
        visits: Option<u32>,
        /// Do not record the measurement in the history store.
        #[arg(long)]
        no_save: bool,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show past measurements for a URL, newest first.
    History {
        /// URL exactly as it was measured.
        url: String,
        /// Maximum number of measurements to show (default from config, 10).
        #[arg(long, value_name = "N")]
        limit: Option<u32>,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Convert a known page weight without fetching anything.
    Calc {
        /// Page weight in KB.
        page_weight_kb: f64,
        /// Estimated monthly visits (default from config, 10000).
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
        visits: Option<u32>,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Connection string from the environment, else the default state-dir database.
fn store_url() -> Result<String> {
    match store::database_url_from_env() {
        Some(url) => Ok(url),
        None => store::default_database_url(),
    }
}

async fn open_store_at(cfg: &WebcarbonConfig, url: String) -> Result<MetricsStore> {
    tracing::debug!("opening metrics store at {}", url);
    Ok(MetricsStore::connect(&cfg.store_options(url)).await?)
}

async fn open_store(cfg: &WebcarbonConfig) -> Result<MetricsStore> {
    open_store_at(cfg, store_url()?).await
}

/// Store for `measure`: an unavailable store only costs the history entry.
async fn open_store_for_measure(
    cfg: &WebcarbonConfig,
    url: Result<String>,
) -> Option<MetricsStore> {
    let opened = match url {
        Ok(url) => open_store_at(cfg, url).await,
        Err(e) => Err(e),
    };
    match opened {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!("history store unavailable, measuring without saving: {:#}", e);
            eprintln!("warning: history store unavailable, measurement will not be saved: {e:#}");
            None
        }
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Measure {
                url,
                visits,
                no_save,
                json,
            } => {
                let store = if no_save {
                    None
                } else {
                    open_store_for_measure(&cfg, store_url()).await
                };
                let args = MeasureArgs {
                    url,
                    visits: visits.unwrap_or(cfg.default_monthly_visits),
                    json,
                };
                run_measure(&cfg, store.as_ref(), &args).await?;
                if let Some(store) = store {
                    store.close().await;
                }
            }
            CliCommand::History { url, limit, json } => {
                let store = open_store(&cfg).await?;
                run_history(&store, &url, limit.unwrap_or(cfg.history_limit), json).await?;
                store.close().await;
            }
            CliCommand::Calc {
                page_weight_kb,
                visits,
                json,
            } => run_calc(page_weight_kb, visits.unwrap_or(cfg.default_monthly_visits), json)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
