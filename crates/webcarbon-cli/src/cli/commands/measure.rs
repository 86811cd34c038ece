//! `webcarbon measure <url>` – weigh a page, convert it, record it.

use anyhow::Result;
use serde_json::json;
use webcarbon_core::carbon;
use webcarbon_core::config::WebcarbonConfig;
use webcarbon_core::measure::{self, Report};
use webcarbon_core::store::MetricsStore;

use super::print_metrics;

#[derive(Debug, Clone)]
pub struct MeasureArgs {
    pub url: String,
    pub visits: u32,
    pub json: bool,
}

pub async fn run_measure(
    cfg: &WebcarbonConfig,
    store: Option<&MetricsStore>,
    args: &MeasureArgs,
) -> Result<()> {
    let opts = cfg.fetch.to_options();
    // A store failure is reported next to the report, not raised.
    let (report, saved) = match store {
        Some(store) => {
            let recorded =
                measure::measure_and_record(store, &args.url, Some(args.visits), &opts).await?;
            (recorded.report, Some(recorded.saved))
        }
        None => (
            measure::measure(&args.url, Some(args.visits), &opts).await?,
            None,
        ),
    };

    if args.json {
        let saved_json = match &saved {
            Some(Ok(m)) => json!({ "id": m.id, "timestamp_ms": m.timestamp_ms }),
            Some(Err(e)) => json!({ "error": e.to_string() }),
            None => serde_json::Value::Null,
        };
        let out = json!({
            "report": report,
            "energy_comparison": carbon::energy_comparisons(report.metrics.annual_energy_kwh),
            "saved": saved_json,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_report(&report);
    match saved {
        Some(Ok(m)) => println!("Saved measurement {} to history.", m.id),
        Some(Err(e)) => eprintln!("warning: measurement not saved to history: {e}"),
        None => {}
    }
    Ok(())
}

fn print_report(report: &Report) {
    println!("{} ({} monthly visits)", report.url, report.monthly_visits);
    let w = &report.page_weight;
    println!(
        "Resources: {} found, {} fetched, {} skipped",
        w.resources_found, w.resources_fetched, w.resources_skipped
    );
    print_metrics(&report.metrics);
    println!();
    println!("{:<26} {:>10}", "ACTIVITY", "kWh/YEAR");
    for row in carbon::energy_comparisons(report.metrics.annual_energy_kwh) {
        println!("{:<26} {:>10.2}", row.activity, row.annual_kwh);
    }
}
