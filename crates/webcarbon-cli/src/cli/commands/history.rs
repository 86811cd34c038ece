//! `webcarbon history <url>` – show past measurements of a URL.

use anyhow::Result;
use webcarbon_core::store::MetricsStore;

pub async fn run_history(store: &MetricsStore, url: &str, limit: u32, json: bool) -> Result<()> {
    let history = store.history(url, limit).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }
    if history.is_empty() {
        println!("No measurements recorded for {url}.");
        return Ok(());
    }
    println!(
        "{:<6} {:<15} {:>12} {:>8} {:>12} {:>12} {:>6}",
        "ID", "TIMESTAMP_MS", "WEIGHT_KB", "VISITS", "ENERGY_KWH", "CARBON_KG", "TREES"
    );
    for m in history {
        println!(
            "{:<6} {:<15} {:>12.2} {:>8} {:>12.2} {:>12.2} {:>6}",
            m.id,
            m.timestamp_ms,
            m.page_weight_kb,
            m.monthly_visits,
            m.annual_energy_kwh,
            m.annual_carbon_kg,
            m.trees_needed
        );
    }
    Ok(())
}
