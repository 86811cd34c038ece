//! `webcarbon calc <kb>` – convert a page weight without fetching.

use anyhow::Result;
use webcarbon_core::carbon;

use super::print_metrics;

pub fn run_calc(page_weight_kb: f64, visits: u32, json: bool) -> Result<()> {
    let metrics = carbon::calculate(page_weight_kb, visits)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        println!("At {visits} monthly visits:");
        print_metrics(&metrics);
    }
    Ok(())
}
