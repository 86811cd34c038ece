//! CLI command handlers. Each command is in its own file.

mod calc;
mod history;
mod measure;

pub use calc::run_calc;
pub use history::run_history;
pub use measure::{run_measure, MeasureArgs};

use webcarbon_core::Metrics;

/// Print the four headline figures, one per line.
pub(crate) fn print_metrics(metrics: &Metrics) {
    println!("{:<18} {:.2} KB", "Page weight", metrics.page_weight_kb);
    println!("{:<18} {:.2} kWh", "Annual energy", metrics.annual_energy_kwh);
    println!("{:<18} {:.2} kg CO2", "Annual carbon", metrics.annual_carbon_kg);
    println!("{:<18} {}", "Trees to offset", metrics.trees_needed);
}
