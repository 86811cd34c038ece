//! Carbon conversion: page weight and traffic to annual energy, CO2 and tree offset.
//!
//! Pure functions over fixed constants. The same `(page_weight_kb,
//! monthly_visits)` always yields the same [`Metrics`].

use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;

/// Energy intensity of data transfer, kWh per GB.
pub const KWH_PER_GB: f64 = 1.805;
/// Grid carbon intensity, grams of CO2 per kWh.
pub const CARBON_G_PER_KWH: f64 = 442.0;
/// CO2 one tree absorbs in a year, kg.
pub const TREE_ABSORPTION_KG_PER_YEAR: f64 = 21.0;

const KB_PER_GB: f64 = 1024.0 * 1024.0;
const MONTHS_PER_YEAR: f64 = 12.0;

/// Footprint figures handed to reporting and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Rounded to 2 decimals.
    pub page_weight_kb: f64,
    /// Rounded to 2 decimals.
    pub annual_energy_kwh: f64,
    /// Rounded to 2 decimals.
    pub annual_carbon_kg: f64,
    /// Always rounded up: any emissions at all need at least one tree.
    pub trees_needed: u64,
}

/// Intermediate values of one conversion. Only the input weight is rounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarbonBreakdown {
    pub page_weight_kb: f64,
    pub monthly_visits: u32,
    pub annual_data_gb: f64,
    pub annual_energy_kwh: f64,
    pub annual_carbon_kg: f64,
}

impl CarbonBreakdown {
    /// Apply the conversion formulae in order.
    ///
    /// The weight is rounded to 2 decimals first, so the reported weight alone
    /// reproduces every derived figure.
    pub fn compute(page_weight_kb: f64, monthly_visits: u32) -> Result<Self, InvalidInput> {
        check_inputs(page_weight_kb, monthly_visits)?;
        let page_weight_kb = round2(page_weight_kb);

        let annual_data_gb =
            page_weight_kb * f64::from(monthly_visits) * MONTHS_PER_YEAR / KB_PER_GB;
        let annual_energy_kwh = annual_data_gb * KWH_PER_GB;
        let annual_carbon_kg = (annual_energy_kwh * CARBON_G_PER_KWH) / 1000.0;

        Ok(Self {
            page_weight_kb,
            monthly_visits,
            annual_data_gb,
            annual_energy_kwh,
            annual_carbon_kg,
        })
    }

    pub fn trees_needed(&self) -> u64 {
        (self.annual_carbon_kg / TREE_ABSORPTION_KG_PER_YEAR).ceil() as u64
    }

    pub fn metrics(&self) -> Metrics {
        Metrics {
            page_weight_kb: self.page_weight_kb,
            annual_energy_kwh: round2(self.annual_energy_kwh),
            annual_carbon_kg: round2(self.annual_carbon_kg),
            trees_needed: self.trees_needed(),
        }
    }
}

fn check_inputs(page_weight_kb: f64, monthly_visits: u32) -> Result<(), InvalidInput> {
    if !page_weight_kb.is_finite() || page_weight_kb < 0.0 {
        return Err(InvalidInput::PageWeight(page_weight_kb));
    }
    if monthly_visits == 0 {
        return Err(InvalidInput::MonthlyVisits(0));
    }
    Ok(())
}

/// Convert a page weight (KB) and monthly visit count into footprint metrics.
///
/// Never substitutes a default traffic figure; zero visits and negative or
/// non-finite weights are rejected.
pub fn calculate(page_weight_kb: f64, monthly_visits: u32) -> Result<Metrics, InvalidInput> {
    CarbonBreakdown::compute(page_weight_kb, monthly_visits).map(|b| b.metrics())
}

/// Round half away from zero to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One bar of the energy comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyComparison {
    pub activity: &'static str,
    pub annual_kwh: f64,
}

/// Reference activities shown next to a site's annual energy use.
pub const REFERENCE_ACTIVITIES: [(&str, f64); 3] = [
    ("LED Bulb (1 year)", 55.0),
    ("Laptop (1 month)", 12.0),
    ("Phone Charging (1 year)", 2.0),
];

/// The site's annual energy followed by the reference activities.
pub fn energy_comparisons(site_kwh: f64) -> Vec<EnergyComparison> {
    std::iter::once(EnergyComparison {
        activity: "Your Website",
        annual_kwh: site_kwh,
    })
    .chain(
        REFERENCE_ACTIVITIES
            .iter()
            .map(|&(activity, annual_kwh)| EnergyComparison {
                activity,
                annual_kwh,
            }),
    )
    .collect()
}
