//! Rule-based retrofit proposals.

pub mod intervention;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Building;
use crate::sim::round_to;

pub use intervention::{Intervention, InterventionKind};

/// A building's full intervention set with investment totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub building_id: String,
    pub city_id: String,
    pub timestamp: DateTime<Utc>,
    pub interventions: Vec<Intervention>,
    /// Sum of intervention costs, whole currency units.
    pub total_investment: f64,
    /// Yearly savings, whole currency units.
    pub total_savings: f64,
    /// Years to recover the investment; `None` when nothing is saved.
    pub payback_period: Option<f64>,
}

impl Proposal {
    pub fn is_empty(&self) -> bool {
        self.interventions.is_empty()
    }

    /// The intervention with the best return, if any.
    pub fn best_roi(&self) -> Option<&Intervention> {
        self.interventions
            .iter()
            .max_by(|a, b| a.roi.total_cmp(&b.roi))
    }
}

impl fmt::Display for Proposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Proposal for {} ({}) ---", self.building_id, self.city_id)?;
        for i in &self.interventions {
            writeln!(
                f,
                "{:<28} cost={:>10.0}  roi={:>4.0}%  {}",
                i.name, i.cost_estimate, i.roi, i.implementation_time
            )?;
        }
        if let Some(best) = self.best_roi() {
            writeln!(f, "Best return:      {} ({:.0}%)", best.name, best.roi)?;
        }
        writeln!(f, "Total investment: {:.0}", self.total_investment)?;
        writeln!(f, "Total savings:    {:.0}", self.total_savings)?;
        match self.payback_period {
            Some(years) => write!(f, "Payback period:   {years:.1} years"),
            None => write!(f, "Payback period:   n/a"),
        }
    }
}

/// Builds a proposal for `building`, stamped with the current time.
pub fn generate_proposal(building: &Building, city_id: &str) -> Proposal {
    generate_proposal_at(building, city_id, Utc::now())
}

/// Builds a proposal for `building` with an explicit timestamp.
///
/// Each applicable intervention is sized independently. Total savings are
/// revalued from each intervention's stored energy and water figures rather
/// than summed from their own annual savings, so solar yields are counted
/// as daily amounts.
pub fn generate_proposal_at(
    building: &Building,
    city_id: &str,
    timestamp: DateTime<Utc>,
) -> Proposal {
    let interventions: Vec<Intervention> = InterventionKind::ALL
        .into_iter()
        .filter(|kind| kind.applies_to(building))
        .map(|kind| kind.size_for(building))
        .collect();

    let total_investment: f64 = interventions.iter().map(|i| i.cost_estimate).sum();
    let total_savings: f64 = interventions.iter().map(Intervention::valued_savings).sum();

    let payback_period = if total_savings > 0.0 {
        Some(round_to(total_investment / total_savings, 1))
    } else {
        None
    };

    Proposal {
        building_id: building.id.clone(),
        city_id: city_id.to_string(),
        timestamp,
        interventions,
        total_investment: total_investment.round(),
        total_savings: total_savings.round(),
        payback_period,
    }
}
