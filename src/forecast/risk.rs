//! Transformer overload risk classification.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Discrete overload risk tier. Variants are ordered by severity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

/// Tiers checked top-down; the first whose bound the overload strictly
/// exceeds wins.
const TIER_TABLE: [(f64, RiskTier); 3] = [
    (20.0, RiskTier::High),
    (10.0, RiskTier::Medium),
    (f64::NEG_INFINITY, RiskTier::Low),
];

const HIGH_ACTIONS: [&str; 4] = [
    "IMMEDIATE: Shed 10-15% load",
    "Emergency cooling ON",
    "Reroute to spares",
    "Notify MERC",
];
const MEDIUM_ACTIONS: [&str; 3] = [
    "Balance feeder loads",
    "Aux cooling START",
    "Alert substation team",
];
const LOW_ACTIONS: [&str; 2] = ["Continue monitoring", "Daily log"];

impl RiskTier {
    /// Tier for an overload percentage.
    pub fn from_overload(overload_percent: f64) -> Self {
        TIER_TABLE
            .iter()
            .find(|(bound, _)| overload_percent > *bound)
            .map(|(_, tier)| *tier)
            .unwrap_or(RiskTier::Low)
    }

    /// Fixed operator actions for this tier.
    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            RiskTier::High => &HIGH_ACTIONS,
            RiskTier::Medium => &MEDIUM_ACTIONS,
            RiskTier::Low => &LOW_ACTIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub overload_percent: f64,
    pub risk: RiskTier,
    pub recommendations: Vec<String>,
}

/// Percentage by which `peak_mw` exceeds `capacity_mw`; zero at or under
/// capacity. `capacity_mw` must be positive.
pub fn overload_percent(peak_mw: f64, capacity_mw: f64) -> f64 {
    debug_assert!(capacity_mw > 0.0);
    ((peak_mw / capacity_mw) * 100.0 - 100.0).max(0.0)
}

pub fn classify(peak_mw: f64, capacity_mw: f64) -> RiskAssessment {
    let overload = overload_percent(peak_mw, capacity_mw);
    let risk = RiskTier::from_overload(overload);
    RiskAssessment {
        overload_percent: overload,
        risk,
        recommendations: risk
            .recommendations()
            .iter()
            .map(|r| r.to_string())
            .collect(),
    }
}

/// Worst tier across a fleet; `Low` for an empty fleet.
pub fn aggregate<I>(tiers: I) -> RiskTier
where
    I: IntoIterator<Item = RiskTier>,
{
    tiers.into_iter().max().unwrap_or(RiskTier::Low)
}
