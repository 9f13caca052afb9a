//! Discrete conjunction risk tiers.

use serde::Serialize;

/// Conjunction risk tier, ordered least to most severe
///
/// The derived `Ord` follows declaration order, so ordinal comparisons
/// (`Critical > High > Moderate > Low`) work directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    /// Assess from collision probability and miss distance
    ///
    /// Probability and distance thresholds are OR-ed; the most severe
    /// matching tier wins, so a very close approach is critical even when
    /// the computed probability is small.
    pub fn assess(probability: f64, distance_km: f64) -> Self {
        if probability > 1e-4 || distance_km < 1.0 {
            Self::Critical
        } else if probability > 1e-6 || distance_km < 5.0 {
            Self::High
        } else if probability > 1e-8 || distance_km < 10.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}
