//! Evasive-maneuver lead-time planning.
//!
//! Given a relative velocity and an uncertainty/safety budget, computes the
//! minimum lead time before an avoidance maneuver must begin:
//!
//! t ≥ (R_req + n·σ₀) / (v_rel − n·k)
//!
//! A non-positive denominator is an infeasible configuration, reported as
//! an explicit result variant with diagnostics rather than an error.

use serde::Serialize;

use crate::error::{ConjunctionError, Result};

/// Input parameters for a lead-time calculation
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ManeuverRequest {
    /// Relative velocity between the objects in m/s
    pub v_rel_m_s: f64,

    /// Required safety separation in meters
    pub required_separation_m: f64,

    /// Current 1σ positional uncertainty in meters
    pub sigma0_m: f64,

    /// Uncertainty growth rate in m/s
    pub uncertainty_growth_m_s: f64,

    /// Confidence factor n (e.g. 3 for 3σ)
    pub confidence_factor: f64,
}

/// Maneuver urgency tier by available lead time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Criticality {
    Critical,
    High,
    Medium,
    Low,
    Minimal,
}

impl Criticality {
    /// Tier from the available lead time in hours
    pub fn from_lead_time_hours(hours: f64) -> Self {
        if hours < 1.0 {
            Self::Critical
        } else if hours < 6.0 {
            Self::High
        } else if hours < 24.0 {
            Self::Medium
        } else if hours < 168.0 {
            Self::Low
        } else {
            Self::Minimal
        }
    }

    /// Fixed recommended action for this tier
    pub fn recommended_action(&self) -> &'static str {
        match self {
            Self::Critical => "Immediate maneuver required",
            Self::High => "Prepare maneuver within the next few hours",
            Self::Medium => "Plan maneuver for today",
            Self::Low => "Maneuver can be planned in advance",
            Self::Minimal => "Sufficient time for detailed analysis",
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Minimal => "MINIMAL",
        }
    }
}

/// A lead time expressed in several units
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LeadTime {
    pub seconds: f64,
    pub minutes: f64,
    pub hours: f64,
    pub days: f64,
}

impl LeadTime {
    fn from_seconds(seconds: f64) -> Self {
        Self {
            seconds,
            minutes: seconds / 60.0,
            hours: seconds / 3600.0,
            days: seconds / 86400.0,
        }
    }
}

/// Lead time recomputed at an alternative confidence factor
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioVariant {
    pub name: &'static str,
    pub confidence_factor: f64,
    pub lead_time: LeadTime,
}

/// Lead-time sensitivity to the dominant inputs
///
/// The v_rel variants are `None` when the perturbed denominator goes
/// non-positive; the σ₀ variants reuse the primary denominator and are
/// always computable.
#[derive(Debug, Clone, Serialize)]
pub struct SensitivityAnalysis {
    /// v_rel +10%
    pub v_rel_high: Option<LeadTime>,

    /// v_rel −10%
    pub v_rel_low: Option<LeadTime>,

    /// σ₀ +50%
    pub sigma_high: LeadTime,

    /// σ₀ −50%
    pub sigma_low: LeadTime,
}

/// Encounter geometry classified from relative velocity alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EncounterGeometry {
    CoOrbital,
    Lateral,
    Perpendicular,
    HeadOn,
}

impl EncounterGeometry {
    /// Classify from relative velocity in m/s
    pub fn classify(v_rel_m_s: f64) -> Self {
        if v_rel_m_s < 500.0 {
            Self::CoOrbital
        } else if v_rel_m_s < 2000.0 {
            Self::Lateral
        } else if v_rel_m_s < 8000.0 {
            Self::Perpendicular
        } else {
            Self::HeadOn
        }
    }

    /// Descriptive summary of the encounter
    pub fn description(&self) -> &'static str {
        match self {
            Self::CoOrbital => "Satellites in similar orbits with low relative velocity",
            Self::Lateral => "Orbit crossing with moderate angle",
            Self::Perpendicular => "Orbits with different orbital planes",
            Self::HeadOn => "Orbits with opposite inclinations - maximum risk",
        }
    }
}

/// Complete result of a feasible lead-time calculation
#[derive(Debug, Clone, Serialize)]
pub struct ManeuverPlan {
    pub request: ManeuverRequest,
    pub lead_time: LeadTime,
    pub criticality: Criticality,
    pub recommended_action: &'static str,

    /// R_req + n·σ₀ in meters
    pub numerator_m: f64,

    /// v_rel − n·k in m/s
    pub denominator_m_s: f64,

    pub geometry: EncounterGeometry,
    pub scenarios: Vec<ScenarioVariant>,
    pub sensitivity: SensitivityAnalysis,
    pub operational_recommendations: Vec<&'static str>,
}

/// Diagnostics for an infeasible maneuver configuration
#[derive(Debug, Clone, Serialize)]
pub struct InfeasibleConfig {
    pub v_rel_m_s: f64,

    /// n·k, the uncertainty-growth margin that exceeded v_rel
    pub uncertainty_margin_m_s: f64,

    /// How far the denominator fell below zero, in m/s
    pub deficit_m_s: f64,

    pub recommendation: &'static str,
}

/// Outcome of a maneuver planning request
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ManeuverOutcome {
    Feasible(ManeuverPlan),
    Infeasible(InfeasibleConfig),
}

/// Compute the required maneuver lead time
///
/// Rejects non-positive `v_rel`/`R_req` and negative `σ₀` with
/// `InvalidInput`; a non-positive denominator yields
/// `ManeuverOutcome::Infeasible` with the deficit magnitude.
pub fn plan_maneuver(request: &ManeuverRequest) -> Result<ManeuverOutcome> {
    let ManeuverRequest {
        v_rel_m_s: v_rel,
        required_separation_m: r_req,
        sigma0_m: sigma0,
        uncertainty_growth_m_s: k,
        confidence_factor: n,
    } = *request;

    if !v_rel.is_finite() || v_rel <= 0.0 {
        return Err(ConjunctionError::InvalidInput(format!(
            "relative velocity must be positive, got {v_rel}"
        )));
    }
    if !r_req.is_finite() || r_req <= 0.0 {
        return Err(ConjunctionError::InvalidInput(format!(
            "required separation must be positive, got {r_req}"
        )));
    }
    if !sigma0.is_finite() || sigma0 < 0.0 {
        return Err(ConjunctionError::InvalidInput(format!(
            "positional uncertainty must be non-negative, got {sigma0}"
        )));
    }
    if !k.is_finite() || k < 0.0 || !n.is_finite() || n <= 0.0 {
        return Err(ConjunctionError::InvalidInput(
            "growth rate must be non-negative and confidence factor positive".into(),
        ));
    }

    let numerator = r_req + n * sigma0;
    let denominator = v_rel - n * k;

    if denominator <= 0.0 {
        log::warn!(
            "Infeasible maneuver configuration: v_rel {v_rel} m/s vs margin {} m/s",
            n * k
        );
        return Ok(ManeuverOutcome::Infeasible(InfeasibleConfig {
            v_rel_m_s: v_rel,
            uncertainty_margin_m_s: n * k,
            deficit_m_s: denominator.abs(),
            recommendation:
                "Reduce the confidence factor (n) or improve orbital precision (reduce k)",
        }));
    }

    let lead_time = LeadTime::from_seconds(numerator / denominator);
    let criticality = Criticality::from_lead_time_hours(lead_time.hours);

    let mut scenarios = Vec::new();
    for (name, factor) in [("Conservative (2σ)", 2.0), ("Aggressive (1σ)", 1.0)] {
        if factor == n {
            continue;
        }
        let alt_denominator = v_rel - factor * k;
        if alt_denominator > 0.0 {
            scenarios.push(ScenarioVariant {
                name,
                confidence_factor: factor,
                lead_time: LeadTime::from_seconds((r_req + factor * sigma0) / alt_denominator),
            });
        }
    }

    let lead_time_if_feasible = |num: f64, den: f64| {
        (den > 0.0).then(|| LeadTime::from_seconds(num / den))
    };
    let sensitivity = SensitivityAnalysis {
        v_rel_high: lead_time_if_feasible(numerator, v_rel * 1.1 - n * k),
        v_rel_low: lead_time_if_feasible(numerator, v_rel * 0.9 - n * k),
        sigma_high: LeadTime::from_seconds((r_req + n * sigma0 * 1.5) / denominator),
        sigma_low: LeadTime::from_seconds((r_req + n * sigma0 * 0.5) / denominator),
    };

    Ok(ManeuverOutcome::Feasible(ManeuverPlan {
        request: *request,
        lead_time,
        criticality,
        recommended_action: criticality.recommended_action(),
        numerator_m: numerator,
        denominator_m_s: denominator,
        geometry: EncounterGeometry::classify(v_rel),
        scenarios,
        sensitivity,
        operational_recommendations: operational_recommendations(lead_time.hours, v_rel),
    }))
}

/// Operational recommendations for the available lead time and encounter
/// speed
pub fn operational_recommendations(t_hours: f64, v_rel_m_s: f64) -> Vec<&'static str> {
    let mut recommendations: Vec<&'static str> = if t_hours < 1.0 {
        vec![
            "Activate emergency protocol",
            "Contact control center immediately",
            "Execute pre-programmed emergency maneuver",
            "Continuous telemetry monitoring",
        ]
    } else if t_hours < 6.0 {
        vec![
            "Prepare detailed maneuver plan",
            "Refine orbital data with additional measurements",
            "Notify other satellite operators",
            "Verify propulsion systems",
        ]
    } else if t_hours < 24.0 {
        vec![
            "Perform detailed conjunction analysis",
            "Consider coordinated maneuvers if applicable",
            "Increase tracking frequency",
            "Document procedures for similar cases",
        ]
    } else {
        vec![
            "Exhaustive analysis of multiple scenarios",
            "Coordination with space agencies",
            "Fuel optimization for maneuver",
            "Precision maneuver planning",
        ]
    };

    if v_rel_m_s > 10000.0 {
        recommendations.push("High-velocity encounter - consider early maneuver");
    } else if v_rel_m_s < 500.0 {
        recommendations.push("Slow encounter - long-duration maneuver possible");
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(v_rel: f64, r_req: f64, sigma0: f64, k: f64, n: f64) -> ManeuverRequest {
        ManeuverRequest {
            v_rel_m_s: v_rel,
            required_separation_m: r_req,
            sigma0_m: sigma0,
            uncertainty_growth_m_s: k,
            confidence_factor: n,
        }
    }

    fn expect_plan(outcome: ManeuverOutcome) -> ManeuverPlan {
        match outcome {
            ManeuverOutcome::Feasible(plan) => plan,
            ManeuverOutcome::Infeasible(_) => panic!("expected a feasible plan"),
        }
    }

    #[test]
    fn test_algebraic_identity() {
        let req = request(8000.0, 1000.0, 100.0, 0.001, 3.0);
        let plan = expect_plan(plan_maneuver(&req).unwrap());

        // v_rel − n·k == (R_req + n·σ₀) / t
        let lhs = 8000.0 - 3.0 * 0.001;
        let rhs = (1000.0 + 3.0 * 100.0) / plan.lead_time.seconds;
        assert!((lhs - rhs).abs() / lhs < 1e-12);
    }

    #[test]
    fn test_infeasible_configuration() {
        let req = request(0.002, 1000.0, 100.0, 0.001, 3.0);
        match plan_maneuver(&req).unwrap() {
            ManeuverOutcome::Infeasible(info) => {
                assert!((info.deficit_m_s - 0.001).abs() < 1e-12);
                assert!((info.uncertainty_margin_m_s - 0.003).abs() < 1e-12);
            }
            ManeuverOutcome::Feasible(_) => panic!("expected infeasible"),
        }
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(plan_maneuver(&request(0.0, 1000.0, 100.0, 0.001, 3.0)).is_err());
        assert!(plan_maneuver(&request(8000.0, 0.0, 100.0, 0.001, 3.0)).is_err());
        assert!(plan_maneuver(&request(8000.0, 1000.0, -1.0, 0.001, 3.0)).is_err());
    }

    #[test]
    fn test_criticality_tier_boundaries() {
        assert_eq!(
            Criticality::from_lead_time_hours(0.99),
            Criticality::Critical
        );
        assert_eq!(Criticality::from_lead_time_hours(1.01), Criticality::High);
        assert_eq!(
            Criticality::from_lead_time_hours(23.99),
            Criticality::Medium
        );
        assert_eq!(
            Criticality::from_lead_time_hours(6.99 * 24.0),
            Criticality::Low
        );
        assert_eq!(
            Criticality::from_lead_time_hours(8.0 * 24.0),
            Criticality::Minimal
        );
    }

    #[test]
    fn test_scenarios_skip_matching_confidence() {
        let req = request(8000.0, 1000.0, 100.0, 0.001, 2.0);
        let plan = expect_plan(plan_maneuver(&req).unwrap());

        // n = 2 suppresses the conservative variant, leaving aggressive
        assert_eq!(plan.scenarios.len(), 1);
        assert_eq!(plan.scenarios[0].confidence_factor, 1.0);
    }

    #[test]
    fn test_sensitivity_directions() {
        let req = request(8000.0, 1000.0, 100.0, 0.001, 3.0);
        let plan = expect_plan(plan_maneuver(&req).unwrap());

        // Faster closing speed leaves less time, more uncertainty needs more
        let high = plan.sensitivity.v_rel_high.unwrap();
        let low = plan.sensitivity.v_rel_low.unwrap();
        assert!(high.seconds < plan.lead_time.seconds);
        assert!(low.seconds > plan.lead_time.seconds);
        assert!(plan.sensitivity.sigma_high.seconds > plan.lead_time.seconds);
        assert!(plan.sensitivity.sigma_low.seconds < plan.lead_time.seconds);
    }

    #[test]
    fn test_encounter_geometry() {
        assert_eq!(
            EncounterGeometry::classify(300.0),
            EncounterGeometry::CoOrbital
        );
        assert_eq!(
            EncounterGeometry::classify(1500.0),
            EncounterGeometry::Lateral
        );
        assert_eq!(
            EncounterGeometry::classify(5000.0),
            EncounterGeometry::Perpendicular
        );
        assert_eq!(
            EncounterGeometry::classify(12000.0),
            EncounterGeometry::HeadOn
        );
    }

    #[test]
    fn test_recommendations_cover_velocity_extremes() {
        let fast = operational_recommendations(12.0, 12000.0);
        assert!(fast.contains(&"High-velocity encounter - consider early maneuver"));

        let slow = operational_recommendations(12.0, 200.0);
        assert!(slow.contains(&"Slow encounter - long-duration maneuver possible"));
    }
}
