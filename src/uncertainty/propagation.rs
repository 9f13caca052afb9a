//! Forward propagation of positional uncertainty.
//!
//! A parametric growth law, not a Riccati integration: per-axis standard
//! deviations grow linearly with elapsed time, amplified by a non-linear
//! orbit-count factor and a perturbation-environment factor, and
//! position/velocity cross-correlations build up with the orbit count.

use nalgebra::Matrix6;
use serde::Serialize;

use super::covariance::{OrbitRegime, StateCovariance};
use crate::error::{ConjunctionError, Result};

/// Perturbation environment severity, coupling into uncertainty growth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PerturbationLevel {
    Low,
    Moderate,
    High,
    Extreme,
}

impl PerturbationLevel {
    /// Uncertainty amplification factor
    pub fn growth_factor(&self) -> f64 {
        match self {
            Self::Low => 1.0,
            Self::Moderate => 1.3,
            Self::High => 1.8,
            Self::Extreme => 2.5,
        }
    }

    /// Pick a level from drag exposure: low orbits see the strongest
    /// perturbation coupling.
    pub fn from_altitude(altitude_km: f64) -> Self {
        if altitude_km < 500.0 {
            Self::High
        } else if altitude_km < 2000.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

impl Default for PerturbationLevel {
    fn default() -> Self {
        Self::Moderate
    }
}

/// Result of propagating uncertainty forward in time
#[derive(Debug, Clone, Serialize)]
pub struct PropagatedUncertainty {
    /// Full 6×6 covariance at the target epoch
    pub covariance: StateCovariance,

    /// Per-axis position σ in km: [along-track, cross-track, radial]
    pub position_std_km: [f64; 3],

    /// Per-axis velocity σ in km/s
    pub velocity_std_km_s: [f64; 3],

    /// sqrt of the position-block trace, in km
    pub total_position_uncertainty_km: f64,

    /// Elapsed propagation time in hours
    pub elapsed_hours: f64,

    /// Number of orbits completed over the propagation span
    pub orbits_completed: f64,
}

/// Additional uncertainty introduced by executing an evasive maneuver
#[derive(Debug, Clone, Serialize)]
pub struct ManeuverUncertainty {
    /// 1σ delta-v execution error in m/s
    pub delta_v_error_m_s: f64,

    /// Thruster pointing error in degrees
    pub pointing_error_deg: f64,

    /// Burn timing error in seconds
    pub timing_error_s: f64,

    /// Resulting additional position uncertainty in km (empirical rule)
    pub additional_position_uncertainty_km: f64,

    /// Fractional confidence degradation (the execution accuracy itself)
    pub confidence_degradation: f64,
}

/// Grows a base uncertainty forward in time
#[derive(Debug, Clone)]
pub struct UncertaintyPropagator {
    /// Base 1σ per axis in meters: [along-track, cross-track, radial]
    base_std_m: [f64; 3],

    /// Growth rate per axis in m/s (along-track grows fastest)
    growth_rates_m_s: [f64; 3],
}

impl Default for UncertaintyPropagator {
    fn default() -> Self {
        Self {
            base_std_m: [100.0, 50.0, 30.0],
            growth_rates_m_s: [0.002, 0.001, 0.0005],
        }
    }
}

impl UncertaintyPropagator {
    /// Create with explicit base σ and growth rates
    pub fn new(base_std_m: [f64; 3], growth_rates_m_s: [f64; 3]) -> Self {
        Self {
            base_std_m,
            growth_rates_m_s,
        }
    }

    /// Seed the base σ from a regime's tracking-accuracy table, keeping
    /// the default growth rates
    pub fn for_regime(regime: OrbitRegime) -> Self {
        Self {
            base_std_m: regime.position_std_m(),
            ..Self::default()
        }
    }

    /// Propagate uncertainty over `elapsed_hours` for an orbit of the
    /// given period under the given perturbation environment.
    ///
    /// Per axis: `std = (base + rate·seconds) · nonlinear · perturbation`
    /// where `nonlinear = 1 + 0.1·nOrbits`. Velocity σ is the position σ
    /// divided by the orbital period. Cross-correlation between matching
    /// position/velocity axes grows as `0.1·nOrbits`, capped at 0.3.
    pub fn propagate(
        &self,
        elapsed_hours: f64,
        orbital_period_hours: f64,
        level: PerturbationLevel,
    ) -> Result<PropagatedUncertainty> {
        if !elapsed_hours.is_finite() || elapsed_hours < 0.0 {
            return Err(ConjunctionError::InvalidInput(format!(
                "elapsed time must be non-negative, got {elapsed_hours}"
            )));
        }
        if !orbital_period_hours.is_finite() || orbital_period_hours <= 0.0 {
            return Err(ConjunctionError::InvalidInput(format!(
                "orbital period must be positive, got {orbital_period_hours}"
            )));
        }

        let n_orbits = elapsed_hours / orbital_period_hours;
        let nonlinear = 1.0 + 0.1 * n_orbits;
        let pert = level.growth_factor();
        let elapsed_s = elapsed_hours * 3600.0;
        let period_s = orbital_period_hours * 3600.0;

        let mut m = Matrix6::zeros();
        let mut position_std_km = [0.0; 3];
        let mut velocity_std_km_s = [0.0; 3];

        for i in 0..3 {
            let std_m = (self.base_std_m[i] + self.growth_rates_m_s[i] * elapsed_s)
                * nonlinear
                * pert;
            let pos_std_km = std_m / 1000.0;
            let vel_std_km_s = pos_std_km / period_s;

            position_std_km[i] = pos_std_km;
            velocity_std_km_s[i] = vel_std_km_s;
            m[(i, i)] = pos_std_km * pos_std_km;
            m[(i + 3, i + 3)] = vel_std_km_s * vel_std_km_s;
        }

        let correlation = (0.1 * n_orbits).min(0.3);
        for i in 0..3 {
            let cross = correlation * (m[(i, i)] * m[(i + 3, i + 3)]).sqrt();
            m[(i, i + 3)] = cross;
            m[(i + 3, i)] = cross;
        }

        let total = (m[(0, 0)] + m[(1, 1)] + m[(2, 2)]).sqrt();

        Ok(PropagatedUncertainty {
            covariance: StateCovariance::new(m),
            position_std_km,
            velocity_std_km_s,
            total_position_uncertainty_km: total,
            elapsed_hours,
            orbits_completed: n_orbits,
        })
    }

    /// Uncertainty introduced by executing a maneuver of the given delta-v
    /// with the given fractional execution accuracy (typical: 0.1).
    pub fn maneuver_execution_uncertainty(
        delta_v_m_s: f64,
        execution_accuracy: f64,
    ) -> Result<ManeuverUncertainty> {
        if !delta_v_m_s.is_finite() || delta_v_m_s < 0.0 {
            return Err(ConjunctionError::InvalidInput(format!(
                "delta-v must be non-negative, got {delta_v_m_s}"
            )));
        }
        if !execution_accuracy.is_finite() || execution_accuracy < 0.0 {
            return Err(ConjunctionError::InvalidInput(format!(
                "execution accuracy must be non-negative, got {execution_accuracy}"
            )));
        }

        let delta_v_error = delta_v_m_s * execution_accuracy;

        Ok(ManeuverUncertainty {
            delta_v_error_m_s: delta_v_error,
            pointing_error_deg: 0.5,
            timing_error_s: 1.0,
            // Empirical rule: ~0.1 m of downstream position error per m/s
            // of delta-v error
            additional_position_uncertainty_km: delta_v_error * 0.1 / 1000.0,
            confidence_degradation: execution_accuracy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_elapsed_matches_base() {
        let prop = UncertaintyPropagator::default();
        let result = prop
            .propagate(0.0, 1.5, PerturbationLevel::Low)
            .unwrap();

        // At t=0 with low perturbations, σ equals the base values
        assert!((result.position_std_km[0] - 0.1).abs() < 1e-12);
        assert!((result.position_std_km[2] - 0.03).abs() < 1e-12);
        assert_eq!(result.orbits_completed, 0.0);
    }

    #[test]
    fn test_uncertainty_non_decreasing_in_time() {
        let prop = UncertaintyPropagator::default();
        let mut previous = 0.0;
        for hours in [0.0, 6.0, 12.0, 24.0, 72.0, 168.0] {
            let result = prop
                .propagate(hours, 1.55, PerturbationLevel::Moderate)
                .unwrap();
            assert!(result.total_position_uncertainty_km >= previous);
            previous = result.total_position_uncertainty_km;
        }
    }

    #[test]
    fn test_perturbation_level_ordering() {
        let prop = UncertaintyPropagator::default();
        let low = prop.propagate(24.0, 1.55, PerturbationLevel::Low).unwrap();
        let extreme = prop
            .propagate(24.0, 1.55, PerturbationLevel::Extreme)
            .unwrap();
        assert!(
            extreme.total_position_uncertainty_km > low.total_position_uncertainty_km
        );
        // Factors are 1.0 vs 2.5 and enter linearly in σ
        let ratio =
            extreme.total_position_uncertainty_km / low.total_position_uncertainty_km;
        assert!((ratio - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_correlation_capped() {
        let prop = UncertaintyPropagator::default();
        // 100 hours on a 1.5 h orbit: 0.1·nOrbits far exceeds the cap
        let result = prop
            .propagate(100.0, 1.5, PerturbationLevel::Moderate)
            .unwrap();
        let m = result.covariance.matrix();
        let implied = m[(0, 3)] / (m[(0, 0)] * m[(3, 3)]).sqrt();
        assert!((implied - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_period_rejected() {
        let prop = UncertaintyPropagator::default();
        assert!(prop.propagate(10.0, 0.0, PerturbationLevel::Low).is_err());
        assert!(prop.propagate(-1.0, 1.5, PerturbationLevel::Low).is_err());
    }

    #[test]
    fn test_maneuver_uncertainty() {
        let result =
            UncertaintyPropagator::maneuver_execution_uncertainty(5.0, 0.1).unwrap();
        assert!((result.delta_v_error_m_s - 0.5).abs() < 1e-12);
        assert!(result.additional_position_uncertainty_km > 0.0);
        assert!(UncertaintyPropagator::maneuver_execution_uncertainty(-1.0, 0.1).is_err());
    }
}
