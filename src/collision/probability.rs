//! Statistical collision probability between two satellites.
//!
//! Combines two state covariances under an independence assumption,
//! measures the separation in units of uncertainty (Mahalanobis distance),
//! and maps it to a collision probability with a complementary error
//! function. Linear-algebra failures never raise: a singular position
//! covariance triggers a trace-normalized fallback distance, tagged in the
//! result so callers can tell a computed answer from a degraded one.

use nalgebra::Vector3;

use super::ellipsoid::UncertaintyEllipsoid;
use super::risk::RiskLevel;
use crate::error::{ConjunctionError, Result};
use crate::state::StateVector;
use crate::uncertainty::StateCovariance;
use serde::Serialize;

/// Geometry inputs for one satellite in a conjunction
#[derive(Debug, Clone)]
pub struct SatelliteGeometry {
    /// Instantaneous state
    pub state: StateVector,

    /// Physical body radius in meters
    pub radius_m: f64,
}

impl SatelliteGeometry {
    pub fn new(state: StateVector, radius_m: f64) -> Self {
        Self { state, radius_m }
    }
}

/// Full output of a collision probability assessment
#[derive(Debug, Clone, Serialize)]
pub struct CollisionAssessment {
    /// Collision probability, clamped to [0, 1]
    pub probability: f64,

    /// Euclidean miss distance in km
    pub miss_distance_km: f64,

    /// Miss distance normalized by the combined covariance
    pub mahalanobis_distance: f64,

    /// True when the position covariance could not be inverted and the
    /// trace-normalized fallback distance was used instead
    pub mahalanobis_fallback: bool,

    /// Sum of both physical radii, in km
    pub combined_radius_km: f64,

    /// Un-normalized positional spread sqrt(trace(P_pos)), in km
    pub sigma_miss_km: f64,

    /// Relative speed in km/s
    pub relative_speed_km_s: f64,

    /// 3σ uncertainty ellipsoid of the combined position covariance
    pub ellipsoid: UncertaintyEllipsoid,

    /// Discrete risk tier
    pub risk: RiskLevel,
}

/// Assess the collision risk between two satellites
///
/// `cov_a` and `cov_b` are each satellite's 6×6 state covariance (regime
/// table or propagated). Rejects non-finite states or covariances with
/// `InvalidInput`; every numeric degeneracy beyond that resolves to a
/// documented fallback.
pub fn assess_conjunction(
    a: &SatelliteGeometry,
    cov_a: &StateCovariance,
    b: &SatelliteGeometry,
    cov_b: &StateCovariance,
) -> Result<CollisionAssessment> {
    if !a.state.is_finite() || !b.state.is_finite() {
        return Err(ConjunctionError::InvalidInput(
            "satellite state contains non-finite components".into(),
        ));
    }
    if !cov_a.is_finite() || !cov_b.is_finite() {
        return Err(ConjunctionError::InvalidInput(
            "state covariance contains non-finite entries".into(),
        ));
    }
    if !a.radius_m.is_finite() || a.radius_m < 0.0 || !b.radius_m.is_finite() || b.radius_m < 0.0
    {
        return Err(ConjunctionError::InvalidInput(
            "physical radius must be finite and non-negative".into(),
        ));
    }

    // Independence assumption: uncertainties add
    let combined = cov_a.combined(cov_b);
    let p_pos = combined.position_block();

    let delta_pos = a.state.position_km - b.state.position_km;
    let delta_vel = a.state.velocity_km_s - b.state.velocity_km_s;
    let miss_distance_km = delta_pos.norm();
    let relative_speed_km_s = delta_vel.norm();

    let trace = p_pos.trace();
    let (mahalanobis_distance, mahalanobis_fallback) =
        mahalanobis_or_fallback(&delta_pos, &p_pos, trace, miss_distance_km);

    let combined_radius_km = (a.radius_m + b.radius_m) / 1000.0;
    let sigma_miss_km = trace.max(0.0).sqrt();

    let probability = if sigma_miss_km > 0.0 {
        let x = (mahalanobis_distance - combined_radius_km)
            / (sigma_miss_km * std::f64::consts::SQRT_2);
        (0.5 * libm::erfc(x)).clamp(0.0, 1.0)
    } else if miss_distance_km < combined_radius_km {
        // No modeled uncertainty: the geometry decides outright
        1.0
    } else {
        0.0
    };

    Ok(CollisionAssessment {
        probability,
        miss_distance_km,
        mahalanobis_distance,
        mahalanobis_fallback,
        combined_radius_km,
        sigma_miss_km,
        relative_speed_km_s,
        ellipsoid: UncertaintyEllipsoid::from_position_covariance(&p_pos),
        risk: RiskLevel::assess(probability, miss_distance_km),
    })
}

/// Mahalanobis distance of `delta` under `p_pos`, or the trace-normalized
/// fallback when the matrix is singular or the result is not finite
fn mahalanobis_or_fallback(
    delta: &Vector3<f64>,
    p_pos: &nalgebra::Matrix3<f64>,
    trace: f64,
    euclidean_km: f64,
) -> (f64, bool) {
    if let Some(inverse) = p_pos.try_inverse() {
        let d2 = delta.dot(&(inverse * delta));
        if d2.is_finite() && d2 >= 0.0 {
            return (d2.sqrt(), false);
        }
    }

    if trace > 0.0 {
        (euclidean_km / trace.sqrt(), true)
    } else {
        // Degenerate all-zero covariance; the σ=0 rule decides the
        // probability, so the distance itself is reported unscaled
        (euclidean_km, true)
    }
}

/// Deprecated exponential approximation of the erfc-based probability
///
/// Kept only to document the degraded path of the original model:
/// `0.5·exp(-x²)` for x > 0, else 0.5. Overestimates the tail relative to
/// `0.5·erfc(x)`; never used when a real erfc is available.
#[allow(dead_code)]
fn probability_exp_approx(x: f64) -> f64 {
    if x > 0.0 {
        0.5 * (-x * x).exp()
    } else {
        0.5
    }
}

/// Rough relative-velocity seed (m/s) for maneuver planning when only the
/// encounter distance is known
///
/// Close encounters are biased head-on; distant ones lateral.
pub fn estimate_relative_velocity_m_s(distance_km: f64) -> f64 {
    // Typical LEO orbital speed
    const ORBITAL_SPEED_M_S: f64 = 7800.0;

    if distance_km < 5.0 {
        ORBITAL_SPEED_M_S * 1.8
    } else if distance_km < 20.0 {
        ORBITAL_SPEED_M_S * 1.2
    } else {
        ORBITAL_SPEED_M_S * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::EARTH_RADIUS_KM;
    use crate::uncertainty::{regime_covariance, OrbitRegime};
    use chrono::{DateTime, Utc};
    use nalgebra::Matrix6;

    fn epoch() -> DateTime<Utc> {
        "2026-01-29T12:00:00Z".parse().unwrap()
    }

    fn leo_pair(separation_km: f64) -> (SatelliteGeometry, SatelliteGeometry) {
        let r = EARTH_RADIUS_KM + 500.0;
        let a = SatelliteGeometry::new(
            StateVector::new(
                Vector3::new(r, 0.0, 0.0),
                Vector3::new(0.0, 7.6, 0.0),
                epoch(),
            ),
            5.0,
        );
        let b = SatelliteGeometry::new(
            StateVector::new(
                Vector3::new(r, separation_km, 0.0),
                Vector3::new(0.0, -7.6, 0.0),
                epoch(),
            ),
            5.0,
        );
        (a, b)
    }

    #[test]
    fn test_probability_in_unit_interval_randomized() {
        // Seeded xorshift over random SPD covariances and separations
        let mut seed = 0x9e3779b97f4a7c15u64;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed >> 11) as f64 / (1u64 << 53) as f64
        };

        for _ in 0..200 {
            let mut m = Matrix6::zeros();
            for i in 0..6 {
                for j in 0..6 {
                    m[(i, j)] = next() - 0.5;
                }
            }
            // A·Aᵀ + εI is symmetric positive-definite
            let spd = m * m.transpose() + Matrix6::identity() * 1e-9;
            let cov = StateCovariance::new(spd);

            let (a, b) = leo_pair(next() * 50.0);
            let result = assess_conjunction(&a, &cov, &b, &cov).unwrap();

            assert!(result.probability >= 0.0 && result.probability <= 1.0);
            assert!(result.probability.is_finite());
            assert!(result.miss_distance_km.is_finite());
        }
    }

    #[test]
    fn test_probability_decreases_with_distance() {
        let cov = regime_covariance(OrbitRegime::Leo);
        let mut previous = 1.0;
        for separation in [0.1, 0.5, 1.0, 2.0, 5.0] {
            let (a, b) = leo_pair(separation);
            let result = assess_conjunction(&a, &cov, &b, &cov).unwrap();
            assert!(result.probability <= previous);
            previous = result.probability;
        }
    }

    #[test]
    fn test_degenerate_sigma_inside_combined_radius() {
        // 0.5 km apart with a 1.0 km combined radius and no uncertainty
        let (a, mut b) = leo_pair(0.5);
        let mut a = a;
        a.radius_m = 500.0;
        b.radius_m = 500.0;

        let zero = StateCovariance::zeros();
        let result = assess_conjunction(&a, &zero, &b, &zero).unwrap();

        assert_eq!(result.probability, 1.0);
        assert!(result.mahalanobis_fallback);
    }

    #[test]
    fn test_degenerate_sigma_outside_combined_radius() {
        let (a, mut b) = leo_pair(2.0);
        let mut a = a;
        a.radius_m = 500.0;
        b.radius_m = 500.0;

        let zero = StateCovariance::zeros();
        let result = assess_conjunction(&a, &zero, &b, &zero).unwrap();
        assert_eq!(result.probability, 0.0);
    }

    #[test]
    fn test_singular_covariance_uses_fallback() {
        // Variance on a single position axis only: P_pos is singular but
        // has a positive trace
        let mut m = Matrix6::zeros();
        m[(0, 0)] = 0.01;
        let cov = StateCovariance::new(m);

        let (a, b) = leo_pair(1.0);
        let result = assess_conjunction(&a, &cov, &b, &cov).unwrap();

        assert!(result.mahalanobis_fallback);
        // Fallback: |Δpos| / sqrt(trace) with trace = 0.02 km²
        let expected = 1.0 / 0.02f64.sqrt();
        assert!((result.mahalanobis_distance - expected).abs() < 1e-9);
    }

    #[test]
    fn test_close_approach_is_critical_regardless_of_probability() {
        let cov = regime_covariance(OrbitRegime::Leo);
        let (mut a, mut b) = leo_pair(0.5);
        a.radius_m = 5.0;
        b.radius_m = 5.0;

        let result = assess_conjunction(&a, &cov, &b, &cov).unwrap();
        assert_eq!(result.risk, RiskLevel::Critical);
    }

    #[test]
    fn test_non_finite_state_rejected() {
        let cov = regime_covariance(OrbitRegime::Leo);
        let (a, mut b) = leo_pair(1.0);
        b.state.position_km.x = f64::NAN;

        assert!(matches!(
            assess_conjunction(&a, &cov, &b, &cov),
            Err(ConjunctionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_exp_approximation_bounds_erfc() {
        // The deprecated approximation always overestimates the erfc tail
        // for positive arguments
        for x in [0.1, 0.5, 1.0, 2.0, 4.0] {
            let exact = 0.5 * libm::erfc(x);
            let approx = probability_exp_approx(x);
            assert!(approx >= exact);
        }
    }

    #[test]
    fn test_relative_velocity_heuristic() {
        assert_eq!(estimate_relative_velocity_m_s(2.0), 7800.0 * 1.8);
        assert_eq!(estimate_relative_velocity_m_s(10.0), 7800.0 * 1.2);
        assert_eq!(estimate_relative_velocity_m_s(40.0), 7800.0 * 0.5);
    }
}
