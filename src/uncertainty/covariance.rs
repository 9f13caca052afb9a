//! Orbit regime classification and parametric state covariance.
//!
//! The covariance here is a tracking-capability heuristic indexed by
//! orbital regime, not an estimate from sensor data: diagonal position and
//! velocity variances from per-regime 1σ tables, plus a weak
//! position/velocity cross-coupling on matching axes.

use nalgebra::{Matrix3, Matrix6};
use serde::Serialize;

/// Orbital altitude regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrbitRegime {
    Leo,
    Meo,
    Geo,
    Heo,
}

impl OrbitRegime {
    /// Classify from altitude above the surface in km
    pub fn classify(altitude_km: f64) -> Self {
        if altitude_km < 2000.0 {
            Self::Leo
        } else if altitude_km < 20000.0 {
            Self::Meo
        } else if altitude_km < 50000.0 {
            Self::Geo
        } else {
            Self::Heo
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Leo => "LEO",
            Self::Meo => "MEO",
            Self::Geo => "GEO",
            Self::Heo => "HEO",
        }
    }

    /// 1σ position uncertainty in meters: [along-track, cross-track, radial]
    ///
    /// Representative of routine tracking accuracy per regime.
    pub fn position_std_m(&self) -> [f64; 3] {
        match self {
            Self::Leo => [100.0, 50.0, 30.0],
            Self::Meo => [200.0, 100.0, 60.0],
            Self::Geo => [500.0, 250.0, 150.0],
            Self::Heo => [1000.0, 500.0, 300.0],
        }
    }

    /// 1σ velocity uncertainty in m/s: [along-track, cross-track, radial]
    pub fn velocity_std_m_s(&self) -> [f64; 3] {
        match self {
            Self::Leo => [0.1, 0.05, 0.03],
            Self::Meo => [0.2, 0.1, 0.06],
            Self::Geo => [0.5, 0.25, 0.15],
            Self::Heo => [1.0, 0.5, 0.3],
        }
    }
}

/// Symmetric 6×6 state covariance
///
/// Position block in km², velocity block in km²/s², cross terms in km²/s.
/// Symmetry is enforced on construction; positive semi-definiteness comes
/// from the diagonal-dominant construction and is not re-verified.
#[derive(Debug, Clone, Serialize)]
pub struct StateCovariance {
    matrix: Matrix6<f64>,
}

impl StateCovariance {
    /// Wrap a matrix, symmetrizing any floating-point asymmetry
    pub fn new(matrix: Matrix6<f64>) -> Self {
        let sym = 0.5 * (matrix + matrix.transpose());
        Self { matrix: sym }
    }

    /// The all-zero covariance (no modeled uncertainty)
    pub fn zeros() -> Self {
        Self {
            matrix: Matrix6::zeros(),
        }
    }

    /// Full 6×6 matrix
    pub fn matrix(&self) -> &Matrix6<f64> {
        &self.matrix
    }

    /// Position block (top-left 3×3) in km²
    pub fn position_block(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// Sum of two covariances (independent-error assumption)
    pub fn combined(&self, other: &Self) -> Self {
        Self::new(self.matrix + other.matrix)
    }

    /// Whether every entry is finite
    pub fn is_finite(&self) -> bool {
        self.matrix.iter().all(|c| c.is_finite())
    }
}

/// Build the parametric covariance for a regime
///
/// Diagonal variances from the regime σ tables (converted from meters to
/// km), cross terms 0.1·sqrt(varPos·varVel) on matching axis pairs,
/// everything else zero. Deterministic given the regime.
pub fn regime_covariance(regime: OrbitRegime) -> StateCovariance {
    let pos_std = regime.position_std_m();
    let vel_std = regime.velocity_std_m_s();

    let mut m = Matrix6::zeros();
    for i in 0..3 {
        let var_pos = (pos_std[i] / 1000.0).powi(2);
        let var_vel = (vel_std[i] / 1000.0).powi(2);
        m[(i, i)] = var_pos;
        m[(i + 3, i + 3)] = var_vel;

        let cross = 0.1 * (var_pos * var_vel).sqrt();
        m[(i, i + 3)] = cross;
        m[(i + 3, i)] = cross;
    }

    StateCovariance::new(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regime_thresholds() {
        assert_eq!(OrbitRegime::classify(400.0), OrbitRegime::Leo);
        assert_eq!(OrbitRegime::classify(1999.9), OrbitRegime::Leo);
        assert_eq!(OrbitRegime::classify(2000.0), OrbitRegime::Meo);
        assert_eq!(OrbitRegime::classify(20000.0), OrbitRegime::Geo);
        assert_eq!(OrbitRegime::classify(50000.0), OrbitRegime::Heo);
    }

    #[test]
    fn test_leo_covariance_construction() {
        let cov = regime_covariance(OrbitRegime::Leo);
        let m = cov.matrix();

        // Along-track: 100 m → 0.1 km → 0.01 km²
        assert!((m[(0, 0)] - 0.01).abs() < 1e-15);
        // Radial velocity: 0.03 m/s → 3e-5 km/s → 9e-10 km²/s²
        assert!((m[(5, 5)] - 9e-10).abs() < 1e-22);

        // Cross term at matching axis
        let expected = 0.1 * (m[(0, 0)] * m[(3, 3)]).sqrt();
        assert!((m[(0, 3)] - expected).abs() < 1e-18);
        // Non-matching off-diagonals are zero
        assert_eq!(m[(0, 1)], 0.0);
        assert_eq!(m[(0, 4)], 0.0);
    }

    #[test]
    fn test_covariance_invariants() {
        for regime in [
            OrbitRegime::Leo,
            OrbitRegime::Meo,
            OrbitRegime::Geo,
            OrbitRegime::Heo,
        ] {
            let cov = regime_covariance(regime);
            let m = cov.matrix();
            for i in 0..6 {
                assert!(m[(i, i)] >= 0.0);
                for j in 0..6 {
                    assert_eq!(m[(i, j)], m[(j, i)]);
                }
            }
        }
    }

    #[test]
    fn test_combined_is_positive_semidefinite() {
        use crate::uncertainty::{PerturbationLevel, UncertaintyPropagator};

        // Tracked + propagated, the combination the probability engine sees
        let tracked = regime_covariance(OrbitRegime::Leo);
        let propagated = UncertaintyPropagator::default()
            .propagate(48.0, 1.55, PerturbationLevel::High)
            .unwrap()
            .covariance;

        let sum = tracked.combined(&propagated);
        let eigen = sum.matrix().symmetric_eigen();
        for lambda in eigen.eigenvalues.iter() {
            assert!(*lambda >= -1e-12);
        }
    }

    #[test]
    fn test_combined_preserves_symmetry() {
        let a = regime_covariance(OrbitRegime::Leo);
        let b = regime_covariance(OrbitRegime::Geo);
        let c = a.combined(&b);
        let m = c.matrix();
        for i in 0..6 {
            for j in 0..6 {
                assert_eq!(m[(i, j)], m[(j, i)]);
            }
            assert!(m[(i, i)] >= a.matrix()[(i, i)]);
        }
    }
}
