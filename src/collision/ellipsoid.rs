//! 3σ positional uncertainty ellipsoid.

use nalgebra::Matrix3;
use serde::Serialize;

/// Uncertainty ellipsoid derived from a position covariance
#[derive(Debug, Clone, Serialize)]
pub struct UncertaintyEllipsoid {
    /// Semi-axes in meters (3σ)
    pub semi_axes_m: [f64; 3],

    /// Orthonormal orientation; columns are the principal axes
    pub orientation: Matrix3<f64>,

    /// Enclosed volume in km³
    pub volume_km3: f64,
}

impl UncertaintyEllipsoid {
    /// Eigendecompose a position covariance (km²) into a 3σ ellipsoid
    ///
    /// Eigenvalues that come out slightly negative from roundoff are
    /// clamped to zero, so a degenerate covariance yields a flattened
    /// ellipsoid rather than NaN axes.
    pub fn from_position_covariance(p_pos: &Matrix3<f64>) -> Self {
        let eigen = p_pos.symmetric_eigen();

        let mut semi_axes_m = [0.0; 3];
        for i in 0..3 {
            let lambda = eigen.eigenvalues[i].max(0.0);
            semi_axes_m[i] = 3.0 * lambda.sqrt() * 1000.0;
        }

        let volume_km3 = (4.0 / 3.0)
            * std::f64::consts::PI
            * semi_axes_m.iter().product::<f64>()
            / 1e9;

        Self {
            semi_axes_m,
            orientation: eigen.eigenvectors,
            volume_km3,
        }
    }
}
