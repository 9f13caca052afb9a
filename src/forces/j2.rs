//! J2 oblateness perturbation.
//!
//! The dominant perturbation for LEO orbits: the gravitational correction
//! from Earth's equatorial bulge, in Cartesian form.

use nalgebra::Vector3;

use super::{PerturbationModel, PerturbationSource};
use crate::constants::EarthModel;
use crate::state::StateVector;

/// J2 oblateness perturbation model
#[derive(Debug, Clone)]
pub struct J2Oblateness {
    earth: EarthModel,
}

impl Default for J2Oblateness {
    fn default() -> Self {
        Self::new(EarthModel::default())
    }
}

impl J2Oblateness {
    /// Create with the given Earth parameters
    pub fn new(earth: EarthModel) -> Self {
        Self { earth }
    }
}

impl PerturbationModel for J2Oblateness {
    /// a = -1.5·J2·(Re²/r⁴)·GM · [x(1-5z²), y(1-5z²), z(3-5z²)]
    /// with (x, y, z) the unit position vector.
    fn acceleration(&self, state: &StateVector) -> Vector3<f64> {
        if !state.is_finite() {
            return Vector3::zeros();
        }

        let r = state.radius_km();
        if r == 0.0 {
            return Vector3::zeros();
        }

        let u = state.position_km / r;
        let z2 = u.z * u.z;

        let factor = -1.5
            * self.earth.j2
            * (self.earth.radius_km * self.earth.radius_km / r.powi(4))
            * self.earth.gm_km3_s2;

        Vector3::new(
            factor * u.x * (1.0 - 5.0 * z2),
            factor * u.y * (1.0 - 5.0 * z2),
            factor * u.z * (3.0 - 5.0 * z2),
        )
    }

    fn source(&self) -> PerturbationSource {
        PerturbationSource::J2
    }

    fn name(&self) -> &'static str {
        "J2 Oblateness"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{EARTH_RADIUS_KM, MU_EARTH_KM3_S2};
    use chrono::{DateTime, Utc};

    fn epoch() -> DateTime<Utc> {
        "2026-01-29T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_zero_at_earth_center() {
        let j2 = J2Oblateness::default();
        let state = StateVector::new(Vector3::zeros(), Vector3::new(0.0, 7.6, 0.0), epoch());
        assert_eq!(j2.acceleration(&state), Vector3::zeros());
    }

    #[test]
    fn test_equatorial_acceleration_points_inward() {
        let j2 = J2Oblateness::default();
        let r = EARTH_RADIUS_KM + 400.0;
        let state = StateVector::new(
            Vector3::new(r, 0.0, 0.0),
            Vector3::new(0.0, 7.66, 0.0),
            epoch(),
        );

        let accel = j2.acceleration(&state);
        // On the equator z = 0, so the x component carries the full
        // -1.5·J2·(Re²/r⁴)·GM factor and points toward Earth
        assert!(accel.x < 0.0);
        assert_eq!(accel.y, 0.0);
        assert_eq!(accel.z, 0.0);

        // J2 is a small correction: well under 1% of central gravity
        let central = MU_EARTH_KM3_S2 / (r * r);
        assert!(accel.norm() < 0.01 * central);
    }

    #[test]
    fn test_nan_position_fails_soft() {
        let j2 = J2Oblateness::default();
        let state = StateVector::new(
            Vector3::new(f64::NAN, 0.0, 0.0),
            Vector3::zeros(),
            epoch(),
        );
        assert_eq!(j2.acceleration(&state), Vector3::zeros());
    }
}
