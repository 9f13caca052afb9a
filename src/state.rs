//! Satellite state vector representation.
//!
//! The core value object consumed by every component: an instantaneous
//! position/velocity pair at an epoch, in an Earth-centered inertial frame.

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::Serialize;

use crate::constants::{EARTH_RADIUS_KM, MU_EARTH_KM3_S2};

/// Instantaneous satellite state
///
/// Position is in kilometers, velocity in km/s. States are ephemeral value
/// objects: produced per query, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct StateVector {
    /// Position in an Earth-centered inertial frame (km)
    pub position_km: Vector3<f64>,

    /// Velocity (km/s)
    pub velocity_km_s: Vector3<f64>,

    /// Epoch of this state
    pub epoch: DateTime<Utc>,
}

impl StateVector {
    /// Create a new state vector
    pub fn new(position_km: Vector3<f64>, velocity_km_s: Vector3<f64>, epoch: DateTime<Utc>) -> Self {
        Self {
            position_km,
            velocity_km_s,
            epoch,
        }
    }

    /// Distance from Earth's center in km
    pub fn radius_km(&self) -> f64 {
        self.position_km.norm()
    }

    /// Altitude above Earth's mean equatorial radius in km
    pub fn altitude_km(&self) -> f64 {
        self.radius_km() - EARTH_RADIUS_KM
    }

    /// Orbital speed in km/s
    pub fn speed_km_s(&self) -> f64 {
        self.velocity_km_s.norm()
    }

    /// Circular-orbit period at the current radius, in hours
    ///
    /// Good enough for uncertainty growth laws, which only need the orbit
    /// count scale; eccentric orbits would need the full vis-viva period.
    pub fn period_hours(&self) -> f64 {
        let r = self.radius_km();
        2.0 * std::f64::consts::PI * (r.powi(3) / MU_EARTH_KM3_S2).sqrt() / 3600.0
    }

    /// Whether every position and velocity component is finite
    pub fn is_finite(&self) -> bool {
        self.position_km.iter().all(|c| c.is_finite())
            && self.velocity_km_s.iter().all(|c| c.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epoch() -> DateTime<Utc> {
        "2026-01-29T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_iss_like_state() {
        // ~420 km circular orbit
        let r = EARTH_RADIUS_KM + 420.0;
        let v = (MU_EARTH_KM3_S2 / r).sqrt();
        let state = StateVector::new(Vector3::new(r, 0.0, 0.0), Vector3::new(0.0, v, 0.0), epoch());

        assert!((state.altitude_km() - 420.0).abs() < 1e-9);
        assert!((state.speed_km_s() - 7.66).abs() < 0.05);
        // ~92-93 minute period
        assert!((state.period_hours() * 60.0 - 92.8).abs() < 2.0);
    }

    #[test]
    fn test_finiteness_check() {
        let good = StateVector::new(Vector3::new(7000.0, 0.0, 0.0), Vector3::zeros(), epoch());
        assert!(good.is_finite());

        let bad = StateVector::new(
            Vector3::new(f64::NAN, 0.0, 0.0),
            Vector3::zeros(),
            epoch(),
        );
        assert!(!bad.is_finite());
    }
}
