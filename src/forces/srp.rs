//! Solar radiation pressure perturbation.
//!
//! Constant-magnitude acceleration along the Earth-to-satellite direction,
//! using the always-illuminated simplification: no eclipse modeling, and
//! the radial direction stands in for the true Sun line. Magnitude is
//! (S/c)·A·(1+reflectance)/m.

use nalgebra::Vector3;

use super::{PerturbationModel, PerturbationSource};
use crate::constants::{EarthModel, SpacecraftDefaults};
use crate::state::StateVector;

/// Solar radiation pressure perturbation model
#[derive(Debug, Clone)]
pub struct SolarRadiationPressure {
    earth: EarthModel,
    spacecraft: SpacecraftDefaults,
}

impl Default for SolarRadiationPressure {
    fn default() -> Self {
        Self::new(EarthModel::default(), SpacecraftDefaults::default())
    }
}

impl SolarRadiationPressure {
    /// Create with the given environment and spacecraft parameters
    pub fn new(earth: EarthModel, spacecraft: SpacecraftDefaults) -> Self {
        Self { earth, spacecraft }
    }

    /// Acceleration magnitude in m/s², independent of position
    pub fn magnitude_m_s2(&self) -> f64 {
        let pressure = self.earth.solar_constant_w_m2 / self.earth.speed_of_light_m_s;
        pressure * self.spacecraft.srp_area_m2 * (1.0 + self.spacecraft.reflectance)
            / self.spacecraft.mass_kg
    }
}

impl PerturbationModel for SolarRadiationPressure {
    fn acceleration(&self, state: &StateVector) -> Vector3<f64> {
        if !state.is_finite() {
            return Vector3::zeros();
        }

        let r = state.radius_km();
        if r == 0.0 {
            // Direction undefined at Earth's center
            return Vector3::zeros();
        }

        let direction = state.position_km / r;
        (self.magnitude_m_s2() * 1e-3) * direction
    }

    fn source(&self) -> PerturbationSource {
        PerturbationSource::SolarRadiationPressure
    }

    fn name(&self) -> &'static str {
        "Solar Radiation Pressure"
    }
}
