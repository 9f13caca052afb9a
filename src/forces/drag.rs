//! Atmospheric drag perturbation.
//!
//! a = -½ ρ |v|² (Cd · A/m) v̂
//!
//! Density comes from the piecewise-exponential profile scaled by solar
//! activity. Drag is cut off above 2000 km altitude where the modeled
//! density vanishes.

use nalgebra::Vector3;

use super::atmosphere::{AtmosphereProfile, SolarActivity};
use super::{PerturbationModel, PerturbationSource};
use crate::constants::SpacecraftDefaults;
use crate::state::StateVector;

/// Atmospheric drag perturbation model
#[derive(Debug, Clone)]
pub struct AtmosphericDrag {
    profile: AtmosphereProfile,
    activity: SolarActivity,
    spacecraft: SpacecraftDefaults,
}

impl Default for AtmosphericDrag {
    fn default() -> Self {
        Self::new(SolarActivity::Moderate)
    }
}

impl AtmosphericDrag {
    /// Create with the standard profile and representative spacecraft
    pub fn new(activity: SolarActivity) -> Self {
        Self {
            profile: AtmosphereProfile::standard(),
            activity,
            spacecraft: SpacecraftDefaults::default(),
        }
    }

    /// Create with a custom profile and spacecraft parameters
    pub fn with_parameters(
        profile: AtmosphereProfile,
        activity: SolarActivity,
        spacecraft: SpacecraftDefaults,
    ) -> Self {
        Self {
            profile,
            activity,
            spacecraft,
        }
    }

    /// Current solar activity setting
    pub fn activity(&self) -> SolarActivity {
        self.activity
    }
}

impl PerturbationModel for AtmosphericDrag {
    fn acceleration(&self, state: &StateVector) -> Vector3<f64> {
        if !state.is_finite() {
            return Vector3::zeros();
        }

        let rho = self.profile.density(state.altitude_km(), self.activity);
        if rho <= 0.0 {
            return Vector3::zeros();
        }

        let speed_km_s = state.speed_km_s();
        if speed_km_s == 0.0 {
            return Vector3::zeros();
        }

        // Magnitude in SI (ρ kg/m³, v m/s), then converted to km/s²
        let v_m_s = speed_km_s * 1000.0;
        let cd_a_m = self.spacecraft.drag_coefficient * self.spacecraft.area_to_mass_m2_kg;
        let accel_m_s2 = -0.5 * rho * cd_a_m * v_m_s * v_m_s;

        let v_hat = state.velocity_km_s / speed_km_s;
        (accel_m_s2 * 1e-3) * v_hat
    }

    fn source(&self) -> PerturbationSource {
        PerturbationSource::Drag
    }

    fn name(&self) -> &'static str {
        "Atmospheric Drag"
    }
}
