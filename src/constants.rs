//! Physical constants and representative spacecraft parameters.
//!
//! Everything the force models need is carried in named, overridable
//! configuration structs rather than literals buried in formulas, so tests
//! and future refinements can substitute their own values.

use serde::Serialize;

/// Earth's mean equatorial radius in km (WGS84)
pub const EARTH_RADIUS_KM: f64 = 6378.137;

/// Earth's gravitational parameter GM in km³/s²
pub const MU_EARTH_KM3_S2: f64 = 398600.4418;

/// Earth and radiation environment parameters
#[derive(Debug, Clone, Serialize)]
pub struct EarthModel {
    /// Gravitational parameter GM in km³/s²
    pub gm_km3_s2: f64,

    /// J2 zonal harmonic coefficient (oblateness)
    pub j2: f64,

    /// Mean equatorial radius in km
    pub radius_km: f64,

    /// Rotation rate in rad/s
    pub rotation_rate_rad_s: f64,

    /// Solar constant at 1 AU in W/m²
    pub solar_constant_w_m2: f64,

    /// Speed of light in m/s
    pub speed_of_light_m_s: f64,
}

impl Default for EarthModel {
    fn default() -> Self {
        Self {
            gm_km3_s2: MU_EARTH_KM3_S2,
            j2: 1.08262668e-3,
            radius_km: EARTH_RADIUS_KM,
            rotation_rate_rad_s: 7.2921159e-5,
            solar_constant_w_m2: 1361.0,
            speed_of_light_m_s: 299_792_458.0,
        }
    }
}

/// Representative spacecraft parameters for drag and SRP
///
/// Typical values for a mid-size satellite; real missions should override
/// with their own ballistic and optical properties.
#[derive(Debug, Clone, Serialize)]
pub struct SpacecraftDefaults {
    /// Drag coefficient (dimensionless, ~2.0-2.5 for most satellites)
    pub drag_coefficient: f64,

    /// Area-to-mass ratio for drag in m²/kg
    pub area_to_mass_m2_kg: f64,

    /// Effective illuminated area for SRP in m²
    pub srp_area_m2: f64,

    /// Reflectance factor (0 = total absorption, 1 = total reflection)
    pub reflectance: f64,

    /// Mass in kg
    pub mass_kg: f64,
}

impl Default for SpacecraftDefaults {
    fn default() -> Self {
        Self {
            drag_coefficient: 2.2,
            area_to_mass_m2_kg: 0.01,
            srp_area_m2: 10.0,
            reflectance: 0.6,
            mass_kg: 1000.0,
        }
    }
}
