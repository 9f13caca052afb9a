//! Piecewise-exponential atmospheric density profile.
//!
//! A four-band exponential decay, each band with its own reference
//! altitude, reference density, and scale height, scaled by a solar
//! activity multiplier. Fast and smooth enough for drag perturbation
//! estimates; it does not model day/night or compositional variation.

use serde::Serialize;

/// Solar activity level driving atmospheric density variation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolarActivity {
    Low,
    Moderate,
    High,
    Extreme,
}

impl SolarActivity {
    /// Density multiplier relative to moderate conditions
    pub fn density_multiplier(&self) -> f64 {
        match self {
            Self::Low => 0.7,
            Self::Moderate => 1.0,
            Self::High => 1.5,
            Self::Extreme => 2.2,
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::Extreme => "Extreme",
        }
    }
}

impl Default for SolarActivity {
    fn default() -> Self {
        Self::Moderate
    }
}

/// One altitude band of the density profile
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DensityBand {
    /// Lowest altitude this band covers (km)
    pub floor_km: f64,

    /// Altitude at which the reference density is quoted (km)
    pub reference_altitude_km: f64,

    /// Density at the reference altitude (kg/m³)
    pub reference_density_kg_m3: f64,

    /// Exponential scale height (km)
    pub scale_height_km: f64,
}

impl DensityBand {
    fn density_at(&self, altitude_km: f64) -> f64 {
        self.reference_density_kg_m3
            * (-(altitude_km - self.reference_altitude_km) / self.scale_height_km).exp()
    }
}

/// Four-band piecewise-exponential atmosphere
#[derive(Debug, Clone, Serialize)]
pub struct AtmosphereProfile {
    /// Bands ordered from highest floor to lowest
    bands: [DensityBand; 4],

    /// Density is treated as zero above this altitude (km)
    pub max_altitude_km: f64,
}

impl Default for AtmosphereProfile {
    fn default() -> Self {
        Self::standard()
    }
}

impl AtmosphereProfile {
    /// Standard profile: exosphere, upper/lower thermosphere,
    /// mesosphere/stratosphere
    pub fn standard() -> Self {
        Self {
            bands: [
                // Exosphere
                DensityBand {
                    floor_km: 1000.0,
                    reference_altitude_km: 1000.0,
                    reference_density_kg_m3: 3.019e-15,
                    scale_height_km: 268.0,
                },
                // Upper thermosphere
                DensityBand {
                    floor_km: 500.0,
                    reference_altitude_km: 500.0,
                    reference_density_kg_m3: 2.418e-11,
                    scale_height_km: 60.0,
                },
                // Lower thermosphere
                DensityBand {
                    floor_km: 200.0,
                    reference_altitude_km: 200.0,
                    reference_density_kg_m3: 2.789e-11,
                    scale_height_km: 37.0,
                },
                // Mesosphere/stratosphere
                DensityBand {
                    floor_km: 0.0,
                    reference_altitude_km: 200.0,
                    reference_density_kg_m3: 3.899e-9,
                    scale_height_km: 22.0,
                },
            ],
            max_altitude_km: 2000.0,
        }
    }

    /// Create with custom bands and ceiling
    pub fn new(bands: [DensityBand; 4], max_altitude_km: f64) -> Self {
        Self {
            bands,
            max_altitude_km,
        }
    }

    /// Atmospheric density at the given altitude (kg/m³)
    ///
    /// Zero above the profile ceiling. Below the lowest band floor the
    /// lowest band extrapolates, so negative altitudes still return a
    /// finite (large) density rather than failing.
    pub fn density(&self, altitude_km: f64, activity: SolarActivity) -> f64 {
        if !altitude_km.is_finite() || altitude_km > self.max_altitude_km {
            return 0.0;
        }

        let band = self
            .bands
            .iter()
            .find(|b| altitude_km >= b.floor_km)
            .unwrap_or(&self.bands[3]);

        band.density_at(altitude_km) * activity.density_multiplier()
    }
}
