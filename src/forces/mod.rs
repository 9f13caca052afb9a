//! Perturbation force models.
//!
//! Each model implements the `PerturbationModel` trait, computing its
//! instantaneous acceleration contribution (km/s²) from a state vector.
//! Models are combined with `PerturbationStack`, which sums enabled
//! contributions and can report a tagged per-source breakdown.
//!
//! All models are pure and total: malformed states (zero radius, zero
//! velocity, non-finite components) yield the zero vector, never a panic.

mod atmosphere;
mod drag;
mod j2;
mod srp;

pub use atmosphere::{AtmosphereProfile, DensityBand, SolarActivity};
pub use drag::AtmosphericDrag;
pub use j2::J2Oblateness;
pub use srp::SolarRadiationPressure;

use nalgebra::Vector3;
use serde::Serialize;

use crate::state::StateVector;

/// Source tag carried with every perturbation acceleration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PerturbationSource {
    J2,
    Drag,
    SolarRadiationPressure,
}

/// Trait for perturbation acceleration contributions
///
/// Implementations must be thread-safe (Send + Sync): screening work units
/// evaluate forces concurrently with no shared mutable state.
pub trait PerturbationModel: Send + Sync {
    /// Acceleration contribution at the given state, in km/s²
    ///
    /// Must not panic on malformed input; degenerate states return the
    /// zero vector.
    fn acceleration(&self, state: &StateVector) -> Vector3<f64>;

    /// Which physical effect this model represents
    fn source(&self) -> PerturbationSource;

    /// Model name for logging and display
    fn name(&self) -> &'static str;

    /// Whether this model is currently enabled
    fn enabled(&self) -> bool {
        true
    }
}

/// Composite of perturbation models
///
/// The primary way to assemble a full perturbation environment for a
/// satellite.
pub struct PerturbationStack {
    models: Vec<Box<dyn PerturbationModel>>,
}

impl Default for PerturbationStack {
    fn default() -> Self {
        Self::new()
    }
}

impl PerturbationStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self { models: Vec::new() }
    }

    /// The standard environment: J2 + drag + SRP with default parameters
    pub fn standard(activity: SolarActivity) -> Self {
        let mut stack = Self::new();
        stack.add(Box::new(J2Oblateness::default()));
        stack.add(Box::new(AtmosphericDrag::new(activity)));
        stack.add(Box::new(SolarRadiationPressure::default()));
        stack
    }

    /// Add a model to the stack
    pub fn add(&mut self, model: Box<dyn PerturbationModel>) {
        log::debug!("Adding perturbation model: {}", model.name());
        self.models.push(model);
    }

    /// Number of models in the stack
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Names of all models
    pub fn model_names(&self) -> Vec<&'static str> {
        self.models.iter().map(|m| m.name()).collect()
    }

    /// Total acceleration from all enabled models (km/s²)
    pub fn total_acceleration(&self, state: &StateVector) -> Vector3<f64> {
        self.models
            .iter()
            .filter(|m| m.enabled())
            .map(|m| m.acceleration(state))
            .fold(Vector3::zeros(), |acc, a| acc + a)
    }

    /// Per-source acceleration contributions (km/s²)
    pub fn breakdown(&self, state: &StateVector) -> Vec<(PerturbationSource, Vector3<f64>)> {
        self.models
            .iter()
            .filter(|m| m.enabled())
            .map(|m| (m.source(), m.acceleration(state)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::EARTH_RADIUS_KM;
    use chrono::{DateTime, Utc};

    fn epoch() -> DateTime<Utc> {
        "2026-01-29T12:00:00Z".parse().unwrap()
    }

    fn leo_state() -> StateVector {
        let r = EARTH_RADIUS_KM + 400.0;
        StateVector::new(
            Vector3::new(r, 0.0, 0.0),
            Vector3::new(0.0, 7.66, 0.0),
            epoch(),
        )
    }

    #[test]
    fn test_empty_stack_is_zero() {
        let stack = PerturbationStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.total_acceleration(&leo_state()), Vector3::zeros());
    }

    #[test]
    fn test_standard_stack_breakdown() {
        let stack = PerturbationStack::standard(SolarActivity::Moderate);
        assert_eq!(stack.len(), 3);

        let state = leo_state();
        let breakdown = stack.breakdown(&state);
        assert_eq!(breakdown.len(), 3);

        // At 400 km all three contributions are non-zero
        for (_, accel) in &breakdown {
            assert!(accel.norm() > 0.0);
        }

        // Sum of the breakdown equals the total
        let sum = breakdown
            .iter()
            .fold(Vector3::zeros(), |acc, (_, a)| acc + a);
        let total = stack.total_acceleration(&state);
        assert!((sum - total).norm() < 1e-18);
    }

    #[test]
    fn test_total_is_order_independent() {
        let state = leo_state();

        let mut forward = PerturbationStack::new();
        forward.add(Box::new(J2Oblateness::default()));
        forward.add(Box::new(SolarRadiationPressure::default()));

        let mut reversed = PerturbationStack::new();
        reversed.add(Box::new(SolarRadiationPressure::default()));
        reversed.add(Box::new(J2Oblateness::default()));

        let a = forward.total_acceleration(&state);
        let b = reversed.total_acceleration(&state);
        assert!((a - b).norm() < 1e-18);
    }
}
