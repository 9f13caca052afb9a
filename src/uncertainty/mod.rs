//! Orbit-regime covariance modelling and uncertainty propagation.
//!
//! `covariance` classifies an orbital regime from altitude and builds the
//! parametric 6×6 state covariance; `propagation` grows a base uncertainty
//! forward in time with a non-linear, perturbation-coupled law.

mod covariance;
mod propagation;

pub use covariance::{regime_covariance, OrbitRegime, StateCovariance};
pub use propagation::{
    ManeuverUncertainty, PerturbationLevel, PropagatedUncertainty, UncertaintyPropagator,
};
