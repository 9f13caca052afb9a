//! conjscan - probabilistic orbital-conjunction risk engine.
//!
//! Models the dominant perturbation forces (J2 oblateness, atmospheric
//! drag, solar radiation pressure), estimates and propagates state
//! uncertainty per orbital regime, computes collision probabilities with
//! uncertainty ellipsoids and risk tiers, plans evasive maneuver lead
//! times, and screens satellite samples for conjunctions over a time
//! horizon.
//!
//! Positions are km, velocities km/s, covariances km², epochs UTC.

pub mod collision;
pub mod constants;
pub mod error;
pub mod forces;
pub mod maneuver;
pub mod screening;
pub mod state;
pub mod uncertainty;

pub use collision::{assess_conjunction, CollisionAssessment, RiskLevel, SatelliteGeometry};
pub use error::{ConjunctionError, Result};
pub use maneuver::{plan_maneuver, ManeuverOutcome, ManeuverRequest};
pub use screening::{
    ConjunctionScreener, ScreeningReport, ScreeningRequest, StateProvider,
};
pub use state::StateVector;
pub use uncertainty::{OrbitRegime, StateCovariance, UncertaintyPropagator};
