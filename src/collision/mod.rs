//! Collision probability and risk assessment.
//!
//! Combines two satellites' states and covariances into a miss-distance
//! statistic, a collision probability, an uncertainty ellipsoid, and a
//! discrete risk tier.

mod ellipsoid;
mod probability;
mod risk;

pub use ellipsoid::UncertaintyEllipsoid;
pub use probability::{
    assess_conjunction, estimate_relative_velocity_m_s, CollisionAssessment, SatelliteGeometry,
};
pub use risk::RiskLevel;
