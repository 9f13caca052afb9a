//! Conjunction screening across epochs and satellite pairs.
//!
//! Sweeps a fixed-step epoch series over one pair or a whole sample,
//! propagates each satellite's uncertainty to the epoch, and invokes the
//! collision probability engine whenever the raw separation falls below
//! the screening threshold. Sample sweeps prune candidate pairs with a
//! spatial cell grid sized to the threshold so exhaustive pairwise cost
//! stays bounded; an optional early-stop count bounds it further.
//!
//! Every (pair, epoch) unit of work is pure and reads only its own inputs,
//! so sweeps can be distributed across threads; this implementation runs
//! them sequentially.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use nalgebra::{Rotation3, Vector3};
use serde::Serialize;

use crate::collision::{assess_conjunction, CollisionAssessment, RiskLevel, SatelliteGeometry};
use crate::constants::{EARTH_RADIUS_KM, MU_EARTH_KM3_S2};
use crate::forces::{PerturbationStack, SolarActivity};
use crate::error::{ConjunctionError, Result};
use crate::state::StateVector;
use crate::uncertainty::{OrbitRegime, PerturbationLevel, UncertaintyPropagator};

/// Supplies satellite states on demand
///
/// The propagation method (SGP4, numerical integration, ephemeris lookup)
/// is the provider's concern; the screener only consumes states.
pub trait StateProvider: Send + Sync {
    /// State of the satellite at the given epoch
    fn state(&self, satellite_id: &str, epoch: DateTime<Utc>) -> Result<StateVector>;
}

/// Screening sweep parameters
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningRequest {
    /// Raw separation below which the probability engine runs (km)
    pub threshold_km: f64,

    /// Length of the sweep in days
    pub horizon_days: f64,

    /// Epoch step in hours
    pub step_hours: f64,

    /// Stop after this many qualifying events; `None` scans the full
    /// horizon
    pub early_stop_count: Option<usize>,

    /// Physical body radius assumed per object (meters)
    pub default_radius_m: f64,
}

impl Default for ScreeningRequest {
    fn default() -> Self {
        Self {
            threshold_km: 10.0,
            horizon_days: 7.0,
            step_hours: 12.0,
            early_stop_count: None,
            default_radius_m: 5.0,
        }
    }
}

impl ScreeningRequest {
    fn validate(&self) -> Result<()> {
        if !self.threshold_km.is_finite() || self.threshold_km <= 0.0 {
            return Err(ConjunctionError::InvalidInput(format!(
                "threshold must be positive, got {} km",
                self.threshold_km
            )));
        }
        if !self.horizon_days.is_finite() || self.horizon_days <= 0.0 {
            return Err(ConjunctionError::InvalidInput(format!(
                "horizon must be positive, got {} days",
                self.horizon_days
            )));
        }
        if !self.step_hours.is_finite() || self.step_hours <= 0.0 {
            return Err(ConjunctionError::InvalidInput(format!(
                "step must be positive, got {} hours",
                self.step_hours
            )));
        }
        if !self.default_radius_m.is_finite() || self.default_radius_m < 0.0 {
            return Err(ConjunctionError::InvalidInput(format!(
                "default radius must be non-negative, got {} m",
                self.default_radius_m
            )));
        }
        Ok(())
    }

    /// Fixed-step epoch series covering the horizon, starting at `start`
    pub fn epochs(&self, start: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        let total_hours = self.horizon_days * 24.0;
        let steps = (total_hours / self.step_hours).floor() as i64;
        (0..=steps)
            .map(|i| {
                start + Duration::milliseconds((i as f64 * self.step_hours * 3.6e6) as i64)
            })
            .collect()
    }
}

/// One qualifying close approach
#[derive(Debug, Clone, Serialize)]
pub struct ConjunctionEvent {
    pub satellite_a: String,
    pub satellite_b: String,
    pub epoch: DateTime<Utc>,
    pub hours_from_start: f64,

    /// Raw Euclidean separation at the epoch (km)
    pub distance_km: f64,

    /// Probability, risk tier, ellipsoid and diagnostics
    pub assessment: CollisionAssessment,

    /// Total propagated position uncertainty of each satellite, in pair
    /// order (km)
    pub position_uncertainty_km: [f64; 2],

    /// Magnitude of the total modeled perturbation acceleration on each
    /// satellite, in pair order (km/s²)
    pub perturbation_accel_km_s2: [f64; 2],
}

/// Campaign-level rollup across the events of one sweep
#[derive(Debug, Clone, Serialize)]
pub struct CampaignSummary {
    pub total_events: usize,
    pub max_probability: f64,
    pub min_distance_km: Option<f64>,

    /// Most severe risk tier across all events; `Low` when empty
    pub aggregate_risk: RiskLevel,

    /// Event with the highest probability (ties: smaller distance)
    pub most_critical: Option<ConjunctionEvent>,

    /// Event with the smallest distance (ties: higher probability);
    /// may differ from `most_critical`
    pub closest: Option<ConjunctionEvent>,
}

impl CampaignSummary {
    /// Aggregate a list of events
    pub fn from_events(events: &[ConjunctionEvent]) -> Self {
        let mut max_probability = 0.0f64;
        let mut min_distance: Option<f64> = None;
        let mut aggregate_risk = RiskLevel::Low;
        let mut most_critical: Option<&ConjunctionEvent> = None;
        let mut closest: Option<&ConjunctionEvent> = None;

        for event in events {
            max_probability = max_probability.max(event.assessment.probability);
            min_distance = Some(match min_distance {
                Some(d) => d.min(event.distance_km),
                None => event.distance_km,
            });
            aggregate_risk = aggregate_risk.max(event.assessment.risk);

            most_critical = Some(match most_critical {
                None => event,
                Some(best) => {
                    let more_probable = event.assessment.probability > best.assessment.probability;
                    let tied_but_closer = event.assessment.probability
                        == best.assessment.probability
                        && event.distance_km < best.distance_km;
                    if more_probable || tied_but_closer {
                        event
                    } else {
                        best
                    }
                }
            });

            closest = Some(match closest {
                None => event,
                Some(best) => {
                    let nearer = event.distance_km < best.distance_km;
                    let tied_but_riskier = event.distance_km == best.distance_km
                        && event.assessment.probability > best.assessment.probability;
                    if nearer || tied_but_riskier {
                        event
                    } else {
                        best
                    }
                }
            });
        }

        Self {
            total_events: events.len(),
            max_probability,
            min_distance_km: min_distance,
            aggregate_risk,
            most_critical: most_critical.cloned(),
            closest: closest.cloned(),
        }
    }
}

/// Events plus their campaign aggregate
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningReport {
    pub events: Vec<ConjunctionEvent>,
    pub summary: CampaignSummary,
}

/// Orchestrates perturbation-aware probabilistic screening
pub struct ConjunctionScreener {
    forces: PerturbationStack,
}

impl Default for ConjunctionScreener {
    fn default() -> Self {
        Self::new()
    }
}

impl ConjunctionScreener {
    /// Create with the standard perturbation environment
    pub fn new() -> Self {
        Self {
            forces: PerturbationStack::standard(SolarActivity::Moderate),
        }
    }

    /// Create with a custom perturbation stack
    pub fn with_forces(forces: PerturbationStack) -> Self {
        Self { forces }
    }

    /// Screen a single satellite pair across the sweep horizon
    pub fn screen_pair<P: StateProvider + ?Sized>(
        &self,
        provider: &P,
        satellite_a: &str,
        satellite_b: &str,
        start: DateTime<Utc>,
        request: &ScreeningRequest,
    ) -> Result<ScreeningReport> {
        self.screen_pair_observed(provider, satellite_a, satellite_b, start, request, |_| {})
    }

    /// `screen_pair` with a per-epoch observer (progress reporting)
    pub fn screen_pair_observed<P: StateProvider + ?Sized>(
        &self,
        provider: &P,
        satellite_a: &str,
        satellite_b: &str,
        start: DateTime<Utc>,
        request: &ScreeningRequest,
        mut observer: impl FnMut(DateTime<Utc>),
    ) -> Result<ScreeningReport> {
        request.validate()?;

        let mut events = Vec::new();
        for epoch in request.epochs(start) {
            let state_a = provider.state(satellite_a, epoch)?;
            let state_b = provider.state(satellite_b, epoch)?;
            let elapsed_hours = hours_between(start, epoch);

            if let Some(event) = self.evaluate_pair(
                satellite_a,
                &state_a,
                satellite_b,
                &state_b,
                epoch,
                elapsed_hours,
                request,
            )? {
                events.push(event);
                if reached_early_stop(&events, request) {
                    log::info!(
                        "Early stop after {} qualifying events",
                        events.len()
                    );
                    observer(epoch);
                    break;
                }
            }
            observer(epoch);
        }

        let summary = CampaignSummary::from_events(&events);
        Ok(ScreeningReport { events, summary })
    }

    /// Screen every unordered pair of a satellite sample
    ///
    /// Per epoch, states are binned into a spatial grid with cells sized
    /// to the threshold; only pairs within neighboring cells are
    /// distance-checked, so the scan avoids the full O(n²) comparison in
    /// dispersed constellations.
    pub fn screen_sample<P: StateProvider + ?Sized>(
        &self,
        provider: &P,
        satellite_ids: &[String],
        start: DateTime<Utc>,
        request: &ScreeningRequest,
    ) -> Result<ScreeningReport> {
        self.screen_sample_observed(provider, satellite_ids, start, request, |_| {})
    }

    /// `screen_sample` with a per-epoch observer (progress reporting)
    pub fn screen_sample_observed<P: StateProvider + ?Sized>(
        &self,
        provider: &P,
        satellite_ids: &[String],
        start: DateTime<Utc>,
        request: &ScreeningRequest,
        mut observer: impl FnMut(DateTime<Utc>),
    ) -> Result<ScreeningReport> {
        request.validate()?;
        if satellite_ids.len() < 2 {
            return Err(ConjunctionError::InvalidInput(
                "sample screening needs at least two satellites".into(),
            ));
        }

        let cell_size = request.threshold_km.max(1.0);
        let inv_cell = 1.0 / cell_size;
        let mut events = Vec::new();

        'sweep: for epoch in request.epochs(start) {
            let elapsed_hours = hours_between(start, epoch);

            // Resolve all states first; a provider failure for one object
            // drops that object from this epoch only
            let mut states: Vec<(&str, StateVector)> = Vec::with_capacity(satellite_ids.len());
            for id in satellite_ids {
                match provider.state(id, epoch) {
                    Ok(state) => states.push((id.as_str(), state)),
                    Err(e) => log::debug!("Skipping {id} at {epoch}: {e}"),
                }
            }

            let mut cells: HashMap<(i32, i32, i32), Vec<usize>> = HashMap::new();
            for (idx, (_, state)) in states.iter().enumerate() {
                cells.entry(cell_key(&state.position_km, inv_cell)).or_default().push(idx);
            }

            let cell_keys: Vec<(i32, i32, i32)> = cells.keys().copied().collect();
            for key in cell_keys {
                let list_a = match cells.get(&key) {
                    Some(list) => list,
                    None => continue,
                };

                for dz in -1..=1 {
                    for dy in -1..=1 {
                        for dx in -1..=1 {
                            let neighbor = (key.0 + dx, key.1 + dy, key.2 + dz);
                            if neighbor < key {
                                continue;
                            }
                            let list_b = match cells.get(&neighbor) {
                                Some(list) => list,
                                None => continue,
                            };

                            for (a_pos, &i) in list_a.iter().enumerate() {
                                let start_j = if neighbor == key { a_pos + 1 } else { 0 };
                                for &j in list_b.iter().skip(start_j) {
                                    let (id_a, state_a) = &states[i];
                                    let (id_b, state_b) = &states[j];

                                    if let Some(event) = self.evaluate_pair(
                                        id_a,
                                        state_a,
                                        id_b,
                                        state_b,
                                        epoch,
                                        elapsed_hours,
                                        request,
                                    )? {
                                        events.push(event);
                                        if reached_early_stop(&events, request) {
                                            log::info!(
                                                "Early stop after {} qualifying events",
                                                events.len()
                                            );
                                            observer(epoch);
                                            break 'sweep;
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            observer(epoch);
        }

        let summary = CampaignSummary::from_events(&events);
        Ok(ScreeningReport { events, summary })
    }

    /// Run the probability pipeline for one pair at one epoch, when the
    /// raw separation qualifies
    #[allow(clippy::too_many_arguments)]
    fn evaluate_pair(
        &self,
        id_a: &str,
        state_a: &StateVector,
        id_b: &str,
        state_b: &StateVector,
        epoch: DateTime<Utc>,
        elapsed_hours: f64,
        request: &ScreeningRequest,
    ) -> Result<Option<ConjunctionEvent>> {
        let distance_km = (state_a.position_km - state_b.position_km).norm();
        if !distance_km.is_finite() || distance_km >= request.threshold_km {
            return Ok(None);
        }

        let uncertainty_a = propagated_uncertainty(state_a, elapsed_hours)?;
        let uncertainty_b = propagated_uncertainty(state_b, elapsed_hours)?;

        let geometry_a =
            SatelliteGeometry::new(state_a.clone(), request.default_radius_m);
        let geometry_b =
            SatelliteGeometry::new(state_b.clone(), request.default_radius_m);

        let assessment = assess_conjunction(
            &geometry_a,
            &uncertainty_a.covariance,
            &geometry_b,
            &uncertainty_b.covariance,
        )?;

        let accel_a = self.forces.total_acceleration(state_a).norm();
        let accel_b = self.forces.total_acceleration(state_b).norm();

        log::debug!(
            "Conjunction {id_a} vs {id_b} at {epoch}: {:.3} km, p = {:.3e}, {}",
            distance_km,
            assessment.probability,
            assessment.risk.name()
        );
        for (source, accel) in self.forces.breakdown(state_a) {
            log::debug!("  {id_a} {source:?}: {:.3e} km/s²", accel.norm());
        }

        Ok(Some(ConjunctionEvent {
            satellite_a: id_a.to_string(),
            satellite_b: id_b.to_string(),
            epoch,
            hours_from_start: elapsed_hours,
            distance_km,
            assessment,
            position_uncertainty_km: [
                uncertainty_a.total_position_uncertainty_km,
                uncertainty_b.total_position_uncertainty_km,
            ],
            perturbation_accel_km_s2: [accel_a, accel_b],
        }))
    }
}

/// Regime-seeded uncertainty propagated to the elapsed epoch
fn propagated_uncertainty(
    state: &StateVector,
    elapsed_hours: f64,
) -> Result<crate::uncertainty::PropagatedUncertainty> {
    let altitude = state.altitude_km();
    let regime = OrbitRegime::classify(altitude);
    let level = PerturbationLevel::from_altitude(altitude);
    UncertaintyPropagator::for_regime(regime).propagate(elapsed_hours, state.period_hours(), level)
}

fn reached_early_stop(events: &[ConjunctionEvent], request: &ScreeningRequest) -> bool {
    request
        .early_stop_count
        .is_some_and(|limit| events.len() >= limit)
}

fn hours_between(start: DateTime<Utc>, epoch: DateTime<Utc>) -> f64 {
    (epoch - start).num_milliseconds() as f64 / 3.6e6
}

fn cell_key(pos_km: &Vector3<f64>, inv_cell: f64) -> (i32, i32, i32) {
    (
        (pos_km.x * inv_cell).floor() as i32,
        (pos_km.y * inv_cell).floor() as i32,
        (pos_km.z * inv_cell).floor() as i32,
    )
}

/// Circular orbit definition for the demo provider
#[derive(Debug, Clone, Copy)]
pub struct CircularOrbit {
    pub altitude_km: f64,
    pub inclination_rad: f64,
    pub raan_rad: f64,
    pub phase_rad: f64,
}

/// Simple circular-orbit state provider for demos and tests
///
/// Each satellite is an analytically propagated circular orbit. Real
/// deployments supply their own provider backed by an ephemeris service.
pub struct CircularOrbitProvider {
    orbits: HashMap<String, CircularOrbit>,
    reference_epoch: DateTime<Utc>,
}

impl CircularOrbitProvider {
    pub fn new(reference_epoch: DateTime<Utc>) -> Self {
        Self {
            orbits: HashMap::new(),
            reference_epoch,
        }
    }

    /// Register a satellite
    pub fn add(&mut self, id: impl Into<String>, orbit: CircularOrbit) {
        self.orbits.insert(id.into(), orbit);
    }

    /// Number of registered satellites
    pub fn len(&self) -> usize {
        self.orbits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orbits.is_empty()
    }
}

impl StateProvider for CircularOrbitProvider {
    fn state(&self, satellite_id: &str, epoch: DateTime<Utc>) -> Result<StateVector> {
        let orbit = self
            .orbits
            .get(satellite_id)
            .ok_or_else(|| ConjunctionError::UnknownSatellite(satellite_id.to_string()))?;

        let r = EARTH_RADIUS_KM + orbit.altitude_km;
        let speed = (MU_EARTH_KM3_S2 / r).sqrt();
        let mean_motion = speed / r; // rad/s

        let dt_s = (epoch - self.reference_epoch).num_milliseconds() as f64 / 1000.0;
        let theta = orbit.phase_rad + mean_motion * dt_s;

        // In-plane state, then rotate by inclination and RAAN
        let position_plane = Vector3::new(r * theta.cos(), r * theta.sin(), 0.0);
        let velocity_plane = Vector3::new(-speed * theta.sin(), speed * theta.cos(), 0.0);

        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), orbit.raan_rad)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), orbit.inclination_rad);

        Ok(StateVector::new(
            rotation * position_plane,
            rotation * velocity_plane,
            epoch,
        ))
    }
}
