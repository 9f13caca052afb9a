//! conjscan CLI - screen a constellation for conjunctions or plan an
//! evasive maneuver, writing JSON reports.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use conjscan::maneuver::{plan_maneuver, ManeuverRequest};
use conjscan::screening::{
    CircularOrbit, CircularOrbitProvider, ConjunctionScreener, ScreeningReport, ScreeningRequest,
};

#[derive(Parser, Debug)]
#[command(name = "conjscan", about = "Probabilistic orbital-conjunction risk engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Screen a demo constellation for close approaches
    Screen(ScreenArgs),
    /// Plan an evasive maneuver for a given encounter
    Maneuver(ManeuverArgs),
}

#[derive(Args, Debug, Clone)]
struct ScreenArgs {
    /// Output JSON file path
    #[arg(long, default_value = "out/conjunctions.json")]
    output: PathBuf,
    /// Number of satellites in the generated sample
    #[arg(long, default_value_t = 16)]
    sample_size: usize,
    /// Distance threshold in kilometers
    #[arg(long, default_value_t = 10.0)]
    threshold_km: f64,
    /// Time horizon in days
    #[arg(long, default_value_t = 7.0)]
    horizon_days: f64,
    /// Epoch step in hours
    #[arg(long, default_value_t = 2.0)]
    step_hours: f64,
    /// Stop after this many qualifying events
    #[arg(long)]
    early_stop: Option<usize>,
    /// Seed for the generated constellation
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Args, Debug, Clone)]
struct ManeuverArgs {
    /// Relative velocity at encounter in m/s
    #[arg(long, default_value_t = 10000.0)]
    v_rel: f64,
    /// Required miss distance in meters
    #[arg(long, default_value_t = 1000.0)]
    separation: f64,
    /// Initial position uncertainty in meters
    #[arg(long, default_value_t = 100.0)]
    sigma0: f64,
    /// Uncertainty growth rate in m/s
    #[arg(long, default_value_t = 0.001)]
    growth: f64,
    /// Confidence multiplier on the uncertainty (sigma count)
    #[arg(long, default_value_t = 3.0)]
    confidence: f64,
}

#[derive(Debug, Serialize)]
struct ScreeningDocument {
    generated_at: String,
    start_epoch: DateTime<Utc>,
    sample_size: usize,
    threshold_km: f64,
    horizon_days: f64,
    step_hours: f64,
    seed: u64,
    #[serde(flatten)]
    report: ScreeningReport,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Screen(args) => run_screen(args),
        Command::Maneuver(args) => run_maneuver(args),
    }
}

fn run_screen(args: ScreenArgs) -> Result<()> {
    if args.sample_size < 2 {
        return Err(anyhow!("sample-size must be at least 2"));
    }

    let start = Utc::now();
    let provider = demo_constellation(args.seed, args.sample_size, start);
    let request = ScreeningRequest {
        threshold_km: args.threshold_km,
        horizon_days: args.horizon_days,
        step_hours: args.step_hours,
        early_stop_count: args.early_stop,
        ..Default::default()
    };

    let ids: Vec<String> = (0..args.sample_size).map(|i| format!("DEMO-{i:03}")).collect();
    let epochs = request.epochs(start);

    log::info!(
        "Screening {} satellites over {} days ({} epochs)...",
        ids.len(),
        args.horizon_days,
        epochs.len()
    );

    let progress = ProgressBar::new(epochs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{elapsed_precise} {bar:40.cyan/blue} {pos}/{len} {percent}% ETA {eta_precise}",
        )
        .unwrap()
        .progress_chars("##-"),
    );

    let screener = ConjunctionScreener::new();
    let report =
        screener.screen_sample_observed(&provider, &ids, start, &request, |_| progress.inc(1))?;
    progress.finish_and_clear();

    log::info!(
        "{} conjunction events, aggregate risk {}",
        report.summary.total_events,
        report.summary.aggregate_risk.name()
    );
    if let Some(closest) = &report.summary.closest {
        log::info!(
            "Closest approach: {} vs {} at {} ({:.3} km, perturbation accel {:.3e} km/s²)",
            closest.satellite_a,
            closest.satellite_b,
            closest.epoch,
            closest.distance_km,
            closest.perturbation_accel_km_s2[0]
        );
    }

    let document = ScreeningDocument {
        generated_at: Utc::now().to_rfc3339(),
        start_epoch: start,
        sample_size: args.sample_size,
        threshold_km: args.threshold_km,
        horizon_days: args.horizon_days,
        step_hours: args.step_hours,
        seed: args.seed,
        report,
    };

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(&args.output)?;
    serde_json::to_writer_pretty(file, &document)?;

    log::info!("Wrote screening report to {:?}", args.output);
    Ok(())
}

fn run_maneuver(args: ManeuverArgs) -> Result<()> {
    let request = ManeuverRequest {
        v_rel_m_s: args.v_rel,
        required_separation_m: args.separation,
        sigma0_m: args.sigma0,
        uncertainty_growth_m_s: args.growth,
        confidence_factor: args.confidence,
    };

    let outcome = plan_maneuver(&request)?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

/// Generate a seeded constellation of circular orbits clustered into a
/// few altitude shells so some pairs actually approach each other
fn demo_constellation(
    seed: u64,
    count: usize,
    epoch: DateTime<Utc>,
) -> CircularOrbitProvider {
    let mut state = seed;
    let mut next = move || {
        // splitmix64
        state = state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        (z ^ (z >> 31)) as f64 / u64::MAX as f64
    };

    const SHELLS_KM: [f64; 4] = [420.0, 550.0, 780.0, 1200.0];

    let mut provider = CircularOrbitProvider::new(epoch);
    for i in 0..count {
        let shell = SHELLS_KM[i % SHELLS_KM.len()];
        provider.add(
            format!("DEMO-{i:03}"),
            CircularOrbit {
                // Jitter within the shell keeps separations small but non-zero
                altitude_km: shell + (next() - 0.5) * 4.0,
                inclination_rad: 0.9 + (next() - 0.5) * 0.02,
                raan_rad: (next() - 0.5) * 0.01,
                phase_rad: next() * 0.02,
            },
        );
    }
    provider
}
