//! two_exits — route choice in a room with two exits and a growing fire.
//!
//! Two groups of 40 agents wait out a 400 s premovement phase while smoke
//! builds up near the primary (right) exit.  From then on every agent
//! re-evaluates its route every 20 s and switches to the secondary (left)
//! exit once that route is clearer.  New waves refill the spawn areas every
//! 20 s.
//!
//! ```text
//! cargo run -p two_exits --release -- [scenario.json] [output-dir]
//! RUST_LOG=evac_sim=debug cargo run -p two_exits --release
//! ```

mod smoke;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use evac_behavior::diagnostics::{exposure_profile, local_visibility_series, speed_curve, waypoint_report};
use evac_core::Point;
use evac_motion::MotionEngine;
use evac_output::{SimOutputObserver, write_exposure_profile_csv, write_series_csv};
use evac_sim::ScenarioConfig;
use evac_spatial::GraphRouter;
use evac_visibility::{DEFAULT_MAX_VISIBILITY, VisibilityMap};

const DEFAULT_SCENARIO: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/scenario.json");
const DEFAULT_OUTPUT:   &str = "output/two_exits";

/// Where and when the waypoint visibility report is taken.
const REPORT_POINT:     Point = Point::new(18.51, 6.79);
const REPORT_SECS:      f64 = 16.0;
/// Where the local visibility series is sampled.
const SERIES_POINT:     Point = Point::new(5.0, 6.0);
const SPEED_CURVE_STEP: f64 = 0.5;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let mut args = std::env::args().skip(1);
    let scenario_path = args.next().map_or_else(|| PathBuf::from(DEFAULT_SCENARIO), PathBuf::from);
    let output_dir = args.next().map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), PathBuf::from);

    // 1. Scenario.
    let scenario = ScenarioConfig::load(&scenario_path)
        .with_context(|| format!("loading {}", scenario_path.display()))?;
    std::fs::create_dir_all(&output_dir)?;

    // 2. Visibility field, cached next to the output.
    let map = VisibilityMap::load_or_compute(&output_dir.join("visibility_map.json"), || {
        smoke::synthetic_map(&scenario)
    })?;
    info!(
        time_points = map.times().len(),
        cells = map.grid().cell_count(),
        waypoints = map.waypoint_count(),
        "visibility field ready"
    );
    let field = Arc::new(map);

    // 3. Diagnostics: exposure profile seen from the centre of the first
    //    spawn area, waypoint report, local visibility and speed curves.
    write_profile(&scenario, &field, &output_dir)?;
    write_diagnostics(&scenario, &field, &output_dir)?;

    // 4. Run.
    let mut sim = scenario.build_sim(field)?;
    let mut obs = SimOutputObserver::new(open_writer(&output_dir)?);
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();
    if let Some(e) = obs.take_error() {
        warn!(%e, "output incomplete");
    }

    // 5. Summary.
    let summary = serde_json::json!({
        "scenario":          scenario_path.display().to_string(),
        "final_tick":        sim.clock.current_tick.0,
        "simulated_secs":    sim.clock.elapsed_secs(),
        "waves":             sim.spawner.waves_spawned(),
        "agents_remaining":  sim.engine.active_agents().len(),
        "journey_switches":  obs.switches(),
        "skipped_decisions": obs.skipped(),
        "wall_secs":         elapsed.as_secs_f64(),
    });
    std::fs::write(output_dir.join("summary.json"), serde_json::to_string_pretty(&summary)?)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn write_profile(scenario: &ScenarioConfig, field: &VisibilityMap, dir: &Path) -> Result<()> {
    let Some(area) = scenario.spawn.areas.first() else {
        return Ok(());
    };
    let start = area.min.lerp(area.max, 0.5);
    let router = GraphRouter::new(scenario.nav_graph());
    let samples = exposure_profile(
        field,
        &router,
        &scenario.waypoint_set()?,
        &scenario.exit_pair(),
        start,
        scenario.route.visibility_factor,
        field.times(),
    )?;
    let path = dir.join("exposure_profile.csv");
    write_exposure_profile_csv(&path, &samples)?;
    info!(path = %path.display(), samples = samples.len(), %start, "exposure profile written");
    Ok(())
}

fn write_diagnostics(scenario: &ScenarioConfig, field: &VisibilityMap, dir: &Path) -> Result<()> {
    for r in waypoint_report(field, &scenario.waypoint_set()?, REPORT_POINT, REPORT_SECS)? {
        info!(
            waypoint = r.waypoint.0,
            position = %r.position,
            visible = r.visible,
            distance = r.distance,
            "waypoint seen from {REPORT_POINT} at t = {REPORT_SECS} s"
        );
    }

    let series = local_visibility_series(field, SERIES_POINT, scenario.speed.threshold, field.times())?;
    let path = dir.join("local_visibility.csv");
    write_series_csv(&path, ["time", "local_visibility"], &series)?;
    info!(path = %path.display(), samples = series.len(), at = %SERIES_POINT, "local visibility written");

    let steps = (DEFAULT_MAX_VISIBILITY / SPEED_CURVE_STEP).round() as usize;
    let visibilities: Vec<f64> = (0..=steps).map(|i| i as f64 * SPEED_CURVE_STEP).collect();
    let curve = speed_curve(&scenario.speed_model()?, &visibilities);
    let path = dir.join("speed_curve.csv");
    write_series_csv(&path, ["visibility", "desired_speed"], &curve)?;
    info!(path = %path.display(), points = curve.len(), "speed curve written");
    Ok(())
}

#[cfg(not(feature = "sqlite"))]
fn open_writer(dir: &Path) -> Result<evac_output::CsvWriter> {
    Ok(evac_output::CsvWriter::new(dir)?)
}

#[cfg(feature = "sqlite")]
fn open_writer(dir: &Path) -> Result<evac_output::SqliteWriter> {
    Ok(evac_output::SqliteWriter::new(dir)?)
}
