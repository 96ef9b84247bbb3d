//! Synthetic smoke for the two-exit room.
//!
//! A fire near the primary exit starts at `FIRE_START_SECS` and grows into a
//! Gaussian plume that widens over time.  For each time point the extinction
//! coefficient of every cell is sampled from the plume, and a waypoint counts
//! as visible from a cell when its distance is within the sign visibility
//! computed from the mean extinction along the line of sight.

use evac_core::Point;
use evac_sim::ScenarioConfig;
use evac_visibility::{DEFAULT_MAX_VISIBILITY, GridSpec, VisibilityMap, VisibilityResult};

const CELL_SIZE:        f64 = 0.5;
const TIME_STEP_SECS:   f64 = 10.0;
const FIRE:             Point = Point::new(22.0, 12.0);
const FIRE_START_SECS:  f64 = 300.0;
const RAMP_SECS:        f64 = 200.0;
/// Peak extinction at the plume centre, 1/m.
const PEAK_EXTINCTION:  f64 = 1.5;
const INITIAL_SPREAD_M: f64 = 2.0;
const SPREAD_RATE:      f64 = 0.02;
/// Visibility factor for reflecting signs.
const SIGN_FACTOR:      f64 = 3.0;
const LINE_SAMPLES:     usize = 16;

fn extinction(time: f64, at: Point) -> f64 {
    if time < FIRE_START_SECS {
        return 0.0;
    }
    let burn = time - FIRE_START_SECS;
    let ramp = (burn / RAMP_SECS).min(1.0);
    let sigma = INITIAL_SPREAD_M + SPREAD_RATE * burn;
    PEAK_EXTINCTION * ramp * (-at.distance_2(FIRE) / (2.0 * sigma * sigma)).exp()
}

fn sign_visible(time: f64, from: Point, sign: Point) -> bool {
    let distance = from.distance(sign);
    if distance > DEFAULT_MAX_VISIBILITY {
        return false;
    }
    let mean_k = (0..=LINE_SAMPLES)
        .map(|i| extinction(time, from.lerp(sign, i as f64 / LINE_SAMPLES as f64)))
        .sum::<f64>()
        / (LINE_SAMPLES + 1) as f64;
    mean_k <= 0.0 || distance <= SIGN_FACTOR / mean_k
}

/// Build the visibility map for `scenario`, covering its whole run.
pub fn synthetic_map(scenario: &ScenarioConfig) -> VisibilityResult<VisibilityMap> {
    let extent = bounding_box(scenario);
    let grid = GridSpec {
        origin:    Point::new(0.0, 0.0),
        cell_size: CELL_SIZE,
        nx:        (extent.x / CELL_SIZE).ceil() as usize + 1,
        ny:        (extent.y / CELL_SIZE).ceil() as usize + 1,
    };
    let steps = (scenario.sim.total_secs / TIME_STEP_SECS).ceil() as usize;
    let times: Vec<f64> = (0..=steps).map(|i| i as f64 * TIME_STEP_SECS).collect();
    let signs: Vec<Point> = scenario.waypoints.points.iter().map(|w| w.position).collect();
    let centers: Vec<Point> = grid.cell_centers().collect();

    let extinction_slices = times
        .iter()
        .map(|&t| centers.iter().map(|&p| extinction(t, p) as f32).collect())
        .collect();
    let visible_slices = times
        .iter()
        .map(|&t| {
            signs
                .iter()
                .flat_map(|&sign| centers.iter().map(move |&p| sign_visible(t, p, sign)))
                .collect()
        })
        .collect();

    VisibilityMap::new(grid, times, signs, DEFAULT_MAX_VISIBILITY, extinction_slices, visible_slices)
}

/// Upper-right corner of everything the scenario places in the room.
fn bounding_box(scenario: &ScenarioConfig) -> Point {
    let points = scenario
        .waypoints
        .points
        .iter()
        .map(|w| w.position)
        .chain(scenario.nav_graph.nodes.iter().copied())
        .chain(scenario.spawn.areas.iter().map(|a| a.max));
    points.fold(Point::new(0.0, 0.0), |acc, p| Point::new(acc.x.max(p.x), acc.y.max(p.y)))
}
