//! Flight-plan generator: a constrained random walk over the waypoint graph.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use skylane_core::config::{AirspaceConfig, GeneratorConfig};
use skylane_core::flight_plan::FlightPlan;
use skylane_core::types::Vector2D;

use crate::airspace::Airspace;

/// Builds flight plans for arriving and departing traffic.
#[derive(Debug, Clone)]
pub struct FlightPlanGenerator {
    config: GeneratorConfig,
    /// Round-robin cursor over the runways for takeoff plans.
    next_runway: usize,
}

impl FlightPlanGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            next_runway: 0,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// An arrival plan for the current state of `airspace`.
    pub fn generate(&self, airspace: &Airspace, rng: &mut ChaCha8Rng) -> Option<FlightPlan> {
        self.generate_with(airspace.config(), &airspace.solid_positions(), rng)
    }

    /// An arrival plan entering at a point with no `occupied` position within
    /// the safe entry distance. `None` if every entry point is blocked.
    pub fn generate_with(
        &self,
        map: &AirspaceConfig,
        occupied: &[Vector2D],
        rng: &mut ChaCha8Rng,
    ) -> Option<FlightPlan> {
        let cfg = &self.config;
        let safe_entries: Vec<Vector2D> = map
            .entry_exits
            .iter()
            .copied()
            .filter(|&p| occupied.iter().all(|&o| o.distance_to(p) >= cfg.min_safe_entry_distance))
            .collect();
        let Some(&entry) = safe_entries.choose(rng) else {
            trace!("every entry point is occupied");
            return None;
        };

        let landing = cfg.allow_landing
            && !map.runways.is_empty()
            && cfg.max_waypoints >= 2
            && rng.gen_bool(cfg.landing_probability.clamp(0.0, 1.0));

        let mut path = vec![entry];
        let endpoints = if landing { 3 } else { 2 };
        self.walk(map, &mut path, endpoints, rng);
        if path.len() < 2 {
            trace!(?entry, "no waypoint within hop distance of entry");
            return None;
        }

        if landing {
            let runway = map.runways.choose(rng)?;
            path.push(runway.start);
            path.push(runway.end);
        } else {
            path.push(nearest_exit(map, path[path.len() - 1], Some(entry))?);
        }

        self.finish(path, landing, false, rng)
    }

    /// A departure plan starting on the next runway in rotation.
    pub fn generate_takeoff(&mut self, map: &AirspaceConfig, rng: &mut ChaCha8Rng) -> Option<FlightPlan> {
        if map.runways.is_empty() {
            return None;
        }
        let runway = map.runways[self.next_runway % map.runways.len()];
        self.next_runway = (self.next_runway + 1) % map.runways.len();

        let mut path = vec![runway.start, runway.end];
        self.walk(map, &mut path, 3, rng);
        path.push(nearest_exit(map, path[path.len() - 1], None)?);

        self.finish(path, false, true, rng)
    }

    /// Extend `path` with unvisited waypoints, each within hop distance of the
    /// tail. The count is chosen so the finished plan, including its
    /// `endpoints` entry/exit/runway points, has between min+2 and max+2
    /// waypoints. Stops early when no candidate remains.
    fn walk(&self, map: &AirspaceConfig, path: &mut Vec<Vector2D>, endpoints: usize, rng: &mut ChaCha8Rng) {
        let cfg = &self.config;
        let upper = (cfg.max_waypoints + 2).saturating_sub(endpoints);
        let lower = (cfg.min_waypoints + 2).saturating_sub(endpoints).max(1).min(upper);
        let count = rng.gen_range(lower..=upper);

        let mut visited = vec![false; map.waypoints.len()];
        for _ in 0..count {
            let tail = path[path.len() - 1];
            let candidates: Vec<usize> = (0..map.waypoints.len())
                .filter(|&i| !visited[i] && map.waypoints[i].distance_to(tail) <= cfg.max_hop_distance)
                .collect();
            let Some(&next) = candidates.choose(rng) else {
                break;
            };
            visited[next] = true;
            path.push(map.waypoints[next]);
        }
    }

    fn finish(
        &self,
        path: Vec<Vector2D>,
        landing: bool,
        start_on_runway: bool,
        rng: &mut ChaCha8Rng,
    ) -> Option<FlightPlan> {
        let speed = *self.config.speeds.choose(rng)?;
        let altitude = *self.config.altitudes.choose(rng)?;
        FlightPlan::new(path, speed, altitude, landing, start_on_runway).ok()
    }
}

/// The entry/exit point closest to `tail`, other than `exclude`.
fn nearest_exit(map: &AirspaceConfig, tail: Vector2D, exclude: Option<Vector2D>) -> Option<Vector2D> {
    map.entry_exits
        .iter()
        .copied()
        .filter(|&p| Some(p) != exclude)
        .min_by(|a, b| a.distance_to(tail).total_cmp(&b.distance_to(tail)))
}
