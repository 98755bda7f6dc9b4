//! Spawning strategies: the seam between the airspace and whatever decides
//! when and where new traffic appears.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use skylane_core::config::GeneratorConfig;
use skylane_core::enums::AircraftKind;
use skylane_core::flight_plan::FlightPlan;

use crate::aircraft::NewAircraft;
use crate::airspace::Airspace;
use crate::generator::FlightPlanGenerator;

/// Produces at most one new aircraft per call.
pub trait Spawner: Send {
    /// Called once per tick before the airspace advances.
    fn spawn(&mut self, airspace: &Airspace, dt: f64) -> Option<NewAircraft>;

    /// Called on an explicit takeoff request.
    fn take_off(&mut self, _airspace: &Airspace) -> Option<NewAircraft> {
        None
    }
}

impl<F> Spawner for F
where
    F: FnMut(&Airspace, f64) -> Option<NewAircraft> + Send,
{
    fn spawn(&mut self, airspace: &Airspace, dt: f64) -> Option<NewAircraft> {
        self(airspace, dt)
    }
}

/// Rate limiting for automatic arrivals.
#[derive(Debug, Clone)]
pub struct ArrivalSchedule {
    since_last: f64,
    min_interval: f64,
    max_aircraft: usize,
    rate_per_sec: f64,
}

impl ArrivalSchedule {
    /// The first arrival is not held back by the minimum interval.
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            since_last: config.min_inter_arrival_secs,
            min_interval: config.min_inter_arrival_secs,
            max_aircraft: config.max_aircraft,
            rate_per_sec: config.arrival_rate_per_sec,
        }
    }

    pub fn since_last(&self) -> f64 {
        self.since_last
    }

    pub fn advance(&mut self, dt: f64) {
        self.since_last += dt.max(0.0);
    }

    /// Whether an arrival may happen this tick. Refuses inside the minimum
    /// interval, at the population cap, and otherwise with probability
    /// `1 - dt * rate`.
    pub fn should_spawn(&self, population: usize, dt: f64, rng: &mut ChaCha8Rng) -> bool {
        if self.since_last < self.min_interval || population >= self.max_aircraft {
            return false;
        }
        rng.gen::<f64>() < dt * self.rate_per_sec
    }

    pub fn record_arrival(&mut self) {
        self.since_last = 0.0;
    }
}

/// The default spawner: random arrivals on a schedule plus on-demand takeoffs.
#[derive(Debug, Clone)]
pub struct TrafficSpawner {
    generator: FlightPlanGenerator,
    schedule: ArrivalSchedule,
    rng: ChaCha8Rng,
    next_callsign: u32,
}

impl TrafficSpawner {
    /// Same seed and same inputs produce the same traffic.
    pub fn new(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            schedule: ArrivalSchedule::new(&config),
            generator: FlightPlanGenerator::new(config),
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_callsign: 1,
        }
    }

    pub fn schedule(&self) -> &ArrivalSchedule {
        &self.schedule
    }

    fn make_aircraft(&mut self, plan: FlightPlan) -> NewAircraft {
        let kind = AircraftKind::ALL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or_default();
        let prefix = match kind {
            AircraftKind::Airliner => "SKY",
            AircraftKind::Jet => "JET",
            AircraftKind::Prop => "PRP",
        };
        let name = format!("{prefix}{:03}", self.next_callsign);
        self.next_callsign += 1;
        NewAircraft::new(name, kind, plan)
    }
}

impl Spawner for TrafficSpawner {
    fn spawn(&mut self, airspace: &Airspace, dt: f64) -> Option<NewAircraft> {
        self.schedule.advance(dt);
        if !self.schedule.should_spawn(airspace.active_count(), dt, &mut self.rng) {
            return None;
        }
        let plan = self.generator.generate(airspace, &mut self.rng)?;
        self.schedule.record_arrival();
        trace!(waypoints = plan.len(), landing = plan.is_landing(), "arrival");
        Some(self.make_aircraft(plan))
    }

    fn take_off(&mut self, airspace: &Airspace) -> Option<NewAircraft> {
        let plan = self.generator.generate_takeoff(airspace.config(), &mut self.rng)?;
        Some(self.make_aircraft(plan))
    }
}
