//! Aircraft: flight-plan progress, scoring and landing/takeoff sequencing on
//! top of a [`Kinematics`] state.

use serde::{Deserialize, Serialize};

use skylane_core::constants::{
    kind_profile, KindProfile, DECAY_INTERVAL_SECS, INITIAL_GRACE_PERIOD,
    LANDING_ALIGNMENT_TOLERANCE, WAYPOINT_GRACE_BONUS,
};
use skylane_core::enums::{AircraftKind, Controller, TurningState};
use skylane_core::flight_plan::FlightPlan;
use skylane_core::types::Vector2D;

use crate::kinematics::{shortest_arc, Kinematics};

/// Something that happened to an aircraft during its refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightEvent {
    WaypointCaptured { index: usize },
    /// Captured the runway start of a landing plan, aligned with the runway.
    Landed,
    /// Captured the runway end of a takeoff plan and became active.
    TookOff,
    /// No waypoint remains.
    Finished,
}

/// Per-aircraft state beyond motion. Stored alongside a [`Kinematics`] component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    name: String,
    kind: AircraftKind,
    weight: f64,
    crew: u32,
    flight_plan: FlightPlan,
    score: i32,
    grace_period: u32,
    decay_rate: i32,
    /// Seconds accumulated toward the next decay event.
    decay_timer: f64,
    last_waypoint: usize,
    waypoints_hit: usize,
    violated: bool,
    finished: bool,
    active: bool,
    landed: bool,
    turning: TurningState,
    controller: Controller,
}

/// Components for a not-yet-inserted aircraft.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAircraft {
    pub kinematics: Kinematics,
    pub aircraft: Aircraft,
}

impl NewAircraft {
    pub fn new(name: impl Into<String>, kind: AircraftKind, flight_plan: FlightPlan) -> Self {
        Self::with_profile(name, kind, kind_profile(kind), flight_plan)
    }

    /// Place an aircraft at the first waypoint, heading along the first leg.
    /// A takeoff plan starts on the ground and inactive.
    pub fn with_profile(
        name: impl Into<String>,
        kind: AircraftKind,
        profile: KindProfile,
        flight_plan: FlightPlan,
    ) -> Self {
        let limits = profile.limits;
        let velocity = Vector2D::from_polar(flight_plan.initial_speed(), flight_plan.initial_heading());
        let on_runway = flight_plan.starts_on_runway();
        let altitude = if on_runway {
            limits.min_altitude
        } else {
            flight_plan.initial_altitude()
        };

        let mut kinematics = Kinematics::new(limits, flight_plan.first(), velocity, altitude);
        kinematics.set_target_altitude(flight_plan.initial_altitude());

        let aircraft = Aircraft {
            name: name.into(),
            kind,
            weight: profile.weight,
            crew: profile.crew,
            flight_plan,
            score: profile.initial_score,
            grace_period: INITIAL_GRACE_PERIOD,
            decay_rate: profile.decay_rate,
            decay_timer: 0.0,
            last_waypoint: 0,
            waypoints_hit: 0,
            violated: false,
            finished: false,
            active: !on_runway,
            landed: false,
            turning: TurningState::Straight,
            controller: Controller::default(),
        };

        Self { kinematics, aircraft }
    }
}

/// The mutable state an authoritative simulation publishes for a mirror.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplicatedState {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub target_velocity: Vector2D,
    pub altitude: f64,
    pub target_altitude: f64,
    pub turning: TurningState,
    pub last_waypoint: u32,
    pub active: bool,
    pub controller: Controller,
}

impl Aircraft {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AircraftKind {
        self.kind
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn crew(&self) -> u32 {
        self.crew
    }

    pub fn flight_plan(&self) -> &FlightPlan {
        &self.flight_plan
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn grace_period(&self) -> u32 {
        self.grace_period
    }

    pub fn decay_rate(&self) -> i32 {
        self.decay_rate
    }

    pub fn last_waypoint(&self) -> usize {
        self.last_waypoint
    }

    pub fn waypoints_hit(&self) -> usize {
        self.waypoints_hit
    }

    /// Next waypoint to capture, if any remains.
    pub fn next_waypoint(&self) -> Option<Vector2D> {
        self.flight_plan.waypoint(self.last_waypoint + 1)
    }

    pub fn is_violated(&self) -> bool {
        self.violated
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// False while waiting on a runway for takeoff and after landing.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn has_landed(&self) -> bool {
        self.landed
    }

    /// Solid aircraft take part in separation and collision checks.
    pub fn is_solid(&self) -> bool {
        self.active
    }

    pub fn turning(&self) -> TurningState {
        self.turning
    }

    pub fn controller(&self) -> Controller {
        self.controller
    }

    pub fn set_turning(&mut self, turning: TurningState) {
        self.turning = turning;
    }

    pub fn hand_over(&mut self) {
        self.controller = self.controller.other();
    }

    pub(crate) fn mark_violated(&mut self) {
        self.violated = true;
    }

    pub(crate) fn clear_violated(&mut self) {
        self.violated = false;
    }

    #[cfg(test)]
    pub(crate) fn set_grace_period(&mut self, grace_period: u32) {
        self.grace_period = grace_period;
    }

    pub fn replicated_state(&self, kinematics: &Kinematics) -> ReplicatedState {
        ReplicatedState {
            position: kinematics.position(),
            velocity: kinematics.velocity(),
            target_velocity: kinematics.target_velocity(),
            altitude: kinematics.altitude(),
            target_altitude: kinematics.target_altitude(),
            turning: self.turning,
            last_waypoint: self.last_waypoint as u32,
            active: self.active,
            controller: self.controller,
        }
    }

    /// False, with nothing changed, if the state carries non-finite motion values.
    pub fn apply_replicated_state(&mut self, kinematics: &mut Kinematics, state: &ReplicatedState) -> bool {
        let applied = kinematics.overwrite(
            state.position,
            state.velocity,
            state.target_velocity,
            state.altitude,
            state.target_altitude,
        );
        if !applied {
            return false;
        }
        self.turning = state.turning;
        self.last_waypoint = (state.last_waypoint as usize).min(self.flight_plan.len() - 1);
        self.active = state.active;
        self.controller = state.controller;
        true
    }

    /// Advance one tick: turn, move, decay score, then check waypoint capture.
    pub fn refresh(&mut self, kinematics: &mut Kinematics, dt: f64) -> Option<FlightEvent> {
        if self.turning != TurningState::Straight {
            kinematics.rotate_target(self.turning.sign() * kinematics.limits().max_turn_rate * dt);
        }
        kinematics.refresh(dt);

        self.decay_timer += dt.max(0.0);
        if self.decay_timer >= DECAY_INTERVAL_SECS {
            self.decay_score();
            self.decay_timer = 0.0;
        }

        self.violated = false;

        self.update_waypoints(kinematics)
    }

    fn decay_score(&mut self) {
        if self.violated {
            self.score -= 2 * self.decay_rate;
        } else if self.grace_period > 0 {
            self.grace_period -= 1;
        } else {
            self.score -= self.decay_rate;
        }
    }

    fn update_waypoints(&mut self, kinematics: &mut Kinematics) -> Option<FlightEvent> {
        let next = self.last_waypoint + 1;
        let Some(target) = self.flight_plan.waypoint(next) else {
            if self.finished {
                return None;
            }
            self.finished = true;
            return Some(FlightEvent::Finished);
        };

        if kinematics.position().distance_to(target) > kinematics.size() {
            return None;
        }
        if self.flight_plan.is_final_approach(next) && !self.is_aligned(kinematics) {
            return None;
        }

        self.last_waypoint = next;
        self.waypoints_hit += 1;
        self.grace_period += WAYPOINT_GRACE_BONUS;

        let plan = &self.flight_plan;
        if plan.is_landing() && next == plan.len() - 2 {
            let heading = plan.final_heading();
            kinematics.set_target_velocity(Vector2D::from_polar(kinematics.speed(), heading));
            kinematics.set_target_altitude(kinematics.limits().min_altitude);
            self.turning = TurningState::Straight;
            self.active = false;
            self.landed = true;
            return Some(FlightEvent::Landed);
        }
        if plan.starts_on_runway() && next == 1 {
            self.active = true;
            return Some(FlightEvent::TookOff);
        }
        Some(FlightEvent::WaypointCaptured { index: next })
    }

    /// Bearing within tolerance of the runway heading implied by the last leg.
    fn is_aligned(&self, kinematics: &Kinematics) -> bool {
        shortest_arc(kinematics.heading(), self.flight_plan.final_heading()).abs()
            <= LANDING_ALIGNMENT_TOLERANCE
    }
}
