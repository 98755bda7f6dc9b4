//! Rate-limited motion toward an operator-set target velocity and altitude.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use skylane_core::constants::KinematicLimits;
use skylane_core::types::Vector2D;

/// Current and desired motion state of one object, bounded by its kind's limits.
///
/// After every [`Kinematics::refresh`] the speed and altitude lie within the
/// limits; the target setters clamp out-of-range requests silently and ignore
/// non-finite ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    position: Vector2D,
    velocity: Vector2D,
    altitude: f64,
    target_velocity: Vector2D,
    target_altitude: f64,
    limits: KinematicLimits,
}

impl Kinematics {
    /// Initial speed and altitude are clamped into the limits; the targets
    /// start equal to the current state.
    pub fn new(limits: KinematicLimits, position: Vector2D, velocity: Vector2D, altitude: f64) -> Self {
        let velocity = clamp_speed(velocity, &limits);
        let altitude = clamp_altitude(altitude, &limits);
        let position = if position.is_finite() { position } else { Vector2D::ZERO };
        Self {
            position,
            velocity,
            altitude,
            target_velocity: velocity,
            target_altitude: altitude,
            limits,
        }
    }

    pub fn position(&self) -> Vector2D {
        self.position
    }

    pub fn velocity(&self) -> Vector2D {
        self.velocity
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Direction of travel in (−π, π].
    pub fn heading(&self) -> f64 {
        self.velocity.angle()
    }

    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn target_velocity(&self) -> Vector2D {
        self.target_velocity
    }

    pub fn target_speed(&self) -> f64 {
        self.target_velocity.length()
    }

    pub fn target_altitude(&self) -> f64 {
        self.target_altitude
    }

    pub fn limits(&self) -> &KinematicLimits {
        &self.limits
    }

    /// Collision radius.
    pub fn size(&self) -> f64 {
        self.limits.size
    }

    /// Store a new target velocity, rescaled onto the speed bounds if needed.
    pub fn set_target_velocity(&mut self, target: Vector2D) {
        if target.is_finite() {
            self.target_velocity = clamp_speed(target, &self.limits);
        }
    }

    pub fn set_target_altitude(&mut self, target: f64) {
        if target.is_finite() {
            self.target_altitude = target.clamp(self.limits.min_altitude, self.limits.max_altitude);
        }
    }

    /// Rotate the target velocity in place.
    pub fn rotate_target(&mut self, theta: f64) {
        if theta.is_finite() {
            self.target_velocity = self.target_velocity.rotate(theta);
        }
    }

    pub fn set_position(&mut self, position: Vector2D) {
        if position.is_finite() {
            self.position = position;
        }
    }

    /// Overwrite the whole motion state with values computed elsewhere
    /// (replicated from an authoritative simulation). A state containing any
    /// non-finite value is rejected and leaves `self` untouched.
    pub fn overwrite(
        &mut self,
        position: Vector2D,
        velocity: Vector2D,
        target_velocity: Vector2D,
        altitude: f64,
        target_altitude: f64,
    ) -> bool {
        let finite = position.is_finite()
            && velocity.is_finite()
            && target_velocity.is_finite()
            && altitude.is_finite()
            && target_altitude.is_finite();
        if !finite {
            return false;
        }
        self.position = position;
        self.velocity = velocity;
        self.target_velocity = target_velocity;
        self.altitude = altitude;
        self.target_altitude = target_altitude;
        true
    }

    /// Advance one tick: altitude, then speed and heading, then position.
    pub fn refresh(&mut self, dt: f64) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let limits = self.limits;

        if self.altitude != self.target_altitude {
            let step = limits.ascent_rate * dt;
            self.altitude += (self.target_altitude - self.altitude).clamp(-step, step);
        }
        self.altitude = self.altitude.clamp(limits.min_altitude, limits.max_altitude);

        let accel_step = limits.max_acceleration * dt;
        let mut speed = self.velocity.length();
        speed += (self.target_velocity.length() - speed).clamp(-accel_step, accel_step);
        let speed = speed.clamp(limits.min_speed, limits.max_speed);

        let angle = self.velocity.angle();
        let turn_step = limits.max_turn_rate * dt;
        let turn = shortest_arc(angle, self.target_velocity.angle()).clamp(-turn_step, turn_step);

        self.velocity = Vector2D::from_polar(speed, angle + turn);
        self.position = self.position + self.velocity * dt;
    }
}

/// Signed rotation from `from` to `to` along the shorter arc, in (−π, π].
///
/// A raw difference larger than π in magnitude is the long way around; wrapping
/// it flips the direction of travel.
pub fn shortest_arc(from: f64, to: f64) -> f64 {
    let diff = (to - from).rem_euclid(TAU);
    if diff > PI {
        diff - TAU
    } else {
        diff
    }
}

fn clamp_altitude(altitude: f64, limits: &KinematicLimits) -> f64 {
    if altitude.is_finite() {
        altitude.clamp(limits.min_altitude, limits.max_altitude)
    } else {
        limits.min_altitude
    }
}

/// Rescale `v` so its length lies within the speed bounds. A zero or
/// non-finite vector has no usable direction and is stretched along angle 0.
fn clamp_speed(v: Vector2D, limits: &KinematicLimits) -> Vector2D {
    let length = v.length();
    if !length.is_finite() {
        return Vector2D::from_polar(limits.min_speed, 0.0);
    }
    if length < limits.min_speed {
        if length == 0.0 {
            Vector2D::from_polar(limits.min_speed, 0.0)
        } else {
            v.scale(limits.min_speed / length)
        }
    } else if length > limits.max_speed {
        v.scale(limits.max_speed / length)
    } else {
        v
    }
}
