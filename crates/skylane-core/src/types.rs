//! Fundamental geometric types: vectors, rectangles and runways.

use std::f64::consts::PI;
use std::ops::{Add, Mul, Neg, Sub};

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Default tolerance for [`Vector2D::approx_eq`].
pub const VECTOR_EPSILON: f64 = 1e-9;

/// Immutable 2D vector in world units.
///
/// Angles are measured from the positive X axis; positive angles point toward
/// positive Y. `PartialEq` compares exact values and is fragile under
/// floating-point error, so compare independently computed vectors with
/// [`Vector2D::approx_eq`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector2D(DVec2);

impl Vector2D {
    pub const ZERO: Self = Self(DVec2::ZERO);

    pub const fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }

    /// Vector of the given length pointing along `angle` (radians).
    pub fn from_polar(length: f64, angle: f64) -> Self {
        Self(DVec2::from_angle(angle) * length)
    }

    pub fn x(self) -> f64 {
        self.0.x
    }

    pub fn y(self) -> f64 {
        self.0.y
    }

    pub fn scale(self, factor: f64) -> Self {
        Self(self.0 * factor)
    }

    /// Standard counter-clockwise rotation by `theta` radians.
    pub fn rotate(self, theta: f64) -> Self {
        Self(DVec2::from_angle(theta).rotate(self.0))
    }

    pub fn length(self) -> f64 {
        self.0.length()
    }

    /// Angle of the vector in (−π, π]. The zero vector has angle 0.
    pub fn angle(self) -> f64 {
        let angle = self.0.y.atan2(self.0.x);
        if angle <= -PI {
            PI
        } else {
            angle
        }
    }

    /// Euclidean distance between two points.
    pub fn distance_to(self, other: Vector2D) -> f64 {
        self.0.distance(other.0)
    }

    /// Component-wise comparison within `epsilon`.
    pub fn approx_eq(self, other: Vector2D, epsilon: f64) -> bool {
        self.0.abs_diff_eq(other.0, epsilon)
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    pub fn as_dvec2(self) -> DVec2 {
        self.0
    }
}

impl From<DVec2> for Vector2D {
    fn from(v: DVec2) -> Self {
        Self(v)
    }
}

impl From<(f64, f64)> for Vector2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Vector2D {
    type Output = Vector2D;

    fn add(self, rhs: Vector2D) -> Vector2D {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Vector2D {
    type Output = Vector2D;

    fn sub(self, rhs: Vector2D) -> Vector2D {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Vector2D;

    fn mul(self, rhs: f64) -> Vector2D {
        self.scale(rhs)
    }
}

impl Neg for Vector2D {
    type Output = Vector2D;

    fn neg(self) -> Vector2D {
        Self(-self.0)
    }
}

/// Axis-aligned rectangle stored as normalized (min, max) corners.
///
/// Construction from any two opposite corners yields the same stored pair,
/// including when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RectangleCorners")]
pub struct Rectangle {
    min: Vector2D,
    max: Vector2D,
}

#[derive(Deserialize)]
struct RectangleCorners {
    min: Vector2D,
    max: Vector2D,
}

impl From<RectangleCorners> for Rectangle {
    fn from(corners: RectangleCorners) -> Self {
        Rectangle::new(corners.min, corners.max)
    }
}

impl Rectangle {
    pub fn new(a: Vector2D, b: Vector2D) -> Self {
        Self {
            min: Vector2D::new(a.x().min(b.x()), a.y().min(b.y())),
            max: Vector2D::new(a.x().max(b.x()), a.y().max(b.y())),
        }
    }

    pub fn min(&self) -> Vector2D {
        self.min
    }

    pub fn max(&self) -> Vector2D {
        self.max
    }

    pub fn width(&self) -> f64 {
        self.max.x() - self.min.x()
    }

    pub fn height(&self) -> f64 {
        self.max.y() - self.min.y()
    }

    /// Edges count as inside.
    pub fn contains(&self, point: Vector2D) -> bool {
        point.x() >= self.min.x()
            && point.x() <= self.max.x()
            && point.y() >= self.min.y()
            && point.y() <= self.max.y()
    }

    /// True if the rectangles overlap or touch.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.min.x() <= other.max.x()
            && other.min.x() <= self.max.x()
            && self.min.y() <= other.max.y()
            && other.min.y() <= self.max.y()
    }

    /// True if any point of the rectangle lies within `radius` of `center`.
    pub fn intersects_circle(&self, center: Vector2D, radius: f64) -> bool {
        let closest = center.as_dvec2().clamp(self.min.as_dvec2(), self.max.as_dvec2());
        Vector2D::from(closest).distance_to(center) <= radius
    }
}

/// A runway: used as a landing approach (start then end) and as a takeoff origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Runway {
    pub start: Vector2D,
    pub end: Vector2D,
}

impl Runway {
    pub fn new(start: Vector2D, end: Vector2D) -> Self {
        Self { start, end }
    }

    /// Heading from start to end, in (−π, π].
    pub fn heading(&self) -> f64 {
        (self.end - self.start).angle()
    }
}
