use std::f64::consts::{FRAC_PI_2, PI};

use crate::config::{AirspaceConfig, GeneratorConfig};
use crate::constants::*;
use crate::enums::*;
use crate::error::ConfigError;
use crate::flight_plan::FlightPlan;
use crate::types::{Rectangle, Runway, Vector2D, VECTOR_EPSILON};

// ---- Vector2D ----

#[test]
fn test_vector_arithmetic() {
    let a = Vector2D::new(3.0, 4.0);
    let b = Vector2D::new(1.0, -2.0);
    assert_eq!(a + b, Vector2D::new(4.0, 2.0));
    assert_eq!(a - b, Vector2D::new(2.0, 6.0));
    assert_eq!(a.scale(2.0), Vector2D::new(6.0, 8.0));
    assert_eq!(a * 0.5, Vector2D::new(1.5, 2.0));
    assert_eq!(-b, Vector2D::new(-1.0, 2.0));
    assert!((a.length() - 5.0).abs() < 1e-12);
    assert!((a.distance_to(b) - (4.0f64 + 36.0).sqrt()).abs() < 1e-12);
}

#[test]
fn test_vector_angle_convention() {
    assert!((Vector2D::new(1.0, 0.0).angle() - 0.0).abs() < 1e-12);
    assert!((Vector2D::new(0.0, 1.0).angle() - FRAC_PI_2).abs() < 1e-12);
    assert!((Vector2D::new(0.0, -1.0).angle() + FRAC_PI_2).abs() < 1e-12);
    // Negative X axis maps to +π, never −π.
    assert_eq!(Vector2D::new(-1.0, 0.0).angle(), PI);
    assert_eq!(Vector2D::new(-1.0, -0.0).angle(), PI);
}

#[test]
fn test_vector_rotate() {
    let v = Vector2D::new(10.0, 0.0).rotate(FRAC_PI_2);
    assert!(v.approx_eq(Vector2D::new(0.0, 10.0), VECTOR_EPSILON));

    let back = v.rotate(-FRAC_PI_2);
    assert!(back.approx_eq(Vector2D::new(10.0, 0.0), VECTOR_EPSILON));
    assert!((back.length() - 10.0).abs() < 1e-9);
}

#[test]
fn test_vector_from_polar() {
    let v = Vector2D::from_polar(20.0, PI / 4.0);
    assert!((v.length() - 20.0).abs() < 1e-9);
    assert!((v.angle() - PI / 4.0).abs() < 1e-9);
}

#[test]
fn test_vector_approx_eq_tolerates_rounding() {
    let a = Vector2D::new(0.1 + 0.2, 1.0);
    let b = Vector2D::new(0.3, 1.0);
    assert_ne!(a, b);
    assert!(a.approx_eq(b, VECTOR_EPSILON));
    assert!(!a.approx_eq(Vector2D::new(0.31, 1.0), VECTOR_EPSILON));
}

// ---- Rectangle ----

#[test]
fn test_rectangle_normalization_is_order_independent() {
    let corners = [
        (Vector2D::new(0.0, 0.0), Vector2D::new(10.0, 5.0)),
        (Vector2D::new(10.0, 5.0), Vector2D::new(0.0, 0.0)),
        (Vector2D::new(0.0, 5.0), Vector2D::new(10.0, 0.0)),
        (Vector2D::new(10.0, 0.0), Vector2D::new(0.0, 5.0)),
    ];
    for (a, b) in corners {
        let r = Rectangle::new(a, b);
        assert_eq!(r.min(), Vector2D::new(0.0, 0.0));
        assert_eq!(r.max(), Vector2D::new(10.0, 5.0));
        assert_eq!(r.width(), 10.0);
        assert_eq!(r.height(), 5.0);
        // Rebuilding from the stored corners changes nothing.
        assert_eq!(Rectangle::new(r.max(), r.min()), r);
    }
}

#[test]
fn test_rectangle_contains_edges() {
    let r = Rectangle::new(Vector2D::new(0.0, 0.0), Vector2D::new(100.0, 50.0));
    assert!(r.contains(Vector2D::new(0.0, 0.0)));
    assert!(r.contains(Vector2D::new(100.0, 50.0)));
    assert!(r.contains(Vector2D::new(50.0, 25.0)));
    assert!(!r.contains(Vector2D::new(100.1, 25.0)));
    assert!(!r.contains(Vector2D::new(50.0, -0.1)));
}

#[test]
fn test_rectangle_intersections() {
    let r = Rectangle::new(Vector2D::new(0.0, 0.0), Vector2D::new(100.0, 50.0));
    let overlapping = Rectangle::new(Vector2D::new(90.0, 40.0), Vector2D::new(200.0, 200.0));
    let apart = Rectangle::new(Vector2D::new(101.0, 0.0), Vector2D::new(200.0, 50.0));
    assert!(r.intersects(&overlapping));
    assert!(overlapping.intersects(&r));
    assert!(!r.intersects(&apart));

    assert!(r.intersects_circle(Vector2D::new(50.0, 25.0), 1.0));
    assert!(r.intersects_circle(Vector2D::new(110.0, 25.0), 10.0));
    assert!(!r.intersects_circle(Vector2D::new(110.0, 25.0), 9.9));
    // Corner distance is diagonal, not per axis.
    assert!(!r.intersects_circle(Vector2D::new(107.0, 57.0), 9.0));
    assert!(r.intersects_circle(Vector2D::new(107.0, 57.0), 10.0));
}

#[test]
fn test_rectangle_deserialize_normalizes() {
    let json = r#"{"min":[10.0,5.0],"max":[0.0,0.0]}"#;
    let r: Rectangle = serde_json::from_str(json).unwrap();
    assert_eq!(r.min(), Vector2D::new(0.0, 0.0));
    assert_eq!(r.max(), Vector2D::new(10.0, 5.0));
}

#[test]
fn test_runway_heading() {
    let east = Runway::new(Vector2D::new(0.0, 0.0), Vector2D::new(10.0, 0.0));
    let west = Runway::new(Vector2D::new(10.0, 0.0), Vector2D::new(0.0, 0.0));
    assert!(east.heading().abs() < 1e-12);
    assert_eq!(west.heading(), PI);
}

// ---- FlightPlan ----

#[test]
fn test_flight_plan_requires_two_waypoints() {
    let err = FlightPlan::new(vec![Vector2D::ZERO], 30.0, 20_000.0, false, false).unwrap_err();
    assert!(matches!(err, ConfigError::TooFewWaypoints { count: 1 }));

    let err = FlightPlan::new(Vec::new(), 30.0, 20_000.0, false, false).unwrap_err();
    assert!(matches!(err, ConfigError::TooFewWaypoints { count: 0 }));
}

#[test]
fn test_flight_plan_accessors() {
    let plan = FlightPlan::new(
        vec![
            Vector2D::new(0.0, 0.0),
            Vector2D::new(100.0, 100.0),
            Vector2D::new(200.0, 100.0),
        ],
        40.0,
        24_000.0,
        true,
        false,
    )
    .unwrap();
    assert_eq!(plan.len(), 3);
    assert_eq!(plan.first(), Vector2D::new(0.0, 0.0));
    assert_eq!(plan.last(), Vector2D::new(200.0, 100.0));
    assert!((plan.initial_heading() - PI / 4.0).abs() < 1e-12);
    assert!(plan.final_heading().abs() < 1e-12);
    assert!(!plan.is_final_approach(0));
    assert!(plan.is_final_approach(1));
    assert!(plan.is_final_approach(2));
    assert_eq!(plan.waypoint(3), None);
}

#[test]
fn test_flight_plan_deserialize_rejects_short_route() {
    let json = r#"{"waypoints":[[0.0,0.0]],"initial_speed":30.0,"initial_altitude":1.0,"landing":false,"start_on_runway":false}"#;
    assert!(serde_json::from_str::<FlightPlan>(json).is_err());

    let json = r#"{"waypoints":[[0.0,0.0],[5.0,5.0]],"initial_speed":30.0,"initial_altitude":1.0,"landing":false,"start_on_runway":false}"#;
    let plan: FlightPlan = serde_json::from_str(json).unwrap();
    assert_eq!(plan.len(), 2);
}

// ---- Config ----

#[test]
fn test_default_airspace_config_is_valid() {
    let config = AirspaceConfig::default();
    config.validate().unwrap();
    assert_eq!(config.waypoints.len(), WAYPOINTS.len());
    assert_eq!(config.entry_exits.len(), ENTRY_EXITS.len());
    assert_eq!(config.runways.len(), RUNWAYS.len());
    for &p in config.entry_exits.iter().chain(config.waypoints.iter()) {
        assert!(config.bounds.contains(p), "{p:?} outside world bounds");
    }
}

#[test]
fn test_airspace_config_json_round_trip() {
    let config = AirspaceConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let back = AirspaceConfig::from_json(&json).unwrap();
    assert_eq!(config, back);
}

#[test]
fn test_airspace_config_rejects_bad_values() {
    let mut config = AirspaceConfig::default();
    config.entry_exits.truncate(1);
    let json = serde_json::to_string(&config).unwrap();
    assert!(matches!(
        AirspaceConfig::from_json(&json),
        Err(ConfigError::TooFewEntryPoints { count: 1 })
    ));

    assert!(matches!(
        AirspaceConfig::from_json("{not json"),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn test_generator_config_validation() {
    GeneratorConfig::default().validate().unwrap();

    let config = GeneratorConfig {
        min_waypoints: 4,
        max_waypoints: 3,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::WaypointRange { min: 4, max: 3 })
    ));

    let config = GeneratorConfig {
        speeds: Vec::new(),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::EmptyChoiceSet("speeds"))
    ));

    let config = GeneratorConfig {
        landing_probability: f64::NAN,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NonFinite("landing_probability"))
    ));

    let config = GeneratorConfig {
        speeds: vec![30.0, f64::INFINITY],
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::NonFinite("speeds"))));

    let json = serde_json::to_string(&GeneratorConfig::default()).unwrap();
    assert_eq!(
        GeneratorConfig::from_json(&json).unwrap(),
        GeneratorConfig::default()
    );
}

// ---- Capability table ----

#[test]
fn test_kind_profiles_are_consistent() {
    for kind in AircraftKind::ALL {
        let profile = kind_profile(kind);
        let limits = profile.limits;
        assert!(limits.min_speed > 0.0 && limits.min_speed < limits.max_speed);
        assert!(limits.min_altitude < limits.max_altitude);
        assert!(limits.size > 0.0);
        assert!(profile.decay_rate > 0);
        assert!(profile.initial_score > 0);
    }
}

#[test]
fn test_turning_state_sign() {
    assert_eq!(TurningState::Straight.sign(), 0.0);
    assert_eq!(TurningState::Left.sign(), 1.0);
    assert_eq!(TurningState::Right.sign(), -1.0);
    assert_eq!(Controller::Server.other(), Controller::Client);
}
