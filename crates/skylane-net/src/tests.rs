//! Codec, id map, and loopback endpoint tests.

use std::time::Duration;

use tokio::runtime::Handle;

use skylane_core::config::AirspaceConfig;
use skylane_core::enums::{AircraftKind, Controller, EndpointState, TurningState};
use skylane_core::flight_plan::FlightPlan;
use skylane_core::types::Vector2D;
use skylane_sim::aircraft::{NewAircraft, ReplicatedState};
use skylane_sim::Airspace;

use crate::codec::{self, CodecError};
use crate::config::NetConfig;
use crate::endpoint::{ClientEndpoint, Endpoint, ServerEndpoint, SinglePlayerEndpoint};
use crate::error::NetError;
use crate::id_map::IdMap;
use crate::protocol::*;

const DT: f64 = 0.05;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn cruising(name: &str, from: (f64, f64), to: (f64, f64), altitude: f64) -> NewAircraft {
    let plan = FlightPlan::new(vec![from.into(), to.into()], 30.0, altitude, false, false).unwrap();
    NewAircraft::new(name, AircraftKind::Airliner, plan)
}

/// An airspace that spawns `aircraft` one per tick, in order.
fn scripted(mut aircraft: Vec<NewAircraft>) -> Airspace {
    aircraft.reverse();
    Airspace::new(AirspaceConfig::default(), move |_: &Airspace, _: f64| aircraft.pop())
}

fn test_config() -> NetConfig {
    NetConfig {
        port: 0,
        connect_timeout_ms: 2000,
        ..Default::default()
    }
}

fn start(airspace: Airspace, client_version: u32) -> (ServerEndpoint, ClientEndpoint) {
    let handle = Handle::current();
    let server = ServerEndpoint::listen(&handle, &test_config(), airspace).unwrap();
    let client_config = NetConfig {
        port: server.local_addr().port(),
        protocol_version: client_version,
        ..test_config()
    };
    let client = ClientEndpoint::connect(&handle, "127.0.0.1", &client_config, AirspaceConfig::default());
    (server, client)
}

/// Run frames on both endpoints until `done` holds. False on timeout.
async fn pump(
    server: &mut ServerEndpoint,
    client: &mut ClientEndpoint,
    done: impl Fn(&ServerEndpoint, &ClientEndpoint) -> bool,
) -> bool {
    for _ in 0..400 {
        server.act_begin();
        client.act_begin();
        server.act_end(DT);
        client.act_end(DT);
        if done(server, client) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}

fn both_connected(server: &ServerEndpoint, client: &ClientEndpoint) -> bool {
    server.state() == EndpointState::Connected && client.state() == EndpointState::Connected
}

// ---- Codec ----

#[test]
fn test_version_frame_is_fixed() {
    assert_eq!(codec::encode(&Message::Version(7)).unwrap(), vec![0, 0, 0, 0, 7]);
    // Any version decodes, whatever this build's protocol is.
    assert_eq!(
        codec::decode(&[0, 0, 0, 1, 0]).unwrap(),
        Message::Version(256)
    );
    assert!(matches!(
        codec::decode(&[0, 1]),
        Err(CodecError::TruncatedVersion)
    ));
}

#[test]
fn test_codec_aircraft_messages() {
    let plan = FlightPlan::new(
        vec![Vector2D::new(0.0, 200.0), Vector2D::new(200.0, 140.0), Vector2D::new(400.0, 0.0)],
        40.0,
        24_000.0,
        false,
        false,
    )
    .unwrap();
    let create = Message::AircraftCreate(AircraftCreate {
        id: 4,
        name: "JET004".to_owned(),
        kind: AircraftKind::Jet,
        flight_plan: plan,
    });
    let frame = codec::encode(&create).unwrap();
    assert_eq!(frame[0], tags::AIRCRAFT_CREATE);
    assert_eq!(codec::decode(&frame).unwrap(), create);

    let update = Message::AircraftUpdate(AircraftUpdate {
        id: 4,
        state: ReplicatedState {
            position: Vector2D::new(12.5, 190.25),
            velocity: Vector2D::new(39.0, -8.0),
            target_velocity: Vector2D::new(40.0, 0.0),
            altitude: 23_950.0,
            target_altitude: 24_000.0,
            turning: TurningState::Left,
            last_waypoint: 1,
            active: true,
            controller: Controller::Client,
        },
    });
    assert_eq!(codec::decode(&codec::encode(&update).unwrap()).unwrap(), update);
}

#[test]
fn test_codec_rejects_malformed_frames() {
    assert!(matches!(codec::decode(&[]), Err(CodecError::Empty)));
    assert!(matches!(codec::decode(&[200]), Err(CodecError::UnknownTag(200))));

    let mut frame = codec::encode(&Message::TakeOff).unwrap();
    assert_eq!(frame, vec![tags::TAKE_OFF]);
    frame.push(9);
    assert!(matches!(
        codec::decode(&frame),
        Err(CodecError::TrailingBytes { extra: 1, .. })
    ));

    let frame = codec::encode(&Message::ScoreUpdate(ScoreUpdate { score: 1200 })).unwrap();
    assert!(codec::decode(&frame[..frame.len() - 1]).is_err());
}

// ---- Id map ----

#[test]
fn test_id_map_never_reuses_ids() {
    let mut world = hecs::World::new();
    let a = world.spawn(());
    let b = world.spawn(());
    let mut ids = IdMap::new();

    assert_eq!(ids.assign(a), 0);
    assert_eq!(ids.assign(b), 1);
    assert_eq!(ids.assign(a), 0);
    assert_eq!(ids.object(1), Some(b));
    assert_eq!(ids.wire_id(a), Some(0));

    world.despawn(a).unwrap();
    let c = world.spawn(());
    assert_eq!(ids.assign(c), 2);
    assert_eq!(ids.len(), 3);

    ids.clear();
    assert!(ids.is_empty());
    assert_eq!(ids.object(0), None);
    assert_eq!(ids.assign(c), 0);
}

#[test]
fn test_id_map_bind_replaces() {
    let mut world = hecs::World::new();
    let a = world.spawn(());
    let b = world.spawn(());
    let mut ids = IdMap::new();

    ids.bind(7, a);
    assert_eq!(ids.object(7), Some(a));
    ids.bind(7, b);
    assert_eq!(ids.object(7), Some(b));
    assert_eq!(ids.wire_id(a), None);
    assert_eq!(ids.wire_id(b), Some(7));
}

// ---- Endpoints ----

#[test]
fn test_single_player_passes_through() {
    let mut endpoint = SinglePlayerEndpoint::new(scripted(vec![cruising(
        "SKY001",
        (400.0, 300.0),
        (1200.0, 300.0),
        20_000.0,
    )]));
    assert_eq!(endpoint.state(), EndpointState::Connected);

    endpoint.act_begin();
    endpoint.act_end(DT);
    let id = endpoint.airspace().find_nearest(Vector2D::new(400.0, 300.0)).unwrap();

    endpoint.set_target_altitude(id, 25_000.0);
    assert_eq!(endpoint.airspace().kinematics(id).unwrap().target_altitude(), 25_000.0);
    endpoint.set_turning(id, TurningState::Right);
    assert_eq!(endpoint.airspace().aircraft(id).unwrap().turning(), TurningState::Right);

    endpoint.close();
    assert_eq!(endpoint.state(), EndpointState::Closed);
    let elapsed = endpoint.airspace().elapsed_secs();
    endpoint.act_end(DT);
    assert_eq!(endpoint.airspace().elapsed_secs(), elapsed);
    assert!(endpoint.last_error().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_handshake_connects_both_sides() {
    init_tracing();
    let (mut server, mut client) = start(scripted(Vec::new()), PROTOCOL_VERSION);
    assert_eq!(client.state(), EndpointState::Connecting);

    assert!(pump(&mut server, &mut client, both_connected).await);
    assert!(server.last_error().is_none());
    assert!(client.last_error().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_version_mismatch_closes_both_sides() {
    init_tracing();
    let (mut server, mut client) = start(scripted(Vec::new()), PROTOCOL_VERSION + 96);

    let closed = pump(&mut server, &mut client, |s, c| {
        s.state() == EndpointState::Closed && c.state() == EndpointState::Closed
    })
    .await;
    assert!(closed);
    assert!(matches!(
        client.last_error(),
        Some(NetError::VersionMismatch { local, remote }) if *local == PROTOCOL_VERSION + 96 && *remote == PROTOCOL_VERSION
    ));
    assert!(server.last_error().is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_connect_refused_closes_client() {
    init_tracing();
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = NetConfig {
        port,
        ..test_config()
    };
    let mut client = ClientEndpoint::connect(&Handle::current(), "127.0.0.1", &config, AirspaceConfig::default());

    for _ in 0..400 {
        client.act_begin();
        if client.state() == EndpointState::Closed {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(client.state(), EndpointState::Closed);
    assert!(matches!(
        client.last_error(),
        Some(NetError::Transport(_)) | Some(NetError::ConnectTimeout)
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_replication_create_update_destroy() {
    init_tracing();
    let airspace = scripted(vec![
        cruising("SKY001", (400.0, 300.0), (1200.0, 300.0), 20_000.0),
        // Leaves the bounds after about 50 ticks.
        cruising("SKY002", (1200.0, 500.0), (1400.0, 500.0), 30_000.0),
    ]);
    let (mut server, mut client) = start(airspace, PROTOCOL_VERSION);
    assert!(pump(&mut server, &mut client, both_connected).await);

    assert!(pump(&mut server, &mut client, |_, c| c.airspace().active_count() == 2).await);
    let mirror = client.airspace();
    let stays = mirror.find_nearest(Vector2D::new(400.0, 300.0)).unwrap();
    let leaves = mirror.find_nearest(Vector2D::new(1280.0, 500.0)).unwrap();
    assert_eq!(mirror.aircraft(stays).unwrap().name(), "SKY001");
    assert_eq!(mirror.aircraft(leaves).unwrap().name(), "SKY002");
    assert_eq!(mirror.aircraft(leaves).unwrap().kind(), AircraftKind::Airliner);

    // Intent travels to the server and comes back as replicated state.
    client.set_target_altitude(stays, 25_000.0);
    assert!(
        pump(&mut server, &mut client, |_, c| {
            c.airspace()
                .kinematics(stays)
                .is_some_and(|k| k.target_altitude() == 25_000.0)
        })
        .await
    );

    assert!(pump(&mut server, &mut client, |_, c| !c.airspace().contains(leaves)).await);
    assert_eq!(client.airspace().active_count(), 1);
    assert_eq!(server.airspace().active_count(), 1);

    // A command for an aircraft that is gone is dropped without closing anything.
    client.set_target_altitude(leaves, 1_000.0);
    client.hand_over(stays);
    assert!(
        pump(&mut server, &mut client, |_, c| {
            c.airspace()
                .aircraft(stays)
                .is_some_and(|a| a.controller() == Controller::Client)
        })
        .await
    );
    assert!(both_connected(&server, &client));

    let server_position = {
        let mut query = server.airspace().active_objects();
        let (_, (kinematics, _)) = query.iter().next().unwrap();
        kinematics.position()
    };
    let client_position = client.airspace().kinematics(stays).unwrap().position();
    assert!(server_position.distance_to(client_position) < 15.0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_game_end_and_restart() {
    init_tracing();
    let airspace = scripted(vec![
        cruising("SKY001", (600.0, 300.0), (1200.0, 300.0), 20_000.0),
        cruising("SKY002", (610.0, 300.0), (1200.0, 300.0), 20_000.0),
    ]);
    let (mut server, mut client) = start(airspace, PROTOCOL_VERSION);
    assert!(pump(&mut server, &mut client, both_connected).await);

    assert!(pump(&mut server, &mut client, |_, c| c.airspace().is_game_over()).await);
    assert!(server.airspace().is_game_over());
    assert_eq!(client.airspace().score(), server.airspace().score());
    assert!(client.airspace().elapsed_secs() > 0.0);

    server.restart(scripted(Vec::new()));
    assert!(
        pump(&mut server, &mut client, |_, c| {
            !c.airspace().is_game_over() && c.airspace().active_count() == 0
        })
        .await
    );
    assert!(both_connected(&server, &client));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_closed_client_purges_culled_objects() {
    init_tracing();
    let airspace = scripted(vec![cruising("SKY002", (1200.0, 500.0), (1400.0, 500.0), 30_000.0)]);
    let (mut server, mut client) = start(airspace, PROTOCOL_VERSION);
    assert!(pump(&mut server, &mut client, both_connected).await);

    assert!(pump(&mut server, &mut client, |_, c| c.airspace().culled_objects().len() == 1).await);
    assert_eq!(client.airspace().active_count(), 0);

    client.close();
    client.act_begin();
    assert!(client.airspace().culled_objects().is_empty());
    assert_eq!(client.state(), EndpointState::Closed);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_client_close_closes_server() {
    init_tracing();
    let (mut server, mut client) = start(scripted(Vec::new()), PROTOCOL_VERSION);
    assert!(pump(&mut server, &mut client, both_connected).await);

    client.close();
    assert_eq!(client.state(), EndpointState::Closed);
    assert!(pump(&mut server, &mut client, |s, _| s.state() == EndpointState::Closed).await);

    // Closed is terminal.
    client.act_begin();
    client.take_off();
    client.act_end(DT);
    assert_eq!(client.state(), EndpointState::Closed);
}
