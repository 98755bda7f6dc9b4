//! The bounded world containing every active and culled aircraft.
//!
//! `Airspace` owns the hecs world and runs the per-tick pipeline:
//! spawn, advance, cull, separation. A mirror airspace (no spawner) is
//! populated from outside and only purges and recomputes warnings.

use hecs::{Entity, QueryBorrow, World};
use tracing::{debug, info};

use skylane_core::config::AirspaceConfig;
use skylane_core::enums::TurningState;
use skylane_core::types::Vector2D;

use crate::aircraft::{Aircraft, FlightEvent, NewAircraft, ReplicatedState};
use crate::collision::CollisionWarning;
use crate::kinematics::Kinematics;
use crate::spawner::Spawner;
use crate::systems;

/// Handle of an aircraft in the airspace. Generational: a handle to a removed
/// aircraft fails every lookup instead of aliasing a newer one.
pub type ObjectId = Entity;

/// An aircraft removed from the active set this tick.
#[derive(Debug, Clone)]
pub struct CulledObject {
    pub id: ObjectId,
    pub kinematics: Kinematics,
    pub aircraft: Aircraft,
}

pub struct Airspace {
    config: AirspaceConfig,
    world: World,
    culled: Vec<CulledObject>,
    warnings: Vec<CollisionWarning>,
    spawner: Option<Box<dyn Spawner>>,
    events: Vec<(ObjectId, FlightEvent)>,
    cull_buffer: Vec<Entity>,
    score: i32,
    landed: u32,
    game_over: bool,
    elapsed_secs: f64,
}

impl Airspace {
    /// An authoritative airspace fed by `spawner`.
    pub fn new(config: AirspaceConfig, spawner: impl Spawner + 'static) -> Self {
        let mut airspace = Self::mirror(config);
        airspace.spawner = Some(Box::new(spawner));
        airspace
    }

    /// An airspace with no spawner, populated by [`Airspace::insert`].
    pub fn mirror(config: AirspaceConfig) -> Self {
        Self {
            config,
            world: World::new(),
            culled: Vec::new(),
            warnings: Vec::new(),
            spawner: None,
            events: Vec::new(),
            cull_buffer: Vec::new(),
            score: 0,
            landed: 0,
            game_over: false,
            elapsed_secs: 0.0,
        }
    }

    pub fn config(&self) -> &AirspaceConfig {
        &self.config
    }

    /// Advance the simulation by `delta` seconds. Does nothing once the game is over.
    pub fn refresh(&mut self, delta: f64) {
        if self.game_over {
            return;
        }
        self.elapsed_secs += delta;

        if let Some(new) = self.with_spawner(|spawner, airspace| spawner.spawn(airspace, delta)) {
            self.insert(new);
        }

        self.events.clear();
        systems::advance::run(&mut self.world, delta, &mut self.events);
        for &(id, event) in &self.events {
            if event == FlightEvent::Landed {
                self.landed += 1;
                debug!(?id, landed = self.landed, "aircraft landed");
            }
        }

        systems::cleanup::run(
            &mut self.world,
            &self.config.bounds,
            &mut self.culled,
            &mut self.cull_buffer,
        );
        for object in &self.culled {
            if object.aircraft.is_finished() {
                self.score += object.aircraft.score().max(0);
            }
        }

        if systems::separation::run(&mut self.world, &self.config, &mut self.warnings) {
            self.game_over = true;
            info!(score = self.score, elapsed = self.elapsed_secs, "collision, game over");
        }
    }

    /// Spawn a takeoff aircraft now, bypassing the arrival schedule.
    pub fn take_off(&mut self) -> Option<ObjectId> {
        if self.game_over {
            return None;
        }
        let new = self.with_spawner(|spawner, airspace| spawner.take_off(airspace))?;
        Some(self.insert(new))
    }

    /// The spawner is taken out for the call so it can read the airspace.
    fn with_spawner(
        &mut self,
        f: impl FnOnce(&mut dyn Spawner, &Airspace) -> Option<NewAircraft>,
    ) -> Option<NewAircraft> {
        let mut spawner = self.spawner.take()?;
        let new = f(spawner.as_mut(), self);
        self.spawner = Some(spawner);
        new
    }

    pub fn insert(&mut self, new: NewAircraft) -> ObjectId {
        self.world.spawn((new.kinematics, new.aircraft))
    }

    /// Move an aircraft to the culled list, as if it had left the bounds.
    pub fn cull(&mut self, id: ObjectId) -> bool {
        match systems::cleanup::take(&mut self.world, id) {
            Some(object) => {
                self.culled.push(object);
                true
            }
            None => false,
        }
    }

    /// Drop last tick's culled objects.
    pub fn purge_culled(&mut self) {
        self.culled.clear();
    }

    /// Recompute collision warnings for a mirrored airspace. Never advances
    /// anything or ends the game; that state arrives from the authority.
    pub fn refresh_mirror(&mut self) {
        systems::separation::run(&mut self.world, &self.config, &mut self.warnings);
    }

    /// Remove every aircraft and reset the counters.
    pub fn clear(&mut self) {
        self.world.clear();
        self.culled.clear();
        self.warnings.clear();
        self.events.clear();
        self.score = 0;
        self.landed = 0;
        self.game_over = false;
        self.elapsed_secs = 0.0;
    }

    // --- Commands. Unknown ids are ignored and reported as `false`. ---

    /// Also cancels any continuous turn.
    pub fn set_target_velocity(&mut self, id: ObjectId, target: Vector2D) -> bool {
        match self.world.query_one_mut::<(&mut Kinematics, &mut Aircraft)>(id) {
            Ok((kinematics, aircraft)) => {
                kinematics.set_target_velocity(target);
                aircraft.set_turning(TurningState::Straight);
                true
            }
            Err(_) => false,
        }
    }

    pub fn set_target_altitude(&mut self, id: ObjectId, target: f64) -> bool {
        match self.world.get::<&mut Kinematics>(id) {
            Ok(mut kinematics) => {
                kinematics.set_target_altitude(target);
                true
            }
            Err(_) => false,
        }
    }

    pub fn set_turning(&mut self, id: ObjectId, turning: TurningState) -> bool {
        match self.world.get::<&mut Aircraft>(id) {
            Ok(mut aircraft) => {
                aircraft.set_turning(turning);
                true
            }
            Err(_) => false,
        }
    }

    pub fn hand_over(&mut self, id: ObjectId) -> bool {
        match self.world.get::<&mut Aircraft>(id) {
            Ok(mut aircraft) => {
                aircraft.hand_over();
                true
            }
            Err(_) => false,
        }
    }

    pub fn apply_replicated_state(&mut self, id: ObjectId, state: &ReplicatedState) -> bool {
        match self.world.query_one_mut::<(&mut Kinematics, &mut Aircraft)>(id) {
            Ok((kinematics, aircraft)) => aircraft.apply_replicated_state(kinematics, state),
            Err(_) => false,
        }
    }

    // --- Queries ---

    /// Every active aircraft. Iterate with `.iter()`.
    pub fn active_objects(&self) -> QueryBorrow<'_, (&Kinematics, &Aircraft)> {
        self.world.query::<(&Kinematics, &Aircraft)>()
    }

    pub fn active_count(&self) -> usize {
        self.world.len() as usize
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.world.contains(id)
    }

    pub fn kinematics(&self, id: ObjectId) -> Option<Kinematics> {
        self.world.get::<&Kinematics>(id).ok().map(|k| *k)
    }

    pub fn aircraft(&self, id: ObjectId) -> Option<hecs::Ref<'_, Aircraft>> {
        self.world.get::<&Aircraft>(id).ok()
    }

    /// Aircraft culled during the last tick. Each is visible here for exactly one tick.
    pub fn culled_objects(&self) -> &[CulledObject] {
        &self.culled
    }

    pub fn collision_warnings(&self) -> &[CollisionWarning] {
        &self.warnings
    }

    /// Flight events raised during the last tick.
    pub fn flight_events(&self) -> &[(ObjectId, FlightEvent)] {
        &self.events
    }

    /// Positions of every solid aircraft.
    pub fn solid_positions(&self) -> Vec<Vector2D> {
        self.active_objects()
            .iter()
            .filter(|(_, (_, aircraft))| aircraft.is_solid())
            .map(|(_, (kinematics, _))| kinematics.position())
            .collect()
    }

    /// Closest active aircraft to `point`.
    pub fn find_nearest(&self, point: Vector2D) -> Option<ObjectId> {
        self.world
            .query::<&Kinematics>()
            .iter()
            .map(|(id, kinematics)| (id, kinematics.position().distance_to(point)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Every active aircraft within `radius` of `center`, inclusive.
    pub fn find_within(&self, center: Vector2D, radius: f64) -> Vec<ObjectId> {
        self.world
            .query::<&Kinematics>()
            .iter()
            .filter(|(_, kinematics)| kinematics.position().distance_to(center) <= radius)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn landed(&self) -> u32 {
        self.landed
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    // --- Mirror setters, driven by replicated messages. ---

    pub fn set_separation(&mut self, lateral: f64, vertical: f64) {
        self.config.lateral_separation = lateral;
        self.config.vertical_separation = vertical;
    }

    pub fn set_score(&mut self, score: i32) {
        self.score = score;
    }

    pub fn set_landed(&mut self, landed: u32) {
        self.landed = landed;
    }

    pub fn end_game(&mut self, elapsed_secs: f64, score: i32) {
        self.game_over = true;
        self.elapsed_secs = elapsed_secs;
        self.score = score;
    }
}
