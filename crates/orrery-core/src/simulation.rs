/// The facade: the single entry point applications drive (spec.md §4.6).
/// Owns the named-body registry, the N-body integrator, and per-body
/// trajectory trails, and translates calendar instants to/from simulated
/// elapsed time.
use std::collections::{HashMap, VecDeque};

use crate::bodies::{self, BodyKind};
use crate::constants;
use crate::ephemeris::{AccurateEphemeris, AnalyticEphemeris, EphemerisProvider};
use crate::error::{OrreryError, OrreryResult};
use crate::integrator::{IntegratorKind, NBodySystem};
use crate::particle::Particle;
use crate::spacecraft;
use crate::time::{self, CalendarInstant, JulianDate};
use crate::units::{Kilograms, Meters, Seconds};
use crate::vec3::Vector3;

/// Trajectory trails are capped to bound memory on long-running sessions;
/// spec.md leaves the exact bound unspecified (open question), so this
/// picks a generous round number.
pub const TRAJECTORY_CAP: usize = 10_000;

/// Default base step, seconds (spec.md §6 Configuration default).
pub const DEFAULT_BASE_STEP_SECONDS: f64 = 60.0;

/// Default fast-mode step multiplier (spec.md §6/§9, preserved verbatim).
pub const DEFAULT_FAST_MULTIPLIER: f64 = 24.0;

fn default_radius(kind: BodyKind) -> Meters {
    match kind {
        BodyKind::Star => Meters(6.96e8),
        BodyKind::Planet => Meters(6.0e6),
        BodyKind::Moon => Meters(1.5e6),
        BodyKind::DwarfPlanetOrAsteroid => Meters(3.0e5),
        BodyKind::Comet => Meters(5.0e3),
        BodyKind::Barycenter => Meters(0.0),
        BodyKind::Spacecraft => Meters(10.0),
    }
}

/// A tracked body: identity, trajectory trail, and the last-published
/// position/velocity. The paired `Particle` in `NBodySystem` is the live
/// physical state the integrator advances; `Body`'s position/velocity are
/// only updated by `move_bodies`, so a reader sampling between steps
/// always sees a coherent, untorn snapshot rather than a particle mid-step.
#[derive(Debug, Clone)]
pub struct Body {
    pub name: String,
    pub kind: BodyKind,
    pub position: Vector3,
    pub velocity: Vector3,
    pub trajectory: VecDeque<Vector3>,
    present: bool,
}

/// A planet and the moons created alongside it by `create_planet_system`.
#[derive(Debug, Clone)]
pub struct PlanetSystem {
    pub planet: String,
    pub moons: Vec<String>,
}

fn compute_instant(epoch: &CalendarInstant, elapsed_seconds: f64) -> OrreryResult<CalendarInstant> {
    let epoch_jd = time::calendar_to_jd(epoch)?;
    let jd = JulianDate(epoch_jd.value() + elapsed_seconds / 86_400.0);
    time::jd_to_calendar(jd)
}

fn ephemeris_state(name: &str, instant: &CalendarInstant) -> OrreryResult<(Vector3, Vector3)> {
    let accurate = AccurateEphemeris::new();
    match (accurate.position(name, instant), accurate.velocity(name, instant)) {
        (Ok(p), Ok(v)) => Ok((p, v)),
        _ => {
            let analytic = AnalyticEphemeris::new();
            Ok((analytic.position(name, instant)?, analytic.velocity(name, instant)?))
        }
    }
}

/// The facade: named bodies plus the N-body propagator driving them.
pub struct SolarSystem {
    bodies: Vec<Body>,
    index_of: HashMap<String, usize>,
    nbody: NBodySystem,
    /// Calendar instant corresponding to zero elapsed simulated seconds.
    epoch: CalendarInstant,
    elapsed_seconds: f64,
    /// Calendar instant as of the last `move_bodies` publication.
    published_instant: CalendarInstant,
    pub base_step: Seconds,
    pub fast_multiplier: f64,
}

impl SolarSystem {
    /// Seed the Sun and the eight planets at `instant` (spec.md §4.6
    /// `initialize`). Positions/velocities come from the accurate
    /// ephemeris where the instant falls in its window, the analytic
    /// backend otherwise.
    pub fn initialize(instant: CalendarInstant) -> OrreryResult<Self> {
        let mut system = Self {
            bodies: Vec::new(),
            index_of: HashMap::new(),
            nbody: NBodySystem::new(Vec::new(), IntegratorKind::Newton),
            epoch: instant,
            elapsed_seconds: 0.0,
            published_instant: instant,
            base_step: Seconds(DEFAULT_BASE_STEP_SECONDS),
            fast_multiplier: DEFAULT_FAST_MULTIPLIER,
        };

        system.add_body_at("Sun", &instant)?;
        for planet in [
            "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune",
        ] {
            system.add_body_at(planet, &instant)?;
        }
        Ok(system)
    }

    fn add_body_at(&mut self, name: &str, instant: &CalendarInstant) -> OrreryResult<()> {
        let record = bodies::lookup(name).ok_or_else(|| OrreryError::UnknownBody(name.to_string()))?;
        let (position, velocity) = if name == "Sun" {
            (Vector3::zero(), Vector3::zero())
        } else {
            ephemeris_state(name, instant)?
        };
        let mass = record.mu.mass();
        let particle = Particle::new(position, velocity, mass, default_radius(record.kind));
        let idx = self.nbody.particles.len();
        self.nbody.particles.push(particle);
        self.bodies.push(Body {
            name: name.to_string(),
            kind: record.kind,
            position,
            velocity,
            trajectory: VecDeque::from([position]),
            present: true,
        });
        self.index_of.insert(name.to_string(), idx);
        Ok(())
    }

    fn index_of(&self, name: &str) -> OrreryResult<usize> {
        match self.index_of.get(name) {
            Some(&idx) if self.bodies[idx].present => Ok(idx),
            _ => Err(OrreryError::UnknownBody(name.to_string())),
        }
    }

    /// Create a planet and all of its whitelisted moons as active bodies,
    /// atomically: either every body is added, or (on first failure) none
    /// are left partially inserted.
    pub fn create_planet_system(&mut self, planet: &str) -> OrreryResult<PlanetSystem> {
        let record = bodies::lookup(planet).ok_or_else(|| OrreryError::UnknownBody(planet.to_string()))?;
        if record.kind != BodyKind::Planet {
            return Err(OrreryError::UnknownBody(format!("{planet} is not a planet")));
        }
        let moons = bodies::moons_of(planet);
        let snapshot_len = self.bodies.len();

        let attempt = (|| -> OrreryResult<PlanetSystem> {
            if !self.index_of.contains_key(planet) || !self.bodies[self.index_of[planet]].present {
                self.add_body_at(planet, &self.current_instant()?)?;
            }
            let mut moon_names = Vec::new();
            for moon in &moons {
                self.add_body_at(moon.name, &self.current_instant()?)?;
                moon_names.push(moon.name.to_string());
            }
            Ok(PlanetSystem {
                planet: planet.to_string(),
                moons: moon_names,
            })
        })();

        match attempt {
            Ok(system) => {
                tracing::debug!(planet, moons = system.moons.len(), "created planet system");
                Ok(system)
            }
            Err(e) => {
                self.bodies.truncate(snapshot_len);
                self.nbody.particles.truncate(snapshot_len);
                self.index_of.retain(|_, &mut idx| idx < snapshot_len);
                tracing::warn!(planet, error = %e, "planet system creation rolled back");
                Err(e)
            }
        }
    }

    /// Remove a planet and its moons. Bodies are deactivated rather than
    /// physically removed, keeping particle indices stable.
    pub fn remove_planet_system(&mut self, planet: &str) -> OrreryResult<()> {
        let idx = self.index_of(planet)?;
        self.nbody.particles[idx].deactivate();
        self.bodies[idx].present = false;
        for moon in bodies::moons_of(planet) {
            if let Ok(midx) = self.index_of(moon.name) {
                self.nbody.particles[midx].deactivate();
                self.bodies[midx].present = false;
            }
        }
        tracing::debug!(planet, "removed planet system");
        Ok(())
    }

    /// Seed a named spacecraft at its documented hardcoded epoch state.
    pub fn create_spacecraft(&mut self, name: &str) -> OrreryResult<()> {
        if !bodies::is_spacecraft(name) {
            return Err(OrreryError::UnknownSpacecraft(name.to_string()));
        }
        if let Some(&idx) = self.index_of.get(name) {
            if self.bodies[idx].present {
                return Ok(());
            }
            self.bodies[idx].present = true;
            self.nbody.particles[idx].active = true;
            return Ok(());
        }
        let state = spacecraft::initial_state(name)
            .ok_or_else(|| OrreryError::UnknownSpacecraft(name.to_string()))?;
        let particle = Particle::new(state.position, state.velocity, Kilograms(0.0), Meters(10.0));
        let idx = self.nbody.particles.len();
        self.nbody.particles.push(particle);
        self.bodies.push(Body {
            name: name.to_string(),
            kind: BodyKind::Spacecraft,
            position: state.position,
            velocity: state.velocity,
            trajectory: VecDeque::from([state.position]),
            present: true,
        });
        self.index_of.insert(name.to_string(), idx);
        tracing::debug!(name, "spacecraft added");
        Ok(())
    }

    pub fn remove_spacecraft(&mut self, name: &str) -> OrreryResult<()> {
        let idx = self.index_of(name)?;
        self.nbody.particles[idx].deactivate();
        self.bodies[idx].present = false;
        tracing::debug!(name, "spacecraft removed");
        Ok(())
    }

    pub fn set_mass(&mut self, name: &str, mass: Kilograms) -> OrreryResult<()> {
        let idx = self.index_of(name)?;
        self.nbody.particles[idx].mass = mass;
        Ok(())
    }

    pub fn get_mass(&self, name: &str) -> OrreryResult<Kilograms> {
        let idx = self.index_of(name)?;
        Ok(self.nbody.particles[idx].mass)
    }

    /// Updates both the live `Particle` and the published `Body` snapshot
    /// immediately — an explicit external mutation, not an advance step,
    /// so it isn't gated behind `move_bodies`.
    pub fn set_position_velocity(
        &mut self,
        name: &str,
        position: Vector3,
        velocity: Vector3,
    ) -> OrreryResult<()> {
        let idx = self.index_of(name)?;
        self.nbody.particles[idx].position = position;
        self.nbody.particles[idx].velocity = velocity;
        self.bodies[idx].position = position;
        self.bodies[idx].velocity = velocity;
        Ok(())
    }

    /// Reads the last-published `Body` snapshot, not the live particle —
    /// see `move_bodies`.
    pub fn get_position(&self, name: &str) -> OrreryResult<Vector3> {
        let idx = self.index_of(name)?;
        Ok(self.bodies[idx].position)
    }

    pub fn get_velocity(&self, name: &str) -> OrreryResult<Vector3> {
        let idx = self.index_of(name)?;
        Ok(self.bodies[idx].velocity)
    }

    pub fn set_integrator_kind(&mut self, kind: IntegratorKind) {
        tracing::debug!(?kind, "integrator kernel switched");
        self.nbody.set_kind(kind);
    }

    pub fn integrator_kind(&self) -> IntegratorKind {
        self.nbody.kind
    }

    fn record_trajectory_samples(&mut self) {
        for (body, particle) in self.bodies.iter_mut().zip(self.nbody.particles.iter()) {
            if !body.present {
                continue;
            }
            body.trajectory.push_back(particle.position);
            if body.trajectory.len() > TRAJECTORY_CAP {
                body.trajectory.pop_front();
            }
        }
    }

    /// Snapshots particle state into the corresponding `Body` positions so
    /// observers see a coherent frame (spec.md §4.5). Calendar time
    /// publishes atomically with it. Called at the end of every
    /// `advance*`, which is itself always invoked inside the coordinator's
    /// writer-lock critical section, so a reader sampling through
    /// `Coordinator` never observes a torn mix of pre- and post-step state.
    pub fn move_bodies(&mut self) -> OrreryResult<()> {
        for (body, particle) in self.bodies.iter_mut().zip(self.nbody.particles.iter()) {
            if !body.present {
                continue;
            }
            body.position = particle.position;
            body.velocity = particle.velocity;
        }
        self.published_instant = compute_instant(&self.epoch, self.elapsed_seconds)?;
        Ok(())
    }

    pub fn advance_forward(&mut self, steps: u32, fast: bool) -> OrreryResult<()> {
        self.nbody
            .advance_forward(steps, self.base_step, fast, self.fast_multiplier)?;
        let multiplier = if fast { self.fast_multiplier } else { 1.0 };
        self.elapsed_seconds += steps as f64 * self.base_step.value() * multiplier;
        self.record_trajectory_samples();
        self.move_bodies()
    }

    pub fn advance_backward(&mut self, steps: u32, fast: bool) -> OrreryResult<()> {
        self.nbody
            .advance_backward(steps, self.base_step, fast, self.fast_multiplier)?;
        let multiplier = if fast { self.fast_multiplier } else { 1.0 };
        self.elapsed_seconds -= steps as f64 * self.base_step.value() * multiplier;
        self.record_trajectory_samples();
        self.move_bodies()
    }

    pub fn advance_single_step(&mut self, dt: Seconds) -> OrreryResult<()> {
        self.nbody.advance_single_step(dt)?;
        self.elapsed_seconds += dt.value();
        self.record_trajectory_samples();
        self.move_bodies()
    }

    /// The calendar instant the simulation currently represents: the
    /// initializing instant plus all elapsed simulated time. Computed
    /// live, independent of the last `move_bodies` publication — used
    /// internally to place newly-added bodies at the simulation's actual
    /// current time.
    pub fn current_instant(&self) -> OrreryResult<CalendarInstant> {
        compute_instant(&self.epoch, self.elapsed_seconds)
    }

    /// Matches spec.md's `simulationDateTime` facade operation: the
    /// calendar instant as of the last `move_bodies` publication, updating
    /// atomically with the published `Body` snapshot.
    pub fn simulation_date_time(&self) -> OrreryResult<CalendarInstant> {
        Ok(self.published_instant)
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().filter(|b| b.present)
    }

    pub fn total_energy(&self) -> f64 {
        self.nbody.total_energy()
    }

    /// Plain-data export of every tracked body, for persistence
    /// (snapshot.rs). Removed (non-present) bodies are not included.
    pub fn export_bodies(&self) -> Vec<crate::snapshot::BodyState> {
        self.bodies
            .iter()
            .zip(self.nbody.particles.iter())
            .filter(|(b, _)| b.present)
            .map(|(b, p)| crate::snapshot::BodyState {
                name: b.name.clone(),
                kind: b.kind,
                mass: p.mass,
                radius: p.radius,
                position: p.position,
                velocity: p.velocity,
                trajectory: b.trajectory.iter().copied().collect(),
            })
            .collect()
    }

    pub fn epoch(&self) -> CalendarInstant {
        self.epoch
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    /// Reconstruct a `SolarSystem` from previously exported state (used by
    /// snapshot.rs to load a persisted session).
    pub fn from_snapshot(
        epoch: CalendarInstant,
        elapsed_seconds: f64,
        base_step: Seconds,
        fast_multiplier: f64,
        integrator_kind: IntegratorKind,
        bodies: Vec<crate::snapshot::BodyState>,
    ) -> Self {
        let mut system = Self {
            bodies: Vec::with_capacity(bodies.len()),
            index_of: HashMap::new(),
            nbody: NBodySystem::new(Vec::with_capacity(bodies.len()), integrator_kind),
            epoch,
            elapsed_seconds,
            base_step,
            fast_multiplier,
            published_instant: epoch,
        };
        system.published_instant = compute_instant(&system.epoch, system.elapsed_seconds)
            .unwrap_or(system.published_instant);
        for (idx, b) in bodies.into_iter().enumerate() {
            system
                .nbody
                .particles
                .push(Particle::new(b.position, b.velocity, b.mass, b.radius));
            system.index_of.insert(b.name.clone(), idx);
            system.bodies.push(Body {
                name: b.name,
                kind: b.kind,
                position: b.position,
                velocity: b.velocity,
                trajectory: b.trajectory.into_iter().collect(),
                present: true,
            });
        }
        system
    }
}
