#![allow(clippy::too_many_arguments)] // Flat-parameter WASM ABI mirrors the JS call sites

/// WASM bridge for orrery-core.
///
/// A browser-side renderer owns one `Orrery` handle, advances it on a
/// timer or via `requestAnimationFrame`, and reads bodies back out each
/// frame. All SI newtype wrapping/unwrapping happens at this boundary;
/// everything on the other side of it is plain `f64`/`String`/`JsValue`.
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use orrery_core::bodies::BodyKind;
use orrery_core::integrator::IntegratorKind;
use orrery_core::kepler;
use orrery_core::lambert;
use orrery_core::snapshot;
use orrery_core::time::{CalendarInstant, Era};
use orrery_core::units::{Eccentricity, Kilograms, Meters, Mu, Radians, Seconds};
use orrery_core::vec3::Vector3;
use orrery_core::SolarSystem;

fn to_js<E: std::fmt::Display>(e: E) -> JsError {
    JsError::new(&e.to_string())
}

fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
}

fn parse_integrator_kind(s: &str) -> Result<IntegratorKind, JsError> {
    match s.to_uppercase().as_str() {
        "NEWTON" => Ok(IntegratorKind::Newton),
        "PPN_GR" | "PPNGR" => Ok(IntegratorKind::PpnGr),
        "CWPM" => Ok(IntegratorKind::Cwpm),
        other => Err(JsError::new(&format!("unknown integrator kind: {other}"))),
    }
}

fn integrator_kind_name(kind: IntegratorKind) -> &'static str {
    match kind {
        IntegratorKind::Newton => "NEWTON",
        IntegratorKind::PpnGr => "PPN_GR",
        IntegratorKind::Cwpm => "CWPM",
    }
}

fn body_kind_name(kind: BodyKind) -> &'static str {
    match kind {
        BodyKind::Star => "Star",
        BodyKind::Planet => "Planet",
        BodyKind::Moon => "Moon",
        BodyKind::DwarfPlanetOrAsteroid => "DwarfPlanetOrAsteroid",
        BodyKind::Comet => "Comet",
        BodyKind::Barycenter => "Barycenter",
        BodyKind::Spacecraft => "Spacecraft",
    }
}

// ---------------------------------------------------------------------------
// Calendar/time helpers
// ---------------------------------------------------------------------------

fn instant_from_parts(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Result<CalendarInstant, JsError> {
    let (era, year) = if year < 0 {
        (Era::Bc, (-year) as u32)
    } else {
        (Era::Ad, year as u32)
    };
    CalendarInstant::new(era, year, month, day, hour, minute, second, 0).map_err(to_js)
}

#[derive(Serialize, Deserialize)]
struct InstantView {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

fn instant_to_view(instant: &CalendarInstant) -> InstantView {
    let year = match instant.era {
        Era::Ad => instant.year as i32,
        Era::Bc => -(instant.year as i32),
    };
    InstantView {
        year,
        month: instant.month,
        day: instant.day,
        hour: instant.hour,
        minute: instant.minute,
        second: instant.second,
    }
}

/// Convert a proleptic calendar date/time (negative `year` means BC) to a
/// Julian Date.
#[wasm_bindgen]
pub fn calendar_to_jd(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Result<f64, JsError> {
    let instant = instant_from_parts(year, month, day, hour, minute, second)?;
    Ok(orrery_core::time::calendar_to_jd(&instant).map_err(to_js)?.0)
}

/// Convert a Julian Date back to a calendar instant.
/// Returns `{ year, month, day, hour, minute, second }` (negative `year` is BC).
#[wasm_bindgen]
pub fn jd_to_calendar(jd: f64) -> Result<JsValue, JsError> {
    let instant =
        orrery_core::time::jd_to_calendar(orrery_core::time::JulianDate(jd)).map_err(to_js)?;
    to_js_value(&instant_to_view(&instant))
}

// ---------------------------------------------------------------------------
// Kepler equation solver and anomaly conversions
// ---------------------------------------------------------------------------

/// Solve Kepler's equation M = E - e sin(E) for eccentric anomaly E.
/// Returns `{ anomaly, iterations, residual }`.
#[wasm_bindgen]
pub fn solve_kepler(mean_anomaly: f64, e: f64) -> Result<JsValue, JsError> {
    let ecc = Eccentricity::new(e).ok_or_else(|| JsError::new("eccentricity must be >= 0"))?;
    let solution = kepler::solve_kepler(Radians(mean_anomaly), ecc).map_err(to_js)?;
    to_js_value(&solution)
}

/// Convert mean anomaly to true anomaly (radians). Solves Kepler internally.
#[wasm_bindgen]
pub fn mean_to_true_anomaly(mean_anomaly: f64, e: f64) -> Result<f64, JsError> {
    let ecc = Eccentricity::new(e).ok_or_else(|| JsError::new("eccentricity must be >= 0"))?;
    kepler::mean_to_true_anomaly(Radians(mean_anomaly), ecc)
        .map(|r| r.value())
        .map_err(to_js)
}

/// Mean motion n = sqrt(mu/a^3) for a body of gravitational parameter `mu`
/// (m^3/s^2) orbiting at semi-major axis `a` (metres). Returns rad/s.
#[wasm_bindgen]
pub fn mean_motion(mu: f64, a: f64) -> f64 {
    kepler::mean_motion(Mu(mu), Meters(a))
}

// ---------------------------------------------------------------------------
// Lambert's problem
// ---------------------------------------------------------------------------

/// Solve Lambert's problem between two heliocentric position vectors
/// (metres) over a transfer time `dt` (seconds). `retrograde` picks the
/// transfer direction; `k` is the maximum revolution count to search.
/// Returns an array of `{ v1: [x,y,z], v2: [x,y,z], revolutions, branch }`.
#[wasm_bindgen]
pub fn lambert_transfer(
    r1: Vec<f64>,
    r2: Vec<f64>,
    dt: f64,
    mu: f64,
    retrograde: bool,
    k: u32,
) -> Result<JsValue, JsError> {
    if r1.len() != 3 || r2.len() != 3 {
        return Err(JsError::new("position vectors must have exactly 3 components"));
    }
    let r1_vec = Vector3::new(r1[0], r1[1], r1[2]);
    let r2_vec = Vector3::new(r2[0], r2[1], r2[2]);
    let solutions = lambert::lambert(r1_vec, r2_vec, dt, Mu(mu), retrograde, k).map_err(to_js)?;
    to_js_value(&solutions)
}

// ---------------------------------------------------------------------------
// The simulation handle
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct BodyView {
    name: String,
    kind: &'static str,
    mass: f64,
    position: [f64; 3],
    velocity: [f64; 3],
    trajectory: Vec<[f64; 3]>,
}

fn vec3_array(v: Vector3) -> [f64; 3] {
    [v.x, v.y, v.z]
}

/// A live Solar System simulation, exposed to JavaScript as an opaque
/// handle. All state lives on the Rust side; the renderer reads out
/// positions/trajectories once per frame via [`Orrery::bodies`].
#[wasm_bindgen]
pub struct Orrery {
    system: SolarSystem,
}

#[wasm_bindgen]
impl Orrery {
    /// Initialize a new simulation rooted at the given UTC calendar instant,
    /// seeded with the Sun and the eight planets.
    #[wasm_bindgen(constructor)]
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Orrery, JsError> {
        let instant = instant_from_parts(year, month, day, hour, minute, second)?;
        let system = SolarSystem::initialize(instant).map_err(to_js)?;
        Ok(Orrery { system })
    }

    /// Reconstruct a handle from a previously saved snapshot's bytes.
    #[wasm_bindgen(js_name = fromSnapshot)]
    pub fn from_snapshot(bytes: &[u8]) -> Result<Orrery, JsError> {
        let system = snapshot::load(bytes).map_err(to_js)?;
        Ok(Orrery { system })
    }

    /// Serialize the current state to the framed snapshot format.
    #[wasm_bindgen(js_name = saveSnapshot)]
    pub fn save_snapshot(&self) -> Result<Box<[u8]>, JsError> {
        Ok(snapshot::save(&self.system).map_err(to_js)?.into_boxed_slice())
    }

    /// Advance the simulation `steps` base steps forward. `fast` applies
    /// the configured fast-forward multiplier to each step.
    #[wasm_bindgen(js_name = advanceForward)]
    pub fn advance_forward(&mut self, steps: u32, fast: bool) -> Result<(), JsError> {
        self.system.advance_forward(steps, fast).map_err(to_js)
    }

    /// Advance the simulation `steps` base steps backward.
    #[wasm_bindgen(js_name = advanceBackward)]
    pub fn advance_backward(&mut self, steps: u32, fast: bool) -> Result<(), JsError> {
        self.system.advance_backward(steps, fast).map_err(to_js)
    }

    /// Advance (or rewind, for negative `dt`) by exactly `dt` seconds.
    #[wasm_bindgen(js_name = advanceSingleStep)]
    pub fn advance_single_step(&mut self, dt_seconds: f64) -> Result<(), JsError> {
        self.system
            .advance_single_step(Seconds(dt_seconds))
            .map_err(to_js)
    }

    /// Add a planet and its moons to the simulation, seeded from the
    /// ephemeris at the current simulated instant. Returns the created
    /// planet system as `{ planet, moons }`.
    #[wasm_bindgen(js_name = createPlanetSystem)]
    pub fn create_planet_system(&mut self, planet: &str) -> Result<JsValue, JsError> {
        #[derive(Serialize)]
        struct PlanetSystemView {
            planet: String,
            moons: Vec<String>,
        }
        let created = self.system.create_planet_system(planet).map_err(to_js)?;
        to_js_value(&PlanetSystemView {
            planet: created.planet,
            moons: created.moons,
        })
    }

    /// Remove a planet and its moons from the simulation.
    #[wasm_bindgen(js_name = removePlanetSystem)]
    pub fn remove_planet_system(&mut self, planet: &str) -> Result<(), JsError> {
        self.system.remove_planet_system(planet).map_err(to_js)
    }

    /// Add a named spacecraft, seeded from its hardcoded initial state.
    #[wasm_bindgen(js_name = createSpacecraft)]
    pub fn create_spacecraft(&mut self, name: &str) -> Result<(), JsError> {
        self.system.create_spacecraft(name).map_err(to_js)
    }

    /// Remove a named spacecraft from the simulation.
    #[wasm_bindgen(js_name = removeSpacecraft)]
    pub fn remove_spacecraft(&mut self, name: &str) -> Result<(), JsError> {
        self.system.remove_spacecraft(name).map_err(to_js)
    }

    /// Override a body's mass (kilograms).
    #[wasm_bindgen(js_name = setMass)]
    pub fn set_mass(&mut self, name: &str, mass_kg: f64) -> Result<(), JsError> {
        self.system
            .set_mass(name, Kilograms(mass_kg))
            .map_err(to_js)
    }

    /// Read a body's current mass (kilograms).
    #[wasm_bindgen(js_name = getMass)]
    pub fn get_mass(&self, name: &str) -> Result<f64, JsError> {
        Ok(self.system.get_mass(name).map_err(to_js)?.value())
    }

    /// Override a body's position (metres) and velocity (m/s).
    #[wasm_bindgen(js_name = setPositionVelocity)]
    pub fn set_position_velocity(
        &mut self,
        name: &str,
        px: f64,
        py: f64,
        pz: f64,
        vx: f64,
        vy: f64,
        vz: f64,
    ) -> Result<(), JsError> {
        self.system
            .set_position_velocity(name, Vector3::new(px, py, pz), Vector3::new(vx, vy, vz))
            .map_err(to_js)
    }

    /// Read a body's current position (metres) as `[x, y, z]`.
    #[wasm_bindgen(js_name = getPosition)]
    pub fn get_position(&self, name: &str) -> Result<Box<[f64]>, JsError> {
        let p = self.system.get_position(name).map_err(to_js)?;
        Ok(vec3_array(p).to_vec().into_boxed_slice())
    }

    /// Read a body's current velocity (m/s) as `[x, y, z]`.
    #[wasm_bindgen(js_name = getVelocity)]
    pub fn get_velocity(&self, name: &str) -> Result<Box<[f64]>, JsError> {
        let v = self.system.get_velocity(name).map_err(to_js)?;
        Ok(vec3_array(v).to_vec().into_boxed_slice())
    }

    /// Switch the active integrator kernel: `"NEWTON"`, `"PPN_GR"`, or `"CWPM"`.
    #[wasm_bindgen(js_name = setIntegratorKind)]
    pub fn set_integrator_kind(&mut self, kind: &str) -> Result<(), JsError> {
        self.system.set_integrator_kind(parse_integrator_kind(kind)?);
        Ok(())
    }

    /// The name of the active integrator kernel.
    #[wasm_bindgen(js_name = integratorKind)]
    pub fn integrator_kind(&self) -> String {
        integrator_kind_name(self.system.integrator_kind()).to_string()
    }

    /// The current simulated UTC calendar instant.
    /// Returns `{ year, month, day, hour, minute, second }`.
    #[wasm_bindgen(js_name = simulationDateTime)]
    pub fn simulation_date_time(&self) -> Result<JsValue, JsError> {
        let instant = self.system.simulation_date_time().map_err(to_js)?;
        to_js_value(&instant_to_view(&instant))
    }

    /// Every present body: name, kind, mass, current position/velocity and
    /// trajectory trail, ready to hand to a renderer.
    #[wasm_bindgen]
    pub fn bodies(&self) -> Result<JsValue, JsError> {
        let views: Vec<BodyView> = self
            .system
            .bodies()
            .map(|body| {
                let mass = self
                    .system
                    .get_mass(&body.name)
                    .map(|m| m.value())
                    .unwrap_or(0.0);
                let position = self
                    .system
                    .get_position(&body.name)
                    .map(vec3_array)
                    .unwrap_or([0.0, 0.0, 0.0]);
                let velocity = self
                    .system
                    .get_velocity(&body.name)
                    .map(vec3_array)
                    .unwrap_or([0.0, 0.0, 0.0]);
                BodyView {
                    name: body.name.clone(),
                    kind: body_kind_name(body.kind),
                    mass,
                    position,
                    velocity,
                    trajectory: body.trajectory.iter().copied().map(vec3_array).collect(),
                }
            })
            .collect();
        to_js_value(&views)
    }

    /// Total system energy (kinetic plus pairwise Newtonian potential),
    /// useful for a renderer's drift diagnostic overlay.
    #[wasm_bindgen(js_name = totalEnergy)]
    pub fn total_energy(&self) -> f64 {
        self.system.total_energy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn initializes_and_lists_nine_bodies() {
        let orrery = Orrery::new(2000, 1, 1, 12, 0, 0).unwrap();
        let bodies = orrery.bodies().unwrap();
        let views: Vec<serde_json::Value> = serde_wasm_bindgen::from_value(bodies).unwrap();
        assert_eq!(views.len(), 9);
    }

    #[wasm_bindgen_test]
    fn advancing_changes_simulated_date() {
        let mut orrery = Orrery::new(2000, 1, 1, 12, 0, 0).unwrap();
        orrery.advance_forward(10, false).unwrap();
        let view = orrery.simulation_date_time().unwrap();
        let parsed: InstantView = serde_wasm_bindgen::from_value(view).unwrap();
        assert_eq!(parsed.year, 2000);
    }

    #[wasm_bindgen_test]
    fn snapshot_round_trips_through_the_wasm_boundary() {
        let orrery = Orrery::new(2000, 1, 1, 12, 0, 0).unwrap();
        let bytes = orrery.save_snapshot().unwrap();
        let restored = Orrery::from_snapshot(&bytes).unwrap();
        assert_eq!(
            orrery.get_position("Earth").unwrap(),
            restored.get_position("Earth").unwrap()
        );
    }

    #[wasm_bindgen_test]
    fn rejects_unknown_integrator_kind_name() {
        let mut orrery = Orrery::new(2000, 1, 1, 12, 0, 0).unwrap();
        assert!(orrery.set_integrator_kind("quantum").is_err());
    }

    #[wasm_bindgen_test]
    fn kepler_solver_is_reachable_through_the_bridge() {
        let value = solve_kepler(1.0, 0.1).unwrap();
        let json: serde_json::Value = serde_wasm_bindgen::from_value(value).unwrap();
        assert!(json["residual"].as_f64().unwrap() < 1e-10);
    }
}
