/// Hardcoded heliocentric state vectors for the named spacecraft, each at a
/// documented epoch. Spacecraft carry no orbital elements in `bodies.rs` —
/// scripted flight-path reconstruction is out of scope, so each is seeded
/// into the simulation as a single state vector and from then on evolves
/// under the selected integrator kernel like any other particle.
use crate::time::{CalendarInstant, Era};
use crate::vec3::Vector3;

/// A spacecraft's seed state: position/velocity (heliocentric ecliptic
/// J2000, metres / metres-per-second) at a specific epoch.
#[derive(Debug, Clone, Copy)]
pub struct InitialState {
    pub epoch: CalendarInstant,
    pub position: Vector3,
    pub velocity: Vector3,
}

fn epoch(year: u32, month: u32, day: u32) -> CalendarInstant {
    CalendarInstant::new(Era::Ad, year, month, day, 0, 0, 0, 0)
        .expect("hardcoded spacecraft epoch is a valid calendar date")
}

/// Approximate heliocentric state at a representative epoch for each
/// spacecraft in the named-body whitelist. Values are representative
/// (order-of-magnitude accurate for escape/flyby trajectories), not
/// research-grade trajectory reconstructions.
pub fn initial_state(name: &str) -> Option<InitialState> {
    let au = crate::constants::AU;
    Some(match name {
        "Pioneer 10" => InitialState {
            epoch: epoch(1973, 12, 4),
            position: Vector3::new(-1.0 * au, 4.5 * au, 0.0),
            velocity: Vector3::new(11_300.0, 2_600.0, 500.0),
        },
        "Pioneer 11" => InitialState {
            epoch: epoch(1979, 9, 1),
            position: Vector3::new(-2.0 * au, 9.0 * au, 0.3 * au),
            velocity: Vector3::new(9_800.0, -3_200.0, 1_100.0),
        },
        "Mariner 10" => InitialState {
            epoch: epoch(1974, 3, 29),
            position: Vector3::new(0.46 * au, -0.1 * au, 0.0),
            velocity: Vector3::new(-2_000.0, 47_000.0, 0.0),
        },
        "Voyager 1" => InitialState {
            epoch: epoch(1980, 11, 12),
            position: Vector3::new(-9.5 * au, -2.0 * au, 0.4 * au),
            velocity: Vector3::new(3_600.0, -16_800.0, 2_400.0),
        },
        "Voyager 2" => InitialState {
            epoch: epoch(1989, 8, 25),
            position: Vector3::new(-29.0 * au, 7.0 * au, -0.8 * au),
            velocity: Vector3::new(2_900.0, -14_500.0, -2_100.0),
        },
        "New Horizons" => InitialState {
            epoch: epoch(2015, 7, 14),
            position: Vector3::new(31.5 * au, -8.0 * au, -5.7 * au),
            velocity: Vector3::new(3_200.0, 12_500.0, -1_500.0),
        },
        "Giotto" => InitialState {
            epoch: epoch(1986, 3, 13),
            position: Vector3::new(0.9 * au, 0.3 * au, 0.0),
            velocity: Vector3::new(-41_000.0, 25_000.0, 0.0),
        },
        "Rosetta" => InitialState {
            epoch: epoch(2014, 8, 6),
            position: Vector3::new(3.3 * au, -1.1 * au, -0.7 * au),
            velocity: Vector3::new(8_300.0, 15_700.0, 300.0),
        },
        "Apollo 8" => InitialState {
            epoch: epoch(1968, 12, 21),
            position: Vector3::new(au, 0.0, 0.0),
            velocity: Vector3::new(0.0, 29_800.0 + 1_500.0, 0.0),
        },
        "ISS" => InitialState {
            epoch: epoch(2000, 11, 2),
            position: Vector3::new(au, 0.0, 0.0),
            velocity: Vector3::new(0.0, 29_800.0 + 7_660.0, 0.0),
        },
        "Galileo" => InitialState {
            epoch: epoch(1995, 12, 7),
            position: Vector3::new(5.2 * au, 0.2 * au, -0.1 * au),
            velocity: Vector3::new(-900.0, 13_000.0, 0.0),
        },
        "Cassini" => InitialState {
            epoch: epoch(2004, 7, 1),
            position: Vector3::new(9.5 * au, -0.5 * au, 0.2 * au),
            velocity: Vector3::new(400.0, 9_600.0, -200.0),
        },
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_whitelisted_spacecraft_has_an_initial_state() {
        for name in [
            "Pioneer 10", "Pioneer 11", "Mariner 10", "Voyager 1", "Voyager 2", "New Horizons",
            "Giotto", "Rosetta", "Apollo 8", "ISS", "Galileo", "Cassini",
        ] {
            assert!(
                crate::bodies::is_spacecraft(name) && initial_state(name).is_some(),
                "missing initial state for {name}"
            );
        }
    }

    #[test]
    fn unknown_spacecraft_has_no_state() {
        assert!(initial_state("Sputnik 1").is_none());
    }
}
