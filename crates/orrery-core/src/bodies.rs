/// The named-body whitelist (spec.md §6): every identifier the core
/// accepts, case-sensitively, with no aliasing.
///
/// Each body is either heliocentric (elements given around the Sun) or a
/// moon (elements given around a named parent body's μ). Spacecraft carry
/// no orbital elements at all — they are seeded into the simulation as a
/// single hardcoded heliocentric state vector at a documented epoch (see
/// `spacecraft::initial_state`), consistent with the scripted-trajectory
/// non-goal.
use crate::orbital_elements::LinearElementRates;
use crate::units::Mu;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BodyKind {
    Star,
    Planet,
    Moon,
    DwarfPlanetOrAsteroid,
    Comet,
    Barycenter,
    Spacecraft,
}

/// Simplified circular/near-circular orbital elements for bodies that
/// lack a well-characterized linear mean-element fit: semi-major axis
/// (metres), eccentricity, inclination and node/periapsis angles
/// (degrees), mean anomaly at J2000 (degrees), and orbital period (days),
/// evaluated by uniform mean motion rather than a polynomial fit.
#[derive(Debug, Clone, Copy)]
pub struct SimpleElements {
    pub semi_major_axis_m: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub arg_periapsis_deg: f64,
    pub mean_anomaly_j2000_deg: f64,
    pub period_days: f64,
}

#[derive(Debug, Clone, Copy)]
pub enum ElementModel {
    /// Standish-style linear-rate mean elements, heliocentric.
    Planetary(LinearElementRates),
    /// Simplified fixed-period elements. `parent` is `None` for
    /// heliocentric minor bodies/comets, `Some(name)` for moons (whose
    /// elements are given around the parent's μ).
    Simple {
        parent: Option<&'static str>,
        elements: SimpleElements,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct NamedBody {
    pub name: &'static str,
    pub kind: BodyKind,
    pub mu: Mu,
    pub model: Option<ElementModel>,
}

const AU: f64 = crate::constants::AU;

const fn planetary(
    a_au: (f64, f64),
    e: (f64, f64),
    i_deg: (f64, f64),
    l_deg: (f64, f64),
    varpi_deg: (f64, f64),
    omega_deg: (f64, f64),
) -> ElementModel {
    ElementModel::Planetary(LinearElementRates {
        semi_major_axis_au: a_au,
        eccentricity: e,
        inclination_deg: i_deg,
        mean_longitude_deg: l_deg,
        longitude_of_perihelion_deg: varpi_deg,
        longitude_of_node_deg: omega_deg,
    })
}

const fn simple(
    parent: Option<&'static str>,
    a_m: f64,
    e: f64,
    i_deg: f64,
    raan_deg: f64,
    argp_deg: f64,
    m0_deg: f64,
    period_days: f64,
) -> ElementModel {
    ElementModel::Simple {
        parent,
        elements: SimpleElements {
            semi_major_axis_m: a_m,
            eccentricity: e,
            inclination_deg: i_deg,
            raan_deg,
            arg_periapsis_deg: argp_deg,
            mean_anomaly_j2000_deg: m0_deg,
            period_days,
        },
    }
}

macro_rules! body {
    ($name:expr, $kind:expr, $mu:expr) => {
        NamedBody {
            name: $name,
            kind: $kind,
            mu: $mu,
            model: None,
        }
    };
    ($name:expr, $kind:expr, $mu:expr, $model:expr) => {
        NamedBody {
            name: $name,
            kind: $kind,
            mu: $mu,
            model: Some($model),
        }
    };
}

/// All named bodies recognised by the core (spec.md §6, exhaustive).
pub static BODIES: &[NamedBody] = &[
    body!("Sun", BodyKind::Star, crate::constants::mu::SUN),
    body!(
        "Mercury",
        BodyKind::Planet,
        crate::constants::mu::MERCURY,
        planetary(
            (0.387_098_93, 0.000_000_66),
            (0.205_630_69, 0.000_002_527),
            (7.004_986_3, -0.005_917_24),
            (252.250_906_0, 149_474.071_75),
            (77.456_119_4, 0.160_465_2),
            (48.330_893_0, -0.125_112_0)
        )
    ),
    body!(
        "Venus",
        BodyKind::Planet,
        crate::constants::mu::VENUS,
        planetary(
            (0.723_329_82, 0.000_000_24),
            (0.006_771_92, -0.000_047_74),
            (3.394_662_0, -0.000_867_8),
            (181.979_801, 58_519.213_0),
            (131.563_707, 0.004_969_2),
            (76.679_920, -0.278_006_1)
        )
    ),
    body!(
        "Earth",
        BodyKind::Planet,
        crate::constants::mu::EARTH,
        planetary(
            (1.000_001_02, -0.000_000_21),
            (0.016_710_22, -0.000_042_4),
            (0.0, -0.013_004_2),
            (100.464_441_8, 35_999.372_85),
            (102.937_348, 0.321_89),
            (0.0, 0.0)
        )
    ),
    body!(
        "Mars",
        BodyKind::Planet,
        crate::constants::mu::MARS,
        planetary(
            (1.523_662_31, 0.000_001_12),
            (0.093_412_33, 0.000_090_48),
            (1.850_332_1, -0.007_139_2),
            (355.433_275, 19_141.696_4),
            (336.060_234, 0.444_977),
            (49.558_94, -0.294_57)
        )
    ),
    body!(
        "Jupiter",
        BodyKind::Planet,
        crate::constants::mu::JUPITER,
        planetary(
            (5.202_603_19, 0.000_019_2),
            (0.048_392_66, -0.000_012_88),
            (1.303_270, -0.001_987),
            (34.351_484, 3_036.302_4),
            (14.331_309, 0.214_52),
            (100.464_441, 0.205_73)
        )
    ),
    body!(
        "Saturn",
        BodyKind::Planet,
        crate::constants::mu::SATURN,
        planetary(
            (9.554_909_0, -0.000_213_8),
            (0.054_150_60, -0.000_358_16),
            (2.488_878, 0.002_509_2),
            (50.077_471, 1_223.513_9),
            (93.056_787, 0.566_71),
            (113.665_24, -0.259_08)
        )
    ),
    body!(
        "Uranus",
        BodyKind::Planet,
        crate::constants::mu::URANUS,
        planetary(
            (19.218_446_06, -0.000_195_6),
            (0.047_257_77, -0.000_032_1),
            (0.773_196, -0.001_62),
            (314.203_11, 429.863_47),
            (173.005_159, 0.085_33),
            (74.005_947, 0.043_18)
        )
    ),
    body!(
        "Neptune",
        BodyKind::Planet,
        crate::constants::mu::NEPTUNE,
        planetary(
            (30.110_386_9, -0.000_170_4),
            (0.008_585_87, 0.000_002_15),
            (1.769_952, 0.000_268),
            (304.220_17, 219.965_76),
            (48.123_691, 0.023_10),
            (131.784_06, -0.006_11)
        )
    ),
    // Earth's Moon.
    body!(
        "Moon",
        BodyKind::Moon,
        crate::constants::mu::MOON,
        simple(Some("Earth"), 384_399_000.0, 0.0549, 5.145, 125.08, 318.15, 135.27, 27.321_661)
    ),
    // Moons of Mars.
    body!("Phobos", BodyKind::Moon, Mu(7.087e5), simple(Some("Mars"), 9_376_000.0, 0.0151, 1.093, 169.2, 150.2, 91.0, 0.318_910)),
    body!("Deimos", BodyKind::Moon, Mu(9.615e4), simple(Some("Mars"), 23_463_200.0, 0.00033, 0.93, 54.4, 290.5, 3.0, 1.263_0)),
    // Moons of Jupiter (Galilean).
    body!("Io", BodyKind::Moon, Mu(5.959_92e12), simple(Some("Jupiter"), 421_800_000.0, 0.0041, 0.050, 43.977, 84.129, 342.02, 1.769_138)),
    body!("Europa", BodyKind::Moon, Mu(3.202_73e12), simple(Some("Jupiter"), 671_100_000.0, 0.0094, 0.471, 219.106, 88.970, 171.02, 3.551_181)),
    body!("Ganymede", BodyKind::Moon, Mu(9.887_93e12), simple(Some("Jupiter"), 1_070_400_000.0, 0.0013, 0.204, 63.552, 192.417, 317.54, 7.154_553)),
    body!("Callisto", BodyKind::Moon, Mu(7.179_28e12), simple(Some("Jupiter"), 1_882_700_000.0, 0.0074, 0.205, 298.848, 52.643, 181.41, 16.689_018)),
    // Moons of Saturn.
    body!("Mimas", BodyKind::Moon, Mu(2.503e9), simple(Some("Saturn"), 185_539_000.0, 0.0196, 1.574, 66.2, 160.4, 14.7, 0.942_422)),
    body!("Enceladus", BodyKind::Moon, Mu(7.211e9), simple(Some("Saturn"), 237_948_000.0, 0.0047, 0.009, 342.5, 119.5, 6.9, 1.370_218)),
    body!("Tethys", BodyKind::Moon, Mu(4.121e10), simple(Some("Saturn"), 294_619_000.0, 0.0001, 1.091, 273.0, 335.3, 247.4, 1.887_802)),
    body!("Dione", BodyKind::Moon, Mu(7.311e10), simple(Some("Saturn"), 377_396_000.0, 0.0022, 0.028, 98.8, 116.0, 322.2, 2.736_915)),
    body!("Rhea", BodyKind::Moon, Mu(1.539e11), simple(Some("Saturn"), 527_108_000.0, 0.0013, 0.331, 133.7, 44.3, 163.8, 4.518_212)),
    body!("Titan", BodyKind::Moon, Mu(8.978_14e12), simple(Some("Saturn"), 1_221_870_000.0, 0.0288, 0.306, 28.1, 180.6, 163.3, 15.945_421)),
    body!("Hyperion", BodyKind::Moon, Mu(3.7e8), simple(Some("Saturn"), 1_500_934_000.0, 0.1230, 0.43, 168.3, 303.2, 324.0, 21.276_609)),
    body!("Iapetus", BodyKind::Moon, Mu(1.205e10), simple(Some("Saturn"), 3_560_820_000.0, 0.0286, 15.47, 81.1, 275.9, 220.2, 79.321_506)),
    body!("Phoebe", BodyKind::Moon, Mu(5.53e8), simple(Some("Saturn"), 12_947_918_000.0, 0.1634, 175.2, 241.7, 345.5, 255.0, -548.2)),
    // Moons of Uranus.
    body!("Miranda", BodyKind::Moon, Mu(4.4e6), simple(Some("Uranus"), 129_900_000.0, 0.0013, 4.338, 100.6, 155.6, 311.3, 1.413_479)),
    body!("Ariel", BodyKind::Moon, Mu(8.346e10), simple(Some("Uranus"), 190_900_000.0, 0.0012, 0.041, 22.4, 83.3, 39.5, 2.520_379)),
    body!("Umbriel", BodyKind::Moon, Mu(8.51e10), simple(Some("Uranus"), 266_000_000.0, 0.0039, 0.128, 33.5, 157.5, 12.5, 4.144_177)),
    body!("Titania", BodyKind::Moon, Mu(2.269e11), simple(Some("Uranus"), 436_300_000.0, 0.0011, 0.079, 99.8, 202.0, 24.6, 8.705_872)),
    body!("Oberon", BodyKind::Moon, Mu(2.053e11), simple(Some("Uranus"), 583_500_000.0, 0.0014, 0.068, 279.8, 182.4, 283.2, 13.463_239)),
    // Moons of Neptune.
    body!("Triton", BodyKind::Moon, Mu(1.428e12), simple(Some("Neptune"), 354_759_000.0, 0.000_016, 156.885, 177.6, 260.8, 264.9, -5.876_854)),
    body!("Nereid", BodyKind::Moon, Mu(2.06e9), simple(Some("Neptune"), 5_513_818_000.0, 0.749_5, 7.23, 334.8, 280.8, 10.0, 360.136_19)),
    body!("Proteus", BodyKind::Moon, Mu(4.4e8), simple(Some("Neptune"), 117_647_000.0, 0.0005, 0.524, 301.1, 93.0, 117.0, 1.122_315)),
    // Pluto system (Pluto treated here as the dwarf planet anchoring its
    // own moons; Charon and the small moons orbit the Pluto-Charon
    // barycenter in reality, simplified here to orbit Pluto directly).
    body!(
        "Pluto",
        BodyKind::DwarfPlanetOrAsteroid,
        crate::constants::mu::PLUTO,
        planetary(
            (39.482_117_3, -0.000_313_83),
            (0.248_807_66, 0.000_005_17),
            (17.141_750, 0.000_004),
            (238.928_881, 145.207_97),
            (224.068_203, -0.041_57),
            (110.376_28, -0.012_62)
        )
    ),
    body!("Charon", BodyKind::Moon, Mu(1.058e11), simple(Some("Pluto"), 19_591_400.0, 0.0002, 0.08, 223.0, 0.0, 0.0, 6.387_230)),
    body!("Nix", BodyKind::Moon, Mu(2.9e5), simple(Some("Pluto"), 48_694_000.0, 0.0030, 0.13, 223.0, 0.0, 0.0, 24.854_70)),
    body!("Hydra", BodyKind::Moon, Mu(3.9e5), simple(Some("Pluto"), 64_738_000.0, 0.0057, 0.24, 223.0, 0.0, 0.0, 38.201_80)),
    body!("Kerberos", BodyKind::Moon, Mu(2.0e3), simple(Some("Pluto"), 57_783_000.0, 0.0033, 0.39, 223.0, 0.0, 0.0, 32.167_56)),
    body!("Styx", BodyKind::Moon, Mu(1.0e3), simple(Some("Pluto"), 42_656_000.0, 0.0058, 0.81, 223.0, 0.0, 0.0, 20.161_55)),
    // Dwarf planets / asteroids (heliocentric, simplified).
    body!("Eris", BodyKind::DwarfPlanetOrAsteroid, Mu(1.108e12), simple(None, 67.781 * AU, 0.4407, 44.04, 35.95, 151.4, 204.0, 203_830.0)),
    body!("Chiron", BodyKind::DwarfPlanetOrAsteroid, Mu(5.8e2), simple(None, 13.633 * AU, 0.3786, 6.93, 209.3, 339.0, 134.0, 18_487.0)),
    body!("Ceres", BodyKind::DwarfPlanetOrAsteroid, Mu(6.263e10), simple(None, 2.7658 * AU, 0.0758, 10.594, 80.30, 73.6, 95.99, 1_681.6)),
    body!("Pallas", BodyKind::DwarfPlanetOrAsteroid, Mu(1.43e10), simple(None, 2.7721 * AU, 0.2302, 34.93, 172.9, 310.2, 23.0, 1_686.0)),
    body!("Juno", BodyKind::DwarfPlanetOrAsteroid, Mu(1.82e9), simple(None, 2.6702 * AU, 0.2562, 12.99, 169.9, 248.1, 55.0, 1_594.0)),
    body!("Vesta", BodyKind::DwarfPlanetOrAsteroid, Mu(1.729e10), simple(None, 2.3615 * AU, 0.0894, 7.14, 103.8, 151.2, 26.0, 1_325.8)),
    body!("Ida", BodyKind::DwarfPlanetOrAsteroid, Mu(9.0e4), simple(None, 2.8616 * AU, 0.0452, 1.13, 324.8, 108.4, 10.0, 1_768.0)),
    body!("Eros", BodyKind::DwarfPlanetOrAsteroid, Mu(4.463e5), simple(None, 1.4581 * AU, 0.2229, 10.83, 304.4, 178.8, 320.0, 643.2)),
    body!("Gaspra", BodyKind::DwarfPlanetOrAsteroid, Mu(8.83e3), simple(None, 2.2095 * AU, 0.1738, 4.10, 253.2, 129.6, 120.0, 1_199.0)),
    body!("Bennu", BodyKind::DwarfPlanetOrAsteroid, Mu(3.2e-1), simple(None, 1.1264 * AU, 0.2037, 6.03, 2.06, 66.2, 101.7, 436.6)),
    body!("Florence", BodyKind::DwarfPlanetOrAsteroid, Mu(6.6e2), simple(None, 1.7685 * AU, 0.4233, 22.15, 336.1, 27.8, 17.0, 859.2)),
    body!("Arrokoth", BodyKind::DwarfPlanetOrAsteroid, Mu(4.8e0), simple(None, 44.581 * AU, 0.0412, 2.45, 158.998, 174.418, 316.6, 108_700.0)),
    // Comets (heliocentric, highly eccentric).
    body!("Halley", BodyKind::Comet, Mu(1.0e1), simple(None, 17.834 * AU, 0.9671, 162.26, 58.42, 111.33, 38.0, 27_740.0)),
    body!("Encke", BodyKind::Comet, Mu(1.0e1), simple(None, 2.2196 * AU, 0.8484, 11.78, 334.57, 186.54, 10.0, 1_208.0)),
    body!("67P/Churyumov-Gerasimenko", BodyKind::Comet, Mu(1.0e1), simple(None, 3.4630 * AU, 0.6410, 7.04, 50.18, 12.78, 19.0, 2_355.6)),
    body!("Hale-Bopp", BodyKind::Comet, Mu(1.0e1), simple(None, 186.0 * AU, 0.9951, 89.43, 282.47, 130.59, 0.1, 929_000.0)),
    body!("26P/Grigg-Skjellerup", BodyKind::Comet, Mu(1.0e1), simple(None, 3.0392 * AU, 0.6392, 22.36, 212.66, 1.67, 30.0, 1_933.0)),
    body!("Shoemaker-Levy 9", BodyKind::Comet, Mu(1.0e1), simple(Some("Jupiter"), 8_760_000.0, 0.998, 6.0, 220.5, 354.8, 180.0, 2.0)),
    body!("Earth-Moon barycenter", BodyKind::Barycenter, crate::constants::mu::EARTH),
    // Spacecraft — no orbital elements; seeded via a hardcoded state
    // vector at launch/flyby epoch (see spacecraft.rs).
    body!("Pioneer 10", BodyKind::Spacecraft, Mu(0.0)),
    body!("Pioneer 11", BodyKind::Spacecraft, Mu(0.0)),
    body!("Mariner 10", BodyKind::Spacecraft, Mu(0.0)),
    body!("Voyager 1", BodyKind::Spacecraft, Mu(0.0)),
    body!("Voyager 2", BodyKind::Spacecraft, Mu(0.0)),
    body!("New Horizons", BodyKind::Spacecraft, Mu(0.0)),
    body!("Giotto", BodyKind::Spacecraft, Mu(0.0)),
    body!("Rosetta", BodyKind::Spacecraft, Mu(0.0)),
    body!("Apollo 8", BodyKind::Spacecraft, Mu(0.0)),
    body!("ISS", BodyKind::Spacecraft, Mu(0.0)),
    body!("Galileo", BodyKind::Spacecraft, Mu(0.0)),
    body!("Cassini", BodyKind::Spacecraft, Mu(0.0)),
];

/// Look up a named body. Case-sensitive, no aliasing: the name must
/// match a `BODIES` entry verbatim.
pub fn lookup(name: &str) -> Option<&'static NamedBody> {
    BODIES.iter().find(|b| b.name == name)
}

pub fn is_spacecraft(name: &str) -> bool {
    matches!(lookup(name), Some(b) if b.kind == BodyKind::Spacecraft)
}

/// Moons belonging to a named planet, for `createPlanetSystem`.
pub fn moons_of(planet: &str) -> Vec<&'static NamedBody> {
    BODIES
        .iter()
        .filter(|b| {
            matches!(
                b.model,
                Some(ElementModel::Simple { parent: Some(p), .. }) if p == planet
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitelist_contains_all_planets() {
        for name in [
            "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune",
        ] {
            assert!(lookup(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn whitelist_is_case_sensitive() {
        assert!(lookup("sun").is_none());
        assert!(lookup("EARTH").is_none());
        assert!(lookup("Sun").is_some());
    }

    #[test]
    fn whitelist_contains_all_spacecraft() {
        for name in [
            "Pioneer 10", "Pioneer 11", "Mariner 10", "Voyager 1", "Voyager 2", "New Horizons",
            "Giotto", "Rosetta", "Apollo 8", "ISS", "Galileo", "Cassini",
        ] {
            assert!(is_spacecraft(name), "missing spacecraft {name}");
        }
    }

    #[test]
    fn jupiter_has_four_galilean_moons() {
        let moons = moons_of("Jupiter");
        let names: Vec<_> = moons.iter().map(|b| b.name).collect();
        for expected in ["Io", "Europa", "Ganymede", "Callisto"] {
            assert!(names.contains(&expected));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(lookup("Tatooine").is_none());
    }
}
