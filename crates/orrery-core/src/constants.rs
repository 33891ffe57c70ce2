/// Physical and orbital constants in SI units.
/// Source: NASA JPL DE440/DE441 gravitational parameters; Standish (1992)
/// "approximate positions of the planets" mean elements.
use crate::units::{Meters, Mu};

/// Astronomical unit, metres.
pub const AU: f64 = 149_597_870_700.0;

/// Gravitational parameter μ = GM, SI units (m³/s²).
pub mod mu {
    use super::Mu;

    /// Sun μ — NASA JPL DE440.
    pub const SUN: Mu = Mu(1.327_124_400_41e20);

    pub const MERCURY: Mu = Mu(2.203_2e13);
    pub const VENUS: Mu = Mu(3.248_59e14);
    /// Earth alone (excludes Moon).
    pub const EARTH: Mu = Mu(3.986_004_418e14);
    pub const MOON: Mu = Mu(4.902_800_66e12);
    pub const MARS: Mu = Mu(4.282_837_14e13);
    pub const JUPITER: Mu = Mu(1.266_865_349e17);
    pub const SATURN: Mu = Mu(3.793_120_749e16);
    pub const URANUS: Mu = Mu(5.793_939e15);
    pub const NEPTUNE: Mu = Mu(6.836_529e15);
    pub const PLUTO: Mu = Mu(8.71e11);
}

/// Mean heliocentric semi-major axes (J2000), metres.
pub mod semi_major_axis {
    use super::Meters;
    use crate::constants::AU;

    pub const MERCURY: Meters = Meters(0.387_098_93 * AU);
    pub const VENUS: Meters = Meters(0.723_335_66 * AU);
    pub const EARTH: Meters = Meters(1.000_002_61 * AU);
    pub const MARS: Meters = Meters(1.523_710_34 * AU);
    pub const JUPITER: Meters = Meters(5.202_887_00 * AU);
    pub const SATURN: Meters = Meters(9.536_675_94 * AU);
    pub const URANUS: Meters = Meters(19.189_164_64 * AU);
    pub const NEPTUNE: Meters = Meters(30.069_922_76 * AU);
}

/// Earth mean equatorial radius, metres — used for default body diameters
/// and collision-radius sanity checks in tests.
pub const EARTH_RADIUS: Meters = Meters(6_378_137.0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mu_sun_order_of_magnitude() {
        assert!(mu::SUN.value() > 1.3e20);
        assert!(mu::SUN.value() < 1.4e20);
    }

    #[test]
    fn mu_ordering() {
        assert!(mu::SUN.value() > mu::JUPITER.value());
        assert!(mu::JUPITER.value() > mu::SATURN.value());
        assert!(mu::SATURN.value() > mu::NEPTUNE.value());
        assert!(mu::NEPTUNE.value() > mu::URANUS.value());
        assert!(mu::URANUS.value() > mu::EARTH.value());
        assert!(mu::EARTH.value() > mu::VENUS.value());
        assert!(mu::VENUS.value() > mu::MARS.value());
        assert!(mu::MARS.value() > mu::MERCURY.value());
    }

    #[test]
    fn earth_orbit_is_1au() {
        assert!((semi_major_axis::EARTH.value() - AU).abs() / AU < 0.001);
    }

    #[test]
    fn mars_orbit_ratio() {
        let ratio = semi_major_axis::MARS.value() / semi_major_axis::EARTH.value();
        assert!((ratio - 1.524).abs() < 0.01);
    }
}
