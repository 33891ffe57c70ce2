/// Type-safe SI unit newtypes for orbital mechanics.
///
/// The crate works exclusively in SI base units:
/// - Distance: metres
/// - Speed: metres/second
/// - Time: seconds
/// - Angles: radians
/// - Gravitational parameter: m³/s²
/// - Mass: kilograms
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

macro_rules! unit_newtype {
    ($name:ident, $unit_str:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
        pub struct $name(pub f64);

        impl $name {
            pub fn value(self) -> f64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} {}", self.0, $unit_str)
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl Neg for $name {
            type Output = Self;
            fn neg(self) -> Self {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self {
                Self(self.0 * rhs)
            }
        }

        impl Mul<$name> for f64 {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(self * rhs.0)
            }
        }

        impl Div<f64> for $name {
            type Output = Self;
            fn div(self, rhs: f64) -> Self {
                Self(self.0 / rhs)
            }
        }

        impl Div<$name> for $name {
            type Output = f64;
            fn div(self, rhs: $name) -> f64 {
                self.0 / rhs.0
            }
        }
    };
}

unit_newtype!(Meters, "m");
unit_newtype!(MetersPerSec, "m/s");
unit_newtype!(Seconds, "s");
unit_newtype!(Radians, "rad");
unit_newtype!(Mu, "m³/s²");
unit_newtype!(Kilograms, "kg");

/// Newtonian gravitational constant, SI units (m³ kg⁻¹ s⁻²).
pub const G: f64 = 6.674_30e-11;

impl Meters {
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }
}

impl MetersPerSec {
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }
}

impl Kilograms {
    /// Gravitational parameter μ = G·m for this mass.
    pub fn mu(self) -> Mu {
        Mu(G * self.0)
    }
}

impl Mu {
    /// Mass m = μ/G implied by this gravitational parameter.
    pub fn mass(self) -> Kilograms {
        Kilograms(self.0 / G)
    }
}

impl Radians {
    /// Normalize angle to [0, 2π)
    pub fn normalize(self) -> Self {
        let two_pi = std::f64::consts::TAU;
        let mut v = self.0 % two_pi;
        if v < 0.0 {
            v += two_pi;
        }
        Self(v)
    }

    /// Normalize angle to (-π, π]
    pub fn normalize_signed(self) -> Self {
        let two_pi = std::f64::consts::TAU;
        let pi = std::f64::consts::PI;
        let mut v = self.0 % two_pi;
        if v > pi {
            v -= two_pi;
        } else if v <= -pi {
            v += two_pi;
        }
        Self(v)
    }

    pub fn from_degrees(deg: f64) -> Self {
        Self(deg.to_radians())
    }

    pub fn to_degrees(self) -> f64 {
        self.0.to_degrees()
    }

    pub fn sin(self) -> f64 {
        self.0.sin()
    }

    pub fn cos(self) -> f64 {
        self.0.cos()
    }

    pub fn tan(self) -> f64 {
        self.0.tan()
    }
}

/// Eccentricity with validation.
/// For elliptical orbits: 0 <= e < 1
/// For hyperbolic: e > 1
/// Parabolic (e == 1) is rejected by construction — spec.md disallows it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Eccentricity(f64);

impl Eccentricity {
    /// Create a new eccentricity value. Returns None if negative or parabolic.
    pub fn new(e: f64) -> Option<Self> {
        if e >= 0.0 && (e - 1.0).abs() > 1e-12 {
            Some(Self(e))
        } else {
            None
        }
    }

    /// Create eccentricity for an elliptical orbit (0 <= e < 1).
    pub fn elliptical(e: f64) -> Option<Self> {
        if (0.0..1.0).contains(&e) {
            Some(Self(e))
        } else {
            None
        }
    }

    /// Create eccentricity for a hyperbolic orbit (e > 1).
    pub fn hyperbolic(e: f64) -> Option<Self> {
        if e > 1.0 {
            Some(Self(e))
        } else {
            None
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_circular(&self) -> bool {
        self.0 == 0.0
    }

    pub fn is_elliptical(&self) -> bool {
        self.0 < 1.0
    }

    pub fn is_parabolic(&self) -> bool {
        (self.0 - 1.0).abs() < 1e-9
    }

    pub fn is_hyperbolic(&self) -> bool {
        self.0 > 1.0
    }
}

impl fmt::Display for Eccentricity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e={}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    #[test]
    fn meters_arithmetic() {
        let a = Meters(100.0);
        let b = Meters(50.0);
        assert_eq!((a + b).value(), 150.0);
        assert_eq!((a - b).value(), 50.0);
        assert_eq!((a * 2.0).value(), 200.0);
        assert_eq!((3.0 * b).value(), 150.0);
        assert_eq!((a / 2.0).value(), 50.0);
        assert_eq!(a / b, 2.0);
    }

    #[test]
    fn radians_normalize() {
        let r = Radians(-FRAC_PI_2).normalize();
        assert!((r.value() - (TAU - FRAC_PI_2)).abs() < 1e-15);

        let r = Radians(TAU + 1.0).normalize();
        assert!((r.value() - 1.0).abs() < 1e-14);
    }

    #[test]
    fn radians_normalize_signed_boundary() {
        let r = Radians(-PI).normalize_signed();
        assert!((r.value() - PI).abs() < 1e-14);
        let r = Radians(PI).normalize_signed();
        assert!((r.value() - PI).abs() < 1e-14);
    }

    #[test]
    fn eccentricity_rejects_parabolic() {
        assert!(Eccentricity::new(1.0).is_none());
        assert!(Eccentricity::elliptical(1.0).is_none());
        assert!(Eccentricity::hyperbolic(1.0).is_none());
    }

    #[test]
    fn eccentricity_classification() {
        let elliptical = Eccentricity::new(0.5).unwrap();
        assert!(elliptical.is_elliptical());
        let hyperbolic = Eccentricity::new(1.5).unwrap();
        assert!(hyperbolic.is_hyperbolic());
    }

    #[test]
    fn mu_mass_round_trip() {
        let mass = Kilograms(5.972e24);
        let mu = mass.mu();
        let back = mu.mass();
        assert!((back.value() - mass.value()).abs() / mass.value() < 1e-12);
    }
}
