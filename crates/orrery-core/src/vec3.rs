/// Generic 3D vector for use with unit newtypes, plus the SI `Vector3`
/// specialization used throughout the rest of the crate.
use std::fmt;
use std::ops::{Add, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T: Copy> Vec3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }
}

impl<T> Add for Vec3<T>
where
    T: Add<Output = T>,
{
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl<T> Sub for Vec3<T>
where
    T: Sub<Output = T>,
{
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl<T> Neg for Vec3<T>
where
    T: Neg<Output = T>,
{
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl<T> Vec3<T>
where
    T: Copy + std::ops::Mul<f64, Output = T>,
{
    /// Scalar multiplication
    pub fn scale(self, s: f64) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }
}

/// Trait for types that wrap an f64 value.
#[allow(clippy::wrong_self_convention)]
pub trait AsF64 {
    fn as_f64(self) -> f64;
}

impl AsF64 for f64 {
    fn as_f64(self) -> f64 {
        self
    }
}

impl<T: Copy + AsF64> Vec3<T> {
    /// Dot product returning f64 (in squared units of T).
    pub fn dot_raw(self, rhs: Self) -> f64 {
        self.x.as_f64() * rhs.x.as_f64()
            + self.y.as_f64() * rhs.y.as_f64()
            + self.z.as_f64() * rhs.z.as_f64()
    }

    /// Euclidean norm (magnitude) as f64, in units of T.
    pub fn norm_raw(self) -> f64 {
        self.dot_raw(self).sqrt()
    }

    /// Cross product with same type, returning Vec3<f64> (units are T²).
    pub fn cross_raw(self, rhs: Self) -> Vec3<f64> {
        Vec3 {
            x: self.y.as_f64() * rhs.z.as_f64() - self.z.as_f64() * rhs.y.as_f64(),
            y: self.z.as_f64() * rhs.x.as_f64() - self.x.as_f64() * rhs.z.as_f64(),
            z: self.x.as_f64() * rhs.y.as_f64() - self.y.as_f64() * rhs.x.as_f64(),
        }
    }

    /// Cross product with a different type, returning Vec3<f64> (units are T·U).
    pub fn cross_raw_with<U: Copy + AsF64>(self, rhs: Vec3<U>) -> Vec3<f64> {
        Vec3 {
            x: self.y.as_f64() * rhs.z.as_f64() - self.z.as_f64() * rhs.y.as_f64(),
            y: self.z.as_f64() * rhs.x.as_f64() - self.x.as_f64() * rhs.z.as_f64(),
            z: self.x.as_f64() * rhs.y.as_f64() - self.y.as_f64() * rhs.x.as_f64(),
        }
    }
}

impl Vec3<f64> {
    /// Normalize to unit vector. Returns zero vector if norm is zero.
    pub fn normalize(self) -> Self {
        let n = self.norm_raw();
        if n < 1e-15 {
            Self::new(0.0, 0.0, 0.0)
        } else {
            self.scale(1.0 / n)
        }
    }

    pub fn dot(self, rhs: Self) -> f64 {
        self.dot_raw(rhs)
    }

    pub fn cross(self, rhs: Self) -> Self {
        self.cross_raw(rhs)
    }

    pub fn magnitude(self) -> f64 {
        self.norm_raw()
    }

    pub fn distance(self, rhs: Self) -> f64 {
        (self - rhs).norm_raw()
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Rotate about the X axis by `angle` radians (right-handed).
    pub fn rotate_x(self, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(self.x, c * self.y - s * self.z, s * self.y + c * self.z)
    }

    /// Rotate about the Y axis by `angle` radians (right-handed).
    pub fn rotate_y(self, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(c * self.x + s * self.z, self.y, -s * self.x + c * self.z)
    }

    /// Rotate about the Z axis by `angle` radians (right-handed).
    pub fn rotate_z(self, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(c * self.x - s * self.y, s * self.x + c * self.y, self.z)
    }

    pub fn rotate_x_deg(self, angle_deg: f64) -> Self {
        self.rotate_x(angle_deg.to_radians())
    }

    pub fn rotate_y_deg(self, angle_deg: f64) -> Self {
        self.rotate_y(angle_deg.to_radians())
    }

    pub fn rotate_z_deg(self, angle_deg: f64) -> Self {
        self.rotate_z(angle_deg.to_radians())
    }

    /// Express this vector (given in the standard basis) in terms of the
    /// orthonormal basis `(xc, yc, zc)`: returns `(v·xc, v·yc, v·zc)` as a
    /// new vector in that basis's coordinates.
    pub fn into_basis(self, xc: Self, yc: Self, zc: Self) -> Self {
        Self::new(self.dot(xc), self.dot(yc), self.dot(zc))
    }

    /// Reconstruct a standard-basis vector from coordinates `self` expressed
    /// in the orthonormal basis `(xc, yc, zc)`.
    pub fn from_basis(self, xc: Self, yc: Self, zc: Self) -> Self {
        xc.scale(self.x) + yc.scale(self.y) + zc.scale(self.z)
    }
}

impl<T: fmt::Display> fmt::Display for Vec3<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

use crate::units::{Meters, MetersPerSec};

impl AsF64 for Meters {
    fn as_f64(self) -> f64 {
        self.value()
    }
}

impl AsF64 for MetersPerSec {
    fn as_f64(self) -> f64 {
        self.value()
    }
}

/// Position/velocity vectors in the crate's canonical SI frame
/// (heliocentric ecliptic J2000, metres / metres-per-second).
pub type Vector3 = Vec3<f64>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{Meters, MetersPerSec};
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn vec3_f64_operations() {
        let a = Vec3::new(1.0_f64, 2.0, 3.0);
        let b = Vec3::new(4.0_f64, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::new(3.0, 3.0, 3.0));
    }

    #[test]
    fn vec3_meters_operations() {
        let a = Vec3::new(Meters(1.0), Meters(0.0), Meters(0.0));
        let b = Vec3::new(Meters(0.0), Meters(1.0), Meters(0.0));
        assert_eq!(a + b, Vec3::new(Meters(1.0), Meters(1.0), Meters(0.0)));
    }

    #[test]
    fn vec3_dot_and_norm() {
        let v = Vec3::new(Meters(3.0), Meters(4.0), Meters(0.0));
        assert!((v.norm_raw() - 5.0).abs() < 1e-15);
        assert!((v.dot_raw(v) - 25.0).abs() < 1e-15);
    }

    #[test]
    fn vec3_cross_product() {
        let x = Vec3::new(Meters(1.0), Meters(0.0), Meters(0.0));
        let y = Vec3::new(Meters(0.0), Meters(1.0), Meters(0.0));
        let z = x.cross_raw(y);
        assert!((z.z - 1.0).abs() < 1e-15);
    }

    #[test]
    fn vec3_normalize() {
        let v = Vec3::new(3.0_f64, 4.0, 0.0);
        let n = v.normalize();
        assert!((n.norm_raw() - 1.0).abs() < 1e-15);
        assert!((n.x - 0.6).abs() < 1e-15);
    }

    #[test]
    fn vec3_normalize_zero() {
        let v = Vec3::new(0.0_f64, 0.0, 0.0);
        assert!((v.normalize().norm_raw()).abs() < 1e-15);
    }

    #[test]
    fn rotate_z_quarter_turn() {
        let v = Vector3::new(1.0, 0.0, 0.0);
        let r = v.rotate_z(FRAC_PI_2);
        assert!(r.x.abs() < 1e-12);
        assert!((r.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rotate_x_half_turn() {
        let v = Vector3::new(0.0, 1.0, 0.0);
        let r = v.rotate_x(PI);
        assert!((r.y + 1.0).abs() < 1e-10);
        assert!(r.z.abs() < 1e-10);
    }

    #[test]
    fn rotate_preserves_magnitude() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        let r = v.rotate_y_deg(37.0).rotate_z_deg(91.0);
        assert!((r.magnitude() - v.magnitude()).abs() < 1e-12);
    }

    #[test]
    fn basis_round_trip() {
        let xc = Vector3::new(1.0, 0.0, 0.0);
        let yc = Vector3::new(0.0, 1.0, 0.0);
        let zc = Vector3::new(0.0, 0.0, 1.0).rotate_x(0.0);
        let v = Vector3::new(1.0, 2.0, 3.0);
        let in_basis = v.into_basis(xc, yc, zc);
        let back = in_basis.from_basis(xc, yc, zc);
        assert!(back.distance(v) < 1e-12);
    }

    #[test]
    fn speed_norm_metersec() {
        let v = Vec3::new(MetersPerSec(7.0), MetersPerSec(3.0), MetersPerSec(1.0));
        let expected = (49.0 + 9.0 + 1.0_f64).sqrt();
        assert!((v.norm_raw() - expected).abs() < 1e-15);
    }
}
