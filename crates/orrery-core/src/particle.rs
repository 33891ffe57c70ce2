/// The integrator's internal state for one gravitating point mass, as
/// distinct from the facade-facing `Body` (simulation.rs): a `Particle`
/// carries only what the force law and stepper need.
use crate::units::{Kilograms, Meters, Mu};
use crate::vec3::Vector3;

#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub position: Vector3,
    pub velocity: Vector3,
    pub mass: Kilograms,
    pub radius: Meters,
    /// Deactivated particles (post-collision) are excluded from force
    /// accumulation and no longer advanced, but retain their last state.
    pub active: bool,
}

impl Particle {
    pub fn new(position: Vector3, velocity: Vector3, mass: Kilograms, radius: Meters) -> Self {
        Self {
            position,
            velocity,
            mass,
            radius,
            active: true,
        }
    }

    pub fn mu(&self) -> Mu {
        self.mass.mu()
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// True if `self` and `other` have collided (centre separation below
    /// the sum of their radii). Deactivated particles never collide again.
    pub fn has_collided_with(&self, other: &Particle) -> bool {
        if !self.active || !other.active {
            return false;
        }
        let separation = self.position.distance(other.position);
        separation < (self.radius.value() + other.radius.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle_at(x: f64, mass: f64, radius: f64) -> Particle {
        Particle::new(
            Vector3::new(x, 0.0, 0.0),
            Vector3::zero(),
            Kilograms(mass),
            Meters(radius),
        )
    }

    #[test]
    fn new_particle_is_active() {
        let p = particle_at(0.0, 1.0, 1.0);
        assert!(p.active);
    }

    #[test]
    fn deactivate_marks_inactive() {
        let mut p = particle_at(0.0, 1.0, 1.0);
        p.deactivate();
        assert!(!p.active);
    }

    #[test]
    fn detects_collision_when_overlapping() {
        let a = particle_at(0.0, 1.0, 10.0);
        let b = particle_at(15.0, 1.0, 10.0);
        assert!(a.has_collided_with(&b));
    }

    #[test]
    fn no_collision_when_far_apart() {
        let a = particle_at(0.0, 1.0, 10.0);
        let b = particle_at(1000.0, 1.0, 10.0);
        assert!(!a.has_collided_with(&b));
    }

    #[test]
    fn inactive_particles_never_collide() {
        let mut a = particle_at(0.0, 1.0, 10.0);
        let b = particle_at(15.0, 1.0, 10.0);
        a.deactivate();
        assert!(!a.has_collided_with(&b));
    }

    #[test]
    fn mu_matches_mass() {
        let p = particle_at(0.0, 5.972e24, 6.378e6);
        assert!((p.mu().value() - crate::constants::mu::EARTH.value()).abs() / crate::constants::mu::EARTH.value() < 1e-3);
    }
}
