/// Classical Keplerian orbital elements, conversions to/from state vectors,
/// and orbit sampling.
///
/// Angle convention for `elementsFromStateVector`: all angles in (-180°,
/// 180°] except inclination, which is [0°, 180°].
use crate::error::{OrreryError, OrreryResult};
use crate::kepler::{
    eccentric_to_true_anomaly, solve_kepler_halley, solve_kepler_hyperbolic_halley,
    true_to_eccentric_anomaly,
};
use crate::units::{Eccentricity, Meters, MetersPerSec, Mu, Radians};
use crate::vec3::Vector3;

/// Classical Keplerian orbital elements (a, e, i, M, ω, Ω).
#[derive(Debug, Clone, Copy)]
pub struct OrbitalElements {
    /// Semi-major axis. Positive for ellipses, negative for hyperbolas.
    pub semi_major_axis: Meters,
    pub eccentricity: Eccentricity,
    /// Inclination, radians in [0, π].
    pub inclination: Radians,
    /// Mean anomaly at epoch, radians.
    pub mean_anomaly: Radians,
    /// Argument of periapsis, radians.
    pub arg_periapsis: Radians,
    /// Longitude of ascending node, radians.
    pub raan: Radians,
}

impl OrbitalElements {
    pub fn is_hyperbolic(&self) -> bool {
        self.eccentricity.is_hyperbolic()
    }
}

/// Cartesian state vector in an inertial frame.
#[derive(Debug, Clone, Copy)]
pub struct StateVector {
    pub position: Vector3,
    pub velocity: Vector3,
}

impl StateVector {
    pub fn new(position: Vector3, velocity: Vector3) -> Self {
        Self { position, velocity }
    }

    pub fn radius(&self) -> Meters {
        Meters(self.position.magnitude())
    }

    pub fn speed(&self) -> MetersPerSec {
        MetersPerSec(self.velocity.magnitude())
    }
}

/// Evaluate linear-in-time polynomial coefficients at `t` Julian centuries
/// past J2000: value = base + rate * t.
#[derive(Debug, Clone, Copy)]
pub struct LinearElementRates {
    pub semi_major_axis_au: (f64, f64),
    pub eccentricity: (f64, f64),
    pub inclination_deg: (f64, f64),
    pub mean_longitude_deg: (f64, f64),
    pub longitude_of_perihelion_deg: (f64, f64),
    pub longitude_of_node_deg: (f64, f64),
}

/// Evaluate mean orbital elements at the given epoch (centuries past
/// J2000) from polynomial coefficients, per spec.md's `elementsAt`
/// contract. Coefficients use the Standish (1992) mean-longitude /
/// longitude-of-perihelion convention; this function converts to the
/// (a, e, i, M, ω, Ω) form used throughout the rest of the crate.
pub fn elements_at(pars: &LinearElementRates, t_centuries: f64) -> OrreryResult<OrbitalElements> {
    let a_au = pars.semi_major_axis_au.0 + pars.semi_major_axis_au.1 * t_centuries;
    let e = pars.eccentricity.0 + pars.eccentricity.1 * t_centuries;
    let i_deg = pars.inclination_deg.0 + pars.inclination_deg.1 * t_centuries;
    let l_deg = pars.mean_longitude_deg.0 + pars.mean_longitude_deg.1 * t_centuries;
    let varpi_deg =
        pars.longitude_of_perihelion_deg.0 + pars.longitude_of_perihelion_deg.1 * t_centuries;
    let omega_deg = pars.longitude_of_node_deg.0 + pars.longitude_of_node_deg.1 * t_centuries;

    let arg_periapsis_deg = varpi_deg - omega_deg;
    let mean_anomaly_deg = l_deg - varpi_deg;

    let eccentricity = Eccentricity::new(e).ok_or_else(|| {
        OrreryError::InvalidOrbit(format!("elementsAt produced invalid eccentricity e={e}"))
    })?;

    Ok(OrbitalElements {
        semi_major_axis: Meters(a_au * crate::constants::AU),
        eccentricity,
        inclination: Radians::from_degrees(i_deg),
        mean_anomaly: Radians::from_degrees(mean_anomaly_deg).normalize(),
        arg_periapsis: Radians::from_degrees(arg_periapsis_deg).normalize(),
        raan: Radians::from_degrees(omega_deg).normalize(),
    })
}

/// Perifocal basis vectors (P along periapsis, Q 90° ahead in the orbit
/// plane) expressed in the ecliptic frame.
fn perifocal_basis(elements: &OrbitalElements) -> (Vector3, Vector3) {
    let raan = elements.raan.value();
    let inc = elements.inclination.value();
    let argp = elements.arg_periapsis.value();

    let (s_raan, c_raan) = raan.sin_cos();
    let (s_inc, c_inc) = inc.sin_cos();
    let (s_argp, c_argp) = argp.sin_cos();

    let p = Vector3::new(
        c_raan * c_argp - s_raan * s_argp * c_inc,
        s_raan * c_argp + c_raan * s_argp * c_inc,
        s_argp * s_inc,
    );
    let q = Vector3::new(
        -c_raan * s_argp - s_raan * c_argp * c_inc,
        -s_raan * s_argp + c_raan * c_argp * c_inc,
        c_argp * s_inc,
    );
    (p, q)
}

fn true_anomaly_of(elements: &OrbitalElements) -> OrreryResult<Radians> {
    if elements.is_hyperbolic() {
        let sol = solve_kepler_hyperbolic_halley(elements.mean_anomaly, elements.eccentricity)?;
        Ok(crate::kepler::hyperbolic_to_true_anomaly(
            sol.anomaly,
            elements.eccentricity,
        ))
    } else {
        let sol = solve_kepler_halley(elements.mean_anomaly, elements.eccentricity)?;
        Ok(eccentric_to_true_anomaly(sol.anomaly, elements.eccentricity))
    }
}

/// Position from orbital elements, in the same frame as the (P, Q) basis
/// (heliocentric ecliptic J2000 when raan/inclination/arg_periapsis are
/// given in that frame).
pub fn position_from_elements(elements: &OrbitalElements) -> OrreryResult<Vector3> {
    let nu = true_anomaly_of(elements)?;
    let e = elements.eccentricity.value();
    let a = elements.semi_major_axis.value();
    let r = a * (1.0 - e * e) / (1.0 + e * nu.cos());
    let (p, q) = perifocal_basis(elements);
    Ok(p.scale(r * nu.cos()) + q.scale(r * nu.sin()))
}

/// Velocity from orbital elements and gravitational parameter μ,
/// consistent with `position_from_elements` for two-body motion.
pub fn velocity_from_elements(mu: Mu, elements: &OrbitalElements) -> OrreryResult<Vector3> {
    let nu = true_anomaly_of(elements)?;
    let e = elements.eccentricity.value();
    let a = elements.semi_major_axis.value();
    let h = (mu.value() * a * (1.0 - e * e)).sqrt();
    let (p, q) = perifocal_basis(elements);
    let factor = mu.value() / h;
    Ok(p.scale(-factor * nu.sin()) + q.scale(factor * (e + nu.cos())))
}

fn wrap_signed_degrees(deg: f64) -> f64 {
    let mut v = deg % 360.0;
    if v <= -180.0 {
        v += 360.0;
    } else if v > 180.0 {
        v -= 360.0;
    }
    v
}

/// Inverse transform: recover orbital elements from a state vector under
/// two-body gravity with parameter μ. Angles returned in (-180°, 180°]
/// except inclination, in [0°, 180°] — values are stored in radians
/// consistent with that same range.
pub fn elements_from_state_vector(mu: Mu, state: &StateVector) -> OrreryResult<OrbitalElements> {
    let r_vec = state.position;
    let v_vec = state.velocity;
    let r = r_vec.magnitude();
    let v = v_vec.magnitude();

    if r < 1e-6 {
        return Err(OrreryError::InvalidOrbit(
            "position vector is degenerate (near zero)".into(),
        ));
    }

    let h_vec = r_vec.cross(v_vec);
    let h = h_vec.magnitude();
    if h < 1e-9 {
        return Err(OrreryError::InvalidOrbit(
            "angular momentum is degenerate (radial orbit)".into(),
        ));
    }

    let z_axis = Vector3::new(0.0, 0.0, 1.0);
    let n_vec = z_axis.cross(h_vec);
    let n = n_vec.magnitude();

    let mu_val = mu.value();
    let e_vec = v_vec.cross(h_vec).scale(1.0 / mu_val) - r_vec.scale(1.0 / r);
    let e = e_vec.magnitude();

    let eccentricity = Eccentricity::new(e).ok_or_else(|| {
        OrreryError::InvalidOrbit(format!("state vector implies invalid eccentricity e={e}"))
    })?;

    let inclination = (h_vec.z / h).clamp(-1.0, 1.0).acos();

    let raan_deg = if n > 1e-12 {
        let mut raan = (n_vec.y.atan2(n_vec.x)).to_degrees();
        if n_vec.y < 0.0 {
            raan = 360.0 - (n_vec.x / n).acos().to_degrees();
        }
        raan
    } else {
        0.0
    };

    let arg_periapsis_deg = if n > 1e-12 && e > 1e-12 {
        let cos_argp = (n_vec.dot(e_vec) / (n * e)).clamp(-1.0, 1.0);
        let mut argp = cos_argp.acos().to_degrees();
        if e_vec.z < 0.0 {
            argp = 360.0 - argp;
        }
        argp
    } else {
        0.0
    };

    let true_anomaly = if e > 1e-12 {
        let cos_nu = (e_vec.dot(r_vec) / (e * r)).clamp(-1.0, 1.0);
        let mut nu = cos_nu.acos();
        if r_vec.dot(v_vec) < 0.0 {
            nu = std::f64::consts::TAU - nu;
        }
        Radians(nu)
    } else {
        Radians(0.0)
    };

    let a = 1.0 / (2.0 / r - v * v / mu_val);

    let mean_anomaly_rad = if eccentricity.is_hyperbolic() {
        let half_f = ((e - 1.0) / (e + 1.0)).sqrt() * (true_anomaly.value() / 2.0).tan();
        let big_f = 2.0 * half_f.atanh();
        e * big_f.sinh() - big_f
    } else {
        crate::kepler::true_to_mean_anomaly(true_anomaly, eccentricity).value()
    };

    Ok(OrbitalElements {
        semi_major_axis: Meters(a),
        eccentricity,
        inclination: Radians::from_degrees(inclination.to_degrees()),
        mean_anomaly: Radians::from_degrees(wrap_signed_degrees(mean_anomaly_rad.to_degrees())),
        arg_periapsis: Radians::from_degrees(wrap_signed_degrees(arg_periapsis_deg)),
        raan: Radians::from_degrees(wrap_signed_degrees(raan_deg)),
    })
}

/// N equally-spaced-in-mean-anomaly samples of the orbit: the full closed
/// ellipse, or a truncated ±2π hyperbolic-anomaly arc for hyperbolas.
pub fn sample_orbit(elements: &OrbitalElements, n: usize) -> OrreryResult<Vec<Vector3>> {
    if n == 0 {
        return Ok(Vec::new());
    }
    let mut out = Vec::with_capacity(n);
    if elements.is_hyperbolic() {
        let span = std::f64::consts::TAU;
        for k in 0..n {
            let big_f = -span + 2.0 * span * (k as f64) / ((n.max(2) - 1) as f64);
            let e = elements.eccentricity.value();
            let m = e * big_f.sinh() - big_f;
            let sample = OrbitalElements {
                mean_anomaly: Radians(m),
                ..*elements
            };
            out.push(position_from_elements(&sample)?);
        }
    } else {
        for k in 0..n {
            let m = std::f64::consts::TAU * (k as f64) / (n as f64);
            let sample = OrbitalElements {
                mean_anomaly: Radians(m),
                ..*elements
            };
            out.push(position_from_elements(&sample)?);
        }
    }
    Ok(out)
}

/// Orbital period for an elliptical orbit: T = 2π·sqrt(a³/μ).
pub fn orbital_period(mu: Mu, a: Meters) -> crate::units::Seconds {
    crate::units::Seconds(std::f64::consts::TAU * (a.value().powi(3) / mu.value()).sqrt())
}

/// Vis-viva equation: v = sqrt(μ·(2/r - 1/a)).
pub fn vis_viva(mu: Mu, r: Meters, a: Meters) -> MetersPerSec {
    MetersPerSec((mu.value() * (2.0 / r.value() - 1.0 / a.value())).sqrt())
}

/// Specific orbital energy: ε = -μ/(2a).
pub fn specific_energy(mu: Mu, a: Meters) -> f64 {
    -mu.value() / (2.0 * a.value())
}

/// Specific angular momentum magnitude: h = sqrt(μ·a·(1-e²)).
pub fn specific_angular_momentum(mu: Mu, a: Meters, e: Eccentricity) -> f64 {
    (mu.value() * a.value() * (1.0 - e.value().powi(2))).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{mu, semi_major_axis};

    fn earth_like_elements() -> OrbitalElements {
        OrbitalElements {
            semi_major_axis: semi_major_axis::EARTH,
            eccentricity: Eccentricity::elliptical(0.0167).unwrap(),
            inclination: Radians(0.0),
            mean_anomaly: Radians::from_degrees(45.0),
            arg_periapsis: Radians::from_degrees(102.9),
            raan: Radians::from_degrees(0.0),
        }
    }

    #[test]
    fn position_velocity_round_trip_ellipse() {
        let elements = earth_like_elements();
        let pos = position_from_elements(&elements).unwrap();
        let vel = velocity_from_elements(mu::SUN, &elements).unwrap();
        let state = StateVector::new(pos, vel);
        let recovered = elements_from_state_vector(mu::SUN, &state).unwrap();

        assert!(
            (recovered.semi_major_axis.value() - elements.semi_major_axis.value()).abs()
                / elements.semi_major_axis.value()
                < 1e-10
        );
        assert!(
            (recovered.eccentricity.value() - elements.eccentricity.value()).abs() < 1e-9
        );
        assert!(
            (recovered.mean_anomaly.value().to_degrees()
                - elements.mean_anomaly.value().to_degrees())
            .abs()
                < 1e-5
        );
    }

    #[test]
    fn position_velocity_round_trip_hyperbola() {
        let elements = OrbitalElements {
            semi_major_axis: Meters(-2.0e11),
            eccentricity: Eccentricity::hyperbolic(1.5).unwrap(),
            inclination: Radians::from_degrees(20.0),
            mean_anomaly: Radians(0.3),
            arg_periapsis: Radians::from_degrees(50.0),
            raan: Radians::from_degrees(10.0),
        };
        let pos = position_from_elements(&elements).unwrap();
        let vel = velocity_from_elements(mu::SUN, &elements).unwrap();
        let state = StateVector::new(pos, vel);
        let recovered = elements_from_state_vector(mu::SUN, &state).unwrap();
        assert!(recovered.eccentricity.is_hyperbolic());
        assert!(
            (recovered.eccentricity.value() - elements.eccentricity.value()).abs() < 1e-6
        );
    }

    #[test]
    fn sample_orbit_ellipse_is_closed() {
        let elements = earth_like_elements();
        let samples = sample_orbit(&elements, 64).unwrap();
        assert_eq!(samples.len(), 64);
        for p in &samples {
            let r = p.magnitude();
            assert!(r > 0.9 * elements.semi_major_axis.value());
            assert!(r < 1.1 * elements.semi_major_axis.value());
        }
    }

    #[test]
    fn sample_orbit_hyperbola_truncated_arc() {
        let elements = OrbitalElements {
            semi_major_axis: Meters(-2.0e11),
            eccentricity: Eccentricity::hyperbolic(1.3).unwrap(),
            inclination: Radians(0.0),
            mean_anomaly: Radians(0.0),
            arg_periapsis: Radians(0.0),
            raan: Radians(0.0),
        };
        let samples = sample_orbit(&elements, 16).unwrap();
        assert_eq!(samples.len(), 16);
    }

    #[test]
    fn vis_viva_circular_orbit() {
        let r = Meters(6_778_000.0);
        let v = vis_viva(mu::EARTH, r, r);
        let expected = (mu::EARTH.value() / r.value()).sqrt();
        assert!((v.value() - expected).abs() < 1e-6);
    }

    #[test]
    fn orbital_period_earth() {
        let period = orbital_period(mu::SUN, semi_major_axis::EARTH);
        let days = period.value() / 86400.0;
        assert!((days - 365.25).abs() < 1.0);
    }

    #[test]
    fn specific_energy_bound_orbit_is_negative() {
        let energy = specific_energy(mu::EARTH, Meters(6_778_000.0));
        assert!(energy < 0.0);
    }

    #[test]
    fn specific_angular_momentum_circular() {
        let e = Eccentricity::elliptical(0.0).unwrap();
        let r = Meters(6_778_000.0);
        let h = specific_angular_momentum(mu::EARTH, r, e);
        let expected = (mu::EARTH.value() * r.value()).sqrt();
        assert!((h - expected).abs() / expected < 1e-9);
    }

    #[test]
    fn state_vector_radius_speed() {
        let pos = Vector3::new(6_786_000.0, 0.0, 0.0);
        let vel = Vector3::new(0.0, 7_660.0, 0.0);
        let state = StateVector::new(pos, vel);
        assert!((state.radius().value() - 6_786_000.0).abs() < 1e-6);
        assert!((state.speed().value() - 7_660.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_invalid_eccentricity_from_elements_at() {
        let pars = LinearElementRates {
            semi_major_axis_au: (1.0, 0.0),
            eccentricity: (1.0, 0.0),
            inclination_deg: (0.0, 0.0),
            mean_longitude_deg: (0.0, 0.0),
            longitude_of_perihelion_deg: (0.0, 0.0),
            longitude_of_node_deg: (0.0, 0.0),
        };
        assert!(elements_at(&pars, 0.0).is_err());
    }
}
