/// Kepler equation solvers and anomaly conversions.
///
/// The elliptical Kepler equation relates mean anomaly M to eccentric
/// anomaly E:
///   M = E - e * sin(E)     (elliptical, e < 1)
///
/// The hyperbolic form relates M to the hyperbolic anomaly F:
///   M = e * sinh(F) - F    (hyperbolic, e > 1)
///
/// Three solvers are provided for the elliptical case (fixed-point, Newton-
/// Raphson, Halley) plus a Halley solver for the hyperbolic case. All share
/// the same iteration cap and report `NoConvergence` past it.
use crate::error::{OrreryError, OrreryResult};
use crate::units::{Eccentricity, Meters, Mu, Radians, Seconds};

/// Result of a Kepler equation solve.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct KeplerSolution {
    /// Eccentric (or hyperbolic) anomaly, radians.
    pub anomaly: Radians,
    pub iterations: u32,
    /// Final residual of the defining equation.
    pub residual: f64,
}

const DEFAULT_TOL: f64 = 1e-14;
const MAX_ITER: u32 = 50;

fn elliptical_residual(big_e: f64, ecc: f64, m: f64) -> f64 {
    (big_e - ecc * big_e.sin() - m).abs()
}

/// Solve the elliptical Kepler equation by direct fixed-point iteration:
/// E_{n+1} = M + e*sin(E_n). Linear convergence; slow near e close to 1,
/// but always monotonically contracting for e < 1.
pub fn solve_kepler_fixed_point(
    mean_anomaly: Radians,
    e: Eccentricity,
) -> OrreryResult<KeplerSolution> {
    if !e.is_elliptical() {
        return Err(OrreryError::InvalidOrbit(format!(
            "fixed-point Kepler solver requires elliptical orbit (e < 1), got e={}",
            e.value()
        )));
    }
    let m = mean_anomaly.normalize().value();
    let ecc = e.value();
    let mut big_e = m;

    for i in 0..MAX_ITER {
        let next = m + ecc * big_e.sin();
        let delta = (next - big_e).abs();
        big_e = next;
        if delta < DEFAULT_TOL {
            return Ok(KeplerSolution {
                anomaly: Radians(big_e),
                iterations: i + 1,
                residual: elliptical_residual(big_e, ecc, m),
            });
        }
    }

    Err(OrreryError::NoConvergence {
        iterations: MAX_ITER,
        residual: elliptical_residual(big_e, ecc, m),
    })
}

/// Solve the elliptical Kepler equation by Newton-Raphson iteration.
/// Quadratic convergence from a reasonable initial guess.
pub fn solve_kepler_newton(
    mean_anomaly: Radians,
    e: Eccentricity,
) -> OrreryResult<KeplerSolution> {
    solve_kepler_newton_with_params(mean_anomaly, e, DEFAULT_TOL, MAX_ITER)
}

pub fn solve_kepler_newton_with_params(
    mean_anomaly: Radians,
    e: Eccentricity,
    tol: f64,
    max_iter: u32,
) -> OrreryResult<KeplerSolution> {
    if !e.is_elliptical() {
        return Err(OrreryError::InvalidOrbit(format!(
            "Newton Kepler solver requires elliptical orbit (e < 1), got e={}",
            e.value()
        )));
    }

    let m = mean_anomaly.normalize().value();
    let ecc = e.value();

    let mut big_e = if ecc < 0.8 {
        m + ecc * m.sin()
    } else {
        std::f64::consts::PI
    };

    for i in 0..max_iter {
        let sin_e = big_e.sin();
        let cos_e = big_e.cos();
        let f = big_e - ecc * sin_e - m;
        let f_prime = 1.0 - ecc * cos_e;

        if f_prime.abs() < 1e-30 {
            return Err(OrreryError::NoConvergence {
                iterations: i,
                residual: f.abs(),
            });
        }

        let delta = f / f_prime;
        big_e -= delta;

        if delta.abs() < tol {
            return Ok(KeplerSolution {
                anomaly: Radians(big_e),
                iterations: i + 1,
                residual: elliptical_residual(big_e, ecc, m),
            });
        }
    }

    Err(OrreryError::NoConvergence {
        iterations: max_iter,
        residual: elliptical_residual(big_e, ecc, m),
    })
}

/// Solve the elliptical Kepler equation by Halley's method (cubic
/// convergence). Converges in no more iterations than `solve_kepler_newton`
/// for the same inputs.
pub fn solve_kepler_halley(
    mean_anomaly: Radians,
    e: Eccentricity,
) -> OrreryResult<KeplerSolution> {
    if !e.is_elliptical() {
        return Err(OrreryError::InvalidOrbit(format!(
            "Halley Kepler solver requires elliptical orbit (e < 1), got e={}",
            e.value()
        )));
    }

    let m = mean_anomaly.normalize().value();
    let ecc = e.value();

    let mut big_e = if ecc < 0.8 {
        m + ecc * m.sin()
    } else {
        std::f64::consts::PI
    };

    for i in 0..MAX_ITER {
        let sin_e = big_e.sin();
        let cos_e = big_e.cos();
        let f = big_e - ecc * sin_e - m;
        let f_prime = 1.0 - ecc * cos_e;
        let f_double_prime = ecc * sin_e;

        let denom = f_prime * f_prime - 0.5 * f * f_double_prime;
        if denom.abs() < 1e-30 {
            return Err(OrreryError::NoConvergence {
                iterations: i,
                residual: f.abs(),
            });
        }

        let delta = f * f_prime / denom;
        big_e -= delta;

        if delta.abs() < DEFAULT_TOL {
            return Ok(KeplerSolution {
                anomaly: Radians(big_e),
                iterations: i + 1,
                residual: elliptical_residual(big_e, ecc, m),
            });
        }
    }

    Err(OrreryError::NoConvergence {
        iterations: MAX_ITER,
        residual: elliptical_residual(big_e, ecc, m),
    })
}

/// Default elliptical solver (Newton-Raphson), kept as the name used by
/// call sites that don't care which method is used.
pub fn solve_kepler(mean_anomaly: Radians, e: Eccentricity) -> OrreryResult<KeplerSolution> {
    solve_kepler_newton(mean_anomaly, e)
}

fn hyperbolic_residual(big_f: f64, ecc: f64, m: f64) -> f64 {
    (ecc * big_f.sinh() - big_f - m).abs()
}

/// Solve the hyperbolic Kepler equation M = e*sinh(F) - F for the
/// hyperbolic anomaly F, via Halley's method.
pub fn solve_kepler_hyperbolic_halley(
    mean_anomaly: Radians,
    e: Eccentricity,
) -> OrreryResult<KeplerSolution> {
    if !e.is_hyperbolic() {
        return Err(OrreryError::InvalidOrbit(format!(
            "hyperbolic Kepler solver requires e > 1, got e={}",
            e.value()
        )));
    }

    let m = mean_anomaly.value();
    let ecc = e.value();

    let mut big_f = if m.abs() < 1.0 {
        m
    } else {
        m.signum() * (2.0 * m.abs() / ecc).ln().max(1e-3)
    };

    for i in 0..MAX_ITER {
        let sinh_f = big_f.sinh();
        let cosh_f = big_f.cosh();
        let f = ecc * sinh_f - big_f - m;
        let f_prime = ecc * cosh_f - 1.0;
        let f_double_prime = ecc * sinh_f;

        let denom = f_prime * f_prime - 0.5 * f * f_double_prime;
        if denom.abs() < 1e-30 {
            return Err(OrreryError::NoConvergence {
                iterations: i,
                residual: f.abs(),
            });
        }

        let delta = f * f_prime / denom;
        big_f -= delta;

        if delta.abs() < DEFAULT_TOL {
            return Ok(KeplerSolution {
                anomaly: Radians(big_f),
                iterations: i + 1,
                residual: hyperbolic_residual(big_f, ecc, m),
            });
        }
    }

    Err(OrreryError::NoConvergence {
        iterations: MAX_ITER,
        residual: hyperbolic_residual(big_f, ecc, m),
    })
}

/// Convert eccentric anomaly to true anomaly.
///
/// tan(ν/2) = sqrt((1+e)/(1-e)) * tan(E/2)
pub fn eccentric_to_true_anomaly(big_e: Radians, e: Eccentricity) -> Radians {
    let ecc = e.value();
    let half_e = big_e.value() / 2.0;
    let half_nu = ((1.0 + ecc) / (1.0 - ecc)).sqrt() * half_e.tan();
    Radians(2.0 * half_nu.atan()).normalize()
}

/// Convert true anomaly to eccentric anomaly.
///
/// tan(E/2) = sqrt((1-e)/(1+e)) * tan(ν/2)
pub fn true_to_eccentric_anomaly(nu: Radians, e: Eccentricity) -> Radians {
    let ecc = e.value();
    let half_nu = nu.value() / 2.0;
    let half_e = ((1.0 - ecc) / (1.0 + ecc)).sqrt() * half_nu.tan();
    Radians(2.0 * half_e.atan()).normalize()
}

/// Convert eccentric anomaly to mean anomaly: M = E - e*sin(E)
pub fn eccentric_to_mean_anomaly(big_e: Radians, e: Eccentricity) -> Radians {
    Radians(big_e.value() - e.value() * big_e.sin()).normalize()
}

/// Convert true anomaly to mean anomaly (via eccentric anomaly).
pub fn true_to_mean_anomaly(nu: Radians, e: Eccentricity) -> Radians {
    let big_e = true_to_eccentric_anomaly(nu, e);
    eccentric_to_mean_anomaly(big_e, e)
}

/// Convert mean anomaly to true anomaly (via Kepler equation solver).
pub fn mean_to_true_anomaly(mean_anomaly: Radians, e: Eccentricity) -> OrreryResult<Radians> {
    let solution = solve_kepler(mean_anomaly, e)?;
    Ok(eccentric_to_true_anomaly(solution.anomaly, e))
}

/// Hyperbolic true anomaly from hyperbolic anomaly F.
///
/// tan(ν/2) = sqrt((e+1)/(e-1)) * tanh(F/2)
pub fn hyperbolic_to_true_anomaly(big_f: Radians, e: Eccentricity) -> Radians {
    let ecc = e.value();
    let half_f = big_f.value() / 2.0;
    let half_nu = ((ecc + 1.0) / (ecc - 1.0)).sqrt() * half_f.tanh();
    Radians(2.0 * half_nu.atan())
}

/// Mean motion n = sqrt(μ/a³), for a the semi-major axis.
pub fn mean_motion(mu: Mu, a: Meters) -> f64 {
    (mu.value() / a.value().powi(3)).sqrt()
}

/// Propagate mean anomaly forward by Δt seconds: M(t) = M₀ + n·Δt.
pub fn propagate_mean_anomaly(m0: Radians, n: f64, dt: Seconds) -> Radians {
    Radians(m0.value() + n * dt.value()).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn circular_orbit_all_solvers() {
        let e = Eccentricity::elliptical(0.0).unwrap();
        let m = Radians(1.5);
        for sol in [
            solve_kepler_newton(m, e).unwrap(),
            solve_kepler_halley(m, e).unwrap(),
            solve_kepler_fixed_point(m, e).unwrap(),
        ] {
            assert!((sol.anomaly.value() - 1.5).abs() < 1e-13);
        }
    }

    #[test]
    fn newton_low_eccentricity_residual() {
        let e = Eccentricity::elliptical(0.0167).unwrap();
        let m = Radians(PI / 4.0);
        let sol = solve_kepler_newton(m, e).unwrap();
        assert!(sol.residual < 1e-13);
    }

    #[test]
    fn halley_converges_within_newton_iterations() {
        for ecc_val in [0.01, 0.3, 0.6, 0.8, 0.9, 0.967] {
            let e = Eccentricity::elliptical(ecc_val).unwrap();
            for m_val in [0.1, 0.5, 1.0, PI / 2.0, PI, 5.0] {
                let m = Radians(m_val);
                let newton = solve_kepler_newton(m, e).unwrap();
                let halley = solve_kepler_halley(m, e).unwrap();
                assert!(
                    halley.iterations <= newton.iterations,
                    "e={ecc_val} M={m_val}: halley={} newton={}",
                    halley.iterations,
                    newton.iterations
                );
                assert!((halley.anomaly.value() - newton.anomaly.value()).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn fixed_point_matches_newton() {
        let e = Eccentricity::elliptical(0.3).unwrap();
        let m = Radians(1.0);
        let fp = solve_kepler_fixed_point(m, e).unwrap();
        let newton = solve_kepler_newton(m, e).unwrap();
        assert!((fp.anomaly.value() - newton.anomaly.value()).abs() < 1e-10);
    }

    #[test]
    fn high_eccentricity_all_solvers_agree() {
        let e = Eccentricity::elliptical(0.967).unwrap();
        for m_val in [0.1, 0.5, 1.0, PI / 2.0, PI, 5.0] {
            let m = Radians(m_val);
            let newton = solve_kepler_newton(m, e).unwrap();
            let halley = solve_kepler_halley(m, e).unwrap();
            assert!(newton.residual < 1e-11);
            assert!(halley.residual < 1e-11);
        }
    }

    #[test]
    fn elliptical_solvers_reject_hyperbolic() {
        let e = Eccentricity::new(1.5).unwrap();
        assert!(solve_kepler_newton(Radians(1.0), e).is_err());
        assert!(solve_kepler_halley(Radians(1.0), e).is_err());
        assert!(solve_kepler_fixed_point(Radians(1.0), e).is_err());
    }

    #[test]
    fn hyperbolic_halley_round_trip() {
        let e = Eccentricity::hyperbolic(1.5).unwrap();
        for m_val in [0.1, 1.0, 5.0, -3.0] {
            let m = Radians(m_val);
            let sol = solve_kepler_hyperbolic_halley(m, e).unwrap();
            let residual = hyperbolic_residual(sol.anomaly.value(), e.value(), m_val);
            assert!(residual < 1e-11, "m={m_val}: residual={residual}");
        }
    }

    #[test]
    fn hyperbolic_halley_rejects_elliptical() {
        let e = Eccentricity::elliptical(0.5).unwrap();
        assert!(solve_kepler_hyperbolic_halley(Radians(1.0), e).is_err());
    }

    #[test]
    fn anomaly_round_trip_true_eccentric() {
        let e = Eccentricity::elliptical(0.3).unwrap();
        let nu = Radians(1.2);
        let big_e = true_to_eccentric_anomaly(nu, e);
        let nu_back = eccentric_to_true_anomaly(big_e, e);
        assert!((nu.normalize().value() - nu_back.value()).abs() < 1e-12);
    }

    #[test]
    fn anomaly_round_trip_mean_eccentric() {
        let e = Eccentricity::elliptical(0.5).unwrap();
        let big_e = Radians(1.0);
        let m = eccentric_to_mean_anomaly(big_e, e);
        let sol = solve_kepler_newton(m, e).unwrap();
        assert!((sol.anomaly.value() - big_e.value()).abs() < 1e-12);
    }

    #[test]
    fn full_anomaly_round_trip() {
        let e = Eccentricity::elliptical(0.2).unwrap();
        let nu_original = Radians(2.5);
        let m = true_to_mean_anomaly(nu_original, e);
        let nu_recovered = mean_to_true_anomaly(m, e).unwrap();
        assert!((nu_original.normalize().value() - nu_recovered.value()).abs() < 1e-11);
    }

    #[test]
    fn mean_motion_earth_order_of_magnitude() {
        let n = mean_motion(crate::constants::mu::SUN, crate::constants::semi_major_axis::EARTH);
        let expected = TAU / (365.25 * 86400.0);
        assert!((n - expected).abs() / expected < 0.01);
    }

    #[test]
    fn propagate_half_orbit() {
        let n = TAU / 3600.0;
        let m0 = Radians(0.0);
        let dt = Seconds(1800.0);
        let m1 = propagate_mean_anomaly(m0, n, dt);
        assert!((m1.value() - PI).abs() < 1e-12);
    }

    #[test]
    fn vallado_known_value() {
        let e = Eccentricity::elliptical(0.4).unwrap();
        let m = Radians(235.4_f64.to_radians());
        let sol = solve_kepler_newton(m, e).unwrap();
        let e_deg = sol.anomaly.value().to_degrees();
        assert!((e_deg - 220.5).abs() < 1.0);
    }
}
