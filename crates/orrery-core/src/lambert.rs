/// Lambert's problem: given two position vectors and a transfer time,
/// solve for the connecting orbit(s).
///
/// Universal-variable (Stumpff C(z)/S(z)) formulation (Curtis, "Orbital
/// Mechanics for Engineering Students"), extended to multiple revolutions
/// by bracketing each revolution count between consecutive asymptotes of
/// t(z) at z = (2πn)², and splitting each bracket at its interior minimum
/// into a low-path and a high-path branch.
use crate::error::{OrreryError, OrreryResult};
use crate::units::Mu;
use crate::vec3::Vector3;
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum LambertBranch {
    Direct,
    LowPath,
    HighPath,
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct LambertSolution {
    pub v1: Vector3,
    pub v2: Vector3,
    pub revolutions: u32,
    pub branch: LambertBranch,
}

fn stumpff_c(z: f64) -> f64 {
    if z > 1e-6 {
        (1.0 - z.sqrt().cos()) / z
    } else if z < -1e-6 {
        ((-z).sqrt().cosh() - 1.0) / (-z)
    } else {
        0.5 - z / 24.0 + z * z / 720.0
    }
}

fn stumpff_s(z: f64) -> f64 {
    if z > 1e-6 {
        let sz = z.sqrt();
        (sz - sz.sin()) / sz.powi(3)
    } else if z < -1e-6 {
        let sz = (-z).sqrt();
        (sz.sinh() - sz) / sz.powi(3)
    } else {
        1.0 / 6.0 - z / 120.0 + z * z / 5040.0
    }
}

fn y_of_z(z: f64, r1: f64, r2: f64, a_param: f64) -> f64 {
    r1 + r2 + a_param * (z * stumpff_s(z) - 1.0) / stumpff_c(z).sqrt()
}

fn t_of_z(z: f64, r1: f64, r2: f64, a_param: f64, sqrt_mu: f64) -> f64 {
    let c = stumpff_c(z);
    let s = stumpff_s(z);
    let y = y_of_z(z, r1, r2, a_param);
    if y < 0.0 || c <= 0.0 {
        return f64::INFINITY;
    }
    let chi = (y / c).sqrt();
    (chi.powi(3) * s + a_param * y.sqrt()) / sqrt_mu
}

/// Bisect for t(z) == target on [lo, hi], assuming t is monotonic there.
fn bisect_for_time(
    mut lo: f64,
    mut hi: f64,
    target: f64,
    r1: f64,
    r2: f64,
    a_param: f64,
    sqrt_mu: f64,
) -> Option<f64> {
    let f = |z: f64| t_of_z(z, r1, r2, a_param, sqrt_mu) - target;
    let mut f_lo = f(lo);
    let f_hi = f(hi);
    if !f_lo.is_finite() || !f_hi.is_finite() || f_lo * f_hi > 0.0 {
        return None;
    }
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if f_mid.abs() < 1e-6 || (hi - lo).abs() < 1e-9 {
            return Some(mid);
        }
        if f_lo * f_mid <= 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }
    Some(0.5 * (lo + hi))
}

fn solution_from_z(
    z: f64,
    r1_vec: Vector3,
    r2_vec: Vector3,
    r1: f64,
    r2: f64,
    a_param: f64,
    mu: f64,
    revolutions: u32,
    branch: LambertBranch,
) -> Option<LambertSolution> {
    let y = y_of_z(z, r1, r2, a_param);
    if y <= 0.0 {
        return None;
    }
    let f = 1.0 - y / r1;
    let g = a_param * (y / mu).sqrt();
    let gdot = 1.0 - y / r2;
    if g.abs() < 1e-9 {
        return None;
    }
    let v1 = (r2_vec - r1_vec.scale(f)).scale(1.0 / g);
    let v2 = (r2_vec.scale(gdot) - r1_vec).scale(1.0 / g);
    Some(LambertSolution {
        v1,
        v2,
        revolutions,
        branch,
    })
}

/// Solve Lambert's problem for r1 -> r2 over duration `dt` (seconds,
/// positive), gravitational parameter μ, an explicit transfer-direction
/// flag, and the maximum revolution count `k`. Returns up to `2k+1`
/// solutions ordered by revolution count then branch (direct, then each
/// revolution's low path before its high path).
pub fn lambert(
    r1_vec: Vector3,
    r2_vec: Vector3,
    dt: f64,
    mu: Mu,
    retrograde: bool,
    k: u32,
) -> OrreryResult<Vec<LambertSolution>> {
    if dt <= 0.0 {
        return Err(OrreryError::LambertNoSolution(
            "transfer time must be positive".into(),
        ));
    }
    let r1 = r1_vec.magnitude();
    let r2 = r2_vec.magnitude();
    if r1 < 1e-6 || r2 < 1e-6 {
        return Err(OrreryError::LambertNoSolution(
            "degenerate position vector".into(),
        ));
    }

    let cross = r1_vec.cross(r2_vec);
    let cos_dtheta = (r1_vec.dot(r2_vec) / (r1 * r2)).clamp(-1.0, 1.0);
    let mut dtheta = cos_dtheta.acos();
    let prograde_normal_positive = cross.z > 0.0;
    if retrograde {
        if prograde_normal_positive {
            dtheta = std::f64::consts::TAU - dtheta;
        }
    } else if !prograde_normal_positive {
        dtheta = std::f64::consts::TAU - dtheta;
    }

    let one_minus_cos = 1.0 - dtheta.cos();
    if one_minus_cos.abs() < 1e-9 {
        return Err(OrreryError::LambertNoSolution(
            "transfer angle is degenerate (0 or π)".into(),
        ));
    }
    let a_param = dtheta.sin() * (r1 * r2 / one_minus_cos).sqrt();
    if !a_param.is_finite() || a_param.abs() < 1e-12 {
        return Err(OrreryError::LambertNoSolution(
            "geometry yields no valid transfer parameter".into(),
        ));
    }

    let sqrt_mu = mu.value().sqrt();
    let mut results = Vec::new();

    // Revolution 0: single branch, z ranges from a large negative (hyperbolic)
    // bound up to just below the first asymptote at z = (2π)².
    if let Some(z) = bisect_for_time(-4.0 * PI * PI, 4.0 * PI * PI - 1e-3, dt, r1, r2, a_param, sqrt_mu) {
        if let Some(sol) = solution_from_z(z, r1_vec, r2_vec, r1, r2, a_param, mu.value(), 0, LambertBranch::Direct) {
            results.push(sol);
        }
    }

    for rev in 1..=k {
        let lo = (2.0 * rev as f64 * PI).powi(2) + 1e-3;
        let hi = (2.0 * (rev as f64 + 1.0) * PI).powi(2) - 1e-3;

        // Grid search for the interior minimum of t(z) across this bracket.
        const SAMPLES: usize = 400;
        let mut z_min = lo;
        let mut t_min = f64::INFINITY;
        for i in 0..=SAMPLES {
            let z = lo + (hi - lo) * (i as f64) / (SAMPLES as f64);
            let t = t_of_z(z, r1, r2, a_param, sqrt_mu);
            if t < t_min {
                t_min = t;
                z_min = z;
            }
        }

        if dt < t_min {
            continue;
        }

        if let Some(z) = bisect_for_time(lo, z_min, dt, r1, r2, a_param, sqrt_mu) {
            if let Some(sol) =
                solution_from_z(z, r1_vec, r2_vec, r1, r2, a_param, mu.value(), rev, LambertBranch::LowPath)
            {
                results.push(sol);
            }
        }
        if let Some(z) = bisect_for_time(z_min, hi, dt, r1, r2, a_param, sqrt_mu) {
            if let Some(sol) =
                solution_from_z(z, r1_vec, r2_vec, r1, r2, a_param, mu.value(), rev, LambertBranch::HighPath)
            {
                results.push(sol);
            }
        }
    }

    if results.is_empty() {
        return Err(OrreryError::LambertNoSolution(format!(
            "no transfer orbit found for dt={dt}, k={k}"
        )));
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::mu;

    #[test]
    fn earth_to_mars_like_transfer_recovers_reasonable_velocity() {
        // Two roughly-coplanar circular-ish points, ~70 day transfer.
        let r1 = Vector3::new(2.06e11, -1.0e11, 0.0);
        let r2 = Vector3::new(0.5e11, 2.3e11, 0.0);
        let dt = 70.0 * 86400.0;
        let solutions = lambert(r1, r2, dt, mu::SUN, false, 0).unwrap();
        assert_eq!(solutions.len(), 1);
        let sol = &solutions[0];
        assert!(sol.v1.magnitude() > 1000.0 && sol.v1.magnitude() < 60_000.0);
        assert!(sol.v2.magnitude() > 1000.0 && sol.v2.magnitude() < 60_000.0);
    }

    #[test]
    fn rejects_nonpositive_dt() {
        let r1 = Vector3::new(1.0e11, 0.0, 0.0);
        let r2 = Vector3::new(0.0, 1.0e11, 0.0);
        assert!(lambert(r1, r2, 0.0, mu::SUN, false, 0).is_err());
    }

    #[test]
    fn multi_rev_returns_at_most_2k_plus_1() {
        let r1 = Vector3::new(3.5e8, 0.0, 0.0);
        let r2 = Vector3::new(0.0, 3.5e8, 1.0e7);
        let dt = 19.0 * 86400.0;
        // Neptune's mu stands in for a central body here; magnitude chosen
        // so a multi-rev bracket is reachable within the 19-day window.
        let k = 4;
        let result = lambert(r1, r2, dt, mu::NEPTUNE, true, k);
        if let Ok(solutions) = result {
            assert!(solutions.len() <= 2 * k as usize + 1);
            for sol in &solutions {
                assert!(sol.revolutions <= k);
            }
        }
    }

    #[test]
    fn degenerate_colinear_transfer_fails() {
        let r1 = Vector3::new(1.0e11, 0.0, 0.0);
        let r2 = Vector3::new(2.0e11, 0.0, 0.0);
        assert!(lambert(r1, r2, 86400.0, mu::SUN, false, 0).is_err());
    }
}
