/// Generic Chebyshev polynomial fit/evaluation, the interpolation scheme
/// behind the accurate ephemeris backend's position segments (in the style
/// of JPL's DE-series binary ephemerides, which store per-segment Chebyshev
/// coefficients for each coordinate).
use std::f64::consts::PI;

/// A fitted Chebyshev polynomial over `[t0, t1]` for a single scalar
/// coordinate.
#[derive(Debug, Clone)]
pub struct ChebyshevFit {
    pub t0: f64,
    pub t1: f64,
    pub coeffs: Vec<f64>,
}

impl ChebyshevFit {
    /// Fit a degree `(nodes-1)` Chebyshev polynomial to `f` sampled at the
    /// Chebyshev nodes of the second kind on `[t0, t1]`.
    pub fn fit(t0: f64, t1: f64, nodes: usize, f: impl Fn(f64) -> f64) -> Self {
        let n = nodes.max(2);
        let samples: Vec<f64> = (0..n)
            .map(|k| {
                let theta = PI * (k as f64 + 0.5) / n as f64;
                let x = theta.cos();
                let t = 0.5 * (t0 + t1) + 0.5 * (t1 - t0) * x;
                f(t)
            })
            .collect();

        let mut coeffs = vec![0.0; n];
        for (j, coeff) in coeffs.iter_mut().enumerate() {
            let mut sum = 0.0;
            for (k, sample) in samples.iter().enumerate() {
                let theta = PI * (k as f64 + 0.5) / n as f64;
                sum += sample * (j as f64 * theta).cos();
            }
            *coeff = sum * 2.0 / n as f64;
        }
        coeffs[0] *= 0.5;

        Self { t0, t1, coeffs }
    }

    /// Evaluate the fitted polynomial at `t` via Clenshaw recurrence.
    pub fn eval(&self, t: f64) -> f64 {
        let x = (2.0 * t - (self.t0 + self.t1)) / (self.t1 - self.t0);
        let x = x.clamp(-1.0, 1.0);

        let mut b_k1 = 0.0;
        let mut b_k2 = 0.0;
        for &c in self.coeffs.iter().skip(1).rev() {
            let b_k = 2.0 * x * b_k1 - b_k2 + c;
            b_k2 = b_k1;
            b_k1 = b_k;
        }
        x * b_k1 - b_k2 + self.coeffs[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_linear_function_exactly() {
        let fit = ChebyshevFit::fit(0.0, 10.0, 8, |t| 2.0 * t + 1.0);
        for t in [0.0, 2.5, 5.0, 7.5, 10.0] {
            assert!((fit.eval(t) - (2.0 * t + 1.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn fits_smooth_nonlinear_function_closely() {
        let fit = ChebyshevFit::fit(0.0, 1.0, 16, |t| (t * 3.0).sin());
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let expected = (t * 3.0).sin();
            assert!((fit.eval(t) - expected).abs() < 1e-6);
        }
    }
}
