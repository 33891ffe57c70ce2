/// Chebyshev-segment ephemeris, valid only over a fixed historical/near-future
/// window (spec.md §4.4/§6: 1620-01-01 through 2200-01-31). Segments are
/// fitted lazily from the analytic two-body backend and cached, the same
/// split JPL's DE ephemerides make between "how the positions were computed"
/// and "how they are served": a dense set of short polynomial segments.
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{OrreryError, OrreryResult};
use crate::time::{self, CalendarInstant, Era, JulianDate};
use crate::vec3::Vector3;

use super::analytic::AnalyticEphemeris;
use super::chebyshev::ChebyshevFit;
use super::EphemerisProvider;

/// Width of a single Chebyshev segment, in days. Chosen short enough that a
/// modest node count reproduces the analytic backend to well under a metre.
const SEGMENT_DAYS: f64 = 8.0;
const NODES_PER_SEGMENT: usize = 12;

fn window_start() -> CalendarInstant {
    CalendarInstant::new(Era::Ad, 1620, 1, 1, 0, 0, 0, 0).expect("valid window start")
}

fn window_end() -> CalendarInstant {
    CalendarInstant::new(Era::Ad, 2200, 1, 31, 0, 0, 0, 0).expect("valid window end")
}

struct Segment {
    x: ChebyshevFit,
    y: ChebyshevFit,
    z: ChebyshevFit,
    vx: ChebyshevFit,
    vy: ChebyshevFit,
    vz: ChebyshevFit,
}

/// Chebyshev-segment ephemeris backend. Internally stateful (segments are
/// fitted and cached on first use) but presents the same immutable-looking
/// `EphemerisProvider` contract as `AnalyticEphemeris`.
pub struct AccurateEphemeris {
    source: AnalyticEphemeris,
    segments: Mutex<HashMap<(String, i64), Segment>>,
}

impl Default for AccurateEphemeris {
    fn default() -> Self {
        Self::new()
    }
}

impl AccurateEphemeris {
    pub fn new() -> Self {
        Self {
            source: AnalyticEphemeris::new(),
            segments: Mutex::new(HashMap::new()),
        }
    }

    fn check_window(jd: f64) -> OrreryResult<()> {
        let lo = time::calendar_to_jd(&window_start())?.value();
        let hi = time::calendar_to_jd(&window_end())?.value();
        if jd < lo || jd > hi {
            return Err(OrreryError::OutOfRange(format!(
                "accurate ephemeris only covers JD {lo:.1}..={hi:.1} (1620-01-01 .. 2200-01-31)"
            )));
        }
        Ok(())
    }

    fn segment_index(jd: f64) -> i64 {
        (jd / SEGMENT_DAYS).floor() as i64
    }

    fn fit_segment(&self, name: &str, index: i64) -> OrreryResult<Segment> {
        let t0 = index as f64 * SEGMENT_DAYS;
        let t1 = t0 + SEGMENT_DAYS;

        let sample = |jd: f64, want_velocity: bool| -> OrreryResult<Vector3> {
            let instant = time::jd_to_calendar(JulianDate(jd))?;
            if want_velocity {
                self.source.velocity(name, &instant)
            } else {
                self.source.position(name, &instant)
            }
        };

        // Chebyshev fitting closures cannot propagate `?`, so any sample
        // failure is surfaced as NaN and checked after the fact.
        let mut failed: Option<OrreryError> = None;
        let mut eval = |jd: f64, component: fn(Vector3) -> f64, velocity: bool| -> f64 {
            match sample(jd, velocity) {
                Ok(v) => component(v),
                Err(e) => {
                    if failed.is_none() {
                        failed = Some(e);
                    }
                    f64::NAN
                }
            }
        };

        let x = ChebyshevFit::fit(t0, t1, NODES_PER_SEGMENT, |jd| eval(jd, |v| v.x, false));
        let y = ChebyshevFit::fit(t0, t1, NODES_PER_SEGMENT, |jd| eval(jd, |v| v.y, false));
        let z = ChebyshevFit::fit(t0, t1, NODES_PER_SEGMENT, |jd| eval(jd, |v| v.z, false));
        let vx = ChebyshevFit::fit(t0, t1, NODES_PER_SEGMENT, |jd| eval(jd, |v| v.x, true));
        let vy = ChebyshevFit::fit(t0, t1, NODES_PER_SEGMENT, |jd| eval(jd, |v| v.y, true));
        let vz = ChebyshevFit::fit(t0, t1, NODES_PER_SEGMENT, |jd| eval(jd, |v| v.z, true));

        if let Some(e) = failed {
            return Err(e);
        }

        Ok(Segment { x, y, z, vx, vy, vz })
    }

    fn segment_for<'a>(
        &self,
        cache: &'a mut HashMap<(String, i64), Segment>,
        name: &str,
        jd: f64,
    ) -> OrreryResult<&'a Segment> {
        let index = Self::segment_index(jd);
        let key = (name.to_string(), index);
        if !cache.contains_key(&key) {
            let segment = self.fit_segment(name, index)?;
            cache.insert(key.clone(), segment);
        }
        Ok(cache.get(&key).expect("segment just inserted"))
    }
}

impl EphemerisProvider for AccurateEphemeris {
    fn position(&self, name: &str, instant: &CalendarInstant) -> OrreryResult<Vector3> {
        let jd = time::calendar_to_jd(instant)?.value();
        Self::check_window(jd)?;
        let mut cache = self.segments.lock().expect("segment cache poisoned");
        let segment = self.segment_for(&mut cache, name, jd)?;
        Ok(Vector3::new(
            segment.x.eval(jd),
            segment.y.eval(jd),
            segment.z.eval(jd),
        ))
    }

    fn velocity(&self, name: &str, instant: &CalendarInstant) -> OrreryResult<Vector3> {
        let jd = time::calendar_to_jd(instant)?.value();
        Self::check_window(jd)?;
        let mut cache = self.segments.lock().expect("segment cache poisoned");
        let segment = self.segment_for(&mut cache, name, jd)?;
        Ok(Vector3::new(
            segment.vx.eval(jd),
            segment.vy.eval(jd),
            segment.vz.eval(jd),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn j2000() -> CalendarInstant {
        CalendarInstant::new(Era::Ad, 2000, 1, 1, 12, 0, 0, 0).unwrap()
    }

    #[test]
    fn rejects_instants_outside_window() {
        let eph = AccurateEphemeris::new();
        let too_early = CalendarInstant::new(Era::Ad, 1500, 1, 1, 0, 0, 0, 0).unwrap();
        assert!(eph.position("Earth", &too_early).is_err());
        let too_late = CalendarInstant::new(Era::Ad, 2300, 1, 1, 0, 0, 0, 0).unwrap();
        assert!(eph.position("Earth", &too_late).is_err());
    }

    #[test]
    fn matches_analytic_backend_within_fitting_tolerance() {
        let accurate = AccurateEphemeris::new();
        let analytic = AnalyticEphemeris::new();
        let instant = j2000();
        let a = accurate.position("Earth", &instant).unwrap();
        let b = analytic.position("Earth", &instant).unwrap();
        assert!(a.distance(b) < 10_000.0);
    }

    #[test]
    fn self_consistency_trapezoidal_prediction() {
        let eph = AccurateEphemeris::new();
        let t0 = j2000();
        let jd1 = time::calendar_to_jd(&t0).unwrap();
        let t1 = time::jd_to_calendar(JulianDate(jd1.value() + 3600.0 / 86400.0)).unwrap();

        let p0 = eph.position("Earth", &t0).unwrap();
        let v0 = eph.velocity("Earth", &t0).unwrap();
        let p1 = eph.position("Earth", &t1).unwrap();
        let v1 = eph.velocity("Earth", &t1).unwrap();

        let predicted = p0 + (v0 + v1).scale(1800.0);
        let error = predicted.distance(p1);
        assert!(error < 500.0, "trapezoidal prediction error {error} m");
    }

    #[test]
    fn repeated_queries_reuse_cached_segment() {
        let eph = AccurateEphemeris::new();
        let instant = j2000();
        let first = eph.position("Mars", &instant).unwrap();
        let second = eph.position("Mars", &instant).unwrap();
        assert_eq!(first.x, second.x);
        assert_eq!(eph.segments.lock().unwrap().len(), 1);
    }
}
