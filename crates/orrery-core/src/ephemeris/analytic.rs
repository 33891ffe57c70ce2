/// Two-body mean-elements ephemeris: valid at any instant `time` can
/// represent, lower accuracy than `accurate`, used as the fallback for
/// minor bodies and outside the accurate window.
use crate::bodies::{self, BodyKind, ElementModel, SimpleElements};
use crate::error::{OrreryError, OrreryResult};
use crate::orbital_elements::{
    elements_at, position_from_elements, velocity_from_elements, OrbitalElements,
};
use crate::time::{self, CalendarInstant};
use crate::units::{Eccentricity, Meters, Mu, Radians};
use crate::vec3::Vector3;

use super::EphemerisProvider;

fn elements_from_simple(se: &SimpleElements, days_since_j2000: f64) -> OrreryResult<OrbitalElements> {
    let n_deg_per_day = 360.0 / se.period_days;
    let m_deg = se.mean_anomaly_j2000_deg + n_deg_per_day * days_since_j2000;
    let eccentricity = Eccentricity::elliptical(se.eccentricity).ok_or_else(|| {
        OrreryError::InvalidOrbit(format!("simple-element body has invalid e={}", se.eccentricity))
    })?;
    Ok(OrbitalElements {
        semi_major_axis: Meters(se.semi_major_axis_m),
        eccentricity,
        inclination: Radians::from_degrees(se.inclination_deg),
        mean_anomaly: Radians::from_degrees(m_deg).normalize(),
        arg_periapsis: Radians::from_degrees(se.arg_periapsis_deg),
        raan: Radians::from_degrees(se.raan_deg),
    })
}

/// Two-body analytic ephemeris backend, covering every heliocentric and
/// moon entry in the named-body whitelist.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticEphemeris;

impl AnalyticEphemeris {
    pub fn new() -> Self {
        Self
    }

    fn central_mu(parent: Option<&'static str>) -> OrreryResult<Mu> {
        match parent {
            None => Ok(crate::constants::mu::SUN),
            Some(name) => {
                let body = bodies::lookup(name)
                    .ok_or_else(|| OrreryError::UnknownBody(name.to_string()))?;
                Ok(body.mu)
            }
        }
    }

    fn elements_for(
        &self,
        name: &str,
        instant: &CalendarInstant,
    ) -> OrreryResult<(OrbitalElements, Mu, Option<&'static str>)> {
        let body = bodies::lookup(name).ok_or_else(|| OrreryError::UnknownBody(name.to_string()))?;
        match &body.model {
            Some(ElementModel::Planetary(pars)) => {
                let t = time::centuries_past_j2000(instant)?;
                let elements = elements_at(pars, t)?;
                Ok((elements, crate::constants::mu::SUN, None))
            }
            Some(ElementModel::Simple { parent, elements }) => {
                let jd = time::calendar_to_jd(instant)?;
                let days = jd.value() - time::J2000_JD;
                let oe = elements_from_simple(elements, days)?;
                let mu = Self::central_mu(*parent)?;
                Ok((oe, mu, *parent))
            }
            None => Err(OrreryError::UnknownBody(format!(
                "{name} has no analytic orbital elements (star or spacecraft)"
            ))),
        }
    }
}

impl EphemerisProvider for AnalyticEphemeris {
    fn position(&self, name: &str, instant: &CalendarInstant) -> OrreryResult<Vector3> {
        if name == "Sun" {
            return Ok(Vector3::zero());
        }
        let body = bodies::lookup(name).ok_or_else(|| OrreryError::UnknownBody(name.to_string()))?;
        if body.kind == BodyKind::Spacecraft {
            return Err(OrreryError::UnknownBody(format!(
                "{name} is a spacecraft; it has no analytic ephemeris entry"
            )));
        }

        let (elements, _mu, parent) = self.elements_for(name, instant)?;
        let relative = position_from_elements(&elements)?;
        match parent {
            None => Ok(relative),
            Some(p) => Ok(self.position(p, instant)? + relative),
        }
    }

    fn velocity(&self, name: &str, instant: &CalendarInstant) -> OrreryResult<Vector3> {
        if name == "Sun" {
            return Ok(Vector3::zero());
        }
        let body = bodies::lookup(name).ok_or_else(|| OrreryError::UnknownBody(name.to_string()))?;
        if body.kind == BodyKind::Spacecraft {
            return Err(OrreryError::UnknownBody(format!(
                "{name} is a spacecraft; it has no analytic ephemeris entry"
            )));
        }

        let (elements, mu, parent) = self.elements_for(name, instant)?;
        let relative = velocity_from_elements(mu, &elements)?;
        match parent {
            None => Ok(relative),
            Some(p) => Ok(self.velocity(p, instant)? + relative),
        }
    }
}

/// Orbital period helper re-exported for callers that want the mean
/// motion of a named body without constructing elements by hand.
pub fn period_of(name: &str) -> Option<f64> {
    let body = bodies::lookup(name)?;
    match &body.model {
        Some(ElementModel::Simple { elements, .. }) => Some(elements.period_days.abs()),
        Some(ElementModel::Planetary(_)) => None,
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Era;

    fn j2000() -> CalendarInstant {
        CalendarInstant::new(Era::Ad, 2000, 1, 1, 12, 0, 0, 0).unwrap()
    }

    #[test]
    fn sun_is_at_origin() {
        let eph = AnalyticEphemeris::new();
        let p = eph.position("Sun", &j2000()).unwrap();
        assert!(p.magnitude() < 1.0);
    }

    #[test]
    fn earth_is_roughly_one_au_from_sun() {
        let eph = AnalyticEphemeris::new();
        let p = eph.position("Earth", &j2000()).unwrap();
        let au = crate::constants::AU;
        assert!((p.magnitude() - au).abs() / au < 0.05);
    }

    #[test]
    fn moon_position_is_near_earth() {
        let eph = AnalyticEphemeris::new();
        let earth = eph.position("Earth", &j2000()).unwrap();
        let moon = eph.position("Moon", &j2000()).unwrap();
        let separation = earth.distance(moon);
        assert!(separation > 3.5e8 && separation < 4.1e8);
    }

    #[test]
    fn unknown_body_errors() {
        let eph = AnalyticEphemeris::new();
        assert!(eph.position("Nonexistent", &j2000()).is_err());
    }

    #[test]
    fn spacecraft_has_no_analytic_entry() {
        let eph = AnalyticEphemeris::new();
        assert!(eph.position("Voyager 1", &j2000()).is_err());
    }

    #[test]
    fn self_consistency_trapezoidal_prediction() {
        let eph = AnalyticEphemeris::new();
        let t0 = j2000();
        let jd1 = time::calendar_to_jd(&t0).unwrap();
        let t1 = time::jd_to_calendar(crate::time::JulianDate(jd1.value() + 3600.0 / 86400.0)).unwrap();

        let p0 = eph.position("Earth", &t0).unwrap();
        let v0 = eph.velocity("Earth", &t0).unwrap();
        let p1 = eph.position("Earth", &t1).unwrap();
        let v1 = eph.velocity("Earth", &t1).unwrap();

        let predicted = p0 + (v0 + v1).scale(1800.0);
        let error = predicted.distance(p1);
        assert!(error < 500.0, "trapezoidal prediction error {error} m");
    }
}
