/// Calendar ↔ Julian Date conversion, sidereal time.
///
/// JD 0 is defined at 4713-01-01 12:00 BC (proleptic Julian calendar).
/// The Julian calendar applies strictly before 1582-10-15; the Gregorian
/// calendar applies from 1582-10-15 onward. The ten days 1582-10-05
/// through 1582-10-14 do not exist in either calendar.
use crate::error::{OrreryError, OrreryResult};

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Julian century in days.
pub const JULIAN_CENTURY_DAYS: f64 = 36_525.0;

/// JD at which the Gregorian calendar begins (1582-10-15 00:00 UTC).
pub const GREGORIAN_START_JD: f64 = 2_299_160.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Era {
    Bc,
    Ad,
}

/// A calendar instant in UTC, era-qualified (no year 0 — 1 BC is immediately
/// followed by 1 AD).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CalendarInstant {
    pub era: Era,
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl CalendarInstant {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        era: Era,
        year: u32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        millisecond: u32,
    ) -> OrreryResult<Self> {
        let instant = Self {
            era,
            year,
            month,
            day,
            hour,
            minute,
            second,
            millisecond,
        };
        instant.validate()?;
        Ok(instant)
    }

    fn validate(&self) -> OrreryResult<()> {
        if self.year == 0 {
            return Err(OrreryError::UnsupportedInstant(
                "year 0 does not exist (1 BC is followed directly by 1 AD)".into(),
            ));
        }
        if !(1..=12).contains(&self.month) {
            return Err(OrreryError::UnsupportedInstant(format!(
                "month {} out of range",
                self.month
            )));
        }
        if self.hour > 23 || self.minute > 59 || self.second > 59 || self.millisecond > 999 {
            return Err(OrreryError::UnsupportedInstant(
                "time-of-day field out of range".into(),
            ));
        }
        let astronomical_year = self.astronomical_year();
        let is_gregorian = is_gregorian_date(astronomical_year, self.month, self.day);
        if is_gregorian && astronomical_year == 1582 && self.month == 10 && (5..=14).contains(&self.day)
        {
            return Err(OrreryError::UnsupportedInstant(
                "1582-10-05 through 1582-10-14 do not exist (Gregorian reform)".into(),
            ));
        }
        let max_day = days_in_month(astronomical_year, self.month, is_gregorian);
        if self.day == 0 || self.day > max_day {
            return Err(OrreryError::UnsupportedInstant(format!(
                "day {} invalid for {}-{:02}",
                self.day, astronomical_year, self.month
            )));
        }
        Ok(())
    }

    /// Astronomical year number: 1 AD = 1, 1 BC = 0, 2 BC = -1, ...
    pub fn astronomical_year(&self) -> i64 {
        match self.era {
            Era::Ad => self.year as i64,
            Era::Bc => 1 - self.year as i64,
        }
    }

    fn day_fraction(&self) -> f64 {
        self.day as f64
            + (self.hour as f64 * 3_600_000.0
                + self.minute as f64 * 60_000.0
                + self.second as f64 * 1_000.0
                + self.millisecond as f64)
                / 86_400_000.0
    }

    fn from_astronomical(astronomical_year: i64, month: u32, day_fraction: f64) -> Self {
        let (era, year) = if astronomical_year >= 1 {
            (Era::Ad, astronomical_year as u32)
        } else {
            (Era::Bc, (1 - astronomical_year) as u32)
        };
        let day = day_fraction.floor() as u32;
        let frac_day = day_fraction - day_fraction.floor();
        let mut total_ms = (frac_day * 86_400_000.0).round() as i64;
        let mut carry_day = 0u32;
        if total_ms >= 86_400_000 {
            total_ms -= 86_400_000;
            carry_day = 1;
        }
        let hour = (total_ms / 3_600_000) as u32;
        let rem = total_ms % 3_600_000;
        let minute = (rem / 60_000) as u32;
        let rem = rem % 60_000;
        let second = (rem / 1_000) as u32;
        let millisecond = (rem % 1_000) as u32;
        Self {
            era,
            year,
            month,
            day: day + carry_day,
            hour,
            minute,
            second,
            millisecond,
        }
    }
}

fn is_leap_year(astronomical_year: i64, is_gregorian: bool) -> bool {
    if is_gregorian {
        astronomical_year % 4 == 0 && (astronomical_year % 100 != 0 || astronomical_year % 400 == 0)
    } else {
        astronomical_year % 4 == 0
    }
}

fn days_in_month(astronomical_year: i64, month: u32, is_gregorian: bool) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(astronomical_year, is_gregorian) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Whether a (year, month, day) triple, taken at face value, falls on or
/// after the Gregorian reform date.
fn is_gregorian_date(astronomical_year: i64, month: u32, day: u32) -> bool {
    (astronomical_year, month, day) >= (1582, 10, 15)
}

/// A Julian Date: a continuous count of days (including fractional part)
/// since 4713-01-01 12:00 BC (proleptic Julian calendar).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct JulianDate(pub f64);

impl JulianDate {
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Convert a calendar instant to a Julian Date.
///
/// Applies the Julian calendar strictly before 1582-10-15 and the
/// Gregorian calendar from 1582-10-15 onward, per the instant's own date
/// (not today's calendar).
pub fn calendar_to_jd(instant: &CalendarInstant) -> OrreryResult<JulianDate> {
    instant.validate()?;
    let y = instant.astronomical_year();
    let gregorian = is_gregorian_date(y, instant.month, instant.day);
    let day = instant.day_fraction();

    let (yy, mm) = if instant.month <= 2 {
        (y - 1, instant.month as i64 + 12)
    } else {
        (y, instant.month as i64)
    };

    let b = if gregorian {
        let a = (yy as f64 / 100.0).floor();
        2.0 - a + (a / 4.0).floor()
    } else {
        0.0
    };

    let jd = (365.25 * (yy as f64 + 4716.0)).floor()
        + (30.6001 * (mm as f64 + 1.0)).floor()
        + day
        + b
        - 1524.5;

    if jd < 0.0 {
        return Err(OrreryError::UnsupportedInstant(
            "instant is before JD 0 (4713-01-01 12:00 BC)".into(),
        ));
    }
    Ok(JulianDate(jd))
}

/// Convert a Julian Date to a UTC calendar instant.
///
/// Only valid from 1582-10-15 onward (`GREGORIAN_START_JD`); this backend
/// never reconstructs a proleptic-Julian-calendar date, matching the
/// one-directional contract in spec.md §4.1.
pub fn jd_to_calendar(jd: JulianDate) -> OrreryResult<CalendarInstant> {
    if jd.0 < GREGORIAN_START_JD {
        return Err(OrreryError::UnsupportedInstant(format!(
            "jd {} is before the Gregorian calendar start (1582-10-15)",
            jd.0
        )));
    }

    let jd_val = jd.0;
    let z = (jd_val + 0.5).floor();
    let f = jd_val + 0.5 - z;

    let a = if z < 2_299_161.0 {
        z
    } else {
        let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
        z + 1.0 + alpha - (alpha / 4.0).floor()
    };

    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day_with_frac = b - d - (30.6001 * e).floor() + f;
    let month = if e < 14.0 { e - 1.0 } else { e - 13.0 };
    let year = if month > 2.0 { c - 4716.0 } else { c - 4715.0 };

    Ok(CalendarInstant::from_astronomical(
        year as i64,
        month as u32,
        day_with_frac,
    ))
}

/// Julian centuries elapsed since J2000.0 for the given instant.
pub fn centuries_past_j2000(instant: &CalendarInstant) -> OrreryResult<f64> {
    let jd = calendar_to_jd(instant)?;
    Ok((jd.0 - J2000_JD) / JULIAN_CENTURY_DAYS)
}

/// Mean obliquity of the ecliptic (degrees), low-precision (Meeus ch.22).
fn mean_obliquity_deg(t: f64) -> f64 {
    23.439_291 - 0.013_004_2 * t - 1.64e-7 * t * t + 5.04e-7 * t * t * t
}

/// Low-precision nutation in longitude and obliquity (arcseconds),
/// dominant terms only (Meeus ch.22, accurate to ~0.0003°).
fn nutation_arcsec(t: f64) -> (f64, f64) {
    let omega = (125.044_52 - 1_934.136_261 * t).to_radians();
    let l = (280.4665 + 36_000.7698 * t).to_radians();
    let lp = (218.3165 + 481_267.8813 * t).to_radians();

    let dpsi = -17.20 * omega.sin() - 1.32 * (2.0 * l).sin() - 0.23 * (2.0 * lp).sin()
        + 0.21 * (2.0 * omega).sin();
    let deps = 9.20 * omega.cos() + 0.57 * (2.0 * l).cos() + 0.10 * (2.0 * lp).cos()
        - 0.09 * (2.0 * omega).cos();
    (dpsi, deps)
}

/// Greenwich apparent sidereal time in degrees, normalized to [0, 360).
fn greenwich_apparent_sidereal_time_deg(instant: &CalendarInstant) -> OrreryResult<f64> {
    let jd = calendar_to_jd(instant)?;
    let t = (jd.0 - J2000_JD) / JULIAN_CENTURY_DAYS;

    let gmst = 280.460_618_37 + 360.985_647_366_29 * (jd.0 - J2000_JD) + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;

    let (dpsi, deps) = nutation_arcsec(t);
    let eps0 = mean_obliquity_deg(t);
    let eqeq = dpsi * (eps0 + deps / 3600.0).to_radians().cos() / 3600.0;

    let gast = gmst + eqeq;
    Ok(gast.rem_euclid(360.0))
}

/// Apparent local sidereal time (degrees, normalized to [0, 360)) at the
/// given east longitude (degrees) and instant.
pub fn local_sidereal_time(longitude_deg: f64, instant: &CalendarInstant) -> OrreryResult<f64> {
    let gast = greenwich_apparent_sidereal_time_deg(instant)?;
    Ok((gast + longitude_deg).rem_euclid(360.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn j2000_epoch() {
        let instant = CalendarInstant::new(Era::Ad, 2000, 1, 1, 12, 0, 0, 0).unwrap();
        let jd = calendar_to_jd(&instant).unwrap();
        assert!((jd.0 - 2_451_545.0).abs() < 1e-9);
    }

    #[test]
    fn bc_ad_boundary() {
        let instant = CalendarInstant::new(Era::Bc, 1, 1, 1, 0, 0, 0, 0).unwrap();
        let jd = calendar_to_jd(&instant).unwrap();
        assert!((jd.0 - 1_721_057.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_year_zero() {
        assert!(CalendarInstant::new(Era::Ad, 0, 1, 1, 0, 0, 0, 0).is_err());
    }

    #[test]
    fn rejects_gregorian_gap() {
        assert!(CalendarInstant::new(Era::Ad, 1582, 10, 10, 0, 0, 0, 0).is_err());
    }

    #[test]
    fn accepts_julian_calendar_before_gap() {
        // 1582-10-04 is the last Julian-calendar day before the reform.
        assert!(CalendarInstant::new(Era::Ad, 1582, 10, 4, 0, 0, 0, 0).is_ok());
    }

    #[test]
    fn leap_year_rules() {
        // Gregorian: 1900 not leap, 2000 leap, 2024 leap.
        assert!(CalendarInstant::new(Era::Ad, 1900, 2, 29, 0, 0, 0, 0).is_err());
        assert!(CalendarInstant::new(Era::Ad, 2000, 2, 29, 0, 0, 0, 0).is_ok());
        assert!(CalendarInstant::new(Era::Ad, 2024, 2, 29, 0, 0, 0, 0).is_ok());
    }

    #[test]
    fn julian_calendar_leap_rule_differs_from_gregorian() {
        // Julian calendar: every 4th year is leap, including century years.
        let instant = CalendarInstant::new(Era::Ad, 1500, 2, 29, 0, 0, 0, 0).unwrap();
        assert!(calendar_to_jd(&instant).is_ok());
    }

    #[test]
    fn jd_to_calendar_rejects_before_gregorian_start() {
        assert!(jd_to_calendar(JulianDate(GREGORIAN_START_JD - 1.0)).is_err());
    }

    #[test]
    fn round_trip_millisecond_fidelity() {
        let cases = [
            (Era::Ad, 1582, 10, 15, 0, 0, 0, 0),
            (Era::Ad, 1700, 6, 15, 13, 27, 59, 123),
            (Era::Ad, 2024, 2, 29, 23, 59, 59, 999),
            (Era::Ad, 4999, 12, 31, 0, 0, 0, 500),
        ];
        for (era, y, mo, d, h, mi, s, ms) in cases {
            let instant = CalendarInstant::new(era, y, mo, d, h, mi, s, ms).unwrap();
            let jd = calendar_to_jd(&instant).unwrap();
            let back = jd_to_calendar(jd).unwrap();
            let jd_back = calendar_to_jd(&back).unwrap();
            let diff_days = (jd.0 - jd_back.0).abs();
            assert!(
                diff_days * 86_400_000.0 < 1.0,
                "round trip for {y}-{mo}-{d} drifted {} ms",
                diff_days * 86_400_000.0
            );
        }
    }

    #[test]
    fn centuries_past_j2000_exact() {
        let t0 = CalendarInstant::new(Era::Ad, 2000, 1, 1, 12, 0, 0, 0).unwrap();
        assert!((centuries_past_j2000(&t0).unwrap()).abs() < 1e-14);

        let t1 = CalendarInstant::new(Era::Ad, 2100, 1, 1, 12, 0, 0, 0).unwrap();
        // Not exactly 1 century because of leap-year distribution, but should
        // be extremely close (2100 is not a leap year under Gregorian rules,
        // same as the Julian-century definition assumes).
        assert!((centuries_past_j2000(&t1).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn local_sidereal_time_in_range() {
        let instant = CalendarInstant::new(Era::Ad, 2024, 6, 21, 0, 0, 0, 0).unwrap();
        let lst = local_sidereal_time(-122.0, &instant).unwrap();
        assert!((0.0..360.0).contains(&lst));
    }
}
