/// Ambient configuration (spec.md §6): integrator kernel, stepping, and
/// the accurate-ephemeris window. Always constructible from defaults;
/// optionally loaded from a config file/environment via the `config`
/// crate behind the `config-file` feature.
use serde::{Deserialize, Serialize};

use crate::integrator::IntegratorKind;
use crate::time::{CalendarInstant, Era};

fn default_integrator_kind() -> IntegratorKind {
    IntegratorKind::Newton
}

fn default_base_step_seconds() -> f64 {
    60.0
}

fn default_fast_multiplier() -> f64 {
    24.0
}

fn ephemeris_window_start() -> CalendarInstant {
    CalendarInstant::new(Era::Ad, 1620, 1, 1, 0, 0, 0, 0).expect("valid default window start")
}

fn ephemeris_window_end() -> CalendarInstant {
    CalendarInstant::new(Era::Ad, 2200, 1, 31, 0, 0, 0, 0).expect("valid default window end")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub integrator_kind: IntegratorKind,
    pub base_step_seconds: f64,
    pub fast_multiplier: f64,
    pub ephemeris_window_start: CalendarInstant,
    pub ephemeris_window_end: CalendarInstant,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            integrator_kind: default_integrator_kind(),
            base_step_seconds: default_base_step_seconds(),
            fast_multiplier: default_fast_multiplier(),
            ephemeris_window_start: ephemeris_window_start(),
            ephemeris_window_end: ephemeris_window_end(),
        }
    }
}

#[cfg(feature = "config-file")]
impl Config {
    /// Load configuration layered as: built-in defaults, then an optional
    /// `orrery.toml` in the current directory, then `ORRERY_*` environment
    /// variables, matching the teacher's layered-source pattern.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let defaults = Self::default();
        let builder = ::config::Config::builder()
            .set_default("integrator_kind", "NEWTON")?
            .set_default("base_step_seconds", defaults.base_step_seconds)?
            .set_default("fast_multiplier", defaults.fast_multiplier)?
            .add_source(::config::File::with_name("orrery").required(false))
            .add_source(::config::Environment::with_prefix("ORRERY"));

        let raw = builder.build()?;
        raw.try_deserialize()
    }
}
