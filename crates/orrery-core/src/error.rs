/// Error kinds surfaced by the core, one variant per failure mode named in
/// the component contracts (time/calendar, orbital elements, ephemeris,
/// integrator, facade).
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OrreryError {
    #[error("unknown body: {0}")]
    UnknownBody(String),

    #[error("unknown spacecraft: {0}")]
    UnknownSpacecraft(String),

    #[error("instant is outside the ephemeris window: {0}")]
    OutOfRange(String),

    #[error("unsupported calendar instant: {0}")]
    UnsupportedInstant(String),

    #[error("invalid orbital elements: {0}")]
    InvalidOrbit(String),

    #[error("solver did not converge after {iterations} iterations (residual={residual})")]
    NoConvergence { iterations: u32, residual: f64 },

    #[error("integrator diverged: {0}")]
    IntegratorDiverged(String),

    #[error("Lambert problem has no solution for the requested revolution count: {0}")]
    LambertNoSolution(String),
}

pub type OrreryResult<T> = Result<T, OrreryError>;
