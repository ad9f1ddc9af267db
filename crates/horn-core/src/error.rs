use thiserror::Error;

/// Construction-time and call-boundary rejections.
///
/// Numerical singularities (horn cutoff, ka → 0, zero impedances) are
/// handled locally and never surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HornError {
    #[error("Invalid horn geometry: {0}")]
    InvalidGeometry(String),
    #[error("Horn must have at least one segment")]
    EmptyHorn,
    #[error("Invalid frequency {0} Hz: frequencies must be finite and positive")]
    InvalidFrequency(f64),
    #[error("Frequency array is empty")]
    NoFrequencies,
    #[error("Invalid medium: {0}")]
    InvalidMedium(String),
    #[error("Invalid driver parameters: {0}")]
    InvalidDriver(String),
    #[error("Invalid chamber volume: {0}")]
    InvalidChamber(String),
    #[error("Invalid operating point: {0}")]
    InvalidOperatingPoint(String),
    #[error("Invalid frequency sweep: {0}")]
    InvalidSweep(String),
}

/// Reject a parameter that must be finite and strictly positive, reporting
/// it through `kind` (e.g. `HornError::InvalidGeometry`).
pub(crate) fn require_positive(
    name: &str,
    value: f64,
    kind: fn(String) -> HornError,
) -> Result<(), HornError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(kind(format!("{name} must be positive, got {value}")))
    }
}
