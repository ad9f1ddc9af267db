use crate::chamber::{front_load, rear_load, ChamberVolumes};
use crate::constants::MediumProperties;
use crate::driver::ThieleSmallParameters;
use crate::error::HornError;
use crate::frequency_response::validate_frequencies;
use crate::profiles::HornGeometry;
use crate::radiation::piston_radiation_impedance;
use crate::transfer_matrix::{divide_or_sentinel, TransferMatrix};
use crate::{Environment, HornProfile};
use num_complex::Complex64;
use rayon::prelude::*;
use std::f64::consts::PI;

/// Electrical and mechanical state of the driver at one frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElectricalResponse {
    pub frequency: f64,
    /// Electrical input impedance (Ω).
    pub impedance: Complex64,
    /// Voice-coil current (A).
    pub current: Complex64,
    /// Diaphragm velocity (m/s).
    pub velocity: Complex64,
    /// Diaphragm displacement (m).
    pub displacement: Complex64,
}

/// Acoustic side of the system at one frequency. The same matrix serves the
/// throat impedance and the forward propagation of volume velocity.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AcousticLoad {
    pub matrix: TransferMatrix,
    pub throat_area: f64,
    pub mouth_impedance: Complex64,
    /// Horn throat in parallel with the throat chamber.
    pub front_impedance: Complex64,
}

impl AcousticLoad {
    pub(crate) fn new(
        frequency: f64,
        horn: &HornGeometry,
        chambers: &ChamberVolumes,
        environment: Environment,
        medium: &MediumProperties,
    ) -> Self {
        let mouth_impedance = piston_radiation_impedance(
            frequency,
            horn.mouth_area(),
            medium,
            environment.solid_angle(),
        );
        let matrix = horn.transfer_matrix(frequency, medium);
        let horn_throat = matrix.throat_impedance(mouth_impedance);
        Self {
            matrix,
            throat_area: horn.throat_area(),
            mouth_impedance,
            front_impedance: front_load(frequency, horn_throat, chambers, medium),
        }
    }
}

/// `num / den` for flow quantities (current, velocity); zero when `den` is
/// exactly zero.
fn flow_or_zero(num: Complex64, den: Complex64) -> Complex64 {
    if den == Complex64::new(0.0, 0.0) {
        log::warn!("zero impedance in flow calculation, reporting zero flow");
        Complex64::new(0.0, 0.0)
    } else {
        num / den
    }
}

/// Solve the driver at one frequency against an already computed load.
pub(crate) fn solve(
    frequency: f64,
    driver: &ThieleSmallParameters,
    load: &AcousticLoad,
    chambers: &ChamberVolumes,
    voltage: f64,
    medium: &MediumProperties,
) -> ElectricalResponse {
    let omega = 2.0 * PI * frequency;

    // Z_mech = Z_acoustic · S_throat² · (S_d / S_throat)²
    let compression_ratio = driver.sd / load.throat_area;
    let front_mech =
        load.front_impedance * load.throat_area.powi(2) * compression_ratio.powi(2);
    let rear_mech = rear_load(frequency, chambers, medium) * driver.sd.powi(2);

    let z_mech = driver.mechanical_impedance(frequency) + front_mech + rear_mech;
    let bl_sq = driver.bl * driver.bl;
    let z_coil = driver.voice_coil_impedance(frequency);
    let impedance = z_coil + divide_or_sentinel(Complex64::new(bl_sq, 0.0), z_mech);

    let drive = Complex64::new(voltage, 0.0);
    let current = flow_or_zero(drive, impedance);
    // u = Bl·I/Z_mech = Bl·V/(Z_coil·Z_mech + Bl²); finite as Z_mech → 0.
    let velocity = flow_or_zero(drive * driver.bl, z_coil * z_mech + bl_sq);
    let displacement = velocity / Complex64::new(0.0, omega);

    ElectricalResponse {
        frequency,
        impedance,
        current,
        velocity,
        displacement,
    }
}

/// Electrical impedance and diaphragm motion with the mouth radiating into
/// half space.
pub fn electrical_response(
    frequencies: &[f64],
    driver: &ThieleSmallParameters,
    horn: &HornGeometry,
    chambers: &ChamberVolumes,
    voltage: f64,
    medium: &MediumProperties,
) -> Result<Vec<ElectricalResponse>, HornError> {
    electrical_response_in(
        frequencies,
        driver,
        horn,
        chambers,
        voltage,
        Environment::HalfSpace,
        medium,
    )
}

/// [`electrical_response`] for an explicit radiation environment.
pub fn electrical_response_in(
    frequencies: &[f64],
    driver: &ThieleSmallParameters,
    horn: &HornGeometry,
    chambers: &ChamberVolumes,
    voltage: f64,
    environment: Environment,
    medium: &MediumProperties,
) -> Result<Vec<ElectricalResponse>, HornError> {
    validate_inputs(frequencies, driver, chambers, voltage, medium)?;
    Ok(frequencies
        .par_iter()
        .map(|&f| {
            let load = AcousticLoad::new(f, horn, chambers, environment, medium);
            solve(f, driver, &load, chambers, voltage, medium)
        })
        .collect())
}

pub(crate) fn validate_inputs(
    frequencies: &[f64],
    driver: &ThieleSmallParameters,
    chambers: &ChamberVolumes,
    voltage: f64,
    medium: &MediumProperties,
) -> Result<(), HornError> {
    validate_frequencies(frequencies)?;
    medium.validate()?;
    driver.validate()?;
    chambers.validate()?;
    if !voltage.is_finite() {
        return Err(HornError::InvalidOperatingPoint(format!(
            "drive voltage must be finite, got {voltage}"
        )));
    }
    Ok(())
}
