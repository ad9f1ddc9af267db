use crate::chamber::ChamberVolumes;
use crate::constants::{MediumProperties, P_REF};
use crate::coupling::{solve, validate_inputs, AcousticLoad};
use crate::driver::ThieleSmallParameters;
use crate::error::{require_positive, HornError};
use crate::profiles::HornGeometry;
use crate::radiation::piston_radiation_impedance;
use crate::{Environment, HornProfile, HornResponseResult};
use num_complex::Complex64;
use rayon::prelude::*;
use std::f64::consts::PI;

/// Pressures below this are clamped so SPL stays finite (Pa).
pub const MIN_PRESSURE: f64 = 1e-10;

/// Reject empty arrays and any frequency that is not finite and positive.
pub fn validate_frequencies(frequencies: &[f64]) -> Result<(), HornError> {
    if frequencies.is_empty() {
        return Err(HornError::NoFrequencies);
    }
    match frequencies.iter().find(|f| !(f.is_finite() && **f > 0.0)) {
        Some(&bad) => Err(HornError::InvalidFrequency(bad)),
        None => Ok(()),
    }
}

/// `points` logarithmically spaced frequencies from `start` to `stop`
/// inclusive.
pub fn log_frequencies(start: f64, stop: f64, points: usize) -> Result<Vec<f64>, HornError> {
    if !(start.is_finite() && start > 0.0) {
        return Err(HornError::InvalidFrequency(start));
    }
    if !(stop.is_finite() && stop >= start) {
        return Err(HornError::InvalidSweep(format!(
            "stop frequency {stop} Hz must not be below start {start} Hz"
        )));
    }
    match points {
        0 => Err(HornError::InvalidSweep("sweep needs at least one point".into())),
        1 => Ok(vec![start]),
        n => {
            let ratio = (stop / start).ln() / (n - 1) as f64;
            let mut freqs: Vec<f64> = (0..n).map(|i| start * (ratio * i as f64).exp()).collect();
            // Land exactly on the requested end point.
            freqs[n - 1] = stop;
            Ok(freqs)
        }
    }
}

/// Acoustic impedance at the horn throat with the mouth radiating into
/// `solid_angle` steradians.
pub fn throat_impedance(
    frequencies: &[f64],
    horn: &HornGeometry,
    medium: &MediumProperties,
    solid_angle: f64,
) -> Result<Vec<Complex64>, HornError> {
    validate_frequencies(frequencies)?;
    medium.validate()?;
    require_positive("solid angle", solid_angle, HornError::InvalidOperatingPoint)?;
    Ok(frequencies
        .par_iter()
        .map(|&f| {
            let z_mouth = piston_radiation_impedance(f, horn.mouth_area(), medium, solid_angle);
            horn.throat_impedance_for(f, z_mouth, medium)
        })
        .collect())
}

/// SPL (dB re 20 µPa) at `distance` for `power` watts radiated with
/// directivity factor `q`.
pub fn spl_from_power(power: f64, q: f64, distance: f64, medium: &MediumProperties) -> f64 {
    let intensity = power.max(0.0) * q / (4.0 * PI * distance * distance);
    let pressure = (intensity * medium.characteristic_impedance()).sqrt();
    20.0 * (pressure.max(MIN_PRESSURE) / P_REF).log10()
}

/// Full forward pipeline: electrical response, volume velocity pushed from
/// throat to mouth, radiated power and SPL at `distance` metres.
#[allow(clippy::too_many_arguments)]
pub fn spl_response(
    frequencies: &[f64],
    driver: &ThieleSmallParameters,
    horn: &HornGeometry,
    chambers: &ChamberVolumes,
    voltage: f64,
    distance: f64,
    environment: Environment,
    medium: &MediumProperties,
) -> Result<HornResponseResult, HornError> {
    validate_inputs(frequencies, driver, chambers, voltage, medium)?;
    if !(distance.is_finite() && distance > 0.0) {
        return Err(HornError::InvalidOperatingPoint(format!(
            "listening distance must be positive, got {distance}"
        )));
    }

    let q = environment.directivity_factor();
    let points: Vec<_> = frequencies
        .par_iter()
        .map(|&f| {
            let load = AcousticLoad::new(f, horn, chambers, environment, medium);
            let response = solve(f, driver, &load, chambers, voltage, medium);
            (load, response)
        })
        .collect();

    let n = frequencies.len();
    let mut result = HornResponseResult {
        frequencies: frequencies.to_vec(),
        electrical_impedance: Vec::with_capacity(n),
        current: Vec::with_capacity(n),
        diaphragm_velocity: Vec::with_capacity(n),
        diaphragm_excursion: Vec::with_capacity(n),
        throat_impedance: Vec::with_capacity(n),
        mouth_impedance: Vec::with_capacity(n),
        throat_volume_velocity: Vec::with_capacity(n),
        mouth_volume_velocity: Vec::with_capacity(n),
        acoustic_power: Vec::with_capacity(n),
        spl: Vec::with_capacity(n),
    };

    for (load, response) in points {
        let u_throat = response.velocity * driver.sd;
        let u_mouth = load
            .matrix
            .mouth_volume_velocity(u_throat, load.mouth_impedance);
        let power = (0.5 * u_mouth.norm_sqr() * load.mouth_impedance.re).max(0.0);

        result.electrical_impedance.push(response.impedance);
        result.current.push(response.current);
        result.diaphragm_velocity.push(response.velocity);
        result.diaphragm_excursion.push(response.displacement);
        result.throat_impedance.push(load.front_impedance);
        result.mouth_impedance.push(load.mouth_impedance);
        result.throat_volume_velocity.push(u_throat);
        result.mouth_volume_velocity.push(u_mouth);
        result.acoustic_power.push(power);
        result.spl.push(spl_from_power(power, q, distance, medium));
    }

    Ok(result)
}
