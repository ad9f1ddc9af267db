pub mod chamber;
pub mod config;
pub mod constants;
pub mod coupling;
pub mod driver;
pub mod error;
pub mod frequency_response;
pub mod profiles;
pub mod radiation;
pub mod transfer_matrix;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub use chamber::ChamberVolumes;
pub use config::{ConfigError, SimConfig};
pub use constants::MediumProperties;
pub use coupling::{electrical_response, electrical_response_in, ElectricalResponse};
pub use driver::ThieleSmallParameters;
pub use error::HornError;
pub use frequency_response::{log_frequencies, spl_response, throat_impedance};
pub use profiles::{
    ConicalHorn, ExponentialHorn, HornGeometry, HornSegment, HyperbolicHorn, MultiSegmentHorn,
};
pub use radiation::radiation_impedance;
pub use transfer_matrix::TransferMatrix;

// ---------------------------------------------------------------------------
// Shared interface types
// ---------------------------------------------------------------------------

/// Solid angle the horn mouth radiates into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// 4π: free field.
    FullSpace,
    /// 2π: infinite baffle or ground plane.
    #[default]
    HalfSpace,
    /// π: wall-floor edge.
    QuarterSpace,
    /// π/2: room corner.
    EighthSpace,
}

impl Environment {
    /// Solid angle Ω in steradians.
    pub fn solid_angle(&self) -> f64 {
        match self {
            Environment::FullSpace => 4.0 * PI,
            Environment::HalfSpace => 2.0 * PI,
            Environment::QuarterSpace => PI,
            Environment::EighthSpace => PI / 2.0,
        }
    }

    /// Directivity factor Q = 4π/Ω (1 for full space, 2 for half space).
    pub fn directivity_factor(&self) -> f64 {
        4.0 * PI / self.solid_angle()
    }
}

/// Capability shared by every horn profile: geometry plus a transfer matrix
/// at any frequency.
pub trait HornProfile: Send + Sync {
    /// Throat area in m².
    fn throat_area(&self) -> f64;
    /// Mouth area in m².
    fn mouth_area(&self) -> f64;
    /// Axial length in metres.
    fn length(&self) -> f64;
    /// Cross-sectional area `x` metres from the throat.
    fn area_at(&self, x: f64) -> f64;
    /// Throat-to-mouth transfer matrix at `frequency` Hz (must be positive).
    fn transfer_matrix(&self, frequency: f64, medium: &MediumProperties) -> TransferMatrix;

    /// Acoustic impedance at the throat when the mouth sees `z_mouth`.
    fn throat_impedance_for(
        &self,
        frequency: f64,
        z_mouth: Complex64,
        medium: &MediumProperties,
    ) -> Complex64 {
        self.transfer_matrix(frequency, medium)
            .throat_impedance(z_mouth)
    }
}

/// Frequency response of a driver on a horn. Every vector has one entry per
/// input frequency, in input order.
#[derive(Debug, Clone, Default)]
pub struct HornResponseResult {
    /// Frequencies in Hz.
    pub frequencies: Vec<f64>,
    /// Electrical input impedance (Ω).
    pub electrical_impedance: Vec<Complex64>,
    /// Voice-coil current (A).
    pub current: Vec<Complex64>,
    /// Diaphragm velocity (m/s).
    pub diaphragm_velocity: Vec<Complex64>,
    /// Diaphragm displacement (m).
    pub diaphragm_excursion: Vec<Complex64>,
    /// Acoustic load at the diaphragm side of the throat, horn and throat
    /// chamber combined (Pa·s/m³).
    pub throat_impedance: Vec<Complex64>,
    /// Radiation impedance at the mouth (Pa·s/m³).
    pub mouth_impedance: Vec<Complex64>,
    /// Throat volume velocity (m³/s).
    pub throat_volume_velocity: Vec<Complex64>,
    /// Mouth volume velocity (m³/s).
    pub mouth_volume_velocity: Vec<Complex64>,
    /// Radiated acoustic power (W), never negative.
    pub acoustic_power: Vec<f64>,
    /// Sound pressure level (dB re 20 µPa).
    pub spl: Vec<f64>,
}

impl HornResponseResult {
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Largest diaphragm excursion magnitude over the sweep (m).
    pub fn peak_excursion(&self) -> f64 {
        self.diaphragm_excursion
            .iter()
            .map(|x| x.norm())
            .fold(0.0, f64::max)
    }

    /// Render as CSV: frequency, impedance magnitude and phase, excursion in
    /// mm, acoustic power and SPL.
    pub fn to_csv(&self) -> String {
        let mut out = String::from(
            "frequency_hz,impedance_ohm,impedance_phase_deg,excursion_mm,acoustic_power_w,spl_db\n",
        );
        for i in 0..self.len() {
            let z = self.electrical_impedance[i];
            out.push_str(&format!(
                "{:.3},{:.4},{:.2},{:.5},{:.6e},{:.2}\n",
                self.frequencies[i],
                z.norm(),
                z.arg().to_degrees(),
                self.diaphragm_excursion[i].norm() * 1e3,
                self.acoustic_power[i],
                self.spl[i],
            ));
        }
        out
    }
}

/// Run the full pipeline described by `config`: build the horn, sweep the
/// configured frequency range and return the response.
pub fn compute(config: &SimConfig) -> Result<HornResponseResult, ConfigError> {
    let medium = config.medium()?;
    let horn = config.horn()?;
    let driver = config.driver;
    driver.validate()?;
    let frequencies = config.sweep.frequencies()?;

    if let Some(fc) = horn.cutoff_frequency(&medium) {
        log::info!("horn cutoff frequency {fc:.1} Hz");
        // Mouth circumference below one wavelength at cutoff.
        let mouth_radius = constants::radius_from_area(horn.mouth_area());
        if 2.0 * PI * mouth_radius < medium.speed_of_sound / fc {
            log::warn!(
                "mouth radius {mouth_radius:.3} m is small for the {fc:.1} Hz cutoff; expect ripple"
            );
        }
    }
    log::info!(
        "sweeping {} points from {:.1} Hz to {:.1} Hz",
        frequencies.len(),
        config.sweep.start,
        config.sweep.stop
    );

    let result = spl_response(
        &frequencies,
        &driver,
        &horn,
        &config.chambers,
        config.voltage,
        config.distance,
        config.environment,
        &medium,
    )?;

    let peak = result.peak_excursion();
    if peak > driver.xmax {
        log::warn!(
            "peak excursion {:.2} mm exceeds Xmax {:.2} mm",
            peak * 1e3,
            driver.xmax * 1e3
        );
    }
    Ok(result)
}
