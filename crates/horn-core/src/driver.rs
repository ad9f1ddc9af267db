use crate::constants::MediumProperties;
use crate::error::HornError;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Linear small-signal parameters of a loudspeaker driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThieleSmallParameters {
    /// Voice-coil DC resistance Re (Ω).
    pub re: f64,
    /// Voice-coil inductance Le (H).
    pub le: f64,
    /// Force factor Bl (T·m).
    pub bl: f64,
    /// Mechanical resistance Rms (N·s/m).
    pub rms: f64,
    /// Moving mass Mms (kg).
    pub mms: f64,
    /// Suspension compliance Cms (m/N).
    pub cms: f64,
    /// Effective diaphragm area Sd (m²).
    pub sd: f64,
    /// Maximum linear excursion Xmax (m).
    pub xmax: f64,
}

impl ThieleSmallParameters {
    pub fn validate(&self) -> Result<(), HornError> {
        let positive = [
            ("Re", self.re),
            ("Bl", self.bl),
            ("Mms", self.mms),
            ("Cms", self.cms),
            ("Sd", self.sd),
            ("Xmax", self.xmax),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(HornError::InvalidDriver(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        for (name, value) in [("Le", self.le), ("Rms", self.rms)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(HornError::InvalidDriver(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Free-air resonance fs = 1 / (2π·√(Mms·Cms)).
    pub fn resonance_frequency(&self) -> f64 {
        1.0 / (2.0 * PI * (self.mms * self.cms).sqrt())
    }

    /// Mechanical Q.
    pub fn qms(&self) -> f64 {
        2.0 * PI * self.resonance_frequency() * self.mms / self.rms
    }

    /// Electrical Q.
    pub fn qes(&self) -> f64 {
        2.0 * PI * self.resonance_frequency() * self.mms * self.re / (self.bl * self.bl)
    }

    /// Total Q.
    pub fn qts(&self) -> f64 {
        let (qms, qes) = (self.qms(), self.qes());
        qms * qes / (qms + qes)
    }

    /// Equivalent compliance volume Vas = ρc²·Sd²·Cms (m³).
    pub fn vas(&self, medium: &MediumProperties) -> f64 {
        medium.density * medium.speed_of_sound.powi(2) * self.sd * self.sd * self.cms
    }

    /// Blocked voice-coil impedance Re + jωLe.
    pub fn voice_coil_impedance(&self, frequency: f64) -> Complex64 {
        Complex64::new(self.re, 2.0 * PI * frequency * self.le)
    }

    /// Mechanical impedance of the moving system in vacuum:
    /// Rms + jωMms + 1/(jωCms).
    pub fn mechanical_impedance(&self, frequency: f64) -> Complex64 {
        let omega = 2.0 * PI * frequency;
        Complex64::new(self.rms, omega * self.mms - 1.0 / (omega * self.cms))
    }
}
