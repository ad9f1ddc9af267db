use crate::constants::MediumProperties;
use crate::error::HornError;
use crate::transfer_matrix::divide_or_sentinel;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Optional air volumes around the diaphragm, in m³.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChamberVolumes {
    /// Compression chamber between diaphragm and horn throat.
    pub throat_chamber: Option<f64>,
    /// Sealed cavity behind the diaphragm.
    pub rear_chamber: Option<f64>,
}

impl ChamberVolumes {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), HornError> {
        for (name, volume) in [
            ("throat chamber", self.throat_chamber),
            ("rear chamber", self.rear_chamber),
        ] {
            if let Some(v) = volume {
                if !(v.is_finite() && v > 0.0) {
                    return Err(HornError::InvalidChamber(format!(
                        "{name} volume must be positive, got {v}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Acoustic compliance of an enclosed volume, C = V/(ρc²).
pub fn acoustic_compliance(volume: f64, medium: &MediumProperties) -> f64 {
    volume / (medium.density * medium.speed_of_sound.powi(2))
}

/// Impedance of an enclosed volume treated as a pure compliance, −j/(ωC).
pub fn chamber_impedance(frequency: f64, volume: f64, medium: &MediumProperties) -> Complex64 {
    let omega = 2.0 * PI * frequency;
    Complex64::new(0.0, -1.0 / (omega * acoustic_compliance(volume, medium)))
}

/// Two impedances sharing one pressure node.
pub fn parallel(z1: Complex64, z2: Complex64) -> Complex64 {
    divide_or_sentinel(z1 * z2, z1 + z2)
}

/// Acoustic load presented to the front of the diaphragm: the horn throat
/// in parallel with the throat chamber, if any.
pub fn front_load(
    frequency: f64,
    horn_throat: Complex64,
    chambers: &ChamberVolumes,
    medium: &MediumProperties,
) -> Complex64 {
    match chambers.throat_chamber {
        Some(v) => parallel(horn_throat, chamber_impedance(frequency, v, medium)),
        None => horn_throat,
    }
}

/// Acoustic load on the back of the diaphragm. Zero when there is no rear
/// chamber; rear radiation is ignored.
pub fn rear_load(frequency: f64, chambers: &ChamberVolumes, medium: &MediumProperties) -> Complex64 {
    match chambers.rear_chamber {
        Some(v) => chamber_impedance(frequency, v, medium),
        None => Complex64::new(0.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compliance_reactance_halves_with_double_volume() {
        let medium = MediumProperties::default();
        let small = chamber_impedance(100.0, 1e-3, &medium);
        let large = chamber_impedance(100.0, 2e-3, &medium);
        assert_eq!(small.re, 0.0);
        assert!(small.im < 0.0);
        assert!((small.im / large.im - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_throat_chamber_is_parallel() {
        let medium = MediumProperties::default();
        let horn = Complex64::new(800_000.0, 200_000.0);
        let chambers = ChamberVolumes {
            throat_chamber: Some(5e-6),
            rear_chamber: None,
        };
        let zc = chamber_impedance(2000.0, 5e-6, &medium);
        let combined = front_load(2000.0, horn, &chambers, &medium);
        let expected = 1.0 / (1.0 / horn + 1.0 / zc);
        assert!((combined - expected).norm() < 1e-6 * expected.norm());
        // Admittances add; the reactive shunt leaves the conductance alone.
        let admittance = 1.0 / combined;
        let summed = 1.0 / horn + 1.0 / zc;
        assert!((admittance - summed).norm() < 1e-9 * summed.norm());
        assert!((admittance.re - (1.0 / horn).re).abs() < 1e-9 * admittance.re);
        assert!(combined.re >= 0.0);
    }

    #[test]
    fn test_no_chambers_leave_load_untouched() {
        let medium = MediumProperties::default();
        let horn = Complex64::new(1000.0, -50.0);
        let none = ChamberVolumes::none();
        assert_eq!(front_load(500.0, horn, &none, &medium), horn);
        assert_eq!(rear_load(500.0, &none, &medium), Complex64::new(0.0, 0.0));
    }

    #[test]
    fn test_rejects_non_positive_volume() {
        let bad = ChamberVolumes {
            throat_chamber: Some(0.0),
            rear_chamber: None,
        };
        assert!(bad.validate().is_err());
        let bad_rear = ChamberVolumes {
            throat_chamber: None,
            rear_chamber: Some(-1e-3),
        };
        assert!(bad_rear.validate().is_err());
        assert!(ChamberVolumes::none().validate().is_ok());
    }
}
