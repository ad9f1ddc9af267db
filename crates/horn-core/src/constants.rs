use crate::error::{require_positive, HornError};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Reference pressure for SPL (20 µPa).
pub const P_REF: f64 = 20e-6;

/// Properties of the air the horn radiates into.
///
/// Created once per run and passed by reference to every calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MediumProperties {
    /// Speed of sound in m/s.
    pub speed_of_sound: f64,
    /// Air density in kg/m³.
    pub density: f64,
}

impl Default for MediumProperties {
    fn default() -> Self {
        Self {
            speed_of_sound: 343.0,
            density: 1.205,
        }
    }
}

impl MediumProperties {
    pub fn new(speed_of_sound: f64, density: f64) -> Result<Self, HornError> {
        let medium = Self {
            speed_of_sound,
            density,
        };
        medium.validate()?;
        Ok(medium)
    }

    /// Fields are public, so every batch entry point re-checks them.
    pub fn validate(&self) -> Result<(), HornError> {
        require_positive("speed of sound", self.speed_of_sound, HornError::InvalidMedium)?;
        require_positive("density", self.density, HornError::InvalidMedium)
    }

    /// Speed of sound (m/s) and density (kg/m³) as a function of
    /// temperature in °C. Uses the ideal-gas approximation.
    pub fn from_temperature(temperature_c: f64) -> Result<Self, HornError> {
        let t_kelvin = temperature_c + 273.15;
        if !(t_kelvin.is_finite() && t_kelvin > 0.0) {
            return Err(HornError::InvalidMedium(format!(
                "temperature {temperature_c} °C is below absolute zero"
            )));
        }
        // c = 331.3 * sqrt(T/273.15)
        let c = 331.3 * (t_kelvin / 273.15).sqrt();
        // ρ = p / (R_specific * T), with p = 101325 Pa, R_specific = 287.05 J/(kg·K)
        let rho = 101325.0 / (287.05 * t_kelvin);
        Self::new(c, rho)
    }

    /// Characteristic impedance of the medium, ρc (Pa·s/m).
    pub fn characteristic_impedance(&self) -> f64 {
        self.density * self.speed_of_sound
    }

    /// Wavenumber k = ω/c at `frequency` Hz.
    pub fn wavenumber(&self, frequency: f64) -> f64 {
        2.0 * PI * frequency / self.speed_of_sound
    }
}

/// Cross-sectional area from diameter (both in metres).
pub fn area_from_diameter(diameter: f64) -> f64 {
    PI * (diameter / 2.0).powi(2)
}

/// Radius of the circle with the given area.
pub fn radius_from_area(area: f64) -> f64 {
    (area / PI).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_of_sound_at_20c() {
        let medium = MediumProperties::from_temperature(20.0).unwrap();
        assert!(
            (medium.speed_of_sound - 343.2).abs() < 0.5,
            "c = {}",
            medium.speed_of_sound
        );
        assert!((medium.density - 1.204).abs() < 0.01, "rho = {}", medium.density);
    }

    #[test]
    fn test_default_characteristic_impedance() {
        let medium = MediumProperties::default();
        let z0 = medium.characteristic_impedance();
        assert!((z0 - 413.315).abs() < 1e-9, "rho*c = {z0}");
    }

    #[test]
    fn test_rejects_non_physical_medium() {
        assert!(MediumProperties::new(0.0, 1.2).is_err());
        assert!(MediumProperties::new(343.0, -1.0).is_err());
        assert!(MediumProperties::from_temperature(-300.0).is_err());
    }

    #[test]
    fn test_validate_catches_hand_built_medium() {
        assert!(MediumProperties::default().validate().is_ok());
        let silent = MediumProperties {
            speed_of_sound: 0.0,
            density: 1.2,
        };
        assert!(matches!(silent.validate(), Err(HornError::InvalidMedium(_))));
        let negative = MediumProperties {
            speed_of_sound: 343.0,
            density: -1.0,
        };
        assert!(matches!(negative.validate(), Err(HornError::InvalidMedium(_))));
        let nan = MediumProperties {
            speed_of_sound: f64::NAN,
            density: 1.2,
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_radius_area_round_trip() {
        let area = area_from_diameter(0.1);
        assert!((radius_from_area(area) - 0.05).abs() < 1e-15);
    }
}
