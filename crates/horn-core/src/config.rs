use crate::chamber::ChamberVolumes;
use crate::constants::MediumProperties;
use crate::driver::ThieleSmallParameters;
use crate::error::HornError;
use crate::frequency_response::log_frequencies;
use crate::profiles::{
    ConicalHorn, ExponentialHorn, HornGeometry, HornSegment, HyperbolicHorn, MultiSegmentHorn,
};
use crate::Environment;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] HornError),
}

/// Air properties, given directly or derived from temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediumSpec {
    Properties(MediumProperties),
    Temperature { temperature_c: f64 },
}

impl Default for MediumSpec {
    fn default() -> Self {
        MediumSpec::Properties(MediumProperties::default())
    }
}

/// One segment of a multi-segment horn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    pub throat_area: f64,
    pub mouth_area: f64,
    pub length: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<f64>,
}

/// Horn description; areas in m², lengths in m.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "profile", rename_all = "snake_case")]
pub enum HornSpec {
    Exponential {
        throat_area: f64,
        mouth_area: f64,
        length: f64,
    },
    Conical {
        throat_area: f64,
        mouth_area: f64,
        length: f64,
    },
    Hyperbolic {
        throat_area: f64,
        mouth_area: f64,
        length: f64,
        shape: f64,
    },
    MultiSegment {
        segments: Vec<SegmentSpec>,
    },
}

impl HornSpec {
    /// Validate and build the horn.
    pub fn build(&self) -> Result<HornGeometry, HornError> {
        Ok(match *self {
            HornSpec::Exponential {
                throat_area,
                mouth_area,
                length,
            } => ExponentialHorn::new(throat_area, mouth_area, length)?.into(),
            HornSpec::Conical {
                throat_area,
                mouth_area,
                length,
            } => ConicalHorn::new(throat_area, mouth_area, length)?.into(),
            HornSpec::Hyperbolic {
                throat_area,
                mouth_area,
                length,
                shape,
            } => HyperbolicHorn::new(throat_area, mouth_area, length, shape)?.into(),
            HornSpec::MultiSegment { ref segments } => {
                let segments = segments
                    .iter()
                    .map(|s| match s.shape {
                        Some(t) => HornSegment::with_shape(s.throat_area, s.mouth_area, s.length, t),
                        None => HornSegment::new(s.throat_area, s.mouth_area, s.length),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                MultiSegmentHorn::new(segments)?.into()
            }
        })
    }
}

/// Logarithmic frequency sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default = "default_start")]
    pub start: f64,
    #[serde(default = "default_stop")]
    pub stop: f64,
    #[serde(default = "default_points")]
    pub points: usize,
}

fn default_start() -> f64 {
    20.0
}
fn default_stop() -> f64 {
    20_000.0
}
fn default_points() -> usize {
    200
}
fn default_voltage() -> f64 {
    2.83
}
fn default_distance() -> f64 {
    1.0
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            stop: default_stop(),
            points: default_points(),
        }
    }
}

impl SweepConfig {
    pub fn frequencies(&self) -> Result<Vec<f64>, HornError> {
        log_frequencies(self.start, self.stop, self.points)
    }
}

/// Root configuration structure. Everything except `driver` and `horn`
/// has a default.
///
/// ```json
/// {
///   "medium": { "temperature_c": 20.0 },
///   "driver": { "re": 6.0, "le": 0.0005, "bl": 10.0, "rms": 1.0,
///               "mms": 0.02, "cms": 0.0003, "sd": 0.0008, "xmax": 0.003 },
///   "horn": { "profile": "exponential",
///             "throat_area": 0.0005, "mouth_area": 0.05, "length": 0.5 },
///   "chambers": { "throat_chamber": 0.000002 },
///   "voltage": 2.83,
///   "environment": "half_space",
///   "sweep": { "start": 20.0, "stop": 20000.0, "points": 200 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub medium: MediumSpec,
    pub driver: ThieleSmallParameters,
    pub horn: HornSpec,
    #[serde(default)]
    pub chambers: ChamberVolumes,
    /// Drive voltage (V RMS-equivalent amplitude).
    #[serde(default = "default_voltage")]
    pub voltage: f64,
    /// Listening distance from the mouth (m).
    #[serde(default = "default_distance")]
    pub distance: f64,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub sweep: SweepConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            medium: MediumSpec::default(),
            driver: ThieleSmallParameters {
                re: 6.0,
                le: 0.5e-3,
                bl: 10.0,
                rms: 1.0,
                mms: 0.02,
                cms: 3e-4,
                sd: 0.0008,
                xmax: 3e-3,
            },
            horn: HornSpec::Exponential {
                throat_area: 5e-4,
                mouth_area: 0.05,
                length: 0.5,
            },
            chambers: ChamberVolumes::default(),
            voltage: default_voltage(),
            distance: default_distance(),
            environment: Environment::HalfSpace,
            sweep: SweepConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn medium(&self) -> Result<MediumProperties, HornError> {
        match self.medium {
            MediumSpec::Properties(p) => MediumProperties::new(p.speed_of_sound, p.density),
            MediumSpec::Temperature { temperature_c } => {
                MediumProperties::from_temperature(temperature_c)
            }
        }
    }

    pub fn horn(&self) -> Result<HornGeometry, HornError> {
        self.horn.build()
    }
}
