use crate::constants::MediumProperties;
use crate::error::{require_positive, HornError};
use crate::transfer_matrix::TransferMatrix;
use crate::HornProfile;
use num_complex::Complex64;
use std::f64::consts::PI;

/// Below this |γL| the exponential matrix uses its analytic limits at cutoff.
pub const CUTOFF_THRESHOLD: f64 = 1e-6;

/// Validated geometry shared by every profile: throat area, mouth area and
/// length, plus the hyperbolic shape parameter T when one applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HornSegment {
    throat_area: f64,
    mouth_area: f64,
    length: f64,
    shape: Option<f64>,
}

impl HornSegment {
    /// A flaring (or straight) segment. Mouth area may not be smaller than
    /// throat area.
    pub fn new(throat_area: f64, mouth_area: f64, length: f64) -> Result<Self, HornError> {
        require_positive("throat area", throat_area, HornError::InvalidGeometry)?;
        require_positive("mouth area", mouth_area, HornError::InvalidGeometry)?;
        require_positive("length", length, HornError::InvalidGeometry)?;
        if mouth_area < throat_area {
            return Err(HornError::InvalidGeometry(format!(
                "mouth area {mouth_area} m² is smaller than throat area {throat_area} m²"
            )));
        }
        Ok(Self {
            throat_area,
            mouth_area,
            length,
            shape: None,
        })
    }

    /// A segment carrying a hyperbolic shape parameter T ∈ (0, 1].
    pub fn with_shape(
        throat_area: f64,
        mouth_area: f64,
        length: f64,
        shape: f64,
    ) -> Result<Self, HornError> {
        if !(shape > 0.0 && shape <= 1.0) {
            return Err(HornError::InvalidGeometry(format!(
                "hyperbolic shape parameter T must lie in (0, 1], got {shape}"
            )));
        }
        let mut segment = Self::new(throat_area, mouth_area, length)?;
        segment.shape = Some(shape);
        Ok(segment)
    }

    pub fn throat_area(&self) -> f64 {
        self.throat_area
    }

    pub fn mouth_area(&self) -> f64 {
        self.mouth_area
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn shape(&self) -> Option<f64> {
        self.shape
    }

    /// Exponential flare constant m for S(x) = S₁·e^(2mx).
    pub fn exponential_flare(&self) -> f64 {
        (self.mouth_area / self.throat_area).ln() / (2.0 * self.length)
    }

    /// Area at `x` metres from the throat. Uses the hyperbolic law when a
    /// shape parameter is present, the exponential law otherwise.
    pub fn area_at(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, self.length);
        match self.shape {
            Some(t) => {
                let m = hyperbolic_flare(self.throat_area, self.mouth_area, self.length, t);
                self.throat_area * ((m * x).cosh() + t * (m * x).sinh()).powi(2)
            }
            None => self.throat_area * (2.0 * self.exponential_flare() * x).exp(),
        }
    }

    /// Transfer matrix of this segment treated as an exponential sub-horn.
    pub fn transfer_matrix(&self, frequency: f64, medium: &MediumProperties) -> TransferMatrix {
        exponential_matrix(
            self.throat_area,
            self.mouth_area,
            self.length,
            self.exponential_flare(),
            medium.wavenumber(frequency),
            medium.characteristic_impedance(),
        )
    }
}

/// Lossless exponential horn transfer matrix.
///
/// ```text
/// a = e^{mL}[cos(γL) − (m/γ)sin(γL)]
/// b = e^{mL}·j·(Z₀/S₂)·(k/γ)sin(γL)
/// c = e^{mL}·j·(S₁/Z₀)·(k/γ)sin(γL)
/// d = e^{mL}(S₁/S₂)[cos(γL) + (m/γ)sin(γL)]
/// ```
///
/// with γ = √(k² − m²), imaginary below cutoff. At |γL| < [`CUTOFF_THRESHOLD`]
/// sin(γL)/γ is replaced by L and cos(γL) by 1.
fn exponential_matrix(
    throat_area: f64,
    mouth_area: f64,
    length: f64,
    flare: f64,
    k: f64,
    z0: f64,
) -> TransferMatrix {
    let gamma = Complex64::new(k * k - flare * flare, 0.0).sqrt();
    let gamma_l = gamma * length;

    let (cos_gl, sin_over_gamma) = if gamma_l.norm() < CUTOFF_THRESHOLD {
        (Complex64::new(1.0, 0.0), Complex64::new(length, 0.0))
    } else {
        (gamma_l.cos(), gamma_l.sin() / gamma)
    };

    // (m/γ)·sin(γL) and (k/γ)·sin(γL)
    let m_term = sin_over_gamma * flare;
    let k_term = sin_over_gamma * k;

    let growth = (flare * length).exp();
    let j = Complex64::new(0.0, 1.0);

    TransferMatrix::new(
        growth * (cos_gl - m_term),
        growth * j * (z0 / mouth_area) * k_term,
        growth * j * (throat_area / z0) * k_term,
        growth * (throat_area / mouth_area) * (cos_gl + m_term),
    )
}

/// Solve cosh(mL) + T·sinh(mL) = √(S₂/S₁) for m.
fn hyperbolic_flare(throat_area: f64, mouth_area: f64, length: f64, shape: f64) -> f64 {
    let r = (mouth_area / throat_area).sqrt();
    // With y = e^{mL}: (1+T)y² − 2ry + (1−T) = 0, larger root.
    let y = (r + (r * r - (1.0 - shape * shape)).sqrt()) / (1.0 + shape);
    y.ln() / length
}

/// An exponential horn, S(x) = S₁·e^(2mx).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialHorn {
    segment: HornSegment,
    flare: f64,
}

impl ExponentialHorn {
    pub fn new(throat_area: f64, mouth_area: f64, length: f64) -> Result<Self, HornError> {
        let segment = HornSegment::new(throat_area, mouth_area, length)?;
        let flare = segment.exponential_flare();
        log::debug!("exponential horn: flare constant m = {flare:.4} 1/m");
        Ok(Self { segment, flare })
    }

    /// Flare constant m (1/m).
    pub fn flare_constant(&self) -> f64 {
        self.flare
    }

    /// f_c = m·c / 2π
    pub fn cutoff_frequency(&self, medium: &MediumProperties) -> f64 {
        self.flare * medium.speed_of_sound / (2.0 * PI)
    }

    /// Throat impedance of the infinitely long horn with the same flare.
    ///
    /// Purely reactive below cutoff; tends to ρc/S₁ far above it.
    pub fn infinite_throat_impedance(&self, frequency: f64, medium: &MediumProperties) -> Complex64 {
        let k = medium.wavenumber(frequency);
        let ratio = self.flare / k;
        let z_throat = medium.characteristic_impedance() / self.segment.throat_area;
        if ratio <= 1.0 {
            z_throat * Complex64::new((1.0 - ratio * ratio).sqrt(), ratio)
        } else {
            z_throat * Complex64::new(0.0, ratio - (ratio * ratio - 1.0).sqrt())
        }
    }
}

impl HornProfile for ExponentialHorn {
    fn throat_area(&self) -> f64 {
        self.segment.throat_area
    }

    fn mouth_area(&self) -> f64 {
        self.segment.mouth_area
    }

    fn length(&self) -> f64 {
        self.segment.length
    }

    fn area_at(&self, x: f64) -> f64 {
        self.segment.area_at(x)
    }

    fn transfer_matrix(&self, frequency: f64, medium: &MediumProperties) -> TransferMatrix {
        self.segment.transfer_matrix(frequency, medium)
    }
}

/// A conical horn. Spherical waves from an apex `x₀` behind the throat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConicalHorn {
    segment: HornSegment,
    apex_distance: f64,
}

impl ConicalHorn {
    pub fn new(throat_area: f64, mouth_area: f64, length: f64) -> Result<Self, HornError> {
        let segment = HornSegment::new(throat_area, mouth_area, length)?;
        if mouth_area <= throat_area {
            return Err(HornError::InvalidGeometry(format!(
                "conical horn needs mouth area > throat area, got {mouth_area} m² ≤ {throat_area} m²"
            )));
        }
        let r_throat = (throat_area / PI).sqrt();
        let r_mouth = (mouth_area / PI).sqrt();
        let apex_distance = length * r_throat / (r_mouth - r_throat);
        log::debug!("conical horn: apex {apex_distance:.4} m behind throat");
        Ok(Self {
            segment,
            apex_distance,
        })
    }

    /// Distance x₀ from the projected apex to the throat (m).
    pub fn apex_distance(&self) -> f64 {
        self.apex_distance
    }

    /// Z = (ρc/S₁)·jkx₀ / (1 + jkx₀)
    pub fn infinite_throat_impedance(&self, frequency: f64, medium: &MediumProperties) -> Complex64 {
        let jkx0 = Complex64::new(0.0, medium.wavenumber(frequency) * self.apex_distance);
        medium.characteristic_impedance() / self.segment.throat_area * jkx0 / (1.0 + jkx0)
    }
}

impl HornProfile for ConicalHorn {
    fn throat_area(&self) -> f64 {
        self.segment.throat_area
    }

    fn mouth_area(&self) -> f64 {
        self.segment.mouth_area
    }

    fn length(&self) -> f64 {
        self.segment.length
    }

    fn area_at(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, self.segment.length);
        self.segment.throat_area * (1.0 + x / self.apex_distance).powi(2)
    }

    fn transfer_matrix(&self, frequency: f64, medium: &MediumProperties) -> TransferMatrix {
        let k = medium.wavenumber(frequency);
        let z0 = medium.characteristic_impedance();
        let length = self.segment.length;
        let x1 = self.apex_distance;
        let x2 = x1 + length;
        let s1 = self.segment.throat_area;
        let s2 = self.segment.mouth_area;

        let (sin_kl, cos_kl) = (k * length).sin_cos();
        let j = Complex64::new(0.0, 1.0);

        let a = (x2 / x1) * cos_kl - sin_kl / (k * x1);
        let b = j * (z0 / s2) * (x2 / x1) * sin_kl;
        let c = j
            * (s1 / z0)
            * ((x2 / x1 + 1.0 / (k * k * x1 * x1)) * sin_kl - length / (k * x1 * x1) * cos_kl);
        let d = (x1 / x2) * (cos_kl + sin_kl / (k * x1));

        TransferMatrix::new(Complex64::new(a, 0.0), b, c, Complex64::new(d, 0.0))
    }
}

/// A hyperbolic-exponential (hypex) horn, S(x) = S₁·[cosh(mx) + T·sinh(mx)]².
///
/// T = 1 is the exponential horn; smaller T loads the throat harder near
/// cutoff. The finite-length transfer matrix is the exponential one for
/// the same throat, mouth and length: a known approximation, not the exact
/// hypex solution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HyperbolicHorn {
    segment: HornSegment,
    flare: f64,
}

impl HyperbolicHorn {
    pub fn new(
        throat_area: f64,
        mouth_area: f64,
        length: f64,
        shape: f64,
    ) -> Result<Self, HornError> {
        let segment = HornSegment::with_shape(throat_area, mouth_area, length, shape)?;
        let flare = hyperbolic_flare(throat_area, mouth_area, length, shape);
        log::debug!("hyperbolic horn: T = {shape}, m = {flare:.4} 1/m");
        Ok(Self { segment, flare })
    }

    pub fn shape(&self) -> f64 {
        self.segment.shape.unwrap_or(1.0)
    }

    pub fn flare_constant(&self) -> f64 {
        self.flare
    }

    pub fn cutoff_frequency(&self, medium: &MediumProperties) -> f64 {
        self.flare * medium.speed_of_sound / (2.0 * PI)
    }
}

impl HornProfile for HyperbolicHorn {
    fn throat_area(&self) -> f64 {
        self.segment.throat_area
    }

    fn mouth_area(&self) -> f64 {
        self.segment.mouth_area
    }

    fn length(&self) -> f64 {
        self.segment.length
    }

    fn area_at(&self, x: f64) -> f64 {
        self.segment.area_at(x)
    }

    fn transfer_matrix(&self, frequency: f64, medium: &MediumProperties) -> TransferMatrix {
        self.segment.transfer_matrix(frequency, medium)
    }
}

/// An ordered, non-empty chain of segments, throat first.
///
/// Each segment is an exponential sub-horn. Contiguity of adjacent areas
/// is the caller's responsibility.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSegmentHorn {
    segments: Vec<HornSegment>,
}

impl MultiSegmentHorn {
    pub fn new(segments: Vec<HornSegment>) -> Result<Self, HornError> {
        if segments.is_empty() {
            return Err(HornError::EmptyHorn);
        }
        for pair in segments.windows(2) {
            let (mouth, throat) = (pair[0].mouth_area, pair[1].throat_area);
            if (mouth - throat).abs() > 1e-6 * mouth.max(throat) {
                log::warn!(
                    "segment junction is not contiguous: {mouth} m² meets {throat} m²"
                );
            }
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[HornSegment] {
        &self.segments
    }
}

impl HornProfile for MultiSegmentHorn {
    fn throat_area(&self) -> f64 {
        self.segments[0].throat_area
    }

    fn mouth_area(&self) -> f64 {
        self.segments[self.segments.len() - 1].mouth_area
    }

    fn length(&self) -> f64 {
        self.segments.iter().map(|s| s.length).sum()
    }

    fn area_at(&self, x: f64) -> f64 {
        let mut start = 0.0;
        for segment in &self.segments {
            if x <= start + segment.length {
                return segment.area_at(x - start);
            }
            start += segment.length;
        }
        self.mouth_area()
    }

    /// Whole-horn matrix: T₁·T₂·…·T_N with T₁ at the throat.
    fn transfer_matrix(&self, frequency: f64, medium: &MediumProperties) -> TransferMatrix {
        self.segments
            .iter()
            .fold(TransferMatrix::identity(), |total, segment| {
                total.chain(&segment.transfer_matrix(frequency, medium))
            })
    }

    /// Folds the mouth load back through each segment, mouth first.
    fn throat_impedance_for(
        &self,
        frequency: f64,
        z_mouth: Complex64,
        medium: &MediumProperties,
    ) -> Complex64 {
        self.segments.iter().rev().fold(z_mouth, |z, segment| {
            segment.transfer_matrix(frequency, medium).throat_impedance(z)
        })
    }
}

/// A horn of any supported profile.
#[derive(Debug, Clone, PartialEq)]
pub enum HornGeometry {
    Exponential(ExponentialHorn),
    Conical(ConicalHorn),
    Hyperbolic(HyperbolicHorn),
    MultiSegment(MultiSegmentHorn),
}

impl HornGeometry {
    fn profile(&self) -> &dyn HornProfile {
        match self {
            HornGeometry::Exponential(h) => h,
            HornGeometry::Conical(h) => h,
            HornGeometry::Hyperbolic(h) => h,
            HornGeometry::MultiSegment(h) => h,
        }
    }

    /// Cutoff frequency of the throat flare, if the profile has one.
    ///
    /// Conical horns have no sharp cutoff. Multi-segment horns report the
    /// first segment's.
    pub fn cutoff_frequency(&self, medium: &MediumProperties) -> Option<f64> {
        match self {
            HornGeometry::Exponential(h) => Some(h.cutoff_frequency(medium)),
            HornGeometry::Hyperbolic(h) => Some(h.cutoff_frequency(medium)),
            HornGeometry::Conical(_) => None,
            HornGeometry::MultiSegment(h) => Some(
                h.segments[0].exponential_flare() * medium.speed_of_sound / (2.0 * PI),
            ),
        }
    }
}

impl HornProfile for HornGeometry {
    fn throat_area(&self) -> f64 {
        self.profile().throat_area()
    }

    fn mouth_area(&self) -> f64 {
        self.profile().mouth_area()
    }

    fn length(&self) -> f64 {
        self.profile().length()
    }

    fn area_at(&self, x: f64) -> f64 {
        self.profile().area_at(x)
    }

    fn transfer_matrix(&self, frequency: f64, medium: &MediumProperties) -> TransferMatrix {
        self.profile().transfer_matrix(frequency, medium)
    }

    fn throat_impedance_for(
        &self,
        frequency: f64,
        z_mouth: Complex64,
        medium: &MediumProperties,
    ) -> Complex64 {
        self.profile().throat_impedance_for(frequency, z_mouth, medium)
    }
}

impl From<ExponentialHorn> for HornGeometry {
    fn from(h: ExponentialHorn) -> Self {
        HornGeometry::Exponential(h)
    }
}

impl From<ConicalHorn> for HornGeometry {
    fn from(h: ConicalHorn) -> Self {
        HornGeometry::Conical(h)
    }
}

impl From<HyperbolicHorn> for HornGeometry {
    fn from(h: HyperbolicHorn) -> Self {
        HornGeometry::Hyperbolic(h)
    }
}

impl From<MultiSegmentHorn> for HornGeometry {
    fn from(h: MultiSegmentHorn) -> Self {
        HornGeometry::MultiSegment(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radiation::piston_radiation_impedance;

    const THROAT: f64 = 5e-4;
    const MOUTH: f64 = 0.05;
    const LENGTH: f64 = 0.5;

    fn assert_unit_determinant(m: &TransferMatrix, label: &str) {
        let det = m.determinant();
        assert!(
            (det - Complex64::new(1.0, 0.0)).norm() < 1e-9,
            "{label}: det = {det}"
        );
    }

    #[test]
    fn test_rejects_invalid_geometry() {
        assert!(ExponentialHorn::new(0.0, MOUTH, LENGTH).is_err());
        assert!(ExponentialHorn::new(THROAT, MOUTH, -1.0).is_err());
        assert!(ExponentialHorn::new(MOUTH, THROAT, LENGTH).is_err());
        assert!(ConicalHorn::new(THROAT, THROAT, LENGTH).is_err());
        assert!(HyperbolicHorn::new(THROAT, MOUTH, LENGTH, 0.0).is_err());
        assert!(HyperbolicHorn::new(THROAT, MOUTH, LENGTH, 1.5).is_err());
        assert_eq!(MultiSegmentHorn::new(vec![]), Err(HornError::EmptyHorn));
    }

    #[test]
    fn test_area_laws_hit_both_ends() {
        let horns: [Box<dyn HornProfile>; 3] = [
            Box::new(ExponentialHorn::new(THROAT, MOUTH, LENGTH).unwrap()),
            Box::new(ConicalHorn::new(THROAT, MOUTH, LENGTH).unwrap()),
            Box::new(HyperbolicHorn::new(THROAT, MOUTH, LENGTH, 0.6).unwrap()),
        ];
        for horn in &horns {
            assert!((horn.area_at(0.0) - THROAT).abs() < 1e-12);
            assert!(
                (horn.area_at(LENGTH) - MOUTH).abs() < 1e-9,
                "mouth area {}",
                horn.area_at(LENGTH)
            );
            assert!(horn.area_at(LENGTH / 2.0) > THROAT);
        }
    }

    #[test]
    fn test_exponential_area_is_geometric_mean_at_midpoint() {
        let horn = ExponentialHorn::new(THROAT, MOUTH, LENGTH).unwrap();
        let expected = (THROAT * MOUTH).sqrt();
        assert!((horn.area_at(LENGTH / 2.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_hyperbolic_with_unit_shape_matches_exponential() {
        let hyp = HyperbolicHorn::new(THROAT, MOUTH, LENGTH, 1.0).unwrap();
        let exp = ExponentialHorn::new(THROAT, MOUTH, LENGTH).unwrap();
        assert!((hyp.flare_constant() - exp.flare_constant()).abs() < 1e-12);
        for i in 0..=10 {
            let x = LENGTH * i as f64 / 10.0;
            assert!((hyp.area_at(x) - exp.area_at(x)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_lower_shape_narrows_throat_region() {
        let hyp = HyperbolicHorn::new(THROAT, MOUTH, LENGTH, 0.3).unwrap();
        let exp = ExponentialHorn::new(THROAT, MOUTH, LENGTH).unwrap();
        assert!(hyp.area_at(0.1) < exp.area_at(0.1));
        assert!(hyp.flare_constant() > exp.flare_constant());
    }

    #[test]
    fn test_determinant_is_unity() {
        let medium = MediumProperties::default();
        let exp = ExponentialHorn::new(THROAT, MOUTH, LENGTH).unwrap();
        let con = ConicalHorn::new(THROAT, MOUTH, LENGTH).unwrap();
        let hyp = HyperbolicHorn::new(THROAT, MOUTH, LENGTH, 0.5).unwrap();
        for f in [400.0, 800.0, 2000.0, 7000.0, 15000.0] {
            assert_unit_determinant(&exp.transfer_matrix(f, &medium), "exponential");
            assert_unit_determinant(&con.transfer_matrix(f, &medium), "conical");
            assert_unit_determinant(&hyp.transfer_matrix(f, &medium), "hyperbolic");
        }
    }

    #[test]
    fn test_cutoff_limit_branch_is_continuous() {
        let medium = MediumProperties::default();
        let z0 = medium.characteristic_impedance();
        let horn = ExponentialHorn::new(THROAT, MOUTH, LENGTH).unwrap();
        let m = horn.flare_constant();

        let at_cutoff = exponential_matrix(THROAT, MOUTH, LENGTH, m, m, z0);
        for k in [m * (1.0 + 1e-10), m * (1.0 - 1e-10)] {
            let near = exponential_matrix(THROAT, MOUTH, LENGTH, m, k, z0);
            for (lim, gen, name) in [
                (at_cutoff.a, near.a, "a"),
                (at_cutoff.b, near.b, "b"),
                (at_cutoff.c, near.c, "c"),
                (at_cutoff.d, near.d, "d"),
            ] {
                assert!(
                    (lim - gen).norm() < 1e-7 * lim.norm(),
                    "{name}: limit {lim} vs general {gen} at k = {k}"
                );
            }
        }
        assert_unit_determinant(&at_cutoff, "exponential at cutoff");
    }

    #[test]
    fn test_exponential_matrix_finite_below_cutoff() {
        let medium = MediumProperties::default();
        let horn = ExponentialHorn::new(THROAT, MOUTH, LENGTH).unwrap();
        let fc = horn.cutoff_frequency(&medium);
        let m = horn.transfer_matrix(fc * 0.2, &medium);
        for v in [m.a, m.b, m.c, m.d] {
            assert!(v.re.is_finite() && v.im.is_finite());
        }
        assert_unit_determinant(&m, "below cutoff");
    }

    #[test]
    fn test_infinite_exponential_horn_impedance() {
        let medium = MediumProperties::default();
        let horn = ExponentialHorn::new(THROAT, MOUTH, LENGTH).unwrap();
        let fc = horn.cutoff_frequency(&medium);
        let z_char = medium.characteristic_impedance() / THROAT;

        let below = horn.infinite_throat_impedance(fc * 0.5, &medium);
        assert_eq!(below.re, 0.0);
        assert!(below.im > 0.0);

        let far_above = horn.infinite_throat_impedance(fc * 100.0, &medium);
        assert!((far_above.re / z_char - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_conical_resistance_rises_smoothly_from_zero() {
        let medium = MediumProperties::default();
        let con = ConicalHorn::new(THROAT, MOUTH, LENGTH).unwrap();
        let exp = ExponentialHorn::new(THROAT, MOUTH, LENGTH).unwrap();
        let fc = exp.cutoff_frequency(&medium);

        // Infinite-horn forms: conical resistance is already non-zero
        // where the exponential horn is purely reactive.
        let r_con = con.infinite_throat_impedance(fc * 0.5, &medium).re;
        let r_exp = exp.infinite_throat_impedance(fc * 0.5, &medium).re;
        assert!(r_con > 0.0 && r_exp == 0.0);

        let mut previous = 0.0;
        for i in 1..=100 {
            let f = i as f64 * 2.0;
            let r = con.infinite_throat_impedance(f, &medium).re;
            assert!(r > previous, "resistance not rising at {f} Hz");
            previous = r;
        }
    }

    #[test]
    fn test_finite_conical_resistance_has_no_jump_at_low_frequency() {
        let medium = MediumProperties::default();
        let con = ConicalHorn::new(THROAT, MOUTH, LENGTH).unwrap();
        let mut previous = 0.0;
        for i in 1..=60 {
            let f = i as f64;
            let z_mouth = piston_radiation_impedance(f, MOUTH, &medium, 2.0 * PI);
            let r = con.throat_impedance_for(f, z_mouth, &medium).re;
            assert!(r > previous, "resistance {r} at {f} Hz not above {previous}");
            previous = r;
        }
    }

    #[test]
    fn test_multi_segment_matrix_matches_fold_back() {
        let medium = MediumProperties::default();
        let horn = MultiSegmentHorn::new(vec![
            HornSegment::new(THROAT, 0.004, 0.2).unwrap(),
            HornSegment::new(0.004, 0.02, 0.25).unwrap(),
            HornSegment::new(0.02, MOUTH, 0.3).unwrap(),
        ])
        .unwrap();
        assert!((horn.length() - 0.75).abs() < 1e-12);
        assert!((horn.area_at(0.2) - 0.004).abs() < 1e-12);

        for f in [60.0, 300.0, 1200.0, 5000.0] {
            let z_mouth = piston_radiation_impedance(f, MOUTH, &medium, 2.0 * PI);
            let folded = horn.throat_impedance_for(f, z_mouth, &medium);
            let chained = horn.transfer_matrix(f, &medium).throat_impedance(z_mouth);
            assert!(
                (folded - chained).norm() < 1e-6 * folded.norm(),
                "{f} Hz: folded {folded} vs chained {chained}"
            );
        }
    }
}
