use crate::constants::{radius_from_area, MediumProperties};
use crate::error::{require_positive, HornError};
use crate::frequency_response::validate_frequencies;
use num_complex::Complex64;
use rayon::prelude::*;
use std::f64::consts::PI;

/// Below this ka the Bessel/Struve ratios are replaced by their Taylor limits.
pub const SMALL_KA: f64 = 1e-6;

/// Arguments above this use asymptotic expansions instead of power series.
const ASYMPTOTIC_ARGUMENT: f64 = 16.0;

const MAX_TERMS: usize = 200;

/// Area of the equivalent half-space piston for an opening radiating into
/// `solid_angle` steradians.
pub fn effective_area(area: f64, solid_angle: f64) -> f64 {
    2.0 * PI * area / solid_angle
}

/// Normalised piston resistance and reactance (R₁, X₁) at `ka`.
pub fn piston_functions(ka: f64) -> (f64, f64) {
    if ka < SMALL_KA {
        return (ka * ka / 2.0, 8.0 * ka / (3.0 * PI));
    }
    let two_ka = 2.0 * ka;
    let r1 = if two_ka <= ASYMPTOTIC_ARGUMENT {
        piston_resistance_series(ka)
    } else {
        1.0 - bessel_j1(two_ka) / ka
    };
    (r1, struve_h1(two_ka) / ka)
}

/// R₁(x) = Σ_{k≥1} (−1)^(k+1) x^(2k) / (k!(k+1)!)
///
/// Same series as 1 − J₁(2x)/x with the leading unity cancelled
/// analytically, so small ka keeps full relative precision.
fn piston_resistance_series(x: f64) -> f64 {
    let x_sq = x * x;
    let mut term = x_sq / 2.0;
    let mut sum = term;
    for k in 1..MAX_TERMS {
        let kf = k as f64;
        term *= -x_sq / ((kf + 1.0) * (kf + 2.0));
        sum += term;
        if term.abs() < 1e-17 * sum.abs().max(1e-300) {
            break;
        }
    }
    sum
}

/// Radiation impedance (acoustic, Pa·s/m³) of a circular opening at a
/// single frequency, modelled as a piston in an infinite baffle.
///
/// ```text
/// R₁(ka) = 1 − J₁(2ka)/ka
/// X₁(ka) = H₁(2ka)/ka
/// Z      = (ρc/S_eff)·(R₁ + jX₁)
/// ```
///
/// `a` is the radius of the piston of area S_eff = 2π·S/Ω; half space is
/// the unadjusted case.
pub fn piston_radiation_impedance(
    frequency: f64,
    area: f64,
    medium: &MediumProperties,
    solid_angle: f64,
) -> Complex64 {
    let s_eff = effective_area(area, solid_angle);
    let a = radius_from_area(s_eff);
    let ka = medium.wavenumber(frequency) * a;
    let (r1, x1) = piston_functions(ka);
    let z0 = medium.characteristic_impedance() / s_eff;
    Complex64::new(z0 * r1, z0 * x1)
}

/// Radiation impedance for every frequency in `frequencies`.
pub fn radiation_impedance(
    frequencies: &[f64],
    area: f64,
    medium: &MediumProperties,
    solid_angle: f64,
) -> Result<Vec<Complex64>, HornError> {
    validate_frequencies(frequencies)?;
    medium.validate()?;
    require_positive("radiating area", area, HornError::InvalidGeometry)?;
    require_positive("solid angle", solid_angle, HornError::InvalidOperatingPoint)?;
    Ok(frequencies
        .par_iter()
        .map(|&f| piston_radiation_impedance(f, area, medium, solid_angle))
        .collect())
}

/// Bessel function of the first kind, order one.
pub fn bessel_j1(x: f64) -> f64 {
    if x < 0.0 {
        return -bessel_j1(-x);
    }
    if x <= ASYMPTOTIC_ARGUMENT {
        j1_series(x)
    } else {
        let (p, q) = hankel_pq(x, 4.0);
        let chi = x - 0.75 * PI;
        (2.0 / (PI * x)).sqrt() * (p * chi.cos() - q * chi.sin())
    }
}

/// Bessel function of the second kind, order one, for large positive `x`.
fn bessel_y1_asymptotic(x: f64) -> f64 {
    let (p, q) = hankel_pq(x, 4.0);
    let chi = x - 0.75 * PI;
    (2.0 / (PI * x)).sqrt() * (p * chi.sin() + q * chi.cos())
}

/// Struve function of order one.
pub fn struve_h1(x: f64) -> f64 {
    // H₁ is even.
    let x = x.abs();
    if x <= ASYMPTOTIC_ARGUMENT {
        h1_series(x)
    } else {
        h1_asymptotic(x)
    }
}

/// J₁(x) = Σ (−1)ᵏ (x/2)^(2k+1) / (k!(k+1)!)
fn j1_series(x: f64) -> f64 {
    let half_sq = (x / 2.0).powi(2);
    let mut term = x / 2.0;
    let mut sum = term;
    for k in 0..MAX_TERMS {
        let kf = k as f64;
        term *= -half_sq / ((kf + 1.0) * (kf + 2.0));
        sum += term;
        if term.abs() < 1e-17 * sum.abs().max(1e-300) {
            break;
        }
    }
    sum
}

/// H₁(x) = Σ (−1)ᵏ (x/2)^(2k+2) / (Γ(k+3/2)·Γ(k+5/2))
fn h1_series(x: f64) -> f64 {
    let half_sq = (x / 2.0).powi(2);
    // Γ(3/2)·Γ(5/2) = 3π/8
    let mut term = half_sq / (3.0 * PI / 8.0);
    let mut sum = term;
    for k in 0..MAX_TERMS {
        let kf = k as f64;
        term *= -half_sq / ((kf + 1.5) * (kf + 2.5));
        sum += term;
        if term.abs() < 1e-17 * sum.abs().max(1e-300) {
            break;
        }
    }
    sum
}

/// H₁(x) ≈ Y₁(x) + (1/π) Σ Γ(k+½)(x/2)^(−2k) / Γ(3/2−k)
fn h1_asymptotic(x: f64) -> f64 {
    let inv_half_sq = 4.0 / (x * x);
    let mut term = 2.0;
    let mut sum = term;
    for k in 0..MAX_TERMS {
        let kf = k as f64;
        let next = term * (kf + 0.5) * (0.5 - kf) * inv_half_sq;
        if next.abs() >= term.abs() || next.abs() < 1e-17 {
            break;
        }
        term = next;
        sum += term;
    }
    bessel_y1_asymptotic(x) + sum / PI
}

/// Hankel asymptotic series P(x), Q(x) for order ν with μ = 4ν².
/// Truncated at the smallest term.
fn hankel_pq(x: f64, mu: f64) -> (f64, f64) {
    let eight_x = 8.0 * x;
    let mut p = 1.0;
    let mut q = 0.0;
    let mut term: f64 = 1.0;
    for k in 1..MAX_TERMS {
        let odd = (2 * k - 1) as f64;
        let next = term * (mu - odd * odd) / (k as f64 * eight_x);
        if next.abs() >= term.abs() || next == 0.0 {
            break;
        }
        term = next;
        match k % 4 {
            1 => q += term,
            2 => p -= term,
            3 => q -= term,
            _ => p += term,
        }
        if term.abs() < 1e-17 {
            break;
        }
    }
    (p, q)
}
