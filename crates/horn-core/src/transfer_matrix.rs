use num_complex::Complex64;

/// Stand-in magnitude for an impedance whose divisor vanished exactly.
pub const IMPEDANCE_SENTINEL: f64 = 1e30;

/// A 2×2 complex transfer matrix relating throat to mouth.
///
/// ```text
/// [p_throat]   [a  b] [p_mouth]
/// [U_throat] = [c  d] [U_mouth]
/// ```
///
/// `p` is acoustic pressure and `U` volume velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferMatrix {
    pub a: Complex64,
    pub b: Complex64,
    pub c: Complex64,
    pub d: Complex64,
}

impl TransferMatrix {
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { a, b, c, d }
    }

    /// Identity matrix (zero-length element).
    pub fn identity() -> Self {
        Self {
            a: Complex64::new(1.0, 0.0),
            b: Complex64::new(0.0, 0.0),
            c: Complex64::new(0.0, 0.0),
            d: Complex64::new(1.0, 0.0),
        }
    }

    /// Chain (multiply) this matrix with another: self · other.
    ///
    /// `self` is the element nearer the throat.
    pub fn chain(&self, other: &TransferMatrix) -> TransferMatrix {
        TransferMatrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
        }
    }

    /// ad − bc. Unity for a lossless reciprocal element.
    pub fn determinant(&self) -> Complex64 {
        self.a * self.d - self.b * self.c
    }

    /// Impedance seen at the throat when the mouth is loaded by `z_mouth`.
    ///
    /// Z₁ = (a·Z₂ + b) / (c·Z₂ + d)
    pub fn throat_impedance(&self, z_mouth: Complex64) -> Complex64 {
        divide_or_sentinel(self.a * z_mouth + self.b, self.c * z_mouth + self.d)
    }

    /// Inverse of [`throat_impedance`](Self::throat_impedance).
    ///
    /// Z₂ = (d·Z₁ − b) / (a − c·Z₁)
    pub fn mouth_impedance(&self, z_throat: Complex64) -> Complex64 {
        divide_or_sentinel(self.d * z_throat - self.b, self.a - self.c * z_throat)
    }

    /// Volume velocity leaving the mouth for a given throat volume
    /// velocity: U₂ = U₁ / (c·Z₂ + d).
    pub fn mouth_volume_velocity(&self, u_throat: Complex64, z_mouth: Complex64) -> Complex64 {
        let denom = self.c * z_mouth + self.d;
        if denom == Complex64::new(0.0, 0.0) {
            return Complex64::new(0.0, 0.0);
        }
        u_throat / denom
    }
}

/// `num / den`, or an effectively infinite real impedance when `den` is
/// exactly zero so frequency sweeps never produce NaN.
pub fn divide_or_sentinel(num: Complex64, den: Complex64) -> Complex64 {
    if den == Complex64::new(0.0, 0.0) {
        log::warn!("zero impedance divisor, substituting sentinel");
        Complex64::new(IMPEDANCE_SENTINEL, 0.0)
    } else {
        num / den
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duct(k: f64, l: f64, z: f64) -> TransferMatrix {
        let cos_kl = Complex64::new((k * l).cos(), 0.0);
        let sin_kl = Complex64::new((k * l).sin(), 0.0);
        let j = Complex64::new(0.0, 1.0);
        TransferMatrix::new(
            cos_kl,
            j * Complex64::new(z, 0.0) * sin_kl,
            j * Complex64::new(1.0 / z, 0.0) * sin_kl,
            cos_kl,
        )
    }

    #[test]
    fn test_identity_chain() {
        let id = TransferMatrix::identity();
        let m = TransferMatrix::new(
            Complex64::new(1.0, 0.5),
            Complex64::new(0.0, 1.0),
            Complex64::new(0.0, -1.0),
            Complex64::new(1.0, 0.5),
        );
        let result = id.chain(&m);
        assert!((result.a - m.a).norm() < 1e-12);
        assert!((result.b - m.b).norm() < 1e-12);
        assert!((result.c - m.c).norm() < 1e-12);
        assert!((result.d - m.d).norm() < 1e-12);
    }

    #[test]
    fn test_identity_passes_impedance_through() {
        let z = Complex64::new(120.0, -35.0);
        let id = TransferMatrix::identity();
        assert!((id.throat_impedance(z) - z).norm() < 1e-12);
    }

    #[test]
    fn test_reciprocity() {
        let m = duct(1.0, 0.5, 100.0);
        let det = m.determinant();
        assert!((det - Complex64::new(1.0, 0.0)).norm() < 1e-12, "det = {det}");
    }

    #[test]
    fn test_impedance_round_trip() {
        let m = duct(3.7, 0.42, 2500.0).chain(&duct(1.3, 0.2, 800.0));
        let z_mouth = Complex64::new(310.0, 95.0);
        let z_throat = m.throat_impedance(z_mouth);
        let recovered = m.mouth_impedance(z_throat);
        assert!(
            (recovered - z_mouth).norm() < 1e-9 * z_mouth.norm(),
            "recovered {recovered}, expected {z_mouth}"
        );
    }

    #[test]
    fn test_half_wave_duct_is_transparent() {
        // kL = π: the duct presents its load unchanged.
        let m = duct(std::f64::consts::PI, 1.0, 400.0);
        let z = Complex64::new(50.0, 20.0);
        assert!((m.throat_impedance(z) - z).norm() < 1e-9);
    }

    #[test]
    fn test_zero_divisor_returns_sentinel() {
        let m = TransferMatrix::new(
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
        );
        let z = m.throat_impedance(Complex64::new(10.0, 0.0));
        assert!(z.re.is_finite());
        assert_eq!(z.re, IMPEDANCE_SENTINEL);
        let u = m.mouth_volume_velocity(Complex64::new(1.0, 0.0), Complex64::new(10.0, 0.0));
        assert_eq!(u, Complex64::new(0.0, 0.0));
    }
}
