use super::GeometryError;
use std::f64::consts::PI;

/// Thickness polynomial coefficients with the closed trailing-edge variant of the last term.
const THICKNESS_COEFFS: [f64; 5] = [0.2969, -0.1260, -0.3516, 0.2843, -0.1036];

/// A NACA 4-digit section, parameterized as fractions of the chord.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Naca4 {
    /// Maximum camber (first digit / 100).
    pub max_camber: f64,
    /// Chordwise position of maximum camber (second digit / 10).
    pub camber_position: f64,
    /// Maximum thickness (last two digits / 100).
    pub thickness: f64,
}

impl Naca4 {
    /// Parses a designation such as `"2412"` or `"NACA 0012"`.
    pub fn parse(designation: &str) -> Result<Self, GeometryError> {
        let invalid = || GeometryError::InvalidNacaDesignation(designation.to_string());

        let trimmed = designation.trim();
        let digits = trimmed
            .strip_prefix("NACA")
            .or_else(|| trimmed.strip_prefix("naca"))
            .unwrap_or(trimmed)
            .trim();

        if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let digit = |i: usize| f64::from(digits.as_bytes()[i] - b'0');
        let max_camber = digit(0) / 100.0;
        let camber_position = digit(1) / 10.0;
        let thickness = (10.0 * digit(2) + digit(3)) / 100.0;

        if thickness <= 0.0 || (max_camber > 0.0) != (camber_position > 0.0) {
            return Err(invalid());
        }

        Ok(Self {
            max_camber,
            camber_position,
            thickness,
        })
    }

    pub fn is_symmetric(&self) -> bool {
        self.max_camber == 0.0
    }

    /// Half-thickness at chord fraction `x`.
    pub fn half_thickness(&self, x: f64) -> f64 {
        let [a0, a1, a2, a3, a4] = THICKNESS_COEFFS;
        5.0 * self.thickness * (a0 * x.sqrt() + x * (a1 + x * (a2 + x * (a3 + x * a4))))
    }

    /// Mean camber line height and slope at chord fraction `x`.
    pub fn camber(&self, x: f64) -> (f64, f64) {
        let (m, p) = (self.max_camber, self.camber_position);
        if self.is_symmetric() {
            return (0.0, 0.0);
        }
        if x < p {
            let yc = m / (p * p) * (2.0 * p * x - x * x);
            let slope = 2.0 * m / (p * p) * (p - x);
            (yc, slope)
        } else {
            let q = (1.0 - p) * (1.0 - p);
            let yc = m / q * ((1.0 - 2.0 * p) + 2.0 * p * x - x * x);
            let slope = 2.0 * m / q * (p - x);
            (yc, slope)
        }
    }

    /// Surface coordinates on a unit chord, ordered trailing edge -> upper surface ->
    /// leading edge -> lower surface.
    ///
    /// `points_per_side` chordwise stations are placed with cosine spacing. The trailing edge is
    /// closed, so it appears once (first), and the leading edge is shared by both surfaces.
    pub fn coordinates(&self, points_per_side: usize) -> (Vec<f64>, Vec<f64>) {
        let n = points_per_side.max(2);
        let stations: Vec<f64> = (0..=n)
            .map(|i| 0.5 * (1.0 - (PI * i as f64 / n as f64).cos()))
            .collect();

        let surface = |x: f64, sign: f64| {
            let yt = self.half_thickness(x);
            let (yc, slope) = self.camber(x);
            let theta = slope.atan();
            (x - sign * yt * theta.sin(), yc + sign * yt * theta.cos())
        };

        let upper = stations.iter().rev().map(|&x| surface(x, 1.0));
        let lower = stations[1..n].iter().map(|&x| surface(x, -1.0));
        upper.chain(lower).unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_plain_and_prefixed_designations() {
        let naca = Naca4::parse("2412").unwrap();
        assert!((naca.max_camber - 0.02).abs() < 1e-15);
        assert!((naca.camber_position - 0.4).abs() < 1e-15);
        assert!((naca.thickness - 0.12).abs() < 1e-15);

        assert_eq!(Naca4::parse("NACA 0012").unwrap(), Naca4::parse("0012").unwrap());
        assert_eq!(Naca4::parse("naca0012").unwrap(), Naca4::parse("0012").unwrap());
    }

    #[test]
    fn parse_rejects_malformed_designations() {
        for bad in ["", "12", "00a2", "23012", "0000", "2012", "0412"] {
            assert_eq!(
                Naca4::parse(bad),
                Err(GeometryError::InvalidNacaDesignation(bad.to_string())),
                "designation '{}'",
                bad
            );
        }
    }

    #[test]
    fn symmetric_section_has_mirrored_surfaces() {
        let naca = Naca4::parse("0012").unwrap();
        let (x, y) = naca.coordinates(40);
        assert_eq!(x.len(), 80);
        for i in 1..40 {
            let mirror = x.len() - i;
            assert!((x[i] - x[mirror]).abs() < 1e-14);
            assert!((y[i] + y[mirror]).abs() < 1e-14);
        }
    }

    #[test]
    fn contour_starts_at_trailing_edge_and_passes_leading_edge() {
        let naca = Naca4::parse("0012").unwrap();
        let (x, y) = naca.coordinates(50);
        assert!((x[0] - 1.0).abs() < 1e-15);
        assert!(y[0].abs() < 1e-3);
        assert_eq!(x[50], 0.0);
        assert_eq!(y[50], 0.0);
        assert!(y[25] > 0.0);
        assert!(y[75] < 0.0);
    }

    #[test]
    fn maximum_thickness_matches_designation() {
        let naca = Naca4::parse("0012").unwrap();
        assert!((naca.half_thickness(0.3) - 0.06).abs() < 1e-4);

        let (_, y) = naca.coordinates(200);
        let max_upper = y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!((max_upper - 0.06).abs() < 1e-3, "max upper {}", max_upper);
    }

    #[test]
    fn closed_trailing_edge_has_vanishing_thickness() {
        let naca = Naca4::parse("0015").unwrap();
        assert!(naca.half_thickness(1.0).abs() < 1e-4);
    }

    #[test]
    fn camber_line_peaks_at_its_position() {
        let naca = Naca4::parse("4412").unwrap();
        let (yc, slope) = naca.camber(0.4);
        assert!((yc - 0.04).abs() < 1e-15);
        assert!(slope.abs() < 1e-15);
        assert_eq!(naca.camber(0.0).0, 0.0);
        assert!(naca.camber(1.0).0.abs() < 1e-15);
    }
}
