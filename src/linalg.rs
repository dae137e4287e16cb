//! 2D affine transforms in homogeneous coordinates.
//!
//! Points are column vectors, so a product applies right to left:
//!
//! ```text
//! (A · B) · v  ==  A · (B · v)      // B touches the geometry first
//! ```
//!
//! [`Mat3::compose`] folds its arguments left to right starting from the
//! identity, which means the *last* matrix passed is the first one applied.

use std::fmt;
use std::ops::Mul;

/// A point in the plane, treated as the homogeneous vector `(x, y, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Point2 { x, y }
    }
}

/// A 3x3 homogeneous transform. Only the top two rows carry information for
/// affine transforms; the bottom row stays `[0, 0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    pub data: [[f64; 3]; 3],
}

impl Default for Mat3 {
    fn default() -> Self {
        Mat3::identity()
    }
}

impl Mat3 {
    pub const fn identity() -> Self {
        Mat3 { data: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]] }
    }

    /// Scale the x and y axes. Negative factors mirror.
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Mat3 { data: [[sx, 0.0, 0.0], [0.0, sy, 0.0], [0.0, 0.0, 1.0]] }
    }

    /// Counter-clockwise rotation by `angle` radians.
    pub fn rotate(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Mat3 { data: [[cos, -sin, 0.0], [sin, cos, 0.0], [0.0, 0.0, 1.0]] }
    }

    pub const fn translate(tx: f64, ty: f64) -> Self {
        Mat3 { data: [[1.0, 0.0, tx], [0.0, 1.0, ty], [0.0, 0.0, 1.0]] }
    }

    /// Standard matrix product `a · b`.
    pub fn mat_mul(a: &Mat3, b: &Mat3) -> Mat3 {
        let mut out = [[0.0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| a.data[i][k] * b.data[k][j]).sum();
            }
        }
        Mat3 { data: out }
    }

    /// Fold `transforms` left to right with [`Mat3::mat_mul`].
    ///
    /// `compose(&[m1, m2, m3])` is `m1 · m2 · m3`, so `m3` is applied to the
    /// geometry first.
    pub fn compose(transforms: &[Mat3]) -> Mat3 {
        transforms.iter().fold(Mat3::identity(), |acc, m| Mat3::mat_mul(&acc, m))
    }

    /// Transform a point (`M · v`).
    pub fn apply(&self, p: Point2) -> Point2 {
        let d = &self.data;
        Point2 { x: d[0][0] * p.x + d[0][1] * p.y + d[0][2], y: d[1][0] * p.x + d[1][1] * p.y + d[1][2] }
    }

    /// The six affine coefficients `[a, b, c, d, e, f]` in the column-major
    /// order renderers expect for `matrix(a b c d e f)`.
    pub fn coefficients(&self) -> [f64; 6] {
        let d = &self.data;
        [d[0][0], d[1][0], d[0][1], d[1][1], d[0][2], d[1][2]]
    }

    pub fn is_identity(&self, epsilon: f64) -> bool {
        self.approx_eq(&Mat3::identity(), epsilon)
    }

    pub fn approx_eq(&self, other: &Mat3, epsilon: f64) -> bool {
        self.data.iter().flatten().zip(other.data.iter().flatten()).all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Mul for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Mat3 {
        Mat3::mat_mul(&self, &rhs)
    }
}

impl fmt::Display for Mat3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.data.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[{:.2}, {:.2}, {:.2}]", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, SQRT_2};

    #[test]
    fn mat_mul_cases() {
        let cases: Vec<(&str, Mat3, Mat3, Mat3)> = vec![
            (
                "scale then translate",
                Mat3::scale(1.0, -1.0),
                Mat3::translate(5.0, 10.0),
                Mat3 { data: [[1.0, 0.0, 5.0], [0.0, -1.0, -10.0], [0.0, 0.0, 1.0]] },
            ),
            (
                "rotate then translate",
                Mat3::rotate(FRAC_PI_4),
                Mat3::translate(5.0, 10.0),
                Mat3 {
                    data: [
                        [SQRT_2 / 2.0, -SQRT_2 / 2.0, -3.535],
                        [SQRT_2 / 2.0, SQRT_2 / 2.0, 10.605],
                        [0.0, 0.0, 1.0],
                    ],
                },
            ),
            ("identity", Mat3::translate(0.0, 0.0), Mat3::scale(1.0, 1.0), Mat3::identity()),
        ];

        for (name, a, b, want) in cases {
            let got = Mat3::mat_mul(&a, &b);
            assert!(got.approx_eq(&want, 0.01), "{}: got\n{}\nwant\n{}", name, got, want);
        }
    }

    #[test]
    fn compose_applies_rightmost_first() {
        // Translate first, then rotate a quarter turn.
        let m = Mat3::compose(&[Mat3::rotate(FRAC_PI_2), Mat3::translate(1.0, 0.0)]);
        let p = m.apply(Point2::new(0.0, 0.0));
        assert!((p.x - 0.0).abs() < 1e-9 && (p.y - 1.0).abs() < 1e-9, "got {:?}", p);

        // Swapping the order changes the result.
        let m = Mat3::compose(&[Mat3::translate(1.0, 0.0), Mat3::rotate(FRAC_PI_2)]);
        let p = m.apply(Point2::new(0.0, 0.0));
        assert!((p.x - 1.0).abs() < 1e-9 && p.y.abs() < 1e-9, "got {:?}", p);
    }

    #[test]
    fn compose_of_nothing_is_identity() {
        assert!(Mat3::compose(&[]).is_identity(0.0));
        assert_eq!(Mat3::default(), Mat3::identity());
    }

    #[test]
    fn coefficients_are_column_major() {
        let m = Mat3::compose(&[Mat3::translate(7.0, 9.0), Mat3::scale(-1.0, 2.0)]);
        assert_eq!(m.coefficients(), [-1.0, 0.0, 0.0, 2.0, 7.0, 9.0]);
        assert_eq!(m * Mat3::identity(), m);
    }
}
