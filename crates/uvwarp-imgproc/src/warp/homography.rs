use uvwarp_linalg::{inverse_mat33, mat33_mul_vec3, solve};

use crate::error::HomographyError;

/// Homographies whose determinant is below this magnitude are not inverted.
pub const NON_INVERTIBLE_EPSILON: f64 = 1e-12;

/// Projections whose homogeneous coordinate is below this magnitude are
/// treated as points at infinity.
pub const DEGENERATE_DENOM_EPSILON: f64 = 1e-8;

/// A 2d projective transform stored as a row-major 3x3 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography(pub [[f64; 3]; 3]);

impl Default for Homography {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Homography {
    /// The identity transform.
    pub const IDENTITY: Homography =
        Homography([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    /// Compute the homography mapping four source points onto four
    /// destination points.
    ///
    /// Each correspondence `(x, y) -> (u, v)` contributes two rows to an 8x8
    /// system with the bottom-right entry fixed to one:
    ///
    /// ```text
    /// [-x, -y, -1,  0,  0,  0, x*u, y*u] h = -u
    /// [ 0,  0,  0, -x, -y, -1, x*v, y*v] h = -v
    /// ```
    ///
    /// The points are used in the order given; no sorting is done, so both
    /// quads must share the same loop order.
    ///
    /// # Arguments
    ///
    /// * `src` - The source 2d points with shape (4, 2).
    /// * `dst` - The destination 2d points with shape (4, 2).
    ///
    /// # Errors
    ///
    /// [`HomographyError::SingularMatrix`] when the points are degenerate
    /// (three or more collinear, or coincident).
    ///
    /// # Example
    ///
    /// ```
    /// use uvwarp_imgproc::warp::Homography;
    ///
    /// let src = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    /// let dst = [[2.0, 3.0], [4.0, 3.0], [4.0, 5.0], [2.0, 5.0]];
    /// let h = Homography::from_correspondences(&src, &dst).unwrap();
    ///
    /// let p = h.project([0.5, 0.5]).unwrap();
    /// assert!((p[0] - 3.0).abs() < 1e-9 && (p[1] - 4.0).abs() < 1e-9);
    /// ```
    pub fn from_correspondences(
        src: &[[f64; 2]; 4],
        dst: &[[f64; 2]; 4],
    ) -> Result<Self, HomographyError> {
        let mut a = [[0.0f64; 8]; 8];
        let mut b = [0.0f64; 8];
        for (i, (&[x, y], &[u, v])) in src.iter().zip(dst.iter()).enumerate() {
            a[2 * i] = [-x, -y, -1.0, 0.0, 0.0, 0.0, x * u, y * u];
            b[2 * i] = -u;
            a[2 * i + 1] = [0.0, 0.0, 0.0, -x, -y, -1.0, x * v, y * v];
            b[2 * i + 1] = -v;
        }

        let h = solve(&a, &b)?;

        Ok(Homography([
            [h[0], h[1], h[2]],
            [h[3], h[4], h[5]],
            [h[6], h[7], 1.0],
        ]))
    }

    /// The underlying row-major matrix.
    pub fn as_array(&self) -> &[[f64; 3]; 3] {
        &self.0
    }

    /// Compute the inverse transform.
    ///
    /// # Errors
    ///
    /// [`HomographyError::NonInvertible`] when the determinant magnitude is
    /// below [`NON_INVERTIBLE_EPSILON`].
    pub fn inverse(&self) -> Result<Self, HomographyError> {
        Ok(Homography(inverse_mat33(&self.0, NON_INVERTIBLE_EPSILON)?))
    }

    /// Map a point through the transform, including the perspective divide.
    ///
    /// Returns `None` when the homogeneous coordinate is smaller than
    /// [`DEGENERATE_DENOM_EPSILON`], i.e. the point maps to (near) infinity.
    #[inline]
    pub fn project(&self, p: [f64; 2]) -> Option<[f64; 2]> {
        let [x, y, w] = mat33_mul_vec3(&self.0, &[p[0], p[1], 1.0]);
        if w.is_nan() || w.abs() < DEGENERATE_DENOM_EPSILON {
            return None;
        }
        Some([x / w, y / w])
    }
}
