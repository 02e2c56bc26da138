use crate::error::LinalgError;

/// Compute the determinant of a 3x3 matrix.
#[rustfmt::skip]
pub fn det_mat33(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1]) -
    m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0]) +
    m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Compute the adjugate (transposed cofactor matrix) of a 3x3 matrix.
#[rustfmt::skip]
pub fn adjugate_mat33(m: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    [
        [
            m[1][1] * m[2][2] - m[1][2] * m[2][1],
            m[0][2] * m[2][1] - m[0][1] * m[2][2],
            m[0][1] * m[1][2] - m[0][2] * m[1][1],
        ],
        [
            m[1][2] * m[2][0] - m[1][0] * m[2][2],
            m[0][0] * m[2][2] - m[0][2] * m[2][0],
            m[0][2] * m[1][0] - m[0][0] * m[1][2],
        ],
        [
            m[1][0] * m[2][1] - m[1][1] * m[2][0],
            m[0][1] * m[2][0] - m[0][0] * m[2][1],
            m[0][0] * m[1][1] - m[0][1] * m[1][0],
        ],
    ]
}

/// Invert a 3x3 matrix as `adj(m) / det(m)`.
///
/// # Arguments
///
/// * `m` - The matrix to invert.
/// * `eps` - Determinants with an absolute value below `eps` are rejected.
///
/// # Errors
///
/// [`LinalgError::NonInvertible`] when `|det(m)| < eps` or the determinant is
/// not finite.
pub fn inverse_mat33(m: &[[f64; 3]; 3], eps: f64) -> Result<[[f64; 3]; 3], LinalgError> {
    let det = det_mat33(m);
    if !det.is_finite() || det.abs() < eps {
        return Err(LinalgError::NonInvertible(det));
    }

    let inv_det = 1.0 / det;
    let mut inv = adjugate_mat33(m);
    for row in inv.iter_mut() {
        for v in row.iter_mut() {
            *v *= inv_det;
        }
    }

    Ok(inv)
}

/// Multiply a 3x3 matrix by a 3d column vector.
pub fn mat33_mul_vec3(m: &[[f64; 3]; 3], v: &[f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}
