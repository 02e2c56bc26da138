use crate::error::LinalgError;

/// Pivots with an absolute value below this threshold make the system singular.
pub const SINGULAR_PIVOT_EPSILON: f64 = 1e-12;

/// Solve the square linear system `A x = b` with Gauss-Jordan elimination.
///
/// At every step `k` the row `r >= k` with the largest `|A[r][k]|` is swapped
/// into position `k` (partial pivoting). The pivot row is normalized and the
/// pivot column is eliminated from every other row, above and below, so the
/// reduced right hand side is the solution.
///
/// The inputs are copied; the caller's matrices are never modified.
///
/// # Arguments
///
/// * `a` - The coefficient matrix with shape (N, N), row-major.
/// * `b` - The right hand side with shape (N).
///
/// # Returns
///
/// The solution vector `x` with shape (N).
///
/// # Errors
///
/// [`LinalgError::SingularMatrix`] when the best pivot at some step is below
/// [`SINGULAR_PIVOT_EPSILON`].
///
/// # Example
///
/// ```
/// use uvwarp_linalg::solve;
///
/// let a = [[2.0, 1.0], [1.0, 3.0]];
/// let b = [3.0, 5.0];
/// let x = solve(&a, &b).unwrap();
///
/// assert!((x[0] - 0.8).abs() < 1e-12);
/// assert!((x[1] - 1.4).abs() < 1e-12);
/// ```
pub fn solve<const N: usize>(a: &[[f64; N]; N], b: &[f64; N]) -> Result<[f64; N], LinalgError> {
    let mut m = *a;
    let mut x = *b;

    for k in 0..N {
        // partial pivoting
        let mut max_row = k;
        let mut max_val = m[k][k].abs();
        for (r, row) in m.iter().enumerate().skip(k + 1) {
            let v = row[k].abs();
            if v > max_val {
                max_val = v;
                max_row = r;
            }
        }

        if max_val.is_nan() || max_val < SINGULAR_PIVOT_EPSILON {
            return Err(LinalgError::SingularMatrix {
                step: k,
                pivot: max_val,
            });
        }

        m.swap(k, max_row);
        x.swap(k, max_row);

        let pivot = m[k][k];
        for j in k..N {
            m[k][j] /= pivot;
        }
        x[k] /= pivot;

        let pivot_row = m[k];
        let pivot_rhs = x[k];
        for i in 0..N {
            if i == k {
                continue;
            }
            let factor = m[i][k];
            if factor == 0.0 {
                continue;
            }
            for j in k..N {
                m[i][j] -= factor * pivot_row[j];
            }
            x[i] -= factor * pivot_rhs;
        }
    }

    Ok(x)
}
