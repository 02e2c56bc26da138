/// An error type for the linear algebra module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LinalgError {
    /// The pivot selected at elimination step `step` is too small.
    #[error("Singular matrix: pivot {pivot:e} at step {step} is below the tolerance")]
    SingularMatrix {
        /// Elimination step (column) where the pivot vanished.
        step: usize,
        /// Absolute value of the best available pivot.
        pivot: f64,
    },

    /// The determinant is too small to invert the matrix.
    #[error("Cannot invert matrix with determinant {0:e}")]
    NonInvertible(f64),
}
