#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the linear algebra module.
pub mod error;

/// 3x3 matrix helpers for homogeneous 2d transforms.
pub mod mat33;

/// Dense square linear system solver.
pub mod solve;

pub use crate::error::LinalgError;
pub use crate::mat33::{adjugate_mat33, det_mat33, inverse_mat33, mat33_mul_vec3};
pub use crate::solve::{solve, SINGULAR_PIVOT_EPSILON};
