//! Error types raised while building solvers and reading problem data.

use thiserror::Error;

/// Errors raised by solver construction, parameter handling and parsing.
///
/// Cancellation is not an error: a cancelled run is reported through the
/// `bool` returned by [`Algorithm::solve`](crate::algorithm::Algorithm::solve).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TspError {
    /// The distance matrix has no cities.
    #[error("distance matrix is empty")]
    EmptyMatrix,

    /// The distance matrix is not square.
    #[error("distance matrix must be square, got {rows}x{columns}")]
    NonSquareMatrix {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        columns: usize,
    },

    /// The number of cells does not match the declared shape.
    #[error("distance matrix expects {expected} cells, got {actual}")]
    MatrixShape {
        /// `rows * columns`.
        expected: usize,
        /// Number of cells supplied.
        actual: usize,
    },

    /// A tuning value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The algorithm name is not one of `bf`, `bnb`, `sa`, `ga`.
    #[error("unknown algorithm `{0}`")]
    UnknownAlgorithm(String),

    /// A required named parameter is absent.
    #[error("missing parameter `{0}`")]
    MissingParameter(String),

    /// A named parameter could not be converted to its expected type.
    #[error("parameter `{key}` has invalid value `{value}`")]
    InvalidParameter {
        /// Parameter name.
        key: String,
        /// Raw value as supplied.
        value: String,
    },

    /// Plain-text matrix or tour data is malformed.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TspError>;
