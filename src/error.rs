//! Error types.
//!
//! - `FitError` is what the regression engine returns. It carries enough
//!   context to explain the failure without the caller re-deriving it.
//! - `AppError` is what the `trendfit` binary surfaces: a message plus the
//!   process exit code.

/// Failures raised by the fitting routines.
///
/// Numeric trouble (log of a non-positive value, a zero sum of squares, a
/// singular normal-equation system) is *not* an error: it shows up as
/// non-finite values or as the `degenerate` marker on a polynomial fit.
#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    /// Fewer usable samples than the model needs.
    InsufficientData {
        /// Number of samples available after missing-value filtering.
        got: usize,
        /// Minimum number required by the model.
        min: usize,
    },

    /// Polynomial order must be at least 1.
    InvalidOrder(usize),

    /// The requested series does not exist in the source.
    UnknownSeries {
        /// Requested series index.
        series: usize,
        /// Number of series the source holds.
        count: usize,
    },

    /// Range search requires `low < high`.
    InvalidRange {
        /// Lower x bound.
        low: f64,
        /// Upper x bound.
        high: f64,
    },

    /// The augmented matrix is not `m x (m + 1)`.
    MatrixShape {
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },

    /// x and y sequences of a series differ in length.
    MismatchedLengths {
        /// Number of x values.
        x_len: usize,
        /// Number of y values.
        y_len: usize,
    },
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::InsufficientData { got, min } => {
                write!(f, "Not enough data: got {got} valid samples, need at least {min}.")
            }
            FitError::InvalidOrder(order) => {
                write!(f, "Invalid polynomial order {order}: must be >= 1.")
            }
            FitError::UnknownSeries { series, count } => {
                write!(f, "Unknown series index {series} (source has {count} series).")
            }
            FitError::InvalidRange { low, high } => {
                write!(f, "Invalid x range [{low}, {high}]: requires low < high.")
            }
            FitError::MatrixShape { rows, cols } => {
                write!(f, "Augmented matrix must be m x (m + 1), got {rows} x {cols}.")
            }
            FitError::MismatchedLengths { x_len, y_len } => {
                write!(f, "Mismatched series lengths: x has {x_len} values, y has {y_len}.")
            }
        }
    }
}

impl std::error::Error for FitError {}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        let code = match err {
            FitError::InsufficientData { .. } | FitError::MatrixShape { .. } => 3,
            _ => 2,
        };
        AppError::new(code, err.to_string())
    }
}
