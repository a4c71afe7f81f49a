use crate::{
    error::Error,
    system::{CoefficientMatrix, ResultVector},
};
use nalgebra::Vector2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// An estimated emitter position.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between `self` and `other`.
    pub fn distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<Vector2<f64>> for Position {
    fn from(vector: Vector2<f64>) -> Self {
        Self::new(vector.x, vector.y)
    }
}

impl From<Position> for Vector2<f64> {
    fn from(position: Position) -> Self {
        Vector2::new(position.x, position.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Solve `a * X = b` for `X` in the least-squares sense.
///
/// Uses the normal equations `(a^T a) X = a^T b`, which weigh every row
/// equally. Returns [`Error::SingularSystem`] if `a^T a` has no inverse, for
/// example when every receiver lies on one line.
pub fn triangulate(a: &CoefficientMatrix, b: &ResultVector) -> Result<Position, Error> {
    if a.nrows() != b.nrows() {
        return Err(Error::DimensionMismatch {
            rows: a.nrows(),
            len: b.nrows(),
        });
    }

    if a.nrows() < 2 {
        return Err(Error::InsufficientReceivers {
            count: a.nrows() + 1,
        });
    }

    let normal = a.tr_mul(a);
    let inverse = normal.try_inverse().ok_or(Error::SingularSystem)?;
    let solution = inverse * a.tr_mul(b);

    debug!(x = solution.x, y = solution.y, "solved normal equations");

    Ok(Position::from(solution))
}
